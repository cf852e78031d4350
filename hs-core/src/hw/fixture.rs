//! Static hardware provider
//!
//! Serves a fixed hardware tree, either built in code or loaded from a JSON
//! file when the provider is opened. Used for replaying captured machines
//! and for exercising the daemon without touching real hardware.
//!
//! Node ids are tree paths: `"0"` for the first top-level node, `"0/1"` for
//! its second sub-hardware, and so on.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::data::{HardwareKind, HardwareNode, Sensor};
use crate::error::{HwsenseError, Result};
use crate::provider::HardwareProvider;

/// One node of a fixture tree, with its sensors inline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StaticNode {
    pub kind: HardwareKind,
    pub name: String,
    #[serde(default)]
    pub sensors: Vec<Sensor>,
    #[serde(default)]
    pub sub_hardware: Vec<StaticNode>,
}

impl StaticNode {
    pub fn new(kind: HardwareKind, name: impl Into<String>) -> Self {
        Self {
            kind,
            name: name.into(),
            sensors: Vec::new(),
            sub_hardware: Vec::new(),
        }
    }

    pub fn sensor(mut self, sensor: Sensor) -> Self {
        self.sensors.push(sensor);
        self
    }

    pub fn sub(mut self, node: StaticNode) -> Self {
        self.sub_hardware.push(node);
        self
    }
}

/// On-disk fixture layout
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FixtureFile {
    #[serde(default)]
    pub hardware: Vec<StaticNode>,
}

impl FixtureFile {
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| HwsenseError::FileRead {
            path: path.to_path_buf(),
            source: e,
        })?;
        Ok(serde_json::from_str(&content)?)
    }
}

#[derive(Debug, Clone)]
enum Source {
    Inline(Vec<StaticNode>),
    File(PathBuf),
}

/// Provider over a fixed tree
#[derive(Debug)]
pub struct StaticProvider {
    source: Source,
    open: bool,
    topology: Vec<HardwareNode>,
    readings: HashMap<String, Vec<Sensor>>,
    captured: HashMap<String, Vec<Sensor>>,
    update_counts: HashMap<String, usize>,
    failing_updates: HashMap<String, String>,
}

impl StaticProvider {
    pub fn from_nodes(nodes: Vec<StaticNode>) -> Self {
        Self::with_source(Source::Inline(nodes))
    }

    /// The file is read on `open`, so a missing or malformed fixture is an
    /// open failure.
    pub fn from_file(path: impl Into<PathBuf>) -> Self {
        Self::with_source(Source::File(path.into()))
    }

    fn with_source(source: Source) -> Self {
        Self {
            source,
            open: false,
            topology: Vec::new(),
            readings: HashMap::new(),
            captured: HashMap::new(),
            update_counts: HashMap::new(),
            failing_updates: HashMap::new(),
        }
    }

    /// Make every update of the node with `id` fail with `reason`
    pub fn fail_updates(mut self, id: impl Into<String>, reason: impl Into<String>) -> Self {
        self.failing_updates.insert(id.into(), reason.into());
        self
    }

    /// How many times the node with `id` has been updated since open
    pub fn update_count(&self, id: &str) -> usize {
        self.update_counts.get(id).copied().unwrap_or(0)
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    fn ensure_open(&self) -> Result<()> {
        if self.open {
            Ok(())
        } else {
            Err(HwsenseError::ProviderNotOpen)
        }
    }

    fn index(&mut self, nodes: &[StaticNode], prefix: Option<&str>) -> Vec<HardwareNode> {
        nodes
            .iter()
            .enumerate()
            .map(|(i, node)| {
                let id = match prefix {
                    Some(p) => format!("{}/{}", p, i),
                    None => i.to_string(),
                };
                self.readings.insert(id.clone(), node.sensors.clone());
                let subs = self.index(&node.sub_hardware, Some(&id));
                HardwareNode::new(id, node.kind, node.name.clone()).with_sub_hardware(subs)
            })
            .collect()
    }
}

impl HardwareProvider for StaticProvider {
    fn open(&mut self) -> Result<()> {
        let nodes = match &self.source {
            Source::Inline(nodes) => nodes.clone(),
            Source::File(path) => {
                debug!("Loading fixture from {:?}", path);
                FixtureFile::load(path)
                    .map_err(|e| HwsenseError::open(e.to_string()))?
                    .hardware
            }
        };

        self.readings.clear();
        self.captured.clear();
        self.update_counts.clear();
        self.topology = self.index(&nodes, None);
        self.open = true;

        info!("Static provider opened with {} top-level nodes", self.topology.len());
        Ok(())
    }

    fn close(&mut self) -> Result<()> {
        self.open = false;
        self.topology.clear();
        self.readings.clear();
        self.captured.clear();
        Ok(())
    }

    fn hardware(&self) -> Result<Vec<HardwareNode>> {
        self.ensure_open()?;
        Ok(self.topology.clone())
    }

    fn update(&mut self, node: &HardwareNode) -> Result<()> {
        self.ensure_open()?;
        *self.update_counts.entry(node.id.clone()).or_insert(0) += 1;

        if let Some(reason) = self.failing_updates.get(&node.id) {
            return Err(HwsenseError::update(&node.name, reason));
        }

        let sensors = self
            .readings
            .get(&node.id)
            .cloned()
            .ok_or_else(|| HwsenseError::update(&node.name, "unknown node"))?;
        self.captured.insert(node.id.clone(), sensors);
        Ok(())
    }

    fn sensors(&self, node: &HardwareNode) -> Result<Vec<Sensor>> {
        self.ensure_open()?;
        Ok(self.captured.get(&node.id).cloned().unwrap_or_default())
    }

    fn describe(&self) -> String {
        match &self.source {
            Source::Inline(_) => "static fixture".to_string(),
            Source::File(path) => format!("fixture {}", path.display()),
        }
    }
}
