//! Linux hwmon provider
//!
//! Builds the hardware tree from `/sys/class/hwmon`:
//! - **CPU**: `coretemp`, `k10temp`, `zenpower`, `cpu_thermal` chips
//! - **Motherboard**: Super I/O and embedded controller chips as sub-hardware,
//!   ACPI thermal zones as the board's own sensors
//! - **GPU**: `amdgpu`/`radeon`, `nouveau`, `i915`/`xe`, plus nvidia-smi boards
//! - **Storage**: `nvme` and `drivetemp`, optionally enriched with smartctl
//!
//! # Channel files
//!
//! - `tempN_input`: millidegrees Celsius
//! - `fanN_input`: RPM
//! - `inN_input`: millivolts
//! - `powerN_average` / `powerN_input`: microwatts
//! - `freqN_input`: Hz

use regex::Regex;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use tracing::{debug, info, trace, warn};

use super::{nvidia, smart};
use crate::constants::{chips, gpu, names, paths, temperature, voltage};
use crate::data::{GpuVendor, HardwareKind, HardwareNode, ProviderConfig, Sensor, SensorKind};
use crate::error::{HwsenseError, Result};
use crate::provider::HardwareProvider;

static CHANNEL_PATTERN: OnceLock<Option<Regex>> = OnceLock::new();

fn channel_pattern() -> Option<&'static Regex> {
    CHANNEL_PATTERN
        .get_or_init(|| Regex::new(r"^(temp|fan|in|power|freq)(\d+)_(input|average)$").ok())
        .as_ref()
}

/// Channel file families a chip can expose
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
enum ChannelType {
    Temp,
    Fan,
    In,
    Power,
    Freq,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Channel {
    kind: ChannelType,
    index: u32,
    file: String,
}

/// How a chip's channels are named and which extras are read
#[derive(Debug, Clone, PartialEq)]
enum Flavor {
    Generic,
    Cpu,
    AmdGpu,
    /// nouveau, i915, xe: no label map, first temperature is the core
    OtherGpu,
    Storage { device: Option<PathBuf> },
}

#[derive(Debug, Clone)]
struct ChipSource {
    path: PathBuf,
    flavor: Flavor,
}

#[derive(Debug, Clone)]
enum NodeSource {
    Chips(Vec<ChipSource>),
    Nvidia(u32),
}

/// Where a chip belongs in the tree
#[derive(Debug, Clone, Copy, PartialEq)]
enum Placement {
    Cpu,
    SuperIo,
    EmbeddedController,
    BoardDirect,
    Gpu(GpuVendor),
    Storage,
    Ignored,
}

fn placement(driver: &str) -> Placement {
    let starts = |prefixes: &[&str]| prefixes.iter().any(|p| driver.starts_with(p));

    if chips::CPU.contains(&driver) {
        Placement::Cpu
    } else if chips::MOTHERBOARD_DIRECT.contains(&driver) {
        Placement::BoardDirect
    } else if starts(chips::SUPER_IO_PREFIXES) {
        Placement::SuperIo
    } else if starts(chips::EMBEDDED_CONTROLLER_PREFIXES) {
        Placement::EmbeddedController
    } else if chips::GPU_AMD.contains(&driver) {
        Placement::Gpu(GpuVendor::Amd)
    } else if chips::GPU_NVIDIA.contains(&driver) {
        Placement::Gpu(GpuVendor::Nvidia)
    } else if chips::GPU_INTEL.contains(&driver) {
        Placement::Gpu(GpuVendor::Intel)
    } else if chips::STORAGE.contains(&driver) {
        Placement::Storage
    } else {
        Placement::Ignored
    }
}

/// Provider reading the Linux hwmon subsystem
#[derive(Debug)]
pub struct HwmonProvider {
    config: ProviderConfig,
    open: bool,
    topology: Vec<HardwareNode>,
    sources: HashMap<String, NodeSource>,
    captured: HashMap<String, Vec<Sensor>>,
}

impl HwmonProvider {
    pub fn new(config: ProviderConfig) -> Self {
        Self {
            config,
            open: false,
            topology: Vec::new(),
            sources: HashMap::new(),
            captured: HashMap::new(),
        }
    }

    fn ensure_open(&self) -> Result<()> {
        if self.open {
            Ok(())
        } else {
            Err(HwsenseError::ProviderNotOpen)
        }
    }

    fn register(&mut self, node: HardwareNode, source: NodeSource) -> HardwareNode {
        self.sources.insert(node.id.clone(), source);
        node
    }

    fn enumerate(&mut self) -> Result<Vec<HardwareNode>> {
        let root = self.config.hwmon_root.clone();
        let entries = fs::read_dir(&root)
            .map_err(|e| HwsenseError::open(format!("cannot read {}: {}", root.display(), e)))?;

        let mut chip_dirs: Vec<(String, PathBuf)> = Vec::new();
        for entry in entries {
            let path = entry?.path();
            let Some(driver) = read_trimmed(&path.join("name")) else {
                trace!("Skipped {:?} (no name)", path);
                continue;
            };
            chip_dirs.push((driver, path));
        }
        chip_dirs.sort_by(|a, b| hwmon_index(&a.1).cmp(&hwmon_index(&b.1)));

        let mut cpus = Vec::new();
        let mut board_subs = Vec::new();
        let mut board_direct = Vec::new();
        let mut gpus = Vec::new();
        let mut storages = Vec::new();

        for (driver, path) in chip_dirs {
            let dir = dir_name(&path);
            let place = placement(&driver);
            match place {
                Placement::Cpu if self.config.cpu => {
                    let name = cpu_model(&self.config.cpuinfo);
                    let node = HardwareNode::new(format!("cpu/{}", dir), HardwareKind::Cpu, name);
                    cpus.push(self.register(node, chip_source(path, Flavor::Cpu)));
                }
                Placement::SuperIo | Placement::EmbeddedController if self.config.motherboard => {
                    let kind = if place == Placement::SuperIo {
                        HardwareKind::SuperIo
                    } else {
                        HardwareKind::EmbeddedController
                    };
                    let node = HardwareNode::new(format!("mb/{}", dir), kind, driver.clone());
                    board_subs.push(self.register(node, chip_source(path, Flavor::Generic)));
                }
                Placement::BoardDirect if self.config.motherboard => {
                    board_direct.push(ChipSource {
                        path,
                        flavor: Flavor::Generic,
                    });
                }
                Placement::Gpu(vendor) if self.config.gpu => {
                    let flavor = if vendor == GpuVendor::Amd {
                        Flavor::AmdGpu
                    } else {
                        Flavor::OtherGpu
                    };
                    let name = gpu_name(&path, vendor);
                    let id = format!("gpu/{}", dir);
                    let node = HardwareNode::new(id, HardwareKind::Gpu(vendor), name);
                    gpus.push(self.register(node, chip_source(path, flavor)));
                }
                Placement::Storage if self.config.storage => {
                    let device = if self.config.smart {
                        block_device(&path)
                    } else {
                        None
                    };
                    let name = read_trimmed(&path.join("device").join("model"))
                        .unwrap_or_else(|| format!("{} {}", driver, dir));
                    let id = format!("storage/{}", dir);
                    let node = HardwareNode::new(id, HardwareKind::Storage, name);
                    let source = chip_source(path, Flavor::Storage { device });
                    storages.push(self.register(node, source));
                }
                other => trace!(chip = %driver, placement = ?other, "Chip not collected"),
            }
        }

        if self.config.gpu && self.config.nvidia_smi {
            match nvidia::query() {
                Ok(boards) => {
                    for board in boards {
                        let node = HardwareNode::new(
                            format!("nvidia/{}", board.index),
                            HardwareKind::Gpu(GpuVendor::Nvidia),
                            board.name.clone(),
                        );
                        gpus.push(self.register(node, NodeSource::Nvidia(board.index)));
                    }
                }
                Err(e) => debug!("No NVIDIA boards via nvidia-smi: {}", e),
            }
        }

        let mut nodes = cpus;
        if !board_subs.is_empty() || !board_direct.is_empty() {
            let name = board_name(&self.config.dmi_dir);
            let board = HardwareNode::new("mb", HardwareKind::Motherboard, name)
                .with_sub_hardware(board_subs);
            nodes.push(self.register(board, NodeSource::Chips(board_direct)));
        }
        nodes.extend(gpus);
        nodes.extend(storages);
        Ok(nodes)
    }
}

impl HardwareProvider for HwmonProvider {
    fn open(&mut self) -> Result<()> {
        if self.config.is_empty() {
            warn!("All hardware groups are disabled, snapshots will be empty");
        }

        self.sources.clear();
        self.captured.clear();
        self.topology = self.enumerate()?;
        self.open = true;

        info!(
            nodes = self.topology.len(),
            root = %self.config.hwmon_root.display(),
            "hwmon provider opened"
        );
        Ok(())
    }

    fn close(&mut self) -> Result<()> {
        self.open = false;
        self.topology.clear();
        self.sources.clear();
        self.captured.clear();
        Ok(())
    }

    fn hardware(&self) -> Result<Vec<HardwareNode>> {
        self.ensure_open()?;
        Ok(self.topology.clone())
    }

    fn update(&mut self, node: &HardwareNode) -> Result<()> {
        self.ensure_open()?;
        let source = self
            .sources
            .get(&node.id)
            .ok_or_else(|| HwsenseError::update(&node.name, "unknown node"))?;

        let sensors = match source {
            NodeSource::Chips(chips) => {
                let mut sensors = Vec::new();
                for chip in chips {
                    let chip_sensors = read_chip(chip)
                        .map_err(|e| HwsenseError::update(&node.name, e.to_string()))?;
                    sensors.extend(chip_sensors);
                }
                sensors
            }
            NodeSource::Nvidia(index) => {
                let boards = nvidia::query()
                    .map_err(|e| HwsenseError::update(&node.name, e.to_string()))?;
                boards
                    .into_iter()
                    .find(|b| b.index == *index)
                    .map(|b| b.sensors())
                    .ok_or_else(|| HwsenseError::update(&node.name, "board no longer reported"))?
            }
        };

        trace!(node = %node.name, sensors = sensors.len(), "Updated");
        self.captured.insert(node.id.clone(), sensors);
        Ok(())
    }

    fn sensors(&self, node: &HardwareNode) -> Result<Vec<Sensor>> {
        self.ensure_open()?;
        Ok(self.captured.get(&node.id).cloned().unwrap_or_default())
    }

    fn describe(&self) -> String {
        format!("hwmon {}", self.config.hwmon_root.display())
    }
}

fn chip_source(path: PathBuf, flavor: Flavor) -> NodeSource {
    NodeSource::Chips(vec![ChipSource { path, flavor }])
}

fn read_trimmed(path: &Path) -> Option<String> {
    fs::read_to_string(path)
        .ok()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

fn read_number(path: &Path) -> Option<f64> {
    match fs::read_to_string(path) {
        Ok(content) => content.trim().parse::<f64>().ok(),
        Err(e) => {
            trace!(path = ?path, error = %e, "Could not read channel");
            None
        }
    }
}

fn dir_name(path: &Path) -> String {
    path.file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("unknown")
        .to_string()
}

/// Numeric suffix of `hwmonN`, so hwmon10 sorts after hwmon9
fn hwmon_index(path: &Path) -> u32 {
    dir_name(path)
        .trim_start_matches("hwmon")
        .parse()
        .unwrap_or(u32::MAX)
}

fn cpu_model(cpuinfo: &Path) -> String {
    fs::read_to_string(cpuinfo)
        .ok()
        .and_then(|content| {
            content
                .lines()
                .find(|l| l.starts_with("model name"))
                .and_then(|l| l.split_once(':'))
                .map(|(_, v)| v.trim().to_string())
        })
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| names::UNKNOWN_CPU.to_string())
}

fn board_name(dmi_dir: &Path) -> String {
    let vendor = read_trimmed(&dmi_dir.join("board_vendor"));
    let name = read_trimmed(&dmi_dir.join("board_name"));
    match (vendor, name) {
        (Some(v), Some(n)) => format!("{} {}", v, n),
        (None, Some(n)) => n,
        (Some(v), None) => v,
        (None, None) => names::UNKNOWN_MOTHERBOARD.to_string(),
    }
}

fn gpu_name(chip_path: &Path, vendor: GpuVendor) -> String {
    read_trimmed(&chip_path.join("device").join("product_name"))
        .unwrap_or_else(|| format!("{} GPU", vendor))
}

/// Block device node for smartctl: `nvmeN` controllers directly, SCSI disks
/// through their `block/sdX` child.
fn block_device(chip_path: &Path) -> Option<PathBuf> {
    let device = chip_path.join("device");
    let block_dir = device.join("block");

    let name = if block_dir.is_dir() {
        fs::read_dir(&block_dir)
            .ok()?
            .flatten()
            .next()
            .map(|e| e.file_name().to_string_lossy().to_string())
    } else {
        fs::canonicalize(&device).ok().map(|p| dir_name(&p))
    }?;

    Some(Path::new(paths::DEV_DIR).join(name))
}

fn list_channels(chip_path: &Path) -> Result<Vec<Channel>> {
    let Some(pattern) = channel_pattern() else {
        return Ok(Vec::new());
    };

    let mut channels: Vec<Channel> = Vec::new();
    for entry in fs::read_dir(chip_path)? {
        let file = entry?.file_name().to_string_lossy().to_string();
        let Some(caps) = pattern.captures(&file) else {
            continue;
        };
        let kind = match &caps[1] {
            "temp" => ChannelType::Temp,
            "fan" => ChannelType::Fan,
            "in" => ChannelType::In,
            "power" => ChannelType::Power,
            _ => ChannelType::Freq,
        };
        let Ok(index) = caps[2].parse::<u32>() else {
            continue;
        };
        // powerN_average wins over powerN_input
        if let Some(existing) = channels.iter_mut().find(|c| c.kind == kind && c.index == index) {
            if file.ends_with("_average") {
                existing.file = file;
            }
            continue;
        }
        channels.push(Channel { kind, index, file });
    }

    channels.sort_by_key(|c| (c.kind, c.index));
    Ok(channels)
}

fn channel_label(chip_path: &Path, prefix: &str, index: u32) -> Option<String> {
    read_trimmed(&chip_path.join(format!("{}{}_label", prefix, index)))
}

fn amd_temperature_name(label: &str) -> Option<&'static str> {
    match label {
        "edge" => Some("GPU Core"),
        "junction" => Some("GPU Hot Spot"),
        "mem" => Some("GPU Memory"),
        _ => None,
    }
}

fn amd_clock_name(label: Option<&str>, index: u32) -> &'static str {
    match (label, index) {
        (Some("sclk"), _) | (None, 1) => "GPU Core",
        (Some("mclk"), _) | (None, 2) => "GPU Memory",
        _ => "GPU Clock",
    }
}

/// Read every channel of one chip. A vanished chip directory is an error;
/// an unreadable channel is a sensor without value.
fn read_chip(chip: &ChipSource) -> Result<Vec<Sensor>> {
    let path = &chip.path;
    if !path.is_dir() {
        return Err(HwsenseError::generic(format!("{} disappeared", path.display())));
    }

    let mut sensors = Vec::new();
    let mut temps_seen = 0;

    for channel in list_channels(path)? {
        let value_path = path.join(&channel.file);
        let n = channel.index;

        match channel.kind {
            ChannelType::Temp => {
                if matches!(chip.flavor, Flavor::Storage { .. }) && temps_seen > 0 {
                    continue;
                }
                temps_seen += 1;

                let label = channel_label(path, "temp", n);
                let name = match (&chip.flavor, label.as_deref()) {
                    (Flavor::AmdGpu, Some(l)) => amd_temperature_name(l)
                        .map(str::to_string)
                        .unwrap_or_else(|| l.to_string()),
                    (Flavor::OtherGpu, _) if temps_seen == 1 => "GPU Core".to_string(),
                    (_, Some(l)) => l.to_string(),
                    (_, None) => format!("Temperature #{}", n),
                };
                let value = read_number(&value_path).map(|v| v / temperature::MILLIDEGREE_DIVISOR);
                let mut sensor = Sensor::new(SensorKind::Temperature, name, value);

                if chip.flavor == Flavor::Cpu {
                    if let Some(crit) = read_number(&path.join(format!("temp{}_crit", n))) {
                        sensor = sensor.with_parameter(
                            temperature::TJMAX_PARAMETER,
                            crit / temperature::MILLIDEGREE_DIVISOR,
                        );
                    }
                }
                sensors.push(sensor);
            }
            ChannelType::Fan => {
                let name = channel_label(path, "fan", n).unwrap_or_else(|| format!("Fan #{}", n));
                sensors.push(Sensor::new(SensorKind::Fan, name, read_number(&value_path)));
            }
            ChannelType::In => {
                let name =
                    channel_label(path, "in", n).unwrap_or_else(|| format!("Voltage #{}", n));
                let value = read_number(&value_path).map(|v| v / voltage::MILLIVOLT_DIVISOR);
                sensors.push(Sensor::new(SensorKind::Voltage, name, value));
            }
            ChannelType::Power => {
                let name = if matches!(chip.flavor, Flavor::AmdGpu | Flavor::OtherGpu) {
                    "GPU Package".to_string()
                } else {
                    channel_label(path, "power", n).unwrap_or_else(|| format!("Power #{}", n))
                };
                let value = read_number(&value_path).map(|v| v / gpu::MICROWATTS_PER_WATT);
                sensors.push(Sensor::new(SensorKind::Power, name, value));
            }
            ChannelType::Freq => {
                let label = channel_label(path, "freq", n);
                let name = if chip.flavor == Flavor::AmdGpu {
                    amd_clock_name(label.as_deref(), n).to_string()
                } else {
                    label.unwrap_or_else(|| format!("Clock #{}", n))
                };
                let value = read_number(&value_path).map(|v| v / gpu::HZ_PER_MHZ);
                sensors.push(Sensor::new(SensorKind::Clock, name, value));
            }
        }
    }

    match &chip.flavor {
        Flavor::AmdGpu => {
            let device = path.join("device");
            let loads = [("gpu_busy_percent", "GPU Core"), ("mem_busy_percent", "GPU Memory")];
            for (file, name) in loads {
                let file_path = device.join(file);
                if file_path.exists() {
                    sensors.push(Sensor::new(SensorKind::Load, name, read_number(&file_path)));
                }
            }
        }
        Flavor::Storage { device: Some(device) } => match smart::query_device(device) {
            Ok(extra) => sensors.extend(extra),
            Err(e) => debug!("SMART data unavailable for {:?}: {}", device, e),
        },
        _ => {}
    }

    Ok(sensors)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::collect_snapshot;
    use tempfile::TempDir;

    struct FakeSys {
        root: TempDir,
    }

    impl FakeSys {
        fn new() -> Self {
            let root = TempDir::new().unwrap();
            fs::create_dir_all(root.path().join("hwmon")).unwrap();
            fs::create_dir_all(root.path().join("dmi")).unwrap();
            fs::write(
                root.path().join("cpuinfo"),
                "processor\t: 0\nmodel name\t: AMD Ryzen 7 5800X 8-Core Processor\n",
            )
            .unwrap();
            Self { root }
        }

        fn chip(&self, dir: &str, driver: &str, files: &[(&str, &str)]) -> PathBuf {
            let path = self.root.path().join("hwmon").join(dir);
            fs::create_dir_all(&path).unwrap();
            fs::write(path.join("name"), format!("{}\n", driver)).unwrap();
            for (file, content) in files {
                let file_path = path.join(file);
                if let Some(parent) = file_path.parent() {
                    fs::create_dir_all(parent).unwrap();
                }
                fs::write(file_path, content).unwrap();
            }
            path
        }

        fn dmi(&self, vendor: &str, board: &str) {
            fs::write(self.root.path().join("dmi/board_vendor"), vendor).unwrap();
            fs::write(self.root.path().join("dmi/board_name"), board).unwrap();
        }

        fn config(&self) -> ProviderConfig {
            ProviderConfig {
                smart: false,
                nvidia_smi: false,
                hwmon_root: self.root.path().join("hwmon"),
                dmi_dir: self.root.path().join("dmi"),
                cpuinfo: self.root.path().join("cpuinfo"),
                ..ProviderConfig::default()
            }
        }

        fn provider(&self) -> HwmonProvider {
            let mut provider = HwmonProvider::new(self.config());
            provider.open().unwrap();
            provider
        }
    }

    fn updated(provider: &mut HwmonProvider, node: &HardwareNode) -> Vec<Sensor> {
        provider.update(node).unwrap();
        provider.sensors(node).unwrap()
    }

    #[test]
    fn test_placement() {
        assert_eq!(placement("k10temp"), Placement::Cpu);
        assert_eq!(placement("nct6798"), Placement::SuperIo);
        assert_eq!(placement("it8628"), Placement::SuperIo);
        assert_eq!(placement("dell_smm"), Placement::EmbeddedController);
        assert_eq!(placement("acpitz"), Placement::BoardDirect);
        assert_eq!(placement("amdgpu"), Placement::Gpu(GpuVendor::Amd));
        assert_eq!(placement("nvme"), Placement::Storage);
        assert_eq!(placement("iwlwifi_1"), Placement::Ignored);
    }

    #[test]
    fn test_missing_root_fails_open() {
        let sys = FakeSys::new();
        let mut config = sys.config();
        config.hwmon_root = sys.root.path().join("nope");
        let err = HwmonProvider::new(config).open().unwrap_err();
        assert!(matches!(err, HwsenseError::ProviderOpen(_)));
    }

    #[test]
    fn test_cpu_chip_with_tjmax() {
        let sys = FakeSys::new();
        sys.chip(
            "hwmon0",
            "k10temp",
            &[
                ("temp1_input", "65340\n"),
                ("temp1_label", "Tctl\n"),
                ("temp1_crit", "95000\n"),
            ],
        );
        let mut provider = sys.provider();
        let nodes = provider.hardware().unwrap();
        assert_eq!(nodes.len(), 1);
        assert_eq!(nodes[0].kind, HardwareKind::Cpu);
        assert_eq!(nodes[0].name, "AMD Ryzen 7 5800X 8-Core Processor");

        let sensors = updated(&mut provider, &nodes[0]);
        assert_eq!(sensors[0].name, "Tctl");
        assert_eq!(sensors[0].value, Some(65.34));
        assert_eq!(sensors[0].parameter("TjMax"), Some(95.0));
    }

    #[test]
    fn test_motherboard_grouping() {
        let sys = FakeSys::new();
        sys.dmi("ASUSTeK COMPUTER INC.", "PRIME X570-P");
        sys.chip("hwmon1", "acpitz", &[("temp1_input", "27800")]);
        sys.chip(
            "hwmon2",
            "nct6798",
            &[
                ("fan1_input", "812"),
                ("fan2_input", "0"),
                ("in0_input", "1232"),
                ("in0_label", "Vcore"),
                ("temp1_input", "35000"),
                ("temp1_label", "SYSTIN"),
            ],
        );
        let mut provider = sys.provider();
        let nodes = provider.hardware().unwrap();
        assert_eq!(nodes.len(), 1);

        let board = &nodes[0];
        assert_eq!(board.kind, HardwareKind::Motherboard);
        assert_eq!(board.name, "ASUSTeK COMPUTER INC. PRIME X570-P");
        assert_eq!(board.sub_hardware.len(), 1);
        assert_eq!(board.sub_hardware[0].kind, HardwareKind::SuperIo);
        assert_eq!(board.sub_hardware[0].name, "nct6798");

        let direct = updated(&mut provider, board);
        assert_eq!(direct.len(), 1);
        assert_eq!(direct[0].name, "Temperature #1");

        let sio = updated(&mut provider, &board.sub_hardware[0]);
        let names: Vec<_> = sio.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, ["SYSTIN", "Fan #1", "Fan #2", "Vcore"]);
        assert_eq!(sio[3].value, Some(1.232));
    }

    #[test]
    fn test_amd_gpu_naming() {
        let sys = FakeSys::new();
        sys.chip(
            "hwmon3",
            "amdgpu",
            &[
                ("temp1_input", "50000"),
                ("temp1_label", "edge"),
                ("temp2_input", "61000"),
                ("temp2_label", "junction"),
                ("power1_average", "151260000"),
                ("power1_input", "149000000"),
                ("freq1_input", "2105000000"),
                ("freq1_label", "sclk"),
                ("freq2_input", "1000000000"),
                ("freq2_label", "mclk"),
                ("fan1_input", "1500"),
                ("device/gpu_busy_percent", "37"),
                ("device/product_name", "Radeon RX 6800"),
            ],
        );
        let mut provider = sys.provider();
        let gpu = provider.hardware().unwrap()[0].clone();
        assert_eq!(gpu.kind, HardwareKind::Gpu(GpuVendor::Amd));
        assert_eq!(gpu.name, "Radeon RX 6800");

        let sensors = updated(&mut provider, &gpu);
        let find = |kind: SensorKind, name: &str| {
            sensors
                .iter()
                .find(|s| s.kind == kind && s.name == name)
                .and_then(|s| s.value)
        };
        assert_eq!(find(SensorKind::Temperature, "GPU Core"), Some(50.0));
        assert_eq!(find(SensorKind::Temperature, "GPU Hot Spot"), Some(61.0));
        assert_eq!(find(SensorKind::Power, "GPU Package"), Some(151.26));
        assert_eq!(find(SensorKind::Clock, "GPU Core"), Some(2105.0));
        assert_eq!(find(SensorKind::Clock, "GPU Memory"), Some(1000.0));
        assert_eq!(find(SensorKind::Load, "GPU Core"), Some(37.0));
        assert_eq!(find(SensorKind::Fan, "Fan #1"), Some(1500.0));
        assert_eq!(sensors.iter().filter(|s| s.kind == SensorKind::Power).count(), 1);
    }

    #[test]
    fn test_nouveau_temperature_reaches_gpu_record() {
        let sys = FakeSys::new();
        sys.chip(
            "hwmon2",
            "nouveau",
            &[
                ("temp1_input", "55000"),
                ("fan1_input", "1400"),
                ("power1_input", "38500000"),
            ],
        );
        let mut provider = sys.provider();
        let gpu = provider.hardware().unwrap()[0].clone();
        assert_eq!(gpu.kind, HardwareKind::Gpu(GpuVendor::Nvidia));

        let sensors = updated(&mut provider, &gpu);
        assert_eq!(sensors[0].name, "GPU Core");

        let snapshot = collect_snapshot(&mut provider).unwrap();
        assert_eq!(snapshot.gpus.len(), 1);
        let record = &snapshot.gpus[0];
        assert_eq!(record.temperature, Some(55.0));
        assert_eq!(record.fan_speed, Some(1400.0));
        assert_eq!(record.power, Some(38.5));
    }

    #[test]
    fn test_other_gpu_keeps_later_temperature_labels() {
        let sys = FakeSys::new();
        sys.chip(
            "hwmon5",
            "xe",
            &[
                ("temp1_input", "48000"),
                ("temp1_label", "pkg"),
                ("temp2_input", "52000"),
                ("temp2_label", "vram"),
            ],
        );
        let mut provider = sys.provider();
        let gpu = provider.hardware().unwrap()[0].clone();
        let sensors = updated(&mut provider, &gpu);
        let names: Vec<_> = sensors.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, ["GPU Core", "vram"]);
    }

    #[test]
    fn test_storage_keeps_first_temperature() {
        let sys = FakeSys::new();
        sys.chip(
            "hwmon4",
            "nvme",
            &[
                ("temp1_input", "38850"),
                ("temp1_label", "Composite"),
                ("temp2_input", "45850"),
                ("temp2_label", "Sensor 1"),
                ("device/model", "Samsung SSD 980 PRO 1TB\n"),
            ],
        );
        let mut provider = sys.provider();
        let disk = provider.hardware().unwrap()[0].clone();
        assert_eq!(disk.kind, HardwareKind::Storage);
        assert_eq!(disk.name, "Samsung SSD 980 PRO 1TB");

        let sensors = updated(&mut provider, &disk);
        assert_eq!(sensors.len(), 1);
        assert_eq!(sensors[0].name, "Composite");
    }

    #[test]
    fn test_disabled_groups_are_skipped() {
        let sys = FakeSys::new();
        sys.chip("hwmon0", "coretemp", &[("temp1_input", "40000")]);
        sys.chip("hwmon1", "nvme", &[("temp1_input", "38000")]);
        let mut config = sys.config();
        config.storage = false;
        let mut provider = HwmonProvider::new(config);
        provider.open().unwrap();
        let nodes = provider.hardware().unwrap();
        assert_eq!(nodes.len(), 1);
        assert_eq!(nodes[0].kind, HardwareKind::Cpu);
    }

    #[test]
    fn test_vanished_chip_fails_update() {
        let sys = FakeSys::new();
        let chip = sys.chip("hwmon0", "coretemp", &[("temp1_input", "40000")]);
        let mut provider = sys.provider();
        let cpu = provider.hardware().unwrap()[0].clone();

        fs::remove_dir_all(chip).unwrap();
        let err = provider.update(&cpu).unwrap_err();
        assert!(matches!(err, HwsenseError::HardwareUpdate { .. }));
    }

    #[test]
    fn test_unreadable_channel_has_no_value() {
        let sys = FakeSys::new();
        sys.chip("hwmon0", "coretemp", &[("temp1_input", "garbage")]);
        let mut provider = sys.provider();
        let cpu = provider.hardware().unwrap()[0].clone();
        let sensors = updated(&mut provider, &cpu);
        assert_eq!(sensors[0].value, None);
    }

    #[test]
    fn test_hwmon_index_ordering() {
        assert!(hwmon_index(Path::new("/x/hwmon2")) < hwmon_index(Path::new("/x/hwmon10")));
    }
}
