//! Provider configuration
//!
//! Which hardware groups the hwmon backend opens, and where it looks.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::constants::paths;

/// Hardware groups and locations used by the hwmon backend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderConfig {
    pub cpu: bool,
    pub motherboard: bool,
    pub gpu: bool,
    pub storage: bool,
    /// Ask smartctl for storage health attributes
    pub smart: bool,
    /// Ask nvidia-smi for proprietary-driver NVIDIA boards
    pub nvidia_smi: bool,
    pub hwmon_root: PathBuf,
    pub dmi_dir: PathBuf,
    pub cpuinfo: PathBuf,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            cpu: true,
            motherboard: true,
            gpu: true,
            storage: true,
            smart: true,
            nvidia_smi: true,
            hwmon_root: PathBuf::from(paths::HWMON_BASE),
            dmi_dir: PathBuf::from(paths::DMI_ID_DIR),
            cpuinfo: PathBuf::from(paths::CPUINFO),
        }
    }
}

impl ProviderConfig {
    /// True when no hardware group is enabled at all
    pub fn is_empty(&self) -> bool {
        !(self.cpu || self.motherboard || self.gpu || self.storage)
    }
}
