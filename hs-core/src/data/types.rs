//! Hardware tree types
//!
//! A provider exposes a tree of [`HardwareNode`]s (topology only) and, per
//! node, the latest [`Sensor`] values captured by its last refresh.

use serde::{Deserialize, Serialize};

/// GPU vendor type
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GpuVendor {
    Nvidia,
    Amd,
    Intel,
}

impl std::fmt::Display for GpuVendor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GpuVendor::Nvidia => write!(f, "NVIDIA"),
            GpuVendor::Amd => write!(f, "AMD"),
            GpuVendor::Intel => write!(f, "Intel"),
        }
    }
}

/// What a hardware node is; selects the extraction rules applied to its sensors
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HardwareKind {
    Cpu,
    Motherboard,
    SuperIo,
    EmbeddedController,
    Gpu(GpuVendor),
    Storage,
    Other,
}

impl std::fmt::Display for HardwareKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HardwareKind::Cpu => write!(f, "CPU"),
            HardwareKind::Motherboard => write!(f, "Motherboard"),
            HardwareKind::SuperIo => write!(f, "SuperIO"),
            HardwareKind::EmbeddedController => write!(f, "EmbeddedController"),
            HardwareKind::Gpu(vendor) => write!(f, "GPU ({})", vendor),
            HardwareKind::Storage => write!(f, "Storage"),
            HardwareKind::Other => write!(f, "Other"),
        }
    }
}

/// A unit of hardware. Owned by the provider; read-only during a pass.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct HardwareNode {
    /// Provider-assigned identifier, stable for the provider's lifetime
    pub id: String,
    pub kind: HardwareKind,
    pub name: String,
    pub sub_hardware: Vec<HardwareNode>,
}

impl HardwareNode {
    pub fn new(id: impl Into<String>, kind: HardwareKind, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            kind,
            name: name.into(),
            sub_hardware: Vec::new(),
        }
    }

    pub fn with_sub_hardware(mut self, sub_hardware: Vec<HardwareNode>) -> Self {
        self.sub_hardware = sub_hardware;
        self
    }
}

/// Sensor category
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SensorKind {
    Temperature,
    Fan,
    Voltage,
    Load,
    Power,
    Clock,
    Level,
    Data,
    /// Duty cycle in percent, e.g. a fan's PWM setting
    Control,
}

/// Named auxiliary value attached to a sensor (e.g. TjMax)
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct SensorParameter {
    pub name: String,
    pub value: f64,
}

/// One raw reading. Transient: produced and consumed within a single pass.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Sensor {
    pub kind: SensorKind,
    pub name: String,
    /// Absent when the channel could not be read
    #[serde(default)]
    pub value: Option<f64>,
    #[serde(default)]
    pub parameters: Vec<SensorParameter>,
}

impl Sensor {
    pub fn new(kind: SensorKind, name: impl Into<String>, value: Option<f64>) -> Self {
        Self {
            kind,
            name: name.into(),
            value,
            parameters: Vec::new(),
        }
    }

    pub fn with_parameter(mut self, name: impl Into<String>, value: f64) -> Self {
        self.parameters.push(SensorParameter {
            name: name.into(),
            value,
        });
        self
    }

    /// Look up a parameter by exact name
    pub fn parameter(&self, name: &str) -> Option<f64> {
        self.parameters
            .iter()
            .find(|p| p.name == name)
            .map(|p| p.value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parameter_lookup_is_exact() {
        let sensor = Sensor::new(SensorKind::Temperature, "CPU Package", Some(50.0))
            .with_parameter("TjMax", 95.0);
        assert_eq!(sensor.parameter("TjMax"), Some(95.0));
        assert_eq!(sensor.parameter("tjmax"), None);
    }

    #[test]
    fn test_sensor_json_defaults() {
        let sensor: Sensor = serde_json::from_str(r#"{"kind":"Fan","name":"Fan #1"}"#).unwrap();
        assert_eq!(sensor.value, None);
        assert!(sensor.parameters.is_empty());
    }
}
