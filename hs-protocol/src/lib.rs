//! Wire protocol for hwsensed
//!
//! The parent process writes one request line per tick and reads back exactly
//! one JSON object per line: either a [`Snapshot`] or an error record
//! `{"error": "<message>"}`. Optional metrics are omitted when no matching
//! sensor existed; they are never null-filled or zero-filled.

use hs_error::{HwsenseError, Result};
use serde::{Deserialize, Serialize};

/// CPU temperature channel
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemperatureRecord {
    pub name: String,
    pub temperature: f64,
    /// Warning threshold (TjMax when the sensor exposes it)
    pub high: f64,
    pub critical: f64,
}

/// Motherboard or Super I/O fan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FanRecord {
    pub name: String,
    pub rpm: f64,
}

/// Motherboard voltage rail
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VoltageRecord {
    pub name: String,
    pub voltage: f64,
}

/// Motherboard temperature channel (no thresholds)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MotherboardTempRecord {
    pub name: String,
    pub temperature: f64,
}

/// GPU composite; each metric is filled independently
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GpuRecord {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub core_load: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub memory_load: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fan_speed: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub power: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub core_clock: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub memory_clock: Option<f64>,
}

impl GpuRecord {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }
}

/// Storage media type, inferred from the drive name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MediaType {
    #[serde(rename = "NVMe")]
    Nvme,
    #[serde(rename = "SSD")]
    Ssd,
    #[serde(rename = "HDD")]
    Hdd,
}

impl std::fmt::Display for MediaType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MediaType::Nvme => write!(f, "NVMe"),
            MediaType::Ssd => write!(f, "SSD"),
            MediaType::Hdd => write!(f, "HDD"),
        }
    }
}

/// Storage health composite. Absent counters mean "no matching sensor", not zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StorageRecord {
    pub name: String,
    #[serde(rename = "type")]
    pub media_type: MediaType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
    /// Remaining life in percent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remaining_life: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub media_errors: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub power_cycles: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unsafe_shutdowns: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub power_on_hours: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_bytes_written: Option<u64>,
}

impl StorageRecord {
    pub fn new(name: impl Into<String>, media_type: MediaType) -> Self {
        Self {
            name: name.into(),
            media_type,
            temperature: None,
            remaining_life: None,
            media_errors: None,
            power_cycles: None,
            unsafe_shutdowns: None,
            power_on_hours: None,
            total_bytes_written: None,
        }
    }
}

/// Result of one collection pass. Order inside each list follows provider
/// traversal order; there is no stable key across passes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub sensors: Vec<TemperatureRecord>,
    pub fans: Vec<FanRecord>,
    pub gpus: Vec<GpuRecord>,
    pub storages: Vec<StorageRecord>,
    pub voltages: Vec<VoltageRecord>,
    pub motherboard_temps: Vec<MotherboardTempRecord>,
}

impl Snapshot {
    /// Total number of records across all six categories
    pub fn record_count(&self) -> usize {
        self.sensors.len()
            + self.fans.len()
            + self.gpus.len()
            + self.storages.len()
            + self.voltages.len()
            + self.motherboard_temps.len()
    }
}

/// One line on the data channel
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Response {
    Error { error: String },
    Snapshot(Snapshot),
}

impl Response {
    pub fn error(message: impl Into<String>) -> Self {
        Response::Error {
            error: message.into(),
        }
    }

    /// Encode as a single JSON line (no trailing newline)
    pub fn to_line(&self) -> Result<String> {
        let line = serde_json::to_string(self).map_err(|e| HwsenseError::Encode(e.to_string()))?;
        debug_assert!(!line.contains('\n'));
        Ok(line)
    }

    /// Decode one line read from the data channel
    pub fn from_line(line: &str) -> Result<Self> {
        Ok(serde_json::from_str(line.trim_end())?)
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Response::Error { .. })
    }
}

impl From<Snapshot> for Response {
    fn from(snapshot: Snapshot) -> Self {
        Response::Snapshot(snapshot)
    }
}

impl From<&HwsenseError> for Response {
    fn from(err: &HwsenseError) -> Self {
        Response::error(err.to_string())
    }
}

/// Encode an error record, falling back to a hand-built line if serde fails.
/// The parent must always receive one line per request.
pub fn error_line(message: &str) -> String {
    Response::error(message)
        .to_line()
        .unwrap_or_else(|_| String::from("{\"error\":\"unencodable error\"}"))
}
