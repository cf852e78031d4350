//! Storage health via smartctl
//!
//! Runs `smartctl -j -a <device>` and turns the JSON report into sensors
//! named the way the storage extraction rules expect.

use serde::Deserialize;
use std::path::Path;
use std::process::Command;
use tracing::{debug, trace};

use crate::constants::{storage, tools};
use crate::data::{Sensor, SensorKind};
use crate::error::{HwsenseError, Result};

#[derive(Debug, Default, Deserialize)]
struct SmartReport {
    #[serde(default)]
    nvme_smart_health_information_log: Option<NvmeHealthLog>,
    #[serde(default)]
    power_cycle_count: Option<u64>,
    #[serde(default)]
    power_on_time: Option<PowerOnTime>,
}

#[derive(Debug, Default, Deserialize)]
struct NvmeHealthLog {
    percentage_used: Option<u64>,
    data_units_written: Option<u64>,
    power_cycles: Option<u64>,
    power_on_hours: Option<u64>,
    unsafe_shutdowns: Option<u64>,
    media_errors: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
struct PowerOnTime {
    hours: Option<u64>,
}

fn counter(name: &str, value: Option<u64>) -> Option<Sensor> {
    value.map(|v| Sensor::new(SensorKind::Data, name, Some(v as f64)))
}

/// Map a smartctl JSON report to storage sensors
pub fn parse_report(json: &str) -> Result<Vec<Sensor>> {
    let report: SmartReport = serde_json::from_str(json)?;
    let mut sensors = Vec::new();

    if let Some(log) = report.nvme_smart_health_information_log {
        if let Some(used) = log.percentage_used {
            let remaining = (storage::FULL_LIFE_PERCENT - used as f64).max(0.0);
            sensors.push(Sensor::new(SensorKind::Level, "Remaining Life", Some(remaining)));
        }
        if let Some(units) = log.data_units_written {
            let gigabytes = units as f64 * storage::NVME_DATA_UNIT_BYTES / storage::BYTES_PER_GB;
            sensors.push(Sensor::new(SensorKind::Data, "Data Written", Some(gigabytes)));
        }
        sensors.extend(counter("Media Errors", log.media_errors));
        sensors.extend(counter("Power Cycles", log.power_cycles));
        sensors.extend(counter("Unsafe Shutdowns", log.unsafe_shutdowns));
        sensors.extend(counter("Power On Hours", log.power_on_hours));
    } else {
        sensors.extend(counter("Power Cycles", report.power_cycle_count));
        sensors.extend(counter(
            "Power On Hours",
            report.power_on_time.and_then(|t| t.hours),
        ));
    }

    Ok(sensors)
}

/// Query one block device. smartctl's exit status is a bit mask that is
/// non-zero for many healthy drives, so only the JSON body is trusted.
pub fn query_device(device: &Path) -> Result<Vec<Sensor>> {
    trace!("Running {} on {:?}", tools::SMARTCTL, device);

    let output = Command::new(tools::SMARTCTL)
        .arg("-j")
        .arg("-a")
        .arg(device)
        .output()
        .map_err(|e| HwsenseError::ExternalTool {
            tool: tools::SMARTCTL,
            reason: e.to_string(),
        })?;

    let stdout = String::from_utf8_lossy(&output.stdout);
    if stdout.trim().is_empty() {
        return Err(HwsenseError::ExternalTool {
            tool: tools::SMARTCTL,
            reason: format!("no output for {}", device.display()),
        });
    }

    let sensors = parse_report(&stdout)?;
    debug!("smartctl reported {} attributes for {:?}", sensors.len(), device);
    Ok(sensors)
}
