//! NVIDIA boards via nvidia-smi
//!
//! The proprietary driver exposes no hwmon chip, so readings come from one
//! `nvidia-smi --query-gpu` call in CSV form.

use std::process::Command;
use tracing::trace;

use crate::constants::tools;
use crate::data::{Sensor, SensorKind};
use crate::error::{HwsenseError, Result};

/// One row of the nvidia-smi query
#[derive(Debug, Clone, PartialEq)]
pub struct NvidiaReading {
    pub index: u32,
    pub name: String,
    pub temperature: Option<f64>,
    pub core_load: Option<f64>,
    pub memory_load: Option<f64>,
    pub fan_percent: Option<f64>,
    pub power_watts: Option<f64>,
    pub core_clock_mhz: Option<f64>,
    pub memory_clock_mhz: Option<f64>,
}

impl NvidiaReading {
    /// Sensors in the naming scheme the GPU extraction rules match on.
    ///
    /// nvidia-smi reports fan duty in percent, not RPM, so it is a control
    /// reading and never fills the fan speed.
    pub fn sensors(&self) -> Vec<Sensor> {
        vec![
            Sensor::new(SensorKind::Temperature, "GPU Core", self.temperature),
            Sensor::new(SensorKind::Load, "GPU Core", self.core_load),
            Sensor::new(SensorKind::Load, "GPU Memory", self.memory_load),
            Sensor::new(SensorKind::Control, "GPU Fan", self.fan_percent),
            Sensor::new(SensorKind::Power, "GPU Package", self.power_watts),
            Sensor::new(SensorKind::Clock, "GPU Core", self.core_clock_mhz),
            Sensor::new(SensorKind::Clock, "GPU Memory", self.memory_clock_mhz),
        ]
    }
}

fn parse_value(s: &str) -> Option<f64> {
    if s.is_empty() || s == "N/A" || s == "[N/A]" || s == "[Not Supported]" {
        None
    } else {
        s.parse().ok()
    }
}

/// Parse `--format=csv,noheader,nounits` output of [`tools::NVIDIA_QUERY`]
pub fn parse_query(stdout: &str) -> Vec<NvidiaReading> {
    let mut readings = Vec::new();

    for line in stdout.lines() {
        if line.trim().is_empty() {
            continue;
        }

        let parts: Vec<&str> = line.split(',').map(|s| s.trim()).collect();
        if parts.len() < 9 {
            trace!("Skipping malformed nvidia-smi line: {}", line);
            continue;
        }

        let index = match parts[0].parse::<u32>() {
            Ok(idx) => idx,
            Err(e) => {
                tracing::warn!("Failed to parse GPU index '{}': {}", parts[0], e);
                continue;
            }
        };

        readings.push(NvidiaReading {
            index,
            name: parts[1].to_string(),
            temperature: parse_value(parts[2]),
            core_load: parse_value(parts[3]),
            memory_load: parse_value(parts[4]),
            fan_percent: parse_value(parts[5]),
            power_watts: parse_value(parts[6]),
            core_clock_mhz: parse_value(parts[7]),
            memory_clock_mhz: parse_value(parts[8]),
        });
    }

    readings
}

/// Run the query against every board
pub fn query() -> Result<Vec<NvidiaReading>> {
    let output = Command::new(tools::NVIDIA_SMI)
        .args([tools::NVIDIA_QUERY, "--format=csv,noheader,nounits"])
        .output()
        .map_err(|e| HwsenseError::ExternalTool {
            tool: tools::NVIDIA_SMI,
            reason: e.to_string(),
        })?;

    if !output.status.success() {
        return Err(HwsenseError::ExternalTool {
            tool: tools::NVIDIA_SMI,
            reason: format!("exit status {}", output.status),
        });
    }

    Ok(parse_query(&String::from_utf8_lossy(&output.stdout)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::classify::gpu_record;

    #[test]
    fn test_parse_full_row() {
        let out = "0, NVIDIA GeForce RTX 3080, 54, 37, 12, 45, 151.26, 1905, 9501\n";
        let readings = parse_query(out);
        assert_eq!(readings.len(), 1);
        let r = &readings[0];
        assert_eq!(r.index, 0);
        assert_eq!(r.name, "NVIDIA GeForce RTX 3080");
        assert_eq!(r.temperature, Some(54.0));
        assert_eq!(r.power_watts, Some(151.26));
        assert_eq!(r.memory_clock_mhz, Some(9501.0));
    }

    #[test]
    fn test_unsupported_fields_are_absent() {
        let out = "1, Tesla T4, 40, 0, 0, [N/A], [Not Supported], 585, 5000\n";
        let r = &parse_query(out)[0];
        assert_eq!(r.fan_percent, None);
        assert_eq!(r.power_watts, None);
        assert_eq!(r.core_clock_mhz, Some(585.0));
    }

    #[test]
    fn test_skips_malformed_lines() {
        let out = "\nNo devices were found\nx, bad, 1, 2, 3, 4, 5, 6, 7\n";
        assert!(parse_query(out).is_empty());
    }

    #[test]
    fn test_sensor_names_match_gpu_rules() {
        let r = &parse_query("0, RTX, 54, 37, 12, 45, 150, 1905, 9501")[0];
        let sensors = r.sensors();
        assert!(sensors
            .iter()
            .any(|s| s.kind == SensorKind::Power && s.name == "GPU Package"));
        assert_eq!(sensors.iter().filter(|s| s.kind == SensorKind::Clock).count(), 2);
    }

    #[test]
    fn test_fan_duty_is_not_fan_speed() {
        let r = &parse_query("0, RTX 3080, 54, 37, 12, 45, 150, 1905, 9501")[0];
        let sensors = r.sensors();
        assert!(sensors.iter().all(|s| s.kind != SensorKind::Fan));

        let gpu = gpu_record(&r.name, &sensors);
        assert_eq!(gpu.fan_speed, None);
        assert_eq!(gpu.temperature, Some(54.0));
        assert_eq!(gpu.power, Some(150.0));
    }
}
