//! Sensor classification
//!
//! Pure functions turning raw readings into wire records: validity filters,
//! name-substring heuristics, unit conversion and rounding. Nothing here
//! fails; a reading that does not qualify simply produces no record.

use hs_protocol::{
    FanRecord, GpuRecord, MediaType, MotherboardTempRecord, StorageRecord, TemperatureRecord,
    VoltageRecord,
};

use crate::constants::{fan, rounding, storage, temperature, voltage};
use crate::data::{HardwareKind, Sensor, SensorKind};

/// A single-reading record produced by CPU and motherboard extraction
#[derive(Debug, Clone, PartialEq)]
pub enum Record {
    Temperature(TemperatureRecord),
    Fan(FanRecord),
    Voltage(VoltageRecord),
    MotherboardTemp(MotherboardTempRecord),
}

/// Where a sensor sits relative to the top-level node being traversed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    TopLevel,
    SubHardware,
}

/// Round half-to-even at `decimals` places
pub fn round_to(value: f64, decimals: u32) -> f64 {
    let factor = 10f64.powi(decimals as i32);
    (value * factor).round_ties_even() / factor
}

pub fn is_valid_temperature(value: f64) -> bool {
    value > temperature::MIN_EXCLUSIVE && value <= temperature::MAX_INCLUSIVE
}

pub fn is_valid_fan(value: f64) -> bool {
    value >= fan::MIN_INCLUSIVE
}

pub fn is_valid_voltage(value: f64) -> bool {
    value > voltage::MIN_EXCLUSIVE
}

/// Present and finite value, or nothing
fn reading(sensor: &Sensor) -> Option<f64> {
    sensor.value.filter(|v| v.is_finite())
}

/// Classify one CPU or motherboard reading.
///
/// `kind` is the kind of the top-level node being traversed; `hardware_name`
/// is the name of the node that owns the sensor (the sub-hardware name for
/// sub-hardware sensors). Other kinds never produce single records.
pub fn classify(
    kind: HardwareKind,
    scope: Scope,
    hardware_name: &str,
    sensor: &Sensor,
) -> Option<Record> {
    match kind {
        HardwareKind::Cpu => cpu_temperature(hardware_name, sensor, scope).map(Record::Temperature),
        HardwareKind::Motherboard => motherboard_reading(hardware_name, sensor),
        _ => None,
    }
}

/// CPU temperature channel.
///
/// The warning threshold comes from the TjMax parameter on top-level CPU
/// sensors; sub-hardware always gets the default.
pub fn cpu_temperature(
    hardware_name: &str,
    sensor: &Sensor,
    scope: Scope,
) -> Option<TemperatureRecord> {
    if sensor.kind != SensorKind::Temperature {
        return None;
    }
    let value = reading(sensor).filter(|v| is_valid_temperature(*v))?;

    let high = match scope {
        Scope::TopLevel => sensor
            .parameter(temperature::TJMAX_PARAMETER)
            .unwrap_or(temperature::DEFAULT_HIGH),
        Scope::SubHardware => temperature::DEFAULT_HIGH,
    };

    Some(TemperatureRecord {
        name: format!("{} - {}", hardware_name, sensor.name),
        temperature: round_to(value, rounding::TEMPERATURE),
        high,
        critical: temperature::CRITICAL,
    })
}

/// Motherboard fan, voltage or temperature
pub fn motherboard_reading(hardware_name: &str, sensor: &Sensor) -> Option<Record> {
    let value = reading(sensor)?;

    match sensor.kind {
        SensorKind::Fan if is_valid_fan(value) => Some(Record::Fan(FanRecord {
            name: sensor.name.clone(),
            rpm: round_to(value, rounding::FAN_RPM),
        })),
        SensorKind::Voltage if is_valid_voltage(value) => Some(Record::Voltage(VoltageRecord {
            name: sensor.name.clone(),
            voltage: round_to(value, rounding::VOLTAGE),
        })),
        SensorKind::Temperature if is_valid_temperature(value) => {
            Some(Record::MotherboardTemp(MotherboardTempRecord {
                name: format!("{} - {}", hardware_name, sensor.name),
                temperature: round_to(value, rounding::TEMPERATURE),
            }))
        }
        _ => None,
    }
}

fn is_core_name(name: &str) -> bool {
    name.contains("Core") || name == "GPU Core"
}

/// Fold one GPU reading into the composite.
///
/// Later matches overwrite earlier ones, except fan speed where the first
/// fan reading of the node is kept.
pub fn apply_gpu_sensor(gpu: &mut GpuRecord, sensor: &Sensor) {
    let Some(value) = reading(sensor) else {
        return;
    };
    let name = sensor.name.as_str();

    match sensor.kind {
        SensorKind::Temperature => {
            if (name.contains("Core") || name.contains("GPU")) && is_valid_temperature(value) {
                gpu.temperature = Some(round_to(value, rounding::GPU_METRIC));
            }
        }
        SensorKind::Load => {
            if is_core_name(name) {
                gpu.core_load = Some(round_to(value, rounding::GPU_METRIC));
            } else if name.contains("Memory") {
                gpu.memory_load = Some(round_to(value, rounding::GPU_METRIC));
            }
        }
        SensorKind::Fan => {
            if gpu.fan_speed.is_none() && is_valid_fan(value) {
                gpu.fan_speed = Some(round_to(value, rounding::FAN_RPM));
            }
        }
        SensorKind::Power => {
            if name.contains("Package") || name.contains("GPU") {
                gpu.power = Some(round_to(value, rounding::GPU_METRIC));
            }
        }
        SensorKind::Clock => {
            if is_core_name(name) {
                gpu.core_clock = Some(round_to(value, rounding::GPU_CLOCK));
            } else if name.contains("Memory") {
                gpu.memory_clock = Some(round_to(value, rounding::GPU_CLOCK));
            }
        }
        _ => {}
    }
}

/// Build the GPU composite from all of a node's sensors
pub fn gpu_record(hardware_name: &str, sensors: &[Sensor]) -> GpuRecord {
    let mut gpu = GpuRecord::new(hardware_name);
    for sensor in sensors {
        apply_gpu_sensor(&mut gpu, sensor);
    }
    gpu
}

/// Infer media type from the drive name. HDD is the fallback, not a detection.
pub fn media_type(hardware_name: &str) -> MediaType {
    let name = hardware_name.to_lowercase();
    if name.contains("nvme") {
        MediaType::Nvme
    } else if name.contains("ssd") {
        MediaType::Ssd
    } else {
        MediaType::Hdd
    }
}

/// Direct storage fields: temperature, remaining life, bytes written
pub fn apply_storage_sensor(record: &mut StorageRecord, sensor: &Sensor) {
    let Some(value) = reading(sensor) else {
        return;
    };
    let name = sensor.name.to_lowercase();

    match sensor.kind {
        SensorKind::Temperature if is_valid_temperature(value) => {
            record.temperature = Some(round_to(value, rounding::TEMPERATURE));
        }
        SensorKind::Level if name.contains("remaining") || name.contains("life") => {
            record.remaining_life = Some(round_to(value, rounding::STORAGE_PERCENT));
        }
        SensorKind::Data if name.contains("written") && value >= 0.0 => {
            record.total_bytes_written = Some((value * storage::BYTES_PER_GB).round() as u64);
        }
        _ => {}
    }
}

/// SMART counters, matched on the sensor name regardless of category.
///
/// The rule order matters: "power-on hours" also contains "power-on" and is
/// therefore counted as power cycles.
pub fn apply_storage_counter(record: &mut StorageRecord, sensor: &Sensor) {
    let Some(value) = reading(sensor) else {
        return;
    };
    let name = sensor.name.to_lowercase();
    let count = value.trunc() as i64;

    if name.contains("media error") || name.contains("media_error") {
        record.media_errors = Some(count);
    } else if name.contains("power cycle") || name.contains("power-on") {
        record.power_cycles = Some(count);
    } else if name.contains("unsafe shutdown") {
        record.unsafe_shutdowns = Some(count);
    } else if name.contains("power on hours") || name.contains("power-on hours") {
        record.power_on_hours = Some(count);
    }
}

/// Build the storage composite: one scan for direct fields, a second
/// independent scan for counters over the same sensors.
pub fn storage_record(hardware_name: &str, sensors: &[Sensor]) -> StorageRecord {
    let mut record = StorageRecord::new(hardware_name, media_type(hardware_name));
    for sensor in sensors {
        apply_storage_sensor(&mut record, sensor);
    }
    for sensor in sensors {
        apply_storage_counter(&mut record, sensor);
    }
    record
}
