//! Constants and configuration values for hwsense
//!
//! Validity bounds, thresholds, rounding policy, unit conversions and the
//! sysfs locations the hwmon backend reads. Keep magic numbers here.

/// System paths
pub mod paths {
    /// Base path for hwmon devices
    pub const HWMON_BASE: &str = "/sys/class/hwmon";

    /// DMI identification directory (board vendor / name)
    pub const DMI_ID_DIR: &str = "/sys/devices/virtual/dmi/id";

    /// CPU model information
    pub const CPUINFO: &str = "/proc/cpuinfo";

    /// Device nodes used when asking smartctl about a drive
    pub const DEV_DIR: &str = "/dev";
}

/// Temperature validity and thresholds
pub mod temperature {
    /// Readings at or below this are sensor-failure sentinels
    pub const MIN_EXCLUSIVE: f64 = 0.0;

    /// Readings above this are rejected (200.0 itself is accepted)
    pub const MAX_INCLUSIVE: f64 = 200.0;

    /// Warning threshold used when the sensor has no TjMax parameter
    pub const DEFAULT_HIGH: f64 = 100.0;

    /// Fixed critical threshold for every CPU channel
    pub const CRITICAL: f64 = 105.0;

    /// Sensor parameter carrying the junction maximum
    pub const TJMAX_PARAMETER: &str = "TjMax";

    /// Temperature readings are in millidegrees, divide by this to get Celsius
    pub const MILLIDEGREE_DIVISOR: f64 = 1000.0;
}

/// Fan validity
pub mod fan {
    /// Fan RPM must be at least this
    pub const MIN_INCLUSIVE: f64 = 0.0;
}

/// Voltage validity and conversion
pub mod voltage {
    /// Voltages must be strictly above this
    pub const MIN_EXCLUSIVE: f64 = 0.0;

    /// hwmon reports inN_input in millivolts
    pub const MILLIVOLT_DIVISOR: f64 = 1000.0;
}

/// Decimal places applied before a value is emitted
pub mod rounding {
    pub const TEMPERATURE: u32 = 1;
    pub const FAN_RPM: u32 = 0;
    pub const VOLTAGE: u32 = 3;
    pub const GPU_CLOCK: u32 = 0;
    pub const GPU_METRIC: u32 = 1;
    pub const STORAGE_PERCENT: u32 = 1;
}

/// Storage conversions
pub mod storage {
    /// "Data Written" sensors report gigabytes
    pub const BYTES_PER_GB: f64 = 1024.0 * 1024.0 * 1024.0;

    /// NVMe data units are 1000 blocks of 512 bytes
    pub const NVME_DATA_UNIT_BYTES: f64 = 512.0 * 1000.0;

    /// Full life in percent (remaining = FULL - percentage_used)
    pub const FULL_LIFE_PERCENT: f64 = 100.0;
}

/// GPU conversions
pub mod gpu {
    /// Microwatts per watt (for power conversion)
    pub const MICROWATTS_PER_WATT: f64 = 1_000_000.0;

    /// hwmon freqN_input is reported in Hz
    pub const HZ_PER_MHZ: f64 = 1_000_000.0;
}

/// hwmon chip driver names, grouped by the hardware they belong to
pub mod chips {
    /// CPU package / die sensors
    pub const CPU: &[&str] = &["coretemp", "k10temp", "zenpower", "cpu_thermal"];

    /// Super I/O chips (prefix match)
    pub const SUPER_IO_PREFIXES: &[&str] = &["nct", "it87", "it86", "w83", "f71", "f75"];

    /// Embedded controllers (prefix match)
    pub const EMBEDDED_CONTROLLER_PREFIXES: &[&str] =
        &["asus", "dell_smm", "thinkpad", "gigabyte_wmi", "hp_wmi"];

    /// ACPI thermal zones, reported as the motherboard's own sensors
    pub const MOTHERBOARD_DIRECT: &[&str] = &["acpitz"];

    pub const GPU_AMD: &[&str] = &["amdgpu", "radeon"];
    pub const GPU_NVIDIA: &[&str] = &["nouveau"];
    pub const GPU_INTEL: &[&str] = &["i915", "xe"];

    pub const STORAGE: &[&str] = &["nvme", "drivetemp"];
}

/// External tools queried by the hwmon backend
pub mod tools {
    pub const SMARTCTL: &str = "smartctl";
    pub const NVIDIA_SMI: &str = "nvidia-smi";

    /// Fields requested from nvidia-smi, in parse order
    pub const NVIDIA_QUERY: &str = "--query-gpu=index,name,temperature.gpu,utilization.gpu,utilization.memory,fan.speed,power.draw,clocks.gr,clocks.mem";
}

/// Fallback display names when identification files are missing
pub mod names {
    pub const UNKNOWN_CPU: &str = "Unknown CPU";
    pub const UNKNOWN_MOTHERBOARD: &str = "Motherboard";
}
