//! Data types and configuration
//!
//! The hardware tree as the provider exposes it, and the provider settings.

mod config;
mod types;

pub use config::ProviderConfig;
pub use types::{GpuVendor, HardwareKind, HardwareNode, Sensor, SensorKind, SensorParameter};
