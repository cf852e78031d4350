//! hwsense Core Library
//!
//! Turns a hardware provider's sensor tree into wire snapshots.
//!
//! # Module Structure
//!
//! - `data/` - Hardware tree types and provider configuration
//! - `engine/` - Classification, the collection pass, count change detection
//! - `hw/` - Provider backends (hwmon, static fixtures)
//! - `provider` - The capability the engine collects from
//!
//! # Example
//!
//! ```no_run
//! use hs_core::{collect_snapshot, HardwareProvider, HwmonProvider, ProviderConfig};
//!
//! let mut provider = HwmonProvider::new(ProviderConfig::default());
//! provider.open().unwrap();
//! let snapshot = collect_snapshot(&mut provider).unwrap();
//! provider.close().unwrap();
//! ```

// Grouped modules
pub mod data;
pub mod engine;
pub mod hw;

// Standalone modules
pub mod constants;
pub mod error;
pub mod provider;

pub use data::{
    GpuVendor, HardwareKind, HardwareNode, ProviderConfig, Sensor, SensorKind, SensorParameter,
};

pub use error::{HwsenseError, Result};

pub use engine::{collect_snapshot, detect_changes, round_to, SensorCounts};

pub use hw::{FixtureFile, HwmonProvider, StaticNode, StaticProvider};

pub use provider::HardwareProvider;

#[cfg(any(test, feature = "mocks"))]
pub use provider::MockHardwareProvider;
