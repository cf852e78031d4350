//! Hardware providers
//!
//! Concrete [`HardwareProvider`](crate::provider::HardwareProvider)
//! implementations: the Linux hwmon backend and a static fixture backend.

pub mod fixture;
mod hwmon;
pub mod nvidia;
pub mod smart;

pub use fixture::{FixtureFile, StaticNode, StaticProvider};
pub use hwmon::HwmonProvider;
