//! Collection engine
//!
//! Classification rules, the collection pass and count change detection.
//! Everything here is provider-agnostic.

pub mod classify;
pub mod collect;
pub mod counts;

pub use classify::{round_to, Record, Scope};
pub use collect::collect_snapshot;
pub use counts::{detect_changes, SensorCounts};
