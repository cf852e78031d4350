//! Error types, shared with the other hwsense crates

pub use hs_error::{HwsenseError, Result};
