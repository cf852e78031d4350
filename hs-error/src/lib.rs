//! Unified error handling for hwsense
//!
//! A single error type shared by the protocol, core and daemon crates.
//! Only provider-level calls (open, update, close) and I/O on the data
//! channel produce these; bad sensor data is filtered, never raised.

use std::io;
use std::path::PathBuf;

/// Result type alias using HwsenseError
pub type Result<T> = std::result::Result<T, HwsenseError>;

/// Unified error type for all hwsense operations
#[derive(thiserror::Error, Debug)]
pub enum HwsenseError {
    // ============================================================================
    // I/O and File System Errors
    // ============================================================================
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        source: io::Error,
    },

    // ============================================================================
    // Provider Lifecycle Errors
    // ============================================================================
    #[error("provider.open() failed: {0}")]
    ProviderOpen(String),

    #[error("provider.close() failed: {0}")]
    ProviderClose(String),

    #[error("Provider is not open")]
    ProviderNotOpen,

    #[error("Failed to update hardware {node}: {reason}")]
    HardwareUpdate {
        node: String,
        reason: String,
    },

    // ============================================================================
    // Encoding Errors
    // ============================================================================
    #[error("Failed to parse JSON: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("Failed to encode record: {0}")]
    Encode(String),

    // ============================================================================
    // External Tools
    // ============================================================================
    #[error("{tool} failed: {reason}")]
    ExternalTool {
        tool: &'static str,
        reason: String,
    },

    // ============================================================================
    // Generic Errors
    // ============================================================================
    #[error("{0}")]
    Generic(String),
}

impl HwsenseError {
    /// Create a generic error from a string
    pub fn generic(msg: impl Into<String>) -> Self {
        Self::Generic(msg.into())
    }

    /// Create a provider open error
    pub fn open(reason: impl Into<String>) -> Self {
        Self::ProviderOpen(reason.into())
    }

    /// Create a hardware update error for a named node
    pub fn update(node: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::HardwareUpdate {
            node: node.into(),
            reason: reason.into(),
        }
    }
}

// Allow converting from String to HwsenseError
impl From<String> for HwsenseError {
    fn from(s: String) -> Self {
        Self::Generic(s)
    }
}

// Allow converting from &str to HwsenseError
impl From<&str> for HwsenseError {
    fn from(s: &str) -> Self {
        Self::Generic(s.to_string())
    }
}
