//! hwsensed library
//!
//! The line-driven surface around the collection core: argument handling,
//! stderr logging, the daemon loop and the one-shot runner. `main.rs` only
//! wires these together.

pub mod cli;
pub mod daemon;
pub mod logging;
pub mod oneshot;
pub mod output;
pub mod session;

pub use cli::{Cli, Mode};
pub use daemon::{run_daemon, DaemonState};
pub use oneshot::run_once;
pub use session::ProviderSession;

/// Process outcome
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitStatus {
    Success,
    Failure,
}

impl ExitStatus {
    pub fn code(self) -> u8 {
        match self {
            ExitStatus::Success => 0,
            ExitStatus::Failure => 1,
        }
    }
}

impl From<ExitStatus> for std::process::ExitCode {
    fn from(status: ExitStatus) -> Self {
        std::process::ExitCode::from(status.code())
    }
}
