//! Daemon loop
//!
//! Opens the provider once, then answers every request line with exactly one
//! response line until the input ends. Request content is ignored: any line,
//! even an empty one or invalid UTF-8, is a collection tick.
//!
//! ```text
//! Starting --open ok--> Ready --line--> Collecting --written--> Ready
//!    |                    |                 |
//!    | open failed        | end of input    | output gone
//!    v                    v                 v
//!    +----------------> Stopping (close) -> Stopped
//! ```

use std::io::{BufRead, Write};
use tracing::{debug, error, info, warn};

use hs_core::{collect_snapshot, detect_changes, HardwareProvider, SensorCounts};
use hs_protocol::Response;

use crate::output::write_response;
use crate::session::ProviderSession;
use crate::ExitStatus;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DaemonState {
    Starting,
    Ready,
    Collecting,
    Stopping,
    Stopped,
}

/// Serve requests from `input` until it ends.
///
/// Returns [`ExitStatus::Failure`] if the provider could not be opened or
/// the output channel broke; end of input is a clean exit.
pub fn run_daemon<P, R, W>(provider: &mut P, mut input: R, mut output: W) -> ExitStatus
where
    P: HardwareProvider + ?Sized,
    R: BufRead,
    W: Write,
{
    let mut session = ProviderSession::new(provider);
    let mut state = DaemonState::Starting;
    let mut status = ExitStatus::Success;
    let mut counts = SensorCounts::UNSET;
    let mut request = Vec::new();
    let mut ticks: u64 = 0;

    while state != DaemonState::Stopped {
        state = match state {
            DaemonState::Starting => match session.open() {
                Ok(()) => {
                    info!("Provider opened, waiting for requests");
                    DaemonState::Ready
                }
                Err(e) => {
                    error!("{}", e);
                    if let Err(write_err) = write_response(&mut output, &Response::from(&e)) {
                        warn!("Could not report open failure: {}", write_err);
                    }
                    status = ExitStatus::Failure;
                    DaemonState::Stopping
                }
            },

            DaemonState::Ready => {
                request.clear();
                match input.read_until(b'\n', &mut request) {
                    Ok(0) => {
                        info!("Input closed after {} requests", ticks);
                        DaemonState::Stopping
                    }
                    Ok(_) => DaemonState::Collecting,
                    Err(e) => {
                        warn!("Input read failed, treating as end of input: {}", e);
                        DaemonState::Stopping
                    }
                }
            }

            DaemonState::Collecting => {
                ticks += 1;
                let response = match collect_snapshot(session.provider()) {
                    Ok(snapshot) => {
                        let (next, change) = detect_changes(counts, &snapshot);
                        counts = next;
                        if let Some(message) = change {
                            info!("{}", message);
                        }
                        debug!(tick = ticks, records = snapshot.record_count(), "Collected");
                        Response::from(snapshot)
                    }
                    Err(e) => {
                        error!("Collection failed: {}", e);
                        Response::from(&e)
                    }
                };

                match write_response(&mut output, &response) {
                    Ok(()) => DaemonState::Ready,
                    Err(e) => {
                        error!("Output channel closed: {}", e);
                        status = ExitStatus::Failure;
                        DaemonState::Stopping
                    }
                }
            }

            DaemonState::Stopping => {
                match session.close() {
                    Ok(()) => info!("Provider closed"),
                    Err(e) => warn!("Provider close failed: {}", e),
                }
                DaemonState::Stopped
            }

            DaemonState::Stopped => DaemonState::Stopped,
        };
    }

    status
}
