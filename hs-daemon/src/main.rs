//! hwsensed
//!
//! Hardware telemetry helper. Prints JSON snapshots on stdout, one per line,
//! either once or once per request line read from stdin (`--daemon`).

use std::io;
use std::process::ExitCode;
use tracing::{debug, error, info, warn};

use hs_daemon::cli::{is_informational, resolve_log_filter, usage_error_message};
use hs_daemon::output::write_response;
use hs_daemon::{logging, run_daemon, run_once, Cli, ExitStatus, Mode};
use hs_protocol::Response;

const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Some sensors (SMART, embedded controllers) need root
#[cfg(unix)]
fn warn_if_unprivileged() {
    // SAFETY: geteuid has no preconditions and cannot fail.
    let euid = unsafe { libc::geteuid() };
    if euid != 0 {
        warn!("Not running as root (euid={}), some sensors may be missing", euid);
    }
}

#[cfg(not(unix))]
fn warn_if_unprivileged() {}

fn install_panic_hook() {
    std::panic::set_hook(Box::new(|panic_info| {
        let location = panic_info
            .location()
            .map(|l| format!("{}:{}:{}", l.file(), l.line(), l.column()))
            .unwrap_or_else(|| "unknown".to_string());

        let message = if let Some(s) = panic_info.payload().downcast_ref::<&str>() {
            s.to_string()
        } else if let Some(s) = panic_info.payload().downcast_ref::<String>() {
            s.clone()
        } else {
            "Unknown panic".to_string()
        };

        // stdout belongs to the protocol
        eprintln!("PANIC at {}: {}", location, message);
    }));
}

/// Bad arguments still get exactly one record on stdout
fn reject_arguments(e: &clap::Error) -> ExitStatus {
    if let Err(log_err) = logging::init(&resolve_log_filter(None)) {
        eprintln!("{}", log_err);
    }
    let message = usage_error_message(e);
    error!("{}", message);
    if let Err(write_err) = write_response(&mut io::stdout().lock(), &Response::error(message)) {
        error!("Output channel closed: {}", write_err);
    }
    ExitStatus::Failure
}

fn main() -> ExitCode {
    let cli = match Cli::parse_args(std::env::args_os()) {
        Ok(cli) => cli,
        Err(e) if is_informational(&e) => e.exit(),
        Err(e) => return reject_arguments(&e).into(),
    };

    if let Err(e) = logging::init(&cli.log_filter()) {
        eprintln!("{}", e);
    }
    install_panic_hook();

    info!("hwsensed {} starting", VERSION);
    warn_if_unprivileged();

    let mut provider = cli.build_provider();
    debug!("Using {}", provider.describe());

    let stdout = io::stdout();
    let status = match cli.mode() {
        Mode::Daemon => run_daemon(&mut provider, io::stdin().lock(), stdout.lock()),
        Mode::OneShot => run_once(&mut provider, stdout.lock()),
    };

    debug!("Exiting with status {}", status.code());
    status.into()
}
