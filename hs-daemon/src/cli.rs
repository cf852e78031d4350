//! Command Line Interface
//!
//! Mode selection and provider configuration for `hwsensed`.

use clap::Parser;
use std::ffi::OsString;
use std::path::PathBuf;

use hs_core::{HardwareProvider, HwmonProvider, ProviderConfig, StaticProvider};

/// Environment variable holding the log filter
pub const LOG_ENV: &str = "HWSENSE_LOG";

#[derive(Parser, Debug, Clone, PartialEq)]
#[command(name = "hwsensed")]
#[command(version)]
#[command(about = "hwsensed - hardware telemetry helper")]
#[command(long_about = "hwsensed - hardware telemetry helper

Reads hardware sensors and prints one JSON snapshot per line on stdout.
Without --daemon a single snapshot is printed. With --daemon one snapshot
(or {\"error\": ...} record) is printed per line read from stdin, until
stdin is closed.

Diagnostics go to stderr only.

EXAMPLES:
    hwsensed                              Print one snapshot and exit
    printf 'collect\\n' | hwsensed --daemon
    hwsensed --fixture machine.json       Replay a captured hardware tree

ENVIRONMENT VARIABLES:
    HWSENSE_LOG=debug      Log filter (trace, debug, info, warn, error)")]
pub struct Cli {
    /// Serve one snapshot per stdin line until stdin closes
    #[arg(long)]
    pub daemon: bool,

    /// Read the hardware tree from a JSON fixture instead of sysfs
    #[arg(long, value_name = "PATH")]
    pub fixture: Option<PathBuf>,

    /// hwmon class directory to scan
    #[arg(long, value_name = "PATH")]
    pub hwmon_root: Option<PathBuf>,

    #[arg(long)]
    pub no_cpu: bool,

    #[arg(long)]
    pub no_motherboard: bool,

    #[arg(long)]
    pub no_gpu: bool,

    #[arg(long)]
    pub no_storage: bool,

    /// Skip smartctl health attributes
    #[arg(long)]
    pub no_smart: bool,

    /// Skip nvidia-smi boards
    #[arg(long)]
    pub no_nvidia_smi: bool,

    /// Log filter, overrides HWSENSE_LOG
    #[arg(long, value_name = "LEVEL")]
    pub log_level: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Daemon,
    OneShot,
}

impl Cli {
    /// Parse from raw process arguments, accepting the mode flag in any case
    pub fn parse_args<I, T>(args: I) -> Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString>,
    {
        Self::try_parse_from(normalize_args(args))
    }

    pub fn mode(&self) -> Mode {
        if self.daemon {
            Mode::Daemon
        } else {
            Mode::OneShot
        }
    }

    pub fn provider_config(&self) -> ProviderConfig {
        let mut config = ProviderConfig {
            cpu: !self.no_cpu,
            motherboard: !self.no_motherboard,
            gpu: !self.no_gpu,
            storage: !self.no_storage,
            smart: !self.no_smart,
            nvidia_smi: !self.no_nvidia_smi,
            ..ProviderConfig::default()
        };
        if let Some(root) = &self.hwmon_root {
            config.hwmon_root = root.clone();
        }
        config
    }

    /// The fixture backend when `--fixture` is given, hwmon otherwise
    pub fn build_provider(&self) -> Box<dyn HardwareProvider> {
        match &self.fixture {
            Some(path) => Box::new(StaticProvider::from_file(path)),
            None => Box::new(HwmonProvider::new(self.provider_config())),
        }
    }

    pub fn log_filter(&self) -> String {
        resolve_log_filter(self.log_level.as_deref())
    }
}

/// Explicit flag first, then the environment, then `info`
pub fn resolve_log_filter(flag: Option<&str>) -> String {
    flag.map(str::to_string)
        .or_else(|| std::env::var(LOG_ENV).ok())
        .unwrap_or_else(|| "info".to_string())
}

/// `--help` and `--version` are answered by clap itself
pub fn is_informational(e: &clap::Error) -> bool {
    matches!(
        e.kind(),
        clap::error::ErrorKind::DisplayHelp | clap::error::ErrorKind::DisplayVersion
    )
}

/// One-line message for the error record sent instead of a snapshot
pub fn usage_error_message(e: &clap::Error) -> String {
    let rendered = e.to_string();
    let first = rendered.lines().next().unwrap_or_default();
    format!("invalid arguments: {}", first.trim_start_matches("error: ").trim())
}

/// Rewrite `--DAEMON`, `--Daemon`, ... to `--daemon`
pub fn normalize_args<I, T>(args: I) -> Vec<OsString>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString>,
{
    args.into_iter()
        .map(|arg| {
            let arg: OsString = arg.into();
            let is_mode_flag = arg
                .to_str()
                .map(|s| s.eq_ignore_ascii_case("--daemon"))
                .unwrap_or(false);
            if is_mode_flag {
                OsString::from("--daemon")
            } else {
                arg
            }
        })
        .collect()
}
