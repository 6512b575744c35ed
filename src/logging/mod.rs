//! Verbosity levels and tracing setup
//!
//! The user-facing verbosity (0-3) drives both the tracing filter installed
//! by `init_tracing` and the messages `ports::list_ports` chooses to emit.

use crate::error::{Result, TriggerError};
use serde::{Deserialize, Serialize};

/// User-facing output level
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum Verbosity {
    /// Fatal errors only
    Silent = 0,
    /// Warnings (no devices, failed queries)
    #[default]
    Default = 1,
    /// One line per discovered device
    Info = 2,
    /// Raw OS command echo
    Trace = 3,
}

impl Verbosity {
    /// Whether messages at `level` should be shown
    pub fn allows(self, level: Verbosity) -> bool {
        self >= level
    }

    fn filter_directive(self) -> &'static str {
        match self {
            Self::Silent => "error",
            Self::Default => "warn",
            Self::Info => "info",
            Self::Trace => "debug",
        }
    }
}

impl TryFrom<u8> for Verbosity {
    type Error = TriggerError;

    fn try_from(value: u8) -> Result<Self> {
        match value {
            0 => Ok(Self::Silent),
            1 => Ok(Self::Default),
            2 => Ok(Self::Info),
            3 => Ok(Self::Trace),
            n => Err(TriggerError::InvalidArgument {
                field: "verbosity",
                reason: format!("{} is not in 0..=3", n),
            }),
        }
    }
}

impl From<Verbosity> for u8 {
    fn from(v: Verbosity) -> u8 {
        v as u8
    }
}

/// Initialize tracing output
///
/// Call early in main() before any logging occurs. `RUST_LOG`, when set,
/// takes precedence over the verbosity.
pub fn init_tracing(verbosity: Verbosity) {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(verbosity.filter_directive()));

    let _ = tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_file(false)
                .compact(),
        )
        .with(filter)
        .try_init();
}
