//! Centralized error types
//!
//! All trigger-port errors are represented by the `TriggerError` enum.
//! Use `Result<T>` as shorthand for `std::result::Result<T, TriggerError>`.

use std::fmt;
use std::path::PathBuf;

/// All trigger-port errors
#[derive(Debug)]
pub enum TriggerError {
    // === Serial ===
    /// Failed to open serial port
    SerialOpen {
        port: String,
        source: std::io::Error,
    },
    /// Failed to write to an open serial port
    SerialWrite {
        port: String,
        source: std::io::Error,
    },
    /// Write attempted on a handle that is not open
    PortClosed { port: String },

    // === Detection ===
    /// No device found and no platform default applies
    NoDeviceFound,
    /// No serial naming convention known for this OS
    PlatformNotSupported,

    // === IO ===
    /// File system operation failed
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    /// Config or settings file could not be parsed
    ConfigParse { path: PathBuf, reason: String },

    // === OS Commands ===
    /// Failed to spawn an OS command
    OsCommand {
        program: &'static str,
        source: std::io::Error,
    },

    // === Input ===
    /// Invalid value supplied by the caller
    InvalidArgument { field: &'static str, reason: String },
}

impl std::error::Error for TriggerError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::SerialOpen { source, .. }
            | Self::SerialWrite { source, .. }
            | Self::Io { source, .. }
            | Self::OsCommand { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl fmt::Display for TriggerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SerialOpen { port, .. } => write!(f, "Cannot open serial port: {}", port),
            Self::SerialWrite { port, .. } => write!(f, "Cannot write to serial port: {}", port),
            Self::PortClosed { port } => write!(f, "Serial port is closed: {}", port),
            Self::NoDeviceFound => write!(f, "No device found"),
            Self::PlatformNotSupported => {
                write!(f, "Serial port discovery not supported on this platform")
            }
            Self::Io { path, .. } => write!(f, "IO error: {}", path.display()),
            Self::ConfigParse { path, reason } => {
                write!(f, "Invalid config in {}: {}", path.display(), reason)
            }
            Self::OsCommand { program, .. } => write!(f, "Command failed: {}", program),
            Self::InvalidArgument { field, reason } => {
                write!(f, "Invalid {}: {}", field, reason)
            }
        }
    }
}

/// Alias for Result with TriggerError
pub type Result<T> = std::result::Result<T, TriggerError>;
