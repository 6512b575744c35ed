//! Serial port discovery
//!
//! Queries the OS for connected USB serial devices and normalizes the
//! result into a `PortList` of (identifier, port name) pairs:
//! - Windows: `COM<n>:` tokens from `mode`, highest COM number first
//! - macOS: `/dev/tty.usb*` then `/dev/cu.usb*`, in listing order
//! - Linux: `/dev/ttyUSB*` then `/dev/ttyACM*`, in listing order
//!
//! Listing never fails. A command that cannot run or exits non-zero is
//! logged and contributes nothing.

mod posix;
mod windows;

pub use posix::{parse_linux_device, parse_macos_device, DeviceName};
pub use windows::parse_mode_output;

use crate::logging::Verbosity;
use crate::platform::{CommandOutput, CommandRunner, Platform, SystemShell};
use tracing::{debug, info, warn};

/// One connected serial device
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PortEntry {
    /// Best-effort device identifier; not unique, not stable
    pub identifier: String,
    /// Name to open the serial connection with (`COM5`, `/dev/ttyUSB0`)
    pub port_name: String,
}

impl PortEntry {
    pub fn new(identifier: impl Into<String>, port_name: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            port_name: port_name.into(),
        }
    }
}

pub type PortList = Vec<PortEntry>;

/// List serial devices on the current platform
///
/// Returns an empty list on unsupported platforms.
pub fn list_ports(verbosity: Verbosity) -> PortList {
    match Platform::current() {
        Some(platform) => list_ports_on(platform, &SystemShell, verbosity),
        None => {
            if verbosity.allows(Verbosity::Default) {
                warn!("Serial port discovery is not supported on this platform");
            }
            PortList::new()
        }
    }
}

/// List serial devices using an explicit platform and command runner
pub fn list_ports_on(
    platform: Platform,
    runner: &dyn CommandRunner,
    verbosity: Verbosity,
) -> PortList {
    if verbosity.allows(Verbosity::Trace) {
        debug!("Listing serial ports on {}", platform.name());
    }
    let ports = match platform {
        Platform::Windows => list_windows(runner, verbosity),
        Platform::MacOs => list_posix(
            runner,
            verbosity,
            &["/dev/tty.usb*", "/dev/cu.usb*"],
            parse_macos_device,
            "No devices found",
        ),
        Platform::Linux => list_posix(
            runner,
            verbosity,
            &["/dev/ttyUSB*", "/dev/ttyACM*"],
            parse_linux_device,
            "No devices found under /dev/ttyUSB* or /dev/ttyACM*",
        ),
    };

    if verbosity.allows(Verbosity::Info) {
        for port in &ports {
            info!("Found {} ({})", port.port_name, port.identifier);
        }
    }
    ports
}

fn list_windows(runner: &dyn CommandRunner, verbosity: Verbosity) -> PortList {
    match query(runner.mode(), "mode", verbosity) {
        Some(stdout) => parse_mode_output(&stdout),
        None => {
            if verbosity.allows(Verbosity::Default) {
                warn!("No COM ports found");
            }
            PortList::new()
        }
    }
}

fn list_posix(
    runner: &dyn CommandRunner,
    verbosity: Verbosity,
    globs: &[&str],
    parse: fn(&str) -> DeviceName,
    none_found: &str,
) -> PortList {
    let mut ports = PortList::new();
    let mut any_succeeded = false;

    for glob in globs {
        let label = format!("ls {}", glob);
        if let Some(stdout) = query(runner.list_glob(glob), &label, verbosity) {
            any_succeeded = true;
            ports.extend(
                stdout
                    .lines()
                    .map(str::trim)
                    .filter(|line| !line.is_empty())
                    .map(|path| PortEntry::new(parse(path).into_identifier(), path)),
            );
        }
    }

    if !any_succeeded && verbosity.allows(Verbosity::Default) {
        warn!("{}", none_found);
    }
    ports
}

/// Unwrap a command result into stdout, logging failures
fn query(
    result: crate::error::Result<CommandOutput>,
    label: &str,
    verbosity: Verbosity,
) -> Option<String> {
    match result {
        Ok(output) => {
            if verbosity.allows(Verbosity::Trace) {
                debug!("{} -> success={}\n{}", label, output.success, output.stdout);
            }
            if output.success {
                Some(output.stdout)
            } else {
                if verbosity.allows(Verbosity::Info) {
                    info!("{} exited with non-zero status", label);
                }
                None
            }
        }
        Err(e) => {
            if verbosity.allows(Verbosity::Default) {
                warn!(cause = ?std::error::Error::source(&e), "{}", e);
            }
            None
        }
    }
}
