//! Platform abstraction layer
//!
//! Centralizes the platform-specific pieces: which OS we are on, and how
//! OS listing commands are run.
//!
//! # Usage
//!
//! ```ignore
//! use crate::platform::{Platform, SystemShell};
//!
//! let platform = Platform::current().ok_or(TriggerError::NoDeviceFound)?;
//! let ports = ports::list_ports_on(platform, &SystemShell, verbosity);
//! ```

use crate::error::{Result, TriggerError};
use std::process::Command;

// =============================================================================
// Platform detection
// =============================================================================

/// Operating systems with a known serial naming convention
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    Windows,
    MacOs,
    Linux,
}

impl Platform {
    /// Platform this binary was built for, if supported
    pub fn current() -> Option<Self> {
        #[cfg(windows)]
        {
            Some(Self::Windows)
        }
        #[cfg(target_os = "macos")]
        {
            Some(Self::MacOs)
        }
        #[cfg(target_os = "linux")]
        {
            Some(Self::Linux)
        }
        #[cfg(not(any(windows, target_os = "macos", target_os = "linux")))]
        {
            None
        }
    }

    pub fn is_windows(self) -> bool {
        self == Self::Windows
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Windows => "Windows",
            Self::MacOs => "macOS",
            Self::Linux => "Linux",
        }
    }
}

// =============================================================================
// OS commands
// =============================================================================

/// Captured result of an OS command
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutput {
    /// Exit status was zero
    pub success: bool,
    pub stdout: String,
}

impl CommandOutput {
    pub fn ok(stdout: impl Into<String>) -> Self {
        Self {
            success: true,
            stdout: stdout.into(),
        }
    }

    pub fn failed() -> Self {
        Self {
            success: false,
            stdout: String::new(),
        }
    }
}

/// Runs the OS listing commands
///
/// `SystemShell` is the real implementation; tests substitute canned output.
pub trait CommandRunner {
    /// Run the Windows port status command (`mode`)
    fn mode(&self) -> Result<CommandOutput>;

    /// List entries matching a shell glob such as `/dev/ttyUSB*`
    fn list_glob(&self, pattern: &str) -> Result<CommandOutput>;
}

/// Runs commands through the host OS
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemShell;

impl CommandRunner for SystemShell {
    fn mode(&self) -> Result<CommandOutput> {
        // `mode` is a .com binary; a bare name only resolves to .exe
        run("mode", Command::new("mode.com"))
    }

    fn list_glob(&self, pattern: &str) -> Result<CommandOutput> {
        // The glob must be expanded by a shell, not passed to ls verbatim
        let mut cmd = Command::new("sh");
        cmd.arg("-c").arg(format!("ls {}", pattern));
        run("ls", cmd)
    }
}

fn run(program: &'static str, mut cmd: Command) -> Result<CommandOutput> {
    let output = cmd
        .output()
        .map_err(|e| TriggerError::OsCommand { program, source: e })?;
    Ok(CommandOutput {
        success: output.status.success(),
        stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
    })
}
