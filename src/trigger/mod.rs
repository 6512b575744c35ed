//! Trigger-box serial output
//!
//! `TriggerPort` owns one serial handle opened at the fixed trigger baud
//! rate. The handle is released exactly once: on `close()` or when the
//! `TriggerPort` is dropped, whichever comes first.
//!
//! # Example
//!
//! ```ignore
//! let mut port = TriggerPort::open(None)?;
//! port.write(&[8])?;
//! // handle closed when `port` goes out of scope
//! ```

mod backend;

pub use backend::{SerialBackend, SystemSerial};

use crate::config::{settings_or_default, ConfigLocations, Settings};
use crate::constants::{TRIGGER_BAUD_RATE, WINDOWS_DEFAULT_PORT};
use crate::error::{Result, TriggerError};
use crate::logging::Verbosity;
use crate::platform::{CommandRunner, Platform, SystemShell};
use crate::ports;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info};

/// Serial settings for the trigger box
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TriggerConfig {
    pub baud_rate: u32,
}

impl Default for TriggerConfig {
    fn default() -> Self {
        Self {
            baud_rate: TRIGGER_BAUD_RATE,
        }
    }
}

// =============================================================================
// Port resolution
// =============================================================================

/// Where the trigger port name came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PortSource {
    /// Port file passed by the caller
    ExplicitFile(PathBuf),
    /// Per-OS port file in the config directory
    ConfigFile,
    /// `port` in the settings file
    Settings,
    /// First device reported by discovery
    Discovered,
    /// Discovery was empty; platform default used
    PlatformDefault,
}

/// Decides which port to open
pub struct PortResolver<'a> {
    pub platform: Platform,
    pub runner: &'a dyn CommandRunner,
    /// `None` when the documents directory is unknown
    pub locations: Option<ConfigLocations>,
    /// Already-loaded `trigger.toml` contents
    pub settings: Settings,
    pub verbosity: Verbosity,
}

impl PortResolver<'static> {
    /// Resolver for the host OS and the user's config directory
    pub fn system(verbosity: Verbosity) -> Result<Self> {
        let platform = Platform::current().ok_or(TriggerError::PlatformNotSupported)?;
        let locations = ConfigLocations::user_default();
        let settings = locations
            .as_ref()
            .map(|l| settings_or_default(l.settings()))
            .unwrap_or_default();
        Ok(Self {
            platform,
            runner: &SystemShell,
            locations,
            settings,
            verbosity,
        })
    }
}

impl PortResolver<'_> {
    /// Resolve the port name
    ///
    /// Order: explicit port file, per-OS config file, settings `port`,
    /// then the first discovered device. On Windows an empty discovery
    /// falls back to `COM3`.
    ///
    /// # Errors
    ///
    /// - `Io` / `ConfigParse` - a config file exists but cannot be used
    /// - `NoDeviceFound` - nothing configured or discovered (POSIX)
    pub fn resolve(&self, explicit_port_file: Option<&Path>) -> Result<(String, PortSource)> {
        if let Some(path) = explicit_port_file {
            if let Some(port) = crate::config::read_port_file(path)? {
                return Ok((port, PortSource::ExplicitFile(path.to_path_buf())));
            }
            debug!("Port file {:?} missing or empty, continuing", path);
        }

        if let Some(locations) = &self.locations {
            if let Some(port) = locations.configured_port(self.platform)? {
                return Ok((port, PortSource::ConfigFile));
            }
        }

        if let Some(port) = self.settings.port() {
            return Ok((port.to_string(), PortSource::Settings));
        }

        let found = ports::list_ports_on(self.platform, self.runner, self.verbosity);
        match found.into_iter().next() {
            Some(entry) => Ok((entry.port_name, PortSource::Discovered)),
            None if self.platform.is_windows() => {
                Ok((WINDOWS_DEFAULT_PORT.to_string(), PortSource::PlatformDefault))
            }
            None => Err(TriggerError::NoDeviceFound),
        }
    }
}

// =============================================================================
// Trigger port
// =============================================================================

/// Open serial connection to a trigger box
pub struct TriggerPort<P: Write = Box<dyn serialport::SerialPort>> {
    port_name: String,
    config: TriggerConfig,
    handle: Option<P>,
}

impl TriggerPort {
    /// Resolve and open the trigger port on this machine
    pub fn open(explicit_port_file: Option<&Path>) -> Result<Self> {
        let resolver = PortResolver::system(Verbosity::Default)?;
        Self::open_with(&SystemSerial, &resolver, explicit_port_file)
    }
}

impl<P: Write> TriggerPort<P> {
    /// Resolve the port name with `resolver` and open it with `backend`
    pub fn open_with<B>(
        backend: &B,
        resolver: &PortResolver<'_>,
        explicit_port_file: Option<&Path>,
    ) -> Result<Self>
    where
        B: SerialBackend<Port = P>,
    {
        let (port_name, source) = resolver.resolve(explicit_port_file)?;
        info!("Trigger port {} (from {:?})", port_name, source);
        Self::open_named(backend, port_name)
    }

    /// Open a known port name, skipping resolution
    pub fn open_named<B>(backend: &B, port_name: impl Into<String>) -> Result<Self>
    where
        B: SerialBackend<Port = P>,
    {
        let port_name = port_name.into();
        let config = TriggerConfig::default();
        let handle = backend.open(&port_name, config.baud_rate)?;
        debug!("Opened {} @ {} baud", port_name, config.baud_rate);
        Ok(Self {
            port_name,
            config,
            handle: Some(handle),
        })
    }

    pub fn port_name(&self) -> &str {
        &self.port_name
    }

    pub fn config(&self) -> TriggerConfig {
        self.config
    }

    /// True unless the handle is open
    pub fn is_closed(&self) -> bool {
        self.handle.is_none()
    }

    /// Write raw bytes to the trigger box
    ///
    /// # Errors
    ///
    /// - `PortClosed` - handle already closed
    /// - `SerialWrite` - the OS write failed
    pub fn write(&mut self, bytes: &[u8]) -> Result<()> {
        let handle = self.handle.as_mut().ok_or_else(|| TriggerError::PortClosed {
            port: self.port_name.clone(),
        })?;
        handle
            .write_all(bytes)
            .map_err(|e| TriggerError::SerialWrite {
                port: self.port_name.clone(),
                source: e,
            })
    }

    /// Write `code`, hold for `width`, then write `0`
    pub fn pulse(&mut self, code: u8, width: Duration) -> Result<()> {
        self.write(&[code])?;
        std::thread::sleep(width);
        self.write(&[0])
    }

    /// Release the handle; later calls do nothing
    pub fn close(&mut self) {
        if let Some(mut handle) = self.handle.take() {
            let _ = handle.flush();
            debug!("Closed {}", self.port_name);
        }
    }
}

impl<P: Write> Drop for TriggerPort<P> {
    fn drop(&mut self) {
        self.close();
    }
}

impl<P: Write> std::fmt::Debug for TriggerPort<P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TriggerPort")
            .field("port_name", &self.port_name)
            .field("config", &self.config)
            .field("closed", &self.is_closed())
            .finish()
    }
}
