//! Configuration management
//!
//! Trigger configuration lives under `<documents>/NeuroSpec/`:
//! - `trigger_port_number.txt` (Windows): bare COM number, e.g. `5`
//! - `trigger_port.txt` / `trigger_device.txt` (POSIX): device path
//! - `trigger.toml`: optional settings (port override, pulse width, verbosity)
//!
//! Missing files are not errors; they only mean "auto-detect".

use crate::constants::{
    CONFIG_DIR_NAME, DEFAULT_PULSE_MS, POSIX_DEVICE_FILE, POSIX_PORT_NAME_FILE, SETTINGS_FILE,
    WINDOWS_PORT_NUMBER_FILE,
};
use crate::error::{Result, TriggerError};
use crate::logging::Verbosity;
use crate::platform::Platform;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

// =============================================================================
// Settings file
// =============================================================================

/// Contents of `trigger.toml`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub trigger: TriggerSettings,
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TriggerSettings {
    /// Port name used when no port file exists (empty = auto-detect)
    pub port: String,
    /// Marker width for `send --pulse` (milliseconds)
    pub pulse_ms: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    pub verbosity: Verbosity,
}

impl Default for TriggerSettings {
    fn default() -> Self {
        Self {
            port: String::new(),
            pulse_ms: DEFAULT_PULSE_MS,
        }
    }
}

impl Settings {
    /// Configured port override, if any
    pub fn port(&self) -> Option<&str> {
        let port = self.trigger.port.trim();
        (!port.is_empty()).then_some(port)
    }
}

/// Parse settings from TOML text
pub fn parse_settings(path: &Path, content: &str) -> Result<Settings> {
    toml::from_str(content).map_err(|e| TriggerError::ConfigParse {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })
}

/// Load settings from `path`
///
/// A missing file yields the defaults.
///
/// # Errors
///
/// - `Io` - the file exists but cannot be read
/// - `ConfigParse` - the file is not valid settings TOML
pub fn load_settings(path: &Path) -> Result<Settings> {
    match fs::read_to_string(path) {
        Ok(content) => parse_settings(path, &content),
        Err(e) if e.kind() == ErrorKind::NotFound => {
            debug!("No settings at {:?}, using defaults", path);
            Ok(Settings::default())
        }
        Err(e) => Err(TriggerError::Io {
            path: path.to_path_buf(),
            source: e,
        }),
    }
}

/// Unwrap loaded settings, reporting a failure and falling back to defaults
///
/// Call once tracing is initialized so the warning is visible.
pub fn settings_or_default(loaded: Result<Settings>) -> Settings {
    loaded.unwrap_or_else(|e| {
        warn!("{}, using default settings", e);
        Settings::default()
    })
}

// =============================================================================
// Config locations
// =============================================================================

/// User's documents directory
///
/// - Windows: `%USERPROFILE%\Documents`
/// - Other: `$HOME/Documents`
pub fn documents_dir() -> Option<PathBuf> {
    let var = if cfg!(windows) { "USERPROFILE" } else { "HOME" };
    env::var_os(var).map(|home| PathBuf::from(home).join("Documents"))
}

/// Directory holding the trigger configuration files
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigLocations {
    pub dir: PathBuf,
}

impl ConfigLocations {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// `<documents>/NeuroSpec`, if the documents directory is known
    pub fn user_default() -> Option<Self> {
        documents_dir().map(|docs| Self::new(docs.join(CONFIG_DIR_NAME)))
    }

    pub fn settings_path(&self) -> PathBuf {
        self.dir.join(SETTINGS_FILE)
    }

    pub fn settings(&self) -> Result<Settings> {
        load_settings(&self.settings_path())
    }

    /// Port named by the per-OS config files, if one exists
    ///
    /// Windows reads a bare COM number and prepends `COM`. POSIX reads a
    /// device path from `trigger_port.txt`, then `trigger_device.txt`.
    pub fn configured_port(&self, platform: Platform) -> Result<Option<String>> {
        if platform.is_windows() {
            let path = self.dir.join(WINDOWS_PORT_NUMBER_FILE);
            return match read_port_file(&path)? {
                Some(number) => com_port_from_number(&path, &number).map(Some),
                None => Ok(None),
            };
        }

        for name in [POSIX_PORT_NAME_FILE, POSIX_DEVICE_FILE] {
            if let Some(port) = read_port_file(&self.dir.join(name))? {
                return Ok(Some(port));
            }
        }
        Ok(None)
    }
}

/// Read a single-line port file
///
/// Returns the trimmed contents, or `None` when the file is missing or blank.
pub fn read_port_file(path: &Path) -> Result<Option<String>> {
    match fs::read_to_string(path) {
        Ok(content) => {
            let trimmed = content.trim();
            if trimmed.is_empty() {
                debug!("Port file {:?} is empty, ignoring", path);
                Ok(None)
            } else {
                debug!("Port file {:?} -> {}", path, trimmed);
                Ok(Some(trimmed.to_string()))
            }
        }
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
        Err(e) => Err(TriggerError::Io {
            path: path.to_path_buf(),
            source: e,
        }),
    }
}

fn com_port_from_number(path: &Path, number: &str) -> Result<String> {
    number
        .parse::<u32>()
        .map(|n| format!("COM{}", n))
        .map_err(|_| TriggerError::ConfigParse {
            path: path.to_path_buf(),
            reason: format!("'{}' is not a COM port number", number),
        })
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings_values() {
        let settings = Settings::default();
        assert_eq!(settings.trigger.port, "");
        assert_eq!(settings.trigger.pulse_ms, DEFAULT_PULSE_MS);
        assert_eq!(settings.logging.verbosity, Verbosity::Default);
        assert_eq!(settings.port(), None);
    }

    #[test]
    fn test_settings_partial_section() {
        let settings = parse_settings(
            Path::new("trigger.toml"),
            r#"
[trigger]
port = " /dev/ttyUSB3 "
"#,
        )
        .unwrap();

        assert_eq!(settings.port(), Some("/dev/ttyUSB3"));
        assert_eq!(settings.trigger.pulse_ms, DEFAULT_PULSE_MS);
        assert_eq!(settings.logging.verbosity, Verbosity::Default);
    }

    #[test]
    fn test_settings_verbosity_is_numeric() {
        let settings =
            parse_settings(Path::new("t.toml"), "[logging]\nverbosity = 2\n").unwrap();
        assert_eq!(settings.logging.verbosity, Verbosity::Info);

        assert!(parse_settings(Path::new("t.toml"), "[logging]\nverbosity = 9\n").is_err());
    }

    #[test]
    fn test_settings_empty_file() {
        let settings = parse_settings(Path::new("t.toml"), "").unwrap();
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_load_settings_missing_is_default() {
        let dir = tempfile::tempdir().unwrap();
        let locations = ConfigLocations::new(dir.path());
        assert_eq!(locations.settings().unwrap(), Settings::default());
    }

    #[test]
    fn test_load_settings_invalid_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(SETTINGS_FILE);
        fs::write(&path, "[trigger\nport = ").unwrap();

        assert!(matches!(
            load_settings(&path),
            Err(TriggerError::ConfigParse { path: p, .. }) if p == path
        ));
        assert_eq!(settings_or_default(load_settings(&path)), Settings::default());
    }

    #[test]
    fn test_read_port_file_trims_and_ignores_blank() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("port.txt");

        assert_eq!(read_port_file(&path).unwrap(), None);

        fs::write(&path, "  \n").unwrap();
        assert_eq!(read_port_file(&path).unwrap(), None);

        fs::write(&path, "/dev/tty.usbserial-A700elGZ\n").unwrap();
        assert_eq!(
            read_port_file(&path).unwrap().as_deref(),
            Some("/dev/tty.usbserial-A700elGZ")
        );
    }

    #[test]
    fn test_windows_number_file_gets_com_prefix() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(WINDOWS_PORT_NUMBER_FILE), "5\r\n").unwrap();

        let locations = ConfigLocations::new(dir.path());
        assert_eq!(
            locations.configured_port(Platform::Windows).unwrap(),
            Some("COM5".to_string())
        );
    }

    #[test]
    fn test_windows_number_file_rejects_garbage() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(WINDOWS_PORT_NUMBER_FILE), "COMfive").unwrap();

        let locations = ConfigLocations::new(dir.path());
        assert!(matches!(
            locations.configured_port(Platform::Windows),
            Err(TriggerError::ConfigParse { .. })
        ));
    }

    #[test]
    fn test_posix_falls_back_to_device_file() {
        let dir = tempfile::tempdir().unwrap();
        let locations = ConfigLocations::new(dir.path());
        assert_eq!(locations.configured_port(Platform::Linux).unwrap(), None);

        fs::write(dir.path().join(POSIX_DEVICE_FILE), "/dev/ttyACM1").unwrap();
        assert_eq!(
            locations.configured_port(Platform::Linux).unwrap().as_deref(),
            Some("/dev/ttyACM1")
        );

        fs::write(dir.path().join(POSIX_PORT_NAME_FILE), "/dev/ttyUSB0").unwrap();
        assert_eq!(
            locations.configured_port(Platform::MacOs).unwrap().as_deref(),
            Some("/dev/ttyUSB0")
        );
    }

    #[test]
    fn test_posix_ignores_windows_number_file() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(WINDOWS_PORT_NUMBER_FILE), "4").unwrap();
        let locations = ConfigLocations::new(dir.path());
        assert_eq!(locations.configured_port(Platform::Linux).unwrap(), None);
    }
}
