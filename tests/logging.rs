//! Log output tests
//!
//! Captures what discovery and settings loading emit through `tracing`
//! at each verbosity level.

use std::fs;
use std::io::{self, Write};
use std::sync::{Arc, Mutex};

use trigger_ports::config::{load_settings, settings_or_default, Settings};
use trigger_ports::constants::SETTINGS_FILE;
use trigger_ports::platform::{CommandOutput, CommandRunner, Platform};
use trigger_ports::ports::list_ports_on;
use trigger_ports::{Result, Verbosity};

// =============================================================================
// Capture
// =============================================================================

/// Shared sink for formatted log lines
#[derive(Clone, Default)]
struct LogBuffer(Arc<Mutex<Vec<u8>>>);

impl LogBuffer {
    fn contents(&self) -> String {
        String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
    }
}

impl Write for LogBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Run `f` with every event recorded, returning the formatted output
fn capture<T>(f: impl FnOnce() -> T) -> (T, String) {
    let buffer = LogBuffer::default();
    let writer = buffer.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(move || writer.clone())
        .with_ansi(false)
        .with_max_level(tracing::Level::TRACE)
        .finish();
    let value = tracing::subscriber::with_default(subscriber, f);
    (value, buffer.contents())
}

// =============================================================================
// Canned shell
// =============================================================================

/// Every glob answers with `listing`; `None` means non-zero exit status
struct Shell {
    listing: Option<&'static str>,
}

impl CommandRunner for Shell {
    fn mode(&self) -> Result<CommandOutput> {
        Ok(CommandOutput::failed())
    }

    fn list_glob(&self, pattern: &str) -> Result<CommandOutput> {
        Ok(match self.listing {
            Some(out) if pattern.starts_with("/dev/ttyUSB") => CommandOutput::ok(out),
            Some(_) => CommandOutput::ok(""),
            None => CommandOutput::failed(),
        })
    }
}

const TWO_DEVICES: Shell = Shell {
    listing: Some("/dev/ttyUSB0\n/dev/ttyUSB1\n"),
};
const NOTHING: Shell = Shell { listing: None };

// =============================================================================
// Discovery
// =============================================================================

#[test]
fn test_none_found_warns_at_default() {
    let (ports, logs) = capture(|| list_ports_on(Platform::Linux, &NOTHING, Verbosity::Default));
    assert!(ports.is_empty());
    assert!(logs.contains("WARN"), "{}", logs);
    assert!(
        logs.contains("No devices found under /dev/ttyUSB* or /dev/ttyACM*"),
        "{}",
        logs
    );
}

#[test]
fn test_silent_emits_nothing() {
    let (_, logs) = capture(|| {
        list_ports_on(Platform::Linux, &NOTHING, Verbosity::Silent);
        list_ports_on(Platform::Linux, &TWO_DEVICES, Verbosity::Silent);
        list_ports_on(Platform::Windows, &NOTHING, Verbosity::Silent);
    });
    assert_eq!(logs, "");
}

#[test]
fn test_info_reports_each_device() {
    let (ports, logs) = capture(|| list_ports_on(Platform::Linux, &TWO_DEVICES, Verbosity::Info));
    assert_eq!(ports.len(), 2);
    assert_eq!(logs.matches("Found ").count(), 2, "{}", logs);
    assert!(logs.contains("Found /dev/ttyUSB0 (0)"));
    assert!(logs.contains("Found /dev/ttyUSB1 (1)"));
    assert!(!logs.contains("No devices found"));
}

#[test]
fn test_trace_names_platform() {
    let (_, logs) = capture(|| list_ports_on(Platform::MacOs, &NOTHING, Verbosity::Trace));
    assert!(logs.contains("Listing serial ports on macOS"), "{}", logs);
    assert!(logs.contains("exited with non-zero status"));
}

// =============================================================================
// Settings
// =============================================================================

#[test]
fn test_malformed_settings_fallback_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(SETTINGS_FILE);
    fs::write(&path, "[logging]\nverbosity = \"loud\"\n").unwrap();

    let (settings, logs) = capture(|| settings_or_default(load_settings(&path)));
    assert_eq!(settings, Settings::default());
    assert!(logs.contains("WARN"), "{}", logs);
    assert!(logs.contains("using default settings"), "{}", logs);
    assert!(logs.contains(&path.display().to_string()), "{}", logs);
}

#[test]
fn test_missing_settings_is_not_reported() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(SETTINGS_FILE);

    let (settings, logs) = capture(|| settings_or_default(load_settings(&path)));
    assert_eq!(settings, Settings::default());
    assert!(!logs.contains("WARN"), "{}", logs);
}
