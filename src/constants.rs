//! Application-wide constants
//!
//! Centralized constants to avoid duplication and ensure consistency.

// =============================================================================
// Serial
// =============================================================================

/// Baud rate required by the NeuroSpec trigger box
pub const TRIGGER_BAUD_RATE: u32 = 9600;

/// Write timeout handed to the serial backend (milliseconds)
pub const SERIAL_WRITE_TIMEOUT_MS: u64 = 100;

/// Port used on Windows when discovery finds nothing
pub const WINDOWS_DEFAULT_PORT: &str = "COM3";

/// Default marker width for `pulse` (milliseconds)
pub const DEFAULT_PULSE_MS: u64 = 10;

// =============================================================================
// Configuration files
// =============================================================================

/// Directory under the user's documents folder holding trigger config
pub const CONFIG_DIR_NAME: &str = "NeuroSpec";

/// Windows: bare COM number (e.g. `5` for `COM5`)
pub const WINDOWS_PORT_NUMBER_FILE: &str = "trigger_port_number.txt";

/// POSIX: full device path of the trigger port
pub const POSIX_PORT_NAME_FILE: &str = "trigger_port.txt";

/// POSIX: secondary file pointing directly at a device path
pub const POSIX_DEVICE_FILE: &str = "trigger_device.txt";

/// Optional TOML settings file
pub const SETTINGS_FILE: &str = "trigger.toml";

// =============================================================================
// Device naming
// =============================================================================

/// Length of `/dev/ttyUSB` and `/dev/ttyACM`; Linux fallback parse boundary
pub const LINUX_DEVICE_PREFIX_LEN: usize = 11;
