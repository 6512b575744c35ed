//! Serial backend seam
//!
//! The trigger port only needs to open a named port at a baud rate and
//! write bytes to it. Closing is dropping the handle.

use crate::constants::SERIAL_WRITE_TIMEOUT_MS;
use crate::error::{Result, TriggerError};
use std::io::Write;
use std::time::Duration;

/// Opens serial handles
pub trait SerialBackend {
    type Port: Write;

    /// Open `port_name` at `baud_rate`
    ///
    /// # Errors
    ///
    /// - `SerialOpen` - device absent, busy, or permission denied
    fn open(&self, port_name: &str, baud_rate: u32) -> Result<Self::Port>;
}

/// Real serial ports via the `serialport` crate
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemSerial;

impl SerialBackend for SystemSerial {
    type Port = Box<dyn serialport::SerialPort>;

    fn open(&self, port_name: &str, baud_rate: u32) -> Result<Self::Port> {
        serialport::new(port_name, baud_rate)
            .timeout(Duration::from_millis(SERIAL_WRITE_TIMEOUT_MS))
            .open()
            .map_err(|e| TriggerError::SerialOpen {
                port: port_name.to_string(),
                source: std::io::Error::other(e.to_string()),
            })
    }
}
