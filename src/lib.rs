//! Trigger Ports - USB serial discovery and NeuroSpec trigger-box output
//!
//! - [`ports`] lists connected serial devices as (identifier, port name) pairs
//! - [`trigger`] opens the trigger box at 9600 baud and writes bytes to it

pub mod cli;
pub mod config;
pub mod constants;
pub mod error;
pub mod logging;
pub mod platform;
pub mod ports;
pub mod trigger;

pub use error::{Result, TriggerError};
pub use logging::Verbosity;
pub use ports::{list_ports, PortEntry, PortList};
pub use trigger::{PortResolver, PortSource, TriggerPort};
