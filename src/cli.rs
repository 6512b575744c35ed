//! Command-line interface definition using clap
//!
//! Provides structured argument parsing with automatic help generation.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

// =============================================================================
// CLI Definition
// =============================================================================

/// USB serial discovery and NeuroSpec trigger-box output
#[derive(Parser, Debug)]
#[command(name = "trigger-ports")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Output level: 0 silent, 1 warnings, 2 per-device info, 3 command echo
    /// (default: settings file, else 1)
    #[arg(short, long, value_name = "LEVEL", value_parser = clap::value_parser!(u8).range(0..=3))]
    pub verbosity: Option<u8>,

    /// Config directory (default: <documents>/NeuroSpec)
    #[arg(long, value_name = "DIR", global = true)]
    pub config_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List connected USB serial devices
    List,

    /// Open the trigger port and write bytes to it
    Send {
        /// File whose trimmed contents name the port
        #[arg(long, value_name = "PATH")]
        port_file: Option<PathBuf>,

        /// Serial port to use (skips config and discovery)
        #[arg(long, value_name = "PORT", conflicts_with = "port_file")]
        port: Option<String>,

        /// Send each byte as a pulse, resetting the line to 0 afterwards
        #[arg(long)]
        pulse: bool,

        /// Pulse width in milliseconds (default: settings file, else 10)
        #[arg(long, value_name = "MS", requires = "pulse")]
        pulse_ms: Option<u64>,

        /// Byte values to write (0-255)
        #[arg(required = true, value_name = "BYTE")]
        bytes: Vec<u8>,
    },
}

// =============================================================================
// Tests
// =============================================================================
