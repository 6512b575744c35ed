//! Trigger Ports - USB serial discovery and NeuroSpec trigger-box output
//!
//! Usage:
//!   trigger-ports list                      List connected USB serial devices
//!   trigger-ports send 8                    Write byte 8 to the trigger box
//!   trigger-ports send --pulse 8 16         Pulse each byte, resetting to 0
//!   trigger-ports send --port COM5 1        Use an explicit port

use clap::Parser;
use std::process::ExitCode;
use std::time::Duration;
use tracing::error;
use trigger_ports::cli::{Cli, Command};
use trigger_ports::config::{settings_or_default, ConfigLocations, Settings};
use trigger_ports::platform::{Platform, SystemShell};
use trigger_ports::ports;
use trigger_ports::trigger::{PortResolver, SystemSerial, TriggerPort};
use trigger_ports::{Result, TriggerError, Verbosity};

fn main() -> ExitCode {
    let cli = Cli::parse();

    let locations = cli
        .config_dir
        .clone()
        .map(ConfigLocations::new)
        .or_else(ConfigLocations::user_default);
    let loaded = locations
        .as_ref()
        .map(ConfigLocations::settings)
        .unwrap_or_else(|| Ok(Settings::default()));

    // A broken settings file can't supply the verbosity; fall back to the default level
    let configured = loaded
        .as_ref()
        .map(|s| s.logging.verbosity)
        .unwrap_or_default();
    let verbosity = match cli.verbosity.map(Verbosity::try_from).transpose() {
        Ok(v) => v.unwrap_or(configured),
        Err(e) => {
            eprintln!("{}", e);
            return ExitCode::FAILURE;
        }
    };
    trigger_ports::logging::init_tracing(verbosity);
    let settings = settings_or_default(loaded);

    match run(cli.command, locations, settings, verbosity) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", error_chain(&e));
            ExitCode::FAILURE
        }
    }
}

fn run(
    command: Command,
    locations: Option<ConfigLocations>,
    settings: Settings,
    verbosity: Verbosity,
) -> Result<()> {
    let platform = Platform::current().ok_or(TriggerError::PlatformNotSupported)?;

    match command {
        Command::List => {
            for entry in ports::list_ports_on(platform, &SystemShell, verbosity) {
                println!("{}\t{}", entry.identifier, entry.port_name);
            }
            Ok(())
        }
        Command::Send {
            port_file,
            port,
            pulse,
            pulse_ms,
            bytes,
        } => {
            let pulse_ms = pulse_ms.unwrap_or(settings.trigger.pulse_ms);
            let mut trigger = match port {
                Some(name) => TriggerPort::open_named(&SystemSerial, name)?,
                None => {
                    let resolver = PortResolver {
                        platform,
                        runner: &SystemShell,
                        locations,
                        settings,
                        verbosity,
                    };
                    TriggerPort::open_with(&SystemSerial, &resolver, port_file.as_deref())?
                }
            };

            if pulse {
                let width = Duration::from_millis(pulse_ms);
                for byte in bytes {
                    trigger.pulse(byte, width)?;
                }
            } else {
                trigger.write(&bytes)?;
            }
            Ok(())
        }
    }
}

fn error_chain(e: &TriggerError) -> String {
    let mut message = e.to_string();
    let mut source = std::error::Error::source(e);
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}
