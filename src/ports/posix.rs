//! macOS and Linux device path parsing
//!
//! Device identifiers are pulled out of the path by naming convention.
//! Paths that don't follow the convention go through a documented fallback
//! instead of failing the listing.

use crate::constants::LINUX_DEVICE_PREFIX_LEN;

/// Result of splitting a device path into class prefix and identifier
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeviceName {
    /// Path followed the `<prefix>-<identifier>` convention
    Parsed { prefix: String, identifier: String },
    /// Convention not met; identifier derived by the fallback rule
    Fallback { identifier: String },
}

impl DeviceName {
    pub fn identifier(&self) -> &str {
        match self {
            Self::Parsed { identifier, .. } | Self::Fallback { identifier } => identifier,
        }
    }

    pub fn into_identifier(self) -> String {
        match self {
            Self::Parsed { identifier, .. } | Self::Fallback { identifier } => identifier,
        }
    }
}

fn basename(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or(path)
}

/// Parse a macOS `/dev/tty.*` or `/dev/cu.*` path
///
/// `/dev/tty.usbserial-A700elGZ` gives `Parsed { "usbserial", "A700elGZ" }`;
/// `/dev/tty.usbmodem1234` has no `-` and gives `Fallback { "usbmodem1234" }`.
pub fn parse_macos_device(path: &str) -> DeviceName {
    let name = basename(path);
    let suffix = name.rsplit_once('.').map_or(name, |(_, s)| s);

    match suffix.rsplit_once('-') {
        Some((prefix, identifier)) => DeviceName::Parsed {
            prefix: prefix.to_string(),
            identifier: identifier.to_string(),
        },
        None => DeviceName::Fallback {
            identifier: suffix.to_string(),
        },
    }
}

/// Parse a Linux `/dev/ttyUSB*` or `/dev/ttyACM*` path
///
/// A basename with exactly one `-` splits into prefix and identifier.
/// Otherwise everything after the first `LINUX_DEVICE_PREFIX_LEN`
/// characters of the path is the identifier (`/dev/ttyUSB0` gives `"0"`).
/// When the path ends at or before that boundary, the whole basename is used.
///
/// The fixed boundary only matches the `/dev/ttyUSB` and `/dev/ttyACM`
/// spellings; other kernel names produce a best-effort identifier.
pub fn parse_linux_device(path: &str) -> DeviceName {
    let name = basename(path);
    let parts: Vec<&str> = name.split('-').collect();

    if let [prefix, identifier] = parts.as_slice() {
        return DeviceName::Parsed {
            prefix: prefix.to_string(),
            identifier: identifier.to_string(),
        };
    }

    let identifier = match path.get(LINUX_DEVICE_PREFIX_LEN..) {
        Some(rest) if !rest.is_empty() => rest,
        _ => name,
    };
    DeviceName::Fallback {
        identifier: identifier.to_string(),
    }
}
