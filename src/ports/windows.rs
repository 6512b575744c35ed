//! Windows `mode` output parsing

use super::{PortEntry, PortList};

/// Extract every `COM<digits>:` device from `mode` output
///
/// Entries are ordered by COM number, highest first. Equal numbers keep
/// their order of appearance.
pub fn parse_mode_output(output: &str) -> PortList {
    let mut found: Vec<(u32, PortEntry)> = Vec::new();
    let mut rest = output;

    while let Some(pos) = rest.find("COM") {
        let after = &rest[pos + 3..];
        let digits = after.bytes().take_while(|b| b.is_ascii_digit()).count();

        if digits > 0 && after[digits..].starts_with(':') {
            let number = &after[..digits];
            if let Ok(index) = number.parse::<u32>() {
                found.push((index, PortEntry::new(number, format!("COM{}", number))));
            }
        }
        rest = after;
    }

    found.sort_by(|a, b| b.0.cmp(&a.0));
    found.into_iter().map(|(_, entry)| entry).collect()
}
