//! Console line protocol shared between the scanner firmware and the host
//! monitor
//!
//! The report is plain text, one `ReportLine` per line, terminated with
//! `\r\n` on the wire. The device renders lines through `Display`; the host
//! turns received text back into `ReportLine` with [`ReportLine::parse`].

use core::fmt;

use crate::domain::{Address, BusId};

/// Line terminator written after every report line
pub const LINE_ENDING: &str = "\r\n";

/// Longest rendered line, terminator included
pub const MAX_LINE_LEN: usize = 64;

const TITLE: &str = "Dual I2C Bus Scanner";
const TITLE_RULE: &str = "-------------------";
const SCANNING: &str = "Scanning...";
const DEVICE_FOUND_PREFIX: &str = "I2C device found at address ";
const DEVICE_FOUND_SUFFIX: &str = "  !";
const UNKNOWN_ERROR_PREFIX: &str = "Unknown error at address ";
const NO_DEVICES: &str = "No I2C devices found";
const DONE: &str = "done";

/// One line of the scanner's console output
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ReportLine {
    /// Empty separator line
    Blank,
    /// `Dual I2C Bus Scanner`
    Title,
    /// Dash rule under the title
    TitleRule,
    /// Section header for one bus
    Banner(BusId),
    /// `Scanning...`
    Scanning,
    /// `I2C device found at address 0xHH  !`
    DeviceFound(Address),
    /// `Unknown error at address 0xHH`
    UnknownError(Address),
    /// Bus summary when nothing acknowledged
    NoDevices,
    /// Bus summary when at least one device acknowledged
    Done,
}

impl ReportLine {
    /// Parse one received line
    ///
    /// Trailing whitespace (including `\r`) is ignored. Returns `None` for
    /// text that is not part of the report, such as boot noise.
    pub fn parse(line: &str) -> Option<Self> {
        let line = line.trim_end();

        let parsed = match line {
            "" => ReportLine::Blank,
            TITLE => ReportLine::Title,
            TITLE_RULE => ReportLine::TitleRule,
            SCANNING => ReportLine::Scanning,
            NO_DEVICES => ReportLine::NoDevices,
            DONE => ReportLine::Done,
            _ => {
                if let Some(bus) = BusId::ALL.into_iter().find(|bus| bus.banner() == line) {
                    ReportLine::Banner(bus)
                } else if let Some(rest) = line.strip_prefix(DEVICE_FOUND_PREFIX) {
                    let hex = rest.trim_end_matches('!').trim_end();
                    ReportLine::DeviceFound(parse_hex_address(hex)?)
                } else if let Some(rest) = line.strip_prefix(UNKNOWN_ERROR_PREFIX) {
                    ReportLine::UnknownError(parse_hex_address(rest)?)
                } else {
                    return None;
                }
            }
        };

        Some(parsed)
    }

    /// Whether this line closes a bus section
    pub const fn is_summary(&self) -> bool {
        matches!(self, ReportLine::NoDevices | ReportLine::Done)
    }
}

impl fmt::Display for ReportLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReportLine::Blank => Ok(()),
            ReportLine::Title => f.write_str(TITLE),
            ReportLine::TitleRule => f.write_str(TITLE_RULE),
            ReportLine::Banner(bus) => f.write_str(bus.banner()),
            ReportLine::Scanning => f.write_str(SCANNING),
            ReportLine::DeviceFound(address) => {
                write!(f, "{}{}{}", DEVICE_FOUND_PREFIX, address, DEVICE_FOUND_SUFFIX)
            }
            ReportLine::UnknownError(address) => write!(f, "{}{}", UNKNOWN_ERROR_PREFIX, address),
            ReportLine::NoDevices => f.write_str(NO_DEVICES),
            ReportLine::Done => f.write_str(DONE),
        }
    }
}

/// Parse `0xHH` (either case) into an address
fn parse_hex_address(s: &str) -> Option<Address> {
    let digits = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X"))?;
    if digits.is_empty() || digits.len() > 2 {
        return None;
    }
    let raw = u8::from_str_radix(digits, 16).ok()?;
    Address::new(raw)
}
