//! Probe outcome domain value
//!
//! Classifies the completion status of one address-only transaction and
//! decides what the scanner does with it.

use embedded_hal::i2c::ErrorKind;

/// Outcome of a zero-length write to one address
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ProbeOutcome {
    /// A device pulled SDA low during the address phase
    Acknowledged,
    /// Nobody answered
    NotAcknowledged,
    /// Bus fault, arbitration loss or overrun
    BusError,
    /// Unspecified controller error
    UnknownError,
    /// The driver refused to put the address on the bus
    Rejected,
}

/// What the scanner does with a probe outcome
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Disposition {
    /// Count it and list it
    Device,
    /// List it as an error, do not count it
    Report,
    /// Skip silently
    Ignore,
}

impl ProbeOutcome {
    /// Map an embedded-hal error kind to an outcome
    ///
    /// Only `ErrorKind::Other` becomes `UnknownError`; every other failure
    /// besides a NACK is a `BusError`.
    pub fn from_error_kind(kind: ErrorKind) -> Self {
        match kind {
            ErrorKind::NoAcknowledge(_) => ProbeOutcome::NotAcknowledged,
            ErrorKind::Other => ProbeOutcome::UnknownError,
            ErrorKind::Bus | ErrorKind::ArbitrationLoss | ErrorKind::Overrun => {
                ProbeOutcome::BusError
            }
            _ => ProbeOutcome::BusError,
        }
    }

    pub const fn disposition(&self) -> Disposition {
        match self {
            ProbeOutcome::Acknowledged => Disposition::Device,
            ProbeOutcome::UnknownError => Disposition::Report,
            ProbeOutcome::NotAcknowledged | ProbeOutcome::BusError | ProbeOutcome::Rejected => {
                Disposition::Ignore
            }
        }
    }
}
