//! embedded-hal I2C bus adapter
//!
//! This adapter implements the BusProbePort trait on top of any blocking
//! embedded-hal 1.0 `I2c` implementation, such as embassy-rp's
//! `I2c<'_, T, Blocking>`.

use embedded_hal::i2c::{Error as _, I2c};

use crate::domain::{Address, BusId, ProbeOutcome};
use crate::ports::bus_probe::BusProbePort;

/// Transaction used to test an address
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ProbeMethod {
    /// Address-only write with no payload
    EmptyWrite,
    /// Read a single byte
    ///
    /// For controllers that cannot put an address on the bus without
    /// data, like the RP2040's.
    ReadByte,
}

/// How the adapter probes
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ProbeOptions {
    pub method: ProbeMethod,
    /// Report reserved addresses as `Rejected` without touching the bus
    pub skip_reserved: bool,
}

impl Default for ProbeOptions {
    fn default() -> Self {
        Self {
            method: ProbeMethod::EmptyWrite,
            skip_reserved: false,
        }
    }
}

impl ProbeOptions {
    /// Settings for embassy-rp on the RP2040
    ///
    /// Its driver rejects empty writes and reserved addresses with errors
    /// that would otherwise surface as unknown errors.
    ///
    /// Reserved addresses (0x01-0x07, 0x78-0x7E) are therefore never put on
    /// the bus: they are still visited but reported as
    /// [`ProbeOutcome::Rejected`].
    pub const RP2040: Self = Self {
        method: ProbeMethod::ReadByte,
        skip_reserved: true,
    };
}

/// embedded-hal adapter implementing BusProbePort
pub struct HalBusProbe<I: I2c> {
    i2c: I,
    bus_id: BusId,
    options: ProbeOptions,
}

impl<I: I2c> HalBusProbe<I> {
    /// Create an adapter that probes with zero-length writes
    pub fn new(i2c: I, bus_id: BusId) -> Self {
        Self::with_options(i2c, bus_id, ProbeOptions::default())
    }

    /// Create an adapter with explicit probe options
    pub fn with_options(i2c: I, bus_id: BusId, options: ProbeOptions) -> Self {
        Self {
            i2c,
            bus_id,
            options,
        }
    }

    pub fn options(&self) -> ProbeOptions {
        self.options
    }

    /// Release the underlying I2C bus
    pub fn release(self) -> I {
        self.i2c
    }
}

impl<I: I2c> BusProbePort for HalBusProbe<I> {
    fn probe(&mut self, address: Address) -> ProbeOutcome {
        if self.options.skip_reserved && address.is_reserved() {
            return ProbeOutcome::Rejected;
        }

        let result = match self.options.method {
            ProbeMethod::EmptyWrite => self.i2c.write(address.value(), &[]),
            ProbeMethod::ReadByte => {
                let mut byte = [0u8; 1];
                self.i2c.read(address.value(), &mut byte)
            }
        };

        match result {
            Ok(()) => ProbeOutcome::Acknowledged,
            Err(e) => {
                let outcome = ProbeOutcome::from_error_kind(e.kind());
                #[cfg(feature = "defmt")]
                if outcome != ProbeOutcome::NotAcknowledged {
                    defmt::debug!("{}: probe {} failed: {}", self.bus_id, address, outcome);
                }
                outcome
            }
        }
    }

    fn bus_id(&self) -> BusId {
        self.bus_id
    }
}
