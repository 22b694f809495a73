//! I2C address domain value
//!
//! A 7-bit bus address and the sweep over the probeable part of the
//! address space.

use core::fmt;
use core::ops::RangeInclusive;

/// A 7-bit I2C device address.
///
/// Wraps the raw byte so an out-of-range value (>= 0x80) can never reach
/// a probe.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Address(u8);

impl Address {
    /// General call address, never probed
    pub const GENERAL_CALL: Address = Address(0x00);

    /// First address of a sweep
    pub const FIRST_PROBED: Address = Address(0x01);

    /// Last address of a sweep (0x7F is left out)
    pub const LAST_PROBED: Address = Address(0x7E);

    /// Highest 7-bit address
    pub const MAX: Address = Address(0x7F);

    /// Create an address from a raw value
    ///
    /// Returns `None` for values that do not fit in 7 bits.
    pub const fn new(raw: u8) -> Option<Self> {
        if raw <= Self::MAX.0 {
            Some(Self(raw))
        } else {
            None
        }
    }

    /// Get the raw 7-bit value
    pub const fn value(&self) -> u8 {
        self.0
    }

    /// Whether the I2C specification reserves this address
    ///
    /// Covers 0x00-0x07 (general call, CBUS, HS-mode master codes...) and
    /// 0x78-0x7F (10-bit addressing, device ID).
    pub const fn is_reserved(&self) -> bool {
        self.0 < 0x08 || self.0 > 0x77
    }

    /// Every address a full sweep visits, in ascending order (0x01..=0x7E)
    pub fn sweep() -> impl Iterator<Item = Address> + Clone {
        Self::range(Self::FIRST_PROBED, Self::LAST_PROBED)
    }

    /// Addresses from `first` to `last` inclusive
    pub fn range(first: Address, last: Address) -> impl Iterator<Item = Address> + Clone {
        let raw: RangeInclusive<u8> = first.0..=last.0;
        raw.map(Address)
    }
}

impl From<Address> for u8 {
    fn from(address: Address) -> u8 {
        address.0
    }
}

/// Renders as `0xHH`: uppercase, zero-padded to two digits.
impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:02X}", self.0)
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for Address {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "0x{=u8:02X}", self.0)
    }
}
