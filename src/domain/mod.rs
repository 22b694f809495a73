//! Domain layer - scan semantics independent of any HAL
//!
//! This module contains the values a sweep works with (addresses, probe
//! outcomes, bus identity) and the report it produces.

pub mod address;
pub mod bus;
pub mod probe;
pub mod report;

pub use address::Address;
pub use bus::{rp2040_pin_pairs, BusId, BusPins, I2cInstance, PinRole};
pub use probe::{Disposition, ProbeOutcome};
pub use report::{DualScanReport, Finding, FindingKind, ScanReport, MAX_FINDINGS};
