//! Bus probe port - abstraction over one physical I2C bus
//!
//! The scanner only needs to ask "does anything answer at this address?".
//! This trait lets it do that without knowing which controller, driver or
//! pin pair sits behind the bus.

use crate::domain::{Address, BusId, ProbeOutcome};

/// Port for address-presence probing on one bus
///
/// Implementations issue a single address-only transaction per call and
/// block until the controller reports completion. They must not retry.
///
/// # Example Implementation
///
/// ```ignore
/// struct Wire<I: I2c> {
///     i2c: I,
/// }
///
/// impl<I: I2c> BusProbePort for Wire<I> {
///     fn probe(&mut self, address: Address) -> ProbeOutcome {
///         match self.i2c.write(address.value(), &[]) {
///             Ok(()) => ProbeOutcome::Acknowledged,
///             Err(e) => ProbeOutcome::from_error_kind(e.kind()),
///         }
///     }
///
///     fn bus_id(&self) -> BusId { BusId::Primary }
/// }
/// ```
pub trait BusProbePort {
    /// Probe one address with a zero-length transaction
    fn probe(&mut self, address: Address) -> ProbeOutcome;

    /// Which bus this handle drives
    fn bus_id(&self) -> BusId;
}
