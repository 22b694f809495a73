//! USB CDC console adapter
//!
//! This adapter implements the ConsolePort trait for USB CDC ACM
//! (serial over USB), the way the KB2040 shows up on the host.

use crate::ports::console::{ConsoleError, ConsolePort};
use embassy_time::{Duration, Timer};
use embassy_usb::class::cdc_acm::CdcAcmClass;
use embassy_usb::driver::EndpointError;

/// USB packet size (CDC ACM max)
pub const USB_PACKET_SIZE: usize = 64;

/// Default sleep while waiting for DTR changes
pub const DEFAULT_IDLE_INTERVAL: Duration = Duration::from_millis(10);

/// USB CDC console adapter
///
/// Writes text in packet-sized chunks over a CDC ACM class. The host
/// counts as listening while it holds DTR high.
pub struct UsbCdcConsole<'a, D: embassy_usb::driver::Driver<'a>> {
    /// USB CDC ACM class instance
    class: CdcAcmClass<'a, D>,
    idle_interval: Duration,
}

impl<'a, D: embassy_usb::driver::Driver<'a>> UsbCdcConsole<'a, D> {
    /// Create a new USB CDC console
    pub fn new(class: CdcAcmClass<'a, D>) -> Self {
        Self::with_idle_interval(class, DEFAULT_IDLE_INTERVAL)
    }

    /// Create a console that sleeps `idle_interval` between DTR checks
    pub fn with_idle_interval(class: CdcAcmClass<'a, D>, idle_interval: Duration) -> Self {
        Self {
            class,
            idle_interval,
        }
    }

    /// Get the underlying CdcAcmClass
    pub fn class(&self) -> &CdcAcmClass<'a, D> {
        &self.class
    }
}

/// Map an endpoint failure to the console error
fn endpoint_error(e: EndpointError) -> ConsoleError {
    match e {
        EndpointError::Disabled => ConsoleError::Disconnected,
        _ => ConsoleError::WriteFailed,
    }
}

impl<'a, D: embassy_usb::driver::Driver<'a>> ConsolePort for UsbCdcConsole<'a, D> {
    /// Returns once the device is configured, not when the host opens
    /// the port
    async fn wait_connection(&mut self) {
        self.class.wait_connection().await;
    }

    fn is_connected(&self) -> bool {
        self.class.dtr()
    }

    async fn write(&mut self, data: &[u8]) -> Result<(), ConsoleError> {
        if !self.is_connected() {
            return Err(ConsoleError::NotConnected);
        }

        for chunk in data.chunks(USB_PACKET_SIZE) {
            self.class.write_packet(chunk).await.map_err(endpoint_error)?;
        }

        // A full-size final packet needs a ZLP to end the transfer
        if data.len() % USB_PACKET_SIZE == 0 && !data.is_empty() {
            self.class.write_packet(&[]).await.map_err(endpoint_error)?;
        }

        Ok(())
    }

    async fn idle(&mut self) {
        Timer::after(self.idle_interval).await;
    }
}
