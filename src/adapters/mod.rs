//! Adapters - concrete implementations of ports
//!
//! - **hal_bus**: any blocking embedded-hal 1.0 I2C bus
//! - **usb_cdc**: USB CDC serial console (feature `usb`)

pub mod hal_bus;
#[cfg(feature = "usb")]
pub mod usb_cdc;

pub use hal_bus::{HalBusProbe, ProbeMethod, ProbeOptions};
#[cfg(feature = "usb")]
pub use usb_cdc::{UsbCdcConsole, USB_PACKET_SIZE};
