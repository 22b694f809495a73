//! Ports (interfaces) defining the boundaries of the application
//!
//! - **BusProbePort**: how we ask a bus whether an address answers
//!   (embedded-hal I2C, test doubles)
//! - **ConsolePort**: how we publish the report (USB CDC, test doubles)

pub mod bus_probe;
pub mod console;

pub use bus_probe::BusProbePort;
pub use console::{ConsoleError, ConsolePort};
