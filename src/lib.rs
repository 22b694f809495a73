//! Dual I2C Bus Scanner Library
//!
//! Probes two independent I2C buses for responding device addresses and
//! renders the result as a fixed-format text report. The library is
//! `no_std`; the RP2040 firmware lives in `demos/`, the host monitor in
//! `src/bin/`.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                     Domain Layer                                 │
//! │  - Address, BusId, ProbeOutcome values                           │
//! │  - ScanReport / DualScanReport entities                          │
//! └─────────────────────────────────────────────────────────────────┘
//!                               │
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                     Ports (Traits)                               │
//! │  - BusProbePort: probe one address on one bus                    │
//! │  - ConsolePort: publish report lines to a host                   │
//! └─────────────────────────────────────────────────────────────────┘
//!                               │
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                     Adapters                                     │
//! │  - HalBusProbe: any embedded-hal 1.0 blocking I2C bus            │
//! │  - UsbCdcConsole: USB CDC serial                                 │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! `BusScanner` sits on top and runs the same sweep on whichever bus it
//! is handed.

#![cfg_attr(not(any(test, feature = "std")), no_std)]

// ============================================================================
// Protocol (shared between host and device)
// ============================================================================

pub mod console_protocol;

pub use console_protocol::{ReportLine, LINE_ENDING, MAX_LINE_LEN};

// ============================================================================
// Hexagonal Architecture
// ============================================================================

/// Domain layer - scan values and reports
pub mod domain;

/// Ports - traits defining boundaries
pub mod ports;

/// Adapters - concrete implementations
pub mod adapters;

/// Scanner service
pub mod scanner;

pub use domain::{Address, BusId, BusPins, DualScanReport, ProbeOutcome, ScanReport};
pub use ports::{BusProbePort, ConsoleError, ConsolePort};
pub use adapters::{HalBusProbe, ProbeMethod, ProbeOptions};
#[cfg(feature = "usb")]
pub use adapters::UsbCdcConsole;
pub use scanner::{BusScanner, ScanConfig};
