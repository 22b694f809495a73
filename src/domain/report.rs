//! Scan report domain entity
//!
//! The value a single sweep returns. Each scan builds its own report, so
//! one bus's results can never leak into the other's.

use heapless::Vec;

use crate::console_protocol::ReportLine;
use crate::domain::{Address, BusId, Disposition, ProbeOutcome};

/// Maximum findings a report can hold (one per 7-bit address)
pub const MAX_FINDINGS: usize = 128;

/// Kind of a listed address
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FindingKind {
    /// A device acknowledged
    Device,
    /// The controller reported an unspecified error
    UnknownError,
}

/// An address that made it into the report
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Finding {
    pub address: Address,
    pub kind: FindingKind,
}

impl Finding {
    /// Console line for this finding
    pub const fn line(&self) -> ReportLine {
        match self.kind {
            FindingKind::Device => ReportLine::DeviceFound(self.address),
            FindingKind::UnknownError => ReportLine::UnknownError(self.address),
        }
    }
}

/// Result of sweeping one bus
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScanReport {
    bus: BusId,
    /// Listed addresses, in sweep order
    findings: Vec<Finding, MAX_FINDINGS>,
    visited: u8,
    device_count: u8,
}

impl ScanReport {
    /// Empty report for `bus`
    pub const fn new(bus: BusId) -> Self {
        Self {
            bus,
            findings: Vec::new(),
            visited: 0,
            device_count: 0,
        }
    }

    /// Account for one probed address
    pub(crate) fn record(&mut self, address: Address, outcome: ProbeOutcome) {
        self.visited = self.visited.saturating_add(1);

        let kind = match outcome.disposition() {
            Disposition::Device => {
                self.device_count = self.device_count.saturating_add(1);
                FindingKind::Device
            }
            Disposition::Report => FindingKind::UnknownError,
            Disposition::Ignore => return,
        };

        // One finding per address at most, so the capacity covers a full sweep
        let _ = self.findings.push(Finding { address, kind });
    }

    pub fn bus(&self) -> BusId {
        self.bus
    }

    /// Every listed address in sweep order
    pub fn findings(&self) -> &[Finding] {
        &self.findings
    }

    /// Addresses that acknowledged
    pub fn devices(&self) -> impl Iterator<Item = Address> + '_ {
        self.addresses_of(FindingKind::Device)
    }

    /// Addresses that returned the unspecified error
    pub fn unknown_errors(&self) -> impl Iterator<Item = Address> + '_ {
        self.addresses_of(FindingKind::UnknownError)
    }

    fn addresses_of(&self, kind: FindingKind) -> impl Iterator<Item = Address> + '_ {
        self.findings
            .iter()
            .filter(move |f| f.kind == kind)
            .map(|f| f.address)
    }

    /// Number of acknowledged addresses
    pub fn device_count(&self) -> u8 {
        self.device_count
    }

    /// Number of addresses probed
    pub fn visited(&self) -> u8 {
        self.visited
    }

    /// True when no device acknowledged
    pub fn is_empty(&self) -> bool {
        self.device_count == 0
    }

    /// Closing line of the bus section
    pub fn summary(&self) -> ReportLine {
        if self.is_empty() {
            ReportLine::NoDevices
        } else {
            ReportLine::Done
        }
    }

    /// The bus section as console lines
    ///
    /// A blank separator, the banner, `Scanning...`, one line per finding
    /// and the summary.
    pub fn lines(&self) -> impl Iterator<Item = ReportLine> + '_ {
        [
            ReportLine::Blank,
            ReportLine::Banner(self.bus),
            ReportLine::Scanning,
        ]
        .into_iter()
        .chain(self.findings.iter().map(Finding::line))
        .chain(core::iter::once(self.summary()))
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for ScanReport {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(
            f,
            "ScanReport {{ bus: {}, visited: {=u8}, devices: {=u8}, listed: {=usize} }}",
            self.bus,
            self.visited,
            self.device_count,
            self.findings.len()
        )
    }
}

/// Reports of both buses, in scan order
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DualScanReport {
    pub primary: ScanReport,
    pub secondary: ScanReport,
}

impl DualScanReport {
    /// The full console output: title block followed by both bus sections
    pub fn lines(&self) -> impl Iterator<Item = ReportLine> + '_ {
        [ReportLine::Title, ReportLine::TitleRule]
            .into_iter()
            .chain(self.primary.lines())
            .chain(self.secondary.lines())
    }

    /// Total acknowledged addresses across both buses
    pub fn device_count(&self) -> u16 {
        u16::from(self.primary.device_count()) + u16::from(self.secondary.device_count())
    }
}
