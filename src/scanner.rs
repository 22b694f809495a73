//! Bus scanner service
//!
//! One sweep routine shared by both buses. It probes every address in the
//! configured range exactly once, never stops early, and hands back a
//! fresh `ScanReport` per call.

use crate::domain::{Address, DualScanReport, ScanReport};
use crate::ports::bus_probe::BusProbePort;

/// Address range of a sweep
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ScanConfig {
    /// First address probed
    pub first: Address,
    /// Last address probed (inclusive)
    pub last: Address,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            first: Address::FIRST_PROBED,
            last: Address::LAST_PROBED,
        }
    }
}

impl ScanConfig {
    /// Only the addresses the I2C specification leaves to devices
    /// (0x08..=0x77)
    pub const fn unreserved() -> Self {
        Self {
            first: match Address::new(0x08) {
                Some(a) => a,
                None => Address::FIRST_PROBED,
            },
            last: match Address::new(0x77) {
                Some(a) => a,
                None => Address::LAST_PROBED,
            },
        }
    }
}

/// Sweeps a bus and reports what answered
#[derive(Clone, Copy, Debug, Default)]
pub struct BusScanner {
    config: ScanConfig,
}

impl BusScanner {
    pub const fn new(config: ScanConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> ScanConfig {
        self.config
    }

    /// Sweep one bus
    ///
    /// Every address in the range is probed once, in ascending order,
    /// whatever the earlier probes returned.
    pub fn scan<B: BusProbePort>(&self, bus: &mut B) -> ScanReport {
        let mut report = ScanReport::new(bus.bus_id());

        #[cfg(feature = "defmt")]
        defmt::info!(
            "Scanning {} bus ({}..={})",
            report.bus(),
            self.config.first,
            self.config.last
        );

        for address in Address::range(self.config.first, self.config.last) {
            let outcome = bus.probe(address);
            report.record(address, outcome);
        }

        #[cfg(feature = "defmt")]
        defmt::info!("{}", report);

        report
    }

    /// Sweep the primary bus, then the secondary bus
    pub fn scan_both<P, S>(&self, primary: &mut P, secondary: &mut S) -> DualScanReport
    where
        P: BusProbePort,
        S: BusProbePort,
    {
        let primary = self.scan(primary);
        let secondary = self.scan(secondary);
        DualScanReport { primary, secondary }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::console_protocol::ReportLine;
    use crate::domain::{BusId, ProbeOutcome};

    /// Scripted bus recording every probed address
    struct FakeBus {
        bus_id: BusId,
        devices: &'static [u8],
        unknown: &'static [u8],
        bus_errors: &'static [u8],
        visits: [u8; 128],
    }

    impl FakeBus {
        fn new(bus_id: BusId, devices: &'static [u8]) -> Self {
            Self {
                bus_id,
                devices,
                unknown: &[],
                bus_errors: &[],
                visits: [0; 128],
            }
        }
    }

    impl BusProbePort for FakeBus {
        fn probe(&mut self, address: Address) -> ProbeOutcome {
            let raw = address.value();
            self.visits[raw as usize] += 1;
            if self.devices.contains(&raw) {
                ProbeOutcome::Acknowledged
            } else if self.unknown.contains(&raw) {
                ProbeOutcome::UnknownError
            } else if self.bus_errors.contains(&raw) {
                ProbeOutcome::BusError
            } else {
                ProbeOutcome::NotAcknowledged
            }
        }

        fn bus_id(&self) -> BusId {
            self.bus_id
        }
    }

    fn addr(raw: u8) -> Address {
        Address::new(raw).unwrap()
    }

    fn render(lines: impl Iterator<Item = ReportLine>) -> String {
        lines.map(|l| format!("{}\n", l)).collect()
    }

    #[test]
    fn test_every_address_visited_once() {
        let mut bus = FakeBus::new(BusId::Primary, &[0x08, 0x3C]);
        bus.unknown = &[0x01, 0x40];
        bus.bus_errors = &[0x02, 0x41];

        let report = BusScanner::default().scan(&mut bus);

        assert_eq!(report.visited(), 126);
        assert_eq!(bus.visits[0], 0);
        assert_eq!(bus.visits[127], 0);
        assert!(bus.visits[1..=126].iter().all(|&n| n == 1));
    }

    #[test]
    fn test_device_count_matches_acks() {
        let mut bus = FakeBus::new(BusId::Primary, &[0x10, 0x20, 0x68]);
        bus.unknown = &[0x11];

        let report = BusScanner::default().scan(&mut bus);

        assert_eq!(report.device_count(), 3);
        assert_eq!(
            report.devices().collect::<Vec<_>>(),
            [addr(0x10), addr(0x20), addr(0x68)]
        );
        assert_eq!(report.unknown_errors().collect::<Vec<_>>(), [addr(0x11)]);
    }

    #[test]
    fn test_single_device_at_0x3c() {
        let mut bus = FakeBus::new(BusId::Primary, &[0x3C]);
        let report = BusScanner::default().scan(&mut bus);

        let found: Vec<ReportLine> = report
            .lines()
            .filter(|l| matches!(l, ReportLine::DeviceFound(_)))
            .collect();
        assert_eq!(found, [ReportLine::DeviceFound(addr(0x3C))]);
        assert_eq!(report.lines().last(), Some(ReportLine::Done));
    }

    #[test]
    fn test_empty_bus() {
        let mut bus = FakeBus::new(BusId::Secondary, &[]);
        let report = BusScanner::default().scan(&mut bus);

        assert_eq!(report.device_count(), 0);
        assert_eq!(report.lines().last(), Some(ReportLine::NoDevices));
        assert!(!report.lines().any(|l| l == ReportLine::Done));
    }

    #[test]
    fn test_unknown_errors_alone_do_not_count() {
        let mut bus = FakeBus::new(BusId::Secondary, &[]);
        bus.unknown = &[0x22];
        let report = BusScanner::default().scan(&mut bus);

        assert_eq!(report.device_count(), 0);
        assert_eq!(
            render(report.lines()),
            "\n\
             ---------- Scanning Secondary I2C Bus ------------\n\
             Scanning...\n\
             Unknown error at address 0x22\n\
             No I2C devices found\n"
        );
    }

    #[test]
    fn test_buses_are_independent() {
        let mut bus_a = FakeBus::new(BusId::Primary, &[0x3C, 0x76]);
        let mut bus_b = FakeBus::new(BusId::Secondary, &[]);

        let report = BusScanner::default().scan_both(&mut bus_a, &mut bus_b);

        assert_eq!(report.primary.device_count(), 2);
        assert_eq!(report.secondary.device_count(), 0);
        assert_eq!(report.secondary.summary(), ReportLine::NoDevices);
        assert_eq!(report.device_count(), 2);
    }

    #[test]
    fn test_full_report_text() {
        let mut bus_a = FakeBus::new(BusId::Primary, &[0x3C]);
        let mut bus_b = FakeBus::new(BusId::Secondary, &[]);

        let report = BusScanner::default().scan_both(&mut bus_a, &mut bus_b);

        assert_eq!(
            render(report.lines()),
            "Dual I2C Bus Scanner\n\
             -------------------\n\
             \n\
             ---------- Scanning Primary I2C Bus -------------\n\
             Scanning...\n\
             I2C device found at address 0x3C  !\n\
             done\n\
             \n\
             ---------- Scanning Secondary I2C Bus ------------\n\
             Scanning...\n\
             No I2C devices found\n"
        );
    }

    #[test]
    fn test_custom_range() {
        let mut bus = FakeBus::new(BusId::Primary, &[0x05, 0x3C]);
        let report = BusScanner::new(ScanConfig::unreserved()).scan(&mut bus);

        assert_eq!(report.visited(), 0x77 - 0x08 + 1);
        assert_eq!(bus.visits[0x05], 0);
        assert_eq!(report.devices().collect::<Vec<_>>(), [addr(0x3C)]);
    }
}
