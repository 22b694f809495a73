//! Console port - abstraction for the report's text output
//!
//! This trait lets the firmware publish the scan report without knowing
//! the transport (USB CDC, UART, ...).

use core::fmt::Write as _;

use heapless::String;

use crate::console_protocol::{ReportLine, LINE_ENDING, MAX_LINE_LEN};
use crate::domain::DualScanReport;

/// Error type for console operations
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConsoleError {
    /// No host attached
    NotConnected,
    /// Host went away mid-write
    Disconnected,
    /// Transport refused the data
    WriteFailed,
    /// Rendered line does not fit the line buffer
    LineTooLong,
}

/// Port for line-oriented text output to a host
pub trait ConsolePort {
    /// Wait until a host is listening
    fn wait_connection(&mut self) -> impl core::future::Future<Output = ()>;

    /// Check if a host is listening
    fn is_connected(&self) -> bool;

    /// Write raw bytes
    fn write(&mut self, data: &[u8]) -> impl core::future::Future<Output = Result<(), ConsoleError>>;

    /// Sleep for one idle interval
    ///
    /// Must actually suspend; the session loop relies on it to hand the
    /// executor back to the USB stack.
    fn idle(&mut self) -> impl core::future::Future<Output = ()>;

    /// Write one report line followed by `\r\n`
    fn write_line(
        &mut self,
        line: &ReportLine,
    ) -> impl core::future::Future<Output = Result<(), ConsoleError>> {
        async move {
            let mut buf: String<MAX_LINE_LEN> = String::new();
            write!(buf, "{}{}", line, LINE_ENDING).map_err(|_| ConsoleError::LineTooLong)?;
            self.write(buf.as_bytes()).await
        }
    }

    /// Write the whole dual-bus report
    ///
    /// Stops at the first failed line.
    fn publish(
        &mut self,
        report: &DualScanReport,
    ) -> impl core::future::Future<Output = Result<(), ConsoleError>> {
        async move {
            for line in report.lines() {
                self.write_line(&line).await?;
            }
            Ok(())
        }
    }

    /// Serve one host session
    ///
    /// Waits for the transport, then idles until the host is listening,
    /// publishes the report and idles again until the host goes away.
    /// Returns the publish result once the session has ended.
    fn serve_session(
        &mut self,
        report: &DualScanReport,
    ) -> impl core::future::Future<Output = Result<(), ConsoleError>> {
        async move {
            self.wait_connection().await;
            while !self.is_connected() {
                self.idle().await;
            }

            let result = self.publish(report).await;

            while self.is_connected() {
                self.idle().await;
            }
            result
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Address, BusId, ProbeOutcome};
    use crate::ports::bus_probe::BusProbePort;
    use crate::scanner::BusScanner;
    use core::future::Future;
    use core::pin::pin;
    use core::task::{Context, Poll, Waker};
    use embassy_futures::{block_on, yield_now};

    /// Console collecting everything written, failing after `budget` writes
    struct RecordingConsole {
        connected: bool,
        output: std::vec::Vec<u8>,
        budget: usize,
    }

    impl RecordingConsole {
        fn new() -> Self {
            Self {
                connected: true,
                output: std::vec::Vec::new(),
                budget: usize::MAX,
            }
        }
    }

    impl ConsolePort for RecordingConsole {
        async fn wait_connection(&mut self) {
            self.connected = true;
        }

        fn is_connected(&self) -> bool {
            self.connected
        }

        async fn write(&mut self, data: &[u8]) -> Result<(), ConsoleError> {
            if !self.connected {
                return Err(ConsoleError::NotConnected);
            }
            if self.budget == 0 {
                return Err(ConsoleError::Disconnected);
            }
            self.budget -= 1;
            self.output.extend_from_slice(data);
            Ok(())
        }

        async fn idle(&mut self) {}
    }

    /// Transport that is up before the host raises DTR, like a CDC ACM
    /// class right after enumeration
    struct LateHostConsole {
        idles: usize,
        connect_after: usize,
        disconnect_after: usize,
        writes_before_connect: usize,
        lines: usize,
    }

    impl LateHostConsole {
        fn new(connect_after: usize, disconnect_after: usize) -> Self {
            Self {
                idles: 0,
                connect_after,
                disconnect_after,
                writes_before_connect: 0,
                lines: 0,
            }
        }
    }

    impl ConsolePort for LateHostConsole {
        async fn wait_connection(&mut self) {}

        fn is_connected(&self) -> bool {
            self.idles >= self.connect_after && self.idles < self.disconnect_after
        }

        async fn write(&mut self, _data: &[u8]) -> Result<(), ConsoleError> {
            if !self.is_connected() {
                self.writes_before_connect += 1;
                return Err(ConsoleError::NotConnected);
            }
            self.lines += 1;
            Ok(())
        }

        async fn idle(&mut self) {
            self.idles += 1;
            yield_now().await;
        }
    }

    struct OneDevice(BusId, u8);

    impl BusProbePort for OneDevice {
        fn probe(&mut self, address: Address) -> ProbeOutcome {
            if address.value() == self.1 {
                ProbeOutcome::Acknowledged
            } else {
                ProbeOutcome::NotAcknowledged
            }
        }

        fn bus_id(&self) -> BusId {
            self.0
        }
    }

    fn sample_report() -> DualScanReport {
        BusScanner::default().scan_both(
            &mut OneDevice(BusId::Primary, 0x3C),
            &mut OneDevice(BusId::Secondary, 0x68),
        )
    }

    #[test]
    fn test_write_line_appends_crlf() {
        let mut console = RecordingConsole::new();
        let line = ReportLine::DeviceFound(Address::new(0x3C).unwrap());
        block_on(console.write_line(&line)).unwrap();
        assert_eq!(console.output, b"I2C device found at address 0x3C  !\r\n");
    }

    #[test]
    fn test_publish_writes_every_line() {
        let report = sample_report();
        let mut console = RecordingConsole::new();
        block_on(console.publish(&report)).unwrap();

        let text = std::string::String::from_utf8(console.output).unwrap();
        assert!(text.starts_with("Dual I2C Bus Scanner\r\n-------------------\r\n\r\n"));
        assert!(text.contains("I2C device found at address 0x68  !\r\n"));
        assert!(text.ends_with("done\r\n"));
        assert_eq!(text.matches("\r\n").count(), report.lines().count());
    }

    #[test]
    fn test_publish_stops_at_first_failure() {
        let report = sample_report();
        let mut console = RecordingConsole::new();
        console.budget = 2;

        let result = block_on(console.publish(&report));

        assert_eq!(result, Err(ConsoleError::Disconnected));
        assert_eq!(console.output, b"Dual I2C Bus Scanner\r\n-------------------\r\n");
    }

    #[test]
    fn test_publish_requires_connection() {
        let mut console = RecordingConsole::new();
        console.connected = false;
        assert_eq!(
            block_on(console.publish(&sample_report())),
            Err(ConsoleError::NotConnected)
        );
        block_on(console.wait_connection());
        assert!(console.is_connected());
    }

    #[test]
    fn test_session_yields_while_host_not_listening() {
        let report = sample_report();
        let mut console = LateHostConsole::new(3, 5);

        {
            let mut session = pin!(console.serve_session(&report));
            let mut cx = Context::from_waker(Waker::noop());
            assert!(matches!(session.as_mut().poll(&mut cx), Poll::Pending));
        }

        assert_eq!(console.idles, 1);
        assert_eq!(console.writes_before_connect, 0);
        assert_eq!(console.lines, 0);
    }

    #[test]
    fn test_session_publishes_once_host_listens() {
        let report = sample_report();
        let mut console = LateHostConsole::new(3, 5);

        block_on(console.serve_session(&report)).unwrap();

        assert_eq!(console.writes_before_connect, 0);
        assert_eq!(console.lines, report.lines().count());
        assert_eq!(console.idles, 5);
        assert!(!console.is_connected());
    }
}
