//! Dual I2C Bus Scanner Host Monitor
//!
//! This binary runs on your PC, opens the scanner's USB serial port, echoes
//! the report and prints a per-bus summary once both buses are done.
//!
//! ## Usage
//!
//! ```bash
//! # List available serial ports
//! cargo monitor --list-ports
//!
//! # Connect to the scanner (auto-detects RP2040 / Adafruit boards)
//! cargo monitor
//!
//! # Connect to a specific port, wait at most 30 seconds
//! cargo monitor --port /dev/ttyACM0 --timeout 30
//!
//! # Show every RP2040 pin pair that maps to a hardware I2C controller
//! cargo monitor --pins
//! ```

use std::io::{self, Read, Write};
use std::time::{Duration, Instant};

use dual_i2c_scanner::console_protocol::ReportLine;
use dual_i2c_scanner::domain::{rp2040_pin_pairs, Address, BusId};

/// Raspberry Pi vendor ID
const RPI_VID: u16 = 0x2e8a;

/// Adafruit vendor ID
const ADAFRUIT_VID: u16 = 0x239a;

const DEFAULT_TIMEOUT_SECS: u64 = 10;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = std::env::args().collect();

    if args.iter().any(|a| a == "--help" || a == "-h") {
        print_help();
        return Ok(());
    }

    if args.iter().any(|a| a == "--list-ports") {
        list_ports();
        return Ok(());
    }

    if args.iter().any(|a| a == "--pins") {
        list_pin_pairs();
        return Ok(());
    }

    let timeout = match arg_value(&args, "--timeout") {
        Some(v) => Duration::from_secs(
            v.parse::<u64>()
                .map_err(|_| format!("Invalid timeout '{}' (seconds)", v))?,
        ),
        None => Duration::from_secs(DEFAULT_TIMEOUT_SECS),
    };

    let port_name = match arg_value(&args, "--port").or_else(find_scanner_port) {
        Some(name) => name,
        None => {
            eprintln!("Error: No scanner device found");
            eprintln!("Use --list-ports to see available ports");
            eprintln!("Or specify port with --port <PORT>");
            return Err("No device found".into());
        }
    };

    // On Windows, COM ports >= 10 need the \\.\COMxx format
    #[cfg(target_os = "windows")]
    let port_name = if port_name.starts_with("COM") && !port_name.starts_with(r"\\") {
        format!(r"\\.\{}", port_name)
    } else {
        port_name
    };

    print!("Connecting to {}...", port_name);
    io::stdout().flush()?;

    let mut port = serialport::new(&port_name, 115200)
        .timeout(Duration::from_millis(200))
        .flow_control(serialport::FlowControl::None)
        .open()?;

    // The device only starts writing once DTR is raised
    port.write_data_terminal_ready(true)?;
    println!(" connected!\n");

    let mut monitor = Monitor::default();
    let deadline = Instant::now() + timeout;
    let mut pending: Vec<u8> = Vec::new();
    let mut chunk = [0u8; 256];

    while !monitor.is_complete() {
        if Instant::now() >= deadline {
            eprintln!("\nTimed out after {}s waiting for the report", timeout.as_secs());
            break;
        }

        match port.read(&mut chunk) {
            Ok(0) => continue,
            Ok(n) => pending.extend_from_slice(&chunk[..n]),
            Err(e) if e.kind() == io::ErrorKind::TimedOut => continue,
            Err(e) => return Err(e.into()),
        }

        while let Some(pos) = pending.iter().position(|&b| b == b'\n') {
            let raw: Vec<u8> = pending.drain(..=pos).collect();
            let text = String::from_utf8_lossy(&raw);
            print!("{}", text);
            monitor.feed(&text);
        }
    }

    monitor.print_summary();
    Ok(())
}

fn print_help() {
    println!("Dual I2C Bus Scanner monitor");
    println!();
    println!("Options:");
    println!("  --list-ports        List available serial ports");
    println!("  --port <PORT>       Serial port to open (default: auto-detect)");
    println!("  --timeout <SECS>    Give up after SECS seconds (default: {})", DEFAULT_TIMEOUT_SECS);
    println!("  --pins              List RP2040 hardware I2C pin pairs");
    println!("  -h, --help          Show this help");
}

fn arg_value(args: &[String], name: &str) -> Option<String> {
    let idx = args.iter().position(|a| a == name)?;
    args.get(idx + 1).cloned()
}

fn list_ports() {
    println!("Available serial ports:");
    match serialport::available_ports() {
        Ok(ports) if ports.is_empty() => println!("  (none)"),
        Ok(ports) => {
            for port in &ports {
                println!("  {}", describe_port(port));
            }
        }
        Err(e) => eprintln!("Error listing ports: {}", e),
    }
}

/// One listing line: name, transport, and USB identity when known
fn describe_port(port: &serialport::SerialPortInfo) -> String {
    use serialport::SerialPortType;

    let kind = match &port.port_type {
        SerialPortType::UsbPort(info) => {
            let mut kind = format!("USB {:04x}:{:04x}", info.vid, info.pid);
            if let Some(product) = &info.product {
                kind.push(' ');
                kind.push_str(product);
            }
            if is_scanner_vid(info.vid) {
                kind.push_str(" [scanner]");
            }
            kind
        }
        SerialPortType::BluetoothPort => "Bluetooth".to_string(),
        SerialPortType::PciPort => "PCI".to_string(),
        SerialPortType::Unknown => "Unknown".to_string(),
    };
    format!("{:<16} {}", port.port_name, kind)
}

fn is_scanner_vid(vid: u16) -> bool {
    vid == RPI_VID || vid == ADAFRUIT_VID
}

fn find_scanner_port() -> Option<String> {
    serialport::available_ports()
        .ok()?
        .into_iter()
        .find_map(|port| match &port.port_type {
            serialport::SerialPortType::UsbPort(info) if is_scanner_vid(info.vid) => {
                Some(port.port_name)
            }
            _ => None,
        })
}

fn list_pin_pairs() {
    println!("\nRP2040 I2C Pin Pairs");
    println!("====================");
    let mut count = 0;
    for pins in rp2040_pin_pairs() {
        let instance = match pins.instance() {
            Some(instance) => format!("{:?}", instance),
            None => continue,
        };
        println!("SCL pin: GP{}\t SDA pin: GP{}\t ({})", pins.scl, pins.sda, instance);
        count += 1;
    }
    println!("\nFound {} valid I2C pin pairs", count);
}

// ============================================================================
// Report tracking
// ============================================================================

#[derive(Default)]
struct BusSummary {
    devices: Vec<Address>,
    unknown_errors: Vec<Address>,
    finished: bool,
}

#[derive(Default)]
struct Monitor {
    current: Option<BusId>,
    primary: BusSummary,
    secondary: BusSummary,
}

impl Monitor {
    fn feed(&mut self, text: &str) {
        let Some(line) = ReportLine::parse(text) else {
            return;
        };

        match line {
            ReportLine::Banner(bus) => self.current = Some(bus),
            ReportLine::DeviceFound(address) => {
                if let Some(summary) = self.current_summary() {
                    summary.devices.push(address);
                }
            }
            ReportLine::UnknownError(address) => {
                if let Some(summary) = self.current_summary() {
                    summary.unknown_errors.push(address);
                }
            }
            line if line.is_summary() => {
                if let Some(summary) = self.current_summary() {
                    summary.finished = true;
                }
                self.current = None;
            }
            _ => {}
        }
    }

    fn current_summary(&mut self) -> Option<&mut BusSummary> {
        match self.current? {
            BusId::Primary => Some(&mut self.primary),
            BusId::Secondary => Some(&mut self.secondary),
        }
    }

    fn is_complete(&self) -> bool {
        self.primary.finished && self.secondary.finished
    }

    fn print_summary(&self) {
        println!("\nSummary");
        println!("=======");
        for (bus, summary) in [(BusId::Primary, &self.primary), (BusId::Secondary, &self.secondary)] {
            if !summary.finished {
                println!("{:<10} (no report received)", bus.as_str());
                continue;
            }
            println!(
                "{:<10} {} device(s): {}",
                bus.as_str(),
                summary.devices.len(),
                join_addresses(&summary.devices)
            );
            if !summary.unknown_errors.is_empty() {
                println!(
                    "{:<10} unknown errors at: {}",
                    "",
                    join_addresses(&summary.unknown_errors)
                );
            }
        }
    }
}

fn join_addresses(addresses: &[Address]) -> String {
    if addresses.is_empty() {
        return "-".to_string();
    }
    addresses
        .iter()
        .map(|a| a.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use dual_i2c_scanner::console_protocol::LINE_ENDING;
    use dual_i2c_scanner::{BusProbePort, BusScanner, DualScanReport, ProbeOutcome};

    /// Bus answering from a fixed table, NACK everywhere else
    struct TableBus {
        bus: BusId,
        answers: Vec<(u8, ProbeOutcome)>,
    }

    impl BusProbePort for TableBus {
        fn probe(&mut self, address: Address) -> ProbeOutcome {
            self.answers
                .iter()
                .find(|(a, _)| *a == address.value())
                .map(|(_, outcome)| *outcome)
                .unwrap_or(ProbeOutcome::NotAcknowledged)
        }

        fn bus_id(&self) -> BusId {
            self.bus
        }
    }

    fn sample_report() -> DualScanReport {
        BusScanner::default().scan_both(
            &mut TableBus {
                bus: BusId::Primary,
                answers: vec![(0x3C, ProbeOutcome::Acknowledged), (0x68, ProbeOutcome::Acknowledged)],
            },
            &mut TableBus {
                bus: BusId::Secondary,
                answers: vec![(0x29, ProbeOutcome::UnknownError)],
            },
        )
    }

    fn rendered(report: &DualScanReport) -> Vec<String> {
        report.lines().map(|line| format!("{}{}", line, LINE_ENDING)).collect()
    }

    fn addr(raw: u8) -> Address {
        Address::new(raw).unwrap()
    }

    #[test]
    fn test_monitor_collects_each_bus() {
        let mut monitor = Monitor::default();
        monitor.feed("\0\0boot noise\r\n");
        for line in rendered(&sample_report()) {
            monitor.feed(&line);
        }

        assert!(monitor.is_complete());
        assert_eq!(monitor.primary.devices, [addr(0x3C), addr(0x68)]);
        assert!(monitor.primary.unknown_errors.is_empty());
        assert!(monitor.secondary.devices.is_empty());
        assert_eq!(monitor.secondary.unknown_errors, [addr(0x29)]);
    }

    #[test]
    fn test_monitor_completes_after_both_summaries() {
        let lines = rendered(&sample_report());
        let mut remaining = lines.iter();
        let mut monitor = Monitor::default();

        for line in remaining.by_ref() {
            monitor.feed(line);
            if monitor.primary.finished {
                break;
            }
        }
        assert!(!monitor.is_complete());
        assert!(!monitor.secondary.finished);

        for line in remaining {
            assert!(!monitor.is_complete());
            monitor.feed(line);
        }
        assert!(monitor.is_complete());
    }

    #[test]
    fn test_monitor_ignores_lines_before_banner() {
        let mut monitor = Monitor::default();
        monitor.feed("I2C device found at address 0x10  !\r\n");
        monitor.feed("Unknown error at address 0x11\r\n");
        monitor.feed("done\r\n");

        assert!(monitor.primary.devices.is_empty());
        assert!(monitor.secondary.unknown_errors.is_empty());
        assert!(!monitor.primary.finished && !monitor.secondary.finished);
    }

    #[test]
    fn test_describe_port_marks_scanner() {
        let port = serialport::SerialPortInfo {
            port_name: "/dev/ttyACM0".to_string(),
            port_type: serialport::SerialPortType::UsbPort(serialport::UsbPortInfo {
                vid: ADAFRUIT_VID,
                pid: 0x0106,
                serial_number: None,
                manufacturer: Some("Adafruit".to_string()),
                product: Some("Dual I2C Bus Scanner".to_string()),
            }),
        };
        assert_eq!(
            describe_port(&port),
            "/dev/ttyACM0     USB 239a:0106 Dual I2C Bus Scanner [scanner]"
        );

        let pci = serialport::SerialPortInfo {
            port_name: "/dev/ttyS0".to_string(),
            port_type: serialport::SerialPortType::PciPort,
        };
        assert_eq!(describe_port(&pci), "/dev/ttyS0       PCI");
    }
}
