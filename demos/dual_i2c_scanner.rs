//! Dual I2C Bus Scanner firmware for the Adafruit KB2040 (RP2040)
//!
//! Scans both I2C controllers once at boot, logs the result over RTT, and
//! replays the text report on the USB serial port every time a host opens
//! it. Between connections the firmware just idles.
//!
//! # Hardware
//!
//! - Adafruit KB2040 (or any RP2040 board with the same pins free)
//! - Primary bus: I2C0 on the STEMMA QT connector (GPIO12=SDA, GPIO13=SCL)
//! - Secondary bus: I2C1 on D2/D3 (GPIO2=SDA, GPIO3=SCL)
//! - Pull-ups on both buses
//!
//! # Usage
//!
//! ```bash
//! cargo firmware          # build + flash via probe-rs
//! cargo monitor           # read the report from the USB serial port
//! ```

#![no_std]
#![no_main]

use core::fmt::Write as _;

use defmt::*;
use embassy_rp::i2c::{self, I2c};
use embassy_rp::usb::{Driver, InterruptHandler as UsbInterruptHandler};
use embassy_rp::{bind_interrupts, peripherals};
use embassy_usb::class::cdc_acm::{CdcAcmClass, State};
use embassy_usb::{Builder, Config};
use heapless::String;
use {defmt_rtt as _, panic_probe as _};

use dual_i2c_scanner::console_protocol::MAX_LINE_LEN;
use dual_i2c_scanner::adapters::{HalBusProbe, ProbeOptions, UsbCdcConsole, USB_PACKET_SIZE};
use dual_i2c_scanner::domain::{BusId, BusPins, DualScanReport, I2cInstance};
use dual_i2c_scanner::ports::ConsolePort;
use dual_i2c_scanner::scanner::{BusScanner, ScanConfig};

// ============================================================================
// Bus Configuration
// ============================================================================

/// Primary bus pins (board default I2C)
const PRIMARY_PINS: BusPins = BusPins::KB2040_STEMMA_QT;

/// Secondary bus pins
const SECONDARY_PINS: BusPins = BusPins::KB2040_D2_D3;

const _: () = core::assert!(matches!(PRIMARY_PINS.instance(), Some(I2cInstance::I2c0)));
const _: () = core::assert!(matches!(SECONDARY_PINS.instance(), Some(I2cInstance::I2c1)));

/// Bus clock (standard mode)
const I2C_FREQUENCY_HZ: u32 = 100_000;

// ============================================================================
// USB Configuration
// ============================================================================

const USB_VID: u16 = 0x2e8a;
const USB_PID: u16 = 0x000a;
const USB_SERIAL: &str = "I2CSCAN1";

// ============================================================================
// Interrupt Bindings
// ============================================================================

bind_interrupts!(struct Irqs {
    USBCTRL_IRQ => UsbInterruptHandler<peripherals::USB>;
});

// ============================================================================
// Main Entry Point
// ============================================================================

#[embassy_executor::main]
async fn main(spawner: embassy_executor::Spawner) {
    info!("=== Dual I2C Bus Scanner ===");

    let p = embassy_rp::init(Default::default());

    // ========================================================================
    // Create Bus Adapters
    // ========================================================================

    let mut config = i2c::Config::default();
    config.frequency = I2C_FREQUENCY_HZ;

    // Pin arguments must match PRIMARY_PINS / SECONDARY_PINS above
    let i2c0 = I2c::new_blocking(p.I2C0, p.PIN_13, p.PIN_12, config.clone());
    let i2c1 = I2c::new_blocking(p.I2C1, p.PIN_3, p.PIN_2, config);

    let mut primary = HalBusProbe::with_options(i2c0, BusId::Primary, ProbeOptions::RP2040);
    let mut secondary = HalBusProbe::with_options(i2c1, BusId::Secondary, ProbeOptions::RP2040);
    info!(
        "Buses ready: primary {}, secondary {}, {} Hz",
        PRIMARY_PINS, SECONDARY_PINS, I2C_FREQUENCY_HZ
    );

    // ========================================================================
    // Scan (once, before anything async runs)
    // ========================================================================

    let scanner = BusScanner::new(ScanConfig::default());
    let report = scanner.scan_both(&mut primary, &mut secondary);
    log_report(&report);

    // ========================================================================
    // Publish over USB, then idle
    // ========================================================================

    let usb_class = setup_usb(&spawner, p.USB);
    console_loop(UsbCdcConsole::new(usb_class), &report).await;
}

fn log_report(report: &DualScanReport) {
    for line in report.lines() {
        let mut text: String<MAX_LINE_LEN> = String::new();
        if core::write!(text, "{}", line).is_ok() {
            info!("{=str}", text.as_str());
        }
    }
    info!("Scan complete: {} device(s) total", report.device_count());
}

// ============================================================================
// USB Setup
// ============================================================================

type UsbDriver = Driver<'static, peripherals::USB>;

/// Descriptor and class buffers the USB stack borrows for its whole life
struct UsbResources {
    config_descriptor: [u8; 256],
    bos_descriptor: [u8; 256],
    msos_descriptor: [u8; 256],
    control_buf: [u8; 64],
    cdc_state: State<'static>,
}

static mut USB_RESOURCES: UsbResources = UsbResources {
    config_descriptor: [0; 256],
    bos_descriptor: [0; 256],
    msos_descriptor: [0; 256],
    control_buf: [0; 64],
    cdc_state: State::new(),
};

fn usb_config() -> Config<'static> {
    let mut config = Config::new(USB_VID, USB_PID);
    config.manufacturer = Some("Adafruit");
    config.product = Some("Dual I2C Bus Scanner");
    config.serial_number = Some(USB_SERIAL);
    config.max_power = 100;
    config.max_packet_size_0 = USB_PACKET_SIZE as u8;
    config
}

/// Build the CDC ACM class and spawn the device task
///
/// Called once from `main`; the static resources are never borrowed again.
fn setup_usb(
    spawner: &embassy_executor::Spawner,
    usb: embassy_rp::Peri<'static, peripherals::USB>,
) -> CdcAcmClass<'static, UsbDriver> {
    let res = unsafe { &mut *core::ptr::addr_of_mut!(USB_RESOURCES) };

    let mut builder = Builder::new(
        Driver::new(usb, Irqs),
        usb_config(),
        &mut res.config_descriptor,
        &mut res.bos_descriptor,
        &mut res.msos_descriptor,
        &mut res.control_buf,
    );
    let class = CdcAcmClass::new(&mut builder, &mut res.cdc_state, USB_PACKET_SIZE as u16);

    spawner.spawn(usb_device_task(builder.build()).expect("usb device task"));
    class
}

#[embassy_executor::task]
async fn usb_device_task(mut usb: embassy_usb::UsbDevice<'static, UsbDriver>) -> ! {
    info!("USB device task started");
    usb.run().await
}

// ============================================================================
// Console Loop (uses ConsolePort)
// ============================================================================

/// Replay the report for every host session, forever
async fn console_loop<C: ConsolePort>(mut console: C, report: &DualScanReport) -> ! {
    loop {
        match console.serve_session(report).await {
            Ok(()) => info!("Report published, host gone"),
            Err(e) => warn!("Failed to publish report: {:?}", e),
        }
    }
}
