//! Autosampler time/reset firmware for the Raspberry Pi Pico (RP2040)
//!
//! Wires the device service to the Pico's hardware: the on-chip RTC,
//! the boot-relative TIMER counter, the watchdog, and UART0 as the
//! diagnostic link to the controlling host.

#![deny(unsafe_code)]
#![deny(warnings)]
#![no_main]
#![no_std]

use defmt_rtt as _; // global logger
use panic_probe as _;

use defmt::info;
use embassy_executor::Spawner;
use embassy_rp::rtc::Rtc;
use embassy_rp::uart::{self, Uart};
use embassy_rp::watchdog::Watchdog;
use embassy_time::Timer;

use autosampler_core::{DeviceService, DiagnosticStyle};
use hal_abstractions::diag::SerialSink;
use hal_abstractions::rtc::{CalendarClock, DateTime};

mod hw;

use hw::{BootTimer, PicoReset, PicoRtc};

/// Time base seeded into an RTC that has never been set, so reports
/// carry a well-formed timestamp until the host syncs the real time.
const DEFAULT_DATETIME: DateTime = DateTime {
    year: 2024,
    month: 1,
    day: 1,
    day_of_week: None,
    hour: 0,
    minute: 0,
    second: 0,
};

/// Seconds between periodic status reports.
const REPORT_INTERVAL_SECS: u64 = 10;

#[embassy_executor::main]
async fn main(_spawner: Spawner) {
    let p = embassy_rp::init(Default::default());
    info!("autosampler time/reset firmware starting");

    // UART0 on GP0/GP1 is the diagnostic link to the controlling host.
    let uart = Uart::new_blocking(p.UART0, p.PIN_0, p.PIN_1, uart::Config::default());

    let clock = PicoRtc::new(Rtc::new(p.RTC));
    let reset = PicoReset::new(Watchdog::new(p.WATCHDOG));

    let needs_seed = clock.now().is_err();
    let mut service = DeviceService::new(
        BootTimer,
        clock,
        reset,
        SerialSink::new(uart),
        DiagnosticStyle::default(),
    );

    if needs_seed {
        info!("RTC not running, seeding default datetime");
        service.set_datetime(DEFAULT_DATETIME);
    }

    loop {
        service.report_uptime();
        service.report_datetime();
        Timer::after_secs(REPORT_INTERVAL_SECS).await;
    }
}
