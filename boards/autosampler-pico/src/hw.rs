//! Capability trait implementations over the RP2040 peripherals

#![deny(unsafe_code)]

use embassy_rp::peripherals::RTC;
use embassy_rp::rtc as hw_rtc;
use embassy_rp::watchdog::Watchdog;
use embassy_time::{Duration, Instant};

use hal_abstractions::monotonic::MonotonicClock;
use hal_abstractions::reset::SystemReset;
use hal_abstractions::rtc::{CalendarClock, DateTime, DateTimeError, DayOfWeek, RtcError};

/// Boot-relative microsecond counter, read from the TIMER peripheral
/// through the embassy time driver.
pub struct BootTimer;

impl MonotonicClock for BootTimer {
    fn now_micros(&self) -> u64 {
        Instant::now().as_micros()
    }
}

/// The RP2040 on-chip RTC behind the [`CalendarClock`] capability.
pub struct PicoRtc {
    rtc: hw_rtc::Rtc<'static, RTC>,
}

impl PicoRtc {
    pub fn new(rtc: hw_rtc::Rtc<'static, RTC>) -> Self {
        Self { rtc }
    }
}

impl CalendarClock for PicoRtc {
    fn now(&self) -> Result<DateTime, RtcError> {
        let now = self.rtc.now().map_err(map_rtc_error)?;
        Ok(DateTime {
            year: now.year,
            month: now.month,
            day: now.day,
            day_of_week: Some(from_hw_day(now.day_of_week)),
            hour: now.hour,
            minute: now.minute,
            second: now.second,
        })
    }

    fn set_datetime(&mut self, datetime: &DateTime) -> Result<(), RtcError> {
        // Pre-flight the field ranges so a rejection never reaches the
        // peripheral registers.
        datetime.validate().map_err(RtcError::InvalidDateTime)?;
        let hw = hw_rtc::DateTime {
            year: datetime.year,
            month: datetime.month,
            day: datetime.day,
            day_of_week: to_hw_day(datetime.resolved_day_of_week()),
            hour: datetime.hour,
            minute: datetime.minute,
            second: datetime.second,
        };
        self.rtc.set_datetime(hw).map_err(map_rtc_error)
    }
}

/// Watchdog-backed reset: arm, then park the core until the forced
/// restart.
pub struct PicoReset {
    watchdog: Watchdog,
}

impl PicoReset {
    pub fn new(watchdog: Watchdog) -> Self {
        Self { watchdog }
    }
}

impl SystemReset for PicoReset {
    fn arm_watchdog(&mut self, timeout_ms: u32, pause_on_debug: bool) {
        self.watchdog.pause_on_debug(pause_on_debug);
        self.watchdog.start(Duration::from_millis(timeout_ms as u64));
    }

    fn halt(&mut self) -> ! {
        // Wait for the watchdog to reset the chip.
        loop {
            cortex_m::asm::wfe();
        }
    }
}

fn from_hw_day(day: hw_rtc::DayOfWeek) -> DayOfWeek {
    match day {
        hw_rtc::DayOfWeek::Sunday => DayOfWeek::Sunday,
        hw_rtc::DayOfWeek::Monday => DayOfWeek::Monday,
        hw_rtc::DayOfWeek::Tuesday => DayOfWeek::Tuesday,
        hw_rtc::DayOfWeek::Wednesday => DayOfWeek::Wednesday,
        hw_rtc::DayOfWeek::Thursday => DayOfWeek::Thursday,
        hw_rtc::DayOfWeek::Friday => DayOfWeek::Friday,
        hw_rtc::DayOfWeek::Saturday => DayOfWeek::Saturday,
    }
}

fn to_hw_day(day: DayOfWeek) -> hw_rtc::DayOfWeek {
    match day {
        DayOfWeek::Sunday => hw_rtc::DayOfWeek::Sunday,
        DayOfWeek::Monday => hw_rtc::DayOfWeek::Monday,
        DayOfWeek::Tuesday => hw_rtc::DayOfWeek::Tuesday,
        DayOfWeek::Wednesday => hw_rtc::DayOfWeek::Wednesday,
        DayOfWeek::Thursday => hw_rtc::DayOfWeek::Thursday,
        DayOfWeek::Friday => hw_rtc::DayOfWeek::Friday,
        DayOfWeek::Saturday => hw_rtc::DayOfWeek::Saturday,
    }
}

fn map_rtc_error(err: hw_rtc::RtcError) -> RtcError {
    match err {
        hw_rtc::RtcError::InvalidDateTime(e) => RtcError::InvalidDateTime(map_datetime_error(e)),
        hw_rtc::RtcError::NotRunning => RtcError::NotRunning,
    }
}

fn map_datetime_error(err: hw_rtc::DateTimeError) -> DateTimeError {
    match err {
        hw_rtc::DateTimeError::InvalidYear => DateTimeError::InvalidYear,
        hw_rtc::DateTimeError::InvalidMonth => DateTimeError::InvalidMonth,
        hw_rtc::DateTimeError::InvalidDay => DateTimeError::InvalidDay,
        // The weekday is always derived locally, so a day-of-week
        // rejection can only mean the date itself was bad.
        hw_rtc::DateTimeError::InvalidDayOfWeek => DateTimeError::InvalidDay,
        hw_rtc::DateTimeError::InvalidHour => DateTimeError::InvalidHour,
        hw_rtc::DateTimeError::InvalidMinute => DateTimeError::InvalidMinute,
        hw_rtc::DateTimeError::InvalidSecond => DateTimeError::InvalidSecond,
    }
}
