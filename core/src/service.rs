//! Device time and reset operations
//!
//! One parameterized implementation of the operations the controlling
//! host drives over the serial link: report time since boot, report
//! and set the hardware clock, and perform the watchdog reset.
//! Outcomes are communicated through the diagnostic stream only;
//! callers never branch on a return value (fire-and-log).

use hal_abstractions::diag::DiagnosticSink;
use hal_abstractions::monotonic::MonotonicClock;
use hal_abstractions::reset::SystemReset;
use hal_abstractions::rtc::{CalendarClock, DateTime, RtcError};

/// Watchdog timeout used for the reset sequence: the shortest the
/// peripheral accepts, so the restart is immediate.
const RESET_TIMEOUT_MS: u32 = 1;

/// Casing of the status prefix on diagnostic lines.
///
/// The firmware speaks one convention; uppercase is the default and
/// the one the host-side tooling scrapes for.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PrefixCase {
    /// `INFO:` / `ERROR:` / `SUCCESS:`
    #[default]
    Upper,
    /// `Info:` / `Error:` / `Success:`
    Capitalized,
}

/// Diagnostic line conventions.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Debug, Clone, Copy, Default)]
pub struct DiagnosticStyle {
    pub prefix_case: PrefixCase,
}

impl DiagnosticStyle {
    fn info(&self) -> &'static str {
        match self.prefix_case {
            PrefixCase::Upper => "INFO",
            PrefixCase::Capitalized => "Info",
        }
    }

    fn error(&self) -> &'static str {
        match self.prefix_case {
            PrefixCase::Upper => "ERROR",
            PrefixCase::Capitalized => "Error",
        }
    }

    fn success(&self) -> &'static str {
        match self.prefix_case {
            PrefixCase::Upper => "SUCCESS",
            PrefixCase::Capitalized => "Success",
        }
    }
}

/// Device time and reset operations over the hardware capabilities.
///
/// Owns its hardware handles for the life of the firmware;
/// [`DeviceService::reset_device`] consumes the service because
/// nothing runs after it.
pub struct DeviceService<M, C, R, D> {
    uptime: M,
    clock: C,
    reset: R,
    diag: D,
    style: DiagnosticStyle,
}

impl<M, C, R, D> DeviceService<M, C, R, D>
where
    M: MonotonicClock,
    C: CalendarClock,
    R: SystemReset,
    D: DiagnosticSink,
{
    pub fn new(uptime: M, clock: C, reset: R, diag: D, style: DiagnosticStyle) -> Self {
        Self {
            uptime,
            clock,
            reset,
            diag,
            style,
        }
    }

    /// Report time elapsed since boot and return the raw microsecond
    /// count.
    pub fn report_uptime(&mut self) -> u64 {
        let micros = self.uptime.now_micros();
        let seconds = micros / 1_000_000;
        self.diag.write_line(format_args!(
            "{}: Current time since boot: {} us, {} s",
            self.style.info(),
            micros,
            seconds
        ));
        micros
    }

    /// Report the current hardware clock value.
    ///
    /// A clock that has never been set reports an error line instead
    /// of a meaningless timestamp.
    pub fn report_datetime(&mut self) {
        match self.clock.now() {
            Ok(now) => self.diag.write_line(format_args!(
                "{}: RTC Time: {}-{:02}-{:02} {:02}:{:02}:{:02}",
                self.style.info(),
                now.year,
                now.month,
                now.day,
                now.hour,
                now.minute,
                now.second
            )),
            Err(_) => self.diag.write_line(format_args!(
                "{}: Could not get RTC time, RTC not running",
                self.style.error()
            )),
        }
    }

    /// Submit a new timestamp to the hardware clock.
    ///
    /// The clock peripheral owns validation; a rejected timestamp is
    /// echoed back on the error line and the clock is left untouched.
    /// A missing day-of-week is derived from the civil date before
    /// submission.
    pub fn set_datetime(&mut self, datetime: DateTime) {
        let mut datetime = datetime;
        datetime.day_of_week = Some(datetime.resolved_day_of_week());
        match self.clock.set_datetime(&datetime) {
            Ok(()) => self
                .diag
                .write_line(format_args!("{}: RTC time set.", self.style.success())),
            Err(RtcError::InvalidDateTime(_)) => self.diag.write_line(format_args!(
                "{}: Invalid date/time provided, Provided date/time: {}-{}-{} {}:{}:{}",
                self.style.error(),
                datetime.year,
                datetime.month,
                datetime.day,
                datetime.hour,
                datetime.minute,
                datetime.second
            )),
            Err(RtcError::NotRunning) => self.diag.write_line(format_args!(
                "{}: Could not set RTC time, RTC not running",
                self.style.error()
            )),
        }
    }

    /// Restart the device through the watchdog. Never returns.
    ///
    /// Announces the reset, closes the diagnostic stream, arms the
    /// watchdog with its shortest timeout and parks the processor; the
    /// unserviced watchdog performs the restart. All application state
    /// is lost.
    pub fn reset_device(mut self) -> ! {
        self.diag.write_line(format_args!(
            "{}: Resetting the device.",
            self.style.success()
        ));
        self.diag.close();
        self.reset.arm_watchdog(RESET_TIMEOUT_MS, true);
        self.reset.halt()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::fmt;
    use hal_abstractions::rtc::DayOfWeek;
    use std::cell::RefCell;
    use std::panic::{catch_unwind, AssertUnwindSafe};
    use std::rc::Rc;
    use std::string::{String, ToString};
    use std::vec::Vec;

    struct FixedUptime(u64);

    impl MonotonicClock for FixedUptime {
        fn now_micros(&self) -> u64 {
            self.0
        }
    }

    /// Validating mock of the hardware clock; holds at most the one
    /// timestamp the real clock registers would.
    #[derive(Default)]
    struct MockRtc {
        stored: Rc<RefCell<Option<DateTime>>>,
    }

    impl CalendarClock for MockRtc {
        fn now(&self) -> Result<DateTime, RtcError> {
            let stored = *self.stored.borrow();
            stored.ok_or(RtcError::NotRunning)
        }

        fn set_datetime(&mut self, datetime: &DateTime) -> Result<(), RtcError> {
            datetime.validate().map_err(RtcError::InvalidDateTime)?;
            *self.stored.borrow_mut() = Some(*datetime);
            Ok(())
        }
    }

    #[derive(Default, Clone)]
    struct RecordingSink {
        lines: Rc<RefCell<Vec<String>>>,
        closed: Rc<RefCell<bool>>,
    }

    impl DiagnosticSink for RecordingSink {
        fn write_line(&mut self, args: fmt::Arguments<'_>) {
            self.lines.borrow_mut().push(args.to_string());
        }

        fn close(&mut self) {
            *self.closed.borrow_mut() = true;
        }
    }

    #[derive(Default, Clone)]
    struct MockReset {
        armed: Rc<RefCell<Vec<(u32, bool)>>>,
    }

    impl SystemReset for MockReset {
        fn arm_watchdog(&mut self, timeout_ms: u32, pause_on_debug: bool) {
            self.armed.borrow_mut().push((timeout_ms, pause_on_debug));
        }

        fn halt(&mut self) -> ! {
            panic!("halted awaiting watchdog restart");
        }
    }

    type TestService = DeviceService<FixedUptime, MockRtc, MockReset, RecordingSink>;

    struct Harness {
        service: TestService,
        sink: RecordingSink,
        clock_state: Rc<RefCell<Option<DateTime>>>,
        reset: MockReset,
    }

    fn harness_with_style(micros: u64, style: DiagnosticStyle) -> Harness {
        let clock_state = Rc::new(RefCell::new(None));
        let clock = MockRtc {
            stored: Rc::clone(&clock_state),
        };
        let sink = RecordingSink::default();
        let reset = MockReset::default();
        let service = DeviceService::new(
            FixedUptime(micros),
            clock,
            reset.clone(),
            sink.clone(),
            style,
        );
        Harness {
            service,
            sink,
            clock_state,
            reset,
        }
    }

    fn harness(micros: u64) -> Harness {
        harness_with_style(micros, DiagnosticStyle::default())
    }

    fn dt(year: u16, month: u8, day: u8, hour: u8, minute: u8, second: u8) -> DateTime {
        DateTime {
            year,
            month,
            day,
            day_of_week: None,
            hour,
            minute,
            second,
        }
    }

    #[test]
    fn uptime_reports_floor_seconds_and_returns_micros() {
        let mut h = harness(1_500_000);
        let micros = h.service.report_uptime();
        assert_eq!(micros, 1_500_000);
        assert_eq!(
            *h.sink.lines.borrow(),
            ["INFO: Current time since boot: 1500000 us, 1 s"]
        );
    }

    #[test]
    fn uptime_is_idempotent_without_state_change() {
        let mut h = harness(987_654_321);
        h.service.report_uptime();
        h.service.report_uptime();
        let lines = h.sink.lines.borrow();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0], lines[1]);
        assert_eq!(lines[0], "INFO: Current time since boot: 987654321 us, 987 s");
    }

    #[test]
    fn reading_unset_clock_reports_designated_error() {
        let mut h = harness(0);
        h.service.report_datetime();
        assert_eq!(
            *h.sink.lines.borrow(),
            ["ERROR: Could not get RTC time, RTC not running"]
        );
    }

    #[test]
    fn set_then_report_round_trips_all_fields() {
        let mut h = harness(0);
        h.service.set_datetime(dt(2024, 3, 5, 9, 0, 7));
        h.service.report_datetime();
        assert_eq!(
            *h.sink.lines.borrow(),
            [
                "SUCCESS: RTC time set.",
                "INFO: RTC Time: 2024-03-05 09:00:07"
            ]
        );

        let stored = h.clock_state.borrow().unwrap();
        assert_eq!(
            stored,
            DateTime {
                day_of_week: Some(DayOfWeek::Tuesday),
                ..dt(2024, 3, 5, 9, 0, 7)
            }
        );
    }

    #[test]
    fn report_zero_pads_time_fields_but_not_year() {
        let mut h = harness(0);
        h.service.set_datetime(dt(987, 1, 2, 3, 4, 5));
        h.service.report_datetime();
        assert_eq!(
            h.sink.lines.borrow().last().unwrap(),
            "INFO: RTC Time: 987-01-02 03:04:05"
        );
    }

    #[test]
    fn rejected_write_echoes_fields_and_leaves_clock_unset() {
        let mut h = harness(0);
        h.service.set_datetime(dt(2024, 13, 1, 0, 0, 0));
        assert_eq!(
            *h.sink.lines.borrow(),
            ["ERROR: Invalid date/time provided, Provided date/time: 2024-13-1 0:0:0"]
        );
        assert!(h.clock_state.borrow().is_none());
    }

    #[test]
    fn rejected_write_does_not_clobber_running_clock() {
        let mut h = harness(0);
        h.service.set_datetime(dt(2024, 2, 29, 12, 30, 0));
        h.service.set_datetime(dt(2023, 2, 29, 0, 0, 0));
        let lines = h.sink.lines.borrow();
        assert_eq!(
            lines[1],
            "ERROR: Invalid date/time provided, Provided date/time: 2023-2-29 0:0:0"
        );

        let stored = h.clock_state.borrow().unwrap();
        assert_eq!(stored.year, 2024);
        assert_eq!(stored.day, 29);
    }

    #[test]
    fn reset_arms_watchdog_once_and_never_returns() {
        let h = harness(0);
        let sink = h.sink.clone();
        let reset = h.reset.clone();
        let service = h.service;

        let outcome = catch_unwind(AssertUnwindSafe(move || service.reset_device()));
        assert!(outcome.is_err());

        assert_eq!(*sink.lines.borrow(), ["SUCCESS: Resetting the device."]);
        assert!(*sink.closed.borrow());
        assert_eq!(*reset.armed.borrow(), [(1, true)]);
    }

    #[test]
    fn capitalized_prefix_style_renders_lowercase_variant() {
        let style = DiagnosticStyle {
            prefix_case: PrefixCase::Capitalized,
        };
        let mut h = harness_with_style(2_000_000, style);
        h.service.report_uptime();
        h.service.set_datetime(dt(2024, 1, 1, 0, 0, 0));
        h.service.report_datetime();
        assert_eq!(
            *h.sink.lines.borrow(),
            [
                "Info: Current time since boot: 2000000 us, 2 s",
                "Success: RTC time set.",
                "Info: RTC Time: 2024-01-01 00:00:00"
            ]
        );
    }
}
