//! Calendar clock (RTC) capability
//!
//! The RTC is a battery/capacitor-backed peripheral that keeps wall
//! time independently of the main processor. It validates timestamps
//! itself; [`DateTime::validate`] reproduces the RP2040 field checks so
//! mocks and pre-flight checks agree with the hardware.

use crate::calendar;

/// Day of the week, numbered the way the RP2040 RTC registers encode it.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DayOfWeek {
    Sunday = 0,
    Monday = 1,
    Tuesday = 2,
    Wednesday = 3,
    Thursday = 4,
    Friday = 5,
    Saturday = 6,
}

/// Calendar timestamp read from or written to the hardware clock.
///
/// The device holds no copy of this value; it only ever lives in the
/// clock registers or in transit.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateTime {
    /// 0..=4095
    pub year: u16,
    /// 1..=12
    pub month: u8,
    /// 1..=days-in-month
    pub day: u8,
    /// Derived from the civil date when absent.
    pub day_of_week: Option<DayOfWeek>,
    /// 0..=23
    pub hour: u8,
    /// 0..=59
    pub minute: u8,
    /// 0..=59
    pub second: u8,
}

/// A field the clock peripheral rejects.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateTimeError {
    /// Year out of the 0..=4095 range the clock registers hold.
    InvalidYear,
    /// Month outside 1..=12.
    InvalidMonth,
    /// Day outside 1..=days-in-month for the given year and month.
    InvalidDay,
    /// Hour outside 0..=23.
    InvalidHour,
    /// Minute outside 0..=59.
    InvalidMinute,
    /// Second outside 0..=59.
    InvalidSecond,
}

/// Clock operation errors.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RtcError {
    /// The clock rejected the submitted timestamp.
    InvalidDateTime(DateTimeError),
    /// The clock has never been set.
    NotRunning,
}

impl DateTime {
    /// Check the field ranges the clock peripheral enforces.
    pub fn validate(&self) -> Result<(), DateTimeError> {
        if self.year > 4095 {
            return Err(DateTimeError::InvalidYear);
        }
        if self.month < 1 || self.month > 12 {
            return Err(DateTimeError::InvalidMonth);
        }
        if self.day < 1 || self.day > calendar::days_in_month(self.year, self.month) {
            return Err(DateTimeError::InvalidDay);
        }
        if self.hour > 23 {
            return Err(DateTimeError::InvalidHour);
        }
        if self.minute > 59 {
            return Err(DateTimeError::InvalidMinute);
        }
        if self.second > 59 {
            return Err(DateTimeError::InvalidSecond);
        }
        Ok(())
    }

    /// The weekday to submit: the caller's, or one derived from the
    /// civil date when the caller omitted it.
    pub fn resolved_day_of_week(&self) -> DayOfWeek {
        self.day_of_week
            .unwrap_or_else(|| calendar::day_of_week(self.year, self.month, self.day))
    }
}

/// Capability surface of the hardware calendar clock.
pub trait CalendarClock {
    /// Current clock value, or [`RtcError::NotRunning`] for a clock
    /// that has never been set.
    fn now(&self) -> Result<DateTime, RtcError>;

    /// Submit a new clock value. The peripheral validates the fields
    /// and leaves the clock untouched on rejection.
    fn set_datetime(&mut self, datetime: &DateTime) -> Result<(), RtcError>;
}

#[cfg(test)]
mod tests {
    use super::*;

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
    fn accepts_valid_datetime() {
        assert_eq!(dt(2024, 3, 5, 9, 0, 7).validate(), Ok(()));
        assert_eq!(dt(2024, 2, 29, 23, 59, 59).validate(), Ok(()));
    }

    #[test]
    fn rejects_out_of_range_fields() {
        assert_eq!(dt(4096, 1, 1, 0, 0, 0).validate(), Err(DateTimeError::InvalidYear));
        assert_eq!(dt(2024, 13, 1, 0, 0, 0).validate(), Err(DateTimeError::InvalidMonth));
        assert_eq!(dt(2024, 0, 1, 0, 0, 0).validate(), Err(DateTimeError::InvalidMonth));
        assert_eq!(dt(2024, 4, 31, 0, 0, 0).validate(), Err(DateTimeError::InvalidDay));
        assert_eq!(dt(2024, 1, 0, 0, 0, 0).validate(), Err(DateTimeError::InvalidDay));
        assert_eq!(dt(2024, 1, 1, 24, 0, 0).validate(), Err(DateTimeError::InvalidHour));
        assert_eq!(dt(2024, 1, 1, 0, 60, 0).validate(), Err(DateTimeError::InvalidMinute));
        assert_eq!(dt(2024, 1, 1, 0, 0, 60).validate(), Err(DateTimeError::InvalidSecond));
    }

    #[test]
    fn rejects_leap_day_in_common_year() {
        assert_eq!(dt(2023, 2, 29, 0, 0, 0).validate(), Err(DateTimeError::InvalidDay));
    }

    #[test]
    fn resolves_missing_day_of_week() {
        assert_eq!(dt(2024, 1, 1, 0, 0, 0).resolved_day_of_week(), DayOfWeek::Monday);

        let explicit = DateTime {
            day_of_week: Some(DayOfWeek::Friday),
            ..dt(2024, 1, 1, 0, 0, 0)
        };
        // A caller-provided weekday wins, even a wrong one; the clock
        // peripheral is the authority on rejecting it.
        assert_eq!(explicit.resolved_day_of_week(), DayOfWeek::Friday);
    }
}
