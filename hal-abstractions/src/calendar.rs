//! Calendar arithmetic for the clock timestamp
//!
//! Implements the Gregorian month-length rules the clock peripheral
//! enforces and derives the weekday from the civil date using Howard
//! Hinnant's days_from_civil algorithm.
//! Reference: http://howardhinnant.github.io/date_algorithms.html

use crate::rtc::DayOfWeek;

/// Check if year is a leap year (Gregorian calendar)
///
/// - Divisible by 4: leap year
/// - EXCEPT divisible by 100: not a leap year
/// - EXCEPT divisible by 400: leap year
pub fn is_leap_year(year: u16) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}

/// Number of days in the given month, accounting for leap years.
///
/// Returns 0 for a month outside 1..=12 so any day fails the range
/// check against it.
pub fn days_in_month(year: u16, month: u8) -> u8 {
    match month {
        1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
        4 | 6 | 9 | 11 => 30,
        2 => {
            if is_leap_year(year) {
                29
            } else {
                28
            }
        }
        _ => 0,
    }
}

/// Weekday of a civil date.
///
/// 1970-01-01 (day zero of the epoch) was a Thursday; offsetting by 4
/// lands the count on the Sunday-based numbering of [`DayOfWeek`].
pub fn day_of_week(year: u16, month: u8, day: u8) -> DayOfWeek {
    match (days_from_civil(year, month, day) + 4).rem_euclid(7) {
        0 => DayOfWeek::Sunday,
        1 => DayOfWeek::Monday,
        2 => DayOfWeek::Tuesday,
        3 => DayOfWeek::Wednesday,
        4 => DayOfWeek::Thursday,
        5 => DayOfWeek::Friday,
        _ => DayOfWeek::Saturday,
    }
}

/// Convert civil date (year, month, day) to days since the Unix epoch
///
/// Howard Hinnant's days_from_civil algorithm.
/// Reference: http://howardhinnant.github.io/date_algorithms.html
///
/// This is an O(1) algorithm that correctly handles all leap years.
fn days_from_civil(year: u16, month: u8, day: u8) -> i32 {
    let y = year as i32;
    let m = month as i32;
    let d = day as i32;

    // Adjust year and month to make March = month 0, February = month 11
    let (y, m) = if m <= 2 { (y - 1, m + 9) } else { (y, m - 3) };

    let era = if y >= 0 { y } else { y - 399 } / 400;
    let yoe = (y - era * 400) as u32; // year of era [0, 399]
    let doy = (153 * (m as u32) + 2) / 5 + (d as u32) - 1; // day of year [0, 365]
    let doe = yoe * 365 + yoe / 4 - yoe / 100 + doy; // day of era [0, 146096]

    era * 146097 + (doe as i32) - 719468 // 719468 = days from 0000-03-01 to 1970-01-01
}
