//! Boot-relative monotonic time capability

/// Monotonic microsecond counter since power-on.
///
/// The counter never goes backwards and has no relation to calendar
/// time. A 64-bit count at 1 MHz does not wrap within device lifetime,
/// so reads are treated as infallible.
pub trait MonotonicClock {
    /// Microseconds elapsed since the device booted.
    fn now_micros(&self) -> u64;
}
