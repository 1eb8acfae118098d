//! Forced-restart capability

/// Watchdog-backed reset control.
///
/// The reset sequence arms the watchdog and then parks the processor;
/// the unserviced watchdog performs the actual restart. `halt` is a
/// separate call so a test double can observe the sequence instead of
/// spinning forever.
pub trait SystemReset {
    /// Arm the watchdog. Once armed it is never serviced again.
    fn arm_watchdog(&mut self, timeout_ms: u32, pause_on_debug: bool);

    /// Park the processor until the watchdog restarts it.
    fn halt(&mut self) -> !;
}
