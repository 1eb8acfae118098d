//! Hardware capability traits for the autosampler firmware
//!
//! This crate defines the traits that abstract over the hardware the
//! device logic touches: the calendar clock (RTC), the boot-relative
//! monotonic counter, the watchdog-backed reset, and the diagnostic
//! output stream. BSPs implement these traits; host tests substitute
//! mocks.

#![no_std]
#![deny(unsafe_code)]

#[cfg(test)]
extern crate std;

pub mod calendar;
pub mod diag;
pub mod monotonic;
pub mod reset;
pub mod rtc;
