//! Platform-agnostic device time and reset logic
//!
//! The device half of the autosampler controller's time utility:
//! uptime reporting, wall-clock reporting and setting, and the
//! watchdog-backed reset. Everything is written against the capability
//! traits in `hal-abstractions`, so the whole surface runs against
//! mocks on the host.

#![no_std]
#![deny(unsafe_code)]

#[cfg(test)]
extern crate std;

pub mod service;

pub use service::{DeviceService, DiagnosticStyle, PrefixCase};
