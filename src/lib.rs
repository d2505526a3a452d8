// src/lib.rs

//! Protocol driver for SHTC3-class temperature and humidity sensors.
//!
//! * [`common`]: command frames, CRC-8 validation, response decoding, unit conversion.
//! * [`session`]: the power-up / measure / power-down cycle over a bus.
//! * [`sensor`]: a simulated sensor for exercising host code without hardware.

#![cfg_attr(not(test), no_std)]

pub mod common;
#[cfg(feature = "impl-generic-hal")]
pub mod hal;
pub mod sensor;
pub mod session;

// Re-export key types for convenience
pub use common::{Command, PhysicalReading, SessionConfig, Shtc3Addr, Shtc3Error, ValidatedMeasurement};
pub use session::{SessionState, SyncSession};
