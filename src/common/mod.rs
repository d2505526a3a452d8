// src/common/mod.rs

pub mod address;
pub mod command;
pub mod config;
pub mod convert;
pub mod crc;
pub mod error;
pub mod hal_traits;
pub mod response;
pub mod timing;

// --- Re-export key types/traits/functions for easier access ---

pub use address::Shtc3Addr;

pub use command::{encode, Command, COMMAND_LEN};

pub use config::SessionConfig;

pub use convert::{
    celsius_to_fahrenheit, raw_to_celsius, raw_to_humidity, to_physical, PhysicalReading,
};

pub use crc::{calculate_crc8, validate, verify_word};

pub use error::Shtc3Error;

pub use hal_traits::{Shtc3Bus, Shtc3Instant, Shtc3Timer, TickInstant};

pub use response::{decode, encode_frame, Field, RawReading, ValidatedMeasurement, RESPONSE_LEN};

// Timing constants are not re-exported; use common::timing::*
