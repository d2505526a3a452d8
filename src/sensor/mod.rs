// src/sensor/mod.rs

// Device-side model of the sensor. It answers bus transactions the way the
// real part does, so host code can be exercised without hardware.

mod simulated;

pub use simulated::{SimBusError, SimulatedShtc3, HISTORY_CAPACITY};
