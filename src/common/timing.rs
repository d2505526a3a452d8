// src/common/timing.rs

use core::time::Duration;

// Nominal values from the SHTC3 datasheet (Table 5, "Timing specifications").

// === Power Timing ===

/// Sensor wake-up time after a power-up command. Shorter settle times are rejected.
pub const SETTLE_TIME_MIN: Duration = Duration::from_micros(240);
/// Default delay between power-up and the measure command.
pub const SETTLE_TIME_DEFAULT: Duration = Duration::from_millis(1);

// === Bus Timing ===

/// Default time a single bus call may stay pending before it is abandoned.
pub const IO_TIMEOUT_DEFAULT: Duration = Duration::from_millis(1000);
/// Delay between two polls of a pending bus call.
pub const IO_POLL_INTERVAL: Duration = Duration::from_micros(100);

// === Measurement Timing ===

/// Maximum duration of a normal-mode measurement.
pub const MEASUREMENT_DURATION_MAX: Duration = Duration::from_micros(12_100);

// === Cycle Timing ===

/// Default delay between the end of one cycle and the next power-up.
pub const CYCLE_INTERVAL_DEFAULT: Duration = Duration::from_millis(2000);
