// src/common/config.rs

use core::time::Duration;

use super::{address::Shtc3Addr, error::Shtc3Error, timing};

/// Parameters of a measurement session.
///
/// Passed explicitly to the session; there is no global configuration.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    /// Bus address of the sensor.
    pub address: Shtc3Addr,
    /// Delay between power-up and the measure command.
    pub settle_time: Duration,
    /// Limit for each individual bus call.
    pub io_timeout: Duration,
    /// Delay between the end of one cycle and the start of the next.
    pub cycle_interval: Duration,
}

impl Default for SessionConfig {
    fn default() -> Self {
        SessionConfig {
            address: Shtc3Addr::DEFAULT_ADDRESS,
            settle_time: timing::SETTLE_TIME_DEFAULT,
            io_timeout: timing::IO_TIMEOUT_DEFAULT,
            cycle_interval: timing::CYCLE_INTERVAL_DEFAULT,
        }
    }
}

impl SessionConfig {
    pub fn with_address(mut self, address: Shtc3Addr) -> Self {
        self.address = address;
        self
    }

    pub fn with_settle_time(mut self, settle_time: Duration) -> Self {
        self.settle_time = settle_time;
        self
    }

    pub fn with_io_timeout(mut self, io_timeout: Duration) -> Self {
        self.io_timeout = io_timeout;
        self
    }

    pub fn with_cycle_interval(mut self, cycle_interval: Duration) -> Self {
        self.cycle_interval = cycle_interval;
        self
    }

    /// Rejects a settle time shorter than the sensor's wake-up time and a zero I/O timeout.
    pub fn validate(&self) -> Result<(), Shtc3Error<()>> {
        if self.settle_time < timing::SETTLE_TIME_MIN || self.io_timeout.is_zero() {
            return Err(Shtc3Error::InvalidConfig);
        }
        Ok(())
    }
}
