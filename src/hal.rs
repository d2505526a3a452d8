// src/hal.rs

//! Adapter from `embedded-hal` 1.0 blocking traits to the crate's bus traits.
//!
//! Blocking I2C calls never return `WouldBlock`, so bus timeouts are whatever
//! the HAL enforces. The clock only advances through this adapter's delays.

use crate::common::hal_traits::{Shtc3Bus, Shtc3Timer, TickInstant};
use embedded_hal::delay::DelayNs;
use embedded_hal::i2c::I2c;

/// Wraps a blocking I2C bus and a delay provider.
#[derive(Debug)]
pub struct HalInterface<I2C, D> {
    i2c: I2C,
    delay: D,
    elapsed_us: u64,
}

impl<I2C, D> HalInterface<I2C, D>
where
    I2C: I2c,
    D: DelayNs,
{
    pub fn new(i2c: I2C, delay: D) -> Self {
        HalInterface { i2c, delay, elapsed_us: 0 }
    }

    /// Gives the bus and delay back.
    pub fn release(self) -> (I2C, D) {
        (self.i2c, self.delay)
    }
}

impl<I2C, D> Shtc3Timer for HalInterface<I2C, D>
where
    I2C: I2c,
    D: DelayNs,
{
    type Instant = TickInstant;

    fn now(&self) -> Self::Instant {
        TickInstant(self.elapsed_us)
    }

    fn delay_us(&mut self, us: u32) {
        self.delay.delay_us(us);
        self.elapsed_us = self.elapsed_us.saturating_add(u64::from(us));
    }

    fn delay_ms(&mut self, ms: u32) {
        self.delay.delay_ms(ms);
        self.elapsed_us = self.elapsed_us.saturating_add(u64::from(ms) * 1000);
    }
}

impl<I2C, D> Shtc3Bus for HalInterface<I2C, D>
where
    I2C: I2c,
    D: DelayNs,
{
    type Error = I2C::Error;

    fn write(&mut self, address: u8, bytes: &[u8]) -> nb::Result<(), Self::Error> {
        self.i2c.write(address, bytes).map_err(nb::Error::Other)
    }

    fn write_read(
        &mut self,
        address: u8,
        cmd: &[u8],
        response: &mut [u8],
    ) -> nb::Result<(), Self::Error> {
        self.i2c.write_read(address, cmd, response).map_err(nb::Error::Other)
    }
}
