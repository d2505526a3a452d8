// src/common/hal_traits.rs

use core::fmt::Debug;
use core::ops::{Add, Sub};
use core::time::Duration;

/// A point in time as reported by an [`Shtc3Timer`].
pub trait Shtc3Instant:
    Copy + Ord + Add<Duration, Output = Self> + Sub<Self, Output = Duration>
{
}

impl<T> Shtc3Instant for T where
    T: Copy + Ord + Add<Duration, Output = T> + Sub<T, Output = Duration>
{
}

/// Microsecond tick count for interfaces that only know the time they spent
/// in their own delays.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct TickInstant(pub u64);

impl Add<Duration> for TickInstant {
    type Output = Self;
    fn add(self, rhs: Duration) -> Self {
        TickInstant(self.0.saturating_add(rhs.as_micros() as u64))
    }
}

impl Sub<TickInstant> for TickInstant {
    type Output = Duration;
    fn sub(self, rhs: TickInstant) -> Duration {
        Duration::from_micros(self.0.saturating_sub(rhs.0))
    }
}

/// Abstraction for timer/delay operations.
///
/// Delays are expected to suspend the caller (sleep, WFI, yield), not busy-wait.
pub trait Shtc3Timer {
    type Instant: Shtc3Instant;

    /// Current time, used for bus timeouts.
    fn now(&self) -> Self::Instant;

    /// Delay for at least the specified number of microseconds.
    fn delay_us(&mut self, us: u32);

    /// Delay for at least the specified number of milliseconds.
    fn delay_ms(&mut self, ms: u32);
}

/// Abstraction for non-blocking I2C transactions with the sensor.
pub trait Shtc3Bus {
    /// Associated error type for communication errors.
    type Error: Debug;

    /// Attempts to write `bytes` to the device at the 7-bit `address`.
    ///
    /// Returns `Err(nb::Error::WouldBlock)` while the transaction is still in
    /// progress (or the device NACKs because it is busy).
    fn write(&mut self, address: u8, bytes: &[u8]) -> nb::Result<(), Self::Error>;

    /// Attempts to write `cmd` and then read `response.len()` bytes in one transaction.
    ///
    /// `response` is only meaningful once `Ok(())` is returned.
    fn write_read(
        &mut self,
        address: u8,
        cmd: &[u8],
        response: &mut [u8],
    ) -> nb::Result<(), Self::Error>;
}
