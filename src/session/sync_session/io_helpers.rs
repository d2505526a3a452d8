// src/session/sync_session/io_helpers.rs

use super::{SyncSession, MAX_RESPONSE_LEN};
use crate::common::{
    command::Command,
    error::Shtc3Error,
    hal_traits::{Shtc3Bus, Shtc3Timer},
    timing,
};
use arrayvec::ArrayVec;
use core::time::Duration;
use nb::Result as NbResult;

impl<IF> SyncSession<IF>
where
    IF: Shtc3Bus + Shtc3Timer,
{
    /// Executes a non-blocking bus operation (`f`) repeatedly until it
    /// stops returning `WouldBlock`, returning the final result or a timeout error.
    pub(super) fn execute_blocking_io_with_timeout<FN, T>(
        &mut self,
        timeout: Duration,
        mut f: FN,
    ) -> Result<T, Shtc3Error<IF::Error>>
    where
        FN: FnMut(&mut IF) -> NbResult<T, IF::Error>,
    {
        let start_time = self.interface.now();
        let deadline = start_time + timeout;

        loop {
            match f(&mut self.interface) {
                Ok(result) => return Ok(result),
                Err(nb::Error::WouldBlock) => {
                    if self.interface.now() >= deadline {
                        return Err(Shtc3Error::Timeout);
                    }
                    self.interface.delay_us(timing::IO_POLL_INTERVAL.as_micros() as u32);
                }
                Err(nb::Error::Other(e)) => return Err(Shtc3Error::Io(e)),
            }
        }
    }

    /// Sends a command frame with a plain write.
    pub(super) fn send_command(&mut self, command: Command) -> Result<(), Shtc3Error<IF::Error>> {
        let frame = command.encode();
        let address = self.config.address.as_u8();
        let timeout = self.config.io_timeout;
        log::trace!("write {} to {:#04x}", command, address);
        self.execute_blocking_io_with_timeout(timeout, |iface| iface.write(address, &frame))
    }

    /// Sends a command frame and reads `response_len` bytes back in one transaction.
    pub fn write_then_read(
        &mut self,
        command: Command,
        response_len: usize,
    ) -> Result<ArrayVec<u8, MAX_RESPONSE_LEN>, Shtc3Error<IF::Error>> {
        if response_len > MAX_RESPONSE_LEN {
            return Err(Shtc3Error::BufferOverflow {
                needed: response_len,
                got: MAX_RESPONSE_LEN,
            });
        }
        let mut response: ArrayVec<u8, MAX_RESPONSE_LEN> =
            core::iter::repeat(0u8).take(response_len).collect();

        let frame = command.encode();
        let address = self.config.address.as_u8();
        let timeout = self.config.io_timeout;
        log::trace!("write_read {} to {:#04x}, {} bytes", command, address, response_len);
        self.execute_blocking_io_with_timeout(timeout, |iface| {
            iface.write_read(address, &frame, &mut response)
        })?;
        log::trace!("response {:02x?}", response.as_slice());
        Ok(response)
    }

    /// Suspends for at least `duration` using the interface's delays.
    pub(super) fn delay(&mut self, duration: Duration) {
        let mut ms = duration.as_millis();
        while ms > 0 {
            let chunk = u32::try_from(ms).unwrap_or(u32::MAX);
            self.interface.delay_ms(chunk);
            ms -= u128::from(chunk);
        }
        let us = duration.subsec_micros() % 1000;
        if us > 0 {
            self.interface.delay_us(us);
        }
    }
}
