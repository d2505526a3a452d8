// src/session/async_session.rs

use crate::common::{
    command::Command,
    config::SessionConfig,
    error::Shtc3Error,
    response::{decode, ValidatedMeasurement, RESPONSE_LEN},
};
use crate::session::{CycleOutcome, SessionState};
use core::ops::ControlFlow;
use core::time::Duration;
use embedded_hal_async::delay::DelayNs;
use embedded_hal_async::i2c::I2c;

/// Async counterpart of [`SyncSession`](crate::session::SyncSession).
///
/// There is no drop guard here (drop cannot await), so every exit path after
/// a successful power-up sends power-down explicitly. Bus timeouts are left to
/// the HAL.
pub struct AsyncSession<I2C, D> {
    i2c: I2C,
    delay: D,
    config: SessionConfig,
    state: SessionState,
}

impl<I2C, D> AsyncSession<I2C, D>
where
    I2C: I2c,
    D: DelayNs,
{
    pub fn new(i2c: I2C, delay: D) -> Self {
        AsyncSession {
            i2c,
            delay,
            config: SessionConfig::default(),
            state: SessionState::Idle,
        }
    }

    pub fn with_config(i2c: I2C, delay: D, config: SessionConfig) -> Result<Self, Shtc3Error<I2C::Error>> {
        config.validate().map_err(|_| Shtc3Error::InvalidConfig)?;
        Ok(AsyncSession {
            i2c,
            delay,
            config,
            state: SessionState::Idle,
        })
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Gives the bus and delay back.
    pub fn release(self) -> (I2C, D) {
        (self.i2c, self.delay)
    }

    /// Runs one full cycle: power-up, settle, measure, power-down.
    pub async fn measure_cycle(&mut self) -> CycleOutcome<I2C::Error> {
        self.send_command(Command::PowerUp).await?;
        self.set_state(SessionState::PoweredUp);

        let settle_time = self.config.settle_time;
        self.sleep(settle_time).await;
        let measured = self.measure().await;
        let powered_down = self.power_down().await;

        match (measured, powered_down) {
            (Ok(measurement), Ok(())) => Ok(measurement.to_physical()),
            (Ok(_), Err(e)) => {
                log::error!("power-down failed: {:?}", e);
                Err(e)
            }
            (Err(e), powered_down) => {
                if e.is_checksum() {
                    log::warn!("discarding reading: {}", e);
                } else {
                    log::error!("measurement failed: {:?}", e);
                }
                if let Err(pd) = powered_down {
                    log::error!("power-down failed: {:?}", pd);
                }
                Err(e)
            }
        }
    }

    /// Repeats [`measure_cycle`](Self::measure_cycle) until `report` breaks.
    /// Returns the number of cycles run.
    pub async fn run<F>(&mut self, mut report: F) -> usize
    where
        F: FnMut(&CycleOutcome<I2C::Error>) -> ControlFlow<()>,
    {
        let mut cycles = 0;
        loop {
            let outcome = self.measure_cycle().await;
            cycles += 1;
            if report(&outcome).is_break() {
                return cycles;
            }
            let interval = self.config.cycle_interval;
            self.sleep(interval).await;
            self.set_state(SessionState::Idle);
        }
    }

    async fn measure(&mut self) -> Result<ValidatedMeasurement, Shtc3Error<I2C::Error>> {
        self.set_state(SessionState::Measuring);
        let mut response = [0u8; RESPONSE_LEN];
        let address = self.config.address.as_u8();
        self.i2c
            .write_read(address, &Command::Measure.encode(), &mut response)
            .await
            .map_err(Shtc3Error::Io)?;
        log::trace!("response {:02x?}", response);
        decode(&response)
    }

    async fn power_down(&mut self) -> Result<(), Shtc3Error<I2C::Error>> {
        self.send_command(Command::PowerDown).await?;
        self.set_state(SessionState::PoweredDown);
        Ok(())
    }

    async fn send_command(&mut self, command: Command) -> Result<(), Shtc3Error<I2C::Error>> {
        let address = self.config.address.as_u8();
        log::trace!("write {} to {:#04x}", command, address);
        self.i2c
            .write(address, &command.encode())
            .await
            .map_err(Shtc3Error::Io)
    }

    async fn sleep(&mut self, duration: Duration) {
        let mut ms = duration.as_millis();
        while ms > 0 {
            let chunk = u32::try_from(ms).unwrap_or(u32::MAX);
            self.delay.delay_ms(chunk).await;
            ms -= u128::from(chunk);
        }
        let us = duration.subsec_micros() % 1000;
        if us > 0 {
            self.delay.delay_us(us).await;
        }
    }

    fn set_state(&mut self, next: SessionState) {
        if self.state != next {
            log::debug!("session {:?} -> {:?}", self.state, next);
            self.state = next;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::response::encode_frame;
    use embassy_futures::block_on;
    use embedded_hal::i2c::{ErrorKind, NoAcknowledgeSource};
    use embedded_hal_mock::eh1::delay::NoopDelay;
    use embedded_hal_mock::eh1::i2c::{Mock as I2cMock, Transaction};
    use float_cmp::approx_eq;

    const ADDR: u8 = 0x70;

    /// Adds up requested delays instead of waiting.
    #[derive(Debug, Default)]
    struct RecordingDelay {
        slept_us: u64,
        calls: usize,
    }

    impl DelayNs for RecordingDelay {
        async fn delay_ns(&mut self, ns: u32) {
            self.slept_us += u64::from(ns) / 1000;
            self.calls += 1;
        }

        async fn delay_us(&mut self, us: u32) {
            self.slept_us += u64::from(us);
            self.calls += 1;
        }

        async fn delay_ms(&mut self, ms: u32) {
            self.slept_us += u64::from(ms) * 1000;
            self.calls += 1;
        }
    }

    fn cycle(frame: [u8; RESPONSE_LEN]) -> [Transaction; 3] {
        [
            Transaction::write(ADDR, vec![0x35, 0x17]),
            Transaction::write_read(ADDR, vec![0x7C, 0xA2], frame.to_vec()),
            Transaction::write(ADDR, vec![0xB0, 0x98]),
        ]
    }

    #[test]
    fn test_async_cycle_success() {
        let expectations = [
            Transaction::write(ADDR, vec![0x35, 0x17]),
            Transaction::write_read(ADDR, vec![0x7C, 0xA2], encode_frame(0x664C, 0x7A30).to_vec()),
            Transaction::write(ADDR, vec![0xB0, 0x98]),
        ];
        let mut session = AsyncSession::new(I2cMock::new(&expectations), NoopDelay::new());

        let reading = block_on(session.measure_cycle()).unwrap();
        assert!(approx_eq!(f32, reading.temperature_c, 24.93, epsilon = 0.01));
        assert_eq!(session.state(), SessionState::PoweredDown);

        let (mut i2c, _) = session.release();
        i2c.done();
    }

    #[test]
    fn test_async_checksum_failure_powers_down() {
        let mut frame = encode_frame(0x664C, 0x7A30);
        frame[2] ^= 0xFF;
        let expectations = [
            Transaction::write(ADDR, vec![0x35, 0x17]),
            Transaction::write_read(ADDR, vec![0x7C, 0xA2], frame.to_vec()),
            Transaction::write(ADDR, vec![0xB0, 0x98]),
        ];
        let mut session = AsyncSession::new(I2cMock::new(&expectations), NoopDelay::new());

        let result = block_on(session.measure_cycle());
        assert!(matches!(result, Err(Shtc3Error::ChecksumMismatch { .. })));

        let (mut i2c, _) = session.release();
        i2c.done();
    }

    #[test]
    fn test_async_power_up_failure_sends_nothing_else() {
        let expectations = [Transaction::write(ADDR, vec![0x35, 0x17]).with_error(ErrorKind::Other)];
        let mut session = AsyncSession::new(I2cMock::new(&expectations), NoopDelay::new());

        let result = block_on(session.measure_cycle());
        assert!(matches!(result, Err(Shtc3Error::Io(ErrorKind::Other))));
        assert_eq!(session.state(), SessionState::Idle);

        let (mut i2c, _) = session.release();
        i2c.done();
    }

    #[test]
    fn test_async_measure_nack_still_powers_down() {
        let nack = ErrorKind::NoAcknowledge(NoAcknowledgeSource::Data);
        let expectations = [
            Transaction::write(ADDR, vec![0x35, 0x17]),
            Transaction::write_read(ADDR, vec![0x7C, 0xA2], vec![0; RESPONSE_LEN]).with_error(nack),
            Transaction::write(ADDR, vec![0xB0, 0x98]),
        ];
        let mut session = AsyncSession::new(I2cMock::new(&expectations), NoopDelay::new());

        let result = block_on(session.measure_cycle());
        assert!(matches!(result, Err(Shtc3Error::Io(ErrorKind::NoAcknowledge(_)))));
        assert_eq!(session.state(), SessionState::PoweredDown);

        let (mut i2c, _) = session.release();
        i2c.done();
    }

    #[test]
    fn test_async_run_repeats_cycle_and_sleeps_interval() {
        let frame = encode_frame(0x6666, 0x8000);
        let expectations: Vec<Transaction> =
            cycle(frame).into_iter().chain(cycle(frame)).chain(cycle(frame)).collect();
        let config = SessionConfig::default()
            .with_settle_time(Duration::from_micros(1_500))
            .with_cycle_interval(Duration::from_millis(250));
        let mut session =
            AsyncSession::with_config(I2cMock::new(&expectations), RecordingDelay::default(), config)
                .unwrap();

        let mut seen = 0;
        let cycles = block_on(session.run(|outcome| {
            assert!(outcome.is_ok());
            seen += 1;
            if seen == 3 {
                ControlFlow::Break(())
            } else {
                ControlFlow::Continue(())
            }
        }));
        assert_eq!(cycles, 3);
        assert_eq!(session.state(), SessionState::PoweredDown);

        let (mut i2c, delay) = session.release();
        i2c.done();
        // Three settles and two intervals; no sleep after the final cycle.
        assert_eq!(delay.slept_us, 3 * 1_500 + 2 * 250_000);
    }

    #[test]
    fn test_async_long_cycle_interval_is_not_truncated() {
        let frame = encode_frame(0x664C, 0x7A30);
        let expectations: Vec<Transaction> = cycle(frame).into_iter().chain(cycle(frame)).collect();
        let two_hours = Duration::from_secs(2 * 60 * 60);
        let config = SessionConfig::default().with_cycle_interval(two_hours);
        let mut session =
            AsyncSession::with_config(I2cMock::new(&expectations), RecordingDelay::default(), config)
                .unwrap();

        let mut seen = 0;
        let cycles = block_on(session.run(|_| {
            seen += 1;
            if seen == 2 {
                ControlFlow::Break(())
            } else {
                ControlFlow::Continue(())
            }
        }));
        assert_eq!(cycles, 2);

        let (mut i2c, delay) = session.release();
        i2c.done();
        assert_eq!(delay.slept_us, 2 * 1_000 + 7_200_000_000);
    }
}
