// src/sensor/simulated.rs

use crate::common::{
    command::Command,
    hal_traits::{Shtc3Bus, Shtc3Timer, TickInstant},
    response::{encode_frame, Field, RESPONSE_LEN},
    timing, Shtc3Addr,
};
use arrayvec::ArrayVec;
use core::time::Duration;

/// Number of accepted commands kept in the history.
pub const HISTORY_CAPACITY: usize = 64;

/// Errors the simulated bus can report.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum SimBusError {
    /// Nobody acknowledged the address, or the sensor refused the command.
    Nack,
    /// The frame did not decode to a known command.
    UnknownCommand,
}

/// A simulated SHTC3 on its own bus, with a virtual clock.
///
/// * While asleep, only the power-up command is acknowledged.
/// * A measurement stays pending for `measurement_duration`; polls before that
///   return `WouldBlock`.
/// * Faults can be injected one-shot per command or per response field.
#[derive(Debug, Clone)]
pub struct SimulatedShtc3 {
    address: u8,
    awake: bool,
    raw_temperature: u16,
    raw_humidity: u16,
    clock_us: u64,
    measurement_duration: Duration,
    measurement_started: Option<TickInstant>,
    stuck: bool,
    corrupt_next: Option<Field>,
    fail_next: Option<Command>,
    history: ArrayVec<Command, HISTORY_CAPACITY>,
}

impl SimulatedShtc3 {
    pub fn new(raw_temperature: u16, raw_humidity: u16) -> Self {
        SimulatedShtc3 {
            address: Shtc3Addr::DEFAULT_ADDRESS.as_u8(),
            awake: false,
            raw_temperature,
            raw_humidity,
            clock_us: 0,
            measurement_duration: timing::MEASUREMENT_DURATION_MAX,
            measurement_started: None,
            stuck: false,
            corrupt_next: None,
            fail_next: None,
            history: ArrayVec::new(),
        }
    }

    pub fn set_raw(&mut self, raw_temperature: u16, raw_humidity: u16) {
        self.raw_temperature = raw_temperature;
        self.raw_humidity = raw_humidity;
    }

    pub fn set_measurement_duration(&mut self, duration: Duration) {
        self.measurement_duration = duration;
    }

    /// A stuck sensor never finishes a measurement.
    pub fn set_stuck(&mut self, stuck: bool) {
        self.stuck = stuck;
    }

    /// Flips a bit in the checksum of `field` in the next response.
    pub fn corrupt_next_response(&mut self, field: Field) {
        self.corrupt_next = Some(field);
    }

    /// NACKs the next occurrence of `command`.
    pub fn fail_next_command(&mut self, command: Command) {
        self.fail_next = Some(command);
    }

    pub fn is_awake(&self) -> bool {
        self.awake
    }

    pub fn elapsed(&self) -> Duration {
        Duration::from_micros(self.clock_us)
    }

    /// Commands the sensor accepted, oldest first. Recording stops when full.
    pub fn history(&self) -> &[Command] {
        &self.history
    }

    pub fn count(&self, command: Command) -> usize {
        self.history.iter().filter(|c| **c == command).count()
    }

    pub fn clear_history(&mut self) {
        self.history.clear();
    }

    fn addressed_command(&self, address: u8, bytes: &[u8]) -> Result<Command, SimBusError> {
        if address != self.address {
            return Err(SimBusError::Nack);
        }
        Command::parse(bytes).map_err(|_| SimBusError::UnknownCommand)
    }

    fn accept(&mut self, address: u8, bytes: &[u8]) -> Result<Command, SimBusError> {
        let command = self.addressed_command(address, bytes)?;
        if self.fail_next == Some(command) {
            self.fail_next = None;
            return Err(SimBusError::Nack);
        }
        if !self.awake && command != Command::PowerUp {
            return Err(SimBusError::Nack);
        }
        Ok(command)
    }

    fn record(&mut self, command: Command) {
        // Full history is not an error for the device.
        let _ = self.history.try_push(command);
    }

    fn fill_response(&mut self, response: &mut [u8]) {
        let mut frame = encode_frame(self.raw_temperature, self.raw_humidity);
        match self.corrupt_next.take() {
            Some(Field::Temperature) => frame[2] ^= 0x01,
            Some(Field::Humidity) => frame[5] ^= 0x01,
            None => {}
        }
        let len = response.len().min(RESPONSE_LEN);
        response[..len].copy_from_slice(&frame[..len]);
    }
}

impl Shtc3Timer for SimulatedShtc3 {
    type Instant = TickInstant;

    fn now(&self) -> Self::Instant {
        TickInstant(self.clock_us)
    }

    fn delay_us(&mut self, us: u32) {
        self.clock_us = self.clock_us.saturating_add(u64::from(us));
    }

    fn delay_ms(&mut self, ms: u32) {
        self.clock_us = self.clock_us.saturating_add(u64::from(ms) * 1000);
    }
}

impl Shtc3Bus for SimulatedShtc3 {
    type Error = SimBusError;

    fn write(&mut self, address: u8, bytes: &[u8]) -> nb::Result<(), Self::Error> {
        let command = self.accept(address, bytes)?;
        match command {
            Command::PowerUp => self.awake = true,
            Command::PowerDown => {
                self.awake = false;
                self.measurement_started = None;
            }
            // A plain write of the measure command starts a measurement with no readout.
            Command::Measure => self.measurement_started = Some(self.now()),
        }
        self.record(command);
        Ok(())
    }

    fn write_read(
        &mut self,
        address: u8,
        cmd: &[u8],
        response: &mut [u8],
    ) -> nb::Result<(), Self::Error> {
        let now = self.now();
        let started = match self.measurement_started {
            // Each poll is its own transaction and must still address a measure.
            Some(started) => {
                if self.addressed_command(address, cmd)? != Command::Measure {
                    return Err(nb::Error::Other(SimBusError::Nack));
                }
                started
            }
            None => {
                let command = self.accept(address, cmd)?;
                if command != Command::Measure {
                    return Err(nb::Error::Other(SimBusError::Nack));
                }
                self.record(command);
                self.measurement_started = Some(now);
                now
            }
        };

        if self.stuck || now - started < self.measurement_duration {
            return Err(nb::Error::WouldBlock);
        }

        self.measurement_started = None;
        self.fill_response(response);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::response::decode;

    const ADDR: u8 = 0x70;

    #[test]
    fn test_asleep_sensor_only_accepts_power_up() {
        let mut sim = SimulatedShtc3::new(0x664C, 0x7A30);
        assert!(!sim.is_awake());
        assert_eq!(
            sim.write(ADDR, &Command::Measure.encode()),
            Err(nb::Error::Other(SimBusError::Nack))
        );
        assert_eq!(
            sim.write(ADDR, &Command::PowerDown.encode()),
            Err(nb::Error::Other(SimBusError::Nack))
        );
        assert_eq!(sim.write(ADDR, &Command::PowerUp.encode()), Ok(()));
        assert!(sim.is_awake());
        assert_eq!(sim.history(), &[Command::PowerUp]);
    }

    #[test]
    fn test_wrong_address_and_unknown_command() {
        let mut sim = SimulatedShtc3::new(0, 0);
        assert_eq!(
            sim.write(0x44, &Command::PowerUp.encode()),
            Err(nb::Error::Other(SimBusError::Nack))
        );
        assert_eq!(
            sim.write(ADDR, &[0xEF, 0xC8]),
            Err(nb::Error::Other(SimBusError::UnknownCommand))
        );
        assert!(sim.history().is_empty());
    }

    #[test]
    fn test_measurement_blocks_until_done() {
        let mut sim = SimulatedShtc3::new(0x664C, 0x7A30);
        sim.write(ADDR, &Command::PowerUp.encode()).unwrap();

        let mut response = [0u8; RESPONSE_LEN];
        let cmd = Command::Measure.encode();
        assert_eq!(sim.write_read(ADDR, &cmd, &mut response), Err(nb::Error::WouldBlock));
        sim.delay_ms(5);
        assert_eq!(sim.write_read(ADDR, &cmd, &mut response), Err(nb::Error::WouldBlock));
        sim.delay_ms(10);
        assert_eq!(sim.write_read(ADDR, &cmd, &mut response), Ok(()));
        assert_eq!(response, [0x66, 0x4C, 0xCE, 0x7A, 0x30, 0x91]);
        // Only one measure command is recorded for all polls.
        assert_eq!(sim.count(Command::Measure), 1);
    }

    #[test]
    fn test_pending_measurement_polls_are_checked() {
        let mut sim = SimulatedShtc3::new(0x664C, 0x7A30);
        sim.write(ADDR, &Command::PowerUp.encode()).unwrap();

        let mut response = [0u8; RESPONSE_LEN];
        let cmd = Command::Measure.encode();
        assert_eq!(sim.write_read(ADDR, &cmd, &mut response), Err(nb::Error::WouldBlock));
        sim.delay_ms(15);

        assert_eq!(
            sim.write_read(0x44, &cmd, &mut response),
            Err(nb::Error::Other(SimBusError::Nack))
        );
        assert_eq!(
            sim.write_read(ADDR, &Command::PowerUp.encode(), &mut response),
            Err(nb::Error::Other(SimBusError::Nack))
        );
        assert_eq!(
            sim.write_read(ADDR, &[0xEF, 0xC8], &mut response),
            Err(nb::Error::Other(SimBusError::UnknownCommand))
        );
        assert_eq!(response, [0u8; RESPONSE_LEN]);

        // The measurement is still pending for a well-formed poll.
        assert_eq!(sim.write_read(ADDR, &cmd, &mut response), Ok(()));
        assert_eq!(response, [0x66, 0x4C, 0xCE, 0x7A, 0x30, 0x91]);
        assert_eq!(sim.count(Command::Measure), 1);
    }

    #[test]
    fn test_corruption_is_one_shot() {
        let mut sim = SimulatedShtc3::new(0x664C, 0x7A30);
        sim.set_measurement_duration(Duration::ZERO);
        sim.write(ADDR, &Command::PowerUp.encode()).unwrap();
        sim.corrupt_next_response(Field::Humidity);

        let mut response = [0u8; RESPONSE_LEN];
        let cmd = Command::Measure.encode();
        sim.write_read(ADDR, &cmd, &mut response).unwrap();
        assert!(decode::<()>(&response).is_err());
        sim.write_read(ADDR, &cmd, &mut response).unwrap();
        assert!(decode::<()>(&response).is_ok());
    }

    #[test]
    fn test_fail_next_command() {
        let mut sim = SimulatedShtc3::new(0, 0);
        sim.fail_next_command(Command::PowerUp);
        assert_eq!(
            sim.write(ADDR, &Command::PowerUp.encode()),
            Err(nb::Error::Other(SimBusError::Nack))
        );
        assert_eq!(sim.write(ADDR, &Command::PowerUp.encode()), Ok(()));
    }

    #[test]
    fn test_power_down_cancels_measurement() {
        let mut sim = SimulatedShtc3::new(0, 0);
        sim.write(ADDR, &Command::PowerUp.encode()).unwrap();
        let mut response = [0u8; RESPONSE_LEN];
        let _ = sim.write_read(ADDR, &Command::Measure.encode(), &mut response);
        sim.write(ADDR, &Command::PowerDown.encode()).unwrap();
        assert!(!sim.is_awake());
        assert_eq!(sim.history(), &[Command::PowerUp, Command::Measure, Command::PowerDown]);
    }
}
