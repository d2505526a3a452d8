// src/session/sync_session/mod.rs

use crate::common::{
    command::Command,
    config::SessionConfig,
    error::Shtc3Error,
    hal_traits::{Shtc3Bus, Shtc3Timer},
};
use crate::session::{CycleOutcome, SessionState};
use core::ops::ControlFlow;

mod io_helpers;
mod power_guard;

pub use power_guard::PowerGuard;

/// Largest response any command produces.
pub const MAX_RESPONSE_LEN: usize = crate::common::response::RESPONSE_LEN;

/// Drives one sensor through power-up, measurement and power-down, blocking on the bus.
///
/// The session owns the interface for its whole lifetime; callers sharing a
/// bus with other devices must serialize access outside of it.
#[derive(Debug)]
pub struct SyncSession<IF>
where
    IF: Shtc3Bus + Shtc3Timer,
{
    interface: IF,
    config: SessionConfig,
    state: SessionState,
}

impl<IF> SyncSession<IF>
where
    IF: Shtc3Bus + Shtc3Timer,
{
    pub fn new(interface: IF) -> Self {
        SyncSession {
            interface,
            config: SessionConfig::default(),
            state: SessionState::Idle,
        }
    }

    pub fn with_config(interface: IF, config: SessionConfig) -> Result<Self, Shtc3Error<IF::Error>> {
        config.validate().map_err(|_| Shtc3Error::InvalidConfig)?;
        Ok(SyncSession {
            interface,
            config,
            state: SessionState::Idle,
        })
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn interface(&self) -> &IF {
        &self.interface
    }

    pub fn interface_mut(&mut self) -> &mut IF {
        &mut self.interface
    }

    /// Gives the interface back.
    pub fn release(self) -> IF {
        self.interface
    }

    /// Wakes the sensor. The returned guard powers it down again when released or dropped.
    pub fn power_up(&mut self) -> Result<PowerGuard<'_, IF>, Shtc3Error<IF::Error>> {
        self.send_command(Command::PowerUp)?;
        self.set_state(SessionState::PoweredUp);
        Ok(PowerGuard::new(self))
    }

    /// Runs one full cycle: power-up, settle, measure, power-down.
    ///
    /// Power-down is sent exactly once whenever power-up succeeded, whatever
    /// the measurement outcome. Nothing is retried.
    pub fn measure_cycle(&mut self) -> CycleOutcome<IF::Error> {
        let mut guard = self.power_up()?;
        guard.settle();
        let measured = guard.measure();
        let powered_down = guard.release();

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
    ///
    /// Every outcome, failures included, goes to `report`; the loop then waits
    /// the configured cycle interval and starts over from power-up.
    /// Returns the number of cycles run.
    pub fn run<F>(&mut self, mut report: F) -> usize
    where
        F: FnMut(&CycleOutcome<IF::Error>) -> ControlFlow<()>,
    {
        let mut cycles = 0;
        loop {
            let outcome = self.measure_cycle();
            cycles += 1;
            if report(&outcome).is_break() {
                return cycles;
            }
            let interval = self.config.cycle_interval;
            self.delay(interval);
            self.set_state(SessionState::Idle);
        }
    }

    pub(crate) fn power_down(&mut self) -> Result<(), Shtc3Error<IF::Error>> {
        self.send_command(Command::PowerDown)?;
        self.set_state(SessionState::PoweredDown);
        Ok(())
    }

    fn set_state(&mut self, next: SessionState) {
        if self.state != next {
            log::debug!("session {:?} -> {:?}", self.state, next);
            self.state = next;
        }
    }
}
