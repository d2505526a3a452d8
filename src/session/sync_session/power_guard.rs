// src/session/sync_session/power_guard.rs

use super::SyncSession;
use crate::common::{
    command::Command,
    error::Shtc3Error,
    hal_traits::{Shtc3Bus, Shtc3Timer},
    response::{decode, ValidatedMeasurement, RESPONSE_LEN},
};
use crate::session::SessionState;

/// Proof that the sensor is powered up.
///
/// Created by [`SyncSession::power_up`]. Dropping the guard sends the
/// power-down command; use [`PowerGuard::release`] to observe its result.
#[must_use = "dropping the guard immediately powers the sensor down"]
pub struct PowerGuard<'s, IF>
where
    IF: Shtc3Bus + Shtc3Timer,
{
    session: &'s mut SyncSession<IF>,
    released: bool,
}

impl<'s, IF> PowerGuard<'s, IF>
where
    IF: Shtc3Bus + Shtc3Timer,
{
    pub(super) fn new(session: &'s mut SyncSession<IF>) -> Self {
        PowerGuard { session, released: false }
    }

    /// Waits the configured settle time.
    pub fn settle(&mut self) {
        let settle_time = self.session.config.settle_time;
        self.session.delay(settle_time);
    }

    /// Triggers a measurement, reads the response and validates both fields.
    pub fn measure(&mut self) -> Result<ValidatedMeasurement, Shtc3Error<IF::Error>> {
        self.session.set_state(SessionState::Measuring);
        let response = self.session.write_then_read(Command::Measure, RESPONSE_LEN)?;
        decode(&response)
    }

    /// Powers the sensor down now, returning the bus result.
    pub fn release(mut self) -> Result<(), Shtc3Error<IF::Error>> {
        self.released = true;
        self.session.power_down()
    }
}

impl<IF> Drop for PowerGuard<'_, IF>
where
    IF: Shtc3Bus + Shtc3Timer,
{
    fn drop(&mut self) {
        if self.released {
            return;
        }
        if let Err(e) = self.session.power_down() {
            log::error!("power-down on guard drop failed: {:?}", e);
        }
    }
}
