// src/session/mod.rs

pub mod sync_session;

#[cfg(feature = "async")]
pub mod async_session;

pub use sync_session::{PowerGuard, SyncSession, MAX_RESPONSE_LEN};

#[cfg(feature = "async")]
pub use async_session::AsyncSession;

use crate::common::{convert::PhysicalReading, error::Shtc3Error};

/// Where a session is in its power/measure cycle.
///
/// ```text
/// Idle ──PowerUp──► PoweredUp ──Measure──► Measuring ──PowerDown──► PoweredDown
///  ▲                                                                    │
///  └──────────────────────── cycle interval ◄───────────────────────────┘
/// ```
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    PoweredUp,
    Measuring,
    PoweredDown,
}

/// What one cycle yields: a reading, or the reason there is none.
pub type CycleOutcome<E> = Result<PhysicalReading, Shtc3Error<E>>;
