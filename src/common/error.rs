// src/common/error.rs

use super::response::Field;

#[derive(Debug, thiserror::Error)]
pub enum Shtc3Error<E = ()>
where
    E: core::fmt::Debug, // Debug is enough for the generic Io error
{
    /// Underlying I/O error from the bus implementation.
    #[error("I/O error: {0:?}")]
    Io(E),

    /// Bus operation did not complete before the configured timeout.
    #[error("Operation timed out")]
    Timeout,

    /// Received checksum does not match the one calculated over the data word.
    #[error("{field} checksum mismatch: expected {expected:#04x}, calculated {calculated:#04x}")]
    ChecksumMismatch {
        field: Field,
        expected: u8,
        calculated: u8,
    },

    /// A frame did not have the length the protocol requires.
    #[error("Invalid frame length: expected {expected}, got {got}")]
    InvalidLength { expected: usize, got: usize },

    /// Buffer provided was too small.
    #[error("Buffer overflow: needed {needed}, got {got}")]
    BufferOverflow { needed: usize, got: usize },

    /// Address does not fit in 7 bits.
    #[error("Invalid I2C address: {0:#04x}")]
    InvalidAddress(u8),

    /// Opcode is not part of the command set.
    #[error("Unknown command opcode: {0:#06x}")]
    UnknownCommand(u16),

    /// Session configuration was rejected.
    #[error("Invalid session configuration")]
    InvalidConfig,
}

impl<E: core::fmt::Debug> Shtc3Error<E> {
    /// True for failures of the bus itself (I/O error or timeout).
    pub fn is_transport(&self) -> bool {
        matches!(self, Shtc3Error::Io(_) | Shtc3Error::Timeout)
    }

    /// True when the data arrived but failed checksum validation.
    pub fn is_checksum(&self) -> bool {
        matches!(self, Shtc3Error::ChecksumMismatch { .. })
    }
}

// Allow mapping from underlying bus error
impl<E: core::fmt::Debug> From<E> for Shtc3Error<E> {
    fn from(e: E) -> Self {
        Shtc3Error::Io(e)
    }
}
