// src/common/crc.rs

use super::{error::Shtc3Error, response::Field};
use crc::{Algorithm, Crc};

/// CRC algorithm guarding every 16-bit word the sensor sends (CRC-8/NRSC-5).
/// Polynomial: 0x31 (x^8 + x^5 + x^4 + 1)
/// Initial Value: 0xFF
/// Input Reflected: false
/// Output Reflected: false
/// Final XOR: 0x00
/// Check Value: 0xF7 (for "123456789")
pub const SHTC3_CRC: Algorithm<u8> = Algorithm {
    width: 8,
    poly: 0x31,
    init: 0xFF,
    refin: false,
    refout: false,
    xorout: 0x00,
    check: 0xF7,
    residue: 0x00,
};

const CRC_COMPUTER: Crc<u8> = Crc::<u8>::new(&SHTC3_CRC);

/// Calculates the checksum of a data word as the sensor does: high byte first,
/// then low byte.
#[inline]
pub fn calculate_crc8(value: u16) -> u8 {
    CRC_COMPUTER.checksum(&value.to_be_bytes())
}

/// Returns `true` iff `expected` is the checksum of `value`.
#[inline]
pub fn validate(value: u16, expected: u8) -> bool {
    calculate_crc8(value) == expected
}

/// Verifies one data word, naming the field in the error on mismatch.
///
/// # Returns
///
/// * `Ok(())` if the checksum matches.
/// * `Err(Shtc3Error::ChecksumMismatch)` carrying the received and calculated bytes.
pub fn verify_word<E>(field: Field, value: u16, expected: u8) -> Result<(), Shtc3Error<E>>
where
    E: core::fmt::Debug,
{
    let calculated = calculate_crc8(value);
    if calculated == expected {
        Ok(())
    } else {
        Err(Shtc3Error::ChecksumMismatch { field, expected, calculated })
    }
}
