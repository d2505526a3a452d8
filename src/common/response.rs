//! Measurement response decoding.
//!
//! The sensor answers a measure command with six bytes: each 16-bit data word
//! is sent big-endian and followed by its own CRC-8.
//!
//! ```text
//! [ T_msb | T_lsb | T_crc | H_msb | H_lsb | H_crc ]
//! ```
//!
//! A reading is only accepted when both words pass their checksum.

use core::fmt;

use super::{
    convert::{to_physical, PhysicalReading},
    crc::{calculate_crc8, verify_word},
    error::Shtc3Error,
};

/// Length of a measurement response frame.
pub const RESPONSE_LEN: usize = 6;

/// Identifies one of the two checksummed words in a response.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Field {
    Temperature,
    Humidity,
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Field::Temperature => f.write_str("temperature"),
            Field::Humidity => f.write_str("humidity"),
        }
    }
}

/// A response frame split into its words, before validation.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct RawReading {
    pub raw_temperature: u16,
    pub temperature_crc: u8,
    pub raw_humidity: u16,
    pub humidity_crc: u8,
}

impl RawReading {
    pub fn from_frame(frame: &[u8; RESPONSE_LEN]) -> Self {
        RawReading {
            raw_temperature: u16::from_be_bytes([frame[0], frame[1]]),
            temperature_crc: frame[2],
            raw_humidity: u16::from_be_bytes([frame[3], frame[4]]),
            humidity_crc: frame[5],
        }
    }

    /// Checks both words. The first failing field is reported.
    pub fn validate<E>(&self) -> Result<ValidatedMeasurement, Shtc3Error<E>>
    where
        E: core::fmt::Debug,
    {
        verify_word(Field::Temperature, self.raw_temperature, self.temperature_crc)?;
        verify_word(Field::Humidity, self.raw_humidity, self.humidity_crc)?;
        Ok(ValidatedMeasurement {
            raw_temperature: self.raw_temperature,
            raw_humidity: self.raw_humidity,
        })
    }

    /// Per-field checksum faults as `(temperature_bad, humidity_bad)`.
    pub fn faulty_fields(&self) -> (bool, bool) {
        (
            calculate_crc8(self.raw_temperature) != self.temperature_crc,
            calculate_crc8(self.raw_humidity) != self.humidity_crc,
        )
    }
}

/// Raw temperature and humidity codes that both passed checksum validation.
///
/// There is no public constructor: values of this type only come out of
/// [`decode`] or [`RawReading::validate`].
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct ValidatedMeasurement {
    raw_temperature: u16,
    raw_humidity: u16,
}

impl ValidatedMeasurement {
    #[inline]
    pub const fn raw_temperature(&self) -> u16 {
        self.raw_temperature
    }

    #[inline]
    pub const fn raw_humidity(&self) -> u16 {
        self.raw_humidity
    }

    /// Converts to physical units.
    #[inline]
    pub fn to_physical(self) -> PhysicalReading {
        to_physical(self)
    }
}

/// Decodes a measurement response into a validated measurement.
///
/// # Returns
///
/// * `Ok(ValidatedMeasurement)` if the frame is six bytes and both checksums match.
/// * `Err(Shtc3Error::InvalidLength)` if the frame has the wrong length.
/// * `Err(Shtc3Error::ChecksumMismatch)` naming the first corrupted field.
pub fn decode<E>(frame: &[u8]) -> Result<ValidatedMeasurement, Shtc3Error<E>>
where
    E: core::fmt::Debug,
{
    let frame: &[u8; RESPONSE_LEN] = frame.try_into().map_err(|_| Shtc3Error::InvalidLength {
        expected: RESPONSE_LEN,
        got: frame.len(),
    })?;
    RawReading::from_frame(frame).validate()
}

/// Builds a correctly checksummed response frame for the given raw codes.
pub fn encode_frame(raw_temperature: u16, raw_humidity: u16) -> [u8; RESPONSE_LEN] {
    let [t_msb, t_lsb] = raw_temperature.to_be_bytes();
    let [h_msb, h_lsb] = raw_humidity.to_be_bytes();
    [
        t_msb,
        t_lsb,
        calculate_crc8(raw_temperature),
        h_msb,
        h_lsb,
        calculate_crc8(raw_humidity),
    ]
}
