// src/common/convert.rs

use core::fmt;

use super::response::ValidatedMeasurement;

/// Full scale of a raw 16-bit code.
const RAW_FULL_SCALE: f64 = 65535.0;

/// A measurement in physical units.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct PhysicalReading {
    /// Temperature in degrees Celsius.
    pub temperature_c: f32,
    /// Relative humidity in percent.
    pub humidity_pct: f32,
}

impl PhysicalReading {
    #[inline]
    pub fn temperature_f(&self) -> f32 {
        celsius_to_fahrenheit(self.temperature_c)
    }

    /// Renders the reading as one report line.
    #[cfg(feature = "use_heapless")]
    pub fn to_line(&self) -> Result<heapless::String<64>, fmt::Error> {
        use core::fmt::Write;
        let mut line = heapless::String::new();
        write!(line, "{}", self)?;
        Ok(line)
    }
}

impl fmt::Display for PhysicalReading {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Temperature: {:.2}°C ({:.2}°F), Humidity: {:.2}%",
            self.temperature_c,
            self.temperature_f(),
            self.humidity_pct
        )
    }
}

// Arithmetic is done in f64 and narrowed to f32 once at the end.

#[inline]
pub fn raw_to_celsius(raw: u16) -> f32 {
    (-45.0 + 175.0 * (f64::from(raw) / RAW_FULL_SCALE)) as f32
}

#[inline]
pub fn raw_to_humidity(raw: u16) -> f32 {
    (100.0 * (f64::from(raw) / RAW_FULL_SCALE)) as f32
}

#[inline]
pub fn celsius_to_fahrenheit(celsius: f32) -> f32 {
    (f64::from(celsius) * 9.0 / 5.0 + 32.0) as f32
}

/// Converts a validated measurement to physical units.
pub fn to_physical(m: ValidatedMeasurement) -> PhysicalReading {
    PhysicalReading {
        temperature_c: raw_to_celsius(m.raw_temperature()),
        humidity_pct: raw_to_humidity(m.raw_humidity()),
    }
}
