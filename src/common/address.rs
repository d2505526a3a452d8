// src/common/address.rs

use super::error::Shtc3Error;
use core::convert::TryFrom;
use core::fmt;

/// A 7-bit I2C bus address.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug)]
pub struct Shtc3Addr(u8);

impl Shtc3Addr {
    /// The fixed address of the SHTC3.
    pub const DEFAULT_ADDRESS: Shtc3Addr = Shtc3Addr(0x70);

    /// Creates a new `Shtc3Addr` if the value fits in 7 bits.
    /// Returns `Result<Self, Shtc3Error<()>>` because validation itself
    /// cannot cause an I/O error.
    pub fn new(address: u8) -> Result<Self, Shtc3Error<()>> {
        if Self::is_valid_address(address) {
            Ok(Shtc3Addr(address))
        } else {
            Err(Shtc3Error::InvalidAddress(address))
        }
    }

    #[inline]
    pub const fn as_u8(&self) -> u8 {
        self.0
    }

    #[inline]
    pub const fn is_valid_address(address: u8) -> bool {
        address <= 0x7F
    }
}

impl Default for Shtc3Addr {
    fn default() -> Self {
        Self::DEFAULT_ADDRESS
    }
}

impl TryFrom<u8> for Shtc3Addr {
    type Error = Shtc3Error<()>;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Shtc3Addr::new(value)
    }
}

impl From<Shtc3Addr> for u8 {
    fn from(addr: Shtc3Addr) -> Self {
        addr.0
    }
}

impl fmt::Display for Shtc3Addr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#04x}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_sensor_address() {
        assert_eq!(Shtc3Addr::default().as_u8(), 0x70);
    }

    #[test]
    fn test_valid_range() {
        assert_eq!(Shtc3Addr::new(0x00).unwrap().as_u8(), 0x00);
        assert_eq!(Shtc3Addr::new(0x7F).unwrap().as_u8(), 0x7F);
        assert!(matches!(Shtc3Addr::new(0x80), Err(Shtc3Error::InvalidAddress(0x80))));
        assert!(matches!(Shtc3Addr::try_from(0xFFu8), Err(Shtc3Error::InvalidAddress(0xFF))));
    }

    #[test]
    fn test_display_and_conversion() {
        let addr = Shtc3Addr::DEFAULT_ADDRESS;
        assert_eq!(std::format!("{}", addr), "0x70");
        assert_eq!(u8::from(addr), 0x70);
    }
}
