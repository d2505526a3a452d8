//! SHTC3 command definitions.
//!
//! Every command is a 16-bit opcode sent most-significant byte first.
//! See the SHTC3 datasheet, Section 5.3 "Command Overview".

use core::fmt;

use super::Shtc3Error;

/// Length of every command frame on the wire.
pub const COMMAND_LEN: usize = 2;

/// A logical command understood by the sensor.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Command {
    /// Wake the sensor from sleep (`0x3517`).
    PowerUp,
    /// Put the sensor to sleep (`0xB098`).
    PowerDown,
    /// Measure temperature then humidity, normal mode, no clock stretching (`0x7CA2`).
    Measure,
}

impl Command {
    pub const POWER_UP_OPCODE: u16 = 0x3517;
    pub const POWER_DOWN_OPCODE: u16 = 0xB098;
    pub const MEASURE_OPCODE: u16 = 0x7CA2;

    #[inline]
    pub const fn opcode(self) -> u16 {
        match self {
            Command::PowerUp => Self::POWER_UP_OPCODE,
            Command::PowerDown => Self::POWER_DOWN_OPCODE,
            Command::Measure => Self::MEASURE_OPCODE,
        }
    }

    /// Wire frame for this command, big-endian.
    #[inline]
    pub const fn encode(self) -> [u8; COMMAND_LEN] {
        self.opcode().to_be_bytes()
    }

    /// Maps an opcode back to its command.
    pub fn from_opcode(opcode: u16) -> Result<Self, Shtc3Error<()>> {
        match opcode {
            Self::POWER_UP_OPCODE => Ok(Command::PowerUp),
            Self::POWER_DOWN_OPCODE => Ok(Command::PowerDown),
            Self::MEASURE_OPCODE => Ok(Command::Measure),
            other => Err(Shtc3Error::UnknownCommand(other)),
        }
    }

    /// Parses a raw command frame as received by the sensor.
    pub fn parse(bytes: &[u8]) -> Result<Self, Shtc3Error<()>> {
        let frame: [u8; COMMAND_LEN] = bytes.try_into().map_err(|_| Shtc3Error::InvalidLength {
            expected: COMMAND_LEN,
            got: bytes.len(),
        })?;
        Self::from_opcode(u16::from_be_bytes(frame))
    }

    const fn name(self) -> &'static str {
        match self {
            Command::PowerUp => "PowerUp",
            Command::PowerDown => "PowerDown",
            Command::Measure => "Measure",
        }
    }
}

/// Encodes `command` into its 2-byte wire frame.
#[inline]
pub const fn encode(command: Command) -> [u8; COMMAND_LEN] {
    command.encode()
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({:#06x})", self.name(), self.opcode())
    }
}

impl TryFrom<u16> for Command {
    type Error = Shtc3Error<()>;

    fn try_from(opcode: u16) -> Result<Self, Self::Error> {
        Command::from_opcode(opcode)
    }
}
