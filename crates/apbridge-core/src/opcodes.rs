//! Bridge command opcodes
//!
//! The opcode occupies bits 7..5 of the header byte. Bits 4..0 are reserved
//! and always zero for the commands this crate frames.

/// Bit position of the opcode inside the header byte
pub const OPCODE_SHIFT: u8 = 5;

/// Bridge command opcode
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Opcode {
    /// Single register read
    Read = 0b000,
    /// Single register write
    Write = 0b001,
    /// Burst read (reserved, not framed)
    BlockRead = 0b010,
    /// Burst write (reserved, not framed)
    BlockWrite = 0b011,
    /// Repeated read of one register (reserved, not framed)
    CyclicRead = 0b100,
    /// Repeated write of one register (reserved, not framed)
    CyclicWrite = 0b101,
    /// Read-modify-write (reserved, not framed)
    Rmw = 0b110,
}

impl Opcode {
    /// Header byte for this opcode with all reserved bits clear
    pub const fn header(self) -> u8 {
        (self as u8) << OPCODE_SHIFT
    }

    /// Decode the opcode from a header byte
    ///
    /// Reserved low bits are ignored. Returns `None` for `0b111`.
    pub const fn from_header(header: u8) -> Option<Self> {
        match header >> OPCODE_SHIFT {
            0b000 => Some(Self::Read),
            0b001 => Some(Self::Write),
            0b010 => Some(Self::BlockRead),
            0b011 => Some(Self::BlockWrite),
            0b100 => Some(Self::CyclicRead),
            0b101 => Some(Self::CyclicWrite),
            0b110 => Some(Self::Rmw),
            _ => None,
        }
    }

    /// Short lowercase name, used in log and error messages
    pub const fn name(self) -> &'static str {
        match self {
            Self::Read => "read",
            Self::Write => "write",
            Self::BlockRead => "block read",
            Self::BlockWrite => "block write",
            Self::CyclicRead => "cyclic read",
            Self::CyclicWrite => "cyclic write",
            Self::Rmw => "rmw",
        }
    }
}

impl core::fmt::Display for Opcode {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_values() {
        assert_eq!(Opcode::Read.header(), 0x00);
        assert_eq!(Opcode::Write.header(), 0x20);
        assert_eq!(Opcode::BlockRead.header(), 0x40);
        assert_eq!(Opcode::BlockWrite.header(), 0x60);
        assert_eq!(Opcode::CyclicRead.header(), 0x80);
        assert_eq!(Opcode::CyclicWrite.header(), 0xA0);
        assert_eq!(Opcode::Rmw.header(), 0xC0);
    }

    #[test]
    fn test_from_header_ignores_reserved_bits() {
        assert_eq!(Opcode::from_header(0x20 | 0x1F), Some(Opcode::Write));
        assert_eq!(Opcode::from_header(0x05), Some(Opcode::Read));
        assert_eq!(Opcode::from_header(0xE0), None);
    }
}
