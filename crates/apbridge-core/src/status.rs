//! Response status byte

use bitflags::bitflags;

bitflags! {
    /// Status byte returned by the peer after every request frame
    ///
    /// Only bit 7 is defined. The remaining bits are reserved and kept as
    /// received so they show up in diagnostics.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Status: u8 {
        /// APB slave error (SLVERR) on the addressed register
        const SLVERR = 1 << 7;
    }
}

impl Status {
    /// Status of a successful transaction
    pub const OK: Self = Self::empty();

    /// Interpret a raw status byte
    pub fn from_byte(byte: u8) -> Self {
        Self::from_bits_retain(byte)
    }

    /// Whether the peer reported a slave error
    pub fn is_slave_error(&self) -> bool {
        self.contains(Self::SLVERR)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slverr_bit() {
        assert!(!Status::from_byte(0x00).is_slave_error());
        assert!(!Status::from_byte(0x7F).is_slave_error());
        assert!(Status::from_byte(0x80).is_slave_error());
        assert!(Status::from_byte(0xFF).is_slave_error());
    }

    #[test]
    fn test_reserved_bits_retained() {
        assert_eq!(Status::from_byte(0x81).bits(), 0x81);
        assert_eq!(Status::OK.bits(), 0x00);
        assert_eq!(Status::SLVERR.bits(), 0x80);
    }
}
