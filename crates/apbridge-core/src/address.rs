//! Address width and register-index conversion
//!
//! Registers are addressed by index. The wire carries byte addresses, which
//! are always `index << 2` since every register is 4 bytes wide.

use crate::error::{Error, Result};

/// Shift converting a register index into a byte address
pub const REGISTER_SHIFT: u32 = 2;

/// Largest supported number of address bytes
pub const MAX_ADDR_BYTES: u8 = 4;

/// Number of address bytes in each request frame
///
/// Must match the width the peer was built with. Nothing on the wire can
/// detect a mismatch, the peer will just misparse every frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct AddressWidth(u8);

impl AddressWidth {
    /// Create an address width from a byte count in `1..=4`
    pub const fn new(bytes: u8) -> Result<Self> {
        if bytes == 0 || bytes > MAX_ADDR_BYTES {
            return Err(Error::InvalidAddressWidth(bytes));
        }
        Ok(Self(bytes))
    }

    /// Returns the number of address bytes
    pub const fn bytes(&self) -> u8 {
        self.0
    }

    /// Size of the byte address space, `2^(8 * bytes)`
    const fn span(&self) -> u64 {
        1u64 << (8 * self.0 as u32)
    }

    /// Largest register index accepted by [`byte_address`](Self::byte_address)
    pub const fn max_index(&self) -> u32 {
        // The top byte address of the span is excluded, which only matters
        // for unaligned values; the last aligned register is still reachable.
        ((self.span() - 2) >> REGISTER_SHIFT) as u32
    }

    /// Convert a register index into a validated byte address
    pub const fn byte_address(&self, index: u32) -> Result<u32> {
        let byte_addr = (index as u64) << REGISTER_SHIFT;
        if byte_addr >= self.span() - 1 {
            return Err(Error::AddressOutOfRange {
                byte_addr,
                width: self.0,
            });
        }
        Ok(byte_addr as u32)
    }

    /// Encode a byte address into `buf`, most significant byte first
    ///
    /// `buf` must be exactly [`bytes`](Self::bytes) long.
    pub fn encode(&self, byte_addr: u32, buf: &mut [u8]) {
        let n = self.0 as usize;
        buf[..n].copy_from_slice(&byte_addr.to_be_bytes()[4 - n..]);
    }

    /// Decode a big-endian byte address from the first `bytes` of `buf`
    pub fn decode(&self, buf: &[u8]) -> Result<u32> {
        let n = self.0 as usize;
        let field = buf.get(..n).ok_or(Error::TruncatedFrame)?;
        Ok(field.iter().fold(0u32, |acc, &b| (acc << 8) | b as u32))
    }
}

impl Default for AddressWidth {
    /// Two address bytes, a 64 KiB address window
    fn default() -> Self {
        Self(2)
    }
}

impl TryFrom<u8> for AddressWidth {
    type Error = Error;

    fn try_from(bytes: u8) -> Result<Self> {
        Self::new(bytes)
    }
}

impl core::fmt::Display for AddressWidth {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}-byte", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_width_range() {
        assert_eq!(AddressWidth::new(0), Err(Error::InvalidAddressWidth(0)));
        assert_eq!(AddressWidth::new(5), Err(Error::InvalidAddressWidth(5)));
        for n in 1..=4 {
            assert_eq!(AddressWidth::new(n).unwrap().bytes(), n);
        }
    }

    #[test]
    fn test_default_width() {
        assert_eq!(AddressWidth::default().bytes(), 2);
    }

    #[test]
    fn test_max_index() {
        assert_eq!(AddressWidth::new(1).unwrap().max_index(), 0x3F);
        assert_eq!(AddressWidth::new(2).unwrap().max_index(), 0x3FFF);
        assert_eq!(AddressWidth::new(3).unwrap().max_index(), 0x3F_FFFF);
        assert_eq!(AddressWidth::new(4).unwrap().max_index(), 0x3FFF_FFFF);
    }

    #[test]
    fn test_byte_address_bounds() {
        for n in 1..=4 {
            let width = AddressWidth::new(n).unwrap();
            let max = width.max_index();
            assert_eq!(width.byte_address(0), Ok(0));
            assert_eq!(width.byte_address(max), Ok(max << 2));
            assert_eq!(
                width.byte_address(max + 1),
                Err(Error::AddressOutOfRange {
                    byte_addr: ((max as u64) + 1) << 2,
                    width: n,
                })
            );
        }
    }

    #[test]
    fn test_byte_address_does_not_overflow() {
        let width = AddressWidth::new(4).unwrap();
        assert!(matches!(
            width.byte_address(u32::MAX),
            Err(Error::AddressOutOfRange { byte_addr: 0x3_FFFF_FFFC, .. })
        ));
    }

    #[test]
    fn test_encode_big_endian() {
        let mut buf = [0u8; 4];

        AddressWidth::new(1).unwrap().encode(0x0C, &mut buf[..1]);
        assert_eq!(buf[..1], [0x0C]);

        AddressWidth::new(3).unwrap().encode(0x12_3456, &mut buf[..3]);
        assert_eq!(buf[..3], [0x12, 0x34, 0x56]);

        AddressWidth::new(4).unwrap().encode(0xFFFF_FFFC, &mut buf);
        assert_eq!(buf, [0xFF, 0xFF, 0xFF, 0xFC]);
    }

    #[test]
    fn test_decode() {
        let width = AddressWidth::new(2).unwrap();
        assert_eq!(width.decode(&[0x01, 0x04, 0xAA]), Ok(0x0104));
        assert_eq!(width.decode(&[0x01]), Err(Error::TruncatedFrame));
    }
}
