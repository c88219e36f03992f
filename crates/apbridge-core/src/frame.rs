//! Request frame encoding and decoding
//!
//! A request frame is the header byte, the byte address in
//! [`AddressWidth::bytes`] big-endian bytes and, for writes, the 4-byte
//! big-endian data word.

use crate::address::{AddressWidth, MAX_ADDR_BYTES};
use crate::error::{Error, Result};
use crate::opcodes::Opcode;

/// Length of the data word in write frames and read responses
pub const PAYLOAD_LEN: usize = 4;

/// Longest possible request frame (write with 4 address bytes)
pub const MAX_FRAME_LEN: usize = 1 + MAX_ADDR_BYTES as usize + PAYLOAD_LEN;

/// Validate a data value that arrives wider than a register
pub fn check_data(value: u64) -> Result<u32> {
    u32::try_from(value).map_err(|_| Error::DataOutOfRange(value))
}

/// An encoded request frame
///
/// Frames are built on the stack and never allocate.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RequestFrame {
    opcode: Opcode,
    byte_addr: u32,
    data: Option<u32>,
    buf: [u8; MAX_FRAME_LEN],
    len: usize,
}

impl RequestFrame {
    /// Build a read frame for the register at `index`
    pub fn read(width: AddressWidth, index: u32) -> Result<Self> {
        let byte_addr = width.byte_address(index)?;
        Ok(Self::encode(width, Opcode::Read, byte_addr, None))
    }

    /// Build a write frame storing `value` into the register at `index`
    pub fn write(width: AddressWidth, index: u32, value: u32) -> Result<Self> {
        let byte_addr = width.byte_address(index)?;
        Ok(Self::encode(width, Opcode::Write, byte_addr, Some(value)))
    }

    fn encode(width: AddressWidth, opcode: Opcode, byte_addr: u32, data: Option<u32>) -> Self {
        let addr_len = width.bytes() as usize;
        let mut buf = [0u8; MAX_FRAME_LEN];

        buf[0] = opcode.header();
        width.encode(byte_addr, &mut buf[1..1 + addr_len]);
        let mut len = 1 + addr_len;

        if let Some(value) = data {
            buf[len..len + PAYLOAD_LEN].copy_from_slice(&value.to_be_bytes());
            len += PAYLOAD_LEN;
        }

        Self {
            opcode,
            byte_addr,
            data,
            buf,
            len,
        }
    }

    /// Total frame length for a header byte, or an error if the opcode is
    /// not one this crate frames
    pub fn expected_len(width: AddressWidth, header: u8) -> Result<usize> {
        let addr_len = width.bytes() as usize;
        match Opcode::from_header(header) {
            Some(Opcode::Read) => Ok(1 + addr_len),
            Some(Opcode::Write) => Ok(1 + addr_len + PAYLOAD_LEN),
            _ => Err(Error::UnknownOpcode(header)),
        }
    }

    /// Parse a frame from the start of `buf`
    ///
    /// Trailing bytes past the frame are ignored; use [`len`](Self::len) to
    /// find where the next frame begins.
    pub fn decode(width: AddressWidth, buf: &[u8]) -> Result<Self> {
        let header = *buf.first().ok_or(Error::TruncatedFrame)?;
        let frame_len = Self::expected_len(width, header)?;
        if buf.len() < frame_len {
            return Err(Error::TruncatedFrame);
        }

        let addr_len = width.bytes() as usize;
        let byte_addr = width.decode(&buf[1..])?;
        // expected_len only accepts read and write
        let (opcode, data) = if frame_len > 1 + addr_len {
            let mut word = [0u8; PAYLOAD_LEN];
            word.copy_from_slice(&buf[1 + addr_len..frame_len]);
            (Opcode::Write, Some(u32::from_be_bytes(word)))
        } else {
            (Opcode::Read, None)
        };

        Ok(Self::encode(width, opcode, byte_addr, data))
    }

    /// The encoded bytes
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf[..self.len]
    }

    /// Frame length in bytes
    pub fn len(&self) -> usize {
        self.len
    }

    /// Always `false`: a frame carries at least the header byte
    ///
    /// The shortest frame is a read at one address byte, two bytes long.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Command opcode
    pub fn opcode(&self) -> Opcode {
        self.opcode
    }

    /// Byte address carried by the frame
    pub fn byte_addr(&self) -> u32 {
        self.byte_addr
    }

    /// Data word of a write frame
    pub fn data(&self) -> Option<u32> {
        self.data
    }
}

impl AsRef<[u8]> for RequestFrame {
    fn as_ref(&self) -> &[u8] {
        self.as_bytes()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn width(n: u8) -> AddressWidth {
        AddressWidth::new(n).unwrap()
    }

    #[test]
    fn test_read_frame_layout() {
        for n in 1..=4u8 {
            let w = width(n);
            for index in [0, 1, 0x2A, w.max_index()] {
                let frame = RequestFrame::read(w, index).unwrap();
                let bytes = frame.as_bytes();
                let byte_addr = index << 2;

                assert_eq!(bytes.len(), 1 + n as usize);
                assert_eq!(bytes[0], 0b000 << 5);
                assert_eq!(bytes[1..], byte_addr.to_be_bytes()[4 - n as usize..]);
            }
        }
    }

    #[test]
    fn test_write_frame_layout() {
        for n in 1..=4u8 {
            let w = width(n);
            let frame = RequestFrame::write(w, w.max_index(), 0x1234_5678).unwrap();
            let bytes = frame.as_bytes();
            let addr_len = n as usize;

            assert_eq!(bytes.len(), 1 + addr_len + 4);
            assert_eq!(bytes[0], 0b001 << 5);
            assert_eq!(
                bytes[1..1 + addr_len],
                (w.max_index() << 2).to_be_bytes()[4 - addr_len..]
            );
            assert_eq!(bytes[1 + addr_len..], [0x12, 0x34, 0x56, 0x78]);
        }
    }

    #[test]
    fn test_known_frames() {
        let frame = RequestFrame::read(width(2), 0x0001).unwrap();
        assert_eq!(frame.as_bytes(), &[0x00, 0x00, 0x04]);
        assert_eq!(frame.byte_addr(), 0x0004);

        let frame = RequestFrame::write(width(1), 0x03, 0xDEAD_BEEF).unwrap();
        assert_eq!(frame.as_bytes(), &[0x20, 0x0C, 0xDE, 0xAD, 0xBE, 0xEF]);
        assert_eq!(frame.byte_addr(), 0x0C);
        assert_eq!(frame.data(), Some(0xDEAD_BEEF));
    }

    #[test]
    fn test_full_data_range_encodes() {
        let frame = RequestFrame::write(width(1), 0, u32::MAX).unwrap();
        assert_eq!(frame.as_bytes(), &[0x20, 0x00, 0xFF, 0xFF, 0xFF, 0xFF]);
    }

    #[test]
    fn test_out_of_range_index() {
        let w = width(1);
        assert_eq!(
            RequestFrame::read(w, 64),
            Err(Error::AddressOutOfRange {
                byte_addr: 256,
                width: 1
            })
        );
        assert!(RequestFrame::write(w, 64, 0).is_err());
    }

    #[test]
    fn test_check_data() {
        assert_eq!(check_data(0), Ok(0));
        assert_eq!(check_data(0xFFFF_FFFF), Ok(u32::MAX));
        assert_eq!(
            check_data(0x1_0000_0000),
            Err(Error::DataOutOfRange(0x1_0000_0000))
        );
    }

    #[test]
    fn test_decode_write_with_trailing_bytes() {
        let w = width(3);
        let buf = [0x20, 0x00, 0x01, 0x00, 0xCA, 0xFE, 0xBA, 0xBE, 0x00, 0x00];
        let frame = RequestFrame::decode(w, &buf).unwrap();

        assert_eq!(frame.opcode(), Opcode::Write);
        assert_eq!(frame.byte_addr(), 0x0100);
        assert_eq!(frame.data(), Some(0xCAFE_BABE));
        assert_eq!(frame.len(), 8);
        assert!(!frame.is_empty());
    }

    #[test]
    fn test_shortest_frame_not_empty() {
        let frame = RequestFrame::read(width(1), 0).unwrap();
        assert_eq!(frame.len(), 2);
        assert!(!frame.is_empty());
    }

    #[test]
    fn test_decode_errors() {
        let w = width(2);
        assert_eq!(RequestFrame::decode(w, &[]), Err(Error::TruncatedFrame));
        assert_eq!(
            RequestFrame::decode(w, &[0x00, 0x01]),
            Err(Error::TruncatedFrame)
        );
        assert_eq!(
            RequestFrame::decode(w, &[0x40, 0x00, 0x00]),
            Err(Error::UnknownOpcode(0x40))
        );
        assert_eq!(
            RequestFrame::decode(w, &[0xE0, 0x00, 0x00]),
            Err(Error::UnknownOpcode(0xE0))
        );
    }
}
