//! Error types for apbridge-core
//!
//! Validation and framing errors. All of them are detected before any byte
//! touches a transport, so they never leave the link in an unknown state.

use core::fmt;

/// Core error type - no_std compatible, Copy for efficiency
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// Byte address does not fit in the configured number of address bytes
    AddressOutOfRange {
        /// Byte address (register index shifted left by 2)
        byte_addr: u64,
        /// Configured number of address bytes
        width: u8,
    },
    /// Data value outside the 32-bit register range
    DataOutOfRange(u64),
    /// Address byte count outside 1..=4
    InvalidAddressWidth(u8),
    /// Header byte carries an opcode no peer understands
    UnknownOpcode(u8),
    /// Frame is shorter than its header says it should be
    TruncatedFrame,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AddressOutOfRange { byte_addr, width } => write!(
                f,
                "address 0x{:08X} out of range for {} address byte(s)",
                byte_addr, width
            ),
            Self::DataOutOfRange(value) => {
                write!(f, "data 0x{:X} out of range for a 32-bit register", value)
            }
            Self::InvalidAddressWidth(n) => {
                write!(f, "invalid address byte count {} (expected 1-4)", n)
            }
            Self::UnknownOpcode(header) => write!(f, "unknown opcode in header 0x{:02X}", header),
            Self::TruncatedFrame => write!(f, "truncated frame"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for Error {}

/// Result type alias using the core Error type
pub type Result<T> = core::result::Result<T, Error>;
