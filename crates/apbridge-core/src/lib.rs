//! apbridge-core - Wire protocol for the APB serial bridge
//!
//! The bridge exposes a 32-bit APB register bus over any ordered byte
//! stream. Every transaction is one request frame from the host followed by
//! one response from the peer:
//!
//! ```text
//! read request:   [header][addr bytes, MSB first]
//! read response:  [status][4 value bytes, MSB first]   (value only if no SLVERR)
//! write request:  [header][addr bytes, MSB first][4 data bytes, MSB first]
//! write response: [status]
//! ```
//!
//! This crate only knows how to build and parse those bytes. Driving them
//! across a transport lives in `apbridge-serial`.
//!
//! # Features
//!
//! - `std` - Implement `std::error::Error` for [`Error`]
//!
//! # Example
//!
//! ```
//! use apbridge_core::{AddressWidth, RequestFrame};
//!
//! let width = AddressWidth::new(2)?;
//! let frame = RequestFrame::read(width, 0x0001)?;
//! assert_eq!(frame.as_bytes(), &[0x00, 0x00, 0x04]);
//! # Ok::<(), apbridge_core::Error>(())
//! ```

#![no_std]
#![warn(missing_docs)]
#![warn(rust_2018_idioms)]

#[cfg(feature = "std")]
extern crate std;

pub mod address;
pub mod error;
pub mod frame;
pub mod opcodes;
pub mod status;

pub use address::AddressWidth;
pub use error::{Error, Result};
pub use frame::{check_data, RequestFrame, PAYLOAD_LEN};
pub use opcodes::Opcode;
pub use status::Status;
