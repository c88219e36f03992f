//! Bridge transaction driver
//!
//! This module provides the `SerialBridge` struct that runs single register
//! transactions over any [`Transport`]. Each call is one request frame and
//! one response, with no retries.

use crate::error::{BridgeError, Result};
use crate::transport::Transport;

use apbridge_core::{AddressWidth, Opcode, RequestFrame, Status, PAYLOAD_LEN};

/// Drain attempts made by [`SerialBridge::resync`]
const RESYNC_DRAIN_ROUNDS: usize = 1024;
/// Per-attempt wait in milliseconds while draining
const RESYNC_DRAIN_TIMEOUT_MS: u32 = 10;

/// APB register access through the serial bridge
///
/// The transport may be owned or borrowed (`&mut T` is a transport too).
/// Calls take `&mut self`, so sharing one bridge between threads needs an
/// outer lock; interleaved frames corrupt both transactions.
pub struct SerialBridge<T: Transport> {
    /// Transport layer (serial, TCP, or an emulated peer)
    transport: T,
    /// Address bytes per frame, must match the peer
    width: AddressWidth,
    /// Set when a transport failure left a partial exchange on the wire
    desynchronized: bool,
}

impl<T: Transport> SerialBridge<T> {
    /// Create a bridge using `addr_byte_count` address bytes per frame
    pub fn new(addr_byte_count: u8, transport: T) -> Result<Self> {
        let width = AddressWidth::new(addr_byte_count)?;
        Ok(Self::with_width(width, transport))
    }

    /// Create a bridge from an already validated address width
    pub fn with_width(width: AddressWidth, transport: T) -> Self {
        log::debug!("bridge: Using {} addresses", width);
        Self {
            transport,
            width,
            desynchronized: false,
        }
    }

    /// Address width in use
    pub fn address_width(&self) -> AddressWidth {
        self.width
    }

    /// Shared access to the transport
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Exclusive access to the transport
    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    /// Release the transport
    pub fn into_inner(self) -> T {
        self.transport
    }

    /// Whether a previous transport failure is still latched
    pub fn is_desynchronized(&self) -> bool {
        self.desynchronized
    }

    /// Read a single register
    ///
    /// `index` is a register index, not a byte address.
    pub fn read(&mut self, index: u32) -> Result<u32> {
        self.ensure_synchronized()?;
        let frame = RequestFrame::read(self.width, index)?;

        let status = self.exchange(&frame)?;
        if status.is_slave_error() {
            return Err(slave_error(&frame));
        }

        let mut payload = [0u8; PAYLOAD_LEN];
        if let Err(e) = self.transport.read(&mut payload) {
            self.desynchronized = true;
            return Err(BridgeError::Payload(e));
        }

        let value = u32::from_be_bytes(payload);
        log::debug!(
            "bridge: read  0x{:08X} -> 0x{:08X}",
            frame.byte_addr(),
            value
        );
        Ok(value)
    }

    /// Write a single register
    ///
    /// `index` is a register index, not a byte address.
    pub fn write(&mut self, index: u32, value: u32) -> Result<()> {
        self.ensure_synchronized()?;
        let frame = RequestFrame::write(self.width, index, value)?;

        let status = self.exchange(&frame)?;
        if status.is_slave_error() {
            return Err(slave_error(&frame));
        }

        log::debug!(
            "bridge: write 0x{:08X} <- 0x{:08X}",
            frame.byte_addr(),
            value
        );
        Ok(())
    }

    /// Replace the bits selected by `mask` with the same bits of `value`
    ///
    /// Runs a read then a write. The bus is not locked in between, so this
    /// is not atomic with respect to other bus masters. Returns the value
    /// written.
    pub fn modify(&mut self, index: u32, mask: u32, value: u32) -> Result<u32> {
        let old = self.read(index)?;
        let new = (old & !mask) | (value & mask);
        self.write(index, new)?;
        Ok(new)
    }

    /// Validate a run of `count` registers starting at `start`
    ///
    /// Returns the index of the last register, or `None` for an empty run.
    pub fn check_range(&self, start: u32, count: u32) -> Result<Option<u32>> {
        if count == 0 {
            return Ok(None);
        }

        let last = start
            .checked_add(count - 1)
            .ok_or_else(|| apbridge_core::Error::AddressOutOfRange {
                byte_addr: (start as u64 + count as u64 - 1) << 2,
                width: self.width.bytes(),
            })?;
        self.width.byte_address(start)?;
        self.width.byte_address(last)?;
        Ok(Some(last))
    }

    /// Read `count` consecutive registers starting at `start`
    ///
    /// The whole range is validated up front. Stops at the first failing
    /// transaction.
    pub fn read_range(&mut self, start: u32, count: u32) -> Result<Vec<u32>> {
        match self.check_range(start, count)? {
            Some(last) => (start..=last).map(|index| self.read(index)).collect(),
            None => Ok(Vec::new()),
        }
    }

    /// Bring the link back to a known state after a transport failure
    ///
    /// Discards any bytes the peer is still sending and clears the latch.
    /// The peer must also be back at a frame boundary, which this host-side
    /// layer cannot force. Returns the number of bytes discarded.
    pub fn resync(&mut self) -> Result<usize> {
        let mut buf = [0u8; 64];
        let mut discarded = 0;

        for _ in 0..RESYNC_DRAIN_ROUNDS {
            let n = self
                .transport
                .read_nonblock(&mut buf, RESYNC_DRAIN_TIMEOUT_MS)?;
            if n == 0 {
                break;
            }
            discarded += n;
        }

        if discarded > 0 {
            log::debug!("bridge: Discarded {} stale bytes", discarded);
        }
        self.desynchronized = false;
        Ok(discarded)
    }

    // ---- Protocol implementation ----

    fn ensure_synchronized(&self) -> Result<()> {
        if self.desynchronized {
            return Err(BridgeError::Desynchronized);
        }
        Ok(())
    }

    /// Send a request frame and receive its status byte
    fn exchange(&mut self, frame: &RequestFrame) -> Result<Status> {
        log::trace!("bridge: tx {:02X?}", frame.as_bytes());

        let sent = self
            .transport
            .write(frame.as_bytes())
            .and_then(|()| self.transport.flush());
        if let Err(e) = sent {
            self.desynchronized = true;
            return Err(BridgeError::Send(e));
        }

        let mut status = [0u8];
        if let Err(e) = self.transport.read(&mut status) {
            self.desynchronized = true;
            return Err(BridgeError::Status(e));
        }

        log::trace!("bridge: status 0x{:02X}", status[0]);
        Ok(Status::from_byte(status[0]))
    }
}

fn slave_error(frame: &RequestFrame) -> BridgeError {
    BridgeError::SlaveError {
        opcode: frame.opcode(),
        byte_addr: frame.byte_addr(),
        data: match frame.opcode() {
            Opcode::Write => frame.data(),
            _ => None,
        },
    }
}
