//! apbridge-dummy - In-memory bridge peer for testing
//!
//! This crate provides a transport that plays the peer side of the bridge
//! protocol against an emulated register file. It's useful for testing and
//! development without real hardware.

use std::collections::{BTreeMap, VecDeque};
use std::ops::Range;

use apbridge_core::{AddressWidth, Error, Opcode, RequestFrame, Status};
use apbridge_serial::{Transport, TransportError, TransportResult};

/// Configuration for the dummy peer
#[derive(Debug, Clone)]
pub struct DummyConfig {
    /// Address bytes the peer expects in every frame
    pub addr_byte_count: u8,
    /// Byte address ranges answering with SLVERR
    pub fault_ranges: Vec<Range<u32>>,
}

impl Default for DummyConfig {
    fn default() -> Self {
        Self {
            addr_byte_count: AddressWidth::default().bytes(),
            fault_ranges: Vec::new(),
        }
    }
}

/// Dummy bridge peer
///
/// Bytes written to it are parsed as request frames. Responses queue up
/// and are returned by subsequent reads. Unset registers read as zero.
pub struct DummyPeer {
    config: DummyConfig,
    width: AddressWidth,
    registers: BTreeMap<u32, u32>,
    rx: Vec<u8>,
    tx: VecDeque<u8>,
    frames: Vec<RequestFrame>,
}

impl DummyPeer {
    /// Create a new dummy peer with the given configuration
    pub fn new(config: DummyConfig) -> Result<Self, Error> {
        let width = AddressWidth::new(config.addr_byte_count)?;
        Ok(Self {
            config,
            width,
            registers: BTreeMap::new(),
            rx: Vec::new(),
            tx: VecDeque::new(),
            frames: Vec::new(),
        })
    }

    /// Create a dummy peer with 2 address bytes and no faults
    pub fn new_default() -> Self {
        Self {
            config: DummyConfig::default(),
            width: AddressWidth::default(),
            registers: BTreeMap::new(),
            rx: Vec::new(),
            tx: VecDeque::new(),
            frames: Vec::new(),
        }
    }

    /// Current value of the register at `index`
    pub fn register(&self, index: u32) -> Result<u32, Error> {
        let byte_addr = self.width.byte_address(index)?;
        Ok(self.registers.get(&byte_addr).copied().unwrap_or_default())
    }

    /// Preload the register at `index`
    pub fn set_register(&mut self, index: u32, value: u32) -> Result<(), Error> {
        let byte_addr = self.width.byte_address(index)?;
        self.registers.insert(byte_addr, value);
        Ok(())
    }

    /// Every complete frame received so far
    pub fn frames(&self) -> &[RequestFrame] {
        &self.frames
    }

    /// Bytes queued for the host
    pub fn pending(&self) -> usize {
        self.tx.len()
    }

    /// Queue unsolicited bytes, as a confused peer would
    pub fn inject(&mut self, bytes: &[u8]) {
        self.tx.extend(bytes);
    }

    fn is_faulted(&self, byte_addr: u32) -> bool {
        self.config
            .fault_ranges
            .iter()
            .any(|range| range.contains(&byte_addr))
    }

    /// Consume every complete frame buffered in `rx`
    fn process(&mut self) {
        while let Some(&header) = self.rx.first() {
            let len = match RequestFrame::expected_len(self.width, header) {
                Ok(len) => len,
                Err(_) => {
                    // No framing is defined for this opcode, so the rest of
                    // the buffer can't be trusted to start on a frame
                    log::debug!("dummy: Rejecting header 0x{:02X}", header);
                    self.rx.clear();
                    self.tx.push_back(Status::SLVERR.bits());
                    continue;
                }
            };
            if self.rx.len() < len {
                break;
            }

            let frame = match RequestFrame::decode(self.width, &self.rx) {
                Ok(frame) => frame,
                Err(_) => break,
            };
            self.rx.drain(..len);
            self.respond(&frame);
            self.frames.push(frame);
        }
    }

    fn respond(&mut self, frame: &RequestFrame) {
        let byte_addr = frame.byte_addr();
        if self.is_faulted(byte_addr) {
            log::debug!("dummy: SLVERR on {} at 0x{:08X}", frame.opcode(), byte_addr);
            self.tx.push_back(Status::SLVERR.bits());
            return;
        }

        match (frame.opcode(), frame.data()) {
            (Opcode::Write, Some(value)) => {
                self.registers.insert(byte_addr, value);
                self.tx.push_back(Status::OK.bits());
            }
            _ => {
                let value = self.registers.get(&byte_addr).copied().unwrap_or_default();
                self.tx.push_back(Status::OK.bits());
                self.tx.extend(value.to_be_bytes());
            }
        }
    }
}

impl Transport for DummyPeer {
    fn write(&mut self, data: &[u8]) -> TransportResult<()> {
        self.rx.extend_from_slice(data);
        self.process();
        Ok(())
    }

    fn read(&mut self, buf: &mut [u8]) -> TransportResult<()> {
        // A real link would block forever; report the peer as gone instead
        let n = buf.len();
        if self.tx.len() < n {
            return Err(TransportError::Closed);
        }
        for (dst, src) in buf.iter_mut().zip(self.tx.drain(..n)) {
            *dst = src;
        }
        Ok(())
    }

    fn read_nonblock(&mut self, buf: &mut [u8], _timeout_ms: u32) -> TransportResult<usize> {
        let n = buf.len().min(self.tx.len());
        for (dst, src) in buf.iter_mut().zip(self.tx.drain(..n)) {
            *dst = src;
        }
        Ok(n)
    }

    fn flush(&mut self) -> TransportResult<()> {
        Ok(())
    }
}
