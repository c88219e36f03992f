//! Transport layer abstraction for bridge communication
//!
//! This module provides a unified interface for serial and TCP transports.
//! Anything that can move ordered bytes both ways can carry the bridge
//! protocol; tests use in-memory implementations.

use crate::error::TransportError;

/// Result type for transport operations
pub type TransportResult<T> = std::result::Result<T, TransportError>;

/// Transport trait for reading and writing bytes
pub trait Transport {
    /// Write all of `data` to the transport, in order
    fn write(&mut self, data: &[u8]) -> TransportResult<()>;

    /// Read bytes from the transport
    ///
    /// Reads exactly `buf.len()` bytes into the buffer.
    /// Returns an error if the channel fails or closes before that.
    fn read(&mut self, buf: &mut [u8]) -> TransportResult<()>;

    /// Read with timeout
    ///
    /// Reads up to `buf.len()` bytes, waiting up to `timeout_ms` milliseconds.
    /// Returns the number of bytes read, or 0 on timeout.
    fn read_nonblock(&mut self, buf: &mut [u8], timeout_ms: u32) -> TransportResult<usize>;

    /// Flush any buffered data
    fn flush(&mut self) -> TransportResult<()>;
}

impl<T: Transport + ?Sized> Transport for &mut T {
    fn write(&mut self, data: &[u8]) -> TransportResult<()> {
        (**self).write(data)
    }

    fn read(&mut self, buf: &mut [u8]) -> TransportResult<()> {
        (**self).read(buf)
    }

    fn read_nonblock(&mut self, buf: &mut [u8], timeout_ms: u32) -> TransportResult<usize> {
        (**self).read_nonblock(buf, timeout_ms)
    }

    fn flush(&mut self) -> TransportResult<()> {
        (**self).flush()
    }
}

impl<T: Transport + ?Sized> Transport for Box<T> {
    fn write(&mut self, data: &[u8]) -> TransportResult<()> {
        (**self).write(data)
    }

    fn read(&mut self, buf: &mut [u8]) -> TransportResult<()> {
        (**self).read(buf)
    }

    fn read_nonblock(&mut self, buf: &mut [u8], timeout_ms: u32) -> TransportResult<usize> {
        (**self).read_nonblock(buf, timeout_ms)
    }

    fn flush(&mut self) -> TransportResult<()> {
        (**self).flush()
    }
}

/// Map an exact-read failure, turning EOF into [`TransportError::Closed`]
fn read_error(e: std::io::Error) -> TransportError {
    if e.kind() == std::io::ErrorKind::UnexpectedEof {
        TransportError::Closed
    } else {
        TransportError::Io(e)
    }
}

#[cfg(feature = "serial")]
pub mod serial {
    //! Serial port transport implementation

    use super::*;
    use serialport::{DataBits, FlowControl, Parity, SerialPort, StopBits};
    use std::io::{Read, Write};
    use std::time::Duration;

    /// Baud rate used when none is given
    pub const DEFAULT_BAUD: u32 = 115200;

    /// Serial port transport
    pub struct SerialTransport {
        port: Box<dyn SerialPort>,
    }

    impl SerialTransport {
        /// Open a serial port with the specified baud rate
        ///
        /// Uses 115200 baud if none is given. The line is configured 8N1 with
        /// no flow control.
        pub fn open(device: &str, baud: Option<u32>) -> TransportResult<Self> {
            let baud_rate = baud.unwrap_or(DEFAULT_BAUD);

            let port = serialport::new(device, baud_rate)
                .data_bits(DataBits::Eight)
                .parity(Parity::None)
                .stop_bits(StopBits::One)
                .flow_control(FlowControl::None)
                .timeout(Duration::from_secs(5))
                .open()?;

            log::info!("Opened serial port {} at {} baud", device, baud_rate);

            Ok(Self { port })
        }
    }

    impl Transport for SerialTransport {
        fn write(&mut self, data: &[u8]) -> TransportResult<()> {
            self.port.write_all(data)?;
            Ok(())
        }

        fn read(&mut self, buf: &mut [u8]) -> TransportResult<()> {
            self.port.read_exact(buf).map_err(read_error)
        }

        fn read_nonblock(&mut self, buf: &mut [u8], timeout_ms: u32) -> TransportResult<usize> {
            // Set temporary timeout
            let old_timeout = self.port.timeout();
            self.port
                .set_timeout(Duration::from_millis(timeout_ms as u64))?;

            let result = match self.port.read(buf) {
                Ok(n) => Ok(n),
                Err(e) if e.kind() == std::io::ErrorKind::TimedOut => Ok(0),
                Err(e) => Err(TransportError::from(e)),
            };

            // Restore timeout
            self.port.set_timeout(old_timeout)?;
            result
        }

        fn flush(&mut self) -> TransportResult<()> {
            self.port.flush()?;
            Ok(())
        }
    }
}

pub mod tcp {
    //! TCP socket transport implementation
    //!
    //! Useful with a serial-to-network adapter or a simulator exposing the
    //! peer on a socket.

    use super::*;
    use std::io::{Read, Write};
    use std::net::TcpStream;
    use std::time::Duration;

    const IO_TIMEOUT: Duration = Duration::from_secs(5);

    /// TCP socket transport
    pub struct TcpTransport {
        stream: TcpStream,
    }

    impl TcpTransport {
        /// Connect to a bridge at the specified host and port
        pub fn connect(host: &str, port: u16) -> TransportResult<Self> {
            let addr = format!("{}:{}", host, port);
            log::info!("Connecting to bridge at {}", addr);

            let stream = TcpStream::connect(&addr)
                .map_err(|e| TransportError::ConnectionFailed(e.to_string()))?;

            // Frames are tiny; don't let Nagle hold them back
            stream.set_nodelay(true).map_err(|e| {
                TransportError::ConnectionFailed(format!("Failed to set TCP_NODELAY: {}", e))
            })?;

            stream.set_read_timeout(Some(IO_TIMEOUT)).map_err(|e| {
                TransportError::ConnectionFailed(format!("Failed to set read timeout: {}", e))
            })?;
            stream.set_write_timeout(Some(IO_TIMEOUT)).map_err(|e| {
                TransportError::ConnectionFailed(format!("Failed to set write timeout: {}", e))
            })?;

            log::info!("Connected to bridge at {}", addr);

            Ok(Self { stream })
        }
    }

    impl Transport for TcpTransport {
        fn write(&mut self, data: &[u8]) -> TransportResult<()> {
            self.stream.write_all(data)?;
            Ok(())
        }

        fn read(&mut self, buf: &mut [u8]) -> TransportResult<()> {
            self.stream.read_exact(buf).map_err(read_error)
        }

        fn read_nonblock(&mut self, buf: &mut [u8], timeout_ms: u32) -> TransportResult<usize> {
            // A zero duration is rejected by set_read_timeout
            let timeout = Duration::from_millis(timeout_ms.max(1) as u64);
            self.stream.set_read_timeout(Some(timeout))?;

            let result = match self.stream.read(buf) {
                Ok(n) => Ok(n),
                Err(e) if e.kind() == std::io::ErrorKind::TimedOut => Ok(0),
                Err(e) if e.kind() == std::io::ErrorKind::WouldBlock => Ok(0),
                Err(e) => Err(TransportError::from(e)),
            };

            // Restore default timeout
            self.stream.set_read_timeout(Some(IO_TIMEOUT))?;
            result
        }

        fn flush(&mut self) -> TransportResult<()> {
            self.stream.flush()?;
            Ok(())
        }
    }

}
