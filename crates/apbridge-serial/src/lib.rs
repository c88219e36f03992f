//! apbridge-serial - APB register access over the serial bridge
//!
//! This crate drives the bridge protocol defined in `apbridge-core` over a
//! byte stream, one register transaction per call.
//!
//! # Supported Transports
//!
//! - Serial port (`serial` feature): `/dev/ttyUSB0`, `/dev/ttyACM0`, `COM1`, etc.
//! - TCP socket: `host:port`
//! - Anything else implementing [`Transport`]
//!
//! # Example
//!
//! ```ignore
//! use apbridge_serial::{SerialBridge, SerialTransport};
//!
//! // Open a serial connection; the peer was built with 2 address bytes
//! let transport = SerialTransport::open("/dev/ttyUSB0", Some(115200))?;
//! let mut bridge = SerialBridge::new(2, transport)?;
//!
//! let id = bridge.read(0x0000)?;
//! println!("ID register: 0x{:08X}", id);
//! bridge.write(0x0004, 0x0000_0001)?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod bridge;
pub mod error;
pub mod transport;

// Re-exports
pub use apbridge_core::{AddressWidth, Opcode};
pub use bridge::SerialBridge;
pub use error::{BridgeError, Result, TransportError};
#[cfg(feature = "serial")]
pub use transport::serial::SerialTransport;
pub use transport::tcp::TcpTransport;
pub use transport::{Transport, TransportResult};

/// Connection options for the bridge
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BridgeConnection {
    /// Serial port connection
    Serial {
        /// Device path (e.g., "/dev/ttyUSB0" or "COM1")
        device: String,
        /// Baud rate (None for the default)
        baud: Option<u32>,
    },
    /// TCP socket connection
    Tcp {
        /// Hostname or IP address
        host: String,
        /// Port number
        port: u16,
    },
}

impl BridgeConnection {
    /// Parse a connection string
    ///
    /// Formats:
    /// - `dev=/dev/ttyUSB0` - Serial with default baud
    /// - `dev=/dev/ttyUSB0:115200` - Serial with specified baud
    /// - `ip=host:port` - TCP connection
    pub fn parse(s: &str) -> Result<Self> {
        if let Some(dev) = s.strip_prefix("dev=") {
            if dev.is_empty() {
                return Err(BridgeError::InvalidConnection(
                    "Missing device in dev= parameter".to_string(),
                ));
            }
            // Serial connection
            if let Some((device, baud_str)) = dev.rsplit_once(':') {
                let baud = baud_str.parse().map_err(|_| {
                    BridgeError::InvalidConnection(format!("Invalid baud rate: {}", baud_str))
                })?;
                Ok(BridgeConnection::Serial {
                    device: device.to_string(),
                    baud: Some(baud),
                })
            } else {
                Ok(BridgeConnection::Serial {
                    device: dev.to_string(),
                    baud: None,
                })
            }
        } else if let Some(ip) = s.strip_prefix("ip=") {
            // TCP connection
            let (host, port_str) = ip.rsplit_once(':').ok_or_else(|| {
                BridgeError::InvalidConnection("Missing port in ip= parameter".to_string())
            })?;
            let port = port_str.parse().map_err(|_| {
                BridgeError::InvalidConnection(format!("Invalid port: {}", port_str))
            })?;
            Ok(BridgeConnection::Tcp {
                host: host.to_string(),
                port,
            })
        } else {
            Err(BridgeError::InvalidConnection(format!(
                "{}. Use dev=... or ip=...",
                s
            )))
        }
    }

    /// Open the transport described by this connection
    pub fn open(&self) -> Result<Box<dyn Transport>> {
        let transport: Box<dyn Transport> = match self {
            #[cfg(feature = "serial")]
            BridgeConnection::Serial { device, baud } => {
                Box::new(SerialTransport::open(device, *baud)?)
            }
            #[cfg(not(feature = "serial"))]
            BridgeConnection::Serial { device, .. } => {
                return Err(BridgeError::InvalidConnection(format!(
                    "{}: serial port support not enabled",
                    device
                )));
            }
            BridgeConnection::Tcp { host, port } => Box::new(TcpTransport::connect(host, *port)?),
        };
        Ok(transport)
    }
}

/// Open a bridge from a connection string
///
/// This is a convenience function that handles both serial and TCP
/// connections and returns a bridge over a type-erased transport.
pub fn open_bridge(options: &str, addr_byte_count: u8) -> Result<SerialBridge<Box<dyn Transport>>> {
    let width = AddressWidth::new(addr_byte_count)?;
    let transport = BridgeConnection::parse(options)?.open()?;
    Ok(SerialBridge::with_width(width, transport))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_serial() {
        assert_eq!(
            BridgeConnection::parse("dev=/dev/ttyUSB0").unwrap(),
            BridgeConnection::Serial {
                device: "/dev/ttyUSB0".to_string(),
                baud: None,
            }
        );
        assert_eq!(
            BridgeConnection::parse("dev=/dev/ttyACM1:921600").unwrap(),
            BridgeConnection::Serial {
                device: "/dev/ttyACM1".to_string(),
                baud: Some(921600),
            }
        );
    }

    #[test]
    fn test_parse_tcp() {
        assert_eq!(
            BridgeConnection::parse("ip=localhost:2542").unwrap(),
            BridgeConnection::Tcp {
                host: "localhost".to_string(),
                port: 2542,
            }
        );
    }

    #[test]
    fn test_parse_errors() {
        for bad in [
            "",
            "dev=",
            "dev=/dev/ttyUSB0:fast",
            "ip=localhost",
            "ip=localhost:99999",
            "usb=1",
        ] {
            assert!(
                matches!(
                    BridgeConnection::parse(bad),
                    Err(BridgeError::InvalidConnection(_))
                ),
                "{bad:?} should be rejected"
            );
        }
    }

    #[cfg(not(feature = "serial"))]
    #[test]
    fn test_serial_port_needs_feature() {
        let conn = BridgeConnection::parse("dev=/dev/ttyUSB0").unwrap();
        assert!(matches!(
            conn.open(),
            Err(BridgeError::InvalidConnection(msg)) if msg.contains("not enabled")
        ));
    }

    #[test]
    fn test_open_bridge_checks_width_first() {
        assert!(matches!(
            open_bridge("ip=127.0.0.1:1", 0),
            Err(BridgeError::Protocol(apbridge_core::Error::InvalidAddressWidth(0)))
        ));
    }
}
