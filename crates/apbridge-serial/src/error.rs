//! Error types for bridge transactions

use apbridge_core::Opcode;
use thiserror::Error;

/// Errors raised by a [`Transport`](crate::Transport)
#[derive(Debug, Error)]
pub enum TransportError {
    /// Failed to open or connect the underlying channel
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// Channel closed before the requested bytes arrived
    #[error("Channel closed")]
    Closed,

    /// I/O error during communication
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serial port error
    #[cfg(feature = "serial")]
    #[error("Serial port error: {0}")]
    Serial(#[from] serialport::Error),
}

/// Bridge transaction errors
///
/// Transport failures are tagged with the point of the exchange they hit.
/// A failure at any of those points leaves the peer's frame parser in an
/// unknown state, see [`SerialBridge::resync`](crate::SerialBridge::resync).
#[derive(Debug, Error)]
pub enum BridgeError {
    /// Request rejected before any I/O
    #[error(transparent)]
    Protocol(#[from] apbridge_core::Error),

    /// Peer answered with SLVERR
    #[error("Slave error on {opcode}: addr 0x{byte_addr:08X}{}", fmt_data(.data))]
    SlaveError {
        /// Command that failed
        opcode: Opcode,
        /// Byte address of the failed access
        byte_addr: u32,
        /// Value of a failed write
        data: Option<u32>,
    },

    /// Sending the request frame failed
    #[error("Failed to send request frame: {0}")]
    Send(#[source] TransportError),

    /// Receiving the status byte failed
    #[error("Failed to receive status byte: {0}")]
    Status(#[source] TransportError),

    /// Receiving the read payload failed
    #[error("Failed to receive read payload: {0}")]
    Payload(#[source] TransportError),

    /// An earlier transport failure left the link out of sync
    #[error("Bridge link desynchronized; resync required")]
    Desynchronized,

    /// Invalid connection string
    #[error("Invalid bridge connection: {0}")]
    InvalidConnection(String),

    /// Failed to open the transport
    #[error(transparent)]
    Transport(#[from] TransportError),
}

fn fmt_data(data: &Option<u32>) -> String {
    match data {
        Some(value) => format!(", data 0x{:08X}", value),
        None => String::new(),
    }
}

impl BridgeError {
    /// Whether the error may have left a partial exchange on the wire
    pub fn is_desync(&self) -> bool {
        matches!(
            self,
            Self::Send(_) | Self::Status(_) | Self::Payload(_) | Self::Desynchronized
        )
    }

    /// Whether the peer reported a slave error
    pub fn is_slave_error(&self) -> bool {
        matches!(self, Self::SlaveError { .. })
    }
}

/// Result type for bridge operations
pub type Result<T> = std::result::Result<T, BridgeError>;
