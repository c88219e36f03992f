//! Bridge dispatch
//!
//! Turns a `name[:options]` bridge string into an open [`Bridge`]. The list
//! of names lives in [`registry`](crate::registry).

use crate::registry::bridge_names_short;
use apbridge_serial::{SerialBridge, Transport};
use std::collections::HashMap;

/// Bridge handle used by every command
pub type Bridge = SerialBridge<Box<dyn Transport>>;

/// Parsed bridge specification
#[derive(Debug, PartialEq, Eq)]
pub struct BridgeParams {
    /// Bridge name
    pub name: String,
    /// Everything after the first ':'
    pub options: String,
}

/// Parse a bridge string of the form `name[:options]`
pub fn parse_bridge_string(s: &str) -> BridgeParams {
    let (name, options) = s.split_once(':').unwrap_or((s, ""));
    BridgeParams {
        name: name.to_string(),
        options: options.to_string(),
    }
}

/// Parse comma-separated `key=value` options
#[allow(dead_code)]
fn parse_key_values(opts: &str) -> Result<HashMap<String, String>, Box<dyn std::error::Error>> {
    let mut params = HashMap::new();
    if !opts.is_empty() {
        for opt in opts.split(',') {
            if let Some((key, value)) = opt.split_once('=') {
                params.insert(key.to_string(), value.to_string());
            } else {
                return Err(
                    format!("Invalid parameter format: '{}' (expected key=value)", opt).into(),
                );
            }
        }
    }
    Ok(params)
}

/// Open a bridge by specification
///
/// # Arguments
/// * `bridge` - Bridge specification (e.g., "dummy" or "serial:dev=/dev/ttyUSB0")
/// * `addr_bytes` - Address bytes per frame, as configured on the peer
pub fn open_bridge(bridge: &str, addr_bytes: u8) -> Result<Bridge, Box<dyn std::error::Error>> {
    let params = parse_bridge_string(bridge);

    match params.name.as_str() {
        #[cfg(feature = "dummy")]
        "dummy" => open_dummy(&params, addr_bytes),

        "serial" => {
            log::info!("Opening serial bridge ({} address bytes)...", addr_bytes);
            Ok(apbridge_serial::open_bridge(&params.options, addr_bytes)?)
        }

        name => Err(format!(
            "Unknown bridge '{}' [available: {}]",
            name,
            bridge_names_short()
        )
        .into()),
    }
}

#[cfg(feature = "dummy")]
fn open_dummy(params: &BridgeParams, addr_bytes: u8) -> Result<Bridge, Box<dyn std::error::Error>> {
    use apbridge_dummy::{DummyConfig, DummyPeer};

    let opts = parse_key_values(&params.options)?;
    let mut config = DummyConfig {
        addr_byte_count: addr_bytes,
        ..Default::default()
    };

    if let Some(range) = opts.get("fault") {
        let (start, end) = range
            .split_once('-')
            .ok_or_else(|| format!("Invalid fault range '{}' (expected <start>-<end>)", range))?;
        let start = crate::cli::parse_hex_u32(start)?;
        let end = crate::cli::parse_hex_u32(end)?;
        config.fault_ranges.push(start..end);
    }

    let peer = DummyPeer::new(config)?;
    log::info!("Using dummy bridge ({} address bytes)", addr_bytes);
    Ok(SerialBridge::new(addr_bytes, Box::new(peer) as Box<dyn Transport>)?)
}
