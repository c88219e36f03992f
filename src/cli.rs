//! CLI argument parsing

use crate::registry;
use clap::{Parser, Subcommand};

/// Parse a string as a hex or decimal u32
pub fn parse_hex_u32(s: &str) -> Result<u32, String> {
    if let Some(hex) = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        u32::from_str_radix(hex, 16).map_err(|e| format!("Invalid hex value: {}", e))
    } else {
        s.parse::<u32>().map_err(|e| format!("Invalid number: {}", e))
    }
}

/// Parse a string as a hex or decimal u64
///
/// Register values are taken wide and range-checked later so an oversized
/// value is reported as a data range error rather than a parse error.
pub fn parse_hex_u64(s: &str) -> Result<u64, String> {
    if let Some(hex) = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        u64::from_str_radix(hex, 16).map_err(|e| format!("Invalid hex value: {}", e))
    } else {
        s.parse::<u64>().map_err(|e| format!("Invalid number: {}", e))
    }
}

/// Generate dynamic help text for the bridge argument
fn bridge_help() -> String {
    format!(
        "Bridge to use [available: {}]",
        registry::bridge_names_short()
    )
}

#[derive(Parser)]
#[command(name = "apbridge")]
#[command(author, version, about = "APB register access over a serial bridge", long_about = None)]
pub struct Cli {
    /// Verbosity level (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

/// Bridge connection options shared across commands
#[derive(clap::Args, Debug, Clone)]
pub struct BridgeArgs {
    /// Bridge to use, e.g. "dummy" or "serial:dev=/dev/ttyUSB0:115200"
    #[arg(short, long, help = bridge_help(), long_help = registry::bridge_help())]
    pub bridge: String,

    /// Address bytes per frame, must match the peer's configuration (1-4)
    #[arg(short = 'w', long, default_value_t = 2)]
    pub addr_bytes: u8,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Read a single register
    Read {
        #[command(flatten)]
        bridge: BridgeArgs,

        /// Register index (not byte address)
        #[arg(value_parser = parse_hex_u32)]
        index: u32,
    },

    /// Write a single register
    Write {
        #[command(flatten)]
        bridge: BridgeArgs,

        /// Register index (not byte address)
        #[arg(value_parser = parse_hex_u32)]
        index: u32,

        /// Value to write
        #[arg(value_parser = parse_hex_u64)]
        value: u64,
    },

    /// Read a range of consecutive registers
    Dump {
        #[command(flatten)]
        bridge: BridgeArgs,

        /// First register index
        #[arg(value_parser = parse_hex_u32)]
        start: u32,

        /// Number of registers
        #[arg(value_parser = parse_hex_u32)]
        count: u32,
    },

    /// Change selected bits of a register (read, then write)
    Modify {
        #[command(flatten)]
        bridge: BridgeArgs,

        /// Register index (not byte address)
        #[arg(value_parser = parse_hex_u32)]
        index: u32,

        /// Bits to change
        #[arg(short, long, value_parser = parse_hex_u64)]
        mask: u64,

        /// New value for the masked bits
        #[arg(value_parser = parse_hex_u64)]
        value: u64,
    },

    /// List available bridges
    ListBridges,
}
