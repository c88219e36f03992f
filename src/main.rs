//! apbridge - Register access over the APB serial bridge
//!
//! Reads and writes 32-bit registers behind a bridge that exposes an APB
//! bus over a byte stream (UART, TCP).
//!
//! # Architecture
//!
//! - `apbridge-core` builds and parses the wire frames
//! - `apbridge-serial` runs one transaction per call over a `Transport`
//! - `apbridge-dummy` emulates the peer for testing without hardware
//!
//! Every subcommand opens the bridge named by `--bridge`, runs its
//! transactions and exits. Nothing is kept between invocations.

mod bridges;
mod cli;
mod commands;
mod registry;

use bridges::open_bridge;
use clap::Parser;
use cli::{Cli, Commands};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logger
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    // Set log level based on verbosity
    match cli.verbose {
        0 => {} // default (info)
        1 => log::set_max_level(log::LevelFilter::Debug),
        _ => log::set_max_level(log::LevelFilter::Trace),
    }

    let result = match cli.command {
        Commands::Read { bridge, index } => {
            let mut handle = open_bridge(&bridge.bridge, bridge.addr_bytes)?;
            commands::run_read(&mut handle, index)
        }
        Commands::Write {
            bridge,
            index,
            value,
        } => {
            let mut handle = open_bridge(&bridge.bridge, bridge.addr_bytes)?;
            commands::run_write(&mut handle, index, value)
        }
        Commands::Dump {
            bridge,
            start,
            count,
        } => {
            let mut handle = open_bridge(&bridge.bridge, bridge.addr_bytes)?;
            commands::run_dump(&mut handle, start, count)
        }
        Commands::Modify {
            bridge,
            index,
            mask,
            value,
        } => {
            let mut handle = open_bridge(&bridge.bridge, bridge.addr_bytes)?;
            commands::run_modify(&mut handle, index, mask, value)
        }
        Commands::ListBridges => {
            commands::list_bridges();
            Ok(())
        }
    };

    if let Err(err) = &result {
        if let Some(hint) = commands::failure_hint(&**err) {
            log::warn!("{}", hint);
        }
    }
    result
}
