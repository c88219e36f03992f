//! Write command implementation

use apbridge_core::check_data;
use apbridge_serial::{SerialBridge, Transport};

/// Run the write command
pub fn run_write<T: Transport>(
    bridge: &mut SerialBridge<T>,
    index: u32,
    value: u64,
) -> Result<(), Box<dyn std::error::Error>> {
    let value = check_data(value)?;
    bridge.write(index, value)?;
    log::info!("Wrote 0x{:08X} to register 0x{:08X}", value, index);
    Ok(())
}
