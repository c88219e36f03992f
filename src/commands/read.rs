//! Read command implementation

use apbridge_serial::{SerialBridge, Transport};

/// Run the read command
pub fn run_read<T: Transport>(
    bridge: &mut SerialBridge<T>,
    index: u32,
) -> Result<(), Box<dyn std::error::Error>> {
    let value = bridge.read(index)?;
    println!("0x{:08X}: 0x{:08X}", index, value);
    Ok(())
}
