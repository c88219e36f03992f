//! Modify command implementation

use apbridge_core::check_data;
use apbridge_serial::{SerialBridge, Transport};

/// Run the modify command
pub fn run_modify<T: Transport>(
    bridge: &mut SerialBridge<T>,
    index: u32,
    mask: u64,
    value: u64,
) -> Result<(), Box<dyn std::error::Error>> {
    let mask = check_data(mask)?;
    let value = check_data(value)?;

    let new = bridge.modify(index, mask, value)?;
    println!("0x{:08X}: 0x{:08X}", index, new);
    Ok(())
}

#[cfg(all(test, feature = "dummy"))]
mod tests {
    use super::*;
    use apbridge_dummy::DummyPeer;

    #[test]
    fn test_modify_only_touches_mask() {
        let mut peer = DummyPeer::new_default();
        peer.set_register(4, 0xAAAA_AAAA).unwrap();
        let mut bridge = SerialBridge::new(2, peer).unwrap();

        run_modify(&mut bridge, 4, 0x0000_00FF, 0x0000_0055).unwrap();
        assert_eq!(bridge.transport().register(4).unwrap(), 0xAAAA_AA55);
    }
}
