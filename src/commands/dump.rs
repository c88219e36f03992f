//! Dump command implementation

use apbridge_serial::{SerialBridge, Transport};
use indicatif::{ProgressBar, ProgressStyle};

/// Registers read per progress update
const DUMP_CHUNK: u32 = 64;

/// Run the dump command
pub fn run_dump<T: Transport>(
    bridge: &mut SerialBridge<T>,
    start: u32,
    count: u32,
) -> Result<(), Box<dyn std::error::Error>> {
    let values = dump_with_progress(bridge, start, count)?;

    for (index, value) in (start..).zip(values) {
        println!("0x{:08X}: 0x{:08X}", index, value);
    }

    Ok(())
}

/// Read `count` registers with a progress bar
pub fn dump_with_progress<T: Transport>(
    bridge: &mut SerialBridge<T>,
    start: u32,
    count: u32,
) -> Result<Vec<u32>, Box<dyn std::error::Error>> {
    // Reject the whole range before touching the link
    bridge.check_range(start, count)?;

    let pb = ProgressBar::new(count as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} registers ({eta})")?
            .progress_chars("#>-"),
    );

    let mut values = Vec::new();
    let mut done = 0u32;
    while done < count {
        let chunk = std::cmp::min(DUMP_CHUNK, count - done);
        values.extend(bridge.read_range(start + done, chunk)?);

        done += chunk;
        pb.set_position(done as u64);
    }

    pb.finish_and_clear();
    Ok(values)
}

#[cfg(all(test, feature = "dummy"))]
mod tests {
    use super::*;
    use apbridge_dummy::{DummyConfig, DummyPeer};

    #[test]
    fn test_dump_crosses_chunks() {
        let mut peer = DummyPeer::new_default();
        for index in 0..100 {
            peer.set_register(index, index * 3).unwrap();
        }
        let mut bridge = SerialBridge::new(2, peer).unwrap();

        let values = dump_with_progress(&mut bridge, 10, 90).unwrap();
        assert_eq!(values.len(), 90);
        assert_eq!(values[0], 30);
        assert_eq!(values[89], 99 * 3);
    }

    #[test]
    fn test_dump_out_of_range_before_io() {
        let mut bridge = SerialBridge::new(1, DummyPeer::new_default()).unwrap();
        assert!(dump_with_progress(&mut bridge, 0x30, 0x20).is_err());
        assert!(bridge.transport().frames().is_empty());
    }

    #[test]
    fn test_dump_rejects_oversized_range() {
        let peer = DummyPeer::new(DummyConfig {
            addr_byte_count: 4,
            fault_ranges: Vec::new(),
        })
        .unwrap();
        let mut bridge = SerialBridge::new(4, peer).unwrap();
        assert!(dump_with_progress(&mut bridge, 0, u32::MAX).is_err());
        assert!(dump_with_progress(&mut bridge, 2, u32::MAX).is_err());
        assert!(bridge.transport().frames().is_empty());

        assert!(dump_with_progress(&mut bridge, 0, 0).unwrap().is_empty());
    }
}
