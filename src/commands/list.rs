//! List commands implementation

use crate::registry;

/// List all available bridges
pub fn list_bridges() {
    println!("Available bridges:");
    println!();
    for bridge in registry::available_bridges() {
        println!("  {:8} - {}", bridge.name, bridge.description);
    }
}
