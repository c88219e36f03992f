//! Bridge registry
//!
//! Lists the bridge targets enabled at compile time. Kept free of any
//! transport code so the man page generator can include it on its own.

/// Information about a bridge target
pub struct BridgeInfo {
    /// Primary name (used for matching)
    pub name: &'static str,
    /// Short description
    pub description: &'static str,
}

/// Get information about all available bridge targets (enabled at compile time)
#[allow(clippy::vec_init_then_push)]
pub fn available_bridges() -> Vec<BridgeInfo> {
    let mut bridges = Vec::new();

    #[cfg(feature = "dummy")]
    bridges.push(BridgeInfo {
        name: "dummy",
        description: "In-memory register file for testing (fault=<start>-<end>)",
    });

    bridges.push(BridgeInfo {
        name: "serial",
        description: "Bridge over serial/network (dev=<port>[:baud] or ip=<host:port>)",
    });

    bridges
}

/// Generate the bridge listing used in long help output
pub fn bridge_help() -> String {
    let mut help = String::from("Available bridges:\n");
    for b in available_bridges() {
        help.push_str(&format!("  {:8} - {}\n", b.name, b.description));
    }
    help
}

/// Generate a short list of bridge names for CLI help
pub fn bridge_names_short() -> String {
    let bridges = available_bridges();
    let names: Vec<&str> = bridges.iter().map(|b| b.name).collect();
    names.join(", ")
}
