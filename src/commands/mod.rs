//! CLI command implementations
//!
//! Every command works on a [`Bridge`](crate::bridges::Bridge), so the same
//! code drives the dummy peer and real hardware.

mod dump;
mod list;
mod modify;
mod read;
mod write;

pub use dump::run_dump;
pub use list::list_bridges;
pub use modify::run_modify;
pub use read::run_read;
pub use write::run_write;

use apbridge_serial::BridgeError;

/// Extra advice for a failed command, if the error has a known cause
pub fn failure_hint(err: &(dyn std::error::Error + 'static)) -> Option<&'static str> {
    let err = err.downcast_ref::<BridgeError>()?;
    if err.is_desync() {
        Some("the bridge may be mid-frame; reset the peer before retrying")
    } else if err.is_slave_error() {
        Some("the peer rejected the access; check the register index and address width")
    } else {
        None
    }
}
