//! Process-wide debug sink.
//!
//! The library only emits `tracing` events; it never installs a subscriber
//! unless asked. [`enable_debug_logging`] is meant to be called once at
//! startup. Installation is not synchronized with in-flight requests, which
//! only affects where their diagnostics end up.

use tracing::Level;

/// Install a stderr subscriber at DEBUG with timestamp, level and message.
///
/// Returns `false` when a global subscriber was already in place, in which
/// case nothing changes.
pub fn enable_debug_logging() -> bool {
    let installed = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(Level::DEBUG)
        .with_target(false)
        .try_init()
        .is_ok();
    if installed {
        tracing::debug!("enabled stderr debug logging for {}", env!("CARGO_PKG_NAME"));
    }
    installed
}
