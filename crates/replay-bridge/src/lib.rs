//! In-page bridge injected by every replay driver.
//!
//! `BRIDGE_JS` installs `window.__replayBridge`; drivers talk to it through
//! [`BridgeRequest`] / [`BridgeResponse`] serialized as JSON.

pub mod protocol;

pub use protocol::{BridgeErrorKind, BridgeRequest, BridgeResponse};

/// The bridge JavaScript implementation.
/// This string is injected into browser contexts by backends.
pub const BRIDGE_JS: &str = include_str!("bridge.js");

/// Expression that is true once the bridge is installed in the current document.
pub const BRIDGE_CHECK: &str = "typeof window.__replayBridge !== 'undefined'";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    #[allow(clippy::const_is_empty)]
    fn bridge_installs_global() {
        assert!(!BRIDGE_JS.is_empty());
        assert!(BRIDGE_JS.contains("window.__replayBridge"));
        assert!(BRIDGE_JS.contains("process"));
    }
}
