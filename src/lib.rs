//! Shared modules for the chime-hook crate.
//! Used by the binary and the integration tests.

pub mod assets;
pub mod hook;
pub mod playback;
