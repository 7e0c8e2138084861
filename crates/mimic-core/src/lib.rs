//! Shared vocabulary for the Mimic device emulator.
//!
//! Device identities, device-type tags, emitted values, the error taxonomy
//! and the canonical constants used by every device type.

pub mod constants;
pub mod error;
pub mod types;

pub use error::{Error, Result};
pub use types::*;

/// Version info
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
