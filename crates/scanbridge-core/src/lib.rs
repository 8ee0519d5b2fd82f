//! Core domain types for the Scanbridge device bridge.
//!
//! This crate holds the types shared by the vendor SDK seams, the barcode and
//! RFID adapters, and the host-facing bridge: device descriptors, bridge
//! events with their host channel names, the wire payload envelope, and the
//! common error type.

pub mod constants;
pub mod error;
pub mod events;
pub mod types;

pub use error::{BridgeError, Result};
pub use events::{BridgeEvent, Payload};
pub use types::{MemoryBank, ReaderDescriptor, ScannerDescriptor, TagRead};

/// Version info
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
