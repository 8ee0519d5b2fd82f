//! Mock SDK implementations for testing and development.
//!
//! These simulate the two vendor SDK handles and can be scripted
//! programmatically without physical scanners or readers.

pub mod rfid;
pub mod scanner;

// Re-export commonly used types
pub use rfid::{InventoryOp, MockRfidActions, MockRfidHandle, MockRfidSdk};
pub use scanner::{MockScannerHandle, MockScannerSdk};
