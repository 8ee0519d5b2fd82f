//! Vendor SDK seams for the Scanbridge adapters.
//!
//! The real barcode-scanner and RFID-reader SDKs are closed-source binaries
//! driven through callback listeners. This crate models the slice of their
//! surface the bridge actually consumes as a pair of async traits, so the
//! adapter layer can be exercised against controllable mock SDKs instead of
//! physical hardware.
//!
//! Trait methods are native async (declared `impl Future + Send` so they can
//! be awaited from spawned tasks; implementations write plain `async fn`),
//! eliminating the need for the `async_trait` macro. Callback-style event
//! delivery is replaced by `mpsc` receivers handed out at subscription time:
//! where the vendor would invoke a listener, the SDK implementation sends an
//! event into the subscribed channel.
//!
//! # Scanner SDK
//!
//! [`ScannerSdk`](traits::ScannerSdk) covers transport-mode configuration,
//! event subscription by bitmask, scanner enumeration, and session
//! establishment by numeric identifier.
//!
//! # RFID SDK
//!
//! [`RfidSdk`](traits::RfidSdk) covers reader enumeration, connection by
//! name, trigger/notification configuration, and teardown. Inventory control
//! and tag retrieval live on a cloneable
//! [`InventoryActions`](traits::InventoryActions) handle so background tasks
//! can drive the reader while the owner keeps the main handle.
//!
//! # Mock Implementations
//!
//! The [`mock`] module provides [`MockScannerSdk`](mock::MockScannerSdk) and
//! [`MockRfidSdk`](mock::MockRfidSdk), each paired with a handle that scripts
//! device appearance, SDK events, and failure injection, and records what the
//! adapter asked the SDK to do.

pub mod mock;
pub mod traits;

pub use traits::{
    InventoryActions, ReaderConfig, RfidSdk, RfidSdkEvent, ScannerEventMask, ScannerSdk,
    ScannerSdkEvent, SdkStatus, TransportMode, TriggerKind,
};
