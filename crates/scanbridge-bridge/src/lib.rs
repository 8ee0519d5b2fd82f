//! Host-facing bridge over the vendor barcode scanner and RFID reader SDKs.
//!
//! This crate ties the adapter layer together: a [`Bridge`] owns a
//! [`BarcodeAdapter`](scanbridge_barcode::BarcodeAdapter) and an
//! [`RfidAdapter`](scanbridge_rfid::RfidAdapter) and runs them on its own
//! task, while the host application talks to a [`BridgeHandle`]:
//!
//! - [`BridgeHandle::all_devices`] enumerates the discoverable scanners.
//! - [`BridgeHandle::connect_to_device`] queues establishment of the dual
//!   barcode/RFID session for a device name.
//! - [`BridgeHandle::recv`] yields connection status, decoded barcodes, and
//!   tag batches as [`BridgeEvent`](scanbridge_core::BridgeEvent)s.
//!
//! The [`wire`] module maps each event onto its named host channel with the
//! `{ "data": ... }` payload envelope.

pub mod bridge;
pub mod wire;

pub use bridge::{Bridge, BridgeHandle};
pub use wire::WireEvent;
