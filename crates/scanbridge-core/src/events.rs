//! Bridge events and the host wire envelope.
//!
//! Adapters push [`BridgeEvent`]s into a channel sink; the bridge maps each
//! event onto one of three named host channels with a `{ "data": ... }`
//! payload. Events are forwarded as they arrive: there is no buffering and
//! no gating on connection state.

use serde::{Deserialize, Serialize};

use crate::constants::{
    CHANNEL_BARCODE_SCANNED, CHANNEL_DEVICE_CONNECTED, CHANNEL_RFID_READ, CONNECT_FAILED_MESSAGE,
    CONNECT_SUCCESS_MESSAGE,
};

/// An event emitted by the adapter layer towards the host application.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum BridgeEvent {
    /// Connection status of the dual-session setup.
    ///
    /// Carries the result of the barcode session request only; the RFID
    /// leg's outcome does not influence this event.
    DeviceConnected {
        /// Whether the barcode session was established.
        connected: bool,
    },

    /// One batch of tag identifiers from a single read notification.
    ///
    /// Vendor delivery order, duplicates preserved, at most
    /// [`MAX_TAG_PULL`](crate::constants::MAX_TAG_PULL) entries.
    RfidRead(Vec<String>),

    /// One decoded barcode.
    BarcodeScanned(String),
}

impl BridgeEvent {
    /// Host channel name this event is delivered on.
    pub fn channel(&self) -> &'static str {
        match self {
            Self::DeviceConnected { .. } => CHANNEL_DEVICE_CONNECTED,
            Self::RfidRead(_) => CHANNEL_RFID_READ,
            Self::BarcodeScanned(_) => CHANNEL_BARCODE_SCANNED,
        }
    }

    /// Status message for a connection event, `None` for other events.
    pub fn status_message(&self) -> Option<&'static str> {
        match self {
            Self::DeviceConnected { connected: true } => Some(CONNECT_SUCCESS_MESSAGE),
            Self::DeviceConnected { connected: false } => Some(CONNECT_FAILED_MESSAGE),
            _ => None,
        }
    }
}

/// Wire envelope for host event payloads.
///
/// Every host channel carries a single-field object: `{ "data": ... }`.
///
/// # Examples
///
/// ```
/// use scanbridge_core::Payload;
///
/// let payload = Payload::new("ABC123");
/// assert_eq!(serde_json::to_string(&payload).unwrap(), r#"{"data":"ABC123"}"#);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payload<T> {
    /// Event data as delivered to the host.
    pub data: T,
}

impl<T> Payload<T> {
    /// Wrap a value in the wire envelope.
    pub fn new(data: T) -> Self {
        Self { data }
    }
}
