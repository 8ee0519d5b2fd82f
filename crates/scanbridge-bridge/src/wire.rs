//! Host wire mapping.
//!
//! Each bridge event is delivered to the host as an emission on one of three
//! fixed channels, with the event data wrapped in the `{ "data": ... }`
//! envelope. Connection status events carry their message string rather than
//! the raw boolean.

use serde_json::{Value, json};

use scanbridge_core::{BridgeEvent, Payload};

/// Host-facing wire form of one bridge event.
///
/// # Examples
///
/// ```
/// use scanbridge_bridge::WireEvent;
/// use scanbridge_core::BridgeEvent;
///
/// let event = BridgeEvent::BarcodeScanned("ABC123".to_string());
/// let wire = WireEvent::from(&event);
/// assert_eq!(wire.channel, "barcode-scanned");
/// assert_eq!(
///     serde_json::to_string(&wire.body()).unwrap(),
///     r#"{"data":"ABC123"}"#
/// );
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct WireEvent {
    /// Host channel the event is delivered on.
    pub channel: &'static str,

    /// Event data before envelope wrapping.
    pub data: Value,
}

impl WireEvent {
    /// Envelope body as serialized to the host.
    pub fn body(&self) -> Payload<&Value> {
        Payload::new(&self.data)
    }
}

impl From<&BridgeEvent> for WireEvent {
    fn from(event: &BridgeEvent) -> Self {
        let data = match event {
            BridgeEvent::RfidRead(ids) => json!(ids),
            BridgeEvent::BarcodeScanned(code) => json!(code),
            // Connection status events carry their message string.
            other => json!(other.status_message()),
        };

        Self {
            channel: event.channel(),
            data,
        }
    }
}
