//! Constants shared across the bridge.
//!
//! Channel names and status messages are part of the host-facing contract:
//! host applications subscribe to these exact channel names and match on the
//! exact status strings. Changing any of them breaks existing subscribers.

/// Host event channel carrying connection status events.
///
/// Payload: `{ "data": "Connect successfully" | "Connect failed" }`.
pub const CHANNEL_DEVICE_CONNECTED: &str = "device-connected";

/// Host event channel carrying one tag-identifier batch per read
/// notification.
///
/// Payload: `{ "data": [tag_id, ...] }`.
pub const CHANNEL_RFID_READ: &str = "rfid-read";

/// Host event channel carrying a single decoded barcode per scan.
///
/// Payload: `{ "data": decoded_string }`.
pub const CHANNEL_BARCODE_SCANNED: &str = "barcode-scanned";

/// Status message emitted when the barcode session was established.
pub const CONNECT_SUCCESS_MESSAGE: &str = "Connect successfully";

/// Status message emitted when the barcode session request failed.
pub const CONNECT_FAILED_MESSAGE: &str = "Connect failed";

/// Maximum number of pending tags pulled from the reader per read
/// notification.
///
/// A single notification never yields a larger batch; remaining tags are
/// picked up by subsequent notifications.
pub const MAX_TAG_PULL: usize = 100;

/// Capacity of the bridge-to-host event channel.
pub const EVENT_CHANNEL_CAPACITY: usize = 100;

/// Capacity of the per-SDK event delivery channels.
pub const SDK_EVENT_CHANNEL_CAPACITY: usize = 32;
