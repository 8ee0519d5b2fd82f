//! Vendor SDK trait definitions.
//!
//! These traits establish the contract between the adapters and the two
//! vendor SDK handles. They mirror the vendor surface the bridge consumes:
//! nothing here is reimplemented hardware behavior, only the call shape the
//! adapters forward into.
//!
//! Methods are declared as `impl Future + Send` rather than `async fn` so
//! the adapters' event loops and the bridge actor can run on spawned tasks;
//! implementations still write plain `async fn`.

use bytes::Bytes;
use tokio::sync::mpsc;

use scanbridge_core::{ReaderDescriptor, Result, ScannerDescriptor, TagRead};

/// Transport mode for the scanner SDK handle.
///
/// The adapter enables both modes so scanners are discoverable over
/// Bluetooth and USB CDC simultaneously.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum TransportMode {
    /// Bluetooth in the vendor's normal operational mode.
    BluetoothNormal,

    /// USB CDC (communications device class).
    UsbCdc,
}

/// Bitmask of scanner SDK event categories to subscribe to.
///
/// Composes with `|` the way the vendor's notification mask does.
///
/// # Examples
///
/// ```
/// use scanbridge_sdk::ScannerEventMask;
///
/// let mask = ScannerEventMask::APPEARANCE | ScannerEventMask::BARCODE;
/// assert!(mask.contains(ScannerEventMask::BARCODE));
/// assert!(!mask.contains(ScannerEventMask::SESSION_TERMINATION));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ScannerEventMask(u32);

impl ScannerEventMask {
    /// No event categories.
    pub const EMPTY: Self = Self(0);

    /// A scanner became discoverable.
    pub const APPEARANCE: Self = Self(1 << 0);

    /// A scanner is no longer discoverable.
    pub const DISAPPEARANCE: Self = Self(1 << 1);

    /// A communication session was established.
    pub const SESSION_ESTABLISHMENT: Self = Self(1 << 2);

    /// A communication session was terminated.
    pub const SESSION_TERMINATION: Self = Self(1 << 3);

    /// A barcode was decoded.
    pub const BARCODE: Self = Self(1 << 4);

    /// Every category the adapter subscribes to.
    pub const ALL: Self = Self(0b1_1111);

    /// Check whether every bit of `other` is set in this mask.
    pub fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    /// Raw bitmask value as handed to the vendor SDK.
    pub fn bits(self) -> u32 {
        self.0
    }
}

impl std::ops::BitOr for ScannerEventMask {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl std::ops::BitOrAssign for ScannerEventMask {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

/// Result code of a vendor session request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SdkStatus {
    /// The request succeeded.
    Success,

    /// The request was rejected or failed.
    Failure,
}

impl SdkStatus {
    /// True for [`SdkStatus::Success`].
    pub fn is_success(self) -> bool {
        matches!(self, Self::Success)
    }
}

/// Event delivered by the scanner SDK after subscription.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ScannerSdkEvent {
    /// A scanner became discoverable.
    ScannerAppeared(ScannerDescriptor),

    /// The scanner with this identifier is no longer discoverable.
    ScannerDisappeared(u32),

    /// A session with this scanner was established.
    SessionEstablished(u32),

    /// The session with this scanner was terminated.
    SessionTerminated(u32),

    /// Raw decoded-barcode bytes from an active session.
    Barcode {
        /// Scanner the decode came from.
        scanner_id: u32,

        /// Raw bytes exactly as the vendor delivered them.
        data: Bytes,
    },
}

/// Barcode scanner SDK handle.
///
/// Wraps the vendor's scanner-control SDK: transport configuration, event
/// subscription, enumeration, and session establishment by numeric scanner
/// identifier.
pub trait ScannerSdk: Send {
    /// Enable an operational transport mode.
    ///
    /// # Errors
    ///
    /// Returns an error if the SDK rejects the mode change.
    fn set_operational_mode(&mut self, mode: TransportMode)
    -> impl Future<Output = Result<()>> + Send;

    /// Subscribe to the given event categories.
    ///
    /// Returns the receiver that replaces the vendor's delegate callbacks.
    /// Subscribing again replaces the previous delegate; dropping the
    /// receiver is equivalent to removing it.
    ///
    /// # Errors
    ///
    /// Returns an error if the SDK rejects the subscription.
    fn subscribe_events(
        &mut self,
        mask: ScannerEventMask,
    ) -> impl Future<Output = Result<mpsc::Receiver<ScannerSdkEvent>>> + Send;

    /// Enable or disable automatic detection of available scanners.
    ///
    /// # Errors
    ///
    /// Returns an error if the SDK rejects the change.
    fn enable_scanner_detection(&mut self, enabled: bool)
    -> impl Future<Output = Result<()>> + Send;

    /// Enumerate currently discoverable scanners.
    ///
    /// # Errors
    ///
    /// Returns an error if the vendor enumeration fails.
    fn available_scanners(&mut self) -> impl Future<Output = Result<Vec<ScannerDescriptor>>> + Send;

    /// Request a communication session with a scanner.
    ///
    /// # Errors
    ///
    /// Returns an error if the SDK call itself fails; a rejected request is
    /// reported through [`SdkStatus::Failure`] instead.
    fn establish_session(&mut self, scanner_id: u32)
    -> impl Future<Output = Result<SdkStatus>> + Send;

    /// Terminate the communication session with a scanner.
    ///
    /// # Errors
    ///
    /// Returns an error if the SDK rejects the termination.
    fn terminate_session(&mut self, scanner_id: u32) -> impl Future<Output = Result<()>> + Send;
}

/// Start/stop trigger type for reader configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum TriggerKind {
    /// Start or stop immediately on the corresponding command.
    Immediate,

    /// Follow the hardware trigger button.
    Handheld,

    /// Periodic trigger with the given period.
    Periodic {
        /// Trigger period in milliseconds.
        period_ms: u32,
    },
}

/// Reader event and trigger configuration.
///
/// The adapter always applies [`ReaderConfig::default`]: immediate start and
/// stop triggers, hardware-trigger and tag-read notifications enabled, and
/// tag data detached from read events (tags are pulled separately through
/// [`InventoryActions::pull_tags`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReaderConfig {
    /// Inventory start trigger.
    pub start_trigger: TriggerKind,

    /// Inventory stop trigger.
    pub stop_trigger: TriggerKind,

    /// Deliver hardware trigger press/release notifications.
    pub handheld_events: bool,

    /// Deliver tag-read notifications.
    pub tag_read_events: bool,

    /// Attach tag payloads to read notifications instead of requiring a
    /// separate pull.
    pub attach_tag_data: bool,
}

impl Default for ReaderConfig {
    fn default() -> Self {
        Self {
            start_trigger: TriggerKind::Immediate,
            stop_trigger: TriggerKind::Immediate,
            handheld_events: true,
            tag_read_events: true,
            attach_tag_data: false,
        }
    }
}

/// Event delivered by the RFID SDK after configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum RfidSdkEvent {
    /// The hardware trigger was pressed.
    TriggerPressed,

    /// The hardware trigger was released.
    TriggerReleased,

    /// Tag reads are pending and can be pulled.
    ReadNotify,
}

/// Inventory control and tag retrieval handle.
///
/// Cloneable so background tasks can issue inventory commands while the
/// adapter keeps the main [`RfidSdk`] handle. Mirrors the vendor's actions
/// object hanging off the reader handle.
pub trait InventoryActions: Clone + Send + 'static {
    /// Start an inventory pass.
    ///
    /// # Errors
    ///
    /// Returns an error if the reader rejects the command.
    fn start_inventory(&mut self) -> impl Future<Output = Result<()>> + Send;

    /// Stop the running inventory pass.
    ///
    /// # Errors
    ///
    /// Returns an error if the reader rejects the command.
    fn stop_inventory(&mut self) -> impl Future<Output = Result<()>> + Send;

    /// Pull up to `max` pending tag reads.
    ///
    /// Reads are returned in vendor delivery order. A tag accessed across
    /// several memory banks appears once per bank.
    ///
    /// # Errors
    ///
    /// Returns an error if retrieval fails.
    fn pull_tags(&mut self, max: usize) -> impl Future<Output = Result<Vec<TagRead>>> + Send;
}

/// RFID reader SDK handle, scoped to all transports.
///
/// Wraps the vendor's readers-collection plus the currently selected reader:
/// enumeration, connection by name, configuration, inventory actions, and
/// disposal.
pub trait RfidSdk: Send {
    /// Inventory actions handle type for this SDK.
    type Actions: InventoryActions;

    /// Enumerate currently available readers.
    ///
    /// # Errors
    ///
    /// Returns an error if the vendor enumeration fails.
    fn available_readers(&mut self) -> impl Future<Output = Result<Vec<ReaderDescriptor>>> + Send;

    /// Connect to the reader with this name.
    ///
    /// # Errors
    ///
    /// Returns an error if no such reader exists or the connection fails.
    fn connect(&mut self, name: &str) -> impl Future<Output = Result<()>> + Send;

    /// Apply reader configuration and begin event delivery.
    ///
    /// Returns the receiver that replaces the vendor's events listener.
    /// Reconfiguring replaces the previous listener; dropping the receiver
    /// is equivalent to removing it.
    ///
    /// # Errors
    ///
    /// Returns an error if no reader is connected or the reader rejects the
    /// configuration.
    fn configure(
        &mut self,
        config: ReaderConfig,
    ) -> impl Future<Output = Result<mpsc::Receiver<RfidSdkEvent>>> + Send;

    /// Inventory actions handle for the connected reader.
    fn actions(&self) -> Self::Actions;

    /// Disconnect from the current reader.
    ///
    /// # Errors
    ///
    /// Returns an error if the SDK reports a disconnect failure.
    fn disconnect(&mut self) -> impl Future<Output = Result<()>> + Send;

    /// Dispose the reader and readers-collection handles.
    ///
    /// # Errors
    ///
    /// Returns an error if disposal fails.
    fn dispose(&mut self) -> impl Future<Output = Result<()>> + Send;
}
