//! Barcode scanner adapter.
//!
//! Wraps a [`ScannerSdk`] handle and adapts it to the bridge's event-sink
//! convention: enumeration refreshes a cached descriptor snapshot, sessions
//! are requested by numeric scanner identifier, and decoded barcodes are
//! forwarded to the sink as [`BridgeEvent::BarcodeScanned`].
//!
//! The adapter keeps the source integration's error policy: vendor failures
//! never propagate past this layer. Enumeration failures yield an empty
//! list, session failures yield `false`, and both are logged.

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use scanbridge_core::{BridgeEvent, Result, ScannerDescriptor};
use scanbridge_sdk::{ScannerEventMask, ScannerSdk, ScannerSdkEvent, TransportMode};

/// Adapter over the vendor barcode scanner SDK.
///
/// Owns the SDK handle and the sink half of the bridge event channel. The
/// SDK is initialized on the first enumeration call and reused afterwards.
pub struct BarcodeAdapter<S: ScannerSdk> {
    sdk: S,
    sink: mpsc::Sender<BridgeEvent>,

    /// Cached enumeration snapshot, overwritten wholesale on each call.
    scanners: Vec<ScannerDescriptor>,

    initialized: bool,
    forwarder: Option<JoinHandle<()>>,
}

impl<S: ScannerSdk> BarcodeAdapter<S> {
    /// Create an adapter that forwards decoded barcodes into `sink`.
    pub fn new(sdk: S, sink: mpsc::Sender<BridgeEvent>) -> Self {
        Self {
            sdk,
            sink,
            scanners: Vec::new(),
            initialized: false,
            forwarder: None,
        }
    }

    /// Refresh and return the cached scanner list.
    ///
    /// The first call initializes the vendor handle: both transport modes
    /// are enabled, the fixed five-category event mask is subscribed, the
    /// decode forwarder is spawned, and scanner auto-detection is turned on.
    /// A vendor failure is logged and yields an empty list.
    pub async fn enumerate(&mut self) -> &[ScannerDescriptor] {
        if !self.initialized {
            if let Err(error) = self.initialize().await {
                warn!(%error, "scanner SDK initialization failed");
            }
        }

        self.scanners.clear();
        match self.sdk.available_scanners().await {
            Ok(scanners) => self.scanners = scanners,
            Err(error) => warn!(%error, "scanner enumeration failed"),
        }
        &self.scanners
    }

    async fn initialize(&mut self) -> Result<()> {
        self.sdk
            .set_operational_mode(TransportMode::BluetoothNormal)
            .await?;
        self.sdk.set_operational_mode(TransportMode::UsbCdc).await?;

        let mask = ScannerEventMask::APPEARANCE
            | ScannerEventMask::DISAPPEARANCE
            | ScannerEventMask::SESSION_ESTABLISHMENT
            | ScannerEventMask::SESSION_TERMINATION
            | ScannerEventMask::BARCODE;
        let events = self.sdk.subscribe_events(mask).await?;
        self.forwarder = Some(tokio::spawn(forward_decodes(events, self.sink.clone())));

        self.sdk.enable_scanner_detection(true).await?;
        self.initialized = true;
        Ok(())
    }

    /// Request a communication session with a scanner.
    ///
    /// A scanner that is cached as active is reported connected without a
    /// new session request. Any SDK error is logged and mapped to `false`.
    pub async fn connect(&mut self, scanner_id: u32) -> bool {
        if let Some(scanner) = self.scanners.iter().find(|s| s.id == scanner_id)
            && scanner.active
        {
            debug!(scanner_id, "session already active");
            return true;
        }

        match self.sdk.establish_session(scanner_id).await {
            Ok(status) => status.is_success(),
            Err(error) => {
                warn!(%error, scanner_id, "session request failed");
                false
            }
        }
    }

    /// Currently cached scanner snapshot.
    pub fn scanners(&self) -> &[ScannerDescriptor] {
        &self.scanners
    }

    /// Names from the currently cached snapshot.
    pub fn scanner_names(&self) -> Vec<String> {
        self.scanners.iter().map(|s| s.name.clone()).collect()
    }

    /// First cached scanner with this name, if any.
    pub fn find_by_name(&self, name: &str) -> Option<&ScannerDescriptor> {
        self.scanners.iter().find(|s| s.name == name)
    }

    /// Release the SDK subscription and stop decode forwarding.
    ///
    /// Never fails; a later enumeration re-initializes the handle.
    pub fn teardown(&mut self) {
        if let Some(forwarder) = self.forwarder.take() {
            forwarder.abort();
        }
        self.initialized = false;
    }
}

impl<S: ScannerSdk> Drop for BarcodeAdapter<S> {
    fn drop(&mut self) {
        self.teardown();
    }
}

/// Forward decoded barcodes from the SDK event stream into the sink.
///
/// The vendor delivers raw bytes; conversion is lossy UTF-8. Other event
/// categories are subscribed but carry no behavior in this adapter.
async fn forward_decodes(
    mut events: mpsc::Receiver<ScannerSdkEvent>,
    sink: mpsc::Sender<BridgeEvent>,
) {
    while let Some(event) = events.recv().await {
        match event {
            ScannerSdkEvent::Barcode { data, .. } => {
                let decoded = String::from_utf8_lossy(&data).into_owned();
                if sink.send(BridgeEvent::BarcodeScanned(decoded)).await.is_err() {
                    debug!("event sink closed, stopping decode forwarding");
                    break;
                }
            }
            other => debug!(?other, "scanner SDK notification"),
        }
    }
}
