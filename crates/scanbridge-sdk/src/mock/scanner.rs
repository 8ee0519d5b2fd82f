//! Mock barcode scanner SDK for testing and development.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use bytes::Bytes;
use tokio::sync::mpsc;

use scanbridge_core::constants::SDK_EVENT_CHANNEL_CAPACITY;
use scanbridge_core::{BridgeError, Result, ScannerDescriptor};

use crate::traits::{ScannerEventMask, ScannerSdk, ScannerSdkEvent, SdkStatus, TransportMode};

/// Scriptable state shared between the mock SDK and its handle.
#[derive(Debug, Default)]
struct MockScannerState {
    scanners: Vec<ScannerDescriptor>,
    modes: Vec<TransportMode>,
    subscribed_mask: Option<ScannerEventMask>,
    events_tx: Option<mpsc::Sender<ScannerSdkEvent>>,
    detection_enabled: bool,
    established_sessions: Vec<u32>,
    next_session_fails: bool,
    next_session_errors: bool,
    fail_enumeration: bool,
}

/// Mock barcode scanner SDK.
///
/// Simulates the vendor scanner-control handle. The paired
/// [`MockScannerHandle`] scripts which scanners are discoverable, emits SDK
/// events (barcode decodes in particular), and records every configuration
/// call the adapter makes.
///
/// # Examples
///
/// ```
/// use scanbridge_sdk::mock::MockScannerSdk;
/// use scanbridge_sdk::{ScannerEventMask, ScannerSdk, SdkStatus};
/// use scanbridge_core::ScannerDescriptor;
///
/// #[tokio::main]
/// async fn main() -> scanbridge_core::Result<()> {
///     let (mut sdk, handle) = MockScannerSdk::new();
///     handle.add_scanner(ScannerDescriptor::new(1, "Scanner-A"));
///
///     let scanners = sdk.available_scanners().await?;
///     assert_eq!(scanners[0].name, "Scanner-A");
///
///     let status = sdk.establish_session(1).await?;
///     assert_eq!(status, SdkStatus::Success);
///     assert_eq!(handle.established_sessions(), vec![1]);
///     Ok(())
/// }
/// ```
#[derive(Debug)]
pub struct MockScannerSdk {
    state: Arc<Mutex<MockScannerState>>,
}

impl MockScannerSdk {
    /// Create a mock scanner SDK and its controlling handle.
    pub fn new() -> (Self, MockScannerHandle) {
        let state = Arc::new(Mutex::new(MockScannerState::default()));

        let sdk = Self {
            state: Arc::clone(&state),
        };
        let handle = MockScannerHandle { state };

        (sdk, handle)
    }

    fn lock(&self) -> MutexGuard<'_, MockScannerState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl ScannerSdk for MockScannerSdk {
    async fn set_operational_mode(&mut self, mode: TransportMode) -> Result<()> {
        self.lock().modes.push(mode);
        Ok(())
    }

    async fn subscribe_events(
        &mut self,
        mask: ScannerEventMask,
    ) -> Result<mpsc::Receiver<ScannerSdkEvent>> {
        // Re-subscribing replaces the previous delegate, as the vendor
        // handle does.
        let (events_tx, events_rx) = mpsc::channel(SDK_EVENT_CHANNEL_CAPACITY);
        let mut state = self.lock();
        state.subscribed_mask = Some(mask);
        state.events_tx = Some(events_tx);
        Ok(events_rx)
    }

    async fn enable_scanner_detection(&mut self, enabled: bool) -> Result<()> {
        self.lock().detection_enabled = enabled;
        Ok(())
    }

    async fn available_scanners(&mut self) -> Result<Vec<ScannerDescriptor>> {
        let state = self.lock();
        if state.fail_enumeration {
            return Err(BridgeError::enumeration("scanner enumeration failed"));
        }
        Ok(state.scanners.clone())
    }

    async fn establish_session(&mut self, scanner_id: u32) -> Result<SdkStatus> {
        let mut state = self.lock();
        if state.next_session_errors {
            return Err(BridgeError::session_failed(
                scanner_id.to_string(),
                "SDK call failed",
            ));
        }
        if state.next_session_fails {
            return Ok(SdkStatus::Failure);
        }

        state.established_sessions.push(scanner_id);
        if let Some(scanner) = state.scanners.iter_mut().find(|s| s.id == scanner_id) {
            scanner.active = true;
        }
        Ok(SdkStatus::Success)
    }

    async fn terminate_session(&mut self, scanner_id: u32) -> Result<()> {
        let mut state = self.lock();
        if let Some(scanner) = state.scanners.iter_mut().find(|s| s.id == scanner_id) {
            scanner.active = false;
        }
        Ok(())
    }
}

/// Handle for controlling a [`MockScannerSdk`].
#[derive(Debug, Clone)]
pub struct MockScannerHandle {
    state: Arc<Mutex<MockScannerState>>,
}

impl MockScannerHandle {
    fn lock(&self) -> MutexGuard<'_, MockScannerState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Make a scanner discoverable by enumeration.
    pub fn add_scanner(&self, scanner: ScannerDescriptor) {
        self.lock().scanners.push(scanner);
    }

    /// Make the next enumeration calls fail until reset.
    pub fn fail_enumeration(&self, fail: bool) {
        self.lock().fail_enumeration = fail;
    }

    /// Make session requests come back as [`SdkStatus::Failure`].
    pub fn reject_sessions(&self, reject: bool) {
        self.lock().next_session_fails = reject;
    }

    /// Make session requests fail at the SDK-call level.
    pub fn error_sessions(&self, error: bool) {
        self.lock().next_session_errors = error;
    }

    /// Emit a raw decoded-barcode event from a scanner.
    ///
    /// # Errors
    ///
    /// Returns an error if the subscribed receiver was dropped.
    pub async fn emit_barcode(&self, scanner_id: u32, data: impl Into<Bytes>) -> Result<()> {
        self.emit(ScannerSdkEvent::Barcode {
            scanner_id,
            data: data.into(),
        })
        .await
    }

    /// Emit an arbitrary scanner SDK event.
    ///
    /// # Errors
    ///
    /// Returns an error if no subscription is active or the subscribed
    /// receiver was dropped.
    pub async fn emit(&self, event: ScannerSdkEvent) -> Result<()> {
        let events_tx = self
            .lock()
            .events_tx
            .clone()
            .ok_or_else(|| BridgeError::channel_closed("scanner SDK events"))?;
        events_tx
            .send(event)
            .await
            .map_err(|_| BridgeError::channel_closed("scanner SDK events"))
    }

    /// Transport modes set on the SDK handle, in call order.
    pub fn transport_modes(&self) -> Vec<TransportMode> {
        self.lock().modes.clone()
    }

    /// Event mask the adapter subscribed with, if any.
    pub fn subscribed_mask(&self) -> Option<ScannerEventMask> {
        self.lock().subscribed_mask
    }

    /// Whether automatic scanner detection is currently enabled.
    pub fn detection_enabled(&self) -> bool {
        self.lock().detection_enabled
    }

    /// Scanner identifiers that had sessions established, in call order.
    pub fn established_sessions(&self) -> Vec<u32> {
        self.lock().established_sessions.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_enumeration_returns_scripted_scanners() {
        let (mut sdk, handle) = MockScannerSdk::new();
        handle.add_scanner(ScannerDescriptor::new(1, "Scanner-A"));
        handle.add_scanner(ScannerDescriptor::new(2, "Scanner-B"));

        let scanners = sdk.available_scanners().await.unwrap();
        assert_eq!(scanners.len(), 2);
        assert_eq!(scanners[1].name, "Scanner-B");
    }

    #[tokio::test]
    async fn test_enumeration_failure_is_an_error() {
        let (mut sdk, handle) = MockScannerSdk::new();
        handle.fail_enumeration(true);

        assert!(sdk.available_scanners().await.is_err());

        handle.fail_enumeration(false);
        assert!(sdk.available_scanners().await.is_ok());
    }

    #[tokio::test]
    async fn test_establish_session_marks_scanner_active() {
        let (mut sdk, handle) = MockScannerSdk::new();
        handle.add_scanner(ScannerDescriptor::new(5, "Scanner-A"));

        let status = sdk.establish_session(5).await.unwrap();
        assert!(status.is_success());

        let scanners = sdk.available_scanners().await.unwrap();
        assert!(scanners[0].active);
        assert_eq!(handle.established_sessions(), vec![5]);
    }

    #[tokio::test]
    async fn test_rejected_session() {
        let (mut sdk, handle) = MockScannerSdk::new();
        handle.reject_sessions(true);

        let status = sdk.establish_session(5).await.unwrap();
        assert_eq!(status, SdkStatus::Failure);
        assert!(handle.established_sessions().is_empty());
    }

    #[tokio::test]
    async fn test_erroring_session() {
        let (mut sdk, handle) = MockScannerSdk::new();
        handle.error_sessions(true);

        assert!(sdk.establish_session(5).await.is_err());
    }

    #[tokio::test]
    async fn test_subscribe_records_mask_and_delivers_events() {
        let (mut sdk, handle) = MockScannerSdk::new();

        let mask = ScannerEventMask::ALL;
        let mut events = sdk.subscribe_events(mask).await.unwrap();
        assert_eq!(handle.subscribed_mask(), Some(mask));

        handle.emit_barcode(1, &b"ABC123"[..]).await.unwrap();

        match events.recv().await.unwrap() {
            ScannerSdkEvent::Barcode { scanner_id, data } => {
                assert_eq!(scanner_id, 1);
                assert_eq!(&data[..], b"ABC123");
            }
            other => panic!("unexpected event: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_resubscribe_replaces_delegate() {
        let (mut sdk, handle) = MockScannerSdk::new();

        let first = sdk.subscribe_events(ScannerEventMask::ALL).await.unwrap();
        drop(first);
        let mut second = sdk.subscribe_events(ScannerEventMask::ALL).await.unwrap();

        handle.emit_barcode(1, &b"X"[..]).await.unwrap();
        assert!(matches!(
            second.recv().await,
            Some(ScannerSdkEvent::Barcode { .. })
        ));
    }

    #[tokio::test]
    async fn test_emit_without_subscription_fails() {
        let (_sdk, handle) = MockScannerSdk::new();
        assert!(handle.emit_barcode(1, &b"X"[..]).await.is_err());
    }
}
