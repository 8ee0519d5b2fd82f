//! RFID reader adapter.
//!
//! Wraps an [`RfidSdk`] handle: enumerates readers, connects by name,
//! applies the fixed immediate-trigger configuration, and runs the event
//! loop that translates SDK notifications into bridge events. Hardware
//! trigger presses and releases become inventory start/stop commands
//! dispatched through a single-slot cancellable task, and each read
//! notification becomes one tag-identifier batch on the sink.
//!
//! Like the barcode adapter, vendor failures stop at this layer: callers
//! above the bridge boundary only ever see empty lists and logged warnings.

mod session;

pub use session::ReaderSession;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use scanbridge_core::constants::MAX_TAG_PULL;
use scanbridge_core::{BridgeError, BridgeEvent, ReaderDescriptor, Result};
use scanbridge_sdk::{InventoryActions, ReaderConfig, RfidSdk, RfidSdkEvent};

/// Adapter over the vendor RFID reader SDK.
///
/// Owns the SDK handle, the sink half of the bridge event channel, and the
/// current [`ReaderSession`] if one is established.
pub struct RfidAdapter<R: RfidSdk> {
    sdk: R,
    sink: mpsc::Sender<BridgeEvent>,
    session: Option<ReaderSession>,
}

impl<R: RfidSdk> RfidAdapter<R> {
    /// Create an adapter that forwards reader events into `sink`.
    pub fn new(sdk: R, sink: mpsc::Sender<BridgeEvent>) -> Self {
        Self {
            sdk,
            sink,
            session: None,
        }
    }

    /// Enumerate currently available readers.
    ///
    /// A vendor failure is logged and yields an empty list.
    pub async fn available_readers(&mut self) -> Vec<ReaderDescriptor> {
        match self.sdk.available_readers().await {
            Ok(readers) => readers,
            Err(error) => {
                warn!(%error, "reader enumeration failed");
                Vec::new()
            }
        }
    }

    /// Connect to the reader with this name and start its event loop.
    ///
    /// Selection is first-name-match-wins over the vendor enumeration. A
    /// reader that is already connected is left as-is and not reconfigured.
    /// If this adapter already holds a session, it is torn down before the
    /// new one is established.
    ///
    /// # Errors
    ///
    /// Returns an error if enumeration fails, no reader carries the name,
    /// or the connect/configure SDK calls fail.
    pub async fn connect(&mut self, name: &str) -> Result<()> {
        let readers = self.sdk.available_readers().await?;
        let reader = readers
            .iter()
            .find(|r| r.name == name)
            .ok_or_else(|| BridgeError::not_connected(name))?;

        if reader.connected {
            debug!(reader = name, "reader already connected");
            return Ok(());
        }

        if let Some(previous) = self.session.take() {
            debug!(
                session = %previous.id(),
                reader = previous.reader_name(),
                "replacing reader session"
            );
            previous.close();
        }

        self.sdk.connect(name).await?;
        let events = self.sdk.configure(ReaderConfig::default()).await?;
        let actions = self.sdk.actions();
        let event_loop = tokio::spawn(run_event_loop(events, actions, self.sink.clone()));

        let session = ReaderSession::new(name.to_string(), event_loop);
        info!(reader = name, session = %session.id(), "reader session established");
        self.session = Some(session);
        Ok(())
    }

    /// Currently established session, if any.
    pub fn session(&self) -> Option<&ReaderSession> {
        self.session.as_ref()
    }

    /// Tear down the session and dispose the SDK handles.
    ///
    /// Each step that fails is logged and the teardown continues; nothing
    /// is re-raised.
    pub async fn teardown(&mut self) {
        if let Some(session) = self.session.take() {
            debug!(session = %session.id(), "closing reader session");
            session.close();
        }
        if let Err(error) = self.sdk.disconnect().await {
            warn!(%error, "reader disconnect failed");
        }
        if let Err(error) = self.sdk.dispose().await {
            warn!(%error, "reader dispose failed");
        }
    }
}

/// Single-slot holder for the in-flight inventory command.
///
/// Dispatching a new command aborts and awaits the previous one, so
/// press/release ordering is deterministic: the most recent trigger state
/// always wins and a release is never dropped behind a slow start.
#[derive(Debug, Default)]
struct InventorySlot {
    current: Option<JoinHandle<()>>,
}

impl InventorySlot {
    async fn dispatch(&mut self, command: impl Future<Output = ()> + Send + 'static) {
        if let Some(previous) = self.current.take() {
            previous.abort();
            let _ = previous.await;
        }
        self.current = Some(tokio::spawn(command));
    }
}

/// Translate SDK notifications into bridge events until the subscription or
/// the sink closes.
async fn run_event_loop<A: InventoryActions>(
    mut events: mpsc::Receiver<RfidSdkEvent>,
    actions: A,
    sink: mpsc::Sender<BridgeEvent>,
) {
    let mut inventory = InventorySlot::default();

    while let Some(event) = events.recv().await {
        match event {
            RfidSdkEvent::ReadNotify => {
                let mut actions = actions.clone();
                match actions.pull_tags(MAX_TAG_PULL).await {
                    Ok(tags) => {
                        // Vendor order, duplicates preserved; reads without
                        // an identifier are dropped.
                        let batch: Vec<String> =
                            tags.into_iter().filter_map(|tag| tag.id).collect();
                        if sink.send(BridgeEvent::RfidRead(batch)).await.is_err() {
                            debug!("event sink closed, stopping reader event loop");
                            break;
                        }
                    }
                    Err(error) => warn!(%error, "tag pull failed"),
                }
            }
            RfidSdkEvent::TriggerPressed => {
                let mut actions = actions.clone();
                inventory
                    .dispatch(async move {
                        if let Err(error) = actions.start_inventory().await {
                            warn!(%error, "inventory start failed");
                        }
                    })
                    .await;
            }
            RfidSdkEvent::TriggerReleased => {
                let mut actions = actions.clone();
                inventory
                    .dispatch(async move {
                        if let Err(error) = actions.stop_inventory().await {
                            warn!(%error, "inventory stop failed");
                        }
                    })
                    .await;
            }
            other => debug!(?other, "reader SDK notification"),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use scanbridge_core::constants::EVENT_CHANNEL_CAPACITY;
    use scanbridge_core::{MemoryBank, TagRead};
    use scanbridge_sdk::TriggerKind;
    use scanbridge_sdk::mock::{InventoryOp, MockRfidHandle, MockRfidSdk};

    fn adapter() -> (
        RfidAdapter<MockRfidSdk>,
        MockRfidHandle,
        mpsc::Receiver<BridgeEvent>,
    ) {
        let (sdk, handle) = MockRfidSdk::new();
        let (sink, events) = mpsc::channel(EVENT_CHANNEL_CAPACITY);
        (RfidAdapter::new(sdk, sink), handle, events)
    }

    async fn settle() {
        tokio::time::sleep(Duration::from_millis(50)).await;
    }

    #[tokio::test]
    async fn test_available_readers_swallow_failures() {
        let (mut adapter, handle, _events) = adapter();
        handle.add_reader(ReaderDescriptor::new("RFD4031"));

        assert_eq!(adapter.available_readers().await.len(), 1);

        handle.fail_enumeration(true);
        assert!(adapter.available_readers().await.is_empty());
    }

    #[tokio::test]
    async fn test_connect_applies_immediate_trigger_config() {
        let (mut adapter, handle, _events) = adapter();
        handle.add_reader(ReaderDescriptor::new("RFD4031"));

        adapter.connect("RFD4031").await.unwrap();

        let config = handle.applied_config().unwrap();
        assert_eq!(config.start_trigger, TriggerKind::Immediate);
        assert_eq!(config.stop_trigger, TriggerKind::Immediate);
        assert!(config.handheld_events);
        assert!(config.tag_read_events);
        assert!(!config.attach_tag_data);

        let session = adapter.session().unwrap();
        assert_eq!(session.reader_name(), "RFD4031");
    }

    #[tokio::test]
    async fn test_connect_unknown_reader_is_an_error() {
        let (mut adapter, handle, _events) = adapter();
        handle.add_reader(ReaderDescriptor::new("RFD4031"));

        assert!(adapter.connect("Unknown").await.is_err());
        assert!(adapter.session().is_none());
        assert_eq!(handle.connected_reader(), None);
    }

    #[tokio::test]
    async fn test_connect_already_connected_reader_is_left_alone() {
        let (mut adapter, handle, _events) = adapter();
        handle.add_reader(ReaderDescriptor::new("RFD4031").with_connected(true));

        adapter.connect("RFD4031").await.unwrap();

        // No reconnect, no reconfiguration, no new session.
        assert!(handle.applied_config().is_none());
        assert!(adapter.session().is_none());
    }

    #[tokio::test]
    async fn test_read_notify_forwards_batch_with_duplicates() {
        let (mut adapter, handle, mut events) = adapter();
        handle.add_reader(ReaderDescriptor::new("RFD4031"));
        adapter.connect("RFD4031").await.unwrap();

        handle.queue_tags([
            TagRead::new("E2001"),
            TagRead::new("E2002"),
            TagRead::from_bank("E2001", MemoryBank::Tid),
        ]);
        handle.notify_read().await.unwrap();

        assert_eq!(
            events.recv().await,
            Some(BridgeEvent::RfidRead(vec![
                "E2001".to_string(),
                "E2002".to_string(),
                "E2001".to_string(),
            ]))
        );
    }

    #[tokio::test]
    async fn test_reads_without_id_are_dropped_from_batches() {
        let (mut adapter, handle, mut events) = adapter();
        handle.add_reader(ReaderDescriptor::new("RFD4031"));
        adapter.connect("RFD4031").await.unwrap();

        handle.queue_tags([
            TagRead::new("E2001"),
            TagRead::without_id(MemoryBank::User),
            TagRead::new("E2002"),
        ]);
        handle.notify_read().await.unwrap();

        assert_eq!(
            events.recv().await,
            Some(BridgeEvent::RfidRead(vec![
                "E2001".to_string(),
                "E2002".to_string(),
            ]))
        );
    }

    #[tokio::test]
    async fn test_batches_are_capped_per_notification() {
        let (mut adapter, handle, mut events) = adapter();
        handle.add_reader(ReaderDescriptor::new("RFD4031"));
        adapter.connect("RFD4031").await.unwrap();

        handle.queue_tags((0..150).map(|i| TagRead::new(format!("E{:04}", i))));

        handle.notify_read().await.unwrap();
        handle.notify_read().await.unwrap();

        match events.recv().await {
            Some(BridgeEvent::RfidRead(batch)) => assert_eq!(batch.len(), MAX_TAG_PULL),
            other => panic!("unexpected event: {:?}", other),
        }
        match events.recv().await {
            Some(BridgeEvent::RfidRead(batch)) => assert_eq!(batch.len(), 50),
            other => panic!("unexpected event: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_trigger_press_and_release_drive_inventory() {
        let (mut adapter, handle, _events) = adapter();
        handle.add_reader(ReaderDescriptor::new("RFD4031"));
        adapter.connect("RFD4031").await.unwrap();

        handle.press_trigger().await.unwrap();
        settle().await;
        handle.release_trigger().await.unwrap();
        settle().await;

        assert_eq!(
            handle.inventory_ops(),
            vec![InventoryOp::Start, InventoryOp::Stop]
        );
    }

    #[tokio::test]
    async fn test_release_is_not_dropped_behind_a_slow_start() {
        let (mut adapter, handle, _events) = adapter();
        handle.add_reader(ReaderDescriptor::new("RFD4031"));
        adapter.connect("RFD4031").await.unwrap();

        // The start command stalls; the release must still take effect.
        handle.set_action_delay(Duration::from_millis(200));
        handle.press_trigger().await.unwrap();
        handle.release_trigger().await.unwrap();

        tokio::time::sleep(Duration::from_millis(500)).await;

        let ops = handle.inventory_ops();
        assert_eq!(ops.last(), Some(&InventoryOp::Stop));
    }

    #[tokio::test]
    async fn test_teardown_disconnects_and_disposes() {
        let (mut adapter, handle, _events) = adapter();
        handle.add_reader(ReaderDescriptor::new("RFD4031"));
        adapter.connect("RFD4031").await.unwrap();

        adapter.teardown().await;

        assert!(adapter.session().is_none());
        assert_eq!(handle.disconnect_calls(), 1);
        assert_eq!(handle.dispose_calls(), 1);
    }

    #[tokio::test]
    async fn test_teardown_failures_are_swallowed() {
        let (mut adapter, handle, _events) = adapter();
        handle.add_reader(ReaderDescriptor::new("RFD4031"));
        adapter.connect("RFD4031").await.unwrap();

        handle.fail_disconnect(true);
        handle.fail_dispose(true);

        // Does not panic or propagate; both calls are still attempted.
        adapter.teardown().await;
        assert_eq!(handle.disconnect_calls(), 1);
        assert_eq!(handle.dispose_calls(), 1);
    }

    #[tokio::test]
    async fn test_second_connect_replaces_the_session() {
        let (mut adapter, handle, _events) = adapter();
        handle.add_reader(ReaderDescriptor::new("RFD4031"));

        adapter.connect("RFD4031").await.unwrap();
        let first_id = adapter.session().unwrap().id();

        // The reader drops off and reappears disconnected.
        handle.set_reader_connected("RFD4031", false);
        adapter.connect("RFD4031").await.unwrap();

        let second = adapter.session().unwrap();
        assert_ne!(second.id(), first_id);
        assert_eq!(second.reader_name(), "RFD4031");
    }
}
