//! Mock RFID reader SDK for testing and development.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::sync::mpsc;

use scanbridge_core::constants::SDK_EVENT_CHANNEL_CAPACITY;
use scanbridge_core::{BridgeError, ReaderDescriptor, Result, TagRead};

use crate::traits::{InventoryActions, ReaderConfig, RfidSdk, RfidSdkEvent};

/// Inventory command recorded by the mock reader.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InventoryOp {
    /// An inventory pass was started.
    Start,

    /// The running inventory pass was stopped.
    Stop,
}

/// Scriptable state shared between the mock SDK, its handle, and its actions.
#[derive(Debug, Default)]
struct MockRfidState {
    readers: Vec<ReaderDescriptor>,
    connected_to: Option<String>,
    config: Option<ReaderConfig>,
    events_tx: Option<mpsc::Sender<RfidSdkEvent>>,
    pending_tags: VecDeque<TagRead>,
    inventory_ops: Vec<InventoryOp>,
    action_delay: Option<Duration>,
    fail_enumeration: bool,
    fail_connect: bool,
    fail_disconnect: bool,
    fail_dispose: bool,
    disconnect_calls: u32,
    dispose_calls: u32,
}

fn lock(state: &Arc<Mutex<MockRfidState>>) -> MutexGuard<'_, MockRfidState> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Mock RFID reader SDK.
///
/// Simulates the vendor's readers-collection and reader handles. The paired
/// [`MockRfidHandle`] scripts available readers, queues pending tag reads,
/// emits trigger and read-notify events, and records the inventory commands
/// and teardown calls the adapter issues.
///
/// # Examples
///
/// ```
/// use scanbridge_sdk::mock::MockRfidSdk;
/// use scanbridge_sdk::{InventoryActions, RfidSdk};
/// use scanbridge_core::{ReaderDescriptor, TagRead};
///
/// #[tokio::main]
/// async fn main() -> scanbridge_core::Result<()> {
///     let (mut sdk, handle) = MockRfidSdk::new();
///     handle.add_reader(ReaderDescriptor::new("RFD4031"));
///     handle.queue_tags([TagRead::new("E2001")]);
///
///     sdk.connect("RFD4031").await?;
///
///     let mut actions = sdk.actions();
///     let tags = actions.pull_tags(100).await?;
///     assert_eq!(tags.len(), 1);
///     Ok(())
/// }
/// ```
#[derive(Debug)]
pub struct MockRfidSdk {
    state: Arc<Mutex<MockRfidState>>,
}

impl MockRfidSdk {
    /// Create a mock RFID SDK and its controlling handle.
    pub fn new() -> (Self, MockRfidHandle) {
        let state = Arc::new(Mutex::new(MockRfidState::default()));

        let sdk = Self {
            state: Arc::clone(&state),
        };
        let handle = MockRfidHandle { state };

        (sdk, handle)
    }
}

impl RfidSdk for MockRfidSdk {
    type Actions = MockRfidActions;

    async fn available_readers(&mut self) -> Result<Vec<ReaderDescriptor>> {
        let state = lock(&self.state);
        if state.fail_enumeration {
            return Err(BridgeError::enumeration("reader enumeration failed"));
        }
        Ok(state.readers.clone())
    }

    async fn connect(&mut self, name: &str) -> Result<()> {
        let mut state = lock(&self.state);
        if state.fail_connect {
            return Err(BridgeError::session_failed(name, "reader connect failed"));
        }

        let reader = state
            .readers
            .iter_mut()
            .find(|r| r.name == name)
            .ok_or_else(|| BridgeError::not_connected(name))?;
        reader.connected = true;
        state.connected_to = Some(name.to_string());
        Ok(())
    }

    async fn configure(&mut self, config: ReaderConfig) -> Result<mpsc::Receiver<RfidSdkEvent>> {
        let mut state = lock(&self.state);
        if state.connected_to.is_none() {
            return Err(BridgeError::configuration("no reader connected"));
        }

        // Reconfiguring replaces the previous events listener.
        let (events_tx, events_rx) = mpsc::channel(SDK_EVENT_CHANNEL_CAPACITY);
        state.config = Some(config);
        state.events_tx = Some(events_tx);
        Ok(events_rx)
    }

    fn actions(&self) -> Self::Actions {
        MockRfidActions {
            state: Arc::clone(&self.state),
        }
    }

    async fn disconnect(&mut self) -> Result<()> {
        let mut state = lock(&self.state);
        state.disconnect_calls += 1;
        if state.fail_disconnect {
            return Err(BridgeError::teardown("reader disconnect failed"));
        }
        if let Some(name) = state.connected_to.take() {
            if let Some(reader) = state.readers.iter_mut().find(|r| r.name == name) {
                reader.connected = false;
            }
        }
        Ok(())
    }

    async fn dispose(&mut self) -> Result<()> {
        let mut state = lock(&self.state);
        state.dispose_calls += 1;
        if state.fail_dispose {
            return Err(BridgeError::teardown("reader dispose failed"));
        }
        Ok(())
    }
}

/// Cloneable inventory actions handle for a [`MockRfidSdk`].
#[derive(Debug, Clone)]
pub struct MockRfidActions {
    state: Arc<Mutex<MockRfidState>>,
}

impl InventoryActions for MockRfidActions {
    async fn start_inventory(&mut self) -> Result<()> {
        let delay = lock(&self.state).action_delay;
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        lock(&self.state).inventory_ops.push(InventoryOp::Start);
        Ok(())
    }

    async fn stop_inventory(&mut self) -> Result<()> {
        let delay = lock(&self.state).action_delay;
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        lock(&self.state).inventory_ops.push(InventoryOp::Stop);
        Ok(())
    }

    async fn pull_tags(&mut self, max: usize) -> Result<Vec<TagRead>> {
        let mut state = lock(&self.state);
        let take = max.min(state.pending_tags.len());
        Ok(state.pending_tags.drain(..take).collect())
    }
}

/// Handle for controlling a [`MockRfidSdk`].
#[derive(Debug, Clone)]
pub struct MockRfidHandle {
    state: Arc<Mutex<MockRfidState>>,
}

impl MockRfidHandle {
    /// Make a reader discoverable by enumeration.
    pub fn add_reader(&self, reader: ReaderDescriptor) {
        lock(&self.state).readers.push(reader);
    }

    /// Script the connected flag a reader reports on enumeration.
    pub fn set_reader_connected(&self, name: &str, connected: bool) {
        let mut state = lock(&self.state);
        if let Some(reader) = state.readers.iter_mut().find(|r| r.name == name) {
            reader.connected = connected;
        }
    }

    /// Queue tag reads to be picked up by the next pulls.
    pub fn queue_tags(&self, tags: impl IntoIterator<Item = TagRead>) {
        lock(&self.state).pending_tags.extend(tags);
    }

    /// Delay inventory commands, so in-flight actions can be observed.
    pub fn set_action_delay(&self, delay: Duration) {
        lock(&self.state).action_delay = Some(delay);
    }

    /// Make enumeration calls fail until reset.
    pub fn fail_enumeration(&self, fail: bool) {
        lock(&self.state).fail_enumeration = fail;
    }

    /// Make connect calls fail until reset.
    pub fn fail_connect(&self, fail: bool) {
        lock(&self.state).fail_connect = fail;
    }

    /// Make disconnect calls fail until reset.
    pub fn fail_disconnect(&self, fail: bool) {
        lock(&self.state).fail_disconnect = fail;
    }

    /// Make dispose calls fail until reset.
    pub fn fail_dispose(&self, fail: bool) {
        lock(&self.state).fail_dispose = fail;
    }

    /// Emit a hardware trigger press.
    ///
    /// # Errors
    ///
    /// Returns an error if the subscribed receiver was dropped.
    pub async fn press_trigger(&self) -> Result<()> {
        self.emit(RfidSdkEvent::TriggerPressed).await
    }

    /// Emit a hardware trigger release.
    ///
    /// # Errors
    ///
    /// Returns an error if the subscribed receiver was dropped.
    pub async fn release_trigger(&self) -> Result<()> {
        self.emit(RfidSdkEvent::TriggerReleased).await
    }

    /// Emit a read notification.
    ///
    /// # Errors
    ///
    /// Returns an error if the subscribed receiver was dropped.
    pub async fn notify_read(&self) -> Result<()> {
        self.emit(RfidSdkEvent::ReadNotify).await
    }

    async fn emit(&self, event: RfidSdkEvent) -> Result<()> {
        let events_tx = lock(&self.state)
            .events_tx
            .clone()
            .ok_or_else(|| BridgeError::channel_closed("RFID SDK events"))?;
        events_tx
            .send(event)
            .await
            .map_err(|_| BridgeError::channel_closed("RFID SDK events"))
    }

    /// Name of the currently connected reader, if any.
    pub fn connected_reader(&self) -> Option<String> {
        lock(&self.state).connected_to.clone()
    }

    /// Configuration the adapter applied, if any.
    pub fn applied_config(&self) -> Option<ReaderConfig> {
        lock(&self.state).config
    }

    /// Inventory commands issued so far, in completion order.
    pub fn inventory_ops(&self) -> Vec<InventoryOp> {
        lock(&self.state).inventory_ops.clone()
    }

    /// Number of pending tags not yet pulled.
    pub fn pending_tag_count(&self) -> usize {
        lock(&self.state).pending_tags.len()
    }

    /// Number of disconnect calls made on the SDK.
    pub fn disconnect_calls(&self) -> u32 {
        lock(&self.state).disconnect_calls
    }

    /// Number of dispose calls made on the SDK.
    pub fn dispose_calls(&self) -> u32 {
        lock(&self.state).dispose_calls
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scanbridge_core::MemoryBank;

    #[tokio::test]
    async fn test_connect_marks_reader_connected() {
        let (mut sdk, handle) = MockRfidSdk::new();
        handle.add_reader(ReaderDescriptor::new("RFD4031"));

        sdk.connect("RFD4031").await.unwrap();

        assert_eq!(handle.connected_reader().as_deref(), Some("RFD4031"));
        let readers = sdk.available_readers().await.unwrap();
        assert!(readers[0].connected);
    }

    #[tokio::test]
    async fn test_connect_unknown_reader_fails() {
        let (mut sdk, handle) = MockRfidSdk::new();
        handle.add_reader(ReaderDescriptor::new("RFD4031"));

        assert!(sdk.connect("Unknown").await.is_err());
        assert_eq!(handle.connected_reader(), None);
    }

    #[tokio::test]
    async fn test_configure_requires_connection() {
        let (mut sdk, handle) = MockRfidSdk::new();
        handle.add_reader(ReaderDescriptor::new("RFD4031"));

        assert!(sdk.configure(ReaderConfig::default()).await.is_err());

        sdk.connect("RFD4031").await.unwrap();
        let _events = sdk.configure(ReaderConfig::default()).await.unwrap();
        assert!(handle.applied_config().is_some());
    }

    #[tokio::test]
    async fn test_pull_tags_respects_cap_and_order() {
        let (sdk, handle) = MockRfidSdk::new();
        handle.queue_tags([
            TagRead::new("E2001"),
            TagRead::from_bank("E2001", MemoryBank::Tid),
            TagRead::new("E2002"),
        ]);

        let mut actions = sdk.actions();
        let first = actions.pull_tags(2).await.unwrap();
        assert_eq!(first.len(), 2);
        assert_eq!(first[0].id.as_deref(), Some("E2001"));
        assert_eq!(first[1].bank, MemoryBank::Tid);

        let rest = actions.pull_tags(2).await.unwrap();
        assert_eq!(rest.len(), 1);
        assert_eq!(handle.pending_tag_count(), 0);
    }

    #[tokio::test]
    async fn test_inventory_ops_are_recorded() {
        let (sdk, handle) = MockRfidSdk::new();

        let mut actions = sdk.actions();
        actions.start_inventory().await.unwrap();
        actions.stop_inventory().await.unwrap();

        assert_eq!(
            handle.inventory_ops(),
            vec![InventoryOp::Start, InventoryOp::Stop]
        );
    }

    #[tokio::test]
    async fn test_trigger_events_are_delivered() {
        let (mut sdk, handle) = MockRfidSdk::new();
        handle.add_reader(ReaderDescriptor::new("RFD4031"));
        sdk.connect("RFD4031").await.unwrap();

        let mut events = sdk.configure(ReaderConfig::default()).await.unwrap();

        handle.press_trigger().await.unwrap();
        handle.release_trigger().await.unwrap();
        handle.notify_read().await.unwrap();

        assert_eq!(events.recv().await, Some(RfidSdkEvent::TriggerPressed));
        assert_eq!(events.recv().await, Some(RfidSdkEvent::TriggerReleased));
        assert_eq!(events.recv().await, Some(RfidSdkEvent::ReadNotify));
    }

    #[tokio::test]
    async fn test_teardown_calls_are_counted() {
        let (mut sdk, handle) = MockRfidSdk::new();
        handle.add_reader(ReaderDescriptor::new("RFD4031"));
        sdk.connect("RFD4031").await.unwrap();

        sdk.disconnect().await.unwrap();
        sdk.dispose().await.unwrap();

        assert_eq!(handle.disconnect_calls(), 1);
        assert_eq!(handle.dispose_calls(), 1);
        assert_eq!(handle.connected_reader(), None);
    }

    #[tokio::test]
    async fn test_failed_teardown_still_counts() {
        let (mut sdk, handle) = MockRfidSdk::new();
        handle.fail_disconnect(true);
        handle.fail_dispose(true);

        assert!(sdk.disconnect().await.is_err());
        assert!(sdk.dispose().await.is_err());
        assert_eq!(handle.disconnect_calls(), 1);
        assert_eq!(handle.dispose_calls(), 1);
    }
}
