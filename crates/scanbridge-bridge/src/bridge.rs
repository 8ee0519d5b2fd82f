//! Bridge actor and host-facing handle.
//!
//! The bridge owns both adapters and runs on its own task; the handle is
//! the host's only surface. Commands travel over an `mpsc` channel, queries
//! reply through `oneshot`, and adapter events arrive on the shared bridge
//! event channel.
//!
//! ```text
//! ┌──────────────┐  commands   ┌─────────────────────────┐
//! │ BridgeHandle │────────────►│ Bridge task             │
//! │              │             │  ├─ BarcodeAdapter ◄──── vendor scanner SDK
//! │   recv()     │◄────────────│  └─ RfidAdapter    ◄──── vendor reader SDK
//! └──────────────┘   events    └─────────────────────────┘
//! ```

use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use scanbridge_barcode::BarcodeAdapter;
use scanbridge_core::constants::EVENT_CHANNEL_CAPACITY;
use scanbridge_core::{BridgeError, BridgeEvent, Result};
use scanbridge_rfid::RfidAdapter;
use scanbridge_sdk::{RfidSdk, ScannerSdk};

/// Command sent from the handle to the bridge task.
#[derive(Debug)]
enum Command {
    /// Re-enumerate scanners and reply with their names.
    AllDevices(oneshot::Sender<Vec<String>>),

    /// Establish the dual barcode/RFID session for this device name.
    Connect(String),

    /// Tear both adapters down and stop the task.
    Shutdown,
}

/// Hardware bridge owning the barcode and RFID adapters.
///
/// Construct it with the two vendor SDK handles, then call
/// [`Bridge::start`] to spawn the bridge task and obtain the host-facing
/// [`BridgeHandle`].
///
/// # Examples
///
/// ```
/// use scanbridge_bridge::Bridge;
/// use scanbridge_core::ScannerDescriptor;
/// use scanbridge_sdk::mock::{MockRfidSdk, MockScannerSdk};
///
/// #[tokio::main]
/// async fn main() -> scanbridge_core::Result<()> {
///     let (scanner_sdk, scanner) = MockScannerSdk::new();
///     let (rfid_sdk, _rfid) = MockRfidSdk::new();
///     scanner.add_scanner(ScannerDescriptor::new(1, "Scanner-A"));
///
///     let handle = Bridge::new(scanner_sdk, rfid_sdk).start();
///
///     let devices = handle.all_devices().await?;
///     assert_eq!(devices, vec!["Scanner-A"]);
///
///     handle.shutdown().await?;
///     Ok(())
/// }
/// ```
pub struct Bridge<S: ScannerSdk, R: RfidSdk> {
    barcode: BarcodeAdapter<S>,
    rfid: RfidAdapter<R>,
    events: mpsc::Sender<BridgeEvent>,
    event_rx: mpsc::Receiver<BridgeEvent>,
}

impl<S, R> Bridge<S, R>
where
    S: ScannerSdk + 'static,
    R: RfidSdk + 'static,
{
    /// Create a bridge over the two vendor SDK handles.
    pub fn new(scanner_sdk: S, rfid_sdk: R) -> Self {
        let (events, event_rx) = mpsc::channel(EVENT_CHANNEL_CAPACITY);

        Self {
            barcode: BarcodeAdapter::new(scanner_sdk, events.clone()),
            rfid: RfidAdapter::new(rfid_sdk, events.clone()),
            events,
            event_rx,
        }
    }

    /// Spawn the bridge task and return the host-facing handle.
    pub fn start(self) -> BridgeHandle {
        let (command_tx, command_rx) = mpsc::channel(EVENT_CHANNEL_CAPACITY);

        let Self {
            barcode,
            rfid,
            events,
            event_rx,
        } = self;
        let task = tokio::spawn(run(barcode, rfid, events, command_rx));

        BridgeHandle {
            command_tx,
            event_rx,
            task,
        }
    }
}

/// Bridge task body: serve commands until shutdown, then tear down.
///
/// The loop also ends when every handle is gone, so an abandoned bridge
/// still releases its SDK handles.
async fn run<S: ScannerSdk, R: RfidSdk>(
    mut barcode: BarcodeAdapter<S>,
    mut rfid: RfidAdapter<R>,
    events: mpsc::Sender<BridgeEvent>,
    mut commands: mpsc::Receiver<Command>,
) {
    while let Some(command) = commands.recv().await {
        match command {
            Command::AllDevices(reply) => {
                barcode.enumerate().await;
                let _ = reply.send(barcode.scanner_names());
            }
            Command::Connect(name) => {
                connect_device(&mut barcode, &mut rfid, &events, &name).await;
            }
            Command::Shutdown => break,
        }
    }

    rfid.teardown().await;
    barcode.teardown();
}

/// Establish the dual barcode/RFID session for one device name.
///
/// No scanner carrying the name means no session work and no status event.
/// Otherwise the barcode session is requested first, then the reader leg;
/// the emitted status reflects the barcode leg only, and a reader failure
/// is logged but invisible to the host.
async fn connect_device<S: ScannerSdk, R: RfidSdk>(
    barcode: &mut BarcodeAdapter<S>,
    rfid: &mut RfidAdapter<R>,
    events: &mpsc::Sender<BridgeEvent>,
    name: &str,
) {
    barcode.enumerate().await;
    let Some(scanner_id) = barcode.find_by_name(name).map(|s| s.id) else {
        debug!(device = name, "no scanner carries this name");
        return;
    };

    let connected = barcode.connect(scanner_id).await;
    if let Err(error) = rfid.connect(name).await {
        warn!(%error, device = name, "reader leg of the connect failed");
    }

    let status = BridgeEvent::DeviceConnected { connected };
    if events.send(status).await.is_err() {
        debug!("event sink closed, dropping connect status");
    }
}

/// Host-facing handle to a running bridge.
///
/// Cloneless by design: the handle owns the event receiver, so exactly one
/// consumer drains the bridge event stream.
pub struct BridgeHandle {
    command_tx: mpsc::Sender<Command>,
    event_rx: mpsc::Receiver<BridgeEvent>,
    task: JoinHandle<()>,
}

impl BridgeHandle {
    /// Refresh the scanner snapshot and return the device names.
    ///
    /// Zero discoverable devices yields an empty list.
    ///
    /// # Errors
    ///
    /// Returns an error if the bridge task is no longer running.
    pub async fn all_devices(&self) -> Result<Vec<String>> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.command_tx
            .send(Command::AllDevices(reply_tx))
            .await
            .map_err(|_| BridgeError::channel_closed("bridge commands"))?;
        reply_rx
            .await
            .map_err(|_| BridgeError::channel_closed("bridge reply"))
    }

    /// Queue establishment of the dual session for this device name.
    ///
    /// Returns as soon as the command is enqueued; the outcome arrives as a
    /// [`BridgeEvent::DeviceConnected`] event, or not at all when no device
    /// carries the name.
    ///
    /// # Errors
    ///
    /// Returns an error if the bridge task is no longer running.
    pub async fn connect_to_device(&self, name: impl Into<String>) -> Result<()> {
        self.command_tx
            .send(Command::Connect(name.into()))
            .await
            .map_err(|_| BridgeError::channel_closed("bridge commands"))
    }

    /// Receive the next bridge event.
    ///
    /// Returns `None` once the bridge task has shut down.
    pub async fn recv(&mut self) -> Option<BridgeEvent> {
        self.event_rx.recv().await
    }

    /// Tear both adapters down and wait for the bridge task to finish.
    ///
    /// # Errors
    ///
    /// Returns an error if the bridge task panicked.
    pub async fn shutdown(self) -> Result<()> {
        let _ = self.command_tx.send(Command::Shutdown).await;
        self.task
            .await
            .map_err(|_| BridgeError::teardown("bridge task failed"))
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use scanbridge_core::ScannerDescriptor;
    use scanbridge_sdk::mock::{MockRfidSdk, MockScannerSdk};

    #[tokio::test]
    async fn test_all_devices_round_trip() {
        let (scanner_sdk, scanner) = MockScannerSdk::new();
        let (rfid_sdk, _rfid) = MockRfidSdk::new();
        scanner.add_scanner(ScannerDescriptor::new(1, "Scanner-A"));

        let handle = Bridge::new(scanner_sdk, rfid_sdk).start();

        assert_eq!(handle.all_devices().await.unwrap(), vec!["Scanner-A"]);
        handle.shutdown().await.unwrap();
    }

    #[tokio::test]
    async fn test_dropping_the_handle_releases_the_sdk() {
        let (scanner_sdk, _scanner) = MockScannerSdk::new();
        let (rfid_sdk, rfid) = MockRfidSdk::new();

        let handle = Bridge::new(scanner_sdk, rfid_sdk).start();
        drop(handle);

        tokio::time::sleep(Duration::from_millis(100)).await;
        assert_eq!(rfid.disconnect_calls(), 1);
        assert_eq!(rfid.dispose_calls(), 1);
    }

    #[tokio::test]
    async fn test_shutdown_tears_both_adapters_down() {
        let (scanner_sdk, _scanner) = MockScannerSdk::new();
        let (rfid_sdk, rfid) = MockRfidSdk::new();

        let handle = Bridge::new(scanner_sdk, rfid_sdk).start();
        handle.shutdown().await.unwrap();

        assert_eq!(rfid.disconnect_calls(), 1);
        assert_eq!(rfid.dispose_calls(), 1);
    }
}
