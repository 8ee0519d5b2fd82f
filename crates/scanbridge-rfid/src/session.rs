//! Owned reader session state.
//!
//! The session object replaces the source integration's module-wide mutable
//! reader reference: exactly one writer owns the connection, and replacing
//! or tearing it down goes through the adapter's call chain.

use chrono::{DateTime, Utc};
use tokio::task::JoinHandle;
use uuid::Uuid;

/// One established reader connection.
///
/// Created by a successful connect and torn down explicitly; dropping the
/// session aborts its event loop, which also drops the SDK event
/// subscription.
#[derive(Debug)]
pub struct ReaderSession {
    id: Uuid,
    reader_name: String,
    connected_at: DateTime<Utc>,
    event_loop: JoinHandle<()>,
}

impl ReaderSession {
    pub(crate) fn new(reader_name: String, event_loop: JoinHandle<()>) -> Self {
        Self {
            id: Uuid::new_v4(),
            reader_name,
            connected_at: Utc::now(),
            event_loop,
        }
    }

    /// Unique identifier of this session.
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Name of the connected reader.
    pub fn reader_name(&self) -> &str {
        &self.reader_name
    }

    /// When the session was established.
    pub fn connected_at(&self) -> DateTime<Utc> {
        self.connected_at
    }

    /// How long the session has been active.
    pub fn uptime(&self) -> chrono::Duration {
        Utc::now() - self.connected_at
    }

    /// Stop the event loop and drop the SDK event subscription.
    pub(crate) fn close(self) {
        self.event_loop.abort();
    }
}

impl Drop for ReaderSession {
    fn drop(&mut self) {
        self.event_loop.abort();
    }
}
