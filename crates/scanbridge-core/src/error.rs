//! Error types for bridge operations.
//!
//! The adapter layer keeps a "best effort, never throw past the adapter
//! boundary" policy: these errors circulate between the SDK seams and the
//! adapters, where they are logged and converted into empty lists or boolean
//! results before anything reaches the host application.

/// Result type alias for bridge operations.
pub type Result<T> = std::result::Result<T, BridgeError>;

/// Errors that can occur while driving the vendor SDKs.
#[derive(Debug, thiserror::Error)]
pub enum BridgeError {
    /// Device enumeration failed inside the vendor SDK.
    #[error("Enumeration failed: {message}")]
    Enumeration { message: String },

    /// A communication session could not be established.
    #[error("Session failed for device {device}: {message}")]
    SessionFailed { device: String, message: String },

    /// The named device is not connected or was never discovered.
    #[error("Device not connected: {device}")]
    NotConnected { device: String },

    /// Reader configuration was rejected by the SDK.
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// An inventory start/stop or tag pull failed.
    #[error("Inventory error: {message}")]
    Inventory { message: String },

    /// Teardown of a reader or session handle failed.
    #[error("Teardown error: {message}")]
    Teardown { message: String },

    /// The event channel to the host or from the SDK is closed.
    #[error("Event channel closed: {channel}")]
    ChannelClosed { channel: String },

    /// Generic I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl BridgeError {
    /// Create a new enumeration error.
    pub fn enumeration(message: impl Into<String>) -> Self {
        Self::Enumeration {
            message: message.into(),
        }
    }

    /// Create a new session failure error.
    pub fn session_failed(device: impl Into<String>, message: impl Into<String>) -> Self {
        Self::SessionFailed {
            device: device.into(),
            message: message.into(),
        }
    }

    /// Create a new not-connected error.
    pub fn not_connected(device: impl Into<String>) -> Self {
        Self::NotConnected {
            device: device.into(),
        }
    }

    /// Create a new configuration error.
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Create a new inventory error.
    pub fn inventory(message: impl Into<String>) -> Self {
        Self::Inventory {
            message: message.into(),
        }
    }

    /// Create a new teardown error.
    pub fn teardown(message: impl Into<String>) -> Self {
        Self::Teardown {
            message: message.into(),
        }
    }

    /// Create a new channel-closed error.
    pub fn channel_closed(channel: impl Into<String>) -> Self {
        Self::ChannelClosed {
            channel: channel.into(),
        }
    }
}
