//! Device descriptors and tag data shared across the bridge.
//!
//! Descriptors are read-only snapshots produced by enumeration calls. They
//! carry whatever the vendor SDK reported at the time of the call and no
//! invariant ties them to live hardware state between refreshes.

use serde::{Deserialize, Serialize};

/// Snapshot of one discoverable barcode scanner.
///
/// Produced by scanner enumeration and replaced wholesale by the next
/// enumeration call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScannerDescriptor {
    /// Vendor-assigned numeric scanner identifier.
    pub id: u32,

    /// Display name (e.g., "Scanner-A").
    pub name: String,

    /// Whether a communication session is currently active for this scanner.
    pub active: bool,
}

impl ScannerDescriptor {
    /// Create a descriptor for a scanner without an active session.
    pub fn new(id: u32, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            active: false,
        }
    }

    /// Mark the descriptor as having an active session.
    pub fn with_active(mut self, active: bool) -> Self {
        self.active = active;
        self
    }
}

/// Snapshot of one discoverable RFID reader.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReaderDescriptor {
    /// Reader name as reported by the vendor SDK. Selection is by name;
    /// if two readers share a name, enumeration order decides.
    pub name: String,

    /// Whether the reader is already connected.
    pub connected: bool,
}

impl ReaderDescriptor {
    /// Create a descriptor for a disconnected reader.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            connected: false,
        }
    }

    /// Mark the descriptor as connected.
    pub fn with_connected(mut self, connected: bool) -> Self {
        self.connected = connected;
        self
    }
}

/// Tag memory bank a read was taken from.
///
/// An access sequence touches several banks, so one physical tag may be
/// reported once per bank within a single inventory pass. The bridge
/// forwards every report; deduplication is left to the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[non_exhaustive]
pub enum MemoryBank {
    /// Electronic Product Code bank.
    Epc,

    /// Tag identification bank.
    Tid,

    /// User memory bank.
    User,
}

/// One tag read as reported by the reader.
///
/// The identifier is kept nullable exactly as the vendor delivers it; reads
/// without an identifier are dropped when batches are assembled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagRead {
    /// Tag identifier, if the vendor attached one to this read.
    pub id: Option<String>,

    /// Memory bank this read came from.
    pub bank: MemoryBank,
}

impl TagRead {
    /// Create a tag read with an identifier from the EPC bank.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            bank: MemoryBank::Epc,
        }
    }

    /// Create a tag read from a specific bank.
    pub fn from_bank(id: impl Into<String>, bank: MemoryBank) -> Self {
        Self {
            id: Some(id.into()),
            bank,
        }
    }

    /// Create a tag read with no identifier attached.
    pub fn without_id(bank: MemoryBank) -> Self {
        Self { id: None, bank }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scanner_descriptor_defaults_inactive() {
        let scanner = ScannerDescriptor::new(3, "Scanner-A");
        assert_eq!(scanner.id, 3);
        assert_eq!(scanner.name, "Scanner-A");
        assert!(!scanner.active);
    }

    #[test]
    fn test_scanner_descriptor_with_active() {
        let scanner = ScannerDescriptor::new(7, "Scanner-B").with_active(true);
        assert!(scanner.active);
    }

    #[test]
    fn test_reader_descriptor_defaults_disconnected() {
        let reader = ReaderDescriptor::new("RFD4031-G10B700-US");
        assert!(!reader.connected);
        assert_eq!(reader.name, "RFD4031-G10B700-US");
    }

    #[test]
    fn test_tag_read_constructors() {
        let tag = TagRead::new("E2001");
        assert_eq!(tag.id.as_deref(), Some("E2001"));
        assert_eq!(tag.bank, MemoryBank::Epc);

        let tid = TagRead::from_bank("E2001", MemoryBank::Tid);
        assert_eq!(tid.bank, MemoryBank::Tid);

        let empty = TagRead::without_id(MemoryBank::User);
        assert!(empty.id.is_none());
    }

    #[test]
    fn test_descriptor_serde_round_trip() {
        let scanner = ScannerDescriptor::new(1, "Scanner-A").with_active(true);
        let json = serde_json::to_string(&scanner).unwrap();
        let back: ScannerDescriptor = serde_json::from_str(&json).unwrap();
        assert_eq!(scanner, back);
    }
}
