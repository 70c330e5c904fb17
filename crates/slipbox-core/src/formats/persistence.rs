//! # Persistence Format
//!
//! Binary serialization for Slipbox snapshots.
//!
//! Format: Header (5 bytes) + postcard-serialized snapshot data.
//! - 4 bytes: Magic ("SLIP")
//! - 1 byte: Version
//!
//! The format lets a front-end persist a built index and answer queries
//! later without re-scanning the vault. Validation happens before payload
//! deserialization:
//! - Maximum payload size limit (`MAX_PERSISTENCE_PAYLOAD_SIZE`)
//! - Header magic and version checked first
//! - Corrupted data fails with an error, never a panic

use crate::snapshot::Snapshot;
use crate::{SlipboxError, primitives};

// =============================================================================
// SIZE LIMITS
// =============================================================================

/// Maximum allowed payload size for the persistence format.
///
/// This prevents memory exhaustion from malicious or corrupted data.
/// 500 MB is a generous upper bound for an index over a text vault.
pub const MAX_PERSISTENCE_PAYLOAD_SIZE: usize = 500 * 1024 * 1024;

/// Minimum valid file size (header only).
const MIN_FILE_SIZE: usize = 5;

// =============================================================================
// FILE HEADER
// =============================================================================

/// The persistence header precedes all snapshot data.
#[derive(Debug, Clone, Copy)]
pub struct PersistenceHeader {
    pub magic: [u8; 4],
    pub version: u8,
}

impl PersistenceHeader {
    /// Create a new header with current format version.
    #[must_use]
    pub fn new() -> Self {
        Self {
            magic: *primitives::MAGIC_BYTES,
            version: primitives::FORMAT_VERSION,
        }
    }

    /// Validate the header.
    pub fn validate(&self) -> Result<(), SlipboxError> {
        if &self.magic != primitives::MAGIC_BYTES {
            return Err(SlipboxError::DeserializationError(
                "Invalid magic bytes".to_string(),
            ));
        }
        if self.version != primitives::FORMAT_VERSION {
            return Err(SlipboxError::DeserializationError(format!(
                "Unsupported version: {} (expected {})",
                self.version,
                primitives::FORMAT_VERSION
            )));
        }
        Ok(())
    }

    /// Write header to bytes.
    pub fn to_bytes(&self) -> [u8; 5] {
        let mut bytes = [0u8; 5];
        bytes[0..4].copy_from_slice(&self.magic);
        bytes[4] = self.version;
        bytes
    }

    /// Read header from bytes.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, SlipboxError> {
        if bytes.len() < MIN_FILE_SIZE {
            return Err(SlipboxError::DeserializationError(
                "Header too short".to_string(),
            ));
        }
        let mut magic = [0u8; 4];
        magic.copy_from_slice(&bytes[0..4]);
        Ok(Self {
            magic,
            version: bytes[4],
        })
    }
}

impl Default for PersistenceHeader {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// SERIALIZATION FUNCTIONS
// =============================================================================

/// Serialize a snapshot to bytes (header + payload).
///
/// This is a pure transformation - no file I/O.
pub fn snapshot_to_bytes(snapshot: &Snapshot) -> Result<Vec<u8>, SlipboxError> {
    let header = PersistenceHeader::new();

    let payload = postcard::to_stdvec(snapshot)
        .map_err(|e| SlipboxError::SerializationError(e.to_string()))?;

    let mut result = Vec::with_capacity(MIN_FILE_SIZE + payload.len());
    result.extend_from_slice(&header.to_bytes());
    result.extend_from_slice(&payload);

    Ok(result)
}

/// Deserialize a snapshot from bytes.
///
/// This is a pure transformation - no file I/O. Size and header are
/// validated before the payload is touched.
pub fn snapshot_from_bytes(bytes: &[u8]) -> Result<Snapshot, SlipboxError> {
    if bytes.len() < MIN_FILE_SIZE {
        return Err(SlipboxError::DeserializationError(
            "Data too short: minimum 5 bytes required".to_string(),
        ));
    }

    if bytes.len() > MAX_PERSISTENCE_PAYLOAD_SIZE {
        return Err(SlipboxError::DeserializationError(format!(
            "Data size {} bytes exceeds maximum allowed {} bytes",
            bytes.len(),
            MAX_PERSISTENCE_PAYLOAD_SIZE
        )));
    }

    let header = PersistenceHeader::from_bytes(bytes)?;
    header.validate()?;

    let payload = &bytes[MIN_FILE_SIZE..];
    let snapshot: Snapshot = postcard::from_bytes(payload).map_err(|e| {
        SlipboxError::DeserializationError(format!("Failed to deserialize snapshot data: {}", e))
    })?;

    Ok(snapshot)
}

// =============================================================================
// TESTS
// =============================================================================
