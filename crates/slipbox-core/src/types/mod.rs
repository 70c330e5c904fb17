//! # Core Type Definitions
//!
//! This module contains all core types for the Slipbox note-indexing engine:
//! - Note identity (`NoteId`)
//! - Note records (`Note`) and extracted links (`RawLink`)
//! - Non-fatal diagnostics (`ParseWarning`, `DanglingLink`, `LoadError`)
//! - Error types (`SlipboxError`)
//!
//! ## Determinism Guarantees
//!
//! All types in this module:
//! - Use integer arithmetic only (no floating-point)
//! - Implement `Ord` for deterministic ordering in `BTreeMap`/`BTreeSet`
//! - Serialize identically for identical inputs

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

// =============================================================================
// NOTE IDENTITY
// =============================================================================

/// Unique identifier for a note, derived from its file stem.
///
/// Identifiers are compared and ordered lexicographically; that ordering is
/// the stable tie-break used everywhere in the engine.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct NoteId(pub String);

impl NoteId {
    /// Create a note id from a string, trimming surrounding whitespace.
    ///
    /// Wiki-link targets are normalized through the same path so that
    /// `[[ B ]]` resolves to the note with stem `B`.
    #[must_use]
    pub fn new(s: impl AsRef<str>) -> Self {
        Self(s.as_ref().trim().to_string())
    }

    /// Get the id as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NoteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// =============================================================================
// LINKS
// =============================================================================

/// A single wiki-style link occurrence extracted from a note body.
///
/// `[[target]]` and `[[target|label]]` both produce a `RawLink`; the raw
/// target string is kept as written so unresolved targets can be reported
/// verbatim in [`DanglingLink`].
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RawLink {
    /// The link target as written in the note body (untrimmed resolution
    /// happens at graph-build time via [`NoteId::new`]).
    pub target: String,
    /// Optional display label (`[[target|label]]`).
    pub label: Option<String>,
    /// Byte offset of the `[[` opener within the note body.
    pub offset: usize,
}

/// A resolved directed edge between two notes.
///
/// Derived data: recomputed on every rebuild, never persisted independently.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Link {
    /// The note containing the link.
    pub source: NoteId,
    /// The note the link points to.
    pub target: NoteId,
    /// Optional display label carried over from the raw link.
    pub label: Option<String>,
}

/// A link whose target does not exist in the current note set.
///
/// Recorded, not an error: the edge is never dropped silently.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct DanglingLink {
    /// The note containing the unresolved link.
    pub source: NoteId,
    /// The unresolved target, normalized the same way note ids are.
    pub target: String,
}

// =============================================================================
// NOTE
// =============================================================================

/// The atomic unit of written thought: one markdown file.
///
/// Notes are immutable snapshots of file state at load time. The graph index
/// owns them for the duration of one rebuild cycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    /// Unique identifier derived from the file stem.
    pub id: NoteId,
    /// Title: the first `#` heading, falling back to the file stem.
    pub title: String,
    /// Full body text of the note.
    pub body: String,
    /// Path the note was loaded from.
    pub path: PathBuf,
    /// Tags parsed from the metadata block, empty when absent.
    pub tags: Vec<String>,
    /// Outbound link occurrences extracted from the body.
    pub links: Vec<RawLink>,
    /// Creation time in seconds since the epoch, when the platform reports it.
    pub created: Option<u64>,
    /// Last modification time in seconds since the epoch.
    pub modified: Option<u64>,
}

// =============================================================================
// DIAGNOSTICS (non-fatal)
// =============================================================================

/// Malformed link syntax in a note body.
///
/// Collected and reported; indexing stays resilient to partial syntax errors
/// in individual notes.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ParseWarning {
    /// The note the warning was raised in.
    pub note: NoteId,
    /// Byte offset of the offending `[[` within the body.
    pub offset: usize,
    /// Human-readable description of the malformation.
    pub reason: String,
}

/// A per-file failure during loading.
///
/// Surfaced to the caller; never aborts loading of other files.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoadError {
    /// The file that failed to load.
    pub path: PathBuf,
    /// Why it failed (unreadable, not UTF-8, duplicate id, oversized).
    pub reason: String,
}

// =============================================================================
// ERROR TYPES
// =============================================================================

/// Errors that can occur in the Slipbox engine.
///
/// - No silent failures
/// - Use `Result<T, SlipboxError>` for fallible operations
/// - Per-file problems are [`LoadError`] report entries, not variants here
#[derive(Debug, Error)]
pub enum SlipboxError {
    /// The vault root does not exist or is not a directory.
    #[error("Invalid vault root: {0}")]
    InvalidRoot(String),

    /// The requested note was not found in the current snapshot.
    #[error("Note not found: {0}")]
    NoteNotFound(NoteId),

    /// An I/O error occurred outside of per-file loading.
    #[error("I/O error: {0}")]
    IoError(String),

    /// A serialization error occurred.
    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// A deserialization error occurred.
    #[error("Deserialization error: {0}")]
    DeserializationError(String),

    /// A configuration file could not be parsed.
    #[error("Config error: {0}")]
    ConfigError(String),
}

impl From<std::io::Error> for SlipboxError {
    fn from(e: std::io::Error) -> Self {
        Self::IoError(e.to_string())
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn note_id_trims_whitespace() {
        assert_eq!(NoteId::new("  B "), NoteId::new("B"));
        assert_eq!(NoteId::new("B").as_str(), "B");
    }

    #[test]
    fn note_id_lexicographic_order() {
        let mut ids = vec![NoteId::new("c"), NoteId::new("a"), NoteId::new("b")];
        ids.sort();
        assert_eq!(ids, vec![NoteId::new("a"), NoteId::new("b"), NoteId::new("c")]);
    }

    #[test]
    fn dangling_link_ordering_is_stable() {
        let mut set = std::collections::BTreeSet::new();
        set.insert(DanglingLink {
            source: NoteId::new("A"),
            target: "Z".to_string(),
        });
        set.insert(DanglingLink {
            source: NoteId::new("A"),
            target: "Z".to_string(),
        });
        // Duplicate (source, target) pairs collapse
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn io_error_converts() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err = SlipboxError::from(io);
        assert!(matches!(err, SlipboxError::IoError(_)));
    }
}
