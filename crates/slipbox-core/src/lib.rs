//! # slipbox-core
//!
//! The deterministic note-indexing and cross-reference engine - THE LOGIC.
//!
//! This crate loads a directory tree of markdown notes, extracts wiki-style
//! inter-note links, checks the "one idea per note" discipline, maintains the
//! bidirectional link graph (forward links, backlinks, dangling links), and
//! answers ranked lexical search queries.
//!
//! ## Rebuild Model
//!
//! Loading, extraction, validation, and indexing run as a sequential
//! pipeline producing an immutable [`Snapshot`]. Rebuilds of the same vault
//! are serialized; read queries against a published snapshot are lock-free.
//!
//! ## Architectural Constraints
//!
//! - Pure Rust: no async, no network dependencies
//! - Deterministic: `BTreeMap`/`BTreeSet` only, no floats, no randomness
//! - Resilient: per-note problems become report entries, never corpus aborts
//! - Front-ends (language server, desktop shell, assistants) consume the
//!   read-only query APIs; none of them live in this crate

// =============================================================================
// MODULES
// =============================================================================

pub mod atomicity;
pub mod extract;
pub mod formats;
pub mod graph;
pub mod loader;
pub mod primitives;
pub mod search;
pub mod snapshot;
pub mod types;

// =============================================================================
// RE-EXPORTS: Core Types (from types module)
// =============================================================================

pub use types::{
    DanglingLink, Link, LoadError, Note, NoteId, ParseWarning, RawLink, SlipboxError,
};

// =============================================================================
// RE-EXPORTS: Engine
// =============================================================================

pub use atomicity::{AtomicityLimits, AtomicityReport, AtomicityValidator, AtomicityViolation};
pub use extract::{LinkIter, extract_links, scan_links};
pub use graph::NoteGraph;
pub use loader::{LoadReport, NoteLoader};
pub use search::{SearchHit, SearchIndex, SimilarityProvider};
pub use snapshot::{Slipbox, Snapshot, rebuild};

// =============================================================================
// RE-EXPORTS: Formats (from formats module)
// =============================================================================

pub use formats::{PersistenceHeader, snapshot_from_bytes, snapshot_to_bytes};
