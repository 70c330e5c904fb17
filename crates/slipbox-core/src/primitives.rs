//! # Innate Primitives
//!
//! Hardcoded runtime constants for the Slipbox engine.
//!
//! These are compiled into the binary and immutable at runtime. The
//! atomicity thresholds double as the defaults for
//! [`AtomicityLimits`](crate::atomicity::AtomicityLimits), which the app
//! layer may override via configuration.

/// Magic bytes for the Slipbox binary snapshot format header.
///
/// - File Header = Magic Bytes ("SLIP") + Version (u8) before payload.
pub const MAGIC_BYTES: &[u8; 4] = b"SLIP";

/// Current snapshot serialization format version.
///
/// Increment this when making breaking changes to the snapshot format.
pub const FORMAT_VERSION: u8 = 1;

/// Maximum size of a single note file, in bytes.
///
/// Files above this limit become per-file load errors rather than notes.
/// This prevents memory exhaustion from accidental large files in a vault.
pub const MAX_NOTE_BYTES: u64 = 1024 * 1024;

/// Maximum traversal depth for neighborhood queries.
///
/// - All queries must be computationally bounded.
/// - This prevents runaway traversals in large vaults.
pub const MAX_TRAVERSAL_DEPTH: usize = 100;

/// Default maximum number of hits returned from a search query.
pub const DEFAULT_SEARCH_LIMIT: usize = 20;

/// Weight multiplier applied to tokens occurring in a note title.
///
/// Title matches should outrank body matches for the same term frequency.
pub const TITLE_TOKEN_WEIGHT: u64 = 3;

/// Minimum token length admitted into the search index.
///
/// Single characters carry almost no signal and bloat the postings.
pub const MIN_TOKEN_LEN: usize = 2;

// =============================================================================
// ATOMICITY DEFAULTS ("one idea per note")
// =============================================================================

/// Default maximum body size, in bytes, before a note stops being "atomic".
pub const DEFAULT_MAX_BODY_BYTES: usize = 10 * 1024;

/// Default maximum word count for an atomic note.
pub const DEFAULT_MAX_WORDS: usize = 800;

/// Default maximum number of section headings for an atomic note.
///
/// A note splitting into many sections usually holds more than one idea.
pub const DEFAULT_MAX_SECTIONS: usize = 5;

/// Default maximum number of outbound links for an atomic note.
///
/// Hub notes are legitimate but should be flagged for review.
pub const DEFAULT_MAX_LINKS: usize = 20;
