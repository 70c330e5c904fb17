//! # Rebuild Pipeline
//!
//! The sequential rebuild pipeline and its concurrency model.
//!
//! Loading, extraction, validation, graph construction, and search indexing
//! run as a sequential pipeline; each stage consumes the immutable output of
//! the prior stage. A finished [`Snapshot`] is published atomically:
//! consumers never observe a partially-rebuilt index.
//!
//! Concurrency:
//! - Rebuilds of the same vault are serialized (at most one in flight)
//! - Readers hold an `Arc<Snapshot>` and are lock-free against it

use crate::atomicity::{AtomicityLimits, AtomicityReport, AtomicityValidator};
use crate::extract::scan_links;
use crate::graph::NoteGraph;
use crate::loader::NoteLoader;
use crate::search::SearchIndex;
use crate::{LoadError, ParseWarning, SlipboxError};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError, RwLock};
use tracing::info;

// =============================================================================
// SNAPSHOT
// =============================================================================

/// The immutable product of one rebuild cycle.
///
/// Everything a consumer can query lives here; nothing in a snapshot changes
/// after construction.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    /// The bidirectional link graph, owning the notes.
    pub graph: NoteGraph,
    /// The lexical search index over the same notes.
    pub search: SearchIndex,
    /// Malformed-link warnings collected during extraction.
    pub warnings: Vec<ParseWarning>,
    /// Per-file failures collected during loading.
    pub load_errors: Vec<LoadError>,
    /// Atomicity findings for the loaded notes.
    pub atomicity: AtomicityReport,
}

/// Run the full rebuild pipeline for one vault directory.
///
/// Only an invalid root is a hard error; per-note problems land in the
/// snapshot's reports.
pub fn rebuild(
    root: &Path,
    loader: &NoteLoader,
    limits: AtomicityLimits,
) -> Result<Snapshot, SlipboxError> {
    // Stage 1: load
    let report = loader.load_dir(root)?;
    let mut notes = report.notes;
    let load_errors = report.errors;

    // Stage 2: extract links
    let mut warnings = Vec::new();
    for note in &mut notes {
        let (links, mut note_warnings) = scan_links(&note.id, &note.body);
        note.links = links;
        warnings.append(&mut note_warnings);
    }

    // Stage 3: validate atomicity
    let atomicity = AtomicityValidator::new(limits).check_all(notes.iter());

    // Stage 4: graph index
    let graph = NoteGraph::build(notes);

    // Stage 5: search index
    let search = SearchIndex::build(&graph);

    info!(
        notes = graph.note_count(),
        links = graph.link_count(),
        dangling = graph.dangling_links().len(),
        warnings = warnings.len(),
        load_errors = load_errors.len(),
        "rebuild complete"
    );

    Ok(Snapshot {
        graph,
        search,
        warnings,
        load_errors,
        atomicity,
    })
}

// =============================================================================
// SHARED HANDLE
// =============================================================================

/// The shared engine handle over one vault directory.
///
/// `Slipbox` is `Send + Sync`: queries run against the current snapshot
/// concurrently, while rebuilds serialize on an internal lock and publish
/// their result with a single atomic swap.
#[derive(Debug)]
pub struct Slipbox {
    root: PathBuf,
    loader: NoteLoader,
    limits: AtomicityLimits,
    /// The currently published snapshot. Readers clone the Arc out and are
    /// then independent of any subsequent rebuild.
    current: RwLock<Arc<Snapshot>>,
    /// Serializes rebuilds: at most one in flight per vault.
    rebuild_lock: Mutex<()>,
}

impl Slipbox {
    /// Open a vault: performs the initial rebuild and publishes it.
    pub fn open(
        root: impl Into<PathBuf>,
        loader: NoteLoader,
        limits: AtomicityLimits,
    ) -> Result<Self, SlipboxError> {
        let root = root.into();
        let snapshot = rebuild(&root, &loader, limits)?;
        Ok(Self {
            root,
            loader,
            limits,
            current: RwLock::new(Arc::new(snapshot)),
            rebuild_lock: Mutex::new(()),
        })
    }

    /// The vault root this engine indexes.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Get the currently published snapshot.
    ///
    /// The returned `Arc` stays valid and consistent regardless of later
    /// rebuilds.
    #[must_use]
    pub fn snapshot(&self) -> Arc<Snapshot> {
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Rebuild from the vault directory and publish the result.
    ///
    /// Concurrent callers are serialized; each one runs a full rebuild in
    /// turn. The swap is atomic: readers see either the previous snapshot or
    /// the finished new one, never an intermediate state.
    pub fn rebuild(&self) -> Result<Arc<Snapshot>, SlipboxError> {
        let _in_flight = self.rebuild_lock.lock().unwrap_or_else(PoisonError::into_inner);

        let snapshot = Arc::new(rebuild(&self.root, &self.loader, self.limits)?);

        let mut current = self.current.write().unwrap_or_else(PoisonError::into_inner);
        *current = Arc::clone(&snapshot);
        Ok(snapshot)
    }
}

// =============================================================================
// TESTS
// =============================================================================
