//! # Pipeline Integration Tests
//!
//! End-to-end coverage of the rebuild pipeline over real directories:
//! loading, link extraction, graph contracts, search, and the snapshot
//! persistence format.

use slipbox_core::{
    AtomicityLimits, DanglingLink, NoteId, NoteLoader, Slipbox, rebuild, snapshot_from_bytes,
    snapshot_to_bytes,
};
use std::fs;
use std::path::Path;

fn write_note(dir: &Path, name: &str, body: &str) {
    fs::write(dir.join(name), body).expect("write note");
}

fn rebuild_default(dir: &Path) -> slipbox_core::Snapshot {
    rebuild(dir, &NoteLoader::new(), AtomicityLimits::default()).expect("rebuild")
}

// =============================================================================
// GRAPH CONTRACTS
// =============================================================================

#[test]
fn linked_pair_produces_symmetric_edges() {
    let dir = tempfile::tempdir().expect("tempdir");
    write_note(dir.path(), "A.md", "see [[B]]");
    write_note(dir.path(), "B.md", "");

    let snapshot = rebuild_default(dir.path());

    assert_eq!(
        snapshot.graph.forward_links(&NoteId::new("A")),
        [NoteId::new("B")].into_iter().collect()
    );
    assert_eq!(
        snapshot.graph.backlinks(&NoteId::new("B")),
        [NoteId::new("A")].into_iter().collect()
    );
    assert!(snapshot.graph.dangling_links().is_empty());
}

#[test]
fn unresolved_target_becomes_dangling_link() {
    let dir = tempfile::tempdir().expect("tempdir");
    write_note(dir.path(), "A.md", "see [[Z]]");

    let snapshot = rebuild_default(dir.path());

    let dangling: Vec<_> = snapshot.graph.dangling_links().iter().cloned().collect();
    assert_eq!(
        dangling,
        vec![DanglingLink {
            source: NoteId::new("A"),
            target: "Z".to_string(),
        }]
    );
}

#[test]
fn repeated_unresolved_target_recorded_once() {
    let dir = tempfile::tempdir().expect("tempdir");
    write_note(dir.path(), "A.md", "[[Z]] and again [[Z]] and [[ Z ]]");

    let snapshot = rebuild_default(dir.path());
    assert_eq!(snapshot.graph.dangling_links().len(), 1);
}

// =============================================================================
// RESILIENCE
// =============================================================================

#[test]
fn one_bad_file_never_aborts_the_corpus() {
    let dir = tempfile::tempdir().expect("tempdir");
    write_note(dir.path(), "good.md", "# Good\n\nlinks to [[other]]");
    write_note(dir.path(), "other.md", "# Other");
    fs::write(dir.path().join("binary.md"), [0xff, 0xfe, 0x00, 0x01]).expect("write");

    let snapshot = rebuild_default(dir.path());

    assert_eq!(snapshot.graph.note_count(), 2);
    assert_eq!(snapshot.load_errors.len(), 1);
    assert!(snapshot.load_errors[0].reason.contains("UTF-8"));
    // The good notes are fully indexed despite the bad file
    assert_eq!(snapshot.graph.link_count(), 1);
}

#[test]
fn malformed_link_syntax_is_a_warning_not_an_error() {
    let dir = tempfile::tempdir().expect("tempdir");
    write_note(dir.path(), "A.md", "fine [[B]] broken [[ oops");
    write_note(dir.path(), "B.md", "");

    let snapshot = rebuild_default(dir.path());

    assert_eq!(snapshot.warnings.len(), 1);
    assert_eq!(snapshot.warnings[0].note, NoteId::new("A"));
    // The well-formed link on the same line still resolves
    assert!(
        snapshot
            .graph
            .forward_links(&NoteId::new("A"))
            .contains(&NoteId::new("B"))
    );
}

#[test]
fn atomicity_violations_are_reported_not_fatal() {
    let dir = tempfile::tempdir().expect("tempdir");
    write_note(dir.path(), "rambling.md", "word ".repeat(50).as_str());
    write_note(dir.path(), "tight.md", "# One idea");

    let limits = AtomicityLimits {
        max_words: 10,
        ..AtomicityLimits::default()
    };
    let snapshot = rebuild(dir.path(), &NoteLoader::new(), limits).expect("rebuild");

    assert_eq!(snapshot.atomicity.notes_flagged(), 1);
    assert!(
        snapshot
            .atomicity
            .violations
            .contains_key(&NoteId::new("rambling"))
    );
    // Both notes are still indexed
    assert_eq!(snapshot.graph.note_count(), 2);
}

// =============================================================================
// DETERMINISM & PERSISTENCE
// =============================================================================

#[test]
fn reload_of_unchanged_directory_is_byte_identical() {
    let dir = tempfile::tempdir().expect("tempdir");
    write_note(
        dir.path(),
        "A.md",
        "---\ntags: [graph]\n---\n\n# Alpha\n\nsee [[B]] and [[gone]]",
    );
    write_note(dir.path(), "B.md", "# Beta");

    let first = snapshot_to_bytes(&rebuild_default(dir.path())).expect("serialize");
    let second = snapshot_to_bytes(&rebuild_default(dir.path())).expect("serialize");

    assert_eq!(first, second);
}

#[test]
fn snapshot_survives_export_import_roundtrip() {
    let dir = tempfile::tempdir().expect("tempdir");
    write_note(dir.path(), "A.md", "# Alpha\n\nsee [[B]]");
    write_note(dir.path(), "B.md", "# Beta\n\nback to [[A]], plus [[nowhere]]");

    let original = rebuild_default(dir.path());
    let bytes = snapshot_to_bytes(&original).expect("serialize");
    let restored = snapshot_from_bytes(&bytes).expect("deserialize");

    assert_eq!(original, restored);
    assert_eq!(
        restored.graph.backlinks(&NoteId::new("A")),
        [NoteId::new("B")].into_iter().collect()
    );
    assert_eq!(restored.graph.dangling_links().len(), 1);
}

// =============================================================================
// TAGS
// =============================================================================

#[test]
fn tags_flow_from_metadata_to_graph_queries() {
    let dir = tempfile::tempdir().expect("tempdir");
    write_note(
        dir.path(),
        "A.md",
        "---\ntags: [rust, graphs]\n---\n\n# Alpha",
    );
    write_note(dir.path(), "B.md", "---\ntags: [rust]\n---\n\n# Beta");
    write_note(dir.path(), "C.md", "# Untagged");

    let snapshot = rebuild_default(dir.path());

    let tags: Vec<_> = snapshot.graph.tags().into_iter().collect();
    assert_eq!(tags, vec!["graphs".to_string(), "rust".to_string()]);
    assert_eq!(
        snapshot.graph.notes_with_tag("rust"),
        [NoteId::new("A"), NoteId::new("B")].into_iter().collect()
    );
    assert!(snapshot.graph.notes_with_tag("gardening").is_empty());
}

// =============================================================================
// SEARCH OVER A REAL VAULT
// =============================================================================

#[test]
fn search_finds_notes_across_the_vault() {
    let dir = tempfile::tempdir().expect("tempdir");
    write_note(dir.path(), "borrow.md", "# Borrowing\n\nrust ownership rules");
    write_note(dir.path(), "garden.md", "# Gardening\n\ntomatoes and soil");

    let snapshot = rebuild_default(dir.path());

    let hits = snapshot.search.query("ownership", 10);
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].id, NoteId::new("borrow"));

    assert!(snapshot.search.query("nonexistent-term", 10).is_empty());
}

// =============================================================================
// SHARED HANDLE
// =============================================================================

#[test]
fn concurrent_readers_see_consistent_snapshots() {
    let dir = tempfile::tempdir().expect("tempdir");
    write_note(dir.path(), "A.md", "see [[B]]");
    write_note(dir.path(), "B.md", "");

    let slipbox = std::sync::Arc::new(
        Slipbox::open(dir.path(), NoteLoader::new(), AtomicityLimits::default()).expect("open"),
    );

    let mut handles = Vec::new();
    for _ in 0..4 {
        let engine = std::sync::Arc::clone(&slipbox);
        handles.push(std::thread::spawn(move || {
            for _ in 0..20 {
                let snapshot = engine.snapshot();
                // A consistent snapshot is always symmetric, whatever
                // rebuilds happen around us
                assert!(snapshot.graph.is_symmetric());
            }
        }));
    }
    for _ in 0..5 {
        slipbox.rebuild().expect("rebuild");
    }
    for handle in handles {
        handle.join().expect("reader thread");
    }
}
