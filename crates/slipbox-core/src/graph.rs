//! # Graph Index
//!
//! The bidirectional link graph over a loaded note set.
//!
//! All data structures use `BTreeMap`/`BTreeSet` for deterministic ordering.
//! The graph owns the notes for one rebuild cycle; it is never mutated after
//! construction, only replaced wholesale by the next rebuild.
//!
//! Invariants:
//! - `backlinks(t)` contains `s` iff `forward_links(s)` contains `t`
//! - every recorded edge's endpoints exist in the note set
//! - unresolvable targets are recorded as dangling links, never dropped

use crate::primitives::MAX_TRAVERSAL_DEPTH;
use crate::{DanglingLink, Link, Note, NoteId};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, VecDeque};

/// The bidirectional note graph.
///
/// Built once per rebuild from the loaded notes and their extracted links.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoteGraph {
    /// Note storage: id -> Note (immutable snapshot for this cycle).
    notes: BTreeMap<NoteId, Note>,

    /// Forward adjacency: source -> set of resolved targets.
    forward: BTreeMap<NoteId, BTreeSet<NoteId>>,

    /// Backward adjacency: target -> set of sources (inverted forward graph).
    backward: BTreeMap<NoteId, BTreeSet<NoteId>>,

    /// Links whose target is absent from the note set.
    dangling: BTreeSet<DanglingLink>,
}

impl NoteGraph {
    /// Create an empty graph.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the graph from notes whose links have been extracted.
    ///
    /// Forward and backward adjacency are derived together, so the symmetry
    /// invariant holds by construction. Duplicate links between the same
    /// pair of notes collapse into one edge.
    #[must_use]
    pub fn build(notes: Vec<Note>) -> Self {
        let notes: BTreeMap<NoteId, Note> =
            notes.into_iter().map(|n| (n.id.clone(), n)).collect();

        let mut forward: BTreeMap<NoteId, BTreeSet<NoteId>> = BTreeMap::new();
        let mut backward: BTreeMap<NoteId, BTreeSet<NoteId>> = BTreeMap::new();
        let mut dangling = BTreeSet::new();

        for note in notes.values() {
            for raw in &note.links {
                let target = NoteId::new(&raw.target);
                if notes.contains_key(&target) {
                    forward
                        .entry(note.id.clone())
                        .or_default()
                        .insert(target.clone());
                    backward.entry(target).or_default().insert(note.id.clone());
                } else {
                    dangling.insert(DanglingLink {
                        source: note.id.clone(),
                        target: target.0,
                    });
                }
            }
        }

        Self {
            notes,
            forward,
            backward,
            dangling,
        }
    }

    // =========================================================================
    // QUERIES
    // =========================================================================

    /// Resolved outbound links of a note. Empty for unknown ids.
    #[must_use]
    pub fn forward_links(&self, id: &NoteId) -> BTreeSet<NoteId> {
        self.forward.get(id).cloned().unwrap_or_default()
    }

    /// Inbound references discovered by inverting the forward-link graph.
    /// Empty for unknown ids.
    #[must_use]
    pub fn backlinks(&self, id: &NoteId) -> BTreeSet<NoteId> {
        self.backward.get(id).cloned().unwrap_or_default()
    }

    /// Links whose target is not present in the current note set.
    #[must_use]
    pub fn dangling_links(&self) -> &BTreeSet<DanglingLink> {
        &self.dangling
    }

    /// Lookup a note by id.
    #[must_use]
    pub fn get(&self, id: &NoteId) -> Option<&Note> {
        self.notes.get(id)
    }

    /// Check if a note exists in the graph.
    #[must_use]
    pub fn contains(&self, id: &NoteId) -> bool {
        self.notes.contains_key(id)
    }

    /// All notes in deterministic (lexicographic) order.
    pub fn notes(&self) -> impl Iterator<Item = &Note> {
        self.notes.values()
    }

    /// All note ids in deterministic order.
    pub fn note_ids(&self) -> impl Iterator<Item = &NoteId> {
        self.notes.keys()
    }

    /// All resolved edges in deterministic order.
    pub fn edges(&self) -> impl Iterator<Item = (&NoteId, &NoteId)> {
        self.forward
            .iter()
            .flat_map(|(from, targets)| targets.iter().map(move |to| (from, to)))
    }

    /// Resolved outbound links of a note with their labels preserved.
    ///
    /// Unlike [`forward_links`](Self::forward_links), this keeps one entry
    /// per link occurrence, in body order.
    #[must_use]
    pub fn resolved_links(&self, id: &NoteId) -> Vec<Link> {
        let Some(note) = self.notes.get(id) else {
            return Vec::new();
        };
        note.links
            .iter()
            .filter_map(|raw| {
                let target = NoteId::new(&raw.target);
                self.notes.contains_key(&target).then(|| Link {
                    source: note.id.clone(),
                    target,
                    label: raw.label.clone(),
                })
            })
            .collect()
    }

    /// All tags present in the vault, deduplicated across notes.
    #[must_use]
    pub fn tags(&self) -> BTreeSet<String> {
        self.notes
            .values()
            .flat_map(|note| note.tags.iter().cloned())
            .collect()
    }

    /// Ids of the notes carrying a given tag, in deterministic order.
    /// Empty for unknown tags.
    #[must_use]
    pub fn notes_with_tag(&self, tag: &str) -> BTreeSet<NoteId> {
        self.notes
            .values()
            .filter(|note| note.tags.iter().any(|t| t == tag))
            .map(|note| note.id.clone())
            .collect()
    }

    /// Total number of notes.
    #[must_use]
    pub fn note_count(&self) -> usize {
        self.notes.len()
    }

    /// Total number of resolved edges.
    #[must_use]
    pub fn link_count(&self) -> usize {
        self.forward.values().map(BTreeSet::len).sum()
    }

    // =========================================================================
    // TRAVERSAL
    // =========================================================================

    /// Breadth-first neighborhood of a note over the undirected closure of
    /// the link graph, up to `depth` hops.
    ///
    /// Returns notes in visit order (BFS layers, lexicographic within a
    /// layer), starting with `start` itself. `None` if the note is unknown.
    /// Depth is capped at [`MAX_TRAVERSAL_DEPTH`].
    #[must_use]
    pub fn neighborhood(&self, start: &NoteId, depth: usize) -> Option<Vec<NoteId>> {
        if !self.notes.contains_key(start) {
            return None;
        }
        let depth = depth.min(MAX_TRAVERSAL_DEPTH);

        let mut visited = BTreeSet::new();
        let mut queue = VecDeque::new();
        let mut order = Vec::new();

        visited.insert(start.clone());
        queue.push_back((start.clone(), 0usize));

        while let Some((current, current_depth)) = queue.pop_front() {
            order.push(current.clone());

            if current_depth >= depth {
                continue;
            }

            let mut layer: BTreeSet<NoteId> = self.forward_links(&current);
            layer.append(&mut self.backlinks(&current));

            for neighbor in layer {
                if visited.insert(neighbor.clone()) {
                    queue.push_back((neighbor, current_depth.saturating_add(1)));
                }
            }
        }

        Some(order)
    }

    // =========================================================================
    // INVARIANT CHECKING
    // =========================================================================

    /// Verify the symmetry invariant: `backlinks(t)` contains `s` iff
    /// `forward_links(s)` contains `t`, and all endpoints exist.
    #[must_use]
    pub fn is_symmetric(&self) -> bool {
        for (source, targets) in &self.forward {
            for target in targets {
                if !self.notes.contains_key(source) || !self.notes.contains_key(target) {
                    return false;
                }
                if !self
                    .backward
                    .get(target)
                    .is_some_and(|sources| sources.contains(source))
                {
                    return false;
                }
            }
        }
        for (target, sources) in &self.backward {
            for source in sources {
                if !self
                    .forward
                    .get(source)
                    .is_some_and(|targets| targets.contains(target))
                {
                    return false;
                }
            }
        }
        true
    }
}

// =============================================================================
// TESTS
// =============================================================================
