//! # Search Index
//!
//! Lexical retrieval over note content.
//!
//! - Inverted index over lowercased alphanumeric tokens
//! - Integer tf-idf scoring only (no floats, no randomness)
//! - Deterministic ranking: score descending, then lexicographic note id
//!
//! The vector-embedding backend from the roadmap is abstracted behind the
//! [`SimilarityProvider`] trait; this module is the lexical implementation.

use crate::graph::NoteGraph;
use crate::primitives::{MIN_TOKEN_LEN, TITLE_TOKEN_WEIGHT};
use crate::NoteId;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

// =============================================================================
// SIMILARITY PROVIDER TRAIT
// =============================================================================

/// Capability seam for retrieval backends.
///
/// # Extension Point
///
/// This trait is the boundary a future vector-embedding backend plugs into.
/// [`SearchIndex`] is the only in-crate implementation; implementors must be
/// deterministic for identical inputs.
pub trait SimilarityProvider: Send + Sync {
    /// Return up to `limit` note ids ranked by relevance to `query`.
    fn similar(&self, query: &str, limit: usize) -> Vec<SearchHit>;
}

// =============================================================================
// SEARCH HIT
// =============================================================================

/// A single ranked search result.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SearchHit {
    /// The matching note.
    pub id: NoteId,
    /// Integer relevance score; higher is more relevant.
    pub score: u64,
}

// =============================================================================
// SEARCH INDEX
// =============================================================================

/// Inverted lexical index over a note graph.
///
/// Built once per rebuild; immutable afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchIndex {
    /// term -> (note id -> weighted term frequency)
    postings: BTreeMap<String, BTreeMap<NoteId, u64>>,
    /// Number of indexed notes.
    doc_count: u64,
}

impl SearchIndex {
    /// Build the index over every note in the graph.
    ///
    /// Title tokens are weighted by [`TITLE_TOKEN_WEIGHT`] so title matches
    /// outrank body matches at equal frequency.
    #[must_use]
    pub fn build(graph: &NoteGraph) -> Self {
        let mut postings: BTreeMap<String, BTreeMap<NoteId, u64>> = BTreeMap::new();

        for note in graph.notes() {
            for token in tokenize(&note.title) {
                let entry = postings
                    .entry(token)
                    .or_default()
                    .entry(note.id.clone())
                    .or_insert(0);
                *entry = entry.saturating_add(TITLE_TOKEN_WEIGHT);
            }
            for token in tokenize(&note.body) {
                let entry = postings
                    .entry(token)
                    .or_default()
                    .entry(note.id.clone())
                    .or_insert(0);
                *entry = entry.saturating_add(1);
            }
        }

        Self {
            postings,
            doc_count: graph.note_count() as u64,
        }
    }

    /// Rank notes by relevance to a query.
    ///
    /// Scoring is a scaled-integer tf-idf: each query term contributes
    /// `tf * (ilog2(N / df) + 1)`. Ties break lexicographically by note id,
    /// so identical corpus and query always produce identical rankings.
    /// Blank queries and a zero limit return nothing.
    #[must_use]
    pub fn query(&self, text: &str, limit: usize) -> Vec<SearchHit> {
        if limit == 0 || self.doc_count == 0 {
            return Vec::new();
        }

        let terms: BTreeSet<String> = tokenize(text).collect();
        if terms.is_empty() {
            return Vec::new();
        }

        let mut scores: BTreeMap<NoteId, u64> = BTreeMap::new();
        for term in &terms {
            let Some(posting) = self.postings.get(term) else {
                continue;
            };
            let df = posting.len() as u64;
            // df >= 1 whenever the term has a posting, so the division and
            // ilog2 are both well-defined
            let idf = u64::from((self.doc_count / df).ilog2()) + 1;
            for (id, tf) in posting {
                let entry = scores.entry(id.clone()).or_insert(0);
                *entry = entry.saturating_add(tf.saturating_mul(idf));
            }
        }

        let mut ranked: Vec<SearchHit> = scores
            .into_iter()
            .map(|(id, score)| SearchHit { id, score })
            .collect();
        ranked.sort_by(|a, b| b.score.cmp(&a.score).then_with(|| a.id.cmp(&b.id)));
        ranked.truncate(limit);
        ranked
    }

    /// Number of distinct terms in the index.
    #[must_use]
    pub fn term_count(&self) -> usize {
        self.postings.len()
    }

    /// Number of indexed notes.
    #[must_use]
    pub fn doc_count(&self) -> u64 {
        self.doc_count
    }
}

impl SimilarityProvider for SearchIndex {
    fn similar(&self, query: &str, limit: usize) -> Vec<SearchHit> {
        self.query(query, limit)
    }
}

// =============================================================================
// TOKENIZER
// =============================================================================

/// Split text into lowercased alphanumeric tokens.
///
/// Tokens shorter than [`MIN_TOKEN_LEN`] are discarded.
fn tokenize(text: &str) -> impl Iterator<Item = String> + '_ {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|t| t.chars().count() >= MIN_TOKEN_LEN)
        .map(str::to_lowercase)
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Note, RawLink};
    use std::path::PathBuf;

    fn make_note(id: &str, title: &str, body: &str) -> Note {
        Note {
            id: NoteId::new(id),
            title: title.to_string(),
            body: body.to_string(),
            path: PathBuf::from(format!("{id}.md")),
            tags: Vec::new(),
            links: Vec::<RawLink>::new(),
            created: None,
            modified: None,
        }
    }

    fn index(notes: Vec<Note>) -> SearchIndex {
        SearchIndex::build(&NoteGraph::build(notes))
    }

    #[test]
    fn blank_query_returns_nothing() {
        let idx = index(vec![make_note("a", "Title", "body")]);
        assert!(idx.query("", 10).is_empty());
        assert!(idx.query("   ", 10).is_empty());
    }

    #[test]
    fn zero_limit_returns_nothing() {
        let idx = index(vec![make_note("a", "Title", "body")]);
        assert!(idx.query("title", 0).is_empty());
    }

    #[test]
    fn matching_note_is_found() {
        let idx = index(vec![
            make_note("a", "Graphs", "all about graphs"),
            make_note("b", "Cooking", "pasta recipes"),
        ]);

        let hits = idx.query("graphs", 10);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id, NoteId::new("a"));
    }

    #[test]
    fn title_match_outranks_body_match() {
        let idx = index(vec![
            make_note("body-hit", "Other", "kernel kernel"),
            make_note("title-hit", "Kernel", "unrelated prose"),
        ]);

        let hits = idx.query("kernel", 10);
        assert_eq!(hits[0].id, NoteId::new("title-hit"));
    }

    #[test]
    fn ties_break_lexicographically_by_id() {
        let idx = index(vec![
            make_note("zeta", "same words", ""),
            make_note("alpha", "same words", ""),
        ]);

        let hits = idx.query("same words", 10);
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].score, hits[1].score);
        assert_eq!(hits[0].id, NoteId::new("alpha"));
        assert_eq!(hits[1].id, NoteId::new("zeta"));
    }

    #[test]
    fn ranking_is_deterministic() {
        let notes = vec![
            make_note("a", "Rust notes", "ownership and borrowing"),
            make_note("b", "Borrowing", "rust rust rust"),
            make_note("c", "Gardening", "tomatoes"),
        ];
        let idx1 = index(notes.clone());
        let idx2 = index(notes);

        assert_eq!(idx1.query("rust borrowing", 10), idx2.query("rust borrowing", 10));
    }

    #[test]
    fn limit_truncates_results() {
        let idx = index(vec![
            make_note("a", "word", ""),
            make_note("b", "word", ""),
            make_note("c", "word", ""),
        ]);

        assert_eq!(idx.query("word", 2).len(), 2);
    }

    #[test]
    fn tokenizer_drops_short_tokens_and_lowercases() {
        let tokens: Vec<_> = tokenize("A Big-Deal, ok?").collect();
        assert_eq!(tokens, vec!["big", "deal", "ok"]);
    }

    #[test]
    fn similarity_provider_delegates_to_lexical_query() {
        let idx = index(vec![make_note("a", "Graphs", "")]);
        let provider: &dyn SimilarityProvider = &idx;
        assert_eq!(provider.similar("graphs", 5), idx.query("graphs", 5));
    }
}
