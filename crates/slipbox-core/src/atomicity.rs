//! # Atomicity Validator
//!
//! Heuristic enforcement of the "one idea per note" discipline.
//!
//! A note that grows too large, splits into many sections, or fans out into
//! many links usually holds more than one idea. Violations are reported,
//! never fatal: the validator informs, the author decides.

use crate::primitives::{
    DEFAULT_MAX_BODY_BYTES, DEFAULT_MAX_LINKS, DEFAULT_MAX_SECTIONS, DEFAULT_MAX_WORDS,
};
use crate::{Note, NoteId};
use pulldown_cmark::{Event, Parser, Tag};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

// =============================================================================
// LIMITS
// =============================================================================

/// Thresholds for the atomicity heuristics.
///
/// Deserializable so the app layer can override individual limits from its
/// config file; missing fields fall back to the compiled-in defaults.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AtomicityLimits {
    /// Maximum body size in bytes.
    pub max_body_bytes: usize,
    /// Maximum word count.
    pub max_words: usize,
    /// Maximum number of section headings.
    pub max_sections: usize,
    /// Maximum number of outbound links.
    pub max_links: usize,
}

impl Default for AtomicityLimits {
    fn default() -> Self {
        Self {
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
            max_words: DEFAULT_MAX_WORDS,
            max_sections: DEFAULT_MAX_SECTIONS,
            max_links: DEFAULT_MAX_LINKS,
        }
    }
}

// =============================================================================
// VIOLATIONS
// =============================================================================

/// A single atomicity heuristic exceeded by a note.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum AtomicityViolation {
    /// Body exceeds the byte limit.
    BodyTooLong { bytes: usize, limit: usize },
    /// Body exceeds the word-count limit.
    TooManyWords { words: usize, limit: usize },
    /// Note splits into more section headings than allowed.
    TooManySections { sections: usize, limit: usize },
    /// Note fans out into more links than allowed.
    TooManyLinks { links: usize, limit: usize },
}

impl fmt::Display for AtomicityViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BodyTooLong { bytes, limit } => {
                write!(f, "body is {bytes} bytes (limit {limit})")
            }
            Self::TooManyWords { words, limit } => {
                write!(f, "body has {words} words (limit {limit})")
            }
            Self::TooManySections { sections, limit } => {
                write!(f, "note has {sections} section headings (limit {limit})")
            }
            Self::TooManyLinks { links, limit } => {
                write!(f, "note has {links} outbound links (limit {limit})")
            }
        }
    }
}

/// Per-vault atomicity findings, keyed by note id.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AtomicityReport {
    /// Notes that violated at least one heuristic, with their violations.
    pub violations: BTreeMap<NoteId, Vec<AtomicityViolation>>,
}

impl AtomicityReport {
    /// True when no note violated any heuristic.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.violations.is_empty()
    }

    /// Number of notes flagged.
    #[must_use]
    pub fn notes_flagged(&self) -> usize {
        self.violations.len()
    }

    /// Total number of individual violations.
    #[must_use]
    pub fn violation_count(&self) -> usize {
        self.violations.values().map(Vec::len).sum()
    }
}

// =============================================================================
// VALIDATOR
// =============================================================================

/// The AtomicityValidator checks notes against the configured limits.
///
/// Expects notes whose `links` have already been filled in by the extraction
/// stage; a freshly-loaded note trivially passes the link heuristic.
#[derive(Debug, Clone, Copy, Default)]
pub struct AtomicityValidator {
    limits: AtomicityLimits,
}

impl AtomicityValidator {
    /// Create a validator with the given limits.
    #[must_use]
    pub fn new(limits: AtomicityLimits) -> Self {
        Self { limits }
    }

    /// Check a single note. An empty result means the note is atomic.
    #[must_use]
    pub fn check(&self, note: &Note) -> Vec<AtomicityViolation> {
        let mut violations = Vec::new();

        let bytes = note.body.len();
        if bytes > self.limits.max_body_bytes {
            violations.push(AtomicityViolation::BodyTooLong {
                bytes,
                limit: self.limits.max_body_bytes,
            });
        }

        let words = note.body.split_whitespace().count();
        if words > self.limits.max_words {
            violations.push(AtomicityViolation::TooManyWords {
                words,
                limit: self.limits.max_words,
            });
        }

        let sections = count_sections(&note.body);
        if sections > self.limits.max_sections {
            violations.push(AtomicityViolation::TooManySections {
                sections,
                limit: self.limits.max_sections,
            });
        }

        let links = note.links.len();
        if links > self.limits.max_links {
            violations.push(AtomicityViolation::TooManyLinks {
                links,
                limit: self.limits.max_links,
            });
        }

        violations
    }

    /// Check every note and aggregate the findings into a report.
    #[must_use]
    pub fn check_all<'a>(&self, notes: impl IntoIterator<Item = &'a Note>) -> AtomicityReport {
        let mut report = AtomicityReport::default();
        for note in notes {
            let violations = self.check(note);
            if !violations.is_empty() {
                report.violations.insert(note.id.clone(), violations);
            }
        }
        report
    }
}

/// Count markdown section headings (all levels) in a body.
fn count_sections(body: &str) -> usize {
    Parser::new(body)
        .filter(|event| matches!(event, Event::Start(Tag::Heading { .. })))
        .count()
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::RawLink;
    use std::path::PathBuf;

    fn make_note(body: &str, link_count: usize) -> Note {
        Note {
            id: NoteId::new("n"),
            title: "n".to_string(),
            body: body.to_string(),
            path: PathBuf::from("n.md"),
            tags: Vec::new(),
            links: (0..link_count)
                .map(|i| RawLink {
                    target: format!("t{i}"),
                    label: None,
                    offset: 0,
                })
                .collect(),
            created: None,
            modified: None,
        }
    }

    #[test]
    fn short_note_is_atomic() {
        let validator = AtomicityValidator::default();
        let note = make_note("# One Idea\n\nA short, focused note.", 2);
        assert!(validator.check(&note).is_empty());
    }

    #[test]
    fn oversized_body_is_flagged() {
        let limits = AtomicityLimits {
            max_body_bytes: 10,
            ..AtomicityLimits::default()
        };
        let note = make_note("a body comfortably over ten bytes", 0);
        let violations = AtomicityValidator::new(limits).check(&note);
        assert!(
            violations
                .iter()
                .any(|v| matches!(v, AtomicityViolation::BodyTooLong { .. }))
        );
    }

    #[test]
    fn wordy_note_is_flagged() {
        let limits = AtomicityLimits {
            max_words: 3,
            ..AtomicityLimits::default()
        };
        let note = make_note("one two three four five", 0);
        let violations = AtomicityValidator::new(limits).check(&note);
        assert!(
            violations
                .iter()
                .any(|v| matches!(v, AtomicityViolation::TooManyWords { words: 5, .. }))
        );
    }

    #[test]
    fn many_sections_are_flagged() {
        let limits = AtomicityLimits {
            max_sections: 2,
            ..AtomicityLimits::default()
        };
        let note = make_note("# A\n\n## B\n\n## C\n\n## D\n", 0);
        let violations = AtomicityValidator::new(limits).check(&note);
        assert!(
            violations
                .iter()
                .any(|v| matches!(v, AtomicityViolation::TooManySections { sections: 4, .. }))
        );
    }

    #[test]
    fn link_fanout_is_flagged() {
        let limits = AtomicityLimits {
            max_links: 2,
            ..AtomicityLimits::default()
        };
        let note = make_note("hub", 3);
        let violations = AtomicityValidator::new(limits).check(&note);
        assert!(
            violations
                .iter()
                .any(|v| matches!(v, AtomicityViolation::TooManyLinks { links: 3, .. }))
        );
    }

    #[test]
    fn report_aggregates_across_notes() {
        let limits = AtomicityLimits {
            max_words: 1,
            ..AtomicityLimits::default()
        };
        let validator = AtomicityValidator::new(limits);
        let clean = make_note("ok", 0);
        let mut noisy = make_note("far too many words here", 0);
        noisy.id = NoteId::new("noisy");

        let report = validator.check_all([&clean, &noisy]);
        assert_eq!(report.notes_flagged(), 1);
        assert_eq!(report.violation_count(), 1);
        assert!(report.violations.contains_key(&NoteId::new("noisy")));
        assert!(!report.is_clean());
    }
}
