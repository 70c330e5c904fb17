//! # Link Extractor
//!
//! Parses note bodies for wiki-style inter-note references.
//!
//! - `[[target]]` and `[[target|label]]` produce [`RawLink`]s
//! - Malformed syntax produces [`ParseWarning`]s, never a fatal error
//! - Extraction is lazy, finite, and restartable

use crate::{NoteId, ParseWarning, RawLink};
use regex::{CaptureMatches, Regex};
use std::ops::Range;
use std::sync::OnceLock;

/// Wiki-link pattern: `[[target]]` or `[[target|label]]`.
///
/// Targets cannot contain brackets or pipes; labels cannot contain brackets.
const LINK_PATTERN: &str = r"\[\[([^\[\]|]+?)(?:\|([^\[\]]*))?\]\]";

static LINK_RE: OnceLock<Regex> = OnceLock::new();

fn link_re() -> &'static Regex {
    // Pattern is a compile-time literal; construction cannot fail at runtime.
    #[allow(clippy::expect_used)]
    LINK_RE.get_or_init(|| Regex::new(LINK_PATTERN).expect("valid wiki-link pattern"))
}

// =============================================================================
// LAZY ITERATION
// =============================================================================

/// A lazy, finite iterator over the wiki links in a note body.
///
/// Restartable by calling [`extract_links`] again on the same body.
pub struct LinkIter<'a> {
    inner: CaptureMatches<'static, 'a>,
}

impl Iterator for LinkIter<'_> {
    type Item = RawLink;

    fn next(&mut self) -> Option<Self::Item> {
        let caps = self.inner.next()?;
        let whole = caps.get(0)?;
        let target = caps.get(1)?.as_str().to_string();
        let label = caps
            .get(2)
            .map(|m| m.as_str().trim().to_string())
            .filter(|l| !l.is_empty());

        Some(RawLink {
            target,
            label,
            offset: whole.start(),
        })
    }
}

/// Produce a lazy sequence of link occurrences in `body`.
pub fn extract_links(body: &str) -> LinkIter<'_> {
    LinkIter {
        inner: link_re().captures_iter(body),
    }
}

// =============================================================================
// FULL SCAN (links + warnings)
// =============================================================================

/// Extract all links from a note body, collecting warnings for malformed
/// wiki-link syntax along the way.
///
/// A `[[` opener that is not part of a well-formed link yields a
/// [`ParseWarning`] rather than failing the note.
#[must_use]
pub fn scan_links(note: &NoteId, body: &str) -> (Vec<RawLink>, Vec<ParseWarning>) {
    let mut links = Vec::new();
    let mut spans: Vec<Range<usize>> = Vec::new();

    for caps in link_re().captures_iter(body) {
        if let (Some(whole), Some(target)) = (caps.get(0), caps.get(1)) {
            spans.push(whole.range());
            links.push(RawLink {
                target: target.as_str().to_string(),
                label: caps
                    .get(2)
                    .map(|m| m.as_str().trim().to_string())
                    .filter(|l| !l.is_empty()),
                offset: whole.start(),
            });
        }
    }

    let mut warnings = Vec::new();
    for (offset, _) in body.match_indices("[[") {
        if spans.iter().any(|span| span.contains(&offset)) {
            continue;
        }
        let reason = if body[offset..].starts_with("[[]]") {
            "empty link target".to_string()
        } else {
            "unterminated or malformed wiki link".to_string()
        };
        warnings.push(ParseWarning {
            note: note.clone(),
            offset,
            reason,
        });
    }

    (links, warnings)
}

// =============================================================================
// TESTS
// =============================================================================
