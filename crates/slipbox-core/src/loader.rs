//! # Note Loader
//!
//! Reads a vault directory tree into immutable [`Note`] records.
//!
//! - Per-file failures become [`LoadError`] report entries
//! - No note is silently skipped; no file error aborts the rest of the corpus
//! - Output order is deterministic (sorted by note id)

use crate::primitives::MAX_NOTE_BYTES;
use crate::{LoadError, Note, NoteId, SlipboxError};
use pulldown_cmark::{
    Event, HeadingLevel, MetadataBlockKind, Options, Parser, Tag, TagEnd, TextMergeStream,
};
use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::{debug, warn};

/// Identifier prefix for the tags line inside a metadata block.
const TAG_IDENTIFIER: &str = "tags:";

/// The result of loading one vault directory.
///
/// Notes and errors together account for every candidate file seen.
#[derive(Debug, Clone, Default)]
pub struct LoadReport {
    /// Successfully loaded notes, sorted by id.
    pub notes: Vec<Note>,
    /// Per-file failures, in scan order.
    pub errors: Vec<LoadError>,
}

/// The NoteLoader reads note files from a directory tree.
///
/// Side effects are limited to file reads. Construction is cheap; the loader
/// carries only its configuration.
#[derive(Debug, Clone)]
pub struct NoteLoader {
    /// File extensions treated as notes (without the dot).
    extensions: Vec<String>,
    /// Per-file size limit in bytes.
    max_note_bytes: u64,
}

impl Default for NoteLoader {
    fn default() -> Self {
        Self {
            extensions: vec!["md".to_string()],
            max_note_bytes: MAX_NOTE_BYTES,
        }
    }
}

impl NoteLoader {
    /// Create a loader with default settings (`.md` files only).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the set of recognized note extensions.
    ///
    /// Empty input keeps the default `md`.
    #[must_use]
    pub fn with_extensions(mut self, extensions: Vec<String>) -> Self {
        if !extensions.is_empty() {
            self.extensions = extensions;
        }
        self
    }

    /// Load all notes under `root`.
    ///
    /// Returns a [`LoadReport`]; only an invalid root is a hard error.
    pub fn load_dir(&self, root: &Path) -> Result<LoadReport, SlipboxError> {
        if !root.is_dir() {
            return Err(SlipboxError::InvalidRoot(root.display().to_string()));
        }

        let mut report = LoadReport::default();
        let mut candidates = Vec::new();
        let mut visited = BTreeSet::new();
        self.collect_files(root, &mut candidates, &mut visited, &mut report.errors);

        // Deterministic scan order regardless of directory iteration order
        candidates.sort();

        let mut seen: BTreeMap<NoteId, PathBuf> = BTreeMap::new();
        for path in candidates {
            match self.load_note(&path) {
                Ok(note) => {
                    if let Some(first) = seen.get(&note.id) {
                        report.errors.push(LoadError {
                            path: path.clone(),
                            reason: format!(
                                "duplicate note id '{}' (first seen at {})",
                                note.id,
                                first.display()
                            ),
                        });
                        continue;
                    }
                    debug!(id = %note.id, path = %path.display(), "loaded note");
                    seen.insert(note.id.clone(), path);
                    report.notes.push(note);
                }
                Err(reason) => {
                    warn!(path = %path.display(), %reason, "failed to load note");
                    report.errors.push(LoadError { path, reason });
                }
            }
        }

        report.notes.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(report)
    }

    /// Recursively collect candidate note files.
    ///
    /// Unreadable directories are recorded as load errors, not fatal.
    /// Directories are deduplicated by canonical path so a symlink cycle
    /// inside the vault terminates with a load error instead of recursing
    /// forever.
    fn collect_files(
        &self,
        dir: &Path,
        out: &mut Vec<PathBuf>,
        visited: &mut BTreeSet<PathBuf>,
        errors: &mut Vec<LoadError>,
    ) {
        match dir.canonicalize() {
            Ok(canonical) => {
                if !visited.insert(canonical) {
                    errors.push(LoadError {
                        path: dir.to_path_buf(),
                        reason: "directory cycle via symlink".to_string(),
                    });
                    return;
                }
            }
            Err(e) => {
                errors.push(LoadError {
                    path: dir.to_path_buf(),
                    reason: format!("unreadable directory: {e}"),
                });
                return;
            }
        }

        let entries = match std::fs::read_dir(dir) {
            Ok(e) => e,
            Err(e) => {
                errors.push(LoadError {
                    path: dir.to_path_buf(),
                    reason: format!("unreadable directory: {e}"),
                });
                return;
            }
        };

        for entry in entries {
            let path = match entry {
                Ok(e) => e.path(),
                Err(e) => {
                    errors.push(LoadError {
                        path: dir.to_path_buf(),
                        reason: format!("unreadable directory entry: {e}"),
                    });
                    continue;
                }
            };

            // Hidden entries (.git, .obsidian, editor droppings) are not notes
            if is_hidden(&path) {
                continue;
            }

            if path.is_dir() {
                self.collect_files(&path, out, visited, errors);
            } else if self.is_note_file(&path) {
                out.push(path);
            }
        }
    }

    /// Check whether a path carries one of the configured note extensions.
    fn is_note_file(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|e| e.to_str())
            .is_some_and(|ext| self.extensions.iter().any(|known| known == ext))
    }

    /// Load a single note file.
    ///
    /// Errors are reported as strings so the caller can fold them into the
    /// report without aborting the scan.
    fn load_note(&self, path: &Path) -> Result<Note, String> {
        let stem = path
            .file_stem()
            .and_then(|s| s.to_str())
            .ok_or_else(|| "file name is not valid UTF-8".to_string())?;
        let id = NoteId::new(stem);
        if id.as_str().is_empty() {
            return Err("empty note id".to_string());
        }

        let metadata = std::fs::metadata(path).map_err(|e| format!("unreadable file: {e}"))?;
        if metadata.len() > self.max_note_bytes {
            return Err(format!(
                "note size {} bytes exceeds maximum allowed {} bytes",
                metadata.len(),
                self.max_note_bytes
            ));
        }

        let raw = std::fs::read(path).map_err(|e| format!("unreadable file: {e}"))?;
        let body = String::from_utf8(raw).map_err(|_| "file is not valid UTF-8".to_string())?;

        let title = parse_title(&body).unwrap_or_else(|| id.as_str().to_string());
        let tags = parse_tags(&body);

        Ok(Note {
            id,
            title,
            body,
            path: path.to_path_buf(),
            tags,
            // Filled by the rebuild pipeline after link extraction
            links: Vec::new(),
            created: metadata.created().ok().and_then(epoch_secs),
            modified: metadata.modified().ok().and_then(epoch_secs),
        })
    }
}

/// Check whether a path's final component starts with a dot.
fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|n| n.starts_with('.'))
}

/// Convert a system time into whole seconds since the epoch.
fn epoch_secs(t: SystemTime) -> Option<u64> {
    t.duration_since(UNIX_EPOCH).ok().map(|d| d.as_secs())
}

/// Markdown parser options with metadata blocks enabled.
fn parser_options() -> Options {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_YAML_STYLE_METADATA_BLOCKS);
    options.insert(Options::ENABLE_PLUSES_DELIMITED_METADATA_BLOCKS);
    options
}

/// Extract the note title: the text of the first `#` heading.
fn parse_title(body: &str) -> Option<String> {
    let events = TextMergeStream::new(Parser::new_ext(body, parser_options()));
    let mut in_title = false;
    let mut title = String::new();

    for event in events {
        match event {
            Event::Start(Tag::Heading {
                level: HeadingLevel::H1,
                ..
            }) => in_title = true,
            Event::Text(text) if in_title => title.push_str(&text),
            Event::End(TagEnd::Heading(HeadingLevel::H1)) if in_title => {
                let trimmed = title.trim();
                if trimmed.is_empty() {
                    return None;
                }
                return Some(trimmed.to_string());
            }
            _ => {}
        }
    }
    None
}

/// Parse tags out of a YAML or pluses-delimited metadata block.
///
/// Notes without a metadata block (or without a `tags:` line) simply have no
/// tags; that is not an error.
fn parse_tags(body: &str) -> Vec<String> {
    let events = TextMergeStream::new(Parser::new_ext(body, parser_options()));
    let mut in_metadata = false;

    for event in events {
        match event {
            Event::Start(Tag::MetadataBlock(
                MetadataBlockKind::YamlStyle | MetadataBlockKind::PlusesStyle,
            )) => in_metadata = true,
            Event::Text(text) if in_metadata => return parse_tag_text(&text),
            Event::End(TagEnd::MetadataBlock(_)) => break,
            _ => {}
        }
    }
    Vec::new()
}

/// Extract individual tags from the metadata block text.
fn parse_tag_text(tag_text: &str) -> Vec<String> {
    tag_text
        .split('\n')
        .map(str::trim)
        .filter(|line| line.starts_with(TAG_IDENTIFIER))
        .flat_map(|line| {
            line[TAG_IDENTIFIER.len()..]
                .split_whitespace()
                .map(|s| s.trim_matches(|c| matches!(c, '[' | ']' | ',' | '"')))
                .filter(|s| !s.is_empty())
                .map(String::from)
                .collect::<Vec<_>>()
        })
        .collect()
}

// =============================================================================
// TESTS
// =============================================================================
