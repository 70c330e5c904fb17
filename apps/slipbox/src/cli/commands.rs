//! # CLI Command Implementations
//!
//! This module contains the actual implementations of CLI commands.

use crate::config::SlipboxConfig;
use slipbox_core::{
    NoteId, NoteLoader, SlipboxError, Snapshot, rebuild, snapshot_from_bytes, snapshot_to_bytes,
};
use std::path::{Path, PathBuf};
use tracing::info;

// =============================================================================
// FILE SIZE LIMITS
// =============================================================================

/// Maximum file size for snapshot import (500 MB).
///
/// This prevents memory exhaustion from malicious or accidental large files.
const MAX_IMPORT_FILE_SIZE: u64 = 500 * 1024 * 1024;

/// Validate file size before reading.
fn validate_file_size(path: &Path, max_size: u64) -> Result<(), SlipboxError> {
    let metadata = std::fs::metadata(path)
        .map_err(|e| SlipboxError::IoError(format!("Cannot read file metadata: {}", e)))?;

    if metadata.len() > max_size {
        return Err(SlipboxError::DeserializationError(format!(
            "File size {} bytes exceeds maximum allowed {} bytes",
            metadata.len(),
            max_size
        )));
    }
    Ok(())
}

/// Validate an input file path.
///
/// Canonicalizes the path (resolving symlinks and "..") and ensures it is an
/// existing regular file, so a path like "../../../etc/passwd" cannot slip
/// through relative to an unexpected working directory.
fn validate_file_path(path: &Path) -> Result<PathBuf, SlipboxError> {
    let canonical = path.canonicalize().map_err(|e| {
        SlipboxError::IoError(format!("Invalid file path '{}': {}", path.display(), e))
    })?;

    if !canonical.is_file() {
        return Err(SlipboxError::IoError(format!(
            "Path '{}' is not a regular file",
            path.display()
        )));
    }

    Ok(canonical)
}

/// Validate an output file path: the parent directory must exist.
fn validate_output_path(path: &Path) -> Result<PathBuf, SlipboxError> {
    let parent = path.parent().unwrap_or(Path::new("."));

    let canonical_parent = parent.canonicalize().map_err(|e| {
        SlipboxError::IoError(format!(
            "Invalid output directory '{}': {}",
            parent.display(),
            e
        ))
    })?;

    if !canonical_parent.is_dir() {
        return Err(SlipboxError::IoError(format!(
            "Output directory '{}' is not a valid directory",
            parent.display()
        )));
    }

    let filename = path
        .file_name()
        .ok_or_else(|| SlipboxError::IoError("Output path has no filename".to_string()))?;

    Ok(canonical_parent.join(filename))
}

// =============================================================================
// REBUILD HELPER
// =============================================================================

/// Run one full rebuild of the configured vault.
fn build_snapshot(config: &SlipboxConfig) -> Result<Snapshot, SlipboxError> {
    let loader = NoteLoader::new().with_extensions(config.extensions.clone());
    info!(vault = %config.vault.display(), "rebuilding vault index");
    rebuild(&config.vault, &loader, config.atomicity)
}

/// Resolve a note id argument against the snapshot, or fail.
fn resolve_note(snapshot: &Snapshot, id: &str) -> Result<NoteId, SlipboxError> {
    let id = NoteId::new(id);
    if !snapshot.graph.contains(&id) {
        return Err(SlipboxError::NoteNotFound(id));
    }
    Ok(id)
}

// =============================================================================
// STATUS COMMAND
// =============================================================================

/// Show vault index status.
pub fn cmd_status(config: &SlipboxConfig, json_mode: bool) -> Result<(), SlipboxError> {
    let snapshot = build_snapshot(config)?;
    print_status(&snapshot, &config.vault.display().to_string(), json_mode);
    Ok(())
}

fn print_status(snapshot: &Snapshot, source: &str, json_mode: bool) {
    if json_mode {
        let output = serde_json::json!({
            "source": source,
            "notes": snapshot.graph.note_count(),
            "links": snapshot.graph.link_count(),
            "dangling_links": snapshot.graph.dangling_links().len(),
            "parse_warnings": snapshot.warnings.len(),
            "load_errors": snapshot.load_errors.len(),
            "atomicity_flagged": snapshot.atomicity.notes_flagged(),
            "search_terms": snapshot.search.term_count(),
        });
        println!(
            "{}",
            serde_json::to_string_pretty(&output).unwrap_or_default()
        );
        return;
    }

    println!("Slipbox Index Status");
    println!("====================");
    println!("Source:   {}", source);
    println!();
    println!("Notes:          {}", snapshot.graph.note_count());
    println!("Links:          {}", snapshot.graph.link_count());
    println!("Dangling:       {}", snapshot.graph.dangling_links().len());
    println!("Parse warnings: {}", snapshot.warnings.len());
    println!("Load errors:    {}", snapshot.load_errors.len());
    println!("Flagged notes:  {}", snapshot.atomicity.notes_flagged());
    println!("Search terms:   {}", snapshot.search.term_count());

    for error in &snapshot.load_errors {
        println!();
        println!("  load error: {}: {}", error.path.display(), error.reason);
    }
}

// =============================================================================
// GRAPH QUERY COMMANDS
// =============================================================================

/// Show resolved outbound links of a note.
pub fn cmd_links(config: &SlipboxConfig, id: &str, json_mode: bool) -> Result<(), SlipboxError> {
    let snapshot = build_snapshot(config)?;
    let id = resolve_note(&snapshot, id)?;
    let links = snapshot.graph.resolved_links(&id);

    if json_mode {
        let output: Vec<_> = links
            .iter()
            .map(|l| {
                serde_json::json!({
                    "target": l.target.as_str(),
                    "label": l.label,
                })
            })
            .collect();
        println!(
            "{}",
            serde_json::to_string_pretty(&output).unwrap_or_default()
        );
        return Ok(());
    }

    if links.is_empty() {
        println!("{} has no outbound links", id);
        return Ok(());
    }
    println!("Links from {}:", id);
    for link in links {
        match link.label {
            Some(label) => println!("  -> {} ({})", link.target, label),
            None => println!("  -> {}", link.target),
        }
    }
    Ok(())
}

/// Show inbound references to a note.
pub fn cmd_backlinks(
    config: &SlipboxConfig,
    id: &str,
    json_mode: bool,
) -> Result<(), SlipboxError> {
    let snapshot = build_snapshot(config)?;
    let id = resolve_note(&snapshot, id)?;
    let backlinks = snapshot.graph.backlinks(&id);

    if json_mode {
        let output: Vec<_> = backlinks.iter().map(NoteId::as_str).collect();
        println!(
            "{}",
            serde_json::to_string_pretty(&output).unwrap_or_default()
        );
        return Ok(());
    }

    if backlinks.is_empty() {
        println!("{} has no backlinks", id);
        return Ok(());
    }
    println!("Backlinks of {}:", id);
    for source in backlinks {
        println!("  <- {}", source);
    }
    Ok(())
}

/// List links whose target does not exist in the vault.
pub fn cmd_dangling(config: &SlipboxConfig, json_mode: bool) -> Result<(), SlipboxError> {
    let snapshot = build_snapshot(config)?;
    let dangling = snapshot.graph.dangling_links();

    if json_mode {
        let output: Vec<_> = dangling
            .iter()
            .map(|d| {
                serde_json::json!({
                    "source": d.source.as_str(),
                    "target": d.target,
                })
            })
            .collect();
        println!(
            "{}",
            serde_json::to_string_pretty(&output).unwrap_or_default()
        );
        return Ok(());
    }

    if dangling.is_empty() {
        println!("No dangling links");
        return Ok(());
    }
    println!("Dangling links:");
    for link in dangling {
        println!("  {} -> [[{}]]", link.source, link.target);
    }
    Ok(())
}

/// Show notes within N hops of a note.
pub fn cmd_neighborhood(
    config: &SlipboxConfig,
    id: &str,
    depth: usize,
    json_mode: bool,
) -> Result<(), SlipboxError> {
    let snapshot = build_snapshot(config)?;
    let id = resolve_note(&snapshot, id)?;
    let hood = snapshot
        .graph
        .neighborhood(&id, depth)
        .ok_or_else(|| SlipboxError::NoteNotFound(id.clone()))?;

    if json_mode {
        let output: Vec<_> = hood.iter().map(NoteId::as_str).collect();
        println!(
            "{}",
            serde_json::to_string_pretty(&output).unwrap_or_default()
        );
        return Ok(());
    }

    println!("Neighborhood of {} (depth {}):", id, depth);
    for note in hood {
        println!("  {}", note);
    }
    Ok(())
}

// =============================================================================
// TAGS COMMAND
// =============================================================================

/// List vault tags, or the notes carrying one tag.
pub fn cmd_tags(
    config: &SlipboxConfig,
    tag: Option<&str>,
    json_mode: bool,
) -> Result<(), SlipboxError> {
    let snapshot = build_snapshot(config)?;

    if let Some(tag) = tag {
        let notes = snapshot.graph.notes_with_tag(tag);

        if json_mode {
            let output: Vec<_> = notes.iter().map(NoteId::as_str).collect();
            println!(
                "{}",
                serde_json::to_string_pretty(&output).unwrap_or_default()
            );
            return Ok(());
        }

        if notes.is_empty() {
            println!("No notes tagged '{}'", tag);
            return Ok(());
        }
        println!("Notes tagged '{}':", tag);
        for note in notes {
            println!("  {}", note);
        }
        return Ok(());
    }

    let tags = snapshot.graph.tags();

    if json_mode {
        let output: Vec<_> = tags.iter().collect();
        println!(
            "{}",
            serde_json::to_string_pretty(&output).unwrap_or_default()
        );
        return Ok(());
    }

    if tags.is_empty() {
        println!("No tags in the vault");
        return Ok(());
    }
    println!("Tags:");
    for tag in &tags {
        println!("  {} ({})", tag, snapshot.graph.notes_with_tag(tag).len());
    }
    Ok(())
}

// =============================================================================
// SEARCH COMMAND
// =============================================================================

/// Ranked lexical search over the vault.
pub fn cmd_search(
    config: &SlipboxConfig,
    query: &str,
    limit: Option<usize>,
    json_mode: bool,
) -> Result<(), SlipboxError> {
    let snapshot = build_snapshot(config)?;
    let limit = limit.unwrap_or(config.search_limit);
    let hits = snapshot.search.query(query, limit);

    if json_mode {
        let output: Vec<_> = hits
            .iter()
            .map(|h| {
                serde_json::json!({
                    "id": h.id.as_str(),
                    "score": h.score,
                    "title": snapshot.graph.get(&h.id).map(|n| n.title.clone()),
                })
            })
            .collect();
        println!(
            "{}",
            serde_json::to_string_pretty(&output).unwrap_or_default()
        );
        return Ok(());
    }

    if hits.is_empty() {
        println!("No results for '{}'", query);
        return Ok(());
    }
    for hit in hits {
        let title = snapshot
            .graph
            .get(&hit.id)
            .map(|n| n.title.clone())
            .unwrap_or_default();
        println!("{:>6}  {}  {}", hit.score, hit.id, title);
    }
    Ok(())
}

// =============================================================================
// CHECK COMMAND
// =============================================================================

/// Run the atomicity heuristics over every note.
pub fn cmd_check(config: &SlipboxConfig, json_mode: bool) -> Result<(), SlipboxError> {
    let snapshot = build_snapshot(config)?;
    let report = &snapshot.atomicity;

    if json_mode {
        let output: Vec<_> = report
            .violations
            .iter()
            .map(|(id, violations)| {
                serde_json::json!({
                    "id": id.as_str(),
                    "violations": violations
                        .iter()
                        .map(ToString::to_string)
                        .collect::<Vec<_>>(),
                })
            })
            .collect();
        println!(
            "{}",
            serde_json::to_string_pretty(&output).unwrap_or_default()
        );
        return Ok(());
    }

    if report.is_clean() {
        println!(
            "All {} notes look atomic",
            snapshot.graph.note_count()
        );
        return Ok(());
    }

    println!(
        "{} of {} notes flagged ({} violations):",
        report.notes_flagged(),
        snapshot.graph.note_count(),
        report.violation_count()
    );
    for (id, violations) in &report.violations {
        println!("  {}", id);
        for violation in violations {
            println!("    - {}", violation);
        }
    }
    Ok(())
}

// =============================================================================
// EXPORT / IMPORT COMMANDS
// =============================================================================

/// Export the index snapshot to a file.
pub fn cmd_export(config: &SlipboxConfig, file: &Path) -> Result<(), SlipboxError> {
    let output_path = validate_output_path(file)?;
    let snapshot = build_snapshot(config)?;

    let bytes = snapshot_to_bytes(&snapshot)?;
    std::fs::write(&output_path, &bytes)
        .map_err(|e| SlipboxError::IoError(format!("Cannot write snapshot: {}", e)))?;

    println!(
        "Exported {} notes ({} bytes) to {}",
        snapshot.graph.note_count(),
        bytes.len(),
        output_path.display()
    );
    Ok(())
}

/// Inspect a previously exported snapshot.
pub fn cmd_import(file: &Path, json_mode: bool) -> Result<(), SlipboxError> {
    let input_path = validate_file_path(file)?;
    validate_file_size(&input_path, MAX_IMPORT_FILE_SIZE)?;

    let bytes = std::fs::read(&input_path)
        .map_err(|e| SlipboxError::IoError(format!("Cannot read snapshot: {}", e)))?;
    let snapshot = snapshot_from_bytes(&bytes)?;

    print_status(&snapshot, &input_path.display().to_string(), json_mode);
    Ok(())
}
