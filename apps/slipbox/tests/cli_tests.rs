//! # CLI Integration Tests
//!
//! Drives the CLI structs and command dispatch directly, end to end over
//! temporary vaults.

use clap::Parser;
use slipbox::cli::{Cli, Commands, execute};
use slipbox::config::SlipboxConfig;
use slipbox_core::SlipboxError;
use std::fs;
use std::path::Path;

fn write_note(dir: &Path, name: &str, body: &str) {
    fs::write(dir.join(name), body).expect("write note");
}

fn cli(args: &[&str]) -> Cli {
    Cli::try_parse_from(args).expect("parse CLI")
}

#[test]
fn cli_parses_global_flags_and_subcommand() {
    let parsed = cli(&[
        "slipbox",
        "--quiet",
        "--json-mode",
        "-D",
        "/tmp/vault",
        "search",
        "borrow checker",
        "--limit",
        "5",
    ]);

    assert!(parsed.quiet);
    assert!(parsed.json_mode);
    assert_eq!(parsed.vault.as_deref(), Some(Path::new("/tmp/vault")));
    assert!(matches!(
        parsed.command,
        Commands::Search { ref query, limit: Some(5) } if query == "borrow checker"
    ));
}

#[test]
fn missing_subcommand_is_a_parse_error() {
    assert!(Cli::try_parse_from(["slipbox"]).is_err());
}

#[test]
fn status_runs_over_a_real_vault() {
    let dir = tempfile::tempdir().expect("tempdir");
    write_note(dir.path(), "A.md", "# A\n\nsee [[B]]");
    write_note(dir.path(), "B.md", "# B");

    let vault = dir.path().display().to_string();
    let result = execute(cli(&["slipbox", "-D", &vault, "status"]));
    assert!(result.is_ok());
}

#[test]
fn backlinks_of_unknown_note_fail_cleanly() {
    let dir = tempfile::tempdir().expect("tempdir");
    write_note(dir.path(), "A.md", "");

    let vault = dir.path().display().to_string();
    let result = execute(cli(&["slipbox", "-D", &vault, "backlinks", "ghost"]));
    assert!(matches!(result, Err(SlipboxError::NoteNotFound(_))));
}

#[test]
fn tags_command_lists_and_filters() {
    let dir = tempfile::tempdir().expect("tempdir");
    write_note(
        dir.path(),
        "tagged.md",
        "---\ntags: [rust, graphs]\n---\n\n# Tagged",
    );
    write_note(dir.path(), "plain.md", "# Plain");

    let vault = dir.path().display().to_string();
    execute(cli(&["slipbox", "-D", &vault, "tags"])).expect("list tags");
    execute(cli(&["slipbox", "-D", &vault, "tags", "rust"])).expect("filter by tag");

    let parsed = cli(&["slipbox", "tags", "rust"]);
    assert!(matches!(
        parsed.command,
        Commands::Tags { tag: Some(ref t) } if t == "rust"
    ));
}

#[test]
fn export_then_import_roundtrips() {
    let vault_dir = tempfile::tempdir().expect("tempdir");
    write_note(vault_dir.path(), "A.md", "# A\n\nsee [[B]] and [[gone]]");
    write_note(vault_dir.path(), "B.md", "# B");

    let out_dir = tempfile::tempdir().expect("tempdir");
    let out_file = out_dir.path().join("index.slip");

    let vault = vault_dir.path().display().to_string();
    let out = out_file.display().to_string();

    execute(cli(&["slipbox", "-D", &vault, "export", "--file", &out])).expect("export");
    assert!(out_file.is_file());

    execute(cli(&["slipbox", "import", "--file", &out])).expect("import");
}

#[test]
fn import_rejects_garbage_files() {
    let dir = tempfile::tempdir().expect("tempdir");
    let file = dir.path().join("not-a-snapshot.slip");
    fs::write(&file, b"XXXX\x01garbage").expect("write");

    let path = file.display().to_string();
    let result = execute(cli(&["slipbox", "import", "--file", &path]));
    assert!(matches!(
        result,
        Err(SlipboxError::DeserializationError(_))
    ));
}

#[test]
fn explicit_config_file_is_honored() {
    let vault_dir = tempfile::tempdir().expect("tempdir");
    write_note(vault_dir.path(), "solo.md", "# Solo");

    let config_dir = tempfile::tempdir().expect("tempdir");
    let config_file = config_dir.path().join("slipbox.toml");
    fs::write(
        &config_file,
        format!("vault = {:?}\nsearch_limit = 3\n", vault_dir.path()),
    )
    .expect("write config");

    let config =
        SlipboxConfig::load(Some(&config_file)).expect("load config");
    assert_eq!(config.vault, vault_dir.path());
    assert_eq!(config.search_limit, 3);

    let path = config_file.display().to_string();
    let result = execute(cli(&["slipbox", "-C", &path, "check"]));
    assert!(result.is_ok());
}
