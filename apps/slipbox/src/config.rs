//! # Configuration
//!
//! TOML configuration for the slipbox binary.
//!
//! Resolution order: explicit `--config` path, then `slipbox.toml` in the
//! working directory, then compiled-in defaults. CLI flags override
//! individual fields after loading.

use serde::Deserialize;
use slipbox_core::primitives::DEFAULT_SEARCH_LIMIT;
use slipbox_core::{AtomicityLimits, SlipboxError};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Default config file name looked up in the working directory.
pub const CONFIG_FILE_NAME: &str = "slipbox.toml";

/// Application configuration.
///
/// ```toml
/// vault = "/home/me/notes"
/// extensions = ["md", "markdown"]
/// search_limit = 20
///
/// [atomicity]
/// max_words = 500
/// ```
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SlipboxConfig {
    /// Root directory of the note vault.
    pub vault: PathBuf,
    /// File extensions treated as notes (without the dot).
    pub extensions: Vec<String>,
    /// Maximum number of search hits to return.
    pub search_limit: usize,
    /// Atomicity heuristic thresholds.
    pub atomicity: AtomicityLimits,
}

impl Default for SlipboxConfig {
    fn default() -> Self {
        Self {
            vault: PathBuf::from("."),
            extensions: vec!["md".to_string()],
            search_limit: DEFAULT_SEARCH_LIMIT,
            atomicity: AtomicityLimits::default(),
        }
    }
}

impl SlipboxConfig {
    /// Parse a configuration from TOML text.
    pub fn from_toml(text: &str) -> Result<Self, SlipboxError> {
        toml::from_str(text).map_err(|e| SlipboxError::ConfigError(e.to_string()))
    }

    /// Load configuration.
    ///
    /// An explicitly requested file must exist and parse; the implicit
    /// `slipbox.toml` is optional and silently falls back to defaults when
    /// absent.
    pub fn load(explicit: Option<&Path>) -> Result<Self, SlipboxError> {
        let path = match explicit {
            Some(p) => p.to_path_buf(),
            None => {
                let implicit = PathBuf::from(CONFIG_FILE_NAME);
                if !implicit.is_file() {
                    debug!("no {CONFIG_FILE_NAME} found, using defaults");
                    return Ok(Self::default());
                }
                implicit
            }
        };

        let text = std::fs::read_to_string(&path).map_err(|e| {
            SlipboxError::ConfigError(format!("cannot read {}: {e}", path.display()))
        })?;
        debug!(path = %path.display(), "loaded config");
        Self::from_toml(&text)
    }
}

// =============================================================================
// TESTS
// =============================================================================
