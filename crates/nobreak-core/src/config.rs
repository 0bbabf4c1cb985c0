// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Application configuration.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::error::{NobreakError, Result};
use crate::lexicon::Lexicon;

/// Persistent application settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Name of the directory (next to the inputs) that receives outputs.
    pub output_dir_name: String,
    /// Accepted input file extensions, without the dot.
    pub extensions: Vec<String>,
    /// Re-read every written archive and compare it to the working set
    /// before moving it into place.
    pub verify_output: bool,
    /// Number of failures listed individually in a batch summary.
    pub failure_preview: usize,
    /// JSON word list replacing the built-in particles.
    pub particles_file: Option<PathBuf>,
    /// JSON word list replacing the built-in months.
    pub months_file: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            output_dir_name: "output_files".into(),
            extensions: vec!["docx".into()],
            verify_output: true,
            failure_preview: 3,
            particles_file: None,
            months_file: None,
        }
    }
}

impl AppConfig {
    /// Load settings from a JSON file. Missing keys take their defaults.
    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let bytes = std::fs::read(path).map_err(|e| NobreakError::io(path, e))?;
        let config: Self = serde_json::from_slice(&bytes)?;
        config.validate()?;
        debug!(?config, "configuration loaded");
        Ok(config)
    }

    /// Reject settings that would make every run fail.
    pub fn validate(&self) -> Result<()> {
        if self.extensions.is_empty() {
            return Err(NobreakError::Config("no accepted extensions".into()));
        }
        if self.output_dir_name.trim().is_empty() {
            return Err(NobreakError::Config("output_dir_name is empty".into()));
        }
        Ok(())
    }

    /// Build the lexicon these settings describe.
    pub fn lexicon(&self) -> Result<Lexicon> {
        Lexicon::from_json_files(self.particles_file.as_deref(), self.months_file.as_deref())
    }

}

/// Whether `path` carries one of `extensions` (without the dot,
/// case-insensitive).
pub fn has_accepted_extension(path: &Path, extensions: &[String]) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| extensions.iter().any(|e| e.eq_ignore_ascii_case(ext)))
}
