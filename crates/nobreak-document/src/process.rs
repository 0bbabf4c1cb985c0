// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Single-document orchestration:
//
//   validate → extract → decode → particles → dates → replace + repack
//
// Progress is reported after each step. On failure nothing is written to the
// output path and the in-memory working set is dropped.

use std::path::Path;

use nobreak_core::AppConfig;
use nobreak_core::error::Result;
use nobreak_core::types::{PRIMARY_TEXT_PART, SubstitutionReport};
use tracing::{debug, info, instrument};

use crate::container::{RepackOptions, extract, repack};
use crate::progress::{Checkpoint, ProgressSink, ProgressTracker};
use crate::transform::Transformer;
use crate::validate::validate;

/// Per-run settings for [`process`].
#[derive(Debug, Clone)]
pub struct ProcessOptions {
    /// Accepted input extensions, without the dot.
    pub extensions: Vec<String>,
    /// Verify the written archive before moving it into place.
    pub verify_output: bool,
}

impl Default for ProcessOptions {
    fn default() -> Self {
        Self::from(&AppConfig::default())
    }
}

impl From<&AppConfig> for ProcessOptions {
    fn from(config: &AppConfig) -> Self {
        Self {
            extensions: config.extensions.clone(),
            verify_output: config.verify_output,
        }
    }
}

/// Normalize one document from `input` into a new package at `output`.
///
/// `input` and `output` may be the same path: the package is read fully
/// before anything is written, and the output only replaces the target once
/// complete.
#[instrument(skip_all, fields(input = %input.display(), output = %output.display()))]
pub fn process(
    input: &Path,
    output: &Path,
    transformer: &Transformer,
    options: &ProcessOptions,
    progress: &mut dyn ProgressSink,
) -> Result<SubstitutionReport> {
    let mut progress = ProgressTracker::new(progress);

    validate(input, &options.extensions)?;
    progress.checkpoint(Checkpoint::Validated);

    let mut set = extract(input)?;
    progress.checkpoint(Checkpoint::Extracted);

    let text = set.decode_text(PRIMARY_TEXT_PART)?;
    progress.checkpoint(Checkpoint::Decoded);

    let (text, particles) = transformer.fuse_particles(&text);
    debug!(particles, "particle pass done");
    progress.checkpoint(Checkpoint::ParticlesFused);

    let (text, dated) = transformer.fuse_dates(&text);
    debug!(dates = dated.dates, "date pass done");
    progress.checkpoint(Checkpoint::DatesFused);

    set.replace(PRIMARY_TEXT_PART, text.into_bytes())?;
    repack(
        &set,
        output,
        &RepackOptions {
            verify: options.verify_output,
        },
    )?;
    progress.checkpoint(Checkpoint::Written);

    let report = SubstitutionReport { particles, ..dated };
    info!(
        particles = report.particles,
        dates = report.dates,
        separators = report.separators_changed(),
        replaced = report.spaces_replaced(),
        "document normalized"
    );
    Ok(report)
}
