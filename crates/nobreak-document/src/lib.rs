// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// nobreak-document — Document processing for Nobreak.
//
// Provides package validation, lossless container extraction and repacking,
// the non-breaking-space transform engine, the single-document orchestrator
// and a sequential batch driver.

pub mod batch;
pub mod container;
pub mod process;
pub mod progress;
pub mod transform;
pub mod validate;

#[cfg(test)]
pub(crate) mod test_support;

// Re-export the primary entry points so callers can use `nobreak_document::process` etc.
pub use batch::{BatchDriver, BatchEvent, BatchFailure, BatchSummary, default_output_dir, discover};
pub use container::{Member, WorkingSet, extract, repack};
pub use process::{ProcessOptions, process};
pub use progress::{Checkpoint, ProgressSink};
pub use transform::Transformer;
pub use validate::validate;
