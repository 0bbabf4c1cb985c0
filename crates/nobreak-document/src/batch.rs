// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Batch driver — runs `process` over many documents, one at a time.
//
// A failure in one document is recorded and the batch moves on. A shared
// cancellation flag is checked between documents; a document that has
// started always runs to completion or failure.

use std::collections::HashSet;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use nobreak_core::config::has_accepted_extension;
use nobreak_core::error::{ErrorKind, NobreakError, Result};
use nobreak_core::types::SubstitutionReport;
use tracing::{error, info, instrument, warn};

use crate::process::{ProcessOptions, process};
use crate::transform::Transformer;

/// Something that happened during a batch, in order.
#[derive(Debug, Clone, PartialEq)]
pub enum BatchEvent {
    Started {
        index: usize,
        total: usize,
        document: PathBuf,
    },
    Progress {
        index: usize,
        total: usize,
        /// Completion of the current document.
        fraction: f32,
        /// Completion of the whole batch.
        overall: f32,
    },
    Succeeded {
        index: usize,
        total: usize,
        document: PathBuf,
        output: PathBuf,
        report: SubstitutionReport,
    },
    Failed {
        index: usize,
        total: usize,
        document: PathBuf,
        kind: ErrorKind,
        message: String,
    },
    Cancelled {
        remaining: usize,
    },
}

/// One document that could not be processed.
#[derive(Debug, Clone, PartialEq)]
pub struct BatchFailure {
    pub document: PathBuf,
    pub kind: ErrorKind,
    pub message: String,
}

/// Outcome of a batch run.
#[derive(Debug, Clone, Default)]
pub struct BatchSummary {
    /// `(input, output, report)` for every document written.
    pub succeeded: Vec<(PathBuf, PathBuf, SubstitutionReport)>,
    pub failures: Vec<BatchFailure>,
    /// Documents never started because the batch was cancelled.
    pub skipped: Vec<PathBuf>,
}

impl BatchSummary {
    pub fn success_count(&self) -> usize {
        self.succeeded.len()
    }

    pub fn is_clean(&self) -> bool {
        self.failures.is_empty() && self.skipped.is_empty()
    }

    /// The first `limit` failures, for display.
    pub fn preview(&self, limit: usize) -> &[BatchFailure] {
        &self.failures[..self.failures.len().min(limit)]
    }

    /// Failures not covered by [`BatchSummary::preview`].
    pub fn remaining(&self, limit: usize) -> usize {
        self.failures.len().saturating_sub(limit)
    }

    /// Sum of the reports of every successful document.
    pub fn total_report(&self) -> SubstitutionReport {
        let mut total = SubstitutionReport::default();
        for (_, _, report) in &self.succeeded {
            total += *report;
        }
        total
    }
}

/// Sequential batch runner.
pub struct BatchDriver<'a> {
    transformer: &'a Transformer,
    options: ProcessOptions,
    output_dir: PathBuf,
    cancel: Option<Arc<AtomicBool>>,
}

impl<'a> BatchDriver<'a> {
    pub fn new(transformer: &'a Transformer, options: ProcessOptions, output_dir: PathBuf) -> Self {
        Self {
            transformer,
            options,
            output_dir,
            cancel: None,
        }
    }

    /// Stop before the next document once `flag` is set.
    pub fn with_cancel(mut self, flag: Arc<AtomicBool>) -> Self {
        self.cancel = Some(flag);
        self
    }

    /// Process every document in order, reporting through `on_event`.
    ///
    /// Fails only if the output directory cannot be created; per-document
    /// failures are collected in the summary.
    #[instrument(skip_all, fields(documents = documents.len(), output_dir = %self.output_dir.display()))]
    pub fn run<F>(&self, documents: &[PathBuf], mut on_event: F) -> Result<BatchSummary>
    where
        F: FnMut(BatchEvent),
    {
        std::fs::create_dir_all(&self.output_dir)
            .map_err(|e| NobreakError::io(&self.output_dir, e))?;

        let total = documents.len();
        let mut summary = BatchSummary::default();
        let mut claimed = HashSet::new();

        for (index, document) in documents.iter().enumerate() {
            if self.cancelled() {
                let remaining = total - index;
                warn!(remaining, "batch cancelled");
                summary.skipped.extend(documents[index..].iter().cloned());
                on_event(BatchEvent::Cancelled { remaining });
                break;
            }

            on_event(BatchEvent::Started {
                index,
                total,
                document: document.clone(),
            });

            let output = unique_output(&self.output_dir, document, &mut claimed);
            let result = self.run_one(document, &output, |fraction| {
                on_event(BatchEvent::Progress {
                    index,
                    total,
                    fraction,
                    overall: (index as f32 + fraction) / total as f32,
                })
            });

            match result {
                Ok(report) => {
                    info!(document = %document.display(), output = %output.display(), %report, "document done");
                    summary
                        .succeeded
                        .push((document.clone(), output.clone(), report));
                    on_event(BatchEvent::Succeeded {
                        index,
                        total,
                        document: document.clone(),
                        output,
                        report,
                    });
                }
                Err(err) => {
                    let kind = err.kind();
                    let message = err.to_string();
                    if kind == ErrorKind::Unexpected {
                        error!(document = %document.display(), error = ?err, "document failed");
                    } else {
                        error!(document = %document.display(), %kind, error = %err, "document failed");
                    }
                    summary.failures.push(BatchFailure {
                        document: document.clone(),
                        kind,
                        message: message.clone(),
                    });
                    on_event(BatchEvent::Failed {
                        index,
                        total,
                        document: document.clone(),
                        kind,
                        message,
                    });
                }
            }
        }

        info!(
            succeeded = summary.success_count(),
            failed = summary.failures.len(),
            skipped = summary.skipped.len(),
            "batch finished"
        );
        Ok(summary)
    }

    /// Run one document, converting a panic into [`NobreakError::Unexpected`].
    fn run_one<P>(&self, document: &Path, output: &Path, mut progress: P) -> Result<SubstitutionReport>
    where
        P: FnMut(f32),
    {
        let outcome = catch_unwind(AssertUnwindSafe(|| {
            process(
                document,
                output,
                self.transformer,
                &self.options,
                &mut progress,
            )
        }));

        outcome.unwrap_or_else(|payload| {
            let detail = payload
                .downcast_ref::<&str>()
                .map(|s| (*s).to_owned())
                .or_else(|| payload.downcast_ref::<String>().cloned())
                .unwrap_or_else(|| "panic with non-string payload".to_owned());
            Err(NobreakError::Unexpected {
                path: document.to_path_buf(),
                detail,
            })
        })
    }

    fn cancelled(&self) -> bool {
        self.cancel
            .as_ref()
            .is_some_and(|flag| flag.load(Ordering::SeqCst))
    }
}

/// Non-recursive listing of the files in `folder` with an accepted
/// extension, sorted by path.
#[instrument(skip_all, fields(folder = %folder.display()))]
pub fn discover(folder: &Path, extensions: &[String]) -> Result<Vec<PathBuf>> {
    let entries = std::fs::read_dir(folder).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            NobreakError::NotFound {
                path: folder.to_path_buf(),
            }
        } else {
            NobreakError::io(folder, e)
        }
    })?;

    let mut documents = Vec::new();
    for entry in entries {
        let path = entry.map_err(|e| NobreakError::io(folder, e))?.path();
        if has_accepted_extension(&path, extensions) && path.is_file() {
            documents.push(path);
        }
    }
    documents.sort();

    info!(found = documents.len(), "documents discovered");
    Ok(documents)
}

/// `<deepest directory containing every document>/<dir_name>`.
///
/// `None` for an empty list.
pub fn default_output_dir(documents: &[PathBuf], dir_name: &str) -> Option<PathBuf> {
    let mut parents = documents
        .iter()
        .map(|d| d.parent().unwrap_or_else(|| Path::new("")));
    let first = parents.next()?;

    let common = parents.fold(first.to_path_buf(), |common, parent| {
        common
            .components()
            .zip(parent.components())
            .take_while(|(a, b)| a == b)
            .map(|(a, _)| a)
            .collect()
    });
    Some(common.join(dir_name))
}

/// Output path for `document` inside `dir`, suffixed when an earlier
/// document in the batch already claimed the same file name.
fn unique_output(dir: &Path, document: &Path, claimed: &mut HashSet<PathBuf>) -> PathBuf {
    let name = document
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_else(|| "document.docx".into());
    let mut candidate = dir.join(&name);

    let stem = Path::new(&name)
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let extension = Path::new(&name)
        .extension()
        .map(|e| format!(".{}", e.to_string_lossy()))
        .unwrap_or_default();

    let mut n = 2;
    while claimed.contains(&candidate) {
        candidate = dir.join(format!("{stem} ({n}){extension}"));
        n += 1;
    }
    claimed.insert(candidate.clone());
    candidate
}
