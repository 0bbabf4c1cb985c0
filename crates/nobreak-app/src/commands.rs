// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Subcommand implementations.
//
// Document work is synchronous and runs on the blocking pool. Progress comes
// back over an unbounded channel and is rendered on the async side, so the
// worker never waits on the terminal.

use std::collections::HashSet;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use nobreak_core::AppConfig;
use nobreak_core::error::{NobreakError, Result};
use nobreak_document::{
    BatchDriver, BatchEvent, BatchSummary, ProcessOptions, Transformer, default_output_dir,
    discover,
};
use tokio::sync::mpsc;
use tracing::{info, warn};

/// `nobreak process`. Returns whether the document was written.
pub async fn process(
    config: &AppConfig,
    transformer: Transformer,
    input: PathBuf,
    output: Option<PathBuf>,
) -> Result<bool> {
    let output = match output {
        Some(path) => path,
        None => {
            let path = default_process_output(&input, &config.output_dir_name);
            if let Some(dir) = path.parent() {
                std::fs::create_dir_all(dir).map_err(|e| NobreakError::io(dir, e))?;
            }
            path
        }
    };

    let options = ProcessOptions::from(config);
    let (tx, mut rx) = mpsc::unbounded_channel::<f32>();
    let worker_output = output.clone();
    let worker = tokio::task::spawn_blocking(move || {
        let mut sink = |fraction: f32| {
            let _ = tx.send(fraction);
        };
        nobreak_document::process(&input, &worker_output, &transformer, &options, &mut sink)
    });

    while let Some(fraction) = rx.recv().await {
        eprint!("\r{:>3}%", percent(fraction));
        let _ = std::io::stderr().flush();
    }
    eprintln!();

    let report = worker.await.map_err(|e| join_error(&output, e))??;
    println!("Wrote {}: {report}", output.display());
    Ok(true)
}

/// `nobreak batch`. Returns whether every document was written.
pub async fn batch(
    config: &AppConfig,
    transformer: Transformer,
    paths: &[PathBuf],
    output: Option<PathBuf>,
) -> Result<bool> {
    let documents = collect_documents(paths, &config.extensions)?;
    if documents.is_empty() {
        println!(
            "No documents with extension {} found.",
            config.extensions.join(", ")
        );
        return Ok(false);
    }

    let output_dir = output
        .or_else(|| default_output_dir(&documents, &config.output_dir_name))
        .unwrap_or_else(|| PathBuf::from(&config.output_dir_name));
    info!(documents = documents.len(), output_dir = %output_dir.display(), "starting batch");

    let cancel = Arc::new(AtomicBool::new(false));
    let signal = {
        let cancel = Arc::clone(&cancel);
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                warn!("interrupt received, stopping after the current document");
                cancel.store(true, Ordering::SeqCst);
            }
        })
    };

    let options = ProcessOptions::from(config);
    let (tx, mut rx) = mpsc::unbounded_channel::<BatchEvent>();
    let worker_dir = output_dir.clone();
    let worker = tokio::task::spawn_blocking(move || {
        BatchDriver::new(&transformer, options, worker_dir)
            .with_cancel(cancel)
            .run(&documents, |event| {
                let _ = tx.send(event);
            })
    });

    let mut view = BatchView::default();
    while let Some(event) = rx.recv().await {
        view.render(&event);
    }

    let summary = worker.await.map_err(|e| join_error(&output_dir, e))??;
    signal.abort();

    print_summary(&summary, &output_dir, config.failure_preview);
    Ok(summary.is_clean())
}

/// `nobreak lexicon`.
pub fn lexicon(config: &AppConfig) -> Result<bool> {
    let lexicon = config.lexicon()?;
    println!("{}", serde_json::to_string_pretty(&lexicon)?);
    Ok(true)
}

/// `<input dir>/<dir_name>/<input file name>`.
fn default_process_output(input: &Path, dir_name: &str) -> PathBuf {
    let parent = input.parent().unwrap_or_else(|| Path::new(""));
    let name = input.file_name().unwrap_or(input.as_os_str());
    parent.join(dir_name).join(name)
}

/// Expand directories (non-recursively) and drop repeated paths, keeping the
/// order given. Plain files are kept whatever their extension, so a wrong
/// file shows up as a failure instead of disappearing.
fn collect_documents(paths: &[PathBuf], extensions: &[String]) -> Result<Vec<PathBuf>> {
    let mut seen = HashSet::new();
    let mut documents = Vec::new();
    for path in paths {
        let found = if path.is_dir() {
            discover(path, extensions)?
        } else {
            vec![path.clone()]
        };
        for document in found {
            if seen.insert(document.clone()) {
                documents.push(document);
            }
        }
    }
    Ok(documents)
}

fn join_error(path: &Path, err: tokio::task::JoinError) -> NobreakError {
    NobreakError::Unexpected {
        path: path.to_path_buf(),
        detail: format!("worker task failed: {err}"),
    }
}

fn percent(fraction: f32) -> u32 {
    (fraction.clamp(0.0, 1.0) * 100.0).round() as u32
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Terminal rendering of batch events, one status line per document.
#[derive(Default)]
struct BatchView {
    current: String,
}

impl BatchView {
    fn render(&mut self, event: &BatchEvent) {
        match event {
            BatchEvent::Started {
                index,
                total,
                document,
            } => {
                self.current = display_name(document);
                eprint!("\r[{}/{}] {}", index + 1, total, self.current);
            }
            BatchEvent::Progress {
                index,
                total,
                overall,
                ..
            } => {
                eprint!(
                    "\r[{}/{}] {:>3}% {}",
                    index + 1,
                    total,
                    percent(*overall),
                    self.current
                );
            }
            BatchEvent::Succeeded {
                index,
                total,
                report,
                ..
            } => {
                eprintln!("\r[{}/{}] ok   {}: {report}", index + 1, total, self.current);
            }
            BatchEvent::Failed {
                index, total, kind, ..
            } => {
                eprintln!("\r[{}/{}] FAIL {}: {kind}", index + 1, total, self.current);
            }
            BatchEvent::Cancelled { remaining } => {
                eprintln!("Cancelled; {remaining} document(s) not processed.");
            }
        }
        let _ = std::io::stderr().flush();
    }
}

fn print_summary(summary: &BatchSummary, output_dir: &Path, preview: usize) {
    let attempted = summary.success_count() + summary.failures.len();
    println!(
        "{} of {} document(s) normalized into {}: {}",
        summary.success_count(),
        attempted,
        output_dir.display(),
        summary.total_report()
    );

    if !summary.failures.is_empty() {
        println!("Failed:");
        for failure in summary.preview(preview) {
            println!(
                "  {} ({}): {}",
                display_name(&failure.document),
                failure.kind,
                failure.message
            );
        }
        let more = summary.remaining(preview);
        if more > 0 {
            println!("  ...and {more} more; see log output.");
        }
    }
    if !summary.skipped.is_empty() {
        println!("Skipped: {}", summary.skipped.len());
    }
}
