// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Command-line surface.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use nobreak_core::AppConfig;
use nobreak_core::error::Result;

#[derive(Debug, Parser)]
#[command(name = "nobreak", version, about = "Bind short words and dates with non-breaking spaces in .docx files")]
pub struct Cli {
    /// JSON settings file.
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// JSON array of particles replacing the built-in list.
    #[arg(long, global = true, value_name = "FILE")]
    pub particles: Option<PathBuf>,

    /// JSON array of month names replacing the built-in list.
    #[arg(long, global = true, value_name = "FILE")]
    pub months: Option<PathBuf>,

    /// Skip re-reading written archives before moving them into place.
    #[arg(long, global = true)]
    pub no_verify: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Normalize a single document.
    Process {
        input: PathBuf,
        /// Output file. Defaults to `<input dir>/output_files/<name>`.
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Normalize every document given, or found directly inside the given
    /// directories.
    Batch {
        #[arg(required = true)]
        paths: Vec<PathBuf>,
        /// Output directory. Defaults to `output_files` in the common parent.
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Print the effective lexicon as JSON.
    Lexicon,
}

impl Cli {
    /// Settings file (or defaults) with command-line overrides applied.
    pub fn settings(&self) -> Result<AppConfig> {
        let mut config = match &self.config {
            Some(path) => AppConfig::load(path)?,
            None => AppConfig::default(),
        };
        if let Some(path) = &self.particles {
            config.particles_file = Some(path.clone());
        }
        if let Some(path) = &self.months {
            config.months_file = Some(path.clone());
        }
        if self.no_verify {
            config.verify_output = false;
        }
        config.validate()?;
        Ok(config)
    }
}
