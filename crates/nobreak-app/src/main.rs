// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Nobreak — non-breaking-space normalization for .docx documents
//
// Entry point. Initialises logging, loads settings and the lexicon, then runs
// the requested subcommand. Exit code 0 means every document was written.

mod cli;
mod commands;

use std::process::ExitCode;

use clap::Parser;
use nobreak_core::error::Result;
use nobreak_core::human_errors::humanize_error;
use nobreak_document::Transformer;

use cli::{Cli, Command};

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    tracing::debug!(?cli, "Nobreak starting");

    match run(cli).await {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(err) => {
            tracing::error!(error = %err, kind = %err.kind(), "run failed");
            let human = humanize_error(&err);
            eprintln!("{}", human.message);
            eprintln!("  {}", human.suggestion);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<bool> {
    let config = cli.settings()?;

    match cli.command {
        Command::Lexicon => commands::lexicon(&config),
        Command::Process { input, output } => {
            let transformer = Transformer::new(&config.lexicon()?)?;
            commands::process(&config, transformer, input, output).await
        }
        Command::Batch { paths, output } => {
            let transformer = Transformer::new(&config.lexicon()?)?;
            commands::batch(&config, transformer, &paths, output).await
        }
    }
}
