// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Nobreak — Core types, lexicon and error definitions shared across all crates.

pub mod config;
pub mod error;
pub mod human_errors;
pub mod lexicon;
pub mod types;

pub use config::AppConfig;
pub use error::{ErrorKind, NobreakError};
pub use lexicon::Lexicon;
pub use types::*;
