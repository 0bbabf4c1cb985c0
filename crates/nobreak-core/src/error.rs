// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Unified error types for Nobreak.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Top-level error type for all Nobreak operations.
#[derive(Debug, Error)]
pub enum NobreakError {
    // -- Input errors --
    #[error("input not found: {}", path.display())]
    NotFound { path: PathBuf },

    #[error("{} is not a supported document: {reason}", path.display())]
    WrongKind { path: PathBuf, reason: String },

    // -- Container errors --
    #[error("{} is not a readable archive: {detail}", path.display())]
    InvalidContainer { path: PathBuf, detail: String },

    #[error("{} is missing required part `{part}`", path.display())]
    MissingPart { path: PathBuf, part: String },

    #[error("part `{part}` in {} is not valid UTF-8: {source}", path.display())]
    UndecodableContent {
        path: PathBuf,
        part: String,
        #[source]
        source: std::string::FromUtf8Error,
    },

    #[error("output {} does not match its working set: {detail}", path.display())]
    FidelityMismatch { path: PathBuf, detail: String },

    // -- Storage --
    #[error("file I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("unexpected failure while processing {}: {detail}", path.display())]
    Unexpected { path: PathBuf, detail: String },

    // -- Configuration --
    #[error("invalid lexicon: {0}")]
    Lexicon(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Coarse failure classification reported to callers and batch summaries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorKind {
    /// The input path does not exist.
    NotFound,
    /// The input is not the expected document kind (extension).
    WrongKind,
    /// The archive cannot be opened or lacks required members.
    CorruptContainer,
    /// The primary text part is not valid UTF-8.
    UndecodableContent,
    /// Read, write or permission failure.
    IoFailure,
    /// Anything that does not fit the kinds above.
    Unexpected,
}

impl ErrorKind {
    pub fn label(&self) -> &'static str {
        match self {
            Self::NotFound => "not found",
            Self::WrongKind => "wrong kind",
            Self::CorruptContainer => "corrupt container",
            Self::UndecodableContent => "undecodable content",
            Self::IoFailure => "I/O failure",
            Self::Unexpected => "unexpected",
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

impl NobreakError {
    /// Build an [`NobreakError::Io`] for `path`.
    pub fn io(path: impl AsRef<Path>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    /// Classify this error into one of the reported kinds.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::NotFound { .. } => ErrorKind::NotFound,
            Self::WrongKind { .. } => ErrorKind::WrongKind,
            Self::InvalidContainer { .. } | Self::MissingPart { .. } => {
                ErrorKind::CorruptContainer
            }
            Self::UndecodableContent { .. } => ErrorKind::UndecodableContent,
            Self::Io { .. } => ErrorKind::IoFailure,
            Self::FidelityMismatch { .. }
            | Self::Unexpected { .. }
            | Self::Lexicon(_)
            | Self::Config(_)
            | Self::Serialization(_) => ErrorKind::Unexpected,
        }
    }

    /// The offending path, when the error is tied to one.
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::NotFound { path }
            | Self::WrongKind { path, .. }
            | Self::InvalidContainer { path, .. }
            | Self::MissingPart { path, .. }
            | Self::UndecodableContent { path, .. }
            | Self::FidelityMismatch { path, .. }
            | Self::Io { path, .. }
            | Self::Unexpected { path, .. } => Some(path),
            Self::Lexicon(_) | Self::Config(_) | Self::Serialization(_) => None,
        }
    }
}

/// Alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, NobreakError>;
