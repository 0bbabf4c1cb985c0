// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Human-readable error messages for people running the tool on their own
// documents.
//
// Every technical error is mapped to plain language with a clear suggestion.
// The severity drives how the command-line front end presents it.

use crate::error::NobreakError;

/// Severity of an error from the user's perspective.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Disk hiccup or locked file; trying again may work.
    Transient,
    /// User must do something (pick another file, close Word, fix a path).
    ActionRequired,
    /// Retrying will not help: the document itself is the problem.
    Permanent,
}

/// A human-readable error with a plain message and an actionable suggestion.
#[derive(Debug, Clone)]
pub struct HumanError {
    /// Plain summary (first line of output).
    pub message: String,
    /// What the user should try.
    pub suggestion: String,
    /// Severity level.
    pub severity: Severity,
}

/// Convert a `NobreakError` into a `HumanError`.
pub fn humanize_error(err: &NobreakError) -> HumanError {
    match err {
        NobreakError::NotFound { path } => HumanError {
            message: format!("The file {} couldn't be found.", path.display()),
            suggestion: "It may have been moved or deleted. Check the path and try again.".into(),
            severity: Severity::ActionRequired,
        },

        NobreakError::WrongKind { reason, .. } => HumanError {
            message: "This isn't a Word (.docx) document.".into(),
            suggestion: format!(
                "Only .docx files can be processed. Save older .doc files as .docx first. ({reason})"
            ),
            severity: Severity::Permanent,
        },

        NobreakError::InvalidContainer { .. } => HumanError {
            message: "This document is damaged or isn't really a .docx file.".into(),
            suggestion: "Try opening it in Word and saving it again, then run the tool on the new copy.".into(),
            severity: Severity::Permanent,
        },

        NobreakError::MissingPart { part, .. } => HumanError {
            message: "This document is missing part of its contents.".into(),
            suggestion: format!(
                "The package has no `{part}`. Re-save the document from Word and try again."
            ),
            severity: Severity::Permanent,
        },

        NobreakError::UndecodableContent { .. } => HumanError {
            message: "The document's text is stored in an unexpected encoding.".into(),
            suggestion: "Re-save the document from Word as a standard .docx and try again.".into(),
            severity: Severity::Permanent,
        },

        NobreakError::FidelityMismatch { .. } => HumanError {
            message: "The rewritten document didn't pass its final check, so it was not saved.".into(),
            suggestion: "Your original file is untouched. Please report this, attaching the log output.".into(),
            severity: Severity::Permanent,
        },

        NobreakError::Io { source, .. } => match source.kind() {
            std::io::ErrorKind::PermissionDenied => HumanError {
                message: "The tool doesn't have permission to read or write that file.".into(),
                suggestion: "Close the document in Word (an open document is locked), or check the folder permissions.".into(),
                severity: Severity::ActionRequired,
            },
            std::io::ErrorKind::NotFound => HumanError {
                message: "A file or folder needed for the output couldn't be found.".into(),
                suggestion: "Check that the output folder exists and try again.".into(),
                severity: Severity::ActionRequired,
            },
            _ => HumanError {
                message: "There was a problem reading or writing a file.".into(),
                suggestion: "Try again. If this keeps happening, the disk may be full.".into(),
                severity: Severity::Transient,
            },
        },

        NobreakError::Unexpected { detail, .. } => HumanError {
            message: "Something unexpected went wrong with this document.".into(),
            suggestion: format!("Please report it, attaching the log output. ({detail})"),
            severity: Severity::Permanent,
        },

        NobreakError::Lexicon(detail) => HumanError {
            message: "The word list can't be used.".into(),
            suggestion: format!("Fix the entry and try again. ({detail})"),
            severity: Severity::ActionRequired,
        },

        NobreakError::Config(detail) => HumanError {
            message: "The settings file can't be used.".into(),
            suggestion: format!("Fix the settings file or remove it to use the defaults. ({detail})"),
            severity: Severity::ActionRequired,
        },

        NobreakError::Serialization(_) => HumanError {
            message: "A settings or word-list file isn't valid JSON.".into(),
            suggestion: "Word lists must be a JSON array of strings, e.g. [\"в\", \"на\"].".into(),
            severity: Severity::ActionRequired,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn locked_file_is_action_required() {
        let err = NobreakError::io(
            "report.docx",
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "locked"),
        );
        let human = humanize_error(&err);
        assert_eq!(human.severity, Severity::ActionRequired);
    }

    #[test]
    fn damaged_archive_is_permanent() {
        let err = NobreakError::InvalidContainer {
            path: "report.docx".into(),
            detail: "invalid Zip archive".into(),
        };
        assert_eq!(humanize_error(&err).severity, Severity::Permanent);
    }

    #[test]
    fn missing_part_is_named_in_suggestion() {
        let err = NobreakError::MissingPart {
            path: "report.docx".into(),
            part: "word/document.xml".into(),
        };
        let human = humanize_error(&err);
        assert!(human.suggestion.contains("word/document.xml"));
    }

    #[test]
    fn disk_full_is_transient() {
        let err = NobreakError::io("out.docx", std::io::Error::other("no space left on device"));
        assert_eq!(humanize_error(&err).severity, Severity::Transient);
    }
}
