// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Package validation — fail fast, before anything is extracted or written.

use std::path::Path;

use nobreak_core::config::has_accepted_extension;
use nobreak_core::error::{NobreakError, Result};
use nobreak_core::types::REQUIRED_PARTS;
use tracing::{debug, instrument};

use crate::container::archive::open_archive;

/// Check that `input` exists, carries an accepted extension, opens as a zip
/// archive, and contains every required part.
///
/// Only reads; nothing is extracted or written.
#[instrument(skip(extensions), fields(path = %input.display()))]
pub fn validate(input: &Path, extensions: &[String]) -> Result<()> {
    if !input.exists() {
        return Err(NobreakError::NotFound {
            path: input.to_path_buf(),
        });
    }

    if !has_accepted_extension(input, extensions) {
        let extension = input.extension().map(|e| e.to_string_lossy()).unwrap_or_default();
        return Err(NobreakError::WrongKind {
            path: input.to_path_buf(),
            reason: if extension.is_empty() {
                "file has no extension".into()
            } else {
                format!("extension `.{extension}` is not one of {extensions:?}")
            },
        });
    }

    let archive = open_archive(input)?;
    for part in REQUIRED_PARTS {
        if !archive.file_names().any(|name| name == part) {
            return Err(NobreakError::MissingPart {
                path: input.to_path_buf(),
                part: part.to_owned(),
            });
        }
    }

    debug!(members = archive.len(), "package is valid");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{write_archive, write_docx};
    use nobreak_core::ErrorKind;

    fn docx_only() -> Vec<String> {
        vec!["docx".to_owned()]
    }

    #[test]
    fn well_formed_package_passes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ok.docx");
        write_docx(&path, "в доме");
        assert!(validate(&path, &docx_only()).is_ok());
    }

    #[test]
    fn extension_check_ignores_case() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("OK.DOCX");
        write_docx(&path, "в доме");
        assert!(validate(&path, &docx_only()).is_ok());
    }

    #[test]
    fn absent_file_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let err = validate(&dir.path().join("nope.docx"), &docx_only()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[test]
    fn wrong_extension_is_wrong_kind() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.txt");
        std::fs::write(&path, "в доме").unwrap();
        let err = validate(&path, &docx_only()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::WrongKind);
    }

    #[test]
    fn garbage_is_corrupt_container() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.docx");
        std::fs::write(&path, b"PK but not really").unwrap();
        let err = validate(&path, &docx_only()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::CorruptContainer);
    }

    #[test]
    fn missing_document_part_is_named() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("hollow.docx");
        write_archive(&path, &[("[Content_Types].xml", b"<Types/>")]);

        match validate(&path, &docx_only()).unwrap_err() {
            NobreakError::MissingPart { part, .. } => assert_eq!(part, "word/document.xml"),
            other => panic!("unexpected error variant: {other}"),
        }
    }

    #[test]
    fn missing_manifest_is_named() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("hollow.docx");
        write_archive(&path, &[("word/document.xml", b"<w:document/>")]);

        match validate(&path, &docx_only()).unwrap_err() {
            NobreakError::MissingPart { part, .. } => assert_eq!(part, "[Content_Types].xml"),
            other => panic!("unexpected error variant: {other}"),
        }
    }
}
