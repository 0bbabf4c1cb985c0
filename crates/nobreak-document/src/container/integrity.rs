// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Package integrity — SHA-256 fingerprints of member bytes, used to prove a
// written archive holds exactly the working set it was built from.

use std::io::Read;
use std::path::Path;

use nobreak_core::error::{NobreakError, Result};
use sha2::{Digest, Sha256};
use tracing::{debug, instrument};

use super::archive::{WorkingSet, capacity_hint, open_archive, read_error};

/// Compute the SHA-256 hash of `data` and return it as a lowercase hex string.
pub fn hash_bytes(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hex::encode(hasher.finalize())
}

/// `(name, sha256)` for every member of `set`, in archive order.
pub fn fingerprint(set: &WorkingSet) -> Vec<(String, String)> {
    set.members()
        .iter()
        .map(|m| (m.name().to_owned(), hash_bytes(m.data())))
        .collect()
}

/// Re-read the archive at `archive_path` and check it holds exactly the
/// members of `set`, in the same order, with identical bytes.
///
/// `reported_path` is the path named in any error (the final output, not the
/// temporary being checked).
#[instrument(skip_all, fields(archive = %archive_path.display()))]
pub fn verify_archive(set: &WorkingSet, archive_path: &Path, reported_path: &Path) -> Result<()> {
    let mismatch = |detail: String| NobreakError::FidelityMismatch {
        path: reported_path.to_path_buf(),
        detail,
    };

    let mut archive = open_archive(archive_path)?;
    if archive.len() != set.len() {
        return Err(mismatch(format!(
            "expected {} members, found {}",
            set.len(),
            archive.len()
        )));
    }

    for (index, (name, expected)) in fingerprint(set).into_iter().enumerate() {
        let mut entry = archive
            .by_index(index)
            .map_err(|err| read_error(reported_path, err))?;
        if entry.name() != name {
            return Err(mismatch(format!(
                "member #{index} is `{}`, expected `{name}`",
                entry.name()
            )));
        }

        let mut data = Vec::with_capacity(capacity_hint(entry.size()));
        entry
            .read_to_end(&mut data)
            .map_err(|err| read_error(reported_path, zip::result::ZipError::Io(err)))?;
        let actual = hash_bytes(&data);
        if actual != expected {
            return Err(mismatch(format!(
                "member `{name}` hashes to {actual}, expected {expected}"
            )));
        }
    }

    debug!(members = set.len(), "written package verified");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::container::archive::extract;
    use crate::test_support::{write_archive, write_docx};

    #[test]
    fn hash_known_value() {
        // SHA-256("hello")
        let expected = "2cf24dba5fb0a30e26e83b2ac5b9e29e1b161e5c1fa7425e73043362938b9824";
        assert_eq!(hash_bytes(b"hello"), expected);
    }

    #[test]
    fn archive_matches_its_own_extraction() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("doc.docx");
        write_docx(&path, "в доме");

        let set = extract(&path).unwrap();
        assert!(verify_archive(&set, &path, &path).is_ok());
    }

    #[test]
    fn changed_member_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let original = dir.path().join("a.docx");
        let altered = dir.path().join("b.docx");
        write_archive(&original, &[("[Content_Types].xml", b"<Types/>"), ("word/document.xml", b"one")]);
        write_archive(&altered, &[("[Content_Types].xml", b"<Types/>"), ("word/document.xml", b"two")]);

        let set = extract(&original).unwrap();
        match verify_archive(&set, &altered, &altered).unwrap_err() {
            NobreakError::FidelityMismatch { detail, .. } => {
                assert!(detail.contains("word/document.xml"));
            }
            other => panic!("unexpected error variant: {other}"),
        }
    }

    #[test]
    fn missing_member_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let original = dir.path().join("a.docx");
        let shorter = dir.path().join("b.docx");
        write_archive(&original, &[("[Content_Types].xml", b"<Types/>"), ("word/document.xml", b"x")]);
        write_archive(&shorter, &[("[Content_Types].xml", b"<Types/>")]);

        let set = extract(&original).unwrap();
        assert!(matches!(
            verify_archive(&set, &shorter, &shorter),
            Err(NobreakError::FidelityMismatch { .. })
        ));
    }
}
