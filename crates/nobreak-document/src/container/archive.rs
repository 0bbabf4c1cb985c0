// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Archive I/O — extract a zip package into an in-memory working set and
// write a working set back out as a new package.
//
// The working set is owned by a single run, so concurrent runs never share
// scratch state. Output is written to a temporary file beside the target and
// renamed into place only once the archive is complete.

use std::fs::File;
use std::io::{Read, Seek, Write};
use std::path::{Path, PathBuf};

use nobreak_core::error::{NobreakError, Result};
use tracing::{debug, info, instrument};
use zip::CompressionMethod;
use zip::result::ZipError;
use zip::write::SimpleFileOptions;

use super::integrity;

/// One package member, held in memory with the metadata needed to write it
/// back.
#[derive(Debug, Clone)]
pub struct Member {
    name: String,
    data: Vec<u8>,
    compression: CompressionMethod,
    is_dir: bool,
    unix_mode: Option<u32>,
}

impl Member {
    /// Member name exactly as stored in the archive.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Uncompressed member bytes.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn compression(&self) -> CompressionMethod {
        self.compression
    }

    pub fn is_dir(&self) -> bool {
        self.is_dir
    }
}

/// Every member of one package, in archive order.
#[derive(Debug, Clone)]
pub struct WorkingSet {
    source: PathBuf,
    members: Vec<Member>,
}

impl WorkingSet {
    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn members(&self) -> &[Member] {
        &self.members
    }

    pub fn get(&self, name: &str) -> Option<&Member> {
        self.members.iter().find(|m| m.name == name)
    }

    /// Decode the named member as UTF-8 text.
    pub fn decode_text(&self, name: &str) -> Result<String> {
        let member = self.get(name).ok_or_else(|| self.missing(name))?;
        String::from_utf8(member.data.clone()).map_err(|source| {
            NobreakError::UndecodableContent {
                path: self.source.clone(),
                part: name.to_owned(),
                source,
            }
        })
    }

    /// Replace the named member's bytes wholesale. Name, position and
    /// compression method are kept.
    pub fn replace(&mut self, name: &str, data: Vec<u8>) -> Result<()> {
        let source = &self.source;
        let member = self
            .members
            .iter_mut()
            .find(|m| m.name == name)
            .ok_or_else(|| NobreakError::MissingPart {
                path: source.clone(),
                part: name.to_owned(),
            })?;
        debug!(part = name, old_len = member.data.len(), new_len = data.len(), "member replaced");
        member.data = data;
        Ok(())
    }

    fn missing(&self, name: &str) -> NobreakError {
        NobreakError::MissingPart {
            path: self.source.clone(),
            part: name.to_owned(),
        }
    }
}

/// Options for [`repack`].
#[derive(Debug, Clone, Copy)]
pub struct RepackOptions {
    /// Re-read the written archive and compare every member before it is
    /// moved into place.
    pub verify: bool,
}

impl Default for RepackOptions {
    fn default() -> Self {
        Self { verify: true }
    }
}

// -- Extraction ---------------------------------------------------------------

/// Read every member of the archive at `input` into memory.
#[instrument(skip_all, fields(path = %input.display()))]
pub fn extract(input: &Path) -> Result<WorkingSet> {
    let mut archive = open_archive(input)?;
    let mut members = Vec::with_capacity(archive.len());

    for index in 0..archive.len() {
        let mut entry = archive
            .by_index(index)
            .map_err(|err| read_error(input, err))?;

        let mut data = Vec::with_capacity(capacity_hint(entry.size()));
        entry
            .read_to_end(&mut data)
            .map_err(|err| read_error(input, ZipError::Io(err)))?;

        members.push(Member {
            name: entry.name().to_owned(),
            data,
            compression: entry.compression(),
            is_dir: entry.is_dir(),
            unix_mode: entry.unix_mode(),
        });
    }

    info!(members = members.len(), "package extracted");
    Ok(WorkingSet {
        source: input.to_path_buf(),
        members,
    })
}

/// Largest buffer reserved up front for one member.
const MAX_PREALLOCATION: u64 = 1 << 20;

/// Initial buffer size for a member whose header declares `declared`
/// uncompressed bytes. Headers are untrusted, so the hint is capped and the
/// buffer grows with the bytes actually read.
pub(crate) fn capacity_hint(declared: u64) -> usize {
    usize::try_from(declared.min(MAX_PREALLOCATION)).unwrap_or(0)
}

/// Open `path` as a zip archive for reading.
pub(crate) fn open_archive(path: &Path) -> Result<zip::ZipArchive<File>> {
    let file = File::open(path).map_err(|err| {
        if err.kind() == std::io::ErrorKind::NotFound {
            NobreakError::NotFound {
                path: path.to_path_buf(),
            }
        } else {
            NobreakError::io(path, err)
        }
    })?;
    zip::ZipArchive::new(file).map_err(|err| read_error(path, err))
}

/// Classify a failure while reading an archive.
///
/// Checksum mismatches and truncated entries surface from the zip reader as
/// `InvalidData`/`UnexpectedEof` I/O errors; those are corruption, not
/// storage failures.
pub(crate) fn read_error(path: &Path, err: ZipError) -> NobreakError {
    match err {
        ZipError::Io(io_err)
            if matches!(
                io_err.kind(),
                std::io::ErrorKind::InvalidData | std::io::ErrorKind::UnexpectedEof
            ) =>
        {
            NobreakError::InvalidContainer {
                path: path.to_path_buf(),
                detail: io_err.to_string(),
            }
        }
        ZipError::Io(io_err) => NobreakError::io(path, io_err),
        other => NobreakError::InvalidContainer {
            path: path.to_path_buf(),
            detail: other.to_string(),
        },
    }
}

// -- Repacking ----------------------------------------------------------------

/// Write every member of `set` to a new archive at `output`.
///
/// Nothing appears at `output` unless the whole archive was written (and,
/// with [`RepackOptions::verify`], read back and matched). A previous file at
/// `output` is replaced atomically or left untouched.
#[instrument(skip_all, fields(output = %output.display(), members = set.len()))]
pub fn repack(set: &WorkingSet, output: &Path, options: &RepackOptions) -> Result<()> {
    let parent = output
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));

    // Dropping the temporary on any early return deletes it.
    let mut temp = tempfile::Builder::new()
        .prefix(".nobreak-")
        .suffix(".part")
        .tempfile_in(parent)
        .map_err(|err| NobreakError::io(output, err))?;

    write_archive(set, temp.as_file_mut(), output)?;
    temp.as_file()
        .sync_all()
        .map_err(|err| NobreakError::io(output, err))?;

    if options.verify {
        integrity::verify_archive(set, temp.path(), output)?;
    }

    temp.persist(output)
        .map_err(|err| NobreakError::io(output, err.error))?;

    info!("package written");
    Ok(())
}

/// Serialise `set` into `writer` as a zip archive.
fn write_archive<W: Write + Seek>(set: &WorkingSet, writer: W, output: &Path) -> Result<()> {
    let mut zip = zip::ZipWriter::new(writer);

    for member in &set.members {
        let mut options =
            SimpleFileOptions::default().compression_method(write_method(member.compression));
        if let Some(mode) = member.unix_mode {
            options = options.unix_permissions(mode);
        }

        if member.is_dir {
            zip.add_directory(member.name.as_str(), options)
                .map_err(|err| write_error(output, err))?;
            continue;
        }

        zip.start_file(member.name.as_str(), options)
            .map_err(|err| write_error(output, err))?;
        zip.write_all(&member.data)
            .map_err(|err| NobreakError::io(output, err))?;
    }

    zip.finish().map_err(|err| write_error(output, err))?;
    Ok(())
}

/// Stored members stay stored; everything else is written deflated, the
/// only other method Word packages use.
fn write_method(method: CompressionMethod) -> CompressionMethod {
    match method {
        CompressionMethod::Stored => CompressionMethod::Stored,
        _ => CompressionMethod::Deflated,
    }
}

fn write_error(output: &Path, err: ZipError) -> NobreakError {
    match err {
        ZipError::Io(io_err) => NobreakError::io(output, io_err),
        other => NobreakError::Unexpected {
            path: output.to_path_buf(),
            detail: format!("archive writer: {other}"),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{IMAGE_BYTES, read_members, write_archive, write_docx};
    use nobreak_core::ErrorKind;
    use nobreak_core::types::PRIMARY_TEXT_PART;

    #[test]
    fn capacity_hint_is_capped() {
        assert_eq!(capacity_hint(0), 0);
        assert_eq!(capacity_hint(4096), 4096);
        assert_eq!(capacity_hint(0xFFFF_FFF0), 1 << 20);
        assert_eq!(capacity_hint(u64::MAX), 1 << 20);
    }

    #[test]
    fn inflated_size_headers_do_not_reserve_memory() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("lying.docx");
        let names: Vec<String> = (0..40).map(|i| format!("part{i}.bin")).collect();
        let members: Vec<(&str, &[u8])> =
            names.iter().map(|n| (n.as_str(), b"x".as_slice())).collect();
        write_archive(&input, &members);

        // Every central-directory record claims ~4 GiB uncompressed.
        let mut bytes = std::fs::read(&input).unwrap();
        let mut patched = 0;
        let mut at = 0;
        while let Some(i) = bytes[at..].windows(4).position(|w| w == b"PK\x01\x02") {
            let record = at + i;
            bytes[record + 24..record + 28].copy_from_slice(&0xFFFF_FFF0u32.to_le_bytes());
            patched += 1;
            at = record + 4;
        }
        assert_eq!(patched, 40);
        std::fs::write(&input, &bytes).unwrap();

        match extract(&input) {
            Ok(set) => {
                assert_eq!(set.len(), 40);
                for member in set.members() {
                    assert_eq!(member.data(), b"x");
                    assert!(member.data.capacity() <= 1 << 20);
                }
            }
            Err(err) => assert_eq!(err.kind(), ErrorKind::CorruptContainer),
        }
    }

    #[test]
    fn extract_keeps_every_member_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("in.docx");
        write_docx(&input, "в доме");

        let set = extract(&input).unwrap();
        let names: Vec<&str> = set.members().iter().map(Member::name).collect();
        assert_eq!(
            names,
            vec![
                "[Content_Types].xml",
                "_rels/.rels",
                "word/document.xml",
                "word/media/",
                "word/media/image1.png",
            ]
        );
        assert!(set.get("word/media/").unwrap().is_dir());
        assert_eq!(set.get("word/media/image1.png").unwrap().data(), IMAGE_BYTES);
        assert_eq!(
            set.get("word/media/image1.png").unwrap().compression(),
            CompressionMethod::Stored
        );
    }

    #[test]
    fn repack_round_trips_members_byte_for_byte() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("in.docx");
        let output = dir.path().join("out.docx");
        write_docx(&input, "ничего");

        let set = extract(&input).unwrap();
        repack(&set, &output, &RepackOptions::default()).unwrap();

        assert_eq!(read_members(&input), read_members(&output));
    }

    #[test]
    fn replace_changes_only_the_named_member() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("in.docx");
        let output = dir.path().join("out.docx");
        write_docx(&input, "text");

        let mut set = extract(&input).unwrap();
        set.replace(PRIMARY_TEXT_PART, b"<w:document/>".to_vec())
            .unwrap();
        repack(&set, &output, &RepackOptions::default()).unwrap();

        let before = read_members(&input);
        let after = read_members(&output);
        assert_eq!(before.len(), after.len());
        for ((name_a, data_a), (name_b, data_b)) in before.iter().zip(&after) {
            assert_eq!(name_a, name_b);
            if name_a == PRIMARY_TEXT_PART {
                assert_eq!(data_b, b"<w:document/>");
            } else {
                assert_eq!(data_a, data_b);
            }
        }
    }

    #[test]
    fn replace_unknown_member_is_missing_part() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("in.docx");
        write_docx(&input, "text");

        let mut set = extract(&input).unwrap();
        let err = set.replace("word/nope.xml", Vec::new()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::CorruptContainer);
    }

    #[test]
    fn non_utf8_part_is_undecodable() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("in.docx");
        write_archive(
            &input,
            &[
                ("[Content_Types].xml", b"<Types/>"),
                ("word/document.xml", &[0xff, 0xfe, 0x00, 0x41]),
            ],
        );

        let set = extract(&input).unwrap();
        let err = set.decode_text(PRIMARY_TEXT_PART).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UndecodableContent);
    }

    #[test]
    fn extract_rejects_non_archive() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("in.docx");
        std::fs::write(&input, b"definitely not a zip file").unwrap();

        let err = extract(&input).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::CorruptContainer);
    }

    #[test]
    fn failed_persist_leaves_no_temporary_behind() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("in.docx");
        write_docx(&input, "text");
        // A directory at the output path makes the final rename fail after
        // the archive has been fully written.
        let output = dir.path().join("blocked.docx");
        std::fs::create_dir(&output).unwrap();

        let set = extract(&input).unwrap();
        let err = repack(&set, &output, &RepackOptions::default()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::IoFailure);

        assert!(output.is_dir());
        let leftovers: Vec<_> = std::fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .filter(|name| name.ends_with(".part"))
            .collect();
        assert!(leftovers.is_empty(), "temporary files left: {leftovers:?}");
    }

    #[test]
    fn missing_output_directory_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("in.docx");
        write_docx(&input, "text");
        let output = dir.path().join("absent").join("out.docx");

        let set = extract(&input).unwrap();
        let err = repack(&set, &output, &RepackOptions::default()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::IoFailure);
        assert!(!output.exists());
    }

    #[test]
    fn failed_repack_keeps_previous_output() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("in.docx");
        let output = dir.path().join("out.docx");
        write_docx(&input, "первый");

        let mut set = extract(&input).unwrap();
        repack(&set, &output, &RepackOptions::default()).unwrap();
        let previous = std::fs::read(&output).unwrap();

        // A duplicated member name makes the archive writer fail mid-stream,
        // after earlier members have already been written.
        let duplicate = set.members[0].clone();
        set.members.push(duplicate);
        assert!(repack(&set, &output, &RepackOptions::default()).is_err());

        assert_eq!(std::fs::read(&output).unwrap(), previous);
        let leftovers = std::fs::read_dir(dir.path())
            .unwrap()
            .filter(|e| {
                e.as_ref()
                    .unwrap()
                    .file_name()
                    .to_string_lossy()
                    .ends_with(".part")
            })
            .count();
        assert_eq!(leftovers, 0);
    }
}
