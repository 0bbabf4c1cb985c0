// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Fixture builders shared by the unit tests in this crate.

use std::io::{Read, Write};
use std::path::Path;

use zip::CompressionMethod;
use zip::write::SimpleFileOptions;

pub(crate) const CONTENT_TYPES: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="xml" ContentType="application/xml"/></Types>"#;

pub(crate) const RELS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"/>"#;

/// Bytes that are not valid UTF-8 and look nothing like XML.
pub(crate) const IMAGE_BYTES: &[u8] = &[0x89, b'P', b'N', b'G', 0x0d, 0x0a, 0x1a, 0x0a, 0xff, 0x00, 0xfe];

/// Wrap `text` in a minimal WordprocessingML body.
pub(crate) fn document_xml(text: &str) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:body><w:p><w:r><w:t xml:space="preserve">{text}</w:t></w:r></w:p></w:body></w:document>"#
    )
}

/// Write an archive containing exactly `members`, deflated, in order.
pub(crate) fn write_archive(path: &Path, members: &[(&str, &[u8])]) {
    let file = std::fs::File::create(path).unwrap();
    let mut writer = zip::ZipWriter::new(file);
    for (name, data) in members {
        let options =
            SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
        writer.start_file(*name, options).unwrap();
        writer.write_all(data).unwrap();
    }
    writer.finish().unwrap();
}

/// Write a small but complete .docx whose body holds `text`.
///
/// The media member is stored uncompressed so that the fixtures exercise
/// both compression methods.
pub(crate) fn write_docx(path: &Path, text: &str) {
    let file = std::fs::File::create(path).unwrap();
    let mut writer = zip::ZipWriter::new(file);
    let deflated = || SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
    let stored = || SimpleFileOptions::default().compression_method(CompressionMethod::Stored);

    writer.start_file("[Content_Types].xml", deflated()).unwrap();
    writer.write_all(CONTENT_TYPES.as_bytes()).unwrap();
    writer.start_file("_rels/.rels", deflated()).unwrap();
    writer.write_all(RELS.as_bytes()).unwrap();
    writer.start_file("word/document.xml", deflated()).unwrap();
    writer.write_all(document_xml(text).as_bytes()).unwrap();
    writer.add_directory("word/media/", stored()).unwrap();
    writer.start_file("word/media/image1.png", stored()).unwrap();
    writer.write_all(IMAGE_BYTES).unwrap();
    writer.finish().unwrap();
}

/// Read every member of the archive at `path`, in archive order.
pub(crate) fn read_members(path: &Path) -> Vec<(String, Vec<u8>)> {
    let file = std::fs::File::open(path).unwrap();
    let mut archive = zip::ZipArchive::new(file).unwrap();
    let mut members = Vec::with_capacity(archive.len());
    for index in 0..archive.len() {
        let mut entry = archive.by_index(index).unwrap();
        let mut data = Vec::new();
        entry.read_to_end(&mut data).unwrap();
        members.push((entry.name().to_owned(), data));
    }
    members
}

/// Read one member's bytes as UTF-8 text.
pub(crate) fn read_member_text(path: &Path, name: &str) -> String {
    read_members(path)
        .into_iter()
        .find(|(member, _)| member == name)
        .map(|(_, data)| String::from_utf8(data).unwrap())
        .unwrap()
}
