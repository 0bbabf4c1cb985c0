// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Container module — lossless extraction and repacking of .docx packages.

pub mod archive;
pub mod integrity;

pub use archive::{Member, RepackOptions, WorkingSet, extract, repack};
