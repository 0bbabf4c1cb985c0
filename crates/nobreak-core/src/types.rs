// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Core domain types for Nobreak.

use serde::Serialize;

/// Package member holding the content-type manifest.
pub const CONTENT_TYPES_PART: &str = "[Content_Types].xml";

/// Package member holding the document body.
pub const PRIMARY_TEXT_PART: &str = "word/document.xml";

/// Members that must be present for a package to be accepted.
pub const REQUIRED_PARTS: [&str; 2] = [CONTENT_TYPES_PART, PRIMARY_TEXT_PART];

/// NO-BREAK SPACE (U+00A0), the separator written in place of an ordinary
/// space.
pub const NBSP: char = '\u{a0}';

/// Replacement counts for one transformed text.
///
/// Diagnostic only; callers never branch on these values.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SubstitutionReport {
    /// Particle separators fused.
    pub particles: usize,
    /// Date triads fused, including triads where one separator was already
    /// a NBSP.
    pub dates: usize,
    /// Separators inside those triads that were still ordinary spaces.
    /// Two per triad, unless one was already a NBSP.
    pub date_separators: usize,
}

impl SubstitutionReport {
    /// Aggregate separator count: `particles + 2 * dates`.
    ///
    /// Counts two per triad, so it overstates a partly fused triad; see
    /// [`SubstitutionReport::spaces_replaced`] for the exact figure.
    pub fn separators_changed(&self) -> usize {
        self.particles + 2 * self.dates
    }

    /// Spaces actually replaced by a NBSP.
    pub fn spaces_replaced(&self) -> usize {
        self.particles + self.date_separators
    }

    pub fn is_empty(&self) -> bool {
        self.particles == 0 && self.dates == 0
    }
}

impl std::ops::AddAssign for SubstitutionReport {
    fn add_assign(&mut self, other: Self) {
        self.particles += other.particles;
        self.dates += other.dates;
        self.date_separators += other.date_separators;
    }
}

impl std::fmt::Display for SubstitutionReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} spaces replaced ({} after particles, {} dates)",
            self.spaces_replaced(),
            self.particles,
            self.dates
        )
    }
}
