// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Transform engine — converts selected ordinary spaces into NO-BREAK SPACEs.
//
// Two passes run in a fixed order over the character data of the part:
//
//   1. particles: `в доме` → `в\u{a0}доме`
//   2. dates:     `26 января 1994` → `26\u{a0}января\u{a0}1994`
//
// Neither pass ever matches a NBSP in a position it would write one, so the
// transform is idempotent. Markup (`<...>`) is copied through untouched.

mod dates;
mod particles;
mod segments;

use nobreak_core::Lexicon;
use nobreak_core::error::Result;
use nobreak_core::types::SubstitutionReport;

use dates::DateRule;
use particles::ParticleRule;
use segments::rewrite_text;

/// Substitution passes compiled from one lexicon.
///
/// Read-only after construction; share it by reference across threads.
#[derive(Debug, Clone)]
pub struct Transformer {
    particles: ParticleRule,
    dates: DateRule,
}

impl Transformer {
    /// Compile the patterns for `lexicon`.
    pub fn new(lexicon: &Lexicon) -> Result<Self> {
        Ok(Self {
            particles: ParticleRule::new(lexicon)?,
            dates: DateRule::new(lexicon)?,
        })
    }

    /// Pass 1 alone. Returns the new text and the number of separators fused.
    pub fn fuse_particles(&self, text: &str) -> (String, usize) {
        rewrite_text(text, |segment, out| self.particles.fuse(segment, out))
    }

    /// Pass 2 alone. Returns the new text and a report with only the date
    /// counts filled in.
    pub fn fuse_dates(&self, text: &str) -> (String, SubstitutionReport) {
        rewrite_text(text, |segment, out| self.dates.fuse(segment, out))
    }

    /// Both passes, particles first.
    pub fn transform(&self, text: &str) -> (String, SubstitutionReport) {
        let (text, particles) = self.fuse_particles(text);
        let (text, report) = self.fuse_dates(&text);
        (text, SubstitutionReport { particles, ..report })
    }
}
