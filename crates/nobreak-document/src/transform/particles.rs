// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Pass 1 — particle-space fusion.

use nobreak_core::Lexicon;
use nobreak_core::error::{NobreakError, Result};
use nobreak_core::types::NBSP;
use regex::Regex;

/// Fuses the ordinary space after a whole-word particle into a NBSP.
#[derive(Debug, Clone)]
pub(crate) struct ParticleRule {
    /// `None` when the lexicon has no particles.
    pattern: Option<Regex>,
}

impl ParticleRule {
    pub(crate) fn new(lexicon: &Lexicon) -> Result<Self> {
        let tokens = lexicon.particles_by_precedence();
        if tokens.is_empty() {
            return Ok(Self { pattern: None });
        }

        let alternation = tokens
            .iter()
            .map(|t| regex::escape(t))
            .collect::<Vec<_>>()
            .join("|");
        let pattern = Regex::new(&format!(r"(?i)\b(?:{alternation}) "))
            .map_err(|e| NobreakError::Lexicon(format!("particle pattern: {e}")))?;

        Ok(Self {
            pattern: Some(pattern),
        })
    }

    /// Rewrite one character-data segment into `out`; returns the number of
    /// separators fused.
    pub(crate) fn fuse(&self, segment: &str, out: &mut String) -> usize {
        let Some(pattern) = &self.pattern else {
            out.push_str(segment);
            return 0;
        };

        let mut last = 0;
        let mut count = 0;
        for found in pattern.find_iter(segment) {
            if is_hyphenated_tail(&segment[..found.start()]) {
                continue;
            }
            // The match always ends with the single ASCII space.
            let space = found.end() - 1;
            out.push_str(&segment[last..space]);
            out.push(NBSP);
            last = found.end();
            count += 1;
        }
        out.push_str(&segment[last..]);
        count
    }
}

/// A token right after a hyphen is the tail of a compound (`что-то`), not a
/// word of its own.
fn is_hyphenated_tail(before: &str) -> bool {
    matches!(before.chars().next_back(), Some('-' | '\u{2010}' | '\u{2011}'))
}
