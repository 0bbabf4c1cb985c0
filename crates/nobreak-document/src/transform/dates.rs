// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Pass 2 — date-triad fusion: `26 января 1994` becomes one unbreakable unit.

use nobreak_core::Lexicon;
use nobreak_core::error::{NobreakError, Result};
use nobreak_core::types::{NBSP, SubstitutionReport};
use regex::Regex;

/// Fuses both separators of a `<day> <month> <year>` triad.
#[derive(Debug, Clone)]
pub(crate) struct DateRule {
    /// `None` when the lexicon has no months.
    pattern: Option<Regex>,
}

impl DateRule {
    pub(crate) fn new(lexicon: &Lexicon) -> Result<Self> {
        let months = lexicon.months_by_precedence();
        if months.is_empty() {
            return Ok(Self { pattern: None });
        }

        let alternation = months
            .iter()
            .map(|m| regex::escape(m))
            .collect::<Vec<_>>()
            .join("|");
        // A separator may already be a NBSP when the month is also a
        // particle and pass 1 fused it.
        let pattern = Regex::new(&format!(
            r"(?i)([0-9]{{1,2}})([ \x{{a0}}])({alternation})([ \x{{a0}}])([0-9]{{4}})"
        ))
        .map_err(|e| NobreakError::Lexicon(format!("date pattern: {e}")))?;

        Ok(Self {
            pattern: Some(pattern),
        })
    }

    /// Rewrite one character-data segment into `out`; reports the triads
    /// fused and the separators that changed.
    pub(crate) fn fuse(&self, segment: &str, out: &mut String) -> SubstitutionReport {
        let mut report = SubstitutionReport::default();
        let Some(pattern) = &self.pattern else {
            out.push_str(segment);
            return report;
        };

        let mut last = 0;
        for caps in pattern.captures_iter(segment) {
            let Some(whole) = caps.get(0) else { continue };

            // Day and year must be whole numbers, not digits of a longer one.
            let before = segment[..whole.start()].chars().next_back();
            let after = segment[whole.end()..].chars().next();
            if before.is_some_and(|c| c.is_ascii_digit())
                || after.is_some_and(|c| c.is_ascii_digit())
            {
                continue;
            }
            // Already fused: at least one separator must still be ordinary.
            let ordinary = [&caps[2], &caps[4]].iter().filter(|s| **s == " ").count();
            if ordinary == 0 {
                continue;
            }

            out.push_str(&segment[last..whole.start()]);
            out.push_str(&caps[1]);
            out.push(NBSP);
            out.push_str(&caps[3]);
            out.push(NBSP);
            out.push_str(&caps[5]);
            last = whole.end();
            report.dates += 1;
            report.date_separators += ordinary;
        }
        out.push_str(&segment[last..]);
        report
    }
}
