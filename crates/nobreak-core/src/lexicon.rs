// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Lexicon — the particle and month token sets that drive substitution.
//
// A lexicon is an immutable snapshot: callers build one per run (from the
// built-in defaults or from JSON word lists) and hand it to the transform
// engine. Nothing inside the engine falls back to a global default.

use std::collections::BTreeSet;
use std::path::Path;

use serde::Serialize;
use tracing::{debug, instrument};

use crate::error::{NobreakError, Result};

/// Russian prepositions, conjunctions and particles whose trailing space
/// should not wrap.
pub const DEFAULT_PARTICLES: &[&str] = &[
    "в", "во", "на", "к", "ко", "с", "со", "из", "от", "у", "о", "об", "про", "за", "над", "под",
    "при", "без", "до", "для", "через", "между", "по", "около", "из-за", "из-под", "не", "то",
    "и",
];

/// Month names in the nominative and genitive case.
pub const DEFAULT_MONTHS: &[&str] = &[
    "январь", "февраль", "март", "апрель", "май", "июнь", "июль", "август", "сентябрь",
    "октябрь", "ноябрь", "декабрь", "января", "февраля", "марта", "апреля", "мая", "июня",
    "июля", "августа", "сентября", "октября", "ноября", "декабря",
];

/// Case-normalized particle and month token sets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Lexicon {
    particles: BTreeSet<String>,
    months: BTreeSet<String>,
}

impl Lexicon {
    /// Build a lexicon from raw token lists.
    ///
    /// Tokens are trimmed and lower-cased; duplicates collapse. A token must
    /// be non-empty, contain no whitespace, and start and end with an
    /// alphanumeric character so that whole-word matching is well defined.
    pub fn new<P, M>(particles: P, months: M) -> Result<Self>
    where
        P: IntoIterator,
        P::Item: AsRef<str>,
        M: IntoIterator,
        M::Item: AsRef<str>,
    {
        Ok(Self {
            particles: normalize_set("particle", particles)?,
            months: normalize_set("month", months)?,
        })
    }

    /// The built-in Russian lexicon.
    pub fn default_russian() -> Self {
        Self {
            particles: DEFAULT_PARTICLES.iter().map(|t| (*t).to_owned()).collect(),
            months: DEFAULT_MONTHS.iter().map(|t| (*t).to_owned()).collect(),
        }
    }

    /// Load word lists stored as JSON arrays of strings.
    ///
    /// A list that is not supplied falls back to the corresponding built-in
    /// default.
    #[instrument(skip_all)]
    pub fn from_json_files(particles: Option<&Path>, months: Option<&Path>) -> Result<Self> {
        let particles = match particles {
            Some(path) => read_word_list(path)?,
            None => DEFAULT_PARTICLES.iter().map(|t| (*t).to_owned()).collect(),
        };
        let months = match months {
            Some(path) => read_word_list(path)?,
            None => DEFAULT_MONTHS.iter().map(|t| (*t).to_owned()).collect(),
        };
        Self::new(particles, months)
    }

    pub fn particles(&self) -> impl Iterator<Item = &str> {
        self.particles.iter().map(String::as_str)
    }

    pub fn months(&self) -> impl Iterator<Item = &str> {
        self.months.iter().map(String::as_str)
    }

    /// Particles in pattern-alternation order: longest first, then
    /// lexicographic. With leftmost-first alternation this makes a longer
    /// entry win over a shorter one starting at the same position.
    pub fn particles_by_precedence(&self) -> Vec<&str> {
        by_precedence(&self.particles)
    }

    /// Months in pattern-alternation order (see [`Lexicon::particles_by_precedence`]).
    pub fn months_by_precedence(&self) -> Vec<&str> {
        by_precedence(&self.months)
    }
}

fn by_precedence(set: &BTreeSet<String>) -> Vec<&str> {
    let mut tokens: Vec<&str> = set.iter().map(String::as_str).collect();
    tokens.sort_by(|a, b| {
        b.chars()
            .count()
            .cmp(&a.chars().count())
            .then_with(|| a.cmp(b))
    });
    tokens
}

fn normalize_set<I>(what: &str, tokens: I) -> Result<BTreeSet<String>>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    let mut set = BTreeSet::new();
    let mut seen = 0usize;
    for raw in tokens {
        seen += 1;
        let token = raw.as_ref().trim().to_lowercase();
        validate_token(what, raw.as_ref(), &token)?;
        set.insert(token);
    }
    if seen != set.len() {
        debug!(what, duplicates = seen - set.len(), "collapsed duplicate tokens");
    }
    Ok(set)
}

fn validate_token(what: &str, raw: &str, token: &str) -> Result<()> {
    let (Some(first), Some(last)) = (token.chars().next(), token.chars().next_back()) else {
        return Err(NobreakError::Lexicon(format!("empty {what} token")));
    };
    if token.chars().any(char::is_whitespace) {
        return Err(NobreakError::Lexicon(format!(
            "{what} token {raw:?} contains whitespace"
        )));
    }
    if !first.is_alphanumeric() || !last.is_alphanumeric() {
        return Err(NobreakError::Lexicon(format!(
            "{what} token {raw:?} must start and end with a letter or digit"
        )));
    }
    Ok(())
}

fn read_word_list(path: &Path) -> Result<Vec<String>> {
    let bytes = std::fs::read(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            NobreakError::NotFound {
                path: path.to_path_buf(),
            }
        } else {
            NobreakError::io(path, e)
        }
    })?;
    let words: Vec<String> = serde_json::from_slice(&bytes)?;
    debug!(path = %path.display(), count = words.len(), "word list loaded");
    Ok(words)
}
