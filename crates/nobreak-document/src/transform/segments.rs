// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Markup/character-data splitting. Substitutions only ever touch character
// data, so tag names and attribute values pass through unchanged.

use std::ops::AddAssign;

/// A slice of the part's content.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Segment<'a> {
    /// A tag, comment, CDATA section or processing instruction through its
    /// closing delimiter, or an unterminated tail.
    Markup(&'a str),
    /// Character data between tags.
    Text(&'a str),
}

/// Iterator over the segments of a markup stream, in order.
pub(crate) struct Segments<'a> {
    rest: &'a str,
}

pub(crate) fn segments(input: &str) -> Segments<'_> {
    Segments { rest: input }
}

impl<'a> Iterator for Segments<'a> {
    type Item = Segment<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.rest.is_empty() {
            return None;
        }

        let (segment, rest) = if self.rest.starts_with('<') {
            let (tag, rest) = self.rest.split_at(markup_end(self.rest));
            (Segment::Markup(tag), rest)
        } else {
            let end = self.rest.find('<').unwrap_or(self.rest.len());
            let (text, rest) = self.rest.split_at(end);
            (Segment::Text(text), rest)
        };

        self.rest = rest;
        Some(segment)
    }
}

/// Byte length of the markup at the start of `rest` (which begins with `<`).
///
/// Inside an element tag a `>` within a quoted attribute value does not
/// close the tag.
fn markup_end(rest: &str) -> usize {
    for (open, close) in [("<!--", "-->"), ("<![CDATA[", "]]>"), ("<?", "?>")] {
        if rest.starts_with(open) {
            return rest[open.len()..]
                .find(close)
                .map_or(rest.len(), |i| open.len() + i + close.len());
        }
    }

    let mut quote = None;
    for (i, c) in rest.char_indices() {
        match (quote, c) {
            (Some(q), c) if c == q => quote = None,
            (Some(_), _) => {}
            (None, '"' | '\'') => quote = Some(c),
            (None, '>') => return i + 1,
            _ => {}
        }
    }
    rest.len()
}

/// Copy `input`, passing each character-data segment through `rewrite`.
///
/// `rewrite` appends its output to the buffer and returns what it did; the
/// counts are summed.
pub(crate) fn rewrite_text<F, C>(input: &str, mut rewrite: F) -> (String, C)
where
    F: FnMut(&str, &mut String) -> C,
    C: Default + AddAssign,
{
    let mut out = String::with_capacity(input.len());
    let mut count = C::default();
    for segment in segments(input) {
        match segment {
            Segment::Markup(tag) => out.push_str(tag),
            Segment::Text(text) => count += rewrite(text, &mut out),
        }
    }
    (out, count)
}
