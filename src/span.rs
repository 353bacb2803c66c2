// Source spans for template diagnostics
//
//  Copyright (C) 2014-2022 Ryan Specialty Group, LLC.
//
//  This file is part of uibinder.
//
//  This program is free software: you can redistribute it and/or modify
//  it under the terms of the GNU General Public License as published by
//  the Free Software Foundation, either version 3 of the License, or
//  (at your option) any later version.
//
//  This program is distributed in the hope that it will be useful,
//  but WITHOUT ANY WARRANTY; without even the implied warranty of
//  MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
//  GNU General Public License for more details.
//
//  You should have received a copy of the GNU General Public License
//  along with this program.  If not, see <http://www.gnu.org/licenses/>.

//! Mapping to source input byte intervals.
//!
//! A [`Span`] is a byte offset and length into the text of the template
//!   being compiled.
//! Each compilation owns exactly one template,
//!   so spans do not carry a context;
//!     the [`diagnose`](crate::diagnose) system is given the template text
//!     and its path when rendering.
//!
//! Spans are attached to every element, attribute, and text node read from
//!   the template so that errors raised deep within the parser pipeline
//!   can still point the user at the offending markup.
//!
//! Offsets and lengths are stored as [`u32`] so that a span fits within a
//!   single 64-bit word;
//!     templates are not expected to approach 4GiB.
//! Values exceeding that limit saturate rather than wrap.

use std::fmt::{self, Display};

/// Byte interval into the template source.
///
/// The special [`UNKNOWN_SPAN`] is used for diagnostics that cannot be
///   tied to any particular location,
///     such as problems with the owner class rather than the template.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Span {
    offset: u32,
    len: u32,
}

assert_eq_size!(Span, u64);

impl Span {
    /// Create a span from a byte offset and length.
    pub fn new(offset: usize, len: usize) -> Self {
        Self {
            offset: saturate(offset),
            len: saturate(len),
        }
    }

    /// Create a span from inclusive start and exclusive end offsets.
    ///
    /// If `end` precedes `start`,
    ///   the span will have a length of zero.
    pub fn from_range(start: usize, end: usize) -> Self {
        Self::new(start, end.saturating_sub(start))
    }

    const fn st(offset: u32, len: u32) -> Self {
        Self { offset, len }
    }

    /// Byte offset of the start of the span.
    pub fn offset(&self) -> u32 {
        self.offset
    }

    /// Length of the span in bytes.
    pub fn len(&self) -> u32 {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Exclusive end offset of the span.
    pub fn end(&self) -> u32 {
        self.offset.saturating_add(self.len)
    }

    /// Whether this span does not represent a real location.
    pub fn is_unknown(&self) -> bool {
        *self == UNKNOWN_SPAN
    }

    /// Produce a span covering both `self` and `other`.
    ///
    /// If either span is unknown,
    ///   the other is returned unchanged.
    pub fn merge(self, other: Span) -> Span {
        match (self.is_unknown(), other.is_unknown()) {
            (true, _) => other,
            (_, true) => self,
            _ => {
                let start = self.offset.min(other.offset);
                let end = self.end().max(other.end());

                Span::st(start, end - start)
            }
        }
    }

    /// Extract the text that this span covers,
    ///   if it lies within `src` on character boundaries.
    pub fn slice<'a>(&self, src: &'a str) -> Option<&'a str> {
        if self.is_unknown() {
            return None;
        }

        src.get(self.offset as usize..self.end() as usize)
    }
}

impl Default for Span {
    fn default() -> Self {
        UNKNOWN_SPAN
    }
}

impl From<&Span> for Span {
    fn from(span: &Span) -> Self {
        *span
    }
}

impl Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_unknown() {
            write!(f, "[unknown location]")
        } else {
            write!(f, "[{}--{}]", self.offset, self.end())
        }
    }
}

fn saturate(n: usize) -> u32 {
    u32::try_from(n).unwrap_or(u32::MAX)
}

/// A span that does not correspond to any source location.
pub const UNKNOWN_SPAN: Span = Span::st(u32::MAX, 0);

/// A placeholder span for use in tests where the location is not
///   relevant.
#[cfg(test)]
pub const DUMMY_SPAN: Span = Span::st(0, 0);

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn merge_covers_both_spans() {
        let a = Span::new(5, 3);
        let b = Span::new(10, 2);

        assert_eq!(Span::new(5, 7), a.merge(b));
        assert_eq!(Span::new(5, 7), b.merge(a));
    }

    #[test]
    fn merge_ignores_unknown() {
        let a = Span::new(5, 3);

        assert_eq!(a, a.merge(UNKNOWN_SPAN));
        assert_eq!(a, UNKNOWN_SPAN.merge(a));
    }

    #[test]
    fn slice_within_source() {
        let src = "<a><b/></a>";

        assert_eq!(Some("<b/>"), Span::new(3, 4).slice(src));
        assert_eq!(None, Span::new(10, 4).slice(src));
        assert_eq!(None, UNKNOWN_SPAN.slice(src));
    }

    #[test]
    fn from_range_never_negative() {
        assert_eq!(Span::new(4, 0), Span::from_range(4, 2));
        assert_eq!(Span::new(2, 2), Span::from_range(2, 4));
    }
}
