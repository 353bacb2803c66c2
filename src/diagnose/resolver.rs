// Diagnostic span resolver
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

//! Resolution of [`Span`]s into lines and columns of the template.
//!
//! Templates are held entirely in memory for the duration of a
//!   compilation,
//!     so resolution is a simple scan of the source text for line
//!     boundaries.
//! Columns are measured in display width
//!   (via [`unicode_width`])
//!   so that carets line up beneath wide characters.

use crate::span::Span;
use std::{
    error::Error,
    fmt::{self, Display},
    num::NonZeroU32,
};
use unicode_width::UnicodeWidthStr;

/// Resolve a [`Span`] into the line of source containing it.
pub trait SpanResolver {
    fn resolve(&self, span: Span) -> Result<ResolvedSpan, SpanResolverError>;
}

/// Resolve spans against an in-memory template.
#[derive(Debug, Clone, Copy)]
pub struct SourceSpanResolver<'s> {
    name: &'s str,
    src: &'s str,
}

impl<'s> SourceSpanResolver<'s> {
    /// Create a resolver for the template `src` whose path will be
    ///   displayed as `name`.
    pub fn new(name: &'s str, src: &'s str) -> Self {
        Self { name, src }
    }
}

impl<'s> SpanResolver for SourceSpanResolver<'s> {
    fn resolve(&self, span: Span) -> Result<ResolvedSpan, SpanResolverError> {
        if span.is_unknown() {
            return Err(SpanResolverError::Unknown);
        }

        let bytes = self.src.as_bytes();
        let offset = span.offset() as usize;

        if offset > bytes.len() {
            return Err(SpanResolverError::OutOfRange {
                span,
                src_len: bytes.len(),
            });
        }

        let line_start = memchr::memrchr(b'\n', &bytes[..offset])
            .map(|i| i + 1)
            .unwrap_or(0);
        let line_end = memchr::memchr(b'\n', &bytes[offset..])
            .map(|i| offset + i)
            .unwrap_or(bytes.len());
        let line_num =
            1 + memchr::memchr_iter(b'\n', &bytes[..line_start]).count();

        // Only the first line of a multi-line span is underlined.
        let end = (span.end() as usize).min(line_end);

        let (line, prefix, covered) = match (
            self.src.get(line_start..line_end),
            self.src.get(line_start..offset),
            self.src.get(offset..end),
        ) {
            (Some(line), Some(prefix), Some(covered)) => {
                (line, prefix, covered)
            }
            _ => return Err(SpanResolverError::NotCharBoundary(span)),
        };

        let start_col = prefix.width() + 1;
        let col = match covered.width() {
            0 => Column::Before(nonzero(start_col)),
            width => Column::Endpoints(
                nonzero(start_col),
                nonzero(start_col + width - 1),
            ),
        };

        Ok(ResolvedSpan {
            span,
            name: self.name.to_string(),
            line_num: nonzero(line_num),
            col,
            line: line.trim_end_matches('\r').to_string(),
        })
    }
}

fn nonzero(n: usize) -> NonZeroU32 {
    NonZeroU32::new(u32::try_from(n).unwrap_or(u32::MAX))
        .unwrap_or(NonZeroU32::MIN)
}

/// A [`Span`] resolved to its line of source text.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct ResolvedSpan {
    pub span: Span,
    pub name: String,
    pub line_num: NonZeroU32,
    pub col: Column,
    pub line: String,
}

/// Column of a resolved span within its first line.
///
/// Columns are 1-indexed display widths.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Column {
    /// Inclusive start and end columns of a non-empty span.
    Endpoints(NonZeroU32, NonZeroU32),

    /// An empty span positioned immediately before the given column.
    Before(NonZeroU32),
}

impl Column {
    pub fn start(&self) -> NonZeroU32 {
        match self {
            Self::Endpoints(start, _) | Self::Before(start) => *start,
        }
    }

    /// Number of columns to underline.
    pub fn width(&self) -> u32 {
        match self {
            Self::Endpoints(start, end) => end.get() - start.get() + 1,
            Self::Before(_) => 1,
        }
    }
}

impl Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.start())
    }
}

#[derive(Debug, PartialEq, Eq, Clone)]
pub enum SpanResolverError {
    /// The span does not represent a source location.
    Unknown,

    /// The span starts past the end of the source.
    OutOfRange { span: Span, src_len: usize },

    /// The span does not fall on UTF-8 character boundaries.
    NotCharBoundary(Span),
}

impl Display for SpanResolverError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unknown => write!(f, "span has no source location"),
            Self::OutOfRange { span, src_len } => write!(
                f,
                "span {span} lies outside of source of length {src_len}"
            ),
            Self::NotCharBoundary(span) => {
                write!(f, "span {span} does not fall on character boundaries")
            }
        }
    }
}

impl Error for SpanResolverError {}

#[cfg(test)]
mod test {
    use super::*;

    fn nz(n: u32) -> NonZeroU32 {
        NonZeroU32::new(n).unwrap()
    }

    #[test]
    fn resolves_first_line() {
        let src = "<ui:UiBinder>\n  <div/>\n</ui:UiBinder>";
        let sut = SourceSpanResolver::new("Foo.ui.xml", src);

        let rspan = sut.resolve(Span::new(1, 11)).unwrap();

        assert_eq!(nz(1), rspan.line_num);
        assert_eq!(Column::Endpoints(nz(2), nz(12)), rspan.col);
        assert_eq!("<ui:UiBinder>", rspan.line);
        assert_eq!("Foo.ui.xml", rspan.name);
    }

    #[test]
    fn resolves_later_line_and_column() {
        let src = "<ui:UiBinder>\n  <div/>\n</ui:UiBinder>";
        let sut = SourceSpanResolver::new("Foo.ui.xml", src);

        // `<div/>`
        let rspan = sut.resolve(Span::new(16, 6)).unwrap();

        assert_eq!(nz(2), rspan.line_num);
        assert_eq!(Column::Endpoints(nz(3), nz(8)), rspan.col);
        assert_eq!("  <div/>", rspan.line);
    }

    #[test]
    fn empty_span_is_before_column() {
        let src = "abc\ndef";
        let sut = SourceSpanResolver::new("x", src);

        let rspan = sut.resolve(Span::new(5, 0)).unwrap();

        assert_eq!(nz(2), rspan.line_num);
        assert_eq!(Column::Before(nz(2)), rspan.col);
    }

    #[test]
    fn wide_characters_use_display_width() {
        let src = "<p>日本</p>";
        let sut = SourceSpanResolver::new("x", src);

        // `</p>` follows two double-width characters.
        let rspan = sut.resolve(Span::new(9, 4)).unwrap();

        assert_eq!(Column::Endpoints(nz(8), nz(11)), rspan.col);
    }

    #[test]
    fn unknown_and_out_of_range_spans() {
        let sut = SourceSpanResolver::new("x", "abc");

        assert_eq!(
            Err(SpanResolverError::Unknown),
            sut.resolve(crate::span::UNKNOWN_SPAN)
        );
        assert_eq!(
            Err(SpanResolverError::OutOfRange {
                span: Span::new(10, 1),
                src_len: 3
            }),
            sut.resolve(Span::new(10, 1))
        );
    }
}
