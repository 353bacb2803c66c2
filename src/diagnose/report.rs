// Diagnostic system rendering
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

//! Rendering of diagnostic information.

// NB: `write!` together with `\n` is preferred to `writeln!` so that there
//   is only a single sequence of characters to search for while tracking
//   down newlines.

use super::{
    resolver::{ResolvedSpan, SpanResolver, SpanResolverError},
    Diagnostic, Level,
};
use crate::span::Span;
use std::fmt::{self, Display};

pub trait Reporter {
    /// Render diagnostic report.
    ///
    /// The provided [`Report`] implements [`Display`].
    ///
    /// This method does not return [`Result`] and should never fail.
    /// Errors while resolving spans are rendered into the report itself,
    ///   ensuring that the user is made aware of the problem without
    ///   masking the diagnostic that was requested.
    fn render<'d, D: Diagnostic>(&self, diagnostic: &'d D) -> Report<'d, D>;
}

/// Render diagnostic report in a highly visual way.
///
/// Each span is resolved to its line of template source,
///   which is printed with the span underlined and its label alongside.
pub struct VisualReporter<R: SpanResolver> {
    resolver: R,
}

impl<R: SpanResolver> VisualReporter<R> {
    pub fn new(resolver: R) -> Self {
        Self { resolver }
    }
}

impl<R: SpanResolver> Reporter for VisualReporter<R> {
    fn render<'d, D: Diagnostic>(&self, diagnostic: &'d D) -> Report<'d, D> {
        let mut report = Report::empty(diagnostic);

        report.extend(diagnostic.describe().into_iter().map(|aspan| {
            let label = aspan
                .label()
                .map(|label| SpanLabel(aspan.level(), label.to_string()));
            let span = aspan.span();

            let mspan = match self.resolver.resolve(span) {
                Ok(rspan) => MaybeResolvedSpan::Resolved(rspan),
                Err(e) => MaybeResolvedSpan::Unresolved(span, e),
            };

            Section::new(mspan, aspan.level(), label)
        }));

        report
    }
}

#[derive(Debug)]
pub struct Report<'d, D: Diagnostic> {
    diagnostic: &'d D,
    secs: Vec<Section>,
    level: Level,
}

impl<'d, D: Diagnostic> Report<'d, D> {
    fn empty(diagnostic: &'d D) -> Self {
        Self {
            diagnostic,
            secs: Vec::new(),
            level: Level::default(),
        }
    }

    /// Most severe level of any section of the report.
    pub fn level(&self) -> Level {
        self.level
    }
}

impl<'d, D: Diagnostic> Extend<Section> for Report<'d, D> {
    fn extend<T: IntoIterator<Item = Section>>(&mut self, secs: T) {
        for sec in secs {
            self.level = self.level.min(sec.level);

            // Add the section if it cannot be squashed into the previous.
            let remain = sec.maybe_squash_into(self.secs.last_mut());
            self.secs.extend(remain);
        }
    }
}

impl<'d, D: Diagnostic> Display for Report<'d, D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}\n", self.level, self.diagnostic)?;
        self.secs.iter().try_for_each(|sec| sec.fmt(f))
    }
}

/// A span that may or may not have been resolved to source text.
///
/// Spans that could not be resolved still produce a section with as much
///   information as is available,
///     so that the diagnostic itself is never masked by an error of our
///     own.
#[derive(Debug, PartialEq, Eq)]
enum MaybeResolvedSpan {
    Resolved(ResolvedSpan),
    Unresolved(Span, SpanResolverError),
}

/// A section of a [`Report`] describing a single [`Span`].
///
/// Adjacent sections describing the same span are squashed together.
#[derive(Debug, PartialEq, Eq)]
pub struct Section {
    mspan: MaybeResolvedSpan,
    labels: Vec<SpanLabel>,
    level: Level,
}

impl Section {
    fn new(
        mspan: MaybeResolvedSpan,
        level: Level,
        label: Option<SpanLabel>,
    ) -> Self {
        Self {
            mspan,
            labels: label.into_iter().collect(),
            level,
        }
    }

    fn span(&self) -> Span {
        match &self.mspan {
            MaybeResolvedSpan::Resolved(rspan) => rspan.span,
            MaybeResolvedSpan::Unresolved(span, _) => *span,
        }
    }

    /// Squash self into the provided [`Section`] if they represent the same
    ///   [`Span`],
    ///     otherwise return `self` unchanged.
    ///
    /// The term "squash" is borrowed from `git rebase`.
    fn maybe_squash_into(self, extend: Option<&mut Section>) -> Option<Self> {
        match extend {
            Some(extend_sec) if self.span() == extend_sec.span() => {
                extend_sec.level = extend_sec.level.min(self.level);
                extend_sec.labels.extend(self.labels);
                None
            }

            _ => Some(self),
        }
    }
}

impl Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.mspan {
            MaybeResolvedSpan::Resolved(rspan) => {
                let gutter = rspan.line_num.to_string();
                let pad = " ".repeat(gutter.len());

                write!(
                    f,
                    "{pad}--> {}:{}:{}\n",
                    rspan.name, rspan.line_num, rspan.col
                )?;
                write!(f, "{pad} |\n")?;
                write!(f, "{gutter} | {}\n", rspan.line)?;

                let indent = " ".repeat(rspan.col.start().get() as usize - 1);
                let marks = "^".repeat(rspan.col.width() as usize);

                match self.labels.split_first() {
                    Some((first, rest)) => {
                        write!(f, "{pad} | {indent}{marks} {first}\n")?;

                        for label in rest {
                            write!(f, "{pad} = {label}\n")?;
                        }
                    }
                    None => write!(f, "{pad} | {indent}{marks}\n")?,
                }
            }

            // Diagnostics unrelated to any template location
            //   (e.g. problems with the owner class)
            //   are rendered as plain labels.
            MaybeResolvedSpan::Unresolved(_, SpanResolverError::Unknown) => {
                for label in self.labels.iter() {
                    write!(f, "  = {label}\n")?;
                }
            }

            MaybeResolvedSpan::Unresolved(span, e) => {
                write!(f, "  --> offset {}--{}\n", span.offset(), span.end())?;

                for label in self.labels.iter() {
                    write!(f, "  = {label}\n")?;
                }

                write!(
                    f,
                    "  = help: an error occurred while trying to look up \
                       information about this span: {e}\n"
                )?;
            }
        }

        Ok(())
    }
}

/// A label describing a span.
#[derive(Debug, PartialEq, Eq)]
struct SpanLabel(Level, String);

impl Display for SpanLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Self(level, label) = self;
        write!(f, "{level}: {label}")
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::diagnose::{Annotate, AnnotatedSpan, SourceSpanResolver};
    use crate::span::UNKNOWN_SPAN;
    use std::error::Error;

    #[derive(Debug)]
    struct StubError(Vec<(Span, &'static str)>);

    impl Display for StubError {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "stub error")
        }
    }

    impl Error for StubError {}

    impl Diagnostic for StubError {
        fn describe(&self) -> Vec<AnnotatedSpan> {
            self.0
                .iter()
                .enumerate()
                .map(|(i, &(span, label))| {
                    if i == 0 {
                        span.error(label)
                    } else {
                        span.help(label)
                    }
                })
                .collect()
        }
    }

    const SRC: &str = "<ui:UiBinder>\n  <g:Label/>\n</ui:UiBinder>";

    #[test]
    fn renders_resolved_span_with_underline() {
        let sut = VisualReporter::new(SourceSpanResolver::new("Foo.ui.xml", SRC));
        let err = StubError(vec![(Span::new(16, 10), "no such widget")]);

        assert_eq!(
            "error: stub error\n\
             \x20--> Foo.ui.xml:2:3\n\
             \x20 |\n\
             2 |   <g:Label/>\n\
             \x20 |   ^^^^^^^^^^ error: no such widget\n",
            sut.render(&err).to_string(),
        );
    }

    #[test]
    fn squashes_labels_of_same_span() {
        let sut = VisualReporter::new(SourceSpanResolver::new("Foo.ui.xml", SRC));
        let span = Span::new(16, 10);
        let err = StubError(vec![(span, "first"), (span, "second")]);

        let report = sut.render(&err);

        assert_eq!(1, report.secs.len());
        assert!(report.to_string().ends_with(" = help: second\n"));
    }

    #[test]
    fn unknown_span_renders_label_only() {
        let sut = VisualReporter::new(SourceSpanResolver::new("Foo.ui.xml", SRC));
        let err = StubError(vec![(UNKNOWN_SPAN, "owner problem")]);

        assert_eq!(
            "error: stub error\n  = error: owner problem\n",
            sut.render(&err).to_string(),
        );
    }

    #[test]
    fn out_of_range_span_is_not_masked() {
        let sut = VisualReporter::new(SourceSpanResolver::new("Foo.ui.xml", SRC));
        let err = StubError(vec![(Span::new(500, 2), "far away")]);

        let rendered = sut.render(&err).to_string();

        assert!(rendered.starts_with("error: stub error\n  --> offset 500--502\n"));
        assert!(rendered.contains("error: far away"));
    }
}
