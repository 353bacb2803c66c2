// DOM path tracking for elements rendered from HTML
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

//! DOM path tracking for elements rendered from HTML.
//!
//! When the root of a template is plain HTML,
//!   the entire tree is rendered at runtime from a single HTML string.
//! Elements within that tree that the template names with `ui:field` must
//!   then be located after the fact,
//!     and the only information cheaply available is the position of each
//!     element relative to its ancestors.
//! [`DomCursor`] tracks that position while the template is walked and
//!   produces a chain of runtime child lookups for the current element
//!   (see [`DomCursor::access_expression`]).
//!
//! The browser does not necessarily build the tree that the markup
//!   suggests,
//!     and a path that disagrees with the browser will silently bind the
//!     wrong element.
//! Two quirks of HTML parsing are therefore reproduced:
//!
//!   - a `<tr>` placed directly within a `<table>` is moved into an
//!       implicit `<tbody>`,
//!         so such children are located with
//!         `UiBinderUtil.getTableChild`; and
//!   - block elements implicitly close an open `<p>`,
//!       which moves them and their following siblings out of the
//!       paragraph entirely.
//!     Paths into such a paragraph are refused with
//!       [`CursorError::UnsafeParagraphPath`].
//!     This is a heuristic over the tag names that close a paragraph,
//!       not an implementation of the HTML parsing algorithm.
//!
//! Text nodes are counted only when whitespace is being preserved;
//!   otherwise lookups skip text nodes entirely
//!   (`UiBinderUtil.getNonTextChild`).
//!
//! Lookups of intermediate ancestors are assigned to local variables and
//!   cached by path,
//!     so that sibling elements sharing a prefix do not walk from the root
//!     again.

use crate::{
    diagnose::{Annotate, AnnotatedSpan, Diagnostic},
    global,
    java::{simple_name, Expr, Stmt},
    span::Span,
};
use fxhash::FxHashMap;
use std::{
    error::Error,
    fmt::{self, Display},
};

/// Tags that implicitly close an open `<p>`.
const CLOSES_PARAGRAPH: &[&str] = &[
    "address", "article", "aside", "blockquote", "details", "div", "dl",
    "fieldset", "figure", "footer", "form", "h1", "h2", "h3", "h4", "h5",
    "h6", "header", "hr", "main", "menu", "nav", "ol", "p", "pre",
    "section", "table", "ul",
];

/// Valid direct children of `<table>`,
///   located by ordinary lookups even when the `<tbody>` is implicit.
const TABLE_SECTIONS: &[&str] = &["thead", "tbody", "tfoot"];

/// Runtime lookup used to reach a child of its parent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum Lookup {
    /// `UiBinderUtil.getNonTextChild(parent, i)`
    NonText(usize),

    /// `UiBinderUtil.getChild(parent, i)`,
    ///   counting text nodes.
    Child(usize),

    /// `UiBinderUtil.getTableChild(table, i)`
    Table(usize),
}

impl Lookup {
    fn expr(&self, parent: Expr) -> Expr {
        let (method, index) = match *self {
            Self::NonText(i) => ("getNonTextChild", i),
            Self::Child(i) => ("getChild", i),
            Self::Table(i) => ("getTableChild", i),
        };

        Expr::static_call(
            simple_name(global::UIBINDER_UTIL),
            method,
            vec![parent, Expr::literal(index.to_string())],
        )
    }
}

#[derive(Debug)]
struct Frame {
    tag: String,
    span: Span,

    /// Position among the element children of the parent.
    element_index: usize,
    /// Position among all children of the parent,
    ///   including text.
    node_index: usize,

    next_element: usize,
    next_node: usize,

    /// A `<table>` that has not (yet) been given an explicit section.
    missing_tbody: bool,

    /// This is a `<p>` or is within one.
    in_paragraph: bool,

    /// A block element has closed an enclosing paragraph,
    ///   so later children are no longer where the markup places them.
    broken: bool,

    /// The browser will not place this element where the markup places
    ///   it.
    unsafe_path: bool,
}

impl Frame {
    fn new(tag: &str, span: Span) -> Self {
        Self {
            tag: tag.to_ascii_lowercase(),
            span,
            element_index: 0,
            node_index: 0,
            next_element: 0,
            next_node: 0,
            missing_tbody: tag.eq_ignore_ascii_case("table"),
            in_paragraph: tag.eq_ignore_ascii_case("p"),
            broken: false,
            unsafe_path: false,
        }
    }
}

/// Tracks the position of the element being visited within an HTML tree
///   rendered at runtime.
#[derive(Debug)]
pub struct DomCursor {
    root: String,
    preserve_whitespace: bool,

    /// Root frame first.
    stack: Vec<Frame>,

    /// Variables holding elements already looked up,
    ///   keyed by their path from the root.
    cache: FxHashMap<Vec<Lookup>, String>,
    intermediates: usize,
}

impl DomCursor {
    /// Cursor positioned at the root element `root_tag` held in the
    ///   variable `root`.
    pub fn new<S: Into<String>>(
        root: S,
        root_tag: &str,
        root_span: Span,
        preserve_whitespace: bool,
    ) -> Self {
        Self {
            root: root.into(),
            preserve_whitespace,
            stack: vec![Frame::new(root_tag, root_span)],
            cache: FxHashMap::default(),
            intermediates: 0,
        }
    }

    /// Number intermediate variables starting at `first`,
    ///   so that several cursors may write into the same method body.
    pub fn numbering_from(mut self, first: usize) -> Self {
        self.intermediates = first;
        self
    }

    /// Number of the next intermediate variable.
    pub fn next_intermediate(&self) -> usize {
        self.intermediates
    }

    /// Number of elements visited but not finished,
    ///   including the root.
    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    fn parent_mut(&mut self) -> &mut Frame {
        // The root frame is never popped.
        let last = self.stack.len() - 1;
        &mut self.stack[last]
    }

    /// Descend into the next element child of the current element.
    pub fn visit_child(
        &mut self,
        tag: &str,
        span: Span,
    ) -> Result<(), CursorError> {
        let mut frame = Frame::new(tag, span);
        let parent = self.parent_mut();

        if matches!(frame.tag.as_str(), "td" | "th") && parent.tag != "tr" {
            return Err(CursorError::CellOutsideRow {
                tag: frame.tag,
                parent: parent.tag.clone(),
                span,
            });
        }

        // Only an explicit body prevents the browser from inserting one.
        if parent.tag == "table" && frame.tag == "tbody" {
            parent.missing_tbody = false;
        }

        frame.element_index = parent.next_element;
        frame.node_index = parent.next_node;
        parent.next_element += 1;
        parent.next_node += 1;

        let closes = parent.in_paragraph
            && CLOSES_PARAGRAPH.contains(&frame.tag.as_str());

        frame.in_paragraph |= parent.in_paragraph;
        frame.unsafe_path = parent.unsafe_path || parent.broken || closes;

        if closes {
            // Everything from the paragraph down is now misplaced.
            for ancestor in self.stack.iter_mut().rev() {
                ancestor.broken = true;

                if ancestor.tag == "p" {
                    break;
                }
            }
        }

        self.stack.push(frame);
        Ok(())
    }

    /// Return to the parent of the current element.
    pub fn finish_child(&mut self) {
        if self.stack.len() > 1 {
            self.stack.pop();
        }
    }

    /// Account for a text child of the current element.
    ///
    /// Text occupies a position only when whitespace is preserved.
    pub fn advance_text_child(&mut self, text: &str) {
        if self.preserve_whitespace && !text.is_empty() {
            self.parent_mut().next_node += 1;
        }
    }

    /// Lookup of each element on the current path,
    ///   relative to its parent.
    fn path(&self) -> Vec<Lookup> {
        self.stack
            .windows(2)
            .map(|pair| {
                let (parent, child) = (&pair[0], &pair[1]);

                if parent.missing_tbody
                    && !TABLE_SECTIONS.contains(&child.tag.as_str())
                {
                    Lookup::Table(child.element_index)
                } else if self.preserve_whitespace {
                    Lookup::Child(child.node_index)
                } else {
                    Lookup::NonText(child.element_index)
                }
            })
            .collect()
    }

    /// Expression evaluating to the current element at runtime,
    ///   along with declarations of any intermediate ancestors it
    ///   requires that have not yet been declared.
    pub fn access_expression(
        &mut self,
    ) -> Result<(Vec<Stmt>, Expr), CursorError> {
        let current = &self.stack[self.stack.len() - 1];

        if current.unsafe_path {
            return Err(CursorError::UnsafeParagraphPath {
                tag: current.tag.clone(),
                span: current.span,
            });
        }

        let path = self.path();

        // Longest prefix already held in a variable.
        let (start, mut expr) = (1..path.len())
            .rev()
            .find_map(|len| {
                self.cache
                    .get(&path[..len])
                    .map(|var| (len, Expr::name(var.as_str())))
            })
            .unwrap_or_else(|| (0, Expr::name(self.root.as_str())));

        let mut stmts = Vec::new();

        for (i, lookup) in path.iter().enumerate().skip(start) {
            let call = lookup.expr(expr);

            if i + 1 == path.len() {
                return Ok((stmts, call));
            }

            let var = format!("intermediate{}", self.intermediates);
            self.intermediates += 1;

            log::trace!("caching DOM path {:?} as {var}", &path[..=i]);

            stmts.push(Stmt::local(global::ELEMENT_TYPE, &var, call));
            self.cache.insert(path[..=i].to_vec(), var.clone());
            expr = Expr::name(var);
        }

        // The path is empty; this is the root itself.
        Ok((stmts, expr))
    }
}

#[derive(Debug, PartialEq, Eq)]
pub enum CursorError {
    /// A table cell outside of a table row.
    CellOutsideRow {
        tag: String,
        parent: String,
        span: Span,
    },

    /// The element would be moved out of an enclosing paragraph by the
    ///   browser.
    UnsafeParagraphPath { tag: String, span: Span },
}

impl Display for CursorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CellOutsideRow { tag, parent, .. } => {
                write!(f, "<{tag}> must be within <tr>, but found in <{parent}>")
            }
            Self::UnsafeParagraphPath { tag, .. } => write!(
                f,
                "cannot locate <{tag}> at runtime: it follows a block \
                   element within <p>, which browsers move out of the \
                   paragraph"
            ),
        }
    }
}

impl Error for CursorError {}

impl Diagnostic for CursorError {
    fn describe(&self) -> Vec<AnnotatedSpan> {
        match self {
            Self::CellOutsideRow { span, .. } => span.mark_error().into(),
            Self::UnsafeParagraphPath { span, .. } => span
                .mark_error()
                .with_help("close the <p> before opening block elements"),
        }
    }
}
