// Template document model
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

//! Template document model.
//!
//! Templates are read in their entirety into a small DOM
//!   (see [`parse_document`]),
//!   which is then handed to the parser pipeline wrapped in an
//!   [`XmlElement`].
//! The DOM is intentionally minimal:
//!
//!   - namespace prefixes are resolved during reading,
//!       so every [`Element`] and [`Attr`] knows its namespace URI;
//!   - `xmlns` declarations are removed from the attribute list and
//!       retained only in the in-scope [`NsScope`];
//!   - comments, processing instructions, and document type declarations
//!       are discarded; and
//!   - adjacent runs of character data are merged into a single [`Text`]
//!       node.
//!
//! Whitespace-only text is retained,
//!   since it is structurally significant when whitespace is being
//!   preserved
//!     (see [`crate::dom`]).

mod element;
pub mod escape;
mod reader;

pub use element::{Interpreter, XmlElement};
pub use reader::parse_document;

use crate::diagnose::{Annotate, AnnotatedSpan, Diagnostic};
use crate::span::Span;
use std::{
    error::Error,
    fmt::{self, Display},
    rc::Rc,
};

/// Namespace bound to the `xml` prefix by definition.
pub const XML_NS_URI: &str = "http://www.w3.org/XML/1998/namespace";

/// A possibly-prefixed name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QName {
    pub prefix: Option<String>,
    pub local: String,
}

impl QName {
    /// Split a raw name on its first `:`.
    pub fn parse(raw: &str) -> Self {
        match raw.split_once(':') {
            Some((prefix, local)) => Self {
                prefix: Some(prefix.to_string()),
                local: local.to_string(),
            },
            None => Self {
                prefix: None,
                local: raw.to_string(),
            },
        }
    }
}

impl Display for QName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.prefix {
            Some(prefix) => write!(f, "{}:{}", prefix, self.local),
            None => write!(f, "{}", self.local),
        }
    }
}

/// Namespace declarations in scope for an element.
///
/// Scopes are shared between an element and all descendants that do not
///   declare namespaces of their own.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NsScope {
    parent: Option<Rc<NsScope>>,
    decls: Vec<(Option<String>, String)>,
}

impl NsScope {
    pub fn new(
        parent: Option<Rc<NsScope>>,
        decls: Vec<(Option<String>, String)>,
    ) -> Self {
        Self { parent, decls }
    }

    /// Namespace URI bound to `prefix`,
    ///   or the default namespace if `prefix` is [`None`].
    pub fn uri(&self, prefix: Option<&str>) -> Option<&str> {
        if prefix == Some("xml") {
            return Some(XML_NS_URI);
        }

        self.decls
            .iter()
            .rev()
            .find(|(p, _)| p.as_deref() == prefix)
            .map(|(_, uri)| uri.as_str())
            .or_else(|| self.parent.as_ref().and_then(|p| p.uri(prefix)))
            .filter(|uri| !uri.is_empty())
    }

    /// Innermost prefix bound to `uri`.
    ///
    /// The outer [`Option`] indicates whether the URI is bound at all;
    ///   the inner is [`None`] when it is the default namespace.
    pub fn prefix(&self, uri: &str) -> Option<Option<&str>> {
        self.decls
            .iter()
            .rev()
            .find(|(_, u)| u == uri)
            .map(|(p, _)| p.as_deref())
            .or_else(|| self.parent.as_ref().and_then(|p| p.prefix(uri)))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attr {
    pub name: QName,
    pub ns: Option<String>,
    pub value: String,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Text {
    pub value: String,
    pub span: Span,
}

impl Text {
    pub fn is_whitespace(&self) -> bool {
        self.value.trim().is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Element(Element),
    Text(Text),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    pub name: QName,
    pub ns: Option<String>,
    pub attrs: Vec<Attr>,
    pub children: Vec<Node>,
    pub scope: Rc<NsScope>,
    /// Span of the opening tag.
    pub span: Span,
}

impl Element {
    pub fn child_elements(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(|node| match node {
            Node::Element(elem) => Some(elem),
            Node::Text(_) => None,
        })
    }
}

pub type Result<T> = std::result::Result<T, XmlError>;

/// Error reading a template or consuming its contents.
#[derive(Debug, PartialEq, Eq)]
pub enum XmlError {
    /// The underlying XML reader rejected the document.
    Syntax(String, Span),

    /// A prefix was used without being bound to a namespace.
    UnboundPrefix(String, Span),

    /// The document contains no root element.
    NoRootElement,

    /// Non-whitespace text or a second element appears outside of the
    ///   root element.
    ContentOutsideRoot(Span),

    /// The document ended before the element was closed.
    Unclosed(QName, Span),

    /// A required attribute is missing.
    MissingAttribute {
        elem: QName,
        attr: String,
        span: Span,
    },

    /// An attribute that must be a boolean constant has another value.
    BadBooleanAttribute {
        attr: String,
        value: String,
        span: Span,
    },

    /// An element must have exactly one child element.
    SingleChildExpected {
        elem: QName,
        found: usize,
        span: Span,
    },

    /// Text where only elements are permitted.
    UnexpectedText { elem: QName, span: Span },

    /// An element where only text is permitted.
    IllegalChild {
        parent: QName,
        child: QName,
        span: Span,
    },
}

impl Display for XmlError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use XmlError::*;

        match self {
            Syntax(msg, _) => write!(f, "malformed template: {msg}"),
            UnboundPrefix(prefix, _) => {
                write!(f, "namespace prefix `{prefix}` is not declared")
            }
            NoRootElement => write!(f, "template has no root element"),
            ContentOutsideRoot(_) => {
                write!(f, "unexpected content outside of root element")
            }
            Unclosed(name, _) => write!(f, "element <{name}> is not closed"),
            MissingAttribute { elem, attr, .. } => {
                write!(f, "missing required attribute \"{attr}\" in <{elem}>")
            }
            BadBooleanAttribute { attr, value, .. } => write!(
                f,
                "attribute \"{attr}\" must be \"true\" or \"false\", \
                   but found \"{value}\""
            ),
            SingleChildExpected { elem, found, .. } => write!(
                f,
                "<{elem}> must have a single child element, but found {found}"
            ),
            UnexpectedText { elem, .. } => {
                write!(f, "unexpected text in element <{elem}>")
            }
            IllegalChild { parent, child, .. } => write!(
                f,
                "illegal child <{child}> in a text-only context \
                   within <{parent}>"
            ),
        }
    }
}

impl Error for XmlError {}

impl Diagnostic for XmlError {
    fn describe(&self) -> Vec<AnnotatedSpan> {
        use XmlError::*;

        match self {
            Syntax(_, span) => span.mark_error().into(),
            UnboundPrefix(prefix, span) => span
                .mark_error()
                .with_help(format!("declare it with xmlns:{prefix}=\"...\"")),
            NoRootElement => vec![],
            ContentOutsideRoot(span) => span
                .error("a template must contain exactly one root element")
                .into(),
            Unclosed(_, span) => span.error("opened here").into(),
            MissingAttribute { attr, span, .. } => {
                span.error(format!("expected attribute \"{attr}\"")).into()
            }
            BadBooleanAttribute { span, .. } => span.mark_error().into(),
            SingleChildExpected { span, .. } => span.mark_error().into(),
            UnexpectedText { span, .. } => span
                .error("text is not permitted here")
                .into(),
            IllegalChild { span, .. } => span.mark_error().into(),
        }
    }
}

#[cfg(test)]
mod test;
