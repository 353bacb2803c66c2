// Consume-once template element wrapper
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

//! Consume-once wrapper over template elements.
//!
//! An [`XmlElement`] is handed to each parser in a pipeline in turn,
//!   from the most specific to the least.
//! Every `consume_*` method _removes_ what it returns,
//!   so that once a parser has handled an attribute or child element,
//!   no later parser will see it.
//! This is what allows a generic bean parser to run last and treat
//!   everything remaining as a property setter without reprocessing what
//!   more specific parsers have already handled.

use super::{
    escape::{collapse_whitespace, escape_attribute_text, escape_text},
    Attr, Element, Node, QName, Result, Text, XmlError,
};
use crate::{
    attr::{AttrContext, AttrParseError},
    java::Expr,
    oracle::TypeRef,
    span::Span,
};

/// HTML elements that never have content and must not be closed.
const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link",
    "meta", "param", "source", "track", "wbr",
];

/// Caller-provided substitution of elements encountered while consuming
///   an element's body.
///
/// While rendering a body with [`XmlElement::consume_inner_html`],
///   each child element is first offered to
///   [`Interpreter::interpret_element`];
///     if it produces a value,
///       that value replaces the element entirely.
/// The remaining methods are notified as the structure of the rendered
///   body is walked,
///     which allows an interpreter to track the position of each element
///     in the resulting DOM
///       (see [`crate::dom::DomCursor`]).
pub trait Interpreter<T> {
    type Error: From<XmlError>;

    /// Offer an element for substitution.
    ///
    /// Returning [`None`] leaves the element to be processed by the
    ///   caller.
    fn interpret_element(
        &mut self,
        elem: &mut XmlElement,
    ) -> std::result::Result<Option<T>, Self::Error>;

    /// An element is about to be interpreted or rendered.
    fn enter_element(
        &mut self,
        _elem: &XmlElement,
    ) -> std::result::Result<(), Self::Error> {
        Ok(())
    }

    /// An element and its body have been interpreted or rendered.
    fn leave_element(
        &mut self,
        _elem: &XmlElement,
    ) -> std::result::Result<(), Self::Error> {
        Ok(())
    }

    /// A text node is about to be rendered.
    fn visit_text(
        &mut self,
        _text: &str,
    ) -> std::result::Result<(), Self::Error> {
        Ok(())
    }
}

/// Wrapper over a template [`Element`] exposing the consume-once
///   protocol.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XmlElement {
    elem: Element,
    preserve_whitespace: bool,
}

impl XmlElement {
    pub fn new(elem: Element) -> Self {
        Self {
            elem,
            preserve_whitespace: false,
        }
    }

    /// Whether whitespace in text is preserved when rendering bodies.
    ///
    /// This setting is inherited by every child element consumed from
    ///   this one.
    pub fn preserving_whitespace(mut self, preserve: bool) -> Self {
        self.preserve_whitespace = preserve;
        self
    }

    fn wrap_child(&self, elem: Element) -> Self {
        Self {
            elem,
            preserve_whitespace: self.preserve_whitespace,
        }
    }

    pub fn name(&self) -> &QName {
        &self.elem.name
    }

    pub fn local_name(&self) -> &str {
        &self.elem.name.local
    }

    pub fn prefix(&self) -> Option<&str> {
        self.elem.name.prefix.as_deref()
    }

    pub fn namespace_uri(&self) -> Option<&str> {
        self.elem.ns.as_deref()
    }

    /// Span of the opening tag.
    pub fn span(&self) -> Span {
        self.elem.span
    }

    /// Prefix bound to `uri` in the scope of this element.
    ///
    /// The outer [`Option`] is [`None`] if the namespace is not declared;
    ///   the inner is [`None`] if it is the default namespace.
    pub fn lookup_prefix(&self, uri: &str) -> Option<Option<&str>> {
        self.elem.scope.prefix(uri)
    }

    /// Namespace URI bound to `prefix` in the scope of this element.
    pub fn lookup_namespace(&self, prefix: Option<&str>) -> Option<&str> {
        self.elem.scope.uri(prefix)
    }

    fn find_attr(&self, name: &str) -> Option<usize> {
        self.elem
            .attrs
            .iter()
            .position(|attr| attr.name.to_string() == name)
    }

    /// Whether an unconsumed attribute with the given qualified name
    ///   exists.
    pub fn has_attribute(&self, name: &str) -> bool {
        self.find_attr(name).is_some()
    }

    /// Number of unconsumed attributes.
    pub fn attribute_count(&self) -> usize {
        self.elem.attrs.len()
    }

    /// Unconsumed attributes in document order.
    pub fn attributes(&self) -> &[Attr] {
        &self.elem.attrs
    }

    /// Span of the named attribute,
    ///   or of the opening tag if there is no such attribute.
    pub fn attribute_span(&self, name: &str) -> Span {
        self.find_attr(name)
            .map(|i| self.elem.attrs[i].span)
            .unwrap_or(self.elem.span)
    }

    /// Unconsumed attributes,
    ///   for in-place rewriting of their values before rendering.
    pub fn attributes_mut(&mut self) -> impl Iterator<Item = &mut Attr> {
        self.elem.attrs.iter_mut()
    }

    /// Set an unprefixed attribute,
    ///   replacing any existing attribute of the same name.
    pub fn set_attribute(&mut self, name: &str, value: String) {
        match self.find_attr(name) {
            Some(i) => self.elem.attrs[i].value = value,
            None => self.elem.attrs.push(Attr {
                name: QName::parse(name),
                ns: None,
                value,
                span: self.elem.span,
            }),
        }
    }

    /// Consume the attribute with the given qualified name,
    ///   returning it untrimmed.
    pub fn consume_attribute_node(&mut self, name: &str) -> Option<Attr> {
        self.find_attr(name).map(|i| self.elem.attrs.remove(i))
    }

    /// Consume the attribute identified by namespace URI and local name,
    ///   regardless of the prefix used to reference it.
    pub fn consume_ns_attribute(
        &mut self,
        uri: &str,
        local: &str,
    ) -> Option<Attr> {
        self.elem
            .attrs
            .iter()
            .position(|attr| {
                attr.ns.as_deref() == Some(uri) && attr.name.local == local
            })
            .map(|i| self.elem.attrs.remove(i))
    }

    /// Consume the first attribute in the given namespace,
    ///   whatever its local name.
    pub fn consume_first_attribute_in_ns(&mut self, uri: &str) -> Option<Attr> {
        self.elem
            .attrs
            .iter()
            .position(|attr| attr.ns.as_deref() == Some(uri))
            .map(|i| self.elem.attrs.remove(i))
    }

    /// Consume the next unconsumed attribute in document order.
    pub fn consume_next_attribute(&mut self) -> Option<Attr> {
        match self.elem.attrs.is_empty() {
            true => None,
            false => Some(self.elem.attrs.remove(0)),
        }
    }

    /// Consume an attribute and return its trimmed value,
    ///   or the empty string if it does not exist.
    pub fn consume_raw_attribute(&mut self, name: &str) -> String {
        self.consume_raw_attribute_or(name, "")
    }

    /// Consume an attribute and return its trimmed value,
    ///   or `default` if it does not exist.
    pub fn consume_raw_attribute_or(
        &mut self,
        name: &str,
        default: &str,
    ) -> String {
        self.consume_optional_raw_attribute(name)
            .unwrap_or_else(|| default.to_string())
    }

    /// Consume an attribute and return its trimmed value,
    ///   if it exists.
    pub fn consume_optional_raw_attribute(
        &mut self,
        name: &str,
    ) -> Option<String> {
        self.consume_attribute_node(name)
            .map(|attr| attr.value.trim().to_string())
    }

    /// Consume an attribute that must be present.
    pub fn consume_required_raw_attribute(
        &mut self,
        name: &str,
    ) -> Result<String> {
        self.consume_optional_raw_attribute(name).ok_or_else(|| {
            XmlError::MissingAttribute {
                elem: self.elem.name.clone(),
                attr: name.to_string(),
                span: self.elem.span,
            }
        })
    }

    /// Consume an attribute whose value must be the literal `true` or
    ///   `false`.
    pub fn consume_boolean_constant_attribute(
        &mut self,
        name: &str,
    ) -> Result<Option<bool>> {
        let span = self.attribute_span(name);

        match self.consume_optional_raw_attribute(name).as_deref() {
            None => Ok(None),
            Some("true") => Ok(Some(true)),
            Some("false") => Ok(Some(false)),
            Some(value) => Err(XmlError::BadBooleanAttribute {
                attr: name.to_string(),
                value: value.to_string(),
                span,
            }),
        }
    }

    /// Consume an attribute holding a list of values separated by
    ///   whitespace or commas.
    pub fn consume_raw_array_attribute(&mut self, name: &str) -> Vec<String> {
        self.consume_raw_attribute(name)
            .split(|c: char| c == ',' || c.is_whitespace())
            .filter(|s| !s.is_empty())
            .map(String::from)
            .collect()
    }

    /// Consume an attribute and parse its value as arguments of the given
    ///   types.
    ///
    /// The same literal may yield a boolean literal, a numeric literal, or
    ///   a `{field.reference}` expression depending on what `types` the
    ///   caller requires it to produce
    ///     (see [`crate::attr`]).
    pub fn consume_attribute(
        &mut self,
        name: &str,
        types: &[TypeRef],
        ctx: &mut AttrContext,
    ) -> std::result::Result<Option<Vec<Expr>>, AttrParseError> {
        let attr = match self.consume_attribute_node(name) {
            Some(attr) => attr,
            None => return Ok(None),
        };

        ctx.parse(attr.value.trim(), types, attr.span).map(Some)
    }

    /// Like [`XmlElement::consume_attribute`],
    ///   for a single value.
    pub fn consume_single_attribute(
        &mut self,
        name: &str,
        ty: &TypeRef,
        ctx: &mut AttrContext,
    ) -> std::result::Result<Option<Expr>, AttrParseError> {
        let attr = match self.consume_attribute_node(name) {
            Some(attr) => attr,
            None => return Ok(None),
        };

        ctx.parse_single(attr.value.trim(), ty, attr.span).map(Some)
    }

    /// Remove and return every direct child element matching `pred`,
    ///   in document order.
    ///
    /// Unmatched children and all text nodes are left untouched.
    pub fn consume_child_elements<P>(&mut self, mut pred: P) -> Vec<XmlElement>
    where
        P: FnMut(&XmlElement) -> bool,
    {
        let mut consumed = Vec::new();
        let mut kept = Vec::with_capacity(self.elem.children.len());

        for node in self.elem.children.drain(..) {
            match node {
                Node::Element(elem) => {
                    let child = XmlElement {
                        elem,
                        preserve_whitespace: self.preserve_whitespace,
                    };

                    if pred(&child) {
                        consumed.push(child);
                    } else {
                        kept.push(Node::Element(child.elem));
                    }
                }
                text => kept.push(text),
            }
        }

        self.elem.children = kept;
        consumed
    }

    /// Remove and return every direct child element.
    ///
    /// Fails if any non-whitespace text remains among the children.
    pub fn consume_all_child_elements(&mut self) -> Result<Vec<XmlElement>> {
        self.assert_no_text()?;

        let children = self.consume_child_elements(|_| true);
        self.elem.children.clear();

        Ok(children)
    }

    /// Remove and return the one remaining child element.
    ///
    /// Fails unless exactly one child element remains,
    ///   or if any non-whitespace text remains.
    pub fn consume_single_child_element(&mut self) -> Result<XmlElement> {
        let found = self.elem.child_elements().count();

        if found != 1 {
            return Err(XmlError::SingleChildExpected {
                elem: self.elem.name.clone(),
                found,
                span: self.elem.span,
            });
        }

        self.consume_all_child_elements()?
            .pop()
            .ok_or(XmlError::SingleChildExpected {
                elem: self.elem.name.clone(),
                found: 0,
                span: self.elem.span,
            })
    }

    fn assert_no_text(&self) -> Result<()> {
        let text = self.elem.children.iter().find_map(|node| match node {
            Node::Text(text) if !text.is_whitespace() => Some(text),
            _ => None,
        });

        match text {
            Some(Text { span, .. }) => Err(XmlError::UnexpectedText {
                elem: self.elem.name.clone(),
                span: *span,
            }),
            None => Ok(()),
        }
    }

    /// Whether any child element or non-whitespace text remains.
    pub fn has_content(&self) -> bool {
        self.elem.children.iter().any(|node| match node {
            Node::Element(_) => true,
            Node::Text(text) => !text.is_whitespace(),
        })
    }

    /// Span of the first remaining child element or non-whitespace text.
    pub fn first_content_span(&self) -> Option<Span> {
        self.elem.children.iter().find_map(|node| match node {
            Node::Element(elem) => Some(elem.span),
            Node::Text(text) if !text.is_whitespace() => Some(text.span),
            Node::Text(_) => None,
        })
    }

    /// Consume the body of this element and render it as HTML.
    ///
    /// Text is escaped as HTML.
    /// Each child element is first offered to `interp`;
    ///   elements it does not substitute are rendered with their remaining
    ///   attributes and their bodies rendered recursively.
    /// All children are consumed.
    pub fn consume_inner_html<I>(
        &mut self,
        interp: &mut I,
    ) -> std::result::Result<String, I::Error>
    where
        I: Interpreter<String>,
    {
        let mut html = String::new();
        let children = std::mem::take(&mut self.elem.children);

        for node in children {
            match node {
                Node::Text(text) => {
                    interp.visit_text(&text.value)?;
                    html.push_str(&escape_text(
                        &text.value,
                        self.preserve_whitespace,
                    ));
                }

                Node::Element(elem) => {
                    let mut child = self.wrap_child(elem);

                    interp.enter_element(&child)?;

                    match interp.interpret_element(&mut child)? {
                        Some(replacement) => html.push_str(&replacement),
                        None => {
                            html.push_str(&child.opening_tag());

                            if !child.is_void() {
                                html.push_str(
                                    &child.consume_inner_html(interp)?,
                                );
                                html.push_str(&child.closing_tag());
                            }
                        }
                    }

                    interp.leave_element(&child)?;
                }
            }
        }

        Ok(html)
    }

    /// Consume the body of this element as plain text.
    ///
    /// Child elements must be substituted by `interp`;
    ///   any that are not result in an error.
    /// Unless whitespace is being preserved,
    ///   runs of whitespace are collapsed and the result is trimmed.
    pub fn consume_inner_text<I>(
        &mut self,
        interp: &mut I,
    ) -> std::result::Result<String, I::Error>
    where
        I: Interpreter<String>,
    {
        let mut text = String::new();
        let children = std::mem::take(&mut self.elem.children);

        for node in children {
            match node {
                Node::Text(node) => text.push_str(&node.value),
                Node::Element(elem) => {
                    let mut child = self.wrap_child(elem);

                    match interp.interpret_element(&mut child)? {
                        Some(replacement) => text.push_str(&replacement),
                        None => {
                            return Err(XmlError::IllegalChild {
                                parent: self.elem.name.clone(),
                                child: child.elem.name,
                                span: child.elem.span,
                            }
                            .into())
                        }
                    }
                }
            }
        }

        Ok(match self.preserve_whitespace {
            true => text,
            false => collapse_whitespace(&text).trim().to_string(),
        })
    }

    /// Consume the text body of this element verbatim.
    ///
    /// Child elements are not permitted.
    pub fn consume_unescaped_inner_text(&mut self) -> Result<String> {
        let mut text = String::new();

        for node in std::mem::take(&mut self.elem.children) {
            match node {
                Node::Text(node) => text.push_str(&node.value),
                Node::Element(child) => {
                    return Err(XmlError::IllegalChild {
                        parent: self.elem.name.clone(),
                        child: child.name,
                        span: child.span,
                    })
                }
            }
        }

        Ok(text.trim().to_string())
    }

    /// Whether this is an HTML element that cannot have content.
    pub fn is_void(&self) -> bool {
        VOID_ELEMENTS.contains(&self.local_name())
            && !self.elem.children.iter().any(|node| match node {
                Node::Element(_) => true,
                Node::Text(text) => !text.is_whitespace(),
            })
    }

    /// Render the opening tag of this element with its unconsumed
    ///   attributes.
    pub fn opening_tag(&self) -> String {
        let mut tag = format!("<{}", self.local_name());

        for attr in self.elem.attrs.iter() {
            tag.push_str(&format!(
                " {}='{}'",
                attr.name,
                escape_attribute_text(&attr.value)
            ));
        }

        tag.push('>');
        tag
    }

    pub fn closing_tag(&self) -> String {
        format!("</{}>", self.local_name())
    }
}
