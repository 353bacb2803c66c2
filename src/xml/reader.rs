// Template reader
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

//! Read a template into an [`Element`] tree.
//!
//! This uses [`quick_xml`] as the parser.
//! Namespace resolution is performed here rather than by the underlying
//!   reader so that each element retains the full set of declarations in
//!   scope
//!     (needed to look up the prefix that a template chose for the binder
//!     namespace).

use super::{Attr, Element, Node, NsScope, QName, Result, Text, XmlError};
use crate::span::Span;
use memchr::memmem;
use quick_xml::{
    events::{BytesStart, Event},
    Reader,
};
use std::{borrow::Cow, rc::Rc};

/// Parse the template `src` into its root [`Element`].
pub fn parse_document(src: &str) -> Result<Element> {
    DocumentReader::new(src).read()
}

/// Entities commonly used in XHTML templates beyond the five predefined
///   by XML.
fn resolve_html_entity(name: &str) -> Option<&'static str> {
    Some(match name {
        "nbsp" => "\u{a0}",
        "copy" => "\u{a9}",
        "reg" => "\u{ae}",
        "trade" => "\u{2122}",
        "mdash" => "\u{2014}",
        "ndash" => "\u{2013}",
        "hellip" => "\u{2026}",
        "laquo" => "\u{ab}",
        "raquo" => "\u{bb}",
        "middot" => "\u{b7}",
        _ => return None,
    })
}

struct DocumentReader<'s> {
    src: &'s str,
    reader: Reader<&'s [u8]>,

    /// Elements opened but not yet closed.
    stack: Vec<Element>,

    root: Option<Element>,
    root_scope: Rc<NsScope>,
}

impl<'s> DocumentReader<'s> {
    fn new(src: &'s str) -> Self {
        let mut reader = Reader::from_str(src);

        // Whitespace is structurally significant to the DOM cursor.
        reader.trim_text(false);

        Self {
            src,
            reader,
            stack: Vec::new(),
            root: None,
            root_scope: Rc::new(NsScope::default()),
        }
    }

    fn read(mut self) -> Result<Element> {
        loop {
            let start = self.reader.buffer_position();
            let event = self.reader.read_event();
            let span = Span::from_range(start, self.reader.buffer_position());

            match event.map_err(|e| XmlError::Syntax(e.to_string(), span))? {
                Event::Start(ele) => {
                    let elem = self.open_element(&ele, span)?;
                    self.stack.push(elem);
                }

                Event::Empty(ele) => {
                    let elem = self.open_element(&ele, span)?;
                    self.close_element(elem)?;
                }

                Event::End(_) => match self.stack.pop() {
                    Some(elem) => self.close_element(elem)?,
                    None => return Err(XmlError::ContentOutsideRoot(span)),
                },

                Event::Text(text) => {
                    let value = text
                        .unescape_with(resolve_html_entity)
                        .map_err(|e| XmlError::Syntax(e.to_string(), span))?;

                    self.push_text(value, span)?;
                }

                Event::CData(cdata) => {
                    let bytes = cdata.into_inner();
                    self.push_text(String::from_utf8_lossy(&bytes), span)?;
                }

                Event::Comment(_)
                | Event::Decl(_)
                | Event::PI(_)
                | Event::DocType(_) => (),

                Event::Eof => break,
            }
        }

        if let Some(unclosed) = self.stack.pop() {
            return Err(XmlError::Unclosed(unclosed.name, unclosed.span));
        }

        self.root.ok_or(XmlError::NoRootElement)
    }

    fn open_element(&self, ele: &BytesStart, span: Span) -> Result<Element> {
        let name = QName::parse(&String::from_utf8_lossy(ele.name().as_ref()));
        let parent_scope = self
            .stack
            .last()
            .map(|parent| parent.scope.clone())
            .unwrap_or_else(|| self.root_scope.clone());

        let mut decls = Vec::new();
        let mut raw_attrs = Vec::new();

        for attr in ele.attributes() {
            let attr = attr.map_err(|e| XmlError::Syntax(e.to_string(), span))?;
            let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
            let value = attr
                .unescape_value_with(resolve_html_entity)
                .map_err(|e| XmlError::Syntax(e.to_string(), span))?
                .into_owned();

            let attr_span = self.attr_span(span, &key, attr.value.len());

            match key.split_once(':') {
                _ if key == "xmlns" => decls.push((None, value)),
                Some(("xmlns", prefix)) => {
                    decls.push((Some(prefix.to_string()), value))
                }
                _ => raw_attrs.push((QName::parse(&key), value, attr_span)),
            }
        }

        let scope = if decls.is_empty() {
            parent_scope
        } else {
            Rc::new(NsScope::new(Some(parent_scope), decls))
        };

        let ns = resolve(&scope, name.prefix.as_deref(), span)?;

        let attrs = raw_attrs
            .into_iter()
            .map(|(name, value, span)| {
                // Unprefixed attributes are in no namespace.
                let ns = match name.prefix {
                    Some(_) => resolve(&scope, name.prefix.as_deref(), span)?,
                    None => None,
                };

                Ok(Attr {
                    name,
                    ns,
                    value,
                    span,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Element {
            name,
            ns,
            attrs,
            children: Vec::new(),
            scope,
            span,
        })
    }

    fn close_element(&mut self, elem: Element) -> Result<()> {
        match self.stack.last_mut() {
            Some(parent) => {
                parent.children.push(Node::Element(elem));
                Ok(())
            }
            None if self.root.is_none() => {
                self.root = Some(elem);
                Ok(())
            }
            None => Err(XmlError::ContentOutsideRoot(elem.span)),
        }
    }

    fn push_text(&mut self, value: Cow<str>, span: Span) -> Result<()> {
        let parent = match self.stack.last_mut() {
            Some(parent) => parent,
            None if value.trim().is_empty() => return Ok(()),
            None => return Err(XmlError::ContentOutsideRoot(span)),
        };

        // Merge adjacent character data
        //   (e.g. text followed by CDATA).
        match parent.children.last_mut() {
            Some(Node::Text(prev)) => {
                prev.value.push_str(&value);
                prev.span = prev.span.merge(span);
            }
            _ => parent.children.push(Node::Text(Text {
                value: value.into_owned(),
                span,
            })),
        }

        Ok(())
    }

    /// Approximate span of an attribute within its opening tag.
    ///
    /// The reader does not report attribute offsets,
    ///   so the key is located within the raw tag text.
    /// If it cannot be found,
    ///   the span of the entire tag is used.
    fn attr_span(&self, tag_span: Span, key: &str, value_len: usize) -> Span {
        let raw = tag_span.slice(self.src).unwrap_or("");

        match memmem::find(raw.as_bytes(), key.as_bytes()) {
            Some(offset) => Span::new(
                tag_span.offset() as usize + offset,
                // key="value"
                key.len() + value_len + 3,
            ),
            None => tag_span,
        }
    }
}

fn resolve(
    scope: &NsScope,
    prefix: Option<&str>,
    span: Span,
) -> Result<Option<String>> {
    match (prefix, scope.uri(prefix)) {
        (_, Some(uri)) => Ok(Some(uri.to_string())),
        (None, None) => Ok(None),
        (Some(prefix), None) => {
            Err(XmlError::UnboundPrefix(prefix.to_string(), span))
        }
    }
}
