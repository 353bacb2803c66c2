// Escaping of template content
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

//! Escaping of template content for HTML and Java string literals.
//!
//! Template content passes through two escaping stages before it reaches
//!   generated source:
//!
//!   1. Text and attribute values are escaped as HTML when they are
//!        rendered into an HTML string
//!        ([`escape_text`], [`escape_attribute_text`]).
//!   2. Every string literal is escaped for Java when the compilation unit
//!        is rendered ([`escape_java_string`]).
//!
//! These stages are kept separate so that tokens embedded by the
//!   [`Tokenator`](crate::tokenator::Tokenator) survive both.

/// Escape text that will be interpreted at runtime as HTML.
///
/// Unless `preserve_whitespace` is set,
///   runs of whitespace are collapsed into a single space.
/// Quotes are not escaped since they are safe within text nodes.
pub fn escape_text(text: &str, preserve_whitespace: bool) -> String {
    let text = if preserve_whitespace {
        text.to_string()
    } else {
        collapse_whitespace(text)
    };

    let mut out = String::with_capacity(text.len());

    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(c),
        }
    }

    out
}

/// Escape text that will be interpreted at runtime as an HTML attribute
///   value.
///
/// Attribute values are rendered using single quotes,
///   which are escaped as character references.
pub fn escape_attribute_text(text: &str) -> String {
    escape_text(text, false).replace('\'', "&#39;")
}

/// Replace each run of whitespace with a single space.
pub fn collapse_whitespace(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut in_ws = false;

    for c in text.chars() {
        if c.is_whitespace() {
            if !in_ws {
                out.push(' ');
            }
            in_ws = true;
        } else {
            out.push(c);
            in_ws = false;
        }
    }

    out
}

/// Escape text for inclusion within a Java string literal
///   (without the surrounding quotes).
pub fn escape_java_string(text: &str) -> String {
    let mut out = String::with_capacity(text.len());

    for c in text.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c.is_control() => {
                out.push_str(&format!("\\u{:04x}", c as u32))
            }
            _ => out.push(c),
        }
    }

    out
}
