// Field reference syntax within attribute values
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

//! Field reference syntax within attribute values.
//!
//! An attribute value may refer to a field using curly braces:
//!
//! ```xml
//!   <g:Label text="{res.messages.greeting}" />
//! ```
//!
//! A value may mix literal text and references,
//!   as in `"Hello, {user.getName}!"`;
//!     whether that is permitted depends on the type being parsed
//!       (see [`super::AttributeParser`]).
//!
//! Two opening braces `{{` produce a literal `{`,
//!   and braces whose contents do not begin like a Java identifier
//!   (such as `{0}`)
//!   are left as literal text so that such values need not be escaped.

use memchr::memchr2;
use std::borrow::Cow;

/// A piece of an attribute value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment<'a> {
    Literal(Cow<'a, str>),

    /// Dotted path of a field reference,
    ///   without braces.
    Reference(&'a str),
}

/// The value contains an opening brace with no matching closing brace,
///   or a brace nested within a reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Malformed;

/// Whether `value` may contain field references,
///   determined without parsing.
pub fn may_contain_reference(value: &str) -> bool {
    memchr2(b'{', b'}', value.as_bytes()).is_some()
}

/// Split `value` into literal text and field references.
///
/// Adjacent literal text is merged into a single segment.
pub fn split(value: &str) -> Result<Vec<Segment>, Malformed> {
    if !may_contain_reference(value) {
        return Ok(match value.is_empty() {
            true => vec![],
            false => vec![Segment::Literal(Cow::Borrowed(value))],
        });
    }

    let bytes = value.as_bytes();
    let mut segments = Vec::new();
    let mut literal = String::new();
    let mut offset = 0;

    while let Some(rel) = memchr2(b'{', b'}', &bytes[offset..]) {
        let pos = offset + rel;
        literal.push_str(&value[offset..pos]);

        // A lone closing brace is literal.
        if bytes[pos] == b'}' {
            literal.push('}');
            offset = pos + 1;
            continue;
        }

        if bytes.get(pos + 1) == Some(&b'{') {
            literal.push('{');
            offset = pos + 2;
            continue;
        }

        let close = match memchr2(b'{', b'}', &bytes[pos + 1..]) {
            Some(rel) if bytes[pos + 1 + rel] == b'}' => pos + 1 + rel,
            _ => return Err(Malformed),
        };

        let path = &value[pos + 1..close];

        if is_reference_path(path) {
            if !literal.is_empty() {
                let text = std::mem::take(&mut literal);
                segments.push(Segment::Literal(text.into()));
            }
            segments.push(Segment::Reference(path));
        } else {
            literal.push_str(&value[pos..=close]);
        }

        offset = close + 1;
    }

    literal.push_str(&value[offset..]);

    if !literal.is_empty() {
        segments.push(Segment::Literal(literal.into()));
    }

    Ok(segments)
}

/// The path of `value` if it consists of exactly one field reference and
///   nothing else.
pub fn single_reference(value: &str) -> Option<&str> {
    match split(value).ok()?.as_slice() {
        [Segment::Reference(path)] => Some(*path),
        _ => None,
    }
}

/// Whether the contents of braces form a field reference rather than
///   literal text.
fn is_reference_path(path: &str) -> bool {
    let mut chars = path.chars();

    match chars.next() {
        Some(c) if c == '$' || c == '_' || c.is_ascii_alphabetic() => (),
        _ => return false,
    }

    path.split('.').all(|segment| {
        !segment.is_empty()
            && segment
                .chars()
                .all(|c| c == '$' || c == '_' || c.is_ascii_alphanumeric())
    })
}
