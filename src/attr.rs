// Attribute value parsing
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

//! Attribute value parsing.
//!
//! The same attribute literal may become a boolean literal,
//!   a numeric literal,
//!   a string concatenation,
//!   or a `{field.reference}` expression,
//!     depending on the type that the consumer of the attribute requires.
//! [`AttributeParsers`] selects an [`AttributeParser`] for a list of
//!   required types:
//!
//!   1. by exact match on the comma-separated erased names of those
//!        types;
//!   2. if a single enum type was requested,
//!        by synthesizing a parser for its constants; and
//!   3. otherwise by falling back to a parser that accepts only field
//!        references.
//!
//! Every parser accepts a field reference in place of a literal;
//!   references are recorded with the [`FieldManager`] against the
//!   required type and validated once the template has been parsed.

mod reference;

pub use reference::{
    may_contain_reference, single_reference, split, Malformed, Segment,
};

use crate::{
    diagnose::{Annotate, AnnotatedSpan, Diagnostic},
    field::FieldManager,
    global,
    java::Expr,
    oracle::{Primitive, TypeCache, TypeRef},
    span::Span,
};
use fxhash::FxHashMap;
use std::{
    error::Error,
    fmt::{self, Display},
};

/// Strategy for turning an attribute value into expressions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttributeParser {
    Boolean,

    /// String literal with interpolated field references.
    Str,

    Int,
    Double,

    /// Two comma-separated integers.
    IntPair,

    HorizontalAlignment,
    VerticalAlignment,

    Enum {
        ty: TypeRef,
        constants: Vec<String>,
    },

    /// Only field references are accepted,
    ///   one per required type.
    FieldReference(Vec<TypeRef>),
}

/// Horizontal alignment constant names,
///   without their `ALIGN_` prefix.
const HORIZONTAL_CONSTANTS: &[&str] = &[
    "LEFT",
    "CENTER",
    "RIGHT",
    "JUSTIFY",
    "LOCALE_START",
    "LOCALE_END",
    "DEFAULT",
];

const VERTICAL_CONSTANTS: &[&str] = &["TOP", "MIDDLE", "BOTTOM"];

impl AttributeParser {
    /// Parse `value` into one expression per argument.
    pub fn parse(
        &self,
        value: &str,
        span: Span,
        fields: &mut FieldManager,
    ) -> Result<Vec<Expr>, AttrParseError> {
        use AttributeParser::*;
        use Primitive as P;

        let mut p = ValueParser {
            value,
            span,
            expected: self.expected(),
            fields,
        };

        Ok(match self {
            Boolean => {
                vec![p.literal_or_ref(value, prim(P::Boolean), parse_boolean)?]
            }
            Int => vec![p.literal_or_ref(value, prim(P::Int), parse_int)?],
            Double => {
                vec![p.literal_or_ref(value, prim(P::Double), parse_double)?]
            }
            Str => vec![p.interpolate(value)?],

            IntPair => {
                let parts: Vec<_> = value.split(',').map(str::trim).collect();

                match parts.as_slice() {
                    [x, y] => vec![
                        p.literal_or_ref(x, prim(P::Int), parse_int)?,
                        p.literal_or_ref(y, prim(P::Int), parse_int)?,
                    ],
                    _ => return Err(p.error(AttrParseErrorKind::NotIntPair)),
                }
            }

            HorizontalAlignment => vec![p.alignment(
                global::HORIZONTAL_ALIGNMENT_TYPE,
                HORIZONTAL_CONSTANTS,
            )?],

            VerticalAlignment => vec![p.alignment(
                global::VERTICAL_ALIGNMENT_TYPE,
                VERTICAL_CONSTANTS,
            )?],

            Enum { ty, constants } => {
                vec![p.literal_or_ref(value, ty.clone(), |v| {
                    constants
                        .iter()
                        .find(|c| *c == v)
                        .map(|c| Expr::name(ty.erased_name()).dot(c))
                        .ok_or(AttrParseErrorKind::UnknownConstant)
                })?]
            }

            FieldReference(types) => {
                let parts: Vec<_> = match types.len() {
                    1 => vec![value],
                    _ => value.split(',').map(str::trim).collect(),
                };

                if parts.len() != types.len() {
                    return Err(p.error(AttrParseErrorKind::ArgumentCount {
                        expected: types.len(),
                        found: parts.len(),
                    }));
                }

                parts
                    .into_iter()
                    .zip(types)
                    .map(|(part, ty)| {
                        p.literal_or_ref(part, ty.clone(), |_| {
                            Err(AttrParseErrorKind::FieldReferenceRequired)
                        })
                    })
                    .collect::<Result<Vec<_>, AttrParseError>>()?
            }
        })
    }

    /// Human-readable description of what this parser accepts.
    fn expected(&self) -> String {
        use AttributeParser::*;

        match self {
            Boolean => "boolean".into(),
            Str => "String".into(),
            Int => "int".into(),
            Double => "double".into(),
            IntPair => "int,int".into(),
            HorizontalAlignment => "horizontal alignment".into(),
            VerticalAlignment => "vertical alignment".into(),
            Enum { ty, .. } => ty.to_string(),
            FieldReference(types) => types
                .iter()
                .map(TypeRef::to_string)
                .collect::<Vec<_>>()
                .join(","),
        }
    }
}

fn prim(p: Primitive) -> TypeRef {
    TypeRef::Primitive(p)
}

fn parse_boolean(value: &str) -> Result<Expr, AttrParseErrorKind> {
    match value {
        "true" | "false" => Ok(Expr::literal(value)),
        _ => Err(AttrParseErrorKind::NotBoolean),
    }
}

fn parse_int(value: &str) -> Result<Expr, AttrParseErrorKind> {
    value
        .parse::<i32>()
        .map(|n| Expr::int(n.into()))
        .map_err(|_| AttrParseErrorKind::NotInt)
}

fn parse_double(value: &str) -> Result<Expr, AttrParseErrorKind> {
    let valid_chars = value
        .chars()
        .all(|c| c.is_ascii_digit() || matches!(c, '.' | 'e' | 'E' | '+' | '-'));

    match valid_chars && value.parse::<f64>().is_ok() {
        true => Ok(Expr::literal(value)),
        false => Err(AttrParseErrorKind::NotDouble),
    }
}

/// State shared by the parsing of each argument of a single value.
struct ValueParser<'v, 'f> {
    value: &'v str,
    span: Span,
    expected: String,
    fields: &'f mut FieldManager,
}

impl<'v, 'f> ValueParser<'v, 'f> {
    fn error(&self, kind: AttrParseErrorKind) -> AttrParseError {
        AttrParseError {
            value: self.value.to_string(),
            expected: self.expected.clone(),
            span: self.span,
            kind,
        }
    }

    /// Parse `part` as a field reference required to produce `ty`,
    ///   or as a literal using `literal`.
    fn literal_or_ref<F>(
        &mut self,
        part: &str,
        ty: TypeRef,
        literal: F,
    ) -> Result<Expr, AttrParseError>
    where
        F: FnOnce(&str) -> Result<Expr, AttrParseErrorKind>,
    {
        if !may_contain_reference(part) {
            return literal(part).map_err(|kind| self.error(kind));
        }

        match split(part) {
            Err(Malformed) => {
                Err(self.error(AttrParseErrorKind::MalformedFieldReference))
            }
            Ok(segments) => match segments.as_slice() {
                [Segment::Reference(path)] => Ok(self
                    .fields
                    .register_field_reference(path, ty, self.span)),
                [Segment::Literal(text)] => {
                    literal(text).map_err(|kind| self.error(kind))
                }
                _ => Err(self.error(AttrParseErrorKind::MixedFieldReference)),
            },
        }
    }

    /// String value with any number of interpolated references.
    fn interpolate(&mut self, part: &str) -> Result<Expr, AttrParseError> {
        let segments = split(part).map_err(|Malformed| {
            self.error(AttrParseErrorKind::MalformedFieldReference)
        })?;

        let exprs = segments
            .into_iter()
            .map(|segment| match segment {
                Segment::Literal(text) => Expr::str(text),
                Segment::Reference(path) => self.fields.register_field_reference(
                    path,
                    TypeRef::string(),
                    self.span,
                ),
            })
            .collect();

        Ok(Expr::concat(exprs))
    }

    /// An alignment constant such as `left` or `ALIGN_LEFT`,
    ///   case-insensitively.
    fn alignment(
        &mut self,
        ty: &str,
        constants: &[&str],
    ) -> Result<Expr, AttrParseError> {
        // The constants are declared on the interface enclosing the
        //   constant type.
        let holder = ty.rsplit_once('.').map_or(ty, |(holder, _)| holder);

        self.literal_or_ref(self.value, TypeRef::class(ty), |v| {
            let upper = v.to_ascii_uppercase();
            let name = upper.strip_prefix("ALIGN_").unwrap_or(&upper);

            constants
                .iter()
                .find(|c| **c == name)
                .map(|c| Expr::name(format!("{holder}.ALIGN_{c}")))
                .ok_or(AttrParseErrorKind::UnknownConstant)
        })
    }
}

/// Registry of [`AttributeParser`]s keyed by type signature.
#[derive(Debug)]
pub struct AttributeParsers {
    by_signature: FxHashMap<String, AttributeParser>,
}

impl Default for AttributeParsers {
    fn default() -> Self {
        Self::new()
    }
}

impl AttributeParsers {
    /// Registry of the built-in parsers.
    pub fn new() -> Self {
        use AttributeParser::*;

        let builtin = [
            ("boolean", Boolean),
            ("java.lang.Boolean", Boolean),
            (global::STRING_TYPE, Str),
            ("int", Int),
            ("java.lang.Integer", Int),
            ("double", Double),
            ("java.lang.Double", Double),
            ("int,int", IntPair),
            (global::HORIZONTAL_ALIGNMENT_TYPE, HorizontalAlignment),
            (global::VERTICAL_ALIGNMENT_TYPE, VerticalAlignment),
        ];

        Self {
            by_signature: builtin
                .into_iter()
                .map(|(sig, parser)| (sig.to_string(), parser))
                .collect(),
        }
    }

    /// Parser for values of the given types.
    pub fn get(&self, types: &[TypeRef], cache: &TypeCache) -> AttributeParser {
        if let Some(parser) = self.by_signature.get(&signature(types)) {
            return parser.clone();
        }

        if let [ty] = types {
            if let Some(class) = cache.resolve(ty).filter(|c| c.is_enum()) {
                return AttributeParser::Enum {
                    ty: ty.erased(),
                    constants: class.enum_constants.clone(),
                };
            }
        }

        AttributeParser::FieldReference(types.to_vec())
    }
}

/// Comma-separated erased names of `types`.
fn signature(types: &[TypeRef]) -> String {
    types
        .iter()
        .map(TypeRef::erased_name)
        .collect::<Vec<_>>()
        .join(",")
}

/// Everything needed to parse an attribute value in the context of the
///   template being compiled.
pub struct AttrContext<'a, 'o> {
    pub parsers: &'a AttributeParsers,
    pub cache: &'a TypeCache<'o>,
    pub fields: &'a mut FieldManager,
}

impl<'a, 'o> AttrContext<'a, 'o> {
    pub fn new(
        parsers: &'a AttributeParsers,
        cache: &'a TypeCache<'o>,
        fields: &'a mut FieldManager,
    ) -> Self {
        Self {
            parsers,
            cache,
            fields,
        }
    }

    /// Parse `value` into one expression per type in `types`.
    pub fn parse(
        &mut self,
        value: &str,
        types: &[TypeRef],
        span: Span,
    ) -> Result<Vec<Expr>, AttrParseError> {
        self.parsers
            .get(types, self.cache)
            .parse(value, span, self.fields)
    }

    pub fn parse_single(
        &mut self,
        value: &str,
        ty: &TypeRef,
        span: Span,
    ) -> Result<Expr, AttrParseError> {
        let mut exprs = self.parse(value, std::slice::from_ref(ty), span)?;

        match exprs.len() {
            1 => Ok(exprs.remove(0)),
            found => Err(AttrParseError {
                value: value.to_string(),
                expected: ty.to_string(),
                span,
                kind: AttrParseErrorKind::ArgumentCount { expected: 1, found },
            }),
        }
    }
}

/// An attribute value could not be parsed as the required type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttrParseError {
    pub value: String,
    /// Description of the required type(s).
    pub expected: String,
    pub span: Span,
    pub kind: AttrParseErrorKind,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttrParseErrorKind {
    NotBoolean,
    NotInt,
    NotDouble,
    NotIntPair,

    /// Not one of the constants of an enum or alignment type.
    UnknownConstant,

    /// The required type has no literal syntax.
    FieldReferenceRequired,

    /// Unbalanced or nested braces.
    MalformedFieldReference,

    /// A field reference mixed with literal text where only a single
    ///   value is permitted.
    MixedFieldReference,

    ArgumentCount { expected: usize, found: usize },
}

impl Display for AttrParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use AttrParseErrorKind::*;

        let AttrParseError {
            value, expected, ..
        } = self;

        match &self.kind {
            NotBoolean | NotInt | NotDouble | NotIntPair | UnknownConstant => {
                write!(f, "cannot parse \"{value}\" as {expected}")
            }
            FieldReferenceRequired => write!(
                f,
                "cannot parse \"{value}\" as {expected}: \
                   a field reference is required"
            ),
            MalformedFieldReference => {
                write!(f, "malformed field reference in \"{value}\"")
            }
            MixedFieldReference => write!(
                f,
                "\"{value}\" mixes a field reference with other text, \
                   which is permitted only for String values"
            ),
            ArgumentCount { expected: n, found } => write!(
                f,
                "expected {n} comma-separated values of {expected}, \
                   but found {found} in \"{value}\""
            ),
        }
    }
}

impl Error for AttrParseError {}

impl Diagnostic for AttrParseError {
    fn describe(&self) -> Vec<AnnotatedSpan> {
        use AttrParseErrorKind::*;

        match self.kind {
            FieldReferenceRequired => self
                .span
                .error(format!("expected {}", self.expected))
                .with_help("use {field.method} to provide a value"),
            MalformedFieldReference => self
                .span
                .mark_error()
                .with_help("use {{ to produce a literal {"),
            UnknownConstant => self.span.error(format!(
                "not a constant of {}",
                self.expected
            ))
            .into(),
            _ => self.span.error(format!("expected {}", self.expected)).into(),
        }
    }
}
