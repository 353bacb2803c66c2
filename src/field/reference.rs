// Deferred validation of field references
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

//! Deferred validation of field references.
//!
//! A [`FieldReference`] is created the first time a template mentions
//!   `{field.a.b}` and accumulates every type that the surrounding context
//!   requires it to produce.
//! After parsing,
//!   the reference is resolved by walking its path from the type of the
//!   field through the return types of zero-argument methods,
//!     searching each type hierarchy breadth-first,
//!   and the final type is checked against each required type according
//!   to [`assignability`].

use super::FieldManager;
use crate::{
    diagnose::{Annotate, AnnotatedSpan, Diagnostic},
    java::Expr,
    oracle::{Primitive, TypeCache, TypeRef},
    span::Span,
};
use std::{
    error::Error,
    fmt::{self, Display},
};

/// A `{field.method1.method2}` reference awaiting validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldReference {
    path: String,
    span: Span,
    left_types: Vec<TypeRef>,
}

impl FieldReference {
    pub fn new<S: Into<String>>(path: S, span: Span) -> Self {
        Self {
            path: path.into(),
            span,
            left_types: vec![],
        }
    }

    /// The dotted path without braces.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Span of the first occurrence of the reference.
    pub fn span(&self) -> Span {
        self.span
    }

    pub fn field_name(&self) -> &str {
        self.segments().next().unwrap_or("")
    }

    fn segments(&self) -> impl Iterator<Item = &str> {
        self.path.split('.')
    }

    /// Distinct types the reference is required to produce.
    pub fn left_types(&self) -> &[TypeRef] {
        &self.left_types
    }

    pub fn add_left_hand_type(&mut self, ty: TypeRef) {
        if !self.left_types.contains(&ty) {
            self.left_types.push(ty);
        }
    }

    /// Expression evaluating the reference:
    ///   `{a.b.c}` becomes `a.b().c()`.
    pub fn to_expr(&self) -> Expr {
        let mut segments = self.segments();
        let field = Expr::name(segments.next().unwrap_or(""));

        segments.fold(field, |expr, method| expr.call(method, vec![]))
    }

    /// Resolve the type produced by this reference and check it against
    ///   every required type.
    pub fn validate(
        &self,
        fields: &FieldManager,
        cache: &TypeCache,
    ) -> Vec<FieldReferenceError> {
        let right = match self.resolve_type(fields, cache) {
            Ok(ty) => ty,
            Err(kind) => return vec![self.error(kind)],
        };

        self.left_types
            .iter()
            .filter(|left| {
                assignability(left, &right, cache) == Assignability::Mismatch
            })
            .map(|left| {
                self.error(FieldReferenceErrorKind::Mismatch {
                    left: left.clone(),
                    right: right.clone(),
                })
            })
            .collect()
    }

    fn error(&self, kind: FieldReferenceErrorKind) -> FieldReferenceError {
        FieldReferenceError {
            reference: self.path.clone(),
            span: self.span,
            kind,
        }
    }

    fn resolve_type(
        &self,
        fields: &FieldManager,
        cache: &TypeCache,
    ) -> Result<TypeRef, FieldReferenceErrorKind> {
        let mut segments = self.segments();
        let name = segments.next().unwrap_or("");

        let field = fields
            .lookup(name)
            .ok_or_else(|| FieldReferenceErrorKind::NoSuchField(name.into()))?;

        let mut ty = field.ty().clone();

        for (i, method) in segments.enumerate() {
            let generated = match i {
                0 => field.generated_method(method).cloned(),
                _ => None,
            };

            ty = match generated {
                Some(ret) => ret,
                None => cache
                    .resolve(&ty)
                    .and_then(|class| cache.find_zero_arg_method(class, method))
                    .filter(|m| m.ret != TypeRef::Primitive(Primitive::Void))
                    .map(|m| m.ret.clone())
                    .ok_or_else(|| FieldReferenceErrorKind::NoSuchMethod {
                        ty: ty.to_string(),
                        method: method.into(),
                    })?,
            };
        }

        Ok(ty)
    }
}

/// Outcome of checking whether a value of type `right` may be used where
///   type `left` is required.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Assignability {
    /// The types are the same.
    Identical,

    /// Both are numeric and the right-hand side is primitive;
    ///   any narrowing is left to a cast at runtime.
    Numeric,

    /// One side is a primitive and the other is its boxed type.
    Boxed,

    /// Both are reference types and the right is assignable to the left.
    Assignable,

    /// The relationship between the types is not understood,
    ///   and so is accepted rather than risk rejecting a valid template.
    Permitted,

    Mismatch,
}

/// Whether a value of type `right` may be used where `left` is required.
///
/// Rules are applied in order:
///
///   1. identical types are [`Assignability::Identical`];
///   2. a numeric left-hand side
///        (primitive or boxed)
///        with a numeric primitive right-hand side is
///        [`Assignability::Numeric`];
///   3. a primitive and a reference type require the reference type to be
///        exactly the boxed type of the primitive;
///   4. two reference types require the right to be assignable to the
///        left;
///   5. anything else is [`Assignability::Permitted`].
///
/// Reference types unknown to the oracle cannot be checked and are
///   [`Assignability::Permitted`].
pub fn assignability(
    left: &TypeRef,
    right: &TypeRef,
    cache: &TypeCache,
) -> Assignability {
    use Assignability::*;
    use TypeRef::{Array, Class, Primitive as Prim};

    if left.erased() == right.erased() {
        return Identical;
    }

    if let Prim(r) = right {
        if r.is_numeric() && numeric_kind(left).is_some() {
            return Numeric;
        }
    }

    match (left, right) {
        (Prim(l), Prim(r)) if l.is_numeric() && r.is_numeric() => Numeric,
        (Prim(_), Prim(_)) => Mismatch,

        (Prim(prim), Class { name, .. }) | (Class { name, .. }, Prim(prim)) => {
            match name == prim.boxed_name() {
                true => Boxed,
                false => Mismatch,
            }
        }

        (Class { name: l, .. }, Class { name: r, .. }) => {
            if cache.find_type(l).is_none() || cache.find_type(r).is_none() {
                Permitted
            } else if cache.is_assignable_name(r, l) {
                Assignable
            } else {
                Mismatch
            }
        }

        (Array(_), _) | (_, Array(_)) => Permitted,
    }
}

/// The numeric primitive represented by `ty`,
///   whether primitive or boxed.
fn numeric_kind(ty: &TypeRef) -> Option<Primitive> {
    use Primitive::*;

    let prim = match ty {
        TypeRef::Primitive(prim) => *prim,
        TypeRef::Class { name, .. } => [Byte, Char, Short, Int, Long, Float, Double]
            .into_iter()
            .find(|p| p.boxed_name() == name)?,
        TypeRef::Array(_) => return None,
    };

    prim.is_numeric().then_some(prim)
}

/// A field reference that failed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldReferenceError {
    pub reference: String,
    pub span: Span,
    pub kind: FieldReferenceErrorKind,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldReferenceErrorKind {
    /// The first segment does not name a field.
    NoSuchField(String),

    /// A segment does not name a zero-argument method with a return
    ///   value.
    NoSuchMethod { ty: String, method: String },

    /// The reference produces a type that cannot be used where required.
    Mismatch { left: TypeRef, right: TypeRef },
}

impl Display for FieldReferenceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use FieldReferenceErrorKind::*;

        let reference = &self.reference;

        match &self.kind {
            NoSuchField(name) => {
                write!(f, "{{{reference}}}: no field named {name}")
            }
            NoSuchMethod { ty, method } => write!(
                f,
                "{{{reference}}}: no method {method}() in type {ty}"
            ),
            Mismatch { left, right } => write!(
                f,
                "{{{reference}}}: type {right} cannot be used as {left}"
            ),
        }
    }
}

impl Error for FieldReferenceError {}

impl Diagnostic for FieldReferenceError {
    fn describe(&self) -> Vec<AnnotatedSpan> {
        use FieldReferenceErrorKind::*;

        match &self.kind {
            NoSuchField(_) => self.span.mark_error().with_help(
                "fields are declared with ui:field or <ui:with>",
            ),
            NoSuchMethod { .. } => self.span.mark_error().into(),
            Mismatch { left, .. } => {
                self.span.error(format!("expected {left}")).into()
            }
        }
    }
}
