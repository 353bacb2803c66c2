// Structured Java source representation
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

//! Structured representation of generated Java source.
//!
//! Generated code is assembled as a small tree of expressions,
//!   statements,
//!   and declarations,
//!     which is rendered to text only once the entire compilation unit is
//!     known
//!       (see [`JavaWriter`]).
//! This allows properties of the generated code,
//!   such as the order of field declarations,
//!   to be inspected and tested without parsing the output,
//!     and keeps indentation and escaping out of the code that decides
//!     _what_ to generate.
//!
//! Type names are carried as source strings and rendered verbatim;
//!   fully qualified names are used throughout except for the runtime
//!   helper classes imported by every generated unit.

mod render;

pub use render::{JavaWriter, SourceWriter};

use crate::xml::escape::escape_java_string;
use std::fmt::{self, Display};

/// Simple name of a qualified type name.
pub fn simple_name(qualified: &str) -> &str {
    qualified.rsplit('.').next().unwrap_or(qualified)
}

/// Java expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expr {
    Null,

    /// Numeric, boolean, or character literal rendered verbatim.
    Literal(String),

    /// String literal,
    ///   escaped when rendered.
    Str(String),

    /// Local variable, parameter, field, or qualified name.
    Name(String),

    /// `Type.class`
    ClassLiteral(String),

    /// Method invocation,
    ///   optionally qualified by a target expression.
    Call {
        target: Option<Box<Expr>>,
        method: String,
        args: Vec<Expr>,
    },

    /// `new Type(args)`
    New { ty: String, args: Vec<Expr> },

    /// `new Type() { methods }`
    Anonymous { ty: String, methods: Vec<MethodDecl> },

    /// `(Type) expr`
    Cast { ty: String, expr: Box<Expr> },

    /// String concatenation.
    Concat(Vec<Expr>),
}

impl Expr {
    pub fn name<S: Into<String>>(name: S) -> Self {
        Self::Name(name.into())
    }

    pub fn str<S: Into<String>>(value: S) -> Self {
        Self::Str(value.into())
    }

    pub fn literal<S: Into<String>>(value: S) -> Self {
        Self::Literal(value.into())
    }

    pub fn bool(value: bool) -> Self {
        Self::Literal(value.to_string())
    }

    pub fn int(value: i64) -> Self {
        Self::Literal(value.to_string())
    }

    /// Unqualified method invocation.
    pub fn invoke<S: Into<String>>(method: S, args: Vec<Expr>) -> Self {
        Self::Call {
            target: None,
            method: method.into(),
            args,
        }
    }

    /// Static method invocation on the named type.
    pub fn static_call<T, S>(ty: T, method: S, args: Vec<Expr>) -> Self
    where
        T: Into<String>,
        S: Into<String>,
    {
        Self::name(ty).call(method, args)
    }

    /// Invoke a method on the value of this expression.
    pub fn call<S: Into<String>>(self, method: S, args: Vec<Expr>) -> Self {
        Self::Call {
            target: Some(Box::new(self)),
            method: method.into(),
            args,
        }
    }

    /// Access a field of the value of this expression.
    ///
    /// Only names may be qualified this way.
    pub fn dot<S: AsRef<str>>(self, field: S) -> Self {
        match self {
            Self::Name(name) => Self::Name(format!("{name}.{}", field.as_ref())),
            other => other.call(field.as_ref(), vec![]),
        }
    }

    pub fn new_instance<S: Into<String>>(ty: S, args: Vec<Expr>) -> Self {
        Self::New {
            ty: ty.into(),
            args,
        }
    }

    pub fn cast<S: Into<String>>(ty: S, expr: Expr) -> Self {
        Self::Cast {
            ty: ty.into(),
            expr: Box::new(expr),
        }
    }

    /// String concatenation of `parts`,
    ///   merging adjacent string literals.
    ///
    /// A single part is returned as-is,
    ///   and no parts yield the empty string.
    pub fn concat(parts: Vec<Expr>) -> Self {
        let mut merged: Vec<Expr> = Vec::with_capacity(parts.len());

        for part in parts {
            match part {
                Self::Str(s) if s.is_empty() => (),
                Self::Str(s) => match merged.last_mut() {
                    Some(Self::Str(prev)) => prev.push_str(&s),
                    _ => merged.push(Self::Str(s)),
                },
                Self::Concat(inner) => merged.extend(inner),
                part => merged.push(part),
            }
        }

        match merged.len() {
            0 => Self::str(""),
            1 => merged.remove(0),
            _ => Self::Concat(merged),
        }
    }

    /// Whether this expression must be parenthesized when used as the
    ///   target of a method invocation or the operand of a cast.
    fn needs_parens(&self) -> bool {
        matches!(self, Self::Cast { .. } | Self::Concat(_))
    }
}

impl Display for Expr {
    /// Render the expression on a single line.
    ///
    /// Anonymous class bodies are rendered in full,
    ///   so this is intended for diagnostics and tests;
    ///   see [`JavaWriter`] for rendering generated source.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => write!(f, "null"),
            Self::Literal(lit) => write!(f, "{lit}"),
            Self::Str(s) => write!(f, "\"{}\"", escape_java_string(s)),
            Self::Name(name) => write!(f, "{name}"),
            Self::ClassLiteral(ty) => write!(f, "{ty}.class"),
            Self::Call {
                target,
                method,
                args,
            } => {
                match target {
                    Some(t) if t.needs_parens() => write!(f, "({t}).")?,
                    Some(t) => write!(f, "{t}.")?,
                    None => (),
                }
                write!(f, "{method}(")?;
                fmt_args(f, args)?;
                write!(f, ")")
            }
            Self::New { ty, args } => {
                write!(f, "new {ty}(")?;
                fmt_args(f, args)?;
                write!(f, ")")
            }
            Self::Anonymous { ty, methods } => {
                write!(f, "new {ty}() {{ ")?;
                for method in methods {
                    write!(f, "{} ", method.signature())?;
                    write!(f, "{{ ")?;
                    for stmt in method.body.iter().flatten() {
                        write!(f, "{stmt} ")?;
                    }
                    write!(f, "}} ")?;
                }
                write!(f, "}}")
            }
            Self::Cast { ty, expr } if expr.needs_parens() => {
                write!(f, "({ty}) ({expr})")
            }
            Self::Cast { ty, expr } => write!(f, "({ty}) {expr}"),
            Self::Concat(parts) => {
                for (i, part) in parts.iter().enumerate() {
                    if i > 0 {
                        write!(f, " + ")?;
                    }
                    write!(f, "{part}")?;
                }
                Ok(())
            }
        }
    }
}

fn fmt_args(f: &mut fmt::Formatter<'_>, args: &[Expr]) -> fmt::Result {
    for (i, arg) in args.iter().enumerate() {
        if i > 0 {
            write!(f, ", ")?;
        }
        write!(f, "{arg}")?;
    }
    Ok(())
}

/// Java statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Stmt {
    Expr(Expr),

    /// Local variable declaration.
    Local {
        is_final: bool,
        ty: String,
        name: String,
        init: Expr,
    },

    Assign { target: Expr, value: Expr },

    Return(Expr),
}

impl Stmt {
    pub fn local<T: Into<String>, N: Into<String>>(
        ty: T,
        name: N,
        init: Expr,
    ) -> Self {
        Self::Local {
            is_final: false,
            ty: ty.into(),
            name: name.into(),
            init,
        }
    }

    pub fn final_local<T: Into<String>, N: Into<String>>(
        ty: T,
        name: N,
        init: Expr,
    ) -> Self {
        Self::Local {
            is_final: true,
            ty: ty.into(),
            name: name.into(),
            init,
        }
    }

    pub fn assign(target: Expr, value: Expr) -> Self {
        Self::Assign { target, value }
    }
}

impl From<Expr> for Stmt {
    fn from(expr: Expr) -> Self {
        Self::Expr(expr)
    }
}

impl Display for Stmt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Expr(expr) => write!(f, "{expr};"),
            Self::Local {
                is_final,
                ty,
                name,
                init,
            } => {
                if *is_final {
                    write!(f, "final ")?;
                }
                write!(f, "{ty} {name} = {init};")
            }
            Self::Assign { target, value } => write!(f, "{target} = {value};"),
            Self::Return(expr) => write!(f, "return {expr};"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Param {
    /// Annotations in source form,
    ///   written before the parameter type.
    pub annotations: Vec<String>,
    pub is_final: bool,
    pub ty: String,
    pub name: String,
}

impl Param {
    pub fn new<T: Into<String>, N: Into<String>>(ty: T, name: N) -> Self {
        Self {
            annotations: vec![],
            is_final: false,
            ty: ty.into(),
            name: name.into(),
        }
    }

    pub fn annotate<S: Into<String>>(mut self, annotation: S) -> Self {
        self.annotations.push(annotation.into());
        self
    }

    pub fn final_param<T: Into<String>, N: Into<String>>(ty: T, name: N) -> Self {
        Self {
            is_final: true,
            ..Self::new(ty, name)
        }
    }
}

/// Method declaration.
///
/// A method without a body is abstract
///   (or an interface method).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodDecl {
    /// Annotations in source form,
    ///   including the leading `@`.
    pub annotations: Vec<String>,
    pub modifiers: Vec<&'static str>,
    pub ret: String,
    pub name: String,
    pub params: Vec<Param>,
    pub body: Option<Vec<Stmt>>,
}

impl MethodDecl {
    pub fn new<R: Into<String>, N: Into<String>>(ret: R, name: N) -> Self {
        Self {
            annotations: vec![],
            modifiers: vec![],
            ret: ret.into(),
            name: name.into(),
            params: vec![],
            body: None,
        }
    }

    pub fn public(mut self) -> Self {
        self.modifiers.push("public");
        self
    }

    pub fn annotate<S: Into<String>>(mut self, annotation: S) -> Self {
        self.annotations.push(annotation.into());
        self
    }

    pub fn param(mut self, param: Param) -> Self {
        self.params.push(param);
        self
    }

    pub fn body(mut self, body: Vec<Stmt>) -> Self {
        self.body = Some(body);
        self
    }

    fn signature(&self) -> String {
        let mut sig = String::new();

        for modifier in self.modifiers.iter() {
            sig.push_str(modifier);
            sig.push(' ');
        }

        sig.push_str(&format!("{} {}(", self.ret, self.name));

        for (i, param) in self.params.iter().enumerate() {
            if i > 0 {
                sig.push_str(", ");
            }
            for annotation in param.annotations.iter() {
                sig.push_str(annotation);
                sig.push(' ');
            }
            if param.is_final {
                sig.push_str("final ");
            }
            sig.push_str(&format!("{} {}", param.ty, param.name));
        }

        sig.push(')');
        sig
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeclKind {
    Class,
    Interface,
}

/// Member of a class body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Member {
    Method(MethodDecl),
    Class(ClassDecl),
}

/// Class or interface declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassDecl {
    pub annotations: Vec<String>,
    pub modifiers: Vec<&'static str>,
    pub kind: DeclKind,
    pub name: String,
    pub extends: Vec<String>,
    pub implements: Vec<String>,
    pub members: Vec<Member>,
}

impl ClassDecl {
    pub fn class<S: Into<String>>(name: S) -> Self {
        Self::new(DeclKind::Class, name)
    }

    pub fn interface<S: Into<String>>(name: S) -> Self {
        Self::new(DeclKind::Interface, name)
    }

    fn new<S: Into<String>>(kind: DeclKind, name: S) -> Self {
        Self {
            annotations: vec![],
            modifiers: vec![],
            kind,
            name: name.into(),
            extends: vec![],
            implements: vec![],
            members: vec![],
        }
    }

    pub fn annotate<S: Into<String>>(mut self, annotation: S) -> Self {
        self.annotations.push(annotation.into());
        self
    }

    pub fn modifier(mut self, modifier: &'static str) -> Self {
        self.modifiers.push(modifier);
        self
    }

    pub fn extends<S: Into<String>>(mut self, ty: S) -> Self {
        self.extends.push(ty.into());
        self
    }

    pub fn implements<S: Into<String>>(mut self, ty: S) -> Self {
        self.implements.push(ty.into());
        self
    }

    pub fn method(mut self, method: MethodDecl) -> Self {
        self.members.push(Member::Method(method));
        self
    }

    pub fn nested(mut self, class: ClassDecl) -> Self {
        self.members.push(Member::Class(class));
        self
    }

    pub fn methods(&self) -> impl Iterator<Item = &MethodDecl> {
        self.members.iter().filter_map(|m| match m {
            Member::Method(method) => Some(method),
            Member::Class(_) => None,
        })
    }

    pub fn nested_classes(&self) -> impl Iterator<Item = &ClassDecl> {
        self.members.iter().filter_map(|m| match m {
            Member::Class(class) => Some(class),
            Member::Method(_) => None,
        })
    }
}

/// A single generated source file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompilationUnit {
    pub package: String,
    pub imports: Vec<String>,
    pub class: ClassDecl,
}

#[cfg(test)]
mod test;
