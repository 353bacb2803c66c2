// Host type introspection
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

//! Host type introspection.
//!
//! The template compiler does not itself understand Java source;
//!   it relies on the host toolchain to resolve type names into
//!   structured descriptors.
//! This module defines that contract as the [`TypeOracle`] trait along
//!   with the descriptor model that it produces:
//!
//!   - [`ClassType`] describes a class, interface, or enum,
//!       including its supertypes, methods, constructors, fields, and
//!       annotations;
//!   - [`TypeRef`] is a reference to a type from within a signature,
//!       which may be primitive, a (possibly parameterized) class, or an
//!       array; and
//!   - [`Method`], [`Constructor`], and [`FieldDecl`] describe members.
//!
//! Oracles answer only direct questions about a single type.
//! Questions requiring traversal of a type hierarchy
//!   (assignability, method lookup, parser dispatch)
//!   are answered by [`TypeCache`],
//!     which memoizes those traversals for the duration of a single
//!     template compilation.
//!
//! [`MemoryTypeOracle`] is a simple in-memory oracle that hosts may
//!   populate directly.

mod cache;
mod memory;

pub use cache::TypeCache;
pub use memory::MemoryTypeOracle;

use crate::global;
use std::fmt::{self, Display};

/// Resolution of type names into structured type descriptors.
///
/// Implementations must be able to enumerate all types
///   (see [`TypeOracle::types`])
///   so that the compiler can discover element subtypes by their tag
///   names.
pub trait TypeOracle {
    /// Look up a type by its fully qualified source name
    ///   (nested types are separated by `.`).
    fn find_type(&self, name: &str) -> Option<&ClassType>;

    /// Whether the given package is known to the oracle.
    fn find_package(&self, name: &str) -> bool;

    /// Iterate over every type known to the oracle.
    fn types(&self) -> Box<dyn Iterator<Item = &ClassType> + '_>;
}

/// Java primitive types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Primitive {
    Boolean,
    Byte,
    Char,
    Short,
    Int,
    Long,
    Float,
    Double,
    Void,
}

impl Primitive {
    pub fn from_name(name: &str) -> Option<Self> {
        use Primitive::*;

        Some(match name {
            "boolean" => Boolean,
            "byte" => Byte,
            "char" => Char,
            "short" => Short,
            "int" => Int,
            "long" => Long,
            "float" => Float,
            "double" => Double,
            "void" => Void,
            _ => return None,
        })
    }

    pub fn name(&self) -> &'static str {
        use Primitive::*;

        match self {
            Boolean => "boolean",
            Byte => "byte",
            Char => "char",
            Short => "short",
            Int => "int",
            Long => "long",
            Float => "float",
            Double => "double",
            Void => "void",
        }
    }

    /// Fully qualified name of the boxed counterpart of this primitive.
    pub fn boxed_name(&self) -> &'static str {
        use Primitive::*;

        match self {
            Boolean => "java.lang.Boolean",
            Byte => "java.lang.Byte",
            Char => "java.lang.Character",
            Short => "java.lang.Short",
            Int => "java.lang.Integer",
            Long => "java.lang.Long",
            Float => "java.lang.Float",
            Double => "java.lang.Double",
            Void => "java.lang.Void",
        }
    }

    /// Whether this primitive participates in numeric conversions.
    pub fn is_numeric(&self) -> bool {
        use Primitive::*;

        matches!(self, Byte | Char | Short | Int | Long | Float | Double)
    }
}

/// Reference to a type from within a signature.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeRef {
    Primitive(Primitive),

    /// A class, interface, or enum,
    ///   possibly with type arguments.
    Class { name: String, args: Vec<TypeRef> },

    Array(Box<TypeRef>),
}

impl TypeRef {
    pub fn class<S: Into<String>>(name: S) -> Self {
        Self::Class {
            name: name.into(),
            args: vec![],
        }
    }

    pub fn generic<S: Into<String>>(name: S, args: Vec<TypeRef>) -> Self {
        Self::Class {
            name: name.into(),
            args,
        }
    }

    pub fn string() -> Self {
        Self::class(global::STRING_TYPE)
    }

    /// Parse a source type name such as `int`, `java.lang.String`,
    ///   `com.example.Type<com.example.Handler>`, or `int[]`.
    ///
    /// This is a convenience for constructing descriptors;
    ///   it performs no validation beyond balancing angle brackets.
    pub fn parse(src: &str) -> Self {
        let src = src.trim();

        if let Some(component) = src.strip_suffix("[]") {
            return Self::Array(Box::new(Self::parse(component)));
        }

        if let Some(prim) = Primitive::from_name(src) {
            return Self::Primitive(prim);
        }

        match (src.find('<'), src.ends_with('>')) {
            (Some(lt), true) => {
                let inner = &src[lt + 1..src.len() - 1];
                Self::generic(&src[..lt], split_type_args(inner))
            }
            _ => Self::class(src),
        }
    }

    pub fn as_primitive(&self) -> Option<Primitive> {
        match self {
            Self::Primitive(prim) => Some(*prim),
            _ => None,
        }
    }

    pub fn is_primitive(&self) -> bool {
        self.as_primitive().is_some()
    }

    /// Name of the class this references,
    ///   without type arguments.
    pub fn class_name(&self) -> Option<&str> {
        match self {
            Self::Class { name, .. } => Some(name),
            _ => None,
        }
    }

    pub fn type_args(&self) -> &[TypeRef] {
        match self {
            Self::Class { args, .. } => args,
            _ => &[],
        }
    }

    /// The type with all type arguments removed.
    pub fn erased(&self) -> TypeRef {
        match self {
            Self::Primitive(_) => self.clone(),
            Self::Class { name, .. } => Self::class(name.clone()),
            Self::Array(component) => Self::Array(Box::new(component.erased())),
        }
    }

    /// Source name without type arguments.
    pub fn erased_name(&self) -> String {
        self.erased().to_string()
    }
}

impl Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Primitive(prim) => write!(f, "{}", prim.name()),
            Self::Class { name, args } if args.is_empty() => {
                write!(f, "{name}")
            }
            Self::Class { name, args } => {
                write!(f, "{name}<")?;
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{arg}")?;
                }
                write!(f, ">")
            }
            Self::Array(component) => write!(f, "{component}[]"),
        }
    }
}

fn split_type_args(src: &str) -> Vec<TypeRef> {
    let mut args = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;

    for (i, c) in src.char_indices() {
        match c {
            '<' => depth += 1,
            '>' => depth = depth.saturating_sub(1),
            ',' if depth == 0 => {
                args.push(TypeRef::parse(&src[start..i]));
                start = i + 1;
            }
            _ => (),
        }
    }

    if !src[start..].trim().is_empty() {
        args.push(TypeRef::parse(&src[start..]));
    }

    args
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClassKind {
    Class,
    Interface,
    Enum,
    Annotation,
}

/// An annotation on a type or member.
///
/// Element values are kept as raw source strings;
///   array-valued elements are represented by repeating the element name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Annotation {
    pub name: String,
    pub elements: Vec<(String, String)>,
}

impl Annotation {
    pub fn new<S: Into<String>>(name: S) -> Self {
        Self {
            name: name.into(),
            elements: vec![],
        }
    }

    /// Add a `value` element.
    pub fn value<S: Into<String>>(self, value: S) -> Self {
        self.element("value", value)
    }

    pub fn element<K: Into<String>, V: Into<String>>(
        mut self,
        key: K,
        value: V,
    ) -> Self {
        self.elements.push((key.into(), value.into()));
        self
    }

    /// First value of the named element.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.elements
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// All values of the named element,
    ///   in declaration order.
    pub fn values_of<'a>(
        &'a self,
        key: &'a str,
    ) -> impl Iterator<Item = &'a str> + 'a {
        self.elements
            .iter()
            .filter(move |(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Values of the `value` element.
    pub fn values(&self) -> Vec<&str> {
        self.values_of("value").collect()
    }

    /// Whether the named element has the literal value `true`.
    pub fn is_true(&self, key: &str) -> bool {
        self.get(key) == Some("true")
    }
}

/// Lookup of annotations by qualified name.
pub trait Annotated {
    fn annotations(&self) -> &[Annotation];

    fn annotation(&self, name: &str) -> Option<&Annotation> {
        self.annotations().iter().find(|a| a.name == name)
    }

    fn has_annotation(&self, name: &str) -> bool {
        self.annotation(name).is_some()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Param {
    pub name: String,
    pub ty: TypeRef,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Method {
    pub name: String,
    pub params: Vec<Param>,
    pub ret: TypeRef,
    pub is_static: bool,
    pub is_abstract: bool,
    pub annotations: Vec<Annotation>,
}

impl Method {
    pub fn new<S: Into<String>>(name: S, ret: TypeRef) -> Self {
        Self {
            name: name.into(),
            params: vec![],
            ret,
            is_static: false,
            is_abstract: false,
            annotations: vec![],
        }
    }

    /// A method returning `void`.
    pub fn void<S: Into<String>>(name: S) -> Self {
        Self::new(name, TypeRef::Primitive(Primitive::Void))
    }

    pub fn param<S: Into<String>>(mut self, name: S, ty: TypeRef) -> Self {
        self.params.push(Param {
            name: name.into(),
            ty,
        });
        self
    }

    pub fn annotate(mut self, annotation: Annotation) -> Self {
        self.annotations.push(annotation);
        self
    }

    pub fn with_static(mut self) -> Self {
        self.is_static = true;
        self
    }

    pub fn with_abstract(mut self) -> Self {
        self.is_abstract = true;
        self
    }

    pub fn param_types(&self) -> impl Iterator<Item = &TypeRef> {
        self.params.iter().map(|p| &p.ty)
    }
}

impl Annotated for Method {
    fn annotations(&self) -> &[Annotation] {
        &self.annotations
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Constructor {
    pub params: Vec<Param>,
    pub annotations: Vec<Annotation>,
}

impl Constructor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn param<S: Into<String>>(mut self, name: S, ty: TypeRef) -> Self {
        self.params.push(Param {
            name: name.into(),
            ty,
        });
        self
    }

    pub fn annotate(mut self, annotation: Annotation) -> Self {
        self.annotations.push(annotation);
        self
    }
}

impl Annotated for Constructor {
    fn annotations(&self) -> &[Annotation] {
        &self.annotations
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDecl {
    pub name: String,
    pub ty: TypeRef,
    pub is_static: bool,
    pub is_public: bool,
    pub annotations: Vec<Annotation>,
}

impl FieldDecl {
    pub fn new<S: Into<String>>(name: S, ty: TypeRef) -> Self {
        Self {
            name: name.into(),
            ty,
            is_static: false,
            is_public: false,
            annotations: vec![],
        }
    }

    /// A `public static` constant.
    pub fn constant<S: Into<String>>(name: S, ty: TypeRef) -> Self {
        Self {
            is_static: true,
            is_public: true,
            ..Self::new(name, ty)
        }
    }

    pub fn annotate(mut self, annotation: Annotation) -> Self {
        self.annotations.push(annotation);
        self
    }
}

impl Annotated for FieldDecl {
    fn annotations(&self) -> &[Annotation] {
        &self.annotations
    }
}

/// Structured descriptor of a class, interface, or enum.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassType {
    pub package: String,
    /// Name relative to the package;
    ///   nested types are separated by `.`.
    pub simple_name: String,
    pub kind: ClassKind,
    pub is_abstract: bool,
    pub superclass: Option<TypeRef>,
    pub interfaces: Vec<TypeRef>,
    pub methods: Vec<Method>,
    pub constructors: Vec<Constructor>,
    pub fields: Vec<FieldDecl>,
    pub enum_constants: Vec<String>,
    pub annotations: Vec<Annotation>,
}

impl ClassType {
    pub fn new<P: Into<String>, S: Into<String>>(
        kind: ClassKind,
        package: P,
        simple_name: S,
    ) -> Self {
        Self {
            package: package.into(),
            simple_name: simple_name.into(),
            kind,
            is_abstract: matches!(kind, ClassKind::Interface),
            superclass: None,
            interfaces: vec![],
            methods: vec![],
            constructors: vec![],
            fields: vec![],
            enum_constants: vec![],
            annotations: vec![],
        }
    }

    pub fn class<P: Into<String>, S: Into<String>>(pkg: P, name: S) -> Self {
        Self::new(ClassKind::Class, pkg, name)
    }

    pub fn interface<P: Into<String>, S: Into<String>>(
        pkg: P,
        name: S,
    ) -> Self {
        Self::new(ClassKind::Interface, pkg, name)
    }

    pub fn enumeration<P: Into<String>, S: Into<String>>(
        pkg: P,
        name: S,
        constants: &[&str],
    ) -> Self {
        let mut ty = Self::new(ClassKind::Enum, pkg, name);
        ty.superclass = Some(TypeRef::class(global::ENUM_TYPE));
        ty.enum_constants = constants.iter().map(|c| c.to_string()).collect();
        ty
    }

    pub fn extends(mut self, superclass: TypeRef) -> Self {
        self.superclass = Some(superclass);
        self
    }

    pub fn implements(mut self, interface: TypeRef) -> Self {
        self.interfaces.push(interface);
        self
    }

    pub fn method(mut self, method: Method) -> Self {
        if self.kind == ClassKind::Interface {
            self.methods.push(method.with_abstract());
        } else {
            self.methods.push(method);
        }
        self
    }

    pub fn constructor(mut self, ctor: Constructor) -> Self {
        self.constructors.push(ctor);
        self
    }

    pub fn field(mut self, field: FieldDecl) -> Self {
        self.fields.push(field);
        self
    }

    pub fn annotate(mut self, annotation: Annotation) -> Self {
        self.annotations.push(annotation);
        self
    }

    pub fn with_abstract(mut self) -> Self {
        self.is_abstract = true;
        self
    }

    /// Fully qualified source name.
    pub fn name(&self) -> String {
        if self.package.is_empty() {
            self.simple_name.clone()
        } else {
            format!("{}.{}", self.package, self.simple_name)
        }
    }

    /// Innermost name of a (possibly nested) type.
    pub fn short_name(&self) -> &str {
        self.simple_name
            .rsplit('.')
            .next()
            .unwrap_or(&self.simple_name)
    }

    pub fn as_type_ref(&self) -> TypeRef {
        TypeRef::class(self.name())
    }

    pub fn is_interface(&self) -> bool {
        self.kind == ClassKind::Interface
    }

    pub fn is_enum(&self) -> bool {
        self.kind == ClassKind::Enum
    }

    /// Whether instances may be constructed without arguments.
    ///
    /// A concrete class with no declared constructors has an implicit
    ///   default constructor.
    pub fn has_default_constructor(&self) -> bool {
        !self.is_abstract
            && self.kind == ClassKind::Class
            && (self.constructors.is_empty()
                || self.constructors.iter().any(|c| c.params.is_empty()))
    }

    pub fn find_field(&self, name: &str) -> Option<&FieldDecl> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Methods declared directly on this type with the given name.
    pub fn declared_methods<'a>(
        &'a self,
        name: &'a str,
    ) -> impl Iterator<Item = &'a Method> + 'a {
        self.methods.iter().filter(move |m| m.name == name)
    }
}

impl Annotated for ClassType {
    fn annotations(&self) -> &[Annotation] {
        &self.annotations
    }
}
