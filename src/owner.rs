// Owner class model
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

//! Owner class model.
//!
//! The _owner_ is the class whose instance is passed to the generated
//!   `createAndBindUi` method.
//! It communicates with the template entirely through annotations:
//!
//!   - `@UiField` fields are bound to template fields of the same name,
//!       either assigned from the template after construction or,
//!       with `provided = true`,
//!       supplied by the owner in place of constructing one;
//!   - `@UiFactory` methods construct every template field of their
//!       return type; and
//!   - `@UiHandler` methods receive events from the named template
//!       fields
//!         (see [`crate::handler`]).
//!
//! Annotated members are collected from the owner class and each of its
//!   superclasses;
//!     a member declared on a subclass hides one of the same name
//!     declared on a superclass.

use crate::{
    diagnose::{AnnotatedSpan, Diagnostic},
    global,
    oracle::{Annotated, ClassType, Method, TypeCache, TypeRef},
};
use std::{
    error::Error,
    fmt::{self, Display},
};

/// A `@UiField` of the owner class.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OwnerField {
    pub name: String,
    pub ty: TypeRef,

    /// The owner constructs the value itself
    ///   (`@UiField(provided = true)`).
    pub provided: bool,
}

#[derive(Debug)]
pub struct OwnerClass<'o> {
    ty: &'o ClassType,
    fields: Vec<OwnerField>,
    factories: Vec<&'o Method>,
    handlers: Vec<&'o Method>,
}

impl<'o> OwnerClass<'o> {
    pub fn new(
        ty: &'o ClassType,
        cache: &TypeCache<'o>,
    ) -> Result<Self, OwnerError> {
        let mut owner = Self {
            ty,
            fields: vec![],
            factories: vec![],
            handlers: vec![],
        };

        let hierarchy = cache.hierarchy(ty);
        let classes = hierarchy.iter().copied().filter(|c| !c.is_interface());

        for class in classes {
            owner.collect(class)?;
        }

        log::debug!(
            "owner {}: {} field(s), {} factory(ies), {} handler(s)",
            ty.name(),
            owner.fields.len(),
            owner.factories.len(),
            owner.handlers.len(),
        );

        Ok(owner)
    }

    fn collect(&mut self, class: &'o ClassType) -> Result<(), OwnerError> {
        for field in class.fields.iter() {
            let ann = match field.annotation(global::ANNOTATION_UI_FIELD) {
                Some(ann) => ann,
                None => continue,
            };

            if self.ui_field(&field.name).is_none() {
                self.fields.push(OwnerField {
                    name: field.name.clone(),
                    ty: field.ty.clone(),
                    provided: ann.is_true("provided"),
                });
            }
        }

        for method in class.methods.iter() {
            if method.has_annotation(global::ANNOTATION_UI_FACTORY) {
                self.add_factory(method)?;
            }

            if method.has_annotation(global::ANNOTATION_UI_HANDLER)
                && !self.handlers.iter().any(|h| h.name == method.name)
            {
                self.handlers.push(method);
            }
        }

        Ok(())
    }

    fn add_factory(&mut self, method: &'o Method) -> Result<(), OwnerError> {
        let ret = method.ret.erased();

        match self.factories.iter().find(|f| f.ret.erased() == ret) {
            // Overridden in a subclass.
            Some(existing) if existing.name == method.name => Ok(()),
            Some(existing) => Err(OwnerError::DuplicateFactory {
                owner: self.ty.name(),
                ty: ret.to_string(),
                first: existing.name.clone(),
                second: method.name.clone(),
            }),
            None => {
                self.factories.push(method);
                Ok(())
            }
        }
    }

    pub fn ty(&self) -> &'o ClassType {
        self.ty
    }

    pub fn name(&self) -> String {
        self.ty.name()
    }

    pub fn ui_field(&self, name: &str) -> Option<&OwnerField> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Every `@UiField`,
    ///   subclass fields first.
    pub fn ui_fields(&self) -> &[OwnerField] {
        &self.fields
    }

    /// The `@UiFactory` method producing values of type `ty`,
    ///   ignoring type arguments.
    pub fn factory_for(&self, ty: &TypeRef) -> Option<&'o Method> {
        let ty = ty.erased();

        self.factories
            .iter()
            .copied()
            .find(|method| method.ret.erased() == ty)
    }

    /// `@UiHandler` methods in declaration order.
    pub fn handlers(&self) -> &[&'o Method] {
        &self.handlers
    }
}

#[derive(Debug, PartialEq, Eq)]
pub enum OwnerError {
    /// Two `@UiFactory` methods produce the same type.
    DuplicateFactory {
        owner: String,
        ty: String,
        first: String,
        second: String,
    },
}

impl Display for OwnerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DuplicateFactory {
                owner,
                ty,
                first,
                second,
            } => write!(
                f,
                "{owner} declares two @UiFactory methods for {ty}: \
                   {first}() and {second}()"
            ),
        }
    }
}

impl Error for OwnerError {}

impl Diagnostic for OwnerError {
    fn describe(&self) -> Vec<AnnotatedSpan> {
        // The owner is not part of the template.
        vec![]
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::oracle::{Annotation, FieldDecl, MemoryTypeOracle};

    fn ui_field(name: &str, ty: &str) -> FieldDecl {
        FieldDecl::new(name, TypeRef::class(ty))
            .annotate(Annotation::new(global::ANNOTATION_UI_FIELD))
    }

    fn factory(name: &str, ret: &str) -> Method {
        Method::new(name, TypeRef::class(ret))
            .annotate(Annotation::new(global::ANNOTATION_UI_FACTORY))
    }

    #[test]
    fn collects_from_superclasses() {
        let oracle: MemoryTypeOracle = [
            ClassType::class("p", "Base")
                .field(ui_field("label", "p.Base"))
                .field(ui_field("inherited", "p.Label"))
                .method(factory("makeLabel", "p.Label")),
            ClassType::class("p", "Owner")
                .extends(TypeRef::class("p.Base"))
                .field(ui_field("label", "p.Label"))
                .field(
                    FieldDecl::new("provided", TypeRef::class("p.Label"))
                        .annotate(
                            Annotation::new(global::ANNOTATION_UI_FIELD)
                                .element("provided", "true"),
                        ),
                )
                .field(FieldDecl::new("plain", TypeRef::class("p.Label")))
                .method(
                    Method::void("onClick")
                        .annotate(
                            Annotation::new(global::ANNOTATION_UI_HANDLER)
                                .value("label"),
                        ),
                ),
        ]
        .into_iter()
        .collect();

        let cache = TypeCache::new(&oracle);
        let owner_ty = cache.find_type("p.Owner").unwrap();
        let sut = OwnerClass::new(owner_ty, &cache).unwrap();

        let names: Vec<_> =
            sut.ui_fields().iter().map(|f| f.name.as_str()).collect();

        assert_eq!(vec!["label", "provided", "inherited"], names);
        assert_eq!(
            &TypeRef::class("p.Label"),
            &sut.ui_field("label").unwrap().ty
        );
        assert!(sut.ui_field("provided").unwrap().provided);
        assert!(!sut.ui_field("label").unwrap().provided);
        assert!(sut.ui_field("plain").is_none());

        assert_eq!(
            Some("makeLabel"),
            sut.factory_for(&TypeRef::generic("p.Label", vec![]))
                .map(|m| m.name.as_str())
        );
        assert_eq!(1, sut.handlers().len());
    }

    #[test]
    fn two_factories_for_one_type() {
        let oracle: MemoryTypeOracle = [ClassType::class("p", "Owner")
            .method(factory("a", "p.Label"))
            .method(factory("b", "p.Label"))]
        .into_iter()
        .collect();

        let cache = TypeCache::new(&oracle);
        let owner_ty = cache.find_type("p.Owner").unwrap();

        assert_eq!(
            OwnerError::DuplicateFactory {
                owner: "p.Owner".into(),
                ty: "p.Label".into(),
                first: "a".into(),
                second: "b".into(),
            },
            OwnerClass::new(owner_ty, &cache).unwrap_err()
        );
    }
}
