// Memoized type hierarchy queries
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

//! Memoized type hierarchy queries.
//!
//! The same type hierarchies are walked repeatedly while compiling a
//!   template:
//!     once to select element parsers for each widget,
//!     again to locate setters and handler registration methods,
//!     and again to resolve field references after parsing.
//! [`TypeCache`] performs each breadth-first walk once per type and
//!   caches the result for the remainder of the compilation.
//!
//! A cache is owned by a single compilation and is not shared between
//!   threads.

use super::{Annotated, ClassType, Method, TypeOracle, TypeRef};
use crate::global;
use fxhash::{FxHashMap, FxHashSet};
use std::{
    cell::{OnceCell, RefCell},
    collections::VecDeque,
    rc::Rc,
};

/// Order of supertypes within each layer of a hierarchy walk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum HierarchyOrder {
    InterfacesFirst,
    SuperclassFirst,
}

/// Per-compilation memoizing view over a [`TypeOracle`].
pub struct TypeCache<'o> {
    oracle: &'o dyn TypeOracle,
    hierarchies: RefCell<FxHashMap<(String, HierarchyOrder), Rc<[&'o ClassType]>>>,
    assignable: RefCell<FxHashMap<(String, String), bool>>,
    tags: OnceCell<FxHashMap<String, &'o ClassType>>,
}

impl<'o> TypeCache<'o> {
    pub fn new(oracle: &'o dyn TypeOracle) -> Self {
        Self {
            oracle,
            hierarchies: RefCell::new(FxHashMap::default()),
            assignable: RefCell::new(FxHashMap::default()),
            tags: OnceCell::new(),
        }
    }

    pub fn oracle(&self) -> &'o dyn TypeOracle {
        self.oracle
    }

    pub fn find_type(&self, name: &str) -> Option<&'o ClassType> {
        self.oracle.find_type(name)
    }

    /// Resolve a class reference into its descriptor.
    ///
    /// Primitive and array references do not resolve.
    pub fn resolve(&self, ty: &TypeRef) -> Option<&'o ClassType> {
        ty.class_name().and_then(|name| self.find_type(name))
    }

    /// The given type followed by all of its supertypes in breadth-first
    ///   order.
    ///
    /// Each layer lists implemented interfaces before the superclass,
    ///   which is the order in which methods are resolved.
    /// Supertypes unknown to the oracle are omitted,
    ///   as are types already visited through another path.
    pub fn hierarchy(&self, ty: &'o ClassType) -> Rc<[&'o ClassType]> {
        self.walk(ty, HierarchyOrder::InterfacesFirst)
    }

    /// Like [`TypeCache::hierarchy`],
    ///   but each layer lists the superclass before implemented
    ///   interfaces.
    ///
    /// This is the order in which element parsers are selected.
    pub fn hierarchy_superclass_first(
        &self,
        ty: &'o ClassType,
    ) -> Rc<[&'o ClassType]> {
        self.walk(ty, HierarchyOrder::SuperclassFirst)
    }

    fn walk(
        &self,
        ty: &'o ClassType,
        order: HierarchyOrder,
    ) -> Rc<[&'o ClassType]> {
        let key = (ty.name(), order);

        if let Some(found) = self.hierarchies.borrow().get(&key) {
            return found.clone();
        }

        let mut list = Vec::new();
        let mut seen = FxHashSet::default();
        let mut queue = VecDeque::from([ty]);

        seen.insert(key.0.clone());

        while let Some(cur) = queue.pop_front() {
            list.push(cur);

            let supers: Vec<&TypeRef> = match order {
                HierarchyOrder::InterfacesFirst => {
                    cur.interfaces.iter().chain(cur.superclass.iter()).collect()
                }
                HierarchyOrder::SuperclassFirst => {
                    cur.superclass.iter().chain(cur.interfaces.iter()).collect()
                }
            };

            for sup in supers {
                match self.resolve(sup) {
                    Some(found) if seen.insert(found.name()) => {
                        queue.push_back(found)
                    }
                    Some(_) => (),
                    None => log::debug!(
                        "supertype {sup} of {} is unknown to the type oracle",
                        cur.name()
                    ),
                }
            }
        }

        let list: Rc<[&'o ClassType]> = list.into();
        self.hierarchies.borrow_mut().insert(key, list.clone());
        list
    }

    /// Whether a value of type `from` may be assigned to a variable of
    ///   type `to`,
    ///     ignoring type arguments.
    pub fn is_assignable(&self, from: &TypeRef, to: &TypeRef) -> bool {
        match (from, to) {
            (TypeRef::Primitive(a), TypeRef::Primitive(b)) => a == b,
            (TypeRef::Array(a), TypeRef::Array(b)) => self.is_assignable(a, b),
            (TypeRef::Array(_), TypeRef::Class { name, .. }) => {
                name == global::OBJECT_TYPE
            }
            (
                TypeRef::Class { name: from, .. },
                TypeRef::Class { name: to, .. },
            ) => self.is_assignable_name(from, to),
            _ => false,
        }
    }

    /// Like [`TypeCache::is_assignable`],
    ///   for qualified class names.
    pub fn is_assignable_name(&self, from: &str, to: &str) -> bool {
        if from == to || to == global::OBJECT_TYPE {
            return true;
        }

        let key = (from.to_string(), to.to_string());
        if let Some(&known) = self.assignable.borrow().get(&key) {
            return known;
        }

        let result = self
            .find_type(from)
            .map(|ty| self.hierarchy(ty).iter().any(|sup| sup.name() == to))
            .unwrap_or(false);

        self.assignable.borrow_mut().insert(key, result);
        result
    }

    /// First method in breadth-first hierarchy order with the given name
    ///   and no parameters.
    pub fn find_zero_arg_method(
        &self,
        ty: &'o ClassType,
        name: &str,
    ) -> Option<&'o Method> {
        self.hierarchy(ty)
            .iter()
            .copied()
            .flat_map(|t| t.methods.iter())
            .find(|m| m.name == name && m.params.is_empty())
    }

    /// Every method with the given name visible on `ty`.
    ///
    /// Overridden methods
    ///   (same name and erased parameter types as a method found earlier
    ///     in the hierarchy)
    ///   are omitted.
    pub fn methods_named(
        &self,
        ty: &'o ClassType,
        name: &str,
    ) -> Vec<&'o Method> {
        let mut seen = FxHashSet::default();

        self.hierarchy(ty)
            .iter()
            .copied()
            .flat_map(|t| t.methods.iter())
            .filter(|m| m.name == name)
            .filter(|m| seen.insert(erased_signature(m)))
            .collect()
    }

    /// Every method visible on `ty`,
    ///   omitting overridden methods.
    pub fn inheritable_methods(&self, ty: &'o ClassType) -> Vec<&'o Method> {
        let mut seen = FxHashSet::default();

        self.hierarchy(ty)
            .iter()
            .copied()
            .flat_map(|t| t.methods.iter())
            .filter(|m| seen.insert(erased_signature(m)))
            .collect()
    }

    /// The DOM element subtype declaring the given HTML tag name,
    ///   or the generic element type if no subtype declares it.
    pub fn element_type_for_tag(&self, tag: &str) -> Option<&'o ClassType> {
        let tags = self.tags.get_or_init(|| {
            let mut tags = FxHashMap::default();

            for ty in self.oracle.types() {
                let tag_names = match ty.annotation(global::ANNOTATION_TAG_NAME)
                {
                    Some(ann) => ann.values(),
                    None => continue,
                };

                if !self.is_assignable_name(&ty.name(), global::ELEMENT_TYPE) {
                    continue;
                }

                for tag_name in tag_names {
                    tags.entry(tag_name.to_string()).or_insert(ty);
                }
            }

            tags
        });

        tags.get(tag)
            .copied()
            .or_else(|| self.find_type(global::ELEMENT_TYPE))
    }
}

fn erased_signature(method: &Method) -> (String, Vec<String>) {
    (
        method.name.clone(),
        method.param_types().map(TypeRef::erased_name).collect(),
    )
}
