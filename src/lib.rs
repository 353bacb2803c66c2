// UiBinder template compiler
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

//! Compiler of UiBinder templates into Java source.
//!
//! A UiBinder template is an XML document describing a user interface
//!   declaratively:
//!     widgets,
//!     HTML,
//!     and the resources they reference.
//! Each template is paired with a _binder_ interface extending
//!   `UiBinder<U, O>` and an _owner_ class `O` whose `@UiField`s receive
//!   the objects the template declares.
//! The compiler produces a Java class implementing the binder whose
//!   factory method builds the interface of type `U` and binds it to the
//!   owner.
//!
//! The compiler knows nothing of Java on its own;
//!   the host describes its types through a [`oracle::TypeOracle`] and its
//!   files through a [`resource::ResourceOracle`].
//! See [`generator::UiBinderGenerator`] to get started.
//!
//! Compilation is organized as follows:
//!
//!   - [`xml`] reads templates into a document model whose attributes
//!       and content are _consumed_ as they are handled,
//!         so that anything left unhandled can be reported;
//!   - [`writer`] drives the compilation of a single template,
//!       delegating each element to the [`parser`]s applicable to its
//!       type;
//!   - [`field`] orders the declarations of generated fields by their
//!       dependencies and validates field references;
//!   - [`attr`] parses attribute values into Java expressions;
//!   - [`bundle`] collects the resources of the implicit client bundle;
//!   - [`messages`] collects translatable messages;
//!   - [`handler`] wires `@UiHandler` methods to the fields they observe;
//!       and
//!   - [`java`] renders the generated source.
//!
//! Problems are reported through [`diagnose`] against the source spans
//!   of the template.

#[macro_use]
extern crate static_assertions;

pub mod global;

pub mod attr;
pub mod bundle;
pub mod diagnose;
pub mod dom;
pub mod field;
pub mod generator;
pub mod handler;
pub mod java;
pub mod messages;
pub mod oracle;
pub mod owner;
pub mod parser;
pub mod resource;
pub mod span;
pub mod tokenator;
pub mod writer;
pub mod xml;

#[cfg(test)]
pub mod test;
