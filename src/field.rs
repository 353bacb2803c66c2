// Generated fields and their dependencies
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

//! Generated fields and their dependencies.
//!
//! Every value the generated factory method needs to hold onto
//!   (a widget, a DOM element, a resource bundle, a unique DOM id...)
//!   is declared as a _field_:
//!     a local variable of the generated method with an optional
//!     initializer expression.
//! A [`FieldManager`] tracks those fields along with the _needs_ relation
//!   between them,
//!     where a field needs another if its initializer refers to it.
//!
//! Dependencies are recorded in two ways:
//!
//!   - implicitly,
//!       by registering a field while another is being parsed
//!       (see [`FieldManager::push_field`]),
//!       since the enclosing field will be constructed from its
//!       children; and
//!   - explicitly,
//!       with [`FieldManager::needs`] or by a field reference encountered
//!       while a field is being parsed.
//!
//! Once the template has been parsed,
//!   [`FieldManager::write_all`] emits one declaration per field such that
//!   every field is declared after everything it needs.
//! Fields are otherwise emitted by [`FieldTier`] and then in the order in
//!   which they were registered.
//! A cycle in the needs relation cannot be satisfied by any order and is
//!   reported as [`FieldError::Cycle`] before anything is emitted.
//!
//! Field References
//! ================
//! Attribute values of the form `{field.method1.method2}` refer to the
//!   value of a chain of zero-argument method calls on a field.
//! Since the referenced field may not yet have been declared when the
//!   reference is encountered,
//!     each reference is recorded along with every type the template
//!     requires it to produce
//!       (see [`FieldManager::register_field_reference`])
//!     and validated only after parsing is complete
//!       (see [`FieldManager::validate`]).

mod reference;

pub use reference::{
    assignability, Assignability, FieldReference, FieldReferenceError,
    FieldReferenceErrorKind,
};

use crate::{
    diagnose::{Annotate, AnnotatedSpan, Diagnostic},
    global,
    java::{simple_name, Expr, Stmt},
    oracle::{TypeCache, TypeRef},
    span::Span,
};
use fixedbitset::FixedBitSet;
use fxhash::FxHashMap;
use petgraph::graph::{DiGraph, NodeIndex};
use std::{
    error::Error,
    fmt::{self, Display},
};

/// Emission precedence of a field.
///
/// Lower tiers are emitted first,
///   subject to the needs relation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FieldTier {
    /// The implicit client bundle.
    GeneratedBundle,

    /// A CSS resource declared with `<ui:style>`.
    GeneratedCss,

    /// A resource declared with `<ui:with>` or `<ui:import>`.
    Imported,

    /// Holder of a unique DOM id generated at runtime.
    DomIdHolder,

    /// Widgets,
    ///   DOM elements,
    ///   and everything else.
    Default,
}

/// A single generated field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldWriter {
    name: String,
    ty: TypeRef,
    tier: FieldTier,
    initializer: Option<Expr>,
    /// Return types of zero-argument methods of a type that will be
    ///   generated along with this unit and so is unknown to the type
    ///   oracle.
    generated_methods: FxHashMap<String, TypeRef>,
    span: Span,
}

impl FieldWriter {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn ty(&self) -> &TypeRef {
        &self.ty
    }

    pub fn tier(&self) -> FieldTier {
        self.tier
    }

    pub fn initializer(&self) -> Option<&Expr> {
        self.initializer.as_ref()
    }

    pub fn span(&self) -> Span {
        self.span
    }

    /// Return type of a zero-argument method of a generated type.
    pub fn generated_method(&self, name: &str) -> Option<&TypeRef> {
        self.generated_methods.get(name)
    }

    /// Initializer used when none has been set explicitly:
    ///   deferred binding via `GWT.create`,
    ///     provided that the type is an interface or has a default
    ///     constructor.
    fn default_initializer(&self, cache: &TypeCache) -> Option<Expr> {
        let ty = cache.resolve(&self.ty)?;

        if !(ty.is_interface() || ty.has_default_constructor()) {
            return None;
        }

        Some(Expr::cast(
            self.ty.to_string(),
            Expr::static_call(
                simple_name(global::GWT),
                "create",
                vec![Expr::ClassLiteral(self.ty.erased_name())],
            ),
        ))
    }
}

/// Registry of generated fields and the dependencies between them.
#[derive(Debug, Default)]
pub struct FieldManager {
    graph: DiGraph<FieldWriter, ()>,
    index: FxHashMap<String, NodeIndex>,

    /// Fields currently being parsed,
    ///   innermost last.
    parsing: Vec<NodeIndex>,

    /// Fields needed by name before they were registered.
    pending_needs: Vec<(NodeIndex, String)>,

    references: Vec<FieldReference>,
    reference_index: FxHashMap<String, usize>,
}

impl FieldManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a widget or element field.
    pub fn register_field(
        &mut self,
        ty: TypeRef,
        name: &str,
        span: Span,
    ) -> Result<(), FieldError> {
        self.register(FieldTier::Default, ty, name, span)
    }

    /// Register a field of a type generated along with this unit,
    ///   such as the implicit client bundle.
    pub fn register_field_of_generated_type(
        &mut self,
        ty: TypeRef,
        name: &str,
        span: Span,
    ) -> Result<(), FieldError> {
        self.register(FieldTier::GeneratedBundle, ty, name, span)
    }

    /// Register a field holding a generated CSS resource.
    ///
    /// `methods` are the class names of the stylesheet,
    ///   each of which is available to field references as a method
    ///   returning a [`String`].
    pub fn register_field_for_generated_css_resource<I>(
        &mut self,
        ty: TypeRef,
        name: &str,
        methods: I,
        span: Span,
    ) -> Result<(), FieldError>
    where
        I: IntoIterator<Item = String>,
    {
        self.register(FieldTier::GeneratedCss, ty, name, span)?;

        let methods = methods.into_iter().map(|m| (m, TypeRef::string()));

        if let Some(field) = self.lookup_mut(name) {
            field.generated_methods.extend(methods);
        }

        Ok(())
    }

    /// Register a resource field imported from outside of the template.
    pub fn register_imported_field(
        &mut self,
        ty: TypeRef,
        name: &str,
        span: Span,
    ) -> Result<(), FieldError> {
        self.register(FieldTier::Imported, ty, name, span)
    }

    /// Register a field holding a unique DOM id.
    pub fn register_dom_id_holder(
        &mut self,
        name: &str,
        init: Expr,
        span: Span,
    ) -> Result<(), FieldError> {
        self.register(FieldTier::DomIdHolder, TypeRef::string(), name, span)?;
        self.set_initializer(name, init)
    }

    fn register(
        &mut self,
        tier: FieldTier,
        ty: TypeRef,
        name: &str,
        span: Span,
    ) -> Result<(), FieldError> {
        if let Some(&existing) = self.index.get(name) {
            return Err(FieldError::Duplicate {
                name: name.to_string(),
                span,
                first: self.graph[existing].span,
            });
        }

        log::trace!("registering {tier:?} field {name}: {ty}");

        let node = self.graph.add_node(FieldWriter {
            name: name.to_string(),
            ty,
            tier,
            initializer: None,
            generated_methods: FxHashMap::default(),
            span,
        });

        self.index.insert(name.to_string(), node);

        if let Some(&parent) = self.parsing.last() {
            self.graph.update_edge(parent, node, ());
        }

        Ok(())
    }

    /// Mark a field as being parsed.
    ///
    /// Until the matching [`FieldManager::pop_field`],
    ///   every newly registered field and every field reference becomes a
    ///   need of this field.
    pub fn push_field(&mut self, name: &str) -> Result<(), FieldError> {
        let node = self.node(name)?;
        self.parsing.push(node);
        Ok(())
    }

    pub fn pop_field(&mut self) {
        self.parsing.pop();
    }

    /// Name of the field currently being parsed.
    pub fn current_field(&self) -> Option<&str> {
        self.parsing.last().map(|&node| self.graph[node].name.as_str())
    }

    fn node(&self, name: &str) -> Result<NodeIndex, FieldError> {
        self.index
            .get(name)
            .copied()
            .ok_or_else(|| FieldError::Unknown(name.to_string()))
    }

    pub fn lookup(&self, name: &str) -> Option<&FieldWriter> {
        self.index.get(name).map(|&node| &self.graph[node])
    }

    fn lookup_mut(&mut self, name: &str) -> Option<&mut FieldWriter> {
        self.index.get(name).map(|&node| &mut self.graph[node])
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Number of registered fields.
    pub fn len(&self) -> usize {
        self.graph.node_count()
    }

    pub fn is_empty(&self) -> bool {
        self.graph.node_count() == 0
    }

    /// Fields in registration order.
    pub fn fields(&self) -> impl Iterator<Item = &FieldWriter> {
        self.graph.node_weights()
    }

    /// Set the initializer of a field.
    ///
    /// An initializer may be set only once;
    ///   setting the same initializer again has no effect,
    ///   but setting a different one is an error.
    pub fn set_initializer(
        &mut self,
        name: &str,
        init: Expr,
    ) -> Result<(), FieldError> {
        let field = self
            .lookup_mut(name)
            .ok_or_else(|| FieldError::Unknown(name.to_string()))?;

        match &field.initializer {
            Some(existing) if *existing == init => Ok(()),
            Some(existing) => Err(FieldError::InitializerConflict {
                name: name.to_string(),
                existing: existing.to_string(),
                new: init.to_string(),
                span: field.span,
            }),
            None => {
                field.initializer = Some(init);
                Ok(())
            }
        }
    }

    /// Record that `field` must be declared after `needed`.
    pub fn needs(&mut self, field: &str, needed: &str) -> Result<(), FieldError> {
        let from = self.node(field)?;
        let to = self.node(needed)?;

        self.graph.update_edge(from, to, ());
        Ok(())
    }

    /// Record a reference `{path}` that must produce a value of type
    ///   `left`,
    ///     returning the expression to evaluate it.
    ///
    /// If a field is being parsed,
    ///   it will need the referenced field.
    pub fn register_field_reference(
        &mut self,
        path: &str,
        left: TypeRef,
        span: Span,
    ) -> Expr {
        let reference = match self.reference_index.get(path) {
            Some(&i) => &mut self.references[i],
            None => {
                self.reference_index
                    .insert(path.to_string(), self.references.len());
                self.references.push(FieldReference::new(path, span));
                // Just pushed.
                let last = self.references.len() - 1;
                &mut self.references[last]
            }
        };

        reference.add_left_hand_type(left);
        let expr = reference.to_expr();
        let field = reference.field_name().to_string();

        if let Some(&current) = self.parsing.last() {
            if self.graph[current].name != field {
                self.pending_needs.push((current, field));
            }
        }

        expr
    }

    /// Field references in the order first encountered.
    pub fn references(&self) -> &[FieldReference] {
        &self.references
    }

    /// Validate every field reference against the type of the field that
    ///   it references.
    ///
    /// Validation does not stop at the first problem;
    ///   every error of every reference is returned.
    pub fn validate(&self, cache: &TypeCache) -> Result<(), Vec<FieldReferenceError>> {
        let errors: Vec<_> = self
            .references
            .iter()
            .flat_map(|reference| reference.validate(self, cache))
            .collect();

        match errors.is_empty() {
            true => Ok(()),
            false => Err(errors),
        }
    }

    /// Declarations of every field,
    ///   each preceded by the declarations of every field it needs.
    ///
    /// A field without an initializer is constructed by
    ///   [deferred binding](FieldWriter::default_initializer),
    ///     which fails if its type cannot be constructed that way.
    pub fn write_all(&mut self, cache: &TypeCache) -> Result<Vec<Stmt>, FieldError> {
        for (node, name) in std::mem::take(&mut self.pending_needs) {
            // Unknown fields are reported by validation.
            if let Some(&needed) = self.index.get(&name) {
                self.graph.update_edge(node, needed, ());
            }
        }

        self.check_cycles()?;

        let mut written = FixedBitSet::with_capacity(self.graph.node_count());
        let mut out = Vec::with_capacity(self.graph.node_count());

        for node in self.ordered(self.graph.node_indices()) {
            self.write(node, cache, &mut written, &mut out)?;
        }

        Ok(out)
    }

    /// Write `node` after all of its needs,
    ///   unless it has already been written.
    fn write(
        &self,
        node: NodeIndex,
        cache: &TypeCache,
        written: &mut FixedBitSet,
        out: &mut Vec<Stmt>,
    ) -> Result<(), FieldError> {
        if written.put(node.index()) {
            return Ok(());
        }

        for needed in self.ordered(self.graph.neighbors(node)) {
            self.write(needed, cache, written, out)?;
        }

        let field = &self.graph[node];
        let init = match &field.initializer {
            Some(init) => init.clone(),
            None => field.default_initializer(cache).ok_or_else(|| {
                FieldError::NoInitializer {
                    name: field.name.clone(),
                    ty: field.ty.to_string(),
                    span: field.span,
                }
            })?,
        };

        out.push(Stmt::local(field.ty.to_string(), &field.name, init));
        Ok(())
    }

    fn ordered<I>(&self, nodes: I) -> Vec<NodeIndex>
    where
        I: Iterator<Item = NodeIndex>,
    {
        let mut nodes: Vec<_> = nodes.collect();
        nodes.sort_by_key(|&node| (self.graph[node].tier, node.index()));
        nodes
    }

    fn check_cycles(&self) -> Result<(), FieldError> {
        let cycle = petgraph::algo::tarjan_scc(&self.graph)
            .into_iter()
            .find(|scc| {
                scc.len() > 1
                    || self.graph.neighbors(scc[0]).any(|nx| nx == scc[0])
            });

        match cycle {
            None => Ok(()),
            Some(mut scc) => {
                scc.sort_by_key(|node| node.index());

                Err(FieldError::Cycle(
                    scc.into_iter()
                        .map(|node| self.graph[node].name.clone())
                        .collect(),
                ))
            }
        }
    }
}

#[derive(Debug, PartialEq, Eq)]
pub enum FieldError {
    /// A field of the same name has already been registered.
    Duplicate {
        name: String,
        span: Span,
        first: Span,
    },

    /// Reference to a field that has not been registered.
    Unknown(String),

    /// A field was given two different initializers.
    InitializerConflict {
        name: String,
        existing: String,
        new: String,
        span: Span,
    },

    /// A field has no initializer and cannot be constructed by deferred
    ///   binding.
    NoInitializer { name: String, ty: String, span: Span },

    /// Fields need one another,
    ///   so there is no order in which they can be declared.
    Cycle(Vec<String>),
}

impl Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use FieldError::*;

        match self {
            Duplicate { name, .. } => write!(f, "duplicate field: {name}"),
            Unknown(name) => write!(f, "unknown field: {name}"),
            InitializerConflict { name, .. } => {
                write!(f, "field {name} was initialized twice")
            }
            NoInitializer { name, ty, .. } => write!(
                f,
                "field {name} of type {ty} has no initializer, and {ty} \
                   has no default constructor"
            ),
            Cycle(names) => {
                write!(f, "fields depend on one another: {}", names.join(", "))
            }
        }
    }
}

impl Error for FieldError {}

impl Diagnostic for FieldError {
    fn describe(&self) -> Vec<AnnotatedSpan> {
        use FieldError::*;

        match self {
            Duplicate { span, first, .. } => vec![
                first.note("first declared here"),
                span.error("declared again here"),
            ],
            Unknown(_) => vec![],
            InitializerConflict {
                existing, new, span, ..
            } => vec![
                span.error(format!("initialized as {existing}")),
                span.error(format!("and again as {new}")),
            ],
            NoInitializer { span, .. } => span.error("declared here").with_help(
                "provide it from the owner class with \
                   @UiField(provided = true) or a @UiFactory method",
            ),
            Cycle(_) => vec![],
        }
    }
}

#[cfg(test)]
mod test;
