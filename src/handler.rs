// Event handler registration
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

//! Event handler registration.
//!
//! An owner method annotated `@UiHandler({"a", "b"})` receives events from
//!   the template fields `a` and `b`.
//! The method takes a single event parameter,
//!   and the event type names its handler interface through the type
//!   argument of the return type of its `getAssociatedType` method:
//!
//! ```java
//! class ClickEvent extends DomEvent<ClickHandler> {
//!   static Type<ClickHandler> getAssociatedType() { ... }
//! }
//! ```
//!
//! For each such method,
//!   an anonymous implementation of the handler interface that delegates
//!   to the owner is assigned to a local variable,
//!     and is then registered with each named field by its
//!     `add<Handler>` method.
//!
//! The handler interface must declare exactly one method,
//!   which receives the event.
//! Type arguments of the handler interface are taken from the event
//!   parameter
//!     (e.g. `ValueChangeEvent<String>` yields
//!       `ValueChangeHandler<String>`);
//!   if the parameter has none,
//!     the raw handler type is used.

use crate::{
    diagnose::{AnnotatedSpan, Diagnostic},
    field::FieldManager,
    global,
    java::{simple_name, Expr, MethodDecl, Param, Stmt},
    oracle::{Annotated, Method, TypeCache, TypeRef},
    owner::OwnerClass,
};
use std::{
    error::Error,
    fmt::{self, Display},
};

/// Prefix of the local variables holding handler instances.
const HANDLER_VAR_PREFIX: &str = "handlerMethodWithNameVeryUnlikelyToCollideWithUserFieldNames";

/// Name of the parameter of generated handler methods.
const EVENT_PARAM: &str = "event";

/// Statements instantiating a handler for each `@UiHandler` method of the
///   owner and registering it with each field it names.
pub fn write_handlers(
    owner: &OwnerClass,
    fields: &FieldManager,
    cache: &TypeCache,
) -> Result<Vec<Stmt>, HandlerError> {
    let mut stmts = Vec::new();

    for (i, method) in owner.handlers().iter().enumerate() {
        let var = format!("{HANDLER_VAR_PREFIX}{}", i + 1);
        write_handler(method, &var, fields, cache, &mut stmts)?;
    }

    Ok(stmts)
}

fn write_handler(
    method: &Method,
    var: &str,
    fields: &FieldManager,
    cache: &TypeCache,
    out: &mut Vec<Stmt>,
) -> Result<(), HandlerError> {
    let handler_ty = handler_type(method, cache)?;
    let handler_name = handler_ty.to_string();

    let (on_event, event_ty) = handler_method(method, &handler_ty, cache)?;

    let delegate = Expr::name(global::OWNER_PARAM)
        .call(&method.name, vec![Expr::name(EVENT_PARAM)]);

    let anon = Expr::Anonymous {
        ty: handler_name.clone(),
        methods: vec![MethodDecl::new("void", on_event)
            .public()
            .param(Param::new(event_ty.to_string(), EVENT_PARAM))
            .body(vec![delegate.into()])],
    };

    out.push(Stmt::final_local(&handler_name, var, anon));

    let targets = method
        .annotation(global::ANNOTATION_UI_HANDLER)
        .map(|ann| ann.values())
        .unwrap_or_default();

    for target in targets {
        let register = registration_method(method, target, &handler_ty, fields, cache)?;

        out.push(
            Expr::name(target)
                .call(register, vec![Expr::name(var)])
                .into(),
        );
    }

    Ok(())
}

/// Handler interface associated with the event parameter of `method`.
fn handler_type(method: &Method, cache: &TypeCache) -> Result<TypeRef, HandlerError> {
    let event = match method.params.as_slice() {
        [param] => &param.ty,
        _ => {
            return Err(HandlerError::BadParams {
                method: method.name.clone(),
            })
        }
    };

    let event_class = cache.resolve(event).ok_or_else(|| HandlerError::UnknownEvent {
        method: method.name.clone(),
        event: event.to_string(),
    })?;

    let associated = cache
        .find_zero_arg_method(event_class, global::EVENT_ASSOCIATED_TYPE_METHOD)
        .and_then(|m| m.ret.type_args().first())
        .ok_or_else(|| HandlerError::NoAssociatedType {
            method: method.name.clone(),
            event: event.to_string(),
        })?;

    let args = event.type_args();

    Ok(match associated.type_args().len() {
        0 => associated.clone(),
        n if n == args.len() => TypeRef::generic(associated.erased_name(), args.to_vec()),
        _ => associated.erased(),
    })
}

/// Name of the sole method of the handler interface and the event type it
///   receives.
fn handler_method(
    method: &Method,
    handler_ty: &TypeRef,
    cache: &TypeCache,
) -> Result<(String, TypeRef), HandlerError> {
    let bad_interface = || HandlerError::BadHandlerInterface {
        method: method.name.clone(),
        handler: handler_ty.to_string(),
    };

    let handler = cache
        .resolve(handler_ty)
        .filter(|ty| ty.is_interface())
        .ok_or_else(bad_interface)?;

    let abstract_methods: Vec<_> = cache
        .inheritable_methods(handler)
        .into_iter()
        .filter(|m| !m.is_static)
        .collect();

    // The event parameter as declared by the owner method carries the
    //   concrete type arguments.
    let event = &method.params[0].ty;

    match abstract_methods.as_slice() {
        [on_event] => match on_event.params.as_slice() {
            [param] if param.ty.erased() == event.erased() => {
                Ok((on_event.name.clone(), event.clone()))
            }
            _ => Err(bad_interface()),
        },
        _ => Err(bad_interface()),
    }
}

/// Name of the `add<Handler>` method of the field `target` accepting
///   `handler_ty` and returning a registration handle.
///
/// Type arguments are not compared,
///   since registration methods are typically declared by a generic
///   interface.
/// A registration method accepting any supertype of the handler is a
///   match,
///     so more than one match is ambiguous.
fn registration_method(
    method: &Method,
    target: &str,
    handler_ty: &TypeRef,
    fields: &FieldManager,
    cache: &TypeCache,
) -> Result<String, HandlerError> {
    let field = fields.lookup(target).ok_or_else(|| HandlerError::UnknownField {
        method: method.name.clone(),
        field: target.to_string(),
    })?;

    let register = format!("add{}", simple_name(&handler_ty.erased_name()));

    let not_found = || HandlerError::NoRegistrationMethod {
        method: method.name.clone(),
        field: target.to_string(),
        ty: field.ty().to_string(),
        register: register.clone(),
    };

    let class = cache.resolve(field.ty()).ok_or_else(not_found)?;
    let registration = TypeRef::class(global::HANDLER_REGISTRATION_TYPE);
    let handler = handler_ty.erased();

    let matches: Vec<_> = cache
        .methods_named(class, &register)
        .into_iter()
        .filter(|m| cache.is_assignable(&m.ret.erased(), &registration))
        .filter(|m| match m.params.as_slice() {
            [param] => cache.is_assignable(&handler, &param.ty.erased()),
            _ => false,
        })
        .collect();

    match matches.as_slice() {
        [_] => Ok(register),
        [] => Err(not_found()),
        _ => Err(HandlerError::AmbiguousRegistration {
            method: method.name.clone(),
            field: target.to_string(),
            ty: field.ty().to_string(),
            register,
        }),
    }
}

#[derive(Debug, PartialEq, Eq)]
pub enum HandlerError {
    /// A handler method does not take exactly one parameter.
    BadParams { method: String },

    /// The parameter type of a handler method is unknown.
    UnknownEvent { method: String, event: String },

    /// The event type does not declare its handler type.
    NoAssociatedType { method: String, event: String },

    /// The handler type is not an interface with a single method
    ///   receiving the event.
    BadHandlerInterface { method: String, handler: String },

    /// A handler names a field that the template does not declare.
    UnknownField { method: String, field: String },

    /// The field has no method to register the handler.
    NoRegistrationMethod {
        method: String,
        field: String,
        ty: String,
        register: String,
    },

    /// The field has more than one method able to register the handler.
    AmbiguousRegistration {
        method: String,
        field: String,
        ty: String,
        register: String,
    },
}

impl Display for HandlerError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        use HandlerError::*;

        match self {
            BadParams { method } => write!(
                f,
                "@UiHandler method {method} must take exactly one event \
                   parameter"
            ),
            UnknownEvent { method, event } => {
                write!(f, "unknown event type {event} of handler {method}")
            }
            NoAssociatedType { method, event } => write!(
                f,
                "event type {event} of handler {method} does not declare \
                   its handler type"
            ),
            BadHandlerInterface { method, handler } => write!(
                f,
                "{handler} of handler {method} must be an interface with \
                   a single method taking the event"
            ),
            UnknownField { method, field } => write!(
                f,
                "@UiHandler method {method} names field {field}, which is \
                   not declared in the template"
            ),
            NoRegistrationMethod {
                method,
                field,
                ty,
                register,
            } => write!(
                f,
                "field {field} of type {ty} has no method {register} to \
                   register handler {method}"
            ),
            AmbiguousRegistration {
                method,
                field,
                ty,
                register,
            } => write!(
                f,
                "field {field} of type {ty} has more than one method \
                   {register} able to register handler {method}"
            ),
        }
    }
}

impl Error for HandlerError {}

impl Diagnostic for HandlerError {
    fn describe(&self) -> Vec<AnnotatedSpan> {
        // Handlers are declared by the owner,
        //   not the template.
        vec![]
    }
}

#[cfg(test)]
mod test;
