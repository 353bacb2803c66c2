// Template compilation errors
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

//! Errors resulting from the compilation of a template.

use std::{
    error::Error,
    fmt::{self, Display},
};

use crate::{
    attr::AttrParseError,
    diagnose::{Annotate, AnnotatedSpan, Diagnostic},
    dom::CursorError,
    field::{FieldError, FieldReferenceError},
    handler::HandlerError,
    owner::OwnerError,
    resource::ResourceError,
    span::Span,
    xml::{QName, XmlError},
};

/// An error that aborts the compilation of a template.
///
/// No output is produced for a template once any of these has occurred.
#[derive(Debug, PartialEq)]
pub enum UiBinderError {
    Xml(XmlError),
    Field(FieldError),
    Attr(AttrParseError),
    Cursor(CursorError),
    Owner(OwnerError),
    Handler(HandlerError),
    Resource(ResourceError),

    /// Every field reference of the template that failed validation.
    FieldReferences(Vec<FieldReferenceError>),

    /// The binder type does not extend `UiBinder<U, O>`.
    NotUiBinder(String),

    /// A type named by the template or the binder is unknown to the type
    ///   oracle.
    UnknownType { name: String, span: Span },

    /// The template root is not `<ui:UiBinder>`.
    BadRoot { found: QName, span: Span },

    /// A binder element other than those that declare resources appears
    ///   at the top level of the template.
    UnknownBinderElement { name: QName, span: Span },

    /// A binder element appears where a widget or HTML is expected.
    UnexpectedBinderElement { name: QName, span: Span },

    /// A `<ui:attribute>` names an attribute its parent does not have.
    MissingMessageAttribute { elem: QName, attr: String, span: Span },

    /// An attribute remained after every parser of its element ran.
    UnexpectedAttribute { name: String, span: Span },

    /// Content remained after every parser of its element ran.
    UnexpectedContent { elem: QName, span: Span },

    /// A widget declares both `ui:field` and the deprecated `id`.
    FieldAndId { span: Span },

    /// A widget appears within HTML that cannot contain widgets.
    WidgetInHtml { name: QName, span: Span },

    /// A field used as a widget is of some other type.
    NotAWidget { field: String, ty: String, span: Span },

    /// No setter exists for an attribute.
    NoSetter {
        ty: String,
        property: String,
        span: Span,
    },

    /// More than one setter exists for an attribute.
    AmbiguousSetter {
        ty: String,
        property: String,
        span: Span,
    },

    /// A factory or `@UiConstructor` argument was not provided as an
    ///   attribute.
    MissingArgument {
        ty: String,
        param: String,
        span: Span,
    },

    /// An `HTMLPanel` cannot be supplied by its owner,
    ///   since its contents are rendered by the template.
    ProvidedHtmlPanel { field: String, span: Span },

    /// An element rendered within a widget that is bound to a field
    ///   already has an `id`.
    DomFieldWithId { field: String, span: Span },

    /// A template field is not compatible with the owner field of the
    ///   same name.
    OwnerFieldMismatch {
        field: String,
        owner_ty: String,
        template_ty: String,
        span: Span,
    },

    /// An owner `@UiField` has no counterpart in the template.
    MissingTemplateField { field: String, owner: String },

    /// The root of the template is not of the type produced by the binder.
    RootTypeMismatch {
        expected: String,
        found: String,
        span: Span,
    },

    /// The type of a `<ui:style>` does not extend `CssResource`.
    NotCssResource { ty: String, span: Span },

    /// A `<ui:style>` has both a `src` attribute and a body.
    StyleSourceAndBody { span: Span },

    /// A `<ui:import>` names something other than a static field.
    NotAConstant { name: String, span: Span },

    /// The generated source could not be rendered.
    Render(String),
}

impl Display for UiBinderError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        use UiBinderError::*;

        match self {
            Xml(e) => Display::fmt(e, f),
            Field(e) => Display::fmt(e, f),
            Attr(e) => Display::fmt(e, f),
            Cursor(e) => Display::fmt(e, f),
            Owner(e) => Display::fmt(e, f),
            Handler(e) => Display::fmt(e, f),
            Resource(e) => Display::fmt(e, f),

            FieldReferences(errs) => match errs.as_slice() {
                [one] => Display::fmt(one, f),
                _ => write!(f, "{} field references are invalid", errs.len()),
            },

            NotUiBinder(binder) => write!(
                f,
                "{binder} must extend UiBinder<U, O> with concrete type \
                   arguments"
            ),
            UnknownType { name, .. } => write!(f, "no class matching {name}"),
            BadRoot { found, .. } => write!(
                f,
                "root element must be <ui:UiBinder>, but found <{found}>"
            ),
            UnknownBinderElement { name, .. } => {
                write!(f, "unknown tag <{name}>")
            }
            UnexpectedBinderElement { name, .. } => {
                write!(f, "<{name}> is not permitted here")
            }
            MissingMessageAttribute { elem, attr, .. } => {
                write!(f, "<{elem}> has no attribute \"{attr}\" to translate")
            }
            UnexpectedAttribute { name, .. } => {
                write!(f, "unexpected attribute \"{name}\"")
            }
            UnexpectedContent { elem, .. } => {
                write!(f, "unexpected content in <{elem}>")
            }
            FieldAndId { .. } => write!(
                f,
                "cannot declare both ui:field and id on the same element"
            ),
            WidgetInHtml { name, .. } => write!(
                f,
                "widget <{name}> is not permitted within this HTML"
            ),
            NotAWidget { field, ty, .. } => {
                write!(f, "field {field} of type {ty} is not a widget")
            }
            NoSetter { ty, property, .. } => {
                write!(f, "class {ty} has no appropriate set{property}() method")
            }
            AmbiguousSetter { ty, property, .. } => write!(
                f,
                "class {ty} has more than one set{property}() method"
            ),
            MissingArgument { ty, param, .. } => write!(
                f,
                "missing required attribute \"{param}\" to construct {ty}"
            ),
            ProvidedHtmlPanel { field, .. } => write!(
                f,
                "HTMLPanel field {field} cannot be provided by its owner"
            ),
            DomFieldWithId { field, .. } => write!(
                f,
                "element of field {field} must not declare an id"
            ),
            OwnerFieldMismatch {
                field,
                owner_ty,
                template_ty,
                ..
            } => write!(
                f,
                "template field {field} of type {template_ty} does not \
                   match owner field of type {owner_ty}"
            ),
            MissingTemplateField { field, owner } => write!(
                f,
                "field {field} of {owner} has no corresponding field in \
                   the template"
            ),
            RootTypeMismatch {
                expected, found, ..
            } => write!(
                f,
                "template root of type {found} cannot be returned as \
                   {expected}"
            ),
            NotCssResource { ty, .. } => {
                write!(f, "style type {ty} does not extend CssResource")
            }
            StyleSourceAndBody { .. } => {
                write!(f, "<ui:style> must not have both src and a body")
            }
            NotAConstant { name, .. } => {
                write!(f, "{name} is not a static field")
            }
            Render(msg) => write!(f, "unable to render source: {msg}"),
        }
    }
}

impl Error for UiBinderError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        use UiBinderError::*;

        match self {
            Resource(e) => e.source(),
            _ => None,
        }
    }
}

impl From<XmlError> for UiBinderError {
    fn from(e: XmlError) -> Self {
        Self::Xml(e)
    }
}

impl From<FieldError> for UiBinderError {
    fn from(e: FieldError) -> Self {
        Self::Field(e)
    }
}

impl From<AttrParseError> for UiBinderError {
    fn from(e: AttrParseError) -> Self {
        Self::Attr(e)
    }
}

impl From<CursorError> for UiBinderError {
    fn from(e: CursorError) -> Self {
        Self::Cursor(e)
    }
}

impl From<OwnerError> for UiBinderError {
    fn from(e: OwnerError) -> Self {
        Self::Owner(e)
    }
}

impl From<HandlerError> for UiBinderError {
    fn from(e: HandlerError) -> Self {
        Self::Handler(e)
    }
}

impl From<ResourceError> for UiBinderError {
    fn from(e: ResourceError) -> Self {
        Self::Resource(e)
    }
}

impl From<std::io::Error> for UiBinderError {
    fn from(e: std::io::Error) -> Self {
        Self::Render(e.to_string())
    }
}

impl Diagnostic for UiBinderError {
    fn describe(&self) -> Vec<AnnotatedSpan> {
        use UiBinderError::*;

        match self {
            Xml(e) => e.describe(),
            Field(e) => e.describe(),
            Attr(e) => e.describe(),
            Cursor(e) => e.describe(),
            Owner(e) => e.describe(),
            Handler(e) => e.describe(),
            Resource(_) => vec![],

            FieldReferences(errs) => errs
                .iter()
                .flat_map(|e| {
                    let mut desc = e.describe();
                    desc.push(e.span.note(e.to_string()));
                    desc
                })
                .collect(),

            NotUiBinder(_) | MissingTemplateField { .. } | Render(_) => {
                vec![]
            }

            UnknownType { span, .. } => span.mark_error().into(),
            BadRoot { span, .. } => span
                .mark_error()
                .with_help("declare xmlns:ui=\"urn:ui:com.google.gwt.uibinder\""),
            UnknownBinderElement { span, .. } => span.error(
                "expected one of <ui:with>, <ui:style>, <ui:image>, \
                   <ui:data>, or <ui:import>",
            )
            .into(),
            UnexpectedBinderElement { span, .. } => span.mark_error().into(),
            MissingMessageAttribute { span, .. } => span
                .error("translated attribute declared here")
                .into(),
            UnexpectedAttribute { span, .. } => span.mark_error().into(),
            UnexpectedContent { span, .. } => {
                span.error("no parser of this element accepts content").into()
            }
            FieldAndId { span } => span
                .mark_error()
                .with_help("id is deprecated on widgets; use ui:field"),
            WidgetInHtml { span, .. } => span
                .mark_error()
                .with_help("widgets may be placed within an HTMLPanel"),
            NotAWidget { span, .. } => span.mark_error().into(),
            NoSetter { span, .. } => span.mark_error().into(),
            AmbiguousSetter { span, .. } => span.mark_error().into(),
            MissingArgument { span, .. } => span.mark_error().into(),
            ProvidedHtmlPanel { span, .. } => span.mark_error().into(),
            DomFieldWithId { span, .. } => span
                .error("this element is located by a generated id")
                .into(),
            OwnerFieldMismatch { span, .. } => span.mark_error().into(),
            RootTypeMismatch { span, .. } => span.mark_error().into(),
            NotCssResource { span, .. } => span.mark_error().into(),
            StyleSourceAndBody { span } => span.mark_error().into(),
            NotAConstant { span, .. } => span.mark_error().into(),
        }
    }
}
