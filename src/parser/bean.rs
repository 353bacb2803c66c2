// Construction and configuration of arbitrary types
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

//! Construction and configuration of arbitrary types.
//!
//! Any type may appear in a template.
//! Unless its field already has an initializer,
//!   an instance is obtained from the first of:
//!
//!   1. a `@UiFactory` method of the owner producing the type;
//!   2. a `@UiConstructor` of the type; or
//!   3. deferred binding.
//!
//! Arguments of the first two are taken from attributes named after their
//!   parameters.
//! Every other attribute names a property and is passed to the sole
//!   setter of that property.

use crate::{
    global,
    java::Expr,
    oracle::{Annotated, ClassType, Method, Param, TypeRef},
    span::Span,
    writer::{Result, UiBinderError, UiBinderWriter},
    xml::XmlElement,
};

pub fn parse_bean<'o>(
    w: &mut UiBinderWriter<'o>,
    elem: &mut XmlElement,
    field: &str,
    ty: &'o ClassType,
) -> Result<()> {
    parse_bundle_attributes(w, elem, field, ty)?;

    let has_init = w
        .fields()
        .lookup(field)
        .map_or(false, |f| f.initializer().is_some());

    if !has_init {
        if let Some(init) = construct(w, elem, ty)? {
            w.fields_mut().set_initializer(field, init)?;
        }
    }

    set_properties(w, elem, field, ty)
}

/// Pass each remaining attribute without a namespace to the setter of the
///   property it names.
pub(super) fn set_properties<'o>(
    w: &mut UiBinderWriter<'o>,
    elem: &mut XmlElement,
    field: &str,
    ty: &'o ClassType,
) -> Result<()> {
    let props: Vec<String> = elem
        .attributes()
        .iter()
        .filter(|attr| attr.ns.is_none())
        .map(|attr| attr.name.local.clone())
        .collect();

    for prop in props {
        let attr = match elem.consume_attribute_node(&prop) {
            Some(attr) => attr,
            None => continue,
        };

        let setter = find_setter(w, ty, &prop, attr.span)?;
        let types: Vec<TypeRef> = setter.param_types().cloned().collect();

        let args = w.attr_ctx().parse(attr.value.trim(), &types, attr.span)?;

        w.add_statement(Expr::name(field).call(&setter.name, args).into());
    }

    Ok(())
}

/// Expression constructing an instance of `ty`,
///   or [`None`] if deferred binding is to be used.
fn construct<'o>(
    w: &mut UiBinderWriter<'o>,
    elem: &mut XmlElement,
    ty: &'o ClassType,
) -> Result<Option<Expr>> {
    if let Some(factory) = w.owner().factory_for(&ty.as_type_ref()) {
        let args = consume_arguments(w, elem, ty, &factory.params)?;

        return Ok(Some(
            Expr::name(global::OWNER_PARAM).call(&factory.name, args),
        ));
    }

    let ctor = ty
        .constructors
        .iter()
        .find(|ctor| ctor.has_annotation(global::ANNOTATION_UI_CONSTRUCTOR));

    match ctor {
        Some(ctor) => {
            let args = consume_arguments(w, elem, ty, &ctor.params)?;
            Ok(Some(Expr::new_instance(ty.name(), args)))
        }
        None => Ok(None),
    }
}

/// Consume one attribute per parameter in `params`,
///   parsed as the type of that parameter.
pub(super) fn consume_arguments(
    w: &mut UiBinderWriter,
    elem: &mut XmlElement,
    ty: &ClassType,
    params: &[Param],
) -> Result<Vec<Expr>> {
    params
        .iter()
        .map(|param| {
            elem.consume_single_attribute(&param.name, &param.ty, &mut w.attr_ctx())?
                .ok_or_else(|| UiBinderError::MissingArgument {
                    ty: ty.name(),
                    param: param.name.clone(),
                    span: elem.span(),
                })
        })
        .collect()
}

/// The one setter of `prop` on `ty`.
fn find_setter<'o>(
    w: &UiBinderWriter<'o>,
    ty: &'o ClassType,
    prop: &str,
    span: Span,
) -> Result<&'o Method> {
    let property = capitalize(prop);
    let setters: Vec<_> = w
        .cache()
        .methods_named(ty, &format!("set{property}"))
        .into_iter()
        .filter(|m| !m.is_static)
        .collect();

    match setters.as_slice() {
        [setter] => Ok(*setter),
        [] => Err(UiBinderError::NoSetter {
            ty: ty.name(),
            property,
            span,
        }),
        _ => Err(UiBinderError::AmbiguousSetter {
            ty: ty.name(),
            property,
            span,
        }),
    }
}

/// Attributes in a deprecated `urn:with:` namespace,
///   which name zero-argument methods of a resource type whose instance is
///   held in a field named by the namespace prefix.
///
/// Each is passed to the setter named by its local name.
fn parse_bundle_attributes<'o>(
    w: &mut UiBinderWriter<'o>,
    elem: &mut XmlElement,
    field: &str,
    ty: &'o ClassType,
) -> Result<()> {
    loop {
        let attr = match elem
            .attributes()
            .iter()
            .position(|attr| is_bundle_ns(attr.ns.as_deref()))
        {
            Some(i) => elem.attributes()[i].clone(),
            None => return Ok(()),
        };

        let (ns, local) = match &attr.ns {
            Some(ns) => (ns.as_str(), attr.name.local.as_str()),
            None => return Ok(()),
        };

        elem.consume_ns_attribute(ns, local);

        let bundle_ty = ns.trim_start_matches(global::BUNDLE_URI_SCHEME);
        let bundle_field = attr.name.prefix.clone().unwrap_or_default();

        w.warn(format!(
            "deprecated use of {}; declare <ui:with field=\"{bundle_field}\" \
               type=\"{bundle_ty}\"/> and use \
               {local}=\"{{{bundle_field}.{}}}\" instead",
            attr.name, attr.value,
        ));

        if !w.fields().contains(&bundle_field) {
            w.fields_mut().register_imported_field(
                TypeRef::class(bundle_ty),
                &bundle_field,
                attr.span,
            )?;
        }

        let setter = find_setter(w, ty, local, attr.span)?;
        let param = match setter.params.as_slice() {
            [param] => param.ty.clone(),
            _ => {
                return Err(UiBinderError::NoSetter {
                    ty: ty.name(),
                    property: capitalize(local),
                    span: attr.span,
                })
            }
        };

        let expr = w.fields_mut().register_field_reference(
            &format!("{bundle_field}.{}", attr.value.trim()),
            param,
            attr.span,
        );

        w.add_statement(Expr::name(field).call(&setter.name, vec![expr]).into());
    }
}

fn is_bundle_ns(ns: Option<&str>) -> bool {
    ns.map_or(false, |ns| ns.starts_with(global::BUNDLE_URI_SCHEME))
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();

    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
