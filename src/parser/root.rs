// Template root and resource declarations
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

//! Template root and resource declarations.
//!
//! The root of every template is `<ui:UiBinder>`.
//! Its children in the binder namespace declare resources available to
//!   field references throughout the template;
//!     the one remaining child is the root of the user interface.

use super::bean::{consume_arguments, set_properties};
use crate::{
    bundle::StyleSource,
    global,
    java::Expr,
    messages::MessagesConfig,
    oracle::{ClassType, TypeRef},
    span::Span,
    writer::{Result, UiBinderError, UiBinderWriter},
    xml::XmlElement,
};

/// Local name of the root element.
const ROOT_ELEMENT: &str = "UiBinder";

/// Generation of translation files,
///   configured by attributes of the root.
fn messages_config(root: &mut XmlElement, uri: &str) -> MessagesConfig {
    let mut generate = |local: &str| {
        root.consume_ns_attribute(uri, local)
            .map(|attr| attr.value.trim().to_string())
    };

    MessagesConfig {
        keys: generate("generateKeys"),
        formats: generate("generateFormat")
            .map_or_else(Vec::new, |v| MessagesConfig::split_list(&v)),
        filename: generate("generateFilename"),
        locales: generate("generateLocales")
            .map_or_else(Vec::new, |v| MessagesConfig::split_list(&v)),
    }
}

/// Parse the template root,
///   returning the name of the field holding the user interface.
pub fn parse_root(w: &mut UiBinderWriter, root: &mut XmlElement) -> Result<String> {
    if !w.is_binder_element(root) || root.local_name() != ROOT_ELEMENT {
        return Err(UiBinderError::BadRoot {
            found: root.name().clone(),
            span: root.span(),
        });
    }

    let uri = w.binder_uri().to_string();

    let config = messages_config(root, &uri);
    w.messages_mut().configure(config);

    while let Some(attr) = root.consume_next_attribute() {
        w.warn(format!("ignoring unknown attribute {} of <{}>", attr.name, root.name()));
    }

    let decls =
        root.consume_child_elements(|child| child.namespace_uri() == Some(uri.as_str()));

    for mut decl in decls {
        match decl.local_name() {
            "with" => parse_with(w, &mut decl)?,
            "style" => parse_style(w, &mut decl)?,
            "image" => parse_bundled(w, &mut decl, global::IMAGE_RESOURCE_TYPE)?,
            "data" => parse_bundled(w, &mut decl, global::DATA_RESOURCE_TYPE)?,
            "import" => parse_import(w, &mut decl)?,
            _ => {
                return Err(UiBinderError::UnknownBinderElement {
                    name: decl.name().clone(),
                    span: decl.span(),
                })
            }
        }

        w.check_consumed(&decl)?;
    }

    let mut ui = root.consume_single_child_element()?;
    w.parse_element_to_field(&mut ui)
}

fn find_type<'o>(
    w: &UiBinderWriter<'o>,
    name: &str,
    elem: &XmlElement,
) -> Result<&'o ClassType> {
    w.cache()
        .find_type(name)
        .ok_or_else(|| UiBinderError::UnknownType {
            name: name.to_string(),
            span: elem.span(),
        })
}

/// `<ui:with field="name" type="pkg.Type"/>`
///
/// The resource is provided by the owner,
///   produced by an owner factory,
///   or constructed by deferred binding.
/// An optional `<ui:attributes>` child sets its properties.
fn parse_with(w: &mut UiBinderWriter, elem: &mut XmlElement) -> Result<()> {
    let span = elem.span();
    let field = elem.consume_required_raw_attribute("field")?;
    let type_name = elem.consume_required_raw_attribute("type")?;

    let ty = find_type(w, &type_name, elem)?;
    let ty_ref = ty.as_type_ref();

    w.fields_mut()
        .register_imported_field(ty_ref.clone(), &field, span)?;

    let owner_field = w.owner().ui_field(&field).cloned();
    let factory = w.owner().factory_for(&ty_ref);

    let init = match (owner_field, factory) {
        (Some(owner_field), _) if owner_field.provided => {
            if !w.cache().is_assignable(&owner_field.ty, &ty_ref) {
                return Err(UiBinderError::OwnerFieldMismatch {
                    field,
                    owner_ty: owner_field.ty.to_string(),
                    template_ty: ty_ref.to_string(),
                    span,
                });
            }

            Some(Expr::name(global::OWNER_PARAM).dot(&field))
        }

        (_, Some(factory)) => {
            let args = consume_arguments(w, elem, ty, &factory.params)?;
            Some(Expr::name(global::OWNER_PARAM).call(&factory.name, args))
        }

        _ => None,
    };

    if let Some(init) = init {
        w.fields_mut().set_initializer(&field, init)?;
    }

    let uri = w.binder_uri().to_string();
    let mut attr_elems = elem.consume_child_elements(|child| {
        child.namespace_uri() == Some(uri.as_str()) && child.local_name() == "attributes"
    });

    match attr_elems.as_mut_slice() {
        [] => (),
        [attrs] => {
            set_properties(w, attrs, &field, ty)?;
            w.check_consumed(attrs)?;
        }
        [_, extra, ..] => {
            return Err(UiBinderError::UnexpectedBinderElement {
                name: extra.name().clone(),
                span: extra.span(),
            })
        }
    }

    Ok(())
}

/// `<ui:style field="style" type="pkg.Css" src="file.css">...</ui:style>`
///
/// The stylesheet is given either by `src` or as the body of the element.
fn parse_style(w: &mut UiBinderWriter, elem: &mut XmlElement) -> Result<()> {
    let span = elem.span();
    let field = elem.consume_raw_attribute_or("field", "style");
    let src = elem.consume_optional_raw_attribute("src");

    let public_ty = match elem.consume_optional_raw_attribute("type") {
        None => TypeRef::class(global::CSS_RESOURCE_TYPE),
        Some(name) => {
            let ty = find_type(w, &name, elem)?;

            if !w
                .cache()
                .is_assignable_name(&ty.name(), global::CSS_RESOURCE_TYPE)
            {
                return Err(UiBinderError::NotCssResource {
                    ty: ty.name(),
                    span,
                });
            }

            ty.as_type_ref()
        }
    };

    let body = elem.consume_unescaped_inner_text()?;

    let (source, css) = match src {
        Some(_) if !body.is_empty() => {
            return Err(UiBinderError::StyleSourceAndBody { span })
        }
        Some(path) => {
            let css = w.load_resource(&path)?;
            (StyleSource::File(path), css)
        }
        None => (StyleSource::Inline(body.clone()), body),
    };

    let css_iface = w.bundle_mut().add_style(&field, public_ty, source, &css);
    let css_ty = TypeRef::class(css_iface.name.clone());
    let methods: Vec<String> = css_iface.methods().map(String::from).collect();

    w.fields_mut()
        .register_field_for_generated_css_resource(css_ty, &field, methods, span)?;

    init_from_bundle(w, &field, span)?;

    w.add_init_statement(
        Expr::name(&field).call("ensureInjected", vec![]).into(),
    );

    Ok(())
}

/// `<ui:image field="name" src="file.png"/>` and
///   `<ui:data field="name" src="file.bin"/>`
fn parse_bundled(
    w: &mut UiBinderWriter,
    elem: &mut XmlElement,
    resource_ty: &str,
) -> Result<()> {
    let span = elem.span();
    let field = elem.consume_required_raw_attribute("field")?;
    let src = elem.consume_optional_raw_attribute("src");

    match resource_ty {
        global::IMAGE_RESOURCE_TYPE => w.bundle_mut().add_image(&field, src),
        _ => w.bundle_mut().add_data(&field, src),
    }

    w.fields_mut().register_imported_field(
        TypeRef::class(resource_ty),
        &field,
        span,
    )?;

    init_from_bundle(w, &field, span)
}

/// Initialize `field` from its accessor on the implicit bundle.
fn init_from_bundle(
    w: &mut UiBinderWriter,
    field: &str,
    span: Span,
) -> Result<()> {
    let bundle = w.ensure_bundle_field(span)?;
    let fields = w.fields_mut();

    fields.set_initializer(field, Expr::name(bundle).call(field, vec![]))?;
    Ok(fields.needs(field, bundle)?)
}

/// `<ui:import field="pkg.Type.CONSTANT"/>` or `<ui:import field="pkg.Type.*"/>`
///
/// Each imported static field becomes a field of the same name.
fn parse_import(w: &mut UiBinderWriter, elem: &mut XmlElement) -> Result<()> {
    let span = elem.span();
    let path = elem.consume_required_raw_attribute("field")?;

    let (type_name, member) = path.rsplit_once('.').ok_or_else(|| {
        UiBinderError::NotAConstant {
            name: path.clone(),
            span,
        }
    })?;

    let ty = find_type(w, type_name, elem)?;
    let owner_ty = ty.name();

    let mut imports: Vec<(String, TypeRef)> = Vec::new();

    if member == "*" {
        imports.extend(
            ty.fields
                .iter()
                .filter(|f| f.is_static)
                .map(|f| (f.name.clone(), f.ty.clone())),
        );
        imports.extend(
            ty.enum_constants
                .iter()
                .map(|c| (c.clone(), ty.as_type_ref())),
        );
    } else if ty.enum_constants.iter().any(|c| c == member) {
        imports.push((member.to_string(), ty.as_type_ref()));
    } else {
        match ty.find_field(member) {
            Some(f) if f.is_static => imports.push((f.name.clone(), f.ty.clone())),
            _ => {
                return Err(UiBinderError::NotAConstant {
                    name: path.clone(),
                    span,
                })
            }
        }
    }

    for (name, field_ty) in imports {
        let field_ty = match field_ty.as_primitive() {
            Some(prim) => TypeRef::class(prim.boxed_name()),
            None => field_ty,
        };

        let fields = w.fields_mut();
        fields.register_imported_field(field_ty, &name, span)?;
        fields.set_initializer(&name, Expr::name(&owner_ty).dot(&name))?;
    }

    Ok(())
}
