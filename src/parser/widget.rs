// Parsers common to all widgets
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

//! Parsers common to all widgets.

use super::html::{HtmlInterpreter, TextInterpreter};
use crate::{
    java::Expr,
    oracle::TypeRef,
    writer::{Result, UiBinderWriter},
    xml::XmlElement,
};

/// Style name attributes and the setter each is passed to.
const STYLE_SETTERS: &[(&str, &str)] = &[
    ("styleName", "setStyleName"),
    ("stylePrimaryName", "setStylePrimaryName"),
    ("debugId", "ensureDebugId"),
];

/// Attributes holding lists of style names,
///   each of which is passed to the setter individually.
const STYLE_LIST_SETTERS: &[(&str, &str)] = &[
    ("addStyleNames", "addStyleName"),
    ("addStyleDependentNames", "addStyleDependentName"),
];

pub fn parse_ui_object(
    w: &mut UiBinderWriter,
    elem: &mut XmlElement,
    field: &str,
) -> Result<()> {
    let string = TypeRef::string();

    for (attr, setter) in STYLE_SETTERS {
        if let Some(value) =
            elem.consume_single_attribute(attr, &string, &mut w.attr_ctx())?
        {
            w.add_statement(Expr::name(field).call(*setter, vec![value]).into());
        }
    }

    for (attr, setter) in STYLE_LIST_SETTERS {
        let span = elem.attribute_span(attr);

        for name in elem.consume_raw_array_attribute(attr) {
            let value = w.attr_ctx().parse_single(&name, &string, span)?;
            w.add_statement(Expr::name(field).call(*setter, vec![value]).into());
        }
    }

    Ok(())
}

/// Text content becomes `setText`.
pub fn parse_has_text(
    w: &mut UiBinderWriter,
    elem: &mut XmlElement,
    field: &str,
) -> Result<()> {
    if !elem.has_content() {
        return Ok(());
    }

    let text = elem.consume_inner_text(&mut TextInterpreter::new(w))?;

    if !text.is_empty() {
        w.add_statement(
            Expr::name(field).call("setText", vec![Expr::str(text)]).into(),
        );
    }

    Ok(())
}

/// HTML content becomes `setHTML`.
///
/// Elements within the content that are bound to fields are located while
///   the widget is attached to the document.
pub fn parse_has_html(
    w: &mut UiBinderWriter,
    elem: &mut XmlElement,
    field: &str,
) -> Result<()> {
    if !elem.has_content() {
        return Ok(());
    }

    w.begin_attach_section(Expr::name(field).call("getElement", vec![]));
    let html = elem.consume_inner_html(&mut HtmlInterpreter::attached(w, None));
    w.end_attach_section();

    let html = html?;

    if !html.trim().is_empty() {
        w.add_statement(
            Expr::name(field).call("setHTML", vec![Expr::str(html)]).into(),
        );
    }

    Ok(())
}
