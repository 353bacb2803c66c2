// Parsers of widgets containing other widgets
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

//! Parsers of widgets containing other widgets.

use super::html::HtmlInterpreter;
use crate::{
    global,
    java::Expr,
    oracle::TypeRef,
    writer::{Result, UiBinderError, UiBinderWriter},
    xml::XmlElement,
};

/// Local names of the element configuring a cell of a cell panel.
const CELL_ELEMENTS: &[&str] = &["Cell", "cell"];

/// Add each child widget with `add`.
pub fn parse_has_widgets(
    w: &mut UiBinderWriter,
    elem: &mut XmlElement,
    field: &str,
) -> Result<()> {
    for mut child in elem.consume_all_child_elements()? {
        let name = parse_child_widget(w, &mut child)?;
        w.add_statement(add_widget(field, &name));
    }

    Ok(())
}

fn parse_child_widget(
    w: &mut UiBinderWriter,
    child: &mut XmlElement,
) -> Result<String> {
    let span = child.span();
    let name = w.parse_element_to_field(child)?;
    w.require_widget(&name, span)?;

    Ok(name)
}

fn add_widget(panel: &str, widget: &str) -> crate::java::Stmt {
    Expr::name(panel)
        .call("add", vec![Expr::name(widget)])
        .into()
}

/// Render HTML content with embedded widgets,
///   constructing the panel from the rendered HTML.
///
/// The panel cannot be provided by the owner,
///   since its contents would then be lost.
pub fn parse_html_panel(
    w: &mut UiBinderWriter,
    elem: &mut XmlElement,
    field: &str,
) -> Result<()> {
    let ty = match w.fields().lookup(field) {
        Some(f) if f.initializer().is_some() => {
            return Err(UiBinderError::ProvidedHtmlPanel {
                field: field.to_string(),
                span: elem.span(),
            })
        }
        Some(f) => f.ty().to_string(),
        None => global::HTML_PANEL_TYPE.to_string(),
    };

    // Root tag of the panel,
    //   if not the default.
    let tag = elem
        .consume_optional_raw_attribute("tag")
        .map(|tag| Expr::str(tag.to_ascii_lowercase()));

    w.begin_attach_section(Expr::name(field).call("getElement", vec![]));
    let html =
        elem.consume_inner_html(&mut HtmlInterpreter::attached(w, Some(field)));
    w.end_attach_section();

    let args = tag.into_iter().chain([Expr::str(html?)]).collect();
    let init = Expr::new_instance(ty, args);
    Ok(w.fields_mut().set_initializer(field, init)?)
}

/// Add each child widget,
///   optionally wrapped in a cell element configuring the cell that holds
///   it.
pub fn parse_cell_panel(
    w: &mut UiBinderWriter,
    elem: &mut XmlElement,
    field: &str,
) -> Result<()> {
    let ns = elem.namespace_uri().map(String::from);

    for mut child in elem.consume_all_child_elements()? {
        let is_cell = child.namespace_uri() == ns.as_deref()
            && CELL_ELEMENTS.contains(&child.local_name());

        if !is_cell {
            let name = parse_child_widget(w, &mut child)?;
            w.add_statement(add_widget(field, &name));
            continue;
        }

        let cell_props = [
            ("width", "setCellWidth", TypeRef::string()),
            ("height", "setCellHeight", TypeRef::string()),
            (
                "horizontalAlignment",
                "setCellHorizontalAlignment",
                TypeRef::class(global::HORIZONTAL_ALIGNMENT_TYPE),
            ),
            (
                "verticalAlignment",
                "setCellVerticalAlignment",
                TypeRef::class(global::VERTICAL_ALIGNMENT_TYPE),
            ),
        ];

        let mut setters = Vec::new();

        for (attr, setter, ty) in cell_props.iter() {
            if let Some(value) =
                child.consume_single_attribute(attr, ty, &mut w.attr_ctx())?
            {
                setters.push((*setter, value));
            }
        }

        let mut widget = child.consume_single_child_element()?;
        w.check_consumed(&child)?;

        let name = parse_child_widget(w, &mut widget)?;
        w.add_statement(add_widget(field, &name));

        for (setter, value) in setters {
            w.add_statement(
                Expr::name(field)
                    .call(setter, vec![Expr::name(&name), value])
                    .into(),
            );
        }
    }

    Ok(())
}
