// Element parsers
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

//! Element parsers.
//!
//! Each element of a template that becomes a field is handed to every
//!   [`ElementParser`] registered for some type in the hierarchy of the
//!   field's type,
//!     most specific type first.
//! Each parser consumes the attributes and content it understands and
//!   leaves the remainder for the parsers that follow;
//!     whatever is left once every parser has run is an error
//!     (see [`UiBinderWriter::parse_element_to_field`]).
//!
//! The [`ElementParser::AttributeMessage`] parser runs first for every
//!   type,
//!     so that translated attribute values are in place before any other
//!     parser reads them.
//! The [`ElementParser::Bean`] parser runs last for every type that is not
//!   a DOM element,
//!     turning remaining attributes into setter invocations.
//! Since it runs last,
//!   more specific parsers always have the first opportunity to claim an
//!   attribute.

mod bean;
mod html;
mod message;
mod panel;
mod root;
mod widget;

pub use html::HtmlInterpreter;
pub use root::parse_root;

use crate::{
    global,
    oracle::ClassType,
    writer::{Result, UiBinderWriter},
    xml::XmlElement,
};

/// Parser of the attributes and content of an element backing a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementParser {
    /// Attribute values marked as translatable by `<ui:attribute>`.
    AttributeMessage,

    /// HTML rendered into a DOM element.
    DomElement,

    /// Style names and debug id.
    UiObject,

    /// Text content.
    HasText,

    /// HTML content.
    HasHtml,

    /// Child widgets.
    HasWidgets,

    /// HTML content with embedded widgets.
    HtmlPanel,

    /// Child widgets in optionally configured cells.
    CellPanel,

    /// Construction and setters.
    Bean,
}

impl ElementParser {
    /// Parser registered for the type `name`,
    ///   if any.
    pub fn for_type_name(name: &str) -> Option<Self> {
        use ElementParser::*;

        match name {
            global::ELEMENT_TYPE => Some(DomElement),
            global::UI_OBJECT_TYPE => Some(UiObject),
            global::HAS_TEXT_TYPE => Some(HasText),
            global::HAS_HTML_TYPE => Some(HasHtml),
            global::HAS_WIDGETS_TYPE => Some(HasWidgets),
            global::HTML_PANEL_TYPE => Some(HtmlPanel),
            global::CELL_PANEL_TYPE => Some(CellPanel),
            _ => None,
        }
    }

    /// Parse `elem` into the field `field` of type `ty`.
    pub fn parse<'o>(
        self,
        w: &mut UiBinderWriter<'o>,
        elem: &mut XmlElement,
        field: &str,
        ty: &'o ClassType,
    ) -> Result<()> {
        use ElementParser::*;

        match self {
            AttributeMessage => message::parse_attribute_messages(w, elem),
            DomElement => html::parse_dom_element(w, elem, field),
            UiObject => widget::parse_ui_object(w, elem, field),
            HasText => widget::parse_has_text(w, elem, field),
            HasHtml => widget::parse_has_html(w, elem, field),
            HasWidgets => panel::parse_has_widgets(w, elem, field),
            HtmlPanel => panel::parse_html_panel(w, elem, field),
            CellPanel => panel::parse_cell_panel(w, elem, field),
            Bean => bean::parse_bean(w, elem, field, ty),
        }
    }
}

/// Parsers to run for an element of type `ty`,
///   in the order in which they must run.
///
/// Parsers are taken from the supertypes of `ty` breadth-first,
///   each superclass ahead of the interfaces implemented alongside it
///   (see [`crate::oracle::TypeCache::hierarchy_superclass_first`]).
pub fn parsers_for<'o>(
    w: &UiBinderWriter<'o>,
    ty: &'o ClassType,
) -> Vec<ElementParser> {
    let mut parsers = vec![ElementParser::AttributeMessage];

    for sup in w.cache().hierarchy_superclass_first(ty).iter() {
        if let Some(parser) = ElementParser::for_type_name(&sup.name()) {
            if !parsers.contains(&parser) {
                parsers.push(parser);
            }
        }
    }

    if !parsers.contains(&ElementParser::DomElement) {
        parsers.push(ElementParser::Bean);
    }

    parsers
}

/// Run every parser applicable to `ty` against `elem`.
pub fn parse_field<'o>(
    w: &mut UiBinderWriter<'o>,
    elem: &mut XmlElement,
    field: &str,
    ty: &'o ClassType,
) -> Result<()> {
    for parser in parsers_for(w, ty) {
        #[cfg(feature = "parser-trace")]
        log::trace!("{parser:?} parsing <{}> ({field})", elem.name());

        parser.parse(w, elem, field, ty)?;
    }

    Ok(())
}
