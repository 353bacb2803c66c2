// Translatable attribute values
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

//! Translatable attribute values.
//!
//! A `<ui:attribute>` child marks an attribute of its parent as a
//!   translatable message:
//!
//! ```xml
//! <g:Button title="Send it">
//!   <ui:attribute name="title" description="Tooltip of the send button"/>
//!   Send
//! </g:Button>
//! ```
//!
//! The value of the attribute becomes the default text of the message and
//!   is replaced by a token splicing in the message at runtime,
//!     to be handled by whichever parser claims the attribute.

use crate::{
    messages::MessageMeta,
    writer::{Result, UiBinderError, UiBinderWriter},
    xml::XmlElement,
};
use fxhash::FxHashMap;

const ATTRIBUTE_ELEMENT: &str = "attribute";

/// Replace each attribute of `elem` named by a `<ui:attribute>` child with
///   a translatable message.
pub fn parse_attribute_messages(
    w: &mut UiBinderWriter,
    elem: &mut XmlElement,
) -> Result<()> {
    let markers = elem.consume_child_elements(|child| {
        w.is_binder_element(child) && child.local_name() == ATTRIBUTE_ELEMENT
    });

    for mut marker in markers {
        let name = marker.consume_required_raw_attribute("name")?;
        let meta = MessageMeta::consume(&mut marker);
        w.check_consumed(&marker)?;

        let span = marker.span();

        let found = elem
            .attributes_mut()
            .find(|attr| attr.ns.is_none() && attr.name.to_string() == name);

        let attr = match found {
            Some(attr) => attr,
            None => {
                return Err(UiBinderError::MissingMessageAttribute {
                    elem: elem.name().clone(),
                    attr: name,
                    span,
                })
            }
        };

        let default_text = std::mem::take(&mut attr.value);
        let call =
            w.declare_message(meta, &default_text, &FxHashMap::default(), span)?;

        attr.value = w.expression_token(&call);
    }

    Ok(())
}
