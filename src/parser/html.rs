// HTML rendering of element bodies
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

//! HTML rendering of element bodies.
//!
//! Element bodies that are HTML are rendered ahead of time into a single
//!   string,
//!     but some elements within them need more than rendering:
//!     elements bound to fields must be located at runtime,
//!     and widgets within an `HTMLPanel` must replace a placeholder.
//! [`HtmlInterpreter`] handles both.
//!
//! How named elements are located depends on where the HTML ends up.
//! HTML that becomes a detached DOM element is navigated by its structure
//!   from the root element
//!     (see [`crate::dom::DomCursor`]),
//!   whereas HTML within a widget is given generated ids and looked up
//!   while the widget is temporarily attached to the document.
//!
//! A `<ui:msg>` within a body is rendered as the default text of a
//!   translatable message
//!     (see [`crate::messages`]),
//!   and is replaced by a token splicing in the message at runtime.
//! Each `<ui:ph>` within the message is rendered on its own and passed to
//!   the message as an argument.

use super::message::parse_attribute_messages;
use crate::{
    dom::DomCursor,
    global,
    java::{simple_name, Expr, Stmt},
    messages::{MessageMeta, Placeholder},
    writer::{Result, UiBinderError, UiBinderWriter},
    xml::{Interpreter, XmlElement},
};
use fxhash::FxHashMap;

const MESSAGE_ELEMENT: &str = "msg";
const PLACEHOLDER_ELEMENT: &str = "ph";

#[derive(Debug)]
enum Mode {
    /// Rendered into a detached element and located by DOM path.
    Path(DomCursor),

    /// Rendered within a widget and located by id while attached,
    ///   optionally replacing widgets into a panel.
    Attached { panel: Option<String> },
}

/// Renders element bodies as HTML,
///   binding elements named with `ui:field`.
pub struct HtmlInterpreter<'w, 'o> {
    writer: &'w mut UiBinderWriter<'o>,
    mode: Mode,
}

impl<'w, 'o> HtmlInterpreter<'w, 'o> {
    /// Interpreter for the body of a DOM element field,
    ///   locating elements with `cursor`.
    pub fn for_dom_element(
        writer: &'w mut UiBinderWriter<'o>,
        cursor: DomCursor,
    ) -> Self {
        Self {
            writer,
            mode: Mode::Path(cursor),
        }
    }

    /// Interpreter for HTML within a widget that is attached to the
    ///   document while its elements are located.
    ///
    /// Widgets are permitted only if a `panel` is provided to receive
    ///   them.
    pub fn attached(
        writer: &'w mut UiBinderWriter<'o>,
        panel: Option<&str>,
    ) -> Self {
        Self {
            writer,
            mode: Mode::Attached {
                panel: panel.map(String::from),
            },
        }
    }

    fn into_cursor(self) -> Option<DomCursor> {
        match self.mode {
            Mode::Path(cursor) => Some(cursor),
            Mode::Attached { .. } => None,
        }
    }

    /// Replace a widget with a placeholder that the panel will swap it
    ///   into.
    fn interpret_widget(&mut self, elem: &mut XmlElement) -> Result<String> {
        let panel = match &self.mode {
            Mode::Attached { panel: Some(panel) } => panel.clone(),
            _ => {
                return Err(UiBinderError::WidgetInHtml {
                    name: elem.name().clone(),
                    span: elem.span(),
                })
            }
        };

        let span = elem.span();
        let child = self.writer.parse_element_to_field(elem)?;
        self.writer.require_widget(&child, span)?;

        let holder = self.writer.dom_id_holder(span)?;
        let token = self.writer.expression_token(&Expr::name(&holder));

        self.writer.add_init_statement(
            Expr::name(panel)
                .call(
                    "addAndReplaceElement",
                    vec![Expr::name(child), Expr::name(holder)],
                )
                .into(),
        );

        Ok(format!("<span id='{token}'></span>"))
    }

    /// Bind an element named with `ui:field` to its field.
    fn bind_dom_field(&mut self, elem: &mut XmlElement, name: String) -> Result<()> {
        let span = elem.span();
        let ty = self
            .writer
            .cache()
            .element_type_for_tag(elem.local_name())
            .ok_or_else(|| UiBinderError::UnknownType {
                name: global::ELEMENT_TYPE.into(),
                span,
            })?
            .as_type_ref();

        let fields = self.writer.fields_mut();
        fields.register_field(ty, &name, span)?;
        fields.set_initializer(&name, Expr::Null)?;

        match &mut self.mode {
            Mode::Path(cursor) => {
                let (stmts, expr) = cursor.access_expression()?;

                for stmt in stmts {
                    self.writer.add_statement(stmt);
                }

                self.writer.add_statement(Stmt::assign(
                    Expr::name(name),
                    expr.call("cast", vec![]),
                ));
            }

            Mode::Attached { .. } => {
                if elem.has_attribute("id") {
                    return Err(UiBinderError::DomFieldWithId {
                        field: name,
                        span: elem.attribute_span("id"),
                    });
                }

                let holder = self.writer.dom_id_holder(span)?;
                let token = self.writer.expression_token(&Expr::name(&holder));
                elem.set_attribute("id", token);

                let lookup = Expr::static_call(
                    simple_name(global::DOCUMENT),
                    "get",
                    vec![],
                )
                .call("getElementById", vec![Expr::name(holder)])
                .call("cast", vec![]);

                self.writer
                    .add_detach_statement(Stmt::assign(Expr::name(&name), lookup));
                self.writer.add_detach_statement(
                    Expr::name(name)
                        .call("removeAttribute", vec![Expr::str("id")])
                        .into(),
                );
            }
        }

        Ok(())
    }
}

impl<'w, 'o> Interpreter<String> for HtmlInterpreter<'w, 'o> {
    type Error = UiBinderError;

    fn interpret_element(
        &mut self,
        elem: &mut XmlElement,
    ) -> Result<Option<String>> {
        if self.writer.is_binder_element(elem) {
            if elem.local_name() == MESSAGE_ELEMENT {
                return interpret_message(Host::Html(self), elem).map(Some);
            }

            return Err(UiBinderError::UnexpectedBinderElement {
                name: elem.name().clone(),
                span: elem.span(),
            });
        }

        if self.writer.is_widget_element(elem) {
            return self.interpret_widget(elem).map(Some);
        }

        let field = elem
            .consume_ns_attribute(self.writer.binder_uri(), "field")
            .map(|attr| attr.value.trim().to_string());

        parse_attribute_messages(self.writer, elem)?;
        self.writer.interpolate_attributes(elem)?;

        if let Some(name) = field {
            self.bind_dom_field(elem, name)?;
        }

        Ok(None)
    }

    fn enter_element(&mut self, elem: &XmlElement) -> Result<()> {
        if self.writer.is_binder_element(elem) {
            return Ok(());
        }

        match &mut self.mode {
            Mode::Path(cursor) => {
                Ok(cursor.visit_child(elem.local_name(), elem.span())?)
            }
            Mode::Attached { .. } => Ok(()),
        }
    }

    fn leave_element(&mut self, elem: &XmlElement) -> Result<()> {
        if let (false, Mode::Path(cursor)) =
            (self.writer.is_binder_element(elem), &mut self.mode)
        {
            cursor.finish_child();
        }

        Ok(())
    }

    fn visit_text(&mut self, text: &str) -> Result<()> {
        if let Mode::Path(cursor) = &mut self.mode {
            cursor.advance_text_child(text);
        }

        Ok(())
    }
}

/// Renders element bodies as plain text,
///   permitting only messages within them.
pub struct TextInterpreter<'w, 'o> {
    writer: &'w mut UiBinderWriter<'o>,
}

impl<'w, 'o> TextInterpreter<'w, 'o> {
    pub fn new(writer: &'w mut UiBinderWriter<'o>) -> Self {
        Self { writer }
    }
}

impl<'w, 'o> Interpreter<String> for TextInterpreter<'w, 'o> {
    type Error = UiBinderError;

    fn interpret_element(
        &mut self,
        elem: &mut XmlElement,
    ) -> Result<Option<String>> {
        match self.writer.is_binder_element(elem)
            && elem.local_name() == MESSAGE_ELEMENT
        {
            true => interpret_message(Host::Text(self), elem).map(Some),
            false => Ok(None),
        }
    }
}

/// Interpreter rendering the body of a message.
enum Host<'i, 'w, 'o> {
    Html(&'i mut HtmlInterpreter<'w, 'o>),
    Text(&'i mut TextInterpreter<'w, 'o>),
}

impl<'i, 'w, 'o> Host<'i, 'w, 'o> {
    fn writer(&mut self) -> &mut UiBinderWriter<'o> {
        match self {
            Self::Html(html) => &mut *html.writer,
            Self::Text(text) => &mut *text.writer,
        }
    }

    fn is_html(&self) -> bool {
        matches!(self, Self::Html(_))
    }

    /// Render the body of `elem` as this host renders the message.
    fn render(&mut self, elem: &mut XmlElement) -> Result<String> {
        match self {
            Self::Html(html) => elem.consume_inner_html(&mut **html),
            Self::Text(text) => elem.consume_inner_text(&mut **text),
        }
    }
}

/// Renders the body of a message,
///   replacing each placeholder with a marker token.
struct MessageContent<'i, 'w, 'o> {
    host: Host<'i, 'w, 'o>,
    placeholders: FxHashMap<String, Placeholder>,
}

impl<'i, 'w, 'o> MessageContent<'i, 'w, 'o> {
    fn interpret_placeholder(&mut self, ph: &mut XmlElement) -> Result<String> {
        let name = ph.consume_optional_raw_attribute("name");
        let example = ph.consume_optional_raw_attribute("example");
        self.host.writer().check_consumed(ph)?;

        let name =
            name.unwrap_or_else(|| format!("arg{}", self.placeholders.len()));
        let value = self.host.render(ph)?;
        let token = self.host.writer().marker_token();

        self.placeholders.insert(
            token.clone(),
            Placeholder {
                name,
                example,
                value: Expr::str(value),
            },
        );

        Ok(token)
    }
}

impl<'i, 'w, 'o> Interpreter<String> for MessageContent<'i, 'w, 'o> {
    type Error = UiBinderError;

    fn interpret_element(
        &mut self,
        elem: &mut XmlElement,
    ) -> Result<Option<String>> {
        if self.host.writer().is_binder_element(elem)
            && elem.local_name() == PLACEHOLDER_ELEMENT
        {
            return self.interpret_placeholder(elem).map(Some);
        }

        match &mut self.host {
            Host::Html(html) => html.interpret_element(elem),
            Host::Text(text) => text.interpret_element(elem),
        }
    }

    fn enter_element(&mut self, elem: &XmlElement) -> Result<()> {
        match &mut self.host {
            Host::Html(html) => html.enter_element(elem),
            Host::Text(text) => text.enter_element(elem),
        }
    }

    fn leave_element(&mut self, elem: &XmlElement) -> Result<()> {
        match &mut self.host {
            Host::Html(html) => html.leave_element(elem),
            Host::Text(text) => text.leave_element(elem),
        }
    }

    fn visit_text(&mut self, text: &str) -> Result<()> {
        match &mut self.host {
            Host::Html(html) => html.visit_text(text),
            Host::Text(host) => host.visit_text(text),
        }
    }
}

/// Declare the message `msg`,
///   returning the token that splices it into the rendered body.
fn interpret_message(
    mut host: Host<'_, '_, '_>,
    msg: &mut XmlElement,
) -> Result<String> {
    let span = msg.span();
    let meta = MessageMeta::consume(msg);
    host.writer().check_consumed(msg)?;

    let is_html = host.is_html();
    let mut content = MessageContent {
        host,
        placeholders: FxHashMap::default(),
    };

    let rendered = match is_html {
        true => msg.consume_inner_html(&mut content)?,
        false => msg.consume_inner_text(&mut content)?,
    };

    let w = content.host.writer();
    let call = w.declare_message(meta, &rendered, &content.placeholders, span)?;

    Ok(w.expression_token(&call))
}

/// Render a DOM element field from its HTML.
///
/// Every remaining attribute and all content of `elem` is rendered.
pub fn parse_dom_element(
    w: &mut UiBinderWriter,
    elem: &mut XmlElement,
    field: &str,
) -> Result<()> {
    let void = elem.is_void();

    w.interpolate_attributes(elem)?;
    let opening = elem.opening_tag();
    while elem.consume_next_attribute().is_some() {}

    let cursor = w.dom_cursor(field, elem);
    let mut interp = HtmlInterpreter::for_dom_element(w, cursor);
    let inner = elem.consume_inner_html(&mut interp)?;

    if let Some(cursor) = interp.into_cursor() {
        w.release_dom_cursor(cursor);
    }

    let html = match void {
        true => opening,
        false => format!("{opening}{inner}{}", elem.closing_tag()),
    };

    let init = Expr::static_call(
        simple_name(global::UIBINDER_UTIL),
        "fromHtml",
        vec![Expr::str(html)],
    )
    .call("cast", vec![]);

    Ok(w.fields_mut().set_initializer(field, init)?)
}
