// Generated messages interface
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

//! Translatable messages.
//!
//! The content of a `<ui:msg>` and any attribute value marked by a
//!   `<ui:attribute>` are translatable.
//! Each becomes one method of a messages interface generated along with
//!   the binder,
//!     whose default text is taken from the template;
//!   the template content is replaced by a call to that method.
//!
//! A `<ui:ph>` within a message is a placeholder that translators must
//!   not alter,
//!     and so becomes a parameter of the method,
//!     as does every runtime value spliced into the message
//!       (e.g. a DOM id or a field reference).
//! Default text is a `MessageFormat` pattern in which the parameters are
//!   referenced as `{0}`, `{1}`, and so on;
//!     any quote or brace of the template text is escaped
//!     (see [`escape_message_format`]).

use crate::{
    global,
    java::{ClassDecl, Expr, MethodDecl, Param},
    tokenator::{Piece, Tokenator},
    xml::{escape::escape_java_string, XmlElement},
};
use fxhash::FxHashMap;

/// Name of the generated messages interface,
///   nested within the generated binder.
pub const MESSAGES_TYPE: &str = "UiBinderImplGenMessages";

/// Name of the generated field holding the messages instance.
pub const MESSAGES_FIELD: &str =
    "messagesFieldNameUnlikelyToCollideWithUserSpecifiedFieldOkay";

const DEFAULT_MESSAGE: &str =
    "com.google.gwt.i18n.client.Messages.DefaultMessage";
const EXAMPLE: &str = "com.google.gwt.i18n.client.Messages.Example";
const DESCRIPTION: &str =
    "com.google.gwt.i18n.client.LocalizableResource.Description";
const MEANING: &str = "com.google.gwt.i18n.client.LocalizableResource.Meaning";
const KEY: &str = "com.google.gwt.i18n.client.LocalizableResource.Key";
const GENERATE_KEYS: &str =
    "com.google.gwt.i18n.client.LocalizableResource.GenerateKeys";
const GENERATE: &str =
    "com.google.gwt.i18n.client.LocalizableResource.Generate";

/// Generation of translation files,
///   taken from the `generate*` attributes of the template root.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MessagesConfig {
    /// Key generator class (`ui:generateKeys`).
    pub keys: Option<String>,
    /// Output formats (`ui:generateFormat`).
    pub formats: Vec<String>,
    pub filename: Option<String>,
    pub locales: Vec<String>,
}

impl MessagesConfig {
    /// Split a comma-separated attribute value,
    ///   dropping empty entries.
    pub fn split_list(value: &str) -> Vec<String> {
        value
            .split(',')
            .map(str::trim)
            .filter(|item| !item.is_empty())
            .map(String::from)
            .collect()
    }

    fn annotations(&self) -> Vec<String> {
        let mut annotations = Vec::new();

        if let Some(keys) = &self.keys {
            annotations.push(format!(
                "@{GENERATE_KEYS}(\"{}\")",
                escape_java_string(keys)
            ));
        }

        // Without a format there is nothing to generate.
        if !self.formats.is_empty() {
            let mut elements =
                vec![format!("format = {}", string_array(&self.formats))];

            if let Some(filename) = &self.filename {
                elements.push(format!(
                    "fileName = \"{}\"",
                    escape_java_string(filename)
                ));
            }

            if !self.locales.is_empty() {
                elements
                    .push(format!("locales = {}", string_array(&self.locales)));
            }

            annotations.push(format!("@{GENERATE}({})", elements.join(", ")));
        }

        annotations
    }
}

fn string_array(items: &[String]) -> String {
    let quoted: Vec<_> = items
        .iter()
        .map(|item| format!("\"{}\"", escape_java_string(item)))
        .collect();

    format!("{{{}}}", quoted.join(", "))
}

/// Information for translators describing a message.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MessageMeta {
    pub description: Option<String>,
    pub meaning: Option<String>,
    pub key: Option<String>,
}

impl MessageMeta {
    /// Consume the `description`,
    ///   `meaning`,
    ///   and `key` attributes of `elem`.
    pub fn consume(elem: &mut XmlElement) -> Self {
        Self {
            description: elem.consume_optional_raw_attribute("description"),
            meaning: elem.consume_optional_raw_attribute("meaning"),
            key: elem.consume_optional_raw_attribute("key"),
        }
    }
}

/// A parameter of a message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placeholder {
    pub name: String,
    /// Example value shown to translators.
    pub example: Option<String>,
    /// Argument passed for this parameter.
    pub value: Expr,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Message {
    method: String,
    pattern: String,
    meta: MessageMeta,
    params: Vec<Placeholder>,
}

impl Message {
    fn decl(&self) -> MethodDecl {
        let mut method = MethodDecl::new(global::STRING_TYPE, &self.method)
            .annotate(format!(
                "@{DEFAULT_MESSAGE}(\"{}\")",
                escape_java_string(&self.pattern)
            ));

        let described = [
            (DESCRIPTION, &self.meta.description),
            (MEANING, &self.meta.meaning),
            (KEY, &self.meta.key),
        ];

        for (annotation, value) in described {
            if let Some(value) = value {
                method = method.annotate(format!(
                    "@{annotation}(\"{}\")",
                    escape_java_string(value)
                ));
            }
        }

        self.params.iter().fold(method, |method, ph| {
            let mut param = Param::new(global::STRING_TYPE, &ph.name);

            if let Some(example) = &ph.example {
                param = param.annotate(format!(
                    "@{EXAMPLE}(\"{}\")",
                    escape_java_string(example)
                ));
            }

            method.param(param)
        })
    }
}

/// Messages declared by a template.
#[derive(Debug, Default)]
pub struct MessagesWriter {
    config: MessagesConfig,
    messages: Vec<Message>,
}

impl MessagesWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn configure(&mut self, config: MessagesConfig) {
        self.config = config;
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Declare a message whose default text is `rendered`,
    ///   returning the call producing it at runtime.
    ///
    /// Every token of `tokenator` within `rendered` becomes a parameter of
    ///   the message.
    /// A token found in `placeholders` takes its name,
    ///   example,
    ///   and argument from there;
    ///     any other token is passed as a string literal containing the
    ///     token,
    ///       which is substituted once the source is rendered.
    pub fn declare(
        &mut self,
        meta: MessageMeta,
        rendered: &str,
        tokenator: &Tokenator,
        placeholders: &FxHashMap<String, Placeholder>,
    ) -> Expr {
        let mut pattern = String::with_capacity(rendered.len());
        let mut params: Vec<Placeholder> = Vec::new();

        for piece in tokenator.split(rendered) {
            match piece {
                Piece::Text(text) => {
                    pattern.push_str(&escape_message_format(text))
                }
                Piece::Token(token) => {
                    let mut param =
                        placeholders.get(token).cloned().unwrap_or_else(|| {
                            Placeholder {
                                name: format!("arg{}", params.len()),
                                example: None,
                                value: Expr::str(token),
                            }
                        });

                    if params.iter().any(|p| p.name == param.name) {
                        param.name = format!("{}{}", param.name, params.len());
                    }

                    pattern.push_str(&format!("{{{}}}", params.len()));
                    params.push(param);
                }
            }
        }

        let method = format!("message{}", self.messages.len() + 1);
        let args = params.iter().map(|ph| ph.value.clone()).collect();

        log::trace!("declaring {method}: {pattern:?}");

        self.messages.push(Message {
            method: method.clone(),
            pattern,
            meta,
            params,
        });

        Expr::name(MESSAGES_FIELD).call(method, args)
    }

    /// The messages interface to be nested within the generated binder.
    pub fn declaration(&self) -> ClassDecl {
        let decl = self
            .config
            .annotations()
            .into_iter()
            .fold(ClassDecl::interface(MESSAGES_TYPE), ClassDecl::annotate)
            .extends(global::MESSAGES_TYPE);

        self.messages
            .iter()
            .fold(decl, |decl, message| decl.method(message.decl()))
    }
}

/// Escape template text for use within a `MessageFormat` pattern:
///   quotes are doubled and braces are quoted.
pub fn escape_message_format(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());

    for c in text.chars() {
        match c {
            '\'' => escaped.push_str("''"),
            '{' => escaped.push_str("'{'"),
            '}' => escaped.push_str("'}'"),
            c => escaped.push(c),
        }
    }

    escaped
}
