// Fixtures for testing
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

//! Fixtures for testing.
//!
//! [`widget_library`] is a low-fidelity model of the host widget toolkit:
//!   just enough of its type hierarchy,
//!   setters,
//!   and event plumbing to exercise every element parser.
//! Tests add their own owner and binder types on top of it.

use crate::{
    global,
    oracle::{
        Annotation, ClassType, Constructor, FieldDecl, MemoryTypeOracle,
        Method, Primitive, TypeRef,
    },
};

pub const UI: &str = "com.google.gwt.user.client.ui";
pub const DOM: &str = "com.google.gwt.dom.client";
pub const EVENT: &str = "com.google.gwt.event.dom.client";
pub const LOGICAL_EVENT: &str = "com.google.gwt.event.logical.shared";
pub const SHARED_EVENT: &str = "com.google.gwt.event.shared";

pub fn ty(name: &str) -> TypeRef {
    TypeRef::parse(name)
}

fn ui(name: &str) -> TypeRef {
    TypeRef::class(format!("{UI}.{name}"))
}

fn string() -> TypeRef {
    TypeRef::string()
}

fn boolean() -> TypeRef {
    TypeRef::Primitive(Primitive::Boolean)
}

fn int() -> TypeRef {
    TypeRef::Primitive(Primitive::Int)
}

fn setter(name: &str, param: TypeRef) -> Method {
    Method::void(name).param("value", param)
}

fn tag_name(tags: &[&str]) -> Annotation {
    tags.iter()
        .fold(Annotation::new(global::ANNOTATION_TAG_NAME), |ann, tag| {
            ann.value(*tag)
        })
}

fn element(name: &str, tags: &[&str]) -> ClassType {
    ClassType::class(DOM, name)
        .extends(TypeRef::class(global::ELEMENT_TYPE))
        .annotate(tag_name(tags))
}

/// A click-style event with its handler and registration interface,
///   in the manner of the toolkit's DOM events.
fn dom_event(oracle: &mut MemoryTypeOracle, event: &str, on: &str) {
    let handler = format!("{EVENT}.{event}Handler");
    let event_ty = format!("{EVENT}.{event}Event");

    oracle
        .add(
            ClassType::class(EVENT, format!("{event}Event"))
                .extends(TypeRef::generic(
                    format!("{EVENT}.DomEvent"),
                    vec![ty(&handler)],
                ))
                .method(Method::new(
                    global::EVENT_ASSOCIATED_TYPE_METHOD,
                    TypeRef::generic(
                        format!("{EVENT}.DomEvent.Type"),
                        vec![ty(&handler)],
                    ),
                )),
        )
        .add(
            ClassType::interface(EVENT, format!("{event}Handler"))
                .implements(ty(&format!("{SHARED_EVENT}.EventHandler")))
                .method(Method::void(on).param("event", ty(&event_ty))),
        )
        .add(
            ClassType::interface(EVENT, format!("Has{event}Handlers")).method(
                Method::new(
                    format!("add{event}Handler"),
                    ty(global::HANDLER_REGISTRATION_TYPE),
                )
                .param("handler", ty(&handler)),
            ),
        );
}

/// Model of the host widget toolkit.
pub fn widget_library() -> MemoryTypeOracle {
    let mut oracle = MemoryTypeOracle::new();

    oracle
        .add(ClassType::class("java.lang", "Object"))
        .add(ClassType::class("java.lang", "String"))
        .add(ClassType::class("java.lang", "Boolean"))
        .add(ClassType::class("java.lang", "Integer"))
        .add(ClassType::class("java.lang", "Double"))
        .add(ClassType::class("java.lang", "Enum").with_abstract());

    // DOM
    oracle
        .add(
            ClassType::class(DOM, "Element")
                .method(Method::void("removeAttribute").param("name", string()))
                .method(Method::new("getId", string()))
                .method(setter("setId", string())),
        )
        .add(element("DivElement", &["div"]))
        .add(element("SpanElement", &["span"]))
        .add(element("ParagraphElement", &["p"]))
        .add(element("AnchorElement", &["a"]))
        .add(element("TableElement", &["table"]))
        .add(element("HeadingElement", &["h1", "h2", "h3"]))
        .add(ClassType::class(DOM, "Document"));

    // Events
    oracle
        .add(ClassType::interface(SHARED_EVENT, "EventHandler"))
        .add(ClassType::interface(SHARED_EVENT, "HandlerRegistration"))
        .add(ClassType::class(EVENT, "DomEvent").with_abstract());

    dom_event(&mut oracle, "Click", "onClick");
    dom_event(&mut oracle, "MouseOver", "onMouseOver");

    let value_change = format!("{LOGICAL_EVENT}.ValueChangeHandler<T>");
    oracle
        .add(
            ClassType::class(LOGICAL_EVENT, "ValueChangeEvent").method(
                Method::new(
                    global::EVENT_ASSOCIATED_TYPE_METHOD,
                    TypeRef::generic(
                        format!("{LOGICAL_EVENT}.ValueChangeEvent.Type"),
                        vec![ty(&value_change)],
                    ),
                ),
            ),
        )
        .add(
            ClassType::interface(LOGICAL_EVENT, "ValueChangeHandler").method(
                Method::void("onValueChange").param(
                    "event",
                    ty(&format!("{LOGICAL_EVENT}.ValueChangeEvent<T>")),
                ),
            ),
        )
        .add(
            ClassType::interface(LOGICAL_EVENT, "HasValueChangeHandlers")
                .method(
                    Method::new(
                        "addValueChangeHandler",
                        ty(global::HANDLER_REGISTRATION_TYPE),
                    )
                    .param("handler", ty(&value_change)),
                ),
        );

    let click = ty(&format!("{EVENT}.HasClickHandlers"));
    let mouse_over = ty(&format!("{EVENT}.HasMouseOverHandlers"));

    // Widgets
    oracle
        .add(
            ClassType::class(UI, "UIObject")
                .with_abstract()
                .method(setter("setStyleName", string()))
                .method(setter("setStylePrimaryName", string()))
                .method(setter("addStyleName", string()))
                .method(setter("addStyleDependentName", string()))
                .method(setter("ensureDebugId", string()))
                .method(setter("setVisible", boolean()))
                .method(setter("setWidth", string()))
                .method(setter("setHeight", string()))
                .method(setter("setTitle", string()))
                .method(
                    Method::void("setPixelSize")
                        .param("width", int())
                        .param("height", int()),
                )
                .method(Method::new("getElement", ty(global::ELEMENT_TYPE))),
        )
        .add(ClassType::class(UI, "Widget").extends(ui("UIObject")))
        .add(
            ClassType::interface(UI, "HasText")
                .method(Method::new("getText", string()))
                .method(setter("setText", string())),
        )
        .add(
            ClassType::interface(UI, "HasHTML")
                .implements(ui("HasText"))
                .method(Method::new("getHTML", string()))
                .method(setter("setHTML", string())),
        )
        .add(
            ClassType::interface(UI, "HasWidgets")
                .method(Method::void("add").param("w", ui("Widget"))),
        )
        .add(ClassType::interface(UI, "HasHorizontalAlignment"))
        .add(ClassType::class(
            UI,
            "HasHorizontalAlignment.HorizontalAlignmentConstant",
        ))
        .add(ClassType::interface(UI, "HasVerticalAlignment"))
        .add(ClassType::class(
            UI,
            "HasVerticalAlignment.VerticalAlignmentConstant",
        ))
        .add(
            ClassType::class(UI, "Label")
                .extends(ui("Widget"))
                .implements(ui("HasText"))
                .implements(click.clone())
                .implements(mouse_over)
                .method(setter("setWordWrap", boolean()))
                .method(setter(
                    "setHorizontalAlignment",
                    ty(global::HORIZONTAL_ALIGNMENT_TYPE),
                )),
        )
        .add(
            ClassType::class(UI, "HTML")
                .extends(ui("Label"))
                .implements(ui("HasHTML")),
        )
        .add(
            ClassType::class(UI, "Button")
                .extends(ui("Widget"))
                .implements(ui("HasHTML"))
                .implements(click)
                .method(setter("setEnabled", boolean())),
        )
        .add(
            ClassType::class(UI, "TextBox")
                .extends(ui("Widget"))
                .implements(ty(&format!(
                    "{LOGICAL_EVENT}.HasValueChangeHandlers<{}>",
                    global::STRING_TYPE
                )))
                .method(Method::new("getValue", string()))
                .method(setter("setMaxLength", int()))
                .method(setter("setVisibleLength", int())),
        )
        .add(
            ClassType::class(UI, "Panel")
                .with_abstract()
                .extends(ui("Widget"))
                .implements(ui("HasWidgets")),
        )
        .add(
            ClassType::class(UI, "ComplexPanel")
                .with_abstract()
                .extends(ui("Panel")),
        )
        .add(ClassType::class(UI, "FlowPanel").extends(ui("ComplexPanel")))
        .add(
            ClassType::class(UI, "HTMLPanel")
                .extends(ui("ComplexPanel"))
                .constructor(Constructor::new().param("html", string()))
                .method(
                    Method::void("addAndReplaceElement")
                        .param("widget", ui("Widget"))
                        .param("id", string()),
                ),
        )
        .add(
            ClassType::class(UI, "CellPanel")
                .with_abstract()
                .extends(ui("ComplexPanel"))
                .method(setter("setSpacing", int()))
                .method(setter("setBorderWidth", int()))
                .method(
                    Method::void("setCellWidth")
                        .param("w", ui("Widget"))
                        .param("width", string()),
                )
                .method(
                    Method::void("setCellHeight")
                        .param("w", ui("Widget"))
                        .param("height", string()),
                )
                .method(
                    Method::void("setCellHorizontalAlignment")
                        .param("w", ui("Widget"))
                        .param("align", ty(global::HORIZONTAL_ALIGNMENT_TYPE)),
                )
                .method(
                    Method::void("setCellVerticalAlignment")
                        .param("w", ui("Widget"))
                        .param("align", ty(global::VERTICAL_ALIGNMENT_TYPE)),
                ),
        )
        .add(
            ClassType::class(UI, "HorizontalPanel")
                .extends(ui("CellPanel"))
                .implements(ui("HasHorizontalAlignment"))
                .method(setter(
                    "setHorizontalAlignment",
                    ty(global::HORIZONTAL_ALIGNMENT_TYPE),
                )),
        )
        .add(ClassType::class(UI, "VerticalPanel").extends(ui("CellPanel")));

    // Resources
    oracle
        .add(ClassType::interface(
            "com.google.gwt.resources.client",
            "ResourcePrototype",
        ))
        .add(ClassType::interface(
            "com.google.gwt.resources.client",
            "ClientBundle",
        ))
        .add(
            ClassType::interface("com.google.gwt.resources.client", "CssResource")
                .method(Method::new("ensureInjected", boolean())),
        )
        .add(ClassType::interface(
            "com.google.gwt.resources.client",
            "ImageResource",
        ))
        .add(ClassType::interface(
            "com.google.gwt.resources.client",
            "DataResource",
        ))
        .add(
            ClassType::interface("com.google.gwt.uibinder.client", "UiBinder")
                .method(
                    Method::new("createAndBindUi", ty("U"))
                        .param("owner", ty("O")),
                ),
        );

    // Application types
    oracle
        .add(ClassType::enumeration("com.example", "Size", &["SMALL", "LARGE"]))
        .add(
            ClassType::class("com.example", "Gauge")
                .extends(ui("Widget"))
                .constructor(
                    Constructor::new()
                        .param("min", int())
                        .param("max", int())
                        .annotate(Annotation::new(
                            global::ANNOTATION_UI_CONSTRUCTOR,
                        )),
                )
                .method(setter("setSize", ty("com.example.Size"))),
        )
        .add(
            ClassType::class("com.example", "NeedsArgs")
                .extends(ui("Widget"))
                .constructor(Constructor::new().param("name", string())),
        )
        .add(
            ClassType::class("com.example", "Ambiguous")
                .extends(ui("Widget"))
                .method(setter("setValue", int()))
                .method(setter("setValue", string())),
        )
        .add(
            ClassType::interface("com.example", "Messages")
                .method(Method::new("greeting", string()))
                .method(Method::new("count", int())),
        )
        .add(
            ClassType::class("com.example", "Constants")
                .field(FieldDecl::constant("TITLE", string()))
                .field(FieldDecl::constant("LIMIT", int())),
        );

    oracle
}

/// Ensures that tests will hit debug assertions.
///
/// If this test fails,
///   then optimization settings are inhibiting debug assertions.
#[test]
#[should_panic]
fn uses_debug_assertions() {
    debug_assert!(false, "should panic");
}
