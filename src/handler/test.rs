// Event handler registration tests
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

use super::*;
use crate::{
    oracle::{Annotation, ClassType, MemoryTypeOracle},
    span::DUMMY_SPAN,
    test::{ty, widget_library, EVENT, LOGICAL_EVENT, SHARED_EVENT, UI},
};
use assert_matches::assert_matches;

fn on(name: &str, event: &str, fields: &[&str]) -> Method {
    let ann = fields
        .iter()
        .fold(Annotation::new(global::ANNOTATION_UI_HANDLER), |ann, f| {
            ann.value(*f)
        });

    Method::void(name).param("e", ty(event)).annotate(ann)
}

fn library_with_owner(handlers: Vec<Method>) -> MemoryTypeOracle {
    let mut oracle = widget_library();

    oracle.add(
        handlers
            .into_iter()
            .fold(ClassType::class("com.example", "Owner"), ClassType::method),
    );

    oracle
}

fn fields() -> FieldManager {
    let mut fields = FieldManager::new();

    for (ty_name, name) in [
        ("Button", "button"),
        ("Label", "label"),
        ("TextBox", "box"),
        ("FlowPanel", "panel"),
    ] {
        fields
            .register_field(ty(&format!("{UI}.{ty_name}")), name, DUMMY_SPAN)
            .unwrap();
    }

    fields
}

fn write(oracle: &MemoryTypeOracle) -> Result<Vec<String>, HandlerError> {
    let cache = TypeCache::new(oracle);
    let owner_ty = cache.find_type("com.example.Owner").unwrap();
    let owner = OwnerClass::new(owner_ty, &cache).unwrap();

    write_handlers(&owner, &fields(), &cache)
        .map(|stmts| stmts.iter().map(Stmt::to_string).collect())
}

#[test]
fn one_handler_registered_with_each_field() {
    let click = format!("{EVENT}.ClickEvent");
    let oracle = library_with_owner(vec![on("onClick", &click, &["button", "label"])]);

    assert_eq!(
        Ok(vec![
            format!(
                "final {EVENT}.ClickHandler {HANDLER_VAR_PREFIX}1 = \
                   new {EVENT}.ClickHandler() {{ \
                   public void onClick({EVENT}.ClickEvent event) {{ \
                   owner.onClick(event); }} }};"
            ),
            format!("button.addClickHandler({HANDLER_VAR_PREFIX}1);"),
            format!("label.addClickHandler({HANDLER_VAR_PREFIX}1);"),
        ]),
        write(&oracle)
    );
}

#[test]
fn handler_type_arguments_taken_from_event() {
    let event = format!("{LOGICAL_EVENT}.ValueChangeEvent<java.lang.String>");
    let oracle = library_with_owner(vec![on("onChange", &event, &["box"])]);

    let stmts = write(&oracle).unwrap();
    let handler = format!("{LOGICAL_EVENT}.ValueChangeHandler<java.lang.String>");

    assert!(
        stmts[0].starts_with(&format!("final {handler} {HANDLER_VAR_PREFIX}1 = new {handler}()")),
        "{}",
        stmts[0]
    );
    assert!(stmts[0].contains(&format!("public void onValueChange({event} event)")));
    assert_eq!(
        format!("box.addValueChangeHandler({HANDLER_VAR_PREFIX}1);"),
        stmts[1]
    );
}

#[test]
fn handlers_numbered_in_declaration_order() {
    let click = format!("{EVENT}.ClickEvent");
    let over = format!("{EVENT}.MouseOverEvent");
    let oracle = library_with_owner(vec![
        on("onClick", &click, &["button"]),
        on("onOver", &over, &["label"]),
    ]);

    let stmts = write(&oracle).unwrap();

    assert_eq!(4, stmts.len());
    assert_eq!(
        format!("label.addMouseOverHandler({HANDLER_VAR_PREFIX}2);"),
        stmts[3]
    );
}

#[test]
fn handler_requires_one_parameter() {
    let oracle = library_with_owner(vec![Method::void("onClick").annotate(
        Annotation::new(global::ANNOTATION_UI_HANDLER).value("button"),
    )]);

    assert_eq!(
        Err(HandlerError::BadParams {
            method: "onClick".into()
        }),
        write(&oracle)
    );
}

#[test]
fn event_must_declare_handler_type() {
    // Any known type will do,
    //   but it has no `getAssociatedType`.
    let oracle = library_with_owner(vec![on("onClick", "java.lang.String", &["button"])]);

    assert_matches!(
        write(&oracle),
        Err(HandlerError::NoAssociatedType { method, .. }) if method == "onClick"
    );
}

#[test]
fn unknown_event_type() {
    let oracle = library_with_owner(vec![on("onClick", "com.example.Nope", &["button"])]);

    assert_matches!(write(&oracle), Err(HandlerError::UnknownEvent { .. }));
}

#[test]
fn handler_names_unknown_field() {
    let click = format!("{EVENT}.ClickEvent");
    let oracle = library_with_owner(vec![on("onClick", &click, &["missing"])]);

    assert_eq!(
        Err(HandlerError::UnknownField {
            method: "onClick".into(),
            field: "missing".into(),
        }),
        write(&oracle)
    );
}

#[test]
fn field_cannot_register_handler() {
    let click = format!("{EVENT}.ClickEvent");
    let oracle = library_with_owner(vec![on("onClick", &click, &["panel"])]);

    assert_eq!(
        Err(HandlerError::NoRegistrationMethod {
            method: "onClick".into(),
            field: "panel".into(),
            ty: format!("{UI}.FlowPanel"),
            register: "addClickHandler".into(),
        }),
        write(&oracle)
    );
}

#[test]
fn handler_method_must_take_event() {
    let click = format!("{EVENT}.ClickEvent");
    let mut oracle = library_with_owner(vec![on("onClick", &click, &["button"])]);

    oracle.add(
        ClassType::interface(EVENT, "ClickHandler").method(
            Method::void("onClick")
                .param("event", ty(&format!("{EVENT}.MouseOverEvent"))),
        ),
    );

    assert_eq!(
        Err(HandlerError::BadHandlerInterface {
            method: "onClick".into(),
            handler: format!("{EVENT}.ClickHandler"),
        }),
        write(&oracle)
    );
}

#[test]
fn registration_must_return_handle() {
    let click = format!("{EVENT}.ClickEvent");
    let mut oracle = library_with_owner(vec![on("onClick", &click, &["button"])]);

    oracle.add(
        ClassType::interface(EVENT, "HasClickHandlers").method(
            Method::void("addClickHandler")
                .param("handler", ty(&format!("{EVENT}.ClickHandler"))),
        ),
    );

    assert_matches!(
        write(&oracle),
        Err(HandlerError::NoRegistrationMethod { field, register, .. })
            if field == "button" && register == "addClickHandler"
    );
}

#[test]
fn registration_accepting_supertype_is_ambiguous() {
    let click = format!("{EVENT}.ClickEvent");
    let mut oracle = library_with_owner(vec![on("onClick", &click, &["button"])]);
    let registration = ty(global::HANDLER_REGISTRATION_TYPE);

    oracle.add(
        ClassType::interface(EVENT, "HasClickHandlers")
            .method(
                Method::new("addClickHandler", registration.clone())
                    .param("handler", ty(&format!("{EVENT}.ClickHandler"))),
            )
            .method(
                Method::new("addClickHandler", registration)
                    .param("handler", ty(&format!("{SHARED_EVENT}.EventHandler"))),
            ),
    );

    assert_eq!(
        Err(HandlerError::AmbiguousRegistration {
            method: "onClick".into(),
            field: "button".into(),
            ty: format!("{UI}.Button"),
            register: "addClickHandler".into(),
        }),
        write(&oracle)
    );
}
