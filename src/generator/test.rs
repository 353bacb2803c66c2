// Binder implementation generator tests
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
    bundle::BUNDLE_FIELD,
    messages::MESSAGES_FIELD,
    oracle::{Annotation, FieldDecl, MemoryTypeOracle, Method, TypeRef},
    resource::{MemoryResourceOracle, ResourceError},
    test::{widget_library, DOM, EVENT, UI},
};
use assert_matches::assert_matches;

const BINDER: &str = "com.example.Owner.Binder";
const TEMPLATE: &str = "com/example/Owner.ui.xml";

fn owner() -> ClassType {
    ClassType::class("com.example", "Owner")
}

fn ui_field(name: &str, ty: &str) -> FieldDecl {
    FieldDecl::new(name, TypeRef::class(ty))
        .annotate(Annotation::new(global::ANNOTATION_UI_FIELD))
}

fn binder(root: &str) -> ClassType {
    ClassType::interface("com.example", "Owner.Binder").implements(
        TypeRef::generic(
            global::UI_BINDER_TYPE,
            vec![TypeRef::class(root), TypeRef::class("com.example.Owner")],
        ),
    )
}

/// The widget library with `owner` and a binder producing widgets.
fn types(owner: ClassType) -> MemoryTypeOracle {
    let mut oracle = widget_library();
    oracle.add(owner).add(binder(global::WIDGET_TYPE));
    oracle
}

fn template(body: &str) -> String {
    format!(
        "<ui:UiBinder xmlns:ui='{}' xmlns:g='urn:import:{UI}'>\n\
           {body}\n\
         </ui:UiBinder>",
        global::BINDER_URI,
    )
}

fn generate_at(
    types: &MemoryTypeOracle,
    path: &str,
    src: &str,
) -> Result<GeneratedUnit, GenerateError> {
    let _ = env_logger::builder().is_test(true).try_init();

    let mut resources = MemoryResourceOracle::new();
    resources.add(path, src);

    UiBinderGenerator::new(types, &resources, Options::default())
        .generate(BINDER)
}

fn generate(
    types: &MemoryTypeOracle,
    body: &str,
) -> Result<GeneratedUnit, GenerateError> {
    generate_at(types, TEMPLATE, &template(body))
}

/// Assert that each of `lines` appears in `src` in the given order.
fn assert_in_order(src: &str, lines: &[&str]) {
    let mut rest = src;

    for line in lines {
        match rest.find(line) {
            Some(at) => rest = &rest[at + line.len()..],
            None => panic!("expected `{line}` in order within:\n{src}"),
        }
    }
}

#[test]
fn widget_bound_to_owner_field() {
    let types = types(owner().field(ui_field("label", &format!("{UI}.Label"))));
    let unit = generate(&types, r#"<g:Label ui:field="label">Hello</g:Label>"#)
        .unwrap();

    assert_eq!("com.example", unit.package);
    assert_eq!("Owner_BinderImpl", unit.class_name);
    assert_eq!("com.example.Owner_BinderImpl", unit.qualified_name());
    assert!(unit.warnings.is_empty());
    assert!(unit.resources.is_empty());

    assert_in_order(
        &unit.source,
        &[
            "package com.example;",
            "import com.google.gwt.core.client.GWT;",
            "public class Owner_BinderImpl implements com.example.Owner.Binder {",
            &format!(
                "public {UI}.Widget createAndBindUi(final com.example.Owner owner) {{"
            ),
            &format!(
                "{UI}.Label label = ({UI}.Label) GWT.create({UI}.Label.class);"
            ),
            "label.setText(\"Hello\");",
            "owner.label = label;",
            "return label;",
        ],
    );
}

#[test]
fn provided_field_taken_from_owner() {
    let provided = FieldDecl::new("label", TypeRef::class(format!("{UI}.Label")))
        .annotate(
            Annotation::new(global::ANNOTATION_UI_FIELD).element("provided", "true"),
        );

    let types = types(owner().field(provided));
    let unit = generate(&types, r#"<g:Label ui:field="label"/>"#).unwrap();

    assert!(unit
        .source
        .contains(&format!("{UI}.Label label = owner.label;")));
    assert!(!unit.source.contains("owner.label = label;"));
}

#[test]
fn deprecated_id_names_field_with_warning() {
    let types = types(owner().field(ui_field("label", &format!("{UI}.Label"))));
    let unit = generate(&types, r#"<g:Label id="label"/>"#).unwrap();

    assert!(unit.source.contains("owner.label = label;"));
    assert_eq!(1, unit.warnings.len());
    assert!(unit.warnings[0].contains("deprecated"), "{}", unit.warnings[0]);
}

#[test]
fn constructor_arguments_and_properties_from_attributes() {
    let types = types(owner());
    let unit = generate(
        &types,
        r#"<g:FlowPanel>
             <e:Gauge xmlns:e="urn:import:com.example"
                      min="1" max="10" size="LARGE" visible="false"/>
           </g:FlowPanel>"#,
    )
    .unwrap();

    assert_in_order(
        &unit.source,
        &[
            "com.example.Gauge f_Gauge2 = new com.example.Gauge(1, 10);",
            &format!("{UI}.FlowPanel f_FlowPanel1 = "),
            "f_Gauge2.set",
            "f_FlowPanel1.add(f_Gauge2);",
            "return f_FlowPanel1;",
        ],
    );

    assert!(unit
        .source
        .contains("f_Gauge2.setSize(com.example.Size.LARGE);"));
    assert!(unit.source.contains("f_Gauge2.setVisible(false);"));
}

#[test]
fn html_panel_replaces_placeholders_with_widgets() {
    let types = types(owner());
    let unit = generate(
        &types,
        r#"<g:HTMLPanel>
             <p>Hi <g:Button ui:field="button">Go</g:Button></p>
           </g:HTMLPanel>"#,
    )
    .unwrap();

    assert_in_order(
        &unit.source,
        &[
            "java.lang.String domId0 = Document.get().createUniqueId();",
            &format!("{UI}.Button button = "),
            &format!("{UI}.HTMLPanel f_HTMLPanel1 = new {UI}.HTMLPanel("),
            "<p>Hi <span id='\" + domId0 + \"'></span></p>",
            "button.setHTML(\"Go\");",
            "f_HTMLPanel1.addAndReplaceElement(button, domId0);",
            "return f_HTMLPanel1;",
        ],
    );
}

#[test]
fn dom_root_elements_located_by_path() {
    let mut types = widget_library();
    types
        .add(owner().field(ui_field("name", &format!("{DOM}.SpanElement"))))
        .add(binder(global::ELEMENT_TYPE));

    let unit = generate(
        &types,
        r#"<div class="box"><span ui:field="name">x</span></div>"#,
    )
    .unwrap();

    assert_in_order(
        &unit.source,
        &[
            &format!("{DOM}.SpanElement name = null;"),
            &format!(
                "{DOM}.DivElement f_div1 = UiBinderUtil.fromHtml(\
                   \"<div class='box'><span>x</span></div>\").cast();"
            ),
            "name = UiBinderUtil.getNonTextChild(f_div1, 0).cast();",
            "owner.name = name;",
            "return f_div1;",
        ],
    );
}

#[test]
fn inline_style_bundled_and_referenced() {
    let types = types(owner().field(ui_field("label", &format!("{UI}.Label"))));
    let unit = generate(
        &types,
        r#"<ui:style>.big { color: red; }</ui:style>
           <g:Label ui:field="label" styleName="{style.big}">Hi</g:Label>"#,
    )
    .unwrap();

    assert_in_order(
        &unit.source,
        &[
            &format!("UiBinderBundle {BUNDLE_FIELD} = "),
            &format!("GenCss_style style = {BUNDLE_FIELD}.style();"),
            &format!("{UI}.Label label = "),
            "label.setStyleName(style.big());",
            "style.ensureInjected();",
            "owner.label = label;",
            "static interface UiBinderBundle extends \
               com.google.gwt.resources.client.ClientBundle",
        ],
    );

    assert_eq!(
        vec![GeneratedResource {
            path: "Owner_BinderImpl_style.css".into(),
            contents: ".big { color: red; }".into(),
        }],
        unit.resources
    );
}

#[test]
fn html_message_with_placeholder() {
    let types = types(owner());
    let unit = generate(
        &types,
        r#"<g:HTMLPanel>
             <p><ui:msg description="Greeting">Hello <ui:ph name="who" example="Ann"><b>friend</b></ui:ph>, it's here</ui:msg></p>
           </g:HTMLPanel>"#,
    )
    .unwrap();

    assert_in_order(
        &unit.source,
        &[
            &format!(
                "UiBinderImplGenMessages {MESSAGES_FIELD} = \
                   (UiBinderImplGenMessages) GWT.create("
            ),
            &format!("{UI}.HTMLPanel f_HTMLPanel1 = new {UI}.HTMLPanel("),
            &format!(
                "<p>\" + {MESSAGES_FIELD}.message1(\"<b>friend</b>\") + \"</p>"
            ),
            "static interface UiBinderImplGenMessages extends \
               com.google.gwt.i18n.client.Messages {",
            "@com.google.gwt.i18n.client.Messages.DefaultMessage(\
               \"Hello {0}, it''s here\")",
            "@com.google.gwt.i18n.client.LocalizableResource.Description(\
               \"Greeting\")",
            "java.lang.String message1(\
               @com.google.gwt.i18n.client.Messages.Example(\"Ann\") \
               java.lang.String who);",
        ],
    );
}

#[test]
fn text_and_attribute_messages() {
    let types = types(owner());
    let src = format!(
        "<ui:UiBinder xmlns:ui='{}' xmlns:g='urn:import:{UI}' \
           ui:generateKeys='com.example.Keys'>\n\
           <g:Label title='Send it'>\
             <ui:attribute name='title' description='Tooltip'/>\
             <ui:msg>Hello {{world}}</ui:msg>\
           </g:Label>\n\
         </ui:UiBinder>",
        global::BINDER_URI,
    );

    let unit = generate_at(&types, TEMPLATE, &src).unwrap();
    let source = &unit.source;

    for expected in [
        format!("f_Label1.setTitle(\"\" + {MESSAGES_FIELD}.message1() + \"\");"),
        format!("f_Label1.setText(\"\" + {MESSAGES_FIELD}.message2() + \"\");"),
    ] {
        assert!(source.contains(&expected), "{expected} in:\n{source}");
    }

    assert_in_order(
        source,
        &[
            "@com.google.gwt.i18n.client.LocalizableResource.GenerateKeys(\
               \"com.example.Keys\")",
            "static interface UiBinderImplGenMessages",
            "DefaultMessage(\"Send it\")",
            "Description(\"Tooltip\")",
            "java.lang.String message1();",
            "DefaultMessage(\"Hello '{'world'}'\")",
            "java.lang.String message2();",
        ],
    );
}

#[test]
fn translated_attribute_must_exist() {
    let types = types(owner());
    let err = generate(&types, r#"<g:Label><ui:attribute name="title"/></g:Label>"#)
        .unwrap_err();

    assert_matches!(
        err.error,
        UiBinderError::MissingMessageAttribute { ref attr, .. } if attr == "title"
    );
}

#[test]
fn placeholder_only_within_message() {
    let types = types(owner());
    let err = generate(&types, r#"<g:HTML><ui:ph name="x">y</ui:ph></g:HTML>"#)
        .unwrap_err();

    assert_matches!(err.error, UiBinderError::UnexpectedBinderElement { .. });
}

#[test]
fn with_resource_constructed_and_referenced() {
    let types = types(owner());
    let unit = generate(
        &types,
        r#"<ui:with field="msgs" type="com.example.Messages"/>
           <g:Label text="{msgs.greeting}"/>"#,
    )
    .unwrap();

    assert_in_order(
        &unit.source,
        &[
            "com.example.Messages msgs = (com.example.Messages) \
               GWT.create(com.example.Messages.class);",
            "f_Label1.setText(msgs.greeting());",
        ],
    );
}

#[test]
fn imported_constants_become_fields() {
    let types = types(owner());
    let unit = generate(
        &types,
        r#"<ui:import field="com.example.Constants.TITLE"/>
           <g:Label text="{TITLE}"/>"#,
    )
    .unwrap();

    assert_in_order(
        &unit.source,
        &[
            "java.lang.String TITLE = com.example.Constants.TITLE;",
            "f_Label1.setText(TITLE);",
        ],
    );
}

#[test]
fn handlers_registered_after_initialization() {
    let on_click = Method::void("onClick")
        .param("e", TypeRef::class(format!("{EVENT}.ClickEvent")))
        .annotate(Annotation::new(global::ANNOTATION_UI_HANDLER).value("button"));

    let types = types(
        owner()
            .field(ui_field("button", &format!("{UI}.Button")))
            .method(on_click),
    );

    let unit =
        generate(&types, r#"<g:Button ui:field="button">Go</g:Button>"#).unwrap();

    assert_in_order(
        &unit.source,
        &[
            "button.setHTML(\"Go\");",
            "owner.onClick(event);",
            "button.addClickHandler(\
               handlerMethodWithNameVeryUnlikelyToCollideWithUserFieldNames1);",
            "owner.button = button;",
            "return button;",
        ],
    );
}

#[test]
fn template_named_by_annotation() {
    let mut types = widget_library();
    types.add(owner()).add(binder(global::WIDGET_TYPE).annotate(
        Annotation::new(global::ANNOTATION_UI_TEMPLATE).value("Custom.ui.xml"),
    ));

    let unit = generate_at(
        &types,
        "com/example/Custom.ui.xml",
        &template("<g:Label/>"),
    )
    .unwrap();

    assert!(unit.source.contains("return f_Label1;"));
}

#[test]
fn missing_template() {
    let types = types(owner());
    let err = generate_at(&types, "com/example/Other.ui.xml", "").unwrap_err();

    assert_eq!(Some(TEMPLATE.to_string()), err.template);
    assert_matches!(
        err.error,
        UiBinderError::Resource(ResourceError::NotFound(ref path)) if path == TEMPLATE
    );
}

#[test]
fn unknown_binder() {
    let types = types(owner());

    let mut resources = MemoryResourceOracle::new();
    resources.add(TEMPLATE, template("<g:Label/>"));

    let err = UiBinderGenerator::new(&types, &resources, Options::default())
        .generate("com.example.Nope")
        .unwrap_err();

    assert_eq!(None, err.template);
    assert_matches!(err.error, UiBinderError::UnknownType { ref name, .. } if name == "com.example.Nope");
}

#[test]
fn bad_root_reported_against_template() {
    let types = types(owner());
    let err = generate_at(&types, TEMPLATE, "<div/>").unwrap_err();

    assert_matches!(err.error, UiBinderError::BadRoot { .. });
    assert!(
        err.report().starts_with("error: root element must be <ui:UiBinder>"),
        "{}",
        err.report()
    );
    assert!(
        err.report().contains(&format!("--> {TEMPLATE}:1:")),
        "{}",
        err.report()
    );
    assert!(err.to_string().starts_with(TEMPLATE));
}

#[test]
fn owner_field_missing_from_template() {
    let types = types(owner().field(ui_field("missing", &format!("{UI}.Label"))));
    let err = generate(&types, "<g:Label/>").unwrap_err();

    assert_matches!(
        err.error,
        UiBinderError::MissingTemplateField { ref field, .. } if field == "missing"
    );
}

#[test]
fn unknown_property() {
    let types = types(owner());
    let err = generate(&types, r#"<g:Label bogus="1"/>"#).unwrap_err();

    assert_matches!(
        err.error,
        UiBinderError::NoSetter { ref property, .. } if property == "Bogus"
    );
}

#[test]
fn every_reference_mismatch_reported() {
    let types = types(owner());
    let err = generate(
        &types,
        r#"<ui:with field="msgs" type="com.example.Messages"/>
           <g:TextBox visible="{msgs.greeting}" visibleLength="{msgs.greeting}"/>"#,
    )
    .unwrap_err();

    assert_matches!(err.error, UiBinderError::FieldReferences(ref errs) if errs.len() == 2);
}
