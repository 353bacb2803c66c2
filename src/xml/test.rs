// Template document model tests
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
use crate::span::Span;
use assert_matches::assert_matches;

const UI: &str = "urn:ui:com.google.gwt.uibinder";

fn parse(src: &str) -> XmlElement {
    XmlElement::new(parse_document(src).expect("parse failed"))
}

/// Does not substitute anything.
struct Passthrough;

impl Interpreter<String> for Passthrough {
    type Error = XmlError;

    fn interpret_element(
        &mut self,
        _elem: &mut XmlElement,
    ) -> Result<Option<String>> {
        Ok(None)
    }
}

/// Substitutes every `<ui:msg>` with its text in brackets and records
///   the order of traversal events.
#[derive(Default)]
struct Recorder {
    events: Vec<String>,
}

impl Interpreter<String> for Recorder {
    type Error = XmlError;

    fn interpret_element(
        &mut self,
        elem: &mut XmlElement,
    ) -> Result<Option<String>> {
        if elem.namespace_uri() != Some(UI) {
            return Ok(None);
        }

        let text = elem.consume_unescaped_inner_text()?;
        Ok(Some(format!("[{text}]")))
    }

    fn enter_element(&mut self, elem: &XmlElement) -> Result<()> {
        self.events.push(format!("enter {}", elem.local_name()));
        Ok(())
    }

    fn leave_element(&mut self, elem: &XmlElement) -> Result<()> {
        self.events.push(format!("leave {}", elem.local_name()));
        Ok(())
    }

    fn visit_text(&mut self, text: &str) -> Result<()> {
        self.events.push(format!("text {:?}", text));
        Ok(())
    }
}

#[test]
fn resolves_element_and_attribute_namespaces() {
    let elem = parse(
        r#"<ui:UiBinder xmlns:ui="urn:ui:com.google.gwt.uibinder"
                        xmlns:g="urn:import:com.example" ui:field="x" a="b">
             <g:Label/>
           </ui:UiBinder>"#,
    );

    assert_eq!("UiBinder", elem.local_name());
    assert_eq!(Some("ui"), elem.prefix());
    assert_eq!(Some(UI), elem.namespace_uri());
    assert_eq!(Some(Some("g")), elem.lookup_prefix("urn:import:com.example"));
    assert_eq!(None, elem.lookup_prefix("urn:import:nowhere"));
    assert_eq!(Some(UI), elem.lookup_namespace(Some("ui")));

    // xmlns declarations are not attributes.
    assert_eq!(2, elem.attribute_count());
    assert_eq!(Some(UI), elem.attributes()[0].ns.as_deref());
    assert_eq!(None, elem.attributes()[1].ns);
}

#[test]
fn default_namespace_applies_to_elements_only() {
    let elem = parse(r#"<div xmlns="urn:x" class="a"><span/></div>"#);

    assert_eq!(Some("urn:x"), elem.namespace_uri());
    assert_eq!(Some(None), elem.lookup_prefix("urn:x"));
    assert_eq!(None, elem.attributes()[0].ns);
}

#[test]
fn unbound_prefix_fails() {
    assert_matches!(
        parse_document("<g:Label/>"),
        Err(XmlError::UnboundPrefix(prefix, _)) if prefix == "g"
    );
}

#[test]
fn document_structure_errors() {
    assert_matches!(parse_document(""), Err(XmlError::NoRootElement));
    assert_matches!(
        parse_document("<a/><b/>"),
        Err(XmlError::ContentOutsideRoot(_))
    );
    assert_matches!(
        parse_document("<a/>text"),
        Err(XmlError::ContentOutsideRoot(_))
    );
    assert_matches!(
        parse_document("<a><b>"),
        Err(XmlError::Unclosed(..)) | Err(XmlError::Syntax(..))
    );
    assert_matches!(parse_document("<a></b>"), Err(XmlError::Syntax(..)));
}

#[test]
fn element_span_covers_opening_tag() {
    let src = r#"<a><b x="1">y</b></a>"#;
    let mut elem = parse(src);
    let b = elem.consume_single_child_element().unwrap();

    assert_eq!(Some(r#"<b x="1">"#), b.span().slice(src));
    assert_eq!(Some(r#"x="1""#), b.attribute_span("x").slice(src));
}

#[test]
fn resolves_html_entities() {
    let mut elem = parse("<a title='&copy;'>x&nbsp;&amp;y</a>");

    assert_eq!("\u{a9}", elem.consume_raw_attribute("title"));
    assert_eq!(
        "x\u{a0}&y",
        elem.consume_unescaped_inner_text().unwrap()
    );
}

#[test]
fn consume_raw_attribute_exactly_once() {
    let mut elem = parse(r#"<a name="  value  " other="x"/>"#);

    assert!(elem.has_attribute("name"));
    assert_eq!("value", elem.consume_raw_attribute("name"));

    assert!(!elem.has_attribute("name"));
    assert_eq!("", elem.consume_raw_attribute("name"));
    assert_eq!("dflt", elem.consume_raw_attribute_or("name", "dflt"));
    assert_eq!(None, elem.consume_optional_raw_attribute("name"));

    assert_eq!(1, elem.attribute_count());
}

#[test]
fn consume_required_raw_attribute_missing() {
    let mut elem = parse(r#"<ui:with xmlns:ui="urn:x" field="a"/>"#);

    assert_eq!(Ok("a".into()), elem.consume_required_raw_attribute("field"));
    assert_matches!(
        elem.consume_required_raw_attribute("type"),
        Err(XmlError::MissingAttribute { attr, .. }) if attr == "type"
    );
}

#[test]
fn consume_ns_attribute_ignores_prefix() {
    let mut elem = parse(
        r#"<div xmlns:u="urn:ui:com.google.gwt.uibinder" u:field="f"/>"#,
    );

    assert_eq!(None, elem.consume_ns_attribute(UI, "other"));
    assert_eq!(
        Some("f"),
        elem.consume_ns_attribute(UI, "field")
            .as_ref()
            .map(|attr| attr.value.as_str())
    );
    assert_eq!(0, elem.attribute_count());
}

#[test]
fn consume_boolean_constant_attribute() {
    let mut elem = parse(r#"<a t="true" f=" false " bad="yes"/>"#);

    assert_eq!(Ok(Some(true)), elem.consume_boolean_constant_attribute("t"));
    assert_eq!(Ok(Some(false)), elem.consume_boolean_constant_attribute("f"));
    assert_eq!(Ok(None), elem.consume_boolean_constant_attribute("t"));
    assert_matches!(
        elem.consume_boolean_constant_attribute("bad"),
        Err(XmlError::BadBooleanAttribute { value, .. }) if value == "yes"
    );
}

#[test]
fn consume_raw_array_attribute_splits() {
    let mut elem = parse(r#"<a names="one, two  three,,four"/>"#);

    assert_eq!(
        vec!["one", "two", "three", "four"],
        elem.consume_raw_array_attribute("names")
    );
}

#[test]
fn consume_child_elements_in_order_leaving_others() {
    let mut elem = parse("<p>t1<a n='1'/><b/>t2<a n='2'/><c/></p>");

    let found = elem.consume_child_elements(|c| c.local_name() == "a");
    let ns: Vec<_> = found
        .into_iter()
        .map(|mut a| a.consume_raw_attribute("n"))
        .collect();

    assert_eq!(vec!["1", "2"], ns);

    // Matched children are no longer visible.
    assert!(elem.consume_child_elements(|c| c.local_name() == "a").is_empty());

    // Unmatched children and text remain, in order.
    assert_eq!(
        "t1<b></b>t2<c></c>",
        elem.consume_inner_html(&mut Passthrough).unwrap()
    );
}

#[test]
fn consume_single_child_element_requires_exactly_one() {
    let mut one = parse("<a>\n  <b/>\n</a>");
    assert_eq!("b", one.consume_single_child_element().unwrap().local_name());

    let mut none = parse("<a> </a>");
    assert_matches!(
        none.consume_single_child_element(),
        Err(XmlError::SingleChildExpected { found: 0, .. })
    );

    let mut two = parse("<a><b/><c/></a>");
    assert_matches!(
        two.consume_single_child_element(),
        Err(XmlError::SingleChildExpected { found: 2, .. })
    );

    let mut text = parse("<a>hello <b/></a>");
    assert_matches!(
        text.consume_single_child_element(),
        Err(XmlError::UnexpectedText { .. })
    );
}

#[test]
fn consume_inner_html_escapes_and_renders() {
    let mut elem =
        parse("<div>a &lt; b <br/><img src=\"x'y\"/><i class='c'>  i  </i></div>");

    assert_eq!(
        "a &lt; b <br><img src='x&#39;y'><i class='c'> i </i>",
        elem.consume_inner_html(&mut Passthrough).unwrap()
    );

    // Everything was consumed.
    assert!(!elem.has_content());
}

#[test]
fn consume_inner_html_preserving_whitespace() {
    let mut elem = parse("<div>a\n  <b>x  y</b></div>").preserving_whitespace(true);

    assert_eq!(
        "a\n  <b>x  y</b>",
        elem.consume_inner_html(&mut Passthrough).unwrap()
    );
}

#[test]
fn consume_inner_html_substitutes_and_notifies() {
    let mut elem = parse(
        r#"<div xmlns:ui="urn:ui:com.google.gwt.uibinder">a<b>c</b><ui:msg>m</ui:msg></div>"#,
    );
    let mut recorder = Recorder::default();

    assert_eq!(
        "a<b>c</b>[m]",
        elem.consume_inner_html(&mut recorder).unwrap()
    );

    assert_eq!(
        vec![
            r#"text "a""#,
            "enter b",
            r#"text "c""#,
            "leave b",
            "enter msg",
            "leave msg",
        ],
        recorder.events
    );
}

#[test]
fn consume_inner_text_collapses_and_substitutes() {
    let mut elem = parse(
        r#"<g:Label xmlns:g="urn:import:x" xmlns:ui="urn:ui:com.google.gwt.uibinder">
             Hello,
               <ui:msg>world</ui:msg>!
           </g:Label>"#,
    );

    assert_eq!(
        "Hello, [world]!",
        elem.consume_inner_text(&mut Recorder::default()).unwrap()
    );
}

#[test]
fn consume_inner_text_rejects_unhandled_elements() {
    let mut elem = parse("<a>x <b/> y</a>");

    assert_matches!(
        elem.consume_inner_text(&mut Passthrough),
        Err(XmlError::IllegalChild { child, .. }) if child.local == "b"
    );
}

#[test]
fn set_attribute_replaces_or_appends() {
    let mut elem = parse("<a x='1'/>");

    elem.set_attribute("x", "2".into());
    elem.set_attribute("id", "3".into());

    assert_eq!("<a x='2' id='3'>", elem.opening_tag());
}

#[test]
fn unknown_span_for_missing_attribute_is_tag() {
    let src = "<a/>";
    let elem = parse(src);

    assert_eq!(Span::new(0, 4), elem.attribute_span("nope"));
}
