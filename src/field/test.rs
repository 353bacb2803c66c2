// Generated field tests
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
    oracle::{ClassType, Constructor, MemoryTypeOracle, Method, Primitive},
    span::DUMMY_SPAN,
};
use assert_matches::assert_matches;

const S: Span = DUMMY_SPAN;

fn oracle() -> MemoryTypeOracle {
    [
        ClassType::class("p", "Label")
            .method(Method::new("getText", TypeRef::string()))
            .method(Method::new(
                "getWordCount",
                TypeRef::Primitive(Primitive::Int),
            ))
            .method(Method::void("clear")),
        ClassType::class("p", "Panel"),
        ClassType::class("p", "NeedsArgs")
            .constructor(Constructor::new().param("x", TypeRef::string())),
        ClassType::interface("p", "Bundle"),
        ClassType::class("java.lang", "String"),
        ClassType::class("java.lang", "CharSequence"),
    ]
    .into_iter()
    .collect()
}

fn names(stmts: &[Stmt]) -> Vec<&str> {
    stmts
        .iter()
        .map(|stmt| match stmt {
            Stmt::Local { name, .. } => name.as_str(),
            _ => panic!("unexpected statement {stmt}"),
        })
        .collect()
}

fn ty(name: &str) -> TypeRef {
    TypeRef::class(name)
}

#[test]
fn children_registered_while_parsing_are_needed() {
    let oracle = oracle();
    let cache = TypeCache::new(&oracle);
    let mut sut = FieldManager::new();

    sut.register_field(ty("p.Panel"), "outer", S).unwrap();
    sut.push_field("outer").unwrap();
    {
        sut.register_field(ty("p.Panel"), "inner", S).unwrap();
        sut.push_field("inner").unwrap();
        sut.register_field(ty("p.Label"), "label", S).unwrap();
        sut.pop_field();

        assert_eq!(Some("outer"), sut.current_field());
        sut.register_field(ty("p.Label"), "sibling", S).unwrap();
    }
    sut.pop_field();

    let stmts = sut.write_all(&cache).unwrap();

    assert_eq!(vec!["label", "inner", "sibling", "outer"], names(&stmts));
}

#[test]
fn lower_tiers_are_written_first() {
    let oracle = oracle();
    let cache = TypeCache::new(&oracle);
    let mut sut = FieldManager::new();

    sut.register_field(ty("p.Label"), "label", S).unwrap();
    sut.register_dom_id_holder("domId0", Expr::name("id()"), S)
        .unwrap();
    sut.register_imported_field(ty("p.Bundle"), "res", S).unwrap();
    sut.register_field_of_generated_type(ty("p.Bundle"), "bundle", S)
        .unwrap();

    let stmts = sut.write_all(&cache).unwrap();

    assert_eq!(vec!["bundle", "res", "domId0", "label"], names(&stmts));
}

#[test]
fn explicit_needs_override_tier_order() {
    let oracle = oracle();
    let cache = TypeCache::new(&oracle);
    let mut sut = FieldManager::new();

    sut.register_imported_field(ty("p.Bundle"), "res", S).unwrap();
    sut.register_field(ty("p.Label"), "label", S).unwrap();
    sut.needs("res", "label").unwrap();

    let stmts = sut.write_all(&cache).unwrap();

    assert_eq!(vec!["label", "res"], names(&stmts));
    assert_matches!(sut.needs("res", "nope"), Err(FieldError::Unknown(_)));
}

#[test]
fn each_field_written_once() {
    let oracle = oracle();
    let cache = TypeCache::new(&oracle);
    let mut sut = FieldManager::new();

    sut.register_field(ty("p.Label"), "shared", S).unwrap();
    sut.register_field(ty("p.Panel"), "a", S).unwrap();
    sut.register_field(ty("p.Panel"), "b", S).unwrap();
    sut.needs("a", "shared").unwrap();
    sut.needs("b", "shared").unwrap();
    sut.needs("b", "a").unwrap();

    let stmts = sut.write_all(&cache).unwrap();

    assert_eq!(vec!["shared", "a", "b"], names(&stmts));
}

#[test]
fn duplicate_names_fail_regardless_of_kind() {
    let mut sut = FieldManager::new();
    let first = Span::new(1, 1);
    let second = Span::new(5, 1);

    sut.register_field(ty("p.Label"), "x", first).unwrap();

    assert_eq!(
        Err(FieldError::Duplicate {
            name: "x".into(),
            span: second,
            first,
        }),
        sut.register_imported_field(ty("p.Bundle"), "x", second)
    );
    assert_matches!(
        sut.register_dom_id_holder("x", Expr::Null, S),
        Err(FieldError::Duplicate { .. })
    );
    assert_matches!(
        sut.register_field_for_generated_css_resource(ty("G"), "x", vec![], S),
        Err(FieldError::Duplicate { .. })
    );

    assert_eq!(1, sut.len());
}

#[test]
fn cycles_are_reported_by_name() {
    let oracle = oracle();
    let cache = TypeCache::new(&oracle);
    let mut sut = FieldManager::new();

    sut.register_field(ty("p.Panel"), "a", S).unwrap();
    sut.register_field(ty("p.Panel"), "b", S).unwrap();
    sut.register_field(ty("p.Panel"), "c", S).unwrap();
    sut.needs("a", "b").unwrap();
    sut.needs("b", "c").unwrap();
    sut.needs("c", "a").unwrap();

    assert_eq!(
        Err(FieldError::Cycle(vec!["a".into(), "b".into(), "c".into()])),
        sut.write_all(&cache)
    );
}

#[test]
fn self_need_is_a_cycle() {
    let oracle = oracle();
    let cache = TypeCache::new(&oracle);
    let mut sut = FieldManager::new();

    sut.register_field(ty("p.Panel"), "a", S).unwrap();
    sut.needs("a", "a").unwrap();

    assert_eq!(
        Err(FieldError::Cycle(vec!["a".into()])),
        sut.write_all(&cache)
    );
}

#[test]
fn initializer_set_once() {
    let mut sut = FieldManager::new();
    sut.register_field(ty("p.Label"), "x", S).unwrap();

    let init = Expr::new_instance("p.Label", vec![]);

    assert_eq!(Ok(()), sut.set_initializer("x", init.clone()));
    assert_eq!(Ok(()), sut.set_initializer("x", init.clone()));
    assert_matches!(
        sut.set_initializer("x", Expr::Null),
        Err(FieldError::InitializerConflict { .. })
    );
    assert_eq!(Some(&init), sut.lookup("x").unwrap().initializer());
    assert_matches!(
        sut.set_initializer("y", Expr::Null),
        Err(FieldError::Unknown(_))
    );
}

#[test]
fn default_initializer_uses_deferred_binding() {
    let oracle = oracle();
    let cache = TypeCache::new(&oracle);
    let mut sut = FieldManager::new();

    sut.register_field(ty("p.Label"), "label", S).unwrap();
    sut.register_imported_field(ty("p.Bundle"), "res", S).unwrap();

    let stmts = sut.write_all(&cache).unwrap();

    assert_eq!(
        "p.Bundle res = (p.Bundle) GWT.create(p.Bundle.class);",
        stmts[0].to_string()
    );
    assert_eq!(
        "p.Label label = (p.Label) GWT.create(p.Label.class);",
        stmts[1].to_string()
    );
}

#[test]
fn no_initializer_without_default_constructor() {
    let oracle = oracle();
    let cache = TypeCache::new(&oracle);

    for name in ["p.NeedsArgs", "p.Unknown"] {
        let mut sut = FieldManager::new();
        sut.register_field(ty(name), "x", S).unwrap();

        assert_matches!(
            sut.write_all(&cache),
            Err(FieldError::NoInitializer { name, .. }) if name == "x"
        );
    }
}

#[test]
fn field_reference_expression_and_types() {
    let mut sut = FieldManager::new();

    let expr = sut.register_field_reference("a.b.c", TypeRef::string(), S);
    sut.register_field_reference("a.b.c", TypeRef::string(), S);
    sut.register_field_reference("a.b.c", TypeRef::Primitive(Primitive::Int), S);

    assert_eq!("a.b().c()", expr.to_string());
    assert_eq!(1, sut.references().len());
    assert_eq!(2, sut.references()[0].left_types().len());
    assert_eq!("a", sut.references()[0].field_name());
}

#[test]
fn field_reference_validation_aggregates_errors() {
    let oracle = oracle();
    let cache = TypeCache::new(&oracle);
    let mut sut = FieldManager::new();

    sut.register_field(ty("p.Label"), "widgetField", S).unwrap();

    sut.register_field_reference("widgetField.getText", TypeRef::string(), S);
    assert_eq!(Ok(()), sut.validate(&cache));

    let int = TypeRef::Primitive(Primitive::Int);
    sut.register_field_reference("widgetField.getText", int.clone(), S);
    sut.register_field_reference("widgetField.getWordCount", int.clone(), S);
    sut.register_field_reference("widgetField.clear", TypeRef::string(), S);
    sut.register_field_reference("nope.getText", TypeRef::string(), S);

    let errors = sut.validate(&cache).unwrap_err();
    let kinds: Vec<_> = errors.into_iter().map(|e| e.kind).collect();

    assert_eq!(
        vec![
            FieldReferenceErrorKind::Mismatch {
                left: int,
                right: TypeRef::string(),
            },
            FieldReferenceErrorKind::NoSuchMethod {
                ty: "p.Label".into(),
                method: "clear".into(),
            },
            FieldReferenceErrorKind::NoSuchField("nope".into()),
        ],
        kinds
    );
}

#[test]
fn generated_css_methods_resolve_to_string() {
    let oracle = oracle();
    let cache = TypeCache::new(&oracle);
    let mut sut = FieldManager::new();

    sut.register_field_for_generated_css_resource(
        ty("Impl.GenCss_style"),
        "style",
        vec!["big".to_string()],
        S,
    )
    .unwrap();

    sut.register_field_reference("style.big", TypeRef::string(), S);
    assert_eq!(Ok(()), sut.validate(&cache));

    sut.register_field_reference("style.small", TypeRef::string(), S);
    assert_matches!(
        sut.validate(&cache).unwrap_err()[..],
        [FieldReferenceError {
            kind: FieldReferenceErrorKind::NoSuchMethod { .. },
            ..
        }]
    );
}

#[test]
fn referenced_fields_are_needed_by_the_field_being_parsed() {
    let oracle = oracle();
    let cache = TypeCache::new(&oracle);
    let mut sut = FieldManager::new();

    sut.register_field(ty("p.Panel"), "panel", S).unwrap();
    sut.push_field("panel").unwrap();
    sut.register_field_reference("res.getText", TypeRef::string(), S);
    sut.register_field_reference("panel.getText", TypeRef::string(), S);
    sut.pop_field();

    // Registered last and so would otherwise be written last.
    sut.register_field(ty("p.Label"), "res", S).unwrap();

    let stmts = sut.write_all(&cache).unwrap();

    assert_eq!(vec!["res", "panel"], names(&stmts));
}

#[test]
fn assignability_rules() {
    use Assignability::*;

    let oracle: MemoryTypeOracle = [
        ClassType::class("java.lang", "Object"),
        ClassType::interface("p", "Shape"),
        ClassType::class("p", "Circle").implements(ty("p.Shape")),
    ]
    .into_iter()
    .collect();
    let cache = TypeCache::new(&oracle);

    let prim = |p| TypeRef::Primitive(p);
    let check = |l: TypeRef, r: TypeRef| assignability(&l, &r, &cache);

    assert_eq!(Identical, check(ty("p.Shape"), ty("p.Shape")));
    assert_eq!(Identical, check(prim(Primitive::Int), prim(Primitive::Int)));
    assert_eq!(Numeric, check(prim(Primitive::Double), prim(Primitive::Int)));
    assert_eq!(Numeric, check(prim(Primitive::Int), prim(Primitive::Double)));
    assert_eq!(Numeric, check(ty("java.lang.Integer"), prim(Primitive::Long)));
    assert_eq!(
        Boxed,
        check(prim(Primitive::Boolean), ty("java.lang.Boolean"))
    );
    assert_eq!(Boxed, check(prim(Primitive::Int), ty("java.lang.Integer")));
    assert_eq!(
        Mismatch,
        check(prim(Primitive::Boolean), prim(Primitive::Int))
    );
    assert_eq!(Mismatch, check(prim(Primitive::Int), ty("java.lang.Long")));
    assert_eq!(Assignable, check(ty("p.Shape"), ty("p.Circle")));
    assert_eq!(Mismatch, check(ty("p.Circle"), ty("p.Shape")));
    assert_eq!(Permitted, check(ty("p.Shape"), ty("q.Unknown")));
    assert_eq!(
        Permitted,
        check(ty("p.Shape"), TypeRef::Array(Box::new(ty("p.Circle"))))
    );
}
