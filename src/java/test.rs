// Structured Java source representation tests
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

#[test]
fn concat_merges_adjacent_literals() {
    let expr = Expr::concat(vec![
        Expr::str("a"),
        Expr::str(""),
        Expr::str("b"),
        Expr::name("x").call("y", vec![]),
        Expr::concat(vec![Expr::str("c"), Expr::name("z")]),
    ]);

    assert_eq!(r#""ab" + x.y() + "c" + z"#, expr.to_string());
}

#[test]
fn concat_degenerate_cases() {
    assert_eq!(Expr::str(""), Expr::concat(vec![]));
    assert_eq!(Expr::name("x"), Expr::concat(vec![Expr::name("x")]));
}

#[test]
fn string_literals_are_escaped() {
    assert_eq!(
        r#""say \"hi\"\n""#,
        Expr::str("say \"hi\"\n").to_source().unwrap()
    );
}

#[test]
fn casts_and_concatenations_are_parenthesized_as_operands() {
    let cast = Expr::cast("T", Expr::name("x")).call("go", vec![]);
    let concat = Expr::cast(
        "T",
        Expr::Concat(vec![Expr::name("a"), Expr::name("b")]),
    );

    assert_eq!("((T) x).go()", cast.to_source().unwrap());
    assert_eq!("(T) (a + b)", concat.to_source().unwrap());
    assert_eq!(cast.to_string(), cast.to_source().unwrap());
}

#[test]
fn dot_qualifies_names() {
    assert_eq!(
        "a.b.C.D",
        Expr::name("a.b.C").dot("D").to_source().unwrap()
    );
    assert_eq!(
        "a.b().c()",
        Expr::name("a").call("b", vec![]).dot("c").to_source().unwrap()
    );
}

#[test]
fn renders_anonymous_class_in_statement() {
    let stmt = Stmt::final_local(
        "H",
        "h",
        Expr::Anonymous {
            ty: "H".into(),
            methods: vec![MethodDecl::new("void", "on")
                .public()
                .param(Param::new("E", "event"))
                .body(vec![Expr::name("owner")
                    .call("handle", vec![Expr::name("event")])
                    .into()])],
        },
    );

    assert_eq!(
        "final H h = new H() {\n  public void on(E event) {\n    owner.handle(event);\n  }\n};",
        stmt.to_source().unwrap()
    );
}

#[test]
fn renders_compilation_unit() {
    let unit = CompilationUnit {
        package: "com.example".into(),
        imports: vec!["com.google.gwt.core.client.GWT".into()],
        class: ClassDecl::class("W_BinderImpl")
            .modifier("public")
            .implements("com.example.W.Binder")
            .method(
                MethodDecl::new("Widget", "createAndBindUi")
                    .public()
                    .param(Param::final_param("W", "owner"))
                    .body(vec![
                        Stmt::local("Label", "f_Label1", Expr::new_instance("Label", vec![])),
                        Stmt::Return(Expr::name("f_Label1")),
                    ]),
            )
            .nested(
                ClassDecl::interface("Bundle")
                    .extends("ClientBundle")
                    .method(
                        MethodDecl::new("ImageResource", "img")
                            .annotate("@Source(\"a.png\")"),
                    ),
            ),
    };

    assert_eq!(
        "\
package com.example;

import com.google.gwt.core.client.GWT;

public class W_BinderImpl implements com.example.W.Binder {

  public Widget createAndBindUi(final W owner) {
    Label f_Label1 = new Label();
    return f_Label1;
  }

  interface Bundle extends ClientBundle {

    @Source(\"a.png\")
    ImageResource img();
  }
}
",
        unit.to_source().unwrap()
    );

    assert_eq!(1, unit.class.methods().count());
    assert_eq!(1, unit.class.nested_classes().count());
}

#[test]
fn simple_names() {
    assert_eq!("GWT", simple_name("com.google.gwt.core.client.GWT"));
    assert_eq!("int", simple_name("int"));
}

#[test]
fn renders_annotated_parameters() {
    let method = MethodDecl::new("String", "message1")
        .annotate("@DefaultMessage(\"Hi {0}\")")
        .param(Param::new("String", "who").annotate("@Example(\"Ann\")"));

    let decl = ClassDecl::interface("Messages")
        .annotate("@GenerateKeys")
        .method(method);

    assert_eq!(vec!["@GenerateKeys".to_string()], decl.annotations);
    assert_eq!(
        "String message1(@Example(\"Ann\") String who)",
        decl.methods().next().unwrap().signature(),
    );
}
