// Implicit client bundle
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

//! Implicit client bundle.
//!
//! Resources declared within a template with `<ui:style>`, `<ui:image>`,
//!   and `<ui:data>` are served by a client bundle that is generated along
//!   with the binder:
//!     a nested interface extending `ClientBundle` with one accessor per
//!     resource,
//!     instantiated once by deferred binding.
//!
//! A `<ui:style>` additionally produces a nested interface extending its
//!   declared CSS resource type,
//!     with one accessor per class selector found in the stylesheet so that
//!     `{style.className}` references can be checked.
//! Inline stylesheets are emitted as resources of the generated unit.

use crate::{
    global,
    java::{ClassDecl, MethodDecl},
    oracle::TypeRef,
    xml::escape::escape_java_string,
};

/// Name of the generated bundle interface,
///   nested within the generated binder.
pub const BUNDLE_TYPE: &str = "UiBinderBundle";

/// Name of the generated field holding the bundle instance.
pub const BUNDLE_FIELD: &str =
    "clientBundleFieldNameUnlikelyToCollideWithUserSpecifiedFieldOkay";

const SOURCE_ANNOTATION: &str =
    "com.google.gwt.resources.client.ClientBundle.Source";
const CLASS_NAME_ANNOTATION: &str =
    "com.google.gwt.resources.client.CssResource.ClassName";

/// Where a stylesheet comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StyleSource {
    /// Path relative to the package of the binder.
    File(String),

    /// Body of the `<ui:style>` element.
    Inline(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum ResourceKind {
    Css { css_type: String },
    Image,
    Data,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Resource {
    name: String,
    kind: ResourceKind,
    source: Option<String>,
}

/// A generated CSS resource interface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CssInterface {
    pub name: String,
    pub extends: TypeRef,
    /// Class selectors of the stylesheet in order of appearance,
    ///   paired with the accessor method producing each.
    pub classes: Vec<(String, String)>,
}

impl CssInterface {
    /// Accessor method names.
    pub fn methods(&self) -> impl Iterator<Item = &str> {
        self.classes.iter().map(|(_, method)| method.as_str())
    }

    fn decl(&self) -> ClassDecl {
        self.classes.iter().fold(
            ClassDecl::interface(&self.name).extends(self.extends.to_string()),
            |decl, (class, method)| {
                let mut accessor =
                    MethodDecl::new(global::STRING_TYPE, method);

                if class != method {
                    accessor = accessor.annotate(format!(
                        "@{CLASS_NAME_ANNOTATION}(\"{}\")",
                        escape_java_string(class)
                    ));
                }

                decl.method(accessor)
            },
        )
    }
}

/// A file to be emitted alongside the generated source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedResource {
    /// Path relative to the package of the generated unit.
    pub path: String,
    pub contents: String,
}

/// Resources declared by a template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImplicitBundle {
    impl_name: String,
    resources: Vec<Resource>,
    css: Vec<CssInterface>,
    generated: Vec<GeneratedResource>,
}

impl ImplicitBundle {
    /// Bundle for the binder implementation `impl_name`,
    ///   which is used to name generated stylesheets.
    pub fn new<S: Into<String>>(impl_name: S) -> Self {
        Self {
            impl_name: impl_name.into(),
            resources: vec![],
            css: vec![],
            generated: vec![],
        }
    }

    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }

    /// Declare a stylesheet accessed as `name`.
    ///
    /// `css` is the text of the stylesheet,
    ///   from which class selectors are extracted.
    /// Returns the generated CSS interface.
    pub fn add_style(
        &mut self,
        name: &str,
        public_type: TypeRef,
        source: StyleSource,
        css: &str,
    ) -> &CssInterface {
        let css_type = format!("GenCss_{name}");

        let source = match source {
            StyleSource::File(path) => path,
            StyleSource::Inline(body) => {
                let path = format!("{}_{name}.css", self.impl_name);

                self.generated.push(GeneratedResource {
                    path: path.clone(),
                    contents: body,
                });

                path
            }
        };

        self.resources.push(Resource {
            name: name.to_string(),
            kind: ResourceKind::Css {
                css_type: css_type.clone(),
            },
            source: Some(source),
        });

        let classes = css_class_names(css)
            .into_iter()
            .map(|class| {
                let method = class_accessor_name(&class);
                (class, method)
            })
            .collect();

        self.css.push(CssInterface {
            name: css_type,
            extends: public_type,
            classes,
        });

        // Just pushed.
        &self.css[self.css.len() - 1]
    }

    /// Declare an image accessed as `name`.
    ///
    /// Without a `source`,
    ///   the bundle locates the image by the name of the accessor.
    pub fn add_image(&mut self, name: &str, source: Option<String>) {
        self.resources.push(Resource {
            name: name.to_string(),
            kind: ResourceKind::Image,
            source,
        });
    }

    pub fn add_data(&mut self, name: &str, source: Option<String>) {
        self.resources.push(Resource {
            name: name.to_string(),
            kind: ResourceKind::Data,
            source,
        });
    }

    pub fn css_interfaces(&self) -> &[CssInterface] {
        &self.css
    }

    /// Nested declarations to be added to the generated binder:
    ///   the bundle interface followed by each CSS interface.
    pub fn declarations(&self) -> Vec<ClassDecl> {
        let bundle = self.resources.iter().fold(
            ClassDecl::interface(BUNDLE_TYPE)
                .extends(global::CLIENT_BUNDLE_TYPE),
            |decl, resource| {
                let ret = match &resource.kind {
                    ResourceKind::Css { css_type } => css_type.as_str(),
                    ResourceKind::Image => global::IMAGE_RESOURCE_TYPE,
                    ResourceKind::Data => global::DATA_RESOURCE_TYPE,
                };

                let mut accessor = MethodDecl::new(ret, &resource.name);

                if let Some(source) = &resource.source {
                    accessor = accessor.annotate(format!(
                        "@{SOURCE_ANNOTATION}(\"{}\")",
                        escape_java_string(source)
                    ));
                }

                decl.method(accessor)
            },
        );

        std::iter::once(bundle)
            .chain(self.css.iter().map(CssInterface::decl))
            .collect()
    }

    /// Stylesheets declared inline,
    ///   to be emitted alongside the generated source.
    pub fn generated_resources(&self) -> &[GeneratedResource] {
        &self.generated
    }
}

/// Class selectors of a stylesheet in order of first appearance.
///
/// Comments and declaration blocks are skipped;
///   the blocks of `@media` and `@supports` rules contain selectors and
///   are not.
pub fn css_class_names(css: &str) -> Vec<String> {
    let mut names: Vec<String> = Vec::new();
    let mut blocks: Vec<bool> = Vec::new();
    let mut prelude = String::new();
    let mut chars = css.char_indices().peekable();

    while let Some((i, c)) = chars.next() {
        match c {
            '/' if css[i..].starts_with("/*") => {
                let end = css[i + 2..].find("*/").map_or(css.len(), |n| i + 4 + n);
                while chars.peek().map_or(false, |&(j, _)| j < end) {
                    chars.next();
                }
            }

            '{' => {
                let prelude_trimmed = prelude.trim_start();
                blocks.push(
                    prelude_trimmed.starts_with("@media")
                        || prelude_trimmed.starts_with("@supports"),
                );
                prelude.clear();
            }

            '}' => {
                blocks.pop();
                prelude.clear();
            }

            '.' if blocks.last().copied().unwrap_or(true)
                && !prelude.trim_start().starts_with('@') =>
            {
                let start = i + 1;
                let len = css[start..]
                    .find(|c: char| {
                        !(c.is_ascii_alphanumeric() || c == '-' || c == '_')
                    })
                    .unwrap_or(css.len() - start);
                let name = &css[start..start + len];

                let ident = name
                    .chars()
                    .next()
                    .map_or(false, |c| c.is_ascii_alphabetic() || c == '_' || c == '-');

                if ident && !names.iter().any(|n| n == name) {
                    names.push(name.to_string());
                }

                prelude.push(c);
            }

            ';' if blocks.last().copied().unwrap_or(true) => prelude.clear(),

            _ => prelude.push(c),
        }
    }

    names
}

/// Accessor method name for a CSS class:
///   `big-box` becomes `bigBox`.
pub fn class_accessor_name(class: &str) -> String {
    let mut name = String::with_capacity(class.len());
    let mut upper = false;

    for c in class.chars() {
        match c {
            '-' => upper = !name.is_empty(),
            c if upper => {
                name.push(c.to_ascii_uppercase());
                upper = false;
            }
            c => name.push(c),
        }
    }

    name
}
