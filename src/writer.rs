// Template compilation orchestrator
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

//! Template compilation orchestrator.
//!
//! A [`UiBinderWriter`] owns all state for the compilation of a single
//!   template:
//!     the [`FieldManager`],
//!     the [`Tokenator`],
//!     the implicit client bundle,
//!     the messages of the template,
//!     and the statements produced by each element parser.
//! Nothing is shared between templates,
//!   so any number of templates may be compiled independently.
//!
//! Compilation proceeds in two phases:
//!
//!   1. The template is parsed from its root
//!        (see [`crate::parser`]).
//!      Each element that requires a field is resolved to a type,
//!        declared as a field,
//!        and handed to every applicable element parser while the field is
//!        marked as being parsed,
//!          so that every field registered in the meantime becomes one of
//!          its needs.
//!   2. The factory method is written:
//!        field declarations in dependency order,
//!        then plain statements,
//!        then init statements,
//!        then event handler registrations,
//!        then assignments to owner fields,
//!        and finally the return of the root field.
//!
//! Statements are kept in three lists.
//! _Plain_ statements configure fields and run immediately after they are
//!   declared;
//!     _init_ statements run after every plain statement;
//!     and _detach_ statements belong to an _attach section_,
//!       which temporarily attaches an element to the document so that
//!       elements rendered within it can be located by DOM id.
//! An attach section that records no detach statements emits nothing.

mod error;

pub use error::UiBinderError;

use crate::{
    attr::{AttrContext, AttributeParsers, Segment},
    bundle::{self, GeneratedResource, ImplicitBundle},
    dom::DomCursor,
    field::{FieldError, FieldManager, FieldTier},
    generator::Options,
    global, handler,
    java::{
        simple_name, ClassDecl, CompilationUnit, Expr, JavaWriter, MethodDecl,
        Param, Stmt,
    },
    messages::{self, MessageMeta, MessagesWriter, Placeholder},
    oracle::{ClassType, TypeCache, TypeRef},
    owner::OwnerClass,
    parser,
    resource::ResourceOracle,
    span::{Span, UNKNOWN_SPAN},
    tokenator::Tokenator,
    xml::{parse_document, XmlElement},
};
use fxhash::FxHashMap;

pub type Result<T> = std::result::Result<T, UiBinderError>;

/// Name of the factory method of every binder.
pub const FACTORY_METHOD: &str = "createAndBindUi";

/// Output of a successful compilation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedSource {
    pub class_name: String,
    pub source: String,
    pub resources: Vec<GeneratedResource>,
    pub warnings: Vec<String>,
}

/// Statements requiring an element to be attached to the document.
#[derive(Debug)]
struct AttachSection {
    element: Expr,
    detach: Vec<Stmt>,
}

pub struct UiBinderWriter<'o> {
    cache: TypeCache<'o>,
    resources: &'o dyn ResourceOracle,
    owner: OwnerClass<'o>,
    binder: &'o ClassType,

    /// Type produced by the factory method.
    root_type: TypeRef,

    binder_uri: String,
    preserve_whitespace: bool,
    field_prefix: String,
    package: String,
    impl_name: String,

    fields: FieldManager,
    parsers: AttributeParsers,
    tokenator: Tokenator,
    bundle: ImplicitBundle,
    messages: MessagesWriter,

    statements: Vec<Stmt>,
    init_statements: Vec<Stmt>,
    attach_sections: Vec<AttachSection>,

    next_field: usize,
    next_dom_id: usize,
    next_attach: usize,
    next_intermediate: usize,

    warnings: Vec<String>,
}

/// The types `U` and `O` of the `UiBinder<U, O>` extended by `binder`.
pub fn binder_type_args(binder: &ClassType) -> Result<(&TypeRef, &TypeRef)> {
    let not_binder = || UiBinderError::NotUiBinder(binder.name());

    let args = binder
        .interfaces
        .iter()
        .find(|iface| iface.class_name() == Some(global::UI_BINDER_TYPE))
        .map(TypeRef::type_args)
        .ok_or_else(not_binder)?;

    match args {
        [root, owner] => Ok((root, owner)),
        _ => Err(not_binder()),
    }
}

impl<'o> UiBinderWriter<'o> {
    /// Writer for the implementation `impl_name` of the binder interface
    ///   `binder`,
    ///     which must extend `UiBinder<U, O>`.
    pub fn new(
        cache: TypeCache<'o>,
        resources: &'o dyn ResourceOracle,
        binder: &'o ClassType,
        impl_name: &str,
        options: &Options,
    ) -> Result<Self> {
        let (root_type, owner_type) = binder_type_args(binder)?;

        let owner_ty =
            cache
                .resolve(owner_type)
                .ok_or_else(|| UiBinderError::UnknownType {
                    name: owner_type.to_string(),
                    span: UNKNOWN_SPAN,
                })?;

        let owner = OwnerClass::new(owner_ty, &cache)?;

        Ok(Self {
            cache,
            resources,
            owner,
            binder,
            root_type: root_type.clone(),
            binder_uri: options.binder_uri.clone(),
            preserve_whitespace: options.preserve_whitespace,
            field_prefix: options.generated_name_prefix.clone(),
            package: binder.package.clone(),
            impl_name: impl_name.to_string(),
            fields: FieldManager::new(),
            parsers: AttributeParsers::new(),
            tokenator: Tokenator::new(),
            bundle: ImplicitBundle::new(impl_name),
            messages: MessagesWriter::new(),
            statements: vec![],
            init_statements: vec![],
            attach_sections: vec![],
            next_field: 1,
            next_dom_id: 0,
            next_attach: 0,
            next_intermediate: 0,
            warnings: vec![],
        })
    }

    /// Compile the template `src` into the source of the binder
    ///   implementation.
    pub fn compile(mut self, src: &str) -> Result<GeneratedSource> {
        let mut root = XmlElement::new(parse_document(src)?)
            .preserving_whitespace(self.preserve_whitespace);

        let root_field = parser::parse_root(&mut self, &mut root)?;
        self.write(root_field)
    }

    pub fn cache(&self) -> &TypeCache<'o> {
        &self.cache
    }

    pub fn owner(&self) -> &OwnerClass<'o> {
        &self.owner
    }

    pub fn fields(&self) -> &FieldManager {
        &self.fields
    }

    pub fn fields_mut(&mut self) -> &mut FieldManager {
        &mut self.fields
    }

    pub fn bundle_mut(&mut self) -> &mut ImplicitBundle {
        &mut self.bundle
    }

    pub fn messages_mut(&mut self) -> &mut MessagesWriter {
        &mut self.messages
    }

    /// Context for parsing attribute values into expressions.
    pub fn attr_ctx(&mut self) -> AttrContext<'_, 'o> {
        AttrContext::new(&self.parsers, &self.cache, &mut self.fields)
    }

    pub fn binder_uri(&self) -> &str {
        &self.binder_uri
    }

    pub fn preserve_whitespace(&self) -> bool {
        self.preserve_whitespace
    }

    /// Package of the binder,
    ///   against which resource paths are resolved.
    pub fn package(&self) -> &str {
        &self.package
    }

    /// Load a resource by a path relative to the package of the binder.
    pub fn load_resource(&self, path: &str) -> Result<String> {
        let full = match self.package.is_empty() {
            true => path.to_string(),
            false => format!("{}/{path}", self.package.replace('.', "/")),
        };

        Ok(self.resources.load(&full)?)
    }

    /// Whether `elem` is in the binder namespace.
    pub fn is_binder_element(&self, elem: &XmlElement) -> bool {
        elem.namespace_uri() == Some(self.binder_uri.as_str())
    }

    /// Whether `elem` names a widget type
    ///   (its namespace is `urn:import:<package>`).
    pub fn is_widget_element(&self, elem: &XmlElement) -> bool {
        elem.namespace_uri()
            .map_or(false, |uri| uri.starts_with(global::IMPORT_URI_SCHEME))
    }

    /// Report a problem that does not prevent compilation.
    pub fn warn<S: Into<String>>(&mut self, msg: S) {
        let msg = msg.into();
        log::warn!("{msg}");
        self.warnings.push(msg);
    }

    pub fn add_statement(&mut self, stmt: Stmt) {
        self.statements.push(stmt);
    }

    pub fn add_init_statement(&mut self, stmt: Stmt) {
        self.init_statements.push(stmt);
    }

    /// Begin a section of statements that require `element` to be
    ///   attached to the document.
    pub fn begin_attach_section(&mut self, element: Expr) {
        self.attach_sections.push(AttachSection {
            element,
            detach: vec![],
        });
    }

    /// Add a statement to the innermost attach section.
    ///
    /// Outside of an attach section,
    ///   this is an ordinary init statement.
    pub fn add_detach_statement(&mut self, stmt: Stmt) {
        match self.attach_sections.last_mut() {
            Some(section) => section.detach.push(stmt),
            None => self.init_statements.push(stmt),
        }
    }

    /// End the innermost attach section,
    ///   emitting its statements bracketed by attaching and then detaching
    ///   its element.
    pub fn end_attach_section(&mut self) {
        let section = match self.attach_sections.pop() {
            Some(section) if !section.detach.is_empty() => section,
            _ => return,
        };

        let record = format!("attachRecord{}", self.next_attach);
        self.next_attach += 1;

        let util = simple_name(global::UIBINDER_UTIL);

        self.init_statements.push(Stmt::local(
            format!("{util}.TempAttachment"),
            &record,
            Expr::static_call(util, "attachToDom", vec![section.element]),
        ));
        self.init_statements.extend(section.detach);
        self.init_statements
            .push(Expr::name(record).call("detach", vec![]).into());
    }

    /// Cursor tracking elements rendered from HTML into the element held
    ///   by `root`.
    pub fn dom_cursor(&self, root: &str, elem: &XmlElement) -> DomCursor {
        DomCursor::new(
            root,
            elem.local_name(),
            elem.span(),
            self.preserve_whitespace,
        )
        .numbering_from(self.next_intermediate)
    }

    /// Reserve the intermediate variables declared by `cursor`.
    pub fn release_dom_cursor(&mut self, cursor: DomCursor) {
        self.next_intermediate = cursor.next_intermediate();
    }

    /// Register a field holding a DOM id unique at runtime.
    pub fn dom_id_holder(&mut self, span: Span) -> Result<String> {
        let name = format!("domId{}", self.next_dom_id);
        self.next_dom_id += 1;

        let init = Expr::static_call(simple_name(global::DOCUMENT), "get", vec![])
            .call("createUniqueId", vec![]);

        self.fields.register_dom_id_holder(&name, init, span)?;
        Ok(name)
    }

    /// Token splicing the value of `expr` into a string literal.
    pub fn expression_token(&mut self, expr: &Expr) -> String {
        self.tokenator.next_expression_token(&expr.to_string())
    }

    /// Token marking a position within rendered content,
    ///   such as a message placeholder,
    ///     that is replaced before the source is rendered.
    pub fn marker_token(&mut self) -> String {
        self.tokenator.next_token("")
    }

    /// Declare a translatable message whose default text is `rendered`,
    ///   returning the expression producing the message at runtime.
    ///
    /// Each token of this writer within `rendered` becomes a parameter of
    ///   the message;
    ///     `placeholders` describes those marking a `<ui:ph>`.
    pub fn declare_message(
        &mut self,
        meta: MessageMeta,
        rendered: &str,
        placeholders: &FxHashMap<String, Placeholder>,
        span: Span,
    ) -> Result<Expr> {
        self.ensure_messages_field(span)?;

        if let Some(current) = self.fields.current_field().map(String::from) {
            self.fields.needs(&current, messages::MESSAGES_FIELD)?;
        }

        Ok(self.messages.declare(meta, rendered, &self.tokenator, placeholders))
    }

    /// Replace field references within the remaining attributes of an
    ///   element rendered as HTML with tokens splicing in their values.
    pub fn interpolate_attributes(&mut self, elem: &mut XmlElement) -> Result<()> {
        for attr in elem.attributes_mut() {
            if !crate::attr::may_contain_reference(&attr.value) {
                continue;
            }

            let segments = crate::attr::split(&attr.value).map_err(|_| {
                crate::attr::AttrParseError {
                    value: attr.value.clone(),
                    expected: global::STRING_TYPE.into(),
                    span: attr.span,
                    kind: crate::attr::AttrParseErrorKind::MalformedFieldReference,
                }
            })?;

            let mut value = String::with_capacity(attr.value.len());

            for segment in segments {
                match segment {
                    Segment::Literal(lit) => value.push_str(&lit),
                    Segment::Reference(path) => {
                        let expr = self.fields.register_field_reference(
                            path,
                            TypeRef::string(),
                            attr.span,
                        );
                        value.push_str(&self.expression_token(&expr));
                    }
                }
            }

            attr.value = value;
        }

        Ok(())
    }

    /// Name for a field of an element without `ui:field`.
    fn generated_field_name(&mut self, elem: &XmlElement) -> String {
        let name = format!(
            "{}{}{}",
            self.field_prefix,
            elem.local_name().replace('.', "_"),
            self.next_field
        );
        self.next_field += 1;
        name
    }

    /// Resolve the type backing an element.
    ///
    /// Widgets are named by their simple name within the package of their
    ///   `urn:import:` namespace;
    ///     any other element is an HTML element.
    pub fn find_field_type(&self, elem: &XmlElement) -> Result<&'o ClassType> {
        if self.is_binder_element(elem) {
            return Err(UiBinderError::UnexpectedBinderElement {
                name: elem.name().clone(),
                span: elem.span(),
            });
        }

        let pkg = elem
            .namespace_uri()
            .and_then(|uri| uri.strip_prefix(global::IMPORT_URI_SCHEME));

        let found = match pkg {
            Some(pkg) => {
                let name = format!("{pkg}.{}", elem.local_name());
                self.cache.find_type(&name).ok_or(name)
            }
            None => self
                .cache
                .element_type_for_tag(elem.local_name())
                .ok_or_else(|| global::ELEMENT_TYPE.to_string()),
        };

        found.map_err(|name| UiBinderError::UnknownType {
            name,
            span: elem.span(),
        })
    }

    /// Declare the field backing `elem`,
    ///   consuming the attribute that names it.
    fn declare_field(
        &mut self,
        elem: &mut XmlElement,
        ty: &'o ClassType,
    ) -> Result<String> {
        let span = elem.span();
        let field = elem.consume_ns_attribute(&self.binder_uri, "field");

        let id = match self.is_widget_element(elem) {
            true => elem.consume_attribute_node("id"),
            false => None,
        };

        let name = match (field, id) {
            (Some(_), Some(_)) => return Err(UiBinderError::FieldAndId { span }),
            (Some(field), None) => field.value.trim().to_string(),
            (None, Some(id)) => {
                self.warn(format!(
                    "deprecated use of id=\"{}\" to name a field; \
                       use ui:field instead",
                    id.value.trim()
                ));
                id.value.trim().to_string()
            }
            (None, None) => self.generated_field_name(elem),
        };

        let ty_ref = ty.as_type_ref();
        self.fields.register_field(ty_ref.clone(), &name, span)?;

        // The owner supplies the value itself.
        if let Some(owner_field) = self.owner.ui_field(&name) {
            if owner_field.provided {
                if !self.cache.is_assignable(&owner_field.ty, &ty_ref) {
                    return Err(UiBinderError::OwnerFieldMismatch {
                        field: name,
                        owner_ty: owner_field.ty.to_string(),
                        template_ty: ty_ref.to_string(),
                        span,
                    });
                }

                let init = Expr::name(global::OWNER_PARAM).dot(&name);
                self.fields.set_initializer(&name, init)?;
            }
        }

        Ok(name)
    }

    /// Parse `elem` into a field,
    ///   returning its name.
    ///
    /// Every field registered while `elem` is being parsed becomes one of
    ///   its needs.
    pub fn parse_element_to_field(
        &mut self,
        elem: &mut XmlElement,
    ) -> Result<String> {
        let ty = self.find_field_type(elem)?;
        let name = self.declare_field(elem, ty)?;

        #[cfg(feature = "parser-trace")]
        log::trace!("entering <{}> as {} {name}", elem.name(), ty.name());

        self.fields.push_field(&name)?;
        let result = parser::parse_field(self, elem, &name, ty);
        self.fields.pop_field();

        #[cfg(feature = "parser-trace")]
        log::trace!("leaving <{}> ({name})", elem.name());

        result?;
        self.check_consumed(elem)?;

        Ok(name)
    }

    /// Fail if any attribute or content of `elem` went unhandled.
    pub fn check_consumed(&self, elem: &XmlElement) -> Result<()> {
        if let Some(attr) = elem.attributes().first() {
            return Err(UiBinderError::UnexpectedAttribute {
                name: attr.name.to_string(),
                span: attr.span,
            });
        }

        match elem.first_content_span() {
            Some(span) => Err(UiBinderError::UnexpectedContent {
                elem: elem.name().clone(),
                span,
            }),
            None => Ok(()),
        }
    }

    /// Fail unless `field` holds a widget.
    pub fn require_widget(&self, field: &str, span: Span) -> Result<()> {
        let ty = self
            .fields
            .lookup(field)
            .map(|f| f.ty().clone())
            .unwrap_or_else(|| TypeRef::class(global::OBJECT_TYPE));

        match self.cache.is_assignable(&ty, &TypeRef::class(global::WIDGET_TYPE)) {
            true => Ok(()),
            false => Err(UiBinderError::NotAWidget {
                field: field.to_string(),
                ty: ty.to_string(),
                span,
            }),
        }
    }

    /// Register the field holding the implicit client bundle,
    ///   unless it already has been.
    pub fn ensure_bundle_field(&mut self, span: Span) -> Result<&'static str> {
        if !self.fields.contains(bundle::BUNDLE_FIELD) {
            self.fields.register_field_of_generated_type(
                TypeRef::class(bundle::BUNDLE_TYPE),
                bundle::BUNDLE_FIELD,
                span,
            )?;

            let init = Expr::cast(
                bundle::BUNDLE_TYPE,
                Expr::static_call(
                    simple_name(global::GWT),
                    "create",
                    vec![Expr::ClassLiteral(bundle::BUNDLE_TYPE.into())],
                ),
            );

            self.fields.set_initializer(bundle::BUNDLE_FIELD, init)?;
        }

        Ok(bundle::BUNDLE_FIELD)
    }

    fn ensure_messages_field(&mut self, span: Span) -> Result<()> {
        if !self.fields.contains(messages::MESSAGES_FIELD) {
            self.fields.register_field_of_generated_type(
                TypeRef::class(messages::MESSAGES_TYPE),
                messages::MESSAGES_FIELD,
                span,
            )?;

            let init = Expr::cast(
                messages::MESSAGES_TYPE,
                Expr::static_call(
                    simple_name(global::GWT),
                    "create",
                    vec![Expr::ClassLiteral(messages::MESSAGES_TYPE.into())],
                ),
            );

            self.fields.set_initializer(messages::MESSAGES_FIELD, init)?;
        }

        Ok(())
    }

    /// Assignments of template fields to owner `@UiField`s that are not
    ///   provided by the owner.
    fn owner_assignments(&self) -> Result<Vec<Stmt>> {
        let mut stmts = Vec::new();

        for owner_field in self.owner.ui_fields() {
            let field = self.fields.lookup(&owner_field.name).ok_or_else(|| {
                UiBinderError::MissingTemplateField {
                    field: owner_field.name.clone(),
                    owner: self.owner.name(),
                }
            })?;

            if owner_field.provided {
                continue;
            }

            // Generated CSS types are known only by what they extend.
            let template_ty = match field.tier() {
                FieldTier::GeneratedCss => self
                    .bundle
                    .css_interfaces()
                    .iter()
                    .find(|css| field.ty().class_name() == Some(css.name.as_str()))
                    .map_or_else(|| field.ty().clone(), |css| css.extends.clone()),
                _ => field.ty().clone(),
            };

            if !self.cache.is_assignable(&template_ty, &owner_field.ty) {
                return Err(UiBinderError::OwnerFieldMismatch {
                    field: owner_field.name.clone(),
                    owner_ty: owner_field.ty.to_string(),
                    template_ty: template_ty.to_string(),
                    span: field.span(),
                });
            }

            stmts.push(Stmt::assign(
                Expr::name(global::OWNER_PARAM).dot(&owner_field.name),
                Expr::name(&owner_field.name),
            ));
        }

        Ok(stmts)
    }

    fn write(mut self, root: String) -> Result<GeneratedSource> {
        let root_field = self.fields.lookup(&root).ok_or_else(|| {
            FieldError::Unknown(root.clone())
        })?;

        if !self.cache.is_assignable(root_field.ty(), &self.root_type) {
            return Err(UiBinderError::RootTypeMismatch {
                expected: self.root_type.to_string(),
                found: root_field.ty().to_string(),
                span: root_field.span(),
            });
        }

        let assignments = self.owner_assignments()?;
        let handlers =
            handler::write_handlers(&self.owner, &self.fields, &self.cache)?;

        self.fields
            .validate(&self.cache)
            .map_err(UiBinderError::FieldReferences)?;

        let mut body = self.fields.write_all(&self.cache)?;
        body.append(&mut self.statements);
        body.append(&mut self.init_statements);
        body.extend(handlers);
        body.extend(assignments);
        body.push(Stmt::Return(Expr::name(&root)));

        let factory = MethodDecl::new(self.root_type.to_string(), FACTORY_METHOD)
            .public()
            .param(Param::final_param(
                self.owner.ty().name(),
                global::OWNER_PARAM,
            ))
            .body(body);

        let mut class = ClassDecl::class(&self.impl_name)
            .modifier("public")
            .implements(self.binder.name())
            .method(factory);

        if !self.bundle.is_empty() {
            class = self
                .bundle
                .declarations()
                .into_iter()
                .fold(class, |class, decl| class.nested(decl.modifier("static")));
        }

        if !self.messages.is_empty() {
            class = class.nested(self.messages.declaration().modifier("static"));
        }

        let unit = CompilationUnit {
            package: self.package.clone(),
            imports: vec![
                global::GWT.to_string(),
                global::DOCUMENT.to_string(),
                global::UIBINDER_UTIL.to_string(),
            ],
            class,
        };

        let source = self.tokenator.detokenate(&unit.to_source()?);

        log::debug!(
            "generated {} with {} field(s) and {} warning(s)",
            self.impl_name,
            self.fields.len(),
            self.warnings.len(),
        );

        Ok(GeneratedSource {
            class_name: self.impl_name,
            source,
            resources: self.bundle.generated_resources().to_vec(),
            warnings: self.warnings,
        })
    }
}
