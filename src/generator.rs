// Binder implementation generator
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

//! Binder implementation generator.
//!
//! This is the entry point for hosts.
//! Given the name of a binder interface
//!   (an interface extending `UiBinder<U, O>`),
//!   [`UiBinderGenerator::generate`] locates its template,
//!   compiles it,
//!   and returns the source of the class implementing the binder.
//!
//! The template is named by a `@UiTemplate` annotation on the binder,
//!   relative to the package of the binder;
//!     otherwise it is `<Owner>.ui.xml` in the package of the owner `O`.
//!
//! Each call is independent of every other,
//!   so a host may generate any number of binders concurrently using
//!   separate generators or a shared one.
//!
//! ```
//! use uibinder::{
//!     oracle::MemoryTypeOracle,
//!     resource::MemoryResourceOracle,
//!     generator::{Options, UiBinderGenerator},
//! };
//!
//! let types = MemoryTypeOracle::new();
//! let resources = MemoryResourceOracle::new();
//!
//! let generator = UiBinderGenerator::new(&types, &resources, Options::default());
//!
//! // The binder is unknown to the type oracle.
//! assert!(generator.generate("com.example.Missing").is_err());
//! ```

use crate::{
    bundle::GeneratedResource,
    diagnose::{Reporter, SourceSpanResolver, VisualReporter},
    global,
    oracle::{Annotated, ClassType, TypeCache, TypeOracle},
    resource::ResourceOracle,
    span::UNKNOWN_SPAN,
    writer::{binder_type_args, UiBinderError, UiBinderWriter},
};
use std::{
    error::Error,
    fmt::{self, Display},
};

/// Suffix of template files located by owner name.
pub const TEMPLATE_SUFFIX: &str = ".ui.xml";

/// Compilation options shared by every template of a generator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Options {
    /// Namespace URI of binder elements such as `<ui:field>`.
    pub binder_uri: String,

    /// Whether whitespace-only text between elements is significant.
    ///
    /// This must agree with how the browser will parse rendered HTML,
    ///   since elements are located at runtime by their position among
    ///   their siblings.
    pub preserve_whitespace: bool,

    /// Prefix of the names of fields not named by `ui:field`.
    pub generated_name_prefix: String,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            binder_uri: global::BINDER_URI.into(),
            preserve_whitespace: false,
            generated_name_prefix: global::GENERATED_FIELD_PREFIX.into(),
        }
    }
}

/// Source of a generated binder implementation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedUnit {
    pub package: String,
    pub class_name: String,
    pub source: String,

    /// Resources referenced by the implicit client bundle,
    ///   which the host must make available alongside the class.
    pub resources: Vec<GeneratedResource>,

    /// Problems that did not prevent generation.
    pub warnings: Vec<String>,
}

impl GeneratedUnit {
    /// Fully qualified name of the generated class.
    pub fn qualified_name(&self) -> String {
        match self.package.is_empty() {
            true => self.class_name.clone(),
            false => format!("{}.{}", self.package, self.class_name),
        }
    }
}

pub struct UiBinderGenerator<'o> {
    types: &'o dyn TypeOracle,
    resources: &'o dyn ResourceOracle,
    options: Options,
}

impl<'o> UiBinderGenerator<'o> {
    pub fn new(
        types: &'o dyn TypeOracle,
        resources: &'o dyn ResourceOracle,
        options: Options,
    ) -> Self {
        Self {
            types,
            resources,
            options,
        }
    }

    pub fn options(&self) -> &Options {
        &self.options
    }

    /// Generate the implementation of the binder interface `binder_name`.
    ///
    /// On failure,
    ///   the error carries a report rendered against the template,
    ///     if the template could be located.
    pub fn generate(
        &self,
        binder_name: &str,
    ) -> Result<GeneratedUnit, GenerateError> {
        let cache = TypeCache::new(self.types);

        let binder = cache
            .find_type(binder_name)
            .ok_or_else(|| UiBinderError::UnknownType {
                name: binder_name.into(),
                span: UNKNOWN_SPAN,
            })
            .map_err(|e| GenerateError::new(e, None, ""))?;

        let path = template_path(&cache, binder)
            .map_err(|e| GenerateError::new(e, None, ""))?;

        log::debug!("compiling {path} for {binder_name}");

        let src = self
            .resources
            .load(&path)
            .map_err(|e| GenerateError::new(e.into(), Some(path.as_str()), ""))?;

        let impl_name = impl_name(binder);

        UiBinderWriter::new(
            cache,
            self.resources,
            binder,
            &impl_name,
            &self.options,
        )
        .and_then(|writer| writer.compile(&src))
        .map(|out| GeneratedUnit {
            package: binder.package.clone(),
            class_name: out.class_name,
            source: out.source,
            resources: out.resources,
            warnings: out.warnings,
        })
        .map_err(|e| GenerateError::new(e, Some(path.as_str()), &src))
    }
}

/// Logical path of the template of `binder`.
fn template_path(
    cache: &TypeCache,
    binder: &ClassType,
) -> Result<String, UiBinderError> {
    let explicit = binder
        .annotation(global::ANNOTATION_UI_TEMPLATE)
        .and_then(|ann| ann.values().first().map(|v| v.to_string()));

    if let Some(file) = explicit {
        return Ok(package_path(&binder.package, &file));
    }

    let (_, owner_ty) = binder_type_args(binder)?;
    let owner = cache.resolve(owner_ty).ok_or_else(|| {
        UiBinderError::UnknownType {
            name: owner_ty.to_string(),
            span: UNKNOWN_SPAN,
        }
    })?;

    Ok(package_path(
        &owner.package,
        &format!("{}{TEMPLATE_SUFFIX}", owner.short_name()),
    ))
}

fn package_path(package: &str, file: &str) -> String {
    match package.is_empty() {
        true => file.to_string(),
        false => format!("{}/{file}", package.replace('.', "/")),
    }
}

/// Name of the class implementing `binder`,
///   which is unique within its package even for nested binders.
fn impl_name(binder: &ClassType) -> String {
    format!("{}Impl", binder.simple_name.replace('.', "_"))
}

/// Failure to generate a binder implementation.
#[derive(Debug)]
pub struct GenerateError {
    /// Cause of the failure.
    pub error: UiBinderError,

    /// Logical path of the template,
    ///   if it was located.
    pub template: Option<String>,

    report: String,
}

impl GenerateError {
    fn new(error: UiBinderError, template: Option<&str>, src: &str) -> Self {
        let name = template.unwrap_or("<unknown template>");
        let report = VisualReporter::new(SourceSpanResolver::new(name, src))
            .render(&error)
            .to_string();

        log::debug!("{report}");

        Self {
            error,
            template: template.map(String::from),
            report,
        }
    }

    /// Human-readable report of the error,
    ///   with each problem located within the template.
    pub fn report(&self) -> &str {
        &self.report
    }
}

impl Display for GenerateError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match &self.template {
            Some(path) => write!(f, "{path}: {}", self.error),
            None => Display::fmt(&self.error, f),
        }
    }
}

impl Error for GenerateError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        Some(&self.error)
    }
}

#[cfg(test)]
mod test;
