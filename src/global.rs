// System-wide static configuration
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

//! System-wide static configuration.
//!
//! This module holds the fixed vocabulary shared by every stage of the
//!   template compiler:
//!     namespace URIs,
//!     runtime helper class names,
//!     and the well-known host types that the compiler must recognize.
//! Subsystems should reference these values rather than defining their own
//!   and risk incompatibilities as the runtime library evolves.
//!
//! By convention,
//!   import this entire module rather than individual members and reference
//!   them as `global::foo` to emphasize their nature.

/// Default namespace URI of structural binder elements
///   (`<ui:UiBinder>`, `<ui:with>`, `<ui:style>`, ...).
///
/// This may be overridden via [`crate::Options::binder_uri`].
pub const BINDER_URI: &str = "urn:ui:com.google.gwt.uibinder";

/// Namespace URI scheme naming a Java package whose simple class names
///   may be used as element names.
pub const IMPORT_URI_SCHEME: &str = "urn:import:";

/// Deprecated namespace URI scheme naming a resource bundle type whose
///   zero-argument methods may be referenced as attribute names.
pub const BUNDLE_URI_SCHEME: &str = "urn:with:";

/// Prefix of field names generated for elements that do not declare one.
pub const GENERATED_FIELD_PREFIX: &str = "f_";

/// Runtime helper class providing DOM child lookups and transient
///   attachment.
pub const UIBINDER_UTIL: &str = "com.google.gwt.uibinder.client.UiBinderUtil";

/// Deferred-binding entry point used for default field construction.
pub const GWT: &str = "com.google.gwt.core.client.GWT";

/// Runtime DOM document accessor.
pub const DOCUMENT: &str = "com.google.gwt.dom.client.Document";

/// The binder interface every generated class implements.
pub const UI_BINDER_TYPE: &str = "com.google.gwt.uibinder.client.UiBinder";

pub const ELEMENT_TYPE: &str = "com.google.gwt.dom.client.Element";
pub const WIDGET_TYPE: &str = "com.google.gwt.user.client.ui.Widget";

// Types with dedicated element parsers.
pub const UI_OBJECT_TYPE: &str = "com.google.gwt.user.client.ui.UIObject";
pub const HAS_TEXT_TYPE: &str = "com.google.gwt.user.client.ui.HasText";
pub const HAS_HTML_TYPE: &str = "com.google.gwt.user.client.ui.HasHTML";
pub const HAS_WIDGETS_TYPE: &str = "com.google.gwt.user.client.ui.HasWidgets";
pub const HTML_PANEL_TYPE: &str = "com.google.gwt.user.client.ui.HTMLPanel";
pub const CELL_PANEL_TYPE: &str = "com.google.gwt.user.client.ui.CellPanel";
pub const STRING_TYPE: &str = "java.lang.String";
pub const OBJECT_TYPE: &str = "java.lang.Object";
pub const ENUM_TYPE: &str = "java.lang.Enum";

pub const CLIENT_BUNDLE_TYPE: &str =
    "com.google.gwt.resources.client.ClientBundle";
pub const CSS_RESOURCE_TYPE: &str =
    "com.google.gwt.resources.client.CssResource";
pub const IMAGE_RESOURCE_TYPE: &str =
    "com.google.gwt.resources.client.ImageResource";
pub const DATA_RESOURCE_TYPE: &str =
    "com.google.gwt.resources.client.DataResource";

pub const HORIZONTAL_ALIGNMENT_TYPE: &str =
    "com.google.gwt.user.client.ui.HasHorizontalAlignment.HorizontalAlignmentConstant";
pub const VERTICAL_ALIGNMENT_TYPE: &str =
    "com.google.gwt.user.client.ui.HasVerticalAlignment.VerticalAlignmentConstant";

/// Base of every generated messages interface.
pub const MESSAGES_TYPE: &str = "com.google.gwt.i18n.client.Messages";

/// Type returned by every handler registration method.
pub const HANDLER_REGISTRATION_TYPE: &str =
    "com.google.gwt.event.shared.HandlerRegistration";

pub const ANNOTATION_UI_FIELD: &str = "com.google.gwt.uibinder.client.UiField";
pub const ANNOTATION_UI_FACTORY: &str =
    "com.google.gwt.uibinder.client.UiFactory";
pub const ANNOTATION_UI_HANDLER: &str =
    "com.google.gwt.uibinder.client.UiHandler";
pub const ANNOTATION_UI_CONSTRUCTOR: &str =
    "com.google.gwt.uibinder.client.UiConstructor";
pub const ANNOTATION_UI_TEMPLATE: &str =
    "com.google.gwt.uibinder.client.UiTemplate";
pub const ANNOTATION_TAG_NAME: &str = "com.google.gwt.dom.client.TagName";

/// Name of the method an event type uses to expose its handler type.
pub const EVENT_ASSOCIATED_TYPE_METHOD: &str = "getAssociatedType";

/// Parameter name of the generated factory method.
pub const OWNER_PARAM: &str = "owner";
