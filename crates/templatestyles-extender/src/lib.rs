//! Extended CSS grammars and permission-gated unscoping for TemplateStyles.
//!
//! This crate extends the TemplateStyles sanitizer with:
//!
//! - **Grammars**: modern colors, `calc()` and friends, images, filters,
//!   media queries with range syntax, and `var()` substitutions
//! - **Properties**: a base property table plus ordered extensions adding
//!   newer CSS modules and single properties
//! - **Sanitizers**: declaration, style rule, `@media` and `@font-face`
//!   sanitizing with scoped selectors
//! - **Unscoping**: a `wrapclass` tag attribute honored only for editors
//!   holding a configured permission
//!
//! # Example
//!
//! ```ignore
//! use templatestyles_extender::prelude::*;
//!
//! let extender = TemplateStylesExtender::new(ExtenderConfig::load("extender.toml")?);
//! let sanitized = extender
//!     .stylesheet_sanitizer()
//!     .sanitize(".box { border: 1px solid var(--edge) }", DEFAULT_WRAP_CLASS);
//!
//! assert!(sanitized.is_clean());
//! ```

pub mod config;
pub mod factory;
pub mod hooks;
pub mod properties;
pub mod sanitizer;

mod error;

pub use error::{Error, Result};

/// Target names for log filtering.
pub mod targets {
    /// Grammar production target.
    pub const FACTORY: &str = "templatestyles_extender::factory";
    /// Property table target.
    pub const PROPERTIES: &str = "templatestyles_extender::properties";
    /// Sanitizer target.
    pub const SANITIZER: &str = "templatestyles_extender::sanitizer";
    /// Configuration target.
    pub const CONFIG: &str = "templatestyles_extender::config";
    /// Host hook target.
    pub const HOOKS: &str = "templatestyles_extender::hooks";
}

/// Prelude module with commonly used types.
pub mod prelude {
    pub use crate::config::{ConfigProvider, ExtenderConfig, MapConfig, TomlConfig, get_config_value};
    pub use crate::factory::MatcherFactory;
    pub use crate::hooks::{
        DEFAULT_WRAP_CLASS, Frame, Parser, ParserOptions, PermissionManager, Revision,
        RevisionLookup, TagHandler, TemplateStylesExtender, TemplateStylesTag, UnscopeGate,
        UnscopingTagHandler,
    };
    pub use crate::properties::{Insertion, PropertyTable, PropertyTableBuilder};
    pub use crate::sanitizer::{
        Declaration, SanitizationError, SanitizationErrorKind, SanitizedStylesheet,
        StylePropertySanitizer, StylesheetSanitizer,
    };
    pub use crate::{Error, Result};
}
