//! Declaration and stylesheet sanitizers.
//!
//! [`StylePropertySanitizer`] decides whether a single declaration is kept.
//! [`StylesheetSanitizer`] drives a whole stylesheet through a list of
//! [`RuleSanitizer`]s (style rules, `@media`, `@font-face`), each of which
//! uses a property sanitizer for its declaration blocks.

mod declaration;
mod error;
mod font_face;
mod property;
mod rule;
mod selector;
mod stylesheet;

pub use declaration::{Declaration, parse_declaration_list, parse_declarations};
pub use error::{SanitizationError, SanitizationErrorKind};
pub use font_face::{FontFaceRuleSanitizer, extended_font_face_table, font_face_table};
pub use property::{SanitizationResult, StylePropertySanitizer};
pub use rule::{AtRule, QualifiedRule, Rule, parse_rule_list, parse_stylesheet};
pub use selector::{scope_selectors, selector_list};
pub use stylesheet::{
    MediaRuleSanitizer, RuleContext, RuleSanitizer, SanitizedStylesheet, StyleRuleSanitizer,
    StylesheetSanitizer,
};
