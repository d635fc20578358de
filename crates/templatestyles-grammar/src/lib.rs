//! CSS component values and grammar matchers for TemplateStyles sanitizing.
//!
//! This crate provides the building blocks the sanitizer grammars are
//! composed from:
//!
//! - **Values**: an owned component-value tree produced by the `cssparser`
//!   tokenizer
//! - **Matchers**: immutable, shareable combinators (keywords, tokens,
//!   sequences, alternatives, unordered groups, quantifiers, functions,
//!   blocks, self-referential productions)
//! - **Caching**: build-once storage for named productions
//!
//! # Example
//!
//! ```ignore
//! use templatestyles_grammar::prelude::*;
//!
//! let flex = Matcher::token_where(TokenKind::Dimension, |t| {
//!     t.unit().is_some_and(|u| u.eq_ignore_ascii_case("fr"))
//!         && t.numeric().is_some_and(|n| n.value >= 0.0)
//! });
//! let tracks = Matcher::plus(flex);
//!
//! assert!(tracks.matches(&parse_component_values("1fr 2fr")));
//! ```

pub mod matcher;
pub mod value;

/// Target names for log filtering.
pub mod targets {
    /// Matching engine target.
    pub const MATCHER: &str = "templatestyles_grammar::matcher";
}

/// Prelude module with commonly used types.
pub mod prelude {
    pub use crate::matcher::{MatchOptions, Matcher, MatcherCache};
    pub use crate::value::{
        BlockKind, ComponentValue, Token, TokenKind, parse_component_values, serialize_values,
    };
}
