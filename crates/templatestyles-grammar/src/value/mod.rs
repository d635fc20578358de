//! The CSS value model consumed by matchers.
//!
//! Input is tokenized with the `cssparser` crate and converted into owned
//! [`ComponentValue`] trees so that grammars can be built once and matched
//! against any number of independently parsed values.

mod component;
mod token;

pub use component::{
    BlockKind, ComponentValue, FunctionValue, SimpleBlock, parse_component_values,
    serialize_values,
};
pub use token::{Numeric, Token, TokenKind};
