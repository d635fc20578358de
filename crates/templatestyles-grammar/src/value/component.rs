//! Component values: tokens, functions and simple blocks.

use std::fmt;

use cssparser::{ParseError, Parser, ParserInput, Token as CssToken};

use super::token::{Token, TokenKind};

/// The bracket pair enclosing a [`SimpleBlock`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BlockKind {
    Parenthesis,
    SquareBracket,
    CurlyBracket,
}

impl BlockKind {
    pub fn open(self) -> char {
        match self {
            Self::Parenthesis => '(',
            Self::SquareBracket => '[',
            Self::CurlyBracket => '{',
        }
    }

    pub fn close(self) -> char {
        match self {
            Self::Parenthesis => ')',
            Self::SquareBracket => ']',
            Self::CurlyBracket => '}',
        }
    }
}

/// A function call such as `rgb(1, 2, 3)`.
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionValue {
    name: String,
    opening: String,
    /// The arguments, whitespace included.
    pub arguments: Vec<ComponentValue>,
    line: u32,
    column: u32,
}

impl FunctionValue {
    /// The unescaped function name.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn location(&self) -> (u32, u32) {
        (self.line, self.column)
    }
}

/// A bracketed group such as `(min-width: 10px)` or `[a b]`.
#[derive(Debug, Clone, PartialEq)]
pub struct SimpleBlock {
    pub kind: BlockKind,
    /// The contents, whitespace included.
    pub contents: Vec<ComponentValue>,
    line: u32,
    column: u32,
}

impl SimpleBlock {
    pub fn location(&self) -> (u32, u32) {
        (self.line, self.column)
    }
}

/// A single token or a nested function/block group.
#[derive(Debug, Clone, PartialEq)]
pub enum ComponentValue {
    Token(Token),
    Function(FunctionValue),
    Block(SimpleBlock),
}

impl ComponentValue {
    pub fn as_token(&self) -> Option<&Token> {
        match self {
            Self::Token(token) => Some(token),
            _ => None,
        }
    }

    pub fn is_whitespace(&self) -> bool {
        self.as_token().is_some_and(Token::is_whitespace)
    }

    /// Whether this value is a token of the given kind.
    pub fn is_kind(&self, kind: TokenKind) -> bool {
        self.as_token().is_some_and(|t| t.kind() == kind)
    }

    pub fn location(&self) -> (u32, u32) {
        match self {
            Self::Token(token) => token.location(),
            Self::Function(function) => function.location(),
            Self::Block(block) => block.location(),
        }
    }

    /// Whether this value is, or contains at any depth, a call to the
    /// function `name`.
    pub fn contains_function(&self, name: &str) -> bool {
        match self {
            Self::Token(_) => false,
            Self::Function(function) => {
                function.name.eq_ignore_ascii_case(name)
                    || function.arguments.iter().any(|v| v.contains_function(name))
            }
            Self::Block(block) => block.contents.iter().any(|v| v.contains_function(name)),
        }
    }
}

impl fmt::Display for ComponentValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Token(token) => token.fmt(f),
            Self::Function(function) => {
                f.write_str(&function.opening)?;
                write_list(f, &function.arguments)?;
                f.write_str(")")
            }
            Self::Block(block) => {
                write!(f, "{}", block.kind.open())?;
                write_list(f, &block.contents)?;
                write!(f, "{}", block.kind.close())
            }
        }
    }
}

fn write_list(f: &mut fmt::Formatter<'_>, values: &[ComponentValue]) -> fmt::Result {
    for value in values {
        fmt::Display::fmt(value, f)?;
    }
    Ok(())
}

/// Serialize a list of component values, trimming surrounding whitespace.
pub fn serialize_values(values: &[ComponentValue]) -> String {
    let start = values.iter().position(|v| !v.is_whitespace()).unwrap_or(values.len());
    let end = values.iter().rposition(|v| !v.is_whitespace()).map_or(start, |i| i + 1);
    values[start..end].iter().map(ToString::to_string).collect()
}

/// Tokenize `css` into a component value tree.
///
/// Comments are dropped; whitespace is kept as tokens so that matchers can
/// reason about adjacency. Tokenizing never fails: malformed input produces
/// bad-string/bad-url/stray-close tokens that no value grammar accepts.
pub fn parse_component_values(css: &str) -> Vec<ComponentValue> {
    let mut input = ParserInput::new(css);
    let mut parser = Parser::new(&mut input);
    consume_list(&mut parser)
}

fn consume_list<'i>(parser: &mut Parser<'i, '_>) -> Vec<ComponentValue> {
    let mut values = vec![];

    loop {
        let start = parser.position();
        let location = parser.current_source_location();
        let token = match parser.next_including_whitespace() {
            Ok(token) => token.clone(),
            Err(_) => break,
        };
        let line = location.line + 1;
        let column = location.column;

        let value = match token {
            CssToken::Function(name) => {
                let opening = parser.slice_from(start).to_string();
                let arguments = consume_nested(parser);
                ComponentValue::Function(FunctionValue {
                    name: name.to_string(),
                    opening,
                    arguments,
                    line,
                    column,
                })
            }
            CssToken::ParenthesisBlock => block(parser, BlockKind::Parenthesis, line, column),
            CssToken::SquareBracketBlock => block(parser, BlockKind::SquareBracket, line, column),
            CssToken::CurlyBracketBlock => block(parser, BlockKind::CurlyBracket, line, column),
            other => match Token::from_css(&other, parser.slice_from(start), location) {
                Some(token) => ComponentValue::Token(token),
                None => continue,
            },
        };
        values.push(value);
    }

    values
}

fn block(parser: &mut Parser<'_, '_>, kind: BlockKind, line: u32, column: u32) -> ComponentValue {
    ComponentValue::Block(SimpleBlock {
        kind,
        contents: consume_nested(parser),
        line,
        column,
    })
}

fn consume_nested(parser: &mut Parser<'_, '_>) -> Vec<ComponentValue> {
    parser
        .parse_nested_block(|p| Ok::<_, ParseError<'_, ()>>(consume_list(p)))
        .unwrap_or_default()
}
