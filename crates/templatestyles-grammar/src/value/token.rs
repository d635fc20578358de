//! Owned CSS tokens.

use std::fmt;

use cssparser::{SourceLocation, Token as CssToken};

/// The type tag of a [`Token`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    Ident,
    AtKeyword,
    /// `#name`. See [`Token::is_id_hash`] for the "id" type flag.
    Hash,
    String,
    Url,
    BadString,
    BadUrl,
    Delim,
    Number,
    Percentage,
    Dimension,
    Whitespace,
    Colon,
    Semicolon,
    Comma,
    Cdo,
    Cdc,
    /// One of the attribute match operators (`~=`, `|=`, `^=`, `$=`, `*=`).
    AttributeMatch,
    CloseParenthesis,
    CloseSquareBracket,
    CloseCurlyBracket,
}

/// Numeric payload of number, percentage and dimension tokens.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Numeric {
    /// The value. Percentages are stored as written (`50%` is `50.0`).
    pub value: f32,
    /// Set when the token was written as an integer.
    pub int_value: Option<i32>,
    /// Whether an explicit `+` or `-` sign was present.
    pub has_sign: bool,
}

/// A single CSS token, detached from the input it was read from.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    kind: TokenKind,
    value: String,
    repr: String,
    numeric: Option<Numeric>,
    delim: Option<char>,
    id_hash: bool,
    line: u32,
    column: u32,
}

impl Token {
    /// Create a token. Mostly useful for tests; real tokens come from
    /// [`parse_component_values`](crate::value::parse_component_values).
    pub fn new(kind: TokenKind, value: impl Into<String>) -> Self {
        let value = value.into();
        Self {
            kind,
            repr: value.clone(),
            value,
            numeric: None,
            delim: None,
            id_hash: false,
            line: 1,
            column: 1,
        }
    }

    /// Convert a `cssparser` token. Returns `None` for block openers and
    /// comments, which are not leaf tokens.
    pub(crate) fn from_css(token: &CssToken<'_>, repr: &str, location: SourceLocation) -> Option<Self> {
        let mut numeric = None;
        let mut delim = None;
        let mut id_hash = false;
        let (kind, value) = match token {
            CssToken::Ident(v) => (TokenKind::Ident, v.to_string()),
            CssToken::AtKeyword(v) => (TokenKind::AtKeyword, v.to_string()),
            CssToken::Hash(v) => (TokenKind::Hash, v.to_string()),
            CssToken::IDHash(v) => {
                id_hash = true;
                (TokenKind::Hash, v.to_string())
            }
            CssToken::QuotedString(v) => (TokenKind::String, v.to_string()),
            CssToken::UnquotedUrl(v) => (TokenKind::Url, v.to_string()),
            CssToken::Delim(c) => {
                delim = Some(*c);
                (TokenKind::Delim, c.to_string())
            }
            CssToken::Number {
                has_sign,
                value,
                int_value,
            } => {
                numeric = Some(Numeric {
                    value: *value,
                    int_value: *int_value,
                    has_sign: *has_sign,
                });
                (TokenKind::Number, repr.to_string())
            }
            CssToken::Percentage {
                has_sign,
                unit_value,
                int_value,
            } => {
                numeric = Some(Numeric {
                    value: unit_value * 100.0,
                    int_value: *int_value,
                    has_sign: *has_sign,
                });
                (TokenKind::Percentage, repr.to_string())
            }
            CssToken::Dimension {
                has_sign,
                value,
                int_value,
                unit,
            } => {
                numeric = Some(Numeric {
                    value: *value,
                    int_value: *int_value,
                    has_sign: *has_sign,
                });
                (TokenKind::Dimension, unit.to_string())
            }
            CssToken::WhiteSpace(_) => (TokenKind::Whitespace, " ".to_string()),
            CssToken::Colon => (TokenKind::Colon, ":".to_string()),
            CssToken::Semicolon => (TokenKind::Semicolon, ";".to_string()),
            CssToken::Comma => (TokenKind::Comma, ",".to_string()),
            CssToken::CDO => (TokenKind::Cdo, "<!--".to_string()),
            CssToken::CDC => (TokenKind::Cdc, "-->".to_string()),
            CssToken::IncludeMatch
            | CssToken::DashMatch
            | CssToken::PrefixMatch
            | CssToken::SuffixMatch
            | CssToken::SubstringMatch => (TokenKind::AttributeMatch, repr.to_string()),
            CssToken::BadUrl(v) => (TokenKind::BadUrl, v.to_string()),
            CssToken::BadString(v) => (TokenKind::BadString, v.to_string()),
            CssToken::CloseParenthesis => (TokenKind::CloseParenthesis, ")".to_string()),
            CssToken::CloseSquareBracket => (TokenKind::CloseSquareBracket, "]".to_string()),
            CssToken::CloseCurlyBracket => (TokenKind::CloseCurlyBracket, "}".to_string()),
            CssToken::Comment(_)
            | CssToken::Function(_)
            | CssToken::ParenthesisBlock
            | CssToken::SquareBracketBlock
            | CssToken::CurlyBracketBlock => return None,
        };

        Some(Self {
            kind,
            value,
            repr: repr.to_string(),
            numeric,
            delim,
            id_hash,
            line: location.line + 1,
            column: location.column,
        })
    }

    pub fn kind(&self) -> TokenKind {
        self.kind
    }

    /// The unescaped value: the name of an ident, at-keyword or hash, the
    /// contents of a string or url, the unit of a dimension, or the source
    /// text of a number or percentage.
    pub fn value(&self) -> &str {
        &self.value
    }

    /// The token as it appeared in the source.
    pub fn representation(&self) -> &str {
        &self.repr
    }

    pub fn numeric(&self) -> Option<Numeric> {
        self.numeric
    }

    /// Unit of a dimension token.
    pub fn unit(&self) -> Option<&str> {
        (self.kind == TokenKind::Dimension).then_some(self.value.as_str())
    }

    pub fn delim(&self) -> Option<char> {
        self.delim
    }

    /// Whether a hash token would be a valid id selector.
    pub fn is_id_hash(&self) -> bool {
        self.id_hash
    }

    pub fn is_whitespace(&self) -> bool {
        self.kind == TokenKind::Whitespace
    }

    /// Whether this is an identifier equal to `name`, ignoring ASCII case.
    pub fn is_ident(&self, name: &str) -> bool {
        self.kind == TokenKind::Ident && self.value.eq_ignore_ascii_case(name)
    }

    /// Line (1-based) and column (1-based) in the source.
    pub fn location(&self) -> (u32, u32) {
        (self.line, self.column)
    }

    /// Tokens that never belong inside a well-formed value.
    pub fn is_bad(&self) -> bool {
        matches!(
            self.kind,
            TokenKind::BadString
                | TokenKind::BadUrl
                | TokenKind::CloseParenthesis
                | TokenKind::CloseSquareBracket
                | TokenKind::CloseCurlyBracket
        )
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_whitespace() {
            f.write_str(" ")
        } else {
            f.write_str(&self.repr)
        }
    }
}
