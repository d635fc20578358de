//! Sanitization problems.

use std::fmt;

/// What was wrong with a piece of a stylesheet.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SanitizationErrorKind {
    #[error("Unrecognized property '{property}'")]
    UnrecognizedProperty { property: String },

    #[error("Bad value for property '{property}'")]
    BadValueForProperty { property: String },

    #[error("Missing value for property '{property}'")]
    MissingValue { property: String },

    #[error("Expected a declaration")]
    InvalidDeclaration,

    #[error("Unrecognized or unsupported rule '{name}'")]
    UnrecognizedRule { name: String },

    #[error("Invalid media query")]
    InvalidMediaQuery,

    #[error("Missing block for rule '{rule}'")]
    MissingBlock { rule: String },

    #[error("Invalid or unsupported selector")]
    InvalidSelector,

    #[error("Unexpected prelude for rule '{rule}'")]
    UnexpectedPrelude { rule: String },
}

impl SanitizationErrorKind {
    /// A stable, machine readable code for the problem.
    pub fn code(&self) -> &'static str {
        match self {
            Self::UnrecognizedProperty { .. } => "unrecognized-property",
            Self::BadValueForProperty { .. } => "bad-value-for-property",
            Self::MissingValue { .. } => "missing-value",
            Self::InvalidDeclaration => "expected-declaration",
            Self::UnrecognizedRule { .. } => "unrecognized-rule",
            Self::InvalidMediaQuery => "invalid-media-query",
            Self::MissingBlock { .. } => "missing-block",
            Self::InvalidSelector => "invalid-selector-list",
            Self::UnexpectedPrelude { .. } => "unexpected-prelude",
        }
    }
}

/// A problem found while sanitizing, with the source position it refers to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SanitizationError {
    pub kind: SanitizationErrorKind,
    pub line: u32,
    pub column: u32,
}

impl SanitizationError {
    pub fn new(kind: SanitizationErrorKind, (line, column): (u32, u32)) -> Self {
        Self { kind, line, column }
    }
}

impl fmt::Display for SanitizationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} at line {}, column {}", self.kind, self.line, self.column)
    }
}

impl std::error::Error for SanitizationError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_position() {
        let error = SanitizationError::new(
            SanitizationErrorKind::BadValueForProperty {
                property: "color".into(),
            },
            (3, 7),
        );
        assert_eq!(error.to_string(), "Bad value for property 'color' at line 3, column 7");
        assert_eq!(error.kind.code(), "bad-value-for-property");
    }
}
