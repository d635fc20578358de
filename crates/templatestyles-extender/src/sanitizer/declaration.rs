//! Declarations and declaration lists.

use std::fmt;

use templatestyles_grammar::value::{
    ComponentValue, TokenKind, parse_component_values, serialize_values,
};

use super::error::{SanitizationError, SanitizationErrorKind};

/// A `name: value` pair, with any `!important` removed from the value.
#[derive(Debug, Clone, PartialEq)]
pub struct Declaration {
    name: String,
    /// The value, whitespace included.
    pub value: Vec<ComponentValue>,
    pub important: bool,
    line: u32,
    column: u32,
}

impl Declaration {
    pub fn new(name: impl Into<String>, value: Vec<ComponentValue>) -> Self {
        Self {
            name: name.into(),
            value,
            important: false,
            line: 1,
            column: 1,
        }
    }

    /// Parse `value` and build a declaration from it.
    pub fn parse(name: impl Into<String>, value: &str) -> Self {
        Self::new(name, parse_component_values(value))
    }

    pub fn with_location(mut self, (line, column): (u32, u32)) -> Self {
        self.line = line;
        self.column = column;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn location(&self) -> (u32, u32) {
        (self.line, self.column)
    }

    /// Whether this declares a custom property (`--name`).
    pub fn is_custom_property(&self) -> bool {
        self.name.starts_with("--")
    }

    /// Whether a `var()` call appears anywhere in the value.
    pub fn contains_var(&self) -> bool {
        self.value.iter().any(|v| v.contains_function("var"))
    }

    /// Whether the value holds nothing but whitespace.
    pub fn is_empty(&self) -> bool {
        self.value.iter().all(ComponentValue::is_whitespace)
    }
}

impl fmt::Display for Declaration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.name, serialize_values(&self.value))?;
        if self.important {
            f.write_str(" !important")?;
        }
        Ok(())
    }
}

/// Split the contents of a style block into declarations.
///
/// Items that are not of the form `name: value` are reported and skipped.
pub fn parse_declaration_list(values: &[ComponentValue]) -> (Vec<Declaration>, Vec<SanitizationError>) {
    let mut declarations = vec![];
    let mut errors = vec![];

    for item in values.split(|v| v.is_kind(TokenKind::Semicolon)) {
        let Some(first) = item.iter().position(|v| !v.is_whitespace()) else {
            continue;
        };
        match parse_declaration(&item[first..]) {
            Some(declaration) => declarations.push(declaration),
            None => errors.push(SanitizationError::new(
                SanitizationErrorKind::InvalidDeclaration,
                item[first].location(),
            )),
        }
    }

    (declarations, errors)
}

/// [`parse_declaration_list`] over source text.
pub fn parse_declarations(css: &str) -> (Vec<Declaration>, Vec<SanitizationError>) {
    parse_declaration_list(&parse_component_values(css))
}

fn parse_declaration(item: &[ComponentValue]) -> Option<Declaration> {
    let name = item.first()?.as_token().filter(|t| t.kind() == TokenKind::Ident)?;
    let colon = item[1..].iter().position(|v| !v.is_whitespace())? + 1;
    if !item[colon].is_kind(TokenKind::Colon) {
        return None;
    }

    let mut value = item[colon + 1..].to_vec();
    let important = strip_important(&mut value);

    Some(Declaration {
        name: name.value().to_string(),
        value,
        important,
        line: name.location().0,
        column: name.location().1,
    })
}

/// Remove a trailing `! important` from `value`.
fn strip_important(value: &mut Vec<ComponentValue>) -> bool {
    let mut significant = value
        .iter()
        .enumerate()
        .rev()
        .filter(|(_, v)| !v.is_whitespace());

    let is_important = |v: &ComponentValue| v.as_token().is_some_and(|t| t.is_ident("important"));
    let is_bang = |v: &ComponentValue| v.as_token().is_some_and(|t| t.delim() == Some('!'));

    match (significant.next(), significant.next()) {
        (Some((_, last)), Some((bang, before))) if is_important(last) && is_bang(before) => {
            value.truncate(bang);
            true
        }
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_on_semicolons() {
        let (declarations, errors) = parse_declarations("color: red; margin : 0 auto ;; ");
        assert!(errors.is_empty());
        assert_eq!(declarations.len(), 2);
        assert_eq!(declarations[1].name(), "margin");
        assert_eq!(declarations[1].to_string(), "margin:0 auto");
    }

    #[test]
    fn important_is_stripped() {
        let (declarations, _) = parse_declarations("color: red ! IMPORTANT");
        assert!(declarations[0].important);
        assert_eq!(declarations[0].to_string(), "color:red !important");
    }

    #[test]
    fn malformed_items_are_reported() {
        let (declarations, errors) = parse_declarations("color red; width: 1px;\n  42: x");
        assert_eq!(declarations.len(), 1);
        assert_eq!(errors.len(), 2);
        assert_eq!(errors[1].line, 2);
        assert_eq!(errors[0].kind, SanitizationErrorKind::InvalidDeclaration);
    }

    #[test]
    fn custom_properties() {
        let (declarations, _) = parse_declarations("--gap: 4px; border: var(--edge)");
        assert!(declarations[0].is_custom_property());
        assert!(!declarations[0].contains_var());
        assert!(declarations[1].contains_var());
    }

    #[test]
    fn nested_semicolons_stay_in_blocks() {
        let (declarations, _) = parse_declarations("--x: { a; b }; color: red");
        assert_eq!(declarations.len(), 2);
    }
}
