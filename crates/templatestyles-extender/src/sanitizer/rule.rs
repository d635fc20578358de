//! Stylesheet rules.

use templatestyles_grammar::value::{BlockKind, ComponentValue, TokenKind, parse_component_values};

use super::error::{SanitizationError, SanitizationErrorKind};

/// A selector prelude with a declaration block.
#[derive(Debug, Clone, PartialEq)]
pub struct QualifiedRule {
    pub prelude: Vec<ComponentValue>,
    pub block: Vec<ComponentValue>,
    pub location: (u32, u32),
}

/// An at-rule such as `@media screen { ... }` or `@import "x";`.
#[derive(Debug, Clone, PartialEq)]
pub struct AtRule {
    /// The lowercased name, without the `@`.
    pub name: String,
    pub prelude: Vec<ComponentValue>,
    /// The block contents, if the rule has a block.
    pub block: Option<Vec<ComponentValue>>,
    pub location: (u32, u32),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Rule {
    Qualified(QualifiedRule),
    At(AtRule),
}

impl Rule {
    pub fn location(&self) -> (u32, u32) {
        match self {
            Self::Qualified(rule) => rule.location,
            Self::At(rule) => rule.location,
        }
    }

    /// The at-rule name, if this is an at-rule.
    pub fn at_rule_name(&self) -> Option<&str> {
        match self {
            Self::At(rule) => Some(&rule.name),
            Self::Qualified(_) => None,
        }
    }
}

/// Parse stylesheet text into a rule list.
pub fn parse_stylesheet(css: &str) -> (Vec<Rule>, Vec<SanitizationError>) {
    parse_rule_list(&parse_component_values(css))
}

/// Split component values into rules. `<!--` and `-->` at the top level are
/// ignored; a qualified rule that ends before its block is reported.
pub fn parse_rule_list(values: &[ComponentValue]) -> (Vec<Rule>, Vec<SanitizationError>) {
    let mut rules = vec![];
    let mut errors = vec![];
    let mut index = 0;

    while index < values.len() {
        let value = &values[index];
        if value.is_whitespace() || value.is_kind(TokenKind::Cdo) || value.is_kind(TokenKind::Cdc) {
            index += 1;
            continue;
        }

        let location = value.location();
        if let Some(name) = value
            .as_token()
            .filter(|t| t.kind() == TokenKind::AtKeyword)
            .map(|t| t.value().to_ascii_lowercase())
        {
            let (prelude, block, next) = consume_at_rule(values, index + 1);
            rules.push(Rule::At(AtRule {
                name,
                prelude,
                block,
                location,
            }));
            index = next;
            continue;
        }

        match values[index..].iter().position(is_curly_block) {
            Some(offset) => {
                let end = index + offset;
                rules.push(Rule::Qualified(QualifiedRule {
                    prelude: values[index..end].to_vec(),
                    block: block_contents(&values[end]),
                    location,
                }));
                index = end + 1;
            }
            None => {
                errors.push(SanitizationError::new(
                    SanitizationErrorKind::MissingBlock {
                        rule: "style".to_string(),
                    },
                    location,
                ));
                break;
            }
        }
    }

    (rules, errors)
}

fn consume_at_rule(
    values: &[ComponentValue],
    start: usize,
) -> (Vec<ComponentValue>, Option<Vec<ComponentValue>>, usize) {
    for (offset, value) in values[start..].iter().enumerate() {
        let end = start + offset;
        if value.is_kind(TokenKind::Semicolon) {
            return (values[start..end].to_vec(), None, end + 1);
        }
        if is_curly_block(value) {
            return (values[start..end].to_vec(), Some(block_contents(value)), end + 1);
        }
    }
    (values[start..].to_vec(), None, values.len())
}

fn is_curly_block(value: &ComponentValue) -> bool {
    matches!(value, ComponentValue::Block(block) if block.kind == BlockKind::CurlyBracket)
}

fn block_contents(value: &ComponentValue) -> Vec<ComponentValue> {
    match value {
        ComponentValue::Block(block) => block.contents.clone(),
        _ => vec![],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn qualified_and_at_rules() {
        let (rules, errors) = parse_stylesheet(
            "<!-- a { color: red } --> @media screen { b { x: y } } @import 'x.css';",
        );
        assert!(errors.is_empty());
        assert_eq!(rules.len(), 3);
        assert!(matches!(rules[0], Rule::Qualified(_)));
        assert_eq!(rules[1].at_rule_name(), Some("media"));
        match &rules[2] {
            Rule::At(rule) => assert!(rule.block.is_none()),
            other => panic!("expected at-rule, got {other:?}"),
        }
    }

    #[test]
    fn at_rule_names_are_lowercased() {
        let (rules, _) = parse_stylesheet("@MEDIA print {}");
        assert_eq!(rules[0].at_rule_name(), Some("media"));
    }

    #[test]
    fn missing_block() {
        let (rules, errors) = parse_stylesheet("a { color: red }\nb");
        assert_eq!(rules.len(), 1);
        assert_eq!(errors[0].kind.code(), "missing-block");
        assert_eq!(errors[0].line, 2);
    }
}
