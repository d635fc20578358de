//! Stylesheet sanitizing.
//!
//! A [`StylesheetSanitizer`] parses a stylesheet into rules and hands each
//! rule to the first [`RuleSanitizer`] that handles it. Rule sanitizers emit
//! the minified text of what they keep and record problems as
//! [`SanitizationError`]s; nothing aborts the pass.

use std::fmt;
use std::sync::Arc;

use templatestyles_grammar::matcher::Matcher;
use templatestyles_grammar::value::{ComponentValue, serialize_values};

use super::declaration::{Declaration, parse_declaration_list};
use super::error::{SanitizationError, SanitizationErrorKind};
use super::font_face::FontFaceRuleSanitizer;
use super::property::StylePropertySanitizer;
use super::rule::{Rule, parse_rule_list, parse_stylesheet};
use super::selector::{scope_selectors, selector_list};
use crate::factory::MatcherFactory;
use crate::targets;

/// State shared by the rule sanitizers of one pass.
#[derive(Clone, Copy)]
pub struct RuleContext<'a> {
    /// The class every selector is scoped under.
    pub wrap_class: &'a str,
    /// Sanitizers for rules nested in blocks.
    pub rule_sanitizers: &'a [Arc<dyn RuleSanitizer>],
}

impl RuleContext<'_> {
    /// Sanitize `rules` with the context's sanitizers and concatenate the
    /// output.
    pub fn sanitize_rules(&self, rules: &[Rule], errors: &mut Vec<SanitizationError>) -> String {
        let mut css = String::new();
        for rule in rules {
            match self.rule_sanitizers.iter().find(|s| s.handles(rule)) {
                Some(sanitizer) => {
                    if let Some(text) = sanitizer.sanitize(rule, self, errors) {
                        css.push_str(&text);
                    }
                }
                None => {
                    let name = rule.at_rule_name().unwrap_or("style").to_string();
                    tracing::debug!(target: targets::SANITIZER, rule = %name, "unrecognized rule");
                    errors.push(SanitizationError::new(
                        SanitizationErrorKind::UnrecognizedRule { name },
                        rule.location(),
                    ));
                }
            }
        }
        css
    }
}

/// Sanitizes one kind of rule.
pub trait RuleSanitizer: Send + Sync + fmt::Debug {
    /// A short name such as `"style"` or `"font-face"`.
    fn name(&self) -> &str;

    /// Whether this sanitizer is responsible for `rule`.
    fn handles(&self, rule: &Rule) -> bool;

    /// The sanitized text of `rule`, or `None` when the whole rule is
    /// dropped.
    fn sanitize(
        &self,
        rule: &Rule,
        cx: &RuleContext<'_>,
        errors: &mut Vec<SanitizationError>,
    ) -> Option<String>;
}

/// Sanitize the body of a declaration block and serialize what is kept.
pub(crate) fn sanitize_block(
    properties: &StylePropertySanitizer,
    block: &[ComponentValue],
    errors: &mut Vec<SanitizationError>,
) -> String {
    let (declarations, parse_errors) = parse_declaration_list(block);
    errors.extend(parse_errors);
    let (accepted, rejected) = properties.sanitize_all(&declarations);
    errors.extend(rejected);
    accepted
        .iter()
        .map(Declaration::to_string)
        .collect::<Vec<_>>()
        .join(";")
}

/// Style rules: the selectors are validated and scoped, the declarations
/// checked against the property sanitizer.
#[derive(Debug)]
pub struct StyleRuleSanitizer {
    selectors: Matcher,
    properties: Arc<StylePropertySanitizer>,
}

impl StyleRuleSanitizer {
    pub fn new(properties: Arc<StylePropertySanitizer>) -> Self {
        Self {
            selectors: selector_list(),
            properties,
        }
    }
}

impl RuleSanitizer for StyleRuleSanitizer {
    fn name(&self) -> &str {
        "style"
    }

    fn handles(&self, rule: &Rule) -> bool {
        matches!(rule, Rule::Qualified(_))
    }

    fn sanitize(
        &self,
        rule: &Rule,
        cx: &RuleContext<'_>,
        errors: &mut Vec<SanitizationError>,
    ) -> Option<String> {
        let Rule::Qualified(rule) = rule else {
            return None;
        };
        if !self.selectors.matches(&rule.prelude) {
            errors.push(SanitizationError::new(SanitizationErrorKind::InvalidSelector, rule.location));
            return None;
        }
        let body = sanitize_block(&self.properties, &rule.block, errors);
        Some(format!("{}{{{body}}}", scope_selectors(&rule.prelude, cx.wrap_class)))
    }
}

/// `@media` rules. The prelude must be a media query list; nested rules go
/// through the context's sanitizers.
#[derive(Debug)]
pub struct MediaRuleSanitizer {
    queries: Matcher,
}

impl MediaRuleSanitizer {
    pub fn new(factory: &MatcherFactory) -> Self {
        Self::with_matcher(factory.css_media_query_list(true))
    }

    pub fn with_matcher(queries: Matcher) -> Self {
        Self { queries }
    }
}

impl RuleSanitizer for MediaRuleSanitizer {
    fn name(&self) -> &str {
        "media"
    }

    fn handles(&self, rule: &Rule) -> bool {
        rule.at_rule_name() == Some("media")
    }

    fn sanitize(
        &self,
        rule: &Rule,
        cx: &RuleContext<'_>,
        errors: &mut Vec<SanitizationError>,
    ) -> Option<String> {
        let Rule::At(rule) = rule else {
            return None;
        };
        let Some(block) = &rule.block else {
            errors.push(SanitizationError::new(
                SanitizationErrorKind::MissingBlock {
                    rule: "media".to_string(),
                },
                rule.location,
            ));
            return None;
        };

        let prelude = serialize_values(&rule.prelude);
        if !prelude.is_empty() && !self.queries.matches(&rule.prelude) {
            errors.push(SanitizationError::new(SanitizationErrorKind::InvalidMediaQuery, rule.location));
            return None;
        }

        let (nested, parse_errors) = parse_rule_list(block);
        errors.extend(parse_errors);
        let body = cx.sanitize_rules(&nested, errors);
        if prelude.is_empty() {
            Some(format!("@media{{{body}}}"))
        } else {
            Some(format!("@media {prelude}{{{body}}}"))
        }
    }
}

/// The output of a stylesheet pass.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SanitizedStylesheet {
    /// The kept rules, minified.
    pub css: String,
    /// Problems in source order.
    pub errors: Vec<SanitizationError>,
}

impl SanitizedStylesheet {
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Sanitizes whole stylesheets.
#[derive(Debug, Clone)]
pub struct StylesheetSanitizer {
    rule_sanitizers: Vec<Arc<dyn RuleSanitizer>>,
}

impl StylesheetSanitizer {
    /// Style rules, `@media` and the base `@font-face` sanitizer.
    pub fn new(properties: Arc<StylePropertySanitizer>, factory: &MatcherFactory) -> Self {
        Self {
            rule_sanitizers: vec![
                Arc::new(StyleRuleSanitizer::new(properties)),
                Arc::new(MediaRuleSanitizer::new(factory)),
                Arc::new(FontFaceRuleSanitizer::new(factory)),
            ],
        }
    }

    pub fn rule_sanitizers(&self) -> &[Arc<dyn RuleSanitizer>] {
        &self.rule_sanitizers
    }

    pub fn set_rule_sanitizers(&mut self, rule_sanitizers: Vec<Arc<dyn RuleSanitizer>>) {
        self.rule_sanitizers = rule_sanitizers;
    }

    /// Replace the sanitizer with the same name as `sanitizer`, or append it.
    pub fn replace_rule_sanitizer(&mut self, sanitizer: Arc<dyn RuleSanitizer>) {
        match self
            .rule_sanitizers
            .iter_mut()
            .find(|existing| existing.name() == sanitizer.name())
        {
            Some(existing) => *existing = sanitizer,
            None => self.rule_sanitizers.push(sanitizer),
        }
    }

    /// Sanitize `css`, scoping every selector under `wrap_class`.
    pub fn sanitize(&self, css: &str, wrap_class: &str) -> SanitizedStylesheet {
        let (rules, mut errors) = parse_stylesheet(css);
        let cx = RuleContext {
            wrap_class,
            rule_sanitizers: &self.rule_sanitizers,
        };
        let css = cx.sanitize_rules(&rules, &mut errors);
        errors.sort_by_key(|e| (e.line, e.column));
        SanitizedStylesheet { css, errors }
    }
}
