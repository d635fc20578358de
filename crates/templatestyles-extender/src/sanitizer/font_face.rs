//! `@font-face` rules.

use templatestyles_grammar::matcher::Matcher;
use templatestyles_grammar::value::TokenKind;

use super::error::{SanitizationError, SanitizationErrorKind};
use super::property::StylePropertySanitizer;
use super::rule::Rule;
use super::stylesheet::{RuleContext, RuleSanitizer, sanitize_block};
use crate::factory::MatcherFactory;
use crate::properties::PropertyTable;

/// Descriptors every `@font-face` rule may use.
pub fn font_face_table(f: &MatcherFactory) -> PropertyTable {
    let family_name = Matcher::alternative(vec![f.string(), Matcher::plus(f.ident())]);
    let format = Matcher::function(
        "format",
        Matcher::hash_list(Matcher::alternative(vec![f.string(), f.ident()])),
    );
    let source = Matcher::alternative(vec![
        Matcher::juxtaposition(vec![f.url(), Matcher::optional(format)]),
        Matcher::function("local", family_name.clone()),
    ]);
    let weight = Matcher::alternative(vec![
        Matcher::keyword(["normal", "bold"]),
        Matcher::token_where(TokenKind::Number, |t| {
            t.numeric().is_some_and(|n| (1.0..=1000.0).contains(&n.value))
        }),
    ]);
    let stretch = Matcher::alternative(vec![
        Matcher::keyword([
            "normal",
            "ultra-condensed",
            "extra-condensed",
            "condensed",
            "semi-condensed",
            "semi-expanded",
            "expanded",
            "extra-expanded",
            "ultra-expanded",
        ]),
        f.percentage(),
    ]);

    let mut b = PropertyTable::builder();
    b.set("font-family", family_name);
    b.set("src", Matcher::hash_list(source));
    b.set(
        "font-style",
        Matcher::alternative(vec![
            Matcher::keyword(["normal", "italic"]),
            Matcher::juxtaposition(vec![Matcher::keyword(["oblique"]), Matcher::count(f.angle(), 0, 2)]),
        ]),
    );
    b.set("font-weight", Matcher::count(weight, 1, 2));
    b.set("font-stretch", Matcher::count(stretch, 1, 2));
    b.build()
}

/// [`font_face_table`] plus the metric overrides, `size-adjust` and
/// `font-display`.
pub fn extended_font_face_table(f: &MatcherFactory) -> PropertyTable {
    let metric = Matcher::alternative(vec![Matcher::keyword(["normal"]), f.percentage()]);
    let mut b = font_face_table(f).to_builder();
    for name in ["ascent-override", "descent-override", "line-gap-override", "size-adjust"] {
        b.set(name, metric.clone());
    }
    b.set(
        "font-display",
        Matcher::keyword(["auto", "block", "swap", "fallback", "optional"]),
    );
    b.build()
}

/// Sanitizes `@font-face` rules against a descriptor table.
#[derive(Debug)]
pub struct FontFaceRuleSanitizer {
    descriptors: StylePropertySanitizer,
}

impl FontFaceRuleSanitizer {
    pub fn new(factory: &MatcherFactory) -> Self {
        Self::with_table(font_face_table(factory), factory)
    }

    pub fn extended(factory: &MatcherFactory) -> Self {
        Self::with_table(extended_font_face_table(factory), factory)
    }

    pub fn with_table(table: PropertyTable, factory: &MatcherFactory) -> Self {
        Self {
            descriptors: StylePropertySanitizer::with_properties(table, factory),
        }
    }

    pub fn descriptors(&self) -> &StylePropertySanitizer {
        &self.descriptors
    }
}

impl RuleSanitizer for FontFaceRuleSanitizer {
    fn name(&self) -> &str {
        "font-face"
    }

    fn handles(&self, rule: &Rule) -> bool {
        rule.at_rule_name() == Some("font-face")
    }

    fn sanitize(
        &self,
        rule: &Rule,
        _: &RuleContext<'_>,
        errors: &mut Vec<SanitizationError>,
    ) -> Option<String> {
        let Rule::At(rule) = rule else {
            return None;
        };
        if rule.prelude.iter().any(|v| !v.is_whitespace()) {
            errors.push(SanitizationError::new(
                SanitizationErrorKind::UnexpectedPrelude {
                    rule: "font-face".to_string(),
                },
                rule.location,
            ));
            return None;
        }
        let Some(block) = &rule.block else {
            errors.push(SanitizationError::new(
                SanitizationErrorKind::MissingBlock {
                    rule: "font-face".to_string(),
                },
                rule.location,
            ));
            return None;
        };
        let body = sanitize_block(&self.descriptors, block, errors);
        Some(format!("@font-face{{{body}}}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use crate::sanitizer::StylesheetSanitizer;

    fn sheet(extended: bool) -> StylesheetSanitizer {
        let factory = MatcherFactory::new();
        let mut sheet =
            StylesheetSanitizer::new(Arc::new(StylePropertySanitizer::new(&factory)), &factory);
        if extended {
            sheet.replace_rule_sanitizer(Arc::new(FontFaceRuleSanitizer::extended(&factory)));
        }
        sheet
    }

    #[test]
    fn base_descriptors() {
        let out = sheet(false).sanitize(
            "@font-face { font-family: 'Foo Sans'; src: url(foo.woff2) format('woff2'), local(Foo); font-weight: 100 900 }",
            "w",
        );
        assert!(out.is_clean(), "{:?}", out.errors);
        assert_eq!(
            out.css,
            "@font-face{font-family:'Foo Sans';src:url(foo.woff2) format('woff2'), local(Foo);font-weight:100 900}"
        );
    }

    #[test]
    fn extended_descriptors() {
        let css = "@font-face { font-family: Foo; size-adjust: 90%; ascent-override: normal; font-display: swap }";

        let out = sheet(false).sanitize(css, "w");
        assert_eq!(out.errors.len(), 3);

        let out = sheet(true).sanitize(css, "w");
        assert!(out.is_clean());

        let out = sheet(true).sanitize("@font-face { font-display: later; line-gap-override: 2px }", "w");
        assert_eq!(out.css, "@font-face{}");
        assert_eq!(out.errors.len(), 2);
    }

    #[test]
    fn prelude_must_be_empty() {
        let out = sheet(true).sanitize("@font-face foo { font-family: Foo }", "w");
        assert_eq!(out.css, "");
        assert_eq!(out.errors[0].kind.code(), "unexpected-prelude");
    }
}
