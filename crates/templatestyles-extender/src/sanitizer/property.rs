//! Declaration sanitizing against a property table.

use templatestyles_grammar::matcher::{MatchOptions, Matcher};

use super::declaration::Declaration;
use super::error::{SanitizationError, SanitizationErrorKind};
use crate::factory::MatcherFactory;
use crate::properties::{Insertion, PropertyTable, base_table};
use crate::targets;

/// Outcome of sanitizing one declaration.
pub type SanitizationResult = std::result::Result<Declaration, SanitizationError>;

/// Checks declarations against the known properties.
///
/// A declaration is kept when, in this order:
///
/// 1. it declares a custom property and those are allowed,
/// 2. its value is a CSS-wide keyword,
/// 3. its property's grammar accepts the value, or
/// 4. the value contains `var()` and the `var()` fallback grammar accepts it.
///
/// Sanitizing does not modify the sanitizer, so the same declarations always
/// produce the same results.
#[derive(Debug, Clone)]
pub struct StylePropertySanitizer {
    properties: PropertyTable,
    css_wide_keywords: Matcher,
    var_fallback: Option<Matcher>,
    custom_properties: bool,
    options: MatchOptions,
}

impl StylePropertySanitizer {
    /// A sanitizer over the base property table.
    pub fn new(factory: &MatcherFactory) -> Self {
        Self::with_properties(base_table(factory), factory)
    }

    pub fn with_properties(properties: PropertyTable, factory: &MatcherFactory) -> Self {
        Self {
            properties,
            css_wide_keywords: factory.css_wide_keywords(),
            var_fallback: None,
            custom_properties: false,
            options: MatchOptions::default(),
        }
    }

    pub fn known_properties(&self) -> &PropertyTable {
        &self.properties
    }

    /// Replace the property table.
    pub fn set_known_properties(&mut self, properties: PropertyTable) {
        self.properties = properties;
    }

    /// Register properties that are not already known. Known names keep
    /// their matcher; the outcome for each name is returned in input order.
    pub fn add_known_properties<I, S>(&mut self, properties: I) -> Vec<(String, Insertion)>
    where
        I: IntoIterator<Item = (S, Matcher)>,
        S: Into<String>,
    {
        let mut builder = self.properties.to_builder();
        let outcomes = properties
            .into_iter()
            .map(|(name, matcher)| {
                let name = name.into();
                let outcome = builder.insert(&name, matcher);
                (name, outcome)
            })
            .collect();
        self.properties = builder.build();
        outcomes
    }

    pub fn css_wide_keywords_matcher(&self) -> &Matcher {
        &self.css_wide_keywords
    }

    pub fn set_css_wide_keywords_matcher(&mut self, matcher: Matcher) {
        self.css_wide_keywords = matcher;
    }

    pub fn var_fallback_matcher(&self) -> Option<&Matcher> {
        self.var_fallback.as_ref()
    }

    /// Install the grammar tried for values containing `var()` after the
    /// property grammar rejects them.
    pub fn set_var_fallback_matcher(&mut self, matcher: Option<Matcher>) {
        self.var_fallback = matcher;
    }

    pub fn custom_properties_allowed(&self) -> bool {
        self.custom_properties
    }

    /// Accept `--*` declarations without checking their value.
    pub fn set_custom_properties_allowed(&mut self, allowed: bool) {
        self.custom_properties = allowed;
    }

    pub fn set_match_options(&mut self, options: MatchOptions) {
        self.options = options;
    }

    /// Sanitize a single declaration.
    pub fn sanitize(&self, declaration: &Declaration) -> SanitizationResult {
        let name = declaration.name();
        let reject = |kind| Err(SanitizationError::new(kind, declaration.location()));

        if declaration.is_custom_property() && self.custom_properties {
            return Ok(declaration.clone());
        }

        let Some(matcher) = self.properties.get(name) else {
            tracing::debug!(target: targets::SANITIZER, property = name, "unrecognized property");
            return reject(SanitizationErrorKind::UnrecognizedProperty {
                property: name.to_string(),
            });
        };

        if declaration.is_empty() {
            return reject(SanitizationErrorKind::MissingValue {
                property: name.to_string(),
            });
        }

        let value = &declaration.value;
        if self.css_wide_keywords.matches_with(value, &self.options)
            || matcher.matches_with(value, &self.options)
        {
            return Ok(declaration.clone());
        }

        if let Some(fallback) = &self.var_fallback
            && declaration.contains_var()
            && fallback.matches_with(value, &self.options)
        {
            return Ok(declaration.clone());
        }

        tracing::debug!(target: targets::SANITIZER, property = name, value = %declaration, "bad value for property");
        reject(SanitizationErrorKind::BadValueForProperty {
            property: name.to_string(),
        })
    }

    /// Sanitize `declarations`, keeping the accepted ones in order and
    /// collecting an error for each rejected one.
    pub fn sanitize_all(&self, declarations: &[Declaration]) -> (Vec<Declaration>, Vec<SanitizationError>) {
        let mut accepted = vec![];
        let mut errors = vec![];
        for declaration in declarations {
            match self.sanitize(declaration) {
                Ok(declaration) => accepted.push(declaration),
                Err(error) => errors.push(error),
            }
        }
        (accepted, errors)
    }
}
