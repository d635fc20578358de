//! Host integration.
//!
//! The two sanitizer hooks install the extended grammars into sanitizers the
//! host has built. [`TemplateStylesExtender`] wires everything together from
//! an [`ExtenderConfig`] for hosts that let the extender own the sanitizers.

mod tag;
mod unscope;

use std::sync::Arc;

use parking_lot::Mutex;

pub use tag::{
    DEFAULT_WRAP_CLASS, Frame, PAGE_ERROR_CATEGORY, Parser, ParserOptions,
    STYLESHEET_ERROR_CATEGORY, TagHandler, TemplateStylesTag, format_tag_error,
};
pub use unscope::{
    PermissionManager, Revision, RevisionLookup, ScopedWrapClass, UnscopeGate, UnscopeRequest,
    UnscopingTagHandler, WRAP_CLASS_PARAM,
};

use crate::config::ExtenderConfig;
use crate::factory::MatcherFactory;
use crate::properties::extended_table;
use crate::sanitizer::{FontFaceRuleSanitizer, StylePropertySanitizer, StylesheetSanitizer};
use crate::{Result, targets};

/// Install the extended property table, the `var()` fallback and custom
/// property declarations according to `config`.
///
/// The fallback needs a factory with `var()` support; with any other
/// factory it is left unset.
pub fn on_template_styles_property_sanitizer(
    sanitizer: &mut StylePropertySanitizer,
    factory: &MatcherFactory,
    config: &ExtenderConfig,
) {
    sanitizer.set_known_properties(extended_table(factory));
    sanitizer.set_custom_properties_allowed(config.custom_properties_declaration);

    let fallback = (config.extend_custom_properties_values && factory.var_enabled())
        .then(|| factory.var_catch_all());
    sanitizer.set_var_fallback_matcher(fallback);

    tracing::debug!(
        target: targets::HOOKS,
        properties = sanitizer.known_properties().len(),
        custom_properties = config.custom_properties_declaration,
        var_fallback = sanitizer.var_fallback_matcher().is_some(),
        "extended property sanitizer"
    );
}

/// Replace the `@font-face` sanitizer with the extended one.
pub fn on_template_styles_stylesheet_sanitizer(
    sanitizer: &mut StylesheetSanitizer,
    factory: &MatcherFactory,
) {
    sanitizer.replace_rule_sanitizer(Arc::new(FontFaceRuleSanitizer::extended(factory)));
}

/// Owns the factory and sanitizers for one configuration.
#[derive(Debug)]
pub struct TemplateStylesExtender {
    config: ExtenderConfig,
    factory: Arc<MatcherFactory>,
    stylesheet: Mutex<Option<Arc<StylesheetSanitizer>>>,
}

impl TemplateStylesExtender {
    pub fn new(config: ExtenderConfig) -> Self {
        let factory = MatcherFactory::with_var_enabled(config.extend_custom_properties_values);
        Self {
            config,
            factory: Arc::new(factory),
            stylesheet: Mutex::new(None),
        }
    }

    pub fn config(&self) -> &ExtenderConfig {
        &self.config
    }

    pub fn factory(&self) -> &Arc<MatcherFactory> {
        &self.factory
    }

    /// A property sanitizer with both hooks' changes applied.
    pub fn property_sanitizer(&self) -> StylePropertySanitizer {
        let mut sanitizer = StylePropertySanitizer::new(&self.factory);
        on_template_styles_property_sanitizer(&mut sanitizer, &self.factory, &self.config);
        sanitizer
    }

    /// The stylesheet sanitizer, built on first use.
    pub fn stylesheet_sanitizer(&self) -> Arc<StylesheetSanitizer> {
        let mut slot = self.stylesheet.lock();
        if let Some(sanitizer) = slot.as_ref() {
            return Arc::clone(sanitizer);
        }

        let mut sanitizer =
            StylesheetSanitizer::new(Arc::new(self.property_sanitizer()), &self.factory);
        on_template_styles_stylesheet_sanitizer(&mut sanitizer, &self.factory);
        let sanitizer = Arc::new(sanitizer);
        *slot = Some(Arc::clone(&sanitizer));
        sanitizer
    }

    /// The save-time gate.
    pub fn unscope_gate(&self, permissions: Arc<dyn PermissionManager>) -> Result<UnscopeGate> {
        UnscopeGate::new(&self.config, permissions)
    }

    /// The `<templatestyles>` handler: sanitized output, with `wrapclass`
    /// honored for permitted editors.
    pub fn tag_handler(
        &self,
        permissions: Arc<dyn PermissionManager>,
        revisions: Arc<dyn RevisionLookup>,
    ) -> Result<UnscopingTagHandler<TemplateStylesTag>> {
        let gate = Arc::new(self.unscope_gate(permissions)?);
        let tag = TemplateStylesTag::new(self.stylesheet_sanitizer());
        Ok(UnscopingTagHandler::new(tag, gate, revisions))
    }
}

impl Default for TemplateStylesExtender {
    fn default() -> Self {
        Self::new(ExtenderConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sanitizer::Declaration;

    #[test]
    fn property_hook_follows_config() {
        let factory = MatcherFactory::with_var_enabled(true);
        let mut sanitizer = StylePropertySanitizer::new(&factory);
        assert!(!sanitizer.known_properties().contains("aspect-ratio"));

        on_template_styles_property_sanitizer(&mut sanitizer, &factory, &ExtenderConfig::default());
        assert!(sanitizer.known_properties().contains("aspect-ratio"));
        assert!(sanitizer.custom_properties_allowed());
        assert!(sanitizer.var_fallback_matcher().is_some());

        let config = ExtenderConfig {
            extend_custom_properties_values: false,
            custom_properties_declaration: false,
            ..ExtenderConfig::default()
        };
        on_template_styles_property_sanitizer(&mut sanitizer, &factory, &config);
        assert!(!sanitizer.custom_properties_allowed());
        assert!(sanitizer.var_fallback_matcher().is_none());
        assert!(sanitizer.sanitize(&Declaration::parse("--x", "1px")).is_err());
    }

    #[test]
    fn fallback_needs_var_support() {
        let factory = MatcherFactory::new();
        let mut sanitizer = StylePropertySanitizer::new(&factory);
        on_template_styles_property_sanitizer(&mut sanitizer, &factory, &ExtenderConfig::default());
        assert!(sanitizer.var_fallback_matcher().is_none());
    }

    #[test]
    fn stylesheet_hook_swaps_font_face() {
        let extender = TemplateStylesExtender::default();
        let sheet = extender.stylesheet_sanitizer();
        let out = sheet.sanitize("@font-face { font-family: Foo; font-display: swap }", "w");
        assert!(out.is_clean());
        assert_eq!(
            sheet.rule_sanitizers().iter().filter(|s| s.name() == "font-face").count(),
            1
        );
    }

    #[test]
    fn stylesheet_sanitizer_is_built_once() {
        let extender = TemplateStylesExtender::default();
        assert!(Arc::ptr_eq(&extender.stylesheet_sanitizer(), &extender.stylesheet_sanitizer()));
    }
}
