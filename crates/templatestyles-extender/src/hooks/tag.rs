//! The `<templatestyles>` tag surface.

use std::collections::HashMap;
use std::sync::Arc;

use crate::sanitizer::StylesheetSanitizer;
use crate::{Result, targets};

/// The class output is wrapped in unless a page says otherwise.
pub const DEFAULT_WRAP_CLASS: &str = "mw-parser-output";
/// Tracking category added to pages with tag errors.
pub const PAGE_ERROR_CATEGORY: &str = "templatestyles-page-error-category";
/// Tracking category added to pages whose stylesheet had problems.
pub const STYLESHEET_ERROR_CATEGORY: &str = "templatestyles-stylesheet-error-category";

/// Per-parse options the tag handlers read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParserOptions {
    wrap_class: String,
}

impl ParserOptions {
    pub fn new(wrap_class: impl Into<String>) -> Self {
        Self {
            wrap_class: wrap_class.into(),
        }
    }

    pub fn wrap_output_class(&self) -> &str {
        &self.wrap_class
    }

    pub fn set_wrap_output_class(&mut self, wrap_class: impl Into<String>) {
        self.wrap_class = wrap_class.into();
    }
}

impl Default for ParserOptions {
    fn default() -> Self {
        Self::new(DEFAULT_WRAP_CLASS)
    }
}

/// The parser state a tag expansion can see and affect.
#[derive(Debug, Clone, Default)]
pub struct Parser {
    options: Option<ParserOptions>,
    tracking_categories: Vec<String>,
}

impl Parser {
    pub fn new(options: Option<ParserOptions>) -> Self {
        Self {
            options,
            tracking_categories: vec![],
        }
    }

    pub fn options(&self) -> Option<&ParserOptions> {
        self.options.as_ref()
    }

    pub fn options_mut(&mut self) -> Option<&mut ParserOptions> {
        self.options.as_mut()
    }

    /// The wrap class in effect, falling back to [`DEFAULT_WRAP_CLASS`].
    pub fn wrap_class(&self) -> &str {
        self.options
            .as_ref()
            .map_or(DEFAULT_WRAP_CLASS, ParserOptions::wrap_output_class)
    }

    pub fn add_tracking_category(&mut self, category: &str) {
        if !self.tracking_categories.iter().any(|c| c == category) {
            self.tracking_categories.push(category.to_string());
        }
    }

    pub fn tracking_categories(&self) -> &[String] {
        &self.tracking_categories
    }
}

/// The page a tag is expanded on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    title: String,
}

impl Frame {
    pub fn new(title: impl Into<String>) -> Self {
        Self { title: title.into() }
    }

    pub fn title(&self) -> &str {
        &self.title
    }
}

/// Renders one tag occurrence.
pub trait TagHandler: Send + Sync {
    /// Render the tag with body `text` and attributes `params`.
    fn handle_tag(
        &self,
        text: Option<&str>,
        params: &HashMap<String, String>,
        parser: &mut Parser,
        frame: &Frame,
    ) -> Result<String>;
}

/// An inline error, marking the page with [`PAGE_ERROR_CATEGORY`].
pub fn format_tag_error(parser: &mut Parser, message: &str) -> String {
    parser.add_tracking_category(PAGE_ERROR_CATEGORY);
    format!("<strong class=\"error\">{}</strong>", escape_html(message))
}

fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            c => escaped.push(c),
        }
    }
    escaped
}

/// Renders the tag body as a sanitized `<style>` element scoped to the
/// parser's wrap class.
#[derive(Debug, Clone)]
pub struct TemplateStylesTag {
    sanitizer: Arc<StylesheetSanitizer>,
}

impl TemplateStylesTag {
    pub fn new(sanitizer: Arc<StylesheetSanitizer>) -> Self {
        Self { sanitizer }
    }
}

impl TagHandler for TemplateStylesTag {
    fn handle_tag(
        &self,
        text: Option<&str>,
        _: &HashMap<String, String>,
        parser: &mut Parser,
        frame: &Frame,
    ) -> Result<String> {
        let Some(text) = text.filter(|t| !t.trim().is_empty()) else {
            return Ok(format_tag_error(parser, "TemplateStyles' stylesheet must not be empty."));
        };

        let sanitized = self.sanitizer.sanitize(text, parser.wrap_class());
        if !sanitized.is_clean() {
            tracing::debug!(
                target: targets::HOOKS,
                title = frame.title(),
                errors = sanitized.errors.len(),
                "stylesheet had problems"
            );
            parser.add_tracking_category(STYLESHEET_ERROR_CATEGORY);
        }

        // A string token could still spell a closing tag.
        let css = sanitized.css.replace("</", "<\\/");
        Ok(format!("<style>{css}</style>"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::factory::MatcherFactory;
    use crate::sanitizer::StylePropertySanitizer;

    fn tag() -> TemplateStylesTag {
        let factory = MatcherFactory::new();
        TemplateStylesTag::new(Arc::new(StylesheetSanitizer::new(
            Arc::new(StylePropertySanitizer::new(&factory)),
            &factory,
        )))
    }

    fn render(parser: &mut Parser, text: Option<&str>) -> String {
        tag().handle_tag(text, &HashMap::new(), parser, &Frame::new("Template:Box"))
            .unwrap()
    }

    #[test]
    fn renders_scoped_styles() {
        let mut parser = Parser::new(Some(ParserOptions::new("box")));
        assert_eq!(render(&mut parser, Some("p { color: red }")), "<style>.box p{color:red}</style>");
        assert!(parser.tracking_categories().is_empty());
    }

    #[test]
    fn default_wrap_class_without_options() {
        let mut parser = Parser::new(None);
        assert_eq!(
            render(&mut parser, Some("p { color: red }")),
            "<style>.mw-parser-output p{color:red}</style>"
        );
    }

    #[test]
    fn empty_body_is_an_inline_error() {
        let mut parser = Parser::default();
        let out = render(&mut parser, None);
        assert!(out.starts_with("<strong class=\"error\">"));
        assert_eq!(parser.tracking_categories(), [PAGE_ERROR_CATEGORY]);
    }

    #[test]
    fn stylesheet_problems_are_tracked() {
        let mut parser = Parser::default();
        render(&mut parser, Some("p { color: nope }"));
        render(&mut parser, Some("p { color: nope }"));
        assert_eq!(parser.tracking_categories(), [STYLESHEET_ERROR_CATEGORY]);
    }

    #[test]
    fn closing_tags_are_escaped() {
        let mut parser = Parser::default();
        let out = render(&mut parser, Some("p { font-family: '</style><script>' }"));
        assert!(!out.contains("</style><script>"));
    }

    #[test]
    fn error_messages_are_escaped() {
        let mut parser = Parser::default();
        assert_eq!(
            format_tag_error(&mut parser, "<b> & \"c\""),
            "<strong class=\"error\">&lt;b&gt; &amp; &quot;c&quot;</strong>"
        );
    }
}
