//! Permission-gated replacement of the wrap class.
//!
//! A `<templatestyles wrapclass="...">` tag asks for its styles to be scoped
//! under a different class than the default. At render time the last editor
//! of the page must hold the configured permission, otherwise the tag renders
//! with the default class after an inline error. At save time a user without
//! the permission cannot store such a tag at all.

use std::collections::HashMap;
use std::ops::{Deref, DerefMut};
use std::sync::Arc;

use regex::Regex;

use super::tag::{Frame, Parser, TagHandler, format_tag_error};
use crate::config::ExtenderConfig;
use crate::{Error, Result, targets};

/// The tag attribute holding the requested class.
pub const WRAP_CLASS_PARAM: &str = "wrapclass";

const NO_PERMISSION_MESSAGE: &str = "You do not have the permission to unscope styles.";

/// Host permission checks.
pub trait PermissionManager: Send + Sync {
    /// Whether `user` holds `right` globally.
    fn user_has_right(&self, user: &str, right: &str) -> bool;

    /// Whether `user` may exercise `right` on the page `title`.
    fn user_can(&self, right: &str, user: &str, title: &str) -> bool;
}

/// The parts of a page revision the gate needs.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Revision {
    /// The editor, if it is visible.
    pub user: Option<String>,
}

/// Host revision storage.
pub trait RevisionLookup: Send + Sync {
    /// The current revision of `title`.
    fn revision_by_title(&self, title: &str) -> Option<Revision>;
}

/// An unscoping request for one tag expansion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnscopeRequest {
    pub wrap_class: String,
    pub user: String,
    pub permitted: bool,
}

/// Decides who may unscope styles.
pub struct UnscopeGate {
    enabled: bool,
    permission: String,
    permissions: Arc<dyn PermissionManager>,
    wrap_class_tag: Regex,
}

impl std::fmt::Debug for UnscopeGate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UnscopeGate")
            .field("enabled", &self.enabled)
            .field("permission", &self.permission)
            .finish_non_exhaustive()
    }
}

impl UnscopeGate {
    pub fn new(config: &ExtenderConfig, permissions: Arc<dyn PermissionManager>) -> Result<Self> {
        Ok(Self {
            enabled: config.enable_unscoping_support,
            permission: config.unscoping_permission.clone(),
            permissions,
            wrap_class_tag: Regex::new(concat!(
                r"(?i)<templatestyles\b[^>]*\bwrapclass\s*=",
                r"|\{\{\s*#tag\s*:\s*templatestyles\s*\|(?:[^{}]|\{[^{}]*\})*?\bwrapclass\s*=",
            ))?,
        })
    }

    pub fn enabled(&self) -> bool {
        self.enabled
    }

    pub fn permission(&self) -> &str {
        &self.permission
    }

    pub fn is_user_allowed(&self, user: &str, title: &str) -> bool {
        self.permissions.user_has_right(user, &self.permission)
            || self.permissions.user_can(&self.permission, user, title)
    }

    /// Whether `text` contains a `<templatestyles>` tag, or a
    /// `{{#tag:templatestyles|...}}` call, with a `wrapclass` attribute.
    pub fn requests_unscoping(&self, text: &str) -> bool {
        self.wrap_class_tag.is_match(text)
    }

    /// Reject a save of `text` by `user` that would add unscoped styles
    /// without permission.
    pub fn on_attempt_save(&self, text: &str, user: &str, title: &str) -> Result<()> {
        if !self.enabled || !self.requests_unscoping(text) || self.is_user_allowed(user, title) {
            return Ok(());
        }
        tracing::debug!(target: targets::HOOKS, user, title, "rejecting save with unscoped styles");
        Err(Error::permission_denied(user, &self.permission))
    }
}

/// Sets a wrap class on a parser and restores the previous one when dropped.
pub struct ScopedWrapClass<'a> {
    parser: &'a mut Parser,
    previous: Option<String>,
}

impl<'a> ScopedWrapClass<'a> {
    pub fn new(parser: &'a mut Parser, wrap_class: &str) -> Self {
        let previous = parser.options_mut().map(|options| {
            let previous = options.wrap_output_class().to_string();
            options.set_wrap_output_class(wrap_class);
            previous
        });
        Self { parser, previous }
    }
}

impl Deref for ScopedWrapClass<'_> {
    type Target = Parser;

    fn deref(&self) -> &Parser {
        &*self.parser
    }
}

impl DerefMut for ScopedWrapClass<'_> {
    fn deref_mut(&mut self) -> &mut Parser {
        &mut *self.parser
    }
}

impl Drop for ScopedWrapClass<'_> {
    fn drop(&mut self) {
        if let (Some(previous), Some(options)) = (self.previous.take(), self.parser.options_mut()) {
            options.set_wrap_output_class(previous);
        }
    }
}

/// Wraps a tag handler, honoring `wrapclass` for permitted editors.
pub struct UnscopingTagHandler<D> {
    delegate: D,
    gate: Arc<UnscopeGate>,
    revisions: Arc<dyn RevisionLookup>,
}

impl<D: TagHandler> UnscopingTagHandler<D> {
    pub fn new(delegate: D, gate: Arc<UnscopeGate>, revisions: Arc<dyn RevisionLookup>) -> Self {
        Self {
            delegate,
            gate,
            revisions,
        }
    }

    pub fn delegate(&self) -> &D {
        &self.delegate
    }

    /// The unscoping request of a tag, if it makes one that can be checked.
    pub fn request(
        &self,
        params: &HashMap<String, String>,
        parser: &Parser,
        frame: &Frame,
    ) -> Option<UnscopeRequest> {
        let wrap_class = params.get(WRAP_CLASS_PARAM)?;
        if !self.gate.enabled() || parser.options().is_none() {
            return None;
        }

        let Some(revision) = self.revisions.revision_by_title(frame.title()) else {
            tracing::warn!(target: targets::HOOKS, title = frame.title(), "no revision for page");
            return None;
        };
        let Some(user) = revision.user else {
            tracing::warn!(target: targets::HOOKS, title = frame.title(), "revision has no visible editor");
            return None;
        };

        let permitted = self.gate.is_user_allowed(&user, frame.title());
        Some(UnscopeRequest {
            wrap_class: wrap_class.clone(),
            user,
            permitted,
        })
    }
}

impl<D: TagHandler> TagHandler for UnscopingTagHandler<D> {
    fn handle_tag(
        &self,
        text: Option<&str>,
        params: &HashMap<String, String>,
        parser: &mut Parser,
        frame: &Frame,
    ) -> Result<String> {
        let Some(request) = self.request(params, parser, frame) else {
            return self.delegate.handle_tag(text, params, parser, frame);
        };

        if !request.permitted {
            tracing::debug!(target: targets::HOOKS, user = %request.user, title = frame.title(), "unscoping denied");
            let error = format_tag_error(parser, NO_PERMISSION_MESSAGE);
            let output = self.delegate.handle_tag(text, params, parser, frame)?;
            return Ok(error + &output);
        }

        let mut scoped = ScopedWrapClass::new(parser, &request.wrap_class);
        self.delegate.handle_tag(text, params, &mut scoped, frame)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hooks::tag::ParserOptions;

    struct Rights(&'static [&'static str]);

    impl PermissionManager for Rights {
        fn user_has_right(&self, user: &str, _: &str) -> bool {
            self.0.contains(&user)
        }

        fn user_can(&self, _: &str, _: &str, _: &str) -> bool {
            false
        }
    }

    struct Editor(Option<&'static str>);

    impl RevisionLookup for Editor {
        fn revision_by_title(&self, _: &str) -> Option<Revision> {
            Some(Revision {
                user: self.0.map(str::to_string),
            })
        }
    }

    /// Echoes the wrap class it sees; fails on the body `fail`.
    struct Echo;

    impl TagHandler for Echo {
        fn handle_tag(
            &self,
            text: Option<&str>,
            _: &HashMap<String, String>,
            parser: &mut Parser,
            _: &Frame,
        ) -> Result<String> {
            if text == Some("fail") {
                return Err(Error::render("delegate failed"));
            }
            Ok(parser.wrap_class().to_string())
        }
    }

    fn gate(enabled: bool) -> Arc<UnscopeGate> {
        let config = ExtenderConfig {
            enable_unscoping_support: enabled,
            ..ExtenderConfig::default()
        };
        Arc::new(UnscopeGate::new(&config, Arc::new(Rights(&["Admin"]))).unwrap())
    }

    fn handler(enabled: bool, editor: Option<&'static str>) -> UnscopingTagHandler<Echo> {
        UnscopingTagHandler::new(Echo, gate(enabled), Arc::new(Editor(editor)))
    }

    fn params() -> HashMap<String, String> {
        HashMap::from([(WRAP_CLASS_PARAM.to_string(), "foo".to_string())])
    }

    fn parser() -> Parser {
        Parser::new(Some(ParserOptions::default()))
    }

    #[test]
    fn permitted_editor_unscopes_once() {
        let mut parser = parser();
        let frame = Frame::new("Template:Box");
        let out = handler(true, Some("Admin")).handle_tag(None, &params(), &mut parser, &frame).unwrap();
        assert_eq!(out, "foo");
        assert_eq!(parser.wrap_class(), "mw-parser-output");
    }

    #[test]
    fn denied_editor_gets_default_class() {
        let mut parser = parser();
        let frame = Frame::new("Template:Box");
        let out = handler(true, Some("Mallory")).handle_tag(None, &params(), &mut parser, &frame).unwrap();
        assert!(out.starts_with("<strong class=\"error\">"));
        assert!(out.ends_with("</strong>mw-parser-output"));
        assert!(!parser.tracking_categories().is_empty());
    }

    #[test]
    fn pass_through_cases() {
        let frame = Frame::new("Template:Box");

        let mut p = parser();
        let out = handler(false, Some("Admin")).handle_tag(None, &params(), &mut p, &frame).unwrap();
        assert_eq!(out, "mw-parser-output");

        let mut p = parser();
        let out = handler(true, Some("Admin")).handle_tag(None, &HashMap::new(), &mut p, &frame).unwrap();
        assert_eq!(out, "mw-parser-output");

        let mut p = Parser::new(None);
        let out = handler(true, Some("Admin")).handle_tag(None, &params(), &mut p, &frame).unwrap();
        assert_eq!(out, "mw-parser-output");

        let mut p = parser();
        let out = handler(true, None).handle_tag(None, &params(), &mut p, &frame).unwrap();
        assert_eq!(out, "mw-parser-output");
    }

    #[test]
    fn wrap_class_is_restored_when_the_delegate_fails() {
        let mut parser = parser();
        let frame = Frame::new("Template:Box");
        let result = handler(true, Some("Admin")).handle_tag(Some("fail"), &params(), &mut parser, &frame);
        assert!(result.is_err());
        assert_eq!(parser.wrap_class(), "mw-parser-output");
    }

    #[test]
    fn save_time_check() {
        let gate = gate(true);
        let text = "Intro <TemplateStyles src=\"Box.css\" wrapclass=\"mw-body\" />";

        let error = gate.on_attempt_save(text, "Mallory", "Template:Box").unwrap_err();
        assert!(error.is_permission_denied());
        assert!(gate.on_attempt_save(text, "Admin", "Template:Box").is_ok());
        assert!(gate.on_attempt_save("<templatestyles src=\"Box.css\" />", "Mallory", "Template:Box").is_ok());
        assert!(self::gate(false).on_attempt_save(text, "Mallory", "Template:Box").is_ok());
    }

    #[test]
    fn parser_function_form_requests_unscoping() {
        let gate = gate(true);

        for text in [
            "{{#tag:templatestyles||src=Box.css|wrapclass=mw-body}}",
            "{{ #TAG : TemplateStyles | p{color:red} | wrapclass = x }}",
        ] {
            assert!(gate.requests_unscoping(text), "{text}");
            assert!(gate.on_attempt_save(text, "Mallory", "Template:Box").is_err());
        }
        assert!(!gate.requests_unscoping("{{#tag:templatestyles||src=Box.css}}"));
        assert!(!gate.requests_unscoping("{{#tag:ref|wrapclass=x}}"));
    }
}
