//! Error types for the extender.

use std::path::PathBuf;

/// Result type alias for extender operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while configuring or running the extender.
///
/// Rejected CSS is not an error: sanitizers report it as
/// [`SanitizationError`](crate::sanitizer::SanitizationError) data and keep
/// going.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A configuration value is missing or has the wrong type.
    #[error("Could not get config for \"$wg{key}\". {message}")]
    Config { key: String, message: String },

    /// A configuration document failed to parse.
    #[error("Invalid configuration: {0}")]
    Toml(#[from] toml::de::Error),

    /// File I/O error.
    #[error("Failed to read '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A tag scanning pattern failed to compile.
    #[error("Invalid pattern: {0}")]
    Regex(#[from] regex::Error),

    /// The user may not use the requested feature.
    #[error("User '{user}' lacks the '{permission}' permission required to unscope styles")]
    PermissionDenied { user: String, permission: String },

    /// The delegate tag handler failed.
    #[error("Failed to render styles: {0}")]
    Render(String),
}

impl Error {
    /// Create a configuration error.
    pub fn config(key: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Config {
            key: key.into(),
            message: message.into(),
        }
    }

    /// Create an I/O error.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Create a permission error.
    pub fn permission_denied(user: impl Into<String>, permission: impl Into<String>) -> Self {
        Self::PermissionDenied {
            user: user.into(),
            permission: permission.into(),
        }
    }

    /// Create a rendering error.
    pub fn render(message: impl Into<String>) -> Self {
        Self::Render(message.into())
    }

    /// Whether this error blocks a save for lack of permission.
    pub fn is_permission_denied(&self) -> bool {
        matches!(self, Self::PermissionDenied { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_message_names_the_setting() {
        let error = Error::config("TemplateStylesExtenderUnscopingPermission", "Not set.");
        assert_eq!(
            error.to_string(),
            "Could not get config for \"$wgTemplateStylesExtenderUnscopingPermission\". Not set."
        );
    }

    #[test]
    fn permission_errors_are_detectable() {
        assert!(Error::permission_denied("Alice", "editinterface").is_permission_denied());
        assert!(!Error::render("boom").is_permission_denied());
    }
}
