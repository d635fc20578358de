//! Extender configuration.
//!
//! Settings use the host's key names. They can be read in one go from a TOML
//! document into an [`ExtenderConfig`], or resolved key by key from any
//! [`ConfigProvider`]; a missing or ill-typed key falls back to its default
//! with a warning.
//!
//! ```toml
//! TemplateStylesExtenderEnableUnscopingSupport = true
//! TemplateStylesExtenderUnscopingPermission = "edit-templatestyles"
//! ```

use std::collections::HashMap;
use std::path::Path;

use serde::Deserialize;
use serde::de::DeserializeOwned;

use crate::{Error, Result, targets};

/// Whether `wrapclass` may replace the default wrapper class.
pub const ENABLE_UNSCOPING_SUPPORT: &str = "TemplateStylesExtenderEnableUnscopingSupport";
/// The right a user needs to unscope styles.
pub const UNSCOPING_PERMISSION: &str = "TemplateStylesExtenderUnscopingPermission";
/// Whether `var()` is accepted inside property values.
pub const EXTEND_CUSTOM_PROPERTIES_VALUES: &str =
    "TemplateStylesExtenderExtendCustomPropertiesValues";
/// Whether `--*` declarations are accepted.
pub const CUSTOM_PROPERTIES_DECLARATION: &str = "TemplateStylesExtenderCustomPropertiesDeclaration";

/// Resolved extender settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ExtenderConfig {
    #[serde(rename = "TemplateStylesExtenderEnableUnscopingSupport")]
    pub enable_unscoping_support: bool,
    #[serde(rename = "TemplateStylesExtenderUnscopingPermission")]
    pub unscoping_permission: String,
    #[serde(rename = "TemplateStylesExtenderExtendCustomPropertiesValues")]
    pub extend_custom_properties_values: bool,
    #[serde(rename = "TemplateStylesExtenderCustomPropertiesDeclaration")]
    pub custom_properties_declaration: bool,
}

impl Default for ExtenderConfig {
    fn default() -> Self {
        Self {
            enable_unscoping_support: false,
            unscoping_permission: "editinterface".to_string(),
            extend_custom_properties_values: true,
            custom_properties_declaration: true,
        }
    }
}

impl ExtenderConfig {
    /// Parse a TOML document. Absent keys take their defaults; unrelated keys
    /// are ignored.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    /// Read and parse a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
        Self::from_toml_str(&text)
    }

    /// Resolve every setting through `provider`.
    pub fn from_provider(provider: &dyn ConfigProvider) -> Self {
        let defaults = Self::default();
        Self {
            enable_unscoping_support: get_config_value(
                provider,
                ENABLE_UNSCOPING_SUPPORT,
                defaults.enable_unscoping_support,
            ),
            unscoping_permission: get_config_value(
                provider,
                UNSCOPING_PERMISSION,
                defaults.unscoping_permission,
            ),
            extend_custom_properties_values: get_config_value(
                provider,
                EXTEND_CUSTOM_PROPERTIES_VALUES,
                defaults.extend_custom_properties_values,
            ),
            custom_properties_declaration: get_config_value(
                provider,
                CUSTOM_PROPERTIES_DECLARATION,
                defaults.custom_properties_declaration,
            ),
        }
    }
}

/// A source of raw configuration values.
pub trait ConfigProvider: Send + Sync {
    /// The value stored under `key`.
    fn get(&self, key: &str) -> Result<toml::Value>;
}

/// Look up `key` and convert it to `T`, returning `default` and logging a
/// warning when the lookup or the conversion fails.
pub fn get_config_value<T>(provider: &dyn ConfigProvider, key: &str, default: T) -> T
where
    T: DeserializeOwned,
{
    let value = provider.get(key).and_then(|value| {
        value
            .try_into::<T>()
            .map_err(|e| Error::config(key, e.to_string()))
    });
    match value {
        Ok(value) => value,
        Err(error) => {
            tracing::warn!(target: targets::CONFIG, %error, "falling back to default");
            default
        }
    }
}

/// Settings held in a TOML table.
#[derive(Debug, Clone, Default)]
pub struct TomlConfig {
    table: toml::Table,
}

impl TomlConfig {
    pub fn from_toml_str(text: &str) -> Result<Self> {
        Ok(Self {
            table: toml::from_str(text)?,
        })
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
        Self::from_toml_str(&text)
    }
}

impl ConfigProvider for TomlConfig {
    fn get(&self, key: &str) -> Result<toml::Value> {
        self.table
            .get(key)
            .cloned()
            .ok_or_else(|| Error::config(key, "No such setting."))
    }
}

/// Settings held in memory, as set by the host.
#[derive(Debug, Clone, Default)]
pub struct MapConfig {
    values: HashMap<String, toml::Value>,
}

impl MapConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `value` under `key`, replacing any previous value.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<toml::Value>) -> &mut Self {
        self.values.insert(key.into(), value.into());
        self
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<toml::Value>) -> Self {
        self.set(key, value);
        self
    }
}

impl ConfigProvider for MapConfig {
    fn get(&self, key: &str) -> Result<toml::Value> {
        self.values
            .get(key)
            .cloned()
            .ok_or_else(|| Error::config(key, "No such setting."))
    }
}
