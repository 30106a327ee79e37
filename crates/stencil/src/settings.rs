//! Template configuration.
//!
//! [`TemplateSettings`] fixes the delimiter patterns and the [`Denylist`] used
//! by every template compiled with it. Settings can be built in code or loaded
//! from YAML/JSON:
//!
//! ```rust
//! use stencil::TemplateSettings;
//!
//! let settings = TemplateSettings::from_yaml(r#"
//! escape: '\{\{-(.+?)\}\}'
//! interpolate: '\{\{=(.+?)\}\}'
//! denylist: [password, token]
//! "#).unwrap();
//!
//! assert_eq!(settings.escape_pattern(), Some(r"\{\{-(.+?)\}\}"));
//! assert!(settings.denylist().matches_exact("token"));
//! ```
//!
//! Missing keys keep their defaults. A key set to `null` disables that
//! placeholder kind. Patterns are validated when a template is compiled, not
//! when settings are loaded.

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::resolve::Denylist;

/// Default escape delimiter: `<%- expr %>`.
pub const DEFAULT_ESCAPE: &str = r"<%-([\s\S]+?)%>";

/// Default interpolate delimiter: `<%= expr %>`.
pub const DEFAULT_INTERPOLATE: &str = r"<%=([\s\S]+?)%>";

/// Delimiter patterns and path policy for compiling templates.
///
/// Each pattern is a regular expression whose first capture group holds the
/// placeholder expression. When both patterns match at the same position the
/// escape pattern wins.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TemplateSettings {
    escape: Option<String>,
    interpolate: Option<String>,
    denylist: Denylist,
}

impl TemplateSettings {
    /// Creates settings with the default delimiters and denylist.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses settings from YAML.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Parses settings from JSON.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json)
            .map_err(|e| crate::TemplateError::InvalidSettings(e.to_string()))
    }

    /// Sets the escape delimiter pattern.
    pub fn escape(mut self, pattern: impl Into<String>) -> Self {
        self.escape = Some(pattern.into());
        self
    }

    /// Sets the interpolate delimiter pattern.
    pub fn interpolate(mut self, pattern: impl Into<String>) -> Self {
        self.interpolate = Some(pattern.into());
        self
    }

    /// Disables escape placeholders; their markers render as literal text.
    pub fn without_escape(mut self) -> Self {
        self.escape = None;
        self
    }

    /// Disables interpolate placeholders; their markers render as literal text.
    pub fn without_interpolate(mut self) -> Self {
        self.interpolate = None;
        self
    }

    /// Replaces the denylist.
    pub fn with_denylist(mut self, denylist: Denylist) -> Self {
        self.denylist = denylist;
        self
    }

    pub fn escape_pattern(&self) -> Option<&str> {
        self.escape.as_deref()
    }

    pub fn interpolate_pattern(&self) -> Option<&str> {
        self.interpolate.as_deref()
    }

    pub fn denylist(&self) -> &Denylist {
        &self.denylist
    }
}

impl Default for TemplateSettings {
    fn default() -> Self {
        Self {
            escape: Some(DEFAULT_ESCAPE.to_string()),
            interpolate: Some(DEFAULT_INTERPOLATE.to_string()),
            denylist: Denylist::default(),
        }
    }
}
