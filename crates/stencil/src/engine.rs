//! Named template registry.
//!
//! [`Engine`] compiles templates once with shared [`TemplateSettings`] and
//! keeps them under a name for repeated rendering. The delimiter patterns are
//! validated when the engine is created, so adding a template cannot fail.
//!
//! # Example
//!
//! ```rust
//! use stencil::Engine;
//! use serde_json::json;
//!
//! let mut engine = Engine::new();
//! engine.add_template("greeting", "Hello, <%- name %>!");
//!
//! let output = engine.render_named("greeting", &json!({"name": "<Ann>"})).unwrap();
//! assert_eq!(output, "Hello, &lt;Ann&gt;!");
//! ```

use std::collections::HashMap;

use once_cell::sync::Lazy;
use serde::Serialize;
use serde_json::Value;

use crate::error::{Result, TemplateError};
use crate::settings::TemplateSettings;
use crate::template::{Scanner, Template};

static DEFAULT_SCANNER: Lazy<Scanner> = Lazy::new(|| {
    Scanner::new(&TemplateSettings::default()).expect("default delimiter patterns are valid")
});

/// A set of named templates compiled with the same settings.
#[derive(Debug, Clone)]
pub struct Engine {
    settings: TemplateSettings,
    scanner: Scanner,
    templates: HashMap<String, Template>,
}

impl Engine {
    /// Creates an engine with the default settings.
    pub fn new() -> Self {
        Self {
            settings: TemplateSettings::default(),
            scanner: (*DEFAULT_SCANNER).clone(),
            templates: HashMap::new(),
        }
    }

    /// Creates an engine with custom settings.
    ///
    /// # Errors
    ///
    /// Returns an error if a delimiter pattern is invalid or lacks a capture
    /// group.
    pub fn with_settings(settings: TemplateSettings) -> Result<Self> {
        let scanner = Scanner::new(&settings)?;
        Ok(Self {
            settings,
            scanner,
            templates: HashMap::new(),
        })
    }

    pub fn settings(&self) -> &TemplateSettings {
        &self.settings
    }

    /// Compiles a template without registering it.
    pub fn compile(&self, source: &str) -> Template {
        self.scanner.compile(source)
    }

    /// Compiles and registers a template, replacing any previous one with the
    /// same name.
    pub fn add_template(&mut self, name: &str, source: &str) {
        let template = self.compile(source);
        self.templates.insert(name.to_string(), template);
    }

    /// Removes a template, returning it if it was registered.
    pub fn remove_template(&mut self, name: &str) -> Option<Template> {
        self.templates.remove(name)
    }

    pub fn has_template(&self, name: &str) -> bool {
        self.templates.contains_key(name)
    }

    pub fn get(&self, name: &str) -> Option<&Template> {
        self.templates.get(name)
    }

    /// Registered template names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.templates.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Renders a registered template.
    ///
    /// # Errors
    ///
    /// Returns [`TemplateError::TemplateNotFound`] if no template has that
    /// name. Rendering itself does not fail.
    pub fn render_named(&self, name: &str, data: &Value) -> Result<String> {
        let template = self
            .templates
            .get(name)
            .ok_or_else(|| TemplateError::TemplateNotFound(name.to_string()))?;
        Ok(template.render(data))
    }

    /// Serializes `data` and renders a registered template with it.
    pub fn render_named_serialize<T: Serialize + ?Sized>(
        &self,
        name: &str,
        data: &T,
    ) -> Result<String> {
        let value = serde_json::to_value(data)?;
        self.render_named(name, &value)
    }

    /// Compiles and renders a one-off template.
    pub fn render_template(&self, source: &str, data: &Value) -> String {
        self.compile(source).render(data)
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}
