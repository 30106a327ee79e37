//! Template compilation and rendering.
//!
//! A template is scanned exactly once, when it is compiled. Scanning splits the
//! source into [`Token`]s: literal text, copied verbatim, and placeholders,
//! which name a value in the render data.
//!
//! ```text
//! Source: Hello <%= name %>, <%- bio %>!
//! Tokens: Literal("Hello ") Interpolate(" name ") Literal(", ")
//!         Escape(" bio ") Literal("!")
//! ```
//!
//! The compiled [`Template`] is immutable. Rendering walks the tokens with
//! fresh data each time and never fails: a placeholder that cannot be resolved
//! or formatted renders as the empty string.
//!
//! # Example
//!
//! ```rust
//! use stencil::{compile_template, TemplateSettings};
//! use serde_json::json;
//!
//! let template = compile_template(
//!     "Hello <%= name %>, <%- bio %>!",
//!     &TemplateSettings::default(),
//! ).unwrap();
//!
//! let output = template.render(&json!({"name": "Ann", "bio": "<b>hi</b>"}));
//! assert_eq!(output, "Hello Ann, &lt;b&gt;hi&lt;/b&gt;!");
//! ```

use std::fmt;
use std::ops::Range;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::{Result, TemplateError};
use crate::format::{format_placeholder, FormatError};
use crate::resolve::{resolve, Denylist};
use crate::settings::TemplateSettings;

static EMPTY_DATA: Lazy<Value> = Lazy::new(|| Value::Object(Map::new()));

/// How a placeholder's value is written to the output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlaceholderKind {
    /// HTML-escaped output (`<%- expr %>` by default).
    Escape,
    /// Raw output (`<%= expr %>` by default).
    Interpolate,
}

impl fmt::Display for PlaceholderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlaceholderKind::Escape => write!(f, "escape"),
            PlaceholderKind::Interpolate => write!(f, "interpolate"),
        }
    }
}

/// A piece of a compiled template.
///
/// `span` is the byte range the token covers in the template source. Spans of
/// consecutive tokens are adjacent and together cover the whole source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// Text copied to the output unchanged.
    Literal { text: String, span: Range<usize> },
    /// A value looked up in the render data.
    Placeholder {
        kind: PlaceholderKind,
        /// The expression text exactly as captured by the delimiter pattern.
        expr: String,
        span: Range<usize>,
    },
}

impl Token {
    pub fn span(&self) -> Range<usize> {
        match self {
            Token::Literal { span, .. } | Token::Placeholder { span, .. } => span.clone(),
        }
    }

    pub fn is_placeholder(&self) -> bool {
        matches!(self, Token::Placeholder { .. })
    }
}

/// Combined delimiter matcher built from [`TemplateSettings`].
///
/// All enabled delimiter patterns are joined into one alternation, escape
/// first, followed by an end-of-text anchor. `groups` records which capture
/// group of the combined regex holds the expression for each kind.
#[derive(Debug, Clone)]
pub(crate) struct Scanner {
    regex: Regex,
    groups: Vec<(PlaceholderKind, usize)>,
    denylist: Denylist,
}

impl Scanner {
    pub(crate) fn new(settings: &TemplateSettings) -> Result<Self> {
        let kinds = [
            (PlaceholderKind::Escape, settings.escape_pattern()),
            (PlaceholderKind::Interpolate, settings.interpolate_pattern()),
        ];

        let mut alternatives = Vec::new();
        let mut groups = Vec::new();
        let mut next_group = 1;
        let mut last_kind = PlaceholderKind::Escape;

        for (kind, pattern) in kinds {
            let Some(pattern) = pattern else { continue };

            let single = Regex::new(pattern)
                .map_err(|source| TemplateError::InvalidPattern { kind, source })?;
            let captures = single.captures_len() - 1;
            if captures == 0 {
                return Err(TemplateError::MissingCaptureGroup { kind });
            }

            alternatives.push(format!("(?:{})", pattern));
            groups.push((kind, next_group));
            next_group += captures;
            last_kind = kind;
        }

        alternatives.push("$".to_string());
        let regex = Regex::new(&alternatives.join("|")).map_err(|source| {
            TemplateError::InvalidPattern {
                kind: last_kind,
                source,
            }
        })?;

        Ok(Self {
            regex,
            groups,
            denylist: settings.denylist().clone(),
        })
    }

    /// Splits `source` into tokens and returns the compiled template.
    pub(crate) fn compile(&self, source: &str) -> Template {
        let mut tokens = Vec::new();
        let mut index = 0;

        for caps in self.regex.captures_iter(source) {
            let Some(whole) = caps.get(0) else { continue };

            let fired = self
                .groups
                .iter()
                .find_map(|&(kind, group)| caps.get(group).map(|m| (kind, m.as_str())));

            // The end anchor and other empty matches produce no placeholder.
            let Some((kind, expr)) = fired else { continue };

            if whole.start() > index {
                tokens.push(Token::Literal {
                    text: source[index..whole.start()].to_string(),
                    span: index..whole.start(),
                });
            }
            tokens.push(Token::Placeholder {
                kind,
                expr: expr.to_string(),
                span: whole.range(),
            });
            index = whole.end();
        }

        if index < source.len() {
            tokens.push(Token::Literal {
                text: source[index..].to_string(),
                span: index..source.len(),
            });
        }

        log::debug!(
            "compiled template: {} tokens, {} placeholders",
            tokens.len(),
            tokens.iter().filter(|t| t.is_placeholder()).count()
        );

        Template {
            source: source.to_string(),
            tokens,
            denylist: self.denylist.clone(),
        }
    }
}

/// Compiles a template with the given settings.
///
/// The only errors are configuration errors: an invalid delimiter pattern, or
/// a pattern without a capture group for the expression.
pub fn compile_template(source: &str, settings: &TemplateSettings) -> Result<Template> {
    Ok(Scanner::new(settings)?.compile(source))
}

/// A compiled, reusable template.
///
/// `Template` holds no mutable state, so one instance can be rendered from
/// many threads at once.
#[derive(Debug, Clone)]
pub struct Template {
    source: String,
    tokens: Vec<Token>,
    denylist: Denylist,
}

impl Template {
    /// Compiles `source` with the default settings.
    pub fn new(source: &str) -> Result<Self> {
        compile_template(source, &TemplateSettings::default())
    }

    /// Renders the template with the given data.
    ///
    /// `null` data is treated as an empty object. Placeholders whose path is
    /// missing, dangling or denylisted render as the empty string, as do
    /// placeholders whose value fails to format; the latter are logged.
    pub fn render(&self, data: &Value) -> String {
        let data = if data.is_null() { &*EMPTY_DATA } else { data };
        let mut out = String::with_capacity(self.source.len());

        for token in &self.tokens {
            match token {
                Token::Literal { text, .. } => out.push_str(text),
                Token::Placeholder { kind, expr, .. } => {
                    match self.render_placeholder(*kind, expr, data) {
                        Ok(text) => out.push_str(&text),
                        Err(err) => log::error!(
                            "template error in {} expression {:?}: {}",
                            kind,
                            expr,
                            err
                        ),
                    }
                }
            }
        }

        out
    }

    /// Serializes `data` to JSON and renders with it.
    ///
    /// Only the serialization step can fail.
    pub fn render_serialize<T: Serialize + ?Sized>(&self, data: &T) -> Result<String> {
        let value = serde_json::to_value(data)?;
        Ok(self.render(&value))
    }

    fn render_placeholder(
        &self,
        kind: PlaceholderKind,
        expr: &str,
        data: &Value,
    ) -> std::result::Result<String, FormatError> {
        if expr.is_empty() {
            return Ok(String::new());
        }
        format_placeholder(kind, resolve(data, expr, &self.denylist))
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    /// Iterates over the placeholder expressions in document order.
    pub fn placeholders(&self) -> impl Iterator<Item = (PlaceholderKind, &str)> {
        self.tokens.iter().filter_map(|t| match t {
            Token::Placeholder { kind, expr, .. } => Some((*kind, expr.as_str())),
            Token::Literal { .. } => None,
        })
    }
}
