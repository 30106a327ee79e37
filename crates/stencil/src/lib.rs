//! # Stencil - Injection-Safe String Templates
//!
//! `stencil` renders templates whose placeholders can only read values out of
//! the data they are given. There is no expression language: a placeholder
//! holds a dotted/indexed path such as `user.emails[0]`, and paths that touch
//! a denylisted identifier resolve to nothing.
//!
//! ## Placeholders
//!
//! | Syntax | Output |
//! |--------|--------|
//! | `<%- path %>` | value, HTML-escaped |
//! | `<%= path %>` | value, unescaped |
//!
//! Missing, `null` and refused values render as the empty string. Rendering
//! never returns an error.
//!
//! ## Quick Start
//!
//! ```rust
//! use stencil::{compile_template, TemplateSettings};
//! use serde_json::json;
//!
//! let template = compile_template(
//!     "<h1><%- title %></h1><p><%= body %></p>",
//!     &TemplateSettings::default(),
//! ).unwrap();
//!
//! let html = template.render(&json!({
//!     "title": "Tom & Jerry",
//!     "body": "<em>trusted</em>",
//! }));
//! assert_eq!(html, "<h1>Tom &amp; Jerry</h1><p><em>trusted</em></p>");
//! ```
//!
//! ## Core Concepts
//!
//! - [`escape_html`]: escape the six HTML-reserved characters
//! - [`resolve`]: look up a path in a JSON value, honoring a [`Denylist`]
//! - [`compile_template`]: scan a template once into a reusable [`Template`]
//! - [`TemplateSettings`]: delimiter patterns and denylist, loadable from YAML/JSON
//! - [`Engine`]: named templates sharing one set of settings
//!
//! ## Logging
//!
//! Diagnostics go through the [`log`](https://docs.rs/log) facade: refused
//! paths are logged at `warn`, placeholder values that fail to format at
//! `error`. Install any `log` backend to see them.

pub mod engine;
mod error;
pub mod escape;
pub mod format;
pub mod resolve;
pub mod settings;
pub mod template;

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub use engine::Engine;
pub use error::{Result, TemplateError};
pub use escape::{escape_html, escape_value};
pub use format::FormatError;
pub use resolve::{resolve, Denylist, DEFAULT_DENYLIST};
pub use settings::{TemplateSettings, DEFAULT_ESCAPE, DEFAULT_INTERPOLATE};
pub use template::{compile_template, PlaceholderKind, Template, Token};
