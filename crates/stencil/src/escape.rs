//! HTML escaping for placeholder output.
//!
//! Six characters are reserved: `&`, `<`, `>`, `"`, `'` and `` ` ``. Each maps
//! to an entity that is safe inside element content and quoted attributes.
//!
//! Escaping is not idempotent: entities contain `&`, so escaping an already
//! escaped string escapes it again.

use std::borrow::Cow;

use serde_json::Value;

use crate::format::{stringify, FormatError};

fn is_reserved(c: char) -> bool {
    matches!(c, '&' | '<' | '>' | '"' | '\'' | '`')
}

fn entity(c: char) -> Option<&'static str> {
    match c {
        '&' => Some("&amp;"),
        '<' => Some("&lt;"),
        '>' => Some("&gt;"),
        '"' => Some("&quot;"),
        '\'' => Some("&#x27;"),
        '`' => Some("&#x60;"),
        _ => None,
    }
}

/// Escapes a string for embedding in HTML.
///
/// Returns the input borrowed when it contains no reserved character, so the
/// common case does not allocate.
///
/// # Example
///
/// ```rust
/// use stencil::escape_html;
///
/// assert_eq!(escape_html("plain"), "plain");
/// assert_eq!(escape_html("<b>\"hi\"</b>"), "&lt;b&gt;&quot;hi&quot;&lt;/b&gt;");
/// ```
pub fn escape_html(input: &str) -> Cow<'_, str> {
    if !input.contains(is_reserved) {
        return Cow::Borrowed(input);
    }

    let mut out = String::with_capacity(input.len() + input.len() / 4);
    for c in input.chars() {
        match entity(c) {
            Some(e) => out.push_str(e),
            None => out.push(c),
        }
    }
    Cow::Owned(out)
}

/// Stringifies and escapes a resolved value.
///
/// Absent and `null` values become the empty string.
pub fn escape_value(value: Option<&Value>) -> Result<String, FormatError> {
    match value {
        None | Some(Value::Null) => Ok(String::new()),
        Some(v) => {
            let text = stringify(v)?;
            Ok(escape_html(&text).into_owned())
        }
    }
}
