//! Placeholder value formatting.
//!
//! Formatting a resolved value is the only step of rendering that can fail, so
//! it returns a [`Result`]. The renderer collapses an `Err` to an empty
//! substitution after logging it; see [`crate::Template::render`].

use serde_json::{Number, Value};
use thiserror::Error;

use crate::escape::escape_value;
use crate::template::PlaceholderKind;

/// Deepest array/object nesting that [`stringify`] will walk.
pub const MAX_STRINGIFY_DEPTH: usize = 128;

/// Failure while turning a resolved value into output text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormatError {
    /// The value nests arrays or objects deeper than [`MAX_STRINGIFY_DEPTH`].
    #[error("value nests deeper than {limit} levels")]
    TooDeep { limit: usize },
}

/// Converts a value to its display text.
///
/// - strings render verbatim, booleans as `true`/`false`
/// - numbers with an integral value render without a fraction (`3.0` → `3`)
/// - arrays render their elements joined by `,`; `null` elements are empty
/// - objects render as compact JSON
/// - `null` renders as the empty string
///
/// # Example
///
/// ```rust
/// use stencil::format::stringify;
/// use serde_json::json;
///
/// assert_eq!(stringify(&json!(3.0)).unwrap(), "3");
/// assert_eq!(stringify(&json!([1, null, "x"])).unwrap(), "1,,x");
/// ```
pub fn stringify(value: &Value) -> Result<String, FormatError> {
    let mut out = String::new();
    write_value(&mut out, value, 0)?;
    Ok(out)
}

fn write_value(out: &mut String, value: &Value, depth: usize) -> Result<(), FormatError> {
    if depth > MAX_STRINGIFY_DEPTH {
        return Err(FormatError::TooDeep {
            limit: MAX_STRINGIFY_DEPTH,
        });
    }

    match value {
        Value::Null => {}
        Value::Bool(b) => out.push_str(if *b { "true" } else { "false" }),
        Value::Number(n) => out.push_str(&format_number(n)),
        Value::String(s) => out.push_str(s),
        Value::Array(items) => {
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                write_value(out, item, depth + 1)?;
            }
        }
        Value::Object(_) => {
            if nesting_depth(value) > MAX_STRINGIFY_DEPTH - depth {
                return Err(FormatError::TooDeep {
                    limit: MAX_STRINGIFY_DEPTH,
                });
            }
            out.push_str(&value.to_string());
        }
    }

    Ok(())
}

fn nesting_depth(value: &Value) -> usize {
    let mut max = 0;
    let mut stack = vec![(value, 0usize)];
    while let Some((v, d)) = stack.pop() {
        max = max.max(d);
        match v {
            Value::Array(items) => stack.extend(items.iter().map(|i| (i, d + 1))),
            Value::Object(map) => stack.extend(map.values().map(|i| (i, d + 1))),
            _ => {}
        }
    }
    max
}

fn format_number(n: &Number) -> String {
    if n.is_f64() {
        if let Some(f) = n.as_f64() {
            if f.fract() == 0.0 && f.abs() < 1e21 {
                // -0.0 displays as "-0"
                if f == 0.0 {
                    return "0".to_string();
                }
                // Shortest round-trip digits, zero-padded: 2^60 is 1152921504606847000
                return format!("{}", f);
            }
        }
    }
    n.to_string()
}

/// Formats a resolved placeholder value for the given placeholder kind.
///
/// Absent and `null` values format as the empty string for both kinds.
pub fn format_placeholder(
    kind: PlaceholderKind,
    value: Option<&Value>,
) -> Result<String, FormatError> {
    match kind {
        PlaceholderKind::Escape => escape_value(value),
        PlaceholderKind::Interpolate => match value {
            None | Some(Value::Null) => Ok(String::new()),
            Some(v) => stringify(v),
        },
    }
}
