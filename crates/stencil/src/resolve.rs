//! Restricted path resolution against template data.
//!
//! Placeholders name values with a small path grammar:
//!
//! ```text
//! path    = segment ( "." segment )*
//! segment = ident | ident "[" digits "]"
//! ```
//!
//! Bare single-segment paths may also contain `$`. Nothing else is evaluated:
//! there are no computed keys, calls or operators.
//!
//! # Denylist
//!
//! Resolution is refused for paths that touch a [`Denylist`] entry. Two checks
//! run:
//!
//! 1. A coarse substring check over the whole trimmed path. This rejects any
//!    path that merely contains a listed word, so a field named `processedAt`
//!    is refused because it contains `process`.
//! 2. An exact check of every segment (and of the identifier part of indexed
//!    segments) while walking the data.
//!
//! A refused path resolves to nothing and logs a warning.

use std::collections::BTreeSet;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;

static SIMPLE_PATH: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Za-z0-9_$]+$").unwrap());
static INDEXED_SEGMENT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([A-Za-z0-9_]+)\[([0-9]+)\]$").unwrap());

/// Identifiers refused by [`Denylist::default`].
pub const DEFAULT_DENYLIST: &[&str] = &[
    "constructor",
    "prototype",
    "__proto__",
    "window",
    "document",
    "global",
    "process",
    "eval",
    "Function",
];

/// Set of identifiers a path may not reference.
///
/// The default set blocks names commonly used to escape a data sandbox. Hosts
/// can extend or replace it through [`crate::TemplateSettings::with_denylist`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<String>", into = "Vec<String>")]
pub struct Denylist {
    entries: BTreeSet<String>,
}

impl Denylist {
    /// Creates an empty denylist that refuses nothing.
    pub fn empty() -> Self {
        Self {
            entries: BTreeSet::new(),
        }
    }

    /// Creates a denylist from the given identifiers.
    pub fn new<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            entries: entries
                .into_iter()
                .map(Into::<String>::into)
                .filter(|e| !e.is_empty())
                .collect(),
        }
    }

    /// Adds an identifier, returning the updated denylist.
    pub fn with(mut self, entry: impl Into<String>) -> Self {
        let entry = entry.into();
        if !entry.is_empty() {
            self.entries.insert(entry);
        }
        self
    }

    /// Returns `true` if any entry occurs anywhere inside `path`.
    pub fn matches_substring(&self, path: &str) -> bool {
        self.entries.iter().any(|e| path.contains(e.as_str()))
    }

    /// Returns `true` if `segment` is exactly one of the entries.
    pub fn matches_exact(&self, segment: &str) -> bool {
        self.entries.contains(segment)
    }

    /// Iterates over the entries in sorted order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl From<Vec<String>> for Denylist {
    fn from(entries: Vec<String>) -> Self {
        Self::new(entries)
    }
}

impl From<Denylist> for Vec<String> {
    fn from(list: Denylist) -> Self {
        list.entries.into_iter().collect()
    }
}

impl Default for Denylist {
    fn default() -> Self {
        Self::new(DEFAULT_DENYLIST.iter().copied())
    }
}

/// Resolves `path` against `data`.
///
/// Returns `None` when the path is refused by the denylist or any step of the
/// walk reaches a missing or `null` value. A single-segment path may resolve
/// to `Some(Value::Null)`; callers render both the same way.
///
/// # Example
///
/// ```rust
/// use stencil::{resolve, Denylist};
/// use serde_json::json;
///
/// let data = json!({"a": {"b": ["first", "second"]}});
/// let denylist = Denylist::default();
///
/// assert_eq!(resolve(&data, "a.b[0]", &denylist), Some(&json!("first")));
/// assert_eq!(resolve(&data, "a.missing.c", &denylist), None);
/// assert_eq!(resolve(&json!({"constructor": "x"}), "constructor", &denylist), None);
/// ```
pub fn resolve<'a>(data: &'a Value, path: &str, denylist: &Denylist) -> Option<&'a Value> {
    let path = path.trim();

    if denylist.matches_substring(path) {
        log::warn!("blocked access to denylisted path: {}", path);
        return None;
    }

    if SIMPLE_PATH.is_match(path) {
        return lookup(data, path);
    }

    let mut value = data;
    for part in path.split('.') {
        let part = part.trim();

        if denylist.matches_exact(part) {
            log::warn!("blocked access to denylisted segment: {}", part);
            return None;
        }

        value = match INDEXED_SEGMENT.captures(part) {
            Some(caps) => {
                let name = &caps[1];
                if denylist.matches_exact(name) {
                    log::warn!("blocked access to denylisted segment: {}", name);
                    return None;
                }
                let container = present(lookup(value, name))?;
                index(container, &caps[2])?
            }
            None => lookup(value, part)?,
        };

        if value.is_null() {
            return None;
        }
    }

    Some(value)
}

fn present(value: Option<&Value>) -> Option<&Value> {
    value.filter(|v| !v.is_null())
}

/// Looks up a property by name.
///
/// Arrays only answer to canonical decimal indices (`"3"`, never `"03"`).
fn lookup<'a>(value: &'a Value, key: &str) -> Option<&'a Value> {
    match value {
        Value::Object(map) => map.get(key),
        Value::Array(items) => {
            let i: usize = key.parse().ok()?;
            if i.to_string() != key {
                return None;
            }
            items.get(i)
        }
        _ => None,
    }
}

/// Applies a bracketed `[N]` index; `digits` may carry leading zeros.
fn index<'a>(value: &'a Value, digits: &str) -> Option<&'a Value> {
    let i: usize = digits.parse().ok()?;
    match value {
        Value::Array(items) => items.get(i),
        Value::Object(map) => map.get(&i.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn deny() -> Denylist {
        Denylist::default()
    }

    #[test]
    fn test_simple_key() {
        let data = json!({"name": "Ann"});
        assert_eq!(resolve(&data, "name", &deny()), Some(&json!("Ann")));
    }

    #[test]
    fn test_simple_key_trimmed() {
        let data = json!({"name": "Ann"});
        assert_eq!(resolve(&data, "  name\n", &deny()), Some(&json!("Ann")));
    }

    #[test]
    fn test_simple_key_with_dollar() {
        let data = json!({"$price": 5});
        assert_eq!(resolve(&data, "$price", &deny()), Some(&json!(5)));
    }

    #[test]
    fn test_simple_key_may_be_null() {
        let data = json!({"v": null});
        assert_eq!(resolve(&data, "v", &deny()), Some(&Value::Null));
    }

    #[test]
    fn test_missing_simple_key() {
        assert_eq!(resolve(&json!({}), "missing", &deny()), None);
    }

    #[test]
    fn test_nested_index() {
        let data = json!({"a": {"b": ["first", "second"]}});
        assert_eq!(resolve(&data, "a.b[0]", &deny()), Some(&json!("first")));
        assert_eq!(resolve(&data, "a.b[1]", &deny()), Some(&json!("second")));
        assert_eq!(resolve(&data, "a.b[2]", &deny()), None);
    }

    #[test]
    fn test_index_with_leading_zero() {
        let data = json!({"a": {"b": ["first", "second"]}});
        assert_eq!(resolve(&data, "a.b[01]", &deny()), Some(&json!("second")));
    }

    #[test]
    fn test_index_into_object() {
        let data = json!({"x": {"m": {"0": "zero"}}});
        assert_eq!(resolve(&data, "x.m[0]", &deny()), Some(&json!("zero")));
    }

    #[test]
    fn test_leading_indexed_segment() {
        let data = json!({"items": [{"name": "A"}]});
        assert_eq!(resolve(&data, "items[0].name", &deny()), Some(&json!("A")));
    }

    #[test]
    fn test_dotted_array_index() {
        let data = json!({"items": ["x", "y"]});
        assert_eq!(resolve(&data, "items.1", &deny()), Some(&json!("y")));
        assert_eq!(resolve(&data, "items.01", &deny()), None);
    }

    #[test]
    fn test_dangling_reference() {
        let data = json!({"a": {}});
        assert_eq!(resolve(&data, "a.b.c", &deny()), None);
    }

    #[test]
    fn test_null_midway() {
        let data = json!({"a": null});
        assert_eq!(resolve(&data, "a.b", &deny()), None);
        assert_eq!(resolve(&data, "a[0]", &deny()), None);
    }

    #[test]
    fn test_scalar_descent() {
        let data = json!({"a": "text"});
        assert_eq!(resolve(&data, "a.len", &deny()), None);
        assert_eq!(resolve(&data, "a[0]", &deny()), None);
        assert_eq!(resolve(&data, "a.length", &deny()), None);

        let list = json!({"items": [1, 2]});
        assert_eq!(resolve(&list, "items.length", &deny()), None);
    }

    #[test]
    fn test_segment_whitespace_trimmed() {
        let data = json!({"a": {"b": 1}});
        assert_eq!(resolve(&data, "a . b", &deny()), Some(&json!(1)));
    }

    #[test]
    fn test_denylisted_exact() {
        let data = json!({"constructor": "x"});
        assert_eq!(resolve(&data, "constructor", &deny()), None);
    }

    #[test]
    fn test_denylisted_nested() {
        let data = json!({"a": {"__proto__": {"b": 1}}});
        assert_eq!(resolve(&data, "a.__proto__.b", &deny()), None);
    }

    #[test]
    fn test_denylisted_substring() {
        let data = json!({"processedAt": "today"});
        assert_eq!(resolve(&data, "processedAt", &deny()), None);
    }

    #[test]
    fn test_denylisted_indexed_name() {
        let data = json!({"window": ["w"]});
        assert_eq!(resolve(&data, "window[0]", &deny()), None);
    }

    #[test]
    fn test_overflowing_index() {
        let data = json!({"a": [1]});
        assert_eq!(
            resolve(&data, "a[99999999999999999999999999]", &deny()),
            None
        );
    }

    #[test]
    fn test_malformed_expressions() {
        let data = json!({"a": {"b": 1}});
        assert_eq!(resolve(&data, "a..b", &deny()), None);
        assert_eq!(resolve(&data, "a.b + 1", &deny()), None);
        assert_eq!(resolve(&data, "a['b']", &deny()), None);
        assert_eq!(resolve(&data, "", &deny()), None);
    }

    #[test]
    fn test_empty_key_reachable_by_slow_path() {
        let data = json!({"": "blank"});
        assert_eq!(resolve(&data, "   ", &deny()), Some(&json!("blank")));
    }

    #[test]
    fn test_custom_denylist() {
        let data = json!({"constructor": "x", "secret": "s"});
        let custom = Denylist::new(["secret"]);
        assert_eq!(resolve(&data, "constructor", &custom), Some(&json!("x")));
        assert_eq!(resolve(&data, "secret", &custom), None);
    }

    #[test]
    fn test_empty_denylist_allows_everything() {
        let data = json!({"process": 1});
        assert_eq!(
            resolve(&data, "process", &Denylist::empty()),
            Some(&json!(1))
        );
    }

    #[test]
    fn test_denylist_ignores_empty_entries() {
        let list = Denylist::new(["", "x"]).with("");
        assert_eq!(list.len(), 1);
        assert!(!list.matches_substring("anything"));
    }

    #[test]
    fn test_default_denylist_contents() {
        let list = deny();
        assert_eq!(list.len(), DEFAULT_DENYLIST.len());
        for entry in DEFAULT_DENYLIST {
            assert!(list.matches_exact(entry));
        }
    }

    #[test]
    fn test_non_object_root() {
        assert_eq!(resolve(&json!("str"), "a", &deny()), None);
        assert_eq!(resolve(&Value::Null, "a.b", &deny()), None);
        assert_eq!(resolve(&json!(["x"]), "0", &deny()), Some(&json!("x")));
    }
}
