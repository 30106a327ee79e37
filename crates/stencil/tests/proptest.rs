//! Property-based tests for stencil using proptest.

use proptest::prelude::*;
use serde_json::{json, Map, Value};
use stencil::{escape_html, resolve, Denylist, Template, DEFAULT_DENYLIST};

// ============================================================================
// Strategies
// ============================================================================

// Fragments chosen to produce complete, partial and nested markers.
fn template_strategy() -> impl Strategy<Value = String> {
    let piece = prop_oneof![
        Just("<%=".to_string()),
        Just("<%-".to_string()),
        Just("%>".to_string()),
        Just("<%".to_string()),
        Just(" a ".to_string()),
        Just("b.c".to_string()),
        Just("d[0]".to_string()),
        Just("\n".to_string()),
        Just("é✓".to_string()),
        "[a-z &<>]{0,4}",
    ];
    prop::collection::vec(piece, 0..16).prop_map(|pieces| pieces.concat())
}

fn json_data_strategy() -> impl Strategy<Value = Value> {
    let leaf = prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        any::<i64>().prop_map(|n| json!(n)),
        "[a-zA-Z0-9<>&]*".prop_map(Value::String),
    ];
    leaf.prop_recursive(3, 32, 6, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..4).prop_map(Value::Array),
            prop::collection::hash_map("[a-d]", inner, 0..4)
                .prop_map(|m| Value::Object(m.into_iter().collect())),
        ]
    })
}

fn leaky_data(word: &str) -> Value {
    let mut inner = Map::new();
    inner.insert(word.to_string(), json!("leak"));
    let mut outer = Map::new();
    outer.insert(word.to_string(), json!("leak"));
    outer.insert("a".to_string(), Value::Object(inner));
    Value::Object(outer)
}

fn denylisted_word() -> impl Strategy<Value = &'static str> {
    prop::sample::select(DEFAULT_DENYLIST.to_vec())
}

// ============================================================================
// Property tests
// ============================================================================

proptest! {
    /// Text without any marker renders unchanged.
    #[test]
    fn plain_text_renders_unchanged(text in "[^%]*", data in json_data_strategy()) {
        let template = Template::new(&text).unwrap();
        prop_assert_eq!(template.render(&data), text);
    }

    /// Strings with no reserved characters pass through the escaper.
    #[test]
    fn escape_is_identity_without_reserved(text in "[^&<>\"'`]*") {
        prop_assert_eq!(escape_html(&text), text.as_str());
    }

    /// Escaped output never contains a raw reserved character other than the
    /// ampersands that start entities.
    #[test]
    fn escape_removes_reserved(text in any::<String>()) {
        let escaped = escape_html(&text);
        prop_assert!(!escaped.contains(['<', '>', '"', '\'', '`']));
        prop_assert_eq!(
            escaped.matches('&').count(),
            text.chars().filter(|c| matches!(*c, '&' | '<' | '>' | '"' | '\'' | '`')).count()
        );
    }

    /// Token spans are adjacent and rebuild the source exactly.
    #[test]
    fn token_spans_rebuild_source(source in template_strategy()) {
        let template = Template::new(&source).unwrap();
        let mut rebuilt = String::new();
        let mut next = 0;
        for token in template.tokens() {
            let span = token.span();
            prop_assert_eq!(span.start, next);
            rebuilt.push_str(&source[span.clone()]);
            next = span.end;
        }
        prop_assert_eq!(next, source.len());
        prop_assert_eq!(rebuilt, source);
    }

    /// Rendering never panics and does not depend on earlier renders.
    #[test]
    fn render_order_independent(
        source in template_strategy(),
        a in json_data_strategy(),
        b in json_data_strategy(),
    ) {
        let template = Template::new(&source).unwrap();
        let forward = (template.render(&a), template.render(&b));
        let backward_b = template.render(&b);
        let backward_a = template.render(&a);
        prop_assert_eq!(forward, (backward_a, backward_b));
    }

    /// Any path containing a denylisted word resolves to nothing.
    #[test]
    fn denylisted_substring_never_resolves(
        prefix in "[a-z.]{0,4}",
        word in denylisted_word(),
        suffix in "[a-z.\\[\\]0-9]{0,4}",
    ) {
        let path = format!("{}{}{}", prefix, word, suffix);
        let data = leaky_data(word);
        prop_assert_eq!(resolve(&data, &path, &Denylist::default()), None);
    }
}
