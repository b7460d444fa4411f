//! Property value type and its Cypher literal encoding.

use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// A property value. Covers everything a graph property or a Cypher
/// literal needs to represent: scalars, `null`, lists, and nested maps.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value")]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
    List(Vec<Value>),
    Map(IndexMap<String, Value>),
}

impl Value {
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "NULL",
            Value::Bool(_) => "BOOLEAN",
            Value::Int(_) => "INTEGER",
            Value::Float(_) => "FLOAT",
            Value::String(_) => "STRING",
            Value::List(_) => "LIST",
            Value::Map(_) => "MAP",
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Whether this value would fail `validate_all_required_properties_present`:
    /// missing, null, or an empty/blank string.
    pub fn is_blank(&self) -> bool {
        match self {
            Value::Null => true,
            Value::String(s) => s.trim().is_empty(),
            _ => false,
        }
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}
impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}
impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}
impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::String(v)
    }
}
impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::String(v.to_owned())
    }
}
impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map(Into::into).unwrap_or(Value::Null)
    }
}
impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(v: Vec<T>) -> Self {
        Value::List(v.into_iter().map(Into::into).collect())
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", encode_value(self))
    }
}

/// Escape a string for inclusion in a single-quoted Cypher literal.
///
/// Order matters: backslashes must be escaped first, or the
/// backslashes introduced by the quote-escaping steps below would
/// themselves get escaped again.
pub fn escape_string(s: &str) -> String {
    s.replace('\\', "\\\\")
        .replace('\'', "\\'")
        .replace('"', "\\\"")
}

pub fn quote_string(s: &str) -> String {
    format!("'{}'", escape_string(s))
}

/// Pure function rendering a [`Value`] as a Cypher literal.
pub fn encode_value(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Int(i) => i.to_string(),
        Value::Float(fl) => fl.to_string(),
        Value::String(s) => quote_string(s),
        Value::List(items) => {
            let inner: Vec<String> = items.iter().map(encode_value).collect();
            format!("[{}]", inner.join(", "))
        }
        Value::Map(map) => encode_dict(map),
    }
}

/// Brace map-literal form: `{key: value, key2: value2}`.
/// Used wherever Cypher expects a map literal (`CREATE`/`MERGE` bodies).
pub fn encode_dict(map: &IndexMap<String, Value>) -> String {
    let entries: Vec<String> = map
        .iter()
        .map(|(k, v)| format!("{k}: {}", encode_value(v)))
        .collect();
    format!("{{{}}}", entries.join(", "))
}

/// Flat assignment-list form: `alias.key = value, alias.key2 = value2`.
/// Used for `SET` clauses. A nested map's own *value* still renders as
/// a brace literal; only the top level becomes an assignment list.
pub fn encode_dict_for_set(alias: &str, map: &IndexMap<String, Value>) -> String {
    let entries: Vec<String> = map
        .iter()
        .map(|(k, v)| format!("{alias}.{k} = {}", encode_value(v)))
        .collect();
    entries.join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escapes_backslash_before_quotes() {
        // A literal backslash followed by a quote must not become
        // a spurious escaped-quote.
        assert_eq!(escape_string(r#"a\'b"#), r#"a\\\'b"#);
    }

    #[test]
    fn encodes_scalars() {
        assert_eq!(encode_value(&Value::Null), "null");
        assert_eq!(encode_value(&Value::Bool(true)), "true");
        assert_eq!(encode_value(&Value::Int(42)), "42");
        assert_eq!(encode_value(&Value::String("hi".into())), "'hi'");
    }

    #[test]
    fn encodes_nested_map_as_brace_literal_inside_set_form() {
        let mut inner = IndexMap::new();
        inner.insert("b".to_string(), Value::Int(1));
        let mut outer = IndexMap::new();
        outer.insert("a".to_string(), Value::Map(inner));
        assert_eq!(encode_dict_for_set("n", &outer), "n.a = {b: 1}");
    }

    #[test]
    fn encode_dict_preserves_insertion_order() {
        let mut map = IndexMap::new();
        map.insert("z".to_string(), Value::Int(1));
        map.insert("a".to_string(), Value::Int(2));
        assert_eq!(encode_dict(&map), "{z: 1, a: 2}");
    }
}

#[cfg(test)]
mod quoting_properties {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Whatever arbitrary text goes in, `quote_string` must produce
        /// text wrapped in exactly one pair of single quotes with every
        /// interior quote/backslash escaped, so the result is always
        /// safe to splice into a Cypher literal position.
        #[test]
        fn quoted_output_is_always_single_quote_delimited(s in ".*") {
            let quoted = quote_string(&s);
            prop_assert!(quoted.starts_with('\''));
            prop_assert!(quoted.ends_with('\''));
        }

        #[test]
        fn encode_value_roundtrips_ints(n in any::<i64>()) {
            prop_assert_eq!(encode_value(&Value::Int(n)), n.to_string());
        }
    }
}
