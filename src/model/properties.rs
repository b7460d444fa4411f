//! Ordered property map with three reserved identity slots layered on
//! top of a generic `String -> Value` map.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::value::Value;

/// Names of the three reserved property keys. Configurable so a
/// deployment can rename them without touching call sites; the
/// generic map is always the single source of truth, the typed
/// accessors are just a convenience layered on top of it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReservedKeys {
    pub ident: String,
    pub start_ident: String,
    pub end_ident: String,
}

impl Default for ReservedKeys {
    fn default() -> Self {
        Self {
            ident: "ident".to_string(),
            start_ident: "start_ident".to_string(),
            end_ident: "end_ident".to_string(),
        }
    }
}

/// An ordered property map. Iteration order matches insertion order,
/// which keeps serialized output stable and diffable.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Properties {
    map: IndexMap<String, Value>,
    #[serde(skip)]
    keys: ReservedKeys,
}

impl Default for Properties {
    fn default() -> Self {
        Self {
            map: IndexMap::new(),
            keys: ReservedKeys::default(),
        }
    }
}

impl PartialEq for Properties {
    /// Deep structural equality over the property contents, ignoring
    /// which reserved-key names this instance happens to be
    /// configured with.
    fn eq(&self, other: &Self) -> bool {
        self.map == other.map
    }
}

impl Properties {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_reserved_keys(keys: ReservedKeys) -> Self {
        Self {
            map: IndexMap::new(),
            keys,
        }
    }

    pub fn from_map(map: IndexMap<String, Value>) -> Self {
        Self {
            map,
            keys: ReservedKeys::default(),
        }
    }

    pub fn reserved_keys(&self) -> &ReservedKeys {
        &self.keys
    }

    // ---- generic map surface ----

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.map.get(key)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.map.insert(key.into(), value.into());
    }

    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.map.shift_remove(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.map.contains_key(key)
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn iter(&self) -> indexmap::map::Iter<'_, String, Value> {
        self.map.iter()
    }

    pub fn map(&self) -> &IndexMap<String, Value> {
        &self.map
    }

    pub fn into_map(self) -> IndexMap<String, Value> {
        self.map
    }

    // ---- reserved slots ----

    pub fn ident(&self) -> Option<&str> {
        self.map.get(&self.keys.ident).and_then(Value::as_str)
    }

    pub fn has_ident(&self) -> bool {
        self.ident().is_some_and(|s| !s.trim().is_empty())
    }

    pub fn set_ident(&mut self, ident: impl Into<String>) {
        let key = self.keys.ident.clone();
        self.map.insert(key, Value::String(ident.into()));
    }

    pub fn start_ident(&self) -> Option<&str> {
        self.map.get(&self.keys.start_ident).and_then(Value::as_str)
    }

    pub fn has_start_ident(&self) -> bool {
        self.start_ident().is_some_and(|s| !s.trim().is_empty())
    }

    pub fn set_start_ident(&mut self, ident: impl Into<String>) {
        let key = self.keys.start_ident.clone();
        self.map.insert(key, Value::String(ident.into()));
    }

    pub fn end_ident(&self) -> Option<&str> {
        self.map.get(&self.keys.end_ident).and_then(Value::as_str)
    }

    pub fn has_end_ident(&self) -> bool {
        self.end_ident().is_some_and(|s| !s.trim().is_empty())
    }

    pub fn set_end_ident(&mut self, ident: impl Into<String>) {
        let key = self.keys.end_ident.clone();
        self.map.insert(key, Value::String(ident.into()));
    }

    /// Deep-merge `other` into `self`, returning a new `Properties`.
    /// Neither input is mutated.
    pub fn merged_with(&self, other: &Properties) -> Properties {
        Properties {
            map: deep_merge_maps(&self.map, &other.map),
            keys: self.keys.clone(),
        }
    }
}

impl IntoIterator for Properties {
    type Item = (String, Value);
    type IntoIter = indexmap::map::IntoIter<String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.map.into_iter()
    }
}

/// Deep-merge two property maps: the right-hand side wins on scalar
/// conflicts, two maps merge recursively key-by-key, two lists that
/// are both entirely made of maps merge element-wise by index (the
/// shorter list is conceptually padded with empty maps), and any other
/// pairing of lists is replaced wholesale by the right-hand side.
/// Neither input is mutated; both are logically copied before merging.
pub fn deep_merge_maps(
    left: &IndexMap<String, Value>,
    right: &IndexMap<String, Value>,
) -> IndexMap<String, Value> {
    let mut result = left.clone();
    for (key, right_value) in right {
        match result.get(key) {
            Some(left_value) => {
                let merged = deep_merge_value(left_value, right_value);
                result.insert(key.clone(), merged);
            }
            None => {
                result.insert(key.clone(), right_value.clone());
            }
        }
    }
    result
}

fn deep_merge_value(left: &Value, right: &Value) -> Value {
    match (left, right) {
        (Value::Map(l), Value::Map(r)) => Value::Map(deep_merge_maps(l, r)),
        (Value::List(l), Value::List(r)) if is_list_of_maps(l) && is_list_of_maps(r) => {
            let len = l.len().max(r.len());
            let mut merged = Vec::with_capacity(len);
            for i in 0..len {
                let lv = l.get(i).cloned().unwrap_or_else(|| Value::Map(IndexMap::new()));
                let rv = r.get(i).cloned().unwrap_or_else(|| Value::Map(IndexMap::new()));
                merged.push(deep_merge_value(&lv, &rv));
            }
            Value::List(merged)
        }
        (_, right) => right.clone(),
    }
}

fn is_list_of_maps(items: &[Value]) -> bool {
    !items.is_empty() && items.iter().all(|v| matches!(v, Value::Map(_)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reserved_slot_round_trips_through_generic_map() {
        let mut props = Properties::new();
        props.set_ident("a_b_c");
        assert_eq!(props.ident(), Some("a_b_c"));
        assert_eq!(props.get("ident"), Some(&Value::String("a_b_c".into())));
    }

    #[test]
    fn merge_right_wins_on_scalar_conflict() {
        let mut a = Properties::new();
        a.insert("x", Value::Int(1));
        let mut b = Properties::new();
        b.insert("x", Value::Int(2));
        let merged = a.merged_with(&b);
        assert_eq!(merged.get("x"), Some(&Value::Int(2)));
    }

    #[test]
    fn merge_recurses_into_nested_maps() {
        let mut inner_a = IndexMap::new();
        inner_a.insert("keep".to_string(), Value::Int(1));
        inner_a.insert("overwrite".to_string(), Value::Int(1));
        let mut a = Properties::new();
        a.insert("nested", Value::Map(inner_a));

        let mut inner_b = IndexMap::new();
        inner_b.insert("overwrite".to_string(), Value::Int(2));
        let mut b = Properties::new();
        b.insert("nested", Value::Map(inner_b));

        let merged = a.merged_with(&b);
        let Some(Value::Map(nested)) = merged.get("nested") else {
            panic!("expected nested map");
        };
        assert_eq!(nested.get("keep"), Some(&Value::Int(1)));
        assert_eq!(nested.get("overwrite"), Some(&Value::Int(2)));
    }

    #[test]
    fn merge_pads_shorter_list_of_maps_with_empty_maps() {
        let mut a = Properties::new();
        let item_a = {
            let mut m = IndexMap::new();
            m.insert("n".to_string(), Value::Int(1));
            Value::Map(m)
        };
        a.insert("items", Value::List(vec![item_a]));

        let mut b = Properties::new();
        let item_b0 = {
            let mut m = IndexMap::new();
            m.insert("extra".to_string(), Value::Bool(true));
            Value::Map(m)
        };
        let item_b1 = {
            let mut m = IndexMap::new();
            m.insert("only_in_b".to_string(), Value::Int(9));
            Value::Map(m)
        };
        b.insert("items", Value::List(vec![item_b0, item_b1]));

        let merged = a.merged_with(&b);
        let Some(Value::List(items)) = merged.get("items") else {
            panic!("expected list");
        };
        assert_eq!(items.len(), 2);
        let Value::Map(first) = &items[0] else { panic!() };
        assert_eq!(first.get("n"), Some(&Value::Int(1)));
        assert_eq!(first.get("extra"), Some(&Value::Bool(true)));
        let Value::Map(second) = &items[1] else { panic!() };
        assert_eq!(second.get("only_in_b"), Some(&Value::Int(9)));
    }

    #[test]
    fn merge_replaces_scalar_lists_wholesale() {
        let mut a = Properties::new();
        a.insert("tags", Value::from(vec!["a", "b"]));
        let mut b = Properties::new();
        b.insert("tags", Value::from(vec!["c"]));
        let merged = a.merged_with(&b);
        assert_eq!(merged.get("tags"), Some(&Value::from(vec!["c"])));
    }

    #[test]
    fn merge_does_not_mutate_inputs() {
        let mut a = Properties::new();
        a.insert("x", Value::Int(1));
        let mut b = Properties::new();
        b.insert("x", Value::Int(2));
        let _ = a.merged_with(&b);
        assert_eq!(a.get("x"), Some(&Value::Int(1)));
        assert_eq!(b.get("x"), Some(&Value::Int(2)));
    }
}

#[cfg(test)]
mod merge_properties {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn right_scalar_always_wins(left in any::<i64>(), right in any::<i64>()) {
            let mut a = Properties::new();
            a.insert("x", Value::Int(left));
            let mut b = Properties::new();
            b.insert("x", Value::Int(right));
            let merged = a.merged_with(&b);
            prop_assert_eq!(merged.get("x"), Some(&Value::Int(right)));
        }

        #[test]
        fn merging_with_self_is_idempotent(value in any::<i64>()) {
            let mut a = Properties::new();
            a.insert("x", Value::Int(value));
            let merged = a.merged_with(&a.clone());
            prop_assert_eq!(merged, a);
        }
    }
}
