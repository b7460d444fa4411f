//! Immutable query steps, applied in insertion order.

use crate::model::edge::Edge;
use crate::model::properties::Properties;
use crate::model::value::Value;
use crate::model::vertex::Vertex;

/// Anything a [`crate::query::QueryBuilder`] can walk. Implemented by
/// both `Vertex` and `Edge`; the endpoint-ident accessors default to
/// `None` so vertex queries simply never match on them.
pub trait Queryable: Clone {
    fn ident(&self) -> &str;
    fn label(&self) -> &str;
    fn properties(&self) -> &Properties;
    fn store_id(&self) -> Option<i64>;

    fn start_ident(&self) -> Option<&str> {
        None
    }
    fn end_ident(&self) -> Option<&str> {
        None
    }

    /// Generic attribute lookup used by [`Step::Filter`], mirroring a
    /// dynamic `getattr(item, attr)` over a fixed set of known fields.
    fn attr_value(&self, attr: &str) -> Option<Value> {
        match attr {
            "label" => Some(Value::String(self.label().to_string())),
            "ident" => Some(Value::String(self.ident().to_string())),
            "id" => self.store_id().map(Value::Int),
            "start_ident" => self.start_ident().map(|s| Value::String(s.to_string())),
            "end_ident" => self.end_ident().map(|s| Value::String(s.to_string())),
            _ => self.properties().get(attr).cloned(),
        }
    }
}

impl Queryable for Vertex {
    fn ident(&self) -> &str {
        Vertex::ident(self)
    }
    fn label(&self) -> &str {
        &self.label
    }
    fn properties(&self) -> &Properties {
        &self.properties
    }
    fn store_id(&self) -> Option<i64> {
        self.id
    }
}

impl Queryable for Edge {
    fn ident(&self) -> &str {
        Edge::ident(self)
    }
    fn label(&self) -> &str {
        &self.label
    }
    fn properties(&self) -> &Properties {
        &self.properties
    }
    fn store_id(&self) -> Option<i64> {
        self.id
    }
    fn start_ident(&self) -> Option<&str> {
        Some(Edge::start_ident(self))
    }
    fn end_ident(&self) -> Option<&str> {
        Some(Edge::end_ident(self))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Step {
    Filter { attr: String, value: Value },
    Sort { key: String, reverse: bool },
    Reverse,
    Props(Vec<(String, Value)>),
    Label(String),
    StartIdent(String),
    EndIdent(String),
    Ident(String),
}

impl Step {
    pub fn apply<T: Queryable>(&self, items: Vec<T>) -> Vec<T> {
        match self {
            Step::Filter { attr, value } => items
                .into_iter()
                .filter(|item| item.attr_value(attr).as_ref() == Some(value))
                .collect(),
            Step::Sort { key, reverse } => {
                let mut items = items;
                items.sort_by(|a, b| compare_values(a.attr_value(key), b.attr_value(key)));
                if *reverse {
                    items.reverse();
                }
                items
            }
            Step::Reverse => {
                let mut items = items;
                items.reverse();
                items
            }
            Step::Props(props) => items
                .into_iter()
                .filter(|item| {
                    props
                        .iter()
                        .all(|(key, value)| item.properties().get(key) == Some(value))
                })
                .collect(),
            Step::Label(label) => items.into_iter().filter(|item| item.label() == label).collect(),
            Step::StartIdent(ident) => items
                .into_iter()
                .filter(|item| item.start_ident() == Some(ident.as_str()))
                .collect(),
            Step::EndIdent(ident) => items
                .into_iter()
                .filter(|item| item.end_ident() == Some(ident.as_str()))
                .collect(),
            Step::Ident(ident) => items.into_iter().filter(|item| item.ident() == ident).collect(),
        }
    }
}

fn compare_values(a: Option<Value>, b: Option<Value>) -> std::cmp::Ordering {
    use std::cmp::Ordering;
    match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        (Some(Value::Int(a)), Some(Value::Int(b))) => a.cmp(&b),
        (Some(Value::Float(a)), Some(Value::Float(b))) => a.partial_cmp(&b).unwrap_or(Ordering::Equal),
        (Some(Value::String(a)), Some(Value::String(b))) => a.cmp(&b),
        (Some(a), Some(b)) => format!("{a:?}").cmp(&format!("{b:?}")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::properties::Properties;

    fn vertex(label: &str, ident: &str) -> Vertex {
        let mut props = Properties::new();
        props.set_ident(ident);
        Vertex::new(label, props).unwrap()
    }

    #[test]
    fn label_step_filters_by_label() {
        let items = vec![vertex("Person", "a"), vertex("Company", "b")];
        let result = Step::Label("Person".into()).apply(items);
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].ident(), "a");
    }

    #[test]
    fn sort_step_orders_ascending_by_default() {
        let items = vec![vertex("Person", "b"), vertex("Person", "a")];
        let result = Step::Sort {
            key: "ident".into(),
            reverse: false,
        }
        .apply(items);
        assert_eq!(result[0].ident(), "a");
        assert_eq!(result[1].ident(), "b");
    }
}
