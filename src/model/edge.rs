//! A labeled, propertied, directed connection between two vertices,
//! addressed by `ident` and referencing its endpoints by their idents.

use serde::{Deserialize, Serialize};

use crate::error::GraphModelError;

use super::ident::generate_ident;
use super::properties::Properties;
use super::value::Value;
use super::vertex::validate_label;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    pub label: String,
    pub id: Option<i64>,
    start_id: Option<i64>,
    end_id: Option<i64>,
    pub properties: Properties,
}

impl Edge {
    /// Build a new edge. `start_ident`/`end_ident` must already be set
    /// on `properties` (or passed in separately via
    /// [`Edge::new_with_endpoints`]) — an edge without both is
    /// malformed and rejected here rather than later.
    pub fn new(label: impl Into<String>, properties: Properties) -> Result<Self, GraphModelError> {
        let label = validate_label(label.into())?;
        let mut properties = properties;
        if !properties.has_ident() {
            properties.set_ident(generate_ident());
        }
        if !properties.has_start_ident() {
            return Err(GraphModelError::MissingReservedProperty("start_ident"));
        }
        if !properties.has_end_ident() {
            return Err(GraphModelError::MissingReservedProperty("end_ident"));
        }
        Ok(Self {
            label,
            id: None,
            start_id: None,
            end_id: None,
            properties,
        })
    }

    pub fn new_with_endpoints(
        label: impl Into<String>,
        start_ident: impl Into<String>,
        end_ident: impl Into<String>,
        mut properties: Properties,
    ) -> Result<Self, GraphModelError> {
        properties.set_start_ident(start_ident);
        properties.set_end_ident(end_ident);
        Self::new(label, properties)
    }

    pub fn start_id(&self) -> Option<i64> {
        self.start_id
    }

    pub fn end_id(&self) -> Option<i64> {
        self.end_id
    }

    /// Set both store-assigned endpoint ids at once, or clear both.
    /// They are an all-or-nothing pair: a partial update is rejected
    /// rather than silently leaving the edge in a mismatched state.
    pub fn set_endpoint_ids(
        &mut self,
        start_id: Option<i64>,
        end_id: Option<i64>,
    ) -> Result<(), GraphModelError> {
        if start_id.is_some() != end_id.is_some() {
            return Err(GraphModelError::MismatchedEndpointIds { start_id, end_id });
        }
        self.start_id = start_id;
        self.end_id = end_id;
        Ok(())
    }

    /// Convenience wrapper for the common case of setting both
    /// store-assigned endpoint ids at once; since both arguments are
    /// required a partial pair can never be constructed through it.
    pub fn with_endpoint_ids(mut self, start_id: i64, end_id: i64) -> Self {
        self.set_endpoint_ids(Some(start_id), Some(end_id))
            .expect("both ids provided together, cannot mismatch");
        self
    }

    pub fn ident(&self) -> &str {
        self.properties
            .ident()
            .expect("Edge::new always assigns an ident")
    }

    pub fn start_ident(&self) -> &str {
        self.properties
            .start_ident()
            .expect("Edge::new requires start_ident")
    }

    pub fn end_ident(&self) -> &str {
        self.properties
            .end_ident()
            .expect("Edge::new requires end_ident")
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.properties.get(key)
    }

    /// Non-destructive upsert: deep-merges `properties`, then
    /// re-asserts all three reserved slots (ident, start_ident,
    /// end_ident) so the merge can never redirect this edge's
    /// identity or endpoints.
    pub fn upsert(&mut self, label: Option<String>, properties: Option<&Properties>) {
        if let Some(label) = label {
            if label != self.label {
                self.label = label;
            }
        }
        if let Some(incoming) = properties {
            let ident = self.ident().to_string();
            let start_ident = self.start_ident().to_string();
            let end_ident = self.end_ident().to_string();
            self.properties = self.properties.merged_with(incoming);
            self.properties.set_ident(ident);
            self.properties.set_start_ident(start_ident);
            self.properties.set_end_ident(end_ident);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_missing_start_ident() {
        let mut props = Properties::new();
        props.set_end_ident("e");
        assert!(Edge::new("KNOWS", props).is_err());
    }

    #[test]
    fn rejects_missing_end_ident() {
        let mut props = Properties::new();
        props.set_start_ident("s");
        assert!(Edge::new("KNOWS", props).is_err());
    }

    #[test]
    fn builds_with_both_endpoints() {
        let edge = Edge::new_with_endpoints("KNOWS", "alice", "bob", Properties::new()).unwrap();
        assert_eq!(edge.start_ident(), "alice");
        assert_eq!(edge.end_ident(), "bob");
    }

    #[test]
    fn set_endpoint_ids_rejects_a_partial_pair() {
        let mut edge = Edge::new_with_endpoints("KNOWS", "alice", "bob", Properties::new()).unwrap();
        assert!(edge.set_endpoint_ids(Some(1), None).is_err());
        assert_eq!(edge.start_id(), None, "rejected update must not mutate either field");
        assert_eq!(edge.end_id(), None);
    }

    #[test]
    fn upsert_protects_all_three_reserved_slots() {
        let mut edge = Edge::new_with_endpoints("KNOWS", "alice", "bob", Properties::new()).unwrap();
        let ident = edge.ident().to_string();

        let mut incoming = Properties::new();
        incoming.set_start_ident("mallory");
        incoming.insert("since", Value::Int(2020));

        edge.upsert(None, Some(&incoming));
        assert_eq!(edge.ident(), ident);
        assert_eq!(edge.start_ident(), "alice");
        assert_eq!(edge.get("since"), Some(&Value::Int(2020)));
    }
}
