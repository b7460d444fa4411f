//! A labeled, propertied node addressed by its `ident`.

use serde::{Deserialize, Serialize};

use crate::error::GraphModelError;

use super::ident::generate_ident;
use super::properties::Properties;
use super::value::Value;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vertex {
    pub label: String,
    /// Store-assigned id. Only ever used to speed up `MATCH`; never
    /// the identity used for diffing or equality.
    pub id: Option<i64>,
    pub properties: Properties,
}

impl Vertex {
    /// Build a new vertex, auto-generating an `ident` if the caller
    /// didn't already set one on `properties`.
    pub fn new(label: impl Into<String>, properties: Properties) -> Result<Self, GraphModelError> {
        let label = validate_label(label.into())?;
        let mut properties = properties;
        if !properties.has_ident() {
            properties.set_ident(generate_ident());
        }
        Ok(Self {
            label,
            id: None,
            properties,
        })
    }

    pub fn with_id(mut self, id: i64) -> Result<Self, GraphModelError> {
        if id <= 0 {
            return Err(GraphModelError::InvalidId(id));
        }
        self.id = Some(id);
        Ok(self)
    }

    pub fn ident(&self) -> &str {
        self.properties
            .ident()
            .expect("Vertex::new always assigns an ident")
    }

    pub fn has_label(&self, label: &str) -> bool {
        self.label == label
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.properties.get(key)
    }

    /// Non-destructive upsert: deep-merges `properties` into the
    /// vertex's own, re-asserts the `ident` slot afterward so a
    /// conflicting value in the incoming properties can never steal
    /// this vertex's identity, and updates the label if a different
    /// one was supplied.
    pub fn upsert(&mut self, label: Option<String>, properties: Option<&Properties>) {
        if let Some(label) = label {
            if label != self.label {
                self.label = label;
            }
        }
        if let Some(incoming) = properties {
            let ident = self.ident().to_string();
            self.properties = self.properties.merged_with(incoming);
            self.properties.set_ident(ident);
        }
    }
}

pub(crate) fn validate_label(label: String) -> Result<String, GraphModelError> {
    let trimmed = label.trim();
    if trimmed.is_empty() {
        return Err(GraphModelError::InvalidLabel(label));
    }
    Ok(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_blank_label() {
        assert!(Vertex::new("   ", Properties::new()).is_err());
    }

    #[test]
    fn auto_generates_ident_when_missing() {
        let v = Vertex::new("Person", Properties::new()).unwrap();
        assert!(!v.ident().is_empty());
    }

    #[test]
    fn upsert_protects_ident_from_conflicting_incoming_value() {
        let mut v = Vertex::new("Person", Properties::new()).unwrap();
        let original_ident = v.ident().to_string();

        let mut incoming = Properties::new();
        incoming.set_ident("someone_elses_ident");
        incoming.insert("age", Value::Int(30));

        v.upsert(None, Some(&incoming));
        assert_eq!(v.ident(), original_ident);
        assert_eq!(v.get("age"), Some(&Value::Int(30)));
    }

    #[test]
    fn upsert_updates_label_when_different() {
        let mut v = Vertex::new("Person", Properties::new()).unwrap();
        v.upsert(Some("Employee".to_string()), None);
        assert_eq!(v.label, "Employee");
    }
}
