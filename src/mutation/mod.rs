//! One atomic add/remove/update of exactly one vertex or edge.

pub mod cypher;
pub mod patch;

pub use cypher::CypherStatement;
pub use patch::Patch;

use crate::model::properties::Properties;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Add,
    Remove,
    Update,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Vertex,
    Edge,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Mutation {
    pub operation: Operation,
    pub entity: EntityKind,
    pub ident: String,
    pub label: String,
    pub start_ident: Option<String>,
    pub end_ident: Option<String>,
    pub properties: Properties,
    pub id: Option<i64>,
    pub start_id: Option<i64>,
    pub end_id: Option<i64>,
    pub start_label: Option<String>,
    pub end_label: Option<String>,
}

impl Mutation {
    fn base(
        operation: Operation,
        entity: EntityKind,
        ident: impl Into<String>,
        label: impl Into<String>,
        properties: Properties,
    ) -> Self {
        let mut mutation = Self {
            operation,
            entity,
            ident: ident.into(),
            label: label.into(),
            start_ident: None,
            end_ident: None,
            properties,
            id: None,
            start_id: None,
            end_id: None,
            start_label: None,
            end_label: None,
        };
        mutation.reassert_required_properties();
        mutation
    }

    /// Force-set the reserved identity keys in `properties` from this
    /// mutation's own top-level fields, so `properties` is always
    /// internally consistent even if a caller supplied a conflicting
    /// value inside the properties map itself.
    fn reassert_required_properties(&mut self) {
        self.properties.set_ident(self.ident.clone());
        if self.entity == EntityKind::Edge {
            if let Some(start_ident) = &self.start_ident {
                self.properties.set_start_ident(start_ident.clone());
            }
            if let Some(end_ident) = &self.end_ident {
                self.properties.set_end_ident(end_ident.clone());
            }
        }
    }

    pub fn add_vertex(
        ident: impl Into<String>,
        label: impl Into<String>,
        properties: Properties,
        id: Option<i64>,
    ) -> Self {
        let mut m = Self::base(Operation::Add, EntityKind::Vertex, ident, label, properties);
        m.id = id;
        m
    }

    pub fn remove_vertex(ident: impl Into<String>, label: impl Into<String>, id: Option<i64>) -> Self {
        let mut m = Self::base(
            Operation::Remove,
            EntityKind::Vertex,
            ident,
            label,
            Properties::new(),
        );
        m.id = id;
        m
    }

    pub fn update_vertex(
        ident: impl Into<String>,
        label: impl Into<String>,
        properties: Properties,
        id: Option<i64>,
    ) -> Self {
        let mut m = Self::base(Operation::Update, EntityKind::Vertex, ident, label, properties);
        m.id = id;
        m
    }

    #[allow(clippy::too_many_arguments)]
    pub fn add_edge(
        ident: impl Into<String>,
        label: impl Into<String>,
        start_ident: impl Into<String>,
        end_ident: impl Into<String>,
        properties: Properties,
        id: Option<i64>,
        start_id: Option<i64>,
        end_id: Option<i64>,
        start_label: Option<String>,
        end_label: Option<String>,
    ) -> Self {
        let mut m = Self::base(Operation::Add, EntityKind::Edge, ident, label, properties);
        m.start_ident = Some(start_ident.into());
        m.end_ident = Some(end_ident.into());
        m.id = id;
        m.start_id = start_id;
        m.end_id = end_id;
        m.start_label = start_label;
        m.end_label = end_label;
        m.reassert_required_properties();
        m
    }

    pub fn remove_edge(
        ident: impl Into<String>,
        label: impl Into<String>,
        start_ident: impl Into<String>,
        end_ident: impl Into<String>,
        id: Option<i64>,
        start_id: Option<i64>,
        end_id: Option<i64>,
    ) -> Self {
        let mut m = Self::base(
            Operation::Remove,
            EntityKind::Edge,
            ident,
            label,
            Properties::new(),
        );
        m.start_ident = Some(start_ident.into());
        m.end_ident = Some(end_ident.into());
        m.id = id;
        m.start_id = start_id;
        m.end_id = end_id;
        m.reassert_required_properties();
        m
    }

    #[allow(clippy::too_many_arguments)]
    pub fn update_edge(
        ident: impl Into<String>,
        label: impl Into<String>,
        start_ident: impl Into<String>,
        end_ident: impl Into<String>,
        properties: Properties,
        id: Option<i64>,
        start_label: Option<String>,
        end_label: Option<String>,
    ) -> Self {
        let mut m = Self::base(Operation::Update, EntityKind::Edge, ident, label, properties);
        m.start_ident = Some(start_ident.into());
        m.end_ident = Some(end_ident.into());
        m.id = id;
        m.start_label = start_label;
        m.end_label = end_label;
        m.reassert_required_properties();
        m
    }

    pub fn is_vertex(&self) -> bool {
        self.entity == EntityKind::Vertex
    }
    pub fn is_edge(&self) -> bool {
        self.entity == EntityKind::Edge
    }
    pub fn is_addition(&self) -> bool {
        self.operation == Operation::Add
    }
    pub fn is_removal(&self) -> bool {
        self.operation == Operation::Remove
    }
    pub fn is_update(&self) -> bool {
        self.operation == Operation::Update
    }

    pub fn to_statements(&self) -> Result<Vec<CypherStatement>, crate::error::EmissionError> {
        cypher::lower(self)
    }
}
