//! Lowering [`super::Mutation`]s to Cypher text.

use crate::error::EmissionError;
use crate::model::properties::Properties;
use crate::model::value::{encode_dict, quote_string};

use super::{EntityKind, Mutation, Operation};

/// How a vertex is addressed in a `MATCH` clause: by store id when
/// known (cheaper for AGE to plan), else by `ident`.
#[derive(Debug, Clone, PartialEq)]
pub enum MatchKey {
    Id(i64),
    Ident(String),
}

impl MatchKey {
    fn render(&self) -> String {
        match self {
            MatchKey::Id(id) => format!("{{id: {id}}}"),
            MatchKey::Ident(ident) => format!("{{ident: {}}}", quote_string(ident)),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum CypherStatement {
    CreateVertex {
        label: String,
        properties: Properties,
    },
    UpdateVertex {
        label: String,
        match_key: MatchKey,
        properties: Properties,
    },
    DeleteVertex {
        label: String,
        match_key: MatchKey,
    },
    /// Used for both edge addition and edge update — both lower to a
    /// `MERGE`, matching the original's single upsert statement class.
    UpsertEdge {
        label: String,
        start_label: String,
        end_label: String,
        start_ident: String,
        end_ident: String,
        properties: Properties,
    },
    DeleteEdge {
        label: String,
        start_ident: String,
        end_ident: String,
        start_id: Option<i64>,
        end_id: Option<i64>,
    },
}

impl CypherStatement {
    pub fn clauses(&self) -> Vec<String> {
        match self {
            CypherStatement::CreateVertex { label, properties } => {
                vec![format!("CREATE (n:{label} {})", encode_dict(properties.map()))]
            }
            CypherStatement::UpdateVertex {
                label,
                match_key,
                properties,
            } => {
                vec![
                    format!("MATCH (n:{label} {})", match_key.render()),
                    format!("SET n += {}", encode_dict(properties.map())),
                ]
            }
            CypherStatement::DeleteVertex { label, match_key } => {
                vec![
                    format!("MATCH (n:{label} {})", match_key.render()),
                    "DETACH DELETE n".to_string(),
                ]
            }
            CypherStatement::UpsertEdge {
                label,
                start_label,
                end_label,
                start_ident,
                end_ident,
                properties,
            } => {
                vec![
                    format!(
                        "MATCH (a:{start_label} {{ident: {}}})",
                        quote_string(start_ident)
                    ),
                    format!("MATCH (b:{end_label} {{ident: {}}})", quote_string(end_ident)),
                    format!(
                        "MERGE (a)-[e:{label} {}]->(b)",
                        encode_dict(properties.map())
                    ),
                ]
            }
            CypherStatement::DeleteEdge {
                label,
                start_ident,
                end_ident,
                start_id,
                end_id,
            } => {
                let predicate = match (start_id, end_id) {
                    (Some(s), Some(e)) => format!("{{start_id: {s}, end_id: {e}}}"),
                    _ => format!(
                        "{{start_ident: {}, end_ident: {}}}",
                        quote_string(start_ident),
                        quote_string(end_ident)
                    ),
                };
                vec![
                    format!("MATCH ()-[e:{label} {predicate}]->()"),
                    "DELETE e".to_string(),
                ]
            }
        }
    }

    pub fn to_cypher(&self) -> String {
        self.clauses().join(" ")
    }
}

impl std::fmt::Display for CypherStatement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_cypher())
    }
}

fn require_non_blank(
    value: &Option<String>,
    statement: &'static str,
    key: &str,
) -> Result<String, EmissionError> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v.clone()),
        _ => Err(EmissionError::MissingRequiredProperty {
            statement,
            key: key.to_string(),
        }),
    }
}

fn require_label(label: &str, statement: &'static str) -> Result<(), EmissionError> {
    if label.trim().is_empty() {
        return Err(EmissionError::MissingLabel { statement });
    }
    Ok(())
}

fn require_ident_property(properties: &Properties, statement: &'static str) -> Result<(), EmissionError> {
    if !properties.has_ident() {
        return Err(EmissionError::MissingRequiredProperty {
            statement,
            key: "ident".to_string(),
        });
    }
    Ok(())
}

pub fn lower(mutation: &Mutation) -> Result<Vec<CypherStatement>, EmissionError> {
    match (mutation.entity, mutation.operation) {
        (EntityKind::Vertex, Operation::Add) => {
            require_label(&mutation.label, "CreateVertex")?;
            require_ident_property(&mutation.properties, "CreateVertex")?;
            Ok(vec![CypherStatement::CreateVertex {
                label: mutation.label.clone(),
                properties: mutation.properties.clone(),
            }])
        }
        (EntityKind::Vertex, Operation::Update) => {
            require_label(&mutation.label, "UpdateVertex")?;
            require_ident_property(&mutation.properties, "UpdateVertex")?;
            let match_key = match mutation.id {
                Some(id) => MatchKey::Id(id),
                None => MatchKey::Ident(mutation.properties.ident().unwrap().to_string()),
            };
            Ok(vec![CypherStatement::UpdateVertex {
                label: mutation.label.clone(),
                match_key,
                properties: mutation.properties.clone(),
            }])
        }
        (EntityKind::Vertex, Operation::Remove) => {
            require_label(&mutation.label, "DeleteVertex")?;
            let match_key = match mutation.id {
                Some(id) => MatchKey::Id(id),
                None => MatchKey::Ident(mutation.ident.clone()),
            };
            Ok(vec![CypherStatement::DeleteVertex {
                label: mutation.label.clone(),
                match_key,
            }])
        }
        (EntityKind::Edge, Operation::Add) | (EntityKind::Edge, Operation::Update) => {
            require_label(&mutation.label, "UpsertEdge")?;
            require_ident_property(&mutation.properties, "UpsertEdge")?;
            let start_ident = require_non_blank(&mutation.start_ident, "UpsertEdge", "start_ident")?;
            let end_ident = require_non_blank(&mutation.end_ident, "UpsertEdge", "end_ident")?;
            let start_label = require_non_blank(&mutation.start_label, "UpsertEdge", "start_label")?;
            let end_label = require_non_blank(&mutation.end_label, "UpsertEdge", "end_label")?;
            Ok(vec![CypherStatement::UpsertEdge {
                label: mutation.label.clone(),
                start_label,
                end_label,
                start_ident,
                end_ident,
                properties: mutation.properties.clone(),
            }])
        }
        (EntityKind::Edge, Operation::Remove) => {
            require_label(&mutation.label, "DeleteEdge")?;
            let start_ident = require_non_blank(&mutation.start_ident, "DeleteEdge", "start_ident")?;
            let end_ident = require_non_blank(&mutation.end_ident, "DeleteEdge", "end_ident")?;
            Ok(vec![CypherStatement::DeleteEdge {
                label: mutation.label.clone(),
                start_ident,
                end_ident,
                start_id: mutation.start_id,
                end_id: mutation.end_id,
            }])
        }
    }
}
