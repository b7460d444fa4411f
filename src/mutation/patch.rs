//! Computes a deterministic, dependency-safe sequence of mutations
//! between two graph snapshots.

use indexmap::IndexMap;

use crate::error::{EmissionError, PatchError};
use crate::model::graph::Graph;

use super::{CypherStatement, Mutation};

#[derive(Debug)]
pub struct Patch {
    pub graph_a: Graph,
    pub graph_b: Graph,
    pub mutations: Vec<Mutation>,
}

impl Patch {
    pub fn diff(graph_a: Graph, graph_b: Graph) -> Result<Self, PatchError> {
        let mutations = compute_mutations(&graph_a, &graph_b)?;
        Ok(Self {
            graph_a,
            graph_b,
            mutations,
        })
    }

    pub fn from_a_to_b(graph_a: Graph, graph_b: Graph) -> Result<Self, PatchError> {
        Self::diff(graph_a, graph_b)
    }

    pub fn to_cypher_statements(&self) -> Result<Vec<CypherStatement>, EmissionError> {
        let mut statements = Vec::new();
        for mutation in &self.mutations {
            statements.extend(mutation.to_statements()?);
        }
        Ok(statements)
    }
}

/// The six-phase diff: edge removals, vertex removals, vertex
/// additions, vertex updates, edge additions, edge updates — in that
/// order, for referential safety when replayed against a live graph.
fn compute_mutations(graph_a: &Graph, graph_b: &Graph) -> Result<Vec<Mutation>, PatchError> {
    // Entities without a non-empty ident cannot be diffed and are
    // excluded from both sides entirely, rather than surfacing a
    // spurious add/remove pair. `IndexMap` (not `HashMap`) keeps each
    // phase's emission order tied to the source graph's container
    // order instead of an unspecified hash order.
    let a_vertices: IndexMap<&str, _> = graph_a
        .vertices
        .iter()
        .map(|v| (v.ident(), v))
        .filter(|(ident, _)| !ident.trim().is_empty())
        .collect();
    let b_vertices: IndexMap<&str, _> = graph_b
        .vertices
        .iter()
        .map(|v| (v.ident(), v))
        .filter(|(ident, _)| !ident.trim().is_empty())
        .collect();
    let a_edges: IndexMap<&str, _> = graph_a
        .edges
        .iter()
        .map(|e| (e.ident(), e))
        .filter(|(ident, _)| !ident.trim().is_empty())
        .collect();
    let b_edges: IndexMap<&str, _> = graph_b
        .edges
        .iter()
        .map(|e| (e.ident(), e))
        .filter(|(ident, _)| !ident.trim().is_empty())
        .collect();

    let mut mutations = Vec::new();

    // 1. Edge removals.
    for (ident, edge) in &a_edges {
        if !b_edges.contains_key(ident) {
            mutations.push(Mutation::remove_edge(
                edge.ident(),
                edge.label.clone(),
                edge.start_ident(),
                edge.end_ident(),
                edge.id,
                edge.start_id(),
                edge.end_id(),
            ));
        }
    }

    // 2. Vertex removals.
    for (ident, vertex) in &a_vertices {
        if !b_vertices.contains_key(ident) {
            mutations.push(Mutation::remove_vertex(vertex.ident(), vertex.label.clone(), vertex.id));
        }
    }

    // 3. Vertex additions.
    for (ident, vertex) in &b_vertices {
        if !a_vertices.contains_key(ident) {
            mutations.push(Mutation::add_vertex(
                vertex.ident(),
                vertex.label.clone(),
                vertex.properties.clone(),
                vertex.id,
            ));
        }
    }

    // 4. Vertex updates.
    for (ident, b_vertex) in &b_vertices {
        if let Some(a_vertex) = a_vertices.get(ident) {
            if b_vertex.label != a_vertex.label || b_vertex.properties != a_vertex.properties {
                mutations.push(Mutation::update_vertex(
                    b_vertex.ident(),
                    b_vertex.label.clone(),
                    b_vertex.properties.clone(),
                    b_vertex.id,
                ));
            }
        }
    }

    // 5. Edge additions.
    for (ident, edge) in &b_edges {
        if a_edges.contains_key(ident) {
            continue;
        }
        if edge.start_ident().trim().is_empty() || edge.end_ident().trim().is_empty() {
            return Err(PatchError::DanglingEdge {
                ident: edge.ident().to_string(),
            });
        }
        let start_label = b_vertices.get(edge.start_ident()).map(|v| v.label.clone());
        let end_label = b_vertices.get(edge.end_ident()).map(|v| v.label.clone());
        mutations.push(Mutation::add_edge(
            edge.ident(),
            edge.label.clone(),
            edge.start_ident(),
            edge.end_ident(),
            edge.properties.clone(),
            edge.id,
            edge.start_id(),
            edge.end_id(),
            start_label,
            end_label,
        ));
    }

    // 6. Edge updates.
    for (ident, b_edge) in &b_edges {
        let Some(a_edge) = a_edges.get(ident) else {
            continue;
        };
        let changed = b_edge.label != a_edge.label
            || b_edge.start_ident() != a_edge.start_ident()
            || b_edge.end_ident() != a_edge.end_ident()
            || b_edge.properties != a_edge.properties;
        if !changed {
            continue;
        }
        if b_edge.start_ident().trim().is_empty() || b_edge.end_ident().trim().is_empty() {
            return Err(PatchError::DanglingEdge {
                ident: b_edge.ident().to_string(),
            });
        }
        let start_label = b_vertices.get(b_edge.start_ident()).map(|v| v.label.clone());
        let end_label = b_vertices.get(b_edge.end_ident()).map(|v| v.label.clone());
        mutations.push(Mutation::update_edge(
            b_edge.ident(),
            b_edge.label.clone(),
            b_edge.start_ident(),
            b_edge.end_ident(),
            b_edge.properties.clone(),
            b_edge.id,
            start_label,
            end_label,
        ));
    }

    Ok(mutations)
}
