//! Insertion-ordered entity containers.
//!
//! Containers do not hold a back-reference to their owning [`crate::model::graph::Graph`]
//! (see `DESIGN.md` Open Question 6): `query` and its forwarding
//! shortcuts (`filter`, `label`, `ident`, `prop`, `props`, and the
//! edge-only `start_ident`/`end_ident`) take the owning `Graph`
//! explicitly as an argument instead of storing a pointer to it, and
//! reject a mismatched graph with [`crate::error::GraphModelError::Unattached`]
//! rather than panicking.

use std::ops::{Index, IndexMut};

use serde::{Deserialize, Serialize};

use crate::error::{GraphModelError, Result};
use crate::query::QueryBuilder;

use super::edge::Edge;
use super::graph::Graph;
use super::value::Value;
use super::vertex::Vertex;

/// An insertion-ordered list of entities, looked up either by index or
/// by their `ident`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityList<T> {
    items: Vec<T>,
}

impl<T> Default for EntityList<T> {
    fn default() -> Self {
        Self { items: Vec::new() }
    }
}

impl<T> EntityList<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn push(&mut self, item: T) {
        self.items.push(item);
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, T> {
        self.items.iter_mut()
    }

    pub fn as_slice(&self) -> &[T] {
        &self.items
    }
}

impl<T> EntityList<T>
where
    T: HasIdent,
{
    pub fn get_by_ident(&self, ident: &str) -> Option<&T> {
        self.items.iter().find(|item| item.ident() == ident)
    }

    pub fn get_by_ident_mut(&mut self, ident: &str) -> Option<&mut T> {
        self.items.iter_mut().find(|item| item.ident() == ident)
    }

    pub fn contains_ident(&self, ident: &str) -> bool {
        self.items.iter().any(|item| item.ident() == ident)
    }

    /// Remove the entity with this ident, if present. No-op otherwise,
    /// matching the original's "remove is a no-op if the entity isn't
    /// found" behavior rather than erroring.
    pub fn remove_by_ident(&mut self, ident: &str) -> Option<T> {
        let pos = self.items.iter().position(|item| item.ident() == ident)?;
        Some(self.items.remove(pos))
    }
}

impl<T> EntityList<T> {
    /// Remove and return the entity at `index`, panicking like
    /// `Vec::remove` if it's out of bounds.
    pub fn remove(&mut self, index: usize) -> T {
        self.items.remove(index)
    }
}

impl<T: PartialEq> EntityList<T> {
    pub fn contains(&self, item: &T) -> bool {
        self.items.contains(item)
    }
}

/// Query-builder shortcuts on `Vertices` (`graph.vertices.query(&graph)`,
/// `graph.vertices.label("Person")`, ...), each taking the owning
/// `Graph` explicitly rather than via a stored back-reference (see
/// `DESIGN.md` Open Question 6). `query` checks that `self` really is
/// `graph.vertices` — calling it with a mismatched graph is the
/// borrow-checked equivalent of the original's "asked for a query
/// builder before the owning graph was wired in".
impl EntityList<Vertex> {
    pub fn query<'g>(&'g self, graph: &'g Graph) -> Result<QueryBuilder<'g, Vertex>> {
        if !std::ptr::eq(self, &graph.vertices) {
            return Err(GraphModelError::Unattached.into());
        }
        Ok(graph.vertices_query())
    }

    pub fn filter<'g>(
        &'g self,
        graph: &'g Graph,
        attr: impl Into<String>,
        value: impl Into<Value>,
    ) -> Result<QueryBuilder<'g, Vertex>> {
        Ok(self.query(graph)?.filter(attr, value))
    }

    pub fn label<'g>(&'g self, graph: &'g Graph, label: impl Into<String>) -> Result<QueryBuilder<'g, Vertex>> {
        Ok(self.query(graph)?.label(label))
    }

    pub fn ident<'g>(&'g self, graph: &'g Graph, ident: impl Into<String>) -> Result<QueryBuilder<'g, Vertex>> {
        Ok(self.query(graph)?.ident(ident))
    }

    pub fn prop<'g>(
        &'g self,
        graph: &'g Graph,
        key: impl Into<String>,
        value: impl Into<Value>,
    ) -> Result<QueryBuilder<'g, Vertex>> {
        Ok(self.query(graph)?.prop(key, value))
    }

    pub fn props<'g>(
        &'g self,
        graph: &'g Graph,
        props: impl IntoIterator<Item = (String, Value)>,
    ) -> Result<QueryBuilder<'g, Vertex>> {
        Ok(self.query(graph)?.props(props))
    }
}

/// Same shortcuts as `EntityList<Vertex>`, plus the edge-only
/// `start_ident`/`end_ident` filters.
impl EntityList<Edge> {
    pub fn query<'g>(&'g self, graph: &'g Graph) -> Result<QueryBuilder<'g, Edge>> {
        if !std::ptr::eq(self, &graph.edges) {
            return Err(GraphModelError::Unattached.into());
        }
        Ok(graph.edges_query())
    }

    pub fn filter<'g>(
        &'g self,
        graph: &'g Graph,
        attr: impl Into<String>,
        value: impl Into<Value>,
    ) -> Result<QueryBuilder<'g, Edge>> {
        Ok(self.query(graph)?.filter(attr, value))
    }

    pub fn label<'g>(&'g self, graph: &'g Graph, label: impl Into<String>) -> Result<QueryBuilder<'g, Edge>> {
        Ok(self.query(graph)?.label(label))
    }

    pub fn ident<'g>(&'g self, graph: &'g Graph, ident: impl Into<String>) -> Result<QueryBuilder<'g, Edge>> {
        Ok(self.query(graph)?.ident(ident))
    }

    pub fn prop<'g>(
        &'g self,
        graph: &'g Graph,
        key: impl Into<String>,
        value: impl Into<Value>,
    ) -> Result<QueryBuilder<'g, Edge>> {
        Ok(self.query(graph)?.prop(key, value))
    }

    pub fn props<'g>(
        &'g self,
        graph: &'g Graph,
        props: impl IntoIterator<Item = (String, Value)>,
    ) -> Result<QueryBuilder<'g, Edge>> {
        Ok(self.query(graph)?.props(props))
    }

    pub fn start_ident<'g>(&'g self, graph: &'g Graph, ident: impl Into<String>) -> Result<QueryBuilder<'g, Edge>> {
        Ok(self.query(graph)?.start_ident(ident))
    }

    pub fn end_ident<'g>(&'g self, graph: &'g Graph, ident: impl Into<String>) -> Result<QueryBuilder<'g, Edge>> {
        Ok(self.query(graph)?.end_ident(ident))
    }
}

impl<T> Index<usize> for EntityList<T> {
    type Output = T;
    fn index(&self, index: usize) -> &T {
        &self.items[index]
    }
}

impl<T> IndexMut<usize> for EntityList<T> {
    fn index_mut(&mut self, index: usize) -> &mut T {
        &mut self.items[index]
    }
}

impl<T> IntoIterator for EntityList<T> {
    type Item = T;
    type IntoIter = std::vec::IntoIter<T>;
    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

impl<'a, T> IntoIterator for &'a EntityList<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;
    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

impl<T> FromIterator<T> for EntityList<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self {
            items: iter.into_iter().collect(),
        }
    }
}

/// Minimal trait both `Vertex` and `Edge` satisfy, letting
/// `EntityList<T>` implement ident-keyed lookup generically.
pub trait HasIdent {
    fn ident(&self) -> &str;
}

impl HasIdent for super::vertex::Vertex {
    fn ident(&self) -> &str {
        super::vertex::Vertex::ident(self)
    }
}

impl HasIdent for super::edge::Edge {
    fn ident(&self) -> &str {
        super::edge::Edge::ident(self)
    }
}

pub type Vertices = EntityList<super::vertex::Vertex>;
pub type Edges = EntityList<super::edge::Edge>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::properties::Properties;
    use crate::model::vertex::Vertex;

    #[test]
    fn get_by_ident_finds_the_right_vertex() {
        let mut list = Vertices::new();
        let mut props = Properties::new();
        props.set_ident("alice");
        list.push(Vertex::new("Person", props).unwrap());

        assert!(list.get_by_ident("alice").is_some());
        assert!(list.get_by_ident("bob").is_none());
    }

    #[test]
    fn remove_by_ident_is_noop_when_absent() {
        let mut list = Vertices::new();
        assert!(list.remove_by_ident("nobody").is_none());
    }

    #[test]
    fn remove_takes_the_entity_at_the_given_index() {
        let mut list = Vertices::new();
        let mut props = Properties::new();
        props.set_ident("alice");
        list.push(Vertex::new("Person", props).unwrap());

        let removed = list.remove(0);
        assert_eq!(removed.ident(), "alice");
        assert!(list.is_empty());
    }

    #[test]
    fn contains_checks_by_value_not_just_ident() {
        let mut props = Properties::new();
        props.set_ident("alice");
        let vertex = Vertex::new("Person", props).unwrap();

        let mut list = Vertices::new();
        list.push(vertex.clone());

        assert!(list.contains(&vertex));

        let mut other_props = Properties::new();
        other_props.set_ident("bob");
        assert!(!list.contains(&Vertex::new("Person", other_props).unwrap()));
    }

    #[test]
    fn query_forwards_through_graph_label_filter() {
        let mut graph = crate::model::graph::Graph::new("g");
        graph.add_vertex("Person", Properties::new()).unwrap();
        graph.add_vertex("Company", Properties::new()).unwrap();

        let results = graph.vertices.label(&graph, "Person").unwrap().all();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].label, "Person");
    }

    #[test]
    fn query_rejects_a_container_that_does_not_belong_to_the_given_graph() {
        let graph_a = crate::model::graph::Graph::new("a");
        let graph_b = crate::model::graph::Graph::new("b");

        let result = graph_a.vertices.query(&graph_b);
        assert!(result.is_err());
    }

    #[test]
    fn edge_container_forwards_start_and_end_ident_filters() {
        let mut graph = crate::model::graph::Graph::new("g");
        graph.add_edge("KNOWS", "alice", "bob", Properties::new()).unwrap();

        let found = graph.edges.start_ident(&graph, "alice").unwrap().first();
        assert!(found.is_some());

        let missing = graph.edges.end_ident(&graph, "nobody").unwrap().first();
        assert!(missing.is_none());
    }
}
