//! A named collection of vertices and edges: the unit of diffing,
//! persistence, and snapshotting in this crate.

use indexmap::IndexMap;
use parking_lot::Mutex;
use petgraph::graphmap::DiGraphMap;
use serde::{Deserialize, Serialize};

use crate::driver::agtype::AgtypeRecord;
use crate::error::{GraphModelError, Result};
use crate::query::{QueryBuilder, QueryCache};

use super::container::{Edges, Vertices};
use super::edge::Edge;
use super::properties::Properties;
use super::value::Value;
use super::vertex::Vertex;

#[derive(Debug, Serialize, Deserialize)]
pub struct Graph {
    pub name: String,
    pub vertices: Vertices,
    pub edges: Edges,

    #[serde(skip)]
    vertex_cache: Mutex<QueryCache>,
    #[serde(skip)]
    edge_cache: Mutex<QueryCache>,
}

impl Graph {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            vertices: Vertices::new(),
            edges: Edges::new(),
            vertex_cache: Mutex::new(QueryCache::default()),
            edge_cache: Mutex::new(QueryCache::default()),
        }
    }

    /// Like [`Graph::new`], but with an explicit LRU capacity for both
    /// the vertex and edge query caches instead of
    /// [`crate::query::cache::DEFAULT_CAPACITY`].
    pub fn with_cache_capacity(name: impl Into<String>, capacity: usize) -> Self {
        Self {
            name: name.into(),
            vertices: Vertices::new(),
            edges: Edges::new(),
            vertex_cache: Mutex::new(QueryCache::new(capacity)),
            edge_cache: Mutex::new(QueryCache::new(capacity)),
        }
    }

    // ---- mutation ----

    pub fn add_vertex(&mut self, label: impl Into<String>, properties: Properties) -> Result<&Vertex> {
        let vertex = Vertex::new(label, properties)?;
        self.add_vertex_instance(vertex)
    }

    pub fn add_vertex_instance(&mut self, vertex: Vertex) -> Result<&Vertex> {
        let ident = vertex.ident().to_string();
        self.vertices.push(vertex);
        self.invalidate_caches();
        Ok(self
            .vertices
            .get_by_ident(&ident)
            .expect("just inserted"))
    }

    pub fn add_edge(
        &mut self,
        label: impl Into<String>,
        start_ident: impl Into<String>,
        end_ident: impl Into<String>,
        properties: Properties,
    ) -> Result<&Edge> {
        let edge = Edge::new_with_endpoints(label, start_ident, end_ident, properties)?;
        self.add_edge_instance(edge)
    }

    pub fn add_edge_instance(&mut self, edge: Edge) -> Result<&Edge> {
        let ident = edge.ident().to_string();
        self.edges.push(edge);
        self.invalidate_caches();
        Ok(self.edges.get_by_ident(&ident).expect("just inserted"))
    }

    /// No-op if no vertex with this ident exists.
    pub fn remove_vertex(&mut self, ident: &str) {
        if self.vertices.remove_by_ident(ident).is_some() {
            self.invalidate_caches();
        }
    }

    /// No-op if no edge with this ident exists.
    pub fn remove_edge(&mut self, ident: &str) {
        if self.edges.remove_by_ident(ident).is_some() {
            self.invalidate_caches();
        }
    }

    pub fn get_vertex_by_ident(&self, ident: &str) -> Option<&Vertex> {
        self.vertices.get_by_ident(ident)
    }

    pub fn get_edge_by_ident(&self, ident: &str) -> Option<&Edge> {
        self.edges.get_by_ident(ident)
    }

    /// If a vertex with this ident already exists, deep-merge the
    /// incoming properties/label into it. Otherwise insert as new.
    pub fn upsert_vertex(&mut self, vertex: Vertex) -> Result<&Vertex> {
        let ident = vertex.ident().to_string();
        if self.vertices.get_by_ident(&ident).is_some() {
            let existing = self
                .vertices
                .get_by_ident_mut(&ident)
                .expect("checked above");
            existing.upsert(Some(vertex.label), Some(&vertex.properties));
            self.invalidate_caches();
            return Ok(self.vertices.get_by_ident(&ident).expect("just updated"));
        }
        self.add_vertex_instance(vertex)
    }

    /// Match first by ident; if absent, fall back to matching on
    /// `(start_ident, end_ident, label)`; if that also misses, insert
    /// as new via the validating `add_edge_instance` path.
    pub fn upsert_edge(&mut self, edge: Edge) -> Result<&Edge> {
        let ident = edge.ident().to_string();
        if self.get_edge_by_ident(&ident).is_some() {
            return self.merge_edge_into(&ident, edge);
        }

        let fallback_ident = self
            .edges_query()
            .start_ident(edge.start_ident())
            .end_ident(edge.end_ident())
            .label(&edge.label)
            .first()
            .map(|existing| existing.ident().to_string());

        match fallback_ident {
            Some(existing_ident) => self.merge_edge_into(&existing_ident, edge),
            None => self.add_edge_instance(edge),
        }
    }

    fn merge_edge_into(&mut self, existing_ident: &str, incoming: Edge) -> Result<&Edge> {
        let existing = self
            .edges
            .get_by_ident_mut(existing_ident)
            .expect("caller verified presence");
        existing.upsert(Some(incoming.label), Some(&incoming.properties));
        self.invalidate_caches();
        Ok(self.edges.get_by_ident(existing_ident).expect("just updated"))
    }

    fn invalidate_caches(&mut self) {
        self.vertex_cache.lock().clear();
        self.edge_cache.lock().clear();
    }

    // ---- query builder entry points ----

    pub fn vertices_query(&self) -> QueryBuilder<'_, Vertex> {
        QueryBuilder::new(&self.name, &self.vertices, &self.vertex_cache)
    }

    pub fn edges_query(&self) -> QueryBuilder<'_, Edge> {
        QueryBuilder::new(&self.name, &self.edges, &self.edge_cache)
    }

    pub fn vertex_cache_len(&self) -> usize {
        self.vertex_cache.lock().len()
    }

    pub fn edge_cache_len(&self) -> usize {
        self.edge_cache.lock().len()
    }

    // ---- snapshot I/O ----

    pub fn deepcopy(&self) -> Graph {
        Graph {
            name: self.name.clone(),
            vertices: self.vertices.clone(),
            edges: self.edges.clone(),
            vertex_cache: Mutex::new(QueryCache::default()),
            edge_cache: Mutex::new(QueryCache::default()),
        }
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self).map_err(crate::error::DriverError::from)?)
    }

    pub fn from_json(json: &str) -> Result<Graph> {
        Ok(serde_json::from_str(json).map_err(crate::error::DriverError::from)?)
    }

    /// Partitions the incoming rows by kind and rebuilds a graph from
    /// scratch, preserving each row's store id and (for edges) its
    /// endpoint idents and store endpoint ids.
    pub fn from_agtype_records(name: impl Into<String>, records: Vec<AgtypeRecord>) -> Result<Graph> {
        let mut graph = Graph::new(name);
        let (vertex_rows, edge_rows): (Vec<_>, Vec<_>) =
            records.into_iter().partition(|r| r.is_vertex());

        for row in vertex_rows {
            let props = Properties::from_map(row.properties);
            if !props.has_ident() {
                return Err(GraphModelError::MissingReservedProperty("ident").into());
            }
            let mut vertex = Vertex::new(row.label, props)?;
            if let Some(id) = row.id {
                vertex = vertex.with_id(id)?;
            }
            graph.add_vertex_instance(vertex)?;
        }

        for row in edge_rows {
            let props = Properties::from_map(row.properties);
            let mut edge = Edge::new(row.label, props)?;
            if let (Some(id), Some(start_id), Some(end_id)) = (row.id, row.start_id, row.end_id) {
                edge.id = Some(id);
                edge = edge.with_endpoint_ids(start_id, end_id);
            }
            graph.add_edge_instance(edge)?;
        }

        Ok(graph)
    }

    /// Vertices before edges, matching the persistence layer's
    /// expected write order.
    pub fn to_agtype_records(&self) -> Vec<AgtypeRecord> {
        let mut records: Vec<AgtypeRecord> = self
            .vertices
            .iter()
            .map(|v| AgtypeRecord {
                label: v.label.clone(),
                properties: v.properties.map().clone(),
                id: v.id,
                start_id: None,
                end_id: None,
            })
            .collect();
        records.extend(self.edges.iter().map(|e| AgtypeRecord {
            label: e.label.clone(),
            properties: e.properties.map().clone(),
            id: e.id,
            start_id: e.start_id(),
            end_id: e.end_id(),
        }));
        records
    }

    /// Native in-memory form (as opposed to [`Graph::to_json`]'s
    /// string form): a nested [`Value::Map`] mirroring this graph's
    /// shape exactly, suitable for embedding inside a larger
    /// [`Value`]-typed document without a JSON round trip.
    pub fn to_dict(&self) -> IndexMap<String, Value> {
        let mut dict = IndexMap::new();
        dict.insert("name".to_string(), Value::String(self.name.clone()));
        dict.insert(
            "vertices".to_string(),
            Value::List(self.vertices.iter().map(vertex_to_dict).collect()),
        );
        dict.insert(
            "edges".to_string(),
            Value::List(self.edges.iter().map(edge_to_dict).collect()),
        );
        dict
    }

    pub fn from_dict(dict: IndexMap<String, Value>) -> Result<Graph> {
        let name = match dict.get("name") {
            Some(Value::String(s)) => s.clone(),
            _ => return Err(GraphModelError::MissingReservedProperty("name").into()),
        };
        let mut graph = Graph::new(name);

        if let Some(Value::List(vertices)) = dict.get("vertices") {
            for entry in vertices {
                let Value::Map(fields) = entry else {
                    continue;
                };
                let label = match fields.get("label") {
                    Some(Value::String(s)) => s.clone(),
                    _ => return Err(GraphModelError::InvalidLabel(String::new()).into()),
                };
                let properties = match fields.get("properties") {
                    Some(Value::Map(props)) => Properties::from_map(props.clone()),
                    _ => Properties::new(),
                };
                graph.add_vertex(label, properties)?;
            }
        }

        if let Some(Value::List(edges)) = dict.get("edges") {
            for entry in edges {
                let Value::Map(fields) = entry else {
                    continue;
                };
                let label = match fields.get("label") {
                    Some(Value::String(s)) => s.clone(),
                    _ => return Err(GraphModelError::InvalidLabel(String::new()).into()),
                };
                let properties = match fields.get("properties") {
                    Some(Value::Map(props)) => Properties::from_map(props.clone()),
                    _ => Properties::new(),
                };
                graph.add_edge_instance(Edge::new(label, properties)?)?;
            }
        }

        Ok(graph)
    }

    /// A lossy, topology-only view as a `petgraph` directed graph map —
    /// the Rust analogue of the original's NetworkX interop, for
    /// feeding this graph's shape into generic graph-algorithm
    /// tooling. Carries vertex idents as nodes and edge labels as edge
    /// weights; full entity content (properties, store ids) survives
    /// only through [`Graph::to_json`]/[`Graph::to_agtype_records`].
    pub fn to_petgraph(&self) -> DiGraphMap<&str, &str> {
        let mut g = DiGraphMap::new();
        for vertex in self.vertices.iter() {
            g.add_node(vertex.ident());
        }
        for edge in self.edges.iter() {
            g.add_edge(edge.start_ident(), edge.end_ident(), edge.label.as_str());
        }
        g
    }

    /// Rebuilds a graph from a topology-only `petgraph` directed graph
    /// map. Since `DiGraphMap` carries no vertex label or property
    /// data, reconstructed vertices get the placeholder label
    /// `"Vertex"` — round-tripping through this conversion is lossy by
    /// design (see [`Graph::to_petgraph`]).
    pub fn from_petgraph(name: impl Into<String>, g: &DiGraphMap<&str, &str>) -> Result<Graph> {
        let mut graph = Graph::new(name);
        for ident in g.nodes() {
            let mut props = Properties::new();
            props.set_ident(ident);
            graph.add_vertex_instance(Vertex::new("Vertex", props)?)?;
        }
        for (start, end, label) in g.all_edges() {
            graph.add_edge(*label, start, end, Properties::new())?;
        }
        Ok(graph)
    }
}

fn vertex_to_dict(vertex: &Vertex) -> Value {
    let mut fields = IndexMap::new();
    fields.insert("label".to_string(), Value::String(vertex.label.clone()));
    fields.insert("properties".to_string(), Value::Map(vertex.properties.map().clone()));
    Value::Map(fields)
}

fn edge_to_dict(edge: &Edge) -> Value {
    let mut fields = IndexMap::new();
    fields.insert("label".to_string(), Value::String(edge.label.clone()));
    fields.insert("properties".to_string(), Value::Map(edge.properties.map().clone()));
    Value::Map(fields)
}

impl Clone for Graph {
    fn clone(&self) -> Self {
        self.deepcopy()
    }
}

impl PartialEq for Graph {
    /// Two graphs are equal iff their canonical form is equal: same
    /// name, and vertex/edge lists equal in order and content.
    /// Transient query-cache state never participates in equality.
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && self.vertices == other.vertices && self.edges == other.edges
    }
}
