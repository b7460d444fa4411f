//! # ag-graph — a property graph engine persisted over Apache AGE
//!
//! An in-memory property graph (vertices, edges, an ordered property
//! map) with a fluent Query Builder, a diff/patch engine for
//! snapshot-to-snapshot mutation, and a Cypher emitter targeting
//! [Apache AGE](https://age.apache.org/) on Postgres.
//!
//! ## Design Principles
//!
//! 1. **Client-owned identity**: every vertex and edge carries a
//!    string `ident` the caller controls — the unit of diffing and
//!    equality. The store-assigned integer `id` is only ever an
//!    optimization hint for `MATCH`.
//! 2. **Clean DTOs**: [`model::Vertex`], [`model::Edge`], [`model::Value`]
//!    cross every boundary — model, query builder, mutation, driver.
//! 3. **Pure emission**: lowering a [`mutation::Mutation`] to Cypher is
//!    a pure, side-effect-free function; the only I/O boundary is
//!    [`driver`].
//! 4. **One diff, six phases**: [`mutation::Patch`] always orders its
//!    mutations edge-removals → vertex-removals → vertex-additions →
//!    vertex-updates → edge-additions → edge-updates, so replaying it
//!    against a live graph never references a vertex that doesn't
//!    exist yet or outlives its edges.
//!
//! ## Quick Start
//!
//! ```rust
//! use ag_graph::model::{Graph, Properties, Value};
//!
//! let mut graph = Graph::new("social");
//! let mut alice = Properties::new();
//! alice.set_ident("alice");
//! alice.insert("name", Value::from("Alice"));
//! graph.add_vertex("Person", alice).unwrap();
//!
//! let mut bob = Properties::new();
//! bob.set_ident("bob");
//! graph.add_vertex("Person", bob).unwrap();
//!
//! graph.add_edge("KNOWS", "alice", "bob", Properties::new()).unwrap();
//! assert_eq!(graph.vertices.len(), 2);
//! ```

pub mod driver;
pub mod error;
pub mod model;
pub mod mutation;
pub mod query;

pub use error::{Error, Result};
pub use model::{Edge, Graph, Properties, Value, Vertex};
pub use mutation::{CypherStatement, Mutation, Patch};
pub use query::{QueryBuilder, QueryCache, Queryable};
