//! Crate-wide error taxonomy.
//!
//! One `thiserror` enum per subsystem boundary, composed into a single
//! top-level [`Error`] so callers crossing several subsystems in one
//! call (e.g. the Persistence Driver diffing and emitting in the same
//! round trip) don't have to juggle several error types.

use thiserror::Error as ThisError;

/// Errors raised by the in-memory graph model (vertices, edges,
/// properties, containers).
#[derive(Debug, ThisError)]
pub enum GraphModelError {
    #[error("label must be a non-empty string, got {0:?}")]
    InvalidLabel(String),

    #[error("id must be a positive integer, got {0}")]
    InvalidId(i64),

    #[error("edge is missing required property {0:?}")]
    MissingReservedProperty(&'static str),

    #[error("start_id and end_id must both be present or both be absent (got start_id={start_id:?}, end_id={end_id:?})")]
    MismatchedEndpointIds {
        start_id: Option<i64>,
        end_id: Option<i64>,
    },

    #[error("no vertex or edge with ident {0:?} in this graph")]
    NoSuchIdent(String),

    #[error("container has no owning graph attached yet")]
    Unattached,
}

/// Errors raised while lowering a [`crate::mutation::Mutation`] to
/// Cypher text. Reaching this in practice signals the diff engine
/// failed to uphold an invariant it is expected to guarantee.
#[derive(Debug, ThisError)]
pub enum EmissionError {
    #[error("{statement} requires a non-empty label")]
    MissingLabel { statement: &'static str },

    #[error("{statement} requires property {key:?} to be present and non-empty")]
    MissingRequiredProperty {
        statement: &'static str,
        key: String,
    },

    #[error("{statement} requires both start_ident and end_ident to be present")]
    MissingEdgeEndpoints { statement: &'static str },

    #[error("cannot encode value of type {0} in a Cypher literal")]
    UnencodableValue(&'static str),
}

/// Errors raised while computing a [`crate::mutation::Patch`] between
/// two snapshots.
#[derive(Debug, ThisError)]
pub enum PatchError {
    #[error("edge {ident:?} in graph_b is missing start_ident/end_ident and cannot be added")]
    DanglingEdge { ident: String },
}

/// Errors raised by the Postgres / Apache AGE persistence driver.
#[derive(Debug, ThisError)]
pub enum DriverError {
    #[error("graph {0:?} does not exist")]
    GraphNotFound(String),

    #[error("malformed agtype payload: {0}")]
    MalformedAgtype(String),

    #[cfg(feature = "postgres")]
    #[error("postgres error: {0}")]
    Sqlx(#[from] sqlx::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

/// The crate-wide error type.
#[derive(Debug, ThisError)]
pub enum Error {
    #[error(transparent)]
    GraphModel(#[from] GraphModelError),

    #[error(transparent)]
    Emission(#[from] EmissionError),

    #[error(transparent)]
    Patch(#[from] PatchError),

    #[error(transparent)]
    Driver(#[from] DriverError),

    #[error("not found: {0}")]
    NotFound(String),
}

pub type Result<T> = std::result::Result<T, Error>;
