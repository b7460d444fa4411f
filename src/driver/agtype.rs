//! agtype wire format: decoding Apache AGE's `vertex`/`edge`-tagged
//! strings into plain records.

use indexmap::IndexMap;
use serde::Deserialize;

use crate::error::DriverError;
use crate::model::value::Value;

/// A vertex or edge exactly as it comes back from an AGE `cypher()`
/// call, before being folded into an in-memory [`crate::model::graph::Graph`].
#[derive(Debug, Clone, PartialEq)]
pub struct AgtypeRecord {
    pub label: String,
    pub properties: IndexMap<String, Value>,
    pub id: Option<i64>,
    pub start_id: Option<i64>,
    pub end_id: Option<i64>,
}

impl AgtypeRecord {
    pub fn is_vertex(&self) -> bool {
        !self.is_edge()
    }

    pub fn is_edge(&self) -> bool {
        self.start_id.is_some() && self.end_id.is_some()
    }
}

/// Raw JSON shape AGE embeds inside an agtype vertex/edge string.
#[derive(Debug, Deserialize)]
struct RawRecord {
    label: String,
    properties: IndexMap<String, serde_json::Value>,
    id: Option<i64>,
    start_id: Option<i64>,
    end_id: Option<i64>,
}

fn json_to_value(v: &serde_json::Value) -> Value {
    match v {
        serde_json::Value::Null => Value::Null,
        serde_json::Value::Bool(b) => Value::Bool(*b),
        serde_json::Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Value::Int(i)
            } else {
                Value::Float(n.as_f64().unwrap_or(0.0))
            }
        }
        serde_json::Value::String(s) => Value::String(s.clone()),
        serde_json::Value::Array(items) => Value::List(items.iter().map(json_to_value).collect()),
        serde_json::Value::Object(map) => {
            Value::Map(map.iter().map(|(k, v)| (k.clone(), json_to_value(v))).collect())
        }
    }
}

/// Strip AGE's `::vertex` / `::edge` type-tag suffix from one raw row
/// string, leaving the bare JSON object text.
fn strip_type_suffix(row: &str) -> &str {
    row.trim()
        .trim_end_matches("::vertex")
        .trim_end_matches("::edge")
}

/// Decode an entire agtype result set in one pass: strip each row's
/// type suffix, join the rows with commas, wrap the joined text in
/// `[...]`, and parse the whole thing as one JSON array. This is
/// meaningfully faster than parsing each row independently for large
/// result sets, and matches the batch-decode strategy this driver is
/// grounded on.
pub fn decode_agtype_recordset(rows: &[String]) -> Result<Vec<AgtypeRecord>, DriverError> {
    let joined = rows
        .iter()
        .map(|r| strip_type_suffix(r))
        .collect::<Vec<_>>()
        .join(",");
    let wrapped = format!("[{joined}]");

    let raw: Vec<RawRecord> = serde_json::from_str(&wrapped)
        .map_err(|e| DriverError::MalformedAgtype(e.to_string()))?;

    Ok(raw
        .into_iter()
        .map(|r| AgtypeRecord {
            label: r.label,
            properties: r
                .properties
                .iter()
                .map(|(k, v)| (k.clone(), json_to_value(v)))
                .collect(),
            id: r.id,
            start_id: r.start_id,
            end_id: r.end_id,
        })
        .collect())
}
