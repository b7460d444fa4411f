//! Composable, cacheable, order-preserving filter pipeline over a
//! graph's vertices or edges.
//!
//! A builder is always bound to exactly one entity kind (`Vertex` or
//! `Edge`) via its type parameter — not a runtime class-name check —
//! so there is no combined vertex+edge stream to filter down from:
//! every step only ever sees items of its own kind.

mod cache;
mod step;

pub use cache::QueryCache;
pub use step::{Queryable, Step};

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use parking_lot::Mutex;

use crate::model::container::{EntityList, HasIdent};
use crate::model::edge::Edge;
use crate::model::value::Value;

pub struct QueryBuilder<'g, T> {
    graph_name: &'g str,
    base: &'g EntityList<T>,
    cache: &'g Mutex<QueryCache>,
    steps: Vec<Step>,
}

impl<'g, T> QueryBuilder<'g, T>
where
    T: Queryable + HasIdent,
{
    pub fn new(graph_name: &'g str, base: &'g EntityList<T>, cache: &'g Mutex<QueryCache>) -> Self {
        Self {
            graph_name,
            base,
            cache,
            steps: Vec::new(),
        }
    }

    // ---- step builders ----

    pub fn filter(mut self, attr: impl Into<String>, value: impl Into<Value>) -> Self {
        self.steps.push(Step::Filter {
            attr: attr.into(),
            value: value.into(),
        });
        self
    }

    pub fn sort(mut self, key: impl Into<String>, reverse: bool) -> Self {
        self.steps.push(Step::Sort {
            key: key.into(),
            reverse,
        });
        self
    }

    pub fn reverse(mut self) -> Self {
        self.steps.push(Step::Reverse);
        self
    }

    pub fn prop(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.steps.push(Step::Props(vec![(key.into(), value.into())]));
        self
    }

    pub fn props(mut self, props: impl IntoIterator<Item = (String, Value)>) -> Self {
        self.steps.push(Step::Props(props.into_iter().collect()));
        self
    }

    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.steps.push(Step::Label(label.into()));
        self
    }

    pub fn ident(mut self, ident: impl Into<String>) -> Self {
        self.steps.push(Step::Ident(ident.into()));
        self
    }

    pub fn reset(mut self) -> Self {
        self.steps.clear();
        self
    }

    // ---- drains ----

    pub fn all(&self) -> Vec<&'g T> {
        self.applied_idents()
            .iter()
            .filter_map(|ident| self.base.get_by_ident(ident))
            .collect()
    }

    pub fn find(&self, ident: &str) -> Option<&'g T> {
        self.all().into_iter().find(|item| Queryable::ident(*item) == ident)
    }

    pub fn first(&self) -> Option<&'g T> {
        self.applied_idents()
            .first()
            .and_then(|ident| self.base.get_by_ident(ident))
    }

    pub fn last(&self) -> Option<&'g T> {
        self.applied_idents()
            .last()
            .and_then(|ident| self.base.get_by_ident(ident))
    }

    // ---- internals ----

    fn cache_key(&self) -> u64 {
        let mut hasher = DefaultHasher::new();
        self.graph_name.hash(&mut hasher);
        format!("{:?}", self.steps).hash(&mut hasher);
        hasher.finish()
    }

    fn applied_idents(&self) -> Vec<String> {
        let key = self.cache_key();
        {
            let mut cache = self.cache.lock();
            if let Some(cached) = cache.get(key) {
                tracing::trace!(graph = self.graph_name, key, "query cache hit");
                return cached;
            }
        }
        tracing::debug!(graph = self.graph_name, key, steps = self.steps.len(), "query cache miss");

        let mut items: Vec<T> = self.base.iter().cloned().collect();
        for step in &self.steps {
            items = step.apply(items);
        }
        let idents: Vec<String> = items.iter().map(|item| Queryable::ident(item).to_string()).collect();

        self.cache.lock().put(key, idents.clone());
        idents
    }
}

impl<'g> QueryBuilder<'g, Edge> {
    pub fn start_ident(mut self, ident: impl Into<String>) -> Self {
        self.steps.push(Step::StartIdent(ident.into()));
        self
    }

    pub fn end_ident(mut self, ident: impl Into<String>) -> Self {
        self.steps.push(Step::EndIdent(ident.into()));
        self
    }
}
