//! Persistence Driver: the only async, network-facing boundary in this
//! crate. Talks to Postgres + Apache AGE over an injected [`sqlx::PgPool`]
//! — pool construction and credential loading are the caller's job.

pub mod agtype;

#[cfg(feature = "postgres")]
mod pg {
    use std::future::Future;

    use sqlx::postgres::{PgConnection, PgPoolOptions};
    use sqlx::{PgPool, Postgres, Row, Transaction};

    use crate::error::{DriverError, Result};
    use crate::model::graph::Graph;
    use crate::mutation::{CypherStatement, Patch};

    use super::agtype::decode_agtype_recordset;

    /// Quotes a string as a Postgres SQL literal (doubled single
    /// quotes) — distinct from Cypher string-literal escaping, which
    /// this crate's `value::quote_string` handles separately.
    fn sql_quote_literal(s: &str) -> String {
        format!("'{}'", s.replace('\'', "''"))
    }

    /// Configuration for the connection pool, mirroring the pooling
    /// knobs a caller typically wants to tune for a managed Postgres
    /// instance.
    #[derive(Debug, Clone)]
    pub struct DriverConfig {
        pub database_url: String,
        pub max_connections: u32,
    }

    impl DriverConfig {
        pub fn from_env() -> Self {
            Self {
                database_url: std::env::var("DATABASE_URL")
                    .unwrap_or_else(|_| "postgresql://localhost/ag_graph".to_string()),
                max_connections: std::env::var("AG_GRAPH_MAX_CONNECTIONS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(10),
            }
        }
    }

    /// The Persistence Driver. Cheap to clone (wraps a pool handle).
    #[derive(Clone)]
    pub struct Driver {
        pool: PgPool,
    }

    /// Every connection checked out for graph work needs the `age`
    /// extension loaded and its catalog on the search path — Postgres
    /// doesn't retain either reliably across pooled reuse.
    async fn prime(conn: &mut PgConnection) -> Result<()> {
        sqlx::query("LOAD 'age';")
            .execute(&mut *conn)
            .await
            .map_err(DriverError::from)?;
        sqlx::query("SET search_path = ag_catalog, \"$user\", public;")
            .execute(&mut *conn)
            .await
            .map_err(DriverError::from)?;
        Ok(())
    }

    impl Driver {
        pub fn new(pool: PgPool) -> Self {
            Self { pool }
        }

        pub async fn connect(config: DriverConfig) -> Result<Self> {
            let pool = PgPoolOptions::new()
                .max_connections(config.max_connections)
                .connect(&config.database_url)
                .await
                .map_err(DriverError::from)?;
            Ok(Self { pool })
        }

        pub fn pool(&self) -> &PgPool {
            &self.pool
        }

        /// Wraps arbitrary Cypher text as an AGE graph-function call.
        /// The graph name is a string literal argument to `cypher()`,
        /// not a SQL identifier; the Cypher body is dollar-quoted so it
        /// never needs its own escaping.
        fn wrap_cypher(graph_name: &str, cypher: &str) -> String {
            format!(
                "SELECT * FROM cypher({}, $$ {} $$) AS (v agtype);",
                sql_quote_literal(graph_name),
                cypher
            )
        }

        async fn run_cypher(&self, graph_name: &str, cypher: &str) -> Result<Vec<String>> {
            let mut conn = self.pool.acquire().await.map_err(DriverError::from)?;
            prime(&mut conn).await?;
            let rows = sqlx::query(&Self::wrap_cypher(graph_name, cypher))
                .fetch_all(&mut *conn)
                .await
                .map_err(DriverError::from)?;
            rows.into_iter()
                .map(|row| row.try_get::<String, _>("v").map_err(DriverError::from).map_err(Into::into))
                .collect()
        }

        pub async fn graph_exists(&self, name: &str) -> Result<bool> {
            let row = sqlx::query("SELECT count(*) AS n FROM ag_catalog.ag_graph WHERE name = $1")
                .bind(name)
                .fetch_one(&self.pool)
                .await
                .map_err(DriverError::from)?;
            let count: i64 = row.try_get("n").map_err(DriverError::from)?;
            Ok(count > 0)
        }

        pub async fn get_graph_names(&self) -> Result<Vec<String>> {
            let rows = sqlx::query("SELECT name FROM ag_catalog.ag_graph")
                .fetch_all(&self.pool)
                .await
                .map_err(DriverError::from)?;
            rows.into_iter()
                .map(|row| row.try_get::<String, _>("name").map_err(DriverError::from).map_err(Into::into))
                .collect()
        }

        /// Idempotent: a no-op if the graph is already registered.
        pub async fn ensure_graph(&self, name: &str) -> Result<()> {
            if self.graph_exists(name).await? {
                return Ok(());
            }
            let mut conn = self.pool.acquire().await.map_err(DriverError::from)?;
            prime(&mut conn).await?;
            sqlx::query(&format!("SELECT * FROM create_graph({});", sql_quote_literal(name)))
                .execute(&mut *conn)
                .await
                .map_err(DriverError::from)?;
            Ok(())
        }

        /// Removes the graph and all of its data.
        pub async fn drop_graph(&self, name: &str) -> Result<()> {
            let mut conn = self.pool.acquire().await.map_err(DriverError::from)?;
            prime(&mut conn).await?;
            sqlx::query(&format!("SELECT * FROM drop_graph({}, true);", sql_quote_literal(name)))
                .execute(&mut *conn)
                .await
                .map_err(DriverError::from)?;
            Ok(())
        }

        /// Empties the graph's vertices and edges but keeps it registered.
        pub async fn truncate_graph(&self, name: &str) -> Result<()> {
            if !self.graph_exists(name).await? {
                return Err(DriverError::GraphNotFound(name.to_string()).into());
            }
            self.run_cypher(name, "MATCH (n) DETACH DELETE n").await?;
            Ok(())
        }

        /// Full scan of the graph's vertices and edges, rehydrated into
        /// an in-memory [`Graph`].
        pub async fn get_graph(&self, name: &str) -> Result<Graph> {
            if !self.graph_exists(name).await? {
                return Err(DriverError::GraphNotFound(name.to_string()).into());
            }
            let mut rows = self.run_cypher(name, "MATCH (n) RETURN n").await?;
            rows.extend(self.run_cypher(name, "MATCH ()-[e]->() RETURN e").await?);
            let records = decode_agtype_recordset(&rows)?;
            Graph::from_agtype_records(name, records)
        }

        /// Computes the diff against the current remote state (treating
        /// a missing remote graph as empty) and applies it in one
        /// transaction.
        pub async fn upsert_graph(&self, graph: &Graph) -> Result<Patch> {
            self.ensure_graph(&graph.name).await?;
            let remote = match self.get_graph(&graph.name).await {
                Ok(remote) => remote,
                Err(_) => {
                    tracing::warn!(graph = %graph.name, "upsert_graph found no remote state, diffing from empty");
                    Graph::new(&graph.name)
                }
            };
            self.patch_graph(remote, graph.deepcopy()).await
        }

        /// Eager form: diffs `old` to `new` and applies the result in a
        /// single transaction, returning the applied [`Patch`].
        pub async fn patch_graph(&self, old: Graph, new: Graph) -> Result<Patch> {
            let graph_name = new.name.clone();
            let patch = Patch::diff(old, new).map_err(crate::error::Error::from)?;
            let statements = patch.to_cypher_statements().map_err(crate::error::Error::from)?;
            self.apply_statements(&graph_name, &statements).await?;
            Ok(patch)
        }

        /// Scoped-session form: hands `f` a mutable deep copy of `graph`
        /// to edit; on success, diffs the edit against the original and
        /// applies it in one transaction. On error from `f`, no
        /// transaction is ever opened and `graph` is left untouched.
        pub async fn patch_session<F, Fut>(&self, graph: &Graph, f: F) -> Result<Graph>
        where
            F: FnOnce(Graph) -> Fut,
            Fut: Future<Output = Result<Graph>>,
        {
            let scratch = graph.deepcopy();
            let mutated = f(scratch).await?;
            self.patch_graph(graph.deepcopy(), mutated.deepcopy()).await?;
            Ok(mutated)
        }

        #[tracing::instrument(skip(self, statements), fields(count = statements.len()))]
        async fn apply_statements(&self, graph_name: &str, statements: &[CypherStatement]) -> Result<()> {
            if statements.is_empty() {
                return Ok(());
            }
            let mut tx: Transaction<'_, Postgres> = self.pool.begin().await.map_err(DriverError::from)?;
            prime(&mut tx).await?;
            for statement in statements {
                let sql = Self::wrap_cypher(graph_name, &statement.to_cypher());
                sqlx::query(&sql).execute(&mut *tx).await.map_err(DriverError::from)?;
            }
            tx.commit().await.map_err(DriverError::from)?;
            tracing::debug!("batch applied");
            Ok(())
        }
    }

}

#[cfg(feature = "postgres")]
pub use pg::{Driver, DriverConfig};
