//! Neo4j backend over the bolt protocol (`neo4rs`).
//!
//! ```ignore
//! use tweetgraph::graph::backends::neo4j::Neo4jClient;
//!
//! let client = Neo4jClient::connect(&config.neo4j).await?;
//! client.verify_connectivity().await?;
//! ```

use std::collections::HashMap;

use async_trait::async_trait;
use neo4rs::{BoltList, BoltMap, BoltNull, BoltString, BoltType, ConfigBuilder, Graph};
use serde_json::Value as JsonValue;

use crate::config::Neo4jConfig;
use crate::error::AppError;
use crate::graph::row::{Params, Row, RowStream};
use crate::graph::traits::{CypherExecutor, GraphClient};

/// Neo4j graph client.
///
/// Wraps the `neo4rs` connection pool. The pool lives exactly as long as
/// this value; dropping it closes every pooled connection.
pub struct Neo4jClient {
    graph: Graph,
    uri: String,
}

impl Neo4jClient {
    /// Builds the connection pool from configuration.
    ///
    /// `neo4rs` opens connections lazily, so pair this with
    /// [`GraphClient::verify_connectivity`] to fail fast.
    pub async fn connect(config: &Neo4jConfig) -> Result<Self, AppError> {
        let mut builder = ConfigBuilder::default()
            .uri(config.uri.as_str())
            .user(config.user.as_str())
            .password(config.password.as_deref().unwrap_or(""))
            .max_connections(config.max_connections)
            .fetch_size(config.fetch_size);
        if let Some(db) = config.database.as_deref() {
            builder = builder.db(db);
        }

        let graph = Graph::connect(builder.build()?).await?;
        Ok(Self {
            graph,
            uri: config.uri.clone(),
        })
    }

    fn build_query(cypher: &str, params: Params) -> neo4rs::Query {
        params
            .into_iter()
            .fold(neo4rs::Query::new(cypher.to_string()), |query, (name, value)| {
                query.param(&name, to_bolt(value))
            })
    }

    fn query_error(cypher: &str, err: neo4rs::Error) -> AppError {
        AppError::Query {
            message: format!("Cypher query failed: {}", err),
            query: cypher.to_string(),
        }
    }
}

impl Drop for Neo4jClient {
    fn drop(&mut self) {
        tracing::debug!(uri = %self.uri, "Closing Neo4j connection pool");
    }
}

#[async_trait]
impl CypherExecutor for Neo4jClient {
    async fn execute_cypher(
        &self,
        cypher: &str,
        params: Params,
    ) -> Result<RowStream<'_>, AppError> {
        use async_stream::try_stream;

        let query = Self::build_query(cypher, params);
        let mut rows = self
            .graph
            .execute(query)
            .await
            .map_err(|e| Self::query_error(cypher, e))?;
        let cypher = cypher.to_string();

        Ok(Box::pin(try_stream! {
            while let Some(row) = rows
                .next()
                .await
                .map_err(|e| Self::query_error(&cypher, e))?
            {
                yield parse_neo4j_row(&row)?;
            }
        }))
    }

    async fn run_cypher(&self, cypher: &str, params: Params) -> Result<(), AppError> {
        self.graph
            .run(Self::build_query(cypher, params))
            .await
            .map_err(|e| Self::query_error(cypher, e))
    }
}

#[async_trait]
impl GraphClient for Neo4jClient {
    fn backend_name(&self) -> &'static str {
        "neo4j"
    }

    async fn verify_connectivity(&self) -> Result<(), AppError> {
        self.run_cypher("RETURN 1", Params::new()).await
    }
}

/// Converts a JSON parameter into the bolt value the driver sends.
///
/// Integers stay integers: property matches in Neo4j compare by type, so a
/// number that arrives as a float or string never equals the stored key.
fn to_bolt(value: JsonValue) -> BoltType {
    match value {
        JsonValue::Null => BoltType::Null(BoltNull),
        JsonValue::Bool(b) => b.into(),
        JsonValue::Number(n) => match n.as_i64() {
            Some(i) => i.into(),
            None => n.as_f64().unwrap_or(f64::NAN).into(),
        },
        JsonValue::String(s) => s.into(),
        JsonValue::Array(items) => {
            BoltType::List(BoltList::from(items.into_iter().map(to_bolt).collect::<Vec<_>>()))
        }
        JsonValue::Object(entries) => {
            let mut map = BoltMap::new();
            for (key, value) in entries {
                map.put(BoltString::from(key), to_bolt(value));
            }
            BoltType::Map(map)
        }
    }
}

fn parse_neo4j_row(row: &neo4rs::Row) -> Result<Row, AppError> {
    row.to::<HashMap<String, JsonValue>>()
        .map(Row::new)
        .map_err(|e| AppError::Internal(format!("failed to decode Neo4j row: {}", e)))
}
