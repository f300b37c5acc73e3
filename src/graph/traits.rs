//! Core traits for graph database access.
//!
//! - [`CypherExecutor`] - runs Cypher with bound parameters
//! - [`GraphClient`] - a connected backend that can be health-checked

use async_trait::async_trait;

use crate::error::AppError;
use crate::graph::row::{Params, RowStream};

/// Executes Cypher queries against a graph database.
///
/// Every value reaches the server as a bound parameter; implementations must
/// never splice `params` into the query text.
#[async_trait]
pub trait CypherExecutor: Send + Sync {
    /// Executes a Cypher query and returns a stream of result rows.
    async fn execute_cypher(&self, cypher: &str, params: Params)
        -> Result<RowStream<'_>, AppError>;

    /// Executes a Cypher query without returning results.
    ///
    /// Use this for mutations (CREATE, DELETE, SET).
    async fn run_cypher(&self, cypher: &str, params: Params) -> Result<(), AppError>;
}

/// A connected graph backend.
#[async_trait]
pub trait GraphClient: CypherExecutor {
    /// Short backend name for log lines.
    fn backend_name(&self) -> &'static str;

    /// Round-trips a trivial query so connection problems surface before
    /// the first real write.
    async fn verify_connectivity(&self) -> Result<(), AppError>;
}
