//! Application context: configuration plus the connected graph store.

use std::sync::Arc;

use crate::config::Config;
use crate::error::AppError;
use crate::graph::backends::neo4j::Neo4jClient;
use crate::graph::GraphClient;
use crate::repositories::CypherStore;

/// Graph store backed by Neo4j.
pub type AppStore = CypherStore<Neo4jClient>;

/// Shared dependencies for one command invocation.
///
/// The connection pool is released when the last clone is dropped, on
/// success and error paths alike.
#[derive(Clone)]
pub struct Context {
    pub store: Arc<AppStore>,
    pub config: Arc<Config>,
}

impl Context {
    /// Connects to Neo4j and verifies the server answers.
    pub async fn connect(config: Config) -> Result<Self, AppError> {
        tracing::info!("Connecting to Neo4j at {}", config.neo4j.uri);
        let client = Neo4jClient::connect(&config.neo4j).await?;
        client.verify_connectivity().await?;
        tracing::info!("Connected to {}", client.backend_name());

        Ok(Self {
            store: Arc::new(CypherStore::new(client)),
            config: Arc::new(config),
        })
    }
}
