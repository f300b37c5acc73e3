//! Graph abstraction layer for backend-agnostic database access.
//!
//! The loader only ever talks to the store through Cypher with bound
//! parameters:
//!
//! - [`CypherExecutor`] - Execute Cypher queries
//! - [`GraphClient`] - A connected backend (health check, name)
//!
//! # Usage
//!
//! ```ignore
//! use tweetgraph::graph::{backends::neo4j::Neo4jClient, QueryExt};
//!
//! let client = Neo4jClient::connect(&config.neo4j).await?;
//!
//! client.query("CREATE (h:Hashtag {hashtag: $hashtag})")
//!     .param("hashtag", "rust")
//!     .run()
//!     .await?;
//! ```

mod macros;
mod query;
mod row;
mod traits;

pub mod backends;

pub use query::{Query, QueryExt};
pub use row::{Params, Row, RowStream};
pub use traits::{CypherExecutor, GraphClient};

// Re-export macro (defined at crate root via #[macro_export])
#[doc(inline)]
pub use crate::cypher;
