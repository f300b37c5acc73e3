//! Backend implementations for graph databases.
//!
//! Each backend implements [`CypherExecutor`](crate::graph::CypherExecutor)
//! and [`GraphClient`](crate::graph::GraphClient).
//!
//! | Backend | Module | Status |
//! |---------|--------|--------|
//! | Neo4j (bolt) | [`neo4j`] | Available |

pub mod neo4j;
