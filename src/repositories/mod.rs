//! Data access layer for graph writes.
//!
//! [`GraphStore`] is the seam between the loader and the database:
//! [`CypherStore`] speaks Cypher to a live backend, [`MemoryGraph`] keeps
//! everything in process.

mod cypher;
mod memory;
mod store;

pub use cypher::CypherStore;
pub use memory::{MemoryEdge, MemoryGraph, MemoryNode, MemoryState};
pub use store::{Aggregate, GraphCounts, GraphStore};
