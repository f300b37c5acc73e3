//! Loader services: entity registry, record ingestion and aggregation.
//!
//! Services are generic over [`GraphStore`](crate::repositories::GraphStore)
//! so the same code drives a live database or an in-memory graph.

mod aggregate;
mod ingest;
mod pipeline;
mod registry;

pub use aggregate::AggregationService;
pub use ingest::{IngestService, IngestSummary};
pub use pipeline::{load_graph, LoadReport};
pub use registry::{EntityKind, EntityRegistry};
