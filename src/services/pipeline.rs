//! The full load: ingestion, aggregation, final counts.

use std::io::Read;

use crate::config::IngestConfig;
use crate::error::AppError;
use crate::repositories::{GraphCounts, GraphStore};
use crate::services::aggregate::AggregationService;
use crate::services::ingest::{IngestService, IngestSummary};
use crate::source::RecordSource;

/// What a completed load produced.
#[derive(Debug, Clone)]
pub struct LoadReport {
    pub ingest: IngestSummary,
    pub counts: GraphCounts,
}

/// Loads every row of `source` into `store`, then runs the aggregation pass.
///
/// With `wipe` set the store is emptied first; otherwise it is assumed to be
/// empty or disposable.
pub async fn load_graph<S: GraphStore, R: Read>(
    store: &S,
    source: &mut RecordSource<R>,
    settings: IngestConfig,
    wipe: bool,
) -> Result<LoadReport, AppError> {
    source.require_header()?;
    if wipe {
        tracing::info!("Deleting existing nodes and relationships");
        store.wipe().await?;
    }

    let ingest = IngestService::new(store, settings).run(source).await?;
    AggregationService::new(store).run().await?;
    let counts = store.counts().await?;

    tracing::info!("Graph now holds {}", counts);
    Ok(LoadReport { ingest, counts })
}
