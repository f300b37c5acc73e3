//! End-of-run pass: collapse duplicate `relates` edges and back-fill counters.

use crate::error::AppError;
use crate::repositories::{Aggregate, GraphStore};

/// Runs every [`Aggregate`] once. Each statement is self-contained, so
/// order does not matter.
pub struct AggregationService<'a, S: GraphStore> {
    store: &'a S,
}

impl<'a, S: GraphStore> AggregationService<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }

    pub async fn run(&self) -> Result<(), AppError> {
        tracing::info!("Removing duplicate relations and updating some stats");
        for aggregate in Aggregate::ALL {
            tracing::debug!(?aggregate, "Running aggregate");
            self.store
                .run_aggregate(aggregate)
                .await
                .map_err(|e| AppError::Aggregate {
                    what: aggregate.description(),
                    source: Box::new(e),
                })?;
        }
        Ok(())
    }
}
