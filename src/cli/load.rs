//! Load command handler.

use std::path::PathBuf;
use std::time::Instant;

use clap::Args;
use color_eyre::Result;

use crate::config::Config;
use crate::context::Context;
use crate::repositories::MemoryGraph;
use crate::services::{load_graph, LoadReport};
use crate::source::RecordSource;

/// Ingest a CSV export.
#[derive(Args)]
pub struct LoadCommand {
    /// CSV file: tweet id, author id, hashtags, urls, mentions, unix timestamp
    pub input: PathBuf,

    /// Build the graph in memory only and report what would be written
    #[arg(long)]
    pub dry_run: bool,

    /// Delete existing nodes and relationships before loading
    #[arg(long)]
    pub wipe: bool,
}

impl LoadCommand {
    pub async fn run(&self) -> Result<()> {
        let started = Instant::now();
        let config = Config::load()?;
        let mut source = RecordSource::open(&self.input)?;
        tracing::info!("Reading {}", self.input.display());

        let report = if self.dry_run {
            tracing::info!("Dry run: writing to an in-memory graph");
            let graph = MemoryGraph::new();
            load_graph(&graph, &mut source, config.ingest.clone(), false).await?
        } else {
            let ctx = Context::connect(config).await?;
            load_graph(
                ctx.store.as_ref(),
                &mut source,
                ctx.config.ingest.clone(),
                self.wipe,
            )
            .await?
        };

        log_report(&report, started);
        Ok(())
    }
}

fn log_report(report: &LoadReport, started: Instant) {
    if report.ingest.skipped > 0 {
        tracing::warn!("Skipped {} malformed records", report.ingest.skipped);
    }
    tracing::info!(
        "Created {} nodes from {} records",
        report.counts.total_nodes(),
        report.ingest.records
    );
    tracing::info!("Time elapsed: {:?}", started.elapsed());
}
