//! Wipe command handler.

use color_eyre::Result;

use crate::config::Config;
use crate::context::Context;
use crate::repositories::GraphStore;

use super::App;

impl App {
    /// Delete every node and relationship in the configured database.
    pub async fn run_wipe(&self) -> Result<()> {
        let ctx = Context::connect(Config::load()?).await?;

        let before = ctx.store.counts().await?;
        ctx.store.wipe().await?;
        tracing::info!(
            "Deleted {} nodes and {} relationships",
            before.total_nodes(),
            before.total_relationships()
        );
        Ok(())
    }
}
