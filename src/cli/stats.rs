//! Stats command handler.

use color_eyre::Result;

use crate::config::Config;
use crate::context::Context;
use crate::models::{Label, Relation};
use crate::repositories::GraphStore;

use super::App;

impl App {
    /// Print node and relationship counts.
    pub async fn run_stats(&self) -> Result<()> {
        let ctx = Context::connect(Config::load()?).await?;
        let counts = ctx.store.counts().await?;

        for label in Label::ALL {
            println!("{:<10} {}", label, counts.nodes_of(label));
        }
        for relation in Relation::ALL {
            println!("{:<10} {}", relation, counts.relationships_of(relation));
        }
        Ok(())
    }
}
