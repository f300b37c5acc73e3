//! CLI module for tweetgraph.
//!
//! Subcommands:
//! - `load`: Build the graph from a CSV export
//! - `wipe`: Delete every node and relationship
//! - `stats`: Print node and relationship counts

mod load;
mod stats;
mod wipe;

use clap::{Parser, Subcommand};

pub use load::LoadCommand;

/// tweetgraph - tweet export to property graph loader
#[derive(Parser)]
#[command(name = "tweetgraph")]
#[command(about = "Load a tabular tweet export into a Neo4j property graph")]
#[command(version)]
pub struct App {
    /// Run in verbose mode
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Ingest a CSV file and run the aggregation pass
    Load(LoadCommand),

    /// Delete every node and relationship in the target database
    Wipe,

    /// Print node counts per label and relationship counts per type
    Stats,
}

impl App {
    /// Run the CLI application.
    pub async fn run(self) -> color_eyre::Result<()> {
        match self.command {
            Command::Load(ref cmd) => cmd.run().await,
            Command::Wipe => self.run_wipe().await,
            Command::Stats => self.run_stats().await,
        }
    }
}
