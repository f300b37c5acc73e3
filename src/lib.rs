//! tweetgraph - Tweet Export to Property Graph Loader
//!
//! Reads a tabular tweet export and materializes tweets, users, hashtags
//! and urls as a Neo4j property graph, followed by an aggregation pass
//! that collapses duplicate co-occurrence edges and derives popularity flags.

pub mod cli;
pub mod config;
pub mod context;
pub mod error;
pub mod graph;
pub mod models;
pub mod repositories;
pub mod services;
pub mod source;
