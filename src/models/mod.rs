//! Domain models for the tweet graph.

mod graph;
mod record;

pub use graph::{AttrValue, Attribute, EdgeSpec, Label, NodeRef, Relation};
pub use record::{non_empty, split_list_cell, TweetRecord, TweetTime};
