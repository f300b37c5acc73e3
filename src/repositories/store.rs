//! The write surface the loader needs from a graph store.

use std::collections::BTreeMap;
use std::fmt;

use async_trait::async_trait;

use crate::error::AppError;
use crate::models::{AttrValue, Attribute, EdgeSpec, Label, Relation};

/// Graph store operations used by ingestion and aggregation.
///
/// Nothing here deduplicates: uniqueness of nodes is the caller's job and
/// repeated edges are expected until [`Aggregate::CollapseRelates`] runs.
#[async_trait]
pub trait GraphStore: Send + Sync {
    /// Creates one node carrying all `attributes`.
    async fn create_node(&self, label: Label, attributes: &[Attribute]) -> Result<(), AppError>;

    /// Creates an edge from every node matching `edge.from` to every node
    /// matching `edge.to` and returns how many were created.
    ///
    /// Fails with [`AppError::EndpointMissing`] when either side matches nothing.
    async fn create_edge(&self, edge: &EdgeSpec) -> Result<u64, AppError>;

    /// Overwrites `attr` on every node, of any label, whose `id_attr` equals `id_value`.
    async fn set_attribute(
        &self,
        id_attr: &'static str,
        id_value: &AttrValue,
        attr: &'static str,
        value: &AttrValue,
    ) -> Result<(), AppError>;

    async fn run_aggregate(&self, aggregate: Aggregate) -> Result<(), AppError>;

    /// Deletes every node and relationship.
    async fn wipe(&self) -> Result<(), AppError>;

    async fn counts(&self) -> Result<GraphCounts, AppError>;
}

/// End-of-run batch statements.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Aggregate {
    /// Replace parallel `relates` edges with one edge carrying `occurrences`.
    CollapseRelates,
    /// `Hashtag.presence` = incoming Tweet `contains` edges.
    HashtagPresence,
    /// `User.popularity` = incoming Tweet `mentions` edges.
    UserPopularity,
    /// `Url.popularity` = incoming Tweet `contains` edges.
    UrlPopularity,
}

impl Aggregate {
    pub const ALL: [Aggregate; 4] = [
        Aggregate::CollapseRelates,
        Aggregate::HashtagPresence,
        Aggregate::UserPopularity,
        Aggregate::UrlPopularity,
    ];

    pub fn cypher(self) -> &'static str {
        match self {
            Aggregate::CollapseRelates => {
                "MATCH (a)-[r:relates]->(b) \
                 WITH a, b, collect(r) AS old_rels, count(r) AS w \
                 FOREACH (r IN old_rels | DELETE r) \
                 WITH a, b, w \
                 CREATE (a)-[:relates {occurrences: w}]->(b)"
            }
            Aggregate::HashtagPresence => {
                "MATCH (:Tweet)-[r:contains]->(h:Hashtag) WITH h, count(r) AS w SET h.presence = w"
            }
            Aggregate::UserPopularity => {
                "MATCH (:Tweet)-[r:mentions]->(u:User) WITH u, count(r) AS w SET u.popularity = w"
            }
            Aggregate::UrlPopularity => {
                "MATCH (:Tweet)-[r:contains]->(u:Url) WITH u, count(r) AS w SET u.popularity = w"
            }
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Aggregate::CollapseRelates => "merge relates relation",
            Aggregate::HashtagPresence => "set Hashtag presence",
            Aggregate::UserPopularity => "set User popularity",
            Aggregate::UrlPopularity => "set Url popularity",
        }
    }
}

/// Node and relationship counts, keyed by label and relationship type.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GraphCounts {
    pub nodes: BTreeMap<String, i64>,
    pub relationships: BTreeMap<String, i64>,
}

impl GraphCounts {
    pub fn nodes_of(&self, label: Label) -> i64 {
        self.nodes.get(label.as_str()).copied().unwrap_or(0)
    }

    pub fn relationships_of(&self, relation: Relation) -> i64 {
        self.relationships
            .get(relation.as_str())
            .copied()
            .unwrap_or(0)
    }

    pub fn total_nodes(&self) -> i64 {
        self.nodes.values().sum()
    }

    pub fn total_relationships(&self) -> i64 {
        self.relationships.values().sum()
    }
}

impl fmt::Display for GraphCounts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} nodes", self.total_nodes())?;
        for (label, count) in &self.nodes {
            write!(f, " {}={}", label, count)?;
        }
        write!(f, "; {} relationships", self.total_relationships())?;
        for (relation, count) in &self.relationships {
            write!(f, " {}={}", relation, count)?;
        }
        Ok(())
    }
}
