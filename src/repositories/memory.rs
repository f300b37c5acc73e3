//! In-process [`GraphStore`] used for dry runs and tests.

use std::collections::{BTreeMap, HashMap};

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::error::AppError;
use crate::models::{AttrValue, Attribute, EdgeSpec, Label, NodeRef, Relation};
use crate::repositories::store::{Aggregate, GraphCounts, GraphStore};

/// A node held in memory.
#[derive(Debug, Clone, PartialEq)]
pub struct MemoryNode {
    pub label: Label,
    pub props: BTreeMap<&'static str, AttrValue>,
}

impl MemoryNode {
    pub fn get(&self, name: &str) -> Option<&AttrValue> {
        self.props.get(name)
    }

    fn matches(&self, node: &NodeRef) -> bool {
        self.label == node.label && self.props.get(node.key) == Some(&node.value)
    }
}

/// An edge between two node indices.
#[derive(Debug, Clone, PartialEq)]
pub struct MemoryEdge {
    pub from: usize,
    pub to: usize,
    pub relation: Relation,
    pub props: BTreeMap<&'static str, AttrValue>,
}

type PropKey = (Label, &'static str, AttrValue);

/// Contents of a [`MemoryGraph`].
///
/// Every node property is indexed by `(label, name, value)` so equality
/// matches do not scan the node list.
#[derive(Debug, Clone, Default)]
pub struct MemoryState {
    pub nodes: Vec<MemoryNode>,
    pub edges: Vec<MemoryEdge>,
    index: HashMap<PropKey, Vec<usize>>,
}

impl MemoryState {
    pub fn nodes_of(&self, label: Label) -> impl Iterator<Item = &MemoryNode> {
        self.nodes.iter().filter(move |n| n.label == label)
    }

    /// Nodes matching an equality predicate.
    pub fn find(&self, node: &NodeRef) -> Vec<&MemoryNode> {
        self.matching(node).into_iter().map(|i| &self.nodes[i]).collect()
    }

    /// Edges of `relation` from any node matching `from` to any node matching `to`.
    pub fn edges_between(&self, from: &NodeRef, relation: Relation, to: &NodeRef) -> Vec<&MemoryEdge> {
        self.edges
            .iter()
            .filter(|e| {
                e.relation == relation
                    && self.nodes[e.from].matches(from)
                    && self.nodes[e.to].matches(to)
            })
            .collect()
    }

    pub fn edges_of(&self, relation: Relation) -> impl Iterator<Item = &MemoryEdge> {
        self.edges.iter().filter(move |e| e.relation == relation)
    }

    fn matching(&self, node: &NodeRef) -> Vec<usize> {
        self.lookup(node.label, node.key, &node.value)
    }

    fn lookup(&self, label: Label, name: &'static str, value: &AttrValue) -> Vec<usize> {
        self.index
            .get(&(label, name, value.clone()))
            .cloned()
            .unwrap_or_default()
    }

    fn push_node(&mut self, node: MemoryNode) {
        let idx = self.nodes.len();
        for (&name, value) in &node.props {
            self.index
                .entry((node.label, name, value.clone()))
                .or_default()
                .push(idx);
        }
        self.nodes.push(node);
    }

    fn set_prop(&mut self, idx: usize, name: &'static str, value: AttrValue) {
        let label = self.nodes[idx].label;
        if let Some(old) = self.nodes[idx].props.insert(name, value.clone()) {
            if let Some(ids) = self.index.get_mut(&(label, name, old)) {
                ids.retain(|&i| i != idx);
            }
        }
        let ids = self.index.entry((label, name, value)).or_default();
        if let Err(pos) = ids.binary_search(&idx) {
            ids.insert(pos, idx);
        }
    }

    fn collapse_relates(&mut self) {
        let mut weights: BTreeMap<(usize, usize), i64> = BTreeMap::new();
        self.edges.retain(|e| {
            if e.relation == Relation::Relates {
                *weights.entry((e.from, e.to)).or_default() += 1;
                false
            } else {
                true
            }
        });
        for ((from, to), w) in weights {
            self.edges.push(MemoryEdge {
                from,
                to,
                relation: Relation::Relates,
                props: BTreeMap::from([("occurrences", AttrValue::Int(w))]),
            });
        }
    }

    /// Sets `attr` on each `target` node to the number of incoming
    /// `relation` edges from Tweet nodes; nodes without any are left alone.
    fn count_incoming(&mut self, target: Label, relation: Relation, attr: &'static str) {
        let mut counts: BTreeMap<usize, i64> = BTreeMap::new();
        for edge in &self.edges {
            if edge.relation == relation
                && self.nodes[edge.from].label == Label::Tweet
                && self.nodes[edge.to].label == target
            {
                *counts.entry(edge.to).or_default() += 1;
            }
        }
        for (idx, w) in counts {
            self.set_prop(idx, attr, AttrValue::Int(w));
        }
    }
}

/// A [`GraphStore`] that keeps the whole graph in memory.
///
/// Matches, fan-out and aggregates behave like their Cypher counterparts.
#[derive(Debug, Default)]
pub struct MemoryGraph {
    state: Mutex<MemoryState>,
}

impl MemoryGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn snapshot(&self) -> MemoryState {
        self.state.lock().await.clone()
    }
}

#[async_trait]
impl GraphStore for MemoryGraph {
    async fn create_node(&self, label: Label, attributes: &[Attribute]) -> Result<(), AppError> {
        let props = attributes
            .iter()
            .map(|a| (a.name, a.value.clone()))
            .collect();
        self.state.lock().await.push_node(MemoryNode { label, props });
        Ok(())
    }

    async fn create_edge(&self, edge: &EdgeSpec) -> Result<u64, AppError> {
        let mut state = self.state.lock().await;
        let sources = state.matching(&edge.from);
        let targets = state.matching(&edge.to);

        let missing = if sources.is_empty() {
            Some(&edge.from)
        } else if targets.is_empty() {
            Some(&edge.to)
        } else {
            None
        };
        if let Some(node) = missing {
            return Err(AppError::EndpointMissing {
                relation: edge.relation.to_string(),
                label: node.label.to_string(),
                key: node.key.to_string(),
                value: node.value.to_string(),
            });
        }

        for &from in &sources {
            for &to in &targets {
                state.edges.push(MemoryEdge {
                    from,
                    to,
                    relation: edge.relation,
                    props: BTreeMap::new(),
                });
            }
        }
        Ok((sources.len() * targets.len()) as u64)
    }

    async fn set_attribute(
        &self,
        id_attr: &'static str,
        id_value: &AttrValue,
        attr: &'static str,
        value: &AttrValue,
    ) -> Result<(), AppError> {
        let mut state = self.state.lock().await;
        let targets: Vec<usize> = Label::ALL
            .into_iter()
            .flat_map(|label| state.lookup(label, id_attr, id_value))
            .collect();
        for idx in targets {
            state.set_prop(idx, attr, value.clone());
        }
        Ok(())
    }

    async fn run_aggregate(&self, aggregate: Aggregate) -> Result<(), AppError> {
        let mut state = self.state.lock().await;
        match aggregate {
            Aggregate::CollapseRelates => state.collapse_relates(),
            Aggregate::HashtagPresence => {
                state.count_incoming(Label::Hashtag, Relation::Contains, "presence")
            }
            Aggregate::UserPopularity => {
                state.count_incoming(Label::User, Relation::Mentions, "popularity")
            }
            Aggregate::UrlPopularity => {
                state.count_incoming(Label::Url, Relation::Contains, "popularity")
            }
        }
        Ok(())
    }

    async fn wipe(&self) -> Result<(), AppError> {
        *self.state.lock().await = MemoryState::default();
        Ok(())
    }

    async fn counts(&self) -> Result<GraphCounts, AppError> {
        let state = self.state.lock().await;
        let mut counts = GraphCounts::default();
        for node in &state.nodes {
            *counts.nodes.entry(node.label.to_string()).or_default() += 1;
        }
        for edge in &state.edges {
            *counts
                .relationships
                .entry(edge.relation.to_string())
                .or_default() += 1;
        }
        Ok(counts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn tweet(graph: &MemoryGraph, id: i64) {
        graph
            .create_node(Label::Tweet, &[Attribute::new("tweet_id", id)])
            .await
            .unwrap();
    }

    async fn hashtag(graph: &MemoryGraph, text: &str) {
        graph
            .create_node(Label::Hashtag, &[Attribute::new("hashtag", text)])
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_edge_requires_both_endpoints() {
        let graph = MemoryGraph::new();
        tweet(&graph, 1).await;

        let err = graph
            .create_edge(&EdgeSpec::new(
                NodeRef::tweet(1),
                Relation::Contains,
                NodeRef::hashtag("a"),
            ))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::EndpointMissing { ref label, .. } if label == "Hashtag"));
        assert!(graph.snapshot().await.edges.is_empty());
    }

    #[tokio::test]
    async fn test_match_is_type_sensitive() {
        let graph = MemoryGraph::new();
        graph
            .create_node(Label::User, &[Attribute::new("user_id", "7")])
            .await
            .unwrap();
        tweet(&graph, 1).await;

        let result = graph
            .create_edge(&EdgeSpec::new(
                NodeRef::tweet(1),
                Relation::Mentions,
                NodeRef::user(7),
            ))
            .await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_duplicate_tweets_fan_out() {
        let graph = MemoryGraph::new();
        tweet(&graph, 1).await;
        tweet(&graph, 1).await;
        hashtag(&graph, "a").await;

        let created = graph
            .create_edge(&EdgeSpec::new(
                NodeRef::tweet(1),
                Relation::Contains,
                NodeRef::hashtag("a"),
            ))
            .await
            .unwrap();
        assert_eq!(created, 2);
    }

    #[tokio::test]
    async fn test_edges_fan_out_after_wipe() {
        let graph = MemoryGraph::new();
        tweet(&graph, 1).await;
        hashtag(&graph, "a").await;
        graph.wipe().await.unwrap();

        tweet(&graph, 1).await;
        tweet(&graph, 1).await;
        hashtag(&graph, "a").await;
        let created = graph
            .create_edge(&EdgeSpec::new(
                NodeRef::tweet(1),
                Relation::Contains,
                NodeRef::hashtag("a"),
            ))
            .await
            .unwrap();

        assert_eq!(created, 2);
        let state = graph.snapshot().await;
        assert_eq!(state.find(&NodeRef::tweet(1)).len(), 2);
        assert!(state.edges.iter().all(|e| e.from < 2 && e.to == 2));
    }

    #[tokio::test]
    async fn test_set_attribute_keeps_lookup_current() {
        let graph = MemoryGraph::new();
        graph
            .create_node(Label::User, &[Attribute::new("user_id", 7)])
            .await
            .unwrap();
        graph
            .set_attribute("user_id", &AttrValue::Int(7), "user_id", &AttrValue::Int(8))
            .await
            .unwrap();

        let state = graph.snapshot().await;
        assert!(state.find(&NodeRef::user(7)).is_empty());
        assert_eq!(state.find(&NodeRef::user(8)).len(), 1);
    }

    #[tokio::test]
    async fn test_set_attribute_ignores_label() {
        let graph = MemoryGraph::new();
        graph
            .create_node(
                Label::User,
                &[Attribute::new("user_id", 7), Attribute::new("mentioned", false)],
            )
            .await
            .unwrap();

        graph
            .set_attribute("user_id", &AttrValue::Int(7), "mentioned", &AttrValue::Bool(true))
            .await
            .unwrap();

        let state = graph.snapshot().await;
        assert_eq!(
            state.find(&NodeRef::user(7))[0].get("mentioned"),
            Some(&AttrValue::Bool(true))
        );
    }

    #[tokio::test]
    async fn test_collapse_relates_counts_parallel_edges() {
        let graph = MemoryGraph::new();
        hashtag(&graph, "a").await;
        hashtag(&graph, "b").await;
        graph
            .create_node(Label::Url, &[Attribute::new("url", "u1")])
            .await
            .unwrap();

        let pairs = [("a", 3), ("b", 1)];
        for (tag, k) in pairs {
            for _ in 0..k {
                graph
                    .create_edge(&EdgeSpec::new(
                        NodeRef::url("u1"),
                        Relation::Relates,
                        NodeRef::hashtag(tag),
                    ))
                    .await
                    .unwrap();
            }
        }

        graph.run_aggregate(Aggregate::CollapseRelates).await.unwrap();

        let state = graph.snapshot().await;
        for (tag, k) in pairs {
            let edges = state.edges_between(&NodeRef::url("u1"), Relation::Relates, &NodeRef::hashtag(tag));
            assert_eq!(edges.len(), 1);
            assert_eq!(edges[0].props.get("occurrences"), Some(&AttrValue::Int(k)));
        }
    }

    #[tokio::test]
    async fn test_presence_counts_tweet_contains_edges() {
        let graph = MemoryGraph::new();
        tweet(&graph, 1).await;
        tweet(&graph, 2).await;
        hashtag(&graph, "a").await;
        hashtag(&graph, "unused").await;
        for id in [1, 2] {
            graph
                .create_edge(&EdgeSpec::new(
                    NodeRef::tweet(id),
                    Relation::Contains,
                    NodeRef::hashtag("a"),
                ))
                .await
                .unwrap();
        }
        // Reverse edges are not counted.
        graph
            .create_edge(&EdgeSpec::new(
                NodeRef::hashtag("a"),
                Relation::Contained,
                NodeRef::tweet(1),
            ))
            .await
            .unwrap();

        graph.run_aggregate(Aggregate::HashtagPresence).await.unwrap();

        let state = graph.snapshot().await;
        assert_eq!(
            state.find(&NodeRef::hashtag("a"))[0].get("presence"),
            Some(&AttrValue::Int(2))
        );
        assert_eq!(state.find(&NodeRef::hashtag("unused"))[0].get("presence"), None);
    }

    #[tokio::test]
    async fn test_wipe_and_counts() {
        let graph = MemoryGraph::new();
        tweet(&graph, 1).await;
        hashtag(&graph, "a").await;
        let counts = graph.counts().await.unwrap();
        assert_eq!(counts.total_nodes(), 2);

        graph.wipe().await.unwrap();
        assert_eq!(graph.counts().await.unwrap(), GraphCounts::default());
    }
}
