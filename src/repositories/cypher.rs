//! [`GraphStore`] over any Cypher backend.

use async_trait::async_trait;

use crate::cypher;
use crate::error::AppError;
use crate::graph::{GraphClient, Params, QueryExt, Row};
use crate::models::{AttrValue, Attribute, EdgeSpec, Label, NodeRef};
use crate::repositories::store::{Aggregate, GraphCounts, GraphStore};

/// Translates store operations into parameterized Cypher.
///
/// Labels, relationship types and attribute names come from closed enums and
/// static identifiers and are the only text spliced into a statement; every
/// value travels as a bound parameter.
pub struct CypherStore<C: GraphClient> {
    client: C,
}

impl<C: GraphClient> CypherStore<C> {
    pub fn new(client: C) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    async fn count_matches(&self, node: &NodeRef) -> Result<i64, AppError> {
        let cypher = format!(
            "MATCH (n:{} {{{}: $value}}) RETURN count(n) AS matches",
            node.label, node.key
        );
        let row = cypher!(self.client, &cypher, value = node.value.clone())
            .fetch_one()
            .await?;
        row.map(|r| r.get::<i64>("matches"))
            .transpose()
            .map(|m| m.unwrap_or(0))
    }

    /// Names the side of an edge that matched nothing.
    async fn missing_endpoint(&self, edge: &EdgeSpec) -> Result<AppError, AppError> {
        let missing = if self.count_matches(&edge.from).await? == 0 {
            &edge.from
        } else {
            &edge.to
        };
        Ok(AppError::EndpointMissing {
            relation: edge.relation.to_string(),
            label: missing.label.to_string(),
            key: missing.key.to_string(),
            value: missing.value.to_string(),
        })
    }
}

fn create_node_cypher(label: Label, attributes: &[Attribute]) -> (String, Params) {
    let fields: Vec<String> = attributes
        .iter()
        .map(|a| format!("{0}: ${0}", a.name))
        .collect();
    let params = attributes
        .iter()
        .map(|a| (a.name.to_string(), a.value.clone().into()))
        .collect();
    (
        format!("CREATE (n:{} {{{}}})", label, fields.join(", ")),
        params,
    )
}

fn create_edge_cypher(edge: &EdgeSpec) -> String {
    format!(
        "MATCH (a:{} {{{}: $from}}), (b:{} {{{}: $to}}) \
         CREATE (a)-[r:{}]->(b) RETURN count(r) AS created",
        edge.from.label, edge.from.key, edge.to.label, edge.to.key, edge.relation
    )
}

fn count_rows(rows: &[Row], column: &str) -> Result<i64, AppError> {
    rows.iter()
        .map(|row| row.get::<i64>(column))
        .sum::<Result<i64, _>>()
}

#[async_trait]
impl<C: GraphClient> GraphStore for CypherStore<C> {
    async fn create_node(&self, label: Label, attributes: &[Attribute]) -> Result<(), AppError> {
        let (cypher, params) = create_node_cypher(label, attributes);
        self.client.query(&cypher).params(params).run().await
    }

    async fn create_edge(&self, edge: &EdgeSpec) -> Result<u64, AppError> {
        let rows = self
            .client
            .query(&create_edge_cypher(edge))
            .param("from", edge.from.value.clone())
            .param("to", edge.to.value.clone())
            .fetch_all()
            .await?;
        let created = count_rows(&rows, "created")?;
        if created == 0 {
            return Err(self.missing_endpoint(edge).await?);
        }
        Ok(created as u64)
    }

    async fn set_attribute(
        &self,
        id_attr: &'static str,
        id_value: &AttrValue,
        attr: &'static str,
        value: &AttrValue,
    ) -> Result<(), AppError> {
        let cypher = format!("MATCH (n {{{}: $id}}) SET n.{} = $value", id_attr, attr);
        cypher!(self.client, &cypher, id = id_value.clone(), value = value.clone())
            .run()
            .await
    }

    async fn run_aggregate(&self, aggregate: Aggregate) -> Result<(), AppError> {
        self.client
            .run_cypher(aggregate.cypher(), Params::new())
            .await
    }

    async fn wipe(&self) -> Result<(), AppError> {
        cypher!(self.client, "MATCH (n) DETACH DELETE n").run().await
    }

    async fn counts(&self) -> Result<GraphCounts, AppError> {
        let mut counts = GraphCounts::default();

        let node_rows = cypher!(
            self.client,
            "MATCH (n) RETURN labels(n)[0] AS label, count(n) AS count"
        )
        .fetch_all()
        .await?;
        for row in node_rows {
            let label: Option<String> = row.get_opt("label")?;
            *counts
                .nodes
                .entry(label.unwrap_or_default())
                .or_default() += row.get::<i64>("count")?;
        }

        let rel_rows = cypher!(
            self.client,
            "MATCH ()-[r]->() RETURN type(r) AS relation, count(r) AS count"
        )
        .fetch_all()
        .await?;
        for row in rel_rows {
            counts
                .relationships
                .insert(row.get("relation")?, row.get("count")?);
        }

        Ok(counts)
    }
}
