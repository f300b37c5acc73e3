//! Query builder for fluent Cypher query construction.

use futures::{StreamExt, TryStreamExt};
use serde_json::Value as JsonValue;

use crate::error::AppError;
use crate::graph::row::{Params, Row, RowStream};
use crate::graph::traits::CypherExecutor;

/// A builder for constructing and executing Cypher queries.
///
/// `Query` provides a fluent API for binding parameters and executing
/// statements against any [`CypherExecutor`].
///
/// # Example
///
/// ```ignore
/// let row = Query::new(&client, "MATCH (t:Tweet {tweet_id: $id}) RETURN count(t) AS n")
///     .param("id", 100)
///     .fetch_one()
///     .await?;
/// ```
pub struct Query<'a, E: CypherExecutor + ?Sized> {
    executor: &'a E,
    cypher: String,
    params: Params,
}

impl<'a, E: CypherExecutor + ?Sized> Query<'a, E> {
    /// Creates a new query builder.
    ///
    /// # Arguments
    ///
    /// * `executor` - The executor to run the query against
    /// * `cypher` - The Cypher query string
    pub fn new(executor: &'a E, cypher: &str) -> Self {
        Self {
            executor,
            cypher: cypher.to_string(),
            params: Params::new(),
        }
    }

    /// Binds a parameter referenced in the Cypher text as `$name`.
    ///
    /// # Arguments
    ///
    /// * `name` - The parameter name (without the $ prefix)
    /// * `value` - Anything convertible to JSON, including [`AttrValue`](crate::models::AttrValue)
    pub fn param(mut self, name: &str, value: impl Into<JsonValue>) -> Self {
        self.params.insert(name.to_string(), value.into());
        self
    }

    /// Binds every entry of an already-built parameter map.
    pub fn params(mut self, params: Params) -> Self {
        self.params.extend(params);
        self
    }

    /// Executes the query and streams the resulting rows.
    pub async fn execute(self) -> Result<RowStream<'a>, AppError> {
        self.executor
            .execute_cypher(&self.cypher, self.params)
            .await
    }

    /// Executes the query and collects every row.
    pub async fn fetch_all(self) -> Result<Vec<Row>, AppError> {
        self.execute().await?.try_collect().await
    }

    /// Executes the query and returns the first row, if any.
    pub async fn fetch_one(self) -> Result<Option<Row>, AppError> {
        let mut stream = self.execute().await?;
        stream.next().await.transpose()
    }

    /// Executes the query without returning results.
    pub async fn run(self) -> Result<(), AppError> {
        self.executor.run_cypher(&self.cypher, self.params).await
    }
}

/// Extension trait providing `executor.query("...")` on every [`CypherExecutor`].
pub trait QueryExt: CypherExecutor {
    fn query(&self, cypher: &str) -> Query<'_, Self>
    where
        Self: Sized,
    {
        Query::new(self, cypher)
    }
}

impl<E: CypherExecutor> QueryExt for E {}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    struct MockExecutor {
        expected_cypher: String,
        expected_params: Params,
    }

    #[async_trait::async_trait]
    impl CypherExecutor for MockExecutor {
        async fn execute_cypher(
            &self,
            cypher: &str,
            params: Params,
        ) -> Result<RowStream<'_>, AppError> {
            assert_eq!(cypher, self.expected_cypher);
            assert_eq!(params, self.expected_params);
            Ok(Box::pin(futures::stream::empty()))
        }

        async fn run_cypher(&self, cypher: &str, params: Params) -> Result<(), AppError> {
            assert_eq!(cypher, self.expected_cypher);
            assert_eq!(params, self.expected_params);
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_query_no_params() {
        let executor = MockExecutor {
            expected_cypher: "MATCH (n) DETACH DELETE n".to_string(),
            expected_params: HashMap::new(),
        };

        let result = executor.query("MATCH (n) DETACH DELETE n").run().await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_query_with_typed_params() {
        let mut expected_params = HashMap::new();
        expected_params.insert("tweet_id".to_string(), serde_json::json!(100));
        expected_params.insert("hashtag".to_string(), serde_json::json!("rust"));
        expected_params.insert("mentioned".to_string(), serde_json::json!(false));

        let cypher = "CREATE (n:Probe {tweet_id: $tweet_id, hashtag: $hashtag, mentioned: $mentioned})";
        let executor = MockExecutor {
            expected_cypher: cypher.to_string(),
            expected_params,
        };

        let result = executor
            .query(cypher)
            .param("tweet_id", 100)
            .param("hashtag", "rust")
            .param("mentioned", false)
            .run()
            .await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_fetch_one_on_empty_stream() {
        let executor = MockExecutor {
            expected_cypher: "MATCH (n) RETURN n".to_string(),
            expected_params: HashMap::new(),
        };

        let row = executor.query("MATCH (n) RETURN n").fetch_one().await.unwrap();
        assert!(row.is_none());
    }
}
