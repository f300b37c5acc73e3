//! Macro for convenient Cypher query construction.

/// Shorthand for a query plus its parameters.
///
/// ```ignore
/// use tweetgraph::cypher;
///
/// cypher!(client, "MATCH (n {user_id: $id}) SET n.mentioned = $value", id = 7, value = true)
///     .run()
///     .await?;
/// ```
#[macro_export]
macro_rules! cypher {
    ($graph:expr, $query:expr) => {
        $graph.query($query)
    };
    ($graph:expr, $query:expr, $($name:ident = $value:expr),+ $(,)?) => {
        $graph.query($query)$(.param(stringify!($name), $value))+
    };
}
