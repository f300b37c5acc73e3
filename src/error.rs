//! Application error types.

use thiserror::Error;

/// Application-level errors for the loader.
#[derive(Error, Debug)]
pub enum AppError {
    // Neo4j errors
    #[error("Neo4j connection error: {0}")]
    Connection(#[from] neo4rs::Error),

    #[error("Neo4j query error: {message}")]
    Query { message: String, query: String },

    // Input errors
    #[error("Failed to read input: {0}")]
    Input(#[from] csv::Error),

    #[error("Empty csv: input has no header row")]
    EmptyInput,

    #[error("Malformed record at line {line}: {reason}")]
    MalformedRecord { line: u64, reason: String },

    // Write errors
    #[error("No {label} node matched {key} = {value}; cannot create '{relation}' edge")]
    EndpointMissing {
        relation: String,
        label: String,
        key: String,
        value: String,
    },

    #[error("Failed to write {what} in the database: {source}")]
    Write {
        what: &'static str,
        #[source]
        source: Box<AppError>,
    },

    #[error("Failed to {what}: {source}")]
    Aggregate {
        what: &'static str,
        #[source]
        source: Box<AppError>,
    },

    // Config errors
    #[error("Configuration error: {0}")]
    Config(#[from] crate::config::ConfigError),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Wraps this error with the name of the logical write that produced it.
    pub fn writing(self, what: &'static str) -> Self {
        AppError::Write {
            what,
            source: Box::new(self),
        }
    }

    /// True for errors caused by a single bad input row.
    ///
    /// Everything else (connection, query, missing endpoints) leaves the graph
    /// in a state the rest of the run cannot repair.
    pub fn is_record_local(&self) -> bool {
        match self {
            AppError::MalformedRecord { .. } => true,
            AppError::Write { source, .. } => source.is_record_local(),
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_context_names_the_write() {
        let err = AppError::Internal("boom".into()).writing("tweet-hashtag relation");
        assert_eq!(
            err.to_string(),
            "Failed to write tweet-hashtag relation in the database: Internal error: boom"
        );
    }

    #[test]
    fn test_record_local_classification() {
        let malformed = AppError::MalformedRecord {
            line: 3,
            reason: "bad id".into(),
        };
        assert!(malformed.is_record_local());

        let missing = AppError::EndpointMissing {
            relation: "contains".into(),
            label: "Hashtag".into(),
            key: "hashtag".into(),
            value: "a".into(),
        };
        assert!(!missing.is_record_local());
        assert!(!missing.writing("tweet-hashtag relation").is_record_local());
    }
}
