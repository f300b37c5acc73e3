//! Configuration with layered resolution using figment.
//!
//! Resolution order (highest priority last):
//! 1. Built-in defaults
//! 2. User config: `~/.config/tweetgraph/config.toml` (XDG) or platform config dir
//! 3. Project config: `.tweetgraph.toml`
//! 4. Environment variables: `TWEETGRAPH_*`, with `__` between section and key
//!    (e.g. `TWEETGRAPH_NEO4J__PASSWORD`, `TWEETGRAPH_INGEST__PROGRESS_INTERVAL`)
//!
//! # Example
//!
//! ```toml
//! [neo4j]
//! uri = "bolt://localhost:7687"
//! user = "neo4j"
//! password = "secret"
//!
//! [ingest]
//! progress_interval = 500
//! utc = false
//! on_record_error = "abort"
//! ```

use std::ops::Deref;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

/// Boxed wrapper for figment::Error to reduce Result size on the stack.
#[derive(Debug)]
pub struct ConfigError(Box<figment::Error>);

impl Deref for ConfigError {
    type Target = figment::Error;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.0.source()
    }
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self(Box::new(err))
    }
}

/// Root configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub neo4j: Neo4jConfig,
    #[serde(default)]
    pub ingest: IngestConfig,
}

/// Neo4j connection settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Neo4jConfig {
    /// Bolt URI, e.g. `bolt://localhost:7687`.
    pub uri: String,
    pub user: String,
    pub password: Option<String>,
    /// Target database; the server default when unset.
    pub database: Option<String>,
    pub max_connections: usize,
    pub fetch_size: usize,
}

impl Default for Neo4jConfig {
    fn default() -> Self {
        Self {
            uri: "bolt://localhost:7687".to_string(),
            user: "neo4j".to_string(),
            password: None,
            database: None,
            max_connections: 4,
            fetch_size: 200,
        }
    }
}

/// What the loader does with a row it cannot parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordErrorPolicy {
    /// Stop the whole run on the first malformed row.
    #[default]
    Abort,
    /// Log the row, count it and keep going.
    Skip,
}

/// Ingestion settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct IngestConfig {
    /// Emit a progress line every this many records.
    pub progress_interval: u64,
    /// Decompose timestamps in UTC instead of the local time zone.
    pub utc: bool,
    pub on_record_error: RecordErrorPolicy,
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            progress_interval: 500,
            utc: false,
            on_record_error: RecordErrorPolicy::Abort,
        }
    }
}

impl Config {
    /// Load config with layered resolution (defaults → user → project → env).
    pub fn load() -> Result<Self, ConfigError> {
        Self::figment().extract().map_err(ConfigError::from)
    }

    fn figment() -> Figment {
        Figment::from(Serialized::defaults(Config::default()))
            .merge(Toml::file(Self::user_config_path()))
            .merge(Toml::file(".tweetgraph.toml"))
            .merge(Env::prefixed("TWEETGRAPH_").split("__"))
    }

    /// User config path: ~/.config/tweetgraph/config.toml (XDG) or platform config dir.
    fn user_config_path() -> std::path::PathBuf {
        if let Some(home) = dirs::home_dir() {
            let xdg_path = home.join(".config").join("tweetgraph").join("config.toml");
            if xdg_path.exists() {
                return xdg_path;
            }
        }
        dirs::config_dir()
            .map(|p| p.join("tweetgraph").join("config.toml"))
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_without_any_source() {
        let config: Config = Figment::from(Serialized::defaults(Config::default()))
            .extract()
            .unwrap();
        assert_eq!(config.neo4j.uri, "bolt://localhost:7687");
        assert_eq!(config.ingest.progress_interval, 500);
        assert_eq!(config.ingest.on_record_error, RecordErrorPolicy::Abort);
        assert!(!config.ingest.utc);
    }

    #[test]
    fn test_partial_toml_keeps_other_defaults() {
        let config: Config = Figment::from(Serialized::defaults(Config::default()))
            .merge(Toml::string(
                r#"
                [neo4j]
                password = "secret"

                [ingest]
                on_record_error = "skip"
                "#,
            ))
            .extract()
            .unwrap();
        assert_eq!(config.neo4j.password.as_deref(), Some("secret"));
        assert_eq!(config.neo4j.user, "neo4j");
        assert_eq!(config.ingest.on_record_error, RecordErrorPolicy::Skip);
        assert_eq!(config.ingest.progress_interval, 500);
    }
}
