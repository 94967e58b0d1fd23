//! Configuration management for Ontograph.
//!
//! Configuration is loaded from (in priority order):
//! 1. Environment variables (`ONTOGRAPH__` prefix, `__` separator, e.g.
//!    `ONTOGRAPH__NEO4J__URI`)
//! 2. Config file (ontograph.toml)
//! 3. Defaults

use config::builder::DefaultState;
use config::{ConfigBuilder, Environment, File};
use serde::Deserialize;

use crate::error::OntographError;

/// Top-level Ontograph configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OntographConfig {
    #[serde(default)]
    pub store: StoreSettings,

    #[serde(default)]
    pub neo4j: Neo4jSettings,
}

/// Which graph store backs the repository.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StoreSettings {
    #[serde(default)]
    pub backend: StoreBackend,
}

#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    /// Neo4j over Bolt.
    #[default]
    Neo4j,
    /// Process-local graph; nothing survives the process.
    Memory,
}

/// Connection settings for the Neo4j backend.
#[derive(Debug, Clone, Deserialize)]
pub struct Neo4jSettings {
    #[serde(default = "default_uri")]
    pub uri: String,

    #[serde(default = "default_user")]
    pub user: String,

    #[serde(default = "default_password")]
    pub password: String,

    #[serde(default = "default_database")]
    pub database: String,

    #[serde(default = "default_max_connections")]
    pub max_connections: u32,

    #[serde(default = "default_fetch_size")]
    pub fetch_size: usize,
}

fn default_uri() -> String {
    "bolt://localhost:7687".to_string()
}

fn default_user() -> String {
    "neo4j".to_string()
}

fn default_password() -> String {
    "password".to_string()
}

fn default_database() -> String {
    "neo4j".to_string()
}

fn default_max_connections() -> u32 {
    16
}

fn default_fetch_size() -> usize {
    256
}

impl Default for Neo4jSettings {
    fn default() -> Self {
        Self {
            uri: default_uri(),
            user: default_user(),
            password: default_password(),
            database: default_database(),
            max_connections: default_max_connections(),
            fetch_size: default_fetch_size(),
        }
    }
}

impl OntographConfig {
    /// Load configuration from `{file_prefix}.toml` (optional) and the
    /// `ONTOGRAPH__*` environment.
    pub fn load(file_prefix: &str) -> Result<Self, OntographError> {
        let builder = config::Config::builder()
            .add_source(File::with_name(file_prefix).required(false))
            .add_source(environment());
        Self::from_builder(builder)
    }

    fn from_builder(builder: ConfigBuilder<DefaultState>) -> Result<Self, OntographError> {
        Ok(builder.build()?.try_deserialize()?)
    }
}

/// `ONTOGRAPH__SECTION__KEY` variables, e.g. `ONTOGRAPH__NEO4J__URI`.
fn environment() -> Environment {
    Environment::with_prefix("ONTOGRAPH")
        .separator("__")
        .try_parsing(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use config::FileFormat;

    fn from_toml(toml: &str) -> OntographConfig {
        let builder = config::Config::builder().add_source(File::from_str(toml, FileFormat::Toml));
        OntographConfig::from_builder(builder).unwrap()
    }

    #[test]
    fn test_default_config() {
        let config = OntographConfig::default();
        assert_eq!(config.store.backend, StoreBackend::Neo4j);
        assert_eq!(config.neo4j.uri, "bolt://localhost:7687");
        assert_eq!(config.neo4j.database, "neo4j");
        assert_eq!(config.neo4j.max_connections, 16);
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let config = from_toml(
            r#"
            [store]
            backend = "memory"

            [neo4j]
            uri = "bolt://graph:7687"
            "#,
        );
        assert_eq!(config.store.backend, StoreBackend::Memory);
        assert_eq!(config.neo4j.uri, "bolt://graph:7687");
        assert_eq!(config.neo4j.user, "neo4j");
        assert_eq!(config.neo4j.fetch_size, 256);
    }

    #[test]
    fn test_environment_overrides_file() {
        let mut vars = config::Map::new();
        vars.insert("ONTOGRAPH__NEO4J__URI".to_string(), "bolt://env:7687".to_string());
        vars.insert("ONTOGRAPH__STORE__BACKEND".to_string(), "memory".to_string());
        vars.insert("ONTOGRAPH_NEO4J_USER".to_string(), "ignored".to_string());

        let builder = config::Config::builder()
            .add_source(File::from_str(
                "[neo4j]\nuri = \"bolt://file:7687\"",
                FileFormat::Toml,
            ))
            .add_source(environment().source(Some(vars)));
        let config = OntographConfig::from_builder(builder).unwrap();

        assert_eq!(config.neo4j.uri, "bolt://env:7687");
        assert_eq!(config.store.backend, StoreBackend::Memory);
        assert_eq!(config.neo4j.user, "neo4j");
    }

    #[test]
    fn test_empty_sources_give_defaults() {
        let config = from_toml("");
        assert_eq!(config.store.backend, StoreBackend::Neo4j);
        assert_eq!(config.neo4j.password, "password");
    }
}
