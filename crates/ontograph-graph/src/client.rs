//! Neo4j connection management and shared graph client.

use neo4rs::{ConfigBuilder, Graph, Query};
use ontograph_core::config::Neo4jSettings;

/// Errors from graph operations.
#[derive(Debug, thiserror::Error)]
pub enum GraphError {
    #[error("Neo4j connection error: {0}")]
    Connection(String),

    #[error("Neo4j query error: {0}")]
    Query(#[from] neo4rs::Error),

    #[error("Dangling reference: cannot link {from_uri} -> {to_uri}, endpoint does not exist")]
    DanglingReference { from_uri: String, to_uri: String },

    #[error("Node with uri {0} already exists")]
    DuplicateUri(String),

    #[error("Invalid label: {0:?}")]
    InvalidLabel(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl GraphError {
    /// Whether this error reports a missing arc endpoint rather than a store failure.
    pub fn is_dangling_reference(&self) -> bool {
        matches!(self, Self::DanglingReference { .. })
    }
}

/// Configuration for connecting to Neo4j.
#[derive(Debug, Clone)]
pub struct GraphConfig {
    pub uri: String,
    pub user: String,
    pub password: String,
    pub database: String,
    pub max_connections: u32,
    pub fetch_size: usize,
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self::from(&Neo4jSettings::default())
    }
}

impl From<&Neo4jSettings> for GraphConfig {
    fn from(settings: &Neo4jSettings) -> Self {
        Self {
            uri: settings.uri.clone(),
            user: settings.user.clone(),
            password: settings.password.clone(),
            database: settings.database.clone(),
            max_connections: settings.max_connections,
            fetch_size: settings.fetch_size,
        }
    }
}

/// Thread-safe Neo4j graph client with connection pooling.
///
/// Clone is cheap (inner Arc).
#[derive(Clone)]
pub struct GraphClient {
    graph: Graph,
}

impl GraphClient {
    /// Connect to Neo4j with the given configuration.
    pub async fn connect(config: &GraphConfig) -> Result<Self, GraphError> {
        let neo_config = ConfigBuilder::default()
            .uri(&config.uri)
            .user(&config.user)
            .password(&config.password)
            .db(config.database.as_str())
            .max_connections(config.max_connections as usize)
            .fetch_size(config.fetch_size)
            .build()
            .map_err(|e| GraphError::Connection(e.to_string()))?;

        let graph = Graph::connect(neo_config)
            .await
            .map_err(|e| GraphError::Connection(e.to_string()))?;

        tracing::info!(uri = %config.uri, database = %config.database, "Connected to Neo4j");
        Ok(Self { graph })
    }

    /// Execute a write-only query (CREATE, MERGE, DELETE, SET).
    pub async fn run(&self, query: Query) -> Result<(), GraphError> {
        self.graph.run(query).await?;
        Ok(())
    }

    /// Execute a read query and collect all rows.
    pub async fn query_rows(&self, query: Query) -> Result<Vec<neo4rs::Row>, GraphError> {
        let mut stream = self.graph.execute(query).await?;
        let mut rows = Vec::new();
        while let Some(row) = stream.next().await? {
            rows.push(row);
        }
        Ok(rows)
    }

    /// Execute a read query and return the first row, if any.
    pub async fn query_one(&self, query: Query) -> Result<Option<neo4rs::Row>, GraphError> {
        let mut stream = self.graph.execute(query).await?;
        Ok(stream.next().await?)
    }
}
