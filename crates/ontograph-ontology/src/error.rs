//! Error types for the ontograph-ontology crate.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum OntologyError {
    #[error("Graph error: {0}")]
    Graph(#[from] ontograph_graph::GraphError),

    #[error("Store returned node {id} without a uri")]
    MissingUri { id: i64 },
}

impl OntologyError {
    /// Whether an arc could not be created because an endpoint is missing.
    pub fn is_dangling_reference(&self) -> bool {
        matches!(self, Self::Graph(e) if e.is_dangling_reference())
    }
}

pub type Result<T> = std::result::Result<T, OntologyError>;
