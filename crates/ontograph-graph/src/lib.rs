//! ontograph-graph: store adapters for the ontology property graph.
//!
//! The [`GraphStore`] trait is the only way the ontology layer touches
//! storage. Two implementations ship here: [`GraphClient`] for Neo4j and
//! [`MemoryStore`] for process-local graphs.

pub mod client;
pub mod memory;
pub mod mutations;
pub mod queries;
pub mod store;

pub use client::{GraphClient, GraphConfig, GraphError};
pub use memory::MemoryStore;
pub use store::{GraphStore, NodeUpdate};
