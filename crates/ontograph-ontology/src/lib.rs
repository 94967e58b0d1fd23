//! ontograph-ontology: Ontology repository over a labeled property graph.
//!
//! Maps classes, datatype properties, object properties and instances onto
//! generic nodes and edges, and implements the graph-shape algorithms on top:
//! inherited signature resolution, cascading subtree deletion, and root-class
//! discovery. Storage is injected as an `Arc<dyn GraphStore>`.

pub mod demo;
pub mod error;
pub mod repository;
pub mod traversal;

pub use error::OntologyError;
pub use repository::{ObjectUpdate, OntologyRepository, StoreHandle};
