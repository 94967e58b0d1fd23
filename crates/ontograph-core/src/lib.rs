//! ontograph-core: Shared types, configuration, and error handling for Ontograph.
//!
//! This crate provides the foundational types used across all Ontograph components:
//! - Graph primitives (Node, Relationship, scalar property values)
//! - Ontology entities (Class, Object, DatatypeProperty, ObjectProperty)
//! - The persisted label and edge vocabulary
//! - The label-driven entity mapper
//! - Configuration management
//! - Common error types

pub mod config;
pub mod error;
pub mod mapper;
pub mod types;
pub mod vocab;

pub use error::OntographError;
pub use mapper::map_node;
pub use types::{
    Class, ClassSignature, DatatypeProperty, Entity, Node, Object, ObjectProperty, Ontology,
    PropertyMap, PropertyValue, Relationship,
};
