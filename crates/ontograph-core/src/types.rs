//! Core types for the Ontograph property graph.
//!
//! Two layers live here: the schemaless graph primitives every store adapter
//! speaks (`Node`, `Relationship`, `PropertyValue`), and the typed ontology
//! entities the repository hands to callers.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::OntographError;
use crate::vocab;

// ── Scalar Values ─────────────────────────────────────────────────

/// A scalar property value. The store never holds anything richer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PropertyValue {
    Bool(bool),
    Integer(i64),
    Float(f64),
    String(String),
}

impl PropertyValue {
    /// Parse a raw command-line value: integer, then finite float, then
    /// boolean, falling back to a plain string.
    pub fn parse(raw: &str) -> Self {
        if let Ok(i) = raw.parse::<i64>() {
            return Self::Integer(i);
        }
        if let Ok(f) = raw.parse::<f64>() {
            // NaN and infinities are not JSON numbers
            if f.is_finite() {
                return Self::Float(f);
            }
        }
        match raw {
            "true" => Self::Bool(true),
            "false" => Self::Bool(false),
            _ => Self::String(raw.to_string()),
        }
    }

    /// Parse a `key=value` assignment.
    pub fn parse_assignment(raw: &str) -> Result<(String, Self), OntographError> {
        match raw.split_once('=') {
            Some((key, value)) if !key.trim().is_empty() => {
                Ok((key.trim().to_string(), Self::parse(value)))
            }
            _ => Err(OntographError::InvalidAssignment(raw.to_string())),
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for PropertyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(b) => write!(f, "{b}"),
            Self::Integer(i) => write!(f, "{i}"),
            Self::Float(x) => write!(f, "{x}"),
            Self::String(s) => f.write_str(s),
        }
    }
}

impl From<&str> for PropertyValue {
    fn from(s: &str) -> Self {
        Self::String(s.to_string())
    }
}

impl From<String> for PropertyValue {
    fn from(s: String) -> Self {
        Self::String(s)
    }
}

impl From<i64> for PropertyValue {
    fn from(i: i64) -> Self {
        Self::Integer(i)
    }
}

impl From<f64> for PropertyValue {
    fn from(x: f64) -> Self {
        Self::Float(x)
    }
}

impl From<bool> for PropertyValue {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

/// Property bag carried by nodes and relationships.
pub type PropertyMap = BTreeMap<String, PropertyValue>;

/// Generate a fresh uri: a random lowercase hex token.
pub fn generate_uri() -> String {
    let mut uri = Uuid::new_v4().simple().to_string();
    uri.truncate(vocab::GENERATED_URI_LEN);
    uri
}

// ── Graph Primitives ──────────────────────────────────────────────

/// A node as stored in the graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    /// Store-assigned identifier.
    pub id: i64,
    pub labels: Vec<String>,
    pub properties: PropertyMap,
}

impl Node {
    /// The node's `uri` property, if present and a string.
    pub fn uri(&self) -> Option<&str> {
        self.properties.get(vocab::URI).and_then(PropertyValue::as_str)
    }

    pub fn has_label(&self, label: &str) -> bool {
        self.labels.iter().any(|l| l == label)
    }

    pub fn get(&self, key: &str) -> Option<&PropertyValue> {
        self.properties.get(key)
    }
}

/// A directed, labeled edge between two nodes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Relationship {
    /// Store-assigned identifier.
    pub id: i64,
    pub label: String,
    pub from_uri: String,
    pub to_uri: String,
    pub properties: PropertyMap,
}

// ── Ontology Entities ─────────────────────────────────────────────

/// A type in the ontology.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Class {
    pub uri: String,
    pub title: String,
    pub description: String,
}

/// An instance of exactly one class.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Object {
    pub uri: String,
    pub title: String,
    pub description: String,
    /// Datatype values, i.e. every property except uri/title/description.
    #[serde(default)]
    pub properties: PropertyMap,
}

/// A scalar-valued attribute declared on a class.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatatypeProperty {
    pub uri: String,
    pub title: String,
}

/// A typed relationship declared on a class.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectProperty {
    pub uri: String,
    pub title: String,
}

/// Any node the entity mapper recognises.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum Entity {
    Class(Class),
    Object(Object),
    DatatypeProperty(DatatypeProperty),
    ObjectProperty(ObjectProperty),
}

impl Entity {
    pub fn uri(&self) -> &str {
        match self {
            Self::Class(c) => &c.uri,
            Self::Object(o) => &o.uri,
            Self::DatatypeProperty(p) => &p.uri,
            Self::ObjectProperty(p) => &p.uri,
        }
    }

    pub fn title(&self) -> &str {
        match self {
            Self::Class(c) => &c.title,
            Self::Object(o) => &o.title,
            Self::DatatypeProperty(p) => &p.title,
            Self::ObjectProperty(p) => &p.title,
        }
    }

    pub fn as_class(&self) -> Option<&Class> {
        match self {
            Self::Class(c) => Some(c),
            _ => None,
        }
    }

    pub fn into_class(self) -> Option<Class> {
        match self {
            Self::Class(c) => Some(c),
            _ => None,
        }
    }

    pub fn into_object(self) -> Option<Object> {
        match self {
            Self::Object(o) => Some(o),
            _ => None,
        }
    }
}

/// The properties applicable to a class, inherited ones included.
///
/// Derived on demand from the current graph shape and never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassSignature {
    pub uri: String,
    pub datatype_properties: Vec<DatatypeProperty>,
    pub object_properties: Vec<ObjectProperty>,
}

/// Whole-ontology export: one signature per class plus every object.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Ontology {
    pub signatures: Vec<ClassSignature>,
    pub objects: Vec<Object>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_uri_shape() {
        let uri = generate_uri();
        assert_eq!(uri.len(), vocab::GENERATED_URI_LEN);
        assert!(uri.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
        assert_ne!(uri, generate_uri());
    }

    #[test]
    fn test_parse_value() {
        assert_eq!(PropertyValue::parse("4"), PropertyValue::Integer(4));
        assert_eq!(PropertyValue::parse("-2.5"), PropertyValue::Float(-2.5));
        assert_eq!(PropertyValue::parse("true"), PropertyValue::Bool(true));
        assert_eq!(
            PropertyValue::parse("four legs"),
            PropertyValue::String("four legs".to_string())
        );
    }

    #[test]
    fn test_parse_non_finite_stays_string() {
        for raw in ["Nan", "NaN", "inf", "Inf", "-Infinity"] {
            assert_eq!(PropertyValue::parse(raw), PropertyValue::String(raw.to_string()));
        }
        let json = serde_json::to_value(PropertyValue::parse("Nan")).unwrap();
        assert_eq!(json, serde_json::json!("Nan"));
    }

    #[test]
    fn test_parse_assignment() {
        let (key, value) = PropertyValue::parse_assignment("legs=4").unwrap();
        assert_eq!(key, "legs");
        assert_eq!(value, PropertyValue::Integer(4));

        let (key, value) = PropertyValue::parse_assignment("motto=a=b").unwrap();
        assert_eq!(key, "motto");
        assert_eq!(value, PropertyValue::String("a=b".to_string()));

        assert!(PropertyValue::parse_assignment("novalue").is_err());
        assert!(PropertyValue::parse_assignment("=4").is_err());
    }

    #[test]
    fn test_untagged_json() {
        let map: PropertyMap =
            serde_json::from_str(r#"{"a": 1, "b": 1.5, "c": true, "d": "x"}"#).unwrap();
        assert_eq!(map["a"], PropertyValue::Integer(1));
        assert_eq!(map["b"], PropertyValue::Float(1.5));
        assert_eq!(map["c"], PropertyValue::Bool(true));
        assert_eq!(map["d"], PropertyValue::String("x".to_string()));
    }

    #[test]
    fn test_entity_tagged_by_kind() {
        let entity = Entity::DatatypeProperty(DatatypeProperty {
            uri: "p1".to_string(),
            title: "legs".to_string(),
        });
        let json = serde_json::to_value(&entity).unwrap();
        assert_eq!(json["kind"], "DatatypeProperty");
        assert_eq!(json["title"], "legs");
    }
}
