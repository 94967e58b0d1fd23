//! Read operations and Bolt value conversion.

use neo4rs::{query, BoltMap, BoltType, Row};

use ontograph_core::{Node, PropertyMap, PropertyValue};

use crate::client::{GraphClient, GraphError};
use crate::mutations::label_clause;

impl GraphClient {
    // ── Single Node Lookups ──────────────────────────────────────

    /// Get a node by its uri, or `None` when nothing matches.
    pub async fn get_node_by_uri(&self, uri: &str) -> Result<Option<Node>, GraphError> {
        let q = query(
            "MATCH (n {uri: $uri})
             RETURN n LIMIT 1",
        )
        .param("uri", uri.to_string());

        match self.query_one(q).await? {
            Some(row) => Ok(Some(node_from_row(&row, "n")?)),
            None => Ok(None),
        }
    }

    // ── List Queries ─────────────────────────────────────────────

    /// Every node in the graph.
    pub async fn get_all_nodes(&self) -> Result<Vec<Node>, GraphError> {
        self.collect_nodes(query("MATCH (n) RETURN n"), "n").await
    }

    /// Every node carrying all of `labels`.
    pub async fn get_nodes_by_labels(&self, labels: &[&str]) -> Result<Vec<Node>, GraphError> {
        if labels.is_empty() {
            return self.get_all_nodes().await;
        }
        let cypher = format!("MATCH (n{}) RETURN n", label_clause(labels));
        self.collect_nodes(query(&cypher), "n").await
    }

    // ── Neighbor Queries ─────────────────────────────────────────

    /// Targets of every outgoing edge, any relationship type.
    pub async fn get_arcs_from(&self, uri: &str) -> Result<Vec<Node>, GraphError> {
        let q = query(
            "MATCH (a {uri: $uri})-[]->(b)
             RETURN b",
        )
        .param("uri", uri.to_string());
        self.collect_nodes(q, "b").await
    }

    /// Sources of every incoming edge, any relationship type.
    pub async fn get_arcs_to(&self, uri: &str) -> Result<Vec<Node>, GraphError> {
        let q = query(
            "MATCH (b)-[]->(a {uri: $uri})
             RETURN b",
        )
        .param("uri", uri.to_string());
        self.collect_nodes(q, "b").await
    }

    async fn collect_nodes(&self, q: neo4rs::Query, column: &str) -> Result<Vec<Node>, GraphError> {
        let rows = self.query_rows(q).await?;
        let mut results = Vec::with_capacity(rows.len());
        for row in rows {
            results.push(node_from_row(&row, column)?);
        }
        Ok(results)
    }
}

// ── Conversion ───────────────────────────────────────────────────

/// Pull a node out of `column` and convert it.
pub(crate) fn node_from_row(row: &Row, column: &str) -> Result<Node, GraphError> {
    let node: neo4rs::Node = row
        .get(column)
        .map_err(|e| GraphError::Serialization(format!("Failed to deserialize node: {e}")))?;
    Ok(neo4j_node_to_node(&node))
}

/// Convert a neo4rs::Node into the store-neutral `Node`.
fn neo4j_node_to_node(node: &neo4rs::Node) -> Node {
    let labels = node.labels().iter().map(|l| l.to_string()).collect();

    let mut properties = PropertyMap::new();
    for key in node.keys() {
        match read_scalar(node, key) {
            Some(value) => {
                properties.insert(key.to_string(), value);
            }
            None => {
                tracing::warn!(node_id = node.id(), key, "Skipping unreadable property");
            }
        }
    }

    Node {
        id: node.id(),
        labels,
        properties,
    }
}

/// Read a property as one of the supported scalars. Anything richer (lists,
/// maps, temporal values) is stringified as JSON text.
fn read_scalar(node: &neo4rs::Node, key: &str) -> Option<PropertyValue> {
    if let Ok(b) = node.get::<bool>(key) {
        return Some(PropertyValue::Bool(b));
    }
    if let Ok(i) = node.get::<i64>(key) {
        return Some(PropertyValue::Integer(i));
    }
    if let Ok(x) = node.get::<f64>(key) {
        return Some(PropertyValue::Float(x));
    }
    if let Ok(s) = node.get::<String>(key) {
        return Some(PropertyValue::String(s));
    }
    node.get::<serde_json::Value>(key)
        .ok()
        .map(|json| PropertyValue::String(json.to_string()))
}

pub(crate) fn value_to_bolt(value: &PropertyValue) -> BoltType {
    match value {
        PropertyValue::Bool(b) => BoltType::from(*b),
        PropertyValue::Integer(i) => BoltType::from(*i),
        PropertyValue::Float(x) => BoltType::from(*x),
        PropertyValue::String(s) => BoltType::from(s.clone()),
    }
}

pub(crate) fn props_to_bolt(properties: &PropertyMap) -> BoltType {
    let mut map = BoltMap::new();
    for (key, value) in properties {
        map.put(key.as_str().into(), value_to_bolt(value));
    }
    BoltType::Map(map)
}
