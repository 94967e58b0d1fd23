//! The graph store adapter contract.
//!
//! Every persistence operation the ontology layer performs goes through
//! [`GraphStore`]. Nodes are addressed by their `uri` property; arc reads
//! ignore relationship types and return the node at the other end.

use async_trait::async_trait;

use ontograph_core::{vocab, Node, PropertyMap, PropertyValue, Relationship};

use crate::client::{GraphClient, GraphError};

/// Generic node/relationship CRUD over a single logical graph.
#[async_trait]
pub trait GraphStore: Send + Sync {
    /// Persist a node, generating a `uri` when `properties` has none.
    ///
    /// Implementors must refuse a `uri` that is already taken.
    async fn create_node(&self, labels: &[&str], properties: PropertyMap)
        -> Result<Node, GraphError>;

    /// Point lookup by `uri`. Returns `Ok(None)` when nothing matches.
    async fn get_node_by_uri(&self, uri: &str) -> Result<Option<Node>, GraphError>;

    /// Full scan of the graph.
    async fn get_all_nodes(&self) -> Result<Vec<Node>, GraphError>;

    /// Nodes carrying every label in `labels`. An empty slice scans everything.
    async fn get_nodes_by_labels(&self, labels: &[&str]) -> Result<Vec<Node>, GraphError>;

    /// Targets of every outgoing edge of `uri`, whatever the edge label.
    async fn get_arcs_from(&self, uri: &str) -> Result<Vec<Node>, GraphError>;

    /// Sources of every incoming edge of `uri`, whatever the edge label.
    async fn get_arcs_to(&self, uri: &str) -> Result<Vec<Node>, GraphError>;

    /// Create a directed edge. Fails with [`GraphError::DanglingReference`]
    /// when either endpoint is missing.
    async fn create_arc(
        &self,
        from_uri: &str,
        to_uri: &str,
        label: &str,
        properties: PropertyMap,
    ) -> Result<Relationship, GraphError>;

    /// Apply a partial update. Returns `Ok(None)` when the node is missing.
    async fn update_node(&self, uri: &str, update: &NodeUpdate)
        -> Result<Option<Node>, GraphError>;

    /// Remove a node together with every edge touching it.
    async fn delete_node_by_uri(&self, uri: &str) -> Result<bool, GraphError>;

    /// Remove a single relationship by its store id.
    async fn delete_arc_by_id(&self, id: i64) -> Result<bool, GraphError>;
}

/// A partial node update: properties to set or remove, labels to add or remove.
///
/// The `uri` property is never touched; blank keys and labels are ignored.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NodeUpdate {
    set: PropertyMap,
    remove: Vec<String>,
    add_labels: Vec<String>,
    remove_labels: Vec<String>,
}

impl NodeUpdate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(mut self, key: impl Into<String>, value: impl Into<PropertyValue>) -> Self {
        let key = key.into();
        if is_mutable_key(&key) {
            self.set.insert(key, value.into());
        }
        self
    }

    pub fn set_all(mut self, properties: PropertyMap) -> Self {
        for (key, value) in properties {
            self = self.set(key, value);
        }
        self
    }

    pub fn remove(mut self, key: impl Into<String>) -> Self {
        let key = key.into();
        if is_mutable_key(&key) {
            self.remove.push(key);
        }
        self
    }

    pub fn add_label(mut self, label: impl Into<String>) -> Self {
        let label = label.into();
        if !label.trim().is_empty() {
            self.add_labels.push(label);
        }
        self
    }

    pub fn remove_label(mut self, label: impl Into<String>) -> Self {
        let label = label.into();
        if !label.trim().is_empty() {
            self.remove_labels.push(label);
        }
        self
    }

    pub fn set_properties(&self) -> &PropertyMap {
        &self.set
    }

    pub fn removed_properties(&self) -> &[String] {
        &self.remove
    }

    pub fn added_labels(&self) -> &[String] {
        &self.add_labels
    }

    pub fn removed_labels(&self) -> &[String] {
        &self.remove_labels
    }

    pub fn is_empty(&self) -> bool {
        self.set.is_empty()
            && self.remove.is_empty()
            && self.add_labels.is_empty()
            && self.remove_labels.is_empty()
    }
}

fn is_mutable_key(key: &str) -> bool {
    !key.trim().is_empty() && key != vocab::URI
}

/// Reject labels Neo4j cannot store as a relationship type.
pub(crate) fn check_label(label: &str) -> Result<(), GraphError> {
    if label.trim().is_empty() {
        return Err(GraphError::InvalidLabel(label.to_string()));
    }
    Ok(())
}

/// Make sure `properties` carries a uri, generating one when absent.
pub(crate) fn with_uri(mut properties: PropertyMap) -> (String, PropertyMap) {
    let uri = match properties.get(vocab::URI) {
        Some(existing) => existing.to_string(),
        None => ontograph_core::types::generate_uri(),
    };
    properties.insert(vocab::URI.to_string(), PropertyValue::String(uri.clone()));
    (uri, properties)
}

#[async_trait]
impl GraphStore for GraphClient {
    async fn create_node(
        &self,
        labels: &[&str],
        properties: PropertyMap,
    ) -> Result<Node, GraphError> {
        GraphClient::create_node(self, labels, properties).await
    }

    async fn get_node_by_uri(&self, uri: &str) -> Result<Option<Node>, GraphError> {
        GraphClient::get_node_by_uri(self, uri).await
    }

    async fn get_all_nodes(&self) -> Result<Vec<Node>, GraphError> {
        GraphClient::get_all_nodes(self).await
    }

    async fn get_nodes_by_labels(&self, labels: &[&str]) -> Result<Vec<Node>, GraphError> {
        GraphClient::get_nodes_by_labels(self, labels).await
    }

    async fn get_arcs_from(&self, uri: &str) -> Result<Vec<Node>, GraphError> {
        GraphClient::get_arcs_from(self, uri).await
    }

    async fn get_arcs_to(&self, uri: &str) -> Result<Vec<Node>, GraphError> {
        GraphClient::get_arcs_to(self, uri).await
    }

    async fn create_arc(
        &self,
        from_uri: &str,
        to_uri: &str,
        label: &str,
        properties: PropertyMap,
    ) -> Result<Relationship, GraphError> {
        GraphClient::create_arc(self, from_uri, to_uri, label, properties).await
    }

    async fn update_node(
        &self,
        uri: &str,
        update: &NodeUpdate,
    ) -> Result<Option<Node>, GraphError> {
        GraphClient::update_node(self, uri, update).await
    }

    async fn delete_node_by_uri(&self, uri: &str) -> Result<bool, GraphError> {
        GraphClient::delete_node_by_uri(self, uri).await
    }

    async fn delete_arc_by_id(&self, id: i64) -> Result<bool, GraphError> {
        GraphClient::delete_arc_by_id(self, id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_update_never_touches_uri() {
        let update = NodeUpdate::new()
            .set("uri", "hijacked")
            .set("title", "T2")
            .remove("uri");
        assert_eq!(update.set_properties().len(), 1);
        assert!(update.set_properties().contains_key("title"));
        assert!(update.removed_properties().is_empty());
    }

    #[test]
    fn test_blank_keys_and_labels_ignored() {
        let update = NodeUpdate::new()
            .set("  ", 1i64)
            .remove("")
            .add_label(" ")
            .remove_label("");
        assert!(update.is_empty());
    }

    #[test]
    fn test_with_uri_keeps_caller_uri() {
        let mut props = PropertyMap::new();
        props.insert("uri".to_string(), "given".into());
        let (uri, props) = with_uri(props);
        assert_eq!(uri, "given");
        assert_eq!(props["uri"], PropertyValue::from("given"));
    }

    #[test]
    fn test_with_uri_generates() {
        let (uri, props) = with_uri(PropertyMap::new());
        assert_eq!(uri.len(), 16);
        assert_eq!(props["uri"].as_str(), Some(uri.as_str()));
    }

    #[test]
    fn test_check_label() {
        assert!(check_label("subClassOf").is_ok());
        assert!(matches!(check_label(""), Err(GraphError::InvalidLabel(_))));
    }
}
