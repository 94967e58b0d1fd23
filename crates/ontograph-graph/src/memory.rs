//! Process-local graph store.
//!
//! Keeps nodes and relationships in insertion order so scans and neighbor
//! reads are deterministic. Used by tests and the `demo` command.

use std::collections::{BTreeMap, HashMap};

use async_trait::async_trait;
use tokio::sync::RwLock;

use ontograph_core::{Node, PropertyMap, Relationship};

use crate::client::GraphError;
use crate::store::{check_label, with_uri, GraphStore, NodeUpdate};

/// In-memory [`GraphStore`], safe for concurrent use.
#[derive(Default)]
pub struct MemoryStore {
    inner: RwLock<MemoryGraph>,
}

#[derive(Default)]
struct MemoryGraph {
    next_id: i64,
    /// Node id → node, ascending id is insertion order.
    nodes: BTreeMap<i64, Node>,
    /// uri → node id.
    by_uri: HashMap<String, i64>,
    relationships: BTreeMap<i64, Relationship>,
}

impl MemoryGraph {
    fn allocate_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }

    fn node(&self, uri: &str) -> Option<&Node> {
        self.by_uri.get(uri).and_then(|id| self.nodes.get(id))
    }

    fn nodes_for<'a>(&'a self, uris: impl Iterator<Item = &'a str>) -> Vec<Node> {
        uris.filter_map(|uri| self.node(uri)).cloned().collect()
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of relationships currently stored.
    pub async fn relationship_count(&self) -> usize {
        self.inner.read().await.relationships.len()
    }

    /// Every relationship leaving `uri`, in creation order.
    pub async fn relationships_from(&self, uri: &str) -> Vec<Relationship> {
        self.inner
            .read()
            .await
            .relationships
            .values()
            .filter(|r| r.from_uri == uri)
            .cloned()
            .collect()
    }
}

#[async_trait]
impl GraphStore for MemoryStore {
    async fn create_node(
        &self,
        labels: &[&str],
        properties: PropertyMap,
    ) -> Result<Node, GraphError> {
        let (uri, properties) = with_uri(properties);
        let mut graph = self.inner.write().await;
        if graph.by_uri.contains_key(&uri) {
            return Err(GraphError::DuplicateUri(uri));
        }

        let id = graph.allocate_id();
        let mut node_labels: Vec<String> = Vec::with_capacity(labels.len());
        for label in labels {
            if !node_labels.iter().any(|l| l.as_str() == *label) {
                node_labels.push(label.to_string());
            }
        }
        let node = Node {
            id,
            labels: node_labels,
            properties,
        };
        graph.by_uri.insert(uri, id);
        graph.nodes.insert(id, node.clone());
        Ok(node)
    }

    async fn get_node_by_uri(&self, uri: &str) -> Result<Option<Node>, GraphError> {
        Ok(self.inner.read().await.node(uri).cloned())
    }

    async fn get_all_nodes(&self) -> Result<Vec<Node>, GraphError> {
        Ok(self.inner.read().await.nodes.values().cloned().collect())
    }

    async fn get_nodes_by_labels(&self, labels: &[&str]) -> Result<Vec<Node>, GraphError> {
        let graph = self.inner.read().await;
        Ok(graph
            .nodes
            .values()
            .filter(|n| labels.iter().all(|l| n.has_label(l)))
            .cloned()
            .collect())
    }

    async fn get_arcs_from(&self, uri: &str) -> Result<Vec<Node>, GraphError> {
        let graph = self.inner.read().await;
        let targets = graph
            .relationships
            .values()
            .filter(|r| r.from_uri == uri)
            .map(|r| r.to_uri.as_str());
        Ok(graph.nodes_for(targets))
    }

    async fn get_arcs_to(&self, uri: &str) -> Result<Vec<Node>, GraphError> {
        let graph = self.inner.read().await;
        let sources = graph
            .relationships
            .values()
            .filter(|r| r.to_uri == uri)
            .map(|r| r.from_uri.as_str());
        Ok(graph.nodes_for(sources))
    }

    async fn create_arc(
        &self,
        from_uri: &str,
        to_uri: &str,
        label: &str,
        properties: PropertyMap,
    ) -> Result<Relationship, GraphError> {
        check_label(label)?;
        let mut graph = self.inner.write().await;
        if graph.node(from_uri).is_none() || graph.node(to_uri).is_none() {
            return Err(GraphError::DanglingReference {
                from_uri: from_uri.to_string(),
                to_uri: to_uri.to_string(),
            });
        }

        let relationship = Relationship {
            id: graph.allocate_id(),
            label: label.to_string(),
            from_uri: from_uri.to_string(),
            to_uri: to_uri.to_string(),
            properties,
        };
        graph
            .relationships
            .insert(relationship.id, relationship.clone());
        Ok(relationship)
    }

    async fn update_node(
        &self,
        uri: &str,
        update: &NodeUpdate,
    ) -> Result<Option<Node>, GraphError> {
        let mut graph = self.inner.write().await;
        let Some(id) = graph.by_uri.get(uri).copied() else {
            return Ok(None);
        };
        let Some(node) = graph.nodes.get_mut(&id) else {
            return Ok(None);
        };

        node.labels.retain(|l| !update.removed_labels().contains(l));
        for key in update.removed_properties() {
            node.properties.remove(key);
        }
        for label in update.added_labels() {
            if !node.has_label(label) {
                node.labels.push(label.clone());
            }
        }
        for (key, value) in update.set_properties() {
            node.properties.insert(key.clone(), value.clone());
        }
        Ok(Some(node.clone()))
    }

    async fn delete_node_by_uri(&self, uri: &str) -> Result<bool, GraphError> {
        let mut graph = self.inner.write().await;
        let Some(id) = graph.by_uri.remove(uri) else {
            return Ok(false);
        };
        graph.nodes.remove(&id);
        graph
            .relationships
            .retain(|_, r| r.from_uri != uri && r.to_uri != uri);
        Ok(true)
    }

    async fn delete_arc_by_id(&self, id: i64) -> Result<bool, GraphError> {
        Ok(self.inner.write().await.relationships.remove(&id).is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ontograph_core::PropertyValue;

    fn props(pairs: &[(&str, &str)]) -> PropertyMap {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), PropertyValue::from(*v)))
            .collect()
    }

    #[tokio::test]
    async fn test_create_and_lookup() {
        let store = MemoryStore::new();
        let node = store
            .create_node(&["Class"], props(&[("title", "Animal")]))
            .await
            .unwrap();
        let uri = node.uri().unwrap().to_string();

        let fetched = store.get_node_by_uri(&uri).await.unwrap().unwrap();
        assert_eq!(fetched, node);
        assert!(store.get_node_by_uri("missing").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_uri_refused() {
        let store = MemoryStore::new();
        store
            .create_node(&["Class"], props(&[("uri", "same")]))
            .await
            .unwrap();
        let err = store
            .create_node(&["Object"], props(&[("uri", "same")]))
            .await
            .unwrap_err();
        assert!(matches!(err, GraphError::DuplicateUri(uri) if uri == "same"));
    }

    #[tokio::test]
    async fn test_arcs_both_directions() {
        let store = MemoryStore::new();
        store.create_node(&["Class"], props(&[("uri", "a")])).await.unwrap();
        store.create_node(&["Class"], props(&[("uri", "b")])).await.unwrap();

        let rel = store
            .create_arc("a", "b", "subClassOf", PropertyMap::new())
            .await
            .unwrap();
        assert_eq!(rel.label, "subClassOf");

        let from = store.get_arcs_from("a").await.unwrap();
        assert_eq!(from.len(), 1);
        assert_eq!(from[0].uri(), Some("b"));

        let to = store.get_arcs_to("b").await.unwrap();
        assert_eq!(to.len(), 1);
        assert_eq!(to[0].uri(), Some("a"));

        assert!(store.get_arcs_to("a").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_dangling_arc() {
        let store = MemoryStore::new();
        store.create_node(&["Class"], props(&[("uri", "a")])).await.unwrap();

        let err = store
            .create_arc("a", "ghost", "subClassOf", PropertyMap::new())
            .await
            .unwrap_err();
        assert!(err.is_dangling_reference());
        assert_eq!(store.relationship_count().await, 0);
    }

    #[tokio::test]
    async fn test_delete_removes_touching_edges() {
        let store = MemoryStore::new();
        for uri in ["a", "b", "c"] {
            store.create_node(&["Class"], props(&[("uri", uri)])).await.unwrap();
        }
        store.create_arc("a", "b", "x", PropertyMap::new()).await.unwrap();
        store.create_arc("b", "c", "y", PropertyMap::new()).await.unwrap();
        store.create_arc("a", "c", "z", PropertyMap::new()).await.unwrap();

        assert!(store.delete_node_by_uri("b").await.unwrap());
        assert!(!store.delete_node_by_uri("b").await.unwrap());
        assert_eq!(store.relationship_count().await, 1);
        assert_eq!(store.get_arcs_from("a").await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_update_node() {
        let store = MemoryStore::new();
        store
            .create_node(&["Object"], props(&[("uri", "o"), ("title", "T"), ("old", "x")]))
            .await
            .unwrap();

        let update = NodeUpdate::new()
            .set("title", "T2")
            .set("uri", "other")
            .remove("old")
            .add_label("Archived")
            .remove_label("Object");
        let node = store.update_node("o", &update).await.unwrap().unwrap();

        assert_eq!(node.uri(), Some("o"));
        assert_eq!(node.get("title"), Some(&PropertyValue::from("T2")));
        assert!(node.get("old").is_none());
        assert_eq!(node.labels, vec!["Archived".to_string()]);

        assert!(store.update_node("ghost", &update).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_nodes_by_labels_and_arc_delete() {
        let store = MemoryStore::new();
        store.create_node(&["Class"], props(&[("uri", "a")])).await.unwrap();
        store
            .create_node(&["Class", "Draft"], props(&[("uri", "b")]))
            .await
            .unwrap();

        assert_eq!(store.get_nodes_by_labels(&["Class"]).await.unwrap().len(), 2);
        assert_eq!(
            store.get_nodes_by_labels(&["Class", "Draft"]).await.unwrap().len(),
            1
        );
        assert_eq!(store.get_nodes_by_labels(&[]).await.unwrap().len(), 2);

        let rel = store.create_arc("b", "a", "subClassOf", PropertyMap::new()).await.unwrap();
        assert!(store.delete_arc_by_id(rel.id).await.unwrap());
        assert!(!store.delete_arc_by_id(rel.id).await.unwrap());
    }
}
