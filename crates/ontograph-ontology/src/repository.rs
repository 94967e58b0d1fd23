//! The ontology repository: typed CRUD over the generic graph store.
//!
//! Classes, properties and objects are plain nodes; the repository writes
//! them with the persisted vocabulary and reads them back through the entity
//! mapper. Graph-shape algorithms (signatures, cascades, roots) live in
//! [`crate::traversal`].

use std::sync::Arc;

use ontograph_core::mapper::map_nodes;
use ontograph_core::{
    map_node, vocab, Class, Entity, Node, Object, PropertyMap, PropertyValue, Relationship,
};
use ontograph_graph::{GraphStore, NodeUpdate};

use crate::error::{OntologyError, Result};

/// Shared handle to the injected store.
pub type StoreHandle = Arc<dyn GraphStore>;

/// Domain API over a single graph store.
///
/// Clone is cheap (inner Arc). Operations are not atomic across their
/// individual store round-trips.
#[derive(Clone)]
pub struct OntologyRepository {
    store: StoreHandle,
}

/// A partial object update.
///
/// Connections are additive: existing edges with the same label are kept.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ObjectUpdate {
    pub title: Option<String>,
    pub description: Option<String>,
    pub properties: PropertyMap,
    /// `(edge label, target uri)` pairs.
    pub new_connections: Vec<(String, String)>,
}

impl OntologyRepository {
    pub fn new(store: StoreHandle) -> Self {
        Self { store }
    }

    pub(crate) fn store(&self) -> &dyn GraphStore {
        self.store.as_ref()
    }

    // ── Classes ──────────────────────────────────────────────────

    /// Create a class, optionally under `parent_uri`. Returns the new uri.
    pub async fn create_class(
        &self,
        title: &str,
        description: &str,
        parent_uri: Option<&str>,
    ) -> Result<String> {
        let uri = self
            .create_entity_node(vocab::CLASS, titled(title, Some(description)))
            .await?;
        if let Some(parent) = parent_uri {
            self.link(&uri, parent, vocab::SUBCLASS_OF).await?;
        }
        tracing::debug!(uri = %uri, title, parent = ?parent_uri, "Class created");
        Ok(uri)
    }

    /// Add another `subClassOf` edge from `target_uri` to `parent_uri`.
    ///
    /// No cycle check is made.
    pub async fn add_class_parent(&self, parent_uri: &str, target_uri: &str) -> Result<()> {
        self.link(target_uri, parent_uri, vocab::SUBCLASS_OF).await
    }

    /// The class at `uri`, or `None` if absent or not a class.
    pub async fn get_class(&self, uri: &str) -> Result<Option<Class>> {
        Ok(self.get_entity(uri).await?.and_then(Entity::into_class))
    }

    /// Every mapped target of an outgoing edge. Callers filter for classes.
    pub async fn get_class_parents(&self, uri: &str) -> Result<Vec<Entity>> {
        let nodes = self.store.get_arcs_from(uri).await?;
        Ok(map_nodes(&nodes))
    }

    /// Every mapped source of an incoming edge: subclasses, instances and
    /// attributes alike.
    pub async fn get_class_children(&self, uri: &str) -> Result<Vec<Entity>> {
        let nodes = self.store.get_arcs_to(uri).await?;
        Ok(map_nodes(&nodes))
    }

    /// Instances among the class's children.
    pub async fn get_class_objects(&self, uri: &str) -> Result<Vec<Object>> {
        Ok(self
            .get_class_children(uri)
            .await?
            .into_iter()
            .filter_map(Entity::into_object)
            .collect())
    }

    /// Overwrite title and description. Edges are untouched.
    pub async fn update_class(&self, uri: &str, title: &str, description: &str) -> Result<bool> {
        let update = NodeUpdate::new()
            .set(vocab::TITLE, title)
            .set(vocab::DESCRIPTION, description);
        Ok(self.store.update_node(uri, &update).await?.is_some())
    }

    // ── Class Attributes ─────────────────────────────────────────

    /// Declare a datatype property on a class. Returns the property uri.
    pub async fn add_class_attribute(&self, class_uri: &str, title: &str) -> Result<String> {
        let uri = self
            .create_entity_node(vocab::DATATYPE_PROPERTY, titled(title, None))
            .await?;
        self.link(&uri, class_uri, vocab::DOMAIN).await?;
        tracing::debug!(uri = %uri, class_uri, title, "Datatype property declared");
        Ok(uri)
    }

    /// Declare an object property on a class whose values must be instances
    /// of `range_class_uri`. Returns the property uri.
    pub async fn add_class_object_attribute(
        &self,
        class_uri: &str,
        title: &str,
        range_class_uri: &str,
    ) -> Result<String> {
        let uri = self
            .create_entity_node(vocab::OBJECT_PROPERTY, titled(title, None))
            .await?;
        self.link(&uri, class_uri, vocab::DOMAIN).await?;
        self.link(&uri, range_class_uri, vocab::RANGE).await?;
        tracing::debug!(uri = %uri, class_uri, range_class_uri, title, "Object property declared");
        Ok(uri)
    }

    /// Remove a datatype property. Its `domain` edge goes with it.
    pub async fn delete_class_attribute(&self, uri: &str) -> Result<bool> {
        Ok(self.store.delete_node_by_uri(uri).await?)
    }

    /// Remove an object property. Its `domain` and `range` edges go with it.
    pub async fn delete_class_object_attribute(&self, uri: &str) -> Result<bool> {
        Ok(self.store.delete_node_by_uri(uri).await?)
    }

    // ── Objects ──────────────────────────────────────────────────

    /// Create an instance of `class_uri`.
    ///
    /// `properties` become scalar values on the node; each
    /// `(label, target uri)` in `object_properties` becomes an outgoing edge.
    /// Nothing is checked against the class signature. A failure part-way
    /// leaves the node and any edges already created in place.
    pub async fn create_object(
        &self,
        class_uri: &str,
        title: &str,
        description: &str,
        properties: PropertyMap,
        object_properties: &[(String, String)],
    ) -> Result<String> {
        let mut props = properties;
        props.extend(titled(title, Some(description)));

        let uri = self.create_entity_node(vocab::OBJECT, props).await?;
        self.link(&uri, class_uri, vocab::TYPE_OF).await?;
        for (label, target) in object_properties {
            self.link(&uri, target, label).await?;
        }
        tracing::debug!(uri = %uri, class_uri, links = object_properties.len(), "Object created");
        Ok(uri)
    }

    /// The object at `uri`, or `None` if absent or not an object.
    pub async fn get_object(&self, uri: &str) -> Result<Option<Object>> {
        Ok(self.get_entity(uri).await?.and_then(Entity::into_object))
    }

    /// Partially update an object. Returns `false` if it does not exist.
    pub async fn update_object(&self, uri: &str, update: ObjectUpdate) -> Result<bool> {
        let mut node_update = NodeUpdate::new().set_all(update.properties);
        if let Some(title) = update.title {
            node_update = node_update.set(vocab::TITLE, title);
        }
        if let Some(description) = update.description {
            node_update = node_update.set(vocab::DESCRIPTION, description);
        }

        if self.store.update_node(uri, &node_update).await?.is_none() {
            return Ok(false);
        }
        for (label, target) in &update.new_connections {
            self.link(uri, target, label).await?;
        }
        Ok(true)
    }

    pub async fn delete_object(&self, uri: &str) -> Result<bool> {
        Ok(self.store.delete_node_by_uri(uri).await?)
    }

    /// Add one object-property value: an edge labeled `label` from the object
    /// to `target_uri`. Returns the relationship so it can be removed later.
    pub async fn connect(
        &self,
        object_uri: &str,
        label: &str,
        target_uri: &str,
    ) -> Result<Relationship> {
        Ok(self
            .store
            .create_arc(object_uri, target_uri, label, PropertyMap::new())
            .await?)
    }

    /// Remove a single relationship, e.g. one value of a multi-valued object
    /// property.
    pub async fn disconnect(&self, arc_id: i64) -> Result<bool> {
        Ok(self.store.delete_arc_by_id(arc_id).await?)
    }

    // ── Helpers ──────────────────────────────────────────────────

    pub(crate) async fn get_entity(&self, uri: &str) -> Result<Option<Entity>> {
        let node = self.store.get_node_by_uri(uri).await?;
        Ok(node.as_ref().and_then(map_node))
    }

    async fn create_entity_node(&self, label: &str, properties: PropertyMap) -> Result<String> {
        let node = self.store.create_node(&[label], properties).await?;
        uri_of(&node)
    }

    async fn link(&self, from_uri: &str, to_uri: &str, label: &str) -> Result<()> {
        self.connect(from_uri, label, to_uri).await?;
        Ok(())
    }
}

fn uri_of(node: &Node) -> Result<String> {
    node.uri()
        .map(str::to_string)
        .ok_or(OntologyError::MissingUri { id: node.id })
}

fn titled(title: &str, description: Option<&str>) -> PropertyMap {
    let mut props = PropertyMap::new();
    props.insert(vocab::TITLE.to_string(), PropertyValue::from(title));
    if let Some(description) = description {
        props.insert(vocab::DESCRIPTION.to_string(), PropertyValue::from(description));
    }
    props
}
