//! Label-driven conversion from raw graph nodes to ontology entities.

use crate::types::{Class, DatatypeProperty, Entity, Node, Object, ObjectProperty, PropertyMap};
use crate::vocab;

/// Map a node to the entity its labels describe.
///
/// Labels are checked in priority order Class, Object, DatatypeProperty,
/// ObjectProperty. A node without a string `uri` and `title` is malformed and
/// maps to `None`, as does a node carrying none of the four labels.
pub fn map_node(node: &Node) -> Option<Entity> {
    let uri = node.uri()?.to_string();
    let title = node.get(vocab::TITLE)?.as_str()?.to_string();

    if node.has_label(vocab::CLASS) {
        Some(Entity::Class(Class {
            uri,
            title,
            description: description_of(node),
        }))
    } else if node.has_label(vocab::OBJECT) {
        let properties: PropertyMap = node
            .properties
            .iter()
            .filter(|(key, _)| !vocab::is_reserved_key(key))
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect();
        Some(Entity::Object(Object {
            uri,
            title,
            description: description_of(node),
            properties,
        }))
    } else if node.has_label(vocab::DATATYPE_PROPERTY) {
        Some(Entity::DatatypeProperty(DatatypeProperty { uri, title }))
    } else if node.has_label(vocab::OBJECT_PROPERTY) {
        Some(Entity::ObjectProperty(ObjectProperty { uri, title }))
    } else {
        None
    }
}

/// Map every node, dropping those that map to nothing.
pub fn map_nodes<'a>(nodes: impl IntoIterator<Item = &'a Node>) -> Vec<Entity> {
    nodes.into_iter().filter_map(map_node).collect()
}

fn description_of(node: &Node) -> String {
    node.get(vocab::DESCRIPTION)
        .map(|v| v.to_string())
        .unwrap_or_default()
}
