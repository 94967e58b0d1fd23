//! Hierarchy traversals: signature collection, cascading deletion, root
//! discovery and whole-ontology export.
//!
//! Both frontier walks carry a visited set keyed by uri, so a cyclic
//! `subClassOf` graph terminates and a node reachable along two paths is
//! processed once.

use std::collections::HashSet;

use ontograph_core::{map_node, vocab, Class, ClassSignature, Entity, Ontology};

use crate::error::Result;
use crate::repository::OntologyRepository;

impl OntologyRepository {
    /// Collect the datatype and object properties of a class and of every
    /// ancestor, breadth-first, in discovery order.
    pub async fn collect_signature(&self, class_uri: &str) -> Result<ClassSignature> {
        let mut datatype_properties = Vec::new();
        let mut object_properties = Vec::new();

        let mut visited: HashSet<String> = HashSet::from([class_uri.to_string()]);
        let mut frontier = vec![class_uri.to_string()];
        let mut depth = 0usize;

        while !frontier.is_empty() {
            let mut next = Vec::new();
            for class in &frontier {
                for child in self.get_class_children(class).await? {
                    match child {
                        Entity::DatatypeProperty(p) => datatype_properties.push(p),
                        Entity::ObjectProperty(p) => object_properties.push(p),
                        Entity::Class(_) | Entity::Object(_) => {}
                    }
                }
                for parent in self.get_class_parents(class).await? {
                    if let Entity::Class(parent) = parent {
                        if visited.insert(parent.uri.clone()) {
                            next.push(parent.uri);
                        }
                    }
                }
            }
            frontier = next;
            depth += 1;
        }

        tracing::debug!(
            class_uri,
            depth,
            datatype = datatype_properties.len(),
            object = object_properties.len(),
            "Signature collected"
        );

        Ok(ClassSignature {
            uri: class_uri.to_string(),
            datatype_properties,
            object_properties,
        })
    }

    /// Delete a class and everything reachable from it through incoming
    /// edges: subclasses, instances, attributes, and whatever points at those.
    ///
    /// Level by level: the next level is gathered from every current node's
    /// incoming edges before any current node is deleted. Returns the number
    /// of nodes removed.
    pub async fn delete_class(&self, uri: &str) -> Result<usize> {
        let mut visited: HashSet<String> = HashSet::from([uri.to_string()]);
        let mut level = vec![uri.to_string()];
        let mut removed = 0usize;

        while !level.is_empty() {
            let mut next = Vec::new();
            for current in &level {
                for source in self.store().get_arcs_to(current).await? {
                    let Some(source_uri) = source.uri() else {
                        continue;
                    };
                    if visited.insert(source_uri.to_string()) {
                        next.push(source_uri.to_string());
                    }
                }
            }

            for current in &level {
                if self.store().delete_node_by_uri(current).await? {
                    removed += 1;
                }
            }
            level = next;
        }

        tracing::info!(uri, removed, "Class deleted with its subtree");
        Ok(removed)
    }

    /// Classes with no outgoing edges, i.e. no declared parent.
    ///
    /// Raw neighbors are counted: a parent edge to a malformed node still
    /// makes the class a non-root.
    pub async fn get_ontology_parent_classes(&self) -> Result<Vec<Class>> {
        let mut roots = Vec::new();
        for node in self.store().get_all_nodes().await? {
            if !node.has_label(vocab::CLASS) {
                continue;
            }
            let Some(Entity::Class(class)) = map_node(&node) else {
                continue;
            };
            if self.store().get_arcs_from(&class.uri).await?.is_empty() {
                roots.push(class);
            }
        }
        Ok(roots)
    }

    /// Export every class signature and every object.
    pub async fn get_ontology(&self) -> Result<Ontology> {
        let nodes = self.store().get_all_nodes().await?;
        let mut ontology = Ontology::default();

        for node in &nodes {
            if node.has_label(vocab::CLASS) {
                if let Some(uri) = node.uri() {
                    ontology.signatures.push(self.collect_signature(uri).await?);
                }
            } else if node.has_label(vocab::OBJECT) {
                if let Some(object) = map_node(node).and_then(Entity::into_object) {
                    ontology.objects.push(object);
                }
            }
        }

        tracing::debug!(
            classes = ontology.signatures.len(),
            objects = ontology.objects.len(),
            "Ontology exported"
        );
        Ok(ontology)
    }
}
