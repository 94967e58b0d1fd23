//! Write operations against Neo4j.
//!
//! Nodes are identified by their `uri` property. Labels and relationship
//! types are backtick-quoted, so any title can serve as an edge label.

use neo4rs::{query, BoltType};

use ontograph_core::{vocab, Node, PropertyMap, Relationship};

use crate::client::{GraphClient, GraphError};
use crate::queries::{node_from_row, props_to_bolt, value_to_bolt};
use crate::store::{check_label, with_uri, NodeUpdate};

impl GraphClient {
    // ── Node Writes ──────────────────────────────────────────────

    /// Create a node, refusing a uri that is already taken.
    pub async fn create_node(
        &self,
        labels: &[&str],
        properties: PropertyMap,
    ) -> Result<Node, GraphError> {
        let (uri, properties) = with_uri(properties);
        let cypher = format!(
            "OPTIONAL MATCH (existing {{uri: $uri}})
             WITH existing WHERE existing IS NULL
             CREATE (n{labels} $props)
             RETURN n",
            labels = label_clause(labels),
        );

        let q = query(&cypher)
            .param("uri", uri.clone())
            .param("props", props_to_bolt(&properties));

        let row = match self.query_one(q).await {
            Ok(row) => row,
            Err(GraphError::Query(e)) if is_constraint_violation(&e) => {
                return Err(GraphError::DuplicateUri(uri));
            }
            Err(e) => return Err(e),
        };
        match row {
            Some(row) => {
                tracing::debug!(uri = %uri, ?labels, "Node created");
                node_from_row(&row, "n")
            }
            None => Err(GraphError::DuplicateUri(uri)),
        }
    }

    /// Apply a partial update to the node with the given uri.
    pub async fn update_node(
        &self,
        uri: &str,
        update: &NodeUpdate,
    ) -> Result<Option<Node>, GraphError> {
        if update.is_empty() {
            return self.get_node_by_uri(uri).await;
        }

        let mut clauses = Vec::new();
        for label in update.removed_labels() {
            clauses.push(format!("REMOVE n:{}", quote(label)));
        }
        if !update.removed_properties().is_empty() {
            let keys: Vec<String> = update
                .removed_properties()
                .iter()
                .map(|key| format!("n.{}", quote(key)))
                .collect();
            clauses.push(format!("REMOVE {}", keys.join(", ")));
        }
        for label in update.added_labels() {
            clauses.push(format!("SET n:{}", quote(label)));
        }

        let mut q_params: Vec<(String, BoltType)> = Vec::new();
        if !update.set_properties().is_empty() {
            let mut sets = Vec::new();
            for (i, (key, value)) in update.set_properties().iter().enumerate() {
                let param = format!("set_{i}");
                sets.push(format!("n.{} = ${param}", quote(key)));
                q_params.push((param, value_to_bolt(value)));
            }
            clauses.push(format!("SET {}", sets.join(", ")));
        }

        let cypher = format!(
            "MATCH (n {{uri: $uri}})
             {}
             RETURN n",
            clauses.join("\n")
        );

        let mut q = query(&cypher).param("uri", uri.to_string());
        for (name, value) in q_params {
            q = q.param(&name, value);
        }

        match self.query_one(q).await? {
            Some(row) => Ok(Some(node_from_row(&row, "n")?)),
            None => Ok(None),
        }
    }

    /// Detach-delete a node. Returns whether anything was removed.
    pub async fn delete_node_by_uri(&self, uri: &str) -> Result<bool, GraphError> {
        let q = query(
            "MATCH (n {uri: $uri})
             DETACH DELETE n
             RETURN count(n) AS deleted",
        )
        .param("uri", uri.to_string());

        let deleted = match self.query_one(q).await? {
            Some(row) => row.get::<i64>("deleted").unwrap_or(0),
            None => 0,
        };
        tracing::debug!(uri, deleted, "Node delete");
        Ok(deleted > 0)
    }

    // ── Relationship Writes ──────────────────────────────────────

    /// Create a directed edge between two existing nodes.
    pub async fn create_arc(
        &self,
        from_uri: &str,
        to_uri: &str,
        label: &str,
        properties: PropertyMap,
    ) -> Result<Relationship, GraphError> {
        check_label(label)?;
        let cypher = format!(
            "MATCH (a {{uri: $from_uri}}), (b {{uri: $to_uri}})
             CREATE (a)-[r:{rel_type}]->(b)
             SET r = $props
             RETURN r",
            rel_type = quote(label),
        );

        let q = query(&cypher)
            .param("from_uri", from_uri.to_string())
            .param("to_uri", to_uri.to_string())
            .param("props", props_to_bolt(&properties));

        let Some(row) = self.query_one(q).await? else {
            return Err(GraphError::DanglingReference {
                from_uri: from_uri.to_string(),
                to_uri: to_uri.to_string(),
            });
        };

        let rel: neo4rs::Relation = row
            .get("r")
            .map_err(|e| GraphError::Serialization(format!("Failed to get relation: {e}")))?;

        Ok(Relationship {
            id: rel.id(),
            label: rel.typ().to_string(),
            from_uri: from_uri.to_string(),
            to_uri: to_uri.to_string(),
            properties,
        })
    }

    /// Delete a single relationship by its store id.
    pub async fn delete_arc_by_id(&self, id: i64) -> Result<bool, GraphError> {
        let q = query(
            "MATCH ()-[r]->()
             WHERE id(r) = $id
             DELETE r
             RETURN count(r) AS deleted",
        )
        .param("id", id);

        match self.query_one(q).await? {
            Some(row) => Ok(row.get::<i64>("deleted").unwrap_or(0) > 0),
            None => Ok(false),
        }
    }

    // ── Schema ───────────────────────────────────────────────────

    /// Create a `uri` uniqueness constraint for every domain label.
    ///
    /// The constraint is what makes `create_node` safe against concurrent
    /// writers; the `OPTIONAL MATCH` guard alone is not.
    pub async fn ensure_uri_constraints(&self) -> Result<(), GraphError> {
        for label in vocab::DOMAIN_LABELS {
            self.run(query(&uri_constraint_cypher(label))).await?;
        }
        tracing::info!("Ensured uri constraints");
        Ok(())
    }
}

// ── Helpers ──────────────────────────────────────────────────────

fn uri_constraint_cypher(label: &str) -> String {
    format!(
        "CREATE CONSTRAINT {name} IF NOT EXISTS FOR (n:{label}) REQUIRE n.uri IS UNIQUE",
        name = quote(&format!("{}_uri_unique", label.to_lowercase())),
        label = quote(label),
    )
}

/// Whether `err` is Neo4j refusing a write that breaks a constraint.
fn is_constraint_violation(err: &neo4rs::Error) -> bool {
    matches!(err, neo4rs::Error::Neo4j(e) if e.code() == CONSTRAINT_VIOLATION)
}

const CONSTRAINT_VIOLATION: &str = "Neo.ClientError.Schema.ConstraintValidationFailed";

/// Backtick-quote a label, type, or property key for inlining into Cypher.
pub(crate) fn quote(name: &str) -> String {
    format!("`{}`", name.replace('`', "``"))
}

/// Render `:A:B` for a label list, or nothing for an empty list.
pub(crate) fn label_clause(labels: &[&str]) -> String {
    labels.iter().map(|l| format!(":{}", quote(l))).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quote_escapes_backticks() {
        assert_eq!(quote("subClassOf"), "`subClassOf`");
        assert_eq!(quote("has `owner`"), "`has ``owner```");
    }

    #[test]
    fn test_label_clause() {
        assert_eq!(label_clause(&["Class"]), ":`Class`");
        assert_eq!(label_clause(&["Class", "Draft"]), ":`Class`:`Draft`");
        assert_eq!(label_clause(&[]), "");
    }

    #[test]
    fn test_uri_constraint_cypher() {
        assert_eq!(
            uri_constraint_cypher("DatatypeProperty"),
            "CREATE CONSTRAINT `datatypeproperty_uri_unique` IF NOT EXISTS \
             FOR (n:`DatatypeProperty`) REQUIRE n.uri IS UNIQUE"
        );
    }
}
