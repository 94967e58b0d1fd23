//! Integration tests for ontograph-graph against a live Neo4j instance.
//!
//! Run with: cargo test --package ontograph-graph --test integration -- --ignored
//!
//! Skipped automatically if Neo4j is not available.

use ontograph_core::{PropertyMap, PropertyValue};
use ontograph_graph::{GraphClient, GraphConfig, GraphError, GraphStore, NodeUpdate};

async fn connect_or_skip() -> Option<GraphClient> {
    let config = GraphConfig::default();
    match GraphClient::connect(&config).await {
        Ok(client) => Some(client),
        Err(e) => {
            eprintln!("Skipping integration test (Neo4j not available): {e}");
            None
        }
    }
}

/// A uri prefix unique to one test run, so cleanup never touches real data.
fn unique_prefix() -> String {
    format!("it-{}", ontograph_core::types::generate_uri())
}

async fn cleanup(client: &GraphClient, prefix: &str) {
    let q = neo4rs::query("MATCH (n) WHERE n.uri STARTS WITH $prefix DETACH DELETE n")
        .param("prefix", prefix.to_string());
    let _ = client.run(q).await;
}

fn props(uri: &str, title: &str) -> PropertyMap {
    let mut props = PropertyMap::new();
    props.insert("uri".to_string(), PropertyValue::from(uri));
    props.insert("title".to_string(), PropertyValue::from(title));
    props
}

#[tokio::test]
#[ignore = "requires live Neo4j"]
async fn test_create_and_get_node() {
    let Some(client) = connect_or_skip().await else {
        return;
    };
    let prefix = unique_prefix();

    let mut p = props(&format!("{prefix}-a"), "Animal");
    p.insert("legs".to_string(), PropertyValue::Integer(4));
    p.insert("weight".to_string(), PropertyValue::Float(12.5));
    p.insert("tame".to_string(), PropertyValue::Bool(true));
    let created = client.create_node(&["Class"], p).await.unwrap();

    let fetched = GraphStore::get_node_by_uri(&client, &format!("{prefix}-a"))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(fetched.id, created.id);
    assert_eq!(fetched.labels, vec!["Class".to_string()]);
    assert_eq!(fetched.get("legs"), Some(&PropertyValue::Integer(4)));
    assert_eq!(fetched.get("weight"), Some(&PropertyValue::Float(12.5)));
    assert_eq!(fetched.get("tame"), Some(&PropertyValue::Bool(true)));

    cleanup(&client, &prefix).await;
}

#[tokio::test]
#[ignore = "requires live Neo4j"]
async fn test_duplicate_uri_refused() {
    let Some(client) = connect_or_skip().await else {
        return;
    };
    let prefix = unique_prefix();
    let uri = format!("{prefix}-dup");

    client.create_node(&["Class"], props(&uri, "One")).await.unwrap();
    let err = client
        .create_node(&["Class"], props(&uri, "Two"))
        .await
        .unwrap_err();
    assert!(matches!(err, GraphError::DuplicateUri(_)));

    cleanup(&client, &prefix).await;
}

#[tokio::test]
#[ignore = "requires live Neo4j"]
async fn test_concurrent_duplicate_creates_keep_one_node() {
    let Some(client) = connect_or_skip().await else {
        return;
    };
    client.ensure_uri_constraints().await.unwrap();
    let prefix = unique_prefix();
    let uri = format!("{prefix}-race");

    let mut handles = Vec::new();
    for i in 0..8 {
        let client = client.clone();
        let p = props(&uri, &format!("Racer {i}"));
        handles.push(tokio::spawn(async move {
            client.create_node(&["Class"], p).await
        }));
    }

    let mut created = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(_) => created += 1,
            Err(e) => assert!(matches!(e, GraphError::DuplicateUri(_)), "unexpected: {e}"),
        }
    }
    assert_eq!(created, 1);

    cleanup(&client, &prefix).await;
}

#[tokio::test]
#[ignore = "requires live Neo4j"]
async fn test_arcs_and_dangling_reference() {
    let Some(client) = connect_or_skip().await else {
        return;
    };
    let prefix = unique_prefix();
    let child = format!("{prefix}-child");
    let parent = format!("{prefix}-parent");

    client.create_node(&["Class"], props(&child, "Dog")).await.unwrap();
    client.create_node(&["Class"], props(&parent, "Animal")).await.unwrap();

    let rel = client
        .create_arc(&child, &parent, "subClassOf", PropertyMap::new())
        .await
        .unwrap();
    assert_eq!(rel.label, "subClassOf");

    let parents = client.get_arcs_from(&child).await.unwrap();
    assert_eq!(parents.len(), 1);
    assert_eq!(parents[0].uri(), Some(parent.as_str()));

    let children = client.get_arcs_to(&parent).await.unwrap();
    assert_eq!(children.len(), 1);
    assert_eq!(children[0].uri(), Some(child.as_str()));

    let err = client
        .create_arc(&child, &format!("{prefix}-ghost"), "subClassOf", PropertyMap::new())
        .await
        .unwrap_err();
    assert!(err.is_dangling_reference());

    assert!(client.delete_arc_by_id(rel.id).await.unwrap());
    assert!(client.get_arcs_from(&child).await.unwrap().is_empty());

    cleanup(&client, &prefix).await;
}

#[tokio::test]
#[ignore = "requires live Neo4j"]
async fn test_update_and_delete_node() {
    let Some(client) = connect_or_skip().await else {
        return;
    };
    let prefix = unique_prefix();
    let uri = format!("{prefix}-obj");

    client.create_node(&["Object"], props(&uri, "Rex")).await.unwrap();

    let update = NodeUpdate::new()
        .set("title", "Rex II")
        .set("uri", "ignored")
        .add_label("Archived");
    let node = client.update_node(&uri, &update).await.unwrap().unwrap();
    assert_eq!(node.uri(), Some(uri.as_str()));
    assert_eq!(node.get("title"), Some(&PropertyValue::from("Rex II")));
    assert!(node.has_label("Archived"));

    assert!(client.delete_node_by_uri(&uri).await.unwrap());
    assert!(!client.delete_node_by_uri(&uri).await.unwrap());
    assert!(GraphStore::get_node_by_uri(&client, &uri).await.unwrap().is_none());

    cleanup(&client, &prefix).await;
}
