//! Integration tests for EdgeService
//!
//! Tests cover:
//! - Endpoint validation and existence checks (source before target)
//! - Merge-patch updates that never move endpoints
//! - Delete and list semantics
//! - Edges surviving deletion of their endpoint nodes

use mindmap_core::models::{CreateEdgeInput, CreateNodeInput, EdgeUpdate};
use mindmap_core::services::{EdgeService, NodeService, ServiceError};
use mindmap_core::DatabaseService;
use std::sync::Arc;
use tempfile::TempDir;

struct TestServices {
    nodes: NodeService,
    edges: EdgeService,
    _temp: TempDir,
}

async fn create_test_services() -> TestServices {
    let temp = TempDir::new().unwrap();
    let db = Arc::new(
        DatabaseService::new(temp.path().join("mindmap.db"))
            .await
            .unwrap(),
    );
    TestServices {
        nodes: NodeService::new(db.clone()),
        edges: EdgeService::new(db),
        _temp: temp,
    }
}

async fn create_node(nodes: &NodeService, title: &str) -> String {
    nodes
        .create_node(CreateNodeInput {
            title: Some(title.to_string()),
            ..Default::default()
        })
        .await
        .unwrap()
        .id
}

fn edge_input(source: Option<&str>, target: Option<&str>) -> CreateEdgeInput {
    CreateEdgeInput {
        source_node_id: source.map(str::to_string),
        target_node_id: target.map(str::to_string),
        ..Default::default()
    }
}

fn assert_not_found(err: ServiceError, expected: &str) {
    match err {
        ServiceError::NotFound(message) => assert_eq!(message, expected),
        other => panic!("expected NotFound({}), got {:?}", expected, other),
    }
}

// =========================================================================
// Create
// =========================================================================

#[tokio::test]
async fn test_create_edge_between_existing_nodes() {
    let s = create_test_services().await;
    let a = create_node(&s.nodes, "A").await;
    let b = create_node(&s.nodes, "B").await;

    let edge = s
        .edges
        .create_edge(CreateEdgeInput {
            edge_type: Some("relates".to_string()),
            weight: Some(2.5),
            label: Some("see also".to_string()),
            ..edge_input(Some(&a), Some(&b))
        })
        .await
        .unwrap();

    assert!(!edge.id.is_empty());
    assert_eq!(edge.source_node_id, a);
    assert_eq!(edge.target_node_id, b);
    assert_eq!(edge.edge_type, "relates");
    assert_eq!(edge.weight, 2.5);
    assert_eq!(edge.label, "see also");
    assert_eq!(s.edges.get_edge(&edge.id).await.unwrap(), edge);
}

#[tokio::test]
async fn test_create_edge_defaults_attributes() {
    let s = create_test_services().await;
    let a = create_node(&s.nodes, "A").await;
    let b = create_node(&s.nodes, "B").await;

    let edge = s
        .edges
        .create_edge(edge_input(Some(&a), Some(&b)))
        .await
        .unwrap();
    let stored = s.edges.get_edge(&edge.id).await.unwrap();

    assert_eq!(stored.edge_type, "");
    assert_eq!(stored.weight, 0.0);
    assert_eq!(stored.label, "");
}

#[tokio::test]
async fn test_create_edge_requires_both_endpoints() {
    let s = create_test_services().await;
    let a = create_node(&s.nodes, "A").await;

    for input in [
        edge_input(None, Some(&a)),
        edge_input(Some(&a), None),
        edge_input(Some(""), Some(&a)),
        edge_input(Some(&a), Some("")),
        edge_input(None, None),
    ] {
        let err = s.edges.create_edge(input).await.unwrap_err();
        match err {
            ServiceError::InvalidArgument(message) => {
                assert_eq!(message, "source_node_id and target_node_id are required")
            }
            other => panic!("expected InvalidArgument, got {:?}", other),
        }
    }

    assert!(s.edges.list_edges().await.unwrap().edges.is_empty());
}

#[tokio::test]
async fn test_missing_source_reported_even_when_target_exists() {
    let s = create_test_services().await;
    let b = create_node(&s.nodes, "B").await;

    let err = s
        .edges
        .create_edge(edge_input(Some("no-such-node"), Some(&b)))
        .await
        .unwrap_err();
    assert_not_found(err, "Source node not found");
}

#[tokio::test]
async fn test_missing_target_reported_when_source_exists() {
    let s = create_test_services().await;
    let a = create_node(&s.nodes, "A").await;

    let err = s
        .edges
        .create_edge(edge_input(Some(&a), Some("no-such-node")))
        .await
        .unwrap_err();
    assert_not_found(err, "Target node not found");
    assert!(s.edges.list_edges().await.unwrap().edges.is_empty());
}

// =========================================================================
// Get / Update / Delete
// =========================================================================

#[tokio::test]
async fn test_get_missing_edge() {
    let s = create_test_services().await;

    let err = s.edges.get_edge("ghost").await.unwrap_err();
    assert_not_found(err, "Edge not found");
}

#[tokio::test]
async fn test_update_edge_merges_and_keeps_endpoints() {
    let s = create_test_services().await;
    let a = create_node(&s.nodes, "A").await;
    let b = create_node(&s.nodes, "B").await;
    let edge = s
        .edges
        .create_edge(CreateEdgeInput {
            edge_type: Some("supports".to_string()),
            weight: Some(0.3),
            label: Some("weak".to_string()),
            ..edge_input(Some(&a), Some(&b))
        })
        .await
        .unwrap();

    let updated = s
        .edges
        .update_edge(
            &edge.id,
            EdgeUpdate {
                weight: Some(0.9),
                label: Some("strong".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(updated.edge_type, "supports");
    assert_eq!(updated.weight, 0.9);
    assert_eq!(updated.label, "strong");
    assert_eq!(updated.source_node_id, a);
    assert_eq!(updated.target_node_id, b);
    assert_eq!(updated.created_at, edge.created_at);
    assert_eq!(s.edges.get_edge(&edge.id).await.unwrap(), updated);
}

#[tokio::test]
async fn test_update_missing_edge() {
    let s = create_test_services().await;

    let err = s
        .edges
        .update_edge("ghost", EdgeUpdate::default())
        .await
        .unwrap_err();
    assert_not_found(err, "Edge not found");
}

#[tokio::test]
async fn test_delete_edge() {
    let s = create_test_services().await;
    let a = create_node(&s.nodes, "A").await;
    let b = create_node(&s.nodes, "B").await;
    let edge = s
        .edges
        .create_edge(edge_input(Some(&a), Some(&b)))
        .await
        .unwrap();

    assert!(s.edges.delete_edge(&edge.id).await.unwrap().success);
    assert_not_found(s.edges.get_edge(&edge.id).await.unwrap_err(), "Edge not found");
    assert_not_found(
        s.edges.delete_edge(&edge.id).await.unwrap_err(),
        "Edge not found",
    );

    // Nodes are untouched by edge deletion
    assert!(s.nodes.get_node(&a).await.is_ok());
    assert!(s.nodes.get_node(&b).await.is_ok());
}

// =========================================================================
// List
// =========================================================================

#[tokio::test]
async fn test_list_edges_returns_everything_newest_first() {
    let s = create_test_services().await;
    let a = create_node(&s.nodes, "A").await;
    let b = create_node(&s.nodes, "B").await;

    let mut created = Vec::new();
    for i in 0..15 {
        let edge = s
            .edges
            .create_edge(CreateEdgeInput {
                weight: Some(i as f64),
                ..edge_input(Some(&a), Some(&b))
            })
            .await
            .unwrap();
        created.push(edge.id);
    }

    let listed: Vec<_> = s
        .edges
        .list_edges()
        .await
        .unwrap()
        .edges
        .into_iter()
        .map(|e| e.id)
        .collect();

    created.reverse();
    assert_eq!(listed, created);
}

// =========================================================================
// End-to-end
// =========================================================================

#[tokio::test]
async fn test_mind_map_scenario_with_dangling_edge() {
    let s = create_test_services().await;

    let idea = create_node(&s.nodes, "Idea").await;
    let detail = create_node(&s.nodes, "Detail").await;

    let edge = s
        .edges
        .create_edge(CreateEdgeInput {
            edge_type: Some("supports".to_string()),
            weight: Some(0.8),
            ..edge_input(Some(&idea), Some(&detail))
        })
        .await
        .unwrap();
    assert_eq!(edge.source_node_id, idea);
    assert_eq!(edge.target_node_id, detail);

    let listed = s.edges.list_edges().await.unwrap().edges;
    assert_eq!(listed, vec![edge.clone()]);

    s.nodes.delete_node(&idea).await.unwrap();

    // Deleting a node does not cascade: the edge still resolves
    let dangling = s.edges.get_edge(&edge.id).await.unwrap();
    assert_eq!(dangling, edge);
    assert!(s.nodes.get_node(&idea).await.is_err());
}
