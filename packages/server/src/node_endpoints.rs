//! Node endpoints
//!
//! # Endpoints
//!
//! - `GET /health` - Health check endpoint
//! - `POST /nodes` - Create a new node
//! - `GET /nodes` - List nodes, newest first (`?limit=&offset=`)
//! - `GET /nodes/:id` - Get a node by ID
//! - `PATCH /nodes/:id` - Update a node (merge-patch)
//! - `DELETE /nodes/:id` - Delete a node

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    response::Json,
    routing::get,
    Router,
};
use serde::{Deserialize, Serialize};

use crate::{AppState, HttpError};
use mindmap_core::{CreateNodeInput, DeleteResult, ListNodesQuery, Node, NodeList, NodeUpdate};

/// Health check response
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    pub version: String,
}

/// Health check endpoint
///
/// ```bash
/// curl http://localhost:4000/health
/// ```
async fn health_check() -> Json<HealthStatus> {
    Json(HealthStatus {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Create a new node
///
/// Only `title` is required. Omitted or null optional fields default to
/// empty strings and a 0/0 position.
///
/// ```bash
/// curl -X POST http://localhost:4000/nodes \
///   -H "Content-Type: application/json" \
///   -d '{"title": "Idea", "color": "#ffcc00", "x": 120, "y": 40}'
/// ```
async fn create_node(
    State(state): State<AppState>,
    payload: Result<Json<CreateNodeInput>, JsonRejection>,
) -> Result<Json<Node>, HttpError> {
    let Json(input) = payload?;
    let node = state.node_service.create_node(input).await?;
    Ok(Json(node))
}

/// Get a node by ID
async fn get_node(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Node>, HttpError> {
    let node = state.node_service.get_node(&id).await?;
    Ok(Json(node))
}

/// Update an existing node
///
/// Only the supplied fields change; the response is the full stored node.
///
/// ```bash
/// curl -X PATCH http://localhost:4000/nodes/Yk3v0aQ2xZc \
///   -H "Content-Type: application/json" \
///   -d '{"x": 300}'
/// ```
async fn update_node(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<NodeUpdate>, JsonRejection>,
) -> Result<Json<Node>, HttpError> {
    let Json(update) = payload?;
    tracing::debug!("UPDATE request for node {}: {:?}", id, update);
    let node = state.node_service.update_node(&id, update).await?;
    Ok(Json(node))
}

/// Delete a node by ID
///
/// Edges that reference the node are left in place.
async fn delete_node(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<DeleteResult>, HttpError> {
    let result = state.node_service.delete_node(&id).await?;
    Ok(Json(result))
}

/// List nodes, newest first
///
/// ```bash
/// curl "http://localhost:4000/nodes?limit=20&offset=40"
/// ```
async fn list_nodes(
    State(state): State<AppState>,
    query: Result<Query<ListNodesQuery>, QueryRejection>,
) -> Result<Json<NodeList>, HttpError> {
    let Query(query) = query?;
    let page = state.node_service.list_nodes(query).await?;
    Ok(Json(page))
}

/// Router with the health check and all node endpoints
pub fn routes(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/nodes", get(list_nodes).post(create_node))
        .route(
            "/nodes/:id",
            get(get_node).patch(update_node).delete(delete_node),
        )
        .with_state(state)
}
