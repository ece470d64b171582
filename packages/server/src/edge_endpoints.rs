//! Edge endpoints
//!
//! # Endpoints
//!
//! - `POST /edges` - Create an edge between two existing nodes
//! - `GET /edges` - List every edge, newest first
//! - `GET /edges/:id` - Get an edge by ID
//! - `PATCH /edges/:id` - Update type, weight or label
//! - `DELETE /edges/:id` - Delete an edge

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    response::Json,
    routing::get,
    Router,
};

use crate::{AppState, HttpError};
use mindmap_core::{CreateEdgeInput, DeleteResult, Edge, EdgeList, EdgeUpdate};

/// Create a new edge
///
/// Both endpoints must exist at creation time. A missing source is reported
/// before a missing target.
///
/// ```bash
/// curl -X POST http://localhost:4000/edges \
///   -H "Content-Type: application/json" \
///   -d '{"source_node_id": "Yk3v0aQ2xZc", "target_node_id": "p1Lq9wR4sTe", "type": "supports", "weight": 0.8}'
/// ```
async fn create_edge(
    State(state): State<AppState>,
    payload: Result<Json<CreateEdgeInput>, JsonRejection>,
) -> Result<Json<Edge>, HttpError> {
    let Json(input) = payload?;
    let edge = state.edge_service.create_edge(input).await?;
    Ok(Json(edge))
}

async fn get_edge(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Edge>, HttpError> {
    let edge = state.edge_service.get_edge(&id).await?;
    Ok(Json(edge))
}

/// Update an edge
///
/// Endpoints cannot be changed; `source_node_id` and `target_node_id` in the
/// body are ignored.
async fn update_edge(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<EdgeUpdate>, JsonRejection>,
) -> Result<Json<Edge>, HttpError> {
    let Json(update) = payload?;
    let edge = state.edge_service.update_edge(&id, update).await?;
    Ok(Json(edge))
}

async fn delete_edge(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<DeleteResult>, HttpError> {
    let result = state.edge_service.delete_edge(&id).await?;
    Ok(Json(result))
}

async fn list_edges(State(state): State<AppState>) -> Result<Json<EdgeList>, HttpError> {
    let edges = state.edge_service.list_edges().await?;
    Ok(Json(edges))
}

pub fn routes(state: AppState) -> Router {
    Router::new()
        .route("/edges", get(list_edges).post(create_edge))
        .route(
            "/edges/:id",
            get(get_edge).patch(update_edge).delete(delete_edge),
        )
        .with_state(state)
}
