//! Edge Service - Edge CRUD and Listing
//!
//! Owns the `edges` table. Referential integrity is an application-level
//! check made only at creation time: both endpoints must name existing nodes.
//! Deleting a node later leaves its edges in place.

use crate::db::{DatabaseError, DatabaseService, DbCreateEdgeParams, IdGenerator, RandomIdGenerator};
use crate::models::time::{format_timestamp, parse_timestamp, SystemTimeProvider, TimeProvider};
use crate::models::{CreateEdgeInput, DeleteResult, Edge, EdgeList, EdgeUpdate};
use crate::services::{ServiceError, MAX_ID_ATTEMPTS};
use libsql::Row;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Edge CRUD service
#[derive(Clone)]
pub struct EdgeService {
    db: Arc<DatabaseService>,
    clock: Arc<dyn TimeProvider>,
    ids: Arc<dyn IdGenerator>,
}

impl EdgeService {
    /// Create a service using the system clock and random ids
    pub fn new(db: Arc<DatabaseService>) -> Self {
        Self::with_providers(db, Arc::new(SystemTimeProvider), Arc::new(RandomIdGenerator))
    }

    /// Create a service with an explicit clock and id source
    pub fn with_providers(
        db: Arc<DatabaseService>,
        clock: Arc<dyn TimeProvider>,
        ids: Arc<dyn IdGenerator>,
    ) -> Self {
        Self { db, clock, ids }
    }

    /// Create an edge between two existing nodes
    ///
    /// # Errors
    ///
    /// - `InvalidArgument` if either endpoint id is missing or empty
    /// - `NotFound("Source node not found")` if the source does not exist,
    ///   reported ahead of a missing target
    /// - `NotFound("Target node not found")` otherwise, if the target does not exist
    pub async fn create_edge(&self, input: CreateEdgeInput) -> Result<Edge, ServiceError> {
        let (source, target) = input.endpoints()?;

        let source_exists = self.db.db_node_exists(source).await?;
        let target_exists = self.db.db_node_exists(target).await?;
        if !source_exists {
            warn!("Edge rejected: source node {} not found", source);
            return Err(ServiceError::not_found("Source node not found"));
        }
        if !target_exists {
            warn!("Edge rejected: target node {} not found", target);
            return Err(ServiceError::not_found("Target node not found"));
        }

        let id = self.allocate_id().await?;
        let edge = input.into_edge(id, self.clock.now())?;

        let created_at = format_timestamp(&edge.created_at);
        self.db
            .db_create_edge(DbCreateEdgeParams {
                id: &edge.id,
                edge_type: &edge.edge_type,
                weight: edge.weight,
                label: &edge.label,
                source_node_id: &edge.source_node_id,
                target_node_id: &edge.target_node_id,
                created_at: &created_at,
            })
            .await?;

        info!(
            "Created edge {} ({} -> {})",
            edge.id, edge.source_node_id, edge.target_node_id
        );
        Ok(edge)
    }

    /// Fetch an edge by id
    ///
    /// Succeeds even when an endpoint node has since been deleted.
    pub async fn get_edge(&self, id: &str) -> Result<Edge, ServiceError> {
        match self.db.db_get_edge(id).await? {
            Some(row) => Ok(row_to_edge(&row)?),
            None => {
                warn!("Edge {} not found", id);
                Err(ServiceError::edge_not_found())
            }
        }
    }

    /// Merge-patch an edge's type, weight and label
    pub async fn update_edge(&self, id: &str, update: EdgeUpdate) -> Result<Edge, ServiceError> {
        let current = self.get_edge(id).await?;
        let merged = update.apply_to(current);

        let affected = self
            .db
            .db_update_edge(&merged.id, &merged.edge_type, merged.weight, &merged.label)
            .await?;

        if affected == 0 {
            warn!("Edge {} disappeared during update", id);
            return Err(ServiceError::edge_not_found());
        }

        debug!("Updated edge {}", id);
        Ok(merged)
    }

    /// Permanently delete an edge
    pub async fn delete_edge(&self, id: &str) -> Result<DeleteResult, ServiceError> {
        if !self.db.db_edge_exists(id).await? {
            warn!("Edge {} not found for delete", id);
            return Err(ServiceError::edge_not_found());
        }

        self.db.db_delete_edge(id).await?;

        info!("Deleted edge {}", id);
        Ok(DeleteResult::deleted())
    }

    /// Every edge, newest first
    pub async fn list_edges(&self) -> Result<EdgeList, ServiceError> {
        let mut rows = self.db.db_list_edges().await?;
        let mut edges = Vec::new();
        while let Some(row) = rows
            .next()
            .await
            .map_err(|e| DatabaseError::sql_execution(format!("Failed to read edge row: {}", e)))?
        {
            edges.push(row_to_edge(&row)?);
        }

        debug!("Listed {} edges", edges.len());
        Ok(EdgeList { edges })
    }

    async fn allocate_id(&self) -> Result<String, ServiceError> {
        for _ in 0..MAX_ID_ATTEMPTS {
            let id = self.ids.generate();
            if !self.db.db_edge_exists(&id).await? {
                return Ok(id);
            }
            warn!("Generated edge id {} already in use, retrying", id);
        }

        Err(ServiceError::IdGenerationFailed {
            attempts: MAX_ID_ATTEMPTS,
        })
    }
}

/// Convert a row selected with [`crate::db::EDGE_COLUMNS`] into an Edge
fn row_to_edge(row: &Row) -> Result<Edge, DatabaseError> {
    let get_text = |idx: i32, name: &str| -> Result<String, DatabaseError> {
        row.get::<String>(idx)
            .map_err(|e| DatabaseError::row_decode(format!("edges.{}: {}", name, e)))
    };

    let weight = row
        .get::<f64>(2)
        .map_err(|e| DatabaseError::row_decode(format!("edges.weight: {}", e)))?;

    let created_raw = get_text(6, "created_at")?;
    let created_at = parse_timestamp(&created_raw).ok_or_else(|| {
        DatabaseError::row_decode(format!(
            "edges.created_at: unparseable timestamp '{}'",
            created_raw
        ))
    })?;

    Ok(Edge {
        id: get_text(0, "id")?,
        edge_type: get_text(1, "type")?,
        weight,
        label: get_text(3, "label")?,
        source_node_id: get_text(4, "source_node_id")?,
        target_node_id: get_text(5, "target_node_id")?,
        created_at,
    })
}
