//! Node Service - Node CRUD and Listing
//!
//! Owns the `nodes` table. Validates input before any write, assigns ids,
//! stamps timestamps from the injected clock, and converts rows back into
//! [`Node`] values.
//!
//! # Examples
//!
//! ```rust,no_run
//! use mindmap_core::db::DatabaseService;
//! use mindmap_core::models::{CreateNodeInput, ListNodesQuery};
//! use mindmap_core::services::NodeService;
//! use std::path::PathBuf;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let db = Arc::new(DatabaseService::new(PathBuf::from("./data/mindmap.db")).await?);
//!     let service = NodeService::new(db);
//!
//!     let node = service
//!         .create_node(CreateNodeInput {
//!             title: Some("Idea".to_string()),
//!             ..Default::default()
//!         })
//!         .await?;
//!
//!     let page = service.list_nodes(ListNodesQuery::default()).await?;
//!     println!("{} of {} nodes, newest is {}", page.nodes.len(), page.total, node.id);
//!     Ok(())
//! }
//! ```

use crate::db::{DatabaseError, DatabaseService, DbNodeParams, IdGenerator, RandomIdGenerator};
use crate::models::time::{format_timestamp, parse_timestamp, SystemTimeProvider, TimeProvider};
use crate::models::{CreateNodeInput, DeleteResult, ListNodesQuery, Node, NodeList, NodeUpdate};
use crate::services::{ServiceError, MAX_ID_ATTEMPTS};
use chrono::{DateTime, Utc};
use libsql::Row;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Node CRUD service
#[derive(Clone)]
pub struct NodeService {
    db: Arc<DatabaseService>,
    clock: Arc<dyn TimeProvider>,
    ids: Arc<dyn IdGenerator>,
}

impl NodeService {
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

    /// Create a node
    ///
    /// # Errors
    ///
    /// - `InvalidArgument` if the title is missing or blank (nothing is written)
    /// - `IdGenerationFailed` if no unused id could be drawn
    pub async fn create_node(&self, input: CreateNodeInput) -> Result<Node, ServiceError> {
        input.validated_title()?;

        let id = self.allocate_id().await?;
        let node = input.into_node(id, self.clock.now())?;

        let created_at = format_timestamp(&node.created_at);
        let updated_at = format_timestamp(&node.updated_at);
        self.db
            .db_create_node(node_params(&node, &created_at, &updated_at))
            .await?;

        info!("Created node {}", node.id);
        Ok(node)
    }

    /// Fetch a node by id
    pub async fn get_node(&self, id: &str) -> Result<Node, ServiceError> {
        match self.db.db_get_node(id).await? {
            Some(row) => Ok(row_to_node(&row)?),
            None => {
                warn!("Node {} not found", id);
                Err(ServiceError::node_not_found())
            }
        }
    }

    /// Merge-patch a node
    ///
    /// Omitted fields keep their stored value and `updated_at` is always
    /// refreshed. A supplied blank title is rejected before anything is read.
    pub async fn update_node(&self, id: &str, update: NodeUpdate) -> Result<Node, ServiceError> {
        update.validate()?;

        let current = self.get_node(id).await?;
        let merged = update.apply_to(current, self.clock.now());

        let created_at = format_timestamp(&merged.created_at);
        let updated_at = format_timestamp(&merged.updated_at);
        let affected = self
            .db
            .db_update_node(node_params(&merged, &created_at, &updated_at))
            .await?;

        // Deleted between the read and the write
        if affected == 0 {
            warn!("Node {} disappeared during update", id);
            return Err(ServiceError::node_not_found());
        }

        debug!("Updated node {}", id);
        Ok(merged)
    }

    /// Permanently delete a node
    ///
    /// Edges that reference the node are not touched.
    pub async fn delete_node(&self, id: &str) -> Result<DeleteResult, ServiceError> {
        if !self.db.db_node_exists(id).await? {
            warn!("Node {} not found for delete", id);
            return Err(ServiceError::node_not_found());
        }

        self.db.db_delete_node(id).await?;

        info!("Deleted node {}", id);
        Ok(DeleteResult::deleted())
    }

    /// List one page of nodes, newest first, with the overall count
    pub async fn list_nodes(&self, query: ListNodesQuery) -> Result<NodeList, ServiceError> {
        let (limit, offset) = query.page();

        let total = self.db.db_count_nodes().await?;

        let mut rows = self.db.db_list_nodes(limit, offset).await?;
        let mut nodes = Vec::new();
        while let Some(row) = rows
            .next()
            .await
            .map_err(|e| DatabaseError::sql_execution(format!("Failed to read node row: {}", e)))?
        {
            nodes.push(row_to_node(&row)?);
        }

        debug!(
            "Listed {} nodes (limit {}, offset {}, total {})",
            nodes.len(),
            limit,
            offset,
            total
        );
        Ok(NodeList { nodes, total })
    }

    /// Draw ids until one is not already used by a node
    async fn allocate_id(&self) -> Result<String, ServiceError> {
        for _ in 0..MAX_ID_ATTEMPTS {
            let id = self.ids.generate();
            if !self.db.db_node_exists(&id).await? {
                return Ok(id);
            }
            warn!("Generated node id {} already in use, retrying", id);
        }

        Err(ServiceError::IdGenerationFailed {
            attempts: MAX_ID_ATTEMPTS,
        })
    }
}

fn node_params<'a>(node: &'a Node, created_at: &'a str, updated_at: &'a str) -> DbNodeParams<'a> {
    DbNodeParams {
        id: &node.id,
        title: &node.title,
        description: &node.description,
        color: &node.color,
        node_type: &node.node_type,
        position_x: node.position_x,
        position_y: node.position_y,
        created_at,
        updated_at,
    }
}

/// Convert a row selected with [`crate::db::NODE_COLUMNS`] into a Node
fn row_to_node(row: &Row) -> Result<Node, DatabaseError> {
    let get_text = |idx: i32, name: &str| -> Result<String, DatabaseError> {
        row.get::<String>(idx)
            .map_err(|e| DatabaseError::row_decode(format!("nodes.{}: {}", name, e)))
    };
    let get_real = |idx: i32, name: &str| -> Result<f64, DatabaseError> {
        row.get::<f64>(idx)
            .map_err(|e| DatabaseError::row_decode(format!("nodes.{}: {}", name, e)))
    };
    let get_time = |idx: i32, name: &str| -> Result<DateTime<Utc>, DatabaseError> {
        let raw = get_text(idx, name)?;
        parse_timestamp(&raw).ok_or_else(|| {
            DatabaseError::row_decode(format!("nodes.{}: unparseable timestamp '{}'", name, raw))
        })
    };

    Ok(Node {
        id: get_text(0, "id")?,
        title: get_text(1, "title")?,
        description: get_text(2, "description")?,
        color: get_text(3, "color")?,
        node_type: get_text(4, "type")?,
        position_x: get_real(5, "position_x")?,
        position_y: get_real(6, "position_y")?,
        created_at: get_time(7, "created_at")?,
        updated_at: get_time(8, "updated_at")?,
    })
}
