//! Database Connection Management
//!
//! This module provides the database connection, schema initialization and
//! the raw SQL statements behind the node and edge services, using
//! libsql (embedded, SQLite-compatible).
//!
//! # Architecture
//!
//! - **Path-agnostic**: Accepts any valid PathBuf; parent directories are created
//! - **WAL mode**: Write-Ahead Logging so readers never block the writer
//! - **No foreign keys**: Edge endpoints are checked by `EdgeService`, not by SQLite
//! - **One statement per method**: `db_*` methods issue exactly one statement and
//!   return raw rows; services own validation and row conversion
//!
//! # Database Connection Patterns
//!
//! Use `connect_with_timeout()` in async code. It sets a 5-second busy
//! timeout so concurrent writers wait for the lock instead of failing with
//! `SQLITE_BUSY`.
//!
//! ```no_run
//! # use mindmap_core::db::DatabaseService;
//! # use std::path::PathBuf;
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let db_service = DatabaseService::new(PathBuf::from("./data/mindmap.db")).await?;
//! let conn = db_service.connect_with_timeout().await?;
//! # Ok(())
//! # }
//! ```

use crate::db::error::DatabaseError;
use libsql::{Builder, Database};
use std::path::PathBuf;
use std::sync::Arc;

/// Columns selected for every node read, in `row_to_node` order
pub const NODE_COLUMNS: &str =
    "id, title, description, color, type, position_x, position_y, created_at, updated_at";

/// Columns selected for every edge read, in `row_to_edge` order
pub const EDGE_COLUMNS: &str =
    "id, type, weight, label, source_node_id, target_node_id, created_at";

/// Database service for managing the libsql connection and schema
#[derive(Debug, Clone)]
pub struct DatabaseService {
    /// libsql database handle (wrapped in Arc for sharing)
    pub db: Arc<Database>,

    /// Path to the database file
    pub db_path: PathBuf,
}

/// Parameters for node insert and update (avoids too-many-arguments lint)
///
/// Timestamps are already rendered in the storage format.
pub struct DbNodeParams<'a> {
    pub id: &'a str,
    pub title: &'a str,
    pub description: &'a str,
    pub color: &'a str,
    pub node_type: &'a str,
    pub position_x: f64,
    pub position_y: f64,
    pub created_at: &'a str,
    pub updated_at: &'a str,
}

/// Parameters for edge insert
pub struct DbCreateEdgeParams<'a> {
    pub id: &'a str,
    pub edge_type: &'a str,
    pub weight: f64,
    pub label: &'a str,
    pub source_node_id: &'a str,
    pub target_node_id: &'a str,
    pub created_at: &'a str,
}

impl DatabaseService {
    /// Create a new DatabaseService with the specified database path
    ///
    /// This will:
    /// 1. Ensure the parent directory exists (create if needed)
    /// 2. Open/create the database file
    /// 3. Initialize the schema (CREATE TABLE IF NOT EXISTS)
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the parent directory cannot be created, the
    /// connection fails, or schema initialization fails.
    pub async fn new(db_path: PathBuf) -> Result<Self, DatabaseError> {
        if let Some(parent) = db_path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent).map_err(|e| {
                    if e.kind() == std::io::ErrorKind::PermissionDenied {
                        DatabaseError::permission_denied(db_path.clone())
                    } else {
                        DatabaseError::DirectoryCreationFailed(e)
                    }
                })?;
            }
        }

        let db = Builder::new_local(&db_path)
            .build()
            .await
            .map_err(|e| DatabaseError::connection_failed(db_path.clone(), e))?;

        let service = Self {
            db: Arc::new(db),
            db_path,
        };

        service.initialize_schema().await?;

        tracing::debug!("Database ready at {}", service.db_path.display());

        Ok(service)
    }

    /// Execute a PRAGMA statement
    ///
    /// PRAGMA statements return rows, so they go through query() rather than
    /// execute().
    async fn execute_pragma(
        &self,
        conn: &libsql::Connection,
        pragma: &str,
    ) -> Result<(), DatabaseError> {
        let mut stmt = conn.prepare(pragma).await.map_err(|e| {
            DatabaseError::sql_execution(format!("Failed to execute '{}': {}", pragma, e))
        })?;
        let _ = stmt.query(()).await.map_err(|e| {
            DatabaseError::sql_execution(format!("Failed to execute '{}': {}", pragma, e))
        })?;
        Ok(())
    }

    /// Initialize database schema and configuration
    ///
    /// Idempotent: every statement is `IF NOT EXISTS`, so reopening an
    /// existing file is safe.
    async fn initialize_schema(&self) -> Result<(), DatabaseError> {
        let conn = self.connect_with_timeout().await?;

        self.execute_pragma(&conn, "PRAGMA journal_mode = WAL")
            .await?;

        conn.execute(
            "CREATE TABLE IF NOT EXISTS nodes (
                id TEXT PRIMARY KEY,
                title TEXT NOT NULL,
                description TEXT NOT NULL DEFAULT '',
                color TEXT NOT NULL DEFAULT '',
                type TEXT NOT NULL DEFAULT '',
                position_x REAL NOT NULL DEFAULT 0,
                position_y REAL NOT NULL DEFAULT 0,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            )",
            (),
        )
        .await
        .map_err(|e| {
            DatabaseError::initialization_failed(format!("Failed to create nodes table: {}", e))
        })?;

        // Endpoints are plain TEXT: referential checks live in EdgeService
        conn.execute(
            "CREATE TABLE IF NOT EXISTS edges (
                id TEXT PRIMARY KEY,
                type TEXT NOT NULL DEFAULT '',
                weight REAL NOT NULL DEFAULT 0,
                label TEXT NOT NULL DEFAULT '',
                source_node_id TEXT NOT NULL,
                target_node_id TEXT NOT NULL,
                created_at TEXT NOT NULL
            )",
            (),
        )
        .await
        .map_err(|e| {
            DatabaseError::initialization_failed(format!("Failed to create edges table: {}", e))
        })?;

        self.create_indexes(&conn).await?;

        Ok(())
    }

    /// Create indexes backing the list ordering and endpoint lookups
    async fn create_indexes(&self, conn: &libsql::Connection) -> Result<(), DatabaseError> {
        let indexes = [
            (
                "idx_nodes_created",
                "CREATE INDEX IF NOT EXISTS idx_nodes_created ON nodes(created_at)",
            ),
            (
                "idx_edges_created",
                "CREATE INDEX IF NOT EXISTS idx_edges_created ON edges(created_at)",
            ),
            (
                "idx_edges_source",
                "CREATE INDEX IF NOT EXISTS idx_edges_source ON edges(source_node_id)",
            ),
            (
                "idx_edges_target",
                "CREATE INDEX IF NOT EXISTS idx_edges_target ON edges(target_node_id)",
            ),
        ];

        for (name, sql) in indexes {
            conn.execute(sql, ()).await.map_err(|e| {
                DatabaseError::initialization_failed(format!(
                    "Failed to create index '{}': {}",
                    name, e
                ))
            })?;
        }

        Ok(())
    }

    /// Get a synchronous connection to the database
    ///
    /// Only for single-threaded code that does not hold the connection across
    /// `.await` points; async callers should use `connect_with_timeout()`.
    pub fn connect(&self) -> Result<libsql::Connection, DatabaseError> {
        self.db.connect().map_err(DatabaseError::LibsqlError)
    }

    /// Get an async connection with busy timeout configured
    pub async fn connect_with_timeout(&self) -> Result<libsql::Connection, DatabaseError> {
        let conn = self.connect()?;

        self.execute_pragma(&conn, "PRAGMA busy_timeout = 5000")
            .await?;

        Ok(conn)
    }

    /// Flush the WAL into the main database file
    ///
    /// Called on shutdown so the `.db` file is self-contained afterwards.
    pub async fn checkpoint(&self) -> Result<(), DatabaseError> {
        let conn = self.connect_with_timeout().await?;
        self.execute_pragma(&conn, "PRAGMA wal_checkpoint(TRUNCATE)")
            .await
    }

    /// Run a single-row lookup and return the first row, if any
    async fn query_first(
        &self,
        sql: &str,
        id: &str,
        what: &str,
    ) -> Result<Option<libsql::Row>, DatabaseError> {
        let conn = self.connect_with_timeout().await?;

        let mut stmt = conn.prepare(sql).await.map_err(|e| {
            DatabaseError::sql_execution(format!("Failed to prepare {} query: {}", what, e))
        })?;

        let mut rows = stmt.query([id]).await.map_err(|e| {
            DatabaseError::sql_execution(format!("Failed to execute {} query: {}", what, e))
        })?;

        rows.next()
            .await
            .map_err(|e| DatabaseError::sql_execution(e.to_string()))
    }

    //
    // NODE OPERATIONS
    //

    /// Insert a node row
    pub async fn db_create_node(&self, params: DbNodeParams<'_>) -> Result<(), DatabaseError> {
        let conn = self.connect_with_timeout().await?;

        conn.execute(
            "INSERT INTO nodes (id, title, description, color, type, position_x, position_y, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)",
            libsql::params![
                params.id,
                params.title,
                params.description,
                params.color,
                params.node_type,
                params.position_x,
                params.position_y,
                params.created_at,
                params.updated_at,
            ],
        )
        .await
        .map_err(|e| DatabaseError::sql_execution(format!("Failed to insert node: {}", e)))?;

        Ok(())
    }

    /// Retrieve a single node row by ID
    ///
    /// * `Ok(Some(row))` - Node found, columns in [`NODE_COLUMNS`] order
    /// * `Ok(None)` - No such node
    pub async fn db_get_node(&self, id: &str) -> Result<Option<libsql::Row>, DatabaseError> {
        self.query_first(
            &format!("SELECT {} FROM nodes WHERE id = ?", NODE_COLUMNS),
            id,
            "get_node",
        )
        .await
    }

    /// Existence check used before edge inserts and id assignment
    pub async fn db_node_exists(&self, id: &str) -> Result<bool, DatabaseError> {
        Ok(self
            .query_first("SELECT id FROM nodes WHERE id = ?", id, "node_exists")
            .await?
            .is_some())
    }

    /// Overwrite every mutable column of a node
    ///
    /// `created_at` in `params` is ignored. Returns the number of rows
    /// affected (0 if the node vanished since it was read).
    pub async fn db_update_node(&self, params: DbNodeParams<'_>) -> Result<u64, DatabaseError> {
        let conn = self.connect_with_timeout().await?;

        conn.execute(
            "UPDATE nodes
             SET title = ?, description = ?, color = ?, type = ?, position_x = ?, position_y = ?, updated_at = ?
             WHERE id = ?",
            libsql::params![
                params.title,
                params.description,
                params.color,
                params.node_type,
                params.position_x,
                params.position_y,
                params.updated_at,
                params.id,
            ],
        )
        .await
        .map_err(|e| DatabaseError::sql_execution(format!("Failed to update node: {}", e)))
    }

    /// Delete a node row
    ///
    /// Edges referencing the node are left in place. Returns rows affected.
    pub async fn db_delete_node(&self, id: &str) -> Result<u64, DatabaseError> {
        let conn = self.connect_with_timeout().await?;

        conn.execute("DELETE FROM nodes WHERE id = ?", [id])
            .await
            .map_err(|e| DatabaseError::sql_execution(format!("Failed to delete node: {}", e)))
    }

    /// Total number of stored nodes
    pub async fn db_count_nodes(&self) -> Result<i64, DatabaseError> {
        let conn = self.connect_with_timeout().await?;

        let mut rows = conn
            .query("SELECT COUNT(*) FROM nodes", ())
            .await
            .map_err(|e| DatabaseError::sql_execution(format!("Failed to count nodes: {}", e)))?;

        match rows
            .next()
            .await
            .map_err(|e| DatabaseError::sql_execution(e.to_string()))?
        {
            Some(row) => row
                .get::<i64>(0)
                .map_err(|e| DatabaseError::row_decode(format!("COUNT(*): {}", e))),
            None => Ok(0),
        }
    }

    /// One page of nodes, newest first
    ///
    /// `limit` and `offset` are bound as given; callers clamp them.
    /// Insertion order (rowid) breaks ties between equal `created_at` values.
    pub async fn db_list_nodes(
        &self,
        limit: i64,
        offset: i64,
    ) -> Result<libsql::Rows, DatabaseError> {
        let conn = self.connect_with_timeout().await?;

        conn.query(
            &format!(
                "SELECT {} FROM nodes ORDER BY created_at DESC, rowid DESC LIMIT ? OFFSET ?",
                NODE_COLUMNS
            ),
            (limit, offset),
        )
        .await
        .map_err(|e| DatabaseError::sql_execution(format!("Failed to list nodes: {}", e)))
    }

    //
    // EDGE OPERATIONS
    //

    /// Insert an edge row
    pub async fn db_create_edge(
        &self,
        params: DbCreateEdgeParams<'_>,
    ) -> Result<(), DatabaseError> {
        let conn = self.connect_with_timeout().await?;

        conn.execute(
            "INSERT INTO edges (id, type, weight, label, source_node_id, target_node_id, created_at)
             VALUES (?, ?, ?, ?, ?, ?, ?)",
            libsql::params![
                params.id,
                params.edge_type,
                params.weight,
                params.label,
                params.source_node_id,
                params.target_node_id,
                params.created_at,
            ],
        )
        .await
        .map_err(|e| DatabaseError::sql_execution(format!("Failed to insert edge: {}", e)))?;

        Ok(())
    }

    /// Retrieve a single edge row by ID, columns in [`EDGE_COLUMNS`] order
    pub async fn db_get_edge(&self, id: &str) -> Result<Option<libsql::Row>, DatabaseError> {
        self.query_first(
            &format!("SELECT {} FROM edges WHERE id = ?", EDGE_COLUMNS),
            id,
            "get_edge",
        )
        .await
    }

    /// Existence check used for id assignment
    pub async fn db_edge_exists(&self, id: &str) -> Result<bool, DatabaseError> {
        Ok(self
            .query_first("SELECT id FROM edges WHERE id = ?", id, "edge_exists")
            .await?
            .is_some())
    }

    /// Overwrite an edge's descriptive attributes; endpoints are not touched
    pub async fn db_update_edge(
        &self,
        id: &str,
        edge_type: &str,
        weight: f64,
        label: &str,
    ) -> Result<u64, DatabaseError> {
        let conn = self.connect_with_timeout().await?;

        conn.execute(
            "UPDATE edges SET type = ?, weight = ?, label = ? WHERE id = ?",
            libsql::params![edge_type, weight, label, id],
        )
        .await
        .map_err(|e| DatabaseError::sql_execution(format!("Failed to update edge: {}", e)))
    }

    /// Delete an edge row; returns rows affected
    pub async fn db_delete_edge(&self, id: &str) -> Result<u64, DatabaseError> {
        let conn = self.connect_with_timeout().await?;

        conn.execute("DELETE FROM edges WHERE id = ?", [id])
            .await
            .map_err(|e| DatabaseError::sql_execution(format!("Failed to delete edge: {}", e)))
    }

    /// Every edge, newest first
    pub async fn db_list_edges(&self) -> Result<libsql::Rows, DatabaseError> {
        let conn = self.connect_with_timeout().await?;

        conn.query(
            &format!(
                "SELECT {} FROM edges ORDER BY created_at DESC, rowid DESC",
                EDGE_COLUMNS
            ),
            (),
        )
        .await
        .map_err(|e| DatabaseError::sql_execution(format!("Failed to list edges: {}", e)))
    }
}
