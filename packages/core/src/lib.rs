//! Mindmap Core Data-Access Layer
//!
//! This crate stores mind map nodes and the edges between them in an embedded
//! libsql database and implements the validation and update rules around
//! them.
//!
//! # Architecture
//!
//! - **Two stores, one database**: `nodes` and `edges` tables, no foreign keys
//! - **Store-assigned ids**: short URL-safe random tokens, never client supplied
//! - **Merge-patch updates**: omitted fields keep their stored value
//! - **Application-level integrity**: edge endpoints are checked at creation only
//!
//! # Modules
//!
//! - [`models`] - Data structures (Node, Edge, request payloads)
//! - [`services`] - Business services (NodeService, EdgeService)
//! - [`db`] - Database layer with libsql integration

pub mod db;
pub mod models;
pub mod services;

// Re-export commonly used types
pub use db::{DatabaseError, DatabaseService};
pub use models::*;
pub use services::*;
