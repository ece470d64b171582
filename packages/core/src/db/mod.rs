//! Database Layer
//!
//! This module handles all database interactions using libsql:
//!
//! - Database initialization and connection management
//! - One `db_*` method per SQL statement for the `nodes` and `edges` tables
//! - Entity id generation
//!
//! Validation, merge-patch updates and row-to-model conversion live in the
//! service layer; nothing here knows about business rules.

mod database;
mod error;
pub mod id;

pub use database::{
    DatabaseService, DbCreateEdgeParams, DbNodeParams, EDGE_COLUMNS, NODE_COLUMNS,
};
pub use error::DatabaseError;
pub use id::{generate_id, IdGenerator, RandomIdGenerator};
