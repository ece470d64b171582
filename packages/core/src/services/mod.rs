//! Business Services
//!
//! This module contains the services behind the HTTP API:
//!
//! - `NodeService` - Node CRUD and paginated listing
//! - `EdgeService` - Edge CRUD, full listing and endpoint existence checks
//!
//! Services validate input before any write, apply merge-patch updates and
//! translate raw rows into models. They share one `DatabaseService` but never
//! call each other.

pub mod edge_service;
pub mod error;
pub mod node_service;

pub use edge_service::EdgeService;
pub use error::ServiceError;
pub use node_service::NodeService;

/// How many freshly generated ids are tried before giving up on an insert
pub const MAX_ID_ATTEMPTS: usize = 3;
