//! Service Layer Error Types
//!
//! This module defines error types for service-layer operations. Only two
//! kinds are raised on purpose, `InvalidArgument` and `NotFound`; everything
//! else is an internal failure surfaced from the database layer.

use crate::db::DatabaseError;
use crate::models::ValidationError;
use thiserror::Error;

/// Service operation errors
#[derive(Error, Debug)]
pub enum ServiceError {
    /// Missing or empty required input
    #[error("{0}")]
    InvalidArgument(String),

    /// Referenced entity does not exist
    #[error("{0}")]
    NotFound(String),

    /// Database operation failed
    #[error("Database operation failed: {0}")]
    DatabaseError(#[from] DatabaseError),

    /// Every freshly generated id was already taken
    #[error("Could not allocate a unique id after {attempts} attempts")]
    IdGenerationFailed { attempts: usize },
}

impl ServiceError {
    /// Create an invalid argument error
    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }

    /// Create a not found error
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    /// Node lookup miss
    pub fn node_not_found() -> Self {
        Self::not_found("Node not found")
    }

    /// Edge lookup miss
    pub fn edge_not_found() -> Self {
        Self::not_found("Edge not found")
    }

    /// True for errors caused by the caller's input rather than the system
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::InvalidArgument(_) | Self::NotFound(_))
    }
}

impl From<ValidationError> for ServiceError {
    fn from(err: ValidationError) -> Self {
        Self::InvalidArgument(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_errors_become_invalid_argument() {
        let err: ServiceError = ValidationError::EmptyTitle.into();
        assert!(matches!(err, ServiceError::InvalidArgument(_)));
        assert_eq!(err.to_string(), "Title is required and cannot be empty");

        let err: ServiceError = ValidationError::MissingEndpoints.into();
        assert_eq!(
            err.to_string(),
            "source_node_id and target_node_id are required"
        );
    }

    #[test]
    fn test_not_found_messages() {
        assert_eq!(ServiceError::node_not_found().to_string(), "Node not found");
        assert_eq!(ServiceError::edge_not_found().to_string(), "Edge not found");
    }

    #[test]
    fn test_client_error_classification() {
        assert!(ServiceError::invalid_argument("x").is_client_error());
        assert!(ServiceError::node_not_found().is_client_error());
        assert!(!ServiceError::from(DatabaseError::sql_execution("boom")).is_client_error());
        assert!(!ServiceError::IdGenerationFailed { attempts: 3 }.is_client_error());
    }
}
