//! Small response payloads shared by both stores

use serde::{Deserialize, Serialize};

/// Result of a delete operation
///
/// Deleting a missing entity is an error, so a returned value always has
/// `success: true`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteResult {
    pub success: bool,
}

impl DeleteResult {
    pub fn deleted() -> Self {
        Self { success: true }
    }
}
