//! Node Data Structures
//!
//! A node is one concept on the mind map: a title plus free-form description,
//! display color, a caller-defined type tag and a canvas position.
//!
//! # Examples
//!
//! ```rust
//! use mindmap_core::models::{CreateNodeInput, NodeUpdate};
//!
//! let input = CreateNodeInput {
//!     title: Some("Idea".to_string()),
//!     color: Some("#ffcc00".to_string()),
//!     x: Some(120.0),
//!     ..Default::default()
//! };
//!
//! // Only the title changes; everything else keeps its stored value
//! let update = NodeUpdate {
//!     title: Some("Better idea".to_string()),
//!     ..Default::default()
//! };
//! # let _ = (input, update);
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Validation errors for node and edge input
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Title is required and cannot be empty")]
    EmptyTitle,

    #[error("source_node_id and target_node_id are required")]
    MissingEndpoints,
}

/// A persisted mind map node.
///
/// # Fields
///
/// - `id`: Store-generated identifier, never reused
/// - `title`: Non-blank display title
/// - `description`, `color`, `node_type`: Empty string when unset
/// - `position_x`, `position_y`: Canvas coordinates, 0 when unset
/// - `created_at`: Set once on insert
/// - `updated_at`: Refreshed on every update
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub id: String,
    pub title: String,
    pub description: String,
    pub color: String,
    #[serde(rename = "type")]
    pub node_type: String,
    pub position_x: f64,
    pub position_y: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Request payload for creating a node
///
/// `title` is optional at the type level so that a missing title is reported
/// as a validation failure rather than a decode failure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateNodeInput {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default, rename = "type")]
    pub node_type: Option<String>,
    #[serde(default)]
    pub x: Option<f64>,
    #[serde(default)]
    pub y: Option<f64>,
}

impl CreateNodeInput {
    /// Check the title and return it on success
    pub fn validated_title(&self) -> Result<&str, ValidationError> {
        validate_title(self.title.as_deref())
    }

    /// Build the node to insert, filling absent fields with their defaults
    pub fn into_node(self, id: String, now: DateTime<Utc>) -> Result<Node, ValidationError> {
        validate_title(self.title.as_deref())?;

        Ok(Node {
            id,
            title: self.title.unwrap_or_default(),
            description: self.description.unwrap_or_default(),
            color: self.color.unwrap_or_default(),
            node_type: self.node_type.unwrap_or_default(),
            position_x: self.x.unwrap_or(0.0),
            position_y: self.y.unwrap_or(0.0),
            created_at: now,
            updated_at: now,
        })
    }
}

/// Partial node update
///
/// Every field is optional. `None` (omitted or JSON `null`) keeps the stored
/// value; `Some` overwrites it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NodeUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub node_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y: Option<f64>,
}

impl NodeUpdate {
    /// Reject a supplied title that is blank; an omitted title is fine
    pub fn validate(&self) -> Result<(), ValidationError> {
        match self.title.as_deref() {
            Some(title) => validate_title(Some(title)).map(|_| ()),
            None => Ok(()),
        }
    }

    /// Merge this update over the current node
    ///
    /// `id` and `created_at` are carried through; `updated_at` becomes `now`
    /// whether or not any field changed.
    pub fn apply_to(self, current: Node, now: DateTime<Utc>) -> Node {
        Node {
            id: current.id,
            title: self.title.unwrap_or(current.title),
            description: self.description.unwrap_or(current.description),
            color: self.color.unwrap_or(current.color),
            node_type: self.node_type.unwrap_or(current.node_type),
            position_x: self.x.unwrap_or(current.position_x),
            position_y: self.y.unwrap_or(current.position_y),
            created_at: current.created_at,
            updated_at: now,
        }
    }
}

/// One page of nodes plus the total number stored
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeList {
    pub nodes: Vec<Node>,
    pub total: i64,
}

/// Page size used when the caller gives none
pub const DEFAULT_LIST_LIMIT: i64 = 10;

/// Largest page a single list call returns
pub const MAX_LIST_LIMIT: i64 = 1000;

/// Pagination parameters for listing nodes
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListNodesQuery {
    #[serde(default)]
    pub limit: Option<i64>,
    #[serde(default)]
    pub offset: Option<i64>,
}

impl ListNodesQuery {
    pub fn new(limit: i64, offset: i64) -> Self {
        Self {
            limit: Some(limit),
            offset: Some(offset),
        }
    }

    /// Resolve to the `(limit, offset)` actually bound into the query
    ///
    /// Limit is clamped into `0..=MAX_LIST_LIMIT`; a negative offset counts
    /// from the start.
    pub fn page(&self) -> (i64, i64) {
        let limit = self
            .limit
            .unwrap_or(DEFAULT_LIST_LIMIT)
            .clamp(0, MAX_LIST_LIMIT);
        let offset = self.offset.unwrap_or(0).max(0);
        (limit, offset)
    }
}

fn validate_title(title: Option<&str>) -> Result<&str, ValidationError> {
    match title {
        Some(t) if !t.trim().is_empty() => Ok(t),
        _ => Err(ValidationError::EmptyTitle),
    }
}
