//! Edge Data Structures
//!
//! An edge is a directed relation from one node to another, carrying an
//! optional type tag, numeric weight and display label. Endpoints are fixed at
//! creation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::node::ValidationError;

/// A persisted relation between two nodes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    pub id: String,
    #[serde(rename = "type")]
    pub edge_type: String,
    pub weight: f64,
    pub label: String,
    pub source_node_id: String,
    pub target_node_id: String,
    pub created_at: DateTime<Utc>,
}

/// Request payload for creating an edge
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateEdgeInput {
    #[serde(default)]
    pub source_node_id: Option<String>,
    #[serde(default)]
    pub target_node_id: Option<String>,
    #[serde(default, rename = "type")]
    pub edge_type: Option<String>,
    #[serde(default)]
    pub weight: Option<f64>,
    #[serde(default)]
    pub label: Option<String>,
}

impl CreateEdgeInput {
    /// Return `(source, target)` when both are present and non-empty
    pub fn endpoints(&self) -> Result<(&str, &str), ValidationError> {
        match (self.source_node_id.as_deref(), self.target_node_id.as_deref()) {
            (Some(source), Some(target)) if !source.is_empty() && !target.is_empty() => {
                Ok((source, target))
            }
            _ => Err(ValidationError::MissingEndpoints),
        }
    }

    /// Build the edge to insert, filling absent attributes with defaults
    pub fn into_edge(self, id: String, now: DateTime<Utc>) -> Result<Edge, ValidationError> {
        self.endpoints()?;

        Ok(Edge {
            id,
            edge_type: self.edge_type.unwrap_or_default(),
            weight: self.weight.unwrap_or(0.0),
            label: self.label.unwrap_or_default(),
            source_node_id: self.source_node_id.unwrap_or_default(),
            target_node_id: self.target_node_id.unwrap_or_default(),
            created_at: now,
        })
    }
}

/// Partial edge update
///
/// Endpoints are deliberately absent: an edge never moves. Unknown fields in
/// a request body (including `source_node_id`) are ignored by serde.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EdgeUpdate {
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub edge_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

impl EdgeUpdate {
    /// Merge this update over the current edge
    pub fn apply_to(self, current: Edge) -> Edge {
        Edge {
            edge_type: self.edge_type.unwrap_or(current.edge_type),
            weight: self.weight.unwrap_or(current.weight),
            label: self.label.unwrap_or(current.label),
            ..current
        }
    }
}

/// Every stored edge, newest first
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EdgeList {
    pub edges: Vec<Edge>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn input(source: Option<&str>, target: Option<&str>) -> CreateEdgeInput {
        CreateEdgeInput {
            source_node_id: source.map(str::to_string),
            target_node_id: target.map(str::to_string),
            ..Default::default()
        }
    }

    #[test]
    fn test_endpoints_required() {
        assert!(input(Some("a"), Some("b")).endpoints().is_ok());
        assert_eq!(
            input(None, Some("b")).endpoints(),
            Err(ValidationError::MissingEndpoints)
        );
        assert_eq!(
            input(Some("a"), Some("")).endpoints(),
            Err(ValidationError::MissingEndpoints)
        );
        assert_eq!(
            input(None, None).endpoints(),
            Err(ValidationError::MissingEndpoints)
        );
    }

    #[test]
    fn test_into_edge_defaults() {
        let now = Utc::now();
        let edge = input(Some("a"), Some("b"))
            .into_edge("e1".to_string(), now)
            .unwrap();

        assert_eq!(edge.edge_type, "");
        assert_eq!(edge.weight, 0.0);
        assert_eq!(edge.label, "");
        assert_eq!(edge.source_node_id, "a");
        assert_eq!(edge.target_node_id, "b");
        assert_eq!(edge.created_at, now);
    }

    #[test]
    fn test_apply_keeps_endpoints() {
        let current = input(Some("a"), Some("b"))
            .into_edge("e1".to_string(), Utc::now())
            .unwrap();

        let merged = EdgeUpdate {
            weight: Some(0.25),
            ..Default::default()
        }
        .apply_to(current.clone());

        assert_eq!(merged.weight, 0.25);
        assert_eq!(merged.edge_type, current.edge_type);
        assert_eq!(merged.label, current.label);
        assert_eq!(merged.source_node_id, "a");
        assert_eq!(merged.target_node_id, "b");
        assert_eq!(merged.created_at, current.created_at);
    }

    #[test]
    fn test_update_ignores_endpoint_fields() {
        let update: EdgeUpdate = serde_json::from_value(json!({
            "label": "causes",
            "source_node_id": "elsewhere"
        }))
        .unwrap();
        assert_eq!(update.label.as_deref(), Some("causes"));
        assert!(update.edge_type.is_none());
        assert!(update.weight.is_none());
    }
}
