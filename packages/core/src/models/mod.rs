//! Data Models
//!
//! This module contains the data structures shared by the services and the
//! HTTP layer:
//!
//! - `Node` - A concept on the map, with create/update/list payloads
//! - `Edge` - A directed, weighted relation between two nodes
//! - `DeleteResult` - Acknowledgement returned by both delete operations
//! - `time` - Clock abstraction and the timestamp storage format

mod edge;
mod node;
mod response;
pub mod time;

pub use edge::{CreateEdgeInput, Edge, EdgeList, EdgeUpdate};
pub use node::{
    CreateNodeInput, ListNodesQuery, Node, NodeList, NodeUpdate, ValidationError,
    DEFAULT_LIST_LIMIT, MAX_LIST_LIMIT,
};
pub use response::DeleteResult;
