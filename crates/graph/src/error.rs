use crate::types::NodeType;
use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, GraphError>;

#[derive(Error, Debug)]
pub enum GraphError {
    #[error("Failed to persist graph to {}: {source}", .path.display())]
    Persist {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Node not found: {0}")]
    NodeNotFound(String),

    #[error("Node {id} is a {found} node, expected {expected}")]
    NodeTypeConflict {
        id: String,
        expected: NodeType,
        found: NodeType,
    },

    #[error("Chunk id {chunk_id} already belongs to document {owner}")]
    ChunkIdConflict { chunk_id: String, owner: String },

    #[error("Invalid chunk {chunk_id}: {reason}")]
    InvalidChunk { chunk_id: String, reason: String },

    #[error("Empty document id")]
    EmptyDocumentId,
}
