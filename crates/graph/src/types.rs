use docgraph_text_chunker::Metadata;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Node kinds stored in the relationship graph
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeType {
    Document,
    Chunk,
    Section,
    Chapter,
}

impl NodeType {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Document => "document",
            Self::Chunk => "chunk",
            Self::Section => "section",
            Self::Chapter => "chapter",
        }
    }

    /// Structural entity (section or chapter numeral)
    #[must_use]
    pub const fn is_entity(self) -> bool {
        matches!(self, Self::Section | Self::Chapter)
    }
}

impl fmt::Display for NodeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Edge label
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Relation {
    /// document -> chunk
    Contains,
    /// chunk -> next chunk
    Precedes,
    /// chunk -> structural entity
    References,
}

impl Relation {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Contains => "contains",
            Self::Precedes => "precedes",
            Self::References => "references",
        }
    }
}

/// Type-tagged node record.
///
/// Serializes as a flat node-link entry: `{"id", "node_type", ...attrs}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphNode {
    pub id: String,
    pub node_type: NodeType,
    #[serde(flatten)]
    pub attrs: Metadata,
}

impl GraphNode {
    #[must_use]
    pub fn attr_str(&self, key: &str) -> Option<&str> {
        self.attrs.get(key).and_then(serde_json::Value::as_str)
    }

    #[must_use]
    pub fn attr_usize(&self, key: &str) -> Option<usize> {
        self.attrs
            .get(key)
            .and_then(serde_json::Value::as_u64)
            .and_then(|n| usize::try_from(n).ok())
    }
}

/// Directed, labelled edge as it appears in the node-link `links` list
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GraphEdge {
    pub source: String,
    pub target: String,
    pub relation: Relation,
}

/// Adjacency entry: the node on the other end of an edge and its label
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Neighbor {
    pub id: String,
    pub relation: Relation,
}
