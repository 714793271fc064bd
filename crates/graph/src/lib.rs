//! # Docgraph Graph
//!
//! Persistent relationship graph over documents, chunks and the legal
//! structure they cite, used to widen vector-search hits with structurally
//! adjacent text.
//!
//! ## Features
//!
//! - **Relationship store** - documents contain chunks, chunks precede chunks,
//!   chunks reference section/chapter entities
//! - **Entity extraction** - `section <n>` and `chapter <roman|n>` citations
//!   become shared singleton nodes
//! - **Context expansion** - bounded BFS from seed chunks, ordered by distance
//! - **Structure reports** - per-document outlines and graph statistics
//!
//! ## Architecture
//!
//! ```text
//! Chunk[] (docgraph-text-chunker)
//!     │
//!     ├──> Graph Builder
//!     │      ├─ document node + chunk nodes
//!     │      ├─ contains / precedes edges
//!     │      └─ section / chapter references
//!     │
//!     ├──> Graph Store (RwLock<RelationGraph>)
//!     │      ├─ adjacency + mirrored incoming index
//!     │      └─ node-link JSON rewritten on every mutation
//!     │
//!     └──> Readers
//!            ├─ Context Expander (seed ids -> related chunk ids)
//!            └─ Structure Reporter (outline, stats)
//! ```
//!
//! ## Example
//!
//! ```no_run
//! use docgraph_graph::{ExpandOptions, GraphStore};
//! use docgraph_text_chunker::{Chunker, Metadata};
//!
//! let store = GraphStore::open("data/graph_db/document_graph.json");
//! let chunks = Chunker::default()
//!     .chunk_text("Section 12 requires approval.", &Metadata::new(), "rules")
//!     .unwrap();
//! store.ingest_document("rules", &Metadata::new(), &chunks).unwrap();
//!
//! let related = store.expand(&["rules_chunk_0"], ExpandOptions::default());
//! println!("{related:?}");
//! ```

mod builder;
mod entities;
mod error;
mod expander;
mod graph;
mod persist;
mod report;
mod store;
mod types;

pub use builder::{document_chunks, BuildSummary, DeleteSummary, GraphBuilder};
pub use entities::{extract_entities, EntityKind, EntityRef};
pub use error::{GraphError, Result};
pub use expander::{
    ContextExpander, ExpandOptions, ExpandedChunk, DEFAULT_MAX_DEPTH, DEFAULT_MAX_RESULTS,
};
pub use graph::RelationGraph;
pub use persist::{load_graph, read_graph, save_graph, NodeLinkDocument};
pub use report::{ChunkOutline, DocumentStructure, EntityMention, GraphStats, StructureReporter};
pub use store::GraphStore;
pub use types::{GraphEdge, GraphNode, Neighbor, NodeType, Relation};
