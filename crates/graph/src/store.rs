use crate::builder::{BuildSummary, DeleteSummary, GraphBuilder};
use crate::error::Result;
use crate::expander::{ContextExpander, ExpandOptions, ExpandedChunk};
use crate::graph::RelationGraph;
use crate::persist::{load_graph, save_graph};
use crate::report::{DocumentStructure, GraphStats, StructureReporter};
use crate::types::{NodeType, Relation};
use docgraph_text_chunker::{Chunk, Metadata};
use parking_lot::RwLock;
use std::path::{Path, PathBuf};

/// Durable relationship graph shared by ingestion and query paths.
///
/// Mutations (ingest, delete, clear and the raw node/edge calls) hold the
/// write lock across both the change and the file rewrite, so readers never
/// observe a half-built document. Queries share the read lock.
///
/// When the rewrite fails the error is returned but the in-memory change is
/// kept; the next successful write brings the file back in line.
pub struct GraphStore {
    path: PathBuf,
    graph: RwLock<RelationGraph>,
    builder: GraphBuilder,
}

impl GraphStore {
    /// Open the store, loading `path` if it holds a readable graph.
    ///
    /// A missing or malformed file yields an empty graph (logged).
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let graph = load_graph(&path);
        Self {
            path,
            graph: RwLock::new(graph),
            builder: GraphBuilder::new(),
        }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Run a read-only closure against the current graph
    pub fn with_graph<R>(&self, f: impl FnOnce(&RelationGraph) -> R) -> R {
        f(&self.graph.read())
    }

    /// Owned copy of the current graph
    #[must_use]
    pub fn snapshot(&self) -> RelationGraph {
        self.graph.read().clone()
    }

    /// Rewrite the graph file from the current in-memory state
    pub fn flush(&self) -> Result<()> {
        let graph = self.graph.write();
        save_graph(&self.path, &graph)
    }

    // Mutations

    pub fn upsert_node(&self, id: &str, node_type: NodeType, attrs: Metadata) -> Result<bool> {
        let mut graph = self.graph.write();
        let created = graph.upsert_node(id, node_type, attrs)?;
        save_graph(&self.path, &graph)?;
        Ok(created)
    }

    pub fn add_edge(&self, source: &str, target: &str, relation: Relation) -> Result<bool> {
        let mut graph = self.graph.write();
        let added = graph.add_edge(source, target, relation)?;
        if added {
            save_graph(&self.path, &graph)?;
        }
        Ok(added)
    }

    pub fn remove_node(&self, id: &str) -> Result<bool> {
        let mut graph = self.graph.write();
        let removed = graph.remove_node(id);
        if removed {
            save_graph(&self.path, &graph)?;
        }
        Ok(removed)
    }

    /// Write a document's ordered chunks into the graph and persist
    pub fn ingest_document(
        &self,
        doc_id: &str,
        metadata: &Metadata,
        chunks: &[Chunk],
    ) -> Result<BuildSummary> {
        let mut graph = self.graph.write();
        let summary = self.builder.build(&mut graph, doc_id, metadata, chunks)?;
        save_graph(&self.path, &graph)?;
        Ok(summary)
    }

    /// Remove a document and its chunks; unknown ids are a no-op
    pub fn delete_document(&self, doc_id: &str) -> Result<DeleteSummary> {
        let mut graph = self.graph.write();
        let summary = self.builder.remove_document(&mut graph, doc_id);
        if summary.removed_nodes > 0 {
            save_graph(&self.path, &graph)?;
        } else {
            log::debug!("Delete of unknown document {doc_id} ignored");
        }
        Ok(summary)
    }

    /// Drop every node and edge
    pub fn clear(&self) -> Result<()> {
        let mut graph = self.graph.write();
        graph.clear();
        save_graph(&self.path, &graph)?;
        log::info!("Graph cleared");
        Ok(())
    }

    // Queries

    #[must_use]
    pub fn has_node(&self, id: &str) -> bool {
        self.graph.read().has_node(id)
    }

    #[must_use]
    pub fn has_edge(&self, source: &str, target: &str, relation: Relation) -> bool {
        self.graph.read().has_edge(source, target, relation)
    }

    #[must_use]
    pub fn reachable_within(&self, start: &str, max_hops: usize) -> Vec<(String, usize)> {
        self.graph.read().reachable_within(start, max_hops)
    }

    #[must_use]
    pub fn node_count(&self) -> usize {
        self.graph.read().node_count()
    }

    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.graph.read().edge_count()
    }

    #[must_use]
    pub fn expand<S: AsRef<str>>(&self, seeds: &[S], options: ExpandOptions) -> Vec<String> {
        let graph = self.graph.read();
        ContextExpander::new(&graph).expand(seeds, options)
    }

    #[must_use]
    pub fn expand_detailed<S: AsRef<str>>(
        &self,
        seeds: &[S],
        options: ExpandOptions,
    ) -> Vec<ExpandedChunk> {
        let graph = self.graph.read();
        ContextExpander::new(&graph).expand_detailed(seeds, options)
    }

    #[must_use]
    pub fn cross_references(&self, chunk_id: &str) -> Vec<String> {
        let graph = self.graph.read();
        ContextExpander::new(&graph).cross_references(chunk_id)
    }

    #[must_use]
    pub fn document_structure(&self, doc_id: &str) -> Option<DocumentStructure> {
        let graph = self.graph.read();
        StructureReporter::new(&graph).document_structure(doc_id)
    }

    #[must_use]
    pub fn stats(&self) -> GraphStats {
        let graph = self.graph.read();
        StructureReporter::new(&graph).stats()
    }
}
