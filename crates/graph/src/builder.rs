use crate::entities::{extract_entities, EntityRef};
use crate::error::{GraphError, Result};
use crate::graph::RelationGraph;
use crate::types::{NodeType, Relation};
use docgraph_text_chunker::{Chunk, Metadata};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Counts reported after building a document into the graph
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildSummary {
    pub doc_id: String,
    pub chunks: usize,
    /// `references` edges added
    pub references: usize,
    /// Entity nodes created by this build
    pub new_entities: usize,
    /// Chunk nodes of a previous ingestion that were dropped first
    pub replaced_chunks: usize,
}

/// Counts reported after removing a document
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteSummary {
    pub doc_id: String,
    pub removed_nodes: usize,
    pub removed_edges: usize,
}

/// Writes a document's chunk sequence into a [`RelationGraph`]
#[derive(Debug, Clone, Copy, Default)]
pub struct GraphBuilder;

impl GraphBuilder {
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Build one document: document node, chunk nodes, `contains` and
    /// `precedes` edges, plus `references` edges to section/chapter entities.
    ///
    /// Every conflict is detected before the graph is touched, so a failed
    /// build leaves the graph unchanged. Re-building an existing document
    /// first drops its previous chunks and merges the metadata.
    pub fn build(
        &self,
        graph: &mut RelationGraph,
        doc_id: &str,
        metadata: &Metadata,
        chunks: &[Chunk],
    ) -> Result<BuildSummary> {
        // Phase 1: plan and validate
        let citations: Vec<Vec<EntityRef>> =
            chunks.iter().map(|c| extract_entities(&c.text)).collect();
        Self::validate(graph, doc_id, chunks, &citations)?;

        // Phase 2: mutate
        let mut summary = BuildSummary {
            doc_id: doc_id.to_string(),
            chunks: chunks.len(),
            ..BuildSummary::default()
        };

        for stale in document_chunks(graph, doc_id) {
            graph.remove_node(&stale);
            summary.replaced_chunks += 1;
        }

        graph.upsert_node(doc_id, NodeType::Document, metadata.clone())?;

        for (i, (chunk, entities)) in chunks.iter().zip(&citations).enumerate() {
            graph.upsert_node(&chunk.id, NodeType::Chunk, chunk_attributes(chunk))?;
            graph.add_edge(doc_id, &chunk.id, Relation::Contains)?;

            if i > 0 {
                graph.add_edge(&chunks[i - 1].id, &chunk.id, Relation::Precedes)?;
            }

            for entity in entities {
                let entity_id = entity.id();
                if !graph.has_node(&entity_id) {
                    graph.upsert_node(&entity_id, entity.kind.node_type(), entity.attributes())?;
                    summary.new_entities += 1;
                }
                if graph.add_edge(&chunk.id, &entity_id, Relation::References)? {
                    summary.references += 1;
                }
            }
        }

        log::info!(
            "Added document {doc_id} to graph with {} chunks ({} references, {} new entities)",
            summary.chunks,
            summary.references,
            summary.new_entities
        );

        Ok(summary)
    }

    /// Remove a document node and the chunk nodes it contains.
    ///
    /// Structural entities stay, even when no chunk references them anymore.
    /// Unknown ids and non-document nodes are left alone.
    pub fn remove_document(&self, graph: &mut RelationGraph, doc_id: &str) -> DeleteSummary {
        let mut summary = DeleteSummary {
            doc_id: doc_id.to_string(),
            ..DeleteSummary::default()
        };

        if graph.node_type(doc_id) != Some(NodeType::Document) {
            return summary;
        }

        let edges_before = graph.edge_count();
        for chunk_id in document_chunks(graph, doc_id) {
            if graph.remove_node(&chunk_id) {
                summary.removed_nodes += 1;
            }
        }
        if graph.remove_node(doc_id) {
            summary.removed_nodes += 1;
        }
        summary.removed_edges = edges_before - graph.edge_count();

        log::info!(
            "Removed document {doc_id} from graph ({} nodes, {} edges)",
            summary.removed_nodes,
            summary.removed_edges
        );
        summary
    }

    fn validate(
        graph: &RelationGraph,
        doc_id: &str,
        chunks: &[Chunk],
        citations: &[Vec<EntityRef>],
    ) -> Result<()> {
        if doc_id.trim().is_empty() {
            return Err(GraphError::EmptyDocumentId);
        }

        expect_type(graph, doc_id, NodeType::Document)?;

        for (i, chunk) in chunks.iter().enumerate() {
            let invalid = |reason: String| GraphError::InvalidChunk {
                chunk_id: chunk.id.clone(),
                reason,
            };
            if chunk.doc_id != doc_id {
                return Err(invalid(format!("owned by {}, not {doc_id}", chunk.doc_id)));
            }
            if chunk.ordinal != i {
                return Err(invalid(format!("ordinal {} at position {i}", chunk.ordinal)));
            }
            if chunk.id != Chunk::make_id(doc_id, i) {
                return Err(invalid("id does not match document and ordinal".into()));
            }
            if chunk.id == doc_id {
                return Err(invalid("id collides with its document id".into()));
            }

            if let Some(existing) = graph.node(&chunk.id) {
                if existing.node_type != NodeType::Chunk {
                    return Err(GraphError::NodeTypeConflict {
                        id: chunk.id.clone(),
                        expected: NodeType::Chunk,
                        found: existing.node_type,
                    });
                }
                let owner = existing.attr_str("doc_id").unwrap_or_default();
                if owner != doc_id {
                    return Err(GraphError::ChunkIdConflict {
                        chunk_id: chunk.id.clone(),
                        owner: owner.to_string(),
                    });
                }
            }
        }

        // Entities cited by this batch must not land on the batch's own ids,
        // which the graph does not hold yet on a first ingestion.
        for entity in citations.iter().flatten() {
            let id = entity.id();
            let expected = entity.kind.node_type();
            let found = if id == doc_id {
                Some(NodeType::Document)
            } else if chunks.iter().any(|chunk| chunk.id == id) {
                Some(NodeType::Chunk)
            } else {
                None
            };
            if let Some(found) = found {
                return Err(GraphError::NodeTypeConflict {
                    id,
                    expected,
                    found,
                });
            }
            expect_type(graph, &id, expected)?;
        }

        Ok(())
    }
}

/// Chunk ids a document contains, in adjacency order
#[must_use]
pub fn document_chunks(graph: &RelationGraph, doc_id: &str) -> Vec<String> {
    graph
        .successors_by(doc_id, Relation::Contains)
        .filter(|id| graph.node_type(id) == Some(NodeType::Chunk))
        .map(str::to_string)
        .collect()
}

fn expect_type(graph: &RelationGraph, id: &str, expected: NodeType) -> Result<()> {
    match graph.node_type(id) {
        Some(found) if found != expected => Err(GraphError::NodeTypeConflict {
            id: id.to_string(),
            expected,
            found,
        }),
        _ => Ok(()),
    }
}

fn chunk_attributes(chunk: &Chunk) -> Metadata {
    let mut attrs = chunk.metadata.clone();
    attrs.insert("text".into(), Value::from(chunk.text.clone()));
    attrs.insert("chunk_num".into(), Value::from(chunk.ordinal));
    attrs.insert("doc_id".into(), Value::from(chunk.doc_id.clone()));
    attrs
}
