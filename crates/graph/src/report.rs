use crate::builder::document_chunks;
use crate::graph::RelationGraph;
use crate::types::{NodeType, Relation};
use docgraph_text_chunker::Metadata;
use petgraph::unionfind::UnionFind;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashMap};

/// Entity cited by a chunk
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityMention {
    #[serde(rename = "type")]
    pub entity_type: NodeType,
    pub id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChunkOutline {
    pub chunk_id: String,
    pub chunk_num: Option<usize>,
    pub references: Vec<EntityMention>,
}

/// Hierarchical view of one document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentStructure {
    pub doc_id: String,
    pub metadata: Metadata,
    /// Ordered by chunk number
    pub chunks: Vec<ChunkOutline>,
    /// Entity ids cited anywhere in the document, grouped by type
    pub entities: BTreeMap<NodeType, Vec<String>>,
}

/// Aggregate graph statistics
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphStats {
    pub total_nodes: usize,
    pub total_edges: usize,
    pub node_types: BTreeMap<NodeType, usize>,
    /// Weak connectivity; the empty graph is not connected
    pub is_connected: bool,
    /// Section/chapter nodes no chunk references anymore
    pub unreferenced_entities: usize,
}

/// Read-only reports over a [`RelationGraph`]
pub struct StructureReporter<'g> {
    graph: &'g RelationGraph,
}

impl<'g> StructureReporter<'g> {
    #[must_use]
    pub const fn new(graph: &'g RelationGraph) -> Self {
        Self { graph }
    }

    /// Structure of a document; `None` when `doc_id` is not a document node
    #[must_use]
    pub fn document_structure(&self, doc_id: &str) -> Option<DocumentStructure> {
        let doc = self
            .graph
            .node(doc_id)
            .filter(|n| n.node_type == NodeType::Document)?;

        let mut grouped: BTreeMap<NodeType, BTreeSet<String>> = BTreeMap::new();
        let mut chunks: Vec<ChunkOutline> = document_chunks(self.graph, doc_id)
            .into_iter()
            .map(|chunk_id| {
                let chunk_num = self
                    .graph
                    .node(&chunk_id)
                    .and_then(|n| n.attr_usize("chunk_num"));
                let references: Vec<EntityMention> = self
                    .graph
                    .successors_by(&chunk_id, Relation::References)
                    .filter_map(|id| {
                        let entity_type = self.graph.node_type(id).filter(|t| t.is_entity())?;
                        grouped
                            .entry(entity_type)
                            .or_default()
                            .insert(id.to_string());
                        Some(EntityMention {
                            entity_type,
                            id: id.to_string(),
                        })
                    })
                    .collect();
                ChunkOutline {
                    chunk_id,
                    chunk_num,
                    references,
                }
            })
            .collect();

        chunks.sort_by(|a, b| {
            a.chunk_num
                .unwrap_or(usize::MAX)
                .cmp(&b.chunk_num.unwrap_or(usize::MAX))
                .then_with(|| a.chunk_id.cmp(&b.chunk_id))
        });

        Some(DocumentStructure {
            doc_id: doc_id.to_string(),
            metadata: doc.attrs.clone(),
            chunks,
            entities: grouped
                .into_iter()
                .map(|(kind, ids)| (kind, ids.into_iter().collect()))
                .collect(),
        })
    }

    #[must_use]
    pub fn stats(&self) -> GraphStats {
        let mut node_types: BTreeMap<NodeType, usize> = BTreeMap::new();
        for node in self.graph.nodes() {
            *node_types.entry(node.node_type).or_default() += 1;
        }

        let unreferenced_entities = self
            .graph
            .nodes()
            .filter(|n| n.node_type.is_entity())
            .filter(|n| {
                self.graph
                    .predecessors_by(&n.id, Relation::References)
                    .next()
                    .is_none()
            })
            .count();

        GraphStats {
            total_nodes: self.graph.node_count(),
            total_edges: self.graph.edge_count(),
            node_types,
            is_connected: self.is_weakly_connected(),
            unreferenced_entities,
        }
    }

    /// Connectivity with edge direction ignored
    #[must_use]
    pub fn is_weakly_connected(&self) -> bool {
        let index: HashMap<&str, usize> = self
            .graph
            .nodes()
            .enumerate()
            .map(|(i, n)| (n.id.as_str(), i))
            .collect();
        if index.is_empty() {
            return false;
        }

        let mut components = UnionFind::<usize>::new(index.len());
        for edge in self.graph.edges() {
            if let (Some(&a), Some(&b)) = (
                index.get(edge.source.as_str()),
                index.get(edge.target.as_str()),
            ) {
                components.union(a, b);
            }
        }

        let root = components.find(0);
        (1..index.len()).all(|i| components.find(i) == root)
    }
}
