use crate::error::{GraphError, Result};
use crate::graph::RelationGraph;
use crate::types::{GraphEdge, GraphNode};
use docgraph_text_chunker::Metadata;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Whole-graph JSON document in node-link form.
///
/// `directed`, `multigraph` and `graph` are written for compatibility with
/// other node-link readers and are optional on input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeLinkDocument {
    #[serde(default = "default_directed")]
    pub directed: bool,
    #[serde(default)]
    pub multigraph: bool,
    #[serde(default)]
    pub graph: Metadata,
    pub nodes: Vec<GraphNode>,
    #[serde(default, alias = "edges")]
    pub links: Vec<GraphEdge>,
}

fn default_directed() -> bool {
    true
}

impl RelationGraph {
    #[must_use]
    pub fn to_node_link(&self) -> NodeLinkDocument {
        NodeLinkDocument {
            directed: true,
            multigraph: false,
            graph: Metadata::new(),
            nodes: self.nodes().cloned().collect(),
            links: self.edges().collect(),
        }
    }

    /// Rebuild a graph from a node-link document.
    ///
    /// Links whose endpoints are not listed as nodes are skipped; duplicate
    /// links collapse into one edge. A repeated node id keeps the type of its
    /// first listing.
    #[must_use]
    pub fn from_node_link(doc: NodeLinkDocument) -> Self {
        let mut graph = Self::new();
        for node in doc.nodes {
            if let Err(err) = graph.upsert_node(&node.id, node.node_type, node.attrs) {
                log::warn!("Dropped node listing while loading graph: {err}");
            }
        }

        let mut skipped = 0usize;
        for link in &doc.links {
            if graph
                .add_edge(&link.source, &link.target, link.relation)
                .is_err()
            {
                skipped += 1;
            }
        }
        if skipped > 0 {
            log::warn!("Skipped {skipped} links with unknown endpoints while loading graph");
        }

        graph
    }
}

/// Load the graph file, or start empty when it is missing or unreadable.
#[must_use]
pub fn load_graph(path: &Path) -> RelationGraph {
    if !path.exists() {
        log::info!("No existing graph at {}, starting fresh", path.display());
        return RelationGraph::new();
    }

    match read_graph(path) {
        Ok(graph) => {
            log::info!(
                "Loaded graph with {} nodes and {} edges from {}",
                graph.node_count(),
                graph.edge_count(),
                path.display()
            );
            graph
        }
        Err(err) => {
            log::error!(
                "Error loading graph from {}: {err}; starting with an empty graph",
                path.display()
            );
            RelationGraph::new()
        }
    }
}

/// Strict read, surfacing IO and parse errors
pub fn read_graph(path: &Path) -> Result<RelationGraph> {
    let bytes = fs::read(path)?;
    let doc: NodeLinkDocument = serde_json::from_slice(&bytes)?;
    Ok(RelationGraph::from_node_link(doc))
}

/// Rewrite the whole graph file (temporary sibling + rename)
pub fn save_graph(path: &Path, graph: &RelationGraph) -> Result<()> {
    let persist_err = |source: std::io::Error| GraphError::Persist {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(persist_err)?;
    }

    let bytes = serde_json::to_vec_pretty(&graph.to_node_link())?;
    let tmp = path.with_extension("json.tmp");
    fs::write(&tmp, bytes).map_err(persist_err)?;
    fs::rename(&tmp, path).map_err(persist_err)?;

    log::debug!(
        "Graph saved to {} ({} nodes, {} edges)",
        path.display(),
        graph.node_count(),
        graph.edge_count()
    );
    Ok(())
}
