use crate::error::{GraphError, Result};
use crate::types::{GraphEdge, GraphNode, Neighbor, NodeType, Relation};
use docgraph_text_chunker::Metadata;
use std::collections::{BTreeMap, HashSet, VecDeque};

// Keys owned by the node record itself; attribute bags may not shadow them.
const RESERVED_ATTRS: [&str; 2] = ["id", "node_type"];

/// In-memory directed relationship graph.
///
/// Nodes are keyed by id. Outgoing edges live in a per-node adjacency list,
/// mirrored by an incoming index so inverse lookups (who references this
/// entity?) do not scan the whole graph. At most one edge exists per
/// `(source, target, relation)` triple.
#[derive(Debug, Clone, Default)]
pub struct RelationGraph {
    nodes: BTreeMap<String, GraphNode>,
    outgoing: BTreeMap<String, Vec<Neighbor>>,
    incoming: BTreeMap<String, Vec<Neighbor>>,
    edge_count: usize,
}

impl RelationGraph {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    #[must_use]
    pub const fn edge_count(&self) -> usize {
        self.edge_count
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Insert a node, or merge `attrs` into an existing one.
    ///
    /// Returns `true` when the node was created. A node keeps its type for
    /// life; upserting an existing id with another type is a conflict.
    pub fn upsert_node(
        &mut self,
        id: &str,
        node_type: NodeType,
        mut attrs: Metadata,
    ) -> Result<bool> {
        for key in RESERVED_ATTRS {
            attrs.remove(key);
        }

        if let Some(node) = self.nodes.get_mut(id) {
            if node.node_type != node_type {
                return Err(GraphError::NodeTypeConflict {
                    id: id.to_string(),
                    expected: node_type,
                    found: node.node_type,
                });
            }
            node.attrs.extend(attrs);
            return Ok(false);
        }

        self.nodes.insert(
            id.to_string(),
            GraphNode {
                id: id.to_string(),
                node_type,
                attrs,
            },
        );
        Ok(true)
    }

    #[must_use]
    pub fn node(&self, id: &str) -> Option<&GraphNode> {
        self.nodes.get(id)
    }

    #[must_use]
    pub fn has_node(&self, id: &str) -> bool {
        self.nodes.contains_key(id)
    }

    #[must_use]
    pub fn node_type(&self, id: &str) -> Option<NodeType> {
        self.nodes.get(id).map(|n| n.node_type)
    }

    /// Add a labelled edge between two existing nodes.
    ///
    /// Idempotent per `(source, target, relation)`; returns `true` when a new
    /// edge was stored.
    pub fn add_edge(&mut self, source: &str, target: &str, relation: Relation) -> Result<bool> {
        for id in [source, target] {
            if !self.has_node(id) {
                return Err(GraphError::NodeNotFound(id.to_string()));
            }
        }
        if self.has_edge(source, target, relation) {
            return Ok(false);
        }

        self.outgoing
            .entry(source.to_string())
            .or_default()
            .push(Neighbor {
                id: target.to_string(),
                relation,
            });
        self.incoming
            .entry(target.to_string())
            .or_default()
            .push(Neighbor {
                id: source.to_string(),
                relation,
            });
        self.edge_count += 1;
        Ok(true)
    }

    #[must_use]
    pub fn has_edge(&self, source: &str, target: &str, relation: Relation) -> bool {
        self.successors(source)
            .iter()
            .any(|n| n.id == target && n.relation == relation)
    }

    /// Remove a node and every edge touching it. Returns `false` if absent.
    pub fn remove_node(&mut self, id: &str) -> bool {
        if self.nodes.remove(id).is_none() {
            return false;
        }

        let out = self.outgoing.remove(id).unwrap_or_default();
        let inc = self.incoming.remove(id).unwrap_or_default();

        for neighbor in out.iter().filter(|n| n.id != id) {
            if let Some(list) = self.incoming.get_mut(&neighbor.id) {
                list.retain(|n| n.id != id);
            }
        }
        for neighbor in inc.iter().filter(|n| n.id != id) {
            if let Some(list) = self.outgoing.get_mut(&neighbor.id) {
                list.retain(|n| n.id != id);
            }
        }

        let self_loops = out.iter().filter(|n| n.id == id).count();
        self.edge_count -= out.len() + inc.len() - self_loops;
        true
    }

    /// Outgoing adjacency of a node (empty for unknown ids)
    #[must_use]
    pub fn successors(&self, id: &str) -> &[Neighbor] {
        self.outgoing.get(id).map_or(&[][..], Vec::as_slice)
    }

    /// Incoming adjacency of a node (empty for unknown ids)
    #[must_use]
    pub fn predecessors(&self, id: &str) -> &[Neighbor] {
        self.incoming.get(id).map_or(&[][..], Vec::as_slice)
    }

    /// Outgoing neighbors over one relation
    pub fn successors_by<'a>(
        &'a self,
        id: &str,
        relation: Relation,
    ) -> impl Iterator<Item = &'a str> + 'a {
        self.successors(id)
            .iter()
            .filter(move |n| n.relation == relation)
            .map(|n| n.id.as_str())
    }

    /// Incoming neighbors over one relation
    pub fn predecessors_by<'a>(
        &'a self,
        id: &str,
        relation: Relation,
    ) -> impl Iterator<Item = &'a str> + 'a {
        self.predecessors(id)
            .iter()
            .filter(move |n| n.relation == relation)
            .map(|n| n.id.as_str())
    }

    /// All nodes in id order
    pub fn nodes(&self) -> impl Iterator<Item = &GraphNode> {
        self.nodes.values()
    }

    pub fn nodes_of_type(&self, node_type: NodeType) -> impl Iterator<Item = &GraphNode> {
        self.nodes.values().filter(move |n| n.node_type == node_type)
    }

    /// All edges, grouped by source in id order
    pub fn edges(&self) -> impl Iterator<Item = GraphEdge> + '_ {
        self.outgoing.iter().flat_map(|(source, targets)| {
            targets.iter().map(move |n| GraphEdge {
                source: source.clone(),
                target: n.id.clone(),
                relation: n.relation,
            })
        })
    }

    /// Directed BFS from `start` following outgoing edges up to `max_hops`.
    ///
    /// Returns `(node_id, distance)` in discovery order, excluding `start`.
    /// Unknown start ids yield an empty result.
    #[must_use]
    pub fn reachable_within(&self, start: &str, max_hops: usize) -> Vec<(String, usize)> {
        let Some((start, _)) = self.nodes.get_key_value(start) else {
            return Vec::new();
        };

        let mut visited: HashSet<&str> = HashSet::from([start.as_str()]);
        let mut queue = VecDeque::from([(start.as_str(), 0usize)]);
        let mut reached = Vec::new();

        while let Some((current, depth)) = queue.pop_front() {
            if depth >= max_hops {
                continue;
            }
            for neighbor in self.successors(current) {
                if visited.insert(neighbor.id.as_str()) {
                    reached.push((neighbor.id.clone(), depth + 1));
                    queue.push_back((neighbor.id.as_str(), depth + 1));
                }
            }
        }

        reached
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

/// Graphs are equal when they hold the same nodes (with attributes) and the
/// same edge set; adjacency order is not significant.
impl PartialEq for RelationGraph {
    fn eq(&self, other: &Self) -> bool {
        self.nodes == other.nodes
            && self.edge_count == other.edge_count
            && self
                .edges()
                .all(|e| other.has_edge(&e.source, &e.target, e.relation))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn graph_with(ids: &[&str]) -> RelationGraph {
        let mut graph = RelationGraph::new();
        for id in ids {
            graph.upsert_node(id, NodeType::Chunk, Metadata::new()).unwrap();
        }
        graph
    }

    #[test]
    fn reserved_attrs_are_stripped() {
        let mut graph = RelationGraph::new();
        let mut attrs = Metadata::new();
        attrs.insert("id".into(), "spoofed".into());
        attrs.insert("node_type".into(), "chapter".into());
        attrs.insert("title".into(), "Rules".into());
        graph.upsert_node("doc", NodeType::Document, attrs).unwrap();

        let node = graph.node("doc").unwrap();
        assert_eq!(node.id, "doc");
        assert_eq!(node.attrs.len(), 1);
    }

    #[test]
    fn existing_node_keeps_its_type() {
        let mut graph = RelationGraph::new();
        graph
            .upsert_node("section_4", NodeType::Section, Metadata::new())
            .unwrap();

        let err = graph
            .upsert_node("section_4", NodeType::Document, Metadata::new())
            .unwrap_err();

        assert!(matches!(
            err,
            GraphError::NodeTypeConflict {
                expected: NodeType::Document,
                found: NodeType::Section,
                ..
            }
        ));
        assert_eq!(graph.node_type("section_4"), Some(NodeType::Section));
    }

    #[test]
    fn self_loop_removal_keeps_edge_count_consistent() {
        let mut graph = graph_with(&["a", "b"]);
        graph.add_edge("a", "a", Relation::Precedes).unwrap();
        graph.add_edge("a", "b", Relation::Precedes).unwrap();
        graph.add_edge("b", "a", Relation::References).unwrap();
        assert_eq!(graph.edge_count(), 3);

        assert!(graph.remove_node("a"));
        assert_eq!(graph.edge_count(), 0);
        assert!(graph.predecessors("b").is_empty());
        assert!(graph.successors("b").is_empty());
    }

    #[test]
    fn bfs_respects_hop_limit_and_excludes_start() {
        let mut graph = graph_with(&["a", "b", "c", "d"]);
        graph.add_edge("a", "b", Relation::Precedes).unwrap();
        graph.add_edge("b", "c", Relation::Precedes).unwrap();
        graph.add_edge("c", "d", Relation::Precedes).unwrap();
        graph.add_edge("c", "a", Relation::Precedes).unwrap();

        assert!(graph.reachable_within("a", 0).is_empty());
        assert_eq!(
            graph.reachable_within("a", 2),
            vec![("b".to_string(), 1), ("c".to_string(), 2)]
        );
        assert_eq!(graph.reachable_within("a", 10).len(), 3);
        assert!(graph.reachable_within("missing", 3).is_empty());
    }
}
