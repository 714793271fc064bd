//! Tests for RelationGraph operations

use docgraph_graph::{GraphError, NodeType, RelationGraph, Relation};
use docgraph_text_chunker::Metadata;
use serde_json::Value;

fn attrs(pairs: &[(&str, &str)]) -> Metadata {
    pairs
        .iter()
        .map(|(k, v)| ((*k).to_string(), Value::from(*v)))
        .collect()
}

fn graph_with_chunks(ids: &[&str]) -> RelationGraph {
    let mut graph = RelationGraph::new();
    for id in ids {
        graph.upsert_node(id, NodeType::Chunk, Metadata::new()).unwrap();
    }
    graph
}

#[test]
fn test_upsert_creates_then_merges() {
    let mut graph = RelationGraph::new();

    assert!(graph
        .upsert_node("doc", NodeType::Document, attrs(&[("title", "Rules")]))
        .unwrap());
    assert!(!graph
        .upsert_node("doc", NodeType::Document, attrs(&[("pages", "12")]))
        .unwrap());

    let node = graph.node("doc").unwrap();
    assert_eq!(graph.node_count(), 1);
    assert_eq!(node.attr_str("title"), Some("Rules"));
    assert_eq!(node.attr_str("pages"), Some("12"));
}

#[test]
fn test_upsert_overwrites_existing_attribute() {
    let mut graph = RelationGraph::new();
    graph.upsert_node("doc", NodeType::Document, attrs(&[("title", "Draft")])).unwrap();
    graph.upsert_node("doc", NodeType::Document, attrs(&[("title", "Final")])).unwrap();

    assert_eq!(graph.node("doc").unwrap().attr_str("title"), Some("Final"));
}

#[test]
fn test_add_edge_is_idempotent_per_triple() {
    let mut graph = graph_with_chunks(&["a", "b"]);

    assert!(graph.add_edge("a", "b", Relation::Precedes).unwrap());
    assert!(!graph.add_edge("a", "b", Relation::Precedes).unwrap());
    assert_eq!(graph.edge_count(), 1);

    // Same endpoints, different relation: a distinct edge
    assert!(graph.add_edge("a", "b", Relation::References).unwrap());
    assert_eq!(graph.edge_count(), 2);
    assert_eq!(graph.successors("a").len(), 2);
    assert_eq!(graph.predecessors("b").len(), 2);
}

#[test]
fn test_add_edge_requires_both_endpoints() {
    let mut graph = graph_with_chunks(&["a"]);

    let err = graph.add_edge("a", "ghost", Relation::Precedes).unwrap_err();
    assert!(matches!(err, GraphError::NodeNotFound(id) if id == "ghost"));
    assert_eq!(graph.edge_count(), 0);
}

#[test]
fn test_has_node_and_has_edge() {
    let mut graph = graph_with_chunks(&["a", "b"]);
    graph.add_edge("a", "b", Relation::Precedes).unwrap();

    assert!(graph.has_node("a"));
    assert!(!graph.has_node("c"));
    assert!(graph.has_edge("a", "b", Relation::Precedes));
    assert!(!graph.has_edge("b", "a", Relation::Precedes));
    assert!(!graph.has_edge("a", "b", Relation::Contains));
}

#[test]
fn test_remove_node_cascades_to_incident_edges() {
    let mut graph = graph_with_chunks(&["a", "b", "c"]);
    graph.add_edge("a", "b", Relation::Precedes).unwrap();
    graph.add_edge("b", "c", Relation::Precedes).unwrap();
    graph.add_edge("a", "c", Relation::References).unwrap();

    assert!(graph.remove_node("b"));
    assert!(!graph.remove_node("b"));

    assert_eq!(graph.node_count(), 2);
    assert_eq!(graph.edge_count(), 1);
    assert!(graph.has_edge("a", "c", Relation::References));
    assert!(graph.predecessors("c").iter().all(|n| n.id != "b"));
    assert!(graph.successors("a").iter().all(|n| n.id != "b"));
}

#[test]
fn test_edges_iteration_matches_count() {
    let mut graph = graph_with_chunks(&["a", "b", "c"]);
    graph.add_edge("a", "b", Relation::Precedes).unwrap();
    graph.add_edge("b", "c", Relation::Precedes).unwrap();

    let edges: Vec<_> = graph.edges().collect();
    assert_eq!(edges.len(), graph.edge_count());
    assert!(edges
        .iter()
        .any(|e| e.source == "a" && e.target == "b" && e.relation == Relation::Precedes));
}

#[test]
fn test_reachable_within_follows_direction() {
    let mut graph = graph_with_chunks(&["a", "b", "c"]);
    graph.add_edge("a", "b", Relation::Precedes).unwrap();
    graph.add_edge("b", "c", Relation::Precedes).unwrap();

    let from_c = graph.reachable_within("c", 5);
    assert!(from_c.is_empty(), "c has no outgoing edges");

    let from_a = graph.reachable_within("a", 1);
    assert_eq!(from_a, vec![("b".to_string(), 1)]);
}

#[test]
fn test_nodes_of_type() {
    let mut graph = graph_with_chunks(&["a", "b"]);
    graph.upsert_node("section_1", NodeType::Section, Metadata::new()).unwrap();

    assert_eq!(graph.nodes_of_type(NodeType::Chunk).count(), 2);
    assert_eq!(graph.nodes_of_type(NodeType::Section).count(), 1);
    assert_eq!(graph.nodes_of_type(NodeType::Chapter).count(), 0);
}

#[test]
fn test_clear() {
    let mut graph = graph_with_chunks(&["a", "b"]);
    graph.add_edge("a", "b", Relation::Precedes).unwrap();

    graph.clear();
    assert!(graph.is_empty());
    assert_eq!(graph.edge_count(), 0);
}
