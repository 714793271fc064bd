use crate::graph::RelationGraph;
use crate::types::{NodeType, Relation};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap, HashSet};

pub const DEFAULT_MAX_DEPTH: usize = 2;
pub const DEFAULT_MAX_RESULTS: usize = 10;

/// Traversal bounds for context expansion
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpandOptions {
    /// Hop limit for the directed BFS from each seed
    #[serde(default = "default_max_depth")]
    pub max_depth: usize,

    /// Result cap after ordering
    #[serde(default = "default_max_results")]
    pub max_results: usize,
}

fn default_max_depth() -> usize {
    DEFAULT_MAX_DEPTH
}

fn default_max_results() -> usize {
    DEFAULT_MAX_RESULTS
}

impl Default for ExpandOptions {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            max_results: DEFAULT_MAX_RESULTS,
        }
    }
}

/// Chunk surfaced by expansion with its graph proximity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpandedChunk {
    pub chunk_id: String,
    /// Minimum hop count from any seed
    pub distance: usize,
    /// Earliest seed (in input order) achieving that distance
    pub seed: String,
}

/// Bounded graph traversal from vector-search hits to related chunks
pub struct ContextExpander<'g> {
    graph: &'g RelationGraph,
}

impl<'g> ContextExpander<'g> {
    #[must_use]
    pub const fn new(graph: &'g RelationGraph) -> Self {
        Self { graph }
    }

    /// Expand seed chunk ids into nearby chunk ids.
    ///
    /// Result order is `(distance, chunk_id)`, independent of seed order.
    #[must_use]
    pub fn expand<S: AsRef<str>>(&self, seeds: &[S], options: ExpandOptions) -> Vec<String> {
        self.expand_detailed(seeds, options)
            .into_iter()
            .map(|c| c.chunk_id)
            .collect()
    }

    /// Expand with per-chunk distance and originating seed.
    ///
    /// Each seed present in the graph is traversed over outgoing edges up to
    /// `max_depth`; a seed never reaches itself. Only chunk nodes are kept.
    /// Absent seeds are skipped.
    #[must_use]
    pub fn expand_detailed<S: AsRef<str>>(
        &self,
        seeds: &[S],
        options: ExpandOptions,
    ) -> Vec<ExpandedChunk> {
        let mut best: HashMap<String, (usize, &str)> = HashMap::new();
        let mut seen_seeds: HashSet<&str> = HashSet::new();

        for seed in seeds {
            let seed: &str = seed.as_ref();
            if !seen_seeds.insert(seed) || !self.graph.has_node(seed) {
                continue;
            }

            for (node_id, distance) in self.graph.reachable_within(seed, options.max_depth) {
                if self.graph.node_type(&node_id) != Some(NodeType::Chunk) {
                    continue;
                }
                match best.get_mut(&node_id) {
                    Some(entry) if entry.0 <= distance => {}
                    Some(entry) => *entry = (distance, seed),
                    None => {
                        best.insert(node_id, (distance, seed));
                    }
                }
            }
        }

        let mut expanded: Vec<ExpandedChunk> = best
            .into_iter()
            .map(|(chunk_id, (distance, seed))| ExpandedChunk {
                chunk_id,
                distance,
                seed: seed.to_string(),
            })
            .collect();

        expanded.sort_by(|a, b| {
            a.distance
                .cmp(&b.distance)
                .then_with(|| a.chunk_id.cmp(&b.chunk_id))
        });
        expanded.truncate(options.max_results);

        log::debug!(
            "Expanded {} seeds into {} related chunks (depth {}, limit {})",
            seeds.len(),
            expanded.len(),
            options.max_depth,
            options.max_results
        );

        expanded
    }

    /// Chunks citing any structural entity that `chunk_id` cites, excluding
    /// `chunk_id` itself. Sorted; empty for unknown ids.
    #[must_use]
    pub fn cross_references(&self, chunk_id: &str) -> Vec<String> {
        if !self.graph.has_node(chunk_id) {
            return Vec::new();
        }

        let mut related = BTreeSet::new();
        for entity in self.graph.successors_by(chunk_id, Relation::References) {
            if !self
                .graph
                .node_type(entity)
                .is_some_and(NodeType::is_entity)
            {
                continue;
            }
            for citing in self.graph.predecessors_by(entity, Relation::References) {
                if citing != chunk_id && self.graph.node_type(citing) == Some(NodeType::Chunk) {
                    related.insert(citing.to_string());
                }
            }
        }

        related.into_iter().collect()
    }

    #[must_use]
    pub const fn graph(&self) -> &'g RelationGraph {
        self.graph
    }
}
