//! Store-level ingestion, deletion, expansion and reporting

use docgraph_graph::{ExpandOptions, GraphError, GraphStore, NodeType, Relation};
use docgraph_text_chunker::{Chunk, Chunker, ChunkerConfig, Metadata};
use pretty_assertions::assert_eq;
use serde_json::Value;
use tempfile::TempDir;

fn open_store(dir: &TempDir) -> GraphStore {
    GraphStore::open(dir.path().join("graph_db").join("document_graph.json"))
}

fn segment(doc_id: &str, text: &str) -> Vec<Chunk> {
    Chunker::new(ChunkerConfig::new(60, 20))
        .unwrap()
        .chunk_text(text, &Metadata::new(), doc_id)
        .unwrap()
}

fn title(value: &str) -> Metadata {
    let mut meta = Metadata::new();
    meta.insert("title".into(), Value::from(value));
    meta
}

const RULES: &str = "Section 12 requires approval of the committee. \
    Tenders are opened in public. Chapter IV lists exemptions in detail. \
    Section 12 also fixes the deadline. Appeals go to the authority.";

const ANNEX: &str = "The annex repeats section 12 verbatim. \
    Forms are attached at the end. Chapter iv is summarised here.";

#[test]
fn ingest_adds_document_chunks_and_ordered_path() {
    let dir = TempDir::new().unwrap();
    let store = open_store(&dir);
    let chunks = segment("rules", RULES);
    let n = chunks.len();
    assert!(n >= 3, "fixture should produce several chunks, got {n}");

    store.ingest_document("rules", &title("Rules"), &chunks).unwrap();

    let stats = store.stats();
    assert_eq!(stats.node_types[&NodeType::Document], 1);
    assert_eq!(stats.node_types[&NodeType::Chunk], n);

    store.with_graph(|graph| {
        let contains = graph
            .edges()
            .filter(|e| e.relation == Relation::Contains)
            .count();
        let precedes: Vec<_> = graph
            .edges()
            .filter(|e| e.relation == Relation::Precedes)
            .collect();
        assert_eq!(contains, n);
        assert_eq!(precedes.len(), n - 1);

        for i in 1..n {
            assert!(graph.has_edge(
                &Chunk::make_id("rules", i - 1),
                &Chunk::make_id("rules", i),
                Relation::Precedes
            ));
        }
        for chunk in &chunks {
            assert_eq!(
                graph.predecessors_by(&chunk.id, Relation::Contains).count(),
                1
            );
        }
    });
}

#[test]
fn section_citation_becomes_singleton_entity() {
    let dir = TempDir::new().unwrap();
    let store = open_store(&dir);
    let chunks = segment("memo", "Section 12 requires approval");

    store.ingest_document("memo", &Metadata::new(), &chunks).unwrap();

    store.with_graph(|graph| {
        let entity = graph.node("section_12").expect("entity node");
        assert_eq!(entity.node_type, NodeType::Section);
        assert_eq!(entity.attr_str("section_num"), Some("12"));

        let refs: Vec<_> = graph
            .edges()
            .filter(|e| e.relation == Relation::References)
            .collect();
        assert_eq!(refs.len(), 1);
        assert_eq!(refs[0].source, "memo_chunk_0");
        assert_eq!(refs[0].target, "section_12");
    });
}

#[test]
fn repeated_citations_do_not_duplicate_reference_edges() {
    let dir = TempDir::new().unwrap();
    let store = open_store(&dir);
    let chunks = segment("memo", "See section 3, section 3 and SECTION 3.");

    let summary = store.ingest_document("memo", &Metadata::new(), &chunks).unwrap();

    assert_eq!(summary.references, 1);
    assert_eq!(summary.new_entities, 1);
    assert_eq!(store.stats().total_edges, 2); // contains + references
}

#[test]
fn entities_are_shared_across_documents() {
    let dir = TempDir::new().unwrap();
    let store = open_store(&dir);

    store
        .ingest_document("rules", &Metadata::new(), &segment("rules", RULES))
        .unwrap();
    let annex = store
        .ingest_document("annex", &Metadata::new(), &segment("annex", ANNEX))
        .unwrap();

    assert_eq!(annex.new_entities, 0, "section_12 and chapter_IV already exist");
    assert_eq!(store.stats().node_types[&NodeType::Section], 1);
    assert_eq!(store.stats().node_types[&NodeType::Chapter], 1);

    let xrefs = store.cross_references("annex_chunk_0");
    assert!(xrefs.iter().all(|id| id.starts_with("rules_chunk_")));
    assert!(!xrefs.is_empty());
    assert!(!xrefs.contains(&"annex_chunk_0".to_string()));
}

#[test]
fn delete_removes_exactly_document_and_chunks() {
    let dir = TempDir::new().unwrap();
    let store = open_store(&dir);
    let rules = segment("rules", RULES);
    let annex = segment("annex", ANNEX);
    store.ingest_document("rules", &Metadata::new(), &rules).unwrap();
    store.ingest_document("annex", &Metadata::new(), &annex).unwrap();

    let before = store.stats();
    let section_before = store.with_graph(|g| g.node("section_12").cloned());

    let summary = store.delete_document("rules").unwrap();

    assert_eq!(summary.removed_nodes, rules.len() + 1);
    let after = store.stats();
    assert_eq!(after.total_nodes, before.total_nodes - rules.len() - 1);
    assert_eq!(after.total_edges, before.total_edges - summary.removed_edges);
    assert!(!store.has_node("rules"));
    assert!(rules.iter().all(|c| !store.has_node(&c.id)));

    // Entities survive, unchanged
    assert_eq!(store.with_graph(|g| g.node("section_12").cloned()), section_before);
    assert!(store.with_graph(|g| g
        .edges()
        .all(|e| !e.source.starts_with("rules") && !e.target.starts_with("rules"))));
}

#[test]
fn delete_leaves_orphaned_entities_and_counts_them() {
    let dir = TempDir::new().unwrap();
    let store = open_store(&dir);
    store
        .ingest_document("memo", &Metadata::new(), &segment("memo", "Chapter 9 only."))
        .unwrap();

    store.delete_document("memo").unwrap();

    let stats = store.stats();
    assert!(store.has_node("chapter_9"));
    assert_eq!(stats.total_nodes, 1);
    assert_eq!(stats.unreferenced_entities, 1);
}

#[test]
fn delete_unknown_document_is_noop_without_write() {
    let dir = TempDir::new().unwrap();
    let store = open_store(&dir);

    let summary = store.delete_document("missing").unwrap();

    assert_eq!(summary.removed_nodes, 0);
    assert!(!store.path().exists());
}

#[test]
fn reingest_replaces_previous_chunks() {
    let dir = TempDir::new().unwrap();
    let store = open_store(&dir);
    let long = segment("rules", RULES);
    store.ingest_document("rules", &title("v1"), &long).unwrap();

    let short = segment("rules", "Only one sentence now.");
    let summary = store.ingest_document("rules", &Metadata::new(), &short).unwrap();

    assert_eq!(summary.replaced_chunks, long.len());
    let structure = store.document_structure("rules").unwrap();
    assert_eq!(structure.chunks.len(), 1);
    assert_eq!(structure.metadata["title"], Value::from("v1"));
    assert_eq!(store.stats().node_types[&NodeType::Chunk], 1);
}

#[test]
fn chunk_id_owned_by_another_document_is_rejected() {
    let dir = TempDir::new().unwrap();
    let store = open_store(&dir);
    store
        .ingest_document("a", &Metadata::new(), &segment("a", "First. Second."))
        .unwrap();
    let before = store.snapshot();

    // "a_chunk_0" already names a chunk of document "a"
    let err = store
        .ingest_document("a_chunk_0", &Metadata::new(), &segment("a_chunk_0", "Text."))
        .unwrap_err();

    assert!(matches!(err, GraphError::NodeTypeConflict { .. }));
    assert_eq!(store.snapshot(), before);
}

#[test]
fn document_id_matching_its_own_citation_is_rejected() {
    let dir = TempDir::new().unwrap();
    let store = open_store(&dir);
    let before = store.snapshot();

    let err = store
        .ingest_document(
            "section_12",
            &Metadata::new(),
            &segment("section_12", "Section 12 requires approval."),
        )
        .unwrap_err();

    assert!(matches!(
        err,
        GraphError::NodeTypeConflict {
            expected: NodeType::Section,
            found: NodeType::Document,
            ..
        }
    ));
    assert_eq!(store.snapshot(), before);

    // The entity id stays free for a real citation
    store
        .ingest_document("other", &Metadata::new(), &segment("other", "See Section 12."))
        .unwrap();
    store.with_graph(|graph| {
        assert_eq!(graph.node_type("section_12"), Some(NodeType::Section));
        assert!(graph.has_edge("other_chunk_0", "section_12", Relation::References));
    });
}

#[test]
fn upsert_with_another_type_keeps_the_node() {
    let dir = TempDir::new().unwrap();
    let store = open_store(&dir);
    store
        .ingest_document("memo", &Metadata::new(), &segment("memo", "Section 3 applies."))
        .unwrap();
    let before = store.snapshot();

    let err = store
        .upsert_node("section_3", NodeType::Document, title("Hijack"))
        .unwrap_err();

    assert!(matches!(
        err,
        GraphError::NodeTypeConflict {
            expected: NodeType::Document,
            found: NodeType::Section,
            ..
        }
    ));
    assert_eq!(store.snapshot(), before);
    assert_eq!(store.delete_document("section_3").unwrap().removed_nodes, 0);
}

#[test]
fn expansion_depth_zero_is_empty() {
    let dir = TempDir::new().unwrap();
    let store = open_store(&dir);
    let chunks = segment("rules", RULES);
    store.ingest_document("rules", &Metadata::new(), &chunks).unwrap();

    let seeds: Vec<&str> = chunks.iter().map(|c| c.id.as_str()).collect();
    let options = ExpandOptions {
        max_depth: 0,
        max_results: 10,
    };
    assert!(store.expand(&seeds, options).is_empty());
}

#[test]
fn expansion_follows_precedes_and_returns_chunks_only() {
    let dir = TempDir::new().unwrap();
    let store = open_store(&dir);
    let chunks = segment("rules", RULES);
    store.ingest_document("rules", &Metadata::new(), &chunks).unwrap();

    let related = store.expand(&["rules_chunk_0", "missing"], ExpandOptions::default());

    assert_eq!(related, vec!["rules_chunk_1", "rules_chunk_2"]);
    assert!(related.iter().all(|id| store.with_graph(|g| g.node_type(id)) == Some(NodeType::Chunk)));
}

#[test]
fn expansion_is_capped_by_max_results() {
    let dir = TempDir::new().unwrap();
    let store = open_store(&dir);
    let chunks = segment("rules", RULES);
    store.ingest_document("rules", &Metadata::new(), &chunks).unwrap();

    let options = ExpandOptions {
        max_depth: 50,
        max_results: 1,
    };
    assert_eq!(store.expand(&["rules_chunk_0"], options), vec!["rules_chunk_1"]);
}

#[test]
fn document_structure_lists_ordered_chunks_and_entities() {
    let dir = TempDir::new().unwrap();
    let store = open_store(&dir);
    let chunks = segment("rules", RULES);
    store.ingest_document("rules", &title("Rules"), &chunks).unwrap();

    let structure = store.document_structure("rules").unwrap();

    assert_eq!(structure.doc_id, "rules");
    assert_eq!(structure.metadata["title"], Value::from("Rules"));
    let nums: Vec<_> = structure.chunks.iter().map(|c| c.chunk_num).collect();
    let expected: Vec<_> = (0..chunks.len()).map(Some).collect();
    assert_eq!(nums, expected);
    assert_eq!(structure.entities[&NodeType::Section], vec!["section_12"]);
    assert_eq!(structure.entities[&NodeType::Chapter], vec!["chapter_IV"]);
    assert!(structure.chunks[0]
        .references
        .iter()
        .any(|r| r.id == "section_12" && r.entity_type == NodeType::Section));

    assert!(store.document_structure("nope").is_none());
}

#[test]
fn stats_report_connectivity() {
    let dir = TempDir::new().unwrap();
    let store = open_store(&dir);
    store
        .ingest_document("a", &Metadata::new(), &segment("a", "Section 1 applies."))
        .unwrap();
    assert!(store.stats().is_connected);

    store
        .ingest_document("b", &Metadata::new(), &segment("b", "Nothing cited."))
        .unwrap();
    assert!(!store.stats().is_connected);

    store
        .ingest_document("c", &Metadata::new(), &segment("c", "Nothing cited. Section 1 too."))
        .unwrap();
    assert!(!store.stats().is_connected, "b is still isolated");
}
