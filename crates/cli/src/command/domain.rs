use anyhow::Result;
use docgraph_graph::{BuildSummary, DeleteSummary, ExpandedChunk};
use docgraph_text_chunker::{Metadata, Segmentation};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::Value;
use std::path::PathBuf;

#[derive(Debug, Deserialize)]
pub struct CommandRequest {
    pub action: CommandAction,
    #[serde(default = "empty_payload")]
    pub payload: Value,
}

fn empty_payload() -> Value {
    Value::Object(Default::default())
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum CommandAction {
    Chunk,
    Ingest,
    Delete,
    Expand,
    CrossReferences,
    Structure,
    Stats,
    Clear,
}

/// Text source shared by `chunk` and `ingest`: a file or directory path, or
/// inline text with an explicit document id.
#[derive(Debug, Deserialize, Default)]
pub struct DocumentSource {
    #[serde(default)]
    pub path: Option<PathBuf>,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub doc_id: Option<String>,
    /// Extra attributes merged over the loader's filename/filepath/title
    #[serde(default)]
    pub metadata: Metadata,
}

#[derive(Debug, Deserialize)]
pub struct DeletePayload {
    pub doc_id: String,
}

#[derive(Debug, Deserialize)]
pub struct ExpandPayload {
    pub chunk_ids: Vec<String>,
    #[serde(default)]
    pub depth: Option<usize>,
    #[serde(default)]
    pub limit: Option<usize>,
    /// Report distance and seed per hit instead of bare ids
    #[serde(default)]
    pub detailed: bool,
}

#[derive(Debug, Deserialize)]
pub struct CrossReferencesPayload {
    pub chunk_id: String,
}

#[derive(Debug, Deserialize)]
pub struct StructurePayload {
    pub doc_id: String,
}

#[derive(Debug, Serialize)]
pub struct SegmentedDocument {
    pub doc_id: String,
    #[serde(flatten)]
    pub segmentation: Segmentation,
}

#[derive(Debug, Serialize)]
pub struct ChunkOutput {
    pub documents: Vec<SegmentedDocument>,
}

#[derive(Debug, Serialize)]
pub struct IngestOutput {
    pub documents: Vec<BuildSummary>,
    pub total_chunks: usize,
}

#[derive(Debug, Serialize)]
pub struct DeleteOutput {
    #[serde(flatten)]
    pub summary: DeleteSummary,
    pub found: bool,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum ExpandOutput {
    Ids { chunk_ids: Vec<String> },
    Detailed { chunks: Vec<ExpandedChunk> },
}

#[derive(Debug, Serialize)]
pub struct CrossReferencesOutput {
    pub chunk_id: String,
    pub related: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct CommandResponse {
    pub status: CommandStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub hints: Vec<Hint>,
    #[serde(default)]
    pub data: Value,
    #[serde(default)]
    pub meta: ResponseMeta,
}

impl CommandResponse {
    pub fn is_error(&self) -> bool {
        matches!(self.status, CommandStatus::Error)
    }

    /// Error envelope with hints derived from the message
    pub fn error(err: &anyhow::Error) -> Self {
        let message = format!("{err:#}");
        Self {
            status: CommandStatus::Error,
            hints: classify_error(&message),
            message: Some(message),
            data: Value::Null,
            meta: ResponseMeta::default(),
        }
    }
}

#[derive(Debug, Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum CommandStatus {
    Ok,
    Error,
}

#[derive(Debug, Serialize, Clone)]
pub struct Hint {
    #[serde(rename = "type")]
    pub kind: HintKind,
    pub text: String,
}

impl Hint {
    pub fn new(kind: HintKind, text: impl Into<String>) -> Self {
        Self {
            kind,
            text: text.into(),
        }
    }
}

#[derive(Debug, Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum HintKind {
    Info,
    Action,
    Warn,
}

#[derive(Debug, Serialize, Default, Clone)]
pub struct ResponseMeta {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub config_path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_ms: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub graph_nodes: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub graph_edges: Option<usize>,
}

pub struct CommandOutcome {
    pub data: Value,
    pub hints: Vec<Hint>,
    pub meta: ResponseMeta,
}

impl CommandOutcome {
    pub fn from_value<T: Serialize>(value: T) -> Result<Self> {
        Ok(Self {
            data: serde_json::to_value(value)?,
            hints: Vec::new(),
            meta: ResponseMeta::default(),
        })
    }

    #[must_use]
    pub fn with_hint(mut self, hint: Hint) -> Self {
        self.hints.push(hint);
        self
    }
}

pub fn parse_payload<T: DeserializeOwned>(payload: Value) -> Result<T> {
    serde_json::from_value(payload).map_err(Into::into)
}

pub fn classify_error(message: &str) -> Vec<Hint> {
    let mut hints = Vec::new();

    if message.contains("Path does not exist") {
        hints.push(Hint::new(
            HintKind::Action,
            "Check the ingest path; it must be a UTF-8 text file or a directory of .txt/.md files.",
        ));
    }

    if message.contains("Duplicate document id") {
        hints.push(Hint::new(
            HintKind::Action,
            "Rename one of the files or ingest them separately with --doc-id.",
        ));
    }

    if message.contains("invalid chunker bounds") {
        hints.push(Hint::new(
            HintKind::Action,
            "Choose chunk_overlap greater than 0 and smaller than chunk_size.",
        ));
    }

    if message.contains(" node, expected ") || message.contains("already belongs to document") {
        hints.push(Hint::new(
            HintKind::Warn,
            "The id collides with an existing node; pick a distinct document id.",
        ));
    }

    if message.contains("Failed to persist graph") {
        hints.push(Hint::new(
            HintKind::Warn,
            "The in-memory graph changed but the file was not rewritten; check graph_path permissions.",
        ));
    }

    if message.to_lowercase().contains("config") {
        hints.push(Hint::new(
            HintKind::Warn,
            "Config issue detected; verify docgraph.toml and DOCGRAPH_* variables.",
        ));
    }

    if message.contains("missing field") || message.contains("unknown variant") {
        hints.push(Hint::new(
            HintKind::Action,
            "Request shape: {\"action\": \"stats\", \"payload\": {}}.",
        ));
    }

    hints
}
