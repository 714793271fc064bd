use crate::command::context::CommandContext;
use crate::command::domain::{
    parse_payload, ChunkOutput, CommandOutcome, DeleteOutput, DeletePayload, DocumentSource,
    Hint, HintKind, IngestOutput, SegmentedDocument,
};
use crate::loader::{load_documents, LoadedDocument};
use anyhow::{bail, Result};
use serde_json::{json, Value};

#[derive(Default)]
pub struct DocumentService;

impl DocumentService {
    /// Segment without touching the graph
    pub fn chunk(&self, payload: Value, ctx: &CommandContext) -> Result<CommandOutcome> {
        let source: DocumentSource = parse_payload(payload)?;
        let mut documents = Vec::new();
        for doc in resolve_documents(source)? {
            let segmentation = ctx.chunker.segment(&doc.text, &doc.metadata, &doc.doc_id)?;
            documents.push(SegmentedDocument {
                doc_id: doc.doc_id,
                segmentation,
            });
        }
        CommandOutcome::from_value(ChunkOutput { documents })
    }

    pub fn ingest(&self, payload: Value, ctx: &CommandContext) -> Result<CommandOutcome> {
        let source: DocumentSource = parse_payload(payload)?;
        let mut documents = Vec::new();
        let mut total_chunks = 0;
        let mut empty = Vec::new();

        for doc in resolve_documents(source)? {
            let chunks = ctx
                .chunker
                .chunk_text(&doc.text, &doc.metadata, &doc.doc_id)?;
            if chunks.is_empty() {
                empty.push(doc.doc_id.clone());
            }
            let summary = ctx
                .store
                .ingest_document(&doc.doc_id, &doc.metadata, &chunks)?;
            total_chunks += summary.chunks;
            documents.push(summary);
        }

        let mut outcome = CommandOutcome::from_value(IngestOutput {
            documents,
            total_chunks,
        })?;
        if !empty.is_empty() {
            outcome = outcome.with_hint(Hint::new(
                HintKind::Warn,
                format!("No text to segment in: {}", empty.join(", ")),
            ));
        }
        Ok(outcome)
    }

    pub fn delete(&self, payload: Value, ctx: &CommandContext) -> Result<CommandOutcome> {
        let payload: DeletePayload = parse_payload(payload)?;
        let summary = ctx.store.delete_document(&payload.doc_id)?;
        let found = summary.removed_nodes > 0;

        let outcome = CommandOutcome::from_value(DeleteOutput { summary, found })?;
        if found {
            return Ok(outcome);
        }
        Ok(outcome.with_hint(Hint::new(
            HintKind::Info,
            format!("Document {} is not in the graph; nothing removed", payload.doc_id),
        )))
    }

    pub fn clear(&self, ctx: &CommandContext) -> Result<CommandOutcome> {
        ctx.store.clear()?;
        CommandOutcome::from_value(json!({ "cleared": true }))
    }
}

/// Turn a payload source into loaded documents.
///
/// Inline text needs an explicit `doc_id`; payload metadata is merged over
/// whatever the loader derived from the file.
fn resolve_documents(source: DocumentSource) -> Result<Vec<LoadedDocument>> {
    let DocumentSource {
        path,
        text,
        doc_id,
        metadata,
    } = source;

    let mut documents = match (path, text) {
        (Some(_), Some(_)) => bail!("Provide either path or text, not both"),
        (None, None) => bail!("Provide a path or inline text to segment"),
        (Some(path), None) => load_documents(&path, doc_id.as_deref())?,
        (None, Some(text)) => {
            let Some(doc_id) = doc_id else {
                bail!("doc_id is required with inline text");
            };
            vec![LoadedDocument {
                doc_id,
                text,
                metadata: Default::default(),
            }]
        }
    };

    for doc in &mut documents {
        doc.metadata
            .extend(metadata.iter().map(|(k, v)| (k.clone(), v.clone())));
    }
    Ok(documents)
}
