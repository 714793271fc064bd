use crate::command::context::CommandContext;
use crate::command::domain::{
    parse_payload, CommandOutcome, CrossReferencesOutput, CrossReferencesPayload, ExpandOutput,
    ExpandPayload, Hint, HintKind, StructurePayload,
};
use anyhow::Result;
use docgraph_graph::ExpandOptions;
use serde_json::{json, Value};

#[derive(Default)]
pub struct QueryService;

impl QueryService {
    pub fn expand(&self, payload: Value, ctx: &CommandContext) -> Result<CommandOutcome> {
        let payload: ExpandPayload = parse_payload(payload)?;
        let options = ExpandOptions {
            max_depth: payload.depth.unwrap_or(ctx.expansion.max_depth),
            max_results: payload.limit.unwrap_or(ctx.expansion.max_results),
        };

        let output = if payload.detailed {
            ExpandOutput::Detailed {
                chunks: ctx.store.expand_detailed(&payload.chunk_ids, options),
            }
        } else {
            ExpandOutput::Ids {
                chunk_ids: ctx.store.expand(&payload.chunk_ids, options),
            }
        };

        let unknown: Vec<&str> = payload
            .chunk_ids
            .iter()
            .map(String::as_str)
            .filter(|id| !ctx.store.has_node(id))
            .collect();

        let outcome = CommandOutcome::from_value(output)?;
        if unknown.is_empty() {
            return Ok(outcome);
        }
        Ok(outcome.with_hint(Hint::new(
            HintKind::Warn,
            format!("Unknown seed ids skipped: {}", unknown.join(", ")),
        )))
    }

    pub fn cross_references(&self, payload: Value, ctx: &CommandContext) -> Result<CommandOutcome> {
        let payload: CrossReferencesPayload = parse_payload(payload)?;
        let related = ctx.store.cross_references(&payload.chunk_id);
        CommandOutcome::from_value(CrossReferencesOutput {
            chunk_id: payload.chunk_id,
            related,
        })
    }

    pub fn structure(&self, payload: Value, ctx: &CommandContext) -> Result<CommandOutcome> {
        let payload: StructurePayload = parse_payload(payload)?;
        match ctx.store.document_structure(&payload.doc_id) {
            Some(structure) => CommandOutcome::from_value(structure),
            None => Ok(CommandOutcome::from_value(json!({}))?.with_hint(Hint::new(
                HintKind::Warn,
                format!("Document {} not found", payload.doc_id),
            ))),
        }
    }

    pub fn stats(&self, ctx: &CommandContext) -> Result<CommandOutcome> {
        let stats = ctx.store.stats();
        let empty = stats.total_nodes == 0;

        let outcome = CommandOutcome::from_value(stats)?;
        if !empty {
            return Ok(outcome);
        }
        Ok(outcome.with_hint(Hint::new(
            HintKind::Info,
            "Graph is empty; run `docgraph ingest <path>` first.",
        )))
    }
}
