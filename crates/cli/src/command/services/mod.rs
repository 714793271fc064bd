mod document;
mod query;

use crate::command::context::CommandContext;
use crate::command::domain::{CommandAction, CommandOutcome};
use anyhow::Result;
use document::DocumentService;
use query::QueryService;
use serde_json::Value;

#[derive(Default)]
pub struct Services {
    document: DocumentService,
    query: QueryService,
}

impl Services {
    pub fn route(
        &self,
        action: CommandAction,
        payload: Value,
        ctx: &CommandContext,
    ) -> Result<CommandOutcome> {
        match action {
            CommandAction::Chunk => self.document.chunk(payload, ctx),
            CommandAction::Ingest => self.document.ingest(payload, ctx),
            CommandAction::Delete => self.document.delete(payload, ctx),
            CommandAction::Clear => self.document.clear(ctx),
            CommandAction::Expand => self.query.expand(payload, ctx),
            CommandAction::CrossReferences => self.query.cross_references(payload, ctx),
            CommandAction::Structure => self.query.structure(payload, ctx),
            CommandAction::Stats => self.query.stats(ctx),
        }
    }
}
