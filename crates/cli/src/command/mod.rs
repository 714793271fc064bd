mod context;
pub mod domain;
mod services;

pub use domain::{CommandAction, CommandRequest, CommandResponse, CommandStatus};

use crate::config::AppConfig;
use anyhow::Result;
use context::CommandContext;
use domain::CommandOutcome;
use services::Services;
use std::time::Instant;

pub struct CommandHandler {
    services: Services,
    ctx: CommandContext,
    config_path: Option<String>,
}

impl CommandHandler {
    pub fn new(config: &AppConfig, config_path: Option<String>) -> Result<Self> {
        Ok(Self {
            services: Services::default(),
            ctx: CommandContext::new(config)?,
            config_path,
        })
    }

    pub fn execute(&self, request: CommandRequest) -> Result<CommandResponse> {
        let CommandRequest { action, payload } = request;
        log::debug!("Executing {action:?}");
        let started = Instant::now();

        let mut outcome: CommandOutcome = self.services.route(action, payload, &self.ctx)?;

        outcome.meta.duration_ms = outcome
            .meta
            .duration_ms
            .or_else(|| Some(started.elapsed().as_millis() as u64));
        outcome.meta.graph_nodes = Some(self.ctx.store.node_count());
        outcome.meta.graph_edges = Some(self.ctx.store.edge_count());
        outcome.meta.config_path = self.config_path.clone();

        Ok(CommandResponse {
            status: CommandStatus::Ok,
            message: None,
            hints: outcome.hints,
            data: outcome.data,
            meta: outcome.meta,
        })
    }
}

/// One-shot execution: open the graph, run the request, report any failure
/// as an error envelope.
pub fn execute(
    request: CommandRequest,
    config: &AppConfig,
    config_path: Option<String>,
) -> CommandResponse {
    let started = Instant::now();
    let result = CommandHandler::new(config, config_path).and_then(|h| h.execute(request));
    match result {
        Ok(response) => response,
        Err(err) => {
            log::error!("{err:#}");
            let mut response = CommandResponse::error(&err);
            response.meta.duration_ms = Some(started.elapsed().as_millis() as u64);
            response
        }
    }
}
