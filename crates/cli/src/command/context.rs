use crate::config::AppConfig;
use anyhow::Result;
use docgraph_graph::{ExpandOptions, GraphStore};
use docgraph_text_chunker::Chunker;

/// Long-lived state every command runs against
pub struct CommandContext {
    pub store: GraphStore,
    pub chunker: Chunker,
    pub expansion: ExpandOptions,
}

impl CommandContext {
    pub fn new(config: &AppConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            store: GraphStore::open(&config.graph_path),
            chunker: Chunker::new(config.chunking)?,
            expansion: config.expansion,
        })
    }
}
