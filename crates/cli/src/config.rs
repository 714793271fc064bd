use anyhow::{anyhow, bail, Context, Result};
use docgraph_graph::ExpandOptions;
use docgraph_text_chunker::ChunkerConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const DEFAULT_CONFIG_FILE: &str = "docgraph.toml";
pub const DEFAULT_GRAPH_PATH: &str = "data/graph_db/document_graph.json";

pub const ENV_GRAPH_PATH: &str = "DOCGRAPH_GRAPH_PATH";
pub const ENV_CHUNK_SIZE: &str = "DOCGRAPH_CHUNK_SIZE";
pub const ENV_CHUNK_OVERLAP: &str = "DOCGRAPH_CHUNK_OVERLAP";
pub const ENV_DEBUG: &str = "DOCGRAPH_DEBUG";

/// Runtime settings for the `docgraph` binary.
///
/// Layering, lowest to highest: built-in defaults, TOML file, `DOCGRAPH_*`
/// environment variables, command-line flags.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Node-link JSON file backing the graph
    pub graph_path: PathBuf,

    pub chunking: ChunkerConfig,

    pub expansion: ExpandOptions,

    /// Raise the default log filter to `debug`
    pub debug: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            graph_path: PathBuf::from(DEFAULT_GRAPH_PATH),
            chunking: ChunkerConfig::default(),
            expansion: ExpandOptions::default(),
            debug: false,
        }
    }
}

impl AppConfig {
    /// Load the file layer and apply environment overrides.
    ///
    /// An explicit path must exist; otherwise `docgraph.toml` in the working
    /// directory is used when present. Returns the file that was read, if any.
    pub fn load(explicit: Option<&Path>) -> Result<(Self, Option<PathBuf>)> {
        let source = match explicit {
            Some(path) if !path.exists() => {
                bail!("Config file not found: {}", path.display())
            }
            Some(path) => Some(path.to_path_buf()),
            None => Some(PathBuf::from(DEFAULT_CONFIG_FILE)).filter(|p| p.exists()),
        };

        let mut config = match &source {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.apply_env(|key| std::env::var(key).ok())?;
        Ok((config, source))
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        Self::from_toml(&raw).with_context(|| format!("Invalid config {}", path.display()))
    }

    pub fn from_toml(raw: &str) -> Result<Self> {
        toml::from_str(raw).map_err(Into::into)
    }

    /// Apply `DOCGRAPH_*` overrides read through `lookup`
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<()> {
        if let Some(path) = lookup(ENV_GRAPH_PATH).filter(|v| !v.trim().is_empty()) {
            self.graph_path = PathBuf::from(path);
        }
        if let Some(raw) = lookup(ENV_CHUNK_SIZE) {
            self.chunking.chunk_size = parse_usize(ENV_CHUNK_SIZE, &raw)?;
        }
        if let Some(raw) = lookup(ENV_CHUNK_OVERLAP) {
            self.chunking.chunk_overlap = parse_usize(ENV_CHUNK_OVERLAP, &raw)?;
        }
        if let Some(raw) = lookup(ENV_DEBUG) {
            self.debug = parse_flag(ENV_DEBUG, &raw)?;
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if self.graph_path.as_os_str().is_empty() {
            bail!("Config graph_path must not be empty");
        }
        self.chunking
            .validate()
            .map_err(|e| anyhow!("Config chunking: {e}"))
    }
}

fn parse_usize(key: &str, raw: &str) -> Result<usize> {
    raw.trim()
        .parse()
        .with_context(|| format!("{key} must be a non-negative integer, got {raw:?}"))
}

fn parse_flag(key: &str, raw: &str) -> Result<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "" | "0" | "false" | "no" | "off" => Ok(false),
        _ => bail!("{key} must be a boolean, got {raw:?}"),
    }
}
