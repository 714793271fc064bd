//! Docgraph CLI
//!
//! Segments plain-text documents, records their structure in the relationship
//! graph and answers expansion / outline queries. Every subcommand prints one
//! JSON `CommandResponse` on stdout; logs go to stderr.

mod command;
mod config;
mod loader;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use command::{CommandAction, CommandRequest, CommandResponse};
use config::AppConfig;
use serde_json::{json, Map, Value};
use std::io::Read;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "docgraph", version)]
#[command(about = "Document relationship graph and sentence-aware segmentation", long_about = None)]
struct Cli {
    /// TOML config file (default: ./docgraph.toml when present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Graph file, overrides config and DOCGRAPH_GRAPH_PATH
    #[arg(long, global = true)]
    graph_path: Option<PathBuf>,

    /// Max characters per chunk
    #[arg(long, global = true)]
    chunk_size: Option<usize>,

    /// Max characters of sentence overlap between chunks
    #[arg(long, global = true)]
    chunk_overlap: Option<usize>,

    /// Debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Segment a file or directory without touching the graph
    Chunk {
        path: PathBuf,

        /// Document id (single file only; defaults to the file stem)
        #[arg(long)]
        doc_id: Option<String>,
    },

    /// Segment and add documents to the graph
    Ingest {
        /// UTF-8 text file, or directory of .txt/.md files
        path: PathBuf,

        /// Document id (single file only; defaults to the file stem)
        #[arg(long)]
        doc_id: Option<String>,

        /// Extra document metadata, repeatable
        #[arg(long = "meta", value_name = "KEY=VALUE", value_parser = parse_key_val)]
        meta: Vec<(String, String)>,
    },

    /// Remove a document and its chunks
    Delete { doc_id: String },

    /// Related chunk ids reachable from seed chunks
    Expand {
        #[arg(required = true)]
        chunk_ids: Vec<String>,

        /// Hop limit (default from config)
        #[arg(long)]
        depth: Option<usize>,

        /// Result cap (default from config)
        #[arg(long)]
        limit: Option<usize>,

        /// Include distance and seed per hit
        #[arg(long)]
        detailed: bool,
    },

    /// Chunks citing the same section/chapter entities
    Xrefs { chunk_id: String },

    /// Ordered chunk outline and cited entities of a document
    Structure { doc_id: String },

    /// Node/edge totals and connectivity
    Stats,

    /// Drop every node and edge
    Clear,

    /// Run a raw JSON request {"action": ..., "payload": {...}}
    Request {
        /// Request body; read from stdin when omitted
        #[arg(long)]
        json: Option<String>,
    },
}

impl Commands {
    fn into_request(self) -> Result<CommandRequest> {
        let (action, payload) = match self {
            Commands::Chunk { path, doc_id } => {
                (CommandAction::Chunk, json!({ "path": path, "doc_id": doc_id }))
            }
            Commands::Ingest { path, doc_id, meta } => {
                let metadata: Map<String, Value> =
                    meta.into_iter().map(|(k, v)| (k, Value::from(v))).collect();
                (
                    CommandAction::Ingest,
                    json!({ "path": path, "doc_id": doc_id, "metadata": metadata }),
                )
            }
            Commands::Delete { doc_id } => (CommandAction::Delete, json!({ "doc_id": doc_id })),
            Commands::Expand {
                chunk_ids,
                depth,
                limit,
                detailed,
            } => (
                CommandAction::Expand,
                json!({
                    "chunk_ids": chunk_ids,
                    "depth": depth,
                    "limit": limit,
                    "detailed": detailed,
                }),
            ),
            Commands::Xrefs { chunk_id } => (
                CommandAction::CrossReferences,
                json!({ "chunk_id": chunk_id }),
            ),
            Commands::Structure { doc_id } => {
                (CommandAction::Structure, json!({ "doc_id": doc_id }))
            }
            Commands::Stats => (CommandAction::Stats, json!({})),
            Commands::Clear => (CommandAction::Clear, json!({})),
            Commands::Request { json } => {
                let raw = match json {
                    Some(raw) => raw,
                    None => {
                        let mut buf = String::new();
                        std::io::stdin()
                            .read_to_string(&mut buf)
                            .context("Failed to read request from stdin")?;
                        buf
                    }
                };
                return serde_json::from_str(&raw).context("Invalid request JSON");
            }
        };
        Ok(CommandRequest { action, payload })
    }
}

fn parse_key_val(raw: &str) -> Result<(String, String), String> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=VALUE, got {raw:?}"))?;
    if key.trim().is_empty() {
        return Err(format!("empty metadata key in {raw:?}"));
    }
    Ok((key.trim().to_string(), value.to_string()))
}

fn resolve_config(cli: &Cli) -> Result<(AppConfig, Option<PathBuf>)> {
    let (mut config, source) = AppConfig::load(cli.config.as_deref())?;
    if let Some(path) = &cli.graph_path {
        config.graph_path = path.clone();
    }
    if let Some(size) = cli.chunk_size {
        config.chunking.chunk_size = size;
    }
    if let Some(overlap) = cli.chunk_overlap {
        config.chunking.chunk_overlap = overlap;
    }
    if cli.verbose {
        config.debug = true;
    }
    Ok((config, source))
}

fn init_logging(debug: bool) {
    let default_filter = if debug { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .target(env_logger::Target::Stderr)
        .init();
}

fn emit(response: &CommandResponse) -> ExitCode {
    match serde_json::to_string_pretty(response) {
        Ok(out) => println!("{out}"),
        Err(err) => {
            eprintln!("Failed to serialize response: {err}");
            return ExitCode::FAILURE;
        }
    }
    if response.is_error() {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let resolved = resolve_config(&cli);
    init_logging(resolved.as_ref().is_ok_and(|(c, _)| c.debug) || cli.verbose);

    let (config, source) = match resolved {
        Ok(resolved) => resolved,
        Err(err) => return emit(&CommandResponse::error(&err)),
    };
    if let Some(path) = &source {
        log::debug!("Loaded config from {}", path.display());
    }

    let request = match cli.command.into_request() {
        Ok(request) => request,
        Err(err) => return emit(&CommandResponse::error(&err)),
    };

    let config_path = source.map(|p| p.display().to_string());
    emit(&command::execute(request, &config, config_path))
}
