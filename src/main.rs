mod config;
mod errors;
mod logging;
mod mcp;
mod model;
mod root;
mod security;
mod server;
mod tools;


use crate::config::{Config, Transport, DEFAULT_CONFIG_FILE};
use crate::root::RootDir;
use anyhow::Context;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    logging::init();

    let args: Vec<String> = std::env::args().collect();
    let mut config_path: Option<PathBuf> = None;
    let mut root_override: Option<PathBuf> = None;
    let mut transport: Option<Transport> = None;
    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--config" => {
                i += 1;
                if i >= args.len() { eprintln!("--config requires a path"); std::process::exit(2); }
                config_path = Some(PathBuf::from(&args[i]));
            }
            "--root" => {
                i += 1;
                if i >= args.len() { eprintln!("--root requires a directory"); std::process::exit(2); }
                root_override = Some(PathBuf::from(&args[i]));
            }
            "--http" => transport = Some(Transport::Http),
            "--stdio" => transport = Some(Transport::Stdio),
            other => {
                eprintln!("unknown argument: {other}");
                std::process::exit(2);
            }
        }
        i += 1;
    }

    let mut cfg = match config_path {
        Some(path) => Config::load(&path).with_context(|| format!("loading config {}", path.display()))?,
        None if Path::new(DEFAULT_CONFIG_FILE).exists() => {
            Config::load(Path::new(DEFAULT_CONFIG_FILE)).context("loading config")?
        }
        None => Config::default(),
    };
    if let Some(dir) = root_override { cfg.root.root_dir = dir; }
    if let Some(t) = transport { cfg.server.transport = t; }
    cfg.validate().context("validating config")?;

    let root_dir = cfg.root_dir()?;
    let root = Arc::new(
        RootDir::open(&root_dir).with_context(|| format!("preparing root directory {}", root_dir.display()))?,
    );
    let registry = mcp::registry::ToolRegistry::new(root.clone());

    info!(root = %root.path().display(), transport = ?cfg.server.transport, tools = ?registry.list_names(), "notes-mcp ready");

    match cfg.server.transport {
        Transport::Stdio => mcp::stdio::serve(registry, cfg.limits.max_request_kb * 1024).await,
        Transport::Http => server::serve(cfg, registry).await,
    }
}
