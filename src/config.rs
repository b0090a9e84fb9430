use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_CONFIG_FILE: &str = "notes-mcp.toml";

#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub root: Root,
    #[serde(default)]
    pub server: Server,
    #[serde(default)]
    pub limits: Limits,
}

#[derive(Debug, Deserialize, Clone)]
pub struct Root {
    #[serde(default = "default_root_dir")]
    pub root_dir: PathBuf,
}
fn default_root_dir() -> PathBuf { PathBuf::from("~/mcp_notes") }

impl Default for Root {
    fn default() -> Self { Self { root_dir: default_root_dir() } }
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Transport {
    #[default]
    Stdio,
    Http,
}

#[derive(Debug, Deserialize, Clone)]
pub struct Server {
    #[serde(default)]
    pub transport: Transport,
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_base_path")]
    pub base_path: String,
}
fn default_bind_addr() -> String { "127.0.0.1".to_string() }
fn default_port() -> u16 { 8790 }
fn default_base_path() -> String { "/mcp".to_string() }

impl Default for Server {
    fn default() -> Self {
        Self {
            transport: Transport::default(),
            bind_addr: default_bind_addr(),
            port: default_port(),
            base_path: default_base_path(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct Limits {
    #[serde(default = "default_max_request_kb")]
    pub max_request_kb: usize,
    #[serde(default = "default_requests_per_second")]
    pub requests_per_second: u32,
    #[serde(default = "default_burst")]
    pub burst: u32,
}
fn default_max_request_kb() -> usize { 1024 }
fn default_requests_per_second() -> u32 { 20 }
fn default_burst() -> u32 { 40 }

impl Default for Limits {
    fn default() -> Self {
        Self {
            max_request_kb: default_max_request_kb(),
            requests_per_second: default_requests_per_second(),
            burst: default_burst(),
        }
    }
}

impl Config {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let raw = fs::read_to_string(path)?;
        if path.extension().map(|e| e == "json").unwrap_or(false) {
            Ok(serde_json::from_str(&raw)?)
        } else {
            Ok(toml::from_str(&raw)?)
        }
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if self.root.root_dir.as_os_str().is_empty() { anyhow::bail!("root_dir must not be empty"); }
        if !self.server.base_path.starts_with('/') { anyhow::bail!("base_path must start with '/'"); }
        if self.limits.max_request_kb == 0 { anyhow::bail!("max_request_kb must be > 0"); }
        if self.limits.requests_per_second == 0 { anyhow::bail!("requests_per_second must be > 0"); }
        if self.limits.burst == 0 { anyhow::bail!("burst must be > 0"); }
        Ok(())
    }

    /// `root_dir` with a leading `~` expanded to the home directory.
    pub fn root_dir(&self) -> anyhow::Result<PathBuf> {
        expand_home(&self.root.root_dir)
    }
}

fn expand_home(path: &Path) -> anyhow::Result<PathBuf> {
    let Ok(rest) = path.strip_prefix("~") else {
        return Ok(path.to_path_buf());
    };
    let home = dirs::home_dir().ok_or_else(|| anyhow::anyhow!("cannot expand ~: no home directory"))?;
    Ok(home.join(rest))
}
