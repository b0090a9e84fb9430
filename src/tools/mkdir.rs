use crate::{
    errors::AppResult,
    mcp::registry::Tool,
    model::{Envelope, MkdirData, ToolError},
    root::RootDir,
    tools::{parse_params, rejection, to_value},
};
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use std::{fs, sync::Arc};

pub fn mkdir(root: &RootDir, relative_path: &str) -> Envelope<MkdirData> {
    tracing::debug!(tool = "mkdir", path = relative_path);
    let result = root
        .resolve(relative_path)
        .map_err(|e| rejection(e, relative_path))
        .and_then(|folder| {
            fs::create_dir_all(&folder)
                .map_err(|e| ToolError::from_io(&e, "Failed to create directory.", relative_path))?;
            Ok(MkdirData { folder: root.relative(&folder) })
        });
    result.into()
}

#[derive(Debug, Deserialize)]
struct Params {
    #[serde(alias = "path")]
    relative_path: String,
}

pub struct MkdirTool { root: Arc<RootDir> }

impl MkdirTool { pub fn new(root: Arc<RootDir>) -> Self { Self { root } } }

#[async_trait]
impl Tool for MkdirTool {
    fn name(&self) -> &'static str { "mkdir" }
    fn description(&self) -> &'static str {
        "Create a directory inside the notes root, including missing intermediate directories."
    }
    fn capabilities(&self) -> serde_json::Value {
        json!({"input": {"type":"object","required":["relative_path"],"properties": {"relative_path": {"type":"string"}}}, "output": {"type":"object","properties": {"ok":{"type":"boolean"},"data":{"type":"object","properties":{"folder":{"type":"string"}}},"error":{"type":"object"}}}})
    }
    async fn call(&self, params: serde_json::Value) -> AppResult<serde_json::Value> {
        let p: Params = parse_params(params)?;
        to_value(&mkdir(&self.root, &p.relative_path))
    }
}
