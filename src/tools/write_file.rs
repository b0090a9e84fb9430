use crate::{
    errors::AppResult,
    mcp::registry::Tool,
    model::{Envelope, ToolError, WriteFileData},
    root::RootDir,
    tools::{parse_params, rejection, to_value},
};
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use std::{fs, sync::Arc};

/// Writes `content` as UTF-8, replacing the file and creating parents.
pub fn write_file(root: &RootDir, relative_path: &str, content: &str) -> Envelope<WriteFileData> {
    tracing::debug!(tool = "write_file", path = relative_path, bytes = content.len());
    write(root, relative_path, content).into()
}

fn write(root: &RootDir, relative_path: &str, content: &str) -> Result<WriteFileData, ToolError> {
    let full = root.resolve(relative_path).map_err(|e| rejection(e, relative_path))?;
    if let Some(parent) = full.parent() {
        fs::create_dir_all(parent)
            .map_err(|e| ToolError::from_io(&e, "Failed to create parent directories.", relative_path))?;
    }
    fs::write(&full, content.as_bytes())
        .map_err(|e| ToolError::from_io(&e, "Failed to write file.", relative_path))?;
    Ok(WriteFileData { path: root.relative(&full), bytes_written: content.len() as u64 })
}

#[derive(Debug, Deserialize)]
struct Params {
    #[serde(alias = "path")]
    relative_path: String,
    content: String,
}

pub struct WriteFileTool {
    root: Arc<RootDir>,
}
impl WriteFileTool {
    pub fn new(root: Arc<RootDir>) -> Self {
        Self { root }
    }
}

#[async_trait]
impl Tool for WriteFileTool {
    fn name(&self) -> &'static str { "write_file" }
    fn description(&self) -> &'static str {
        "Write UTF-8 text to a file inside the notes root, creating parent directories if needed."
    }
    fn capabilities(&self) -> serde_json::Value {
        json!({"input": {"type":"object","required":["relative_path","content"],"properties": {"relative_path": {"type":"string"},"content":{"type":"string"}}}, "output": {"type":"object","properties": {"ok":{"type":"boolean"},"data":{"type":"object","properties":{"path":{"type":"string"},"bytes_written":{"type":"integer"}}},"error":{"type":"object"}}}})
    }
    async fn call(&self, params: serde_json::Value) -> AppResult<serde_json::Value> {
        let p: Params = parse_params(params)?;
        to_value(&write_file(&self.root, &p.relative_path, &p.content))
    }
}
