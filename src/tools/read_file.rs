use crate::{
    errors::AppResult,
    mcp::registry::Tool,
    model::{Envelope, ErrorCode, ReadFileData, ToolError},
    root::{is_missing, RootDir},
    tools::{parse_params, rejection, to_value},
};
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use std::{fs, sync::Arc};

/// Reads a whole UTF-8 text file.
pub fn read_file(root: &RootDir, relative_path: &str) -> Envelope<ReadFileData> {
    tracing::debug!(tool = "read_file", path = relative_path);
    read(root, relative_path).into()
}

fn read(root: &RootDir, relative_path: &str) -> Result<ReadFileData, ToolError> {
    let full = root.resolve(relative_path).map_err(|e| rejection(e, relative_path))?;
    let meta = fs::metadata(&full).map_err(|e| {
        if is_missing(&e) {
            ToolError::new(ErrorCode::NotFound, "File does not exist.", relative_path)
        } else {
            ToolError::from_io(&e, "Filesystem error.", relative_path)
        }
    })?;
    if !meta.is_file() {
        return Err(ToolError::new(ErrorCode::NotAFile, "Provided path is not a file.", relative_path));
    }

    let bytes = fs::read(&full).map_err(|e| ToolError::from_io(&e, "Failed to read file.", relative_path))?;
    let size_bytes = bytes.len() as u64;
    let content = String::from_utf8(bytes).map_err(|e| ToolError {
        details: Some(json!({ "valid_up_to": e.utf8_error().valid_up_to() })),
        ..ToolError::new(ErrorCode::DecodeError, "File is not valid UTF-8 text.", relative_path)
    })?;

    Ok(ReadFileData { path: root.relative(&full), size_bytes, content })
}

#[derive(Debug, Deserialize)]
struct Params {
    #[serde(alias = "path")]
    relative_path: String,
}

pub struct ReadFileTool { root: Arc<RootDir> }

impl ReadFileTool { pub fn new(root: Arc<RootDir>) -> Self { Self { root } } }

#[async_trait]
impl Tool for ReadFileTool {
    fn name(&self) -> &'static str { "read_file" }
    fn description(&self) -> &'static str { "Read a UTF-8 text file inside the notes root." }
    fn capabilities(&self) -> serde_json::Value {
        json!({"input": {"type":"object","required":["relative_path"],"properties": {"relative_path": {"type":"string"}}}, "output": {"type":"object","properties": {"ok":{"type":"boolean"},"data":{"type":"object","properties":{"path":{"type":"string"},"size_bytes":{"type":"integer"},"content":{"type":"string"}}},"error":{"type":"object"}}}})
    }
    async fn call(&self, params: serde_json::Value) -> AppResult<serde_json::Value> {
        let p: Params = parse_params(params)?;
        to_value(&read_file(&self.root, &p.relative_path))
    }
}
