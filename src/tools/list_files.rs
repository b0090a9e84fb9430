use crate::{
    errors::AppResult,
    mcp::registry::Tool,
    model::{DirEntry, Envelope, ErrorCode, ListFilesData, ToolError},
    root::{is_missing, RootDir},
    tools::{parse_params, rejection, to_value},
};
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use std::{fs, io, sync::Arc};

/// Lists the immediate children of `subfolder` (the root when empty).
pub fn list_files(root: &RootDir, subfolder: &str) -> Envelope<ListFilesData> {
    tracing::debug!(tool = "list_files", path = subfolder);
    list(root, subfolder).into()
}

fn list(root: &RootDir, subfolder: &str) -> Result<ListFilesData, ToolError> {
    let folder = root.resolve(subfolder).map_err(|e| rejection(e, subfolder))?;
    let meta = fs::metadata(&folder).map_err(|e| {
        if is_missing(&e) {
            ToolError::new(ErrorCode::NotFound, "Folder does not exist.", subfolder)
        } else {
            ToolError::from_io(&e, "Filesystem error.", subfolder)
        }
    })?;
    if !meta.is_dir() {
        return Err(ToolError::new(ErrorCode::NotADirectory, "Provided path is not a directory.", subfolder));
    }

    let listing_failed = |e: io::Error| ToolError::from_io(&e, "Failed to list directory.", subfolder);
    let mut entries = Vec::new();
    for entry in fs::read_dir(&folder).map_err(listing_failed)? {
        let entry = entry.map_err(listing_failed)?;
        // follow symlinks like a plain stat; a dangling link reports as itself
        let meta = fs::metadata(entry.path())
            .or_else(|_| entry.metadata())
            .map_err(listing_failed)?;
        entries.push(DirEntry {
            name: entry.file_name().to_string_lossy().into_owned(),
            is_dir: meta.is_dir(),
            size_bytes: meta.is_file().then(|| meta.len()),
        });
    }

    Ok(ListFilesData { folder: root.relative(&folder), entries })
}

#[derive(Debug, Deserialize)]
struct Params {
    #[serde(default)]
    subfolder: Option<String>,
}

pub struct ListFilesTool { root: Arc<RootDir> }

impl ListFilesTool { pub fn new(root: Arc<RootDir>) -> Self { Self { root } } }

#[async_trait]
impl Tool for ListFilesTool {
    fn name(&self) -> &'static str { "list_files" }
    fn description(&self) -> &'static str {
        "List files and directories inside a subfolder of the notes root. Paths are relative to the root and cannot escape it."
    }
    fn capabilities(&self) -> serde_json::Value {
        json!({"input": {"type":"object","properties": {"subfolder": {"type":"string","default":""}}}, "output": {"type":"object","properties": {"ok":{"type":"boolean"},"data":{"type":"object","properties":{"folder":{"type":"string"},"entries":{"type":"array","items":{"type":"object","properties":{"name":{"type":"string"},"is_dir":{"type":"boolean"},"size_bytes":{"type":"integer"}}}}}},"error":{"type":"object"}}}})
    }
    async fn call(&self, params: serde_json::Value) -> AppResult<serde_json::Value> {
        let p: Params = parse_params(params)?;
        to_value(&list_files(&self.root, p.subfolder.as_deref().unwrap_or_default()))
    }
}
