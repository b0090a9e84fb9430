use crate::{errors::AppResult, root::RootDir};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use super::types::{ErrorObj, ToolInfo};

pub type DynTool = Arc<dyn Tool + Send + Sync + 'static>;

#[derive(Clone)]
pub struct ToolRegistry {
    tools: Vec<(String, DynTool)>,
}

impl ToolRegistry {
    pub fn new(root: Arc<RootDir>) -> Self {
        use crate::tools::{
            list_files::ListFilesTool, mkdir::MkdirTool, read_file::ReadFileTool,
            write_file::WriteFileTool,
        };
        let all: Vec<DynTool> = vec![
            Arc::new(ListFilesTool::new(root.clone())),
            Arc::new(ReadFileTool::new(root.clone())),
            Arc::new(WriteFileTool::new(root.clone())),
            Arc::new(MkdirTool::new(root)),
        ];
        let mut tools: Vec<(String, DynTool)> =
            all.into_iter().map(|t| (t.name().to_string(), t)).collect();
        tools.sort_by(|a, b| a.0.cmp(&b.0));
        Self { tools }
    }

    pub fn get(&self, name: &str) -> Option<DynTool> { self.tools.iter().find(|(n, _)| n == name).map(|(_, t)| t.clone()) }
    pub fn list_names(&self) -> Vec<String> { self.tools.iter().map(|(n, _)| n.clone()).collect() }

    pub fn infos(&self) -> Vec<ToolInfo> {
        self.tools
            .iter()
            .map(|(name, tool)| {
                let caps = tool.capabilities();
                ToolInfo {
                    name: name.clone(),
                    description: tool.description().to_string(),
                    input_schema: caps["input"].clone(),
                    output_schema: caps["output"].clone(),
                }
            })
            .collect()
    }
}

#[derive(Debug, Deserialize)]
pub struct CallRequest {
    pub id: String,
    pub tool: String,
    #[serde(default)]
    pub params: serde_json::Value,
}

#[derive(Debug, Serialize)]
pub struct CallResponse {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")] pub result: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")] pub error: Option<ErrorObj>,
}

/// A callable tool. `call` returns the serialized result envelope; `Err` is
/// reserved for arguments that do not fit the tool's input schema.
#[async_trait]
pub trait Tool {
    fn name(&self) -> &'static str;
    fn description(&self) -> &'static str;
    fn capabilities(&self) -> serde_json::Value;
    async fn call(&self, params: serde_json::Value) -> AppResult<serde_json::Value>;
}
