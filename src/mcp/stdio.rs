//! MCP over stdio: newline-delimited JSON-RPC 2.0 on stdin/stdout.

use crate::{
    errors::AppError,
    mcp::{
        registry::ToolRegistry,
        types::{RpcRequest, RpcResponse},
    },
};
use serde::Deserialize;
use serde_json::{json, Value};
use std::{io, time::Instant};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt, BufReader};

pub const PROTOCOL_VERSION: &str = "2025-06-18";

const PARSE_ERROR: i64 = -32700;
const INVALID_REQUEST: i64 = -32600;
const METHOD_NOT_FOUND: i64 = -32601;

pub async fn serve(registry: ToolRegistry, max_frame_bytes: usize) -> anyhow::Result<()> {
    tracing::info!(tools = ?registry.list_names(), "stdio transport ready");
    serve_io(&registry, tokio::io::stdin(), tokio::io::stdout(), max_frame_bytes).await?;
    tracing::info!("stdin closed, shutting down");
    Ok(())
}

enum Frame {
    Complete,
    Oversized,
    Eof,
}

/// Serves frames from `input` until EOF. Only I/O failures on the streams
/// themselves end the loop; bad frames get an error reply.
pub async fn serve_io<R, W>(registry: &ToolRegistry, input: R, mut output: W, max_frame_bytes: usize) -> io::Result<()>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut reader = BufReader::new(input);
    let mut buf = Vec::new();
    loop {
        let response = match read_frame(&mut reader, &mut buf, max_frame_bytes).await? {
            Frame::Eof => return Ok(()),
            Frame::Oversized => {
                tracing::warn!(limit = max_frame_bytes, "dropping oversized frame");
                Some(RpcResponse::error(
                    Value::Null,
                    INVALID_REQUEST,
                    format!("frame exceeds {max_frame_bytes} bytes"),
                ))
            }
            Frame::Complete if buf.iter().all(u8::is_ascii_whitespace) => None,
            Frame::Complete => handle_frame(registry, &buf).await,
        };
        if let Some(response) = response {
            let mut frame = serde_json::to_vec(&response).map_err(io::Error::other)?;
            frame.push(b'\n');
            output.write_all(&frame).await?;
            output.flush().await?;
        }
    }
}

// Reads at most `limit` bytes of one newline-terminated frame into `buf`.
// Frames over the limit are drained up to their newline and reported.
async fn read_frame<R>(reader: &mut R, buf: &mut Vec<u8>, limit: usize) -> io::Result<Frame>
where
    R: AsyncBufRead + Unpin,
{
    buf.clear();
    let cap = limit as u64 + 1;
    let n = (&mut *reader).take(cap).read_until(b'\n', buf).await?;
    if n == 0 {
        return Ok(Frame::Eof);
    }
    if buf.ends_with(b"\n") || buf.len() <= limit {
        return Ok(Frame::Complete);
    }
    loop {
        buf.clear();
        let n = (&mut *reader).take(cap).read_until(b'\n', buf).await?;
        if n == 0 || buf.ends_with(b"\n") {
            buf.clear();
            return Ok(Frame::Oversized);
        }
    }
}

/// Handles one inbound frame. Notifications yield `None`.
pub async fn handle_frame(registry: &ToolRegistry, frame: &[u8]) -> Option<RpcResponse> {
    let req: RpcRequest = match serde_json::from_slice(frame) {
        Ok(req) => req,
        Err(e) => return Some(RpcResponse::error(Value::Null, PARSE_ERROR, format!("parse error: {e}"))),
    };
    if req.jsonrpc != "2.0" {
        let id = req.id.unwrap_or(Value::Null);
        return Some(RpcResponse::error(id, INVALID_REQUEST, "jsonrpc must be \"2.0\""));
    }

    let Some(id) = req.id else {
        tracing::debug!(method = %req.method, "notification");
        return None;
    };

    let response = match req.method.as_str() {
        "initialize" => RpcResponse::result(id, initialize(&req.params)),
        "ping" => RpcResponse::result(id, json!({})),
        "tools/list" => RpcResponse::result(id, list_tools(registry)),
        "tools/call" => match call_tool(registry, req.params).await {
            Ok(result) => RpcResponse::result(id, result),
            Err(e) => RpcResponse::error(id, e.rpc_code(), e.to_string()),
        },
        other => RpcResponse::error(id, METHOD_NOT_FOUND, format!("method not found: {other}")),
    };
    Some(response)
}

fn initialize(params: &Value) -> Value {
    let version = params
        .get("protocolVersion")
        .and_then(|v| v.as_str())
        .unwrap_or(PROTOCOL_VERSION);
    json!({
        "protocolVersion": version,
        "capabilities": {"tools": {"listChanged": false}},
        "serverInfo": {"name": env!("CARGO_PKG_NAME"), "version": env!("CARGO_PKG_VERSION")},
    })
}

fn list_tools(registry: &ToolRegistry) -> Value {
    let tools: Vec<Value> = registry
        .infos()
        .into_iter()
        .map(|t| json!({"name": t.name, "description": t.description, "inputSchema": t.input_schema}))
        .collect();
    json!({ "tools": tools })
}

#[derive(Debug, Deserialize)]
struct CallParams {
    name: String,
    #[serde(default)]
    arguments: Value,
}

async fn call_tool(registry: &ToolRegistry, params: Value) -> Result<Value, AppError> {
    let started = Instant::now();
    let p: CallParams = serde_json::from_value(params).map_err(|e| AppError::InvalidParams(e.to_string()))?;
    let tool = registry.get(&p.name).ok_or_else(|| AppError::UnknownTool(p.name.clone()))?;
    let envelope = tool.call(p.arguments).await?;

    let ok = envelope["ok"].as_bool().unwrap_or(false);
    tracing::info!(
        transport = "stdio",
        tool = %p.name,
        ok = ok,
        code = envelope["error"]["code"].as_str().unwrap_or("OK"),
        duration_ms = started.elapsed().as_millis() as u64,
        "audit"
    );

    Ok(json!({
        "content": [{"type": "text", "text": envelope.to_string()}],
        "structuredContent": envelope,
        "isError": !ok,
    }))
}
