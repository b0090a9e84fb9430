use crate::{
    config::Config,
    errors::{into_response, AppError},
    mcp::{
        registry::{CallRequest, CallResponse, ToolRegistry},
        types::{Capabilities, ErrorObj},
    },
    security::{self, RateLimiters},
};
use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::json;
use std::sync::Arc;
use tower_http::{limit::RequestBodyLimitLayer, trace::TraceLayer};

#[derive(Clone)]
pub struct AppState {
    pub cfg: Arc<Config>,
    pub registry: Arc<ToolRegistry>,
    pub rls: RateLimiters,
}

impl AppState {
    pub fn new(cfg: Config, registry: ToolRegistry) -> Self {
        let rls = RateLimiters::new(cfg.limits.requests_per_second, cfg.limits.burst);
        Self { cfg: Arc::new(cfg), registry: Arc::new(registry), rls }
    }
}

pub async fn serve(cfg: Config, registry: ToolRegistry) -> anyhow::Result<()> {
    let shared = AppState::new(cfg, registry);
    let addr = format!("{}:{}", shared.cfg.server.bind_addr, shared.cfg.server.port);
    let app = build_router(shared);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(addr = %listener.local_addr()?, "http transport listening");
    axum::serve(listener, app).await?;
    Ok(())
}

pub fn build_router(shared: AppState) -> Router {
    let base = shared.cfg.server.base_path.trim_end_matches('/').to_string();
    let limit_bytes = shared.cfg.limits.max_request_kb * 1024;
    Router::new()
        .route("/healthz", get(health))
        .route(&format!("{base}/capabilities"), get(capabilities))
        .route(
            &format!("{base}/call"),
            post(call).layer(RequestBodyLimitLayer::new(limit_bytes)),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(shared)
}

async fn health() -> impl IntoResponse {
    (StatusCode::OK, Json(json!({"status":"ok"})))
}

async fn capabilities(State(state): State<AppState>) -> Response {
    let caps = Capabilities {
        mcp_version: "1.0",
        server: env!("CARGO_PKG_NAME"),
        version: env!("CARGO_PKG_VERSION"),
        tools: state.registry.infos(),
    };
    (StatusCode::OK, Json(caps)).into_response()
}

async fn call(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(req): Json<CallRequest>,
) -> Response {
    use std::time::Instant;
    let started = Instant::now();
    let request_id = uuid::Uuid::new_v4().to_string();

    let admitted = security::content_length_ok(&headers, state.cfg.limits.max_request_kb)
        .and_then(|()| state.rls.check());
    if let Err(e) = admitted {
        audit(&request_id, &req.tool, "deny", e.code(), started.elapsed().as_millis() as u64, 0);
        return into_response(e).into_response();
    }

    let outcome = match state.registry.get(&req.tool) {
        Some(tool) => tool.call(req.params).await,
        None => Err(AppError::UnknownTool(req.tool.clone())),
    };

    match outcome {
        Ok(result) => {
            let code = envelope_code(&result).to_string();
            let body = CallResponse { id: req.id, result: Some(result), error: None };
            let bytes_out = serde_json::to_vec(&body).map(|v| v.len()).unwrap_or(0) as u64;
            audit(&request_id, &req.tool, "allow", &code, started.elapsed().as_millis() as u64, bytes_out);
            (StatusCode::OK, Json(body)).into_response()
        }
        Err(e) => {
            let body = CallResponse {
                id: req.id,
                result: None,
                error: Some(ErrorObj { code: e.code().to_string(), message: e.to_string() }),
            };
            audit(&request_id, &req.tool, "error", e.code(), started.elapsed().as_millis() as u64, 0);
            (e.status(), Json(body)).into_response()
        }
    }
}

/// `"OK"` for a successful envelope, otherwise its error code.
fn envelope_code(envelope: &serde_json::Value) -> &str {
    if envelope["ok"].as_bool().unwrap_or(false) {
        "OK"
    } else {
        envelope["error"]["code"].as_str().unwrap_or("UNKNOWN")
    }
}

fn audit(request_id: &str, tool: &str, decision: &str, code: &str, duration_ms: u64, bytes_out: u64) {
    tracing::info!(
        request_id = request_id,
        transport = "http",
        tool = tool,
        decision = decision,
        code = code,
        duration_ms = duration_ms,
        bytes_out = bytes_out,
        "audit"
    );
}
