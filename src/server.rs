//! HTTP server for the documentation-generation endpoint
//!
//! # Endpoints
//!
//! | Method | Path        | Description                                |
//! |--------|-------------|--------------------------------------------|
//! | `POST` | `/api/docs` | Generate documentation for a repository    |
//! | `GET`  | `/health`   | Health check (returns version)             |
//!
//! # Error Contract
//!
//! Every error response is a JSON body:
//!
//! ```json
//! { "error": "No files found in the repository." }
//! ```
//!
//! Deadline failures additionally carry `"isTimeout": true` so clients can
//! suggest retrying with a narrower scope instead of a plain retry.
//! Statuses: 400 (malformed reference or missing URL), 404 (no files),
//! 500 (generation/content failure or misconfiguration), 504 (timeout).
//!
//! # CORS
//!
//! All origins, methods, and headers are permitted to support browser
//! clients.

use std::sync::{Arc, Mutex};

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use chrono::{DateTime, Utc};
use log::{error, info, warn};
use serde::{Deserialize, Serialize};
use tower_http::cors::{Any, CorsLayer};

use crate::cache::{CacheTtl, DocStore, MemoryCache};
use crate::client::GitHubClient;
use crate::config::Config;
use crate::error::{PipelineError, Result};
use crate::generate::GeminiClient;
use crate::pipeline::{ContextOptions, DocPipeline, DocRequest};

/// Shared application state passed to route handlers.
///
/// `pipeline` is `None` when an outbound credential was missing at startup;
/// every generation request then answers 500 without crashing the process.
#[derive(Clone)]
pub struct AppState {
    pipeline: Option<Arc<DocPipeline>>,
}

/// Build the shared state from configuration.
///
/// Credential problems are reported here once and remembered; the server
/// still starts so the health endpoint and error contract stay available.
pub fn build_state(config: &Config) -> AppState {
    let (token, key) = match (config.github_token(), config.gemini_api_key()) {
        (Some(token), Some(key)) => (token, key),
        _ => {
            error!("Missing GitHub token or Gemini API key; generation requests will fail");
            return AppState { pipeline: None };
        }
    };

    let github = match GitHubClient::with_host(token, host_override("REPODOC_GITHUB_HOST")) {
        Ok(client) => Arc::new(client),
        Err(err) => {
            error!("Failed to build GitHub client: {}", err);
            return AppState { pipeline: None };
        }
    };
    let generator = match GeminiClient::with_host(
        key,
        &config.generation,
        host_override("REPODOC_GEMINI_HOST"),
    ) {
        Ok(client) => Arc::new(client),
        Err(err) => {
            error!("Failed to build generation client: {}", err);
            return AppState { pipeline: None };
        }
    };

    let store = match open_store(config) {
        Ok(store) => Some(Arc::new(Mutex::new(store))),
        Err(err) => {
            // Degraded but functional: every request regenerates
            warn!("Durable cache unavailable, continuing without it: {}", err);
            None
        }
    };

    let memory = Arc::new(MemoryCache::new(CacheTtl::EPHEMERAL));
    let pipeline = DocPipeline::new(github, generator, memory, store);

    AppState {
        pipeline: Some(Arc::new(pipeline)),
    }
}

fn open_store(config: &Config) -> std::result::Result<DocStore, crate::error::CacheError> {
    match &config.cache.dir {
        Some(dir) => DocStore::open_at(dir),
        None => DocStore::open(),
    }
}

fn host_override(var: &str) -> Option<String> {
    std::env::var(var).ok().filter(|v| !v.is_empty())
}

/// Start the HTTP server and serve until the process terminates
pub async fn run_server(config: &Config) -> Result<()> {
    let state = build_state(config);

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = Router::new()
        .route("/api/docs", post(handle_generate_docs))
        .route("/health", get(handle_health))
        .layer(cors)
        .with_state(state);

    let bind = &config.server.bind;
    info!("repodoc listening on http://{}", bind);

    let listener = tokio::net::TcpListener::bind(bind).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

// ============ Error response ============

/// JSON error body per the documented contract
#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
    #[serde(rename = "isTimeout", skip_serializing_if = "std::ops::Not::not")]
    is_timeout: bool,
}

/// Internal error type that converts into an HTTP response
struct AppError {
    status: StatusCode,
    body: ErrorBody,
}

impl AppError {
    fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            body: ErrorBody {
                error: message.into(),
                is_timeout: false,
            },
        }
    }
}

impl From<PipelineError> for AppError {
    fn from(err: PipelineError) -> Self {
        Self {
            status: StatusCode::from_u16(err.status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
            body: ErrorBody {
                error: err.to_string(),
                is_timeout: err.is_timeout(),
            },
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}

// ============ GET /health ============

#[derive(Serialize)]
struct HealthResponse {
    status: String,
    version: String,
}

async fn handle_health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

// ============ POST /api/docs ============

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateDocsBody {
    #[serde(default)]
    repo_url: Option<String>,
    #[serde(default)]
    context_options: Option<ContextOptions>,
    #[serde(default)]
    force_refresh: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateDocsResponse {
    documentation: String,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    from_cache: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    cached_at: Option<DateTime<Utc>>,
}

async fn handle_generate_docs(
    State(state): State<AppState>,
    Json(body): Json<GenerateDocsBody>,
) -> std::result::Result<Json<GenerateDocsResponse>, AppError> {
    let repo_url = body
        .repo_url
        .filter(|url| !url.trim().is_empty())
        .ok_or_else(|| AppError::bad_request("Missing repository URL."))?;

    let pipeline = state
        .pipeline
        .as_ref()
        .ok_or_else(|| AppError::from(PipelineError::MissingCredential))?;

    let request = DocRequest {
        repo_url,
        options: body.context_options,
        force_refresh: body.force_refresh,
    };

    let result = pipeline.run(&request).await?;

    Ok(Json(GenerateDocsResponse {
        documentation: result.documentation,
        from_cache: result.from_cache,
        cached_at: result.cached_at,
    }))
}
