//! HTTP search server.
//!
//! # Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | `GET`  | `/?id=<digits>` | Cases similar to the given case |
//! | `GET`  | `/?q=<text>` | Cases similar to free text |
//! | `GET`  | `/` | The search page (`server.index_html`) |
//! | `GET`  | `/health` | Health check (returns version) |
//!
//! Search responses are `{"similarity": [...], "documents": {...}}`.
//!
//! # Error Contract
//!
//! ```json
//! { "error": { "code": "bad_request", "message": "id must be 1-30 digits" } }
//! ```
//!
//! Error codes: `bad_request` (400), `not_found` (404), `internal` (500).
//!
//! # CORS
//!
//! All origins, methods, and headers are permitted so a browser page served
//! from elsewhere can query the API.

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tracing::{error, info};

use crate::config::Config;
use crate::search::SearchEngine;

#[derive(Clone)]
struct AppState {
    engine: Arc<SearchEngine>,
    limit: usize,
    index_html: Arc<PathBuf>,
}

/// Build the engine, bind `[server].bind`, and serve until terminated.
pub async fn run_server(config: &Config) -> anyhow::Result<()> {
    let engine = SearchEngine::from_config(config, None).await?;
    let app = router(
        engine,
        config.retrieval.final_limit,
        config.server.index_html.clone(),
    );

    let listener = tokio::net::TcpListener::bind(&config.server.bind).await?;
    info!(bind = %config.server.bind, "search server listening");
    println!("Search server listening on http://{}", config.server.bind);

    axum::serve(listener, app).await?;
    Ok(())
}

pub fn router(engine: SearchEngine, limit: usize, index_html: PathBuf) -> Router {
    let state = AppState {
        engine: Arc::new(engine),
        limit,
        index_html: Arc::new(index_html),
    };

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(handle_root))
        .route("/health", get(handle_health))
        .layer(cors)
        .with_state(state)
}

// ============ Error response ============

#[derive(Serialize)]
struct ErrorBody {
    error: ErrorDetail,
}

#[derive(Serialize)]
struct ErrorDetail {
    code: String,
    message: String,
}

struct AppError {
    status: StatusCode,
    code: &'static str,
    message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error: ErrorDetail {
                code: self.code.to_string(),
                message: self.message,
            },
        };
        (self.status, Json(body)).into_response()
    }
}

fn bad_request(message: impl Into<String>) -> AppError {
    AppError {
        status: StatusCode::BAD_REQUEST,
        code: "bad_request",
        message: message.into(),
    }
}

fn not_found(message: impl Into<String>) -> AppError {
    AppError {
        status: StatusCode::NOT_FOUND,
        code: "not_found",
        message: message.into(),
    }
}

fn internal(message: impl Into<String>) -> AppError {
    AppError {
        status: StatusCode::INTERNAL_SERVER_ERROR,
        code: "internal",
        message: message.into(),
    }
}

// ============ GET / ============

#[derive(Deserialize)]
struct SearchParams {
    id: Option<String>,
    q: Option<String>,
}

/// `id` is accepted as 1 to 30 ASCII digits.
fn is_valid_id(id: &str) -> bool {
    (1..=30).contains(&id.len()) && id.bytes().all(|b| b.is_ascii_digit())
}

async fn handle_root(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<Response, AppError> {
    let query = match (params.id.filter(|s| !s.is_empty()), params.q) {
        (Some(id), _) => {
            if !is_valid_id(&id) {
                return Err(bad_request(
                    "Invalid id format. ID must be numeric and max 30 digits.",
                ));
            }
            id
        }
        (None, Some(q)) if !q.trim().is_empty() => q,
        _ => return serve_index(&state.index_html).await,
    };

    match state.engine.search(&query, state.limit).await {
        Ok(response) => Ok(Json(response).into_response()),
        Err(e) => {
            error!(error = %e, "search failed");
            Err(internal(format!("{:#}", e)))
        }
    }
}

async fn serve_index(path: &Path) -> Result<Response, AppError> {
    match tokio::fs::read_to_string(path).await {
        Ok(html) => Ok(Html(html).into_response()),
        Err(_) => Err(not_found("index.html not found")),
    }
}

// ============ GET /health ============

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

async fn handle_health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}
