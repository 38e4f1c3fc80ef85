// Copyright 2026 Qupid Contributors
// SPDX-License-Identifier: Apache-2.0

//! REST API server implementation using axum.
//!
//! # Endpoints
//!
//! - `POST /api/v1/run` - Simulate one 14-field request (`?plot=false` skips the plot)
//! - `POST /api/v1/analyze-run` - Infer parameters from an uploaded chat log, then simulate
//! - `GET /api/v1/health` - Health check
//! - `GET /api/v1/version` - Get server version

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{Query, State},
    http::{header, HeaderValue, Method, StatusCode},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use super::ServerState;
use crate::analyzer::{analyze_and_run, AnalyzedReport};
use crate::config::{CorsConfig, ServerConfig};
use crate::error::{Error, Result};
use crate::params::SimulationParameters;
use crate::simulation::{run_simulation, RunOutput};
use crate::validation::validate_run_request;

/// REST server for the simulation engine.
pub struct RestServer {
    state: Arc<ServerState>,
}

impl RestServer {
    /// Create a new REST server.
    pub fn new(state: Arc<ServerState>) -> Self {
        Self { state }
    }

    /// Start the REST server.
    pub async fn serve(self, config: &ServerConfig) -> Result<()> {
        let addr: SocketAddr = format!("{}:{}", config.host, config.port)
            .parse()
            .map_err(|e| Error::Config(format!("Invalid REST address: {}", e)))?;

        info!(address = %addr, "Starting REST server");

        let app = router(self.state.clone());
        let mut shutdown_rx = self.state.shutdown_receiver();

        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .map_err(|e| Error::Server(format!("Failed to bind REST server: {}", e)))?;

        axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                let _ = shutdown_rx.changed().await;
                info!("REST server shutting down");
            })
            .await
            .map_err(|e| Error::Server(format!("REST server error: {}", e)))?;

        Ok(())
    }
}

/// Build the API router over shared state.
pub fn router(state: Arc<ServerState>) -> Router {
    Router::new()
        .route("/api/v1/health", get(health_check))
        .route("/api/v1/version", get(get_version))
        .route("/api/v1/run", post(run))
        .route("/api/v1/analyze-run", post(analyze_run))
        .layer(cors_layer(&state.config.server.cors))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn cors_layer(config: &CorsConfig) -> CorsLayer {
    if config.allow_all {
        return CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);
    }

    let origins: Vec<HeaderValue> = config
        .allowed_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE])
}

// =============================================================================
// Request/Response types
// =============================================================================

/// Query options of `/run`.
#[derive(Debug, Deserialize)]
struct RunQuery {
    plot: Option<bool>,
}

/// Health check response.
#[derive(Debug, Serialize)]
struct HealthResponse {
    status: String,
}

/// Version response.
#[derive(Debug, Serialize)]
struct VersionResponse {
    version: String,
    name: String,
}

/// Error response.
#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
    code: String,
}

type ApiError = (StatusCode, Json<ErrorResponse>);

fn api_error(request_id: &Uuid, err: Error) -> ApiError {
    let status = err.status();
    if status.is_server_error() {
        error!(request_id = %request_id, code = err.code(), error = %err, "Request failed");
    } else {
        warn!(request_id = %request_id, code = err.code(), error = %err, "Request rejected");
    }
    (
        status,
        Json(ErrorResponse {
            error: err.to_string(),
            code: err.code().to_string(),
        }),
    )
}

fn join_error(e: tokio::task::JoinError) -> Error {
    Error::Server(format!("simulation task failed: {}", e))
}

// =============================================================================
// Handlers
// =============================================================================

/// Health check endpoint.
async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
    })
}

/// Simulation endpoint.
async fn run(
    State(state): State<Arc<ServerState>>,
    Query(query): Query<RunQuery>,
    Json(body): Json<Value>,
) -> std::result::Result<Json<RunOutput>, ApiError> {
    let request_id = Uuid::new_v4();

    let params = validate_run_request(&body)
        .map(SimulationParameters::from_request)
        .map_err(|e| api_error(&request_id, e))?;

    let want_plot = query.plot.unwrap_or(true);
    let renderer = if want_plot { state.renderer.clone() } else { None };
    let settings = state.config.simulation.clone();

    debug!(
        request_id = %request_id,
        drive_freq = params.drive_freq,
        plot = renderer.is_some(),
        "REST run request"
    );

    let report = tokio::task::spawn_blocking(move || run_simulation(&params, &settings, renderer.as_deref()))
        .await
        .map_err(join_error)
        .and_then(|result| result)
        .map_err(|e| api_error(&request_id, e))?;

    info!(request_id = %request_id, health_score = report.health_score, "REST run complete");
    Ok(Json(report.output()))
}

/// Analyze-then-simulate endpoint; the body is the raw chat export.
async fn analyze_run(
    State(state): State<Arc<ServerState>>,
    body: Bytes,
) -> std::result::Result<Json<AnalyzedReport>, ApiError> {
    let request_id = Uuid::new_v4();

    let analyzer = state.analyzer.clone().ok_or_else(|| {
        api_error(
            &request_id,
            Error::UpstreamAnalyzer("no conversation analyzer configured".to_string()),
        )
    })?;
    let renderer = state.renderer.clone();
    let settings = state.config.simulation.clone();

    debug!(request_id = %request_id, bytes = body.len(), "REST analyze-run request");

    let result = tokio::task::spawn_blocking(move || {
        analyze_and_run(&*analyzer, &body, &settings, renderer.as_deref())
    })
    .await
    .map_err(join_error)
    .and_then(|result| result)
    .map_err(|e| api_error(&request_id, e))?;

    info!(
        request_id = %request_id,
        messages = result.messages_analyzed,
        health_score = result.report.health_score,
        "REST analyze-run complete"
    );
    Ok(Json(result))
}

/// Get version endpoint.
async fn get_version() -> Json<VersionResponse> {
    Json(VersionResponse {
        version: env!("CARGO_PKG_VERSION").to_string(),
        name: "Qupid Floquet Engine".to_string(),
    })
}
