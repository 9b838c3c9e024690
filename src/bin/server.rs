//! Frame Solver HTTP Server

use axum::{
    extract::Json,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Router,
};
use serde::Serialize;
use std::net::SocketAddr;
use tower_http::cors::{Any, CorsLayer};

use anyhow::Context;
use frame_solver::api::{self, AnalysisRequest};
use frame_solver::error::FaultKind;

const DEFAULT_ADDR: &str = "0.0.0.0:8086";

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: String,
    version: String,
}

async fn health() -> impl IntoResponse {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

async fn analyze(Json(request): Json<AnalysisRequest>) -> impl IntoResponse {
    log::info!(
        "Analysis request: {} nodes, {} members, {} loads",
        request.model.nodes.len(),
        request.model.members.len(),
        request.model.loads.len()
    );

    // The solve is CPU-bound; keep it off the async workers
    let response = match tokio::task::spawn_blocking(move || api::run_analysis(&request)).await {
        Ok(response) => response,
        Err(e) => {
            log::error!("Analysis task failed: {}", e);
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(serde_json::json!({
                    "success": false,
                    "error": format!("analysis task failed: {}", e),
                })),
            );
        }
    };

    let status = match response.error_kind {
        None => StatusCode::OK,
        Some(FaultKind::Configuration) | Some(FaultKind::Io) => StatusCode::BAD_REQUEST,
        Some(FaultKind::Singularity) => StatusCode::UNPROCESSABLE_ENTITY,
    };

    let body = serde_json::to_value(&response).unwrap_or_else(|e| {
        serde_json::json!({
            "success": false,
            "error": format!("failed to serialize response: {}", e),
        })
    });
    (status, Json(body))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init();

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = Router::new()
        .route("/health", get(health))
        .route("/api/v1/analyze", post(analyze))
        .layer(cors);

    let addr_str = std::env::var("FRAME_SOLVER_ADDR").unwrap_or_else(|_| DEFAULT_ADDR.to_string());
    let addr: SocketAddr = addr_str
        .parse()
        .with_context(|| format!("invalid FRAME_SOLVER_ADDR: {}", addr_str))?;

    log::info!("Frame Solver Server listening on http://{}", addr);
    log::info!("  Health check: GET  /health");
    log::info!("  Analysis:     POST /api/v1/analyze");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    axum::serve(listener, app).await?;

    Ok(())
}
