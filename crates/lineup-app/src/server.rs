// HTTP surface: health check plus on-demand lineup checks.

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Serialize;
use serde_json::json;
use tower_http::trace::TraceLayer;
use tracing::{error, info};

use lineup_core::format::Counts;
use lineup_core::pipeline::FailedAlert;

use crate::runner::{CheckMode, CheckReport, Runner, RunnerError};

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

#[derive(Debug, Serialize)]
pub struct SendResponse {
    pub counts: Counts,
    pub sent: usize,
    pub failed: Vec<FailedAlert>,
}

impl IntoResponse for RunnerError {
    fn into_response(self) -> Response {
        let status = match &self {
            RunnerError::Busy { .. } => StatusCode::CONFLICT,
            RunnerError::Pipeline(_) => StatusCode::BAD_GATEWAY,
        };
        if status == StatusCode::BAD_GATEWAY {
            error!("on-demand check failed: {self}");
        }
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

async fn dry_run_check(State(runner): State<Arc<Runner>>) -> Result<Json<CheckReport>, RunnerError> {
    let report = runner.check(CheckMode::DryRun).await?;
    Ok(Json(report))
}

async fn send_check(State(runner): State<Arc<Runner>>) -> Result<Json<SendResponse>, RunnerError> {
    let report = runner.check(CheckMode::Send).await?;
    let dispatch = report.dispatch.unwrap_or_default();
    Ok(Json(SendResponse {
        counts: report.counts,
        sent: dispatch.sent,
        failed: dispatch.failed,
    }))
}

pub fn router(runner: Arc<Runner>) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/check", get(dry_run_check))
        .route("/check/send", post(send_check))
        .layer(TraceLayer::new_for_http())
        .with_state(runner)
}

/// Serve until `shutdown` resolves.
pub async fn serve<F>(runner: Arc<Runner>, addr: SocketAddr, shutdown: F) -> anyhow::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind HTTP server on {addr}"))?;
    info!("HTTP server listening on {}", listener.local_addr()?);

    axum::serve(listener, router(runner))
        .with_graceful_shutdown(shutdown)
        .await
        .context("HTTP server error")
}
