//! Serve command handler.
//!
//! Exposes the answer pipeline over HTTP.

use super::build_pipeline;
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use clap::Args;
use docqa_core::{config::AppConfig, AppError, AppResult};
use docqa_engine::{Pipeline, ProcessResponse, RuntimeRequest};
use serde::Serialize;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

const SERVICE_NAME: &str = "docqa";

/// Run the HTTP service
#[derive(Args, Debug)]
pub struct ServeCommand {
    /// Address to listen on (default from config, 0.0.0.0:8001)
    #[arg(long, env = "DOCQA_BIND")]
    pub bind: Option<String>,
}

struct AppState {
    pipeline: Result<Pipeline, String>,
    provider: String,
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    service: &'static str,
    provider: String,
    provider_configured: bool,
}

#[derive(Serialize)]
struct ServiceInfo {
    service: &'static str,
    version: &'static str,
    stages: [&'static str; 3],
}

/// Error body returned by the HTTP service.
struct ApiError(AppError);

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = if self.0.is_not_found() {
            tracing::debug!(message = %self.0, "Client error");
            StatusCode::NOT_FOUND
        } else {
            tracing::error!(message = %self.0, "Server error");
            StatusCode::INTERNAL_SERVER_ERROR
        };

        let body = serde_json::json!({ "detail": self.0.to_string() });
        (status, Json(body)).into_response()
    }
}

impl ServeCommand {
    /// Execute the serve command.
    pub async fn execute(&self, config: &AppConfig) -> AppResult<()> {
        let bind = self
            .bind
            .clone()
            .unwrap_or_else(|| config.server.bind.clone());

        // Start even without a usable provider so /health can report it
        let pipeline = build_pipeline(config).map_err(|e| {
            tracing::warn!("Reasoning service not configured: {}", e);
            e.to_string()
        });

        let state = Arc::new(AppState {
            pipeline,
            provider: config.provider.clone(),
        });

        let listener = tokio::net::TcpListener::bind(&bind).await?;
        tracing::info!("DocQA service listening on http://{}", bind);

        axum::serve(listener, router(state)).await?;
        Ok(())
    }
}

fn router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .route("/api/process", post(process))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

async fn root() -> Json<ServiceInfo> {
    Json(ServiceInfo {
        service: SERVICE_NAME,
        version: env!("CARGO_PKG_VERSION"),
        stages: [
            "Draft answer from documents",
            "Condense the draft",
            "Adjudicate and evaluate the final answer",
        ],
    })
}

async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        service: SERVICE_NAME,
        provider: state.provider.clone(),
        provider_configured: state.pipeline.is_ok(),
    })
}

async fn process(
    State(state): State<Arc<AppState>>,
    Json(request): Json<RuntimeRequest>,
) -> Result<Json<ProcessResponse>, ApiError> {
    let pipeline = state.pipeline.as_ref().map_err(|reason| {
        AppError::Config(format!("Reasoning service is not configured: {}", reason))
    })?;

    let response = pipeline.process(&request).await?;
    Ok(Json(response))
}
