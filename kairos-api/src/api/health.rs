//! Service identification and health check endpoints

use axum::{routing::get, Json, Router};
use serde::Serialize;

use crate::AppState;

/// Public service name reported by `/` and `/api/health`
pub const SERVICE_NAME: &str = "KAIROS 2.0 Backend";

/// API version reported by `/`
pub const API_VERSION: &str = "2.0.0";

/// Root response identifying the API
#[derive(Debug, Serialize)]
pub struct ServiceInfo {
    pub message: String,
    pub version: String,
    pub status: String,
}

/// API health response
#[derive(Debug, Serialize)]
pub struct ApiHealth {
    pub status: String,
    pub service: String,
}

/// Module health response: status, module name, and crate version
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub module: String,
    pub version: String,
}

/// GET /
pub async fn service_info() -> Json<ServiceInfo> {
    Json(ServiceInfo {
        message: format!("{} API", SERVICE_NAME),
        version: API_VERSION.to_string(),
        status: "active".to_string(),
    })
}

/// GET /api/health
pub async fn api_health() -> Json<ApiHealth> {
    Json(ApiHealth {
        status: "healthy".to_string(),
        service: SERVICE_NAME.to_string(),
    })
}

/// GET /health
///
/// Health check endpoint for process monitoring.
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        module: "kairos-api".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Build health check routes
pub fn health_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(service_info))
        .route("/health", get(health_check))
        .route("/api/health", get(api_health))
}
