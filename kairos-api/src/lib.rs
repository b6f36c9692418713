//! kairos-api library - KAIROS concept service
//!
//! HTTP boundary for concept extraction, equation solving and concept
//! relationship graphs.

use axum::Router;
use kairos_common::concepts::{KnowledgeBase, KNOWLEDGE_BASE};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub mod api;
pub mod error;
pub mod graph;
pub mod solver;

pub use crate::error::{ApiError, ApiResult};

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// Read-only knowledge base used for concept resolution
    pub kb: &'static KnowledgeBase,
}

impl AppState {
    /// Create application state over the given knowledge base
    pub fn new(kb: &'static KnowledgeBase) -> Self {
        Self { kb }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(&KNOWLEDGE_BASE)
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    use axum::routing::{get, post};

    Router::new()
        .route("/api/extract-concepts", post(api::extract_concepts))
        .route("/api/solve-equation", post(api::solve_equation))
        .route("/api/concept-relationships", post(api::concept_relationships))
        .route("/api/buildinfo", get(api::get_build_info))
        .merge(api::health_routes())
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        // Browser clients call from any origin
        .layer(CorsLayer::permissive())
}
