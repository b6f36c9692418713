//! Concept extraction endpoint

use axum::{extract::rejection::JsonRejection, extract::State, Json};
use kairos_common::api::{ConceptRequest, ConceptResponse};
use kairos_common::concepts::extract_from;
use tracing::{debug, warn};

use crate::error::ApiResult;
use crate::AppState;

/// POST /api/extract-concepts
///
/// Resolves the detected object against the knowledge base and returns the
/// concept, overlay and module views. Unknown objects receive the generic
/// fallback concept rather than an error.
pub async fn extract_concepts(
    State(state): State<AppState>,
    payload: Result<Json<ConceptRequest>, JsonRejection>,
) -> ApiResult<Json<ConceptResponse>> {
    let Json(request) = payload.inspect_err(|e| warn!("Rejected concept request: {}", e))?;
    request
        .validate()
        .inspect_err(|e| warn!("Rejected concept request: {}", e))?;

    let response = extract_from(
        state.kb,
        &request.object_class,
        request.confidence,
        &request.context,
    );
    debug!(
        concepts = response.concepts.len(),
        overlays = response.overlays.len(),
        "Composed concept response"
    );

    Ok(Json(response))
}
