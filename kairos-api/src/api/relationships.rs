//! Concept relationship graph endpoint

use axum::{extract::rejection::JsonRejection, Json};
use tracing::debug;

use crate::error::ApiResult;
use crate::graph::{build_graph, ConceptGraph};

/// POST /api/concept-relationships
///
/// Body is a JSON array of concept ids, e.g. `["torque", "angular_momentum"]`.
pub async fn concept_relationships(
    payload: Result<Json<Vec<String>>, JsonRejection>,
) -> ApiResult<Json<ConceptGraph>> {
    let Json(concepts) = payload?;

    let graph = build_graph(&concepts);
    debug!(
        nodes = graph.nodes.len(),
        edges = graph.edges.len(),
        "Built concept graph"
    );

    Ok(Json(graph))
}
