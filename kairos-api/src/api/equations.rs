//! Equation solving endpoint

use axum::{extract::rejection::QueryRejection, extract::Query, Json};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{ApiError, ApiResult};
use crate::solver;

/// Query parameters for equation solving
#[derive(Debug, Deserialize)]
pub struct SolveQuery {
    /// Expression set equal to zero, or `lhs = rhs`
    pub equation: String,

    /// Variable to solve for
    #[serde(default = "default_variable")]
    pub variable: String,
}

fn default_variable() -> String {
    "x".to_string()
}

/// Outcome of a solve request
///
/// Solver failures are returned as a result carrying the original equation,
/// not as an HTTP error.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum SolveResponse {
    Solved {
        equation: String,
        variable: String,
        solutions: Vec<String>,
        latex: String,
    },
    Failed {
        error: String,
        equation: String,
    },
}

/// POST /api/solve-equation?equation=x**2-4&variable=x
pub async fn solve_equation(
    query: Result<Query<SolveQuery>, QueryRejection>,
) -> ApiResult<Json<SolveResponse>> {
    let Query(query) = query.map_err(|e| ApiError::BadRequest(e.body_text()))?;

    // CPU-bound; kept off the async workers
    let outcome = tokio::task::spawn_blocking({
        let equation = query.equation.clone();
        let variable = query.variable.clone();
        move || solver::solve(&equation, &variable)
    })
    .await
    .map_err(|e| ApiError::Internal(format!("Solver task join error: {}", e)))?;

    let response = match outcome {
        Ok(solution) => {
            debug!(
                equation = %query.equation,
                solutions = solution.solutions.len(),
                "Solved equation"
            );
            SolveResponse::Solved {
                equation: query.equation,
                variable: query.variable,
                solutions: solution.solutions,
                latex: solution.latex,
            }
        }
        Err(e) => {
            warn!("Failed to solve {:?} for {}: {}", query.equation, query.variable, e);
            SolveResponse::Failed {
                error: e.to_string(),
                equation: query.equation,
            }
        }
    };

    Ok(Json(response))
}
