//! Symbolic equation solver
//!
//! Solves `expression = 0` (or `lhs = rhs`) for one variable. The expression
//! is normalized into a polynomial in the variable whose coefficients may
//! themselves be symbolic:
//!
//! - degree 1 and 2 are solved in closed form for any coefficients
//! - higher degrees with numeric coefficients are reduced by rational roots
//!   until a quadratic remains
//!
//! Numeric solutions are exact (`2*sqrt(2)`, `-1/2 - sqrt(3)*I/2`).

pub mod expr;
pub mod latex;
pub mod parser;
pub mod poly;
pub mod rational;
mod roots;

use thiserror::Error;
use tracing::debug;

use parser::{is_ident_continue, is_ident_start};
use poly::{Poly, MAX_DEGREE};

/// Solver failure; reported to clients as a result, not a fault
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SolveError {
    #[error("Empty equation")]
    EmptyInput,

    #[error("Invalid variable name: {0:?}")]
    InvalidVariable(String),

    #[error("Parse error at position {position}: {message}")]
    Parse { position: usize, message: String },

    #[error("Unsupported equation: {0}")]
    Unsupported(String),

    #[error("Numeric overflow while solving")]
    Overflow,

    #[error("Division by zero")]
    DivisionByZero,
}

/// Roots of the equation plus a LaTeX rendering of the parsed input
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Solution {
    pub solutions: Vec<String>,
    pub latex: String,
}

fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    matches!(chars.next(), Some(c) if is_ident_start(c)) && chars.all(is_ident_continue)
}

/// Solve `equation` for `variable`
pub fn solve(equation: &str, variable: &str) -> Result<Solution, SolveError> {
    if equation.trim().is_empty() {
        return Err(SolveError::EmptyInput);
    }
    if !is_identifier(variable) {
        return Err(SolveError::InvalidVariable(variable.to_string()));
    }

    let parsed = parser::parse(equation)?;
    let latex = latex::render_equation(&parsed);

    let poly = Poly::from_expr(&parsed.zero_form(), variable)?;
    let mut by_degree = poly.by_degree(variable)?;

    // Clear negative powers of the variable by multiplying through
    if let Some(&lowest) = by_degree.keys().next() {
        if lowest < 0 {
            by_degree = by_degree
                .into_iter()
                .map(|(degree, coef)| (degree - lowest, coef))
                .collect();
        }
    }

    let degree = by_degree.keys().next_back().copied().unwrap_or(0);
    if degree > MAX_DEGREE {
        return Err(SolveError::Unsupported(format!(
            "degree {} exceeds {}",
            degree, MAX_DEGREE
        )));
    }
    debug!(equation, variable, degree, "Solving polynomial");

    let numeric: Option<Vec<_>> = (0..=degree)
        .map(|d| match by_degree.get(&d) {
            Some(coef) => coef.as_constant(),
            None => Some(rational::Rational::ZERO),
        })
        .collect();

    let solutions = match numeric {
        Some(coefficients) => roots::numeric_roots(coefficients)?
            .iter()
            .map(ToString::to_string)
            .collect(),
        None => roots::symbolic_roots(&by_degree, degree)?,
    };

    Ok(Solution { solutions, latex })
}
