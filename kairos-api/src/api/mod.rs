//! HTTP API handlers for kairos-api

pub mod buildinfo;
pub mod concepts;
pub mod equations;
pub mod health;
pub mod relationships;

pub use buildinfo::get_build_info;
pub use concepts::extract_concepts;
pub use equations::solve_equation;
pub use health::health_routes;
pub use relationships::concept_relationships;
