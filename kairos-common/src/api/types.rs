//! Shared API request/response types
//!
//! The concept extraction contract consumed by the rendering client:
//! a request naming a recognized object, and a response carrying three
//! aligned views (concepts, overlays, modules) of the resolved concepts.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::{Error, Result};

/// Difficulty assigned to every learning module
pub const DEFAULT_DIFFICULTY: &str = "intermediate";

// ========================================
// Request Types
// ========================================

/// Concept extraction request
///
/// # Examples
///
/// ```
/// use kairos_common::api::types::ConceptRequest;
///
/// let request: ConceptRequest =
///     serde_json::from_str(r#"{"object_class": "bicycle", "confidence": 0.92}"#).unwrap();
///
/// assert_eq!(request.object_class, "bicycle");
/// assert_eq!(request.context, "");
/// ```
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ConceptRequest {
    /// Detected object label (matched case-insensitively)
    pub object_class: String,

    /// Detector confidence in `[0.0, 1.0]`; accepted but not used for resolution
    pub confidence: f64,

    /// Free-form scene context; accepted but not used for resolution
    #[serde(default)]
    pub context: String,
}

impl ConceptRequest {
    /// Basic range check on confidence
    pub fn validate(&self) -> Result<()> {
        if !self.confidence.is_finite() || !(0.0..=1.0).contains(&self.confidence) {
            return Err(Error::InvalidInput(format!(
                "confidence must be within [0.0, 1.0], got {}",
                self.confidence
            )));
        }
        Ok(())
    }
}

// ========================================
// Response Types
// ========================================

/// Summary of one resolved concept
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ConceptSummary {
    pub id: String,
    pub name: String,
    pub category: String,
    pub formulas: Vec<String>,
}

/// One overlay instruction tagged with its owning concept's `concept_id`
pub type OverlayOutput = Map<String, Value>;

/// Learning module descriptor for one resolved concept
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ModuleDescriptor {
    pub id: String,
    pub title: String,
    pub category: String,
    pub formulas: Vec<String>,
    pub difficulty: String,
}

/// Concept extraction response
///
/// `modules` always has the same length as `concepts`; `overlays` holds every
/// directive of every concept, grouped by concept in resolution order.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct ConceptResponse {
    pub concepts: Vec<ConceptSummary>,
    pub overlays: Vec<OverlayOutput>,
    pub modules: Vec<ModuleDescriptor>,
}

// ========================================
// Tests
// ========================================
