//! Concept resolution and overlay composition
//!
//! Maps a recognized object label to its curated scientific concepts and
//! expands them into the three views consumed by the rendering client.
//!
//! All operations here are pure: the knowledge base is an immutable
//! process-wide value and every response is built fresh per call.

pub mod composer;
pub mod kb;
pub mod resolver;

pub use composer::{compose, derive_id};
pub use kb::{ConceptRecord, KnowledgeBase, OverlayDirective, KNOWLEDGE_BASE};
pub use resolver::{fallback_concepts, resolve, resolve_in, FALLBACK_CONCEPT_NAME};

use tracing::debug;

use crate::api::ConceptResponse;

/// Resolve an object label against the built-in knowledge base and compose
/// its response views.
///
/// `confidence` and `context` are part of the request contract but do not
/// influence resolution.
pub fn extract(object_class: &str, confidence: f64, context: &str) -> ConceptResponse {
    extract_from(&KNOWLEDGE_BASE, object_class, confidence, context)
}

/// [`extract`] against an arbitrary knowledge base
pub fn extract_from(
    kb: &KnowledgeBase,
    object_class: &str,
    confidence: f64,
    context: &str,
) -> ConceptResponse {
    debug!(
        object_class,
        confidence,
        context_len = context.len(),
        "Extracting concepts"
    );
    compose(resolve_in(kb, object_class))
}
