//! Object label → concept records, with a generic fallback
//!
//! Resolution never fails and never yields an empty sequence: labels with no
//! knowledge base entry receive the single "Structure & Form" concept.

use once_cell::sync::Lazy;
use serde_json::json;
use tracing::debug;

use super::kb::{ConceptRecord, KnowledgeBase, KNOWLEDGE_BASE};

/// Name of the concept returned for unknown objects
pub const FALLBACK_CONCEPT_NAME: &str = "Structure & Form";

static FALLBACK: Lazy<Vec<ConceptRecord>> = Lazy::new(|| {
    vec![ConceptRecord::new(FALLBACK_CONCEPT_NAME, "general")
        .with_overlay("outline", json!({"color": "white"}))
        .with_overlay("label", json!({"text": "Object Detected"}))]
});

/// The fixed fallback sequence (always exactly one concept)
pub fn fallback_concepts() -> &'static [ConceptRecord] {
    &FALLBACK
}

/// Resolve against the built-in knowledge base
pub fn resolve(object_label: &str) -> &'static [ConceptRecord] {
    resolve_in(&KNOWLEDGE_BASE, object_label)
}

/// Resolve against an arbitrary knowledge base.
///
/// The label is lowercased before lookup; matching is otherwise exact.
pub fn resolve_in<'a>(kb: &'a KnowledgeBase, object_label: &str) -> &'a [ConceptRecord] {
    let label = object_label.to_lowercase();
    match kb.lookup(&label) {
        Some(concepts) => {
            debug!(label = %label, count = concepts.len(), "Resolved object");
            concepts
        }
        None => {
            debug!(label = %label, "No knowledge base entry, using fallback concept");
            fallback_concepts()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_label_returns_kb_sequence() {
        let kb = KnowledgeBase::builtin();
        for label in kb.labels() {
            assert_eq!(resolve(label), kb.lookup(label).unwrap());
        }
    }

    #[test]
    fn test_resolve_is_case_insensitive() {
        assert_eq!(resolve("PLANT"), resolve("plant"));
        assert_eq!(resolve("BiCyClE"), resolve("bicycle"));
        assert_eq!(resolve("PLANT")[0].name, "Photosynthesis");
    }

    #[test]
    fn test_unknown_label_returns_fallback() {
        let concepts = resolve("spaceship");

        assert_eq!(concepts.len(), 1);
        let concept = &concepts[0];
        assert_eq!(concept.name, "Structure & Form");
        assert_eq!(concept.category, "general");
        assert!(concept.formulas.is_empty());
        assert_eq!(concept.overlays.len(), 2);
        assert_eq!(concept.overlays[0].kind(), "outline");
        assert_eq!(concept.overlays[1].kind(), "label");
    }

    #[test]
    fn test_fallback_is_deterministic() {
        assert_eq!(resolve("spaceship"), resolve("toaster"));
        assert_eq!(resolve(""), resolve("spaceship"));
        assert!(std::ptr::eq(resolve("a"), resolve("b")));
    }

    #[test]
    fn test_no_partial_matching() {
        assert_eq!(resolve("bicycles"), fallback_concepts());
        assert_eq!(resolve(" bicycle"), fallback_concepts());
    }

    #[test]
    fn test_resolve_in_custom_kb() {
        let kb = KnowledgeBase::from_entries([(
            "lever",
            vec![ConceptRecord::new("Mechanical Advantage", "physics")
                .with_formulas(&["MA = d_effort / d_load"])],
        )]);

        assert_eq!(resolve_in(&kb, "Lever")[0].name, "Mechanical Advantage");
        assert_eq!(resolve_in(&kb, "plant"), fallback_concepts());
    }
}
