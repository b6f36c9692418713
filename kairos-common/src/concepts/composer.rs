//! Expansion of concept records into the client-facing response views

use serde_json::Value;

use super::kb::ConceptRecord;
use crate::api::{ConceptResponse, ConceptSummary, ModuleDescriptor, OverlayOutput, DEFAULT_DIFFICULTY};

/// Key injected into every overlay output
const CONCEPT_ID_KEY: &str = "concept_id";

/// Deterministic concept id: lowercase name with spaces replaced by underscores.
///
/// Other characters are kept as-is, so `"Structure & Form"` becomes
/// `"structure_&_form"`.
pub fn derive_id(name: &str) -> String {
    name.to_lowercase().replace(' ', "_")
}

/// Expand concepts into `(concepts, overlays, modules)` views.
///
/// Overlays are flattened in concept order, each tagged with its owner's id.
/// An injected `concept_id` replaces any `concept_id` the directive carries.
pub fn compose(concepts: &[ConceptRecord]) -> ConceptResponse {
    let overlay_count = concepts.iter().map(|c| c.overlays.len()).sum();
    let mut response = ConceptResponse {
        concepts: Vec::with_capacity(concepts.len()),
        overlays: Vec::with_capacity(overlay_count),
        modules: Vec::with_capacity(concepts.len()),
    };

    for concept in concepts {
        let id = derive_id(&concept.name);

        response.concepts.push(ConceptSummary {
            id: id.clone(),
            name: concept.name.clone(),
            category: concept.category.clone(),
            formulas: concept.formulas.clone(),
        });

        response
            .overlays
            .extend(concept.overlays.iter().map(|directive| {
                let mut overlay: OverlayOutput = directive.params().clone();
                overlay.insert(CONCEPT_ID_KEY.to_string(), Value::String(id.clone()));
                overlay
            }));

        response.modules.push(ModuleDescriptor {
            id,
            title: concept.name.clone(),
            category: concept.category.clone(),
            formulas: concept.formulas.clone(),
            difficulty: DEFAULT_DIFFICULTY.to_string(),
        });
    }

    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::concepts::{resolve, KnowledgeBase};
    use serde_json::json;

    #[test]
    fn test_derive_id() {
        assert_eq!(derive_id("Torque"), "torque");
        assert_eq!(derive_id("Angular Momentum"), "angular_momentum");
        assert_eq!(derive_id("Structure & Form"), "structure_&_form");
        assert_eq!(derive_id("Newton's Laws"), "newton's_laws");
        assert_eq!(derive_id("Torque"), derive_id("Torque"));
    }

    #[test]
    fn test_view_lengths_for_every_object() {
        let kb = KnowledgeBase::builtin();
        for label in kb.labels() {
            let concepts = resolve(label);
            let response = compose(concepts);

            assert_eq!(response.concepts.len(), concepts.len());
            assert_eq!(response.modules.len(), concepts.len());
            let expected: usize = concepts.iter().map(|c| c.overlays.len()).sum();
            assert_eq!(response.overlays.len(), expected, "overlay count for {label}");
        }
    }

    #[test]
    fn test_overlays_reference_composed_concepts() {
        let response = compose(resolve("bottle"));
        let ids: Vec<_> = response.concepts.iter().map(|c| c.id.as_str()).collect();

        for overlay in &response.overlays {
            let concept_id = overlay["concept_id"].as_str().unwrap();
            assert_eq!(ids.iter().filter(|id| **id == concept_id).count(), 1);
        }
    }

    #[test]
    fn test_bicycle_composition() {
        let response = compose(resolve("bicycle"));

        let ids: Vec<_> = response.concepts.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(
            ids,
            ["torque", "angular_momentum", "mechanical_advantage", "friction"]
        );

        let owners: Vec<_> = response
            .overlays
            .iter()
            .map(|o| o["concept_id"].as_str().unwrap())
            .collect();
        assert_eq!(
            owners,
            [
                "torque",
                "torque",
                "torque",
                "angular_momentum",
                "angular_momentum",
                "mechanical_advantage",
                "mechanical_advantage",
                "friction",
                "friction",
            ]
        );

        // Directive fields pass through alongside the injected id
        let first = &response.overlays[0];
        assert_eq!(first["type"], "vector");
        assert_eq!(first["from"], "pedal");
        assert_eq!(first["rotation"], true);
        assert_eq!(first["color"], "red");
    }

    #[test]
    fn test_modules_mirror_concepts() {
        let response = compose(resolve("plant"));

        for (concept, module) in response.concepts.iter().zip(&response.modules) {
            assert_eq!(module.id, concept.id);
            assert_eq!(module.title, concept.name);
            assert_eq!(module.category, concept.category);
            assert_eq!(module.formulas, concept.formulas);
            assert_eq!(module.difficulty, "intermediate");
        }
    }

    #[test]
    fn test_formulas_pass_through_unchanged() {
        let response = compose(resolve("ball"));
        assert_eq!(
            response.concepts[1].formulas,
            ["½mv₁² + ½mv₂² = ½mv₁'² + ½mv₂'²"]
        );
    }

    #[test]
    fn test_injected_concept_id_wins_on_collision() {
        let concept = ConceptRecord::new("Buoyancy", "physics")
            .with_overlay("arrow", json!({"concept_id": "something_else", "direction": "up"}));

        let response = compose(&[concept]);

        assert_eq!(response.overlays.len(), 1);
        assert_eq!(response.overlays[0]["concept_id"], "buoyancy");
        assert_eq!(response.overlays[0]["direction"], "up");
    }

    #[test]
    fn test_unknown_directive_keys_survive() {
        let concept = ConceptRecord::new("Lens", "physics")
            .with_overlay("ray_trace", json!({"rays": 3, "focal": {"f": 0.05, "unit": "m"}}));

        let response = compose(&[concept]);

        assert_eq!(response.overlays[0]["rays"], 3);
        assert_eq!(response.overlays[0]["focal"]["unit"], "m");
    }

    #[test]
    fn test_empty_input() {
        let response = compose(&[]);
        assert_eq!(response, ConceptResponse::default());
    }
}
