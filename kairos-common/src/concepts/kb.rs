//! Static concept knowledge base
//!
//! A read-only catalog mapping lowercase object labels to their ordered
//! concept records. Built once on first access and never mutated.

use std::collections::HashMap;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

use crate::Error;

/// Process-wide built-in knowledge base
pub static KNOWLEDGE_BASE: Lazy<KnowledgeBase> = Lazy::new(KnowledgeBase::builtin);

/// Key holding the directive discriminant
const TYPE_KEY: &str = "type";

/// One rendering instruction attached to a concept
///
/// Only `type` is required. Every other key is directive-specific and passed
/// through to the renderer untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Map<String, Value>", into = "Map<String, Value>")]
pub struct OverlayDirective {
    params: Map<String, Value>,
}

impl OverlayDirective {
    /// Create a directive of the given type.
    ///
    /// `params` is expected to be a JSON object; any other value contributes
    /// no parameters. A `type` key inside `params` is overridden by `kind`.
    pub fn new(kind: &str, params: Value) -> Self {
        let mut map = match params {
            Value::Object(map) => map,
            _ => Map::new(),
        };
        map.insert(TYPE_KEY.to_string(), Value::String(kind.to_string()));
        Self { params: map }
    }

    /// Directive discriminant (`"label"`, `"vector"`, ...)
    pub fn kind(&self) -> &str {
        self.params
            .get(TYPE_KEY)
            .and_then(Value::as_str)
            .unwrap_or_default()
    }

    /// Look up a single parameter
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.params.get(key)
    }

    /// All parameters, including `type`
    pub fn params(&self) -> &Map<String, Value> {
        &self.params
    }
}

impl TryFrom<Map<String, Value>> for OverlayDirective {
    type Error = Error;

    fn try_from(params: Map<String, Value>) -> Result<Self, Self::Error> {
        match params.get(TYPE_KEY) {
            Some(Value::String(kind)) if !kind.is_empty() => Ok(Self { params }),
            _ => Err(Error::InvalidInput(
                "overlay directive requires a non-empty string `type`".to_string(),
            )),
        }
    }
}

impl From<OverlayDirective> for Map<String, Value> {
    fn from(directive: OverlayDirective) -> Self {
        directive.params
    }
}

/// One scientific concept with its formulas and overlay directives
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConceptRecord {
    pub name: String,
    pub category: String,
    #[serde(default)]
    pub formulas: Vec<String>,
    #[serde(default)]
    pub overlays: Vec<OverlayDirective>,
}

impl ConceptRecord {
    pub fn new(name: &str, category: &str) -> Self {
        Self {
            name: name.to_string(),
            category: category.to_string(),
            formulas: Vec::new(),
            overlays: Vec::new(),
        }
    }

    pub fn with_formulas(mut self, formulas: &[&str]) -> Self {
        self.formulas = formulas.iter().map(|f| f.to_string()).collect();
        self
    }

    pub fn with_overlay(mut self, kind: &str, params: Value) -> Self {
        self.overlays.push(OverlayDirective::new(kind, params));
        self
    }
}

/// Catalog of object label → ordered concept records
#[derive(Debug, Clone, Default)]
pub struct KnowledgeBase {
    entries: HashMap<String, Vec<ConceptRecord>>,
}

impl KnowledgeBase {
    /// Build a knowledge base from `(label, concepts)` pairs.
    ///
    /// Labels are stored lowercase. A repeated label replaces the earlier entry.
    pub fn from_entries<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = (S, Vec<ConceptRecord>)>,
        S: AsRef<str>,
    {
        let entries = entries
            .into_iter()
            .map(|(label, concepts)| (label.as_ref().to_lowercase(), concepts))
            .collect();
        Self { entries }
    }

    /// Exact-match lookup of an already-lowercased label
    pub fn lookup(&self, label: &str) -> Option<&[ConceptRecord]> {
        self.entries.get(label).map(Vec::as_slice)
    }

    /// Known object labels, sorted
    pub fn labels(&self) -> Vec<&str> {
        let mut labels: Vec<&str> = self.entries.keys().map(String::as_str).collect();
        labels.sort_unstable();
        labels
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The curated catalog shipped with the service
    pub fn builtin() -> Self {
        Self::from_entries([
            ("plant", plant()),
            ("bicycle", bicycle()),
            ("bottle", bottle()),
            ("ball", ball()),
            ("car", car()),
        ])
    }
}

fn plant() -> Vec<ConceptRecord> {
    vec![
        ConceptRecord::new("Photosynthesis", "biology")
            .with_formulas(&["6CO2 + 6H2O + light → C6H12O6 + 6O2"])
            .with_overlay("flow", json!({"from": "CO2", "to": "O2", "color": "green"}))
            .with_overlay("label", json!({"text": "Chlorophyll", "position": "leaf"}))
            .with_overlay("arrow", json!({"direction": "up", "label": "Transpiration"})),
        ConceptRecord::new("Diffusion", "chemistry")
            .with_formulas(&["J = -D * (dC/dx)"])
            .with_overlay("particles", json!({"movement": "random", "color": "blue"}))
            .with_overlay("gradient", json!({"from": "high", "to": "low"})),
        ConceptRecord::new("Osmosis", "biology")
            .with_formulas(&["π = iMRT"])
            .with_overlay("membrane", json!({"semipermeable": true}))
            .with_overlay("flow", json!({"substance": "water", "direction": "in"})),
    ]
}

fn bicycle() -> Vec<ConceptRecord> {
    vec![
        ConceptRecord::new("Torque", "physics")
            .with_formulas(&["τ = r × F", "τ = I * α"])
            .with_overlay("vector", json!({"from": "pedal", "rotation": true, "color": "red"}))
            .with_overlay("arc", json!({"radius": "r", "force": "F"}))
            .with_overlay("label", json!({"text": "τ = r × F", "position": "pedal"})),
        ConceptRecord::new("Angular Momentum", "physics")
            .with_formulas(&["L = I * ω", "L = r × p"])
            .with_overlay("rotation", json!({"axis": "wheel", "color": "purple"}))
            .with_overlay("vector", json!({"circular": true, "label": "ω"})),
        ConceptRecord::new("Mechanical Advantage", "physics")
            .with_formulas(&["MA = output force / input force", "MA = r2 / r1"])
            .with_overlay("gear_ratio", json!({"input": "pedal", "output": "wheel"}))
            .with_overlay("label", json!({"text": "Gear Ratio", "position": "chain"})),
        ConceptRecord::new("Friction", "physics")
            .with_formulas(&["f = μ * N"])
            .with_overlay("heatmap", json!({"zones": ["tire", "brake"], "color": "orange"}))
            .with_overlay("vector", json!({"direction": "opposite", "label": "Friction Force"})),
    ]
}

fn bottle() -> Vec<ConceptRecord> {
    vec![
        ConceptRecord::new("Volume & Surface Area", "geometry")
            .with_formulas(&["V = π * r² * h", "SA = 2πr² + 2πrh"])
            .with_overlay("dimension", json!({"labels": ["r", "h"], "color": "cyan"}))
            .with_overlay("highlight", json!({"area": "surface", "opacity": 0.3})),
        ConceptRecord::new("Pressure", "physics")
            .with_formulas(&["P = F / A", "P = ρgh"])
            .with_overlay("stress_points", json!({"color": "red", "intensity": "high"}))
            .with_overlay(
                "gradient",
                json!({"from": "bottom", "to": "top", "label": "Pressure"}),
            ),
        ConceptRecord::new("Material Properties", "engineering")
            .with_formulas(&["σ = E * ε"])
            .with_overlay("material_highlight", json!({"property": "elasticity"}))
            .with_overlay("label", json!({"text": "Stress Points", "critical_zones": true})),
    ]
}

fn ball() -> Vec<ConceptRecord> {
    vec![
        ConceptRecord::new("Projectile Motion", "physics")
            .with_formulas(&[
                "y = x*tan(θ) - (g*x²)/(2*v₀²*cos²(θ))",
                "R = (v₀²*sin(2θ))/g",
            ])
            .with_overlay("trajectory", json!({"path": "parabolic", "color": "yellow"}))
            .with_overlay("vector", json!({"components": ["vx", "vy"], "decompose": true})),
        ConceptRecord::new("Elastic Collision", "physics")
            .with_formulas(&["½mv₁² + ½mv₂² = ½mv₁'² + ½mv₂'²"])
            .with_overlay("impact_zone", json!({"color": "red"}))
            .with_overlay("energy_transfer", json!({"visual": "wave"})),
    ]
}

fn car() -> Vec<ConceptRecord> {
    vec![
        ConceptRecord::new("Newton's Laws", "physics")
            .with_formulas(&["F = ma", "F₁₂ = -F₂₁"])
            .with_overlay(
                "force_diagram",
                json!({"vectors": ["weight", "normal", "friction"]}),
            )
            .with_overlay("acceleration_arrow", json!({"color": "green"})),
        ConceptRecord::new("Thermodynamics", "physics")
            .with_formulas(&["η = W/Qh", "PV = nRT"])
            .with_overlay("heat_flow", json!({"from": "engine", "color": "red"}))
            .with_overlay("label", json!({"text": "Combustion", "position": "engine"})),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_labels() {
        let kb = KnowledgeBase::builtin();
        assert_eq!(kb.labels(), ["ball", "bicycle", "bottle", "car", "plant"]);
        assert_eq!(kb.len(), 5);
    }

    #[test]
    fn test_lookup_is_exact_match() {
        let kb = KnowledgeBase::builtin();

        assert!(kb.lookup("plant").is_some());
        assert!(kb.lookup("Plant").is_none());
        assert!(kb.lookup("plants").is_none());
        assert!(kb.lookup("").is_none());
    }

    #[test]
    fn test_from_entries_lowercases_labels() {
        let kb = KnowledgeBase::from_entries([(
            "Lever",
            vec![ConceptRecord::new("Mechanical Advantage", "physics")],
        )]);

        assert!(kb.lookup("lever").is_some());
        assert!(kb.lookup("Lever").is_none());
    }

    #[test]
    fn test_every_record_is_well_formed() {
        let kb = KnowledgeBase::builtin();
        for label in kb.labels() {
            let concepts = kb.lookup(label).unwrap();
            assert!(!concepts.is_empty(), "{label} has no concepts");
            for concept in concepts {
                assert!(!concept.name.is_empty());
                assert!(!concept.category.is_empty());
                for overlay in &concept.overlays {
                    assert!(!overlay.kind().is_empty(), "{} overlay without type", concept.name);
                }
            }
        }
    }

    #[test]
    fn test_directive_type_overrides_params() {
        let directive = OverlayDirective::new("label", json!({"type": "bogus", "text": "x"}));

        assert_eq!(directive.kind(), "label");
        assert_eq!(directive.get("text"), Some(&json!("x")));
    }

    #[test]
    fn test_directive_non_object_params() {
        let directive = OverlayDirective::new("outline", Value::Null);

        assert_eq!(directive.params().len(), 1);
        assert_eq!(directive.kind(), "outline");
    }

    #[test]
    fn test_directive_deserialize_requires_type() {
        let ok: OverlayDirective =
            serde_json::from_str(r#"{"type": "arc", "radius": "r", "extra": [1, 2]}"#).unwrap();
        assert_eq!(ok.kind(), "arc");
        assert_eq!(ok.get("extra"), Some(&json!([1, 2])));

        assert!(serde_json::from_str::<OverlayDirective>(r#"{"radius": "r"}"#).is_err());
        assert!(serde_json::from_str::<OverlayDirective>(r#"{"type": ""}"#).is_err());
        assert!(serde_json::from_str::<OverlayDirective>(r#"{"type": 3}"#).is_err());
    }

    #[test]
    fn test_concept_record_defaults_missing_sequences() {
        let record: ConceptRecord =
            serde_json::from_str(r#"{"name": "Buoyancy", "category": "physics"}"#).unwrap();

        assert!(record.formulas.is_empty());
        assert!(record.overlays.is_empty());
    }
}
