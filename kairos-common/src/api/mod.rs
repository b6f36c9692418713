//! Shared API request/response types for KAIROS services

pub mod types;

pub use types::{
    ConceptRequest, ConceptResponse, ConceptSummary, ModuleDescriptor, OverlayOutput,
    DEFAULT_DIFFICULTY,
};
