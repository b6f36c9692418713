//! # KAIROS Common Library
//!
//! Shared code for the KAIROS services including:
//! - The concept knowledge base, resolver and overlay composer
//! - API request/response types
//! - Configuration loading
//! - Common error types

pub mod api;
pub mod concepts;
pub mod config;
pub mod error;

pub use concepts::{compose, extract, extract_from, resolve, ConceptRecord, OverlayDirective};
pub use error::{Error, Result};
