//! # Campground Services
//!
//! This crate implements the campground resource lifecycle for the Campground
//! Directory application: listing and search, creation with geocoding and
//! image enrichment, ownership-gated update and delete, and cascading removal
//! of dependent comments, reviews and remote image assets.

/// Persistence operations over the campground collection.
mod repository;
pub use repository::*;

/// The lifecycle service orchestrating validation, authorization, enrichment
/// and persistence.
mod service;
pub use service::*;

/// Data model, request/response types and the error taxonomy.
mod types;
pub use types::*;
