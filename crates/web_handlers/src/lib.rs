//! # Web Handlers for the Campground Directory Application
//!
//! This crate provides the HTTP handlers for the campground resource
//! lifecycle: listing/search, creation, show, update and delete.

/// Handlers for the campground endpoints
mod campground_handlers;
pub use campground_handlers::*;

/// Multipart form ingestion for campground submissions
mod campground_form;
pub use campground_form::*;
