//! # Geo Services
//!
//! This crate provides a geocoding client for the Campground Directory
//! application. Free-text addresses are resolved into coordinates and a
//! canonical address string.

/// Geocoding client implementations.
mod client;
pub use client::*;

/// Types and errors shared by geocoding clients.
mod types;
pub use types::*;
