//! # Media Services
//!
//! This crate provides the image storage client for the Campground Directory
//! application: binary uploads that yield a durable URL plus a deletion
//! handle, and deletion by handle.

/// Image storage client implementations.
mod client;
pub use client::*;

/// Types and errors shared by image storage clients.
mod types;
pub use types::*;
