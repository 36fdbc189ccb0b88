//! # Auth Services
//!
//! This crate provides the authentication boundary for the application.
//! It includes JWT token verification, middleware that gates protected routes,
//! and the extractor that exposes the current session user to handlers.

/// JWT token verification.
pub mod jwt;
/// Middleware for request authentication and the session-user extractor.
pub mod middleware;
/// Types and structures used in authentication services.
pub mod types;
