//! # Postgres
//!
//! This crate provides a client for the Campground Directory application to interact with a PostgreSQL database.

/// Database client for the campground directory application.
pub mod database;
