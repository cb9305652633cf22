//! User listing service library crate.
//!
//! Exposes the HTTP API surface, configuration, seeding, and storage for use
//! by the binary, the test harness, and integration tests.
pub mod api;
pub mod app;
pub mod config;
pub mod observability;
pub mod seed;
pub mod store;
