//! JWT gate for inbound HTTP requests.
//!
//! Tokens are taken from a configured header or cookie, verified against keys
//! published at a JWKS endpoint, and optionally checked for tenant membership.
//! The library exposes the gate itself (`services::gate`) and the axum wiring
//! (`middleware::gate`) used by the bundled binary.

pub mod api;
pub mod app;
pub mod config;
pub mod error;
pub mod middleware;
pub mod services;
pub mod state;
