//! HTTP API layer for the Puspresma portal backend.
//!
//! This crate provides the REST surface:
//!
//! - **Endpoints**: competitions, exhibitions, achievements, calendar,
//!   reminders, contact, search, static content, admin auth
//! - **Extractors**: cookie-based admin authentication
//! - **Middleware**: the router-layer admin gate and shared [`AppState`]
//!
//! Built on Axum 0.8 with Tower middleware stack.

pub mod endpoints;
pub mod extractors;
pub mod middleware;
pub mod response;

pub use endpoints::router;
pub use middleware::AppState;
