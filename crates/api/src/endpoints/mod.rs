//! API endpoints.

mod admin;
mod calendar;
mod content;
mod expo;
mod kontak;
mod lomba;
mod prestasi;
mod reminders;
mod search;

use axum::{Json, Router, middleware as axum_middleware, routing::get};
use serde_json::json;

use crate::middleware::AppState;

/// Create the API router. The reminder surface is admin-only and sits
/// behind the router-layer gate; everything else enforces auth per handler.
pub fn router(state: &AppState) -> Router<AppState> {
    Router::new()
        .nest("/lomba", lomba::router())
        .nest("/expo", expo::router())
        .nest("/prestasi", prestasi::router())
        .nest("/kontak", kontak::router())
        .nest("/calendar", calendar::router())
        .nest(
            "/reminders",
            reminders::router().layer(axum_middleware::from_fn_with_state(
                state.clone(),
                crate::middleware::require_admin,
            )),
        )
        .nest("/search", search::router())
        .merge(content::router())
        .nest("/admin", admin::router())
        .route("/health", get(health))
}

/// Liveness probe.
async fn health() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok", "version": env!("CARGO_PKG_VERSION") }))
}
