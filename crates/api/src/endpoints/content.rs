//! Static-content passthrough endpoints.
//!
//! Thin routes over the content service; each serves the CMS collection or
//! its built-in fallback.

use axum::{Router, extract::State, routing::get};
use puspresma_common::AppResult;
use serde_json::Value;

use crate::{middleware::AppState, response::ApiResponse};

/// Create the content router (mounted at the API root).
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/faq", get(faq))
        .route("/tips", get(tips))
        .route("/templates", get(templates))
        .route("/downloads", get(downloads))
        .route("/panduan", get(panduan))
        .route("/resources", get(resources))
        .route("/site-settings", get(site_settings))
}

async fn faq(State(state): State<AppState>) -> AppResult<ApiResponse<Value>> {
    Ok(ApiResponse::ok(state.konten_service.faq().await?))
}

async fn tips(State(state): State<AppState>) -> AppResult<ApiResponse<Value>> {
    Ok(ApiResponse::ok(state.konten_service.tips().await?))
}

async fn templates(State(state): State<AppState>) -> AppResult<ApiResponse<Value>> {
    Ok(ApiResponse::ok(state.konten_service.templates().await?))
}

async fn downloads(State(state): State<AppState>) -> AppResult<ApiResponse<Value>> {
    Ok(ApiResponse::ok(state.konten_service.downloads().await?))
}

async fn panduan(State(state): State<AppState>) -> AppResult<ApiResponse<Value>> {
    Ok(ApiResponse::ok(state.konten_service.panduan().await?))
}

async fn resources(State(state): State<AppState>) -> AppResult<ApiResponse<Value>> {
    Ok(ApiResponse::ok(state.konten_service.resources().await?))
}

async fn site_settings(State(state): State<AppState>) -> AppResult<ApiResponse<Value>> {
    Ok(ApiResponse::ok(state.konten_service.site_settings().await?))
}
