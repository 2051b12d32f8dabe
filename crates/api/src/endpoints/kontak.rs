//! Contact channel endpoints.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::{delete, get, patch, post},
};
use chrono::{DateTime, Utc};
use puspresma_cms::records::KontakRecord;
use puspresma_cms::repositories::KontakListParams;
use puspresma_common::{AppError, AppResult};
use puspresma_core::KontakForm;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::{
    extractors::AdminAuth,
    middleware::AppState,
    response::{ApiResponse, Paginated},
};

/// Create the contact router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_kontak))
        .route("/", post(submit))
        .route("/{id}", get(get_kontak))
        .route("/{id}", patch(update_kontak))
        .route("/{id}", delete(delete_kontak))
}

/// Contact message response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct KontakResponse {
    pub id: String,
    pub nama: String,
    pub email: String,
    pub subjek: String,
    pub pesan: String,
    pub status: String,
    pub is_deleted: bool,
    pub date_created: Option<DateTime<Utc>>,
}

impl From<KontakRecord> for KontakResponse {
    fn from(record: KontakRecord) -> Self {
        Self {
            id: record.id,
            nama: record.nama,
            email: record.email,
            subjek: record.subjek.unwrap_or_default(),
            pesan: record.pesan,
            status: record.status,
            is_deleted: record.is_deleted,
            date_created: record.date_created,
        }
    }
}

/// List messages query.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListKontakQuery {
    #[serde(default = "default_page")]
    pub page: u32,
    #[serde(default = "default_limit")]
    pub limit: u32,
    pub status: Option<String>,
    #[serde(default)]
    pub include_deleted: bool,
}

const fn default_page() -> u32 {
    1
}

const fn default_limit() -> u32 {
    10
}

/// Status update body.
#[derive(Debug, Deserialize)]
pub struct UpdateKontakRequest {
    pub status: Option<String>,
}

/// Delete query.
#[derive(Debug, Default, Deserialize)]
pub struct DeleteQuery {
    #[serde(default)]
    pub permanent: bool,
}

/// List messages (admin only).
async fn list_kontak(
    AdminAuth(_admin): AdminAuth,
    State(state): State<AppState>,
    Query(query): Query<ListKontakQuery>,
) -> AppResult<ApiResponse<Paginated<KontakResponse>>> {
    let params = KontakListParams {
        page: query.page.max(1),
        limit: query.limit.clamp(1, 100),
        status: query.status,
        include_deleted: query.include_deleted,
    };

    let (records, total) = state.kontak_service.list(&params).await?;
    let items = records.into_iter().map(KontakResponse::from).collect();

    Ok(ApiResponse::ok(Paginated {
        items,
        total,
        page: params.page,
        limit: params.limit,
    }))
}

/// Get one message (admin only).
async fn get_kontak(
    AdminAuth(_admin): AdminAuth,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<KontakResponse>> {
    let record = state.kontak_service.get(&id).await?;
    Ok(ApiResponse::ok(KontakResponse::from(record)))
}

/// Submit a contact message (public).
async fn submit(
    State(state): State<AppState>,
    Json(form): Json<KontakForm>,
) -> AppResult<ApiResponse<KontakResponse>> {
    let record = state.kontak_service.submit(&form).await?;
    info!(kontak_id = %record.id, "Contact message received");
    Ok(ApiResponse::with_message(
        KontakResponse::from(record),
        "Pesan terkirim",
    ))
}

/// Flip the read status (admin only).
async fn update_kontak(
    AdminAuth(_admin): AdminAuth,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<UpdateKontakRequest>,
) -> AppResult<ApiResponse<KontakResponse>> {
    let status = body
        .status
        .ok_or_else(|| AppError::BadRequest("Status wajib diisi".to_string()))?;
    let record = state.kontak_service.set_status(&id, &status).await?;
    Ok(ApiResponse::ok(KontakResponse::from(record)))
}

/// Delete a message (admin only).
async fn delete_kontak(
    AdminAuth(admin): AdminAuth,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(query): Query<DeleteQuery>,
) -> AppResult<ApiResponse<()>> {
    info!(admin_id = %admin.id, kontak_id = %id, permanent = query.permanent, "Deleting contact message");
    state.kontak_service.delete(&id, query.permanent).await?;
    Ok(ApiResponse::with_message(
        (),
        if query.permanent {
            "Pesan dihapus permanen"
        } else {
            "Pesan dihapus"
        },
    ))
}
