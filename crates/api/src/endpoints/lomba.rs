//! Competition endpoints.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    response::{IntoResponse, Response},
    routing::{delete, get, patch, post},
};
use chrono::{DateTime, NaiveDate, Utc};
use puspresma_cms::records::{LombaRecord, PendaftaranLombaRecord};
use puspresma_cms::repositories::LombaListParams;
use puspresma_common::{AppResult, Config};
use puspresma_core::format::{asset_url, format_date, is_free};
use puspresma_core::{LombaInput, RegistrationForm};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::{
    extractors::{AdminAuth, MaybeAdminAuth},
    middleware::AppState,
    response::{ApiResponse, Paginated},
};

/// Create the competition router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_lomba))
        .route("/", post(create_lomba))
        .route("/{id}", get(get_lomba))
        .route("/{id}", patch(update_lomba))
        .route("/{id}", delete(delete_lomba))
        .route("/{id}/daftar", post(register))
        .route("/{id}/daftar", get(list_registrations))
}

/// Competition response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LombaResponse {
    pub id: String,
    pub judul: String,
    pub slug: String,
    pub kategori: String,
    pub tingkat: String,
    pub penyelenggara: String,
    pub deadline: Option<NaiveDate>,
    pub deadline_label: Option<String>,
    pub tanggal_pelaksanaan: Option<NaiveDate>,
    pub biaya: Option<i64>,
    pub is_free: bool,
    pub link_pendaftaran: String,
    pub deskripsi: String,
    pub poster_url: Option<String>,
    pub pendaftaran_dibuka: bool,
    pub featured: bool,
    pub status: String,
    pub is_deleted: bool,
    pub date_created: Option<DateTime<Utc>>,
}

impl LombaResponse {
    fn from_record(record: LombaRecord, config: &Config) -> Self {
        let poster_url = record
            .poster
            .as_ref()
            .map(|id| asset_url(&config.cms.url, id, Some(config.cms.asset_width)));
        Self {
            id: record.id,
            judul: record.judul,
            slug: record.slug.unwrap_or_default(),
            kategori: record.kategori.unwrap_or_default(),
            tingkat: record.tingkat.unwrap_or_default(),
            penyelenggara: record.penyelenggara.unwrap_or_default(),
            deadline: record.deadline,
            deadline_label: record.deadline.map(format_date),
            tanggal_pelaksanaan: record.tanggal_pelaksanaan,
            biaya: record.biaya,
            is_free: is_free(record.biaya),
            link_pendaftaran: record.link_pendaftaran.unwrap_or_default(),
            deskripsi: record.deskripsi.unwrap_or_default(),
            poster_url,
            pendaftaran_dibuka: record.pendaftaran_dibuka,
            featured: record.featured,
            status: record.status,
            is_deleted: record.is_deleted,
            date_created: record.date_created,
        }
    }
}

/// Registration response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationResponse {
    pub id: String,
    pub lomba_id: Option<String>,
    pub nama: String,
    pub nim: String,
    pub email: String,
    pub telepon: String,
    pub fakultas: String,
    pub program_studi: String,
    pub status: String,
    pub date_created: Option<DateTime<Utc>>,
}

impl From<PendaftaranLombaRecord> for RegistrationResponse {
    fn from(record: PendaftaranLombaRecord) -> Self {
        Self {
            id: record.id,
            lomba_id: record.lomba_id,
            nama: record.nama,
            nim: record.nim,
            email: record.email,
            telepon: record.telepon.unwrap_or_default(),
            fakultas: record.fakultas.unwrap_or_default(),
            program_studi: record.program_studi.unwrap_or_default(),
            status: record.status,
            date_created: record.date_created,
        }
    }
}

/// List competitions query.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListLombaQuery {
    #[serde(default = "default_page")]
    pub page: u32,
    #[serde(default = "default_limit")]
    pub limit: u32,
    pub kategori: Option<String>,
    pub tingkat: Option<String>,
    pub status: Option<String>,
    pub search: Option<String>,
    pub slug: Option<String>,
    pub featured: Option<bool>,
    /// Admin only; ignored for anonymous callers.
    #[serde(default)]
    pub include_deleted: bool,
}

const fn default_page() -> u32 {
    1
}

const fn default_limit() -> u32 {
    10
}

/// Detail/delete query.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DetailQuery {
    #[serde(default)]
    pub include_deleted: bool,
    #[serde(default)]
    pub permanent: bool,
}

/// List competitions, or fetch one by slug.
async fn list_lomba(
    MaybeAdminAuth(admin): MaybeAdminAuth,
    State(state): State<AppState>,
    Query(query): Query<ListLombaQuery>,
) -> AppResult<Response> {
    if let Some(slug) = &query.slug {
        let lomba = state.lomba_service.get_by_slug(slug).await?;
        let response = LombaResponse::from_record(lomba, &state.config);
        return Ok(ApiResponse::ok(response).into_response());
    }

    let params = LombaListParams {
        page: query.page.max(1),
        limit: query.limit.clamp(1, 100),
        kategori: query.kategori,
        tingkat: query.tingkat,
        status: query.status,
        search: query.search,
        featured: query.featured,
        include_deleted: query.include_deleted && admin.is_some(),
    };

    let (records, total) = state.lomba_service.list(&params).await?;
    let items = records
        .into_iter()
        .map(|r| LombaResponse::from_record(r, &state.config))
        .collect();

    Ok(ApiResponse::ok(Paginated {
        items,
        total,
        page: params.page,
        limit: params.limit,
    })
    .into_response())
}

/// Get a single competition.
async fn get_lomba(
    MaybeAdminAuth(admin): MaybeAdminAuth,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(query): Query<DetailQuery>,
) -> AppResult<ApiResponse<LombaResponse>> {
    let include_deleted = query.include_deleted && admin.is_some();
    let lomba = state.lomba_service.get(&id, include_deleted).await?;
    Ok(ApiResponse::ok(LombaResponse::from_record(lomba, &state.config)))
}

/// Create a competition (admin only).
async fn create_lomba(
    AdminAuth(admin): AdminAuth,
    State(state): State<AppState>,
    Json(input): Json<LombaInput>,
) -> AppResult<ApiResponse<LombaResponse>> {
    info!(admin_id = %admin.id, judul = ?input.judul, "Creating competition");
    let lomba = state.lomba_service.create(&input).await?;
    Ok(ApiResponse::ok(LombaResponse::from_record(lomba, &state.config)))
}

/// Update a competition (admin only).
async fn update_lomba(
    AdminAuth(admin): AdminAuth,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(input): Json<LombaInput>,
) -> AppResult<ApiResponse<LombaResponse>> {
    info!(admin_id = %admin.id, lomba_id = %id, "Updating competition");
    let lomba = state.lomba_service.update(&id, &input).await?;
    Ok(ApiResponse::ok(LombaResponse::from_record(lomba, &state.config)))
}

/// Delete a competition (admin only): soft by default, permanent with
/// `?permanent=true`.
async fn delete_lomba(
    AdminAuth(admin): AdminAuth,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(query): Query<DetailQuery>,
) -> AppResult<ApiResponse<()>> {
    info!(admin_id = %admin.id, lomba_id = %id, permanent = query.permanent, "Deleting competition");
    state.lomba_service.delete(&id, query.permanent).await?;
    Ok(ApiResponse::with_message(
        (),
        if query.permanent {
            "Lomba dihapus permanen"
        } else {
            "Lomba dihapus"
        },
    ))
}

/// Register for a competition (public).
async fn register(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(form): Json<RegistrationForm>,
) -> AppResult<ApiResponse<RegistrationResponse>> {
    let registration = state.registration_service.register(&id, &form).await?;
    info!(lomba_id = %id, registration_id = %registration.id, "Competition registration accepted");
    Ok(ApiResponse::with_message(
        RegistrationResponse::from(registration),
        "Pendaftaran berhasil, menunggu verifikasi",
    ))
}

/// List registrations for a competition (admin only).
async fn list_registrations(
    AdminAuth(_admin): AdminAuth,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<Paginated<RegistrationResponse>>> {
    let (records, total) = state.registration_service.list_for_lomba(&id).await?;
    let items: Vec<RegistrationResponse> =
        records.into_iter().map(RegistrationResponse::from).collect();
    let limit = items.len() as u32;
    Ok(ApiResponse::ok(Paginated {
        items,
        total,
        page: 1,
        limit,
    }))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    fn config() -> Config {
        serde_json::from_value(json!({
            "server": { "url": "https://puspresma.kampus.ac.id" },
            "cms": { "url": "https://cms.kampus.ac.id" },
        }))
        .unwrap()
    }

    fn record(value: serde_json::Value) -> LombaRecord {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_response_maps_storage_names_to_camel_case() {
        let lomba = record(json!({
            "id": 1,
            "judul": "Gemastik",
            "link_pendaftaran": "https://gemastik.id",
            "biaya": 0,
            "poster": "asset-1",
            "deadline": "2026-09-30",
        }));

        let response = LombaResponse::from_record(lomba, &config());
        let json = serde_json::to_value(&response).unwrap();

        assert_eq!(json["linkPendaftaran"], "https://gemastik.id");
        assert_eq!(json["isFree"], true);
        assert_eq!(
            json["posterUrl"],
            "https://cms.kampus.ac.id/assets/asset-1?width=800"
        );
        assert_eq!(json["deadlineLabel"], "30 September 2026");
    }

    #[test]
    fn test_missing_optionals_default_to_empty() {
        let lomba = record(json!({ "id": 2, "judul": "Lomba Esai" }));
        let response = LombaResponse::from_record(lomba, &config());

        assert_eq!(response.kategori, "");
        assert_eq!(response.link_pendaftaran, "");
        assert!(response.poster_url.is_none());
        assert!(response.is_free);
    }
}
