//! Exhibition endpoints.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    response::{IntoResponse, Response},
    routing::{delete, get, patch, post},
};
use chrono::{DateTime, NaiveDate, Utc};
use puspresma_cms::records::{ExpoRecord, PendaftaranExpoRecord};
use puspresma_cms::repositories::ExpoListParams;
use puspresma_common::{AppResult, Config};
use puspresma_core::format::{asset_url, format_date_range, is_free};
use puspresma_core::{ExpoInput, ExpoRegistrationForm};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::{
    extractors::{AdminAuth, MaybeAdminAuth},
    middleware::AppState,
    response::{ApiResponse, Paginated},
};

/// Create the exhibition router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_expo))
        .route("/", post(create_expo))
        .route("/{id}", get(get_expo))
        .route("/{id}", patch(update_expo))
        .route("/{id}", delete(delete_expo))
        .route("/{id}/register", post(register))
        .route("/{id}/register", get(list_registrations))
}

/// Exhibition response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpoResponse {
    pub id: String,
    pub judul: String,
    pub slug: String,
    pub tema: String,
    pub tanggal_mulai: Option<NaiveDate>,
    pub tanggal_selesai: Option<NaiveDate>,
    pub tanggal_label: String,
    pub lokasi: String,
    pub biaya_partisipasi: Option<i64>,
    pub is_free: bool,
    pub pendaftaran_dibuka: bool,
    pub deadline_pendaftaran: Option<NaiveDate>,
    pub max_peserta: Option<u32>,
    pub deskripsi: String,
    pub poster_url: Option<String>,
    pub status: String,
    pub is_deleted: bool,
    pub date_created: Option<DateTime<Utc>>,
}

impl ExpoResponse {
    fn from_record(record: ExpoRecord, config: &Config) -> Self {
        let poster_url = record
            .poster
            .as_ref()
            .map(|id| asset_url(&config.cms.url, id, Some(config.cms.asset_width)));
        let tanggal_label = record
            .tanggal_mulai
            .map(|start| format_date_range(start, record.tanggal_selesai))
            .unwrap_or_default();
        Self {
            id: record.id,
            judul: record.judul,
            slug: record.slug.unwrap_or_default(),
            tema: record.tema.unwrap_or_default(),
            tanggal_mulai: record.tanggal_mulai,
            tanggal_selesai: record.tanggal_selesai,
            tanggal_label,
            lokasi: record.lokasi.unwrap_or_default(),
            biaya_partisipasi: record.biaya_partisipasi,
            is_free: is_free(record.biaya_partisipasi),
            pendaftaran_dibuka: record.pendaftaran_dibuka,
            deadline_pendaftaran: record.deadline_pendaftaran,
            max_peserta: record.max_peserta,
            deskripsi: record.deskripsi.unwrap_or_default(),
            poster_url,
            status: record.status,
            is_deleted: record.is_deleted,
            date_created: record.date_created,
        }
    }
}

/// Booth registration response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpoRegistrationResponse {
    pub id: String,
    pub expo_id: Option<String>,
    pub nama_ketua: String,
    pub nim_ketua: String,
    pub email: String,
    pub telepon: String,
    pub anggota: Vec<TeamMember>,
    pub nama_proyek: String,
    pub deskripsi_proyek: String,
    pub link_demo: String,
    pub status: String,
    pub date_created: Option<DateTime<Utc>>,
}

/// One named team slot.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamMember {
    pub nama: String,
    pub nim: String,
}

impl From<PendaftaranExpoRecord> for ExpoRegistrationResponse {
    fn from(record: PendaftaranExpoRecord) -> Self {
        let anggota = [
            (&record.nama_anggota1, &record.nim_anggota1),
            (&record.nama_anggota2, &record.nim_anggota2),
            (&record.nama_anggota3, &record.nim_anggota3),
        ]
        .into_iter()
        .filter_map(|(nama, nim)| {
            nim.as_ref().map(|nim| TeamMember {
                nama: nama.clone().unwrap_or_default(),
                nim: nim.clone(),
            })
        })
        .collect();

        Self {
            id: record.id,
            expo_id: record.expo_id,
            nama_ketua: record.nama_ketua,
            nim_ketua: record.nim_ketua,
            email: record.email,
            telepon: record.telepon.unwrap_or_default(),
            anggota,
            nama_proyek: record.nama_proyek,
            deskripsi_proyek: record.deskripsi_proyek.unwrap_or_default(),
            link_demo: record.link_demo.unwrap_or_default(),
            status: record.status,
            date_created: record.date_created,
        }
    }
}

/// List exhibitions query.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListExpoQuery {
    #[serde(default = "default_page")]
    pub page: u32,
    #[serde(default = "default_limit")]
    pub limit: u32,
    pub status: Option<String>,
    pub search: Option<String>,
    pub slug: Option<String>,
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

/// List exhibitions, or fetch one by slug.
async fn list_expo(
    MaybeAdminAuth(admin): MaybeAdminAuth,
    State(state): State<AppState>,
    Query(query): Query<ListExpoQuery>,
) -> AppResult<Response> {
    if let Some(slug) = &query.slug {
        let expo = state.expo_service.get_by_slug(slug).await?;
        return Ok(ApiResponse::ok(ExpoResponse::from_record(expo, &state.config)).into_response());
    }

    let params = ExpoListParams {
        page: query.page.max(1),
        limit: query.limit.clamp(1, 100),
        status: query.status,
        search: query.search,
        include_deleted: query.include_deleted && admin.is_some(),
    };

    let (records, total) = state.expo_service.list(&params).await?;
    let items = records
        .into_iter()
        .map(|r| ExpoResponse::from_record(r, &state.config))
        .collect();

    Ok(ApiResponse::ok(Paginated {
        items,
        total,
        page: params.page,
        limit: params.limit,
    })
    .into_response())
}

/// Get a single exhibition.
async fn get_expo(
    MaybeAdminAuth(admin): MaybeAdminAuth,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(query): Query<DetailQuery>,
) -> AppResult<ApiResponse<ExpoResponse>> {
    let include_deleted = query.include_deleted && admin.is_some();
    let expo = state.expo_service.get(&id, include_deleted).await?;
    Ok(ApiResponse::ok(ExpoResponse::from_record(expo, &state.config)))
}

/// Create an exhibition (admin only).
async fn create_expo(
    AdminAuth(admin): AdminAuth,
    State(state): State<AppState>,
    Json(input): Json<ExpoInput>,
) -> AppResult<ApiResponse<ExpoResponse>> {
    info!(admin_id = %admin.id, judul = ?input.judul, "Creating exhibition");
    let expo = state.expo_service.create(&input).await?;
    Ok(ApiResponse::ok(ExpoResponse::from_record(expo, &state.config)))
}

/// Update an exhibition (admin only).
async fn update_expo(
    AdminAuth(admin): AdminAuth,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(input): Json<ExpoInput>,
) -> AppResult<ApiResponse<ExpoResponse>> {
    info!(admin_id = %admin.id, expo_id = %id, "Updating exhibition");
    let expo = state.expo_service.update(&id, &input).await?;
    Ok(ApiResponse::ok(ExpoResponse::from_record(expo, &state.config)))
}

/// Delete an exhibition (admin only).
async fn delete_expo(
    AdminAuth(admin): AdminAuth,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(query): Query<DetailQuery>,
) -> AppResult<ApiResponse<()>> {
    info!(admin_id = %admin.id, expo_id = %id, permanent = query.permanent, "Deleting exhibition");
    state.expo_service.delete(&id, query.permanent).await?;
    Ok(ApiResponse::with_message(
        (),
        if query.permanent {
            "Expo dihapus permanen"
        } else {
            "Expo dihapus"
        },
    ))
}

/// Register a booth team (public).
async fn register(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(form): Json<ExpoRegistrationForm>,
) -> AppResult<ApiResponse<ExpoRegistrationResponse>> {
    let registration = state.expo_service.register(&id, &form).await?;
    info!(expo_id = %id, registration_id = %registration.id, "Expo registration accepted");
    Ok(ApiResponse::with_message(
        ExpoRegistrationResponse::from(registration),
        "Pendaftaran berhasil, menunggu verifikasi",
    ))
}

/// List registrations for an exhibition (admin only).
async fn list_registrations(
    AdminAuth(_admin): AdminAuth,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<Paginated<ExpoRegistrationResponse>>> {
    let (records, total) = state.expo_service.list_registrations(&id).await?;
    let items: Vec<ExpoRegistrationResponse> = records
        .into_iter()
        .map(ExpoRegistrationResponse::from)
        .collect();
    let limit = items.len() as u32;
    Ok(ApiResponse::ok(Paginated {
        items,
        total,
        page: 1,
        limit,
    }))
}
