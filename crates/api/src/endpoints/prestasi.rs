//! Achievement endpoints.

use axum::{
    Json, Router,
    extract::{DefaultBodyLimit, Multipart, Path, Query, State},
    routing::{delete, get, patch, post},
};
use chrono::{DateTime, NaiveDate, Utc};
use puspresma_cms::records::PrestasiRecord;
use puspresma_cms::repositories::PrestasiListParams;
use puspresma_common::{AppError, AppResult, Config};
use puspresma_core::format::asset_url;
use puspresma_core::{CertificateUpload, PrestasiInput, PrestasiSubmission};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::info;

use crate::{
    extractors::{AdminAuth, MaybeAdminAuth},
    middleware::AppState,
    response::{ApiResponse, Paginated},
};

// Certificate cap is 5 MB; leave headroom for the multipart framing and
// text fields.
const SUBMIT_BODY_LIMIT: usize = 6 * 1024 * 1024;

/// Create the achievement router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_prestasi))
        .route("/", post(create_prestasi))
        .route("/{id}", get(get_prestasi))
        .route("/{id}", patch(update_prestasi))
        .route("/{id}", delete(delete_prestasi))
        .route(
            "/submit",
            post(submit).layer(DefaultBodyLimit::max(SUBMIT_BODY_LIMIT)),
        )
}

/// Achievement response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PrestasiResponse {
    pub id: String,
    pub judul: String,
    pub nama_lomba: String,
    pub tingkat: String,
    pub peringkat: String,
    pub tanggal: Option<NaiveDate>,
    pub tahun: Option<i32>,
    pub sertifikat_url: Option<String>,
    pub nama_mahasiswa: String,
    pub nim: String,
    pub fakultas: String,
    pub program_studi: String,
    pub status: String,
    pub verified_at: Option<DateTime<Utc>>,
    pub is_deleted: bool,
    pub tim: Vec<TeamMemberResponse>,
    pub date_created: Option<DateTime<Utc>>,
}

/// Achievement team member.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamMemberResponse {
    pub nama: String,
    pub nim: String,
    pub is_ketua: bool,
}

impl PrestasiResponse {
    fn from_record(record: PrestasiRecord, config: &Config) -> Self {
        let tahun = record.tahun();
        let sertifikat_url = record
            .sertifikat
            .as_ref()
            .map(|id| asset_url(&config.cms.url, id, None));
        Self {
            id: record.id,
            judul: record.judul,
            nama_lomba: record.nama_lomba.unwrap_or_default(),
            tingkat: record.tingkat.unwrap_or_default(),
            peringkat: record.peringkat.unwrap_or_default(),
            tanggal: record.tanggal,
            tahun,
            sertifikat_url,
            nama_mahasiswa: record.nama_mahasiswa,
            nim: record.nim,
            fakultas: record.fakultas.unwrap_or_default(),
            program_studi: record.program_studi.unwrap_or_default(),
            status: record.status,
            verified_at: record.verified_at,
            is_deleted: record.is_deleted,
            tim: record
                .tim
                .into_iter()
                .map(|m| TeamMemberResponse {
                    nama: m.nama,
                    nim: m.nim,
                    is_ketua: m.is_ketua,
                })
                .collect(),
            date_created: record.date_created,
        }
    }
}

/// List achievements query.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListPrestasiQuery {
    #[serde(default = "default_page")]
    pub page: u32,
    #[serde(default = "default_limit")]
    pub limit: u32,
    pub tingkat: Option<String>,
    pub tahun: Option<i32>,
    pub status: Option<String>,
    pub search: Option<String>,
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

/// List achievements.
async fn list_prestasi(
    MaybeAdminAuth(admin): MaybeAdminAuth,
    State(state): State<AppState>,
    Query(query): Query<ListPrestasiQuery>,
) -> AppResult<ApiResponse<Paginated<PrestasiResponse>>> {
    let params = PrestasiListParams {
        page: query.page.max(1),
        limit: query.limit.clamp(1, 100),
        tingkat: query.tingkat,
        tahun: query.tahun,
        // Anonymous callers only ever see verified achievements
        status: if admin.is_some() {
            query.status
        } else {
            Some("verified".to_string())
        },
        search: query.search,
        include_deleted: query.include_deleted && admin.is_some(),
    };

    let (records, total) = state.prestasi_service.list(&params).await?;
    let items = records
        .into_iter()
        .map(|r| PrestasiResponse::from_record(r, &state.config))
        .collect();

    Ok(ApiResponse::ok(Paginated {
        items,
        total,
        page: params.page,
        limit: params.limit,
    }))
}

/// Get a single achievement.
async fn get_prestasi(
    MaybeAdminAuth(admin): MaybeAdminAuth,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(query): Query<DetailQuery>,
) -> AppResult<ApiResponse<PrestasiResponse>> {
    let include_deleted = query.include_deleted && admin.is_some();
    let prestasi = state.prestasi_service.get(&id, include_deleted).await?;
    Ok(ApiResponse::ok(PrestasiResponse::from_record(prestasi, &state.config)))
}

/// Public achievement submission: multipart text fields plus a certificate
/// file (PDF/JPEG/PNG, at most 5 MB).
async fn submit(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> AppResult<ApiResponse<PrestasiResponse>> {
    let mut fields = Map::new();
    let mut certificate: Option<CertificateUpload> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(format!("Form tidak valid: {e}")))?
    {
        let name = field.name().unwrap_or_default().to_string();

        if name == "sertifikat" {
            let file_name = field.file_name().unwrap_or("sertifikat").to_string();
            let content_type = field.content_type().unwrap_or_default().to_string();
            let data = field
                .bytes()
                .await
                .map_err(|e| AppError::BadRequest(format!("Berkas tidak terbaca: {e}")))?;
            certificate = Some(CertificateUpload {
                file_name,
                content_type,
                data: data.to_vec(),
            });
        } else {
            let text = field
                .text()
                .await
                .map_err(|e| AppError::BadRequest(format!("Form tidak valid: {e}")))?;
            fields.insert(name, Value::from(text));
        }
    }

    let submission: PrestasiSubmission = serde_json::from_value(Value::Object(fields))
        .map_err(|e| AppError::BadRequest(format!("Form tidak valid: {e}")))?;

    let record = state.prestasi_service.submit(&submission, certificate).await?;
    Ok(ApiResponse::with_message(
        PrestasiResponse::from_record(record, &state.config),
        "Prestasi diajukan, menunggu verifikasi",
    ))
}

/// Create an achievement directly (admin only).
async fn create_prestasi(
    AdminAuth(admin): AdminAuth,
    State(state): State<AppState>,
    Json(input): Json<PrestasiInput>,
) -> AppResult<ApiResponse<PrestasiResponse>> {
    info!(admin_id = %admin.id, judul = ?input.judul, "Creating achievement");
    let prestasi = state.prestasi_service.create(&input).await?;
    Ok(ApiResponse::ok(PrestasiResponse::from_record(prestasi, &state.config)))
}

/// Update an achievement (admin only). Setting status to `verified` stamps
/// the verification time.
async fn update_prestasi(
    AdminAuth(admin): AdminAuth,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(input): Json<PrestasiInput>,
) -> AppResult<ApiResponse<PrestasiResponse>> {
    info!(admin_id = %admin.id, prestasi_id = %id, status = ?input.status, "Updating achievement");
    let prestasi = state.prestasi_service.update(&id, &input).await?;
    Ok(ApiResponse::ok(PrestasiResponse::from_record(prestasi, &state.config)))
}

/// Delete an achievement (admin only).
async fn delete_prestasi(
    AdminAuth(admin): AdminAuth,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(query): Query<DetailQuery>,
) -> AppResult<ApiResponse<()>> {
    info!(admin_id = %admin.id, prestasi_id = %id, permanent = query.permanent, "Deleting achievement");
    state.prestasi_service.delete(&id, query.permanent).await?;
    Ok(ApiResponse::with_message(
        (),
        if query.permanent {
            "Prestasi dihapus permanen"
        } else {
            "Prestasi dihapus"
        },
    ))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_response_derives_year_and_certificate_url() {
        let config: Config = serde_json::from_value(json!({
            "server": { "url": "https://puspresma.kampus.ac.id" },
            "cms": { "url": "https://cms.kampus.ac.id" },
        }))
        .unwrap();

        let record: PrestasiRecord = serde_json::from_value(json!({
            "id": 1, "judul": "Juara 1 Gemastik",
            "nama_mahasiswa": "Budi", "nim": "111",
            "tanggal": "2026-06-20", "sertifikat": "cert-1",
            "tim": [{ "nama": "Budi", "nim": "111", "is_ketua": true }],
        }))
        .unwrap();

        let response = PrestasiResponse::from_record(record, &config);
        assert_eq!(response.tahun, Some(2026));
        assert_eq!(
            response.sertifikat_url.as_deref(),
            Some("https://cms.kampus.ac.id/assets/cert-1")
        );
        assert!(response.tim[0].is_ketua);
    }
}
