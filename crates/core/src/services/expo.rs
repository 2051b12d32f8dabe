//! Exhibition service: CRUD plus booth registration admission.

use chrono::{NaiveDate, Utc};
use puspresma_cms::records::{ExpoRecord, PendaftaranExpoRecord};
use puspresma_cms::repositories::{ExpoListParams, ExpoRepository, PendaftaranExpoRepository};
use puspresma_common::{AppError, AppResult, FormValidator};
use serde::Deserialize;
use serde_json::{Map, Value, json};

const STATUSES: [&str; 3] = ["upcoming", "ongoing", "past"];

/// Share of `max_peserta` after which new registrations are turned away.
/// The read-then-write admission check is racy; the 10% buffer absorbs
/// concurrent near-cap submissions.
const CAPACITY_THRESHOLD_PCT: u64 = 90;

/// Admin write payload for an exhibition.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpoInput {
    pub judul: Option<String>,
    pub slug: Option<String>,
    pub tema: Option<String>,
    pub tanggal_mulai: Option<NaiveDate>,
    pub tanggal_selesai: Option<NaiveDate>,
    pub lokasi: Option<String>,
    pub biaya_partisipasi: Option<i64>,
    pub pendaftaran_dibuka: Option<bool>,
    pub deadline_pendaftaran: Option<NaiveDate>,
    pub max_peserta: Option<u32>,
    pub deskripsi: Option<String>,
    pub poster: Option<String>,
    pub status: Option<String>,
}

impl ExpoInput {
    /// Storage payload with only the fields that were supplied.
    #[must_use]
    pub fn to_payload(&self) -> Value {
        let mut map = Map::new();
        let mut put = |key: &str, value: Option<Value>| {
            if let Some(value) = value {
                map.insert(key.to_string(), value);
            }
        };

        put("judul", self.judul.clone().map(Value::from));
        put("slug", self.slug.clone().map(Value::from));
        put("tema", self.tema.clone().map(Value::from));
        put(
            "tanggal_mulai",
            self.tanggal_mulai.map(|d| Value::from(d.to_string())),
        );
        put(
            "tanggal_selesai",
            self.tanggal_selesai.map(|d| Value::from(d.to_string())),
        );
        put("lokasi", self.lokasi.clone().map(Value::from));
        put("biaya_partisipasi", self.biaya_partisipasi.map(Value::from));
        put(
            "pendaftaran_dibuka",
            self.pendaftaran_dibuka.map(Value::from),
        );
        put(
            "deadline_pendaftaran",
            self.deadline_pendaftaran.map(|d| Value::from(d.to_string())),
        );
        put("max_peserta", self.max_peserta.map(Value::from));
        put("deskripsi", self.deskripsi.clone().map(Value::from));
        put("poster", self.poster.clone().map(Value::from));
        put("status", self.status.clone().map(Value::from));

        Value::Object(map)
    }
}

/// Booth registration form: a ketua, up to three anggota, and the project.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpoRegistrationForm {
    pub nama_ketua: Option<String>,
    pub nim_ketua: Option<String>,
    pub email: Option<String>,
    pub telepon: Option<String>,
    pub nama_anggota1: Option<String>,
    pub nim_anggota1: Option<String>,
    pub nama_anggota2: Option<String>,
    pub nim_anggota2: Option<String>,
    pub nama_anggota3: Option<String>,
    pub nim_anggota3: Option<String>,
    pub nama_proyek: Option<String>,
    pub deskripsi_proyek: Option<String>,
    pub link_demo: Option<String>,
}

impl ExpoRegistrationForm {
    fn validate(&self) -> AppResult<()> {
        let mut v = FormValidator::new();
        v.require("namaKetua", self.nama_ketua.as_deref());
        v.require("nimKetua", self.nim_ketua.as_deref());
        v.require("email", self.email.as_deref());
        v.require("telepon", self.telepon.as_deref());
        v.require("namaProyek", self.nama_proyek.as_deref());
        v.require("deskripsiProyek", self.deskripsi_proyek.as_deref());

        v.check_nim("nimKetua", self.nim_ketua.as_deref());
        v.check_nim("nimAnggota1", self.nim_anggota1.as_deref());
        v.check_nim("nimAnggota2", self.nim_anggota2.as_deref());
        v.check_nim("nimAnggota3", self.nim_anggota3.as_deref());
        v.check_email("email", self.email.as_deref());
        v.check_phone("telepon", self.telepon.as_deref());

        if v.is_valid() {
            Ok(())
        } else {
            Err(AppError::Validation(v.into_errors()))
        }
    }

    /// Every filled NIM slot, ketua first, in slot order.
    fn team_nims(&self) -> Vec<String> {
        [
            &self.nim_ketua,
            &self.nim_anggota1,
            &self.nim_anggota2,
            &self.nim_anggota3,
        ]
        .into_iter()
        .filter_map(|slot| {
            slot.as_deref()
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(ToString::to_string)
        })
        .collect()
    }

    /// One NIM may fill at most one team slot within a submission.
    fn check_distinct_nims(&self) -> AppResult<()> {
        let nims = self.team_nims();
        let mut seen = std::collections::BTreeSet::new();
        for nim in &nims {
            if !seen.insert(nim) {
                return Err(AppError::BadRequest(format!(
                    "NIM {nim} muncul lebih dari satu kali dalam tim"
                )));
            }
        }
        Ok(())
    }
}

/// Service for managing exhibitions and booth registrations.
#[derive(Clone)]
pub struct ExpoService {
    repo: ExpoRepository,
    pendaftaran_repo: PendaftaranExpoRepository,
}

impl ExpoService {
    /// Create a new exhibition service.
    #[must_use]
    pub const fn new(repo: ExpoRepository, pendaftaran_repo: PendaftaranExpoRepository) -> Self {
        Self {
            repo,
            pendaftaran_repo,
        }
    }

    /// List exhibitions.
    pub async fn list(&self, params: &ExpoListParams) -> AppResult<(Vec<ExpoRecord>, u64)> {
        self.repo.find(params).await
    }

    /// Fetch one live exhibition by slug.
    pub async fn get_by_slug(&self, slug: &str) -> AppResult<ExpoRecord> {
        self.repo
            .find_by_slug(slug)
            .await?
            .ok_or_else(|| AppError::NotFound("Expo".to_string()))
    }

    /// Fetch one exhibition by id.
    pub async fn get(&self, id: &str, include_deleted: bool) -> AppResult<ExpoRecord> {
        let expo = self
            .repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Expo".to_string()))?;
        if expo.is_deleted && !include_deleted {
            return Err(AppError::NotFound("Expo".to_string()));
        }
        Ok(expo)
    }

    /// Create an exhibition.
    pub async fn create(&self, input: &ExpoInput) -> AppResult<ExpoRecord> {
        let mut v = FormValidator::new();
        v.require("judul", input.judul.as_deref());
        if !v.is_valid() {
            return Err(AppError::Validation(v.into_errors()));
        }
        Self::check_status(input)?;

        self.repo.create(&input.to_payload()).await
    }

    /// Patch an exhibition.
    pub async fn update(&self, id: &str, input: &ExpoInput) -> AppResult<ExpoRecord> {
        Self::check_status(input)?;
        self.get(id, true).await?;
        self.repo.update(id, &input.to_payload()).await
    }

    /// Delete an exhibition: soft by default, permanently when asked.
    pub async fn delete(&self, id: &str, permanent: bool) -> AppResult<()> {
        self.get(id, true).await?;
        if permanent {
            tracing::info!(expo_id = %id, "Permanently deleting exhibition");
            self.repo.hard_delete(id).await
        } else {
            self.repo.soft_delete(id).await
        }
    }

    /// All registrations for one exhibition (admin listing).
    pub async fn list_registrations(
        &self,
        expo_id: &str,
    ) -> AppResult<(Vec<PendaftaranExpoRecord>, u64)> {
        self.get(expo_id, true).await?;
        self.pendaftaran_repo.find_by_expo(expo_id).await
    }

    /// Admit one booth registration.
    pub async fn register(
        &self,
        expo_id: &str,
        form: &ExpoRegistrationForm,
    ) -> AppResult<PendaftaranExpoRecord> {
        form.validate()?;
        form.check_distinct_nims()?;

        let expo = self.get(expo_id, false).await?;

        if !expo.pendaftaran_dibuka {
            return Err(AppError::BadRequest(
                "Pendaftaran expo ini belum dibuka".to_string(),
            ));
        }
        if let Some(deadline) = expo.deadline_pendaftaran {
            if deadline < Utc::now().date_naive() {
                return Err(AppError::BadRequest(
                    "Deadline pendaftaran sudah lewat".to_string(),
                ));
            }
        }

        if let Some(max) = expo.max_peserta {
            let count = self.pendaftaran_repo.count_non_rejected(expo_id).await?;
            if count >= capacity_threshold(max) {
                return Err(AppError::BadRequest(
                    "Kuota pendaftaran expo ini sudah penuh".to_string(),
                ));
            }
        }

        let nims = form.team_nims();
        let clashes = self
            .pendaftaran_repo
            .find_active_with_nims(expo_id, &nims)
            .await?;
        if !clashes.is_empty() {
            return Err(AppError::Conflict(
                "Salah satu NIM dalam tim sudah terdaftar pada expo ini".to_string(),
            ));
        }

        let payload = json!({
            "expo_id": expo_id,
            "nama_ketua": form.nama_ketua,
            "nim_ketua": form.nim_ketua,
            "email": form.email,
            "telepon": form.telepon,
            "nama_anggota1": form.nama_anggota1,
            "nim_anggota1": form.nim_anggota1,
            "nama_anggota2": form.nama_anggota2,
            "nim_anggota2": form.nim_anggota2,
            "nama_anggota3": form.nama_anggota3,
            "nim_anggota3": form.nim_anggota3,
            "nama_proyek": form.nama_proyek,
            "deskripsi_proyek": form.deskripsi_proyek,
            "link_demo": form.link_demo,
            "status": "pending",
        });
        self.pendaftaran_repo.create(&payload).await
    }

    fn check_status(input: &ExpoInput) -> AppResult<()> {
        if let Some(status) = &input.status {
            if !STATUSES.contains(&status.as_str()) {
                return Err(AppError::BadRequest(format!(
                    "Status expo tidak dikenal: {status}"
                )));
            }
        }
        Ok(())
    }
}

/// Registration count at which admission closes.
const fn capacity_threshold(max_peserta: u32) -> u64 {
    max_peserta as u64 * CAPACITY_THRESHOLD_PCT / 100
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Duration;
    use httpmock::prelude::*;
    use puspresma_cms::CmsClient;
    use puspresma_common::CmsConfig;
    use std::sync::Arc;

    fn service_for(server: &MockServer) -> ExpoService {
        let client = Arc::new(
            CmsClient::new(&CmsConfig {
                url: server.base_url(),
                static_token: None,
                asset_width: 800,
            })
            .unwrap(),
        );
        ExpoService::new(
            ExpoRepository::new(Arc::clone(&client)),
            PendaftaranExpoRepository::new(client),
        )
    }

    fn valid_form() -> ExpoRegistrationForm {
        ExpoRegistrationForm {
            nama_ketua: Some("Siti Rahma".to_string()),
            nim_ketua: Some("21120120110001".to_string()),
            email: Some("siti@students.ac.id".to_string()),
            telepon: Some("081298765432".to_string()),
            nama_anggota1: Some("Andi".to_string()),
            nim_anggota1: Some("21120120110002".to_string()),
            nama_proyek: Some("Smart Garden".to_string()),
            deskripsi_proyek: Some("Penyiraman otomatis berbasis IoT".to_string()),
            ..ExpoRegistrationForm::default()
        }
    }

    async fn mock_open_expo(server: &MockServer, max_peserta: u32) {
        let deadline = Utc::now().date_naive() + Duration::days(10);
        server
            .mock_async(move |when, then| {
                when.method(GET).path("/items/expo/3");
                then.status(200).json_body(json!({
                    "data": {
                        "id": 3, "judul": "Expo Karya Mahasiswa",
                        "pendaftaran_dibuka": true,
                        "deadline_pendaftaran": deadline.to_string(),
                        "max_peserta": max_peserta,
                        "status": "upcoming",
                    }
                }));
            })
            .await;
    }

    async fn mock_registration_count(server: &MockServer, count: u64) {
        server
            .mock_async(move |when, then| {
                when.method(GET)
                    .path("/items/pendaftaran_expo")
                    .query_param("meta", "total_count,filter_count");
                then.status(200).json_body(json!({
                    "data": [],
                    "meta": { "total_count": count, "filter_count": count }
                }));
            })
            .await;
    }

    #[test]
    fn test_capacity_threshold_is_ninety_percent() {
        assert_eq!(capacity_threshold(10), 9);
        assert_eq!(capacity_threshold(20), 18);
        assert_eq!(capacity_threshold(15), 13);
    }

    #[tokio::test]
    async fn test_ninety_percent_boundary_rejects() {
        let server = MockServer::start_async().await;
        mock_open_expo(&server, 10).await;
        mock_registration_count(&server, 9).await;

        let service = service_for(&server);
        let err = service.register("3", &valid_form()).await.unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));
    }

    #[tokio::test]
    async fn test_below_boundary_accepts() {
        let server = MockServer::start_async().await;
        mock_open_expo(&server, 10).await;
        mock_registration_count(&server, 8).await;

        // Duplicate probe: no clashes
        server
            .mock_async(|when, then| {
                when.method(GET)
                    .path("/items/pendaftaran_expo")
                    .query_param_missing("meta");
                then.status(200).json_body(json!({ "data": [] }));
            })
            .await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/items/pendaftaran_expo");
                then.status(200).json_body(json!({
                    "data": { "id": 77, "expo_id": 3, "nama_ketua": "Siti Rahma",
                              "nim_ketua": "21120120110001", "email": "siti@students.ac.id",
                              "nama_proyek": "Smart Garden", "status": "pending" }
                }));
            })
            .await;

        let service = service_for(&server);
        let registration = service.register("3", &valid_form()).await.unwrap();
        assert_eq!(registration.status, "pending");
    }

    #[tokio::test]
    async fn test_team_nim_clash_conflicts() {
        let server = MockServer::start_async().await;
        mock_open_expo(&server, 10).await;
        mock_registration_count(&server, 2).await;

        server
            .mock_async(|when, then| {
                when.method(GET)
                    .path("/items/pendaftaran_expo")
                    .query_param_missing("meta");
                then.status(200).json_body(json!({
                    "data": [{ "id": 40, "expo_id": 3, "nama_ketua": "Tim Lain",
                               "nim_ketua": "21120120110002", "email": "x@y.id",
                               "nama_proyek": "Lain", "status": "approved" }]
                }));
            })
            .await;

        let service = service_for(&server);
        let err = service.register("3", &valid_form()).await.unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_same_nim_twice_in_form_rejected() {
        let server = MockServer::start_async().await;
        let service = service_for(&server);

        let mut form = valid_form();
        form.nim_anggota1 = form.nim_ketua.clone();

        let err = service.register("3", &form).await.unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));
    }

    #[tokio::test]
    async fn test_missing_fields_all_reported() {
        let server = MockServer::start_async().await;
        let service = service_for(&server);

        let err = service
            .register("3", &ExpoRegistrationForm::default())
            .await
            .unwrap_err();
        match err {
            AppError::Validation(fields) => {
                for field in [
                    "namaKetua",
                    "nimKetua",
                    "email",
                    "telepon",
                    "namaProyek",
                    "deskripsiProyek",
                ] {
                    assert!(fields.contains_key(field), "missing {field}");
                }
            }
            other => panic!("expected validation error, got {other:?}"),
        }
    }
}
