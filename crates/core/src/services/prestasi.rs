//! Achievement service: public submission with certificate upload, admin
//! review, verification timestamps.

use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use puspresma_cms::CmsClient;
use puspresma_cms::records::PrestasiRecord;
use puspresma_cms::repositories::{PrestasiListParams, PrestasiRepository};
use puspresma_common::{AppError, AppResult, FormValidator};
use serde::Deserialize;
use serde_json::{Map, Value, json};
use tracing::info;

/// Certificate upload limits.
pub const MAX_CERTIFICATE_BYTES: usize = 5 * 1024 * 1024;
const ALLOWED_CERTIFICATE_TYPES: [&str; 3] = ["application/pdf", "image/jpeg", "image/png"];

/// Uploaded certificate file.
#[derive(Debug, Clone)]
pub struct CertificateUpload {
    /// Original file name.
    pub file_name: String,
    /// MIME type as sent by the browser.
    pub content_type: String,
    /// Raw bytes.
    pub data: Vec<u8>,
}

/// Public achievement submission (multipart text fields).
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrestasiSubmission {
    pub judul: Option<String>,
    pub nama_lomba: Option<String>,
    pub tingkat: Option<String>,
    pub peringkat: Option<String>,
    pub tanggal: Option<NaiveDate>,
    pub nama_mahasiswa: Option<String>,
    pub nim: Option<String>,
    pub fakultas: Option<String>,
    pub program_studi: Option<String>,
}

/// Admin write payload for an achievement.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrestasiInput {
    pub judul: Option<String>,
    pub nama_lomba: Option<String>,
    pub tingkat: Option<String>,
    pub peringkat: Option<String>,
    pub tanggal: Option<NaiveDate>,
    pub nama_mahasiswa: Option<String>,
    pub nim: Option<String>,
    pub fakultas: Option<String>,
    pub program_studi: Option<String>,
    pub status: Option<String>,
}

impl PrestasiInput {
    /// Storage payload with only the fields that were supplied. A status
    /// move to `verified` stamps `verified_at` with the call time — also on
    /// repeat verification, which overwrites the earlier stamp (current
    /// behavior).
    #[must_use]
    pub fn to_payload(&self) -> Value {
        let mut map = Map::new();
        let mut put = |key: &str, value: Option<Value>| {
            if let Some(value) = value {
                map.insert(key.to_string(), value);
            }
        };

        put("judul", self.judul.clone().map(Value::from));
        put("nama_lomba", self.nama_lomba.clone().map(Value::from));
        put("tingkat", self.tingkat.clone().map(Value::from));
        put("peringkat", self.peringkat.clone().map(Value::from));
        put("tanggal", self.tanggal.map(|d| Value::from(d.to_string())));
        put("nama_mahasiswa", self.nama_mahasiswa.clone().map(Value::from));
        put("nim", self.nim.clone().map(Value::from));
        put("fakultas", self.fakultas.clone().map(Value::from));
        put("program_studi", self.program_studi.clone().map(Value::from));
        put("status", self.status.clone().map(Value::from));

        if self.status.as_deref() == Some("verified") {
            map.insert(
                "verified_at".to_string(),
                Value::from(Utc::now().to_rfc3339()),
            );
        }

        Value::Object(map)
    }
}

/// Service for managing achievements.
#[derive(Clone)]
pub struct PrestasiService {
    repo: PrestasiRepository,
    client: Arc<CmsClient>,
}

impl PrestasiService {
    /// Create a new achievement service.
    #[must_use]
    pub const fn new(repo: PrestasiRepository, client: Arc<CmsClient>) -> Self {
        Self { repo, client }
    }

    /// List achievements.
    pub async fn list(&self, params: &PrestasiListParams) -> AppResult<(Vec<PrestasiRecord>, u64)> {
        self.repo.find(params).await
    }

    /// Fetch one achievement by id.
    pub async fn get(&self, id: &str, include_deleted: bool) -> AppResult<PrestasiRecord> {
        let prestasi = self
            .repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Prestasi".to_string()))?;
        if prestasi.is_deleted && !include_deleted {
            return Err(AppError::NotFound("Prestasi".to_string()));
        }
        Ok(prestasi)
    }

    /// Accept a public submission: validate fields and the certificate,
    /// push the file to the store's asset pipeline, insert as `pending`.
    pub async fn submit(
        &self,
        submission: &PrestasiSubmission,
        certificate: Option<CertificateUpload>,
    ) -> AppResult<PrestasiRecord> {
        Self::validate_submission(submission, certificate.as_ref())?;

        // Checked by validate_submission
        let certificate = certificate.ok_or_else(|| {
            AppError::BadRequest("Sertifikat wajib dilampirkan".to_string())
        })?;

        let asset_id = self
            .client
            .upload_file(
                &certificate.file_name,
                &certificate.content_type,
                certificate.data,
            )
            .await?;

        let payload = json!({
            "judul": submission.judul,
            "nama_lomba": submission.nama_lomba,
            "tingkat": submission.tingkat,
            "peringkat": submission.peringkat,
            "tanggal": submission.tanggal.map(|d| d.to_string()),
            "nama_mahasiswa": submission.nama_mahasiswa,
            "nim": submission.nim,
            "fakultas": submission.fakultas,
            "program_studi": submission.program_studi,
            "sertifikat": asset_id,
            "status": "pending",
        });

        let record = self.repo.create(&payload).await?;
        info!(prestasi_id = %record.id, nim = %record.nim, "Achievement submitted for review");
        Ok(record)
    }

    /// Create an achievement directly (admin).
    pub async fn create(&self, input: &PrestasiInput) -> AppResult<PrestasiRecord> {
        let mut v = FormValidator::new();
        v.require("judul", input.judul.as_deref());
        v.require("namaMahasiswa", input.nama_mahasiswa.as_deref());
        v.require("nim", input.nim.as_deref());
        v.check_nim("nim", input.nim.as_deref());
        if !v.is_valid() {
            return Err(AppError::Validation(v.into_errors()));
        }

        self.repo.create(&input.to_payload()).await
    }

    /// Patch an achievement; verification stamping happens in
    /// [`PrestasiInput::to_payload`].
    pub async fn update(&self, id: &str, input: &PrestasiInput) -> AppResult<PrestasiRecord> {
        if let Some(status) = &input.status {
            if status != "pending" && status != "verified" {
                return Err(AppError::BadRequest(format!(
                    "Status prestasi tidak dikenal: {status}"
                )));
            }
        }
        self.get(id, true).await?;
        self.repo.update(id, &input.to_payload()).await
    }

    /// Delete an achievement: soft by default, permanently when asked.
    pub async fn delete(&self, id: &str, permanent: bool) -> AppResult<()> {
        self.get(id, true).await?;
        if permanent {
            info!(prestasi_id = %id, "Permanently deleting achievement");
            self.repo.hard_delete(id).await
        } else {
            self.repo.soft_delete(id).await
        }
    }

    fn validate_submission(
        submission: &PrestasiSubmission,
        certificate: Option<&CertificateUpload>,
    ) -> AppResult<()> {
        let mut v = FormValidator::new();
        v.require("judul", submission.judul.as_deref());
        v.require("namaLomba", submission.nama_lomba.as_deref());
        v.require("namaMahasiswa", submission.nama_mahasiswa.as_deref());
        v.require("nim", submission.nim.as_deref());
        v.check_nim("nim", submission.nim.as_deref());
        if !v.is_valid() {
            return Err(AppError::Validation(v.into_errors()));
        }

        let Some(certificate) = certificate else {
            return Err(AppError::BadRequest(
                "Sertifikat wajib dilampirkan".to_string(),
            ));
        };
        if certificate.data.len() > MAX_CERTIFICATE_BYTES {
            return Err(AppError::BadRequest(
                "Ukuran sertifikat melebihi 5 MB".to_string(),
            ));
        }
        if !ALLOWED_CERTIFICATE_TYPES.contains(&certificate.content_type.as_str()) {
            return Err(AppError::BadRequest(
                "Sertifikat harus berupa PDF, JPEG, atau PNG".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use httpmock::prelude::*;
    use puspresma_common::CmsConfig;

    fn service_for(server: &MockServer) -> PrestasiService {
        let client = Arc::new(
            CmsClient::new(&CmsConfig {
                url: server.base_url(),
                static_token: None,
                asset_width: 800,
            })
            .unwrap(),
        );
        PrestasiService::new(PrestasiRepository::new(Arc::clone(&client)), client)
    }

    fn submission() -> PrestasiSubmission {
        PrestasiSubmission {
            judul: Some("Juara 1 Gemastik".to_string()),
            nama_lomba: Some("Gemastik".to_string()),
            tingkat: Some("Nasional".to_string()),
            peringkat: Some("Juara 1".to_string()),
            tanggal: NaiveDate::from_ymd_opt(2026, 6, 20),
            nama_mahasiswa: Some("Budi Santoso".to_string()),
            nim: Some("21120119130099".to_string()),
            ..PrestasiSubmission::default()
        }
    }

    fn pdf(len: usize) -> CertificateUpload {
        CertificateUpload {
            file_name: "sertifikat.pdf".to_string(),
            content_type: "application/pdf".to_string(),
            data: vec![0; len],
        }
    }

    #[test]
    fn test_verified_status_stamps_timestamp() {
        let input = PrestasiInput {
            status: Some("verified".to_string()),
            ..PrestasiInput::default()
        };
        let payload = input.to_payload();
        assert_eq!(payload["status"], "verified");
        assert!(payload.get("verified_at").is_some());
    }

    #[test]
    fn test_pending_status_leaves_timestamp_alone() {
        let input = PrestasiInput {
            status: Some("pending".to_string()),
            ..PrestasiInput::default()
        };
        assert!(input.to_payload().get("verified_at").is_none());
    }

    #[tokio::test]
    async fn test_oversized_certificate_rejected() {
        let server = MockServer::start_async().await;
        let service = service_for(&server);

        let err = service
            .submit(&submission(), Some(pdf(MAX_CERTIFICATE_BYTES + 1)))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));
    }

    #[tokio::test]
    async fn test_disallowed_type_rejected() {
        let server = MockServer::start_async().await;
        let service = service_for(&server);

        let certificate = CertificateUpload {
            file_name: "sertifikat.gif".to_string(),
            content_type: "image/gif".to_string(),
            data: vec![0; 100],
        };
        let err = service
            .submit(&submission(), Some(certificate))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));
    }

    #[tokio::test]
    async fn test_submit_uploads_then_inserts_pending() {
        let server = MockServer::start_async().await;
        let upload = server
            .mock_async(|when, then| {
                when.method(POST).path("/files");
                then.status(200)
                    .json_body(json!({ "data": { "id": "asset-abc" } }));
            })
            .await;
        let insert = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/items/prestasi")
                    .json_body_includes(
                        json!({ "sertifikat": "asset-abc", "status": "pending" }).to_string(),
                    );
                then.status(200).json_body(json!({
                    "data": { "id": 21, "judul": "Juara 1 Gemastik",
                              "nama_mahasiswa": "Budi Santoso", "nim": "21120119130099",
                              "status": "pending" }
                }));
            })
            .await;

        let service = service_for(&server);
        let record = service.submit(&submission(), Some(pdf(1024))).await.unwrap();

        upload.assert_async().await;
        insert.assert_async().await;
        assert_eq!(record.status, "pending");
    }
}
