//! Competition sign-up: validation, admission checks, and the derived
//! personal calendar entry.

use chrono::Utc;
use puspresma_cms::records::{LombaRecord, PendaftaranLombaRecord};
use puspresma_cms::repositories::{
    KalenderRepository, LombaRepository, PendaftaranLombaRepository,
};
use puspresma_common::{AppError, AppResult, FormValidator};
use serde::Deserialize;
use serde_json::json;
use tracing::warn;

/// Competition sign-up form as submitted by the public site.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationForm {
    pub nama: Option<String>,
    pub nim: Option<String>,
    pub email: Option<String>,
    pub telepon: Option<String>,
    pub fakultas: Option<String>,
    pub program_studi: Option<String>,
}

impl RegistrationForm {
    /// Presence checks over every required field, then format checks over
    /// the fields that are present. All violations are reported together.
    fn validate(&self) -> AppResult<()> {
        let mut v = FormValidator::new();
        v.require("nama", self.nama.as_deref());
        v.require("nim", self.nim.as_deref());
        v.require("email", self.email.as_deref());
        v.require("telepon", self.telepon.as_deref());
        v.require("fakultas", self.fakultas.as_deref());
        v.require("programStudi", self.program_studi.as_deref());

        v.check_nim("nim", self.nim.as_deref());
        v.check_email("email", self.email.as_deref());
        v.check_phone("telepon", self.telepon.as_deref());

        if v.is_valid() {
            Ok(())
        } else {
            Err(AppError::Validation(v.into_errors()))
        }
    }
}

/// Service for competition registrations.
#[derive(Clone)]
pub struct RegistrationService {
    lomba_repo: LombaRepository,
    pendaftaran_repo: PendaftaranLombaRepository,
    kalender_repo: KalenderRepository,
}

impl RegistrationService {
    /// Create a new registration service.
    #[must_use]
    pub const fn new(
        lomba_repo: LombaRepository,
        pendaftaran_repo: PendaftaranLombaRepository,
        kalender_repo: KalenderRepository,
    ) -> Self {
        Self {
            lomba_repo,
            pendaftaran_repo,
            kalender_repo,
        }
    }

    /// Admit one sign-up for a competition.
    ///
    /// The duplicate check and the insert are two separate requests; two
    /// near-simultaneous submissions can both pass and land in review as
    /// `pending`.
    pub async fn register(
        &self,
        lomba_id: &str,
        form: &RegistrationForm,
    ) -> AppResult<PendaftaranLombaRecord> {
        form.validate()?;

        let lomba = self
            .lomba_repo
            .find_by_id(lomba_id)
            .await?
            .filter(|l| !l.is_deleted)
            .ok_or_else(|| AppError::NotFound("Lomba".to_string()))?;

        Self::check_open(&lomba)?;

        // Present after validate()
        let nim = form.nim.as_deref().unwrap_or_default();

        if self
            .pendaftaran_repo
            .find_active_by_nim(lomba_id, nim)
            .await?
            .is_some()
        {
            return Err(AppError::Conflict(
                "NIM ini sudah terdaftar pada lomba ini".to_string(),
            ));
        }

        let payload = json!({
            "lomba_id": lomba_id,
            "nama": form.nama,
            "nim": nim,
            "email": form.email,
            "telepon": form.telepon,
            "fakultas": form.fakultas,
            "program_studi": form.program_studi,
            "status": "pending",
        });
        let registration = self.pendaftaran_repo.create(&payload).await?;

        self.create_deadline_entry(&lomba, &registration, nim).await;

        Ok(registration)
    }

    /// All registrations for one competition (admin listing). 404s when the
    /// competition does not exist.
    pub async fn list_for_lomba(
        &self,
        lomba_id: &str,
    ) -> AppResult<(Vec<PendaftaranLombaRecord>, u64)> {
        self.lomba_repo
            .find_by_id(lomba_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Lomba".to_string()))?;
        self.pendaftaran_repo.find_by_lomba(lomba_id).await
    }

    fn check_open(lomba: &LombaRecord) -> AppResult<()> {
        if lomba.status == "closed" {
            return Err(AppError::BadRequest(
                "Pendaftaran lomba ini sudah ditutup".to_string(),
            ));
        }
        if !lomba.pendaftaran_dibuka {
            return Err(AppError::BadRequest(
                "Pendaftaran lomba ini belum dibuka".to_string(),
            ));
        }
        if let Some(deadline) = lomba.deadline {
            if deadline < Utc::now().date_naive() {
                return Err(AppError::BadRequest(
                    "Deadline pendaftaran sudah lewat".to_string(),
                ));
            }
        }
        Ok(())
    }

    /// Best-effort secondary write: a personal deadline entry on the
    /// registrant's calendar. Never fails the registration.
    async fn create_deadline_entry(
        &self,
        lomba: &LombaRecord,
        registration: &PendaftaranLombaRecord,
        nim: &str,
    ) {
        let Some(deadline) = lomba.deadline else {
            return;
        };

        let link = lomba
            .slug
            .as_ref()
            .map_or_else(|| format!("/lomba/{}", lomba.id), |s| format!("/lomba/{s}"));
        let payload = json!({
            "nim": nim,
            "judul": format!("Deadline: {}", lomba.judul),
            "tanggal": deadline.to_string(),
            "tipe": "deadline",
            "deskripsi": format!("Batas pendaftaran {}", lomba.judul),
            "link": link,
            "pendaftaran_id": registration.id,
        });

        if let Err(e) = self.kalender_repo.create(&payload).await {
            warn!(
                lomba_id = %lomba.id,
                nim = %nim,
                error = %e,
                "Failed to create calendar entry for registration"
            );
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Duration;
    use httpmock::prelude::*;
    use puspresma_cms::CmsClient;
    use puspresma_common::CmsConfig;
    use serde_json::Value;
    use std::sync::Arc;

    fn service_for(server: &MockServer) -> RegistrationService {
        let client = Arc::new(
            CmsClient::new(&CmsConfig {
                url: server.base_url(),
                static_token: None,
                asset_width: 800,
            })
            .unwrap(),
        );
        RegistrationService::new(
            LombaRepository::new(Arc::clone(&client)),
            PendaftaranLombaRepository::new(Arc::clone(&client)),
            KalenderRepository::new(client),
        )
    }

    fn valid_form() -> RegistrationForm {
        RegistrationForm {
            nama: Some("Budi Santoso".to_string()),
            nim: Some("21120119130099".to_string()),
            email: Some("budi@students.ac.id".to_string()),
            telepon: Some("081234567890".to_string()),
            fakultas: Some("Teknik".to_string()),
            program_studi: Some("Informatika".to_string()),
        }
    }

    fn open_lomba_body(deadline: chrono::NaiveDate) -> Value {
        json!({
            "data": {
                "id": 1,
                "judul": "Gemastik",
                "slug": "gemastik",
                "status": "open",
                "pendaftaran_dibuka": true,
                "deadline": deadline.to_string(),
            }
        })
    }

    #[tokio::test]
    async fn test_missing_fields_all_reported() {
        let server = MockServer::start_async().await;
        let service = service_for(&server);

        let form = RegistrationForm {
            nama: Some("Budi".to_string()),
            email: Some("budi@students.ac.id".to_string()),
            ..RegistrationForm::default()
        };

        let err = service.register("1", &form).await.unwrap_err();
        match err {
            AppError::Validation(fields) => {
                assert!(fields.contains_key("nim"));
                assert!(fields.contains_key("telepon"));
                assert!(fields.contains_key("fakultas"));
                assert!(fields.contains_key("programStudi"));
                assert!(!fields.contains_key("nama"));
            }
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_register_persists_pending_and_calendar_entry() {
        let server = MockServer::start_async().await;
        let deadline = Utc::now().date_naive() + Duration::days(14);

        server
            .mock_async(|when, then| {
                when.method(GET).path("/items/lomba/1");
                then.status(200).json_body(open_lomba_body(deadline));
            })
            .await;
        // Duplicate probe comes back empty
        server
            .mock_async(|when, then| {
                when.method(GET).path("/items/pendaftaran_lomba");
                then.status(200).json_body(json!({ "data": [] }));
            })
            .await;
        let insert = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/items/pendaftaran_lomba")
                    .json_body_includes(json!({ "status": "pending", "nim": "21120119130099" }).to_string());
                then.status(200).json_body(json!({
                    "data": {
                        "id": 55, "lomba_id": 1, "nama": "Budi Santoso",
                        "nim": "21120119130099", "email": "budi@students.ac.id",
                        "status": "pending",
                    }
                }));
            })
            .await;
        let calendar = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/items/kalender")
                    .json_body_includes(json!({ "tipe": "deadline", "nim": "21120119130099" }).to_string());
                then.status(200).json_body(json!({
                    "data": { "id": 9, "judul": "Deadline: Gemastik", "tanggal": deadline.to_string() }
                }));
            })
            .await;

        let service = service_for(&server);
        let registration = service.register("1", &valid_form()).await.unwrap();

        insert.assert_async().await;
        calendar.assert_async().await;
        assert_eq!(registration.status, "pending");
    }

    #[tokio::test]
    async fn test_calendar_failure_does_not_fail_registration() {
        let server = MockServer::start_async().await;
        let deadline = Utc::now().date_naive() + Duration::days(3);

        server
            .mock_async(|when, then| {
                when.method(GET).path("/items/lomba/1");
                then.status(200).json_body(open_lomba_body(deadline));
            })
            .await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/items/pendaftaran_lomba");
                then.status(200).json_body(json!({ "data": [] }));
            })
            .await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/items/pendaftaran_lomba");
                then.status(200).json_body(json!({
                    "data": { "id": 56, "nama": "Budi Santoso", "nim": "21120119130099",
                              "email": "budi@students.ac.id", "status": "pending" }
                }));
            })
            .await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/items/kalender");
                then.status(500).json_body(json!({ "errors": [{ "message": "boom" }] }));
            })
            .await;

        let service = service_for(&server);
        let result = service.register("1", &valid_form()).await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_duplicate_nim_conflicts_without_insert() {
        let server = MockServer::start_async().await;
        let deadline = Utc::now().date_naive() + Duration::days(7);

        server
            .mock_async(|when, then| {
                when.method(GET).path("/items/lomba/1");
                then.status(200).json_body(open_lomba_body(deadline));
            })
            .await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/items/pendaftaran_lomba");
                then.status(200).json_body(json!({
                    "data": [{ "id": 12, "nama": "Budi Santoso", "nim": "21120119130099",
                               "email": "budi@students.ac.id", "status": "pending" }]
                }));
            })
            .await;
        let insert = server
            .mock_async(|when, then| {
                when.method(POST).path("/items/pendaftaran_lomba");
                then.status(200).json_body(json!({ "data": { "id": 99, "nama": "x", "nim": "1", "email": "a@b.c" } }));
            })
            .await;

        let service = service_for(&server);
        let err = service.register("1", &valid_form()).await.unwrap_err();

        assert!(matches!(err, AppError::Conflict(_)));
        assert_eq!(insert.hits_async().await, 0);
    }

    #[tokio::test]
    async fn test_closed_competition_rejected() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/items/lomba/1");
                then.status(200).json_body(json!({
                    "data": { "id": 1, "judul": "Gemastik", "status": "closed",
                              "pendaftaran_dibuka": true }
                }));
            })
            .await;

        let service = service_for(&server);
        let err = service.register("1", &valid_form()).await.unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));
    }

    #[tokio::test]
    async fn test_past_deadline_rejected() {
        let server = MockServer::start_async().await;
        let deadline = Utc::now().date_naive() - Duration::days(1);
        server
            .mock_async(|when, then| {
                when.method(GET).path("/items/lomba/1");
                then.status(200).json_body(open_lomba_body(deadline));
            })
            .await;

        let service = service_for(&server);
        let err = service.register("1", &valid_form()).await.unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));
    }

    #[tokio::test]
    async fn test_missing_competition_is_404() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/items/lomba/404");
                then.status(404).json_body(json!({ "errors": [{ "message": "Item doesn't exist." }] }));
            })
            .await;

        let service = service_for(&server);
        let err = service.register("404", &valid_form()).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }
}
