//! Contact channel service.

use puspresma_cms::records::KontakRecord;
use puspresma_cms::repositories::{KontakListParams, KontakRepository};
use puspresma_common::{AppError, AppResult, FormValidator};
use serde::Deserialize;
use serde_json::json;

/// Public contact form.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KontakForm {
    pub nama: Option<String>,
    pub email: Option<String>,
    pub subjek: Option<String>,
    pub pesan: Option<String>,
}

/// Service for the contact channel.
#[derive(Clone)]
pub struct KontakService {
    repo: KontakRepository,
}

impl KontakService {
    /// Create a new contact service.
    #[must_use]
    pub const fn new(repo: KontakRepository) -> Self {
        Self { repo }
    }

    /// List messages (admin).
    pub async fn list(&self, params: &KontakListParams) -> AppResult<(Vec<KontakRecord>, u64)> {
        self.repo.find(params).await
    }

    /// Fetch one message (admin).
    pub async fn get(&self, id: &str) -> AppResult<KontakRecord> {
        self.repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Pesan".to_string()))
    }

    /// Accept a public contact submission; stored as `unread`.
    pub async fn submit(&self, form: &KontakForm) -> AppResult<KontakRecord> {
        let mut v = FormValidator::new();
        v.require("nama", form.nama.as_deref());
        v.require("email", form.email.as_deref());
        v.require("pesan", form.pesan.as_deref());
        v.check_email("email", form.email.as_deref());
        if !v.is_valid() {
            return Err(AppError::Validation(v.into_errors()));
        }

        let payload = json!({
            "nama": form.nama,
            "email": form.email,
            "subjek": form.subjek,
            "pesan": form.pesan,
            "status": "unread",
        });
        self.repo.create(&payload).await
    }

    /// Flip the read status (admin).
    pub async fn set_status(&self, id: &str, status: &str) -> AppResult<KontakRecord> {
        if status != "read" && status != "unread" {
            return Err(AppError::BadRequest(format!(
                "Status pesan tidak dikenal: {status}"
            )));
        }
        self.get(id).await?;
        self.repo.update(id, &json!({ "status": status })).await
    }

    /// Delete a message: soft by default, permanently when asked.
    pub async fn delete(&self, id: &str, permanent: bool) -> AppResult<()> {
        self.get(id).await?;
        if permanent {
            self.repo.hard_delete(id).await
        } else {
            self.repo.soft_delete(id).await
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use httpmock::prelude::*;
    use puspresma_cms::CmsClient;
    use puspresma_common::CmsConfig;
    use std::sync::Arc;

    fn service_for(server: &MockServer) -> KontakService {
        let client = Arc::new(
            CmsClient::new(&CmsConfig {
                url: server.base_url(),
                static_token: None,
                asset_width: 800,
            })
            .unwrap(),
        );
        KontakService::new(KontakRepository::new(client))
    }

    #[tokio::test]
    async fn test_submit_requires_fields() {
        let server = MockServer::start_async().await;
        let service = service_for(&server);

        let err = service.submit(&KontakForm::default()).await.unwrap_err();
        match err {
            AppError::Validation(fields) => {
                assert!(fields.contains_key("nama"));
                assert!(fields.contains_key("email"));
                assert!(fields.contains_key("pesan"));
            }
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_submit_stores_unread() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/items/kontak")
                    .json_body_includes(json!({ "status": "unread" }).to_string());
                then.status(200).json_body(json!({
                    "data": { "id": 4, "nama": "Budi", "email": "budi@students.ac.id",
                              "pesan": "Halo", "status": "unread" }
                }));
            })
            .await;

        let service = service_for(&server);
        let form = KontakForm {
            nama: Some("Budi".to_string()),
            email: Some("budi@students.ac.id".to_string()),
            subjek: Some("Tanya lomba".to_string()),
            pesan: Some("Halo".to_string()),
        };
        let record = service.submit(&form).await.unwrap();

        mock.assert_async().await;
        assert_eq!(record.status, "unread");
    }

    #[tokio::test]
    async fn test_unknown_status_rejected() {
        let server = MockServer::start_async().await;
        let service = service_for(&server);

        let err = service.set_status("1", "archived").await.unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));
    }
}
