//! Competition service.

use chrono::NaiveDate;
use puspresma_cms::records::LombaRecord;
use puspresma_cms::repositories::{LombaListParams, LombaRepository};
use puspresma_common::{AppError, AppResult, FormValidator};
use serde::Deserialize;
use serde_json::{Map, Value, json};

const STATUSES: [&str; 3] = ["open", "closed", "coming-soon"];

/// Admin write payload for a competition. All fields optional; `create`
/// enforces the minimum, `update` patches only what is present.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LombaInput {
    pub judul: Option<String>,
    pub slug: Option<String>,
    pub kategori: Option<String>,
    pub tingkat: Option<String>,
    pub penyelenggara: Option<String>,
    pub deadline: Option<NaiveDate>,
    pub tanggal_pelaksanaan: Option<NaiveDate>,
    pub biaya: Option<i64>,
    pub link_pendaftaran: Option<String>,
    pub deskripsi: Option<String>,
    pub poster: Option<String>,
    pub pendaftaran_dibuka: Option<bool>,
    pub featured: Option<bool>,
    pub status: Option<String>,
}

impl LombaInput {
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
        put("kategori", self.kategori.clone().map(Value::from));
        put("tingkat", self.tingkat.clone().map(Value::from));
        put("penyelenggara", self.penyelenggara.clone().map(Value::from));
        put("deadline", self.deadline.map(|d| Value::from(d.to_string())));
        put(
            "tanggal_pelaksanaan",
            self.tanggal_pelaksanaan.map(|d| Value::from(d.to_string())),
        );
        put("biaya", self.biaya.map(Value::from));
        put(
            "link_pendaftaran",
            self.link_pendaftaran.clone().map(Value::from),
        );
        put("deskripsi", self.deskripsi.clone().map(Value::from));
        put("poster", self.poster.clone().map(Value::from));
        put(
            "pendaftaran_dibuka",
            self.pendaftaran_dibuka.map(Value::from),
        );
        put("featured", self.featured.map(Value::from));
        put("status", self.status.clone().map(Value::from));

        Value::Object(map)
    }

    fn check_status(&self) -> AppResult<()> {
        if let Some(status) = &self.status {
            if !STATUSES.contains(&status.as_str()) {
                return Err(AppError::BadRequest(format!(
                    "Status lomba tidak dikenal: {status}"
                )));
            }
        }
        Ok(())
    }
}

/// Service for managing competitions.
#[derive(Clone)]
pub struct LombaService {
    repo: LombaRepository,
}

impl LombaService {
    /// Create a new competition service.
    #[must_use]
    pub const fn new(repo: LombaRepository) -> Self {
        Self { repo }
    }

    /// List competitions.
    pub async fn list(&self, params: &LombaListParams) -> AppResult<(Vec<LombaRecord>, u64)> {
        self.repo.find(params).await
    }

    /// Fetch one live competition by slug.
    pub async fn get_by_slug(&self, slug: &str) -> AppResult<LombaRecord> {
        self.repo
            .find_by_slug(slug)
            .await?
            .ok_or_else(|| AppError::NotFound("Lomba".to_string()))
    }

    /// Fetch one competition by id. Soft-deleted rows stay hidden unless
    /// `include_deleted` is set (admin detail views).
    pub async fn get(&self, id: &str, include_deleted: bool) -> AppResult<LombaRecord> {
        let lomba = self
            .repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Lomba".to_string()))?;
        if lomba.is_deleted && !include_deleted {
            return Err(AppError::NotFound("Lomba".to_string()));
        }
        Ok(lomba)
    }

    /// Create a competition.
    pub async fn create(&self, input: &LombaInput) -> AppResult<LombaRecord> {
        let mut v = FormValidator::new();
        v.require("judul", input.judul.as_deref());
        if !v.is_valid() {
            return Err(AppError::Validation(v.into_errors()));
        }
        input.check_status()?;

        self.repo.create(&input.to_payload()).await
    }

    /// Patch a competition.
    pub async fn update(&self, id: &str, input: &LombaInput) -> AppResult<LombaRecord> {
        input.check_status()?;
        self.get(id, true).await?;
        self.repo.update(id, &input.to_payload()).await
    }

    /// Delete a competition: soft by default, permanently when asked.
    pub async fn delete(&self, id: &str, permanent: bool) -> AppResult<()> {
        self.get(id, true).await?;
        if permanent {
            tracing::info!(lomba_id = %id, "Permanently deleting competition");
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

    #[test]
    fn test_payload_skips_absent_fields() {
        let input = LombaInput {
            judul: Some("Gemastik XVII".to_string()),
            status: Some("open".to_string()),
            ..LombaInput::default()
        };

        let payload = input.to_payload();
        assert_eq!(payload, json!({ "judul": "Gemastik XVII", "status": "open" }));
    }

    #[test]
    fn test_payload_serializes_dates_as_plain_strings() {
        let input = LombaInput {
            deadline: NaiveDate::from_ymd_opt(2026, 9, 30),
            ..LombaInput::default()
        };
        assert_eq!(input.to_payload(), json!({ "deadline": "2026-09-30" }));
    }

    #[test]
    fn test_unknown_status_rejected() {
        let input = LombaInput {
            status: Some("archived".to_string()),
            ..LombaInput::default()
        };
        assert!(input.check_status().is_err());
    }

    #[test]
    fn test_input_accepts_camel_case() {
        let input: LombaInput = serde_json::from_value(json!({
            "judul": "Lomba Esai",
            "linkPendaftaran": "https://example.id/daftar",
            "pendaftaranDibuka": true,
        }))
        .unwrap();

        assert_eq!(input.link_pendaftaran.as_deref(), Some("https://example.id/daftar"));
        assert_eq!(input.pendaftaran_dibuka, Some(true));
    }
}
