//! Static content passthrough with hardcoded fallbacks.
//!
//! Each content endpoint serves the CMS collection when it answers and a
//! small built-in payload when the collection is absent, empty, or failing.
//! Fallbacks keep the public site functional while the CMS is being set up.

use puspresma_cms::repositories::KontenRepository;
use puspresma_common::AppResult;
use serde_json::{Value, json};
use tracing::warn;

use crate::format::asset_url;

/// Service for the content collections.
#[derive(Clone)]
pub struct KontenService {
    repo: KontenRepository,
    cms_base: String,
}

impl KontenService {
    /// Create a new content service.
    #[must_use]
    pub const fn new(repo: KontenRepository, cms_base: String) -> Self {
        Self { repo, cms_base }
    }

    /// FAQ entries.
    pub async fn faq(&self) -> AppResult<Value> {
        match self.repo.list_faq().await {
            Ok(rows) if !rows.is_empty() => Ok(json!(rows)),
            Ok(_) => Ok(Self::faq_fallback()),
            Err(e) => {
                warn!(error = %e, "FAQ collection unavailable, serving fallback");
                Ok(Self::faq_fallback())
            }
        }
    }

    /// Tip articles.
    pub async fn tips(&self) -> AppResult<Value> {
        match self.repo.list_tips().await {
            Ok(rows) if !rows.is_empty() => Ok(json!(rows)),
            Ok(_) => Ok(Self::tips_fallback()),
            Err(e) => {
                warn!(error = %e, "Tips collection unavailable, serving fallback");
                Ok(Self::tips_fallback())
            }
        }
    }

    /// Document templates with resolved download URLs.
    pub async fn templates(&self) -> AppResult<Value> {
        match self.repo.list_templates().await {
            Ok(rows) if !rows.is_empty() => {
                let rows: Vec<Value> = rows
                    .into_iter()
                    .map(|t| {
                        let file_url = t
                            .file
                            .as_ref()
                            .map(|id| asset_url(&self.cms_base, id, None));
                        json!({
                            "id": t.id,
                            "nama": t.nama,
                            "deskripsi": t.deskripsi,
                            "kategori": t.kategori,
                            "fileUrl": file_url,
                        })
                    })
                    .collect();
                Ok(json!(rows))
            }
            Ok(_) => Ok(Self::templates_fallback()),
            Err(e) => {
                warn!(error = %e, "Template collection unavailable, serving fallback");
                Ok(Self::templates_fallback())
            }
        }
    }

    /// Alias surface for templates, kept as its own endpoint.
    pub async fn downloads(&self) -> AppResult<Value> {
        self.templates().await
    }

    /// Guide pages.
    pub async fn panduan(&self) -> AppResult<Value> {
        match self.repo.list_panduan().await {
            Ok(rows) if !rows.is_empty() => Ok(json!(rows)),
            Ok(_) => Ok(Self::panduan_fallback()),
            Err(e) => {
                warn!(error = %e, "Guide collection unavailable, serving fallback");
                Ok(Self::panduan_fallback())
            }
        }
    }

    /// Combined resource listing (templates + guides).
    pub async fn resources(&self) -> AppResult<Value> {
        let (templates, panduan) = tokio::join!(self.templates(), self.panduan());
        Ok(json!({
            "templates": templates?,
            "panduan": panduan?,
        }))
    }

    /// Site-wide settings.
    pub async fn site_settings(&self) -> AppResult<Value> {
        match self.repo.get_site_settings().await {
            Ok(Some(settings)) => Ok(json!(settings)),
            Ok(None) => Ok(Self::site_settings_fallback()),
            Err(e) => {
                warn!(error = %e, "Site settings unavailable, serving fallback");
                Ok(Self::site_settings_fallback())
            }
        }
    }

    fn faq_fallback() -> Value {
        json!([
            {
                "id": "fallback-1",
                "pertanyaan": "Bagaimana cara mendaftar lomba?",
                "jawaban": "Buka halaman lomba, pilih lomba yang masih dibuka, lalu isi formulir pendaftaran.",
                "kategori": "Pendaftaran",
                "urutan": 1,
            },
            {
                "id": "fallback-2",
                "pertanyaan": "Bagaimana cara mengajukan prestasi?",
                "jawaban": "Gunakan formulir pengajuan prestasi dan lampirkan sertifikat dalam format PDF, JPEG, atau PNG.",
                "kategori": "Prestasi",
                "urutan": 2,
            },
        ])
    }

    fn tips_fallback() -> Value {
        json!([
            {
                "id": "fallback-1",
                "judul": "Mulai dari lomba tingkat internal",
                "konten": "Lomba internal kampus adalah tempat berlatih sebelum maju ke tingkat nasional.",
                "kategori": "Umum",
            },
        ])
    }

    fn templates_fallback() -> Value {
        json!([
            {
                "id": "fallback-1",
                "nama": "Template Proposal Lomba",
                "deskripsi": "Kerangka proposal standar untuk pendaftaran lomba.",
                "kategori": "Proposal",
                "fileUrl": null,
            },
        ])
    }

    fn panduan_fallback() -> Value {
        json!([
            {
                "id": "fallback-1",
                "judul": "Panduan Pendaftaran Lomba",
                "konten": "Langkah-langkah mendaftar lomba melalui portal Puspresma.",
                "urutan": 1,
            },
        ])
    }

    fn site_settings_fallback() -> Value {
        json!({
            "nama_situs": "Pusat Prestasi Mahasiswa",
            "deskripsi": "Portal lomba, expo, dan prestasi mahasiswa.",
            "email_kontak": "puspresma@kampus.ac.id",
            "telepon": null,
            "alamat": null,
            "instagram": null,
            "youtube": null,
        })
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

    fn service_for(server: &MockServer) -> KontenService {
        let client = Arc::new(
            CmsClient::new(&CmsConfig {
                url: server.base_url(),
                static_token: None,
                asset_width: 800,
            })
            .unwrap(),
        );
        KontenService::new(KontenRepository::new(client), server.base_url())
    }

    #[tokio::test]
    async fn test_missing_collection_serves_fallback() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/items/faq");
                then.status(403).json_body(json!({
                    "errors": [{
                        "message": "You don't have permission to access this.",
                        "extensions": { "code": "FORBIDDEN" }
                    }]
                }));
            })
            .await;

        let service = service_for(&server);
        let faq = service.faq().await.unwrap();
        assert!(faq.as_array().unwrap().len() >= 2);
        assert_eq!(faq[0]["id"], "fallback-1");
    }

    #[tokio::test]
    async fn test_empty_collection_serves_fallback() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/items/tips");
                then.status(200).json_body(json!({ "data": [] }));
            })
            .await;

        let service = service_for(&server);
        let tips = service.tips().await.unwrap();
        assert_eq!(tips[0]["id"], "fallback-1");
    }

    #[tokio::test]
    async fn test_populated_collection_passes_through() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/items/faq");
                then.status(200).json_body(json!({
                    "data": [{ "id": 1, "pertanyaan": "P?", "jawaban": "J.", "urutan": 1 }]
                }));
            })
            .await;

        let service = service_for(&server);
        let faq = service.faq().await.unwrap();
        assert_eq!(faq[0]["pertanyaan"], "P?");
    }

    #[tokio::test]
    async fn test_template_files_resolve_to_asset_urls() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/items/template_dokumen");
                then.status(200).json_body(json!({
                    "data": [{ "id": 1, "nama": "Proposal", "file": "asset-9" }]
                }));
            })
            .await;

        let service = service_for(&server);
        let templates = service.templates().await.unwrap();
        let url = templates[0]["fileUrl"].as_str().unwrap();
        assert!(url.ends_with("/assets/asset-9"));
    }
}
