//! Cross-collection search.

use puspresma_cms::records::{ExpoRecord, LombaRecord, PrestasiRecord};
use puspresma_cms::repositories::{
    ExpoListParams, ExpoRepository, LombaListParams, LombaRepository, PrestasiListParams,
    PrestasiRepository,
};
use puspresma_common::{AppError, AppResult};
use serde::Serialize;

/// Result rows per collection.
const SEARCH_LIMIT: u32 = 5;

/// Search hits grouped by collection.
#[derive(Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResults {
    /// Matching competitions.
    pub lomba: Vec<LombaRecord>,
    /// Matching exhibitions.
    pub expo: Vec<ExpoRecord>,
    /// Matching achievements.
    pub prestasi: Vec<PrestasiRecord>,
}

/// Service searching competitions, exhibitions, and achievements by
/// substring.
#[derive(Clone)]
pub struct SearchService {
    lomba_repo: LombaRepository,
    expo_repo: ExpoRepository,
    prestasi_repo: PrestasiRepository,
}

impl SearchService {
    /// Create a new search service.
    #[must_use]
    pub const fn new(
        lomba_repo: LombaRepository,
        expo_repo: ExpoRepository,
        prestasi_repo: PrestasiRepository,
    ) -> Self {
        Self {
            lomba_repo,
            expo_repo,
            prestasi_repo,
        }
    }

    /// Search all collections, or one when `type_filter` narrows it.
    pub async fn search(&self, q: &str, type_filter: Option<&str>) -> AppResult<SearchResults> {
        let q = q.trim();
        if q.is_empty() {
            return Err(AppError::BadRequest(
                "Kata kunci pencarian wajib diisi".to_string(),
            ));
        }
        if let Some(t) = type_filter {
            if !["lomba", "expo", "prestasi"].contains(&t) {
                return Err(AppError::BadRequest(format!(
                    "Tipe pencarian tidak dikenal: {t}"
                )));
            }
        }
        let wants = |t: &str| type_filter.is_none_or(|f| f == t);

        let (lomba, expo, prestasi) = tokio::join!(
            async {
                if wants("lomba") {
                    let params = LombaListParams {
                        search: Some(q.to_string()),
                        limit: SEARCH_LIMIT,
                        ..LombaListParams::default()
                    };
                    self.lomba_repo.find(&params).await.map(|(rows, _)| rows)
                } else {
                    Ok(Vec::new())
                }
            },
            async {
                if wants("expo") {
                    let params = ExpoListParams {
                        search: Some(q.to_string()),
                        limit: SEARCH_LIMIT,
                        ..ExpoListParams::default()
                    };
                    self.expo_repo.find(&params).await.map(|(rows, _)| rows)
                } else {
                    Ok(Vec::new())
                }
            },
            async {
                if wants("prestasi") {
                    let params = PrestasiListParams {
                        search: Some(q.to_string()),
                        limit: SEARCH_LIMIT,
                        ..PrestasiListParams::default()
                    };
                    self.prestasi_repo.find(&params).await.map(|(rows, _)| rows)
                } else {
                    Ok(Vec::new())
                }
            },
        );

        Ok(SearchResults {
            lomba: lomba?,
            expo: expo?,
            prestasi: prestasi?,
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
    use serde_json::json;
    use std::sync::Arc;

    fn service_for(server: &MockServer) -> SearchService {
        let client = Arc::new(
            CmsClient::new(&CmsConfig {
                url: server.base_url(),
                static_token: None,
                asset_width: 800,
            })
            .unwrap(),
        );
        SearchService::new(
            LombaRepository::new(Arc::clone(&client)),
            ExpoRepository::new(Arc::clone(&client)),
            PrestasiRepository::new(client),
        )
    }

    #[tokio::test]
    async fn test_blank_query_rejected() {
        let server = MockServer::start_async().await;
        let service = service_for(&server);
        assert!(service.search("  ", None).await.is_err());
    }

    #[tokio::test]
    async fn test_type_filter_narrows_to_one_collection() {
        let server = MockServer::start_async().await;
        let lomba = server
            .mock_async(|when, then| {
                when.method(GET).path("/items/lomba");
                then.status(200).json_body(json!({
                    "data": [{ "id": 1, "judul": "Hackathon Nasional" }],
                    "meta": { "filter_count": 1 }
                }));
            })
            .await;
        let expo = server
            .mock_async(|when, then| {
                when.method(GET).path("/items/expo");
                then.status(200).json_body(json!({ "data": [] }));
            })
            .await;

        let service = service_for(&server);
        let results = service.search("hackathon", Some("lomba")).await.unwrap();

        lomba.assert_async().await;
        assert_eq!(expo.hits_async().await, 0);
        assert_eq!(results.lomba.len(), 1);
        assert!(results.expo.is_empty());
        assert!(results.prestasi.is_empty());
    }
}
