//! Competition repository.

use std::sync::Arc;

use chrono::NaiveDate;
use puspresma_common::AppResult;
use serde_json::{Value, json};

use crate::client::CmsClient;
use crate::query::{Filter, Query};
use crate::records::LombaRecord;

use super::{DEFAULT_PAGE_SIZE, not_deleted, page_offset};

const COLLECTION: &str = "lomba";

/// List-query parameters for competitions.
#[derive(Debug, Clone)]
pub struct LombaListParams {
    /// 1-based page number.
    pub page: u32,
    /// Page size.
    pub limit: u32,
    /// Filter by category.
    pub kategori: Option<String>,
    /// Filter by level.
    pub tingkat: Option<String>,
    /// Filter by lifecycle status.
    pub status: Option<String>,
    /// Substring search over title/organizer/description.
    pub search: Option<String>,
    /// Only featured competitions when set.
    pub featured: Option<bool>,
    /// Include soft-deleted rows (admin listings).
    pub include_deleted: bool,
}

impl Default for LombaListParams {
    fn default() -> Self {
        Self {
            page: 1,
            limit: DEFAULT_PAGE_SIZE,
            kategori: None,
            tingkat: None,
            status: None,
            search: None,
            featured: None,
            include_deleted: false,
        }
    }
}

/// Repository for the `lomba` collection.
#[derive(Clone)]
pub struct LombaRepository {
    client: Arc<CmsClient>,
}

impl LombaRepository {
    /// Create a new competition repository.
    #[must_use]
    pub const fn new(client: Arc<CmsClient>) -> Self {
        Self { client }
    }

    fn list_filter(params: &LombaListParams) -> Option<Filter> {
        let mut branches = Vec::new();

        if !params.include_deleted {
            branches.push(not_deleted());
        }
        if let Some(kategori) = &params.kategori {
            branches.push(Filter::eq("kategori", kategori.as_str()));
        }
        if let Some(tingkat) = &params.tingkat {
            branches.push(Filter::eq("tingkat", tingkat.as_str()));
        }
        if let Some(status) = &params.status {
            branches.push(Filter::eq("status", status.as_str()));
        }
        if let Some(featured) = params.featured {
            branches.push(Filter::eq("featured", featured));
        }
        if let Some(search) = &params.search {
            branches.push(Filter::or(vec![
                Filter::icontains("judul", search.clone()),
                Filter::icontains("penyelenggara", search.clone()),
                Filter::icontains("deskripsi", search.clone()),
            ]));
        }

        match branches.len() {
            0 => None,
            1 => branches.pop(),
            _ => Some(Filter::and(branches)),
        }
    }

    /// List competitions with the filtered total.
    pub async fn find(&self, params: &LombaListParams) -> AppResult<(Vec<LombaRecord>, u64)> {
        let mut query = Query::new()
            .sort("-date_created")
            .limit(params.limit)
            .offset(page_offset(params.page, params.limit))
            .with_counts();
        if let Some(filter) = Self::list_filter(params) {
            query = query.filter(filter);
        }

        let (rows, meta) = self.client.list_items(COLLECTION, &query).await?;
        let total = meta
            .and_then(|m| m.filter_count)
            .unwrap_or(rows.len() as u64);
        Ok((rows, total))
    }

    /// Fetch one competition by id, soft-deleted rows included (callers
    /// decide visibility).
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<LombaRecord>> {
        self.client.get_item(COLLECTION, id).await
    }

    /// Fetch one live competition by slug.
    pub async fn find_by_slug(&self, slug: &str) -> AppResult<Option<LombaRecord>> {
        let query = Query::new()
            .filter(Filter::and(vec![
                Filter::eq("slug", slug),
                not_deleted(),
            ]))
            .limit(1);
        let (mut rows, _) = self.client.list_items(COLLECTION, &query).await?;
        Ok(rows.drain(..).next())
    }

    /// Live competitions whose deadline falls inside the window, for the
    /// calendar feed and reminder batches.
    pub async fn find_deadline_between(
        &self,
        from: NaiveDate,
        to: NaiveDate,
    ) -> AppResult<Vec<LombaRecord>> {
        let query = Query::new()
            .filter(Filter::and(vec![
                not_deleted(),
                Filter::is_in("status", vec!["open", "coming-soon"]),
                Filter::gte("deadline", from.to_string()),
                Filter::lte("deadline", to.to_string()),
            ]))
            .sort("deadline");
        let (rows, _) = self.client.list_items(COLLECTION, &query).await?;
        Ok(rows)
    }

    /// Insert a new competition.
    pub async fn create(&self, payload: &Value) -> AppResult<LombaRecord> {
        self.client.create_item(COLLECTION, payload).await
    }

    /// Patch an existing competition.
    pub async fn update(&self, id: &str, patch: &Value) -> AppResult<LombaRecord> {
        self.client.update_item(COLLECTION, id, patch).await
    }

    /// Flag a competition as deleted; it disappears from default listings.
    pub async fn soft_delete(&self, id: &str) -> AppResult<()> {
        let _: LombaRecord = self
            .client
            .update_item(COLLECTION, id, &json!({ "is_deleted": true }))
            .await?;
        Ok(())
    }

    /// Remove a competition permanently.
    pub async fn hard_delete(&self, id: &str) -> AppResult<()> {
        self.client.delete_item(COLLECTION, id).await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use httpmock::prelude::*;
    use puspresma_common::CmsConfig;
    use serde_json::json;

    fn client_for(server: &MockServer) -> Arc<CmsClient> {
        Arc::new(
            CmsClient::new(&CmsConfig {
                url: server.base_url(),
                static_token: None,
                asset_width: 800,
            })
            .unwrap(),
        )
    }

    #[test]
    fn test_default_list_filter_excludes_deleted() {
        let filter = LombaRepository::list_filter(&LombaListParams::default()).unwrap();
        assert_eq!(
            filter.to_value(),
            json!({ "is_deleted": { "_neq": true } })
        );
    }

    #[test]
    fn test_include_deleted_drops_the_soft_delete_branch() {
        let params = LombaListParams {
            include_deleted: true,
            ..LombaListParams::default()
        };
        assert!(LombaRepository::list_filter(&params).is_none());
    }

    #[tokio::test]
    async fn test_find_paginates_and_counts() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(GET)
                    .path("/items/lomba")
                    .query_param("limit", "10")
                    .query_param("offset", "10")
                    .query_param("sort", "-date_created");
                then.status(200).json_body(json!({
                    "data": [{ "id": 11, "judul": "Hackathon Nasional" }],
                    "meta": { "total_count": 30, "filter_count": 11 }
                }));
            })
            .await;

        let repo = LombaRepository::new(client_for(&server));
        let params = LombaListParams {
            page: 2,
            ..LombaListParams::default()
        };
        let (rows, total) = repo.find(&params).await.unwrap();

        mock.assert_async().await;
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].judul, "Hackathon Nasional");
        assert_eq!(total, 11);
    }

    #[tokio::test]
    async fn test_soft_delete_patches_flag() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(PATCH)
                    .path("/items/lomba/5")
                    .json_body_includes(json!({ "is_deleted": true }).to_string());
                then.status(200).json_body(json!({
                    "data": { "id": 5, "judul": "Lomba Esai", "is_deleted": true }
                }));
            })
            .await;

        let repo = LombaRepository::new(client_for(&server));
        repo.soft_delete("5").await.unwrap();
        mock.assert_async().await;
    }
}
