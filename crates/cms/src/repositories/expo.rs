//! Exhibition repository.

use std::sync::Arc;

use chrono::NaiveDate;
use puspresma_common::AppResult;
use serde_json::{Value, json};

use crate::client::CmsClient;
use crate::query::{Filter, Query};
use crate::records::ExpoRecord;

use super::{DEFAULT_PAGE_SIZE, not_deleted, page_offset};

const COLLECTION: &str = "expo";

/// List-query parameters for exhibitions.
#[derive(Debug, Clone)]
pub struct ExpoListParams {
    /// 1-based page number.
    pub page: u32,
    /// Page size.
    pub limit: u32,
    /// Filter by lifecycle status.
    pub status: Option<String>,
    /// Substring search over title/theme/location.
    pub search: Option<String>,
    /// Include soft-deleted rows (admin listings).
    pub include_deleted: bool,
}

impl Default for ExpoListParams {
    fn default() -> Self {
        Self {
            page: 1,
            limit: DEFAULT_PAGE_SIZE,
            status: None,
            search: None,
            include_deleted: false,
        }
    }
}

/// Repository for the `expo` collection.
#[derive(Clone)]
pub struct ExpoRepository {
    client: Arc<CmsClient>,
}

impl ExpoRepository {
    /// Create a new exhibition repository.
    #[must_use]
    pub const fn new(client: Arc<CmsClient>) -> Self {
        Self { client }
    }

    /// List exhibitions with the filtered total.
    pub async fn find(&self, params: &ExpoListParams) -> AppResult<(Vec<ExpoRecord>, u64)> {
        let mut branches = Vec::new();
        if !params.include_deleted {
            branches.push(not_deleted());
        }
        if let Some(status) = &params.status {
            branches.push(Filter::eq("status", status.as_str()));
        }
        if let Some(search) = &params.search {
            branches.push(Filter::or(vec![
                Filter::icontains("judul", search.clone()),
                Filter::icontains("tema", search.clone()),
                Filter::icontains("lokasi", search.clone()),
            ]));
        }

        let mut query = Query::new()
            .sort("-tanggal_mulai")
            .limit(params.limit)
            .offset(page_offset(params.page, params.limit))
            .with_counts();
        if !branches.is_empty() {
            query = query.filter(Filter::and(branches));
        }

        let (rows, meta) = self.client.list_items(COLLECTION, &query).await?;
        let total = meta
            .and_then(|m| m.filter_count)
            .unwrap_or(rows.len() as u64);
        Ok((rows, total))
    }

    /// Fetch one exhibition by id.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<ExpoRecord>> {
        self.client.get_item(COLLECTION, id).await
    }

    /// Fetch one live exhibition by slug.
    pub async fn find_by_slug(&self, slug: &str) -> AppResult<Option<ExpoRecord>> {
        let query = Query::new()
            .filter(Filter::and(vec![Filter::eq("slug", slug), not_deleted()]))
            .limit(1);
        let (mut rows, _) = self.client.list_items(COLLECTION, &query).await?;
        Ok(rows.drain(..).next())
    }

    /// Live exhibitions starting inside the window (calendar feed).
    pub async fn find_starting_between(
        &self,
        from: NaiveDate,
        to: NaiveDate,
    ) -> AppResult<Vec<ExpoRecord>> {
        let query = Query::new()
            .filter(Filter::and(vec![
                not_deleted(),
                Filter::is_in("status", vec!["upcoming", "ongoing"]),
                Filter::gte("tanggal_mulai", from.to_string()),
                Filter::lte("tanggal_mulai", to.to_string()),
            ]))
            .sort("tanggal_mulai");
        let (rows, _) = self.client.list_items(COLLECTION, &query).await?;
        Ok(rows)
    }

    /// Insert a new exhibition.
    pub async fn create(&self, payload: &Value) -> AppResult<ExpoRecord> {
        self.client.create_item(COLLECTION, payload).await
    }

    /// Patch an existing exhibition.
    pub async fn update(&self, id: &str, patch: &Value) -> AppResult<ExpoRecord> {
        self.client.update_item(COLLECTION, id, patch).await
    }

    /// Flag an exhibition as deleted.
    pub async fn soft_delete(&self, id: &str) -> AppResult<()> {
        let _: ExpoRecord = self
            .client
            .update_item(COLLECTION, id, &json!({ "is_deleted": true }))
            .await?;
        Ok(())
    }

    /// Remove an exhibition permanently.
    pub async fn hard_delete(&self, id: &str) -> AppResult<()> {
        self.client.delete_item(COLLECTION, id).await
    }
}
