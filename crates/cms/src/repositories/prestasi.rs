//! Achievement repository.

use std::sync::Arc;

use puspresma_common::AppResult;
use serde_json::{Value, json};

use crate::client::CmsClient;
use crate::query::{Filter, Query};
use crate::records::PrestasiRecord;

use super::{DEFAULT_PAGE_SIZE, not_deleted, page_offset};

const COLLECTION: &str = "prestasi";

// Team rows ride along on every read.
const FIELDS: [&str; 2] = ["*", "tim.*"];

/// List-query parameters for achievements.
#[derive(Debug, Clone)]
pub struct PrestasiListParams {
    /// 1-based page number.
    pub page: u32,
    /// Page size.
    pub limit: u32,
    /// Filter by competition level.
    pub tingkat: Option<String>,
    /// Filter by the year the achievement was earned.
    pub tahun: Option<i32>,
    /// Filter by verification status.
    pub status: Option<String>,
    /// Substring search over title/competition/student name.
    pub search: Option<String>,
    /// Include soft-deleted rows (admin listings).
    pub include_deleted: bool,
}

impl Default for PrestasiListParams {
    fn default() -> Self {
        Self {
            page: 1,
            limit: DEFAULT_PAGE_SIZE,
            tingkat: None,
            tahun: None,
            status: None,
            search: None,
            include_deleted: false,
        }
    }
}

/// Repository for the `prestasi` collection.
#[derive(Clone)]
pub struct PrestasiRepository {
    client: Arc<CmsClient>,
}

impl PrestasiRepository {
    /// Create a new achievement repository.
    #[must_use]
    pub const fn new(client: Arc<CmsClient>) -> Self {
        Self { client }
    }

    /// List achievements with the filtered total.
    pub async fn find(&self, params: &PrestasiListParams) -> AppResult<(Vec<PrestasiRecord>, u64)> {
        let mut branches = Vec::new();
        if !params.include_deleted {
            branches.push(not_deleted());
        }
        if let Some(tingkat) = &params.tingkat {
            branches.push(Filter::eq("tingkat", tingkat.as_str()));
        }
        if let Some(tahun) = params.tahun {
            branches.push(Filter::gte("tanggal", format!("{tahun}-01-01")));
            branches.push(Filter::lte("tanggal", format!("{tahun}-12-31")));
        }
        if let Some(status) = &params.status {
            branches.push(Filter::eq("status", status.as_str()));
        }
        if let Some(search) = &params.search {
            branches.push(Filter::or(vec![
                Filter::icontains("judul", search.clone()),
                Filter::icontains("nama_lomba", search.clone()),
                Filter::icontains("nama_mahasiswa", search.clone()),
            ]));
        }

        let mut query = Query::new()
            .fields(&FIELDS)
            .sort("-tanggal")
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

    /// Fetch one achievement with its team rows.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<PrestasiRecord>> {
        self.client
            .get_item_with(COLLECTION, id, &Query::new().fields(&FIELDS))
            .await
    }

    /// Insert a new achievement.
    pub async fn create(&self, payload: &Value) -> AppResult<PrestasiRecord> {
        self.client.create_item(COLLECTION, payload).await
    }

    /// Patch an existing achievement.
    pub async fn update(&self, id: &str, patch: &Value) -> AppResult<PrestasiRecord> {
        self.client.update_item(COLLECTION, id, patch).await
    }

    /// Flag an achievement as deleted.
    pub async fn soft_delete(&self, id: &str) -> AppResult<()> {
        let _: PrestasiRecord = self
            .client
            .update_item(COLLECTION, id, &json!({ "is_deleted": true }))
            .await?;
        Ok(())
    }

    /// Remove an achievement permanently.
    pub async fn hard_delete(&self, id: &str) -> AppResult<()> {
        self.client.delete_item(COLLECTION, id).await
    }
}
