//! Contact message repository.

use std::sync::Arc;

use puspresma_common::AppResult;
use serde_json::{Value, json};

use crate::client::CmsClient;
use crate::query::{Filter, Query};
use crate::records::KontakRecord;

use super::{DEFAULT_PAGE_SIZE, not_deleted, page_offset};

const COLLECTION: &str = "kontak";

/// List-query parameters for contact messages.
#[derive(Debug, Clone)]
pub struct KontakListParams {
    /// 1-based page number.
    pub page: u32,
    /// Page size.
    pub limit: u32,
    /// Filter by read status.
    pub status: Option<String>,
    /// Include soft-deleted rows.
    pub include_deleted: bool,
}

impl Default for KontakListParams {
    fn default() -> Self {
        Self {
            page: 1,
            limit: DEFAULT_PAGE_SIZE,
            status: None,
            include_deleted: false,
        }
    }
}

/// Repository for the `kontak` collection.
#[derive(Clone)]
pub struct KontakRepository {
    client: Arc<CmsClient>,
}

impl KontakRepository {
    /// Create a new contact repository.
    #[must_use]
    pub const fn new(client: Arc<CmsClient>) -> Self {
        Self { client }
    }

    /// List messages with the filtered total, newest first.
    pub async fn find(&self, params: &KontakListParams) -> AppResult<(Vec<KontakRecord>, u64)> {
        let mut branches = Vec::new();
        if !params.include_deleted {
            branches.push(not_deleted());
        }
        if let Some(status) = &params.status {
            branches.push(Filter::eq("status", status.as_str()));
        }

        let mut query = Query::new()
            .sort("-date_created")
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

    /// Fetch one message by id.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<KontakRecord>> {
        self.client.get_item(COLLECTION, id).await
    }

    /// Insert an inbound message.
    pub async fn create(&self, payload: &Value) -> AppResult<KontakRecord> {
        self.client.create_item(COLLECTION, payload).await
    }

    /// Patch a message (read/unread flip).
    pub async fn update(&self, id: &str, patch: &Value) -> AppResult<KontakRecord> {
        self.client.update_item(COLLECTION, id, patch).await
    }

    /// Flag a message as deleted.
    pub async fn soft_delete(&self, id: &str) -> AppResult<()> {
        let _: KontakRecord = self
            .client
            .update_item(COLLECTION, id, &json!({ "is_deleted": true }))
            .await?;
        Ok(())
    }

    /// Remove a message permanently.
    pub async fn hard_delete(&self, id: &str) -> AppResult<()> {
        self.client.delete_item(COLLECTION, id).await
    }
}
