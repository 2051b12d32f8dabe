//! Competition registration repository.

use std::sync::Arc;

use puspresma_common::AppResult;
use serde_json::Value;

use crate::client::CmsClient;
use crate::query::{Filter, Query};
use crate::records::PendaftaranLombaRecord;

const COLLECTION: &str = "pendaftaran_lomba";

/// Repository for the `pendaftaran_lomba` collection.
#[derive(Clone)]
pub struct PendaftaranLombaRepository {
    client: Arc<CmsClient>,
}

impl PendaftaranLombaRepository {
    /// Create a new registration repository.
    #[must_use]
    pub const fn new(client: Arc<CmsClient>) -> Self {
        Self { client }
    }

    /// All registrations for one competition, newest first.
    pub async fn find_by_lomba(
        &self,
        lomba_id: &str,
    ) -> AppResult<(Vec<PendaftaranLombaRecord>, u64)> {
        let query = Query::new()
            .filter(Filter::eq("lomba_id", lomba_id))
            .sort("-date_created")
            .with_counts();
        let (rows, meta) = self.client.list_items(COLLECTION, &query).await?;
        let total = meta
            .and_then(|m| m.filter_count)
            .unwrap_or(rows.len() as u64);
        Ok((rows, total))
    }

    /// The registrant's live (non-rejected) registration for a competition,
    /// if any. Used for duplicate detection.
    pub async fn find_active_by_nim(
        &self,
        lomba_id: &str,
        nim: &str,
    ) -> AppResult<Option<PendaftaranLombaRecord>> {
        let query = Query::new()
            .filter(Filter::and(vec![
                Filter::eq("lomba_id", lomba_id),
                Filter::eq("nim", nim),
                Filter::neq("status", "rejected"),
            ]))
            .limit(1);
        let (mut rows, _) = self.client.list_items(COLLECTION, &query).await?;
        Ok(rows.drain(..).next())
    }

    /// Approved registrants for one competition (reminder recipients).
    pub async fn find_approved_by_lomba(
        &self,
        lomba_id: &str,
    ) -> AppResult<Vec<PendaftaranLombaRecord>> {
        let query = Query::new().filter(Filter::and(vec![
            Filter::eq("lomba_id", lomba_id),
            Filter::eq("status", "approved"),
        ]));
        let (rows, _) = self.client.list_items(COLLECTION, &query).await?;
        Ok(rows)
    }

    /// Insert a registration row.
    pub async fn create(&self, payload: &Value) -> AppResult<PendaftaranLombaRecord> {
        self.client.create_item(COLLECTION, payload).await
    }
}
