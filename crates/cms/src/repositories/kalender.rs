//! Personal calendar repository.

use std::sync::Arc;

use chrono::NaiveDate;
use puspresma_common::AppResult;
use serde_json::Value;

use crate::client::CmsClient;
use crate::query::{Filter, Query};
use crate::records::KalenderRecord;

const COLLECTION: &str = "kalender";

/// Repository for the `kalender` collection.
#[derive(Clone)]
pub struct KalenderRepository {
    client: Arc<CmsClient>,
}

impl KalenderRepository {
    /// Create a new calendar repository.
    #[must_use]
    pub const fn new(client: Arc<CmsClient>) -> Self {
        Self { client }
    }

    /// Entries inside the window, restricted to one owner when `nim` is
    /// given.
    pub async fn find_between(
        &self,
        from: NaiveDate,
        to: NaiveDate,
        nim: Option<&str>,
    ) -> AppResult<Vec<KalenderRecord>> {
        let mut branches = vec![
            Filter::gte("tanggal", from.to_string()),
            Filter::lte("tanggal", to.to_string()),
        ];
        if let Some(nim) = nim {
            branches.push(Filter::eq("nim", nim));
        }

        let query = Query::new()
            .filter(Filter::and(branches))
            .sort("tanggal");
        let (rows, _) = self.client.list_items(COLLECTION, &query).await?;
        Ok(rows)
    }

    /// Insert a calendar entry.
    pub async fn create(&self, payload: &Value) -> AppResult<KalenderRecord> {
        self.client.create_item(COLLECTION, payload).await
    }
}
