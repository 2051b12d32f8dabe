//! Exhibition booth registration repository.

use std::sync::Arc;

use puspresma_common::AppResult;
use serde_json::Value;

use crate::client::CmsClient;
use crate::query::{Filter, Query};
use crate::records::PendaftaranExpoRecord;

const COLLECTION: &str = "pendaftaran_expo";

const NIM_SLOTS: [&str; 4] = ["nim_ketua", "nim_anggota1", "nim_anggota2", "nim_anggota3"];

/// Repository for the `pendaftaran_expo` collection.
#[derive(Clone)]
pub struct PendaftaranExpoRepository {
    client: Arc<CmsClient>,
}

impl PendaftaranExpoRepository {
    /// Create a new booth registration repository.
    #[must_use]
    pub const fn new(client: Arc<CmsClient>) -> Self {
        Self { client }
    }

    /// Non-rejected registrations for one expo where any team slot carries
    /// one of the given NIMs. Used for duplicate detection across slots.
    pub async fn find_active_with_nims(
        &self,
        expo_id: &str,
        nims: &[String],
    ) -> AppResult<Vec<PendaftaranExpoRecord>> {
        let query = Query::new().filter(Self::active_with_nims_filter(expo_id, nims));
        let (rows, _) = self.client.list_items(COLLECTION, &query).await?;
        Ok(rows)
    }

    fn active_with_nims_filter(expo_id: &str, nims: &[String]) -> Filter {
        let slots = NIM_SLOTS
            .iter()
            .map(|slot| Filter::is_in(*slot, nims.to_vec()))
            .collect();
        Filter::and(vec![
            Filter::eq("expo_id", expo_id),
            Filter::neq("status", "rejected"),
            Filter::or(slots),
        ])
    }

    /// Count non-rejected registrations for one expo (capacity admission).
    pub async fn count_non_rejected(&self, expo_id: &str) -> AppResult<u64> {
        self.client
            .count_items(
                COLLECTION,
                Some(Filter::and(vec![
                    Filter::eq("expo_id", expo_id),
                    Filter::neq("status", "rejected"),
                ])),
            )
            .await
    }

    /// All registrations for one expo, newest first.
    pub async fn find_by_expo(
        &self,
        expo_id: &str,
    ) -> AppResult<(Vec<PendaftaranExpoRecord>, u64)> {
        let query = Query::new()
            .filter(Filter::eq("expo_id", expo_id))
            .sort("-date_created")
            .with_counts();
        let (rows, meta) = self.client.list_items(COLLECTION, &query).await?;
        let total = meta
            .and_then(|m| m.filter_count)
            .unwrap_or(rows.len() as u64);
        Ok((rows, total))
    }

    /// Insert a registration row.
    pub async fn create(&self, payload: &Value) -> AppResult<PendaftaranExpoRecord> {
        self.client.create_item(COLLECTION, payload).await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_duplicate_filter_covers_every_slot() {
        let filter = PendaftaranExpoRepository::active_with_nims_filter(
            "7",
            &["111".to_string(), "222".to_string()],
        );

        assert_eq!(
            filter.to_value(),
            json!({
                "_and": [
                    { "expo_id": { "_eq": "7" } },
                    { "status": { "_neq": "rejected" } },
                    { "_or": [
                        { "nim_ketua": { "_in": ["111", "222"] } },
                        { "nim_anggota1": { "_in": ["111", "222"] } },
                        { "nim_anggota2": { "_in": ["111", "222"] } },
                        { "nim_anggota3": { "_in": ["111", "222"] } },
                    ] },
                ]
            })
        );
    }
}
