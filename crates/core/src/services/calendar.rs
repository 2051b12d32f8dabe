//! Calendar aggregation.
//!
//! Fans out to three independently-shaped sources — competition deadlines,
//! exhibition date ranges, personal calendar rows — normalizes each into one
//! event shape, merges, and sorts by start date. A failing source is logged
//! and contributes nothing; the other two still answer.

use chrono::{Duration, Months, NaiveDate, Utc};
use puspresma_cms::records::{ExpoRecord, KalenderRecord, LombaRecord};
use puspresma_cms::repositories::{ExpoRepository, KalenderRepository, LombaRepository};
use puspresma_common::AppResult;
use serde::Serialize;
use tracing::warn;

/// Deadlines at most this many days out are flagged urgent.
const URGENT_WINDOW_DAYS: i64 = 7;

/// Days of padding around an explicit month window.
const MONTH_PADDING_DAYS: i64 = 7;

/// One normalized calendar event, regardless of source.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarEvent {
    /// Source-prefixed id (`lomba-`, `expo-`, `cal-`), collision-free
    /// across sources.
    pub id: String,
    /// Event title.
    pub title: String,
    /// Event type tag: `lomba`, `expo`, `deadline`, or `event`.
    #[serde(rename = "type")]
    pub event_type: String,
    /// First day.
    pub start_date: NaiveDate,
    /// Last day, for ranged events.
    pub end_date: Option<NaiveDate>,
    /// Time of day, free-form.
    pub time: Option<String>,
    /// Venue or empty.
    pub location: String,
    /// Description or empty.
    pub description: String,
    /// Navigable link or empty.
    pub link: String,
    /// True only for competition deadlines at most seven days away.
    pub is_urgent: bool,
}

/// Service assembling the merged calendar feed.
#[derive(Clone)]
pub struct CalendarService {
    lomba_repo: LombaRepository,
    expo_repo: ExpoRepository,
    kalender_repo: KalenderRepository,
}

impl CalendarService {
    /// Create a new calendar service.
    #[must_use]
    pub const fn new(
        lomba_repo: LombaRepository,
        expo_repo: ExpoRepository,
        kalender_repo: KalenderRepository,
    ) -> Self {
        Self {
            lomba_repo,
            expo_repo,
            kalender_repo,
        }
    }

    /// Merged, date-sorted events for a month (padded) or, without one, the
    /// next three months. Personal entries only appear when `nim` is given.
    pub async fn events(
        &self,
        month: Option<(i32, u32)>,
        nim: Option<&str>,
    ) -> AppResult<Vec<CalendarEvent>> {
        let today = Utc::now().date_naive();
        let (from, to) = compute_window(today, month);

        let (lomba, expo, personal) = tokio::join!(
            self.lomba_repo.find_deadline_between(from, to),
            self.expo_repo.find_starting_between(from, to),
            self.personal_entries(from, to, nim),
        );

        let lomba = lomba.unwrap_or_else(|e| {
            warn!(error = %e, "Calendar source 'lomba' failed; continuing without it");
            Vec::new()
        });
        let expo = expo.unwrap_or_else(|e| {
            warn!(error = %e, "Calendar source 'expo' failed; continuing without it");
            Vec::new()
        });
        let personal = personal.unwrap_or_else(|e| {
            warn!(error = %e, "Calendar source 'kalender' failed; continuing without it");
            Vec::new()
        });

        Ok(merge_events(today, &lomba, &expo, &personal))
    }

    async fn personal_entries(
        &self,
        from: NaiveDate,
        to: NaiveDate,
        nim: Option<&str>,
    ) -> AppResult<Vec<KalenderRecord>> {
        match nim {
            Some(nim) if !nim.trim().is_empty() => {
                self.kalender_repo.find_between(from, to, Some(nim)).await
            }
            _ => Ok(Vec::new()),
        }
    }
}

/// The padded query window: ±7 days around an explicit month, otherwise
/// today through three months out.
fn compute_window(today: NaiveDate, month: Option<(i32, u32)>) -> (NaiveDate, NaiveDate) {
    if let Some((year, month)) = month {
        if let Some(first) = NaiveDate::from_ymd_opt(year, month, 1) {
            let next_month = first + Months::new(1);
            let last = next_month - Duration::days(1);
            return (
                first - Duration::days(MONTH_PADDING_DAYS),
                last + Duration::days(MONTH_PADDING_DAYS),
            );
        }
    }
    (today, today + Months::new(3))
}

/// Normalize and merge the three sources. Stable sort keeps source order
/// (lomba, expo, personal) on equal dates.
fn merge_events(
    today: NaiveDate,
    lomba: &[LombaRecord],
    expo: &[ExpoRecord],
    personal: &[KalenderRecord],
) -> Vec<CalendarEvent> {
    let mut events: Vec<CalendarEvent> = Vec::new();

    for record in lomba {
        let Some(deadline) = record.deadline else {
            continue;
        };
        let days_left = (deadline - today).num_days();
        let link = record
            .slug
            .as_ref()
            .map_or_else(|| format!("/lomba/{}", record.id), |s| format!("/lomba/{s}"));
        events.push(CalendarEvent {
            id: format!("lomba-{}", record.id),
            title: format!("Deadline: {}", record.judul),
            event_type: "lomba".to_string(),
            start_date: deadline,
            end_date: None,
            time: None,
            location: record.penyelenggara.clone().unwrap_or_default(),
            description: record.deskripsi.clone().unwrap_or_default(),
            link,
            is_urgent: (0..=URGENT_WINDOW_DAYS).contains(&days_left),
        });
    }

    for record in expo {
        let Some(start) = record.tanggal_mulai else {
            continue;
        };
        let link = record
            .slug
            .as_ref()
            .map_or_else(|| format!("/expo/{}", record.id), |s| format!("/expo/{s}"));
        events.push(CalendarEvent {
            id: format!("expo-{}", record.id),
            title: record.judul.clone(),
            event_type: "expo".to_string(),
            start_date: start,
            end_date: record.tanggal_selesai.filter(|end| *end != start),
            time: None,
            location: record.lokasi.clone().unwrap_or_default(),
            description: record.deskripsi.clone().unwrap_or_default(),
            link,
            is_urgent: false,
        });
    }

    for record in personal {
        events.push(CalendarEvent {
            id: format!("cal-{}", record.id),
            title: record.judul.clone(),
            event_type: record.tipe.clone(),
            start_date: record.tanggal,
            end_date: record.tanggal_selesai,
            time: record.waktu.clone(),
            location: record.lokasi.clone().unwrap_or_default(),
            description: record.deskripsi.clone().unwrap_or_default(),
            link: record.link.clone().unwrap_or_default(),
            is_urgent: false,
        });
    }

    events.sort_by_key(|e| e.start_date);
    events
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

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn lomba(id: i64, judul: &str, deadline: NaiveDate) -> LombaRecord {
        serde_json::from_value(json!({
            "id": id, "judul": judul, "deadline": deadline.to_string(),
        }))
        .unwrap()
    }

    fn expo(id: i64, judul: &str, start: NaiveDate, end: Option<NaiveDate>) -> ExpoRecord {
        serde_json::from_value(json!({
            "id": id, "judul": judul,
            "tanggal_mulai": start.to_string(),
            "tanggal_selesai": end.map(|e| e.to_string()),
        }))
        .unwrap()
    }

    fn entry(id: i64, judul: &str, tanggal: NaiveDate) -> KalenderRecord {
        serde_json::from_value(json!({
            "id": id, "judul": judul, "tanggal": tanggal.to_string(), "tipe": "event",
        }))
        .unwrap()
    }

    #[test]
    fn test_month_window_is_padded_seven_days() {
        let (from, to) = compute_window(d(2026, 1, 1), Some((2026, 3)));
        assert_eq!(from, d(2026, 2, 22));
        assert_eq!(to, d(2026, 4, 7));
    }

    #[test]
    fn test_default_window_is_three_months() {
        let today = d(2026, 1, 15);
        let (from, to) = compute_window(today, None);
        assert_eq!(from, today);
        assert_eq!(to, d(2026, 4, 15));
    }

    #[test]
    fn test_invalid_month_falls_back_to_default_window() {
        let today = d(2026, 1, 15);
        let (from, _) = compute_window(today, Some((2026, 13)));
        assert_eq!(from, today);
    }

    #[test]
    fn test_merge_sorts_by_start_date() {
        let today = d(2026, 3, 1);
        let events = merge_events(
            today,
            &[lomba(1, "Gemastik", d(2026, 3, 20))],
            &[expo(2, "Expo Karya", d(2026, 3, 5), Some(d(2026, 3, 7)))],
            &[entry(3, "Bimbingan", d(2026, 3, 10))],
        );

        let ids: Vec<&str> = events.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["expo-2", "cal-3", "lomba-1"]);
    }

    #[test]
    fn test_tie_keeps_source_order() {
        let today = d(2026, 3, 1);
        let same_day = d(2026, 3, 5);
        let events = merge_events(
            today,
            &[lomba(1, "Gemastik", same_day)],
            &[expo(2, "Expo Karya", same_day, None)],
            &[entry(3, "Bimbingan", same_day)],
        );

        let ids: Vec<&str> = events.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["lomba-1", "expo-2", "cal-3"]);
    }

    #[test]
    fn test_urgency_only_for_near_deadlines() {
        let today = d(2026, 3, 1);
        let events = merge_events(
            today,
            &[
                lomba(1, "Dekat", d(2026, 3, 8)),
                lomba(2, "Jauh", d(2026, 3, 9)),
            ],
            &[expo(3, "Expo", d(2026, 3, 2), None)],
            &[],
        );

        assert!(events.iter().find(|e| e.id == "lomba-1").unwrap().is_urgent);
        assert!(!events.iter().find(|e| e.id == "lomba-2").unwrap().is_urgent);
        assert!(!events.iter().find(|e| e.id == "expo-3").unwrap().is_urgent);
    }

    #[test]
    fn test_single_day_expo_has_no_end_date() {
        let day = d(2026, 3, 5);
        let events = merge_events(d(2026, 3, 1), &[], &[expo(1, "Expo", day, Some(day))], &[]);
        assert!(events[0].end_date.is_none());
    }

    #[tokio::test]
    async fn test_failing_personal_source_keeps_other_events() {
        let server = MockServer::start_async().await;
        let deadline = Utc::now().date_naive() + Duration::days(30);

        server
            .mock_async(move |when, then| {
                when.method(GET).path("/items/lomba");
                then.status(200).json_body(json!({
                    "data": [{ "id": 1, "judul": "Gemastik", "deadline": deadline.to_string() }]
                }));
            })
            .await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/items/expo");
                then.status(200).json_body(json!({ "data": [] }));
            })
            .await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/items/kalender");
                then.status(500)
                    .json_body(json!({ "errors": [{ "message": "boom" }] }));
            })
            .await;

        let client = Arc::new(
            CmsClient::new(&CmsConfig {
                url: server.base_url(),
                static_token: None,
                asset_width: 800,
            })
            .unwrap(),
        );
        let service = CalendarService::new(
            LombaRepository::new(Arc::clone(&client)),
            ExpoRepository::new(Arc::clone(&client)),
            KalenderRepository::new(client),
        );

        let events = service.events(None, Some("21120119130099")).await.unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].id, "lomba-1");
    }
}
