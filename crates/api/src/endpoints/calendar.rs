//! Calendar feed endpoint.

use axum::{
    Router,
    extract::{Query, State},
    routing::get,
};
use puspresma_common::{AppError, AppResult};
use puspresma_core::CalendarEvent;
use serde::Deserialize;

use crate::{middleware::AppState, response::ApiResponse};

/// Create the calendar router.
pub fn router() -> Router<AppState> {
    Router::new().route("/", get(calendar))
}

/// Calendar query.
#[derive(Debug, Default, Deserialize)]
pub struct CalendarQuery {
    /// Target month as `YYYY-MM`; defaults to the next three months.
    pub month: Option<String>,
    /// Student number for personal entries.
    pub nim: Option<String>,
}

/// Merged, date-sorted events from competitions, exhibitions, and the
/// personal calendar. A failing source degrades to an empty contribution.
async fn calendar(
    State(state): State<AppState>,
    Query(query): Query<CalendarQuery>,
) -> AppResult<ApiResponse<Vec<CalendarEvent>>> {
    let month = query.month.as_deref().map(parse_month).transpose()?;
    let events = state
        .calendar_service
        .events(month, query.nim.as_deref())
        .await?;
    Ok(ApiResponse::ok(events))
}

/// Parse `YYYY-MM` into (year, month).
fn parse_month(raw: &str) -> AppResult<(i32, u32)> {
    let invalid = || AppError::BadRequest(format!("Format bulan tidak valid: {raw}"));

    let (year, month) = raw.split_once('-').ok_or_else(invalid)?;
    let year: i32 = year.parse().map_err(|_| invalid())?;
    let month: u32 = month.parse().map_err(|_| invalid())?;
    if !(1..=12).contains(&month) {
        return Err(invalid());
    }
    Ok((year, month))
}
