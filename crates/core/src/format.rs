//! Presentation helpers for the transform layer.
//!
//! Pure functions shared by the response mappers: asset URL construction,
//! Indonesian date formatting, and fee coercion. No validation happens here.

use chrono::{Datelike, NaiveDate};

const BULAN: [&str; 12] = [
    "Januari",
    "Februari",
    "Maret",
    "April",
    "Mei",
    "Juni",
    "Juli",
    "Agustus",
    "September",
    "Oktober",
    "November",
    "Desember",
];

/// Fully-qualified asset URL: `{base}/assets/{id}`, plus a width query
/// parameter when given.
#[must_use]
pub fn asset_url(cms_base: &str, asset_id: &str, width: Option<u32>) -> String {
    let base = cms_base.trim_end_matches('/');
    match width {
        Some(w) => format!("{base}/assets/{asset_id}?width={w}"),
        None => format!("{base}/assets/{asset_id}"),
    }
}

/// One date, Indonesian style: `12 Januari 2026`.
#[must_use]
pub fn format_date(date: NaiveDate) -> String {
    format!(
        "{} {} {}",
        date.day(),
        BULAN[date.month0() as usize],
        date.year()
    )
}

/// Human-readable range. Collapses to a single date when the range is one
/// day or open-ended; shares the month/year part when both ends fall in it.
#[must_use]
pub fn format_date_range(start: NaiveDate, end: Option<NaiveDate>) -> String {
    let Some(end) = end else {
        return format_date(start);
    };
    if end == start {
        return format_date(start);
    }
    if start.year() == end.year() && start.month() == end.month() {
        return format!(
            "{} - {} {} {}",
            start.day(),
            end.day(),
            BULAN[start.month0() as usize],
            start.year()
        );
    }
    format!("{} - {}", format_date(start), format_date(end))
}

/// Whether a fee amount means "free" (zero or absent).
#[must_use]
pub const fn is_free(amount: Option<i64>) -> bool {
    match amount {
        None | Some(0) => true,
        Some(_) => false,
    }
}
