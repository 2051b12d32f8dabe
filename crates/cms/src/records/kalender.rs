//! Personal calendar records.

use chrono::NaiveDate;
use serde::Deserialize;

/// Personal calendar entry in the `kalender` collection, tied to a student
/// NIM and optionally to a registration.
#[derive(Debug, Clone, Deserialize)]
pub struct KalenderRecord {
    /// Primary key.
    #[serde(deserialize_with = "super::de_id")]
    pub id: String,

    /// Owning student number.
    #[serde(default)]
    pub nim: Option<String>,

    /// Entry title.
    pub judul: String,

    /// Start date.
    pub tanggal: NaiveDate,

    /// End date, for ranged entries.
    #[serde(default)]
    pub tanggal_selesai: Option<NaiveDate>,

    /// Time of day, free-form (e.g. "09:00").
    #[serde(default)]
    pub waktu: Option<String>,

    /// Entry type: `lomba`, `expo`, `deadline`, or `event`.
    #[serde(default = "default_tipe")]
    pub tipe: String,

    /// Description.
    #[serde(default)]
    pub deskripsi: Option<String>,

    /// Location.
    #[serde(default)]
    pub lokasi: Option<String>,

    /// Navigable link.
    #[serde(default)]
    pub link: Option<String>,

    /// Registration this entry was derived from, when any.
    #[serde(default, deserialize_with = "super::de_relation")]
    pub pendaftaran_id: Option<String>,
}

fn default_tipe() -> String {
    "event".to_string()
}
