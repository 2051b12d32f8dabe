//! Contact message records.

use chrono::{DateTime, Utc};
use serde::Deserialize;

/// Contact message in the `kontak` collection.
#[derive(Debug, Clone, Deserialize)]
pub struct KontakRecord {
    /// Primary key.
    #[serde(deserialize_with = "super::de_id")]
    pub id: String,

    /// Sender name.
    pub nama: String,

    /// Sender email.
    pub email: String,

    /// Subject line.
    #[serde(default)]
    pub subjek: Option<String>,

    /// Message body.
    pub pesan: String,

    /// Read status: `read` or `unread`.
    #[serde(default = "default_kontak_status")]
    pub status: String,

    /// Soft-delete flag.
    #[serde(default)]
    pub is_deleted: bool,

    /// Creation timestamp.
    #[serde(default)]
    pub date_created: Option<DateTime<Utc>>,
}

fn default_kontak_status() -> String {
    "unread".to_string()
}
