//! Competition (lomba) records.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Competition record as stored in the `lomba` collection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LombaRecord {
    /// Primary key.
    #[serde(deserialize_with = "super::de_id")]
    pub id: String,

    /// Competition title.
    pub judul: String,

    /// URL slug.
    #[serde(default)]
    pub slug: Option<String>,

    /// Category (e.g. "Teknologi", "Bisnis").
    #[serde(default)]
    pub kategori: Option<String>,

    /// Level (e.g. "Nasional", "Internasional").
    #[serde(default)]
    pub tingkat: Option<String>,

    /// Organizer name.
    #[serde(default)]
    pub penyelenggara: Option<String>,

    /// Registration deadline.
    #[serde(default)]
    pub deadline: Option<NaiveDate>,

    /// Execution date.
    #[serde(default)]
    pub tanggal_pelaksanaan: Option<NaiveDate>,

    /// Registration fee in rupiah; zero or absent means free.
    #[serde(default)]
    pub biaya: Option<i64>,

    /// External registration link.
    #[serde(default)]
    pub link_pendaftaran: Option<String>,

    /// Long-form description.
    #[serde(default)]
    pub deskripsi: Option<String>,

    /// Poster asset id.
    #[serde(default)]
    pub poster: Option<String>,

    /// Whether in-portal registration is open.
    #[serde(default)]
    pub pendaftaran_dibuka: bool,

    /// Shown on the landing page when set.
    #[serde(default)]
    pub featured: bool,

    /// Lifecycle status: `open`, `closed`, or `coming-soon`.
    #[serde(default = "default_lomba_status")]
    pub status: String,

    /// Soft-delete flag.
    #[serde(default)]
    pub is_deleted: bool,

    /// Creation timestamp.
    #[serde(default)]
    pub date_created: Option<DateTime<Utc>>,
}

fn default_lomba_status() -> String {
    "open".to_string()
}

/// Registration record in the `pendaftaran_lomba` collection.
#[derive(Debug, Clone, Deserialize)]
pub struct PendaftaranLombaRecord {
    /// Primary key.
    #[serde(deserialize_with = "super::de_id")]
    pub id: String,

    /// Competition this registration belongs to.
    #[serde(default, deserialize_with = "super::de_relation")]
    pub lomba_id: Option<String>,

    /// Registrant full name.
    pub nama: String,

    /// Student identification number.
    pub nim: String,

    /// Contact email.
    pub email: String,

    /// Contact phone.
    #[serde(default)]
    pub telepon: Option<String>,

    /// Faculty.
    #[serde(default)]
    pub fakultas: Option<String>,

    /// Study program.
    #[serde(default)]
    pub program_studi: Option<String>,

    /// Review status: `pending`, `approved`, or `rejected`.
    #[serde(default = "default_registration_status")]
    pub status: String,

    /// Creation timestamp.
    #[serde(default)]
    pub date_created: Option<DateTime<Utc>>,
}

pub(crate) fn default_registration_status() -> String {
    "pending".to_string()
}
