//! Achievement (prestasi) records.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Achievement record as stored in the `prestasi` collection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PrestasiRecord {
    /// Primary key.
    #[serde(deserialize_with = "super::de_id")]
    pub id: String,

    /// Achievement title.
    pub judul: String,

    /// Name of the competition the achievement was earned in.
    #[serde(default)]
    pub nama_lomba: Option<String>,

    /// Competition level.
    #[serde(default)]
    pub tingkat: Option<String>,

    /// Rank obtained (e.g. "Juara 1").
    #[serde(default)]
    pub peringkat: Option<String>,

    /// Date the achievement was earned.
    #[serde(default)]
    pub tanggal: Option<NaiveDate>,

    /// Certificate asset id.
    #[serde(default)]
    pub sertifikat: Option<String>,

    /// Submitting student name.
    pub nama_mahasiswa: String,

    /// Submitting student number.
    pub nim: String,

    /// Faculty.
    #[serde(default)]
    pub fakultas: Option<String>,

    /// Study program.
    #[serde(default)]
    pub program_studi: Option<String>,

    /// Verification status: `pending` or `verified`.
    #[serde(default = "default_prestasi_status")]
    pub status: String,

    /// Set when status transitions to `verified`; overwritten on repeat
    /// verification (current behavior).
    #[serde(default)]
    pub verified_at: Option<DateTime<Utc>>,

    /// Soft-delete flag.
    #[serde(default)]
    pub is_deleted: bool,

    /// Creation timestamp.
    #[serde(default)]
    pub date_created: Option<DateTime<Utc>>,

    /// Team members, when projected via `tim.*`.
    #[serde(default)]
    pub tim: Vec<PrestasiTimRecord>,
}

impl PrestasiRecord {
    /// Year the achievement was earned, derived from `tanggal`.
    #[must_use]
    pub fn tahun(&self) -> Option<i32> {
        use chrono::Datelike;
        self.tanggal.map(|t| t.year())
    }
}

fn default_prestasi_status() -> String {
    "pending".to_string()
}

/// Team member row in the `prestasi_tim` sub-collection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PrestasiTimRecord {
    /// Member name.
    pub nama: String,

    /// Member student number.
    pub nim: String,

    /// Whether this member led the team.
    #[serde(default)]
    pub is_ketua: bool,
}
