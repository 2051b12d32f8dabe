//! Exhibition (expo) records.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::lomba::default_registration_status;

/// Exhibition record as stored in the `expo` collection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExpoRecord {
    /// Primary key.
    #[serde(deserialize_with = "super::de_id")]
    pub id: String,

    /// Exhibition title.
    pub judul: String,

    /// URL slug.
    #[serde(default)]
    pub slug: Option<String>,

    /// Exhibition theme.
    #[serde(default)]
    pub tema: Option<String>,

    /// First day.
    #[serde(default)]
    pub tanggal_mulai: Option<NaiveDate>,

    /// Last day; absent for single-day events.
    #[serde(default)]
    pub tanggal_selesai: Option<NaiveDate>,

    /// Venue.
    #[serde(default)]
    pub lokasi: Option<String>,

    /// Participation fee in rupiah; zero or absent means free.
    #[serde(default)]
    pub biaya_partisipasi: Option<i64>,

    /// Whether booth registration is open.
    #[serde(default)]
    pub pendaftaran_dibuka: bool,

    /// Booth registration deadline.
    #[serde(default)]
    pub deadline_pendaftaran: Option<NaiveDate>,

    /// Booth cap; absent means unlimited.
    #[serde(default)]
    pub max_peserta: Option<u32>,

    /// Long-form description.
    #[serde(default)]
    pub deskripsi: Option<String>,

    /// Poster asset id.
    #[serde(default)]
    pub poster: Option<String>,

    /// Lifecycle status: `upcoming`, `ongoing`, or `past`.
    #[serde(default = "default_expo_status")]
    pub status: String,

    /// Soft-delete flag.
    #[serde(default)]
    pub is_deleted: bool,

    /// Creation timestamp.
    #[serde(default)]
    pub date_created: Option<DateTime<Utc>>,
}

fn default_expo_status() -> String {
    "upcoming".to_string()
}

/// Booth registration record in the `pendaftaran_expo` collection.
///
/// A team is the ketua plus up to three anggota; each slot is a name/NIM
/// pair.
#[derive(Debug, Clone, Deserialize)]
pub struct PendaftaranExpoRecord {
    /// Primary key.
    #[serde(deserialize_with = "super::de_id")]
    pub id: String,

    /// Exhibition this registration belongs to.
    #[serde(default, deserialize_with = "super::de_relation")]
    pub expo_id: Option<String>,

    /// Team leader name.
    pub nama_ketua: String,

    /// Team leader student number.
    pub nim_ketua: String,

    /// Contact email.
    pub email: String,

    /// Contact phone.
    #[serde(default)]
    pub telepon: Option<String>,

    /// Member 1 name.
    #[serde(default)]
    pub nama_anggota1: Option<String>,

    /// Member 1 student number.
    #[serde(default)]
    pub nim_anggota1: Option<String>,

    /// Member 2 name.
    #[serde(default)]
    pub nama_anggota2: Option<String>,

    /// Member 2 student number.
    #[serde(default)]
    pub nim_anggota2: Option<String>,

    /// Member 3 name.
    #[serde(default)]
    pub nama_anggota3: Option<String>,

    /// Member 3 student number.
    #[serde(default)]
    pub nim_anggota3: Option<String>,

    /// Project name.
    pub nama_proyek: String,

    /// Project description.
    #[serde(default)]
    pub deskripsi_proyek: Option<String>,

    /// Demo link.
    #[serde(default)]
    pub link_demo: Option<String>,

    /// Review status: `pending`, `approved`, or `rejected`.
    #[serde(default = "default_registration_status")]
    pub status: String,

    /// Creation timestamp.
    #[serde(default)]
    pub date_created: Option<DateTime<Utc>>,
}

impl PendaftaranExpoRecord {
    /// Every filled NIM slot, ketua first.
    #[must_use]
    pub fn all_nims(&self) -> Vec<&str> {
        let mut nims = vec![self.nim_ketua.as_str()];
        for slot in [&self.nim_anggota1, &self.nim_anggota2, &self.nim_anggota3] {
            if let Some(nim) = slot {
                if !nim.trim().is_empty() {
                    nims.push(nim.as_str());
                }
            }
        }
        nims
    }
}
