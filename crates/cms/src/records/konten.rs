//! Static-content collection records (FAQ, tips, document templates,
//! guides, site settings).

use serde::{Deserialize, Serialize};

/// FAQ entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FaqRecord {
    /// Primary key.
    #[serde(deserialize_with = "super::de_id")]
    pub id: String,
    /// Question text.
    pub pertanyaan: String,
    /// Answer text.
    pub jawaban: String,
    /// Grouping category.
    #[serde(default)]
    pub kategori: Option<String>,
    /// Display order.
    #[serde(default)]
    pub urutan: Option<i32>,
}

/// Tip article.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TipsRecord {
    /// Primary key.
    #[serde(deserialize_with = "super::de_id")]
    pub id: String,
    /// Tip title.
    pub judul: String,
    /// Tip body.
    pub konten: String,
    /// Grouping category.
    #[serde(default)]
    pub kategori: Option<String>,
}

/// Downloadable document template.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TemplateRecord {
    /// Primary key.
    #[serde(deserialize_with = "super::de_id")]
    pub id: String,
    /// Template name.
    pub nama: String,
    /// What the template is for.
    #[serde(default)]
    pub deskripsi: Option<String>,
    /// File asset id.
    #[serde(default)]
    pub file: Option<String>,
    /// Grouping category.
    #[serde(default)]
    pub kategori: Option<String>,
}

/// Guide (panduan) page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PanduanRecord {
    /// Primary key.
    #[serde(deserialize_with = "super::de_id")]
    pub id: String,
    /// Guide title.
    pub judul: String,
    /// Guide body.
    pub konten: String,
    /// Display order.
    #[serde(default)]
    pub urutan: Option<i32>,
}

/// Site-wide settings singleton.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteSettingsRecord {
    /// Site display name.
    #[serde(default)]
    pub nama_situs: Option<String>,
    /// Site tagline/description.
    #[serde(default)]
    pub deskripsi: Option<String>,
    /// Office contact email.
    #[serde(default)]
    pub email_kontak: Option<String>,
    /// Office contact phone.
    #[serde(default)]
    pub telepon: Option<String>,
    /// Office address.
    #[serde(default)]
    pub alamat: Option<String>,
    /// Instagram handle or URL.
    #[serde(default)]
    pub instagram: Option<String>,
    /// YouTube channel URL.
    #[serde(default)]
    pub youtube: Option<String>,
}
