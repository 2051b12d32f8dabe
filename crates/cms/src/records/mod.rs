//! Typed records for the store's collections.
//!
//! Field names are the storage-side snake_case names. Optional fields carry
//! `#[serde(default)]` so field-projected responses still deserialize.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

pub mod expo;
pub mod kalender;
pub mod kontak;
pub mod konten;
pub mod lomba;
pub mod prestasi;

pub use expo::{ExpoRecord, PendaftaranExpoRecord};
pub use kalender::KalenderRecord;
pub use kontak::KontakRecord;
pub use konten::{
    FaqRecord, PanduanRecord, SiteSettingsRecord, TemplateRecord, TipsRecord,
};
pub use lomba::{LombaRecord, PendaftaranLombaRecord};
pub use prestasi::{PrestasiRecord, PrestasiTimRecord};

/// Deserialize a primary key that the store may emit as number or string.
pub fn de_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        other => Err(serde::de::Error::custom(format!(
            "id must be a string or number, got {other}"
        ))),
    }
}

/// Deserialize a relation key: number, string, null, or an expanded object
/// whose `id` is taken.
pub fn de_relation<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::Null => Ok(None),
        Value::String(s) => Ok(Some(s)),
        Value::Number(n) => Ok(Some(n.to_string())),
        Value::Object(map) => Ok(match map.get("id") {
            Some(Value::String(s)) => Some(s.clone()),
            Some(Value::Number(n)) => Some(n.to_string()),
            _ => None,
        }),
        other => Err(serde::de::Error::custom(format!(
            "relation must be a key or object, got {other}"
        ))),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde::Deserialize;
    use serde_json::json;

    #[derive(Deserialize)]
    struct WithId {
        #[serde(deserialize_with = "super::de_id")]
        id: String,
    }

    #[derive(Deserialize)]
    struct WithRelation {
        #[serde(default, deserialize_with = "super::de_relation")]
        lomba_id: Option<String>,
    }

    #[test]
    fn test_numeric_and_string_ids() {
        let a: WithId = serde_json::from_value(json!({ "id": 7 })).unwrap();
        assert_eq!(a.id, "7");

        let b: WithId =
            serde_json::from_value(json!({ "id": "9b2f" })).unwrap();
        assert_eq!(b.id, "9b2f");
    }

    #[test]
    fn test_relation_shapes() {
        let raw: WithRelation = serde_json::from_value(json!({ "lomba_id": 3 })).unwrap();
        assert_eq!(raw.lomba_id.as_deref(), Some("3"));

        let expanded: WithRelation =
            serde_json::from_value(json!({ "lomba_id": { "id": 3, "judul": "X" } })).unwrap();
        assert_eq!(expanded.lomba_id.as_deref(), Some("3"));

        let missing: WithRelation = serde_json::from_value(json!({})).unwrap();
        assert!(missing.lomba_id.is_none());
    }
}
