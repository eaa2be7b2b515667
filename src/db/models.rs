use std::collections::BTreeMap;

use chrono::NaiveDateTime;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, PartialEq)]
pub struct PostRecord {
    pub id: i64,
    pub title: String,
    pub slug: String,
    /// Publish time in UTC.
    pub published_at: NaiveDateTime,
    pub raw_content: String,
    pub status: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tag {
    pub id: i64,
    pub name: String,
    pub slug: String,
}

/// Attachment metadata as written by the upload pipeline.
///
/// Size entries stay as raw JSON; only the one being served is interpreted.
/// An image without generated sizes is stored with `"sizes": []`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ImageMetadata {
    #[serde(default, deserialize_with = "lenient_sizes")]
    pub sizes: BTreeMap<String, Value>,
}

impl ImageMetadata {
    /// The "medium" size entry, if it is an object.
    pub fn into_medium(mut self) -> Option<ImageSize> {
        match self.sizes.remove("medium")? {
            Value::Object(fields) => Some(ImageSize::from_fields(fields.into_iter().collect())),
            _ => None,
        }
    }
}

fn lenient_sizes<'de, D>(deserializer: D) -> Result<BTreeMap<String, Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Object(map) => map.into_iter().collect(),
        _ => BTreeMap::new(),
    })
}

/// One generated size of an image. Every stored field (`width`, `height`,
/// `mime-type`, `filesize`, …) is carried through untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageSize {
    #[serde(default)]
    pub file: String,
    #[serde(flatten)]
    pub fields: BTreeMap<String, Value>,
}

impl ImageSize {
    pub fn from_fields(mut fields: BTreeMap<String, Value>) -> Self {
        let file = match fields.remove("file") {
            Some(Value::String(file)) => file,
            _ => String::new(),
        };
        Self { file, fields }
    }

    pub fn width(&self) -> Option<u64> {
        self.fields.get("width").and_then(Value::as_u64)
    }

    pub fn height(&self) -> Option<u64> {
        self.fields.get("height").and_then(Value::as_u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn metadata_parses_medium_and_keeps_its_fields() {
        let json = r#"{
            "width": 1200,
            "height": 800,
            "file": "2024/01/img.jpg",
            "sizes": {
                "medium": {"file": "img-300x200.jpg", "width": 300, "height": 200, "mime-type": "image/jpeg"},
                "thumbnail": {"file": "img-150x150.jpg", "width": 150, "height": 150}
            }
        }"#;
        let meta: ImageMetadata = serde_json::from_str(json).unwrap();
        assert_eq!(meta.sizes.len(), 2);
        let medium = meta.into_medium().unwrap();
        assert_eq!(medium.file, "img-300x200.jpg");
        assert_eq!(medium.width(), Some(300));
        assert_eq!(medium.height(), Some(200));
        assert_eq!(medium.fields["mime-type"], "image/jpeg");
    }

    #[test]
    fn metadata_without_sizes_has_no_medium() {
        let meta: ImageMetadata = serde_json::from_str(r#"{"file": "a.png"}"#).unwrap();
        assert!(meta.into_medium().is_none());
    }

    #[test]
    fn empty_sizes_list_means_no_sizes() {
        let meta: ImageMetadata = serde_json::from_str(r#"{"file": "a.png", "sizes": []}"#).unwrap();
        assert!(meta.sizes.is_empty());
        assert!(meta.into_medium().is_none());
    }

    #[test]
    fn incomplete_other_sizes_do_not_hide_medium() {
        let json = r#"{"sizes": {
            "medium": {"file": "b-300x200.jpg", "width": 300, "height": 200},
            "thumbnail": {"file": "b-150.jpg"}
        }}"#;
        let meta: ImageMetadata = serde_json::from_str(json).unwrap();
        assert_eq!(meta.into_medium().unwrap().file, "b-300x200.jpg");
    }

    #[test]
    fn non_object_medium_is_ignored() {
        let meta: ImageMetadata =
            serde_json::from_str(r#"{"sizes": {"medium": false}}"#).unwrap();
        assert!(meta.into_medium().is_none());
    }
}
