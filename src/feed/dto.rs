use serde::{Deserialize, Serialize};

use crate::db::models::{ImageSize, Tag};

/// A published post as served by the blogs endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PostDto {
    pub id: i64,
    pub title: String,
    /// Publish time in the site's time zone, `YYYY-MM-DD HH:MM:SS`.
    pub date: String,
    pub image: Option<String>,
    pub image_medium: Option<MediumImage>,
    pub content: String,
    pub tags: Vec<TagDto>,
    pub link: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TagDto {
    pub id: i64,
    pub name: String,
    pub slug: String,
}

impl From<Tag> for TagDto {
    fn from(tag: Tag) -> Self {
        Self {
            id: tag.id,
            name: tag.name,
            slug: tag.slug,
        }
    }
}

/// The "medium" size entry of a featured image plus its absolute URL.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MediumImage {
    #[serde(flatten)]
    pub size: ImageSize,
    pub source_url: String,
}

impl MediumImage {
    /// The URL is `upload_base_url` + `/` + the size's file. Whether the file
    /// exists is not checked.
    pub fn new(mut size: ImageSize, upload_base_url: &str) -> Self {
        size.fields.remove("source_url");
        let source_url = format!("{}/{}", upload_base_url.trim_end_matches('/'), size.file);
        Self { size, source_url }
    }
}
