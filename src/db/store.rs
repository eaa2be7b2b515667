use rusqlite::{params, OptionalExtension};

use crate::db::models::{ImageMetadata, PostRecord, Tag};
use crate::error::AppResult;
use crate::feed::{ContentStore, MediaStore, TagStore};
use crate::permalink::Permalinks;
use crate::state::DbPool;

/// SQLite-backed content, media and tag stores.
#[derive(Clone)]
pub struct SqliteStore {
    db: DbPool,
    permalinks: Permalinks,
    upload_base_url: String,
}

impl SqliteStore {
    pub fn new(db: DbPool, permalinks: Permalinks, upload_base_url: String) -> Self {
        Self {
            db,
            permalinks,
            upload_base_url,
        }
    }
}

impl ContentStore for SqliteStore {
    fn list_published_posts(&self) -> AppResult<Vec<PostRecord>> {
        let conn = self.db.get()?;
        let mut stmt = conn.prepare(
            "SELECT id, title, slug, published_at, content, status
             FROM posts
             WHERE status = 'publish'
             ORDER BY published_at DESC, id DESC",
        )?;

        let posts = stmt
            .query_map([], |row| {
                Ok(PostRecord {
                    id: row.get(0)?,
                    title: row.get(1)?,
                    slug: row.get(2)?,
                    published_at: row.get(3)?,
                    raw_content: row.get(4)?,
                    status: row.get(5)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(posts)
    }

    fn permalink(&self, post_id: i64) -> AppResult<String> {
        let conn = self.db.get()?;
        let (slug, published_at): (String, chrono::NaiveDateTime) = conn.query_row(
            "SELECT slug, published_at FROM posts WHERE id = ?1",
            params![post_id],
            |row| Ok((row.get(0)?, row.get(1)?)),
        )?;

        Ok(self.permalinks.for_post(post_id, &slug, &published_at))
    }
}

impl MediaStore for SqliteStore {
    fn featured_image_id(&self, post_id: i64) -> AppResult<Option<i64>> {
        let conn = self.db.get()?;
        let image_id: Option<Option<i64>> = conn
            .query_row(
                "SELECT featured_image_id FROM posts WHERE id = ?1",
                params![post_id],
                |row| row.get(0),
            )
            .optional()?;

        Ok(image_id.flatten())
    }

    fn image_url(&self, image_id: i64) -> AppResult<Option<String>> {
        let conn = self.db.get()?;
        let file: Option<String> = conn
            .query_row(
                "SELECT file FROM attachments WHERE id = ?1",
                params![image_id],
                |row| row.get(0),
            )
            .optional()?;

        Ok(file
            .filter(|f| !f.trim().is_empty())
            .map(|f| {
                format!(
                    "{}/{}",
                    self.upload_base_url.trim_end_matches('/'),
                    f.trim_start_matches('/')
                )
            }))
    }

    fn image_metadata(&self, image_id: i64) -> AppResult<Option<ImageMetadata>> {
        let conn = self.db.get()?;
        let raw: Option<Option<String>> = conn
            .query_row(
                "SELECT metadata FROM attachments WHERE id = ?1",
                params![image_id],
                |row| row.get(0),
            )
            .optional()?;

        match raw.flatten() {
            Some(json) if !json.trim().is_empty() => Ok(Some(serde_json::from_str(&json)?)),
            _ => Ok(None),
        }
    }

    fn upload_base_url(&self) -> &str {
        &self.upload_base_url
    }
}

impl TagStore for SqliteStore {
    fn tags(&self, post_id: i64) -> AppResult<Vec<Tag>> {
        let conn = self.db.get()?;
        let mut stmt = conn.prepare(
            "SELECT t.id, t.name, t.slug
             FROM tags t
             JOIN post_tags pt ON pt.tag_id = t.id
             WHERE pt.post_id = ?1
             ORDER BY t.name ASC, t.id ASC",
        )?;

        let tags = stmt
            .query_map(params![post_id], |row| {
                Ok(Tag {
                    id: row.get(0)?,
                    name: row.get(1)?,
                    slug: row.get(2)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(tags)
    }
}
