//! Builds the published-posts feed from the content, media and tag stores.

pub mod dto;

use std::sync::Arc;

use crate::db::models::{ImageMetadata, PostRecord, Tag};
use crate::error::AppResult;
use crate::render::ContentRenderer;
use crate::timezone::SiteTimezone;

pub use dto::{MediumImage, PostDto, TagDto};

pub const DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

pub trait ContentStore: Send + Sync {
    /// All posts with status "publish", in the store's order.
    fn list_published_posts(&self) -> AppResult<Vec<PostRecord>>;

    fn permalink(&self, post_id: i64) -> AppResult<String>;
}

pub trait MediaStore: Send + Sync {
    fn featured_image_id(&self, post_id: i64) -> AppResult<Option<i64>>;

    fn image_url(&self, image_id: i64) -> AppResult<Option<String>>;

    fn image_metadata(&self, image_id: i64) -> AppResult<Option<ImageMetadata>>;

    fn upload_base_url(&self) -> &str;
}

pub trait TagStore: Send + Sync {
    fn tags(&self, post_id: i64) -> AppResult<Vec<Tag>>;
}

/// The blogs operation, wired to its collaborators.
#[derive(Clone)]
pub struct PostFeed {
    content: Arc<dyn ContentStore>,
    media: Arc<dyn MediaStore>,
    tags: Arc<dyn TagStore>,
    renderer: Arc<dyn ContentRenderer>,
    timezone: SiteTimezone,
}

impl PostFeed {
    pub fn new(
        content: Arc<dyn ContentStore>,
        media: Arc<dyn MediaStore>,
        tags: Arc<dyn TagStore>,
        renderer: Arc<dyn ContentRenderer>,
        timezone: SiteTimezone,
    ) -> Self {
        Self {
            content,
            media,
            tags,
            renderer,
            timezone,
        }
    }

    /// Every published post, in store order. The first collaborator failure
    /// aborts the whole listing.
    pub fn list_blogs(&self) -> AppResult<Vec<PostDto>> {
        let posts = self.content.list_published_posts()?;

        let mut data = Vec::with_capacity(posts.len());
        for post in posts {
            data.push(self.build_post(post)?);
        }

        Ok(data)
    }

    fn build_post(&self, post: PostRecord) -> AppResult<PostDto> {
        let (image, image_medium) = match self.media.featured_image_id(post.id)? {
            Some(image_id) => self.featured_image(image_id)?,
            None => (None, None),
        };

        let tags = self
            .tags
            .tags(post.id)?
            .into_iter()
            .map(TagDto::from)
            .collect();

        let date = self
            .timezone
            .local(&post.published_at)
            .format(DATE_FORMAT)
            .to_string();

        let content = self.renderer.render(&post.raw_content);
        let link = self.content.permalink(post.id)?;

        Ok(PostDto {
            id: post.id,
            title: post.title,
            date,
            image,
            image_medium,
            content,
            tags,
            link,
        })
    }

    fn featured_image(&self, image_id: i64) -> AppResult<(Option<String>, Option<MediumImage>)> {
        let image = self.media.image_url(image_id)?.filter(|url| !url.is_empty());

        let medium = self
            .media
            .image_metadata(image_id)?
            .and_then(ImageMetadata::into_medium)
            .map(|size| MediumImage::new(size, self.media.upload_base_url()));

        Ok((image, medium))
    }
}
