use std::sync::Arc;

use r2d2::Pool;
use r2d2_sqlite::SqliteConnectionManager;

use crate::config::Config;
use crate::db::store::SqliteStore;
use crate::feed::PostFeed;
use crate::permalink::Permalinks;
use crate::render::HtmlRenderer;

pub type DbPool = Pool<SqliteConnectionManager>;

#[derive(Clone)]
pub struct AppState {
    pub feed: PostFeed,
}

impl AppState {
    /// Wires the SQLite stores and the HTML renderer into the feed.
    pub fn from_config(db: DbPool, config: &Config) -> anyhow::Result<Self> {
        let timezone = config.site.timezone()?;
        let permalinks = Permalinks::new(
            &config.site.base_url,
            &config.site.permalink_structure,
            timezone,
        );
        let store = Arc::new(SqliteStore::new(
            db,
            permalinks,
            config.site.upload_base_url(),
        ));

        let feed = PostFeed::new(
            store.clone(),
            store.clone(),
            store,
            Arc::new(HtmlRenderer::default()),
            timezone,
        );

        Ok(Self { feed })
    }
}
