use chrono::NaiveDateTime;

use crate::timezone::SiteTimezone;

/// Expands a permalink structure such as `/%year%/%monthnum%/%postname%/`.
///
/// An empty structure gives plain links (`/?p=ID`).
#[derive(Debug, Clone)]
pub struct Permalinks {
    base_url: String,
    structure: String,
    timezone: SiteTimezone,
}

impl Permalinks {
    pub fn new(base_url: &str, structure: &str, timezone: SiteTimezone) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            structure: structure.trim().to_string(),
            timezone,
        }
    }

    pub fn for_post(&self, id: i64, slug: &str, published_at: &NaiveDateTime) -> String {
        if self.structure.is_empty() {
            return format!("{}/?p={}", self.base_url, id);
        }

        let local = self.timezone.local(published_at);
        let fmt = |pattern: &str| local.format(pattern).to_string();

        let path = self
            .structure
            .replace("%year%", &fmt("%Y"))
            .replace("%monthnum%", &fmt("%m"))
            .replace("%day%", &fmt("%d"))
            .replace("%hour%", &fmt("%H"))
            .replace("%minute%", &fmt("%M"))
            .replace("%second%", &fmt("%S"))
            .replace("%post_id%", &id.to_string())
            .replace("%postname%", slug);

        if path.starts_with('/') {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}/{}", self.base_url, path)
        }
    }
}
