//! The news and events feeds that homepage and content-page sections read.

use serde_json::{Value, json};

use crate::cms::{CmsError, ContentSource};
use crate::content::{EventItem, NewsItem};
use crate::locale::Locale;
use crate::site::fetch_listing;
use crate::site::populate::media;

/// Feed length for pages with latest-news or upcoming-events sections.
pub const FEED_SIZE: u32 = 3;

pub fn today() -> String {
    chrono::Utc::now().date_naive().format("%Y-%m-%d").to_string()
}

pub fn latest_news_query(locale: Locale, limit: u32) -> Value {
    json!({
        "locale": locale.as_str(),
        "sort": ["publishedAt:desc"],
        "pagination": { "page": 1, "pageSize": limit },
        "fields": ["title", "slug", "excerpt", "publishedAt", "category"],
        "populate": { "cover": media() },
    })
}

pub fn upcoming_events_query(locale: Locale, limit: u32, today: &str) -> Value {
    json!({
        "locale": locale.as_str(),
        "filters": { "startDate": { "$gte": today } },
        "sort": ["startDate:asc"],
        "pagination": { "page": 1, "pageSize": limit },
        "fields": ["title", "slug", "startDate", "endDate", "location"],
        "populate": { "cover": media() },
    })
}

pub async fn latest_news(
    cms: &dyn ContentSource,
    locale: Locale,
    limit: u32,
) -> Result<Vec<NewsItem>, CmsError> {
    let listing = fetch_listing(cms, "/news", &latest_news_query(locale, limit)).await?;
    Ok(listing.items)
}

pub async fn upcoming_events(
    cms: &dyn ContentSource,
    locale: Locale,
    limit: u32,
) -> Result<Vec<EventItem>, CmsError> {
    let query = upcoming_events_query(locale, limit, &today());
    let listing = fetch_listing(cms, "/events", &query).await?;
    Ok(listing.items)
}
