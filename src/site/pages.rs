use serde_json::{Value, json};

use crate::cms::fetch_entries;
use crate::locale::Locale;
use crate::site::feeds::{self, FEED_SIZE};
use crate::site::populate::{PAGE_SECTIONS, dynamic_zone};
use crate::site::{BlockPage, PageOutcome, Site, degrade, global};

pub fn query(locale: Locale, slug: &str) -> Value {
    json!({
        "filters": { "slug": { "$eq": slug } },
        "locale": locale.as_str(),
        "populate": {
            "blocks": dynamic_zone(PAGE_SECTIONS),
            "seo": true,
        },
    })
}

/// A CMS-authored content page, e.g. `/id/profil`.
pub async fn content_page(site: &Site, locale: Locale, slug: &str) -> PageOutcome {
    let slug = slug.trim();
    if slug.is_empty() {
        return PageOutcome::NotFound;
    }

    let cms = site.cms.as_ref();
    let query = query(locale, slug);
    let (page, global, news, events) = tokio::join!(
        fetch_entries(cms, "/pages", &query),
        global::fetch(cms, locale),
        feeds::latest_news(cms, locale, FEED_SIZE),
        feeds::upcoming_events(cms, locale, FEED_SIZE),
    );

    let entity = match page {
        Ok(entries) => entries.into_first(),
        Err(err) => {
            tracing::warn!(%locale, slug, %err, "page fetch failed");
            None
        }
    };
    let Some(entity) = entity else {
        tracing::debug!(%locale, slug, "no page with this slug");
        return PageOutcome::NotFound;
    };

    let body = BlockPage::from_entity(&entity);
    let news = if body.needs_news() {
        degrade("latest news", news)
    } else {
        Vec::new()
    };
    let events = if body.needs_events() {
        degrade("upcoming events", events)
    } else {
        Vec::new()
    };
    PageOutcome::found(body.render(
        site,
        locale,
        &format!("/{slug}"),
        degrade("global", global),
        &news,
        &events,
    ))
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::cms::query::encode;
    use crate::site::testing::{FakeCms, site};

    #[test]
    fn filters_by_slug_then_locale() {
        let encoded = encode(&query(Locale::Id, "test"));
        assert!(encoded.starts_with("filters[slug][$eq]=test&locale=id&populate[blocks][on]"));
    }

    #[tokio::test]
    async fn legacy_page_with_no_blocks() {
        let cms = FakeCms::default().with(
            "/pages",
            json!({ "data": [{ "id": 1, "attributes": { "title": "Test", "blocks": [] } }] }),
        );
        let site = site(cms);

        let PageOutcome::Found(page) = content_page(&site, Locale::Id, "test").await else {
            panic!("expected a page");
        };
        assert_eq!(page.title, "Test");
        assert!(page.blocks.is_empty());
        assert_eq!(page.path, "/test");
    }

    #[tokio::test]
    async fn unknown_slug_is_not_found() {
        let site = site(FakeCms::default().with("/pages", json!({ "data": [] })));
        assert_eq!(
            content_page(&site, Locale::En, "missing").await,
            PageOutcome::NotFound
        );
        assert_eq!(content_page(&site, Locale::En, "  ").await, PageOutcome::NotFound);
    }

    #[tokio::test]
    async fn cms_error_is_not_found() {
        let site = site(FakeCms::default().failing("/pages"));
        assert_eq!(
            content_page(&site, Locale::Id, "profil").await,
            PageOutcome::NotFound
        );
    }
}
