use serde_json::{Value, json};

use crate::cms::fetch_entries;
use crate::locale::Locale;
use crate::site::feeds::{self, FEED_SIZE};
use crate::site::populate::{HOME_SECTIONS, dynamic_zone};
use crate::site::{BlockPage, PageOutcome, Site, degrade, global};

pub fn query(locale: Locale) -> Value {
    json!({
        "locale": locale.as_str(),
        "populate": {
            "blocks": dynamic_zone(HOME_SECTIONS),
            "seo": true,
        },
    })
}

pub async fn home_page(site: &Site, locale: Locale) -> PageOutcome {
    let cms = site.cms.as_ref();
    let query = query(locale);
    let (home, global, news, events) = tokio::join!(
        fetch_entries(cms, "/homepage", &query),
        global::fetch(cms, locale),
        feeds::latest_news(cms, locale, FEED_SIZE),
        feeds::upcoming_events(cms, locale, FEED_SIZE),
    );

    let entity = match home {
        Ok(entries) => entries.into_first(),
        Err(err) => {
            tracing::warn!(%locale, %err, "homepage fetch failed");
            None
        }
    };
    let Some(entity) = entity else {
        return PageOutcome::NotFound;
    };

    let global = degrade("global", global);
    let news = degrade("latest news", news);
    let events = degrade("upcoming events", events);

    let body = BlockPage::from_entity(&entity);
    tracing::debug!(%locale, blocks = body.blocks.len(), "assembled homepage");
    PageOutcome::found(body.render(site, locale, "/", global, &news, &events))
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::site::testing::{FakeCms, site};

    fn homepage() -> Value {
        json!({
            "data": { "id": 1, "attributes": {
                "blocks": [
                    { "__component": "sections.rich-text", "id": 1, "content": "Welcome" },
                    { "__component": "sections.upcoming-events", "id": 2, "title": "Agenda" },
                ],
            } }
        })
    }

    #[tokio::test]
    async fn failing_events_feed_still_renders_the_page() {
        let cms = FakeCms::default()
            .with("/homepage", homepage())
            .with("/global", json!({ "data": { "id": 1, "siteName": "Dept" } }))
            .failing("/events");
        let site = site(cms);

        let PageOutcome::Found(page) = home_page(&site, Locale::En).await else {
            panic!("expected a page");
        };
        assert_eq!(page.global.site_name.as_deref(), Some("Dept"));
        assert_eq!(page.blocks.len(), 2);
        assert!(page.blocks[1].html.contains("No upcoming events."));
    }

    #[tokio::test]
    async fn failing_primary_fetch_is_not_found() {
        let site = site(FakeCms::default().failing("/homepage"));
        assert_eq!(home_page(&site, Locale::Id).await, PageOutcome::NotFound);
    }

    #[test]
    fn requests_the_homepage_dynamic_zone() {
        let query = query(Locale::Id);
        assert!(query.pointer("/populate/blocks/on/sections.hero-slider").is_some());
        assert!(query.pointer("/populate/blocks/on/sections.curriculum").is_none());
    }
}
