use serde_json::{Value, json};

use crate::content::EventItem;
use crate::locale::Locale;
use crate::site::feeds::today;
use crate::site::populate::media;
use crate::site::{
    ListingMarkup, PageOutcome, RenderedPage, Site, degrade, fetch_by_slug, fetch_listing, global,
};
use crate::view::cards::event_card;
use crate::view::html::{attr, date_tag, image, markdown, pagination, text};

pub const PAGE_SIZE: u32 = 9;

/// Which side of today an events listing shows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum When {
    #[default]
    Upcoming,
    Past,
}

impl When {
    pub fn parse(raw: Option<&str>) -> Self {
        match raw.map(str::trim) {
            Some("past") => Self::Past,
            _ => Self::Upcoming,
        }
    }

    fn param(self) -> &'static str {
        match self {
            Self::Upcoming => "",
            Self::Past => "past",
        }
    }
}

pub fn list_query(locale: Locale, when: When, page: u32, today: &str) -> Value {
    let (filter, sort) = match when {
        When::Upcoming => (json!({ "$gte": today }), "startDate:asc"),
        When::Past => (json!({ "$lt": today }), "startDate:desc"),
    };
    json!({
        "locale": locale.as_str(),
        "filters": { "startDate": filter },
        "sort": [sort],
        "pagination": { "page": page, "pageSize": PAGE_SIZE },
        "populate": { "cover": media() },
    })
}

pub async fn events_list(site: &Site, locale: Locale, when: When, page: u32) -> PageOutcome {
    let cms = site.cms.as_ref();
    let query = list_query(locale, when, page, &today());
    let (listing, global) = tokio::join!(
        fetch_listing::<EventItem>(cms, "/events", &query),
        global::fetch(cms, locale),
    );
    let listing = degrade("events list", listing);
    let messages = site.messages(locale);
    let base = locale.path("/events");

    let tab = |target: When, label: &str| {
        let href = match target {
            When::Upcoming => base.clone(),
            When::Past => format!("{base}?when=past"),
        };
        let current = if target == when {
            " aria-current=\"page\""
        } else {
            ""
        };
        format!("<a href=\"{}\"{current}>{}</a>", attr(&href), text(label))
    };
    let filters = format!(
        "<nav class=\"listing__tabs\">{}{}</nav>",
        tab(When::Upcoming, &messages.upcoming),
        tab(When::Past, &messages.past)
    );

    let mut rendered = RenderedPage::new(locale, "/events");
    rendered.title = messages.nav.events.clone();
    rendered.global = degrade("global", global);
    rendered.main = ListingMarkup {
        kind: "events",
        title: &messages.nav.events,
        filters,
        items: listing
            .items
            .iter()
            .map(|item| event_card(item, locale, messages, &site.media))
            .collect(),
        empty: match when {
            When::Upcoming => messages.no_events.as_str(),
            When::Past => messages.no_items.as_str(),
        },
        pagination: pagination(
            &base,
            &[("when", when.param().to_string())],
            page,
            listing.page_count(),
            messages,
        ),
    }
    .render();
    PageOutcome::found(rendered)
}

pub async fn event_detail(site: &Site, locale: Locale, slug: &str) -> PageOutcome {
    let cms = site.cms.as_ref();
    let (item, global) = tokio::join!(
        fetch_by_slug::<EventItem>(cms, "/events", locale, slug, json!({ "cover": media() })),
        global::fetch(cms, locale),
    );
    let Some(item) = item else {
        return PageOutcome::NotFound;
    };
    let messages = site.messages(locale);

    let mut main = String::from("<article class=\"article article--event\">");
    main.push_str(&format!(
        "<a class=\"article__back\" href=\"{}\">{}</a>",
        attr(&locale.path("/events")),
        text(&messages.back)
    ));
    main.push_str(&format!("<h1 class=\"article__title\">{}</h1>", text(&item.title)));
    main.push_str("<p class=\"article__when\">");
    main.push_str(&date_tag(item.start_date.as_deref(), messages));
    if item.end_date.is_some() && item.end_date != item.start_date {
        let end = date_tag(item.end_date.as_deref(), messages);
        if !end.is_empty() {
            main.push_str(" &ndash; ");
            main.push_str(&end);
        }
    }
    main.push_str("</p>");
    if let Some(location) = item.location.as_deref().filter(|l| !l.trim().is_empty()) {
        main.push_str(&format!(
            "<p class=\"article__location\"><span>{}:</span> {}</p>",
            text(&messages.location),
            text(location.trim())
        ));
    }
    main.push_str(&image(item.cover.as_ref(), &site.media, "article__cover"));
    if let Some(description) = item.description.as_deref() {
        main.push_str(&format!("<div class=\"article__body\">{}</div>", markdown(description)));
    }
    if let Some(url) = item
        .registration_url
        .as_deref()
        .map(str::trim)
        .filter(|u| !u.is_empty())
    {
        main.push_str(&format!(
            "<a class=\"button\" href=\"{}\" target=\"_blank\" rel=\"noopener noreferrer\">{}</a>",
            attr(url),
            text(&messages.register)
        ));
    }
    main.push_str("</article>");

    let mut rendered = RenderedPage::new(locale, &format!("/events/{}", slug.trim()));
    rendered.title = item.title.clone();
    rendered.global = degrade("global", global);
    rendered.main = main;
    PageOutcome::found(rendered)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::cms::query::encode;
    use crate::site::testing::{FakeCms, site};

    #[test]
    fn past_events_sort_newest_first() {
        let encoded = encode(&list_query(Locale::Id, When::Past, 2, "2024-05-01"));
        assert!(encoded.contains("filters[startDate][$lt]=2024-05-01"));
        assert!(encoded.contains("sort[0]=startDate%3Adesc"));
        assert!(encoded.contains("pagination[page]=2"));
        assert_eq!(When::parse(Some("past")), When::Past);
        assert_eq!(When::parse(Some("soon")), When::Upcoming);
    }

    #[tokio::test]
    async fn detail_shows_registration_link() {
        let cms = FakeCms::default().with(
            "/events",
            json!({ "data": [{ "id": 4, "attributes": {
                "title": "Open House", "slug": "open-house",
                "startDate": "2024-06-01", "endDate": "2024-06-02",
                "registrationUrl": "https://forms.example/open-house",
            } }] }),
        );
        let site = site(cms);

        let PageOutcome::Found(page) = event_detail(&site, Locale::En, "open-house").await else {
            panic!("expected a page");
        };
        assert!(page.main.contains("June 1, 2024"));
        assert!(page.main.contains("June 2, 2024"));
        assert!(page.main.contains("href=\"https://forms.example/open-house\""));
    }

    #[tokio::test]
    async fn empty_upcoming_listing() {
        let site = site(FakeCms::default());
        let PageOutcome::Found(page) = events_list(&site, Locale::En, When::Upcoming, 1).await
        else {
            panic!("expected a page");
        };
        assert!(page.main.contains("No upcoming events."));
        assert!(page.main.contains("aria-current=\"page\">Upcoming</a>"));
    }
}
