use serde_json::{Value, json};

use crate::content::Facility;
use crate::locale::Locale;
use crate::site::populate::media;
use crate::site::{
    ListingMarkup, PageOutcome, RenderedPage, Site, degrade, fetch_by_slug, fetch_listing, global,
};
use crate::view::cards::facility_card;
use crate::view::html::{attr, image, markdown, text};

/// Facilities are few; the listing is a single page.
const LIST_LIMIT: u32 = 100;

pub fn list_query(locale: Locale) -> Value {
    json!({
        "locale": locale.as_str(),
        "sort": ["name:asc"],
        "pagination": { "page": 1, "pageSize": LIST_LIMIT },
        "populate": { "images": media() },
    })
}

pub async fn facilities_list(site: &Site, locale: Locale) -> PageOutcome {
    let cms = site.cms.as_ref();
    let query = list_query(locale);
    let (listing, global) = tokio::join!(
        fetch_listing::<Facility>(cms, "/facilities", &query),
        global::fetch(cms, locale),
    );
    let listing = degrade("facilities list", listing);
    let messages = site.messages(locale);

    let mut rendered = RenderedPage::new(locale, "/facilities");
    rendered.title = messages.nav.facilities.clone();
    rendered.global = degrade("global", global);
    rendered.main = ListingMarkup {
        kind: "facilities",
        title: &messages.nav.facilities,
        filters: String::new(),
        items: listing
            .items
            .iter()
            .map(|facility| facility_card(facility, locale, messages, &site.media))
            .collect(),
        empty: &messages.no_items,
        pagination: String::new(),
    }
    .render();
    PageOutcome::found(rendered)
}

pub async fn facility_detail(site: &Site, locale: Locale, slug: &str) -> PageOutcome {
    let cms = site.cms.as_ref();
    let (facility, global) = tokio::join!(
        fetch_by_slug::<Facility>(cms, "/facilities", locale, slug, json!({ "images": media() })),
        global::fetch(cms, locale),
    );
    let Some(facility) = facility else {
        return PageOutcome::NotFound;
    };
    let messages = site.messages(locale);

    let mut main = String::from("<article class=\"article article--facility\">");
    main.push_str(&format!(
        "<a class=\"article__back\" href=\"{}\">{}</a>",
        attr(&locale.path("/facilities")),
        text(&messages.back)
    ));
    main.push_str(&format!("<h1 class=\"article__title\">{}</h1>", text(&facility.name)));
    if let Some(location) = facility.location.as_deref().filter(|l| !l.trim().is_empty()) {
        main.push_str(&format!(
            "<p class=\"article__location\"><span>{}:</span> {}</p>",
            text(&messages.location),
            text(location.trim())
        ));
    }
    let images = facility
        .images
        .iter()
        .map(|img| image(Some(img), &site.media, "gallery__image"))
        .filter(|html| !html.is_empty())
        .collect::<Vec<_>>();
    if !images.is_empty() {
        main.push_str(&format!("<div class=\"gallery\">{}</div>", images.concat()));
    }
    if let Some(description) = facility.description.as_deref() {
        main.push_str(&format!("<div class=\"article__body\">{}</div>", markdown(description)));
    }
    main.push_str("</article>");

    let mut rendered = RenderedPage::new(locale, &format!("/facilities/{}", slug.trim()));
    rendered.title = facility.name.clone();
    rendered.global = degrade("global", global);
    rendered.main = main;
    PageOutcome::found(rendered)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::site::testing::{FakeCms, site};

    #[tokio::test]
    async fn detail_resolves_every_image() {
        let cms = FakeCms::default().with(
            "/facilities",
            json!({ "data": [{ "id": 1, "attributes": {
                "name": "Lab Komputasi", "slug": "lab-komputasi",
                "images": { "data": [
                    { "id": 1, "attributes": { "url": "/uploads/a.jpg" } },
                    { "id": 2, "attributes": { "url": "https://cdn.example/b.jpg" } },
                    { "id": 3, "attributes": { "url": "" } },
                ] },
            } }] }),
        );
        let site = site(cms);

        let PageOutcome::Found(page) = facility_detail(&site, Locale::Id, "lab-komputasi").await
        else {
            panic!("expected a page");
        };
        assert!(page.main.contains("src=\"http://cms.local/uploads/a.jpg\""));
        assert!(page.main.contains("src=\"https://cdn.example/b.jpg\""));
        assert_eq!(page.main.matches("<img").count(), 2);
    }

    #[tokio::test]
    async fn empty_list_shows_placeholder() {
        let site = site(FakeCms::default());
        let PageOutcome::Found(page) = facilities_list(&site, Locale::En).await else {
            panic!("expected a page");
        };
        assert!(page.main.contains("Nothing here yet."));
    }
}
