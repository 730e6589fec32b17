use serde_json::{Value, json};

use crate::content::NewsItem;
use crate::locale::Locale;
use crate::site::populate::media;
use crate::site::{
    ListingMarkup, PageOutcome, RenderedPage, Site, degrade, fetch_by_slug, fetch_listing, feeds,
    global,
};
use crate::view::cards::news_card;
use crate::view::html::{attr, date_tag, image, markdown, optional, pagination, text};

pub const PAGE_SIZE: u32 = 9;

pub fn list_query(locale: Locale, page: u32) -> Value {
    json!({
        "locale": locale.as_str(),
        "sort": ["publishedAt:desc"],
        "pagination": { "page": page, "pageSize": PAGE_SIZE },
        "fields": ["title", "slug", "excerpt", "publishedAt", "category"],
        "populate": { "cover": media() },
    })
}

pub async fn news_list(site: &Site, locale: Locale, page: u32) -> PageOutcome {
    let cms = site.cms.as_ref();
    let query = list_query(locale, page);
    let (listing, global) = tokio::join!(
        fetch_listing::<NewsItem>(cms, "/news", &query),
        global::fetch(cms, locale),
    );
    let listing = degrade("news list", listing);
    let messages = site.messages(locale);

    let mut rendered = RenderedPage::new(locale, "/news");
    rendered.title = messages.nav.news.clone();
    rendered.global = degrade("global", global);
    rendered.main = ListingMarkup {
        kind: "news",
        title: &messages.nav.news,
        filters: String::new(),
        items: listing
            .items
            .iter()
            .map(|item| news_card(item, locale, messages, &site.media))
            .collect(),
        empty: &messages.no_news,
        pagination: pagination(
            &locale.path("/news"),
            &[],
            page,
            listing.page_count(),
            messages,
        ),
    }
    .render();
    PageOutcome::found(rendered)
}

pub async fn news_detail(site: &Site, locale: Locale, slug: &str) -> PageOutcome {
    let cms = site.cms.as_ref();
    let (item, global, latest) = tokio::join!(
        fetch_by_slug::<NewsItem>(cms, "/news", locale, slug, json!({ "cover": media() })),
        global::fetch(cms, locale),
        feeds::latest_news(cms, locale, feeds::FEED_SIZE + 1),
    );
    let Some(item) = item else {
        return PageOutcome::NotFound;
    };
    let messages = site.messages(locale);

    let mut main = String::from("<article class=\"article article--news\">");
    main.push_str(&format!(
        "<a class=\"article__back\" href=\"{}\">{}</a>",
        attr(&locale.path("/news")),
        text(&messages.back)
    ));
    main.push_str(&optional("span", "article__category", item.category.as_deref()));
    main.push_str(&format!("<h1 class=\"article__title\">{}</h1>", text(&item.title)));
    main.push_str(&date_tag(item.published_at.as_deref(), messages));
    main.push_str(&image(item.cover.as_ref(), &site.media, "article__cover"));
    if let Some(content) = item.content.as_deref() {
        main.push_str(&format!("<div class=\"article__body\">{}</div>", markdown(content)));
    }
    main.push_str("</article>");

    let others = degrade("latest news", latest)
        .into_iter()
        .filter(|other| other.slug != item.slug)
        .take(feeds::FEED_SIZE as usize)
        .map(|other| news_card(&other, locale, messages, &site.media))
        .collect::<Vec<_>>();
    if !others.is_empty() {
        main.push_str(&format!(
            "<aside class=\"related\"><h2><a href=\"{}\">{}</a></h2><div class=\"card-grid\">{}</div></aside>",
            attr(&locale.path("/news")),
            text(&messages.all_news),
            others.concat()
        ));
    }

    let mut rendered = RenderedPage::new(locale, &format!("/news/{}", slug.trim()));
    rendered.title = item.title.clone();
    rendered.description = item.excerpt.clone();
    rendered.global = degrade("global", global);
    rendered.main = main;
    PageOutcome::found(rendered)
}
