use crate::locale::Locale;
use crate::search::{SearchCategory, SearchRequest, SearchResults};
use crate::site::{PageOutcome, RenderedPage, Site, degrade, global};
use crate::view::html::{attr, pagination, text};

pub const PAGE_SIZE: usize = 10;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchParams {
    pub query: String,
    pub category: SearchCategory,
    pub page: u32,
}

enum Outcome {
    Idle,
    Unavailable,
    Results(SearchResults),
}

pub async fn search_page(site: &Site, locale: Locale, params: &SearchParams) -> PageOutcome {
    let query = params.query.trim();
    let page = params.page.max(1);
    let request = SearchRequest {
        query,
        category: params.category,
        locale,
        offset: (page as usize - 1) * PAGE_SIZE,
        limit: PAGE_SIZE,
    };

    let search = async {
        if query.is_empty() {
            return Outcome::Idle;
        }
        let Some(client) = site.search.as_deref() else {
            return Outcome::Unavailable;
        };
        match client.search(&request).await {
            Ok(results) => Outcome::Results(results),
            Err(err) => {
                tracing::warn!(%err, query, "search failed");
                Outcome::Unavailable
            }
        }
    };
    let (outcome, global) = tokio::join!(search, global::fetch(site.cms.as_ref(), locale));
    let messages = site.messages(locale);
    let base = locale.path("/search");

    let mut main = String::from("<section class=\"search\">");
    main.push_str(&format!("<h1>{}</h1>", text(&messages.nav.search)));
    main.push_str(&format!(
        "<form class=\"search__form\" action=\"{}\" method=\"get\" role=\"search\"><input type=\"search\" name=\"q\" value=\"{}\" placeholder=\"{}\"><input type=\"hidden\" name=\"category\" value=\"{}\"></form>",
        attr(&base),
        attr(query),
        attr(&messages.search_placeholder),
        params.category.as_str()
    ));

    let mut tabs = String::from("<nav class=\"search__categories\">");
    for category in std::iter::once(SearchCategory::All).chain(SearchCategory::INDEXED) {
        let href = format!(
            "{base}?{}",
            url::form_urlencoded::Serializer::new(String::new())
                .append_pair("q", query)
                .append_pair("category", category.as_str())
                .finish()
        );
        let current = if category == params.category {
            " aria-current=\"page\""
        } else {
            ""
        };
        tabs.push_str(&format!(
            "<a href=\"{}\"{current}>{}</a>",
            attr(&href),
            text(category.label(&messages.search_categories))
        ));
    }
    tabs.push_str("</nav>");

    match outcome {
        Outcome::Idle => {}
        Outcome::Unavailable => {
            main.push_str(&format!(
                "<p class=\"search__notice\">{}</p>",
                text(&messages.search_unavailable)
            ));
        }
        Outcome::Results(results) => {
            main.push_str(&tabs);
            main.push_str(&format!(
                "<p class=\"search__summary\">{}</p>",
                text(&messages.search_results_for.replace("{query}", query))
            ));
            if results.hits.is_empty() {
                main.push_str(&format!(
                    "<p class=\"search__empty\">{}</p>",
                    text(&messages.search_no_results)
                ));
            } else {
                main.push_str("<ol class=\"search__results\">");
                for hit in &results.hits {
                    let title = hit.title_html();
                    let heading = match hit.href(locale) {
                        Some(href) => format!("<a href=\"{}\">{title}</a>", attr(&href)),
                        None => title,
                    };
                    main.push_str(&format!(
                        "<li class=\"search__hit\"><span class=\"search__category\">{}</span><h2>{heading}</h2>",
                        text(hit.category.label(&messages.search_categories))
                    ));
                    let snippet = hit.snippet_html();
                    if !snippet.is_empty() {
                        main.push_str(&format!("<p>{snippet}</p>"));
                    }
                    main.push_str("</li>");
                }
                main.push_str("</ol>");
            }
            let page_count = results.total.div_ceil(PAGE_SIZE as u64);
            main.push_str(&pagination(
                &base,
                &[
                    ("q", query.to_string()),
                    ("category", params.category.as_str().to_string()),
                ],
                page,
                u32::try_from(page_count).unwrap_or(u32::MAX),
                messages,
            ));
        }
    }
    main.push_str("</section>");

    let mut rendered = RenderedPage::new(locale, "/search");
    rendered.title = if query.is_empty() {
        messages.nav.search.clone()
    } else {
        format!("{}: {query}", messages.nav.search)
    };
    rendered.global = degrade("global", global);
    rendered.main = main;
    PageOutcome::found(rendered)
}
