use std::collections::BTreeSet;

use serde_json::{Map, Value, json};

use crate::content::Publication;
use crate::locale::Locale;
use crate::site::{
    ListChunk, Listing, ListingMarkup, PageOutcome, RenderedPage, Site, degrade, fetch_listing,
    global, load_more,
};
use crate::view::cards::publication_item;
use crate::view::html::{attr, text};

pub const PAGE_SIZE: u32 = 20;
const YEAR_SCAN_LIMIT: u32 = 500;

pub fn list_query(locale: Locale, page: u32, year: Option<i32>) -> Value {
    let mut query = Map::new();
    query.insert("locale".into(), json!(locale.as_str()));
    if let Some(year) = year {
        query.insert("filters".into(), json!({ "year": { "$eq": year } }));
    }
    query.insert("sort".into(), json!(["year:desc", "title:asc"]));
    query.insert(
        "pagination".into(),
        json!({ "page": page, "pageSize": PAGE_SIZE }),
    );
    Value::Object(query)
}

fn years_query(locale: Locale) -> Value {
    json!({
        "locale": locale.as_str(),
        "fields": ["year"],
        "pagination": { "page": 1, "pageSize": YEAR_SCAN_LIMIT },
    })
}

async fn fetch_page(
    site: &Site,
    locale: Locale,
    page: u32,
    year: Option<i32>,
) -> Listing<Publication> {
    let query = list_query(locale, page, year);
    degrade(
        "publications list",
        fetch_listing::<Publication>(site.cms.as_ref(), "/publications", &query).await,
    )
}

fn items(site: &Site, locale: Locale, publications: &[Publication]) -> String {
    let messages = site.messages(locale);
    publications
        .iter()
        .map(|publication| publication_item(publication, messages))
        .collect()
}

pub async fn publications_list(
    site: &Site,
    locale: Locale,
    page: u32,
    year: Option<i32>,
) -> PageOutcome {
    let cms = site.cms.as_ref();
    let years_query = years_query(locale);
    let (listing, years, global) = tokio::join!(
        fetch_page(site, locale, page, year),
        fetch_listing::<Publication>(cms, "/publications", &years_query),
        global::fetch(cms, locale),
    );
    let messages = site.messages(locale);
    let base = locale.path("/publications");

    let years = degrade("publication years", years)
        .items
        .into_iter()
        .filter_map(|publication| publication.year)
        .collect::<BTreeSet<_>>();
    let mut filters = String::new();
    if !years.is_empty() {
        filters.push_str(&format!(
            "<form class=\"listing__filter\" method=\"get\" action=\"{}\"><select name=\"year\" aria-label=\"{}\" data-autosubmit>",
            attr(&base),
            attr(&messages.all_years)
        ));
        filters.push_str(&format!("<option value=\"\">{}</option>", text(&messages.all_years)));
        for option in years.iter().rev() {
            let selected = if year == Some(*option) { " selected" } else { "" };
            filters.push_str(&format!("<option value=\"{option}\"{selected}>{option}</option>"));
        }
        filters.push_str("</select></form>");
    }

    let list = items(site, locale, &listing.items);
    let params = [("year", year.map(|y| y.to_string()).unwrap_or_default())];
    let mut rendered = RenderedPage::new(locale, "/publications");
    rendered.title = messages.nav.publications.clone();
    rendered.global = degrade("global", global);
    rendered.main = ListingMarkup {
        kind: "publications",
        title: &messages.nav.publications,
        filters,
        items: if list.is_empty() {
            Vec::new()
        } else {
            vec![format!("<ol class=\"publications\">{list}</ol>")]
        },
        empty: &messages.no_items,
        pagination: load_more(
            messages,
            &base,
            &format!("/api/{locale}/publications"),
            &params,
            page,
            listing.page_count(),
        ),
    }
    .render();
    PageOutcome::found(rendered)
}

/// The infinite-scroll page behind `/api/{locale}/publications`.
pub async fn publications_chunk(
    site: &Site,
    locale: Locale,
    page: u32,
    year: Option<i32>,
) -> ListChunk<Publication> {
    let listing = fetch_page(site, locale, page, year).await;
    let page_count = listing.page_count();
    ListChunk {
        html: items(site, locale, &listing.items),
        items: listing.items,
        page,
        page_count,
        has_more: page < page_count,
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::cms::query::encode;
    use crate::site::testing::{FakeCms, site};

    fn body() -> Value {
        json!({
            "data": [
                { "id": 1, "title": "Quantum dots", "year": 2023, "doi": "10.1000/xyz" },
                { "id": 2, "title": "Lattice models", "year": 2021, "venue": "Phys. Rev. B" },
            ],
            "meta": { "pagination": { "page": 1, "pageSize": 20, "pageCount": 1, "total": 2 } }
        })
    }

    #[test]
    fn year_filter_uses_equality() {
        assert!(encode(&list_query(Locale::En, 1, Some(2023)))
            .contains("filters[year][$eq]=2023&sort[0]=year%3Adesc&sort[1]=title%3Aasc"));
    }

    #[tokio::test]
    async fn list_offers_years_newest_first() {
        let site = site(FakeCms::default().with("/publications", body()));
        let PageOutcome::Found(page) = publications_list(&site, Locale::En, 1, Some(2021)).await
        else {
            panic!("expected a page");
        };
        let newer = page.main.find("<option value=\"2023\"").unwrap();
        let older = page.main.find("<option value=\"2021\" selected").unwrap();
        assert!(newer < older);
        assert!(page.main.contains("href=\"https://doi.org/10.1000/xyz\""));
        assert!(!page.main.contains("load-more"));
    }

    #[tokio::test]
    async fn chunk_is_list_items_only() {
        let site = site(FakeCms::default().with("/publications", body()));
        let chunk = publications_chunk(&site, Locale::Id, 1, None).await;
        assert_eq!(chunk.items.len(), 2);
        assert!(!chunk.has_more);
        assert!(chunk.html.starts_with("<li class=\"publication\">"));
    }
}
