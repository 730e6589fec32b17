use std::collections::BTreeSet;

use serde_json::{Map, Value, json};

use crate::content::StaffMember;
use crate::locale::Locale;
use crate::site::populate::media;
use crate::site::{
    ListChunk, Listing, ListingMarkup, PageOutcome, RenderedPage, Site, degrade, fetch_by_slug,
    fetch_listing, global, load_more,
};
use crate::view::cards::staff_card;
use crate::view::html::{attr, image, markdown, optional, text};

pub const PAGE_SIZE: u32 = 12;

/// Group names are free text in the CMS; this bounds the request that
/// collects them for the filter.
const GROUP_SCAN_LIMIT: u32 = 200;

pub fn list_query(locale: Locale, page: u32, group: Option<&str>) -> Value {
    let mut query = Map::new();
    query.insert("locale".into(), json!(locale.as_str()));
    if let Some(group) = group {
        query.insert("filters".into(), json!({ "group": { "$eq": group } }));
    }
    query.insert("sort".into(), json!(["name:asc"]));
    query.insert(
        "pagination".into(),
        json!({ "page": page, "pageSize": PAGE_SIZE }),
    );
    query.insert("populate".into(), json!({ "photo": media() }));
    Value::Object(query)
}

fn groups_query(locale: Locale) -> Value {
    json!({
        "locale": locale.as_str(),
        "fields": ["group"],
        "pagination": { "page": 1, "pageSize": GROUP_SCAN_LIMIT },
    })
}

fn clean_group(group: Option<&str>) -> Option<&str> {
    group.map(str::trim).filter(|g| !g.is_empty())
}

async fn fetch_page(
    site: &Site,
    locale: Locale,
    page: u32,
    group: Option<&str>,
) -> Listing<StaffMember> {
    let query = list_query(locale, page, group);
    degrade(
        "staff list",
        fetch_listing::<StaffMember>(site.cms.as_ref(), "/staffs", &query).await,
    )
}

fn cards(site: &Site, locale: Locale, members: &[StaffMember]) -> Vec<String> {
    let messages = site.messages(locale);
    members
        .iter()
        .map(|member| staff_card(member, locale, messages, &site.media))
        .collect()
}

pub async fn staff_list(
    site: &Site,
    locale: Locale,
    page: u32,
    group: Option<&str>,
) -> PageOutcome {
    let group = clean_group(group);
    let cms = site.cms.as_ref();
    let groups_query = groups_query(locale);
    let (listing, groups, global) = tokio::join!(
        fetch_page(site, locale, page, group),
        fetch_listing::<StaffMember>(cms, "/staffs", &groups_query),
        global::fetch(cms, locale),
    );
    let messages = site.messages(locale);
    let base = locale.path("/staff");

    let groups = degrade("staff groups", groups)
        .items
        .into_iter()
        .filter_map(|member| member.group.map(|g| g.trim().to_string()))
        .filter(|g| !g.is_empty())
        .collect::<BTreeSet<_>>();
    let mut filters = String::new();
    if !groups.is_empty() {
        filters.push_str("<nav class=\"listing__tabs\">");
        let current = |selected: bool| if selected { " aria-current=\"page\"" } else { "" };
        filters.push_str(&format!(
            "<a href=\"{}\"{}>{}</a>",
            attr(&base),
            current(group.is_none()),
            text(&messages.all_groups)
        ));
        for name in &groups {
            let href = format!(
                "{base}?{}",
                url::form_urlencoded::Serializer::new(String::new())
                    .append_pair("group", name)
                    .finish()
            );
            filters.push_str(&format!(
                "<a href=\"{}\"{}>{}</a>",
                attr(&href),
                current(group == Some(name.as_str())),
                text(name)
            ));
        }
        filters.push_str("</nav>");
    }

    let params = [("group", group.unwrap_or_default().to_string())];
    let mut rendered = RenderedPage::new(locale, "/staff");
    rendered.title = messages.nav.staff.clone();
    rendered.global = degrade("global", global);
    rendered.main = ListingMarkup {
        kind: "staff",
        title: &messages.nav.staff,
        filters,
        items: cards(site, locale, &listing.items),
        empty: &messages.no_items,
        pagination: load_more(
            messages,
            &base,
            &format!("/api/{locale}/staff"),
            &params,
            page,
            listing.page_count(),
        ),
    }
    .render();
    PageOutcome::found(rendered)
}

/// The infinite-scroll page behind `/api/{locale}/staff`.
pub async fn staff_chunk(
    site: &Site,
    locale: Locale,
    page: u32,
    group: Option<&str>,
) -> ListChunk<StaffMember> {
    let listing = fetch_page(site, locale, page, clean_group(group)).await;
    let page_count = listing.page_count();
    ListChunk {
        html: cards(site, locale, &listing.items).concat(),
        items: listing.items,
        page,
        page_count,
        has_more: page < page_count,
    }
}

pub async fn staff_detail(site: &Site, locale: Locale, slug: &str) -> PageOutcome {
    let cms = site.cms.as_ref();
    let (member, global) = tokio::join!(
        fetch_by_slug::<StaffMember>(cms, "/staffs", locale, slug, json!({ "photo": media() })),
        global::fetch(cms, locale),
    );
    let Some(member) = member else {
        return PageOutcome::NotFound;
    };
    let messages = site.messages(locale);

    let mut main = String::from("<article class=\"profile\">");
    main.push_str(&format!(
        "<a class=\"article__back\" href=\"{}\">{}</a>",
        attr(&locale.path("/staff")),
        text(&messages.back)
    ));
    main.push_str(&image(member.photo.as_ref(), &site.media, "profile__photo"));
    main.push_str(&format!("<h1 class=\"profile__name\">{}</h1>", text(&member.name)));
    main.push_str(&optional("p", "profile__position", member.position.as_deref()));
    main.push_str("<dl class=\"profile__facts\">");
    let mut fact = |label: &str, value: String| {
        main.push_str(&format!("<dt>{}</dt><dd>{value}</dd>", text(label)));
    };
    if let Some(nip) = member.nip.as_deref().map(str::trim).filter(|n| !n.is_empty()) {
        fact(&messages.staff_nip, text(nip).into_owned());
    }
    if let Some(expertise) = member.expertise.as_deref().map(str::trim).filter(|e| !e.is_empty()) {
        fact(&messages.staff_expertise, text(expertise).into_owned());
    }
    if let Some(email) = member.email.as_deref().map(str::trim).filter(|e| !e.is_empty()) {
        fact(
            &messages.staff_email,
            format!("<a href=\"mailto:{}\">{}</a>", attr(email), text(email)),
        );
    }
    main.push_str("</dl>");
    if let Some(url) = member.scholar_url.as_deref().map(str::trim).filter(|u| !u.is_empty()) {
        main.push_str(&format!(
            "<a class=\"profile__scholar\" href=\"{}\" target=\"_blank\" rel=\"noopener noreferrer\">{}</a>",
            attr(url),
            text(&messages.staff_profile)
        ));
    }
    if let Some(biography) = member.biography.as_deref() {
        main.push_str(&format!("<div class=\"profile__bio\">{}</div>", markdown(biography)));
    }
    main.push_str("</article>");

    let mut rendered = RenderedPage::new(locale, &format!("/staff/{}", slug.trim()));
    rendered.title = member.name.clone();
    rendered.description = member.position.clone();
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

    fn staff_body() -> Value {
        json!({
            "data": [
                { "id": 1, "name": "Ana", "slug": "ana", "group": "Lecturer" },
                { "id": 2, "name": "Budi", "slug": "budi", "group": "Staff" },
            ],
            "meta": { "pagination": { "page": 1, "pageSize": 12, "pageCount": 3, "total": 30 } }
        })
    }

    #[test]
    fn group_filter_is_optional() {
        assert!(!encode(&list_query(Locale::Id, 1, None)).contains("filters"));
        assert!(encode(&list_query(Locale::Id, 1, Some("Lecturer")))
            .starts_with("locale=id&filters[group][$eq]=Lecturer&sort[0]=name%3Aasc"));
    }

    #[tokio::test]
    async fn chunk_reports_more_pages() {
        let site = site(FakeCms::default().with("/staffs", staff_body()));
        let chunk = staff_chunk(&site, Locale::En, 1, Some(" ")).await;
        assert_eq!(chunk.items.len(), 2);
        assert_eq!(chunk.page_count, 3);
        assert!(chunk.has_more);
        assert!(chunk.html.contains("href=\"/en/staff/budi\""));
    }

    #[tokio::test]
    async fn list_links_groups_and_next_chunk() {
        let site = site(FakeCms::default().with("/staffs", staff_body()));
        let PageOutcome::Found(page) = staff_list(&site, Locale::Id, 1, Some("Lecturer")).await
        else {
            panic!("expected a page");
        };
        assert!(page.main.contains("href=\"/id/staff?group=Staff\""));
        assert!(page.main.contains("aria-current=\"page\">Lecturer</a>"));
        assert!(page.main.contains("data-endpoint=\"/api/id/staff?group=Lecturer&amp;page=2\""));
    }

    #[tokio::test]
    async fn failing_chunk_is_empty() {
        let site = site(FakeCms::default().failing("/staffs"));
        let chunk = staff_chunk(&site, Locale::En, 2, None).await;
        assert!(chunk.items.is_empty());
        assert!(!chunk.has_more);
    }
}
