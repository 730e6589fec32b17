//! Page-level data assembly.
//!
//! Every route has an assembler that declares its population tree, fans out
//! the CMS fetches it needs concurrently, and turns the results into a
//! [`PageOutcome`]. Auxiliary data (global settings, feeds) degrades to empty
//! on failure; a failing or missing primary entity is [`PageOutcome::NotFound`].

pub mod events;
pub mod facilities;
pub mod feeds;
pub mod global;
pub mod home;
pub mod news;
pub mod pages;
pub mod populate;
pub mod publications;
pub mod search;
pub mod staff;

use std::fmt;
use std::sync::Arc;

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::blocks::render::{RenderContext, RenderedBlock, render_blocks};
use crate::blocks::Block;
use crate::cms::{CmsClient, ContentSource, MediaResolver, Pagination, fetch_entries};
use crate::config::SiteConfig;
use crate::content::{EventItem, GlobalSettings, NewsItem};
use crate::i18n::{Catalog, Messages};
use crate::locale::Locale;
use crate::search::SearchClient;
use crate::view::html::{attr, text};
use crate::view::{AccessibilityWidget, Chrome, render_document};

/// Everything an assembler needs, shared by all requests.
#[derive(Clone)]
pub struct Site {
    pub cms: Arc<dyn ContentSource>,
    pub media: MediaResolver,
    pub catalog: Arc<Catalog>,
    pub search: Option<Arc<SearchClient>>,
    pub widget: Option<AccessibilityWidget>,
}

impl fmt::Debug for Site {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Site")
            .field("media", &self.media)
            .field("search", &self.search.is_some())
            .field("widget", &self.widget.is_some())
            .finish_non_exhaustive()
    }
}

impl Site {
    pub fn from_config(config: &SiteConfig) -> anyhow::Result<Self> {
        let cms = CmsClient::new(&config.cms)?;
        let search = config
            .search
            .as_ref()
            .map(SearchClient::new)
            .transpose()?
            .map(Arc::new);
        Ok(Self {
            cms: Arc::new(cms),
            media: MediaResolver::new(config.cms.base_url.as_str()),
            catalog: Arc::new(Catalog::load()?),
            search,
            widget: AccessibilityWidget::from_token(config.accessibility_token.as_deref()),
        })
    }

    pub fn messages(&self, locale: Locale) -> &Messages {
        self.catalog.get(locale)
    }

    pub fn render_context<'a>(
        &'a self,
        locale: Locale,
        latest_news: &'a [NewsItem],
        upcoming_events: &'a [EventItem],
    ) -> RenderContext<'a> {
        RenderContext {
            locale,
            messages: self.messages(locale),
            media: &self.media,
            latest_news,
            upcoming_events,
        }
    }

    /// The complete HTML document for a page.
    pub fn document(&self, page: &RenderedPage) -> String {
        let chrome = Chrome {
            messages: self.messages(page.locale),
            media: &self.media,
            widget: self.widget.as_ref(),
        };
        render_document(page, &chrome)
    }

    /// A page carrying only a title and a message, for 404 and 500 responses.
    pub fn notice_page(
        &self,
        locale: Locale,
        path: &str,
        global: GlobalSettings,
        title: &str,
        body: &str,
    ) -> String {
        let mut page = RenderedPage::new(locale, path);
        page.title = title.to_string();
        page.global = global;
        page.main = format!(
            "<section class=\"notice\"><h1>{}</h1><p>{}</p><a href=\"{}\">{}</a></section>",
            text(title),
            text(body),
            locale.path("/"),
            text(&self.messages(locale).nav.home)
        );
        self.document(&page)
    }
}

/// A page ready for the layout. `path` is the route below the locale prefix,
/// used for the locale switcher and alternate links.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RenderedPage {
    pub locale: Locale,
    pub path: String,
    pub title: String,
    pub description: Option<String>,
    pub global: GlobalSettings,
    pub main: String,
    pub blocks: Vec<RenderedBlock>,
}

impl RenderedPage {
    pub fn new(locale: Locale, path: &str) -> Self {
        Self {
            locale,
            path: path.to_string(),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum PageOutcome {
    Found(Box<RenderedPage>),
    NotFound,
}

impl PageOutcome {
    pub fn found(page: RenderedPage) -> Self {
        Self::Found(Box::new(page))
    }
}

/// An entity whose body is a dynamic zone of blocks.
#[derive(Debug, Default)]
pub(crate) struct BlockPage {
    pub title: String,
    pub description: Option<String>,
    pub blocks: Vec<Block>,
}

impl BlockPage {
    pub fn from_entity(entity: &Value) -> Self {
        let title = entity
            .pointer("/seo/metaTitle")
            .or_else(|| entity.get("title"))
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();
        let description = entity
            .pointer("/seo/metaDescription")
            .and_then(Value::as_str)
            .map(ToOwned::to_owned);
        Self {
            title,
            description,
            blocks: crate::blocks::parse_blocks(entity.get("blocks").unwrap_or(&Value::Null)),
        }
    }

    pub fn needs_news(&self) -> bool {
        self.blocks.iter().any(Block::needs_news)
    }

    pub fn needs_events(&self) -> bool {
        self.blocks.iter().any(Block::needs_events)
    }

    pub fn render(
        &self,
        site: &Site,
        locale: Locale,
        path: &str,
        global: GlobalSettings,
        latest_news: &[NewsItem],
        upcoming_events: &[EventItem],
    ) -> RenderedPage {
        let ctx = site.render_context(locale, latest_news, upcoming_events);
        RenderedPage {
            locale,
            path: path.to_string(),
            title: self.title.clone(),
            description: self.description.clone(),
            global,
            main: String::new(),
            blocks: render_blocks(&self.blocks, &ctx),
        }
    }
}

/// The result of an auxiliary fetch, or its default after logging the failure.
pub(crate) fn degrade<T: Default, E: fmt::Display>(what: &str, result: Result<T, E>) -> T {
    match result {
        Ok(value) => value,
        Err(err) => {
            tracing::warn!(what, err = %format!("{err:#}"), "auxiliary fetch failed; rendering without it");
            T::default()
        }
    }
}

/// A page of a collection, typed.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Listing<T> {
    pub items: Vec<T>,
    pub pagination: Pagination,
}

impl<T> Default for Listing<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            pagination: Pagination::default(),
        }
    }
}

impl<T> Listing<T> {
    /// Page count as the listing UI sees it: at least one page.
    pub fn page_count(&self) -> u32 {
        self.pagination.page_count.max(1)
    }
}

pub(crate) async fn fetch_listing<T: DeserializeOwned>(
    cms: &dyn ContentSource,
    path: &str,
    query: &Value,
) -> Result<Listing<T>, crate::cms::CmsError> {
    let entries = fetch_entries(cms, path, query).await?;
    Ok(Listing {
        items: entries.list(),
        pagination: entries.pagination.unwrap_or_default(),
    })
}

/// The entity with `slug` in a collection. Absence and fetch failures are both
/// `None`; the caller treats either as not found.
pub(crate) async fn fetch_by_slug<T: DeserializeOwned>(
    cms: &dyn ContentSource,
    collection: &str,
    locale: Locale,
    slug: &str,
    populate: Value,
) -> Option<T> {
    let slug = slug.trim();
    if slug.is_empty() {
        return None;
    }
    let query = serde_json::json!({
        "filters": { "slug": { "$eq": slug } },
        "locale": locale.as_str(),
        "populate": populate,
    });
    let entity = match fetch_entries(cms, collection, &query).await {
        Ok(entries) => entries.into_first()?,
        Err(err) => {
            tracing::warn!(collection, slug, %err, "primary fetch failed");
            return None;
        }
    };
    match T::deserialize(&entity) {
        Ok(item) => Some(item),
        Err(err) => {
            tracing::warn!(collection, slug, %err, "primary entity is malformed");
            None
        }
    }
}

/// The `<main>` markup shared by the collection list pages.
pub(crate) struct ListingMarkup<'a> {
    pub kind: &'a str,
    pub title: &'a str,
    pub filters: String,
    pub items: Vec<String>,
    pub empty: &'a str,
    pub pagination: String,
}

impl ListingMarkup<'_> {
    pub fn render(self) -> String {
        let mut out = format!(
            "<section class=\"listing listing--{}\"><h1 class=\"listing__title\">{}</h1>",
            self.kind,
            text(self.title)
        );
        out.push_str(&self.filters);
        if self.items.is_empty() {
            out.push_str(&format!("<p class=\"listing__empty\">{}</p>", text(self.empty)));
        } else {
            out.push_str(&format!(
                "<div class=\"listing__items\" data-listing=\"{}\">{}</div>",
                self.kind,
                self.items.concat()
            ));
        }
        out.push_str(&self.pagination);
        out.push_str("</section>");
        out
    }
}

/// One page of a collection for the infinite-scroll endpoints: the entities
/// plus their cards pre-rendered for appending.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListChunk<T> {
    pub items: Vec<T>,
    pub html: String,
    pub page: u32,
    pub page_count: u32,
    pub has_more: bool,
}

/// A "load more" link: a plain next-page link that the client script turns
/// into a fetch of `endpoint`.
pub(crate) fn load_more(
    messages: &Messages,
    base_path: &str,
    endpoint: &str,
    params: &[(&str, String)],
    page: u32,
    page_count: u32,
) -> String {
    if page >= page_count {
        return String::new();
    }
    let mut query = url::form_urlencoded::Serializer::new(String::new());
    for (key, value) in params {
        if !value.is_empty() {
            query.append_pair(key, value);
        }
    }
    query.append_pair("page", &(page + 1).to_string());
    let query = query.finish();
    format!(
        "<a class=\"load-more\" href=\"{}\" data-endpoint=\"{}\">{}</a>",
        attr(&format!("{base_path}?{query}")),
        attr(&format!("{endpoint}?{query}")),
        text(&messages.load_more)
    )
}

/// Clamp a requested 1-based page number.
pub(crate) fn page_number(requested: Option<u32>) -> u32 {
    requested.unwrap_or(1).max(1)
}

#[cfg(test)]
pub(crate) mod testing {
    use std::collections::HashMap;
    use std::sync::{Arc, Mutex};

    use async_trait::async_trait;
    use serde_json::Value;

    use super::Site;
    use crate::cms::{CmsError, ContentSource, MediaResolver};
    use crate::i18n::Catalog;

    /// In-memory CMS: canned bodies per path, recording every request.
    #[derive(Default)]
    pub struct FakeCms {
        pub bodies: HashMap<String, Value>,
        pub failing: Vec<String>,
        pub requests: Mutex<Vec<(String, Value)>>,
    }

    impl FakeCms {
        pub fn with(mut self, path: &str, body: Value) -> Self {
            self.bodies.insert(path.to_string(), body);
            self
        }

        pub fn failing(mut self, path: &str) -> Self {
            self.failing.push(path.to_string());
            self
        }
    }

    #[async_trait]
    impl ContentSource for FakeCms {
        async fn fetch(&self, path: &str, query: &Value) -> Result<Value, CmsError> {
            if let Ok(mut requests) = self.requests.lock() {
                requests.push((path.to_string(), query.clone()));
            }
            if self.failing.iter().any(|p| p == path) {
                return Err(CmsError::Status {
                    url: path.to_string(),
                    status: 500,
                    body: "boom".to_string(),
                });
            }
            Ok(self
                .bodies
                .get(path)
                .cloned()
                .unwrap_or_else(|| serde_json::json!({ "data": [] })))
        }
    }

    pub fn site(cms: FakeCms) -> Site {
        Site {
            cms: Arc::new(cms),
            media: MediaResolver::new("http://cms.local"),
            catalog: Arc::new(Catalog::load().unwrap()),
            search: None,
            widget: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn block_page_prefers_seo_title() {
        let page = BlockPage::from_entity(&json!({
            "title": "About",
            "seo": { "metaTitle": "About the department", "metaDescription": "Who we are" },
            "blocks": [{ "__component": "sections.latest-news", "id": 1 }],
        }));
        assert_eq!(page.title, "About the department");
        assert_eq!(page.description.as_deref(), Some("Who we are"));
        assert!(page.needs_news());
        assert!(!page.needs_events());
    }

    #[test]
    fn degrade_returns_default_on_error() {
        let value: Vec<u8> = degrade("feed", Err::<Vec<u8>, _>("down"));
        assert!(value.is_empty());
        assert_eq!(degrade("feed", Ok::<_, String>(3)), 3);
        assert_eq!(page_number(Some(0)), 1);
        assert_eq!(page_number(None), 1);
    }
}
