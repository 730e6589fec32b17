//! Meilisearch multi-search over the CMS indexes.

use std::cmp::Ordering;
use std::time::Duration;

use reqwest::header::USER_AGENT;
use serde::Deserialize;
use serde_json::{Value, json};

use crate::config::SearchConfig;
use crate::i18n::CategoryLabels;
use crate::locale::Locale;
use crate::view::html::text;

/// Highlight markers requested from the engine. Private-use code points never
/// appear in content, so hits can be escaped first and marked up after.
const HIGHLIGHT_PRE: &str = "\u{E000}";
const HIGHLIGHT_POST: &str = "\u{E001}";
const CROP_LENGTH: u32 = 30;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum SearchCategory {
    #[default]
    All,
    News,
    Events,
    Pages,
    Staff,
    Publications,
}

impl SearchCategory {
    /// Every category backed by an index, in merge tie-break order.
    pub const INDEXED: [Self; 5] = [
        Self::News,
        Self::Events,
        Self::Pages,
        Self::Staff,
        Self::Publications,
    ];

    /// Unknown or missing values search everything.
    pub fn parse(raw: Option<&str>) -> Self {
        match raw.map(str::trim).unwrap_or_default() {
            "news" => Self::News,
            "events" => Self::Events,
            "pages" => Self::Pages,
            "staff" => Self::Staff,
            "publications" => Self::Publications,
            _ => Self::All,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::News => "news",
            Self::Events => "events",
            Self::Pages => "pages",
            Self::Staff => "staff",
            Self::Publications => "publications",
        }
    }

    pub fn index_uid(self) -> Option<&'static str> {
        match self {
            Self::All => None,
            Self::News => Some("news"),
            Self::Events => Some("events"),
            Self::Pages => Some("pages"),
            Self::Staff => Some("staffs"),
            Self::Publications => Some("publications"),
        }
    }

    fn from_index_uid(uid: &str) -> Option<Self> {
        Self::INDEXED
            .into_iter()
            .find(|category| category.index_uid() == Some(uid))
    }

    pub fn label(self, labels: &CategoryLabels) -> &str {
        match self {
            Self::All => &labels.all,
            Self::News => &labels.news,
            Self::Events => &labels.events,
            Self::Pages => &labels.pages,
            Self::Staff => &labels.staff,
            Self::Publications => &labels.publications,
        }
    }

    fn attributes(self) -> (&'static [&'static str], &'static [&'static str]) {
        // (highlighted, cropped)
        match self {
            Self::All => (&[], &[]),
            Self::News => (&["title", "excerpt"], &["excerpt", "content"]),
            Self::Events => (&["title", "location"], &["description"]),
            Self::Pages => (&["title"], &["content"]),
            Self::Staff => (&["name", "expertise"], &["expertise"]),
            Self::Publications => (&["title", "authors"], &["authors", "venue"]),
        }
    }

    fn order(self) -> usize {
        Self::INDEXED
            .iter()
            .position(|category| *category == self)
            .unwrap_or(usize::MAX)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    #[error("POST {url}: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("search returned {status} for {url}: {body}")]
    Status {
        url: String,
        status: u16,
        body: String,
    },
    #[error("decode search response from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchRequest<'a> {
    pub query: &'a str,
    pub category: SearchCategory,
    pub locale: Locale,
    pub offset: usize,
    pub limit: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SearchHit {
    pub category: SearchCategory,
    pub ranking_score: f64,
    pub document: Value,
}

impl SearchHit {
    fn new(category: SearchCategory, document: Value) -> Self {
        let ranking_score = document
            .get("_rankingScore")
            .and_then(Value::as_f64)
            .unwrap_or(0.0);
        Self {
            category,
            ranking_score,
            document,
        }
    }

    fn field(&self, name: &str) -> Option<&str> {
        self.document
            .get("_formatted")
            .and_then(|formatted| formatted.get(name))
            .or_else(|| self.document.get(name))
            .and_then(Value::as_str)
            .filter(|value| !value.trim().is_empty())
    }

    /// The highlighted title as HTML.
    pub fn title_html(&self) -> String {
        self.field("title")
            .or_else(|| self.field("name"))
            .map(highlighted_html)
            .unwrap_or_default()
    }

    /// The highlighted, cropped excerpt as HTML.
    pub fn snippet_html(&self) -> String {
        let (_, cropped) = self.category.attributes();
        cropped
            .iter()
            .find_map(|name| self.field(name))
            .map(highlighted_html)
            .unwrap_or_default()
    }

    /// Where the hit links to on this site, or outside it for publications.
    pub fn href(&self, locale: Locale) -> Option<String> {
        if self.category == SearchCategory::Publications {
            let url = self.document.get("url").and_then(Value::as_str);
            let doi = self.document.get("doi").and_then(Value::as_str);
            return match (url, doi) {
                (Some(url), _) if !url.trim().is_empty() => Some(url.trim().to_string()),
                (_, Some(doi)) if !doi.trim().is_empty() => {
                    Some(format!("https://doi.org/{}", doi.trim()))
                }
                _ => None,
            };
        }
        let slug = self
            .document
            .get("slug")
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|slug| !slug.is_empty())?;
        let rest = match self.category {
            SearchCategory::News => format!("/news/{slug}"),
            SearchCategory::Events => format!("/events/{slug}"),
            SearchCategory::Staff => format!("/staff/{slug}"),
            SearchCategory::Pages | SearchCategory::All | SearchCategory::Publications => {
                format!("/{slug}")
            }
        };
        Some(locale.path(&rest))
    }
}

/// Escape an engine-highlighted string, then turn the markers into `<mark>`.
pub fn highlighted_html(raw: &str) -> String {
    text(raw)
        .replace(HIGHLIGHT_PRE, "<mark>")
        .replace(HIGHLIGHT_POST, "</mark>")
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchResults {
    pub hits: Vec<SearchHit>,
    pub total: u64,
}

#[derive(Debug, Deserialize)]
struct MultiSearchResponse {
    #[serde(default)]
    results: Vec<IndexResult>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct IndexResult {
    index_uid: String,
    #[serde(default)]
    hits: Vec<Value>,
    #[serde(default)]
    estimated_total_hits: u64,
}

/// Merge per-index hits for the "all" category: highest ranking score first,
/// ties in category order and then in each index's own order, then the
/// `offset..offset + limit` window of the merged list.
pub fn merge_results(
    per_index: Vec<(SearchCategory, Vec<Value>)>,
    offset: usize,
    limit: usize,
) -> Vec<SearchHit> {
    let mut ranked = per_index
        .into_iter()
        .flat_map(|(category, hits)| {
            hits.into_iter()
                .enumerate()
                .map(move |(position, hit)| (position, SearchHit::new(category, hit)))
        })
        .collect::<Vec<_>>();
    ranked.sort_by(|(pos_a, a), (pos_b, b)| {
        b.ranking_score
            .partial_cmp(&a.ranking_score)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.category.order().cmp(&b.category.order()))
            .then_with(|| pos_a.cmp(pos_b))
    });
    ranked
        .into_iter()
        .skip(offset)
        .take(limit)
        .map(|(_, hit)| hit)
        .collect()
}

#[derive(Debug, Clone)]
pub struct SearchClient {
    http: reqwest::Client,
    endpoint: String,
    api_key: Option<String>,
}

impl SearchClient {
    pub fn new(config: &SearchConfig) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .build()
            .map_err(|err| anyhow::anyhow!("build search http client: {err}"))?;
        Ok(Self::with_http(http, config))
    }

    pub fn with_http(http: reqwest::Client, config: &SearchConfig) -> Self {
        let host = config.host.as_str().trim_end_matches('/');
        Self {
            http,
            endpoint: format!("{host}/multi-search"),
            api_key: config.api_key.clone(),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn index_query(request: &SearchRequest<'_>, category: SearchCategory, offset: usize, limit: usize) -> Option<Value> {
        let uid = category.index_uid()?;
        let (highlighted, cropped) = category.attributes();
        Some(json!({
            "indexUid": uid,
            "q": request.query,
            "filter": format!("locale = {}", request.locale.as_str()),
            "offset": offset,
            "limit": limit,
            "attributesToHighlight": highlighted,
            "attributesToCrop": cropped,
            "cropLength": CROP_LENGTH,
            "highlightPreTag": HIGHLIGHT_PRE,
            "highlightPostTag": HIGHLIGHT_POST,
            "showRankingScore": true,
        }))
    }

    /// The request body for one search. "All" asks every index for the first
    /// `offset + limit` hits so the merged window can be cut locally.
    pub fn body(request: &SearchRequest<'_>) -> Value {
        let queries = match request.category {
            SearchCategory::All => SearchCategory::INDEXED
                .into_iter()
                .filter_map(|category| {
                    Self::index_query(request, category, 0, request.offset + request.limit)
                })
                .collect::<Vec<_>>(),
            single => Self::index_query(request, single, request.offset, request.limit)
                .into_iter()
                .collect(),
        };
        json!({ "queries": queries })
    }

    pub async fn search(&self, request: &SearchRequest<'_>) -> Result<SearchResults, SearchError> {
        let url = self.endpoint.clone();
        let mut http_request = self
            .http
            .post(&url)
            .header(USER_AGENT, concat!("dept-site/", env!("CARGO_PKG_VERSION")))
            .json(&Self::body(request));
        if let Some(key) = &self.api_key {
            http_request = http_request.bearer_auth(key);
        }

        tracing::debug!(%url, query = request.query, category = request.category.as_str(), "search request");
        let response = http_request
            .send()
            .await
            .map_err(|source| SearchError::Transport {
                url: url.clone(),
                source,
            })?;
        let status = response.status();
        let raw = response.text().await.map_err(|source| SearchError::Transport {
            url: url.clone(),
            source,
        })?;
        if !status.is_success() {
            return Err(SearchError::Status {
                url,
                status: status.as_u16(),
                body: raw,
            });
        }
        let parsed: MultiSearchResponse =
            serde_json::from_str(&raw).map_err(|source| SearchError::Decode { url, source })?;

        let total = parsed.results.iter().map(|r| r.estimated_total_hits).sum();
        let per_index = parsed
            .results
            .into_iter()
            .filter_map(|result| match SearchCategory::from_index_uid(&result.index_uid) {
                Some(category) => Some((category, result.hits)),
                None => {
                    tracing::warn!(index = %result.index_uid, "ignoring results from unexpected index");
                    None
                }
            })
            .collect::<Vec<_>>();

        let hits = match request.category {
            SearchCategory::All => merge_results(per_index, request.offset, request.limit),
            _ => per_index
                .into_iter()
                .flat_map(|(category, hits)| {
                    hits.into_iter().map(move |hit| SearchHit::new(category, hit))
                })
                .collect(),
        };
        Ok(SearchResults { hits, total })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hit(id: u32, score: f64) -> Value {
        json!({ "id": id, "_rankingScore": score })
    }

    fn ids(hits: &[SearchHit]) -> Vec<(SearchCategory, u64)> {
        hits.iter()
            .map(|h| (h.category, h.document["id"].as_u64().unwrap()))
            .collect()
    }

    #[test]
    fn merge_orders_by_score_then_category() {
        let merged = merge_results(
            vec![
                (SearchCategory::News, vec![hit(1, 0.5), hit(2, 0.9)]),
                (SearchCategory::Staff, vec![hit(3, 0.9), hit(4, 0.95)]),
                (SearchCategory::Events, vec![hit(5, 0.5)]),
            ],
            0,
            10,
        );
        assert_eq!(
            ids(&merged),
            vec![
                (SearchCategory::Staff, 4),
                (SearchCategory::News, 2),
                (SearchCategory::Staff, 3),
                (SearchCategory::News, 1),
                (SearchCategory::Events, 5),
            ]
        );
    }

    #[test]
    fn merge_applies_offset_and_limit() {
        let merged = merge_results(
            vec![
                (SearchCategory::Pages, vec![hit(1, 0.8), hit(2, 0.6)]),
                (SearchCategory::Publications, vec![hit(3, 0.7), hit(4, 0.1)]),
            ],
            1,
            2,
        );
        assert_eq!(
            ids(&merged),
            vec![(SearchCategory::Publications, 3), (SearchCategory::Pages, 2)]
        );
        assert!(merge_results(Vec::new(), 5, 5).is_empty());
    }

    #[test]
    fn all_category_queries_every_index_from_zero() {
        let request = SearchRequest {
            query: "fisika",
            category: SearchCategory::All,
            locale: Locale::Id,
            offset: 10,
            limit: 10,
        };
        let body = SearchClient::body(&request);
        let queries = body["queries"].as_array().unwrap();
        let uids = queries
            .iter()
            .map(|q| q["indexUid"].as_str().unwrap())
            .collect::<Vec<_>>();
        assert_eq!(uids, vec!["news", "events", "pages", "staffs", "publications"]);
        assert!(queries.iter().all(|q| q["offset"] == 0 && q["limit"] == 20));
        assert_eq!(queries[0]["filter"], "locale = id");
        assert_eq!(queries[0]["showRankingScore"], true);

        let single = SearchClient::body(&SearchRequest {
            category: SearchCategory::Staff,
            ..request
        });
        assert_eq!(single["queries"][0]["indexUid"], "staffs");
        assert_eq!(single["queries"][0]["offset"], 10);
    }

    #[test]
    fn highlights_are_escaped_then_marked() {
        let raw = format!("<b>{HIGHLIGHT_PRE}Fisika{HIGHLIGHT_POST}</b>");
        assert_eq!(highlighted_html(&raw), "&lt;b&gt;<mark>Fisika</mark>&lt;/b&gt;");
    }

    #[test]
    fn hit_links() {
        let news = SearchHit::new(SearchCategory::News, json!({ "slug": "wisuda" }));
        assert_eq!(news.href(Locale::En).as_deref(), Some("/en/news/wisuda"));
        let page = SearchHit::new(SearchCategory::Pages, json!({ "slug": "profil" }));
        assert_eq!(page.href(Locale::Id).as_deref(), Some("/id/profil"));
        let publication = SearchHit::new(SearchCategory::Publications, json!({ "doi": "10.1/x" }));
        assert_eq!(publication.href(Locale::Id).as_deref(), Some("https://doi.org/10.1/x"));
        let staff = SearchHit::new(
            SearchCategory::Staff,
            json!({ "name": "Ana", "_formatted": { "name": "\u{E000}Ana\u{E001}" } }),
        );
        assert_eq!(staff.title_html(), "<mark>Ana</mark>");
        assert_eq!(SearchCategory::parse(Some("nope")), SearchCategory::All);
    }
}
