use anyhow::Context as _;
use url::Url;

use crate::cli::{CmsArgs, SearchArgs, SiteArgs};

#[derive(Debug, Clone)]
pub struct CmsConfig {
    pub base_url: Url,
    pub api_token: Option<String>,
}

#[derive(Debug, Clone)]
pub struct SearchConfig {
    pub host: Url,
    pub api_key: Option<String>,
}

/// Startup configuration. Validated once; nothing here changes per request.
#[derive(Debug, Clone)]
pub struct SiteConfig {
    pub cms: CmsConfig,
    pub search: Option<SearchConfig>,
    pub accessibility_token: Option<String>,
}

impl CmsConfig {
    pub fn from_args(args: &CmsArgs) -> anyhow::Result<Self> {
        let base_url = parse_http_url(&args.cms_url).context("invalid --cms-url / CMS_URL")?;
        let api_token = non_empty(args.cms_token.as_deref());
        if api_token.is_none() {
            tracing::warn!("CMS_API_TOKEN is not set; CMS requests will be unauthenticated");
        }
        Ok(Self {
            base_url,
            api_token,
        })
    }
}

impl SearchConfig {
    pub fn from_args(args: &SearchArgs) -> anyhow::Result<Option<Self>> {
        let Some(host) = non_empty(args.search_host.as_deref()) else {
            tracing::info!("SEARCH_HOST is not set; search is disabled");
            return Ok(None);
        };
        let host = parse_http_url(&host).context("invalid --search-host / SEARCH_HOST")?;
        Ok(Some(Self {
            host,
            api_key: non_empty(args.search_api_key.as_deref()),
        }))
    }
}

impl SiteConfig {
    pub fn from_args(args: &SiteArgs) -> anyhow::Result<Self> {
        Ok(Self {
            cms: CmsConfig::from_args(&args.cms)?,
            search: SearchConfig::from_args(&args.search)?,
            accessibility_token: non_empty(args.accessibility_token.as_deref()),
        })
    }
}

fn parse_http_url(raw: &str) -> anyhow::Result<Url> {
    let raw = raw.trim();
    if raw.is_empty() {
        anyhow::bail!("url is empty");
    }
    let url = Url::parse(raw).with_context(|| format!("parse url: {raw}"))?;
    if url.scheme() != "http" && url.scheme() != "https" {
        anyhow::bail!("url must be http/https: {url}");
    }
    if url.host_str().is_none() {
        anyhow::bail!("url must include host: {url}");
    }
    Ok(url)
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(ToOwned::to_owned)
}
