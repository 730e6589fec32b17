use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{ACCEPT, CACHE_CONTROL, USER_AGENT};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::cms::{normalize, query};
use crate::config::CmsConfig;

#[derive(Debug, thiserror::Error)]
pub enum CmsError {
    #[error("GET {url}: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("CMS returned {status} for {url}: {body}")]
    Status {
        url: String,
        status: u16,
        body: String,
    },
    #[error("decode CMS response from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },
}

impl CmsError {
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            Self::Transport { .. } | Self::Decode { .. } => None,
        }
    }
}

/// Read access to CMS resources.
#[async_trait]
pub trait ContentSource: Send + Sync {
    /// `GET /api{path}?{query}`, returning the response body as JSON.
    async fn fetch(&self, path: &str, query: &Value) -> Result<Value, CmsError>;
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Pagination {
    pub page: u32,
    pub page_size: u32,
    pub page_count: u32,
    pub total: u64,
}

/// A response with its `data` normalized to flat entities.
#[derive(Debug, Clone, PartialEq)]
pub struct Entries {
    pub data: Value,
    pub pagination: Option<Pagination>,
}

impl Entries {
    pub fn from_body(body: Value) -> Self {
        let Value::Object(mut map) = body else {
            return Self {
                data: Value::Null,
                pagination: None,
            };
        };
        let pagination = map
            .get("meta")
            .and_then(|meta| meta.get("pagination"))
            .and_then(|p| serde_json::from_value(p.clone()).ok());
        let data = normalize::normalize(map.remove("data").unwrap_or(Value::Null));
        Self { data, pagination }
    }

    /// The first entity of a collection response, or the entity of a single
    /// type response.
    pub fn into_first(self) -> Option<Value> {
        match self.data {
            Value::Array(items) => items.into_iter().next(),
            Value::Null => None,
            other => Some(other),
        }
    }

    /// Deserialize every entity, dropping (and logging) the ones that do not
    /// fit `T`.
    pub fn list<T: DeserializeOwned>(&self) -> Vec<T> {
        let items = match &self.data {
            Value::Array(items) => items.as_slice(),
            Value::Null => return Vec::new(),
            single => std::slice::from_ref(single),
        };
        items
            .iter()
            .filter_map(|item| match T::deserialize(item) {
                Ok(value) => Some(value),
                Err(err) => {
                    tracing::warn!(%err, entry_id = ?item.get("id"), "skipping malformed CMS entry");
                    None
                }
            })
            .collect()
    }
}

pub async fn fetch_entries(
    source: &dyn ContentSource,
    path: &str,
    query: &Value,
) -> Result<Entries, CmsError> {
    let body = source.fetch(path, query).await?;
    Ok(Entries::from_body(body))
}

#[derive(Debug, Clone)]
pub struct CmsClient {
    http: reqwest::Client,
    base_url: String,
    api_token: Option<String>,
}

impl CmsClient {
    pub fn new(config: &CmsConfig) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .build()
            .map_err(|err| anyhow::anyhow!("build CMS http client: {err}"))?;
        Ok(Self::with_http(http, config))
    }

    pub fn with_http(http: reqwest::Client, config: &CmsConfig) -> Self {
        Self {
            http,
            base_url: config.base_url.as_str().trim_end_matches('/').to_string(),
            api_token: config.api_token.clone(),
        }
    }

    pub fn endpoint(&self, path: &str, query: &Value) -> String {
        let path = path.trim_start_matches('/');
        let encoded = query::encode(query);
        if encoded.is_empty() {
            format!("{}/api/{path}", self.base_url)
        } else {
            format!("{}/api/{path}?{encoded}", self.base_url)
        }
    }
}

#[async_trait]
impl ContentSource for CmsClient {
    async fn fetch(&self, path: &str, query: &Value) -> Result<Value, CmsError> {
        let url = self.endpoint(path, query);

        let mut request = self
            .http
            .get(&url)
            .header(USER_AGENT, concat!("dept-site/", env!("CARGO_PKG_VERSION")))
            .header(ACCEPT, "application/json")
            .header(CACHE_CONTROL, "no-store");
        match &self.api_token {
            Some(token) => request = request.bearer_auth(token),
            None => tracing::warn!(%url, "no CMS API token configured; requesting unauthenticated"),
        }

        tracing::debug!(%url, "CMS request");
        let response = request.send().await.map_err(|source| CmsError::Transport {
            url: url.clone(),
            source,
        })?;

        let status = response.status();
        let raw = response.text().await.map_err(|source| CmsError::Transport {
            url: url.clone(),
            source,
        })?;
        if !status.is_success() {
            return Err(CmsError::Status {
                url,
                status: status.as_u16(),
                body: raw,
            });
        }

        serde_json::from_str(&raw).map_err(|source| CmsError::Decode { url, source })
    }
}
