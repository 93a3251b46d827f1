//! Short description lookups
//!
//! Normalizes the requested title, answers from the cache when possible and
//! otherwise fetches the page source once, scanning it for the
//! `{{Short description|...}}` template.

use std::sync::Arc;
use std::time::Duration;

use futures::StreamExt;
use reqwest::{StatusCode, Url};
use tokio::sync::RwLock;
use tracing::{debug, instrument, warn};

use crate::cache::{CacheStore, SharedCache};
use crate::describer::fetch::{Fetcher, UpstreamRequest, UpstreamResponse};
use crate::describer::normalize::{normalize_title, query_unescape};
use crate::error::{DescribeError, Result};
use crate::models::ShortDescription;
use crate::scanner::{read_between, ScanError};

pub const DEFAULT_CACHE_SIZE: usize = 500;
pub const DEFAULT_CACHED_TTL: Duration = Duration::from_secs(60 * 60);
pub const DEFAULT_UPSTREAM_URL: &str = "https://en.wikipedia.org/w/api.php";

const SHORT_DESCRIPTION_START: &str = "{{Short description|";
const SHORT_DESCRIPTION_END: &str = "}}";

/// Longest error body quoted back from the upstream.
const MAX_ERROR_BODY: usize = 4 * 1024;

const CONTACT_INFO_MSG: &str = "contact info is required, see https://meta.wikimedia.org/wiki/User-Agent_policy";

// == Describer Config ==
#[derive(Debug, Clone)]
pub struct DescriberConfig {
    /// Contact info embedded in the service tag
    pub contact_info: String,
    pub cache_size: usize,
    /// Zero disables caching
    pub cached_ttl: Duration,
    /// Upstream MediaWiki API endpoint
    pub upstream_url: String,
}

impl DescriberConfig {
    pub fn new(contact_info: impl Into<String>) -> Self {
        Self {
            contact_info: contact_info.into(),
            cache_size: DEFAULT_CACHE_SIZE,
            cached_ttl: DEFAULT_CACHED_TTL,
            upstream_url: DEFAULT_UPSTREAM_URL.to_string(),
        }
    }
}

// == Describer ==
/// Lookup orchestrator. Cheap to clone; clones share the cache.
#[derive(Clone)]
pub struct Describer {
    api_user_agent: String,
    upstream_url: Url,
    fetcher: Arc<dyn Fetcher>,
    cache: SharedCache,
}

impl Describer {
    pub fn new(config: DescriberConfig, fetcher: Arc<dyn Fetcher>) -> Result<Self> {
        if config.contact_info.trim().is_empty() {
            return Err(DescribeError::invalid_argument(CONTACT_INFO_MSG));
        }

        let upstream_url = Url::parse(&config.upstream_url).map_err(|e| {
            DescribeError::invalid_argument(format!(
                "invalid upstream url {:?}: {}",
                config.upstream_url, e
            ))
        })?;

        let cache = CacheStore::new(config.cache_size, config.cached_ttl)?;

        Ok(Self {
            api_user_agent: service_user_agent(&config.contact_info),
            upstream_url,
            fetcher,
            cache: Arc::new(RwLock::new(cache)),
        })
    }

    /// Shared handle to the result cache.
    pub fn cache(&self) -> SharedCache {
        Arc::clone(&self.cache)
    }

    pub fn api_user_agent(&self) -> &str {
        &self.api_user_agent
    }

    // == Short Description ==
    /// Looks up the short description of `person`.
    ///
    /// `person` is still percent-encoded; `user_agent` identifies the caller
    /// and is forwarded upstream. Dropping the returned future aborts any
    /// in-flight upstream request.
    #[instrument(skip(self, user_agent))]
    pub async fn short_description(
        &self,
        person: &str,
        user_agent: &str,
    ) -> Result<ShortDescription> {
        if person.is_empty() {
            return Err(DescribeError::invalid_argument("person is empty"));
        }
        if user_agent.is_empty() {
            return Err(DescribeError::invalid_argument("user agent is empty"));
        }

        let person = normalize_title(&query_unescape(person)?);
        if person.is_empty() {
            return Err(DescribeError::invalid_argument("person is empty"));
        }

        let cached = self.cache.write().await.get(&person);
        if let Some(description) = cached {
            debug!(%person, "cache hit");
            return Ok(ShortDescription::new(person, description));
        }
        debug!(%person, "cache miss");

        let request = UpstreamRequest {
            url: self.short_description_url(&person),
            user_agent: user_agent.to_string(),
            api_user_agent: self.api_user_agent.clone(),
        };

        let response = self.fetcher.fetch(request).await.map_err(|e| {
            warn!(%person, error = %e, "failed to initiate fetch");
            DescribeError::Upstream {
                message: "failed to initiate fetch".to_string(),
                source: Some(e),
            }
        })?;

        let response = check_status(response).await?;

        let description = read_between(
            response.body,
            SHORT_DESCRIPTION_START,
            SHORT_DESCRIPTION_END,
        )
        .await
        .map_err(|e| match e {
            ScanError::NotFound => DescribeError::not_found("short description"),
            ScanError::Io(e) => DescribeError::upstream_with("failed to read response body", e),
            e @ ScanError::EmptyMarker => DescribeError::internal_with("invalid markers", e),
        })?;

        self.cache
            .write()
            .await
            .add(person.clone(), description.clone());

        Ok(ShortDescription::new(person, description))
    }

    /// Revision query for the latest page source of `title`.
    fn short_description_url(&self, title: &str) -> Url {
        let mut url = self.upstream_url.clone();
        url.query_pairs_mut()
            .append_pair("action", "query")
            .append_pair("prop", "revisions")
            .append_pair("rvlimit", "1")
            .append_pair("formatversion", "2")
            .append_pair("format", "json")
            .append_pair("rvprop", "content")
            .append_pair("rvslots", "main")
            .append_pair("titles", title);
        url
    }
}

/// Service tag sent in the `Api-User-Agent` header.
fn service_user_agent(contact_info: &str) -> String {
    format!(
        "ShortDescriptionAPI/v{} ({}) hiring-exercise/v0.0.0",
        env!("CARGO_PKG_VERSION"),
        contact_info
    )
}

// == Status Classification ==
/// Passes through responses below 400 and turns the rest into errors.
async fn check_status(response: UpstreamResponse) -> Result<UpstreamResponse> {
    let status = response.status;
    if status < StatusCode::BAD_REQUEST {
        return Ok(response);
    }

    let body = match read_error_body(response).await {
        Ok(body) if body.is_empty() => status
            .canonical_reason()
            .unwrap_or("unknown status")
            .to_string(),
        Ok(body) => body,
        Err(e) => format!(
            "{} (also, body could not be read: {})",
            status.canonical_reason().unwrap_or("unknown status"),
            e
        ),
    };

    warn!(%status, %body, "upstream request failed");

    let message = format!("request failed with status {}: {}", status.as_u16(), body);
    Err(match status {
        StatusCode::NOT_FOUND => DescribeError::not_found(message),
        // We built a request the upstream did not accept
        StatusCode::BAD_REQUEST => DescribeError::internal(message),
        _ => DescribeError::upstream(message),
    })
}

/// Reads at most [`MAX_ERROR_BODY`] bytes of an error response.
async fn read_error_body(response: UpstreamResponse) -> std::io::Result<String> {
    let mut body = response.body;
    let mut collected = Vec::new();

    while let Some(chunk) = body.next().await {
        let chunk = chunk?;
        let room = MAX_ERROR_BODY - collected.len();
        collected.extend_from_slice(&chunk[..chunk.len().min(room)]);
        if collected.len() >= MAX_ERROR_BODY {
            break;
        }
    }

    Ok(String::from_utf8_lossy(&collected).trim().to_string())
}
