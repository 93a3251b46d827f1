//! API Handlers
//!
//! HTTP request handlers for the lookup service endpoints.

use axum::{
    extract::{RawQuery, State},
    http::{header::USER_AGENT, HeaderMap},
    Json,
};

use crate::cache::SharedCache;
use crate::config::Config;
use crate::describer::{Describer, ReqwestFetcher};
use crate::error::{DescribeError, Result};
use crate::models::{DescribeQuery, HealthResponse, ShortDescription, StatsResponse};

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    pub describer: Describer,
}

impl AppState {
    pub fn new(describer: Describer) -> Self {
        Self { describer }
    }

    /// Builds the describer and its reqwest fetcher from configuration.
    pub fn from_config(config: &Config) -> Result<Self> {
        let fetcher = ReqwestFetcher::new(config.upstream_timeout)
            .map_err(|e| DescribeError::internal_with("failed to build http client", e))?;
        let describer = Describer::new(config.describer_config(), std::sync::Arc::new(fetcher))?;
        Ok(Self::new(describer))
    }

    pub fn cache(&self) -> SharedCache {
        self.describer.cache()
    }
}

/// Handler for GET /?person=...
///
/// The caller is identified by its `User-Agent` header, which is forwarded
/// upstream.
pub async fn describe_handler(
    State(state): State<AppState>,
    RawQuery(raw): RawQuery,
    headers: HeaderMap,
) -> Result<Json<ShortDescription>> {
    let query = DescribeQuery::from_raw(raw.as_deref());
    let person = query.person().map_err(DescribeError::InvalidArgument)?;

    let user_agent = headers
        .get(USER_AGENT)
        .map(|value| String::from_utf8_lossy(value.as_bytes()))
        .unwrap_or_default();

    let description = state
        .describer
        .short_description(person, &user_agent)
        .await?;

    Ok(Json(description))
}

/// Handler for GET /stats
pub async fn stats_handler(State(state): State<AppState>) -> Json<StatsResponse> {
    let stats = state.cache().read().await.stats();
    Json(StatsResponse::from(stats))
}

/// Handler for GET /health
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}
