//! Upstream fetch capability
//!
//! The describer never talks to an HTTP client directly; it sends an
//! [`UpstreamRequest`] through a [`Fetcher`] so tests can swap in a double.

use std::io;
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use futures::stream::BoxStream;
use futures::StreamExt;
use reqwest::header::USER_AGENT;
use reqwest::{StatusCode, Url};
use tracing::{debug, instrument};

use crate::error::BoxError;

/// Header carrying the service tag required by the upstream usage policy.
pub const API_USER_AGENT: &str = "Api-User-Agent";

/// Streamed response body.
pub type BodyStream = BoxStream<'static, io::Result<Bytes>>;

#[derive(Debug, Clone)]
pub struct UpstreamRequest {
    pub url: Url,
    /// Tag identifying the end user's client
    pub user_agent: String,
    /// Tag identifying this service
    pub api_user_agent: String,
}

pub struct UpstreamResponse {
    pub status: StatusCode,
    pub body: BodyStream,
}

impl UpstreamResponse {
    pub fn new(status: StatusCode, body: BodyStream) -> Self {
        Self { status, body }
    }

    /// Response with the whole body available up front.
    pub fn from_bytes(status: StatusCode, body: impl Into<Bytes>) -> Self {
        let body: Bytes = body.into();
        Self::new(status, futures::stream::iter([Ok(body)]).boxed())
    }
}

impl std::fmt::Debug for UpstreamResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UpstreamResponse")
            .field("status", &self.status)
            .finish_non_exhaustive()
    }
}

// == Fetcher Trait ==
/// Sends one request upstream. Implementations must not retry.
///
/// Errors are transport failures only; error statuses come back as a normal
/// response.
#[async_trait]
pub trait Fetcher: Send + Sync {
    async fn fetch(&self, request: UpstreamRequest) -> Result<UpstreamResponse, BoxError>;
}

// == Reqwest Fetcher ==
/// [`Fetcher`] backed by a shared `reqwest::Client`.
#[derive(Debug, Clone)]
pub struct ReqwestFetcher {
    client: reqwest::Client,
}

impl ReqwestFetcher {
    /// Builds a client whose requests are aborted after `timeout`.
    pub fn new(timeout: Duration) -> Result<Self, BoxError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl Fetcher for ReqwestFetcher {
    #[instrument(skip_all, fields(url = %request.url))]
    async fn fetch(&self, request: UpstreamRequest) -> Result<UpstreamResponse, BoxError> {
        let response = self
            .client
            .get(request.url)
            .header(USER_AGENT, request.user_agent)
            .header(API_USER_AGENT, request.api_user_agent)
            .send()
            .await?;

        let status = response.status();
        debug!(%status, "upstream responded");

        let body = response
            .bytes_stream()
            .map(|chunk| chunk.map_err(io::Error::other))
            .boxed();

        Ok(UpstreamResponse::new(status, body))
    }
}
