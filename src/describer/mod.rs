//! Describer Module
//!
//! Lookup orchestration: decoding and normalizing titles, the injected
//! upstream fetch capability, and the cached lookup itself.

pub mod fetch;
pub mod normalize;
mod service;

pub use fetch::{BodyStream, Fetcher, ReqwestFetcher, UpstreamRequest, UpstreamResponse};
pub use normalize::{normalize_title, query_unescape};
pub use service::{
    Describer, DescriberConfig, DEFAULT_CACHED_TTL, DEFAULT_CACHE_SIZE, DEFAULT_UPSTREAM_URL,
};
