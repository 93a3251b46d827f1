//! Short Description - a lookup service for short biographical descriptions
//!
//! Fetches the `{{Short description|...}}` of a person's page from a MediaWiki
//! API, with TTL freshness and LRU eviction on the cached results.

pub mod api;
pub mod cache;
pub mod config;
pub mod describer;
pub mod error;
pub mod models;
pub mod scanner;
pub mod tasks;

pub use api::{create_router, AppState};
pub use config::Config;
pub use describer::{Describer, DescriberConfig, Fetcher, ReqwestFetcher};
pub use error::{DescribeError, ErrorKind};
pub use models::ShortDescription;
pub use tasks::spawn_cleanup_task;
