//! Configuration Module
//!
//! Handles loading and managing server configuration from environment variables.

use std::env;
use std::net::{Ipv4Addr, SocketAddr, SocketAddrV4};
use std::str::FromStr;
use std::time::Duration;

use anyhow::{bail, Context};

use crate::describer::{DescriberConfig, DEFAULT_CACHED_TTL, DEFAULT_CACHE_SIZE, DEFAULT_UPSTREAM_URL};

pub const DEFAULT_ADDR: SocketAddr = SocketAddr::V4(SocketAddrV4::new(Ipv4Addr::UNSPECIFIED, 3000));
pub const DEFAULT_UPSTREAM_TIMEOUT: Duration = Duration::from_secs(10);
pub const DEFAULT_CLEANUP_INTERVAL: Duration = Duration::from_secs(60);

/// Server configuration parameters.
#[derive(Debug, Clone)]
pub struct Config {
    /// Address the HTTP server listens on
    pub addr: SocketAddr,
    /// Contact info sent to the upstream in the service tag
    pub contact_info: String,
    /// Max amount of results the cache holds
    pub cache_size: usize,
    /// Freshness of each cached result; zero disables caching
    pub cached_ttl: Duration,
    pub upstream_url: String,
    /// Deadline for a single upstream request
    pub upstream_timeout: Duration,
    /// Interval between purges of expired cache entries
    pub cleanup_interval: Duration,
}

impl Config {
    /// Loads the configuration from environment variables.
    ///
    /// # Environment Variables
    /// - `CONTACT_INFO` - Contact info for the upstream (required)
    /// - `ADDR` - Listen address (default: 0.0.0.0:3000)
    /// - `CACHE_SIZE` - Maximum cached results, 0 means default (default: 500)
    /// - `CACHED_RESULT_TTL` - TTL such as `1h` or `30m`, 0 means default,
    ///   negative disables caching (default: 1h)
    /// - `UPSTREAM_URL` - MediaWiki API endpoint (default: English Wikipedia)
    /// - `UPSTREAM_TIMEOUT` - Upstream deadline in seconds (default: 10)
    /// - `CLEANUP_INTERVAL` - Purge frequency in seconds (default: 60)
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Loads the configuration through `lookup`, which maps a variable name
    /// to its value.
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let contact_info = lookup("CONTACT_INFO").unwrap_or_default();
        if contact_info.trim().is_empty() {
            bail!("CONTACT_INFO is required, see https://meta.wikimedia.org/wiki/User-Agent_policy");
        }

        let addr = parse_var(&lookup, "ADDR")?.unwrap_or(DEFAULT_ADDR);

        let cache_size = match parse_var::<usize, _>(&lookup, "CACHE_SIZE")? {
            None | Some(0) => DEFAULT_CACHE_SIZE,
            Some(size) => size,
        };

        let cached_ttl = match lookup("CACHED_RESULT_TTL") {
            Some(raw) if !raw.trim().is_empty() => parse_cached_ttl(raw.trim())
                .with_context(|| format!("invalid value {:?} for CACHED_RESULT_TTL", raw))?,
            _ => DEFAULT_CACHED_TTL,
        };

        let upstream_url = lookup("UPSTREAM_URL").unwrap_or_else(|| DEFAULT_UPSTREAM_URL.to_string());

        let upstream_timeout = parse_var(&lookup, "UPSTREAM_TIMEOUT")?
            .map(Duration::from_secs)
            .unwrap_or(DEFAULT_UPSTREAM_TIMEOUT);

        let cleanup_interval = parse_var(&lookup, "CLEANUP_INTERVAL")?
            .map(Duration::from_secs)
            .unwrap_or(DEFAULT_CLEANUP_INTERVAL);
        if cleanup_interval.is_zero() {
            bail!("CLEANUP_INTERVAL must be greater than zero");
        }

        Ok(Self {
            addr,
            contact_info,
            cache_size,
            cached_ttl,
            upstream_url,
            upstream_timeout,
            cleanup_interval,
        })
    }

    /// Settings consumed by the describer.
    pub fn describer_config(&self) -> DescriberConfig {
        DescriberConfig {
            contact_info: self.contact_info.clone(),
            cache_size: self.cache_size,
            cached_ttl: self.cached_ttl,
            upstream_url: self.upstream_url.clone(),
        }
    }
}

/// Parses `key` when set; a set but unparsable value is an error.
fn parse_var<T, F>(lookup: &F, key: &str) -> anyhow::Result<Option<T>>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        None => Ok(None),
        Some(raw) if raw.trim().is_empty() => Ok(None),
        Some(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .with_context(|| format!("invalid value {:?} for {}", raw, key)),
    }
}

/// Parses a TTL like `1h`, `30m` or `1h30m`. Zero selects the default and a
/// negative value (`-1s`) turns caching off.
fn parse_cached_ttl(raw: &str) -> Result<Duration, humantime::DurationError> {
    let (negative, magnitude) = match raw.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, raw.strip_prefix('+').unwrap_or(raw)),
    };

    let ttl = if magnitude.bytes().all(|b| b == b'0') && !magnitude.is_empty() {
        Duration::ZERO
    } else {
        humantime::parse_duration(magnitude)?
    };

    Ok(if ttl.is_zero() {
        DEFAULT_CACHED_TTL
    } else if negative {
        Duration::ZERO
    } else {
        ttl
    })
}
