// Client-side defaults and configuration helpers.
use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::time::Duration;

pub(crate) const DEFAULT_PAGE_SIZE: u32 = roster_common::PAGE_SIZE;
/// Sentinel used when the server omits (or mangles) `X-Total-Count`: treat the
/// total as unknown and assume the current page is not final.
pub(crate) const DEFAULT_FALLBACK_TOTAL_COUNT: u64 = 100;
/// Pre-fetch margin the rendering surface applies before the sentinel is
/// fully visible, hiding fetch latency behind the remaining scroll distance.
pub(crate) const DEFAULT_LOOKAHEAD_PX: u32 = 300;
/// Automatic retries per page fetch, on top of the initial attempt.
pub(crate) const DEFAULT_RETRY_LIMIT: u32 = 1;
/// Cached pages younger than this are served without refetching.
pub(crate) const DEFAULT_STALE_AFTER: Duration = Duration::from_secs(5 * 60);
/// Cached pages unused for longer than this are evicted.
pub(crate) const DEFAULT_GC_AFTER: Duration = Duration::from_secs(15 * 60);
pub(crate) const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the user API, e.g. `http://127.0.0.1:8080`.
    pub api_url: String,
    pub page_size: u32,
    pub fallback_total_count: u64,
    pub lookahead_px: u32,
    pub retry_limit: u32,
    pub stale_after: Duration,
    pub gc_after: Duration,
    pub request_timeout: Duration,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
struct ClientConfigOverride {
    api_url: Option<String>,
    page_size: Option<u32>,
    fallback_total_count: Option<u64>,
    lookahead_px: Option<u32>,
    retry_limit: Option<u32>,
    stale_after_secs: Option<u64>,
    gc_after_secs: Option<u64>,
    request_timeout_secs: Option<u64>,
}

impl ClientConfig {
    pub fn new(api_url: impl Into<String>) -> Self {
        Self {
            api_url: api_url.into(),
            page_size: DEFAULT_PAGE_SIZE,
            fallback_total_count: DEFAULT_FALLBACK_TOTAL_COUNT,
            lookahead_px: DEFAULT_LOOKAHEAD_PX,
            retry_limit: DEFAULT_RETRY_LIMIT,
            stale_after: DEFAULT_STALE_AFTER,
            gc_after: DEFAULT_GC_AFTER,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }

    pub fn from_env() -> Result<Self> {
        let api_url = std::env::var("ROSTER_API_URL").context("ROSTER_API_URL is not set")?;
        let mut config = Self::new(api_url);
        if let Some(value) = read_u32_env("ROSTER_PAGE_SIZE") {
            config.page_size = value;
        }
        if let Some(value) = read_u64_env("ROSTER_FALLBACK_TOTAL_COUNT") {
            config.fallback_total_count = value;
        }
        if let Some(value) = read_u32_env("ROSTER_LOOKAHEAD_PX") {
            config.lookahead_px = value;
        }
        if let Some(value) = read_u32_env("ROSTER_RETRY_LIMIT") {
            config.retry_limit = value;
        }
        if let Some(value) = read_u64_env("ROSTER_STALE_AFTER_SECS") {
            config.stale_after = Duration::from_secs(value);
        }
        if let Some(value) = read_u64_env("ROSTER_GC_AFTER_SECS") {
            config.gc_after = Duration::from_secs(value);
        }
        if let Some(value) = read_u64_env("ROSTER_REQUEST_TIMEOUT_SECS") {
            config.request_timeout = Duration::from_secs(value);
        }
        Ok(config)
    }

    pub fn from_env_or_yaml(config_path: Option<&str>) -> Result<Self> {
        let mut config = Self::from_env()?;
        let override_path = config_path
            .map(|value| value.to_string())
            .or_else(|| std::env::var("ROSTER_CLIENT_CONFIG").ok());
        let contents = match override_path.as_deref() {
            Some(path) => match fs::read_to_string(path) {
                Ok(contents) => Some(contents),
                Err(err) => {
                    return Err(err).with_context(|| format!("read client config: {path}"));
                }
            },
            None => None,
        };
        if let Some(contents) = contents {
            let override_cfg: ClientConfigOverride =
                serde_yaml::from_str(&contents).context("parse client config yaml")?;
            override_cfg.apply(&mut config);
        }
        Ok(config)
    }
}

impl ClientConfigOverride {
    fn apply(&self, config: &mut ClientConfig) {
        if let Some(value) = &self.api_url
            && !value.is_empty()
        {
            config.api_url = value.clone();
        }
        if let Some(value) = self.page_size
            && value > 0
        {
            config.page_size = value;
        }
        if let Some(value) = self.fallback_total_count
            && value > 0
        {
            config.fallback_total_count = value;
        }
        if let Some(value) = self.lookahead_px {
            config.lookahead_px = value;
        }
        if let Some(value) = self.retry_limit {
            config.retry_limit = value;
        }
        if let Some(value) = self.stale_after_secs {
            config.stale_after = Duration::from_secs(value);
        }
        if let Some(value) = self.gc_after_secs {
            config.gc_after = Duration::from_secs(value);
        }
        if let Some(value) = self.request_timeout_secs
            && value > 0
        {
            config.request_timeout = Duration::from_secs(value);
        }
    }
}

fn read_u64_env(key: &str) -> Option<u64> {
    std::env::var(key)
        .ok()
        .and_then(|value| value.parse::<u64>().ok())
        .filter(|value| *value > 0)
}

fn read_u32_env(key: &str) -> Option<u32> {
    std::env::var(key)
        .ok()
        .and_then(|value| value.parse::<u32>().ok())
        .filter(|value| *value > 0)
}
