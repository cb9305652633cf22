use anyhow::{Context, Result};
use roster_common::PAGE_SIZE;
use serde::Deserialize;
use std::fs;
use std::net::SocketAddr;

pub const DEFAULT_SEED_COUNT: usize = 100;
pub const DEFAULT_MAX_PAGE_LIMIT: u32 = 100;

// Service configuration sourced from environment variables, with an optional
// YAML override file.
#[derive(Debug, Clone)]
pub struct UserdConfig {
    pub bind_addr: SocketAddr,
    pub metrics_bind: SocketAddr,
    pub seed_count: usize,
    pub default_page_limit: u32,
    pub max_page_limit: u32,
}

#[derive(Debug, Deserialize)]
struct UserdConfigOverride {
    bind_addr: Option<String>,
    metrics_bind: Option<String>,
    seed_count: Option<usize>,
    default_page_limit: Option<u32>,
    max_page_limit: Option<u32>,
}

impl UserdConfig {
    pub fn from_env() -> Result<Self> {
        let bind_addr = std::env::var("ROSTER_USERD_BIND")
            .unwrap_or_else(|_| "0.0.0.0:3000".to_string())
            .parse()
            .with_context(|| "parse ROSTER_USERD_BIND")?;
        let metrics_bind = std::env::var("ROSTER_USERD_METRICS_BIND")
            .unwrap_or_else(|_| "0.0.0.0:9100".to_string())
            .parse()
            .with_context(|| "parse ROSTER_USERD_METRICS_BIND")?;
        let seed_count = match std::env::var("ROSTER_USERD_SEED_COUNT") {
            Ok(value) => value
                .parse()
                .with_context(|| "parse ROSTER_USERD_SEED_COUNT")?,
            Err(_) => DEFAULT_SEED_COUNT,
        };
        let default_page_limit = match std::env::var("ROSTER_USERD_PAGE_LIMIT") {
            Ok(value) => value
                .parse()
                .with_context(|| "parse ROSTER_USERD_PAGE_LIMIT")?,
            Err(_) => PAGE_SIZE,
        };
        let max_page_limit = match std::env::var("ROSTER_USERD_MAX_PAGE_LIMIT") {
            Ok(value) => value
                .parse()
                .with_context(|| "parse ROSTER_USERD_MAX_PAGE_LIMIT")?,
            Err(_) => DEFAULT_MAX_PAGE_LIMIT,
        };
        Ok(Self {
            bind_addr,
            metrics_bind,
            seed_count,
            default_page_limit,
            max_page_limit,
        })
    }

    pub fn from_env_or_yaml() -> Result<Self> {
        let mut config = Self::from_env()?;
        if let Ok(path) = std::env::var("ROSTER_USERD_CONFIG") {
            let contents = fs::read_to_string(&path)
                .with_context(|| format!("read ROSTER_USERD_CONFIG: {path}"))?;
            let override_cfg: UserdConfigOverride =
                serde_yaml::from_str(&contents).with_context(|| "parse userd config yaml")?;
            if let Some(value) = override_cfg.bind_addr {
                config.bind_addr = value.parse().with_context(|| "parse bind_addr")?;
            }
            if let Some(value) = override_cfg.metrics_bind {
                config.metrics_bind = value.parse().with_context(|| "parse metrics_bind")?;
            }
            if let Some(value) = override_cfg.seed_count {
                config.seed_count = value;
            }
            if let Some(value) = override_cfg.default_page_limit {
                config.default_page_limit = value;
            }
            if let Some(value) = override_cfg.max_page_limit {
                config.max_page_limit = value;
            }
        }
        Ok(config)
    }
}
