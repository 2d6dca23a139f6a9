//! # Configuration
//!
//! Settings come from three layers, later ones winning:
//! 1. Built-in defaults
//! 2. `linkpath.toml` (path given with `--config`, or found in the working directory)
//! 3. `LINKPATH_*` environment variables
//!
//! ## Environment Variables
//!
//! | Variable | Field |
//! |----------|-------|
//! | `LINKPATH_HOST` | `server.host` |
//! | `LINKPATH_PORT` | `server.port` |
//! | `LINKPATH_API_KEY` | `server.api_key` |
//! | `LINKPATH_RATE_LIMIT` | `server.rate_limit` (0 disables) |
//! | `LINKPATH_CORS_ORIGINS` | `server.cors_origins` (comma-separated or `*`) |
//! | `LINKPATH_MAX_PATHS` | `search.max_paths` (0 = all) |
//! | `LINKPATH_MAX_HOPS` | `search.max_hops` (0 = unbounded) |
//! | `LINKPATH_SEARCH_TIMEOUT_MS` | `search.search_timeout_ms` (0 = no deadline) |
//! | `LINKPATH_FLEXIBLE_TIMEOUT_MS` | older name of `LINKPATH_SEARCH_TIMEOUT_MS` |
//! | `LINKPATH_ABSENT_METRIC_POLICY` | `search.absent_metric_policy` |

use linkpath_core::primitives::{DEFAULT_SEARCH_TIMEOUT_MS, DEFAULT_MAX_HOPS};
use linkpath_core::{AbsentMetricPolicy, LinkpathError, MetricRegistry, PathEngine, SearchLimits};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

/// File looked up in the working directory when `--config` is not given.
pub const DEFAULT_CONFIG_FILE: &str = "linkpath.toml";

// =============================================================================
// CONFIG STRUCTURE
// =============================================================================

/// Complete application configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub search: SearchConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Bearer key required for topology writes. `None` leaves them open.
    #[serde(default)]
    pub api_key: Option<String>,
    /// Query requests per second.
    #[serde(default = "default_rate_limit")]
    pub rate_limit: u32,
    #[serde(default)]
    pub cors_origins: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchConfig {
    #[serde(default)]
    pub max_paths: usize,
    #[serde(default = "default_max_hops")]
    pub max_hops: usize,
    /// Wall-clock bound for every path query. `flexible_timeout_ms` is
    /// still accepted.
    #[serde(default = "default_search_timeout_ms", alias = "flexible_timeout_ms")]
    pub search_timeout_ms: u64,
    #[serde(default)]
    pub absent_metric_policy: AbsentMetricPolicy,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_rate_limit() -> u32 {
    100
}

fn default_max_hops() -> usize {
    DEFAULT_MAX_HOPS
}

fn default_search_timeout_ms() -> u64 {
    DEFAULT_SEARCH_TIMEOUT_MS
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            api_key: None,
            rate_limit: default_rate_limit(),
            cors_origins: None,
        }
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            max_paths: 0,
            max_hops: default_max_hops(),
            search_timeout_ms: default_search_timeout_ms(),
            absent_metric_policy: AbsentMetricPolicy::default(),
        }
    }
}

// =============================================================================
// LOADING
// =============================================================================

impl Config {
    /// Load the configuration file (if any) and apply environment overrides.
    ///
    /// An explicit `path` must exist. Without one, `linkpath.toml` in the
    /// working directory is used when present.
    pub fn load(path: Option<&Path>) -> Result<Self, LinkpathError> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => {
                let fallback = Path::new(DEFAULT_CONFIG_FILE);
                if fallback.is_file() {
                    Self::from_file(fallback)?
                } else {
                    Self::default()
                }
            }
        };

        config.apply_env(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// Read and parse a TOML configuration file.
    pub fn from_file(path: &Path) -> Result<Self, LinkpathError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            LinkpathError::Io(format!("Failed to read config '{}': {}", path.display(), e))
        })?;
        tracing::debug!(path = %path.display(), "Loaded configuration file");
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self, LinkpathError> {
        toml::from_str(content)
            .map_err(|e| LinkpathError::Config(format!("Failed to parse config: {}", e)))
    }

    /// Apply `LINKPATH_*` overrides read through `lookup`.
    ///
    /// Empty values are ignored. Unparseable values are an error.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<(), LinkpathError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(host) = get("LINKPATH_HOST") {
            self.server.host = host;
        }
        if let Some(port) = get("LINKPATH_PORT") {
            self.server.port = parse_env("LINKPATH_PORT", &port)?;
        }
        if let Some(key) = get("LINKPATH_API_KEY") {
            self.server.api_key = Some(key);
        }
        if let Some(rate) = get("LINKPATH_RATE_LIMIT") {
            self.server.rate_limit = parse_env("LINKPATH_RATE_LIMIT", &rate)?;
        }
        if let Some(origins) = get("LINKPATH_CORS_ORIGINS") {
            self.server.cors_origins = Some(origins);
        }
        if let Some(max) = get("LINKPATH_MAX_PATHS") {
            self.search.max_paths = parse_env("LINKPATH_MAX_PATHS", &max)?;
        }
        if let Some(hops) = get("LINKPATH_MAX_HOPS") {
            self.search.max_hops = parse_env("LINKPATH_MAX_HOPS", &hops)?;
        }
        for key in ["LINKPATH_FLEXIBLE_TIMEOUT_MS", "LINKPATH_SEARCH_TIMEOUT_MS"] {
            if let Some(ms) = get(key) {
                self.search.search_timeout_ms = parse_env(key, &ms)?;
            }
        }
        if let Some(policy) = get("LINKPATH_ABSENT_METRIC_POLICY") {
            self.search.absent_metric_policy = parse_env("LINKPATH_ABSENT_METRIC_POLICY", &policy)?;
        }

        Ok(())
    }
}

fn parse_env<T>(key: &str, raw: &str) -> Result<T, LinkpathError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    raw.trim()
        .parse()
        .map_err(|e| LinkpathError::Config(format!("Invalid {} '{}': {}", key, raw, e)))
}

// =============================================================================
// DERIVED SETTINGS
// =============================================================================

impl Config {
    /// `host:port` to bind the HTTP server to.
    #[must_use]
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    /// API key, if one is configured and non-empty.
    #[must_use]
    pub fn api_key(&self) -> Option<&str> {
        self.server.api_key.as_deref().filter(|k| !k.is_empty())
    }

    #[must_use]
    pub fn search_limits(&self) -> SearchLimits {
        SearchLimits {
            max_paths: Some(self.search.max_paths).filter(|n| *n > 0),
            max_hops: Some(self.search.max_hops).filter(|n| *n > 0),
        }
    }

    /// Path engine with the standard metric vocabulary and these settings.
    #[must_use]
    pub fn engine(&self) -> PathEngine {
        PathEngine::new(MetricRegistry::default())
            .with_policy(self.search.absent_metric_policy)
            .with_limits(self.search_limits())
    }

    /// Wall-clock bound for a path query, `None` when disabled.
    #[must_use]
    pub fn search_timeout(&self) -> Option<Duration> {
        Some(self.search.search_timeout_ms)
            .filter(|ms| *ms > 0)
            .map(Duration::from_millis)
    }
}

// =============================================================================
// TESTS
// =============================================================================
