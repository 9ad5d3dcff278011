use std::collections::HashMap;
use std::time::Duration;
use std::{fs::File, path::Path};

use reqwest::header::{HeaderName, HeaderValue};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::errors::{BeertapError, Result};


pub const DEFAULT_BASE_URL: &str = "http://localhost:4000";
pub const BASE_URL_ENV: &str = "BEERTAP_BASE_URL";

// ================== Public types ==================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SuiteConfig {
    pub base_url: String,
    pub request_timeout_secs: Option<u64>,
    pub headers: HashMap<String, String>,
    pub categories: Vec<String>,
    pub invalid_category: String,
    pub health_path: Option<String>,
    pub performance: Performance,
    pub load: Option<Load>,
}

/// Sequential throughput budget.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Performance {
    pub request_count: usize,
    pub threshold_ms: u64,
}

/// Concurrent load budget; the load case only exists when this is set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Load {
    pub request_count: usize,
    pub concurrency: usize,
    pub threshold_ms: u64,
}

impl Default for SuiteConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            request_timeout_secs: None,
            headers: HashMap::new(),
            categories: vec!["ale".to_string()],
            invalid_category: "invalid".to_string(),
            health_path: None,
            performance: Performance::default(),
            load: None,
        }
    }
}

impl Default for Performance {
    fn default() -> Self {
        Self {
            request_count: 20,
            threshold_ms: 5000,
        }
    }
}

impl Performance {
    pub fn threshold(&self) -> Duration {
        Duration::from_millis(self.threshold_ms)
    }
}

impl Load {
    pub fn threshold(&self) -> Duration {
        Duration::from_millis(self.threshold_ms)
    }
}

// ================== Loading & layering ==================

pub fn load_config_from_path<P: AsRef<Path>>(path: P) -> Result<SuiteConfig> {
    let f = File::open(path)?;
    Ok(serde_yaml::from_reader(f)?)
}

impl SuiteConfig {
    /// Defaults, then the YAML file, then `BEERTAP_BASE_URL`, then the explicit override.
    pub fn resolve(path: Option<&Path>, base_url_override: Option<&str>) -> Result<Self> {
        let mut cfg = match path {
            Some(p) => {
                debug!(path = %p.display(), "loading yaml config");
                load_config_from_path(p)?
            }
            None => SuiteConfig::default(),
        };

        if let Ok(url) = std::env::var(BASE_URL_ENV) {
            if !url.trim().is_empty() {
                debug!(%url, "base url taken from {BASE_URL_ENV}");
                cfg.base_url = url;
            }
        }
        if let Some(url) = base_url_override {
            cfg.base_url = url.to_string();
        }

        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<()> {
        let parsed = url::Url::parse(&self.base_url)?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(BeertapError::ConfigError(format!(
                "base_url must be http or https: {}",
                self.base_url
            )));
        }
        if self.request_timeout_secs == Some(0) {
            return Err(BeertapError::ConfigError(
                "request_timeout_secs must be > 0 when set".into(),
            ));
        }
        for (name, value) in &self.headers {
            HeaderName::from_bytes(name.as_bytes()).map_err(|e| {
                BeertapError::ConfigError(format!("header name {name:?}: {e}"))
            })?;
            HeaderValue::from_str(value).map_err(|e| {
                BeertapError::ConfigError(format!("header {name:?} value: {e}"))
            })?;
        }
        if self.categories.is_empty() {
            return Err(BeertapError::ConfigError(
                "at least one category is required".into(),
            ));
        }
        if let Some(c) = self.categories.iter().find(|c| c.trim().is_empty()) {
            return Err(BeertapError::ConfigError(format!(
                "category names must be non-empty: {c:?}"
            )));
        }
        if self.categories.contains(&self.invalid_category) {
            return Err(BeertapError::ConfigError(format!(
                "invalid_category `{}` is also listed as a valid category",
                self.invalid_category
            )));
        }
        if self.performance.request_count == 0 || self.performance.threshold_ms == 0 {
            return Err(BeertapError::ConfigError(
                "performance.request_count and performance.threshold_ms must be > 0".into(),
            ));
        }
        if let Some(load) = &self.load {
            if load.request_count == 0 || load.concurrency == 0 || load.threshold_ms == 0 {
                return Err(BeertapError::ConfigError(
                    "load.request_count, load.concurrency and load.threshold_ms must be > 0"
                        .into(),
                ));
            }
        }
        Ok(())
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }

    pub fn category_path(&self, category: &str) -> String {
        format!("/beers/{category}")
    }

    pub fn invalid_path(&self) -> String {
        self.category_path(&self.invalid_category)
    }
}
