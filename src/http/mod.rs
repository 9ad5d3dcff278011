use std::collections::HashMap;
use std::time::Duration;

use reqwest::Client;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest_middleware::{ClientBuilder, ClientWithMiddleware};

use crate::config::SuiteConfig;
use crate::errors::Result;

pub mod logging;

#[derive(Clone)]
pub struct Http {
    base_url: String,
    headers: Option<HashMap<String, String>>,
    timeout: Option<Duration>,
}

impl Http {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            headers: None,
            timeout: None,
        }
    }

    pub fn from_config(cfg: &SuiteConfig) -> Self {
        let mut http = Self::new(cfg.base_url.clone());
        for (key, value) in &cfg.headers {
            http = http.header(key.clone(), value.clone());
        }
        if let Some(t) = cfg.request_timeout() {
            http = http.timeout(t);
        }
        http
    }

    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        let map = self.headers.get_or_insert_with(HashMap::new);
        map.insert(key.into(), value.into());
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Builds a fresh client with its own connection pool, wrapped in the
    /// exchange logger. Requests are attempted exactly once.
    pub fn build_client(&self) -> Result<ClientWithMiddleware> {
        let mut headers = HeaderMap::new();
        if let Some(header_map) = &self.headers {
            for (key, value) in header_map {
                headers.insert(
                    HeaderName::from_bytes(key.as_bytes())?,
                    HeaderValue::from_str(value)?,
                );
            }
        }

        let mut builder = Client::builder().default_headers(headers);
        if let Some(t) = self.timeout {
            builder = builder.timeout(t);
        }
        let client = builder.build()?;

        Ok(ClientBuilder::new(client)
            .with(logging::ExchangeLogger)
            .build())
    }

    /// Joins `path` onto the base URL, keeping any path prefix the base carries.
    pub fn url_for(&self, path: &str) -> Result<reqwest::Url> {
        let base = self.base_url.trim_end_matches('/');
        let joined = if path.starts_with('/') {
            format!("{base}{path}")
        } else {
            format!("{base}/{path}")
        };
        Ok(reqwest::Url::parse(&joined)?)
    }
}
