//! Request/assert operations against the beers service.
//!
//! Each operation sends its request(s) once, never retries, and turns any
//! mismatch into an [`AssertionFailure`]. Transport errors pass through as
//! [`BeertapError::Reqwest`] / [`BeertapError::Middleware`].

use std::time::{Duration, Instant};

use futures::stream::{self, StreamExt};
use reqwest::{Method, StatusCode};
use reqwest_middleware::ClientWithMiddleware;
use serde_json::Value;
use tracing::{debug, info, instrument};

use crate::config::SuiteConfig;
use crate::errors::{AssertionFailure, BeertapError, Result};
use crate::http::Http;
use crate::model::{Beer, HealthStatus};

pub mod schema;

/// Timing of a batch of requests that stayed under its threshold.
#[derive(Debug, Clone, PartialEq)]
pub struct ThroughputReport {
    pub requests: usize,
    pub elapsed: Duration,
    pub threshold: Duration,
}

pub struct ApiChecker {
    http: Http,
    client: ClientWithMiddleware,
}

impl ApiChecker {
    pub fn new(http: Http) -> Result<Self> {
        let client = http.build_client()?;
        Ok(Self { http, client })
    }

    pub fn from_config(cfg: &SuiteConfig) -> Result<Self> {
        Self::new(Http::from_config(cfg))
    }

    /// GET `path` and require `expected`; a 200 must also carry a non-empty array.
    #[instrument(skip(self))]
    pub async fn assert_list_endpoint(&self, path: &str, expected: StatusCode) -> Result<usize> {
        let (status, url, body) = self.send(Method::GET, path).await?;
        expect_status(&Method::GET, &url, expected, status)?;
        if expected != StatusCode::OK {
            return Ok(0);
        }
        let items = non_empty_array(&url, body)?;
        info!(items = items.len(), "list endpoint ok");
        Ok(items.len())
    }

    #[instrument(skip(self))]
    pub async fn assert_invalid_endpoint_returns_404(&self, path: &str) -> Result<()> {
        let (status, url, _) = self.send(Method::GET, path).await?;
        expect_status(&Method::GET, &url, StatusCode::NOT_FOUND, status)?;
        Ok(())
    }

    #[instrument(skip(self))]
    pub async fn assert_schema_of_first_item(&self, path: &str) -> Result<Beer> {
        let items = self.fetch_items(path).await?;
        let beer = schema::validate_item(0, &items[0])?;
        debug!(id = beer.id, name = %beer.name, price = beer.price, "first item ok");
        Ok(beer)
    }

    #[instrument(skip(self))]
    pub async fn assert_schema_of_all_items(&self, path: &str) -> Result<Vec<Beer>> {
        let items = self.fetch_items(path).await?;
        let beers = schema::validate_all(&items)?;
        debug!(items = beers.len(), "all items ok");
        Ok(beers)
    }

    /// POST to a GET-only endpoint and require 405.
    #[instrument(skip(self))]
    pub async fn assert_wrong_method_rejected(&self, path: &str) -> Result<()> {
        let (status, url, _) = self.send(Method::POST, path).await?;
        expect_status(&Method::POST, &url, StatusCode::METHOD_NOT_ALLOWED, status)?;
        Ok(())
    }

    /// `request_count` GETs issued one after another; every one must be 200
    /// and the whole run must finish strictly under `threshold`.
    #[instrument(skip(self))]
    pub async fn assert_throughput_under_threshold(
        &self,
        path: &str,
        request_count: usize,
        threshold: Duration,
    ) -> Result<ThroughputReport> {
        let t0 = Instant::now();
        for i in 0..request_count {
            let (status, url, _) = self.send(Method::GET, path).await?;
            expect_status(&Method::GET, &url, StatusCode::OK, status).inspect_err(|_| {
                debug!(request = i + 1, "throughput request failed");
            })?;
        }
        within_threshold(request_count, t0.elapsed(), threshold)
    }

    /// Same budget as the sequential check, with at most `concurrency`
    /// requests in flight.
    #[instrument(skip(self))]
    pub async fn assert_concurrent_throughput_under_threshold(
        &self,
        path: &str,
        request_count: usize,
        concurrency: usize,
        threshold: Duration,
    ) -> Result<ThroughputReport> {
        let t0 = Instant::now();
        let mut responses = stream::iter(0..request_count)
            .map(|_| self.send(Method::GET, path))
            .buffer_unordered(concurrency.max(1));

        while let Some(res) = responses.next().await {
            let (status, url, _) = res?;
            expect_status(&Method::GET, &url, StatusCode::OK, status)?;
        }
        within_threshold(request_count, t0.elapsed(), threshold)
    }

    /// GET `path` and require 200 with `{"status": "ok"}`.
    #[instrument(skip(self))]
    pub async fn assert_health(&self, path: &str) -> Result<()> {
        let (status, url, body) = self.send(Method::GET, path).await?;
        expect_status(&Method::GET, &url, StatusCode::OK, status)?;
        match serde_json::from_slice::<HealthStatus>(&body) {
            Ok(h) if h.status == "ok" => Ok(()),
            _ => Err(AssertionFailure::Unhealthy {
                url,
                body: String::from_utf8_lossy(&body).into_owned(),
            }
            .into()),
        }
    }

    async fn fetch_items(&self, path: &str) -> Result<Vec<Value>> {
        let (status, url, body) = self.send(Method::GET, path).await?;
        expect_status(&Method::GET, &url, StatusCode::OK, status)?;
        non_empty_array(&url, body)
    }

    async fn send(&self, method: Method, path: &str) -> Result<(StatusCode, String, Vec<u8>)> {
        let url = self.http.url_for(path)?;
        let resp = self.client.request(method, url.clone()).send().await?;
        let status = resp.status();
        let body = resp.bytes().await?;
        Ok((status, url.to_string(), body.to_vec()))
    }
}

fn expect_status(method: &Method, url: &str, expected: StatusCode, actual: StatusCode) -> Result<()> {
    if actual == expected {
        return Ok(());
    }
    Err(AssertionFailure::UnexpectedStatus {
        method: method.to_string(),
        url: url.to_string(),
        expected: expected.as_u16(),
        actual: actual.as_u16(),
    }
    .into())
}

fn non_empty_array(url: &str, body: Vec<u8>) -> Result<Vec<Value>> {
    let value: Value =
        serde_json::from_slice(&body).map_err(|e| AssertionFailure::MalformedBody {
            url: url.to_string(),
            reason: e.to_string(),
        })?;
    match value {
        Value::Array(items) if items.is_empty() => Err(AssertionFailure::EmptyBody {
            url: url.to_string(),
        }
        .into()),
        Value::Array(items) => Ok(items),
        other => Err(AssertionFailure::NotAnArray {
            url: url.to_string(),
            found: schema::kind(&other).to_string(),
        }
        .into()),
    }
}

fn within_threshold(requests: usize, elapsed: Duration, threshold: Duration) -> Result<ThroughputReport> {
    if elapsed >= threshold {
        return Err(BeertapError::Assertion(AssertionFailure::TooSlow {
            requests,
            elapsed,
            threshold,
        }));
    }
    info!(
        requests,
        elapsed_ms = elapsed.as_millis() as u64,
        threshold_ms = threshold.as_millis() as u64,
        "throughput within threshold"
    );
    Ok(ThroughputReport {
        requests,
        elapsed,
        threshold,
    })
}
