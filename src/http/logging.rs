use std::time::Instant;

use http::Extensions;
use reqwest::{Request, Response};
use reqwest_middleware::{Middleware, Next, Result as MwResult};
use tracing::{debug, warn};

/// Logs every request/response pair with its latency.
pub struct ExchangeLogger;

#[async_trait::async_trait]
impl Middleware for ExchangeLogger {
    async fn handle(
        &self,
        req: Request,
        extensions: &mut Extensions,
        next: Next<'_>,
    ) -> MwResult<Response> {
        let method = req.method().clone();
        let url = req.url().clone();
        let t0 = Instant::now();
        debug!("→ {method} {url}");

        let res = next.run(req, extensions).await;

        match &res {
            Ok(resp) => debug!(
                status = resp.status().as_u16(),
                elapsed_ms = t0.elapsed().as_millis() as u64,
                "← {method} {url}"
            ),
            Err(err) => warn!(
                elapsed_ms = t0.elapsed().as_millis() as u64,
                "✖ {method} {url} failed: {err}"
            ),
        }
        res
    }
}
