use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde_json::Value;
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::errors::Result;
use crate::model::{Beer, ErrorBody, HealthStatus};

/// Category name -> records served for `GET /beers/{category}`.
///
/// Records are raw JSON so tests can serve payloads that break the schema.
#[derive(Debug, Clone, Default)]
pub struct BeerCatalog {
    categories: HashMap<String, Vec<Value>>,
}

impl BeerCatalog {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn with_beers(mut self, category: impl Into<String>, beers: Vec<Beer>) -> Self {
        let records = beers.iter().map(Beer::to_json).collect();
        self.categories.insert(category.into(), records);
        self
    }

    pub fn with_raw(mut self, category: impl Into<String>, records: Vec<Value>) -> Self {
        self.categories.insert(category.into(), records);
        self
    }

    pub fn get(&self, category: &str) -> Option<&Vec<Value>> {
        self.categories.get(category)
    }
}

/// `ale` with the two stock records.
pub fn default_catalog() -> BeerCatalog {
    BeerCatalog::empty().with_beers(
        "ale",
        vec![
            Beer::new(1, "Sample Ale", 15.49),
            Beer::new(2, "Golden Lager", 12.99),
        ],
    )
}

#[derive(Clone)]
struct MockState {
    catalog: Arc<BeerCatalog>,
    delay: Duration,
}

pub fn router(catalog: BeerCatalog, delay: Duration) -> Router {
    let state = MockState {
        catalog: Arc::new(catalog),
        delay,
    };
    Router::new()
        .route("/health", get(health))
        .route("/beers/{category}", get(list_beers).post(reject_post))
        .with_state(state)
}

async fn health() -> Json<HealthStatus> {
    Json(HealthStatus {
        status: "ok".to_string(),
    })
}

async fn list_beers(State(state): State<MockState>, Path(category): Path<String>) -> Response {
    if !state.delay.is_zero() {
        tokio::time::sleep(state.delay).await;
    }
    match state.catalog.get(&category) {
        Some(records) => (StatusCode::OK, Json(records.clone())).into_response(),
        None => {
            debug!(%category, "unknown category");
            error_response(StatusCode::NOT_FOUND, "Not Found")
        }
    }
}

async fn reject_post(Path(category): Path<String>) -> Response {
    debug!(%category, "rejecting POST");
    error_response(StatusCode::METHOD_NOT_ALLOWED, "Method Not Allowed")
}

fn error_response(status: StatusCode, msg: &str) -> Response {
    (
        status,
        Json(ErrorBody {
            error: msg.to_string(),
        }),
    )
        .into_response()
}

/// Handle to a mock service running on a background task. Dropping it shuts
/// the server down.
pub struct MockBeerService {
    addr: SocketAddr,
    shutdown: Option<oneshot::Sender<()>>,
    join: Option<JoinHandle<()>>,
}

impl MockBeerService {
    /// Binds an ephemeral localhost port.
    pub async fn start(catalog: BeerCatalog) -> Result<Self> {
        Self::start_with_delay(catalog, Duration::ZERO).await
    }

    /// Like [`MockBeerService::start`], with every listing delayed by `delay`.
    pub async fn start_with_delay(catalog: BeerCatalog, delay: Duration) -> Result<Self> {
        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        let app = router(catalog, delay);
        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();

        let join = tokio::spawn(async move {
            let server = axum::serve(listener, app).with_graceful_shutdown(async move {
                let _ = shutdown_rx.await;
            });
            if let Err(err) = server.await {
                tracing::error!(%err, "mock beer service stopped");
            }
        });
        debug!(%addr, "mock beer service started");

        Ok(Self {
            addr,
            shutdown: Some(shutdown_tx),
            join: Some(join),
        })
    }

    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub async fn shutdown(mut self) {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }
        if let Some(join) = self.join.take() {
            let _ = join.await;
        }
    }
}

impl Drop for MockBeerService {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }
    }
}

/// Serves `catalog` on `addr` until Ctrl-C.
pub async fn serve(addr: SocketAddr, catalog: BeerCatalog) -> Result<()> {
    let listener = TcpListener::bind(addr).await?;
    info!(addr = %listener.local_addr()?, "mock beer service listening");
    axum::serve(listener, router(catalog, Duration::ZERO))
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            info!("shutting down");
        })
        .await?;
    Ok(())
}
