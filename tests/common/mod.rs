#![allow(dead_code)]

use std::time::Duration;

use beertap::checks::ApiChecker;
use beertap::config::SuiteConfig;
use beertap::http::Http;
use beertap::mock::{default_catalog, BeerCatalog, MockBeerService};
use beertap::model::Beer;
use serde_json::json;

pub async fn stock_service() -> MockBeerService {
    MockBeerService::start(default_catalog())
        .await
        .expect("mock service should start")
}

pub async fn service_with(catalog: BeerCatalog) -> MockBeerService {
    MockBeerService::start(catalog)
        .await
        .expect("mock service should start")
}

pub async fn slow_service(delay: Duration) -> MockBeerService {
    MockBeerService::start_with_delay(default_catalog(), delay)
        .await
        .expect("mock service should start")
}

pub fn checker_for(service: &MockBeerService) -> ApiChecker {
    ApiChecker::new(Http::new(service.base_url())).expect("checker should build")
}

pub fn config_for(service: &MockBeerService) -> SuiteConfig {
    SuiteConfig {
        base_url: service.base_url(),
        ..SuiteConfig::default()
    }
}

/// A catalog whose `ale` listing breaks the record schema at index 1.
pub fn broken_second_record() -> BeerCatalog {
    BeerCatalog::empty().with_raw(
        "ale",
        vec![
            json!({"id": 1, "name": "Sample Ale", "price": 15.49}),
            json!({"id": 2, "name": "Golden Lager", "price": "$12.99"}),
        ],
    )
}

pub fn lager_catalog() -> BeerCatalog {
    default_catalog().with_beers("lager", vec![Beer::new(10, "Pilsner", 9.5)])
}

/// A base URL nothing listens on.
pub async fn dead_base_url() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind probe port");
    let addr = listener.local_addr().expect("probe addr");
    drop(listener);
    format!("http://{addr}")
}
