use std::time::Duration;

use beertap::errors::{AssertionFailure, BeertapError};

use crate::common;

#[tokio::test]
async fn test_twenty_sequential_requests_under_five_seconds() {
    let service = common::stock_service().await;
    let checker = common::checker_for(&service);

    let report = checker
        .assert_throughput_under_threshold("/beers/ale", 20, Duration::from_millis(5000))
        .await
        .expect("local mock should be fast");
    assert_eq!(report.requests, 20);
    assert!(report.elapsed < report.threshold);
}

#[tokio::test]
async fn test_slow_service_exceeds_threshold() {
    let service = common::slow_service(Duration::from_millis(60)).await;
    let checker = common::checker_for(&service);

    let err = checker
        .assert_throughput_under_threshold("/beers/ale", 5, Duration::from_millis(200))
        .await
        .unwrap_err();
    match err {
        BeertapError::Assertion(AssertionFailure::TooSlow {
            requests,
            elapsed,
            threshold,
        }) => {
            assert_eq!(requests, 5);
            assert!(elapsed >= Duration::from_millis(300));
            assert_eq!(threshold, Duration::from_millis(200));
        }
        other => panic!("unexpected {other:?}"),
    }
}

#[tokio::test]
async fn test_throughput_requires_200_on_every_request() {
    let service = common::stock_service().await;
    let checker = common::checker_for(&service);

    let err = checker
        .assert_throughput_under_threshold("/beers/invalid", 20, Duration::from_millis(5000))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        BeertapError::Assertion(AssertionFailure::UnexpectedStatus { expected: 200, actual: 404, .. })
    ));
}

#[tokio::test]
async fn test_concurrent_requests_overlap() {
    // 8 requests at 100 ms each: serial would take 800 ms
    let service = common::slow_service(Duration::from_millis(100)).await;
    let checker = common::checker_for(&service);

    let report = checker
        .assert_concurrent_throughput_under_threshold(
            "/beers/ale",
            8,
            8,
            Duration::from_millis(700),
        )
        .await
        .expect("parallel requests should beat the serial time");
    assert_eq!(report.requests, 8);

    let err = checker
        .assert_throughput_under_threshold("/beers/ale", 8, Duration::from_millis(700))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        BeertapError::Assertion(AssertionFailure::TooSlow { .. })
    ));
}
