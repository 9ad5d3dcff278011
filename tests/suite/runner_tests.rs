use beertap::config::{Load, SuiteConfig};
use beertap::suite::run::{Outcome, SuiteRunner};
use beertap::suite::{Check, Selection, Suite, Tag, TestCase};
use reqwest::StatusCode;

use crate::common;

#[tokio::test]
async fn test_default_suite_passes_against_stock_service() {
    let service = common::stock_service().await;
    let cfg = SuiteConfig {
        health_path: Some("/health".into()),
        load: Some(Load {
            request_count: 20,
            concurrency: 4,
            threshold_ms: 5000,
        }),
        ..common::config_for(&service)
    };

    let suite = Suite::from_config(&cfg);
    let report = SuiteRunner::new(cfg).run(&suite.cases).await;

    assert_eq!(report.results.len(), suite.cases.len());
    assert!(report.is_success(), "{report}");
}

#[tokio::test]
async fn test_failures_are_recorded_and_run_continues() {
    let service = common::service_with(common::broken_second_record()).await;
    let cfg = SuiteConfig {
        categories: vec!["ale".into(), "stout".into()],
        ..common::config_for(&service)
    };

    let suite = Suite::from_config(&cfg);
    let report = SuiteRunner::new(cfg).run(&suite.cases).await;

    // every case ran despite earlier failures
    assert_eq!(report.results.len(), suite.cases.len());

    let failed: Vec<&str> = report.failures().map(|r| r.name.as_str()).collect();
    assert_eq!(
        failed,
        vec![
            "every_beer_item_has_expected_fields/ale",
            "beer_list_returns_200_and_not_empty/stout",
            "beer_item_has_expected_fields/stout",
            "every_beer_item_has_expected_fields/stout",
        ]
    );

    let schema = report
        .results
        .iter()
        .find(|r| r.name == "every_beer_item_has_expected_fields/ale")
        .expect("schema result");
    match &schema.outcome {
        Outcome::Failed(msg) => assert!(msg.contains("item [1] field `price`"), "{msg}"),
        Outcome::Passed => panic!("schema case should fail"),
    }
}

#[tokio::test]
async fn test_unreachable_service_fails_every_case() {
    let cfg = SuiteConfig {
        base_url: common::dead_base_url().await,
        ..SuiteConfig::default()
    };

    let suite = Suite::from_config(&cfg);
    let report = SuiteRunner::new(cfg).run(&suite.cases).await;

    assert_eq!(report.passed(), 0);
    assert_eq!(report.failed(), suite.cases.len());
    assert!(report
        .failures()
        .all(|r| matches!(&r.outcome, Outcome::Failed(msg) if msg.starts_with("HTTP"))));
}

#[tokio::test]
async fn test_selected_cases_run_in_isolation() {
    let service = common::stock_service().await;
    let cfg = common::config_for(&service);

    let suite = Suite::from_config(&cfg);
    let selection = Selection {
        tags: vec![Tag::NegativeCase],
        name_filter: None,
    };
    let mut cases = suite.select(&selection);
    cases.reverse();

    let report = SuiteRunner::new(cfg).run(cases).await;
    assert_eq!(report.results.len(), 2);
    assert!(report.is_success(), "{report}");
    assert_eq!(report.results[0].name, "invalid_endpoint_returns_404");
}

#[tokio::test]
async fn test_slow_service_fails_only_performance() {
    let service = common::slow_service(std::time::Duration::from_millis(30)).await;
    let mut cfg = common::config_for(&service);
    cfg.performance.threshold_ms = 200;

    let suite = Suite::from_config(&cfg);
    let report = SuiteRunner::new(cfg).run(&suite.cases).await;

    let failed: Vec<Tag> = report.failures().map(|r| r.tag).collect();
    assert_eq!(failed, vec![Tag::Performance]);
}

#[tokio::test]
async fn test_list_case_compares_status_strictly() {
    let service = common::stock_service().await;
    let cfg = common::config_for(&service);

    let case = TestCase::new(
        "ale_is_gone",
        Tag::NegativeCase,
        Check::ListEndpoint {
            path: "/beers/ale".into(),
            expected_status: StatusCode::GONE,
        },
    );
    assert_eq!(case.to_string(), "[negative-case] ale_is_gone (GET /beers/ale -> 410)");

    let report = SuiteRunner::new(cfg).run([&case]).await;
    match &report.results[0].outcome {
        Outcome::Failed(msg) => assert!(msg.contains("expected status 410, got 200"), "{msg}"),
        Outcome::Passed => panic!("410 expectation must not pass against a 200 listing"),
    }
}
