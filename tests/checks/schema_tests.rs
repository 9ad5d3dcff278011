use beertap::errors::{AssertionFailure, BeertapError};
use beertap::model::Beer;

use crate::common;

#[tokio::test]
async fn test_first_item_has_expected_fields() {
    let service = common::stock_service().await;
    let checker = common::checker_for(&service);

    let beer = checker
        .assert_schema_of_first_item("/beers/ale")
        .await
        .expect("first record should be valid");
    assert_eq!(beer, Beer::new(1, "Sample Ale", 15.49));
    assert!(!beer.name.is_empty());
    assert!(beer.price >= 0.0);
    assert!(beer.id > 0);
}

#[tokio::test]
async fn test_first_item_check_ignores_later_records() {
    let service = common::service_with(common::broken_second_record()).await;
    let checker = common::checker_for(&service);

    checker
        .assert_schema_of_first_item("/beers/ale")
        .await
        .expect("only index 0 is sampled");
}

#[tokio::test]
async fn test_all_items_check_names_index_and_field() {
    let service = common::service_with(common::broken_second_record()).await;
    let checker = common::checker_for(&service);

    let err = checker
        .assert_schema_of_all_items("/beers/ale")
        .await
        .unwrap_err();
    match err {
        BeertapError::Assertion(AssertionFailure::Schema {
            index,
            field,
            reason,
        }) => {
            assert_eq!(index, 1);
            assert_eq!(field, "price");
            assert!(reason.contains("expected a number"), "{reason}");
        }
        other => panic!("unexpected {other:?}"),
    }
}

#[tokio::test]
async fn test_all_items_pass_on_stock_catalog() {
    let service = common::stock_service().await;
    let checker = common::checker_for(&service);

    let beers = checker
        .assert_schema_of_all_items("/beers/ale")
        .await
        .expect("stock records are valid");
    assert_eq!(beers.len(), 2);
    assert_eq!(beers[1].name, "Golden Lager");
}

#[tokio::test]
async fn test_schema_check_on_unknown_category_is_a_status_failure() {
    let service = common::stock_service().await;
    let checker = common::checker_for(&service);

    let err = checker
        .assert_schema_of_first_item("/beers/invalid")
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        BeertapError::Assertion(AssertionFailure::UnexpectedStatus { actual: 404, .. })
    ));
}
