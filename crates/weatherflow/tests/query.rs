mod common;

use common::approx_eq;
use weatherflow::jobs::{CityResult, JobDocument, JobStore, MemoryJobStore};
use weatherflow::query::{get_progress, get_results, QueryError};

fn reading(city_id: i64) -> CityResult {
    CityResult {
        city_id,
        temperature_celsius: 1.0,
        humidity_percent: 2.0,
    }
}

#[tokio::test]
async fn progress_for_unknown_uid_is_not_found() {
    let store = MemoryJobStore::new();
    let err = get_progress(&store, 555).await.unwrap_err();
    assert!(matches!(err, QueryError::NotFound { uid: 555 }));
    assert_eq!(err.to_string(), "No record with id 555 found in database.");
}

#[tokio::test]
async fn progress_without_expected_count_is_corrupted() {
    let store = MemoryJobStore::new();
    let mut doc = JobDocument::new(707, 3);
    doc.expected_count = None;
    store.insert_document(doc).await;

    let err = get_progress(&store, 707).await.unwrap_err();
    assert!(matches!(
        err,
        QueryError::Corrupted {
            uid: 707,
            field: "expected_count",
            problem: "missing"
        }
    ));
}

#[tokio::test]
async fn progress_with_zero_expected_count_is_corrupted() {
    let store = MemoryJobStore::new();
    store.insert_document(JobDocument::new(3, 0)).await;

    assert!(matches!(
        get_progress(&store, 3).await,
        Err(QueryError::Corrupted { problem: "zero", .. })
    ));
}

#[tokio::test]
async fn progress_is_fraction_of_expected() {
    let store = MemoryJobStore::new();
    store.create(1, 3).await.unwrap();
    assert!(approx_eq(get_progress(&store, 1).await.unwrap(), 0.0));

    store.append_result(1, 3, &reading(10)).await.unwrap();
    let p = get_progress(&store, 1).await.unwrap();
    assert!((p - 100.0 / 3.0).abs() < 1e-9);

    store.append_result(1, 3, &reading(11)).await.unwrap();
    store.append_result(1, 3, &reading(12)).await.unwrap();
    assert!(approx_eq(get_progress(&store, 1).await.unwrap(), 100.0));
}

#[tokio::test]
async fn progress_is_not_clamped_past_one_hundred() {
    let store = MemoryJobStore::new();
    store.create(2, 2).await.unwrap();
    for id in 0..3 {
        store.append_result(2, 2, &reading(id)).await.unwrap();
    }
    assert!(approx_eq(get_progress(&store, 2).await.unwrap(), 150.0));
}

#[tokio::test]
async fn results_for_unknown_uid_is_not_found() {
    let store = MemoryJobStore::new();
    assert!(matches!(
        get_results(&store, 9).await,
        Err(QueryError::NotFound { uid: 9 })
    ));
}

#[tokio::test]
async fn empty_results_are_corrupted() {
    let store = MemoryJobStore::new();
    store.create(4, 2).await.unwrap();

    assert!(matches!(
        get_results(&store, 4).await,
        Err(QueryError::Corrupted {
            field: "results",
            problem: "empty",
            ..
        })
    ));
}

#[tokio::test]
async fn results_are_returned_in_stored_order() {
    let store = MemoryJobStore::new();
    store.append_result(6, 2, &reading(20)).await.unwrap();
    store.append_result(6, 2, &reading(10)).await.unwrap();

    let results = get_results(&store, 6).await.unwrap();
    assert_eq!(results, vec![reading(20), reading(10)]);
}
