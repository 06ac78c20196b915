//! Set allocation against a real database
//!
//! The fixture has three sets; with the production seed they are walked in
//! the order 1, 0, 2.

mod common;

use std::sync::Arc;

use tsa_web::allocation::{allocate, resume, SetOrder, MAX_ANNOTATORS_PER_SET, ORDER_SEED};
use tsa_web::db::AnnotationStore;
use tsa_web::error::AppError;

fn fixture_order() -> SetOrder {
    SetOrder::compute(3, ORDER_SEED)
}

#[tokio::test]
async fn test_fixture_walk_order() {
    let (_dir, pool) = common::seeded_store().await;
    let store = AnnotationStore::new(pool);

    let total = store.count_sets().await.unwrap();
    assert_eq!(SetOrder::compute(total, ORDER_SEED).as_slice(), &[1, 0, 2]);
}

#[tokio::test]
async fn test_resume_walks_forward_and_runs_out() {
    let (_dir, pool) = common::seeded_store().await;
    let store = AnnotationStore::new(pool);
    let order = fixture_order();

    assert_eq!(resume(&order, &store, "alice").await.unwrap(), 1);
    assert_eq!(resume(&order, &store, "alice").await.unwrap(), 0);
    assert_eq!(resume(&order, &store, "alice").await.unwrap(), 2);
    assert!(matches!(
        resume(&order, &store, "alice").await,
        Err(AppError::OutOfWork)
    ));

    let mut held = store.sets_of("alice").await.unwrap();
    held.sort_unstable();
    assert_eq!(held, vec![0, 1, 2]);
}

#[tokio::test]
async fn test_full_sets_are_skipped() {
    let (_dir, pool) = common::seeded_store().await;
    common::fill_set(&pool, 1, 3).await;
    common::fill_set(&pool, 0, 2).await;
    let store = AnnotationStore::new(pool.clone());
    let order = fixture_order();

    assert_eq!(resume(&order, &store, "bob").await.unwrap(), 0);
    assert_eq!(common::assignment_count(&pool, 0).await, 3);
    // Set 0 is now full for everyone else
    assert_eq!(resume(&order, &store, "carol").await.unwrap(), 2);
}

#[tokio::test]
async fn test_allocate_after_unknown_set_is_not_found() {
    let (_dir, pool) = common::seeded_store().await;
    let store = AnnotationStore::new(pool);

    assert!(matches!(
        allocate(&fixture_order(), &store, Some(77), "alice").await,
        Err(AppError::NotFound(_))
    ));
}

#[tokio::test]
async fn test_empty_store_is_out_of_work() {
    let (_dir, pool) = common::empty_store().await;
    let store = AnnotationStore::new(pool);
    let order = SetOrder::compute(store.count_sets().await.unwrap(), ORDER_SEED);

    assert!(order.is_empty());
    assert!(matches!(
        resume(&order, &store, "alice").await,
        Err(AppError::OutOfWork)
    ));
}

#[tokio::test]
async fn test_concurrent_allocation_respects_cap() {
    let (_dir, pool) = common::seeded_store().await;
    let store = AnnotationStore::new(pool.clone());
    let order = Arc::new(fixture_order());

    let mut handles = Vec::new();
    for i in 0..16 {
        let store = store.clone();
        let order = Arc::clone(&order);
        handles.push(tokio::spawn(async move {
            allocate(&order, &store, None, &format!("annotator-{}", i)).await
        }));
    }

    let mut assigned = 0;
    let mut exhausted = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(_) => assigned += 1,
            Err(AppError::OutOfWork) => exhausted += 1,
            Err(e) => panic!("unexpected allocation error: {}", e),
        }
    }

    assert_eq!(assigned, 9);
    assert_eq!(exhausted, 7);
    for set in [0, 1, 2] {
        assert_eq!(
            common::assignment_count(&pool, set).await,
            MAX_ANNOTATORS_PER_SET
        );
    }
}
