//! Integration tests for the data-fetching hooks against the mock backend.

mod common;

use common::TestBackend;
use lib_armenu::ErrorCode;
use lib_armenu::hooks::{FetchState, ItemsQuery, UseCategories, UseItem, UseItems};

// ---------------------------------------------------------------------------
// Test: item detail retries transient failures
// ---------------------------------------------------------------------------

#[tokio::test]
async fn item_hook_recovers_after_transient_failures() {
    let backend = TestBackend::start().await;
    let config = backend.config();
    backend.state.fail_next_item_requests(2);

    let hook = UseItem::new(backend.api().items, 2, config.item_retry.clone());
    let state = hook.fetch().await;

    assert_eq!(state.data().unwrap().item.name, "Adana Kebap");
    assert_eq!(backend.state.item_requests(), 3);
}

#[tokio::test]
async fn item_hook_gives_up_after_max_retries() {
    let backend = TestBackend::start().await;
    let config = backend.config();
    backend.state.fail_next_item_requests(10);

    let hook = UseItem::new(backend.api().items, 2, config.item_retry.clone());
    let state = hook.fetch().await;

    assert_eq!(state.error().unwrap().code(), ErrorCode::ServerError);
    assert!(!state.is_not_found());
    // first attempt plus three retries
    assert_eq!(backend.state.item_requests(), 4);
}

#[tokio::test]
async fn item_hook_does_not_retry_not_found() {
    let backend = TestBackend::start().await;
    let config = backend.config();

    let hook = UseItem::new(backend.api().items, 42, config.item_retry.clone());
    let state = hook.fetch().await;

    assert!(state.is_not_found());
    assert_eq!(backend.state.item_requests(), 1);
}

#[tokio::test]
async fn item_hook_refetches_only_for_a_new_id() {
    let backend = TestBackend::start().await;
    let config = backend.config();
    let hook = UseItem::new(backend.api().items, 1, config.item_retry.clone());

    hook.fetch().await;
    assert_eq!(backend.state.item_requests(), 1);

    hook.set_id(1).await;
    assert_eq!(backend.state.item_requests(), 1);

    let state = hook.set_id(6).await;
    assert_eq!(hook.id(), 6);
    assert_eq!(state.data().unwrap().item.name, "Çoban Salata");
    assert_eq!(backend.state.item_requests(), 2);

    hook.refetch().await;
    assert_eq!(backend.state.item_requests(), 3);
}

// ---------------------------------------------------------------------------
// Test: item list hook, plain and paginated
// ---------------------------------------------------------------------------

#[tokio::test]
async fn items_hook_switches_to_pagination_when_asked() {
    let backend = TestBackend::start().await;
    let hook = UseItems::new(backend.api().items, ItemsQuery::default());

    let all = hook.fetch().await;
    let page = all.data().unwrap();
    assert_eq!(page.items.len(), 6);
    assert!(page.pagination.is_none());

    let query = ItemsQuery {
        category: Some("ANA YEMEK".to_string()),
        limit: Some(1),
        ..Default::default()
    };
    let paged = hook.set_query(query.clone()).await;
    let page = paged.data().unwrap();
    assert_eq!(page.items.len(), 1);
    let pagination = page.pagination.unwrap();
    assert_eq!(pagination.total, 2);
    assert_eq!(pagination.page, 1);
    assert!(pagination.has_next_page);
    assert_eq!(hook.query(), query);

    // Equal query: no new request
    let before = backend.state.item_requests();
    hook.set_query(query).await;
    assert_eq!(backend.state.item_requests(), before);
}

#[tokio::test]
async fn items_hook_publishes_to_subscribers() {
    let backend = TestBackend::start().await;
    let hook = UseItems::new(
        backend.api().items,
        ItemsQuery {
            search: Some("çorba".to_string()),
            ..Default::default()
        },
    );
    let mut rx = hook.subscribe();
    assert_eq!(*rx.borrow(), FetchState::Idle);

    hook.fetch().await;

    assert!(rx.has_changed().unwrap());
    let state = rx.borrow_and_update().clone();
    let ids: Vec<i64> = state.data().unwrap().items.iter().map(|i| i.id).collect();
    assert_eq!(ids, vec![1]);
}

#[tokio::test]
async fn items_hook_keeps_the_error_until_refetch() {
    let backend = TestBackend::start().await;
    backend.state.fail_next_item_requests(1);
    let hook = UseItems::new(backend.api().items, ItemsQuery::default());

    let failed = hook.fetch().await;
    assert_eq!(failed.error().unwrap().code(), ErrorCode::ServerError);
    assert_eq!(hook.state(), failed);

    let recovered = hook.refetch().await;
    assert_eq!(recovered.data().unwrap().items.len(), 6);
}

// ---------------------------------------------------------------------------
// Test: categories hook
// ---------------------------------------------------------------------------

#[tokio::test]
async fn categories_hook_loads_derived_categories() {
    let backend = TestBackend::start().await;
    let hook = UseCategories::new(backend.api().items);

    let state = hook.fetch().await;
    let categories = state.data().unwrap();
    assert_eq!(categories.len(), 5);
    assert_eq!(categories.iter().map(|c| c.count).sum::<usize>(), 6);
}
