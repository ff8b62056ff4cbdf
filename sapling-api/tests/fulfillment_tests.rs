//! Fulfillment workflow integration tests against the in-memory store.
//!
//! Covers the full create -> approve -> delivery note path, including
//! the insufficient-stock skip policy and the one-way status
//! transition.

use sapling_api::error::ErrorCode;
use sapling_api::services;
use sapling_api::types::{CreateFulfillmentRequest, RequestItemInput};
use sapling_core::RequestStatus;
use sapling_test_utils::{sample_date, InMemoryStore};

fn request_input(
    partner_id: i64,
    items: Vec<(i64, i64)>,
) -> CreateFulfillmentRequest {
    CreateFulfillmentRequest {
        partner_id,
        request_date: sample_date(),
        items: items
            .into_iter()
            .map(|(seedling_id, quantity)| RequestItemInput {
                seedling_id,
                quantity,
            })
            .collect(),
        note: None,
    }
}

#[tokio::test]
async fn create_persists_one_request_and_one_row_per_item() {
    let store = InMemoryStore::new();
    let partner = store.add_partner("Highland reforestation");
    let a = store.add_seedling("Afzelia xylocarpa", 100);
    let b = store.add_seedling("Dipterocarpus alatus", 50);
    let c = store.add_seedling("Shorea obtusa", 20);

    let detail = services::create_request(
        &store,
        &request_input(partner.id, vec![(a.id, 10), (b.id, 5), (c.id, 1)]),
    )
    .await
    .unwrap();

    assert_eq!(detail.request.status, RequestStatus::Pending);
    assert_eq!(detail.items.len(), 3);
    assert_eq!(store.items_for(detail.request.id).len(), 3);
    // Creation never touches stock.
    assert_eq!(store.stock(a.id), Some(100));
}

#[tokio::test]
async fn create_rejects_empty_items() {
    let store = InMemoryStore::new();
    let partner = store.add_partner("Highland reforestation");

    let err = services::create_request(&store, &request_input(partner.id, vec![]))
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::MissingField);
}

#[tokio::test]
async fn create_rejects_zero_quantity() {
    let store = InMemoryStore::new();
    let partner = store.add_partner("Highland reforestation");
    let seedling = store.add_seedling("Afzelia xylocarpa", 10);

    let err = services::create_request(&store, &request_input(partner.id, vec![(seedling.id, 0)]))
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::InvalidRange);
}

#[tokio::test]
async fn create_rejects_unknown_partner_and_seedling() {
    let store = InMemoryStore::new();
    let partner = store.add_partner("Highland reforestation");
    let seedling = store.add_seedling("Afzelia xylocarpa", 10);

    let err = services::create_request(&store, &request_input(9999, vec![(seedling.id, 1)]))
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::PartnerNotFound);

    let err = services::create_request(&store, &request_input(partner.id, vec![(9999, 1)]))
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::SeedlingNotFound);
}

#[tokio::test]
async fn approve_decrements_stock_and_marks_approved() {
    let store = InMemoryStore::new();
    let partner = store.add_partner("Highland reforestation");
    let seedling = store.add_seedling("Afzelia xylocarpa", 5);

    let detail = services::create_request(&store, &request_input(partner.id, vec![(seedling.id, 3)]))
        .await
        .unwrap();
    assert_eq!(store.stock(seedling.id), Some(5));

    let outcome = services::approve_request(&store, detail.request.id)
        .await
        .unwrap();

    assert_eq!(outcome.request.status, RequestStatus::Approved);
    assert_eq!(outcome.fulfilled, vec![seedling.id]);
    assert!(outcome.skipped.is_empty());
    assert_eq!(store.stock(seedling.id), Some(2));
}

#[tokio::test]
async fn approve_skips_insufficient_stock_but_still_approves() {
    let store = InMemoryStore::new();
    let partner = store.add_partner("Highland reforestation");
    let short = store.add_seedling("Afzelia xylocarpa", 2);
    let plenty = store.add_seedling("Dipterocarpus alatus", 10);

    let detail = services::create_request(
        &store,
        &request_input(partner.id, vec![(short.id, 5), (plenty.id, 4)]),
    )
    .await
    .unwrap();

    let outcome = services::approve_request(&store, detail.request.id)
        .await
        .unwrap();

    // The short line is skipped and reported; the other is fulfilled.
    assert_eq!(outcome.request.status, RequestStatus::Approved);
    assert_eq!(outcome.fulfilled, vec![plenty.id]);
    assert_eq!(outcome.skipped.len(), 1);
    assert_eq!(outcome.skipped[0].seedling_id, short.id);
    assert_eq!(outcome.skipped[0].requested, 5);

    // Skipped stock is untouched, never driven negative.
    assert_eq!(store.stock(short.id), Some(2));
    assert_eq!(store.stock(plenty.id), Some(6));
}

#[tokio::test]
async fn approve_exact_stock_drains_to_zero() {
    let store = InMemoryStore::new();
    let partner = store.add_partner("Highland reforestation");
    let seedling = store.add_seedling("Afzelia xylocarpa", 4);

    let detail = services::create_request(&store, &request_input(partner.id, vec![(seedling.id, 4)]))
        .await
        .unwrap();
    let outcome = services::approve_request(&store, detail.request.id)
        .await
        .unwrap();

    assert!(outcome.skipped.is_empty());
    assert_eq!(store.stock(seedling.id), Some(0));
}

#[tokio::test]
async fn approve_is_one_way() {
    let store = InMemoryStore::new();
    let partner = store.add_partner("Highland reforestation");
    let seedling = store.add_seedling("Afzelia xylocarpa", 10);

    let detail = services::create_request(&store, &request_input(partner.id, vec![(seedling.id, 2)]))
        .await
        .unwrap();
    services::approve_request(&store, detail.request.id)
        .await
        .unwrap();

    // A second approval must not decrement again.
    let err = services::approve_request(&store, detail.request.id)
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::StateConflict);
    assert_eq!(store.stock(seedling.id), Some(8));
}

#[tokio::test]
async fn approve_missing_request_is_not_found() {
    let store = InMemoryStore::new();
    let err = services::approve_request(&store, 42).await.unwrap_err();
    assert_eq!(err.code, ErrorCode::RequestNotFound);
}

#[tokio::test]
async fn delivery_note_requires_approval() {
    let store = InMemoryStore::new();
    let partner = store.add_partner("Highland reforestation");
    let seedling = store.add_seedling("Afzelia xylocarpa", 10);

    let detail = services::create_request(&store, &request_input(partner.id, vec![(seedling.id, 2)]))
        .await
        .unwrap();

    let err = services::delivery_note(&store, detail.request.id)
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::StateConflict);
}

#[tokio::test]
async fn delivery_note_joins_items_to_species() {
    let store = InMemoryStore::new();
    let partner = store.add_partner("Highland reforestation");
    let a = store.add_seedling("Afzelia xylocarpa", 10);
    let b = store.add_seedling("Dipterocarpus alatus", 10);

    let detail = services::create_request(
        &store,
        &request_input(partner.id, vec![(a.id, 2), (b.id, 3)]),
    )
    .await
    .unwrap();
    services::approve_request(&store, detail.request.id)
        .await
        .unwrap();

    let note = services::delivery_note(&store, detail.request.id)
        .await
        .unwrap();

    assert_eq!(note.partner_name, "Highland reforestation");
    assert_eq!(note.lines.len(), 2);
    assert_eq!(note.lines[0].species, "Afzelia xylocarpa");
    assert_eq!(note.lines[0].quantity, 2);
    assert_eq!(note.lines[1].species, "Dipterocarpus alatus");
    assert_eq!(note.lines[1].quantity, 3);

    let rendered = note.render();
    assert!(rendered.contains("Highland reforestation"));
    assert!(rendered.contains("Afzelia xylocarpa"));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_approvals_never_drive_stock_negative() {
    use std::sync::Arc;

    let store = Arc::new(InMemoryStore::new());
    let partner = store.add_partner("Highland reforestation");
    let seedling = store.add_seedling("Afzelia xylocarpa", 10);

    // Four pending requests of 4 against 10 units of stock: only two
    // can be fulfilled no matter how the approvals interleave.
    let mut ids = Vec::new();
    for _ in 0..4 {
        let detail = services::create_request(
            store.as_ref(),
            &request_input(partner.id, vec![(seedling.id, 4)]),
        )
        .await
        .unwrap();
        ids.push(detail.request.id);
    }

    let mut handles = Vec::new();
    for id in ids {
        let store = store.clone();
        handles.push(tokio::spawn(async move {
            services::approve_request(store.as_ref(), id).await
        }));
    }

    let mut outcomes = Vec::new();
    for handle in handles {
        outcomes.push(handle.await.unwrap().unwrap());
    }

    // Each request's single line lands in exactly one bucket.
    for outcome in &outcomes {
        assert_eq!(outcome.request.status, RequestStatus::Approved);
        assert_eq!(outcome.fulfilled.len() + outcome.skipped.len(), 1);
    }

    let fulfilled: usize = outcomes.iter().map(|o| o.fulfilled.len()).sum();
    let skipped: usize = outcomes.iter().map(|o| o.skipped.len()).sum();
    assert_eq!(fulfilled, 2);
    assert_eq!(skipped, 2);

    let stock = store.stock(seedling.id).unwrap();
    assert!(stock >= 0);
    assert_eq!(stock, 10 - 4 * fulfilled as i64);
}

#[tokio::test]
async fn quantities_accumulate_across_requests() {
    let store = InMemoryStore::new();
    let partner = store.add_partner("Highland reforestation");
    let seedling = store.add_seedling("Afzelia xylocarpa", 10);

    for _ in 0..3 {
        let detail =
            services::create_request(&store, &request_input(partner.id, vec![(seedling.id, 3)]))
                .await
                .unwrap();
        services::approve_request(&store, detail.request.id)
            .await
            .unwrap();
    }

    // Fourth round exceeds the remaining single unit and is skipped.
    let detail =
        services::create_request(&store, &request_input(partner.id, vec![(seedling.id, 3)]))
            .await
            .unwrap();
    let outcome = services::approve_request(&store, detail.request.id)
        .await
        .unwrap();

    assert_eq!(outcome.skipped.len(), 1);
    assert_eq!(store.stock(seedling.id), Some(1));
}
