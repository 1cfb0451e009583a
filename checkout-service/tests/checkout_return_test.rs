//! Checkout return workflow tests.
//!
//! Drives the real router against a fake provider and a recording store,
//! one test per observable contract of the return redirect.

mod common;

use axum::http::StatusCode;
use common::{get, paid_metadata, test_app, FakeProvider, ProviderBehavior, RecordingStore};
use rust_decimal::Decimal;

#[tokio::test]
async fn cancel_produces_cancelled_outcome_without_side_effects() {
    let provider = FakeProvider::new(ProviderBehavior::Paid(paid_metadata()));
    let store = RecordingStore::new();
    let app = test_app(provider.clone(), store.clone());

    let (status, body) = get(&app, "/checkout/return?status=cancel&session_id=cs_1").await;

    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("diner://checkout/cancel"));
    assert!(body.contains("Checkout cancelled"));

    assert_eq!(provider.call_count(), 0);
    assert_eq!(store.write_count(), 0);
}

#[tokio::test]
async fn paid_session_materializes_order_and_items() {
    let provider = FakeProvider::new(ProviderBehavior::Paid(paid_metadata()));
    let store = RecordingStore::new();
    let app = test_app(provider.clone(), store.clone());

    let (status, body) = get(&app, "/checkout/return?status=success&session_id=cs_1").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(provider.call_count(), 1);

    // Exactly one order, subtotal 10.00 * 2 = 20.00.
    let orders = store.orders.lock().unwrap();
    assert_eq!(orders.len(), 1);
    assert_eq!(orders[0].restaurant_id, 42);
    assert_eq!(orders[0].subtotal, Decimal::new(2000, 2));

    // One item batch of length 1.
    let batches = store.item_batches.lock().unwrap();
    assert_eq!(batches.len(), 1);
    assert_eq!(batches[0].1.len(), 1);
    assert_eq!(batches[0].1[0].quantity, 2);

    // The outcome page deep-links to the confirmation with the new order id
    // and the formatted total.
    let order_id = store.created_order_ids.lock().unwrap()[0];
    assert!(body.contains("diner://order/confirmation?"));
    assert!(body.contains(&format!("order_id={}", order_id)));
    assert!(body.contains("total=20.00"));
    assert!(body.contains("restaurant=Spice+Garden"));
}

#[tokio::test]
async fn unpaid_session_short_circuits_before_any_write() {
    let provider = FakeProvider::new(ProviderBehavior::Unpaid);
    let store = RecordingStore::new();
    let app = test_app(provider.clone(), store.clone());

    let (status, body) = get(&app, "/checkout/return?status=success&session_id=cs_1").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(provider.call_count(), 1);
    assert_eq!(store.write_count(), 0);
    assert!(body.contains("reason=payment_incomplete"));
    assert!(body.contains("Payment not completed"));
}

#[tokio::test]
async fn malformed_cart_defaults_to_success_without_order() {
    let mut metadata = paid_metadata();
    metadata.insert("cart".to_string(), "{definitely not json".to_string());
    let provider = FakeProvider::new(ProviderBehavior::Paid(metadata));
    let store = RecordingStore::new();
    let app = test_app(provider.clone(), store.clone());

    let (status, body) = get(&app, "/checkout/return?status=success&session_id=cs_1").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(store.write_count(), 0);

    // Still a Success-shaped outcome: payment happened, just nothing to
    // materialize.
    assert!(body.contains("Payment successful"));
    assert!(body.contains("total=0.00"));
    assert!(!body.contains("order_id="));
}

#[tokio::test]
async fn party_reference_submits_session_and_snapshots_group_order() {
    let mut metadata = paid_metadata();
    metadata.insert("party_session_id".to_string(), "party_9".to_string());
    let provider = FakeProvider::new(ProviderBehavior::Paid(metadata));
    let store = RecordingStore::new();
    let app = test_app(provider.clone(), store.clone());

    let (_, body) = get(&app, "/checkout/return?status=success&session_id=cs_1").await;

    let submitted = store.submitted_sessions.lock().unwrap();
    assert_eq!(submitted.len(), 1);
    assert_eq!(submitted[0].0, "party_9");

    let summaries = store.summaries.lock().unwrap();
    assert_eq!(summaries.len(), 1);
    assert_eq!(summaries[0].party_session_id, "party_9");
    assert_eq!(summaries[0].total, Decimal::new(2000, 2));
    assert_eq!(summaries[0].items.len(), 1);
    assert_eq!(summaries[0].items[0].contributor, "Asha");

    assert!(body.contains("party_session_id=party_9"));
}

#[tokio::test]
async fn party_writes_proceed_when_order_creation_fails() {
    let mut metadata = paid_metadata();
    metadata.insert("party_session_id".to_string(), "party_9".to_string());
    let provider = FakeProvider::new(ProviderBehavior::Paid(metadata));
    let store = RecordingStore::failing_order_create();
    let app = test_app(provider.clone(), store.clone());

    let (status, body) = get(&app, "/checkout/return?status=success&session_id=cs_1").await;

    // Degraded success: no order id, but the party session still closed
    // out and the snapshot still landed.
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("Payment successful"));
    assert!(!body.contains("order_id="));

    assert_eq!(store.submitted_sessions.lock().unwrap().len(), 1);
    let summaries = store.summaries.lock().unwrap();
    assert_eq!(summaries.len(), 1);
    assert_eq!(summaries[0].total, Decimal::new(2000, 2));
}

/// Reloading the success page re-materializes: two orders, two snapshots.
/// Known limitation of the at-least-attempted policy; there is no
/// session-id dedup, deliberately.
#[tokio::test]
async fn reload_of_same_session_materializes_twice() {
    let mut metadata = paid_metadata();
    metadata.insert("party_session_id".to_string(), "party_9".to_string());
    let provider = FakeProvider::new(ProviderBehavior::Paid(metadata));
    let store = RecordingStore::new();
    let app = test_app(provider.clone(), store.clone());

    get(&app, "/checkout/return?status=success&session_id=cs_1").await;
    get(&app, "/checkout/return?status=success&session_id=cs_1").await;

    assert_eq!(provider.call_count(), 2);
    assert_eq!(store.orders.lock().unwrap().len(), 2);
    assert_eq!(store.summaries.lock().unwrap().len(), 2);
}

#[tokio::test]
async fn missing_status_redirects_without_side_effects() {
    let provider = FakeProvider::new(ProviderBehavior::Paid(paid_metadata()));
    let store = RecordingStore::new();
    let app = test_app(provider.clone(), store.clone());

    let (status, body) = get(&app, "/checkout/return").await;

    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("diner://checkout/cancel"));
    assert_eq!(provider.call_count(), 0);
    assert_eq!(store.write_count(), 0);
}

#[tokio::test]
async fn unrecognized_status_redirects_without_side_effects() {
    let provider = FakeProvider::new(ProviderBehavior::Paid(paid_metadata()));
    let store = RecordingStore::new();
    let app = test_app(provider.clone(), store.clone());

    let (_, body) = get(&app, "/checkout/return?status=definitely_not_a_status").await;

    assert!(body.contains("diner://checkout/cancel"));
    assert_eq!(provider.call_count(), 0);
    assert_eq!(store.write_count(), 0);
}

#[tokio::test]
async fn success_without_session_id_redirects_without_side_effects() {
    let provider = FakeProvider::new(ProviderBehavior::Paid(paid_metadata()));
    let store = RecordingStore::new();
    let app = test_app(provider.clone(), store.clone());

    let (_, body) = get(&app, "/checkout/return?status=success").await;

    assert!(body.contains("diner://checkout/cancel"));
    assert_eq!(provider.call_count(), 0);
    assert_eq!(store.write_count(), 0);
}

#[tokio::test]
async fn provider_failure_maps_to_error_outcome() {
    let provider = FakeProvider::new(ProviderBehavior::Unavailable);
    let store = RecordingStore::new();
    let app = test_app(provider.clone(), store.clone());

    let (status, body) = get(&app, "/checkout/return?status=success&session_id=cs_1").await;

    // Still a clean page, never a bare 5xx.
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("reason=provider_unavailable"));
    assert!(body.contains("Something went wrong"));
    assert_eq!(store.write_count(), 0);
}

#[tokio::test]
async fn health_endpoint_reports_ok() {
    let provider = FakeProvider::new(ProviderBehavior::Unpaid);
    let store = RecordingStore::new();
    let app = test_app(provider, store);

    let (status, body) = get(&app, "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("checkout-service"));

    let (status, _) = get(&app, "/ready").await;
    assert_eq!(status, StatusCode::OK);
}
