//! Common test utilities: a fake provider and a recording store driving
//! the real router in-process.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use anyhow::anyhow;
use async_trait::async_trait;
use axum::body::Body;
use axum::http::Request;
use axum::Router;
use chrono::{DateTime, Utc};
use http_body_util::BodyExt;
use secrecy::Secret;
use service_core::error::AppError;
use tower::ServiceExt;
use uuid::Uuid;

use checkout_service::config::{AppConfig, Config, DatabaseConfig, ServerConfig, StripeConfig};
use checkout_service::models::{CreateGroupOrderSummary, CreateOrder, CreateOrderItem};
use checkout_service::services::{
    CheckoutProvider, CheckoutSession, OrderStore, PaymentStatus, ProviderError,
};
use checkout_service::{build_router, AppState};

/// How the fake provider answers a session lookup.
pub enum ProviderBehavior {
    Paid(HashMap<String, String>),
    Unpaid,
    Unavailable,
}

pub struct FakeProvider {
    pub behavior: ProviderBehavior,
    pub calls: AtomicUsize,
}

impl FakeProvider {
    pub fn new(behavior: ProviderBehavior) -> Arc<Self> {
        Arc::new(Self {
            behavior,
            calls: AtomicUsize::new(0),
        })
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CheckoutProvider for FakeProvider {
    async fn retrieve_session(&self, session_id: &str) -> Result<CheckoutSession, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.behavior {
            ProviderBehavior::Paid(metadata) => Ok(CheckoutSession {
                id: session_id.to_string(),
                payment_status: PaymentStatus::Paid,
                metadata: metadata.clone(),
            }),
            ProviderBehavior::Unpaid => Ok(CheckoutSession {
                id: session_id.to_string(),
                payment_status: PaymentStatus::Unpaid,
                metadata: HashMap::new(),
            }),
            ProviderBehavior::Unavailable => Err(ProviderError::Unavailable(anyhow!(
                "connection refused"
            ))),
        }
    }
}

/// In-memory store that records every write.
#[derive(Default)]
pub struct RecordingStore {
    pub fail_order_create: bool,
    pub orders: Mutex<Vec<CreateOrder>>,
    pub created_order_ids: Mutex<Vec<Uuid>>,
    pub item_batches: Mutex<Vec<(Uuid, Vec<CreateOrderItem>)>>,
    pub submitted_sessions: Mutex<Vec<(String, DateTime<Utc>)>>,
    pub summaries: Mutex<Vec<CreateGroupOrderSummary>>,
}

impl RecordingStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn failing_order_create() -> Arc<Self> {
        Arc::new(Self {
            fail_order_create: true,
            ..Self::default()
        })
    }

    pub fn write_count(&self) -> usize {
        self.orders.lock().unwrap().len()
            + self.item_batches.lock().unwrap().len()
            + self.submitted_sessions.lock().unwrap().len()
            + self.summaries.lock().unwrap().len()
    }
}

#[async_trait]
impl OrderStore for RecordingStore {
    async fn create_order(&self, input: &CreateOrder) -> Result<Uuid, AppError> {
        if self.fail_order_create {
            return Err(AppError::DatabaseError(anyhow!("orders table unavailable")));
        }
        let id = Uuid::new_v4();
        self.orders.lock().unwrap().push(input.clone());
        self.created_order_ids.lock().unwrap().push(id);
        Ok(id)
    }

    async fn create_order_items(
        &self,
        order_id: Uuid,
        items: &[CreateOrderItem],
    ) -> Result<(), AppError> {
        self.item_batches
            .lock()
            .unwrap()
            .push((order_id, items.to_vec()));
        Ok(())
    }

    async fn mark_party_session_submitted(
        &self,
        session_id: &str,
        submitted_utc: DateTime<Utc>,
    ) -> Result<(), AppError> {
        self.submitted_sessions
            .lock()
            .unwrap()
            .push((session_id.to_string(), submitted_utc));
        Ok(())
    }

    async fn create_group_order_summary(
        &self,
        input: &CreateGroupOrderSummary,
    ) -> Result<Uuid, AppError> {
        self.summaries.lock().unwrap().push(input.clone());
        Ok(Uuid::new_v4())
    }

    async fn health_check(&self) -> Result<(), AppError> {
        Ok(())
    }
}

fn test_config() -> Config {
    Config {
        server: ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
        },
        database: DatabaseConfig {
            url: Secret::new("postgres://unused".to_string()),
            max_connections: 1,
            min_connections: 1,
        },
        stripe: StripeConfig {
            secret_key: Secret::new("sk_test_123".to_string()),
            api_base_url: "http://localhost:12111".to_string(),
        },
        app: AppConfig {
            deep_link_scheme: "diner".to_string(),
            redirect_delay_seconds: 3,
        },
        service_name: "checkout-service".to_string(),
    }
}

/// Build the real router around the given fakes.
pub fn test_app(provider: Arc<FakeProvider>, store: Arc<RecordingStore>) -> Router {
    build_router(AppState {
        config: test_config(),
        provider,
        store,
    })
}

/// Issue a GET against the router and return the response body as a string.
pub async fn get(router: &Router, uri: &str) -> (axum::http::StatusCode, String) {
    let response = router
        .clone()
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .expect("request failed");

    let status = response.status();
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("body read failed")
        .to_bytes();
    (status, String::from_utf8(bytes.to_vec()).expect("non-utf8 body"))
}

/// Metadata bag for a typical paid checkout.
pub fn paid_metadata() -> HashMap<String, String> {
    let mut metadata = HashMap::new();
    metadata.insert("restaurant_id".to_string(), "42".to_string());
    metadata.insert("restaurant_name".to_string(), "Spice Garden".to_string());
    metadata.insert("customer_id".to_string(), "user_91".to_string());
    metadata.insert("customer_name".to_string(), "Asha".to_string());
    metadata.insert("order_type".to_string(), "dine_in".to_string());
    metadata.insert(
        "cart".to_string(),
        r#"[{"id": 7, "name": "Paneer Tikka", "price": "10.00", "quantity": 2, "is_veg": true}]"#
            .to_string(),
    );
    metadata
}
