//! Order materializer.
//!
//! Turns a verified checkout intent into durable records: one Order, its
//! OrderItems, and — when the checkout came out of a party session — the
//! session's terminal state plus a GroupOrderSummary snapshot.
//!
//! Writes are best-effort, not transactional. A failed write is captured as
//! a `StoreWriteFailure` in the result and the workflow keeps going, so the
//! user still lands on a clean confirmation screen even when the backend
//! record is incomplete. The trade is at-least-attempted materialization,
//! not exactly-once: nothing here deduplicates a reloaded redirect.

use chrono::Utc;
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::models::{
    CheckoutIntent, CreateGroupOrderSummary, CreateOrder, CreateOrderItem, GroupOrderLine,
    OrderType,
};
use crate::services::metrics;
use crate::services::store::OrderStore;

/// Store writes the materializer can attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreWrite {
    Order,
    OrderItems,
    PartySession,
    GroupOrderSummary,
}

impl StoreWrite {
    pub fn as_str(&self) -> &'static str {
        match self {
            StoreWrite::Order => "order",
            StoreWrite::OrderItems => "order_items",
            StoreWrite::PartySession => "party_session",
            StoreWrite::GroupOrderSummary => "group_order_summary",
        }
    }
}

/// A write that failed and was absorbed.
#[derive(Debug)]
pub struct StoreWriteFailure {
    pub write: StoreWrite,
    pub reason: String,
}

/// What materialization produced, for outcome assembly.
#[derive(Debug)]
pub struct MaterializedCheckout {
    /// Absent when no order target existed or the order write failed.
    pub order_id: Option<Uuid>,
    /// Computed once from the cart; every later display uses this value.
    pub subtotal: Decimal,
    pub restaurant_name: String,
    pub order_type: OrderType,
    pub party_session_id: Option<String>,
    pub failures: Vec<StoreWriteFailure>,
}

impl MaterializedCheckout {
    fn degraded(intent: &CheckoutIntent) -> Self {
        Self {
            order_id: None,
            subtotal: Decimal::ZERO,
            restaurant_name: intent.restaurant_name.clone(),
            order_type: intent.order_type,
            party_session_id: intent.party_session_id.clone(),
            failures: Vec::new(),
        }
    }
}

/// Materialize a verified checkout intent into store records.
pub async fn materialize_order(
    store: &dyn OrderStore,
    intent: &CheckoutIntent,
) -> MaterializedCheckout {
    if !intent.has_order_target() {
        tracing::info!(
            restaurant_id = intent.restaurant_id,
            cart_len = intent.cart.len(),
            "No restaurant or empty cart, skipping order creation"
        );
        return MaterializedCheckout::degraded(intent);
    }

    let subtotal = intent.subtotal();
    let mut failures = Vec::new();

    let order_id = match store
        .create_order(&CreateOrder {
            restaurant_id: intent.restaurant_id,
            order_type: intent.order_type,
            subtotal,
            party_session_id: intent.party_session_id.clone(),
            customer_id: intent.customer_id.clone(),
            customer_name: intent.customer_name.clone(),
        })
        .await
    {
        Ok(id) => {
            tracing::info!(order_id = %id, restaurant_id = intent.restaurant_id, "Order created");
            Some(id)
        }
        Err(e) => {
            record_failure(&mut failures, StoreWrite::Order, e.to_string());
            None
        }
    };

    // Items only ever reference an order that exists.
    if let Some(order_id) = order_id {
        let items: Vec<CreateOrderItem> = intent
            .cart
            .iter()
            .map(|item| CreateOrderItem {
                menu_item_id: item.menu_item_id,
                name: item.name.clone(),
                unit_price: item.unit_price,
                quantity: item.quantity,
                is_veg: item.is_veg,
            })
            .collect();

        if let Err(e) = store.create_order_items(order_id, &items).await {
            record_failure(&mut failures, StoreWrite::OrderItems, e.to_string());
        }
    }

    let mut result = MaterializedCheckout {
        order_id,
        subtotal,
        restaurant_name: intent.restaurant_name.clone(),
        order_type: intent.order_type,
        party_session_id: intent.party_session_id.clone(),
        failures,
    };
    finish_party_session(store, intent, &mut result.failures).await;
    result
}

/// Close out the party session and snapshot the group order.
///
/// Attempted whenever the intent carries a party reference, independent of
/// whether the Order itself was written.
async fn finish_party_session(
    store: &dyn OrderStore,
    intent: &CheckoutIntent,
    failures: &mut Vec<StoreWriteFailure>,
) {
    let Some(session_id) = intent.party_session_id.as_deref() else {
        return;
    };

    let now = Utc::now();

    if let Err(e) = store.mark_party_session_submitted(session_id, now).await {
        record_failure(failures, StoreWrite::PartySession, e.to_string());
    } else {
        tracing::info!(party_session_id = %session_id, "Party session submitted");
    }

    let contributor = intent
        .customer_name
        .clone()
        .unwrap_or_else(|| "Guest".to_string());
    let summary = CreateGroupOrderSummary {
        party_session_id: session_id.to_string(),
        restaurant_id: intent.restaurant_id,
        items: intent
            .cart
            .iter()
            .map(|item| GroupOrderLine {
                name: item.name.clone(),
                price: item.unit_price,
                quantity: item.quantity,
                contributor: contributor.clone(),
            })
            .collect(),
        total: intent.subtotal(),
        submitted_utc: now,
    };

    match store.create_group_order_summary(&summary).await {
        Ok(summary_id) => {
            tracing::info!(summary_id = %summary_id, party_session_id = %session_id, "Group order summary created");
        }
        Err(e) => {
            record_failure(failures, StoreWrite::GroupOrderSummary, e.to_string());
        }
    }
}

fn record_failure(failures: &mut Vec<StoreWriteFailure>, write: StoreWrite, reason: String) {
    tracing::error!(write = write.as_str(), error = %reason, "Store write failed, continuing");
    metrics::record_store_write_failure(write.as_str());
    failures.push(StoreWriteFailure { write, reason });
}
