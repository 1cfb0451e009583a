//! Checkout metadata decoder.
//!
//! The metadata bag on a checkout session is a flat string map written by
//! the app before the user ever reached the payment page, so by the time it
//! comes back it may be stale, truncated, or mangled. Decoding therefore
//! defaults instead of failing: a missing or garbled field gets its
//! sentinel, the field is recorded in `defaulted`, and the workflow keeps
//! going. Enforcing "restaurant plus nonempty cart" is the materializer's
//! job, not the decoder's.

use std::collections::HashMap;

use crate::models::{CartItem, CheckoutIntent, OrderType};

/// Metadata keys the app writes at session creation.
const KEY_RESTAURANT_ID: &str = "restaurant_id";
const KEY_RESTAURANT_NAME: &str = "restaurant_name";
const KEY_CUSTOMER_ID: &str = "customer_id";
const KEY_CUSTOMER_NAME: &str = "customer_name";
const KEY_ORDER_TYPE: &str = "order_type";
const KEY_CART: &str = "cart";
const KEY_PARTY_SESSION_ID: &str = "party_session_id";

/// Fields that were replaced by their sentinel during decoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DefaultedField {
    RestaurantId,
    RestaurantName,
    OrderType,
    Cart,
}

impl DefaultedField {
    pub fn as_str(&self) -> &'static str {
        match self {
            DefaultedField::RestaurantId => "restaurant_id",
            DefaultedField::RestaurantName => "restaurant_name",
            DefaultedField::OrderType => "order_type",
            DefaultedField::Cart => "cart",
        }
    }
}

/// Decoder output: the intent plus which fields had to be defaulted.
#[derive(Debug, Clone)]
pub struct DecodedIntent {
    pub intent: CheckoutIntent,
    pub defaulted: Vec<DefaultedField>,
}

/// Decode a session metadata bag into a typed checkout intent.
///
/// Never fails. Every field has a sentinel default and malformed cart JSON
/// collapses to an empty cart.
pub fn decode_intent(metadata: &HashMap<String, String>) -> DecodedIntent {
    let mut defaulted = Vec::new();

    let restaurant_id = match metadata.get(KEY_RESTAURANT_ID).map(|v| v.parse::<i64>()) {
        Some(Ok(id)) if id > 0 => id,
        _ => {
            defaulted.push(DefaultedField::RestaurantId);
            0
        }
    };

    let restaurant_name = match metadata.get(KEY_RESTAURANT_NAME) {
        Some(name) if !name.is_empty() => name.clone(),
        _ => {
            defaulted.push(DefaultedField::RestaurantName);
            String::new()
        }
    };

    let customer_id = metadata
        .get(KEY_CUSTOMER_ID)
        .filter(|v| !v.is_empty())
        .cloned();
    let customer_name = metadata
        .get(KEY_CUSTOMER_NAME)
        .filter(|v| !v.is_empty())
        .cloned();

    let order_type = match metadata.get(KEY_ORDER_TYPE).map(String::as_str) {
        Some("dine_in") => OrderType::DineIn,
        Some("takeout") => OrderType::Takeout,
        _ => {
            defaulted.push(DefaultedField::OrderType);
            OrderType::DineIn
        }
    };

    let cart = match metadata.get(KEY_CART) {
        Some(raw) => match serde_json::from_str::<Vec<CartItem>>(raw) {
            Ok(items) => items,
            Err(e) => {
                tracing::warn!(error = %e, "Malformed cart in checkout metadata, defaulting to empty");
                defaulted.push(DefaultedField::Cart);
                Vec::new()
            }
        },
        None => {
            defaulted.push(DefaultedField::Cart);
            Vec::new()
        }
    };

    let party_session_id = metadata
        .get(KEY_PARTY_SESSION_ID)
        .filter(|v| !v.is_empty())
        .cloned();

    DecodedIntent {
        intent: CheckoutIntent {
            restaurant_id,
            restaurant_name,
            customer_id,
            customer_name,
            order_type,
            cart,
            party_session_id,
        },
        defaulted,
    }
}
