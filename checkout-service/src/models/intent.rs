//! Checkout intent: what the purchaser meant to buy.
//!
//! Decoded from the metadata bag the app attached to the provider's checkout
//! session. Transient; it exists only for the lifetime of one return
//! redirect.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::order::OrderType;

/// One cart line as carried through checkout metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CartItem {
    #[serde(default, alias = "id")]
    pub menu_item_id: Option<i64>,
    #[serde(default)]
    pub name: String,
    #[serde(default, alias = "price")]
    pub unit_price: Decimal,
    #[serde(default = "default_quantity")]
    pub quantity: i64,
    #[serde(default)]
    pub is_veg: bool,
}

fn default_quantity() -> i64 {
    1
}

impl CartItem {
    pub fn line_total(&self) -> Decimal {
        self.unit_price * Decimal::from(self.quantity)
    }
}

/// A fully-defaulted view of the checkout metadata.
#[derive(Debug, Clone)]
pub struct CheckoutIntent {
    /// Restaurant the order belongs to; 0 means the metadata named none.
    pub restaurant_id: i64,
    pub restaurant_name: String,
    pub customer_id: Option<String>,
    pub customer_name: Option<String>,
    pub order_type: OrderType,
    pub cart: Vec<CartItem>,
    pub party_session_id: Option<String>,
}

impl CheckoutIntent {
    /// Sum of `unit_price * quantity` over the cart. Computed once by the
    /// materializer and reused wherever a total is shown or stored.
    pub fn subtotal(&self) -> Decimal {
        self.cart.iter().map(CartItem::line_total).sum()
    }

    /// Order and OrderItem records are only written when there is a
    /// restaurant to attach them to and something in the cart.
    pub fn has_order_target(&self) -> bool {
        self.restaurant_id > 0 && !self.cart.is_empty()
    }
}
