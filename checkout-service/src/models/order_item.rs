//! Order line item model for checkout-service.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Line item on an order.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct OrderItem {
    pub order_item_id: Uuid,
    pub order_id: Uuid,
    pub menu_item_id: Option<i64>,
    pub name: String,
    pub unit_price: Decimal,
    pub quantity: i64,
    pub is_veg: bool,
    pub created_utc: DateTime<Utc>,
}

/// Input for creating a line item. The owning order id is supplied
/// separately so items can only be written once an order exists.
#[derive(Debug, Clone)]
pub struct CreateOrderItem {
    pub menu_item_id: Option<i64>,
    pub name: String,
    pub unit_price: Decimal,
    pub quantity: i64,
    pub is_veg: bool,
}
