//! Order model for checkout-service.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// How the order will be fulfilled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderType {
    DineIn,
    Takeout,
}

impl OrderType {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderType::DineIn => "dine_in",
            OrderType::Takeout => "takeout",
        }
    }

    pub fn from_string(s: &str) -> Self {
        match s {
            "takeout" => OrderType::Takeout,
            _ => OrderType::DineIn,
        }
    }
}

/// Order lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    Active,
    Preparing,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Active => "active",
            OrderStatus::Preparing => "preparing",
        }
    }

    /// Status assigned at creation. Takeout orders go straight to the
    /// kitchen; dine-in orders stay active until the table closes out.
    pub fn initial_for(order_type: OrderType) -> Self {
        match order_type {
            OrderType::Takeout => OrderStatus::Preparing,
            OrderType::DineIn => OrderStatus::Active,
        }
    }
}

/// Order record.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Order {
    pub order_id: Uuid,
    pub restaurant_id: i64,
    pub order_type: String,
    pub status: String,
    pub subtotal: Decimal,
    pub tip: Decimal,
    pub payment_method: String,
    pub party_session_id: Option<String>,
    pub customer_id: Option<String>,
    pub customer_name: Option<String>,
    pub created_utc: DateTime<Utc>,
}

/// Input for creating an order.
#[derive(Debug, Clone)]
pub struct CreateOrder {
    pub restaurant_id: i64,
    pub order_type: OrderType,
    pub subtotal: Decimal,
    pub party_session_id: Option<String>,
    pub customer_id: Option<String>,
    pub customer_name: Option<String>,
}
