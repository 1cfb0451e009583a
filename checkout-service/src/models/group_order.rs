//! Group order summary model.
//!
//! A denormalized snapshot of what a party session ordered, written once at
//! submission. Independent of the Order/OrderItem records: the two share a
//! source cart but nothing keeps them linked afterwards.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// One line of the snapshot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroupOrderLine {
    pub name: String,
    pub price: Decimal,
    pub quantity: i64,
    /// Display label of whoever added the item.
    pub contributor: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct GroupOrderSummary {
    pub summary_id: Uuid,
    pub party_session_id: String,
    pub restaurant_id: i64,
    pub items: sqlx::types::Json<Vec<GroupOrderLine>>,
    pub total: Decimal,
    pub submitted_utc: DateTime<Utc>,
    pub created_utc: DateTime<Utc>,
}

/// Input for creating a group order summary.
#[derive(Debug, Clone)]
pub struct CreateGroupOrderSummary {
    pub party_session_id: String,
    pub restaurant_id: i64,
    pub items: Vec<GroupOrderLine>,
    pub total: Decimal,
    pub submitted_utc: DateTime<Utc>,
}
