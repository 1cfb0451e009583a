//! Persistence capabilities consumed by the checkout workflow.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use service_core::error::AppError;
use uuid::Uuid;

use crate::models::{CreateGroupOrderSummary, CreateOrder, CreateOrderItem};

/// The four store operations this workflow issues, behind a trait so tests
/// can substitute an in-memory fake for the Postgres adapter.
#[async_trait]
pub trait OrderStore: Send + Sync {
    /// Create one order and return its store-assigned identifier.
    async fn create_order(&self, input: &CreateOrder) -> Result<Uuid, AppError>;

    /// Batch-create line items for an existing order.
    async fn create_order_items(
        &self,
        order_id: Uuid,
        items: &[CreateOrderItem],
    ) -> Result<(), AppError>;

    /// Advance a pre-existing party session to its terminal `submitted`
    /// state, stamping the submission time.
    async fn mark_party_session_submitted(
        &self,
        session_id: &str,
        submitted_utc: DateTime<Utc>,
    ) -> Result<(), AppError>;

    /// Append a group order snapshot and return its identifier.
    async fn create_group_order_summary(
        &self,
        input: &CreateGroupOrderSummary,
    ) -> Result<Uuid, AppError>;

    /// Liveness probe used by the readiness endpoint.
    async fn health_check(&self) -> Result<(), AppError>;
}
