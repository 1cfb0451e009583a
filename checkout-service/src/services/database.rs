//! Database service for checkout-service.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use service_core::error::AppError;
use sqlx::postgres::{PgPool, PgPoolOptions};
use sqlx::QueryBuilder;
use std::time::Duration;
use tracing::{info, instrument};
use uuid::Uuid;

use crate::models::{
    CreateGroupOrderSummary, CreateOrder, CreateOrderItem, OrderStatus, PartySessionStatus,
};
use crate::services::metrics::DB_QUERY_DURATION;
use crate::services::store::OrderStore;

/// Database connection pool wrapper.
#[derive(Clone)]
pub struct Database {
    pool: PgPool,
}

impl Database {
    /// Create a new database connection pool.
    #[instrument(skip(database_url), fields(service = "checkout-service"))]
    pub async fn new(
        database_url: &str,
        max_connections: u32,
        min_connections: u32,
    ) -> Result<Self, AppError> {
        info!(
            max_connections = max_connections,
            min_connections = min_connections,
            "Connecting to PostgreSQL"
        );

        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .min_connections(min_connections)
            .acquire_timeout(Duration::from_secs(30))
            .idle_timeout(Duration::from_secs(600))
            .connect(database_url)
            .await
            .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to connect: {}", e)))?;

        info!("PostgreSQL connection pool established");

        Ok(Self { pool })
    }

    /// Get a reference to the connection pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Run database migrations.
    #[instrument(skip(self))]
    pub async fn run_migrations(&self) -> Result<(), AppError> {
        info!("Running database migrations");
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Migration failed: {}", e)))?;
        info!("Database migrations completed");
        Ok(())
    }
}

#[async_trait]
impl OrderStore for Database {
    #[instrument(skip(self, input), fields(restaurant_id = input.restaurant_id))]
    async fn create_order(&self, input: &CreateOrder) -> Result<Uuid, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["create_order"])
            .start_timer();

        let order_id = Uuid::new_v4();
        let status = OrderStatus::initial_for(input.order_type);

        let (created,): (Uuid,) = sqlx::query_as(
            r#"
            INSERT INTO orders (order_id, restaurant_id, order_type, status, subtotal, tip, payment_method, party_session_id, customer_id, customer_name)
            VALUES ($1, $2, $3, $4, $5, 0, 'card', $6, $7, $8)
            RETURNING order_id
            "#,
        )
        .bind(order_id)
        .bind(input.restaurant_id)
        .bind(input.order_type.as_str())
        .bind(status.as_str())
        .bind(input.subtotal)
        .bind(&input.party_session_id)
        .bind(&input.customer_id)
        .bind(&input.customer_name)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to create order: {}", e)))?;

        timer.observe_duration();

        info!(order_id = %created, status = status.as_str(), "Order created");

        Ok(created)
    }

    #[instrument(skip(self, items), fields(order_id = %order_id, count = items.len()))]
    async fn create_order_items(
        &self,
        order_id: Uuid,
        items: &[CreateOrderItem],
    ) -> Result<(), AppError> {
        if items.is_empty() {
            return Ok(());
        }

        let timer = DB_QUERY_DURATION
            .with_label_values(&["create_order_items"])
            .start_timer();

        let mut builder = QueryBuilder::new(
            "INSERT INTO order_items (order_item_id, order_id, menu_item_id, name, unit_price, quantity, is_veg) ",
        );
        builder.push_values(items, |mut row, item| {
            row.push_bind(Uuid::new_v4())
                .push_bind(order_id)
                .push_bind(item.menu_item_id)
                .push_bind(&item.name)
                .push_bind(item.unit_price)
                .push_bind(item.quantity)
                .push_bind(item.is_veg);
        });

        builder.build().execute(&self.pool).await.map_err(|e| {
            AppError::DatabaseError(anyhow::anyhow!("Failed to create order items: {}", e))
        })?;

        timer.observe_duration();

        info!(order_id = %order_id, count = items.len(), "Order items created");

        Ok(())
    }

    #[instrument(skip(self), fields(party_session_id = %session_id))]
    async fn mark_party_session_submitted(
        &self,
        session_id: &str,
        submitted_utc: DateTime<Utc>,
    ) -> Result<(), AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["mark_party_session_submitted"])
            .start_timer();

        let result = sqlx::query(
            r#"
            UPDATE party_sessions
            SET status = $2, submitted_utc = $3
            WHERE session_id = $1
            "#,
        )
        .bind(session_id)
        .bind(PartySessionStatus::Submitted.as_str())
        .bind(submitted_utc)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            AppError::DatabaseError(anyhow::anyhow!("Failed to update party session: {}", e))
        })?;

        timer.observe_duration();

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(anyhow::anyhow!(
                "Party session '{}' does not exist",
                session_id
            )));
        }

        info!(party_session_id = %session_id, "Party session marked submitted");

        Ok(())
    }

    #[instrument(skip(self, input), fields(party_session_id = %input.party_session_id))]
    async fn create_group_order_summary(
        &self,
        input: &CreateGroupOrderSummary,
    ) -> Result<Uuid, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["create_group_order_summary"])
            .start_timer();

        let summary_id = Uuid::new_v4();

        let (created,): (Uuid,) = sqlx::query_as(
            r#"
            INSERT INTO group_order_summaries (summary_id, party_session_id, restaurant_id, items, total, submitted_utc)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING summary_id
            "#,
        )
        .bind(summary_id)
        .bind(&input.party_session_id)
        .bind(input.restaurant_id)
        .bind(sqlx::types::Json(&input.items))
        .bind(input.total)
        .bind(input.submitted_utc)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            AppError::DatabaseError(anyhow::anyhow!("Failed to create group order summary: {}", e))
        })?;

        timer.observe_duration();

        info!(summary_id = %created, "Group order summary created");

        Ok(created)
    }

    /// Check database health.
    #[instrument(skip(self))]
    async fn health_check(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Health check failed: {}", e)))?;
        Ok(())
    }
}
