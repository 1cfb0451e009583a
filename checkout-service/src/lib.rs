pub mod config;
pub mod handlers;
pub mod models;
pub mod outcome;
pub mod services;

use axum::middleware::from_fn;
use axum::{routing::get, Router};
use secrecy::ExposeSecret;
use service_core::error::AppError;
use service_core::middleware::{metrics::metrics_middleware, tracing::request_id_middleware};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use config::Config;
use services::{CheckoutProvider, Database, OrderStore, StripeClient};

/// Shared application state.
///
/// The provider and store are trait objects so tests can drive the full
/// router against fakes instead of Stripe and Postgres.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub provider: Arc<dyn CheckoutProvider>,
    pub store: Arc<dyn OrderStore>,
}

/// Assemble the router. Shared by `Application` and the integration tests.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health_check))
        .route("/ready", get(handlers::readiness_check))
        .route("/metrics", get(handlers::metrics))
        .route("/checkout/return", get(handlers::checkout::checkout_return))
        .layer(from_fn(metrics_middleware))
        .layer(from_fn(request_id_middleware))
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &axum::http::Request<_>| {
                let request_id = request
                    .headers()
                    .get("x-request-id")
                    .and_then(|value| value.to_str().ok())
                    .unwrap_or("-");

                tracing::info_span!(
                    "http_request",
                    request_id = %request_id,
                    method = %request.method(),
                    uri = %request.uri(),
                    version = ?request.version(),
                )
            }),
        )
        .with_state(state)
}

pub struct Application {
    port: u16,
    router: Router,
}

impl Application {
    pub async fn build(config: Config) -> Result<Self, AppError> {
        let database = Database::new(
            config.database.url.expose_secret(),
            config.database.max_connections,
            config.database.min_connections,
        )
        .await?;
        database.run_migrations().await?;

        let stripe = StripeClient::new(config.stripe.clone());
        if stripe.is_configured() {
            tracing::info!("Stripe client initialized");
        } else {
            tracing::warn!("Stripe credentials not configured - checkout verification will fail");
        }

        services::init_metrics();

        let state = AppState {
            config: config.clone(),
            provider: Arc::new(stripe),
            store: Arc::new(database),
        };

        let router = build_router(state);

        Ok(Self {
            port: config.server.port,
            router,
        })
    }

    pub async fn run_until_stopped(self) -> Result<(), AppError> {
        let addr = SocketAddr::from(([0, 0, 0, 0], self.port));
        tracing::info!("Listening on {}", addr);

        let listener = tokio::net::TcpListener::bind(addr).await?;
        axum::serve(listener, self.router)
            .await
            .map_err(AppError::from)?;

        Ok(())
    }

    pub fn port(&self) -> u16 {
        self.port
    }
}
