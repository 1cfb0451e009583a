//! Stripe checkout session client.
//!
//! The return redirect's `status=success` query parameter is client
//! controlled, so it proves nothing. The session record fetched here,
//! over an authenticated call to the provider, is the only thing treated
//! as evidence that funds were captured.

use crate::config::StripeConfig;
use anyhow::anyhow;
use async_trait::async_trait;
use reqwest::Client;
use secrecy::ExposeSecret;
use serde::Deserialize;
use std::collections::HashMap;
use thiserror::Error;

/// Failure modes of a session lookup.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// The call never completed: network, TLS, missing credentials.
    #[error("payment provider unavailable: {0}")]
    Unavailable(#[source] anyhow::Error),

    /// The provider answered but rejected the lookup.
    #[error("payment provider error: {code}: {message}")]
    Api { code: String, message: String },
}

/// Payment state of a checkout session as reported by the provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaymentStatus {
    Paid,
    Unpaid,
    NoPaymentRequired,
    Unknown,
}

impl PaymentStatus {
    pub fn from_string(s: &str) -> Self {
        match s {
            "paid" => PaymentStatus::Paid,
            "unpaid" => PaymentStatus::Unpaid,
            "no_payment_required" => PaymentStatus::NoPaymentRequired,
            other => {
                tracing::warn!(status = %other, "Unknown payment status from provider");
                PaymentStatus::Unknown
            }
        }
    }

    /// Only a captured payment clears the order for materialization.
    pub fn is_paid(&self) -> bool {
        matches!(self, PaymentStatus::Paid)
    }
}

/// Checkout session record retrieved from the provider.
#[derive(Debug, Clone)]
pub struct CheckoutSession {
    pub id: String,
    pub payment_status: PaymentStatus,
    /// Caller-supplied metadata attached when the session was created.
    pub metadata: HashMap<String, String>,
}

/// Wire shape of the provider's session resource.
#[derive(Debug, Deserialize)]
struct SessionResponse {
    id: String,
    payment_status: String,
    #[serde(default)]
    metadata: HashMap<String, String>,
}

/// Stripe API error envelope.
#[derive(Debug, Deserialize)]
struct StripeErrorResponse {
    error: StripeErrorDetail,
}

#[derive(Debug, Deserialize)]
struct StripeErrorDetail {
    #[serde(rename = "type")]
    pub error_type: String,
    #[serde(default)]
    pub message: String,
}

/// Read access to provider checkout sessions.
///
/// A trait so the workflow can be exercised against a fake provider in
/// tests; `StripeClient` is the production implementation.
#[async_trait]
pub trait CheckoutProvider: Send + Sync {
    async fn retrieve_session(&self, session_id: &str) -> Result<CheckoutSession, ProviderError>;
}

/// Stripe client for retrieving checkout sessions.
#[derive(Clone)]
pub struct StripeClient {
    client: Client,
    config: StripeConfig,
}

impl StripeClient {
    pub fn new(config: StripeConfig) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }

    /// Check if Stripe is configured (credentials are set).
    pub fn is_configured(&self) -> bool {
        !self.config.secret_key.expose_secret().is_empty()
    }
}

#[async_trait]
impl CheckoutProvider for StripeClient {
    async fn retrieve_session(&self, session_id: &str) -> Result<CheckoutSession, ProviderError> {
        if !self.is_configured() {
            return Err(ProviderError::Unavailable(anyhow!(
                "Stripe credentials not configured"
            )));
        }

        let url = format!("{}/checkout/sessions/{}", self.config.api_base_url, session_id);

        let response = self
            .client
            .get(&url)
            .bearer_auth(self.config.secret_key.expose_secret())
            .send()
            .await
            .map_err(|e| ProviderError::Unavailable(anyhow!("session lookup failed: {}", e)))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ProviderError::Unavailable(anyhow!("session body read failed: {}", e)))?;

        tracing::debug!(status = %status, "Stripe retrieve_session response");

        if status.is_success() {
            let session: SessionResponse = serde_json::from_str(&body)
                .map_err(|e| ProviderError::Unavailable(anyhow!("malformed session body: {}", e)))?;
            tracing::info!(
                session_id = %session.id,
                payment_status = %session.payment_status,
                "Checkout session retrieved"
            );
            Ok(CheckoutSession {
                id: session.id,
                payment_status: PaymentStatus::from_string(&session.payment_status),
                metadata: session.metadata,
            })
        } else {
            let error: StripeErrorResponse =
                serde_json::from_str(&body).unwrap_or_else(|_| StripeErrorResponse {
                    error: StripeErrorDetail {
                        error_type: "unknown".to_string(),
                        message: body.clone(),
                    },
                });
            tracing::error!(
                code = %error.error.error_type,
                message = %error.error.message,
                "Stripe session lookup rejected"
            );
            Err(ProviderError::Api {
                code: error.error.error_type,
                message: error.error.message,
            })
        }
    }
}
