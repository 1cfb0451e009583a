//! Checkout return handler.
//!
//! The payment provider redirects the user's browser here after a hosted
//! checkout. Whatever happens downstream, the user gets a rendered result
//! page with a deep link back into the app; no failure is allowed to
//! surface as a bare HTTP error.

use axum::extract::{Query, State};
use axum::response::Html;
use serde::Deserialize;

use crate::outcome::{render_page, Outcome};
use crate::services::intent::decode_intent;
use crate::services::materializer::materialize_order;
use crate::services::metrics;
use crate::services::stripe::ProviderError;
use crate::AppState;

/// Query parameters the provider appends to the return URL. Both are
/// client-controlled and proven nothing until re-verified.
#[derive(Debug, Default, Deserialize)]
pub struct ReturnParams {
    pub status: Option<String>,
    pub session_id: Option<String>,
}

/// Handle the return redirect from the hosted checkout page.
pub async fn checkout_return(
    State(state): State<AppState>,
    params: Option<Query<ReturnParams>>,
) -> Html<String> {
    let params = params.map(|Query(p)| p).unwrap_or_default();

    tracing::info!(
        status = params.status.as_deref().unwrap_or("-"),
        session_id = params.session_id.as_deref().unwrap_or("-"),
        "Checkout return received"
    );

    let outcome = match params.status.as_deref() {
        Some("cancel") => Outcome::cancelled(),
        Some("success") => match params.session_id.as_deref() {
            Some(session_id) if !session_id.is_empty() => {
                complete_checkout(&state, session_id).await
            }
            _ => Outcome::unknown_redirect(),
        },
        _ => Outcome::unknown_redirect(),
    };

    metrics::record_outcome(outcome.kind.as_str());
    Html(render_page(&outcome, &state.config.app))
}

/// Verify the session with the provider and materialize the order.
///
/// Only provider failures escalate to the Error outcome; decode issues are
/// defaulted and store write failures are absorbed into a degraded Success.
async fn complete_checkout(state: &AppState, session_id: &str) -> Outcome {
    let session = match state.provider.retrieve_session(session_id).await {
        Ok(session) => session,
        Err(e) => {
            tracing::error!(session_id = %session_id, error = %e, "Checkout verification failed");
            return Outcome::error(redacted_reason(&e));
        }
    };

    if !session.payment_status.is_paid() {
        tracing::info!(
            session_id = %session.id,
            payment_status = ?session.payment_status,
            "Session not paid, skipping materialization"
        );
        return Outcome::payment_incomplete();
    }

    let decoded = decode_intent(&session.metadata);
    for field in &decoded.defaulted {
        metrics::record_decode_default(field.as_str());
    }
    if !decoded.defaulted.is_empty() {
        tracing::warn!(
            session_id = %session.id,
            defaulted = ?decoded.defaulted,
            "Checkout metadata fields were defaulted"
        );
    }

    let materialized = materialize_order(state.store.as_ref(), &decoded.intent).await;

    Outcome::success(&materialized)
}

/// Stable token for the deep link; raw messages never leave the logs.
fn redacted_reason(error: &ProviderError) -> &'static str {
    match error {
        ProviderError::Unavailable(_) => "provider_unavailable",
        ProviderError::Api { .. } => "provider_error",
    }
}
