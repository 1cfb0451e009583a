//! Checkout outcomes and the result page.
//!
//! Everything here is pure: an `Outcome` describes what the user should see
//! and where the native app should resume, and `render_page` turns it into
//! the interstitial HTML that forwards them there. The deep link carries
//! only already-computed, non-sensitive fields.

use rust_decimal::Decimal;
use serde::Serialize;
use uuid::Uuid;

use crate::config::AppConfig;
use crate::models::OrderType;
use crate::services::materializer::MaterializedCheckout;

/// Terminal outcome classes of a return redirect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutcomeKind {
    Success,
    Cancelled,
    PaymentIncomplete,
    Error,
    UnknownRedirect,
}

impl OutcomeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            OutcomeKind::Success => "success",
            OutcomeKind::Cancelled => "cancelled",
            OutcomeKind::PaymentIncomplete => "payment_incomplete",
            OutcomeKind::Error => "error",
            OutcomeKind::UnknownRedirect => "unknown_redirect",
        }
    }

    fn icon(&self) -> (&'static str, &'static str) {
        match self {
            OutcomeKind::Success => ("✓", "success"),
            OutcomeKind::Cancelled => ("✕", "muted"),
            OutcomeKind::PaymentIncomplete => ("!", "warn"),
            OutcomeKind::Error => ("!", "error"),
            OutcomeKind::UnknownRedirect => ("→", "muted"),
        }
    }
}

/// Where the deep link resumes the app.
#[derive(Debug, Clone)]
enum DeepLinkTarget {
    OrderConfirmation {
        order_id: Option<Uuid>,
        restaurant: String,
        order_type: OrderType,
        total: String,
        party_session_id: Option<String>,
    },
    CheckoutCancel,
    CheckoutError {
        reason: String,
    },
}

#[derive(Serialize)]
struct ConfirmationQuery<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    order_id: Option<Uuid>,
    restaurant: &'a str,
    order_type: &'a str,
    total: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    party_session_id: Option<&'a str>,
}

#[derive(Serialize)]
struct ErrorQuery<'a> {
    reason: &'a str,
}

impl DeepLinkTarget {
    /// Build the custom-scheme URL the result page forwards to.
    fn href(&self, scheme: &str) -> String {
        match self {
            DeepLinkTarget::OrderConfirmation {
                order_id,
                restaurant,
                order_type,
                total,
                party_session_id,
            } => {
                let query = serde_urlencoded::to_string(ConfirmationQuery {
                    order_id: *order_id,
                    restaurant,
                    order_type: order_type.as_str(),
                    total,
                    party_session_id: party_session_id.as_deref(),
                })
                .unwrap_or_default();
                format!("{}://order/confirmation?{}", scheme, query)
            }
            DeepLinkTarget::CheckoutCancel => format!("{}://checkout/cancel", scheme),
            DeepLinkTarget::CheckoutError { reason } => {
                let query = serde_urlencoded::to_string(ErrorQuery { reason })
                    .unwrap_or_default();
                format!("{}://checkout/error?{}", scheme, query)
            }
        }
    }
}

/// What the user sees and where they are sent next.
#[derive(Debug, Clone)]
pub struct Outcome {
    pub kind: OutcomeKind,
    pub title: &'static str,
    pub subtitle: String,
    pub instructions: Option<String>,
    pub order_id: Option<Uuid>,
    target: DeepLinkTarget,
}

/// Render a monetary amount the one way totals are ever formatted.
pub fn format_amount(amount: Decimal) -> String {
    format!("{:.2}", amount.round_dp(2))
}

impl Outcome {
    pub fn success(materialized: &MaterializedCheckout) -> Self {
        let total = format_amount(materialized.subtotal);
        let subtitle = if materialized.restaurant_name.is_empty() {
            format!("Your payment of {} went through.", total)
        } else {
            format!(
                "Your payment of {} to {} went through.",
                total, materialized.restaurant_name
            )
        };
        let instructions = if materialized.order_id.is_none() {
            Some("We received your payment; your order record will appear in the app shortly.".to_string())
        } else {
            None
        };
        Self {
            kind: OutcomeKind::Success,
            title: "Payment successful",
            subtitle,
            instructions,
            order_id: materialized.order_id,
            target: DeepLinkTarget::OrderConfirmation {
                order_id: materialized.order_id,
                restaurant: materialized.restaurant_name.clone(),
                order_type: materialized.order_type,
                total,
                party_session_id: materialized.party_session_id.clone(),
            },
        }
    }

    pub fn cancelled() -> Self {
        Self {
            kind: OutcomeKind::Cancelled,
            title: "Checkout cancelled",
            subtitle: "Your payment was not taken.".to_string(),
            instructions: None,
            order_id: None,
            target: DeepLinkTarget::CheckoutCancel,
        }
    }

    pub fn payment_incomplete() -> Self {
        Self {
            kind: OutcomeKind::PaymentIncomplete,
            title: "Payment not completed",
            subtitle: "The payment for this checkout has not been captured.".to_string(),
            instructions: Some("Please retry the payment from the app.".to_string()),
            order_id: None,
            target: DeepLinkTarget::CheckoutError {
                reason: "payment_incomplete".to_string(),
            },
        }
    }

    /// `reason` must already be redacted: a stable token, never a raw
    /// provider or database message.
    pub fn error(reason: &str) -> Self {
        Self {
            kind: OutcomeKind::Error,
            title: "Something went wrong",
            subtitle: "We could not confirm your payment.".to_string(),
            instructions: Some("Return to the app and check your order history before retrying.".to_string()),
            order_id: None,
            target: DeepLinkTarget::CheckoutError {
                reason: reason.to_string(),
            },
        }
    }

    pub fn unknown_redirect() -> Self {
        Self {
            kind: OutcomeKind::UnknownRedirect,
            title: "Returning to the app",
            subtitle: "This page was opened without a checkout result.".to_string(),
            instructions: None,
            order_id: None,
            target: DeepLinkTarget::CheckoutCancel,
        }
    }

    pub fn deep_link(&self, scheme: &str) -> String {
        self.target.href(scheme)
    }
}

fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// Render the interstitial result page.
///
/// The page waits a fixed short delay, then follows the deep link; a manual
/// link covers browsers that block the automatic hop.
pub fn render_page(outcome: &Outcome, app: &AppConfig) -> String {
    let link = outcome.deep_link(&app.deep_link_scheme);
    let link_attr = html_escape(&link);
    let (icon, tone) = outcome.kind.icon();
    let delay = app.redirect_delay_seconds;

    let instructions = outcome
        .instructions
        .as_deref()
        .map(|text| format!(r#"<p class="instructions">{}</p>"#, html_escape(text)))
        .unwrap_or_default();

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<meta http-equiv="refresh" content="{delay};url={link_attr}">
<title>{title}</title>
<style>
body {{ font-family: -apple-system, system-ui, sans-serif; display: flex; align-items: center; justify-content: center; min-height: 100vh; margin: 0; background: #fafafa; color: #1a1a1a; }}
.card {{ text-align: center; padding: 2rem; max-width: 24rem; }}
.icon {{ font-size: 3rem; line-height: 1; }}
.icon.success {{ color: #15803d; }}
.icon.error {{ color: #b91c1c; }}
.icon.warn {{ color: #b45309; }}
.icon.muted {{ color: #6b7280; }}
.subtitle, .instructions {{ color: #4b5563; }}
a.open {{ display: inline-block; margin-top: 1rem; padding: 0.6rem 1.4rem; border-radius: 0.5rem; background: #1a1a1a; color: #fff; text-decoration: none; }}
</style>
</head>
<body>
<div class="card">
<div class="icon {tone}">{icon}</div>
<h1>{title}</h1>
<p class="subtitle">{subtitle}</p>
{instructions}
<a class="open" href="{link_attr}">Open the app</a>
<p class="instructions">If nothing happens, tap the button above.</p>
</div>
<script>
setTimeout(function () {{ window.location.href = "{link_attr}"; }}, {delay_ms});
</script>
</body>
</html>
"#,
        delay = delay,
        delay_ms = delay * 1000,
        link_attr = link_attr,
        title = html_escape(outcome.title),
        subtitle = html_escape(&outcome.subtitle),
        instructions = instructions,
        tone = tone,
        icon = icon,
    )
}
