pub mod database;
pub mod intent;
pub mod materializer;
pub mod metrics;
pub mod store;
pub mod stripe;

pub use database::Database;
pub use intent::{decode_intent, DecodedIntent, DefaultedField};
pub use materializer::{materialize_order, MaterializedCheckout, StoreWrite, StoreWriteFailure};
pub use metrics::{get_metrics, init_metrics};
pub use store::OrderStore;
pub use stripe::{CheckoutProvider, CheckoutSession, PaymentStatus, ProviderError, StripeClient};
