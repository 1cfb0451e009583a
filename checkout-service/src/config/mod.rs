use anyhow::Result;
use dotenvy::dotenv;
use secrecy::Secret;
use serde::Deserialize;
use std::env;

#[derive(Deserialize, Clone, Debug)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub stripe: StripeConfig,
    pub app: AppConfig,
    pub service_name: String,
}

#[derive(Deserialize, Clone, Debug)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Deserialize, Clone, Debug)]
pub struct DatabaseConfig {
    pub url: Secret<String>,
    pub max_connections: u32,
    pub min_connections: u32,
}

/// Payment provider credentials and endpoint.
#[derive(Deserialize, Clone, Debug)]
pub struct StripeConfig {
    pub secret_key: Secret<String>,
    pub api_base_url: String,
}

/// Settings for handing the user back to the native application.
#[derive(Deserialize, Clone, Debug)]
pub struct AppConfig {
    /// Custom URL scheme registered by the mobile app (without `://`).
    pub deep_link_scheme: String,
    /// Seconds the result page waits before following the deep link.
    pub redirect_delay_seconds: u64,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenv().ok();

        let host = env::var("CHECKOUT_SERVICE_HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let port = env::var("CHECKOUT_SERVICE_PORT")
            .unwrap_or_else(|_| "3007".to_string())
            .parse()?;

        let db_url = env::var("CHECKOUT_DATABASE_URL").expect("CHECKOUT_DATABASE_URL must be set");
        let max_connections = env::var("CHECKOUT_DATABASE_MAX_CONNECTIONS")
            .unwrap_or_else(|_| "10".to_string())
            .parse()
            .unwrap_or(10);
        let min_connections = env::var("CHECKOUT_DATABASE_MIN_CONNECTIONS")
            .unwrap_or_else(|_| "1".to_string())
            .parse()
            .unwrap_or(1);

        let stripe_secret_key = env::var("CHECKOUT_STRIPE_SECRET_KEY").unwrap_or_default();
        let stripe_api_base_url = env::var("CHECKOUT_STRIPE_API_BASE_URL")
            .unwrap_or_else(|_| "https://api.stripe.com/v1".to_string());

        let deep_link_scheme =
            env::var("CHECKOUT_APP_DEEP_LINK_SCHEME").unwrap_or_else(|_| "diner".to_string());
        let redirect_delay_seconds = env::var("CHECKOUT_APP_REDIRECT_DELAY_SECONDS")
            .unwrap_or_else(|_| "3".to_string())
            .parse()
            .unwrap_or(3);

        Ok(Self {
            server: ServerConfig { host, port },
            database: DatabaseConfig {
                url: Secret::new(db_url),
                max_connections,
                min_connections,
            },
            stripe: StripeConfig {
                secret_key: Secret::new(stripe_secret_key),
                api_base_url: stripe_api_base_url,
            },
            app: AppConfig {
                deep_link_scheme,
                redirect_delay_seconds,
            },
            service_name: "checkout-service".to_string(),
        })
    }
}
