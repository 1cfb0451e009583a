//! Party session model.
//!
//! Party sessions are created elsewhere (when a table opens a shared
//! ordering session); this service only advances one into its terminal
//! `submitted` state.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PartySessionStatus {
    Active,
    Submitted,
}

impl PartySessionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PartySessionStatus::Active => "active",
            PartySessionStatus::Submitted => "submitted",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct PartySession {
    pub session_id: String,
    pub status: String,
    pub submitted_utc: Option<DateTime<Utc>>,
    pub created_utc: DateTime<Utc>,
}
