use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Payment {
    pub id: Uuid,
    pub user_id: Uuid,
    pub user_email: String,
    /// Whole rupees.
    pub amount: i64,
    /// Free-text billing-month label, e.g. "August 2026".
    pub month: String,
    pub transaction_id: String,
    pub payment_method: String,
    pub status: String,
    pub verified_by: Option<String>,
    pub verified_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

/// Body for POST /payments. month defaults to the current month label.
#[derive(Debug, Deserialize)]
pub struct SubmitPaymentRequest {
    pub amount: i64,
    pub month: Option<String>,
    pub transaction_id: String,
    pub payment_method: String,
}

/// Body for POST /payments/{id}/verify — paid or rejected.
#[derive(Debug, Deserialize)]
pub struct VerifyPaymentRequest {
    pub status: String,
}
