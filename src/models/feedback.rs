use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Feedback {
    pub id: Uuid,
    pub user_id: Uuid,
    pub user_email: String,
    pub subject: String,
    pub message: String,
    pub rating: i16,
    pub category: Option<String>,
    pub status: String,
    pub admin_response: Option<String>,
    pub responded_by: Option<String>,
    pub responded_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

/// Body for POST /feedback.
#[derive(Debug, Deserialize)]
pub struct CreateFeedbackRequest {
    pub subject: String,
    pub message: String,
    pub rating: i16,
    pub category: Option<String>,
}

/// Body for POST /feedback/{id}/respond — resolved or rejected, with an
/// optional response shown back to the user.
#[derive(Debug, Deserialize)]
pub struct RespondFeedbackRequest {
    pub status: String,
    pub response: Option<String>,
}
