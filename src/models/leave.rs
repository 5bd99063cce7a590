use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct LeaveRequest {
    pub id: Uuid,
    pub user_id: Uuid,
    pub user_email: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub meal_type: String,
    pub reason: String,
    pub status: String,
    pub responded_by: Option<String>,
    pub responded_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

/// Body for POST /leaves.
#[derive(Debug, Deserialize)]
pub struct CreateLeaveRequest {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub meal_type: String,
    pub reason: String,
}

/// Body for POST /leaves/{id}/respond — approved or rejected.
#[derive(Debug, Deserialize)]
pub struct RespondLeaveRequest {
    pub status: String,
}
