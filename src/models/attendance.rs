use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// One marked meal. user_email / user_name are denormalized so attendance
/// history and exports survive account deletion.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct AttendanceRecord {
    pub id: Uuid,
    pub user_id: Uuid,
    pub user_email: String,
    pub user_name: String,
    pub date: NaiveDate,
    pub recorded_at: DateTime<Utc>,
    pub meal_type: String,
    pub qr_code_id: Option<Uuid>,
}

/// Body for POST /attendance/scan.
#[derive(Debug, Deserialize)]
pub struct ScanRequest {
    pub qr_value: String,
}

/// Current 30-day-cycle view for one user.
#[derive(Debug, Serialize)]
pub struct AttendanceSummary {
    pub cycle_start: NaiveDate,
    pub cycle_end: NaiveDate,
    pub cycle_meals: i64,
    pub attended_today: bool,
    pub estimated_bill: i64,
}
