use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A daily attendance code. The qr_value is the opaque payload encoded into
/// the QR image by the client; meal_type is optional and defaults to
/// "general" at attendance time.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DailyQrCode {
    pub id: Uuid,
    pub date: NaiveDate,
    pub qr_value: String,
    pub meal_type: Option<String>,
    pub created_by: String,
    pub created_at: DateTime<Utc>,
}
