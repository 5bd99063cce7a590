use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// One weekly-menu entry. The same (day, meal type) pair may appear more
/// than once; rows are independent.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct MenuItem {
    pub id: Uuid,
    pub day: String,
    pub meal_type: String,
    pub items: String,
    pub created_by: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Body for POST /menu and PUT /menu/{id} — all fields required.
#[derive(Debug, Deserialize)]
pub struct MenuItemRequest {
    pub day: String,
    pub meal_type: String,
    pub items: String,
}
