use sqlx::PgPool;
use uuid::Uuid;

use crate::models::menu::{MenuItem, MenuItemRequest};

pub const WEEK_DAYS: [&str; 7] = [
    "Monday", "Tuesday", "Wednesday", "Thursday", "Friday", "Saturday", "Sunday",
];
pub const MEAL_TYPES: [&str; 4] = ["Breakfast", "Lunch", "Dinner", "Snack"];

const SELECT_COLUMNS: &str = "id, day, meal_type, items, created_by, created_at, updated_at";

pub struct MenuService;

impl MenuService {
    /// Full weekly menu in weekday order, then meal type.
    pub async fn list(pool: &PgPool) -> anyhow::Result<Vec<MenuItem>> {
        let entries = sqlx::query_as::<_, MenuItem>(&format!(
            r#"SELECT {SELECT_COLUMNS}
               FROM menu_items
               ORDER BY array_position(ARRAY['Monday','Tuesday','Wednesday','Thursday','Friday','Saturday','Sunday'], day),
                        array_position(ARRAY['Breakfast','Lunch','Dinner','Snack'], meal_type),
                        created_at"#
        ))
        .fetch_all(pool)
        .await?;
        Ok(entries)
    }

    pub async fn create(
        pool: &PgPool,
        req: &MenuItemRequest,
        created_by: &str,
    ) -> anyhow::Result<MenuItem> {
        let entry = sqlx::query_as::<_, MenuItem>(&format!(
            r#"INSERT INTO menu_items (day, meal_type, items, created_by)
               VALUES ($1, $2, $3, $4)
               RETURNING {SELECT_COLUMNS}"#
        ))
        .bind(&req.day)
        .bind(&req.meal_type)
        .bind(&req.items)
        .bind(created_by)
        .fetch_one(pool)
        .await?;
        Ok(entry)
    }

    /// Full-record update; None when the id does not exist.
    pub async fn update(
        pool: &PgPool,
        id: Uuid,
        req: &MenuItemRequest,
    ) -> anyhow::Result<Option<MenuItem>> {
        let entry = sqlx::query_as::<_, MenuItem>(&format!(
            r#"UPDATE menu_items
               SET day = $2, meal_type = $3, items = $4, updated_at = NOW()
               WHERE id = $1
               RETURNING {SELECT_COLUMNS}"#
        ))
        .bind(id)
        .bind(&req.day)
        .bind(&req.meal_type)
        .bind(&req.items)
        .fetch_optional(pool)
        .await?;
        Ok(entry)
    }

    /// True when a row was deleted.
    pub async fn delete(pool: &PgPool, id: Uuid) -> anyhow::Result<bool> {
        let result = sqlx::query("DELETE FROM menu_items WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
