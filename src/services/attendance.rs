use chrono::NaiveDate;
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::{
    attendance::{AttendanceRecord, AttendanceSummary},
    auth::AuthenticatedUser,
    qr::DailyQrCode,
};
use crate::services::{billing, leaves::LeaveService};

const SELECT_COLUMNS: &str =
    "id, user_id, user_email, user_name, date, recorded_at, meal_type, qr_code_id";

pub struct AttendanceService;

impl AttendanceService {
    /// Conditional insert guarded by the UNIQUE (user_id, date) key.
    /// Returns None when a row for (user, today) already exists, including
    /// when a concurrent scan won the race.
    pub async fn mark(
        pool: &PgPool,
        user: &AuthenticatedUser,
        qr: &DailyQrCode,
        today: NaiveDate,
    ) -> anyhow::Result<Option<AttendanceRecord>> {
        let meal_type = qr.meal_type.as_deref().unwrap_or("general");
        let record = sqlx::query_as::<_, AttendanceRecord>(&format!(
            r#"INSERT INTO attendance (user_id, user_email, user_name, date, meal_type, qr_code_id)
               VALUES ($1, $2, $3, $4, $5, $6)
               ON CONFLICT (user_id, date) DO NOTHING
               RETURNING {SELECT_COLUMNS}"#
        ))
        .bind(user.user_id)
        .bind(&user.email)
        .bind(&user.name)
        .bind(today)
        .bind(meal_type)
        .bind(qr.id)
        .fetch_optional(pool)
        .await?;
        Ok(record)
    }

    pub async fn list_for_user(
        pool: &PgPool,
        user_id: Uuid,
    ) -> anyhow::Result<Vec<AttendanceRecord>> {
        let records = sqlx::query_as::<_, AttendanceRecord>(&format!(
            "SELECT {SELECT_COLUMNS} FROM attendance WHERE user_id = $1 ORDER BY recorded_at DESC"
        ))
        .bind(user_id)
        .fetch_all(pool)
        .await?;
        Ok(records)
    }

    pub async fn list_all(pool: &PgPool) -> anyhow::Result<Vec<AttendanceRecord>> {
        let records = sqlx::query_as::<_, AttendanceRecord>(&format!(
            "SELECT {SELECT_COLUMNS} FROM attendance ORDER BY recorded_at DESC"
        ))
        .fetch_all(pool)
        .await?;
        Ok(records)
    }

    /// Current-cycle view: meals in the rolling 30-day window plus the bill
    /// estimate with this month's approved leaves deducted.
    pub async fn summary(
        pool: &PgPool,
        user_id: Uuid,
        today: NaiveDate,
        meal_rate: i64,
    ) -> anyhow::Result<AttendanceSummary> {
        let dates: Vec<NaiveDate> =
            sqlx::query_scalar("SELECT date FROM attendance WHERE user_id = $1 ORDER BY date")
                .bind(user_id)
                .fetch_all(pool)
                .await?;

        // With no attendance yet the window degenerates to one anchored today.
        let window = billing::current_cycle(dates.first().copied().unwrap_or(today), today);
        let cycle_meals = billing::meals_in_current_cycle(&dates, today);
        let attended_today = dates.contains(&today);

        let approved_leaves = LeaveService::approved_in_month(pool, user_id, today).await?;
        let estimated_bill = billing::estimated_bill(cycle_meals, approved_leaves, meal_rate);

        Ok(AttendanceSummary {
            cycle_start: window.start,
            cycle_end: window.end,
            cycle_meals,
            attended_today,
            estimated_bill,
        })
    }
}
