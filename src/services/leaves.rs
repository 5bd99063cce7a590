use chrono::{NaiveDate, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::{
    auth::AuthenticatedUser,
    leave::{CreateLeaveRequest, LeaveRequest},
};
use crate::services::billing;

const SELECT_COLUMNS: &str = "id, user_id, user_email, start_date, end_date, meal_type, reason, \
                              status, responded_by, responded_at, created_at";

pub struct LeaveService;

impl LeaveService {
    pub async fn create(
        pool: &PgPool,
        user: &AuthenticatedUser,
        req: &CreateLeaveRequest,
    ) -> anyhow::Result<LeaveRequest> {
        let leave = sqlx::query_as::<_, LeaveRequest>(&format!(
            r#"INSERT INTO leave_requests (user_id, user_email, start_date, end_date, meal_type, reason)
               VALUES ($1, $2, $3, $4, $5, $6)
               RETURNING {SELECT_COLUMNS}"#
        ))
        .bind(user.user_id)
        .bind(&user.email)
        .bind(req.start_date)
        .bind(req.end_date)
        .bind(&req.meal_type)
        .bind(&req.reason)
        .fetch_one(pool)
        .await?;
        Ok(leave)
    }

    pub async fn list_for_user(pool: &PgPool, user_id: Uuid) -> anyhow::Result<Vec<LeaveRequest>> {
        let leaves = sqlx::query_as::<_, LeaveRequest>(&format!(
            "SELECT {SELECT_COLUMNS} FROM leave_requests WHERE user_id = $1 ORDER BY created_at DESC"
        ))
        .bind(user_id)
        .fetch_all(pool)
        .await?;
        Ok(leaves)
    }

    pub async fn list_all(pool: &PgPool) -> anyhow::Result<Vec<LeaveRequest>> {
        let leaves = sqlx::query_as::<_, LeaveRequest>(&format!(
            "SELECT {SELECT_COLUMNS} FROM leave_requests ORDER BY created_at DESC"
        ))
        .fetch_all(pool)
        .await?;
        Ok(leaves)
    }

    /// Approve or reject; stamps the responder. None when the id is unknown.
    pub async fn respond(
        pool: &PgPool,
        id: Uuid,
        status: &str,
        responded_by: &str,
    ) -> anyhow::Result<Option<LeaveRequest>> {
        let leave = sqlx::query_as::<_, LeaveRequest>(&format!(
            r#"UPDATE leave_requests
               SET status = $2, responded_by = $3, responded_at = $4
               WHERE id = $1
               RETURNING {SELECT_COLUMNS}"#
        ))
        .bind(id)
        .bind(status)
        .bind(responded_by)
        .bind(Utc::now())
        .fetch_optional(pool)
        .await?;
        Ok(leave)
    }

    /// Approved leaves whose *request* falls in the calendar month around
    /// `today`. The bill deduction keys off creation date, not the leave's
    /// date range.
    pub async fn approved_in_month(
        pool: &PgPool,
        user_id: Uuid,
        today: NaiveDate,
    ) -> anyhow::Result<i64> {
        let (month_start, month_end) = billing::calendar_month_bounds(today);
        let count: i64 = sqlx::query_scalar(
            r#"SELECT COUNT(*) FROM leave_requests
               WHERE user_id = $1
                 AND status = 'approved'
                 AND created_at >= $2
                 AND created_at < $3"#,
        )
        .bind(user_id)
        .bind(month_start.and_time(chrono::NaiveTime::MIN).and_utc())
        .bind(month_end.and_time(chrono::NaiveTime::MIN).and_utc())
        .fetch_one(pool)
        .await?;
        Ok(count)
    }
}
