use axum::{extract::State, http::StatusCode, Json};
use chrono::Utc;
use serde_json::{json, Value};

use crate::{
    middleware::auth::require_admin,
    models::auth::AuthenticatedUser,
    services::billing,
    AppState,
};

/// GET /stats/overview — admins only; the dashboard headline numbers.
/// "Active users" counts distinct users who have ever marked attendance,
/// not rows in the users table.
pub async fn overview(
    State(state): State<AppState>,
    user: AuthenticatedUser,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    require_admin(&user)?;

    let db_error = |e: sqlx::Error| {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": e.to_string() })),
        )
    };

    let active_users: i64 =
        sqlx::query_scalar("SELECT COUNT(DISTINCT user_id) FROM attendance")
            .fetch_one(&state.db)
            .await
            .map_err(db_error)?;

    let pending_feedback: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM feedback WHERE status = 'pending'")
            .fetch_one(&state.db)
            .await
            .map_err(db_error)?;

    let pending_leaves: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM leave_requests WHERE status = 'pending'")
            .fetch_one(&state.db)
            .await
            .map_err(db_error)?;

    let pending_payments: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM payments WHERE status = 'pending'")
            .fetch_one(&state.db)
            .await
            .map_err(db_error)?;

    let total_revenue: i64 = sqlx::query_scalar(
        "SELECT COALESCE(SUM(amount), 0) FROM payments WHERE status = 'paid'",
    )
    .fetch_one(&state.db)
    .await
    .map_err(db_error)?;

    let current_month = billing::month_label(Utc::now().date_naive());
    let monthly_revenue: i64 = sqlx::query_scalar(
        "SELECT COALESCE(SUM(amount), 0) FROM payments WHERE status = 'paid' AND month = $1",
    )
    .bind(&current_month)
    .fetch_one(&state.db)
    .await
    .map_err(db_error)?;

    Ok(Json(json!({
        "active_users": active_users,
        "pending_feedback": pending_feedback,
        "pending_leaves": pending_leaves,
        "pending_payments": pending_payments,
        "total_revenue": total_revenue,
        "monthly_revenue": monthly_revenue,
        "current_month": current_month,
    })))
}
