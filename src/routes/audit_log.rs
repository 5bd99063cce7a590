use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use uuid::Uuid;

use crate::{middleware::auth::require_admin, models::auth::AuthenticatedUser, AppState};

#[derive(Deserialize)]
pub struct AuditQuery {
    pub page:   Option<i64>,
    pub limit:  Option<i64>,
    pub action: Option<String>,
}

#[derive(Serialize, sqlx::FromRow)]
pub struct AuditLogRow {
    pub id:             Uuid,
    pub user_id:        Option<Uuid>,
    pub user_email:     Option<String>,
    pub action:         String,
    pub resource_type:  Option<String>,
    pub resource_id:    Option<String>,
    pub resource_label: Option<String>,
    pub created_at:     DateTime<Utc>,
}

/// GET /audit — admins only; paginated, optionally filtered by action prefix
/// (e.g. ?action=payment).
pub async fn list_audit_log(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Query(params): Query<AuditQuery>,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    require_admin(&user)?;

    let limit  = params.limit.unwrap_or(50).min(200);
    let page   = params.page.unwrap_or(1).max(1);
    let offset = (page - 1) * limit;

    let (entries, total) = if let Some(action_filter) = &params.action {
        let rows: Vec<AuditLogRow> = sqlx::query_as(
            "SELECT id, user_id, user_email, action, resource_type, resource_id, resource_label, created_at
             FROM audit_log
             WHERE action LIKE $1
             ORDER BY created_at DESC
             LIMIT $2 OFFSET $3",
        )
        .bind(format!("{action_filter}%"))
        .bind(limit)
        .bind(offset)
        .fetch_all(&state.db)
        .await
        .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, Json(json!({ "error": e.to_string() }))))?;

        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM audit_log WHERE action LIKE $1")
            .bind(format!("{action_filter}%"))
            .fetch_one(&state.db)
            .await
            .unwrap_or(0);

        (rows, total)
    } else {
        let rows: Vec<AuditLogRow> = sqlx::query_as(
            "SELECT id, user_id, user_email, action, resource_type, resource_id, resource_label, created_at
             FROM audit_log
             ORDER BY created_at DESC
             LIMIT $1 OFFSET $2",
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(&state.db)
        .await
        .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, Json(json!({ "error": e.to_string() }))))?;

        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM audit_log")
            .fetch_one(&state.db)
            .await
            .unwrap_or(0);

        (rows, total)
    };

    Ok(Json(json!({
        "entries": entries,
        "total":   total,
        "page":    page,
        "limit":   limit,
    })))
}
