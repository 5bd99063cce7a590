use axum::{extract::State, http::StatusCode, Json};
use chrono::Utc;
use serde_json::{json, Value};

use crate::{
    middleware::auth::require_admin,
    models::auth::AuthenticatedUser,
    services::{
        audit::{self, AuditEntry},
        events,
        qr::QrService,
    },
    AppState,
};

/// POST /qr — admins only; issues today's attendance code.
pub async fn issue_qr(
    State(state): State<AppState>,
    user: AuthenticatedUser,
) -> Result<(StatusCode, Json<Value>), (StatusCode, Json<Value>)> {
    require_admin(&user)?;

    let today = Utc::now().date_naive();

    let code = QrService::issue(&state.db, today, Some("general"), &user.email)
        .await
        .map_err(|e| {
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": e.to_string() })),
            )
        })?;

    audit::log(state.db.clone(), AuditEntry {
        user_id:        Some(user.user_id),
        user_email:     Some(user.email.clone()),
        action:         "qr.issue".to_string(),
        resource_type:  Some("qr_code".to_string()),
        resource_id:    Some(code.id.to_string()),
        resource_label: Some(code.date.to_string()),
    });
    events::publish(
        state.redis.clone(),
        "qr.issued",
        serde_json::to_value(&code).unwrap(),
    );

    Ok((StatusCode::CREATED, Json(serde_json::to_value(code).unwrap())))
}

/// GET /qr/today — any authenticated user; 404 until a code is issued.
pub async fn today_qr(
    State(state): State<AppState>,
    _user: AuthenticatedUser,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    let today = Utc::now().date_naive();
    let code = QrService::for_date(&state.db, today)
        .await
        .map_err(|e| {
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": e.to_string() })),
            )
        })?
        .ok_or((
            StatusCode::NOT_FOUND,
            Json(json!({ "error": "No QR code issued for today" })),
        ))?;
    Ok(Json(serde_json::to_value(code).unwrap()))
}
