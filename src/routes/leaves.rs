use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde_json::{json, Value};
use uuid::Uuid;

use crate::{
    middleware::auth::require_admin,
    models::{
        auth::AuthenticatedUser,
        leave::{CreateLeaveRequest, RespondLeaveRequest},
    },
    services::{
        audit::{self, AuditEntry},
        events,
        leaves::LeaveService,
    },
    AppState,
};

fn internal_error(e: anyhow::Error) -> (StatusCode, Json<Value>) {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({ "error": e.to_string() })),
    )
}

/// POST /leaves — submit a leave request; starts pending.
pub async fn create_leave(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Json(body): Json<CreateLeaveRequest>,
) -> Result<(StatusCode, Json<Value>), (StatusCode, Json<Value>)> {
    if body.meal_type.trim().is_empty() || body.reason.trim().is_empty() {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "Please fill in all fields" })),
        ));
    }
    if body.end_date < body.start_date {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "End date must not precede start date" })),
        ));
    }

    let leave = LeaveService::create(&state.db, &user, &body)
        .await
        .map_err(internal_error)?;

    events::publish(
        state.redis.clone(),
        "leave.created",
        serde_json::to_value(&leave).unwrap(),
    );

    Ok((StatusCode::CREATED, Json(serde_json::to_value(leave).unwrap())))
}

/// GET /leaves/mine
pub async fn list_mine(
    State(state): State<AppState>,
    user: AuthenticatedUser,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    LeaveService::list_for_user(&state.db, user.user_id)
        .await
        .map(|leaves| Json(serde_json::to_value(leaves).unwrap()))
        .map_err(internal_error)
}

/// GET /leaves — admins only
pub async fn list_all(
    State(state): State<AppState>,
    user: AuthenticatedUser,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    require_admin(&user)?;
    LeaveService::list_all(&state.db)
        .await
        .map(|leaves| Json(serde_json::to_value(leaves).unwrap()))
        .map_err(internal_error)
}

/// POST /leaves/{id}/respond — admins only; approved or rejected.
pub async fn respond(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<Uuid>,
    Json(body): Json<RespondLeaveRequest>,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    require_admin(&user)?;

    if !["approved", "rejected"].contains(&body.status.as_str()) {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "Status must be approved or rejected" })),
        ));
    }

    let leave = LeaveService::respond(&state.db, id, &body.status, &user.email)
        .await
        .map_err(internal_error)?
        .ok_or((
            StatusCode::NOT_FOUND,
            Json(json!({ "error": "Leave request not found" })),
        ))?;

    audit::log(state.db.clone(), AuditEntry {
        user_id:        Some(user.user_id),
        user_email:     Some(user.email.clone()),
        action:         "leave.respond".to_string(),
        resource_type:  Some("leave_request".to_string()),
        resource_id:    Some(leave.id.to_string()),
        resource_label: Some(format!("{} → {}", leave.user_email, leave.status)),
    });
    events::publish(
        state.redis.clone(),
        "leave.updated",
        serde_json::to_value(&leave).unwrap(),
    );

    Ok(Json(serde_json::to_value(leave).unwrap()))
}
