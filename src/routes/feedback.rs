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
        feedback::{CreateFeedbackRequest, RespondFeedbackRequest},
    },
    services::{
        audit::{self, AuditEntry},
        events,
        feedback::FeedbackService,
    },
    AppState,
};

fn internal_error(e: anyhow::Error) -> (StatusCode, Json<Value>) {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({ "error": e.to_string() })),
    )
}

/// POST /feedback — submit feedback; starts pending.
pub async fn create_feedback(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Json(body): Json<CreateFeedbackRequest>,
) -> Result<(StatusCode, Json<Value>), (StatusCode, Json<Value>)> {
    if body.subject.trim().is_empty() || body.message.trim().is_empty() {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "Please fill in all fields" })),
        ));
    }
    if !(1..=5).contains(&body.rating) {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "Rating must be between 1 and 5" })),
        ));
    }

    let feedback = FeedbackService::create(&state.db, &user, &body)
        .await
        .map_err(internal_error)?;

    events::publish(
        state.redis.clone(),
        "feedback.created",
        serde_json::to_value(&feedback).unwrap(),
    );

    Ok((
        StatusCode::CREATED,
        Json(serde_json::to_value(feedback).unwrap()),
    ))
}

/// GET /feedback/mine
pub async fn list_mine(
    State(state): State<AppState>,
    user: AuthenticatedUser,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    FeedbackService::list_for_user(&state.db, user.user_id)
        .await
        .map(|feedback| Json(serde_json::to_value(feedback).unwrap()))
        .map_err(internal_error)
}

/// GET /feedback — admins only
pub async fn list_all(
    State(state): State<AppState>,
    user: AuthenticatedUser,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    require_admin(&user)?;
    FeedbackService::list_all(&state.db)
        .await
        .map(|feedback| Json(serde_json::to_value(feedback).unwrap()))
        .map_err(internal_error)
}

/// POST /feedback/{id}/respond — admins only; resolved or rejected with an
/// optional response text.
pub async fn respond(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<Uuid>,
    Json(body): Json<RespondFeedbackRequest>,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    require_admin(&user)?;

    if !["resolved", "rejected"].contains(&body.status.as_str()) {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "Status must be resolved or rejected" })),
        ));
    }

    let feedback =
        FeedbackService::respond(&state.db, id, &body.status, body.response.as_deref(), &user.email)
            .await
            .map_err(internal_error)?
            .ok_or((
                StatusCode::NOT_FOUND,
                Json(json!({ "error": "Feedback not found" })),
            ))?;

    audit::log(state.db.clone(), AuditEntry {
        user_id:        Some(user.user_id),
        user_email:     Some(user.email.clone()),
        action:         "feedback.respond".to_string(),
        resource_type:  Some("feedback".to_string()),
        resource_id:    Some(feedback.id.to_string()),
        resource_label: Some(format!("{} → {}", feedback.subject, feedback.status)),
    });
    events::publish(
        state.redis.clone(),
        "feedback.updated",
        serde_json::to_value(&feedback).unwrap(),
    );

    Ok(Json(serde_json::to_value(feedback).unwrap()))
}
