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
        payment::{SubmitPaymentRequest, VerifyPaymentRequest},
    },
    services::{
        audit::{self, AuditEntry},
        events,
        payments::PaymentService,
    },
    AppState,
};

fn internal_error(e: anyhow::Error) -> (StatusCode, Json<Value>) {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({ "error": e.to_string() })),
    )
}

/// POST /payments — record a payment awaiting verification.
pub async fn submit_payment(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Json(body): Json<SubmitPaymentRequest>,
) -> Result<(StatusCode, Json<Value>), (StatusCode, Json<Value>)> {
    if body.amount <= 0 {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "Amount must be positive" })),
        ));
    }
    if body.transaction_id.trim().is_empty() || body.payment_method.trim().is_empty() {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "Please fill in all fields" })),
        ));
    }

    let payment = PaymentService::submit(&state.db, &user, &body)
        .await
        .map_err(internal_error)?;

    events::publish(
        state.redis.clone(),
        "payment.submitted",
        serde_json::to_value(&payment).unwrap(),
    );

    Ok((
        StatusCode::CREATED,
        Json(serde_json::to_value(payment).unwrap()),
    ))
}

/// GET /payments/mine — caller's payment status and history.
pub async fn list_mine(
    State(state): State<AppState>,
    user: AuthenticatedUser,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    PaymentService::list_for_user(&state.db, user.user_id)
        .await
        .map(|payments| Json(serde_json::to_value(payments).unwrap()))
        .map_err(internal_error)
}

/// GET /payments — admins only
pub async fn list_all(
    State(state): State<AppState>,
    user: AuthenticatedUser,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    require_admin(&user)?;
    PaymentService::list_all(&state.db)
        .await
        .map(|payments| Json(serde_json::to_value(payments).unwrap()))
        .map_err(internal_error)
}

/// POST /payments/{id}/verify — admins only; paid or rejected.
pub async fn verify(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<Uuid>,
    Json(body): Json<VerifyPaymentRequest>,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    require_admin(&user)?;

    if !["paid", "rejected"].contains(&body.status.as_str()) {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "Status must be paid or rejected" })),
        ));
    }

    let payment = PaymentService::verify(&state.db, id, &body.status, &user.email)
        .await
        .map_err(internal_error)?
        .ok_or((
            StatusCode::NOT_FOUND,
            Json(json!({ "error": "Payment not found" })),
        ))?;

    audit::log(state.db.clone(), AuditEntry {
        user_id:        Some(user.user_id),
        user_email:     Some(user.email.clone()),
        action:         "payment.verify".to_string(),
        resource_type:  Some("payment".to_string()),
        resource_id:    Some(payment.id.to_string()),
        resource_label: Some(format!("₹{} {} → {}", payment.amount, payment.month, payment.status)),
    });
    events::publish(
        state.redis.clone(),
        "payment.updated",
        serde_json::to_value(&payment).unwrap(),
    );

    Ok(Json(serde_json::to_value(payment).unwrap()))
}
