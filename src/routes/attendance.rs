use axum::{
    body::Body,
    extract::State,
    http::{header, StatusCode},
    response::Response,
    Json,
};
use chrono::Utc;
use serde_json::{json, Value};

use crate::{
    middleware::auth::require_admin,
    models::{attendance::ScanRequest, auth::AuthenticatedUser},
    services::{attendance::AttendanceService, events, export, qr::QrService},
    AppState,
};

fn internal_error(e: anyhow::Error) -> (StatusCode, Json<Value>) {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({ "error": e.to_string() })),
    )
}

/// POST /attendance/scan — mark today's meal for the caller.
///
/// The scanned payload must match today's issued code; the unique
/// (user, date) key decides duplicates, not a read-then-write check.
pub async fn scan(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Json(body): Json<ScanRequest>,
) -> Result<(StatusCode, Json<Value>), (StatusCode, Json<Value>)> {
    if body.qr_value.trim().is_empty() {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "QR code value is required" })),
        ));
    }

    let today = Utc::now().date_naive();
    let qr = QrService::for_date(&state.db, today)
        .await
        .map_err(internal_error)?
        .ok_or((
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "This QR code is not valid for today" })),
        ))?;

    // Issued codes carry their date; re-check equality with the clock the
    // way the scanner did.
    if qr.date != today || qr.qr_value != body.qr_value {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "This QR code is not valid for today" })),
        ));
    }

    let record = AttendanceService::mark(&state.db, &user, &qr, today)
        .await
        .map_err(internal_error)?
        .ok_or((
            StatusCode::CONFLICT,
            Json(json!({ "error": "You have already marked attendance for today" })),
        ))?;

    events::publish(
        state.redis.clone(),
        "attendance.marked",
        serde_json::to_value(&record).unwrap(),
    );

    Ok((
        StatusCode::CREATED,
        Json(serde_json::to_value(record).unwrap()),
    ))
}

/// GET /attendance/mine — caller's records, newest first.
pub async fn list_mine(
    State(state): State<AppState>,
    user: AuthenticatedUser,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    AttendanceService::list_for_user(&state.db, user.user_id)
        .await
        .map(|records| Json(serde_json::to_value(records).unwrap()))
        .map_err(internal_error)
}

/// GET /attendance/summary — caller's current-cycle stats and bill estimate.
pub async fn summary(
    State(state): State<AppState>,
    user: AuthenticatedUser,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    let today = Utc::now().date_naive();
    AttendanceService::summary(&state.db, user.user_id, today, state.config.meal_rate)
        .await
        .map(|summary| Json(serde_json::to_value(summary).unwrap()))
        .map_err(internal_error)
}

/// GET /attendance — admins only; every record, newest first.
pub async fn list_all(
    State(state): State<AppState>,
    user: AuthenticatedUser,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    require_admin(&user)?;
    AttendanceService::list_all(&state.db)
        .await
        .map(|records| Json(serde_json::to_value(records).unwrap()))
        .map_err(internal_error)
}

/// GET /attendance/export — admins only; CSV attachment
/// `attendance-data-<date>.csv` with columns Date,Time,Email,MealType.
pub async fn export_csv(
    State(state): State<AppState>,
    user: AuthenticatedUser,
) -> Result<Response, (StatusCode, Json<Value>)> {
    require_admin(&user)?;

    let records = AttendanceService::list_all(&state.db)
        .await
        .map_err(internal_error)?;
    if records.is_empty() {
        return Err((
            StatusCode::NOT_FOUND,
            Json(json!({ "error": "No attendance data to export" })),
        ));
    }

    let csv = export::attendance_csv(&records).map_err(internal_error)?;
    let filename = export::export_filename(Utc::now().date_naive());

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, "text/csv; charset=utf-8")
        .header(
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{filename}\""),
        )
        .body(Body::from(csv))
        .map_err(|e| {
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": e.to_string() })),
            )
        })
}
