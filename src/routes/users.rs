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
        user::{CreateUserRequest, User},
    },
    services::{
        audit::{self, AuditEntry},
        events,
    },
    AppState,
};

/// GET /users — admins only; every account.
pub async fn list_users(
    State(state): State<AppState>,
    user: AuthenticatedUser,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    require_admin(&user)?;

    let users = sqlx::query_as::<_, User>(
        "SELECT id, email, password_hash, name, role, created_by, created_at
         FROM users ORDER BY role, name",
    )
    .fetch_all(&state.db)
    .await
    .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, Json(json!({ "error": e.to_string() }))))?;

    Ok(Json(serde_json::to_value(users).unwrap()))
}

/// POST /users — admins only; creates an account with a bcrypt-hashed
/// password.
pub async fn create_user(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Json(body): Json<CreateUserRequest>,
) -> Result<(StatusCode, Json<Value>), (StatusCode, Json<Value>)> {
    require_admin(&user)?;

    if body.email.trim().is_empty() || body.password.trim().is_empty() || body.name.trim().is_empty()
    {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "Please fill in all fields" })),
        ));
    }

    let role = body.role.as_deref().unwrap_or("user");
    let valid_roles = ["admin", "user"];
    if !valid_roles.contains(&role) {
        return Err((StatusCode::BAD_REQUEST, Json(json!({ "error": "Invalid role" }))));
    }

    let password_hash = bcrypt::hash(&body.password, 12)
        .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, Json(json!({ "error": e.to_string() }))))?;

    let user_id: Uuid = sqlx::query_scalar(
        "INSERT INTO users (email, password_hash, name, role, created_by)
         VALUES ($1, $2, $3, $4, $5)
         RETURNING id",
    )
    .bind(&body.email)
    .bind(&password_hash)
    .bind(&body.name)
    .bind(role)
    .bind(&user.email)
    .fetch_one(&state.db)
    .await
    .map_err(|e| (StatusCode::BAD_REQUEST, Json(json!({ "error": e.to_string() }))))?;

    audit::log(state.db.clone(), AuditEntry {
        user_id:        Some(user.user_id),
        user_email:     Some(user.email.clone()),
        action:         "user.create".to_string(),
        resource_type:  Some("user".to_string()),
        resource_id:    Some(user_id.to_string()),
        resource_label: Some(format!("{} ({})", body.name, body.email)),
    });
    events::publish(
        state.redis.clone(),
        "user.created",
        json!({ "id": user_id, "email": body.email, "name": body.name, "role": role }),
    );

    Ok((StatusCode::CREATED, Json(json!({
        "id": user_id.to_string(),
        "email": body.email,
        "name": body.name,
        "role": role,
    }))))
}

/// DELETE /users/{id} — admins only. Admin accounts cannot be deleted; the
/// check is on the stored role, not an email list. Related attendance,
/// feedback and payment rows are left in place on purpose.
pub async fn delete_user(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(target_id): Path<Uuid>,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    require_admin(&user)?;

    let target: Option<(String, String, String)> = sqlx::query_as(
        "SELECT email, name, role FROM users WHERE id = $1",
    )
    .bind(target_id)
    .fetch_optional(&state.db)
    .await
    .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, Json(json!({ "error": e.to_string() }))))?;

    let (email, name, role) = target.ok_or((
        StatusCode::NOT_FOUND,
        Json(json!({ "error": "User not found" })),
    ))?;

    if role == "admin" {
        return Err((
            StatusCode::FORBIDDEN,
            Json(json!({ "error": "Cannot delete admin users" })),
        ));
    }

    sqlx::query("DELETE FROM users WHERE id = $1")
        .bind(target_id)
        .execute(&state.db)
        .await
        .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, Json(json!({ "error": e.to_string() }))))?;

    audit::log(state.db.clone(), AuditEntry {
        user_id:        Some(user.user_id),
        user_email:     Some(user.email.clone()),
        action:         "user.delete".to_string(),
        resource_type:  Some("user".to_string()),
        resource_id:    Some(target_id.to_string()),
        resource_label: Some(format!("{name} ({email})")),
    });
    events::publish(
        state.redis.clone(),
        "user.deleted",
        json!({ "id": target_id, "email": email }),
    );

    Ok(Json(json!({ "message": "User deleted" })))
}
