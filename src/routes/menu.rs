use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde_json::{json, Value};
use uuid::Uuid;

use crate::{
    middleware::auth::require_admin,
    models::{auth::AuthenticatedUser, menu::MenuItemRequest},
    services::{
        audit::{self, AuditEntry},
        events,
        menu::{MenuService, MEAL_TYPES, WEEK_DAYS},
    },
    AppState,
};

fn validate(body: &MenuItemRequest) -> Result<(), (StatusCode, Json<Value>)> {
    if body.day.trim().is_empty() || body.meal_type.trim().is_empty() || body.items.trim().is_empty()
    {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "Please fill in all fields" })),
        ));
    }
    if !WEEK_DAYS.contains(&body.day.as_str()) {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "Invalid day" })),
        ));
    }
    if !MEAL_TYPES.contains(&body.meal_type.as_str()) {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "Invalid meal type" })),
        ));
    }
    Ok(())
}

/// GET /menu — all authenticated users
pub async fn list_menu(
    State(state): State<AppState>,
    _user: AuthenticatedUser,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    MenuService::list(&state.db)
        .await
        .map(|entries| Json(serde_json::to_value(entries).unwrap()))
        .map_err(|e| {
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": e.to_string() })),
            )
        })
}

/// POST /menu — admins only
pub async fn create_menu_item(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Json(body): Json<MenuItemRequest>,
) -> Result<(StatusCode, Json<Value>), (StatusCode, Json<Value>)> {
    require_admin(&user)?;
    validate(&body)?;

    let entry = MenuService::create(&state.db, &body, &user.email)
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
        action:         "menu.create".to_string(),
        resource_type:  Some("menu_item".to_string()),
        resource_id:    Some(entry.id.to_string()),
        resource_label: Some(format!("{} {}", entry.day, entry.meal_type)),
    });
    events::publish(
        state.redis.clone(),
        "menu.created",
        serde_json::to_value(&entry).unwrap(),
    );

    Ok((StatusCode::CREATED, Json(serde_json::to_value(entry).unwrap())))
}

/// PUT /menu/{id} — admins only, full-record update
pub async fn update_menu_item(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<Uuid>,
    Json(body): Json<MenuItemRequest>,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    require_admin(&user)?;
    validate(&body)?;

    let entry = MenuService::update(&state.db, id, &body)
        .await
        .map_err(|e| {
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": e.to_string() })),
            )
        })?
        .ok_or((
            StatusCode::NOT_FOUND,
            Json(json!({ "error": "Menu item not found" })),
        ))?;

    audit::log(state.db.clone(), AuditEntry {
        user_id:        Some(user.user_id),
        user_email:     Some(user.email.clone()),
        action:         "menu.update".to_string(),
        resource_type:  Some("menu_item".to_string()),
        resource_id:    Some(entry.id.to_string()),
        resource_label: Some(format!("{} {}", entry.day, entry.meal_type)),
    });
    events::publish(
        state.redis.clone(),
        "menu.updated",
        serde_json::to_value(&entry).unwrap(),
    );

    Ok(Json(serde_json::to_value(entry).unwrap()))
}

/// DELETE /menu/{id} — admins only
pub async fn delete_menu_item(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    require_admin(&user)?;

    let deleted = MenuService::delete(&state.db, id).await.map_err(|e| {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": e.to_string() })),
        )
    })?;
    if !deleted {
        return Err((
            StatusCode::NOT_FOUND,
            Json(json!({ "error": "Menu item not found" })),
        ));
    }

    audit::log(state.db.clone(), AuditEntry {
        user_id:        Some(user.user_id),
        user_email:     Some(user.email.clone()),
        action:         "menu.delete".to_string(),
        resource_type:  Some("menu_item".to_string()),
        resource_id:    Some(id.to_string()),
        resource_label: None,
    });
    events::publish(state.redis.clone(), "menu.deleted", json!({ "id": id }));

    Ok(Json(json!({ "message": "Menu item deleted" })))
}
