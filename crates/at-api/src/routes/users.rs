//! User management routes.

use crate::auth::{AdminUser, AuthUser};
use crate::db::schema::User;
use crate::error::ApiError;
use crate::models::{CreateUserRequest, ListQuery, UpdateUserRequest};
use crate::routes::ok;
use crate::AppState;
use at_core::Role;
use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Serialize;
use serde_json::json;
use std::str::FromStr;
use std::sync::Arc;
use uuid::Uuid;

#[derive(Serialize)]
pub struct UserListResponse {
    pub users: Vec<User>,
    pub total: i64,
}

pub async fn me(user: AuthUser) -> Json<serde_json::Value> {
    ok(json!({
        "id": user.id,
        "name": user.name,
        "email": user.email,
        "role": user.role,
    }))
}

pub async fn list_users(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ListQuery>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let (limit, offset) = query.window();

    let users = sqlx::query_as::<_, User>(
        "SELECT * FROM users ORDER BY name LIMIT $1 OFFSET $2",
    )
    .bind(limit)
    .bind(offset)
    .fetch_all(&state.db)
    .await?;

    let total = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM users")
        .fetch_one(&state.db)
        .await?;

    Ok(ok(UserListResponse { users, total }))
}

pub async fn get_user(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
        .bind(id)
        .fetch_optional(&state.db)
        .await?
        .ok_or_else(|| ApiError::NotFound("user not found".to_string()))?;
    Ok(ok(user))
}

/// Next employee id in the `EMP#####` sequence. Ids are issued monotonically;
/// gaps from deactivated accounts are never reused.
async fn next_employee_id(db: &sqlx::PgPool) -> Result<String, ApiError> {
    let latest = sqlx::query_scalar::<_, String>(
        "SELECT employee_id FROM users
         WHERE employee_id LIKE 'EMP%'
         ORDER BY employee_id DESC
         LIMIT 1",
    )
    .fetch_optional(db)
    .await?;

    let next = latest
        .as_deref()
        .and_then(|id| id.strip_prefix("EMP"))
        .and_then(|n| n.parse::<u32>().ok())
        .map(|n| n + 1)
        .unwrap_or(1);
    Ok(format!("EMP{:05}", next))
}

pub async fn create_user(
    State(state): State<Arc<AppState>>,
    _admin: AdminUser,
    Json(payload): Json<CreateUserRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let email = payload.email.trim().to_ascii_lowercase();
    if email.is_empty() || !email.contains('@') {
        return Err(ApiError::Validation("a valid email is required".to_string()));
    }
    let role = payload
        .role
        .as_deref()
        .map(Role::from_str)
        .transpose()
        .map_err(ApiError::Validation)?
        .unwrap_or(Role::User);

    let taken = sqlx::query_scalar::<_, bool>(
        "SELECT EXISTS (SELECT 1 FROM users WHERE email = $1)",
    )
    .bind(&email)
    .fetch_one(&state.db)
    .await?;
    if taken {
        return Err(ApiError::Conflict(format!(
            "a user with email {} already exists",
            email
        )));
    }

    let employee_id = match payload.employee_id {
        Some(id) => id,
        None => next_employee_id(&state.db).await?,
    };

    let user = sqlx::query_as::<_, User>(
        "INSERT INTO users
             (id, name, email, role, department, department_id, location_id, employee_id)
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
         RETURNING *",
    )
    .bind(Uuid::new_v4())
    .bind(payload.name.trim())
    .bind(&email)
    .bind(role.as_str())
    .bind(payload.department.as_deref().unwrap_or(""))
    .bind(payload.department_id)
    .bind(payload.location_id)
    .bind(&employee_id)
    .fetch_one(&state.db)
    .await?;

    Ok(ok(user))
}

pub async fn update_user(
    State(state): State<Arc<AppState>>,
    _admin: AdminUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateUserRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let current = sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
        .bind(id)
        .fetch_optional(&state.db)
        .await?
        .ok_or_else(|| ApiError::NotFound("user not found".to_string()))?;

    let role = payload
        .role
        .as_deref()
        .map(Role::from_str)
        .transpose()
        .map_err(ApiError::Validation)?;

    let user = sqlx::query_as::<_, User>(
        "UPDATE users SET
             name = $2, role = $3, department = $4, department_id = $5,
             location_id = $6, is_active = $7, updated_at = NOW()
         WHERE id = $1
         RETURNING *",
    )
    .bind(id)
    .bind(payload.name.as_deref().unwrap_or(&current.name))
    .bind(role.map(|r| r.as_str()).unwrap_or(&current.role))
    .bind(payload.department.as_deref().unwrap_or(&current.department))
    .bind(payload.department_id.or(current.department_id))
    .bind(payload.location_id.or(current.location_id))
    .bind(payload.is_active.unwrap_or(current.is_active))
    .fetch_one(&state.db)
    .await?;

    Ok(ok(user))
}

/// Accounts are deactivated, never deleted; history rows keep their author.
pub async fn deactivate_user(
    State(state): State<Arc<AppState>>,
    _admin: AdminUser,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let result = sqlx::query(
        "UPDATE users SET is_active = FALSE, updated_at = NOW() WHERE id = $1",
    )
    .bind(id)
    .execute(&state.db)
    .await?;

    if result.rows_affected() == 0 {
        return Err(ApiError::NotFound("user not found".to_string()));
    }
    Ok(ok(json!({ "deactivated": id })))
}
