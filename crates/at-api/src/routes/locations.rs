//! Location routes.

use crate::auth::AdminUser;
use crate::db::schema::Location;
use crate::error::ApiError;
use crate::models::{CreateNamedEntityRequest, UpdateNamedEntityRequest};
use crate::routes::ok;
use crate::AppState;
use axum::{
    extract::{Path, State},
    Json,
};
use serde_json::json;
use std::sync::Arc;
use uuid::Uuid;

pub async fn list_locations(
    State(state): State<Arc<AppState>>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let locations = sqlx::query_as::<_, Location>("SELECT * FROM locations ORDER BY name")
        .fetch_all(&state.db)
        .await?;
    Ok(ok(locations))
}

pub async fn get_location(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let location = sqlx::query_as::<_, Location>("SELECT * FROM locations WHERE id = $1")
        .bind(id)
        .fetch_optional(&state.db)
        .await?
        .ok_or_else(|| ApiError::NotFound("location not found".to_string()))?;
    Ok(ok(location))
}

pub async fn create_location(
    State(state): State<Arc<AppState>>,
    _admin: AdminUser,
    Json(payload): Json<CreateNamedEntityRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let name = payload.name.trim();
    if name.is_empty() {
        return Err(ApiError::Validation("name must not be empty".to_string()));
    }

    let taken = sqlx::query_scalar::<_, bool>(
        "SELECT EXISTS (SELECT 1 FROM locations WHERE name = $1)",
    )
    .bind(name)
    .fetch_one(&state.db)
    .await?;
    if taken {
        return Err(ApiError::Conflict(format!(
            "a location named {} already exists",
            name
        )));
    }

    let location = sqlx::query_as::<_, Location>(
        "INSERT INTO locations (id, name, description) VALUES ($1, $2, $3) RETURNING *",
    )
    .bind(Uuid::new_v4())
    .bind(name)
    .bind(payload.description.as_deref().unwrap_or(""))
    .fetch_one(&state.db)
    .await?;

    Ok(ok(location))
}

pub async fn update_location(
    State(state): State<Arc<AppState>>,
    _admin: AdminUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateNamedEntityRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let current = sqlx::query_as::<_, Location>("SELECT * FROM locations WHERE id = $1")
        .bind(id)
        .fetch_optional(&state.db)
        .await?
        .ok_or_else(|| ApiError::NotFound("location not found".to_string()))?;

    let location = sqlx::query_as::<_, Location>(
        "UPDATE locations SET name = $2, description = $3, is_active = $4, updated_at = NOW()
         WHERE id = $1
         RETURNING *",
    )
    .bind(id)
    .bind(payload.name.as_deref().unwrap_or(&current.name))
    .bind(payload.description.as_deref().unwrap_or(&current.description))
    .bind(payload.is_active.unwrap_or(current.is_active))
    .fetch_one(&state.db)
    .await?;

    Ok(ok(location))
}

/// Locations are referenced by assets and users; delete deactivates only.
pub async fn deactivate_location(
    State(state): State<Arc<AppState>>,
    _admin: AdminUser,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let result = sqlx::query(
        "UPDATE locations SET is_active = FALSE, updated_at = NOW() WHERE id = $1",
    )
    .bind(id)
    .execute(&state.db)
    .await?;

    if result.rows_affected() == 0 {
        return Err(ApiError::NotFound("location not found".to_string()));
    }
    Ok(ok(json!({ "deactivated": id })))
}
