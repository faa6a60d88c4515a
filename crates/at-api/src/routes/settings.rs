//! Settings routes.
//!
//! A flat key/value store; the chart-cache TTL override
//! (`chart_cache_ttl_minutes`) lives here and is re-read on each cache miss.

use crate::auth::AdminUser;
use crate::error::ApiError;
use crate::routes::ok;
use crate::AppState;
use axum::{
    extract::{Path, State},
    Json,
};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;

pub async fn get_setting(
    State(state): State<Arc<AppState>>,
    Path(key): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let value = crate::db::setting(&state.db, &key)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("no setting named {}", key)))?;
    Ok(ok(json!({ "key": key, "value": value })))
}

#[derive(Debug, Deserialize)]
pub struct PutSettingRequest {
    pub value: String,
}

pub async fn put_setting(
    State(state): State<Arc<AppState>>,
    _admin: AdminUser,
    Path(key): Path<String>,
    Json(payload): Json<PutSettingRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    if key.trim().is_empty() {
        return Err(ApiError::Validation("setting key must not be empty".to_string()));
    }

    sqlx::query(
        "INSERT INTO settings (key, value) VALUES ($1, $2)
         ON CONFLICT (key) DO UPDATE SET value = EXCLUDED.value, updated_at = NOW()",
    )
    .bind(&key)
    .bind(&payload.value)
    .execute(&state.db)
    .await?;

    Ok(ok(json!({ "key": key, "value": payload.value })))
}
