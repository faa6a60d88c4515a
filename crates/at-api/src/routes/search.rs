//! Global search across assets, users, and locations.

use crate::db::schema::{Asset, Location, User};
use crate::error::ApiError;
use crate::routes::ok;
use crate::AppState;
use axum::{
    extract::{Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

const RESULT_CAP: i64 = 25;

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub q: String,
}

#[derive(Serialize)]
pub struct SearchResponse {
    pub assets: Vec<Asset>,
    pub users: Vec<User>,
    pub locations: Vec<Location>,
}

/// Case-insensitive partial match on the key text fields of each entity.
pub async fn search(
    State(state): State<Arc<AppState>>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let term = query.q.trim();
    if term.is_empty() {
        return Err(ApiError::Validation("search term must not be empty".to_string()));
    }
    // escape LIKE metacharacters so "100%" finds literal text
    let pattern = format!(
        "%{}%",
        term.replace('\\', "\\\\").replace('%', "\\%").replace('_', "\\_")
    );

    let assets = sqlx::query_as::<_, Asset>(
        "SELECT * FROM assets
         WHERE deleted_at IS NULL
           AND (asset_number ILIKE $1 OR serial_number ILIKE $1
                OR description ILIKE $1 OR assigned_to ILIKE $1)
         ORDER BY created_at DESC
         LIMIT $2",
    )
    .bind(&pattern)
    .bind(RESULT_CAP)
    .fetch_all(&state.db)
    .await?;

    let users = sqlx::query_as::<_, User>(
        "SELECT * FROM users
         WHERE is_active = TRUE
           AND (name ILIKE $1 OR email ILIKE $1 OR employee_id ILIKE $1)
         ORDER BY name
         LIMIT $2",
    )
    .bind(&pattern)
    .bind(RESULT_CAP)
    .fetch_all(&state.db)
    .await?;

    let locations = sqlx::query_as::<_, Location>(
        "SELECT * FROM locations
         WHERE is_active = TRUE AND (name ILIKE $1 OR description ILIKE $1)
         ORDER BY name
         LIMIT $2",
    )
    .bind(&pattern)
    .bind(RESULT_CAP)
    .fetch_all(&state.db)
    .await?;

    Ok(ok(SearchResponse { assets, users, locations }))
}
