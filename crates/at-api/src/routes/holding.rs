//! Holding-area routes.

use crate::auth::AuthUser;
use crate::db::schema::HoldingAsset;
use crate::error::ApiError;
use crate::lifecycle;
use crate::models::{AssignHoldingRequest, ListQuery};
use crate::routes::ok;
use crate::AppState;
use axum::{
    extract::{Query, State},
    Json,
};
use serde::Serialize;
use serde_json::json;
use std::sync::Arc;

#[derive(Serialize)]
pub struct HoldingListResponse {
    pub holding_assets: Vec<HoldingAsset>,
    pub total: i64,
}

pub async fn list_holding_assets(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ListQuery>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let (limit, offset) = query.window();

    let holding_assets = sqlx::query_as::<_, HoldingAsset>(
        "SELECT * FROM holding_assets ORDER BY created_at DESC LIMIT $1 OFFSET $2",
    )
    .bind(limit)
    .bind(offset)
    .fetch_all(&state.db)
    .await?;

    let total = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM holding_assets")
        .fetch_one(&state.db)
        .await?;

    Ok(ok(HoldingListResponse { holding_assets, total }))
}

pub async fn assign_holding_asset(
    State(state): State<Arc<AppState>>,
    _user: AuthUser,
    Json(payload): Json<AssignHoldingRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let asset = lifecycle::assign_holding_asset(
        &state.db,
        payload.holding_asset_id,
        &payload.asset_number,
        payload.user_id,
        &payload.asset_type,
    )
    .await?;

    Ok(ok(json!({
        "message": format!("asset {} assigned from holding", payload.asset_number),
        "asset": asset,
    })))
}
