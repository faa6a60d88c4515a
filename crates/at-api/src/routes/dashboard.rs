//! Dashboard aggregates.

use crate::error::ApiError;
use crate::routes::ok;
use crate::routes::reports::type_counts;
use crate::AppState;
use axum::{extract::State, Json};
use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;
use std::sync::Arc;
use uuid::Uuid;

#[derive(Serialize, FromRow)]
pub struct RecentActivity {
    pub id: Uuid,
    pub asset_id: Uuid,
    pub asset_number: Option<String>,
    pub previous_state: Option<String>,
    pub new_state: String,
    pub changed_by_name: String,
    pub change_reason: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Serialize)]
pub struct DashboardResponse {
    pub total_assets: i64,
    pub holding_assets: i64,
    pub active_users: i64,
    pub assets_by_type: Vec<crate::routes::reports::TypeCountEntry>,
    pub recent_activity: Vec<RecentActivity>,
}

pub async fn get_dashboard(
    State(state): State<Arc<AppState>>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let total_assets = sqlx::query_scalar::<_, i64>(
        "SELECT COUNT(*) FROM assets WHERE deleted_at IS NULL",
    )
    .fetch_one(&state.db)
    .await?;

    let holding_assets = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM holding_assets")
        .fetch_one(&state.db)
        .await?;

    let active_users =
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM users WHERE is_active = TRUE")
            .fetch_one(&state.db)
            .await?;

    let assets_by_type = type_counts(&state.db, None).await?;

    let recent_activity = sqlx::query_as::<_, RecentActivity>(
        "SELECT h.id, h.asset_id, a.asset_number, h.previous_state, h.new_state,
                COALESCE(u.name, 'System') AS changed_by_name,
                h.change_reason, h.created_at
         FROM asset_history h
         JOIN assets a ON a.id = h.asset_id
         LEFT JOIN users u ON u.id = h.changed_by
         ORDER BY h.created_at DESC
         LIMIT 5",
    )
    .fetch_all(&state.db)
    .await?;

    Ok(ok(DashboardResponse {
        total_assets,
        holding_assets,
        active_users,
        assets_by_type,
        recent_activity,
    }))
}
