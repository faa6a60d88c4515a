//! Bulk import route.
//!
//! Accepts a multipart form with `file`, `type` (batch target type) and
//! `format` (csv | xlsx). Parsing skips rows with unknown types; the insert
//! of the surviving rows is a single statement.

use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::lifecycle;
use crate::routes::ok;
use crate::AppState;
use at_core::import::{parse_import, ImportFormat};
use at_core::types::AssetType;
use axum::{
    extract::{Multipart, State},
    Json,
};
use serde_json::json;
use std::sync::Arc;
use tracing::info;

pub async fn import_assets(
    State(state): State<Arc<AppState>>,
    _user: AuthUser,
    mut multipart: Multipart,
) -> Result<Json<serde_json::Value>, ApiError> {
    let mut file_data: Vec<u8> = Vec::new();
    let mut target_type: Option<String> = None;
    let mut format: Option<String> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::Validation(format!("malformed multipart body: {}", e)))?
    {
        match field.name() {
            Some("file") => {
                file_data = field
                    .bytes()
                    .await
                    .map_err(|e| ApiError::Validation(format!("failed to read upload: {}", e)))?
                    .to_vec();
            }
            Some("type") => {
                target_type = Some(field.text().await.map_err(|e| {
                    ApiError::Validation(format!("failed to read type field: {}", e))
                })?);
            }
            Some("format") => {
                format = Some(field.text().await.map_err(|e| {
                    ApiError::Validation(format!("failed to read format field: {}", e))
                })?);
            }
            _ => {}
        }
    }

    if file_data.is_empty() {
        return Err(ApiError::Validation("no file uploaded".to_string()));
    }
    let target_type = target_type
        .as_deref()
        .unwrap_or_default()
        .parse::<AssetType>()
        .map_err(ApiError::Validation)?;
    let format = format
        .as_deref()
        .unwrap_or("csv")
        .parse::<ImportFormat>()
        .map_err(ApiError::Validation)?;

    let today = chrono::Utc::now().date_naive();
    let outcome = parse_import(&file_data, format, target_type, today)?;

    let location_id =
        crate::db::find_or_create_location(&state.db, &state.config.import_location_name).await?;
    let inserted = lifecycle::bulk_insert_holding(&state.db, &outcome.rows, location_id).await?;

    info!(
        inserted,
        skipped = outcome.skipped,
        "bulk import into holding area complete"
    );

    Ok(ok(json!({
        "imported": inserted,
        "skipped": outcome.skipped,
        "rows": outcome.rows,
    })))
}
