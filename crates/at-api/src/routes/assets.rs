//! Asset CRUD, state transitions, and export.

use crate::auth::AuthUser;
use crate::db::schema::Asset;
use crate::error::ApiError;
use crate::lifecycle;
use crate::models::{ChangeStateRequest, CreateAssetRequest, ExportRequest, UpdateAssetRequest};
use crate::routes::ok;
use crate::AppState;
use at_core::export::{render_export, ExportFormat, ExportRow};
use at_core::types::{AssetState, AssetStatus, AssetType, AssignmentType};
use axum::{
    body::Body,
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::Response,
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use sqlx::{Postgres, QueryBuilder};
use std::str::FromStr;
use std::sync::Arc;
use uuid::Uuid;

#[derive(Debug, Deserialize)]
pub struct ListAssetsQuery {
    pub page: Option<i64>,
    pub limit: Option<i64>,
    pub asset_type: Option<String>,
    pub state: Option<String>,
    pub status: Option<String>,
    pub location_id: Option<Uuid>,
}

#[derive(Serialize)]
pub struct AssetListResponse {
    pub assets: Vec<Asset>,
    pub total: i64,
}

/// Canonicalized filter values; junk input is a 400, not an empty result.
struct Filters {
    asset_type: Option<&'static str>,
    state: Option<&'static str>,
    status: Option<&'static str>,
    location_id: Option<Uuid>,
}

fn parse_filters(
    asset_type: Option<&str>,
    state: Option<&str>,
    status: Option<&str>,
    location_id: Option<Uuid>,
) -> Result<Filters, ApiError> {
    let asset_type = asset_type
        .map(|s| AssetType::from_str(s).map(|t| t.as_str()))
        .transpose()
        .map_err(ApiError::Validation)?;
    let state = state
        .map(|s| AssetState::from_str(s).map(|t| t.as_str()))
        .transpose()
        .map_err(ApiError::Validation)?;
    let status = status
        .map(|s| AssetStatus::from_str(s).map(|t| t.as_str()))
        .transpose()
        .map_err(ApiError::Validation)?;
    Ok(Filters { asset_type, state, status, location_id })
}

fn push_filters(qb: &mut QueryBuilder<'_, Postgres>, filters: &Filters) {
    if let Some(t) = filters.asset_type {
        qb.push(" AND a.asset_type = ").push_bind(t);
    }
    if let Some(s) = filters.state {
        qb.push(" AND a.state = ").push_bind(s);
    }
    if let Some(s) = filters.status {
        qb.push(" AND a.status = ").push_bind(s);
    }
    if let Some(id) = filters.location_id {
        qb.push(" AND a.location_id = ").push_bind(id);
    }
}

pub async fn list_assets(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ListAssetsQuery>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let filters = parse_filters(
        query.asset_type.as_deref(),
        query.state.as_deref(),
        query.status.as_deref(),
        query.location_id,
    )?;
    let limit = query.limit.unwrap_or(20).clamp(1, 100);
    let offset = (query.page.unwrap_or(1).max(1) - 1) * limit;

    let mut qb = QueryBuilder::<Postgres>::new(
        "SELECT a.* FROM assets a WHERE a.deleted_at IS NULL",
    );
    push_filters(&mut qb, &filters);
    qb.push(" ORDER BY a.created_at DESC LIMIT ")
        .push_bind(limit)
        .push(" OFFSET ")
        .push_bind(offset);
    let assets: Vec<Asset> = qb.build_query_as().fetch_all(&state.db).await?;

    let mut count_qb = QueryBuilder::<Postgres>::new(
        "SELECT COUNT(*) FROM assets a WHERE a.deleted_at IS NULL",
    );
    push_filters(&mut count_qb, &filters);
    let total: i64 = count_qb.build_query_scalar().fetch_one(&state.db).await?;

    Ok(ok(AssetListResponse { assets, total }))
}

pub async fn create_asset(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Json(payload): Json<CreateAssetRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let asset_type = payload
        .asset_type
        .parse::<AssetType>()
        .map_err(ApiError::Validation)?;
    let assignment_type = payload
        .assignment_type
        .as_deref()
        .map(AssignmentType::from_str)
        .transpose()
        .map_err(ApiError::Validation)?
        .unwrap_or(AssignmentType::Individual);

    let serial_number = payload.serial_number.trim().to_string();
    if serial_number.is_empty() {
        return Err(ApiError::Validation("serial number must not be empty".to_string()));
    }
    if lifecycle::serial_number_taken(&state.db, &serial_number).await? {
        return Err(ApiError::Conflict(format!(
            "an asset with serial number {} already exists",
            serial_number
        )));
    }
    if let Some(number) = payload.asset_number.as_deref() {
        if lifecycle::asset_number_taken(&state.db, number).await? {
            return Err(ApiError::Conflict(format!(
                "an asset with asset number {} already exists",
                number
            )));
        }
    }

    let mut tx = state.db.begin().await?;

    let asset = sqlx::query_as::<_, Asset>(
        "INSERT INTO assets
             (id, asset_number, asset_type, state, status, serial_number, description,
              purchase_price, purchase_date, location_id, assignment_type,
              assigned_to, employee_id, department)
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
         RETURNING *",
    )
    .bind(Uuid::new_v4())
    .bind(&payload.asset_number)
    .bind(asset_type.as_str())
    .bind(AssetState::Available.as_str())
    .bind(AssetStatus::Stock.as_str())
    .bind(&serial_number)
    .bind(payload.description.as_deref().unwrap_or(""))
    .bind(payload.purchase_price.unwrap_or(0.0))
    .bind(payload.purchase_date)
    .bind(payload.location_id)
    .bind(assignment_type.as_str())
    .bind(&payload.assigned_to)
    .bind(&payload.employee_id)
    .bind(&payload.department)
    .fetch_one(&mut *tx)
    .await?;

    lifecycle::insert_history(
        &mut tx,
        asset.id,
        None,
        AssetState::Available.as_str(),
        Some(user.id),
        "created",
        json!({
            "asset_number": asset.asset_number,
            "serial_number": asset.serial_number,
            "type": asset.asset_type,
        }),
    )
    .await?;

    tx.commit().await?;
    Ok(ok(asset))
}

#[derive(Serialize)]
pub struct AssetDetailResponse {
    #[serde(flatten)]
    pub asset: Asset,
    pub location_name: Option<String>,
    pub last_edited_by: String,
}

/// Lookup by asset number, or by id when the path segment parses as a UUID.
pub async fn get_asset(
    State(state): State<Arc<AppState>>,
    Path(key): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let asset = if let Ok(id) = key.parse::<Uuid>() {
        sqlx::query_as::<_, Asset>("SELECT * FROM assets WHERE id = $1 AND deleted_at IS NULL")
            .bind(id)
            .fetch_optional(&state.db)
            .await?
    } else {
        sqlx::query_as::<_, Asset>(
            "SELECT * FROM assets WHERE asset_number = $1 AND deleted_at IS NULL",
        )
        .bind(&key)
        .fetch_optional(&state.db)
        .await?
    }
    .ok_or_else(|| ApiError::NotFound("asset not found".to_string()))?;

    let location_name = match asset.location_id {
        Some(id) => {
            sqlx::query_scalar::<_, String>("SELECT name FROM locations WHERE id = $1")
                .bind(id)
                .fetch_optional(&state.db)
                .await?
        }
        None => None,
    };

    let last_edited_by = sqlx::query_scalar::<_, String>(
        "SELECT u.name
         FROM asset_history h
         JOIN users u ON u.id = h.changed_by
         WHERE h.asset_id = $1
         ORDER BY h.created_at DESC
         LIMIT 1",
    )
    .bind(asset.id)
    .fetch_optional(&state.db)
    .await?
    .unwrap_or_else(|| "System".to_string());

    Ok(ok(AssetDetailResponse { asset, location_name, last_edited_by }))
}

pub async fn update_asset(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path(key): Path<String>,
    Json(payload): Json<UpdateAssetRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let id = key
        .parse::<Uuid>()
        .map_err(|_| ApiError::Validation("asset id must be a UUID".to_string()))?;
    let current = lifecycle::fetch_live_asset(&state.db, id).await?;

    if let Some(number) = payload.asset_number.as_deref() {
        if Some(number) != current.asset_number.as_deref()
            && lifecycle::asset_number_taken(&state.db, number).await?
        {
            return Err(ApiError::Conflict(format!(
                "an asset with asset number {} already exists",
                number
            )));
        }
    }

    let status = payload
        .status
        .as_deref()
        .map(AssetStatus::from_str)
        .transpose()
        .map_err(ApiError::Validation)?;
    let assignment_type = payload
        .assignment_type
        .as_deref()
        .map(AssignmentType::from_str)
        .transpose()
        .map_err(ApiError::Validation)?;

    // a state change rides along with the update and gets its audit record
    let state_change = match payload.state.as_deref() {
        Some(raw) => {
            let next = raw.parse::<AssetState>().map_err(ApiError::Validation)?;
            let from = current
                .state
                .parse::<AssetState>()
                .map_err(|e| ApiError::Validation(format!("stored state is unreadable: {}", e)))?;
            if next == from {
                None
            } else if !from.can_transition_to(next) {
                return Err(ApiError::Validation(format!(
                    "cannot move asset from {} to {}",
                    from, next
                )));
            } else {
                Some((from, next))
            }
        }
        None => None,
    };

    let mut tx = state.db.begin().await?;

    let updated = sqlx::query_as::<_, Asset>(
        "UPDATE assets SET
             asset_number = $2,
             description = $3,
             purchase_price = $4,
             purchase_date = $5,
             location_id = $6,
             assignment_type = $7,
             assigned_to = $8,
             employee_id = $9,
             department = $10,
             status = $11,
             state = $12,
             updated_at = NOW()
         WHERE id = $1
         RETURNING *",
    )
    .bind(id)
    .bind(payload.asset_number.as_deref().or(current.asset_number.as_deref()))
    .bind(payload.description.as_deref().unwrap_or(&current.description))
    .bind(payload.purchase_price.unwrap_or(current.purchase_price))
    .bind(payload.purchase_date.or(current.purchase_date))
    .bind(payload.location_id.or(current.location_id))
    .bind(assignment_type.map(|a| a.as_str()).unwrap_or(&current.assignment_type))
    .bind(payload.assigned_to.as_deref().or(current.assigned_to.as_deref()))
    .bind(payload.employee_id.as_deref().or(current.employee_id.as_deref()))
    .bind(payload.department.as_deref().or(current.department.as_deref()))
    .bind(status.map(|s| s.as_str()).unwrap_or(&current.status))
    .bind(state_change.map(|(_, next)| next.as_str()).unwrap_or(&current.state))
    .fetch_one(&mut *tx)
    .await?;

    if let Some((from, next)) = state_change {
        lifecycle::insert_history(
            &mut tx,
            id,
            Some(from.as_str()),
            next.as_str(),
            Some(user.id),
            payload.change_reason.as_deref().unwrap_or("state changed"),
            json!({
                "asset_number": updated.asset_number,
                "serial_number": updated.serial_number,
            }),
        )
        .await?;
    }

    tx.commit().await?;
    Ok(ok(updated))
}

pub async fn dispose_asset(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path(key): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let id = key
        .parse::<Uuid>()
        .map_err(|_| ApiError::Validation("asset id must be a UUID".to_string()))?;
    lifecycle::dispose_asset(&state.db, id, Some(user.id)).await?;
    Ok(ok(json!({ "disposed": id })))
}

pub async fn change_state(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path(key): Path<String>,
    Json(payload): Json<ChangeStateRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let id = key
        .parse::<Uuid>()
        .map_err(|_| ApiError::Validation("asset id must be a UUID".to_string()))?;
    let asset = lifecycle::change_state(
        &state.db,
        id,
        &payload.state,
        Some(user.id),
        payload.reason.as_deref(),
    )
    .await?;
    Ok(ok(asset))
}

#[derive(Debug, sqlx::FromRow)]
struct ExportRecord {
    asset_number: Option<String>,
    asset_type: String,
    state: String,
    status: String,
    serial_number: String,
    description: String,
    purchase_price: f64,
    location_name: Option<String>,
    assigned_to: Option<String>,
    department: Option<String>,
    created_at: chrono::DateTime<chrono::Utc>,
}

pub async fn export_assets(
    State(state): State<Arc<AppState>>,
    _user: AuthUser,
    Json(payload): Json<ExportRequest>,
) -> Result<Response, ApiError> {
    let format = payload
        .format
        .parse::<ExportFormat>()
        .map_err(ApiError::Validation)?;
    let filters = parse_filters(
        payload.filter.asset_type.as_deref(),
        payload.filter.state.as_deref(),
        payload.filter.status.as_deref(),
        payload.filter.location_id,
    )?;

    let mut qb = QueryBuilder::<Postgres>::new(
        "SELECT a.asset_number, a.asset_type, a.state, a.status, a.serial_number,
                a.description, a.purchase_price, l.name AS location_name,
                a.assigned_to, a.department, a.created_at
         FROM assets a
         LEFT JOIN locations l ON l.id = a.location_id
         WHERE a.deleted_at IS NULL",
    );
    push_filters(&mut qb, &filters);
    qb.push(" ORDER BY a.asset_number NULLS LAST, a.created_at");
    let records: Vec<ExportRecord> = qb.build_query_as().fetch_all(&state.db).await?;

    let rows: Vec<ExportRow> = records
        .into_iter()
        .map(|r| ExportRow {
            asset_number: r.asset_number.unwrap_or_default(),
            asset_type: r.asset_type,
            state: r.state,
            status: r.status,
            serial_number: r.serial_number,
            description: r.description,
            purchase_price: r.purchase_price,
            location: r.location_name.unwrap_or_default(),
            assigned_to: r.assigned_to.unwrap_or_default(),
            department: r.department.unwrap_or_default(),
            created_at: r.created_at.date_naive().to_string(),
        })
        .collect();

    let body = render_export(&rows, format)?;
    let filename = format!("asset_export.{}", format.extension());

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, format.content_type())
        .header(
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", filename),
        )
        .body(Body::from(body))
        .map_err(|e| {
            ApiError::Validation(format!("failed to build export response: {}", e))
        })
}
