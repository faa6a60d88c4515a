//! Reporting routes: aggregate counts, depreciation projections, and the
//! cached inventory chart.
//!
//! Breakdowns are zero-filled: every enumerated category appears even when no
//! rows match, so callers never have to infer absent categories.

use crate::error::ApiError;
use crate::routes::ok;
use crate::AppState;
use at_core::chart::{render_inventory_chart, TypeCount};
use at_core::depreciation::{depreciation_schedule, DepreciationMethod};
use at_core::types::{AssetState, AssetType};
use axum::{
    body::Body,
    extract::{Query, State},
    http::{header, StatusCode},
    response::Response,
    Json,
};
use chrono::Datelike;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;

const DEFAULT_CHART_TTL_MINUTES: i64 = 30;
const CHART_TTL_SETTING: &str = "chart_cache_ttl_minutes";

#[derive(Debug, Clone, Serialize)]
pub struct TypeCountEntry {
    #[serde(rename = "type")]
    pub asset_type: String,
    pub count: i64,
}

/// Counts per asset type over non-deleted rows, optionally restricted to one
/// lifecycle state. Types with no matching rows are included with count 0.
pub async fn type_counts(
    db: &sqlx::PgPool,
    state_filter: Option<&str>,
) -> Result<Vec<TypeCountEntry>, ApiError> {
    let rows: Vec<(String, i64)> = match state_filter {
        Some(state) => {
            sqlx::query_as(
                "SELECT asset_type, COUNT(*) FROM assets
                 WHERE deleted_at IS NULL AND state = $1
                 GROUP BY asset_type",
            )
            .bind(state)
            .fetch_all(db)
            .await?
        }
        None => {
            sqlx::query_as(
                "SELECT asset_type, COUNT(*) FROM assets
                 WHERE deleted_at IS NULL
                 GROUP BY asset_type",
            )
            .fetch_all(db)
            .await?
        }
    };

    let by_type: HashMap<String, i64> = rows.into_iter().collect();
    Ok(AssetType::ALL
        .iter()
        .map(|t| TypeCountEntry {
            asset_type: t.as_str().to_string(),
            count: by_type.get(t.as_str()).copied().unwrap_or(0),
        })
        .collect())
}

pub async fn assets_by_type(
    State(state): State<Arc<AppState>>,
) -> Result<Json<serde_json::Value>, ApiError> {
    Ok(ok(type_counts(&state.db, None).await?))
}

#[derive(Serialize)]
pub struct StateCountEntry {
    pub state: String,
    pub count: i64,
}

pub async fn assets_by_state(
    State(state): State<Arc<AppState>>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let rows: Vec<(String, i64)> = sqlx::query_as(
        "SELECT state, COUNT(*) FROM assets WHERE deleted_at IS NULL GROUP BY state",
    )
    .fetch_all(&state.db)
    .await?;
    let by_state: HashMap<String, i64> = rows.into_iter().collect();

    let counts: Vec<StateCountEntry> = AssetState::ALL
        .iter()
        .map(|s| StateCountEntry {
            state: s.as_str().to_string(),
            count: by_state.get(s.as_str()).copied().unwrap_or(0),
        })
        .collect();
    Ok(ok(counts))
}

#[derive(Serialize)]
pub struct YearCountEntry {
    pub year: i32,
    pub count: i64,
}

pub async fn assets_by_year(
    State(state): State<Arc<AppState>>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let rows: Vec<(f64, i64)> = sqlx::query_as(
        "SELECT EXTRACT(YEAR FROM created_at)::float8 AS year, COUNT(*)
         FROM assets WHERE deleted_at IS NULL
         GROUP BY year ORDER BY year",
    )
    .fetch_all(&state.db)
    .await?;

    let counts: Vec<YearCountEntry> = rows
        .into_iter()
        .map(|(year, count)| YearCountEntry { year: year as i32, count })
        .collect();
    Ok(ok(counts))
}

#[derive(Debug, Deserialize)]
pub struct StateBreakdownQuery {
    pub state: String,
}

pub async fn state_breakdown(
    State(state): State<Arc<AppState>>,
    Query(query): Query<StateBreakdownQuery>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let lifecycle_state = query
        .state
        .parse::<AssetState>()
        .map_err(ApiError::Validation)?;
    Ok(ok(
        type_counts(&state.db, Some(lifecycle_state.as_str())).await?,
    ))
}

#[derive(Debug, Deserialize)]
pub struct DepreciationQuery {
    pub method: Option<String>,
    pub years: Option<u32>,
    pub from: Option<i32>,
    pub to: Option<i32>,
    /// Comma-separated yearly percents for the declining method.
    pub percents: Option<String>,
}

#[derive(Serialize)]
pub struct DepreciationEntry {
    pub asset_number: Option<String>,
    pub serial_number: String,
    pub purchase_price: f64,
    pub purchase_year: i32,
    pub values: Vec<YearValue>,
}

#[derive(Serialize)]
pub struct YearValue {
    pub year: i32,
    pub value: f64,
}

const DEFAULT_DECLINING_PERCENTS: [f64; 4] = [50.0, 25.0, 12.5, 12.5];

pub async fn depreciation_report(
    State(state): State<Arc<AppState>>,
    Query(query): Query<DepreciationQuery>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let method = query
        .method
        .as_deref()
        .unwrap_or("straight")
        .parse::<DepreciationMethod>()
        .map_err(ApiError::Validation)?;
    let years = query.years.unwrap_or(4);
    if years == 0 || years > 50 {
        return Err(ApiError::Validation("years must be between 1 and 50".to_string()));
    }
    let current_year = chrono::Utc::now().year();
    let from = query.from.unwrap_or(current_year);
    let to = query.to.unwrap_or(current_year + years as i32);
    if to < from {
        return Err(ApiError::Validation("'to' must not precede 'from'".to_string()));
    }

    let percents: Vec<f64> = match query.percents.as_deref() {
        Some(raw) => raw
            .split(',')
            .map(|p| {
                p.trim()
                    .parse::<f64>()
                    .map_err(|_| ApiError::Validation(format!("bad percent value: {}", p)))
            })
            .collect::<Result<_, _>>()?,
        None => DEFAULT_DECLINING_PERCENTS.to_vec(),
    };

    let rows: Vec<(Option<String>, String, f64, Option<chrono::NaiveDate>, chrono::DateTime<chrono::Utc>)> =
        sqlx::query_as(
            "SELECT asset_number, serial_number, purchase_price, purchase_date, created_at
             FROM assets WHERE deleted_at IS NULL
             ORDER BY asset_number NULLS LAST",
        )
        .fetch_all(&state.db)
        .await?;

    let report: Vec<DepreciationEntry> = rows
        .into_iter()
        .map(|(asset_number, serial_number, purchase_price, purchase_date, created_at)| {
            let purchase_year = purchase_date
                .map(|d| d.year())
                .unwrap_or_else(|| created_at.year());
            let values = depreciation_schedule(
                purchase_price,
                purchase_year,
                from,
                to,
                method,
                years,
                &percents,
            )
            .into_iter()
            .map(|(year, value)| YearValue { year, value })
            .collect();
            DepreciationEntry {
                asset_number,
                serial_number,
                purchase_price,
                purchase_year,
                values,
            }
        })
        .collect();

    Ok(ok(report))
}

async fn chart_ttl(state: &AppState) -> chrono::Duration {
    let minutes = match crate::db::setting(&state.db, CHART_TTL_SETTING).await {
        Ok(Some(value)) => value.parse::<i64>().unwrap_or(DEFAULT_CHART_TTL_MINUTES),
        _ => DEFAULT_CHART_TTL_MINUTES,
    };
    chrono::Duration::minutes(minutes.max(1))
}

pub async fn inventory_chart(
    State(state): State<Arc<AppState>>,
) -> Result<Response, ApiError> {
    let ttl = chart_ttl(&state).await;

    let db = state.db.clone();
    let png = state
        .chart_cache
        .get_or_render(ttl, || async move {
            let counts = type_counts(&db, None).await?;
            let bars: Vec<TypeCount> = counts
                .into_iter()
                .map(|c| TypeCount { label: c.asset_type, count: c.count })
                .collect();
            Ok(render_inventory_chart(&bars)?)
        })
        .await?;

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, "image/png")
        .header(
            header::CACHE_CONTROL,
            format!("public, max-age={}", ttl.num_seconds()),
        )
        .body(Body::from(png))
        .map_err(|e| ApiError::Validation(format!("failed to build chart response: {}", e)))
}
