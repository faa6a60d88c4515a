//! Asset lifecycle engine.
//!
//! Every mutating operation that touches more than one table runs inside a
//! single transaction; validation and uniqueness checks run before the
//! transaction opens so rejections are side-effect-free. A concurrent
//! duplicate that races past the pre-checks surfaces as a unique violation at
//! commit and is mapped to a conflict by the error layer, never retried.

use crate::db::schema::{Asset, HoldingAsset};
use crate::error::ApiError;
use at_core::types::{AssetState, AssetStatus, AssetType};
use serde_json::json;
use sqlx::{PgPool, Postgres, Transaction};
use tracing::warn;
use uuid::Uuid;

pub const ASSIGN_REASON: &str = "assigned number and moved from holding";

/// Append an audit record. Callers pass the surrounding transaction so the
/// history row commits or rolls back with the change it describes.
pub async fn insert_history(
    tx: &mut Transaction<'_, Postgres>,
    asset_id: Uuid,
    previous_state: Option<&str>,
    new_state: &str,
    changed_by: Option<Uuid>,
    change_reason: &str,
    details: serde_json::Value,
) -> Result<(), ApiError> {
    sqlx::query(
        "INSERT INTO asset_history
             (id, asset_id, previous_state, new_state, changed_by, change_reason, details)
         VALUES ($1, $2, $3, $4, $5, $6, $7)",
    )
    .bind(Uuid::new_v4())
    .bind(asset_id)
    .bind(previous_state)
    .bind(new_state)
    .bind(changed_by)
    .bind(change_reason)
    .bind(details)
    .execute(&mut **tx)
    .await?;
    Ok(())
}

pub async fn asset_number_taken(db: &PgPool, asset_number: &str) -> Result<bool, ApiError> {
    let taken = sqlx::query_scalar::<_, bool>(
        "SELECT EXISTS (
             SELECT 1 FROM assets WHERE asset_number = $1 AND deleted_at IS NULL
         )",
    )
    .bind(asset_number)
    .fetch_one(db)
    .await?;
    Ok(taken)
}

pub async fn serial_number_taken(db: &PgPool, serial_number: &str) -> Result<bool, ApiError> {
    let taken = sqlx::query_scalar::<_, bool>(
        "SELECT EXISTS (
             SELECT 1 FROM assets WHERE serial_number = $1 AND deleted_at IS NULL
         )",
    )
    .bind(serial_number)
    .fetch_one(db)
    .await?;
    Ok(taken)
}

/// Promote a holding record to a full asset.
///
/// Inserts the asset (reusing the holding row's id and descriptive fields),
/// appends the first history record, and removes the holding row, all in one
/// transaction.
pub async fn assign_holding_asset(
    db: &PgPool,
    holding_asset_id: Uuid,
    asset_number: &str,
    user_id: Uuid,
    asset_type: &str,
) -> Result<Asset, ApiError> {
    let asset_type = asset_type
        .parse::<AssetType>()
        .map_err(ApiError::Validation)?;

    let asset_number = asset_number.trim();
    if asset_number.is_empty() {
        return Err(ApiError::Validation("asset number must not be empty".to_string()));
    }

    let holding = sqlx::query_as::<_, HoldingAsset>(
        "SELECT * FROM holding_assets WHERE id = $1",
    )
    .bind(holding_asset_id)
    .fetch_optional(db)
    .await?
    .ok_or_else(|| ApiError::NotFound("holding asset not found".to_string()))?;

    if asset_number_taken(db, asset_number).await? {
        return Err(ApiError::Conflict(format!(
            "an asset with asset number {} already exists",
            asset_number
        )));
    }
    if serial_number_taken(db, &holding.serial_number).await? {
        return Err(ApiError::Conflict(format!(
            "an asset with serial number {} already exists",
            holding.serial_number
        )));
    }

    let mut tx = db.begin().await?;

    let asset = sqlx::query_as::<_, Asset>(
        "INSERT INTO assets
             (id, asset_number, asset_type, state, status, serial_number, description,
              purchase_price, purchase_date, location_id, assignment_type,
              assigned_to, employee_id, department, created_at, updated_at)
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, NOW(), NOW())
         RETURNING *",
    )
    .bind(holding.id)
    .bind(asset_number)
    .bind(asset_type.as_str())
    .bind(AssetState::Available.as_str())
    .bind(AssetStatus::Stock.as_str())
    .bind(&holding.serial_number)
    .bind(&holding.description)
    .bind(holding.purchase_price)
    .bind(holding.purchase_date)
    .bind(holding.location_id)
    .bind(&holding.assignment_type)
    .bind(&holding.assigned_to)
    .bind(&holding.employee_id)
    .bind(&holding.department)
    .fetch_one(&mut *tx)
    .await?;

    insert_history(
        &mut tx,
        asset.id,
        None,
        AssetState::Available.as_str(),
        Some(user_id),
        ASSIGN_REASON,
        json!({
            "asset_number": asset_number,
            "description": holding.description,
            "serial_number": holding.serial_number,
            "type": asset_type.as_str(),
        }),
    )
    .await?;

    sqlx::query("DELETE FROM holding_assets WHERE id = $1")
        .bind(holding.id)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;

    // defensive re-check; the transaction's own delete is authoritative
    let still_there = sqlx::query_scalar::<_, bool>(
        "SELECT EXISTS (SELECT 1 FROM holding_assets WHERE id = $1)",
    )
    .bind(holding.id)
    .fetch_one(db)
    .await?;
    if still_there {
        warn!(holding_asset_id = %holding.id, "holding asset still present after assignment");
    }

    Ok(asset)
}

/// Move an asset to a new lifecycle state, appending the audit record in the
/// same transaction. Illegal transitions are rejected before any write.
pub async fn change_state(
    db: &PgPool,
    asset_id: Uuid,
    new_state: &str,
    changed_by: Option<Uuid>,
    reason: Option<&str>,
) -> Result<Asset, ApiError> {
    let new_state = new_state
        .parse::<AssetState>()
        .map_err(ApiError::Validation)?;

    let asset = fetch_live_asset(db, asset_id).await?;
    let current = asset
        .state
        .parse::<AssetState>()
        .map_err(|e| ApiError::Validation(format!("stored state is unreadable: {}", e)))?;

    if !current.can_transition_to(new_state) {
        return Err(ApiError::Validation(format!(
            "cannot move asset from {} to {}",
            current, new_state
        )));
    }

    let mut tx = db.begin().await?;

    let updated = sqlx::query_as::<_, Asset>(
        "UPDATE assets SET state = $2, updated_at = NOW() WHERE id = $1 RETURNING *",
    )
    .bind(asset_id)
    .bind(new_state.as_str())
    .fetch_one(&mut *tx)
    .await?;

    insert_history(
        &mut tx,
        asset_id,
        Some(current.as_str()),
        new_state.as_str(),
        changed_by,
        reason.unwrap_or("state changed"),
        json!({
            "asset_number": updated.asset_number,
            "serial_number": updated.serial_number,
        }),
    )
    .await?;

    tx.commit().await?;
    Ok(updated)
}

/// Soft-delete an asset (disposition). The row keeps its values for audit and
/// drops out of every read path.
pub async fn dispose_asset(
    db: &PgPool,
    asset_id: Uuid,
    changed_by: Option<Uuid>,
) -> Result<(), ApiError> {
    let asset = fetch_live_asset(db, asset_id).await?;

    let mut tx = db.begin().await?;

    sqlx::query(
        "UPDATE assets
         SET deleted_at = NOW(), status = $2, updated_at = NOW()
         WHERE id = $1",
    )
    .bind(asset_id)
    .bind(AssetStatus::Recycled.as_str())
    .execute(&mut *tx)
    .await?;

    insert_history(
        &mut tx,
        asset_id,
        Some(asset.state.as_str()),
        asset.state.as_str(),
        changed_by,
        "disposed",
        json!({
            "asset_number": asset.asset_number,
            "serial_number": asset.serial_number,
            "status": AssetStatus::Recycled.as_str(),
        }),
    )
    .await?;

    tx.commit().await?;
    Ok(())
}

pub async fn fetch_live_asset(db: &PgPool, asset_id: Uuid) -> Result<Asset, ApiError> {
    sqlx::query_as::<_, Asset>("SELECT * FROM assets WHERE id = $1 AND deleted_at IS NULL")
        .bind(asset_id)
        .fetch_optional(db)
        .await?
        .ok_or_else(|| ApiError::NotFound("asset not found".to_string()))
}

/// Insert parsed import rows into the holding area as one statement. Any
/// failure aborts the whole batch; there is no partial commit.
pub async fn bulk_insert_holding(
    db: &PgPool,
    rows: &[at_core::ImportedRow],
    location_id: Uuid,
) -> Result<u64, ApiError> {
    if rows.is_empty() {
        return Ok(0);
    }

    let mut qb = sqlx::QueryBuilder::<Postgres>::new(
        "INSERT INTO holding_assets
             (id, asset_type, status, serial_number, description, purchase_price,
              purchase_date, location_id, assignment_type, assigned_to, employee_id, department) ",
    );
    qb.push_values(rows.iter(), |mut b, row| {
        b.push_bind(Uuid::new_v4())
            .push_bind(row.asset_type.as_str())
            .push_bind(AssetStatus::Holding.as_str())
            .push_bind(&row.serial_number)
            .push_bind(&row.description)
            .push_bind(row.purchase_price)
            .push_bind(row.purchase_date)
            .push_bind(location_id)
            .push_bind(row.assignment_type.as_str())
            .push_bind(&row.assigned_to)
            .push_bind(&row.employee_id)
            .push_bind(&row.department);
    });

    let result = qb.build().execute(db).await?;
    Ok(result.rows_affected())
}
