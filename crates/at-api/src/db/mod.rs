//! Database row types and small query helpers.

pub mod schema;

use crate::error::ApiError;
use sqlx::PgPool;

/// Read a settings value, if present.
pub async fn setting(db: &PgPool, key: &str) -> Result<Option<String>, ApiError> {
    let value = sqlx::query_scalar::<_, String>("SELECT value FROM settings WHERE key = $1")
        .bind(key)
        .fetch_optional(db)
        .await?;
    Ok(value)
}

/// Find a location by name, creating it when absent. Used to pin bulk
/// imports to the designated fallback location.
pub async fn find_or_create_location(db: &PgPool, name: &str) -> Result<uuid::Uuid, ApiError> {
    if let Some(id) = sqlx::query_scalar::<_, uuid::Uuid>(
        "SELECT id FROM locations WHERE name = $1",
    )
    .bind(name)
    .fetch_optional(db)
    .await?
    {
        return Ok(id);
    }

    let id = uuid::Uuid::new_v4();
    sqlx::query(
        "INSERT INTO locations (id, name, description) VALUES ($1, $2, 'Auto-created import location')
         ON CONFLICT (name) DO NOTHING",
    )
    .bind(id)
    .bind(name)
    .execute(db)
    .await?;

    // re-read in case a concurrent import won the insert
    let id = sqlx::query_scalar::<_, uuid::Uuid>("SELECT id FROM locations WHERE name = $1")
        .bind(name)
        .fetch_one(db)
        .await?;
    Ok(id)
}
