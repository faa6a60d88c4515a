//! Database schema types
//!
//! Enum-valued columns are TEXT in the store and `String` here; the domain
//! enums in `at_core::types` are applied at the edges that need semantics
//! (transition checks, zero-filled breakdowns).

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Asset {
    pub id: Uuid,
    pub asset_number: Option<String>,
    pub asset_type: String,
    pub state: String,
    pub status: String,
    pub serial_number: String,
    pub description: String,
    pub purchase_price: f64,
    pub purchase_date: Option<NaiveDate>,
    pub location_id: Option<Uuid>,
    pub assignment_type: String,
    pub assigned_to: Option<String>,
    pub employee_id: Option<String>,
    pub department: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

/// Denormalized assignee columns, exposed through one accessor so a future
/// normalization onto the users table has a single seam to cut.
#[derive(Debug, Clone, Serialize)]
pub struct Assignee {
    pub assigned_to: Option<String>,
    pub employee_id: Option<String>,
    pub department: Option<String>,
}

impl Asset {
    pub fn assignee(&self) -> Assignee {
        Assignee {
            assigned_to: self.assigned_to.clone(),
            employee_id: self.employee_id.clone(),
            department: self.department.clone(),
        }
    }
}

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct HoldingAsset {
    pub id: Uuid,
    pub asset_type: String,
    pub status: String,
    pub serial_number: String,
    pub description: String,
    pub purchase_price: f64,
    pub purchase_date: Option<NaiveDate>,
    pub location_id: Option<Uuid>,
    pub assignment_type: String,
    pub assigned_to: Option<String>,
    pub employee_id: Option<String>,
    pub department: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct AssetHistory {
    pub id: Uuid,
    pub asset_id: Uuid,
    pub previous_state: Option<String>,
    pub new_state: String,
    pub changed_by: Option<Uuid>,
    pub change_reason: String,
    pub details: serde_json::Value,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub role: String,
    pub department: String,
    pub department_id: Option<Uuid>,
    pub location_id: Option<Uuid>,
    pub employee_id: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Location {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Department {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
