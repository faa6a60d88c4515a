//! Asset request models

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Deserialize)]
pub struct CreateAssetRequest {
    pub asset_number: Option<String>,
    pub asset_type: String,
    pub serial_number: String,
    pub description: Option<String>,
    pub purchase_price: Option<f64>,
    pub purchase_date: Option<NaiveDate>,
    pub location_id: Option<Uuid>,
    pub assignment_type: Option<String>,
    pub assigned_to: Option<String>,
    pub employee_id: Option<String>,
    pub department: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateAssetRequest {
    pub asset_number: Option<String>,
    pub description: Option<String>,
    pub purchase_price: Option<f64>,
    pub purchase_date: Option<NaiveDate>,
    pub location_id: Option<Uuid>,
    pub assignment_type: Option<String>,
    pub assigned_to: Option<String>,
    pub employee_id: Option<String>,
    pub department: Option<String>,
    pub status: Option<String>,
    pub state: Option<String>,
    pub change_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignHoldingRequest {
    pub holding_asset_id: Uuid,
    pub asset_number: String,
    pub user_id: Uuid,
    #[serde(rename = "type")]
    pub asset_type: String,
}

#[derive(Debug, Deserialize)]
pub struct ChangeStateRequest {
    pub state: String,
    pub reason: Option<String>,
}

/// Filters shared by the list and export endpoints.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct AssetFilter {
    pub asset_type: Option<String>,
    pub state: Option<String>,
    pub status: Option<String>,
    pub location_id: Option<Uuid>,
}

#[derive(Debug, Deserialize)]
pub struct ExportRequest {
    #[serde(flatten)]
    pub filter: AssetFilter,
    pub format: String,
}
