//! User request models

use serde::Deserialize;
use uuid::Uuid;

#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    pub name: String,
    pub email: String,
    pub role: Option<String>,
    pub department: Option<String>,
    pub department_id: Option<Uuid>,
    pub location_id: Option<Uuid>,
    /// Issued automatically (`EMP#####`) when absent.
    pub employee_id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateUserRequest {
    pub name: Option<String>,
    pub role: Option<String>,
    pub department: Option<String>,
    pub department_id: Option<Uuid>,
    pub location_id: Option<Uuid>,
    pub is_active: Option<bool>,
}
