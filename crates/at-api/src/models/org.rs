//! Location and department request models

use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct CreateNamedEntityRequest {
    pub name: String,
    pub description: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateNamedEntityRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub is_active: Option<bool>,
}
