//! API routes

pub mod assets;
pub mod dashboard;
pub mod departments;
pub mod holding;
pub mod import;
pub mod locations;
pub mod reports;
pub mod search;
pub mod settings;
pub mod users;

use axum::Json;
use serde::Serialize;
use serde_json::json;

/// Uniform success envelope.
pub fn ok<T: Serialize>(data: T) -> Json<serde_json::Value> {
    Json(json!({ "success": true, "data": data }))
}

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}
