//! Asset Tracker API Server

mod auth;
mod cache;
mod db;
mod error;
mod lifecycle;
mod models;
mod routes;

use axum::{
    routing::{get, post},
    Router,
};
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Application state shared across handlers
pub struct AppState {
    pub db: sqlx::PgPool,
    pub config: AppConfig,
    pub chart_cache: cache::ChartCache,
}

/// Application configuration
#[derive(Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub jwt_secret: String,
    pub bind_addr: String,
    /// Location every bulk-imported row is pinned to (find-or-create by name).
    pub import_location_name: String,
    /// When set, error responses carry a `details` field.
    pub debug_errors: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database_url: std::env::var("DATABASE_URL")
                .unwrap_or_else(|_| "postgres://localhost/asset_tracker".to_string()),
            jwt_secret: std::env::var("JWT_SECRET")
                .unwrap_or_else(|_| "development-secret-change-in-production".to_string()),
            bind_addr: std::env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".to_string()),
            import_location_name: std::env::var("IMPORT_LOCATION_NAME")
                .unwrap_or_else(|_| "IT Storage".to_string()),
            debug_errors: std::env::var("DEBUG_ERRORS").map(|v| v == "1").unwrap_or(false),
        }
    }
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "at_api=debug,tower_http=debug".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Asset Tracker API Server");

    let config = AppConfig::default();
    error::set_debug_errors(config.debug_errors);

    // Connect to database
    let db = PgPoolOptions::new()
        .max_connections(10)
        .connect(&config.database_url)
        .await
        .expect("Failed to connect to database");

    info!("Connected to database");

    // Run migrations
    sqlx::migrate!("./migrations")
        .run(&db)
        .await
        .expect("Failed to run migrations");

    info!("Database migrations complete");

    let bind_addr = config.bind_addr.clone();

    // Create shared state
    let state = Arc::new(AppState {
        db,
        config,
        chart_cache: cache::ChartCache::new(),
    });

    // Build router
    let app = Router::new()
        // Health check
        .route("/health", get(routes::health_check))

        // Authentication
        .route("/api/auth/me", get(routes::users::me))

        // Assets
        .route("/api/assets", get(routes::assets::list_assets).post(routes::assets::create_asset))
        .route(
            "/api/assets/:key",
            get(routes::assets::get_asset)
                .put(routes::assets::update_asset)
                .delete(routes::assets::dispose_asset),
        )
        .route("/api/assets/:key/state", post(routes::assets::change_state))
        .route("/api/assets/export", post(routes::assets::export_assets))

        // Holding area
        .route("/api/holding-assets", get(routes::holding::list_holding_assets))
        .route("/api/holding-assets/assign", post(routes::holding::assign_holding_asset))

        // Import
        .route("/api/import", post(routes::import::import_assets))

        // Search
        .route("/api/search", get(routes::search::search))

        // Dashboard + reports
        .route("/api/dashboard", get(routes::dashboard::get_dashboard))
        .route("/api/reports/assets-by-type", get(routes::reports::assets_by_type))
        .route("/api/reports/assets-by-state", get(routes::reports::assets_by_state))
        .route("/api/reports/assets-by-year", get(routes::reports::assets_by_year))
        .route("/api/reports/state-breakdown", get(routes::reports::state_breakdown))
        .route("/api/reports/depreciation", get(routes::reports::depreciation_report))
        .route("/api/reports/asset-inventory/chart.png", get(routes::reports::inventory_chart))

        // Org entities
        .route("/api/users", get(routes::users::list_users).post(routes::users::create_user))
        .route(
            "/api/users/:id",
            get(routes::users::get_user)
                .put(routes::users::update_user)
                .delete(routes::users::deactivate_user),
        )
        .route(
            "/api/locations",
            get(routes::locations::list_locations).post(routes::locations::create_location),
        )
        .route(
            "/api/locations/:id",
            get(routes::locations::get_location)
                .put(routes::locations::update_location)
                .delete(routes::locations::deactivate_location),
        )
        .route(
            "/api/departments",
            get(routes::departments::list_departments).post(routes::departments::create_department),
        )
        .route(
            "/api/departments/:id",
            get(routes::departments::get_department)
                .put(routes::departments::update_department)
                .delete(routes::departments::deactivate_department),
        )

        // Settings
        .route(
            "/api/settings/:key",
            get(routes::settings::get_setting).put(routes::settings::put_setting),
        )

        // CORS
        .layer(CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any))

        // Tracing
        .layer(TraceLayer::new_for_http())

        // State
        .with_state(state);

    // Start server
    info!("Listening on {}", bind_addr);

    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .expect("Failed to bind listen address");
    axum::serve(listener, app).await.expect("Server error");
}
