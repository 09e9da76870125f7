/*!
 * Vereinskasse API
 *
 * Point-of-sale backend for club events: drink/room catalog, transaction
 * and tip recording, statistics, and an inventory ledger with audit
 * history. axum handlers over sea-orm services, wired together in
 * [`api_routes`].
 */

pub mod auth;
pub mod config;
pub mod db;
pub mod entities;
pub mod errors;
pub mod events;
pub mod handlers;
pub mod metrics;
pub mod middleware_helpers;
pub mod migrator;
pub mod openapi;
pub mod queries;
pub mod services;

use axum::{extract::State, response::Json, routing::get, Router};
use sea_orm::DatabaseConnection;
use serde_json::{json, Value};
use std::sync::Arc;

use crate::auth::AdminGuard;

#[derive(Clone)]
pub struct AppState {
    pub db: Arc<DatabaseConnection>,
    pub config: config::AppConfig,
    pub event_sender: events::EventSender,
    pub services: handlers::AppServices,
}

/// All application routes mounted under `/api` by the binary.
pub fn api_routes(admin: AdminGuard) -> Router<AppState> {
    Router::new()
        .nest("/rooms", handlers::rooms::routes())
        .nest("/drinks", handlers::drinks::routes(admin.clone()))
        .nest("/transactions", handlers::transactions::routes())
        .nest("/statistics", handlers::statistics::routes())
        .nest("/tips", handlers::tips::routes())
        .nest("/auth", auth::routes())
        .nest("/inventory", handlers::inventory::routes(admin))
        .route("/health", get(health_check))
}

async fn health_check(
    State(state): State<AppState>,
) -> Result<Json<Value>, errors::ServiceError> {
    let db_status = match state.db.ping().await {
        Ok(_) => "healthy",
        Err(_) => "unhealthy",
    };

    Ok(Json(json!({
        "status": db_status,
        "checks": {
            "database": db_status,
        },
        "service": "vereinskasse-api",
        "version": env!("CARGO_PKG_VERSION"),
        "timestamp": chrono::Utc::now().to_rfc3339(),
    })))
}
