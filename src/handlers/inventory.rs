use axum::{
    extract::{Path, Query, State},
    middleware,
    response::IntoResponse,
    routing::{get, post, put},
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;
use utoipa::{IntoParams, ToSchema};

use crate::{
    auth::{require_admin, AdminGuard},
    errors::ServiceError,
    handlers::common::success_response,
    AppState,
};

const DEFAULT_HISTORY_LIMIT: u64 = 100;

#[derive(Debug, Deserialize, ToSchema)]
pub struct SetCountRequest {
    pub quantity: Option<i32>,
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct AdjustInventoryRequest {
    pub drink_id: Option<i32>,
    pub adjustment: Option<i32>,
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct HistoryParams {
    pub limit: Option<u64>,
}

/// Current stock for all drinks, in menu order.
#[utoipa::path(
    get,
    path = "/api/inventory",
    responses(
        (status = 200, description = "Inventory with drink details", body = [crate::services::inventory::InventoryWithDrink]),
        (status = 500, description = "Internal server error", body = crate::errors::ErrorResponse)
    ),
    tag = "inventory"
)]
pub async fn list_inventory(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, ServiceError> {
    let inventory = state.services.inventory.list().await?;
    Ok(success_response(inventory))
}

/// Stock totals across all drinks.
#[utoipa::path(
    get,
    path = "/api/inventory/summary",
    responses(
        (status = 200, description = "Inventory summary", body = crate::services::inventory::InventorySummary),
        (status = 500, description = "Internal server error", body = crate::errors::ErrorResponse)
    ),
    tag = "inventory"
)]
pub async fn inventory_summary(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, ServiceError> {
    let summary = state.services.inventory.summary().await?;
    Ok(success_response(summary))
}

/// Audit trail for one drink, newest entries first.
#[utoipa::path(
    get,
    path = "/api/inventory/history/{drink_id}",
    params(
        ("drink_id" = i32, Path, description = "Drink id"),
        HistoryParams
    ),
    responses(
        (status = 200, description = "History entries", body = [crate::services::inventory::HistoryWithDrink]),
        (status = 500, description = "Internal server error", body = crate::errors::ErrorResponse)
    ),
    tag = "inventory"
)]
pub async fn inventory_history(
    State(state): State<AppState>,
    Path(drink_id): Path<i32>,
    Query(params): Query<HistoryParams>,
) -> Result<impl IntoResponse, ServiceError> {
    let limit = params.limit.unwrap_or(DEFAULT_HISTORY_LIMIT);
    let history = state.services.inventory.history(drink_id, limit).await?;
    Ok(success_response(history))
}

/// Set the absolute quantity after a manual recount. Admin only.
#[utoipa::path(
    put,
    path = "/api/inventory/{id}",
    params(("id" = i32, Path, description = "Inventory row id")),
    request_body = SetCountRequest,
    responses(
        (status = 200, description = "Count recorded"),
        (status = 400, description = "Missing or negative quantity", body = crate::errors::ErrorResponse),
        (status = 401, description = "Invalid admin password", body = crate::errors::ErrorResponse),
        (status = 404, description = "Inventory item not found", body = crate::errors::ErrorResponse),
        (status = 500, description = "Internal server error", body = crate::errors::ErrorResponse)
    ),
    tag = "inventory"
)]
pub async fn set_count(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(payload): Json<SetCountRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    let quantity = payload
        .quantity
        .ok_or_else(|| ServiceError::InvalidInput("Quantity required".to_string()))?;

    state
        .services
        .inventory
        .set_count(id, quantity, payload.notes)
        .await?;

    Ok(success_response(json!({
        "success": true,
        "message": "Inventory updated"
    })))
}

/// Apply a relative stock change (restock or correction). Admin only.
#[utoipa::path(
    post,
    path = "/api/inventory/adjust",
    request_body = AdjustInventoryRequest,
    responses(
        (status = 200, description = "Adjustment applied"),
        (status = 400, description = "Missing fields or result would be negative", body = crate::errors::ErrorResponse),
        (status = 401, description = "Invalid admin password", body = crate::errors::ErrorResponse),
        (status = 404, description = "Inventory item not found", body = crate::errors::ErrorResponse),
        (status = 500, description = "Internal server error", body = crate::errors::ErrorResponse)
    ),
    tag = "inventory"
)]
pub async fn adjust_inventory(
    State(state): State<AppState>,
    Json(payload): Json<AdjustInventoryRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    let drink_id = payload.drink_id.ok_or_else(|| {
        ServiceError::InvalidInput("Drink ID and adjustment required".to_string())
    })?;
    let adjustment = payload.adjustment.ok_or_else(|| {
        ServiceError::InvalidInput("Drink ID and adjustment required".to_string())
    })?;

    let new_quantity = state
        .services
        .inventory
        .adjust(drink_id, adjustment, payload.notes)
        .await?;

    Ok(success_response(json!({
        "success": true,
        "message": "Inventory adjusted",
        "new_quantity": new_quantity
    })))
}

pub fn routes(admin: AdminGuard) -> Router<AppState> {
    Router::new()
        .route("/", get(list_inventory))
        .route("/summary", get(inventory_summary))
        .route("/history/:drink_id", get(inventory_history))
        .route(
            "/:id",
            put(set_count).route_layer(middleware::from_fn_with_state(
                admin.clone(),
                require_admin,
            )),
        )
        .route(
            "/adjust",
            post(adjust_inventory)
                .route_layer(middleware::from_fn_with_state(admin, require_admin)),
        )
}
