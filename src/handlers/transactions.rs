use axum::{
    extract::{Query, State},
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::json;
use utoipa::{IntoParams, ToSchema};

use crate::{
    errors::ServiceError, handlers::common::success_response,
    services::transactions::NewTransactionItem, AppState,
};

const DEFAULT_RECENT_LIMIT: u64 = 50;

#[derive(Debug, Deserialize, ToSchema)]
pub struct TransactionItemPayload {
    pub drink_id: i32,
    pub quantity: i32,
    pub total_price: Decimal,
    #[serde(default)]
    pub is_storno: bool,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateTransactionRequest {
    pub room_id: Option<i32>,
    pub items: Option<Vec<TransactionItemPayload>>,
    pub event_name: Option<String>,
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct RecentTransactionsParams {
    pub limit: Option<u64>,
}

/// Record one or more sale line items as a single atomic unit.
#[utoipa::path(
    post,
    path = "/api/transactions",
    request_body = CreateTransactionRequest,
    responses(
        (status = 200, description = "Transaction recorded"),
        (status = 400, description = "Missing room or empty items", body = crate::errors::ErrorResponse),
        (status = 500, description = "Internal server error", body = crate::errors::ErrorResponse)
    ),
    tag = "transactions"
)]
pub async fn create_transaction(
    State(state): State<AppState>,
    Json(payload): Json<CreateTransactionRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    let room_id = payload
        .room_id
        .ok_or_else(|| ServiceError::InvalidInput("Room ID and items required".to_string()))?;
    let items = payload
        .items
        .filter(|items| !items.is_empty())
        .ok_or_else(|| ServiceError::InvalidInput("Room ID and items required".to_string()))?;

    let items = items
        .into_iter()
        .map(|item| NewTransactionItem {
            drink_id: item.drink_id,
            quantity: item.quantity,
            total_price: item.total_price,
            is_storno: item.is_storno,
        })
        .collect();

    state
        .services
        .transactions
        .record(room_id, items, payload.event_name)
        .await?;

    Ok(success_response(json!({
        "success": true,
        "message": "Transaction successful"
    })))
}

/// Most recent transactions with room and drink names, newest first.
#[utoipa::path(
    get,
    path = "/api/transactions",
    params(RecentTransactionsParams),
    responses(
        (status = 200, description = "Recent transactions", body = [crate::services::transactions::RecentTransactionRow]),
        (status = 500, description = "Internal server error", body = crate::errors::ErrorResponse)
    ),
    tag = "transactions"
)]
pub async fn list_recent_transactions(
    State(state): State<AppState>,
    Query(params): Query<RecentTransactionsParams>,
) -> Result<impl IntoResponse, ServiceError> {
    let limit = params.limit.unwrap_or(DEFAULT_RECENT_LIMIT);
    let transactions = state.services.transactions.recent(limit).await?;
    Ok(success_response(transactions))
}

pub fn routes() -> Router<AppState> {
    Router::new().route(
        "/",
        get(list_recent_transactions).post(create_transaction),
    )
}
