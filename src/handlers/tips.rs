use axum::{extract::State, response::IntoResponse, routing::post, Json, Router};
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::json;
use utoipa::ToSchema;

use crate::{errors::ServiceError, handlers::common::success_response, AppState};

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateTipRequest {
    pub room_id: Option<i32>,
    pub amount: Option<Decimal>,
    pub event_name: Option<String>,
}

/// Record a tip for a room.
#[utoipa::path(
    post,
    path = "/api/tips",
    request_body = CreateTipRequest,
    responses(
        (status = 200, description = "Tip recorded"),
        (status = 400, description = "Missing room or amount, or negative amount", body = crate::errors::ErrorResponse),
        (status = 500, description = "Internal server error", body = crate::errors::ErrorResponse)
    ),
    tag = "tips"
)]
pub async fn create_tip(
    State(state): State<AppState>,
    Json(payload): Json<CreateTipRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    let room_id = payload
        .room_id
        .ok_or_else(|| ServiceError::InvalidInput("Room ID and amount required".to_string()))?;
    let amount = payload
        .amount
        .ok_or_else(|| ServiceError::InvalidInput("Room ID and amount required".to_string()))?;

    state
        .services
        .tips
        .add(room_id, amount, payload.event_name)
        .await?;

    Ok(success_response(json!({
        "success": true,
        "message": "Tip recorded"
    })))
}

pub fn routes() -> Router<AppState> {
    Router::new().route("/", post(create_tip))
}
