use axum::{extract::State, response::IntoResponse, routing::get, Router};

use crate::{errors::ServiceError, handlers::common::success_response, AppState};

/// List all rooms.
#[utoipa::path(
    get,
    path = "/api/rooms",
    responses(
        (status = 200, description = "All rooms", body = [crate::entities::room::Model]),
        (status = 500, description = "Internal server error", body = crate::errors::ErrorResponse)
    ),
    tag = "rooms"
)]
pub async fn list_rooms(State(state): State<AppState>) -> Result<impl IntoResponse, ServiceError> {
    let rooms = state.services.rooms.list().await?;
    Ok(success_response(rooms))
}

pub fn routes() -> Router<AppState> {
    Router::new().route("/", get(list_rooms))
}
