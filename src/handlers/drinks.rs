use axum::{
    extract::{Path, State},
    middleware,
    response::IntoResponse,
    routing::{get, post, put},
    Json, Router,
};
use rust_decimal::Decimal;
use serde::Deserialize;
use utoipa::ToSchema;

use crate::{
    auth::{require_admin, AdminGuard},
    errors::ServiceError,
    handlers::common::{created_response, success_response},
    services::drinks::{DrinkUpdate, NewDrink},
    AppState,
};

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateDrinkRequest {
    pub name: Option<String>,
    pub price: Option<Decimal>,
    pub price_reduced: Option<Decimal>,
    pub color: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateDrinkRequest {
    pub name: String,
    pub price: Decimal,
    pub price_reduced: Option<Decimal>,
    pub active: bool,
    pub color: String,
    pub sort_order: i32,
}

/// List active drinks in menu order.
#[utoipa::path(
    get,
    path = "/api/drinks",
    responses(
        (status = 200, description = "Active drinks", body = [crate::entities::drink::Model]),
        (status = 500, description = "Internal server error", body = crate::errors::ErrorResponse)
    ),
    tag = "drinks"
)]
pub async fn list_active_drinks(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, ServiceError> {
    let drinks = state.services.drinks.list_active().await?;
    Ok(success_response(drinks))
}

/// List all drinks including deactivated ones (admin).
#[utoipa::path(
    get,
    path = "/api/drinks/all",
    responses(
        (status = 200, description = "All drinks", body = [crate::entities::drink::Model]),
        (status = 401, description = "Unauthorized", body = crate::errors::ErrorResponse),
        (status = 500, description = "Internal server error", body = crate::errors::ErrorResponse)
    ),
    tag = "drinks"
)]
pub async fn list_all_drinks(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, ServiceError> {
    let drinks = state.services.drinks.list_all().await?;
    Ok(success_response(drinks))
}

/// Create a drink (admin). Sort order is assigned automatically.
#[utoipa::path(
    post,
    path = "/api/drinks",
    request_body = CreateDrinkRequest,
    responses(
        (status = 201, description = "Drink created", body = crate::entities::drink::Model),
        (status = 400, description = "Missing fields or duplicate name", body = crate::errors::ErrorResponse),
        (status = 401, description = "Unauthorized", body = crate::errors::ErrorResponse),
        (status = 500, description = "Internal server error", body = crate::errors::ErrorResponse)
    ),
    tag = "drinks"
)]
pub async fn create_drink(
    State(state): State<AppState>,
    Json(payload): Json<CreateDrinkRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    let name = payload
        .name
        .filter(|n| !n.trim().is_empty())
        .ok_or_else(|| ServiceError::InvalidInput("Name and price required".to_string()))?;
    let price = payload
        .price
        .ok_or_else(|| ServiceError::InvalidInput("Name and price required".to_string()))?;

    let drink = state
        .services
        .drinks
        .create(NewDrink {
            name,
            price,
            price_reduced: payload.price_reduced,
            color: payload.color,
        })
        .await?;

    Ok(created_response(drink))
}

/// Replace all fields of a drink (admin).
#[utoipa::path(
    put,
    path = "/api/drinks/{id}",
    params(("id" = i32, Path, description = "Drink ID")),
    request_body = UpdateDrinkRequest,
    responses(
        (status = 200, description = "Drink updated", body = crate::entities::drink::Model),
        (status = 400, description = "Invalid request", body = crate::errors::ErrorResponse),
        (status = 401, description = "Unauthorized", body = crate::errors::ErrorResponse),
        (status = 404, description = "Drink not found", body = crate::errors::ErrorResponse),
        (status = 500, description = "Internal server error", body = crate::errors::ErrorResponse)
    ),
    tag = "drinks"
)]
pub async fn update_drink(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(payload): Json<UpdateDrinkRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    let drink = state
        .services
        .drinks
        .update(
            id,
            DrinkUpdate {
                name: payload.name,
                price: payload.price,
                price_reduced: payload.price_reduced,
                active: payload.active,
                color: payload.color,
                sort_order: payload.sort_order,
            },
        )
        .await?;

    Ok(success_response(drink))
}

pub fn routes(admin: AdminGuard) -> Router<AppState> {
    Router::new()
        .route("/", get(list_active_drinks))
        .route(
            "/",
            post(create_drink)
                .route_layer(middleware::from_fn_with_state(admin.clone(), require_admin)),
        )
        .route(
            "/all",
            get(list_all_drinks)
                .route_layer(middleware::from_fn_with_state(admin.clone(), require_admin)),
        )
        .route(
            "/:id",
            put(update_drink).route_layer(middleware::from_fn_with_state(admin, require_admin)),
        )
}
