use axum::{
    extract::{Query, State},
    response::IntoResponse,
    routing::get,
    Router,
};
use chrono::NaiveDate;
use serde::Deserialize;
use utoipa::IntoParams;

use crate::{
    errors::ServiceError, handlers::common::success_response, queries::StatisticsFilter, AppState,
};

#[derive(Debug, Deserialize, IntoParams)]
pub struct StatisticsParams {
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub room_id: Option<i32>,
    pub event_name: Option<String>,
}

impl From<StatisticsParams> for StatisticsFilter {
    fn from(params: StatisticsParams) -> Self {
        StatisticsFilter {
            start_date: params.start_date,
            end_date: params.end_date,
            room_id: params.room_id,
            event_name: params.event_name,
        }
    }
}

/// Aggregated sales, storno and tip figures for the given filter window.
#[utoipa::path(
    get,
    path = "/api/statistics",
    params(StatisticsParams),
    responses(
        (status = 200, description = "Statistics report", body = crate::queries::statistics::StatisticsReport),
        (status = 500, description = "Internal server error", body = crate::errors::ErrorResponse)
    ),
    tag = "statistics"
)]
pub async fn get_statistics(
    State(state): State<AppState>,
    Query(params): Query<StatisticsParams>,
) -> Result<impl IntoResponse, ServiceError> {
    let report = state
        .services
        .statistics
        .get_statistics(params.into())
        .await?;
    Ok(success_response(report))
}

pub fn routes() -> Router<AppState> {
    Router::new().route("/", get(get_statistics))
}
