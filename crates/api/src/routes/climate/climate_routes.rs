use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use log::error;
use std::sync::Arc;

use crate::{
    AppState, DateRange, Error, Precipitation, StationActivity, TemperatureObservation,
    TemperatureStats,
};

type ApiResult<T> = Result<Json<Vec<T>>, (StatusCode, String)>;

fn internal_error(context: &str, err: Error) -> (StatusCode, String) {
    error!("error {}: {}", context, err);
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        format!("Failed {}", context),
    )
}

#[utoipa::path(
    get,
    path = "/api/v1.0/precipitation",
    responses(
        (status = OK, description = "Precipitation for the last year of data", content_type = "application/json", body = Vec<Precipitation>),
        (status = INTERNAL_SERVER_ERROR, description = "Failed to query the dataset")
    ))]
pub async fn precipitation(State(state): State<Arc<AppState>>) -> ApiResult<Precipitation> {
    state
        .climate_db
        .precipitation()
        .await
        .map(Json)
        .map_err(|e| internal_error("querying precipitation", e))
}

#[utoipa::path(
    get,
    path = "/api/v1.0/stations",
    responses(
        (status = OK, description = "Stations ranked by number of measurements", content_type = "application/json", body = Vec<StationActivity>),
        (status = INTERNAL_SERVER_ERROR, description = "Failed to query the dataset")
    ))]
pub async fn stations(State(state): State<Arc<AppState>>) -> ApiResult<StationActivity> {
    state
        .climate_db
        .stations()
        .await
        .map(Json)
        .map_err(|e| internal_error("querying stations", e))
}

#[utoipa::path(
    get,
    path = "/api/v1.0/tobs",
    responses(
        (status = OK, description = "Last year of temperature observations from the most active station", content_type = "application/json", body = Vec<TemperatureObservation>),
        (status = INTERNAL_SERVER_ERROR, description = "Failed to query the dataset")
    ))]
pub async fn tobs(State(state): State<Arc<AppState>>) -> ApiResult<TemperatureObservation> {
    state
        .climate_db
        .temperature_observations()
        .await
        .map(Json)
        .map_err(|e| internal_error("querying temperature observations", e))
}

#[utoipa::path(
    get,
    path = "/api/v1.0/{start}",
    params(
         ("start" = String, Path, description = "First date (YYYY-MM-DD) to include"),
    ),
    responses(
        (status = OK, description = "Min, average and max temperature from the start date on", content_type = "application/json", body = Vec<TemperatureStats>),
        (status = INTERNAL_SERVER_ERROR, description = "Failed to query the dataset")
    ))]
pub async fn temperature_stats_from(
    State(state): State<Arc<AppState>>,
    Path(start): Path<String>,
) -> ApiResult<TemperatureStats> {
    temperature_stats(&state, DateRange { start, end: None }).await
}

#[utoipa::path(
    get,
    path = "/api/v1.0/{start}/{end}",
    params(
         ("start" = String, Path, description = "First date (YYYY-MM-DD) to include"),
         ("end" = String, Path, description = "Last date (YYYY-MM-DD) to include"),
    ),
    responses(
        (status = OK, description = "Min, average and max temperature between the dates, inclusive", content_type = "application/json", body = Vec<TemperatureStats>),
        (status = INTERNAL_SERVER_ERROR, description = "Failed to query the dataset")
    ))]
pub async fn temperature_stats_between(
    State(state): State<Arc<AppState>>,
    Path((start, end)): Path<(String, String)>,
) -> ApiResult<TemperatureStats> {
    temperature_stats(
        &state,
        DateRange {
            start,
            end: Some(end),
        },
    )
    .await
}

async fn temperature_stats(state: &AppState, range: DateRange) -> ApiResult<TemperatureStats> {
    state
        .climate_db
        .temperature_stats(&range)
        .await
        .map(Json)
        .map_err(|e| internal_error("querying temperature stats", e))
}
