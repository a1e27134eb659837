//! # Temperatures API Handlers
//!
//! Triggers a provider refresh for every city and lists stored readings.

use axum::{
    extract::{Query, State, rejection::QueryRejection},
    http::StatusCode,
    response::Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::error::ApiError;
use crate::models::temperature;
use crate::repositories::TemperatureRepository;
use crate::server::AppState;
use crate::services::TemperatureUpdateSummary;
use crate::services::temperature_update::TemperatureUpdater;

/// Query parameters for listing readings
#[derive(Debug, Default, Deserialize, IntoParams, ToSchema)]
pub struct ListTemperaturesQuery {
    /// Only return readings for this city
    pub city_id: Option<i64>,
}

/// A stored temperature reading
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct TemperatureResponse {
    #[schema(example = 1)]
    pub id: i32,
    #[schema(example = 1)]
    pub city_id: i32,
    /// When the reading was taken (UTC)
    pub date_time: DateTime<Utc>,
    /// Degrees Celsius
    #[schema(example = 12.3)]
    pub temperature: f64,
}

impl From<temperature::Model> for TemperatureResponse {
    fn from(model: temperature::Model) -> Self {
        Self {
            id: model.id,
            city_id: model.city_id,
            date_time: model.date_time.with_timezone(&Utc),
            temperature: model.temperature,
        }
    }
}

/// Fetch and store the current temperature for every city
#[utoipa::path(
    post,
    path = "/temperatures/update",
    responses(
        (status = 201, description = "One new reading per city", body = TemperatureUpdateSummary),
        (status = 400, description = "No cities exist", body = ApiError),
        (status = 500, description = "Temperature provider failed", body = ApiError)
    ),
    tag = "temperatures"
)]
pub async fn update_temperatures(
    State(state): State<AppState>,
) -> Result<(StatusCode, Json<TemperatureUpdateSummary>), ApiError> {
    let summary = TemperatureUpdater::new(&state.db, state.weather.as_ref())
        .update_all()
        .await?;

    Ok((StatusCode::CREATED, Json(summary)))
}

/// List readings, newest first
#[utoipa::path(
    get,
    path = "/temperatures",
    params(ListTemperaturesQuery),
    responses(
        (status = 200, description = "Readings ordered by date_time then id, descending", body = [TemperatureResponse]),
        (status = 400, description = "Invalid query string", body = ApiError)
    ),
    tag = "temperatures"
)]
pub async fn list_temperatures(
    State(state): State<AppState>,
    query: Result<Query<ListTemperaturesQuery>, QueryRejection>,
) -> Result<Json<Vec<TemperatureResponse>>, ApiError> {
    let Query(query) = query?;

    let readings = match query.city_id.map(i32::try_from).transpose() {
        Ok(city_id) => TemperatureRepository::new(&state.db).list(city_id).await?,
        // No stored city can have an id outside the column range
        Err(_) => Vec::new(),
    };

    Ok(Json(
        readings.into_iter().map(TemperatureResponse::from).collect(),
    ))
}
