//! # Cities API Handlers
//!
//! CRUD endpoints for the `cities` resource.

use axum::{
    extract::{
        Path, State,
        rejection::{JsonRejection, PathRejection},
    },
    http::StatusCode,
    response::Json,
};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::json;
use utoipa::ToSchema;

use crate::error::{ApiError, validation_error};
use crate::models::city;
use crate::repositories::{CityChanges, CityRepository, NewCity};
use crate::server::AppState;

const MAX_NAME_CHARS: usize = 255;
const MAX_ADDITIONAL_INFO_CHARS: usize = 1000;

/// Request body for creating a city
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateCityRequest {
    /// Unique city name
    #[schema(example = "Kyiv", min_length = 1, max_length = 255)]
    pub name: String,
    /// Free-form description
    #[schema(example = "Capital of Ukraine", max_length = 1000)]
    pub additional_info: Option<String>,
    #[schema(example = 50.4501)]
    pub latitude: f64,
    #[schema(example = 30.5234)]
    pub longitude: f64,
}

/// Request body for a partial city update.
///
/// Omitted fields are left unchanged. An explicit `null` for
/// `additional_info` clears it.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct UpdateCityRequest {
    #[schema(example = "Kyiv", min_length = 1, max_length = 255)]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "present_or_null")]
    #[schema(value_type = Option<String>, max_length = 1000)]
    pub additional_info: Option<Option<String>>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

/// City as returned by the API
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct CityResponse {
    #[schema(example = 1)]
    pub id: i32,
    #[schema(example = "Kyiv")]
    pub name: String,
    pub additional_info: Option<String>,
    #[schema(example = 50.4501)]
    pub latitude: f64,
    #[schema(example = 30.5234)]
    pub longitude: f64,
}

impl From<city::Model> for CityResponse {
    fn from(model: city::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            additional_info: model.additional_info,
            latitude: model.latitude,
            longitude: model.longitude,
        }
    }
}

/// Distinguishes a field sent as `null` (`Some(None)`) from one left out (`None`).
fn present_or_null<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

fn check_name(name: &str, errors: &mut serde_json::Map<String, serde_json::Value>) {
    let chars = name.chars().count();
    if chars == 0 || chars > MAX_NAME_CHARS {
        errors.insert(
            "name".to_string(),
            json!(format!("must be between 1 and {MAX_NAME_CHARS} characters")),
        );
    }
}

fn check_additional_info(
    additional_info: Option<&str>,
    errors: &mut serde_json::Map<String, serde_json::Value>,
) {
    if additional_info.is_some_and(|info| info.chars().count() > MAX_ADDITIONAL_INFO_CHARS) {
        errors.insert(
            "additional_info".to_string(),
            json!(format!(
                "must be at most {MAX_ADDITIONAL_INFO_CHARS} characters"
            )),
        );
    }
}

fn into_result(errors: serde_json::Map<String, serde_json::Value>) -> Result<(), ApiError> {
    if errors.is_empty() {
        Ok(())
    } else {
        Err(validation_error(
            "Request validation failed",
            serde_json::Value::Object(errors),
        ))
    }
}

impl CreateCityRequest {
    fn validate(&self) -> Result<(), ApiError> {
        let mut errors = serde_json::Map::new();
        check_name(&self.name, &mut errors);
        check_additional_info(self.additional_info.as_deref(), &mut errors);
        into_result(errors)
    }
}

impl UpdateCityRequest {
    fn validate(&self) -> Result<(), ApiError> {
        let mut errors = serde_json::Map::new();
        if let Some(name) = &self.name {
            check_name(name, &mut errors);
        }
        if let Some(Some(info)) = &self.additional_info {
            check_additional_info(Some(info), &mut errors);
        }
        into_result(errors)
    }
}

impl From<CreateCityRequest> for NewCity {
    fn from(request: CreateCityRequest) -> Self {
        Self {
            name: request.name,
            additional_info: request.additional_info,
            latitude: request.latitude,
            longitude: request.longitude,
        }
    }
}

impl From<UpdateCityRequest> for CityChanges {
    fn from(request: UpdateCityRequest) -> Self {
        Self {
            name: request.name,
            additional_info: request.additional_info,
            latitude: request.latitude,
            longitude: request.longitude,
        }
    }
}

/// Ids outside the `i32` column range cannot belong to a stored city.
async fn find_city(state: &AppState, city_id: i64) -> Result<city::Model, ApiError> {
    let Ok(stored_id) = i32::try_from(city_id) else {
        return Err(ApiError::city_not_found(city_id));
    };

    CityRepository::new(&state.db)
        .get(stored_id)
        .await?
        .ok_or_else(|| ApiError::city_not_found(city_id))
}

/// Create a city
#[utoipa::path(
    post,
    path = "/cities",
    request_body = CreateCityRequest,
    responses(
        (status = 201, description = "City created", body = CityResponse),
        (status = 400, description = "Validation error", body = ApiError),
        (status = 409, description = "A city with this name already exists", body = ApiError)
    ),
    tag = "cities"
)]
pub async fn create_city(
    State(state): State<AppState>,
    payload: Result<Json<CreateCityRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<CityResponse>), ApiError> {
    let Json(request) = payload?;
    request.validate()?;

    let city = CityRepository::new(&state.db)
        .create(request.into())
        .await?;

    tracing::info!(city_id = city.id, name = %city.name, "City created");
    Ok((StatusCode::CREATED, Json(city.into())))
}

/// List all cities
#[utoipa::path(
    get,
    path = "/cities",
    responses(
        (status = 200, description = "All cities ordered by id", body = [CityResponse])
    ),
    tag = "cities"
)]
pub async fn list_cities(
    State(state): State<AppState>,
) -> Result<Json<Vec<CityResponse>>, ApiError> {
    let cities = CityRepository::new(&state.db).list().await?;
    Ok(Json(cities.into_iter().map(CityResponse::from).collect()))
}

/// Fetch one city
#[utoipa::path(
    get,
    path = "/cities/{id}",
    params(("id" = i64, Path, description = "City id")),
    responses(
        (status = 200, description = "The city", body = CityResponse),
        (status = 404, description = "City not found", body = ApiError)
    ),
    tag = "cities"
)]
pub async fn get_city(
    State(state): State<AppState>,
    city_id: Result<Path<i64>, PathRejection>,
) -> Result<Json<CityResponse>, ApiError> {
    let Path(city_id) = city_id?;
    let city = find_city(&state, city_id).await?;
    Ok(Json(city.into()))
}

/// Partially update a city
#[utoipa::path(
    put,
    path = "/cities/{id}",
    params(("id" = i64, Path, description = "City id")),
    request_body = UpdateCityRequest,
    responses(
        (status = 200, description = "Updated city", body = CityResponse),
        (status = 400, description = "Validation error", body = ApiError),
        (status = 404, description = "City not found", body = ApiError),
        (status = 409, description = "A city with this name already exists", body = ApiError)
    ),
    tag = "cities"
)]
pub async fn update_city(
    State(state): State<AppState>,
    city_id: Result<Path<i64>, PathRejection>,
    payload: Result<Json<UpdateCityRequest>, JsonRejection>,
) -> Result<Json<CityResponse>, ApiError> {
    let Path(city_id) = city_id?;
    let Json(request) = payload?;
    request.validate()?;

    let city = find_city(&state, city_id).await?;
    let updated = CityRepository::new(&state.db)
        .update(city, request.into())
        .await?;

    tracing::info!(city_id, "City updated");
    Ok(Json(updated.into()))
}

/// Delete a city and all of its temperature readings
#[utoipa::path(
    delete,
    path = "/cities/{id}",
    params(("id" = i64, Path, description = "City id")),
    responses(
        (status = 204, description = "City deleted"),
        (status = 404, description = "City not found", body = ApiError)
    ),
    tag = "cities"
)]
pub async fn delete_city(
    State(state): State<AppState>,
    city_id: Result<Path<i64>, PathRejection>,
) -> Result<StatusCode, ApiError> {
    let Path(city_id) = city_id?;
    let city = find_city(&state, city_id).await?;

    CityRepository::new(&state.db).delete(city).await?;

    tracing::info!(city_id, "City deleted");
    Ok(StatusCode::NO_CONTENT)
}
