//! # Server Configuration
//!
//! Router assembly, shared state and the HTTP listener for the City
//! Temperatures API.

use std::sync::Arc;

use anyhow::Context;
use axum::{
    Router, middleware,
    routing::{get, post},
};
use sea_orm::DatabaseConnection;
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::config::AppConfig;
use crate::handlers;
use crate::telemetry::trace_context_middleware;
use crate::weather::{OpenMeteoClient, TemperatureProvider};

/// Application state containing shared resources
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub db: DatabaseConnection,
    pub weather: Arc<dyn TemperatureProvider>,
}

impl AppState {
    /// State backed by the real Open-Meteo client.
    pub fn new(config: AppConfig, db: DatabaseConnection) -> anyhow::Result<Self> {
        let weather = OpenMeteoClient::new(&config).context("building Open-Meteo client")?;
        Ok(Self {
            config: Arc::new(config),
            db,
            weather: Arc::new(weather),
        })
    }
}

/// Creates and configures the Axum application router
pub fn create_app(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::root))
        .route("/healthz", get(handlers::health))
        .route(
            "/cities",
            get(handlers::cities::list_cities).post(handlers::cities::create_city),
        )
        .route(
            "/cities/{id}",
            get(handlers::cities::get_city)
                .put(handlers::cities::update_city)
                .delete(handlers::cities::delete_city),
        )
        .route(
            "/temperatures",
            get(handlers::temperatures::list_temperatures),
        )
        .route(
            "/temperatures/update",
            post(handlers::temperatures::update_temperatures),
        )
        .with_state(state)
        .merge(SwaggerUi::new("/docs").url("/openapi.json", ApiDoc::openapi()))
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(trace_context_middleware))
}

/// Binds the configured address and serves until the process is stopped
pub async fn run_server(state: AppState) -> anyhow::Result<()> {
    let addr = state
        .config
        .bind_addr()
        .context("invalid server address")?;
    let profile = state.config.profile.clone();
    let app = create_app(state);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("binding {addr}"))?;
    tracing::info!(%addr, %profile, "Server listening");

    axum::serve(listener, app).await?;

    Ok(())
}

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        crate::handlers::root,
        crate::handlers::health,
        crate::handlers::cities::create_city,
        crate::handlers::cities::list_cities,
        crate::handlers::cities::get_city,
        crate::handlers::cities::update_city,
        crate::handlers::cities::delete_city,
        crate::handlers::temperatures::update_temperatures,
        crate::handlers::temperatures::list_temperatures,
    ),
    components(
        schemas(
            crate::models::ServiceInfo,
            crate::handlers::HealthResponse,
            crate::handlers::cities::CreateCityRequest,
            crate::handlers::cities::UpdateCityRequest,
            crate::handlers::cities::CityResponse,
            crate::handlers::temperatures::TemperatureResponse,
            crate::services::CityTemperature,
            crate::services::TemperatureUpdateSummary,
            crate::error::ApiError,
        )
    ),
    tags(
        (name = "cities", description = "City records"),
        (name = "temperatures", description = "Temperature readings"),
    ),
    info(
        title = "City Temperature Management API",
        description = "CRUD for cities and storage of temperatures fetched from Open-Meteo",
        version = env!("CARGO_PKG_VERSION"),
    )
)]
pub struct ApiDoc;
