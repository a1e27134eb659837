//! # Weather Provider
//!
//! Client for the Open-Meteo forecast API. Only the current 2 m air
//! temperature is requested.

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, instrument};
use url::Url;

use crate::config::AppConfig;

const FORECAST_PATH: &str = "v1/forecast";
const CURRENT_TEMPERATURE_FIELD: &str = "temperature_2m";

/// Errors raised while fetching a temperature from the provider
#[derive(Debug, Error)]
pub enum WeatherError {
    /// Transport failure: connect error, timeout or non-2xx status
    #[error("temperature provider unavailable: {0}")]
    ProviderUnavailable(#[from] reqwest::Error),

    /// The response did not carry a numeric current temperature
    #[error("unexpected response schema from temperature provider: {0}")]
    SchemaMismatch(String),

    #[error("invalid provider URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

/// Source of current temperatures for a coordinate pair.
#[async_trait]
pub trait TemperatureProvider: Send + Sync {
    /// Current temperature in degrees Celsius at (`latitude`, `longitude`).
    async fn fetch_current_temperature(
        &self,
        latitude: f64,
        longitude: f64,
    ) -> Result<f64, WeatherError>;
}

/// Open-Meteo backed [`TemperatureProvider`]
#[derive(Debug, Clone)]
pub struct OpenMeteoClient {
    client: Client,
    forecast_url: Url,
}

impl OpenMeteoClient {
    /// Build a client whose every call is bounded by the configured timeout.
    pub fn new(config: &AppConfig) -> Result<Self, WeatherError> {
        let client = Client::builder()
            .timeout(config.open_meteo_timeout())
            .build()?;
        // A trailing slash keeps any path prefix of the base when joining
        let base = format!("{}/", config.open_meteo_base_url.trim_end_matches('/'));
        let forecast_url = Url::parse(&base)?.join(FORECAST_PATH)?;

        Ok(Self {
            client,
            forecast_url,
        })
    }
}

#[async_trait]
impl TemperatureProvider for OpenMeteoClient {
    #[instrument(skip(self))]
    async fn fetch_current_temperature(
        &self,
        latitude: f64,
        longitude: f64,
    ) -> Result<f64, WeatherError> {
        let response = self
            .client
            .get(self.forecast_url.clone())
            .query(&[
                ("latitude", latitude.to_string()),
                ("longitude", longitude.to_string()),
                ("current", CURRENT_TEMPERATURE_FIELD.to_string()),
            ])
            .send()
            .await?
            .error_for_status()?;

        let body = response.text().await?;
        let temperature = parse_current_temperature(&body)?;

        debug!(temperature, "Fetched current temperature");
        Ok(temperature)
    }
}

/// Extract `current.temperature_2m` from an Open-Meteo response body.
pub fn parse_current_temperature(body: &str) -> Result<f64, WeatherError> {
    let payload: Value = serde_json::from_str(body)
        .map_err(|err| WeatherError::SchemaMismatch(format!("body is not JSON: {err}")))?;

    payload
        .get("current")
        .and_then(|current| current.get(CURRENT_TEMPERATURE_FIELD))
        .and_then(Value::as_f64)
        .ok_or_else(|| {
            WeatherError::SchemaMismatch(format!(
                "missing numeric current.{CURRENT_TEMPERATURE_FIELD}"
            ))
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer, timeout_seconds: u64) -> OpenMeteoClient {
        let config = AppConfig {
            open_meteo_base_url: server.uri(),
            open_meteo_timeout_seconds: timeout_seconds,
            ..Default::default()
        };
        OpenMeteoClient::new(&config).unwrap()
    }

    #[test]
    fn test_parse_current_temperature() {
        let body = json!({
            "latitude": 50.45,
            "longitude": 30.52,
            "current_units": {"temperature_2m": "°C"},
            "current": {"time": "2025-01-01T12:00", "temperature_2m": -3.4}
        })
        .to_string();

        assert_eq!(parse_current_temperature(&body).unwrap(), -3.4);
    }

    #[test]
    fn test_parse_accepts_integer_temperature() {
        let body = json!({"current": {"temperature_2m": 21}}).to_string();
        assert_eq!(parse_current_temperature(&body).unwrap(), 21.0);
    }

    #[test]
    fn test_parse_rejects_wrong_shapes() {
        for body in [
            json!({}).to_string(),
            json!({"current": {}}).to_string(),
            json!({"current": {"temperature_2m": "warm"}}).to_string(),
            json!({"current": {"temperature_2m": null}}).to_string(),
            json!({"current": [1, 2]}).to_string(),
            "<html>nope</html>".to_string(),
        ] {
            assert!(
                matches!(
                    parse_current_temperature(&body),
                    Err(WeatherError::SchemaMismatch(_))
                ),
                "expected schema mismatch for {body}"
            );
        }
    }

    #[tokio::test]
    async fn test_fetch_sends_coordinates_and_current_parameter() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/forecast"))
            .and(query_param("latitude", "48.8566"))
            .and(query_param("longitude", "2.3522"))
            .and(query_param("current", "temperature_2m"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"current": {"temperature_2m": 17.25}})),
            )
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server, 5);
        let value = client
            .fetch_current_temperature(48.8566, 2.3522)
            .await
            .unwrap();

        assert_eq!(value, 17.25);
    }

    #[tokio::test]
    async fn test_base_url_path_prefix_is_kept() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/openmeteo/v1/forecast"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"current": {"temperature_2m": 9.5}})),
            )
            .expect(1)
            .mount(&server)
            .await;

        for base in [
            format!("{}/openmeteo", server.uri()),
            format!("{}/openmeteo/", server.uri()),
        ] {
            let config = AppConfig {
                open_meteo_base_url: base,
                ..Default::default()
            };
            let client = OpenMeteoClient::new(&config).unwrap();
            assert_eq!(client.forecast_url.path(), "/openmeteo/v1/forecast");
        }

        let config = AppConfig {
            open_meteo_base_url: format!("{}/openmeteo", server.uri()),
            ..Default::default()
        };
        let value = OpenMeteoClient::new(&config)
            .unwrap()
            .fetch_current_temperature(1.0, 2.0)
            .await
            .unwrap();
        assert_eq!(value, 9.5);
    }

    #[tokio::test]
    async fn test_fetch_maps_http_errors_to_provider_unavailable() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/forecast"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let err = client_for(&server, 5)
            .fetch_current_temperature(0.0, 0.0)
            .await
            .unwrap_err();

        assert!(matches!(err, WeatherError::ProviderUnavailable(_)));
    }

    #[tokio::test]
    async fn test_fetch_times_out() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/forecast"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"current": {"temperature_2m": 1.0}}))
                    .set_delay(std::time::Duration::from_secs(3)),
            )
            .mount(&server)
            .await;

        let err = client_for(&server, 1)
            .fetch_current_temperature(0.0, 0.0)
            .await
            .unwrap_err();

        match err {
            WeatherError::ProviderUnavailable(source) => assert!(source.is_timeout()),
            other => panic!("expected timeout, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_fetch_maps_missing_field_to_schema_mismatch() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/forecast"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({"current": {"time": "now"}})),
            )
            .mount(&server)
            .await;

        let err = client_for(&server, 5)
            .fetch_current_temperature(10.0, 20.0)
            .await
            .unwrap_err();

        assert!(matches!(err, WeatherError::SchemaMismatch(_)));
    }
}
