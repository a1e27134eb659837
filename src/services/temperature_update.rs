//! # Temperature Update
//!
//! Refreshes the stored temperature of every known city in one pass. Provider
//! calls for all cities run concurrently on the calling task; each successful
//! fetch is persisted immediately and reported in completion order.
//!
//! The first failure aborts the pass. Fetches still in flight at that point
//! are dropped (cancelled); readings already written stay written.

use std::time::Instant;

use chrono::Utc;
use futures::stream::{FuturesUnordered, StreamExt};
use metrics::{counter, histogram};
use sea_orm::DatabaseConnection;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, instrument, warn};
use utoipa::ToSchema;

use crate::models::city;
use crate::repositories::{CityRepository, RepositoryError, TemperatureRepository};
use crate::weather::{TemperatureProvider, WeatherError};

#[derive(Debug, Error)]
pub enum UpdateError {
    /// Nothing to update
    #[error("{0}")]
    InvalidRequest(String),
    #[error(transparent)]
    Provider(#[from] WeatherError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

/// Fresh reading recorded for one city
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct CityTemperature {
    #[schema(example = 1)]
    pub city_id: i32,
    /// Degrees Celsius
    #[schema(example = 12.3)]
    pub temperature: f64,
}

/// Outcome of a full update pass
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TemperatureUpdateSummary {
    /// Number of cities that received a new reading
    pub updated: usize,
    /// Readings in the order they completed
    pub results: Vec<CityTemperature>,
}

pub struct TemperatureUpdater<'a> {
    db: &'a DatabaseConnection,
    provider: &'a dyn TemperatureProvider,
}

impl<'a> TemperatureUpdater<'a> {
    pub fn new(db: &'a DatabaseConnection, provider: &'a dyn TemperatureProvider) -> Self {
        Self { db, provider }
    }

    /// Fetch and store the current temperature for every city.
    #[instrument(skip_all)]
    pub async fn update_all(&self) -> Result<TemperatureUpdateSummary, UpdateError> {
        let cities = CityRepository::new(self.db).list().await?;
        if cities.is_empty() {
            return Err(UpdateError::InvalidRequest(
                "No cities found. Create cities first.".to_string(),
            ));
        }

        let started = Instant::now();
        let mut pending: FuturesUnordered<_> =
            cities.iter().map(|city| self.refresh_city(city)).collect();
        let mut results = Vec::with_capacity(cities.len());

        while let Some(outcome) = pending.next().await {
            match outcome {
                Ok(reading) => results.push(reading),
                Err(err) => {
                    warn!(
                        error = %err,
                        completed = results.len(),
                        cancelled = pending.len(),
                        "Temperature update aborted"
                    );
                    counter!("temperature_update_failures_total").increment(1);
                    return Err(err);
                }
            }
        }

        histogram!("temperature_update_duration_seconds").record(started.elapsed().as_secs_f64());
        counter!("temperature_readings_recorded_total").increment(results.len() as u64);
        info!(updated = results.len(), "Temperature update completed");

        Ok(TemperatureUpdateSummary {
            updated: results.len(),
            results,
        })
    }

    async fn refresh_city(&self, city: &city::Model) -> Result<CityTemperature, UpdateError> {
        let temperature = self
            .provider
            .fetch_current_temperature(city.latitude, city.longitude)
            .await?;

        TemperatureRepository::new(self.db)
            .create(city.id, temperature, Some(Utc::now()))
            .await?;

        Ok(CityTemperature {
            city_id: city.id,
            temperature,
        })
    }
}
