//! Test utilities for database testing.
//!
//! This module provides utilities for setting up in-memory SQLite databases
//! with migrations for testing purposes.

use anyhow::Result;
use async_trait::async_trait;
use city_temperatures::models::city;
use city_temperatures::repositories::{CityRepository, NewCity};
use city_temperatures::weather::{TemperatureProvider, WeatherError};
use migration::{Migrator, MigratorTrait};
use sea_orm::{Database, DatabaseConnection};

/// Sets up an in-memory SQLite database with all migrations applied.
///
/// Foreign keys stay enforced, as they are in production.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    let db = Database::connect("sqlite::memory:").await?;
    Migrator::up(&db, None).await?;
    Ok(db)
}

/// Creates a city with the given name and coordinates.
#[allow(dead_code)]
pub async fn seed_city(
    db: &DatabaseConnection,
    name: &str,
    latitude: f64,
    longitude: f64,
) -> Result<city::Model> {
    let city = CityRepository::new(db)
        .create(NewCity {
            name: name.to_string(),
            additional_info: None,
            latitude,
            longitude,
        })
        .await?;
    Ok(city)
}

/// Provider stub answering every call with the same temperature.
#[allow(dead_code)]
pub struct FixedProvider(pub f64);

#[async_trait]
impl TemperatureProvider for FixedProvider {
    async fn fetch_current_temperature(&self, _: f64, _: f64) -> Result<f64, WeatherError> {
        Ok(self.0)
    }
}
