//! Temperature repository for database operations

use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ActiveValue::NotSet, ColumnTrait, DatabaseConnection, EntityTrait,
    QueryFilter, QueryOrder, Set,
};

use super::RepositoryError;
use crate::models::temperature::{self, Entity as Temperature};

/// Repository for temperature reading operations
pub struct TemperatureRepository<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> TemperatureRepository<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// Insert a reading, stamped with the current UTC time unless `date_time`
    /// is given.
    pub async fn create(
        &self,
        city_id: i32,
        temperature: f64,
        date_time: Option<DateTime<Utc>>,
    ) -> Result<temperature::Model, RepositoryError> {
        let reading = temperature::ActiveModel {
            id: NotSet,
            city_id: Set(city_id),
            date_time: Set(date_time.unwrap_or_else(Utc::now).fixed_offset()),
            temperature: Set(temperature),
        };

        Ok(reading.insert(self.db).await?)
    }

    /// Readings newest first (timestamp, then id), optionally for one city.
    pub async fn list(
        &self,
        city_id: Option<i32>,
    ) -> Result<Vec<temperature::Model>, RepositoryError> {
        let mut query = Temperature::find();
        if let Some(city_id) = city_id {
            query = query.filter(temperature::Column::CityId.eq(city_id));
        }

        let readings = query
            .order_by_desc(temperature::Column::DateTime)
            .order_by_desc(temperature::Column::Id)
            .all(self.db)
            .await?;
        Ok(readings)
    }
}
