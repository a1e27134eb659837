//! City repository for database operations

use sea_orm::{
    ActiveModelTrait, ActiveValue::NotSet, ColumnTrait, DatabaseConnection, EntityTrait,
    IntoActiveModel, QueryFilter, QueryOrder, Set, TransactionTrait,
};

use super::RepositoryError;
use crate::models::city::{self, Entity as City};
use crate::models::temperature::{self, Entity as Temperature};

const NAME_TAKEN: &str = "City with this name already exists";

/// Validated input for a new city
#[derive(Debug, Clone)]
pub struct NewCity {
    pub name: String,
    pub additional_info: Option<String>,
    pub latitude: f64,
    pub longitude: f64,
}

/// Partial update of a city. `None` leaves the field untouched; for
/// `additional_info`, `Some(None)` clears the stored value.
#[derive(Debug, Clone, Default)]
pub struct CityChanges {
    pub name: Option<String>,
    pub additional_info: Option<Option<String>>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

/// Repository for city database operations
pub struct CityRepository<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> CityRepository<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// Insert a city. Fails with `AlreadyExists` when the name is taken.
    pub async fn create(&self, new_city: NewCity) -> Result<city::Model, RepositoryError> {
        let model = city::ActiveModel {
            id: NotSet,
            name: Set(new_city.name),
            additional_info: Set(new_city.additional_info),
            latitude: Set(new_city.latitude),
            longitude: Set(new_city.longitude),
        };

        model
            .insert(self.db)
            .await
            .map_err(|err| RepositoryError::from_write(err, NAME_TAKEN))
    }

    /// All cities, ordered by id
    pub async fn list(&self) -> Result<Vec<city::Model>, RepositoryError> {
        let cities = City::find()
            .order_by_asc(city::Column::Id)
            .all(self.db)
            .await?;
        Ok(cities)
    }

    pub async fn get(&self, city_id: i32) -> Result<Option<city::Model>, RepositoryError> {
        Ok(City::find_by_id(city_id).one(self.db).await?)
    }

    /// Apply `changes` to `city`, touching only the fields that are present.
    pub async fn update(
        &self,
        city: city::Model,
        changes: CityChanges,
    ) -> Result<city::Model, RepositoryError> {
        let mut active = city.clone().into_active_model();

        if let Some(name) = changes.name {
            active.name = Set(name);
        }
        if let Some(additional_info) = changes.additional_info {
            active.additional_info = Set(additional_info);
        }
        if let Some(latitude) = changes.latitude {
            active.latitude = Set(latitude);
        }
        if let Some(longitude) = changes.longitude {
            active.longitude = Set(longitude);
        }

        if !active.is_changed() {
            return Ok(city);
        }

        active
            .update(self.db)
            .await
            .map_err(|err| RepositoryError::from_write(err, NAME_TAKEN))
    }

    /// Delete `city` together with its temperature readings in one transaction.
    pub async fn delete(&self, city: city::Model) -> Result<(), RepositoryError> {
        let txn = self.db.begin().await?;

        let readings = Temperature::delete_many()
            .filter(temperature::Column::CityId.eq(city.id))
            .exec(&txn)
            .await?;
        City::delete_by_id(city.id).exec(&txn).await?;

        txn.commit().await?;

        tracing::debug!(
            city_id = city.id,
            readings_deleted = readings.rows_affected,
            "Deleted city"
        );
        Ok(())
    }
}
