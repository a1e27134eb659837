//! Database migrations for the City Temperatures API.

pub use sea_orm_migration::prelude::*;

mod m2025_01_01_000001_create_cities;
mod m2025_01_01_000002_create_temperatures;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m2025_01_01_000001_create_cities::Migration),
            Box::new(m2025_01_01_000002_create_temperatures::Migration),
        ]
    }
}
