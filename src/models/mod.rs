//! # Data Models
//!
//! SeaORM entities for the `cities` and `temperatures` tables, plus small
//! response types shared by the handlers.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

pub mod city;
pub mod temperature;

pub use city::Entity as City;
pub use temperature::Entity as Temperature;

/// Basic service information response
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ServiceInfo {
    /// The name of the service
    pub service: String,
    /// The version of the service
    pub version: String,
}

impl Default for ServiceInfo {
    fn default() -> Self {
        Self {
            service: "city-temperatures".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}
