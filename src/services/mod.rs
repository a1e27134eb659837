//! Domain services that coordinate repositories and external providers.

pub mod temperature_update;

pub use temperature_update::{CityTemperature, TemperatureUpdateSummary, UpdateError};
