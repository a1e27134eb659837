//! # City Temperatures Library
//!
//! Core of the City Temperatures service: city CRUD, stored temperature
//! readings, and a concurrent refresh from the Open-Meteo provider.

pub mod cli;
pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod models;
pub mod repositories;
pub mod server;
pub mod services;
pub mod telemetry;
pub mod weather;
pub use migration;
