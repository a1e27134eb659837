//! Command-line entry points.

use anyhow::Context;
use clap::{Parser, Subcommand};

use crate::config::AppConfig;
use crate::db;
use crate::server::{AppState, run_server};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(
    name = "city-temperatures",
    version,
    about = "City and temperature records backed by Open-Meteo"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Subcommand)]
pub enum Command {
    /// Apply migrations, then serve the HTTP API (default).
    Serve,
    /// Apply pending database migrations and exit.
    Migrate,
}

impl Cli {
    pub async fn run(self, config: AppConfig) -> anyhow::Result<()> {
        let db = db::init_pool(&config)
            .await
            .context("initializing database connection pool")?;
        db::run_migrations(&db).await?;

        match self.command.unwrap_or(Command::Serve) {
            Command::Migrate => Ok(()),
            Command::Serve => run_server(AppState::new(config, db)?).await,
        }
    }
}
