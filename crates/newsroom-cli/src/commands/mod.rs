//! CLI command definitions and dispatch.

pub mod migrate;
pub mod report;
pub mod risk;
pub mod score;

use std::sync::Arc;

use clap::{Parser, Subcommand};

use crate::output::OutputFormat;
use newsroom_core::config::AppConfig;
use newsroom_core::error::AppError;
use newsroom_database::{DatabasePool, PgFactStore};
use newsroom_service::AnalyticsEngine;

/// Newsroom: newsletter analytics reports and maintenance
#[derive(Debug, Parser)]
#[command(name = "newsroom", version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "config/default.toml")]
    pub config: String,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub format: OutputFormat,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Database migration management
    Migrate(migrate::MigrateArgs),
    /// Run an analytics report
    Report(report::ReportArgs),
    /// Score a single subscriber or source
    Score(score::ScoreArgs),
    /// Risk tier maintenance
    Risk(risk::RiskArgs),
}

impl Cli {
    /// Execute the CLI command
    pub async fn execute(&self) -> Result<(), AppError> {
        match &self.command {
            Commands::Migrate(args) => migrate::execute(args, &self.config).await,
            Commands::Report(args) => report::execute(args, &self.config, self.format).await,
            Commands::Score(args) => score::execute(args, &self.config, self.format).await,
            Commands::Risk(args) => risk::execute(args, &self.config, self.format).await,
        }
    }
}

/// Helper: load configuration from file
pub fn load_config(config_path: &str) -> Result<AppConfig, AppError> {
    let env = std::env::var("NEWSROOM_ENV").ok();
    AppConfig::load(config_path, env.as_deref())
}

/// Helper: create database pool from config
pub async fn create_db_pool(config: &AppConfig) -> Result<DatabasePool, AppError> {
    DatabasePool::connect(&config.database).await
}

/// Helper: connect and build the analytics engine over PostgreSQL.
///
/// The pool is returned alongside so callers can close it when done.
pub async fn create_engine(config_path: &str) -> Result<(DatabasePool, AnalyticsEngine), AppError> {
    let config = load_config(config_path)?;
    let pool = create_db_pool(&config).await?;
    let store = Arc::new(PgFactStore::new(pool.pool().clone()));
    let engine = AnalyticsEngine::new(store, &config.analytics);
    Ok((pool, engine))
}
