// src/config.rs
// =============================================================================
// Settings read from the environment (and a .env file, if there is one).
//
//   categoryURL   listing page to start from
//   DB_HOST       Postgres host
//   DB_PORT       Postgres port (default 5432)
//   DB_USER       Postgres user
//   DB_PASSWORD   Postgres password
//   DB_NAME       database name
//
// A missing required variable stops the program before any scraping starts.
// =============================================================================

use anyhow::{Context, Result};
use sqlx::postgres::{PgConnectOptions, PgSslMode};
use std::env;
use std::path::PathBuf;
use url::Url;

const DEFAULT_DB_PORT: u16 = 5432;

/// Everything the bootstrap layer needs before a run starts.
#[derive(Debug, Clone)]
pub struct Config {
    pub category_url: Url,
    /// None in dry-run mode, where nothing is written to Postgres
    pub database: Option<DatabaseConfig>,
}

impl Config {
    /// Reads the environment; call `load_dotenv` first.
    ///
    /// `category_override` comes from the command line and replaces
    /// `categoryURL`. Database variables are only required when
    /// `with_database` is set.
    pub fn from_env(category_override: Option<&str>, with_database: bool) -> Result<Self> {
        Ok(Self {
            category_url: category_url(category_override)?,
            database: if with_database {
                Some(DatabaseConfig::from_env()?)
            } else {
                None
            },
        })
    }
}

#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    pub name: String,
}

impl DatabaseConfig {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            host: required("DB_HOST")?,
            port: match env::var("DB_PORT") {
                Ok(port) => port
                    .parse()
                    .with_context(|| format!("DB_PORT must be a valid port number, got '{}'", port))?,
                Err(_) => DEFAULT_DB_PORT,
            },
            user: required("DB_USER")?,
            password: env::var("DB_PASSWORD").unwrap_or_default(),
            name: required("DB_NAME")?,
        })
    }

    /// Connection options for sqlx. TLS is off, as for a local database.
    pub fn connect_options(&self) -> PgConnectOptions {
        PgConnectOptions::new()
            .host(&self.host)
            .port(self.port)
            .username(&self.user)
            .password(&self.password)
            .database(&self.name)
            .ssl_mode(PgSslMode::Disable)
    }
}

/// Loads `.env` if present. Variables already set in the process win.
///
/// Runs before logging is set up (RUST_LOG may live in `.env`), so the
/// outcome is handed back for `log_dotenv` to report afterwards.
pub fn load_dotenv() -> dotenvy::Result<PathBuf> {
    dotenvy::dotenv()
}

pub fn log_dotenv(loaded: &dotenvy::Result<PathBuf>) {
    match loaded {
        Ok(path) => tracing::debug!(path = %path.display(), "Loaded .env"),
        Err(e) if e.not_found() => tracing::debug!("No .env file found"),
        Err(e) => tracing::warn!(error = %e, "Could not load .env"),
    }
}

fn category_url(cli_value: Option<&str>) -> Result<Url> {
    let raw = match cli_value {
        Some(value) => value.to_string(),
        None => required("categoryURL")?,
    };
    Url::parse(&raw).with_context(|| format!("Invalid category URL '{}'", raw))
}

fn required(name: &str) -> Result<String> {
    env::var(name).with_context(|| format!("{} must be set", name))
}
