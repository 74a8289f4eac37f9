// src/main.rs
// =============================================================================
// Entry point of the catalog-harvester CLI.
//
// What happens here:
// 1. Load .env, then set up logging
// 2. Parse command-line arguments
// 3. Connect to Postgres and make sure the products table exists
// 4. Wire fetcher, store, walker, driver and exporter together and run
// 5. Print the summary and exit (0 = done, 1 = partial run, 2 = error)
//
// Only this layer may stop the process. The scraping pipeline itself always
// returns a report, whatever happened to individual products.
// =============================================================================

mod cli;
mod config;
mod export;
mod product;
mod scrape;
mod storage;

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Commands, Pagination};
use config::{Config, DatabaseConfig};
use export::{CsvExporter, Exporter};
use scrape::{CategoryWalker, DetailWorker, HttpFetcher, PipelineDriver, RunReport};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use storage::{MemoryStore, PostgresStore, ProductStore};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    // Before logging, so RUST_LOG may come from .env
    let dotenv = config::load_dotenv();
    init_logging();
    config::log_dotenv(&dotenv);

    let exit_code = match run().await {
        Ok(code) => code,
        Err(e) => {
            tracing::error!("{:#}", e);
            eprintln!("Error: {:#}", e);
            2
        }
    };

    std::process::exit(exit_code);
}

// Logs go to stderr so stdout stays clean for the summary / JSON report.
// RUST_LOG overrides the default level.
fn init_logging() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,sqlx=warn".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(true)
                .with_writer(std::io::stderr),
        )
        .init();
}

async fn run() -> Result<i32> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Scrape {
            category_url,
            quota,
            pagination,
            max_empty_pages,
            output,
            timeout_secs,
            dry_run,
            json,
        } => {
            let settings = ScrapeSettings {
                quota,
                pagination,
                max_empty_pages: usize::try_from(max_empty_pages).context("--max-empty-pages is too large")?,
                output,
                timeout: timeout_secs.map(Duration::from_secs),
                json,
            };
            let config = Config::from_env(category_url.as_deref(), !dry_run)?;
            handle_scrape(config, settings).await
        }
        Commands::Export { limit, output } => handle_export(limit, output).await,
    }
}

// Flags that shape one scrape run
struct ScrapeSettings {
    quota: usize,
    pagination: Pagination,
    max_empty_pages: usize,
    output: PathBuf,
    timeout: Option<Duration>,
    json: bool,
}

async fn handle_scrape(config: Config, settings: ScrapeSettings) -> Result<i32> {
    tracing::info!(url = %config.category_url, quota = settings.quota, "Starting scrape");

    let (store, dry_run_store) = open_store(config.database.as_ref()).await?;

    let fetcher = Arc::new(HttpFetcher::new(settings.timeout).context("Failed to build HTTP client")?);
    let worker = DetailWorker::new(fetcher.clone(), store.clone());
    let walker = CategoryWalker::new(fetcher, worker, settings.quota);
    let exporter = Arc::new(CsvExporter::new(store, settings.output));

    let driver = PipelineDriver::new(
        walker,
        settings.pagination.strategy(),
        exporter,
        config.category_url,
        settings.max_empty_pages,
    );
    let report = driver.run().await;

    if let Some(memory) = dry_run_store {
        tracing::info!(stored = memory.len().await, "Dry run finished, nothing written to Postgres");
    }

    print_report(&report, settings.json)?;
    Ok(if report.is_success() { 0 } else { 1 })
}

// Postgres when configured, otherwise a memory store that the caller keeps
// a handle on to report what a dry run collected
async fn open_store(
    database: Option<&DatabaseConfig>,
) -> Result<(Arc<dyn ProductStore>, Option<Arc<MemoryStore>>)> {
    match database {
        Some(database) => {
            let store: Arc<dyn ProductStore> = Arc::new(open_postgres(database).await?);
            Ok((store, None))
        }
        None => {
            let memory = Arc::new(MemoryStore::new());
            let store: Arc<dyn ProductStore> = memory.clone();
            Ok((store, Some(memory)))
        }
    }
}

async fn handle_export(limit: usize, output: PathBuf) -> Result<i32> {
    let database = DatabaseConfig::from_env()?;
    let store = Arc::new(open_postgres(&database).await?);
    let exporter = CsvExporter::new(store, output);

    let written = exporter
        .export_latest(limit)
        .await
        .context("Error exporting to CSV")?;

    println!("Exported {} product(s) to {}", written, exporter.path().display());
    Ok(0)
}

async fn open_postgres(database: &DatabaseConfig) -> Result<PostgresStore> {
    let store = PostgresStore::connect(database.connect_options())
        .await
        .with_context(|| format!("Error connecting to the database at {}:{}", database.host, database.port))?;
    store.migrate().await.context("Error migrating database")?;
    Ok(store)
}

fn print_report(report: &RunReport, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(report)?);
    } else {
        println!("{}", report.summary());
    }
    Ok(())
}
