use anyhow::Context;
use clap::Parser;
use seatline::app::App;
use seatline::catalog::{CatalogSource, SavedPage, WebSocClient};
use seatline::cli::{Args, Command};
use seatline::config::{CatalogConfig, Config, ServerConfig};
use seatline::logging::setup_logging;
use seatline::lookup::{LookupPool, SeatLookup};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use tracing::{error, info};

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();

    let args = Args::parse();

    // Only the log level is needed here; secrets are checked when the server starts.
    let log_level = Config::figment()
        .extract::<ServerConfig>()
        .map(|server| server.log_level)
        .unwrap_or_else(|_| "info".to_owned());
    setup_logging(&log_level, args.tracing);

    match args.command.unwrap_or(Command::Serve) {
        Command::Serve => serve().await,
        Command::Check { query, page } => match check(&query, page).await {
            Ok(reply) => {
                println!("{reply}");
                ExitCode::SUCCESS
            }
            Err(e) => {
                error!(error = ?e, "lookup failed");
                eprintln!("error: {e:#}");
                ExitCode::FAILURE
            }
        },
    }
}

async fn serve() -> ExitCode {
    info!(
        version = env!("CARGO_PKG_VERSION"),
        commit = env!("GIT_COMMIT_SHORT"),
        environment = if cfg!(debug_assertions) {
            "development"
        } else {
            "production"
        },
        "starting seatline"
    );

    let app = match Config::load()
        .context("Failed to load config")
        .and_then(App::new)
    {
        Ok(app) => app,
        Err(e) => {
            error!(error = ?e, "startup failed");
            return ExitCode::FAILURE;
        }
    };

    app.run().await
}

/// Run one lookup without the webhook or Twilio.
async fn check(query: &[String], page: Option<PathBuf>) -> anyhow::Result<String> {
    let config: CatalogConfig = Config::figment()
        .extract()
        .context("Failed to load catalog config")?;

    let catalog: Arc<dyn CatalogSource> = match page {
        Some(path) => Arc::new(SavedPage::new(path)),
        None => Arc::new(WebSocClient::new(config.catalog_url, config.lookup_timeout)?),
    };
    let lookup = SeatLookup::new(catalog, LookupPool::new(1, config.lookup_timeout));

    let reply = lookup.answer(&query.join(" ")).await?;
    Ok(reply)
}
