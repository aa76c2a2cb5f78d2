// src/main.rs
// student-tracker - command-line client for the student performance tracker

use anyhow::Result;
use clap::Parser;
use student_tracker::cli::{AppContext, Cli, run};
use student_tracker::config::{self, TrackerConfig};
use tracing::{Level, debug};
use tracing_subscriber::FmtSubscriber;

/// Env var that sets the log level when --verbose is not given
const LOG_ENV: &str = "STUDENT_TRACKER_LOG";

#[tokio::main]
async fn main() -> Result<()> {
    // Global .env first, then the working directory's
    let _ = dotenvy::from_path(config::home_dir().join(".env"));
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    let log_level = if cli.verbose {
        Level::DEBUG
    } else {
        std::env::var(LOG_ENV)
            .ok()
            .and_then(|v| v.parse::<Level>().ok())
            .unwrap_or(Level::WARN)
    };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let config = TrackerConfig::load(cli.overrides())?;
    debug!(api_url = %config.api_url, token_file = %config.token_file.display(), "Configuration loaded");

    let ctx = AppContext::new(config);
    run(&ctx, cli.command).await?;
    Ok(())
}
