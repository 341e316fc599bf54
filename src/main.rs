//! Subtran - Concurrent Subtitle Batch Translation
//!
//! Entry point: parses flags, sets up logging and the error log, then hands
//! the input path to the batch workflow.

use anyhow::{Context, Result};
use clap::Parser;
use std::path::Path;
use tracing::{info, Level};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::{non_blocking, rolling};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use subtran::cli::Args;
use subtran::config::Config;
use subtran::error_log::ErrorLog;
use subtran::workflow::Workflow;

const DEFAULT_CONFIG_FILE: &str = "subtran.toml";

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let _log_guard = setup_logging(args.verbose)?;

    let mut config = load_config(args.config.as_deref())?;
    if let Some(endpoint) = &args.endpoint {
        config.translate.endpoint = endpoint.clone();
    }

    let errors = ErrorLog::open(&config.batch.error_log)
        .with_context(|| format!("Failed to open error log file {}", config.batch.error_log))?;

    info!(
        "Translating {} to '{}' with {} workers via {}",
        args.input.display(),
        args.lang,
        args.worker_count(),
        config.translate.endpoint
    );

    let workflow = Workflow::new(config, args.worker_count())?;
    let summary = workflow.run(&args.input, &args.lang, errors).await?;

    println!("\n{}", summary);

    if summary.is_fatal() {
        anyhow::bail!("Processing error: {} was not translated", args.input.display());
    }

    Ok(())
}

/// Explicit `--config` first, then `subtran.toml` in the working directory, then defaults
fn load_config(path: Option<&Path>) -> Result<Config> {
    let config = match path {
        Some(config_path) => Config::from_file(config_path)?,
        None => {
            if Path::new(DEFAULT_CONFIG_FILE).exists() {
                info!("Found {} in current directory, loading...", DEFAULT_CONFIG_FILE);
                Config::from_file(DEFAULT_CONFIG_FILE)?
            } else {
                Config::default()
            }
        }
    };
    Ok(config)
}

/// Setup logging to both console and file
fn setup_logging(verbose: bool) -> Result<WorkerGuard> {
    let log_dir = std::env::current_dir()?.join(".subtran").join("log");
    std::fs::create_dir_all(&log_dir)?;

    // Daily rotation; the guard flushes the file writer on exit
    let file_appender = rolling::daily(&log_dir, "subtran.log");
    let (non_blocking_file, guard) = non_blocking(file_appender);

    let log_level = if verbose { Level::DEBUG } else { Level::INFO };

    let console_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false);

    let file_layer = fmt::layer()
        .with_writer(non_blocking_file)
        .with_target(false)
        .with_thread_ids(true)
        .with_file(true)
        .with_line_number(true)
        .with_ansi(false);

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env().add_directive(log_level.into()))
        .with(console_layer)
        .with(file_layer)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))?;

    info!(
        "Logging initialized - console: {}, file: {}",
        log_level,
        log_dir.join("subtran.log").display()
    );

    Ok(guard)
}
