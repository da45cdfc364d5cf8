//! Lifecycle demo.
//!
//! Runs a fleet of background workers under a [`Server`], then shuts them all
//! down on Ctrl+C or after a fixed run time.
//!
//! ```text
//! config (TOML) + CLI overrides
//!     → logging / metrics
//!     → WorkerApp fleet → Server::serve (sequential)
//!     → wait (Ctrl+C or --run-for)
//!     → Server::shutdown_with_context (concurrent) → report
//! ```

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::{Parser, ValueEnum};

use app_lifecycle::apps::WorkerApp;
use app_lifecycle::config::{load_config, validate_config, ConfigError, LifecycleConfig};
use app_lifecycle::observability::{logging, metrics};
use app_lifecycle::{App, Context, Server, ShutdownReport};

#[derive(Parser)]
#[command(name = "lifecycle-demo")]
#[command(about = "Start a fleet of workers and shut them down concurrently", long_about = None)]
struct Cli {
    /// TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the number of workers.
    #[arg(short = 'n', long)]
    apps: Option<usize>,

    /// Shut down after this many seconds instead of waiting for Ctrl+C.
    #[arg(long)]
    run_for: Option<u64>,

    /// Shutdown report format.
    #[arg(long, value_enum, default_value_t = ReportFormat::Text)]
    report: ReportFormat,
}

#[derive(Clone, Copy, ValueEnum)]
enum ReportFormat {
    Text,
    Json,
    Quiet,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => load_config(path)?,
        None => LifecycleConfig::default(),
    };
    if let Some(count) = cli.apps {
        config.apps.count = count;
    }
    validate_config(&config).map_err(ConfigError::Validation)?;

    logging::init_logging(&config.observability.log_level)?;
    tracing::info!("lifecycle-demo v{} starting", env!("CARGO_PKG_VERSION"));

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => {
                if let Err(e) = metrics::init_metrics(addr) {
                    tracing::error!(error = %e, "Failed to start metrics endpoint");
                }
            }
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let workers = WorkerApp::fleet(&config.apps);
    let apps: Vec<Arc<dyn App>> = workers
        .iter()
        .map(|w| Arc::clone(w) as Arc<dyn App>)
        .collect();
    let server = Server::new(apps);

    if let Err(e) = server.serve().await {
        tracing::error!(error = %e, "Startup failed, stopping apps");
        let report = server.shutdown_with_context(stop_context(&config)).await;
        print_report(&report, cli.report)?;
        return Err(e.into());
    }

    match cli.run_for {
        Some(secs) => {
            tracing::info!(secs, "Running for a fixed time");
            tokio::time::sleep(Duration::from_secs(secs)).await;
        }
        None => {
            tracing::info!("Running until Ctrl+C");
            tokio::signal::ctrl_c().await?;
            tracing::info!("Shutdown signal received");
        }
    }

    let report = server.shutdown_with_context(stop_context(&config)).await;
    let ticks: u64 = workers.iter().map(|w| w.ticks()).sum();
    tracing::info!(ticks, "Workers finished");

    print_report(&report, cli.report)?;
    Ok(())
}

fn stop_context(config: &LifecycleConfig) -> Context {
    match config.shutdown.stop_timeout() {
        Some(timeout) => Context::with_timeout(timeout),
        None => Context::background(),
    }
}

fn print_report(report: &ShutdownReport, format: ReportFormat) -> Result<(), serde_json::Error> {
    let summary = report.summary();
    match format {
        ReportFormat::Text => print!("{summary}"),
        ReportFormat::Json => println!("{}", serde_json::to_string_pretty(&summary)?),
        ReportFormat::Quiet => {}
    }
    Ok(())
}
