//! Search Provisioner Main Entry Point
//!
//! Provisions the catalog index, blob data source, skillset and indexer on an
//! Azure AI Search service, then exits with a status reflecting the outcome.

use std::env;
use std::process::ExitCode;

use dotenv::dotenv;
use search_provisioner::config::settings_path;
use search_provisioner::{Dependencies, Settings};
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initialize tracing/logging.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new("search_provisioner=info,search_provisioner_repository=info")
    });

    let json = env::var("LOG_FORMAT")
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    if json {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_target(true)
                    .with_thread_ids(true),
            )
            .init();

        info!(
            service_name = "search-provisioner",
            service_version = env!("CARGO_PKG_VERSION"),
            "Tracing initialized with JSON format"
        );
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_target(true).pretty())
            .init();

        info!(
            service_name = "search-provisioner",
            service_version = env!("CARGO_PKG_VERSION"),
            "Tracing initialized with console output"
        );
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    // Load environment variables from .env file
    dotenv().ok();

    init_tracing();

    let path = settings_path(env::args().nth(1), env::var("SETTINGS_PATH").ok());
    info!(settings_path = %path.display(), "Starting search provisioner");

    let settings = match Settings::resolve(&path) {
        Ok(settings) => settings,
        Err(e) => {
            error!(settings_path = %path.display(), error = %e, "Failed to load settings");
            return ExitCode::FAILURE;
        }
    };

    let deps = match Dependencies::new(&settings) {
        Ok(deps) => {
            info!("Dependencies initialized successfully");
            deps
        }
        Err(e) => {
            error!(error = %e, "Failed to initialize dependencies");
            return ExitCode::FAILURE;
        }
    };

    let report = deps.orchestrator.run().await;
    report.log_summary();

    ExitCode::from(report.exit_status())
}
