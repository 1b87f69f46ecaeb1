//! braintrust-export CLI
//!
//! Reads configuration from the environment (and a `.env` file if present),
//! applies command-line overrides, and exports one project.

use std::path::PathBuf;
use std::process::ExitCode;

use braintrust_export::{Config, ExportKind, Exporter, FailurePolicy, ToExitCode};
use clap::{Parser, ValueEnum};

#[derive(Parser)]
#[command(name = "braintrust-export")]
#[command(version, about = "Export Braintrust experiments and datasets to CSV", long_about = None)]
struct Cli {
    /// Project to export (overrides PROJECT_NAME)
    #[arg(long, short = 'p')]
    project: Option<String>,

    /// Base export directory (overrides OUTPUT_DIR)
    #[arg(long, short = 'o')]
    output_dir: Option<PathBuf>,

    /// API base URL (overrides BRAINTRUST_API_URL)
    #[arg(long)]
    api_url: Option<String>,

    /// Number of items exported at once (overrides EXPORT_CONCURRENCY)
    #[arg(long, short = 'j')]
    concurrency: Option<usize>,

    /// Stop at the first experiment/dataset that fails
    #[arg(long)]
    fail_fast: bool,

    /// Export only one kind of object
    #[arg(long, value_enum)]
    only: Option<Only>,
}

#[derive(Clone, Copy, ValueEnum)]
enum Only {
    Experiments,
    Datasets,
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let config = match load_config(cli) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!(code = e.error_code(), "{e}");
            return ExitCode::from(e.exit_code());
        }
    };

    let exporter = match Exporter::new(config) {
        Ok(exporter) => exporter,
        Err(e) => {
            tracing::error!(code = e.error_code(), "{e}");
            return ExitCode::from(e.exit_code());
        }
    };

    match exporter.run().await {
        Ok(summary) if summary.is_success() => ExitCode::SUCCESS,
        Ok(summary) => {
            tracing::error!(
                failed = summary.failures.len(),
                exported = summary.exported.len(),
                "Some experiments or datasets were not exported"
            );
            ExitCode::FAILURE
        }
        Err(e) => {
            tracing::error!(code = e.error_code(), "{e}");
            ExitCode::from(e.exit_code())
        }
    }
}

/// Environment first, then command-line overrides, then validation
fn load_config(cli: Cli) -> braintrust_export::Result<Config> {
    let mut config = Config::from_lookup(|key| {
        // The project may come from the command line instead of the environment
        if key == braintrust_export::config::ENV_PROJECT_NAME {
            if let Some(project) = &cli.project {
                return Some(project.clone());
            }
        }
        std::env::var(key).ok()
    })?;

    if let Some(dir) = cli.output_dir {
        config.output_dir = dir;
    }
    if let Some(url) = cli.api_url {
        config.api_url = url;
    }
    if let Some(n) = cli.concurrency {
        config.concurrency = n;
    }
    if cli.fail_fast {
        config.failure_policy = FailurePolicy::AbortOnFirst;
    }
    if let Some(only) = cli.only {
        config.kinds = match only {
            Only::Experiments => vec![ExportKind::Experiment],
            Only::Datasets => vec![ExportKind::Dataset],
        };
    }

    config.validate()?;
    Ok(config)
}
