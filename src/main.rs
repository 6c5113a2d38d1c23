use anyhow::{Context, Result};
use clap::Parser;
use neural_run::Scenario;
use tracing_subscriber::EnvFilter;

/// Train and test a classifier on a synthetic dataset.
#[derive(Parser)]
#[command(name = "neural-run")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Scenario to run: small, quad or ranges
    scenario: String,

    /// Space-separated positional overrides, e.g. "10000 2000 10 0.002"
    ///
    /// Order: train_size test_size epochs learning_rate batch_size
    /// hidden_size... log_probability
    #[arg(allow_hyphen_values = true)]
    overrides: Option<String>,

    /// Seed for the master random stream (default: clock)
    #[arg(long)]
    seed: Option<u64>,

    /// Write the run report as JSON to this path
    #[cfg(feature = "serde")]
    #[arg(long)]
    report: Option<std::path::PathBuf>,
}

const DEFAULT_LOG_FILTER: &str = "neural_run=info";

/// `RUST_LOG` when it is set and parses, `neural_run=info` otherwise.
fn log_filter(rust_log: Option<&str>) -> EnvFilter {
    rust_log
        .and_then(|directives| EnvFilter::try_new(directives).ok())
        .unwrap_or_else(|| EnvFilter::new(DEFAULT_LOG_FILTER))
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(log_filter(std::env::var("RUST_LOG").ok().as_deref()))
        .init();

    let cli = Cli::parse();

    let scenario: Scenario = cli.scenario.parse()?;
    let mut config = scenario
        .config(cli.overrides.as_deref().unwrap_or(""))
        .with_context(|| format!("invalid arguments for scenario `{scenario}`"))?;
    if cli.seed.is_some() {
        config.seed = cli.seed;
    }

    let report = neural_run::run(scenario, config)
        .with_context(|| format!("scenario `{scenario}` failed"))?;

    #[cfg(feature = "serde")]
    if let Some(path) = &cli.report {
        std::fs::write(path, report.to_json()?)
            .with_context(|| format!("failed to write report to {}", path.display()))?;
        tracing::info!("Report written to {}", path.display());
    }
    #[cfg(not(feature = "serde"))]
    let _ = report;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracing::level_filters::LevelFilter;

    #[test]
    fn rust_log_overrides_the_default_level() {
        let filter = log_filter(Some("neural_run=debug"));
        assert_eq!(filter.max_level_hint(), Some(LevelFilter::DEBUG));
    }

    #[test]
    fn missing_rust_log_falls_back_to_info() {
        assert_eq!(log_filter(None).max_level_hint(), Some(LevelFilter::INFO));
        let warn = log_filter(Some("warn"));
        assert_eq!(warn.max_level_hint(), Some(LevelFilter::WARN));
    }
}
