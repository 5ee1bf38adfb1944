use std::path::PathBuf;

use clap::Parser;
use dotenvy::dotenv;
use tracing::info;

use dashcheck::config::VerifyConfig;
use dashcheck::logging::{init_logging, LoggingConfig};
use dashcheck::runner;

/// Capture a verification screenshot of a locally running dashboard.
#[derive(Parser, Debug)]
#[command(name = "dashcheck", version)]
struct Cli {
    /// Target URL to open
    #[arg(long)]
    url: Option<String>,

    /// Expected page title (best-effort check, never fails the run)
    #[arg(long)]
    title: Option<String>,

    /// Screenshot output path
    #[arg(long)]
    output: Option<PathBuf>,

    /// Navigation timeout in seconds
    #[arg(long)]
    timeout_secs: Option<u64>,

    /// Run the browser with a visible window (for local debugging)
    #[arg(long)]
    headed: bool,

    /// Explicit config file instead of the default search path
    #[arg(long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let _ = dotenv();
    let _guard = init_logging(LoggingConfig::default())?;

    let cli = Cli::parse();
    let mut config = match &cli.config {
        Some(path) => VerifyConfig::load_from(path)?,
        None => VerifyConfig::load(),
    };
    config.apply_env();

    if let Some(url) = cli.url {
        config.url = url;
    }
    if let Some(title) = cli.title {
        config.expected_title = title;
    }
    if let Some(output) = cli.output {
        config.output = output;
    }
    if let Some(secs) = cli.timeout_secs {
        config.timeout_secs = secs;
    }
    if cli.headed {
        config.headless = false;
    }

    let report = runner::run(&config).await?;
    info!(
        screenshot = %report.screenshot.display(),
        title_matched = ?report.title_matched,
        "Verification run complete"
    );

    Ok(())
}
