use std::path::PathBuf;

use thiserror::Error;
use tracing::{info, warn};

use crate::browser::BrowserSession;
use crate::config::VerifyConfig;

#[derive(Error, Debug)]
pub enum VerifyError {
    #[error("Failed to launch browser: {0}")]
    Launch(String),
    #[error("Invalid browser configuration: {0}")]
    Config(String),
    #[error("Navigation to {url} timed out after {secs}s")]
    NavigationTimeout { url: String, secs: u64 },
    #[error("Navigation failed: {0}")]
    Navigation(String),
    #[error("Screenshot capture failed: {0}")]
    Screenshot(String),
    #[error("Invalid target url: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

/// Outcome of a completed run. The title fields are diagnostic only;
/// a mismatch never turns a run into a failure.
#[derive(Debug)]
pub struct VerifyReport {
    /// `Some(true)` if the page title equalled the expected one,
    /// `Some(false)` on mismatch, `None` if no title could be read.
    pub title_matched: Option<bool>,
    pub actual_title: Option<String>,
    pub screenshot: PathBuf,
}

/// Launch a browser, visit the configured dashboard, best-effort check
/// the title, and write a full-page screenshot. The browser is released
/// on every exit path, including navigation failure.
pub async fn run(config: &VerifyConfig) -> Result<VerifyReport, VerifyError> {
    url::Url::parse(&config.url)?;

    let session = BrowserSession::launch(config.headless).await?;
    let report = verify(&session, config).await;
    session.close().await;

    report
}

async fn verify(
    session: &BrowserSession,
    config: &VerifyConfig,
) -> Result<VerifyReport, VerifyError> {
    let page = session.new_page().await?;

    info!(url = %config.url, "Navigating to dashboard");
    match tokio::time::timeout(config.nav_timeout(), session.navigate(&page, &config.url)).await {
        Ok(result) => result?,
        Err(_) => {
            return Err(VerifyError::NavigationTimeout {
                url: config.url.clone(),
                secs: config.timeout_secs,
            })
        }
    }

    info!(expected = %config.expected_title, "Checking page title");
    let actual_title = match session.title(&page).await {
        Ok(title) => title,
        Err(e) => {
            // Diagnostic only. A page that cannot report its title must
            // not block the screenshot.
            warn!("Could not read page title: {}", e);
            None
        }
    };
    let title_matched = title_matches(actual_title.as_deref(), &config.expected_title);
    match title_matched {
        Some(true) => info!("Page title matches"),
        Some(false) => warn!(
            actual = actual_title.as_deref().unwrap_or_default(),
            "Page title does not match expected"
        ),
        None => warn!("Page reported no title"),
    }

    info!(path = %config.output.display(), "Taking screenshot");
    session.screenshot(&page, &config.output).await?;

    Ok(VerifyReport {
        title_matched,
        actual_title,
        screenshot: config.output.clone(),
    })
}

fn title_matches(actual: Option<&str>, expected: &str) -> Option<bool> {
    actual.map(|title| title == expected)
}
