use std::path::Path;

use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::cdp::browser_protocol::page::CaptureScreenshotFormat;
use chromiumoxide::page::ScreenshotParams;
use chromiumoxide::Page;
use futures::StreamExt;
use tokio::task::{self, JoinHandle};
use tracing::warn;

use crate::runner::VerifyError;

/// A scoped Chromium session: one browser process plus the CDP event
/// loop that keeps its connection alive. Dropping the session kills the
/// child process; `close` is the explicit, polite release.
pub struct BrowserSession {
    browser: Browser,
    handler_task: JoinHandle<()>,
}

impl BrowserSession {
    pub async fn launch(headless: bool) -> Result<Self, VerifyError> {
        let mut builder = BrowserConfig::builder();
        if !headless {
            builder = builder.with_head();
        }
        let config = builder.build().map_err(VerifyError::Config)?;

        let (browser, mut handler) = Browser::launch(config)
            .await
            .map_err(|e| VerifyError::Launch(e.to_string()))?;

        // The CDP connection stalls without a task draining handler events.
        let handler_task = task::spawn(async move {
            while let Some(event) = handler.next().await {
                if event.is_err() {
                    break;
                }
            }
        });

        Ok(Self {
            browser,
            handler_task,
        })
    }

    pub async fn new_page(&self) -> Result<Page, VerifyError> {
        self.browser
            .new_page("about:blank")
            .await
            .map_err(|e| VerifyError::Launch(format!("failed to open page: {}", e)))
    }

    /// Drive the page to `url` and wait until the navigation settles.
    /// The caller bounds this with a timeout.
    pub async fn navigate(&self, page: &Page, url: &str) -> Result<(), VerifyError> {
        page.goto(url)
            .await
            .map_err(|e| VerifyError::Navigation(e.to_string()))?;
        page.wait_for_navigation()
            .await
            .map_err(|e| VerifyError::Navigation(e.to_string()))?;
        Ok(())
    }

    /// Read the document title. Failures surface to the caller, which
    /// decides whether they matter.
    pub async fn title(&self, page: &Page) -> Result<Option<String>, String> {
        page.get_title().await.map_err(|e| e.to_string())
    }

    /// Capture a full-page PNG and write it to `path`, overwriting any
    /// existing file.
    pub async fn screenshot(&self, page: &Page, path: &Path) -> Result<(), VerifyError> {
        let params = ScreenshotParams::builder()
            .format(CaptureScreenshotFormat::Png)
            .full_page(true)
            .build();

        page.save_screenshot(params, path)
            .await
            .map_err(|e| VerifyError::Screenshot(e.to_string()))?;
        Ok(())
    }

    /// Explicitly shut the browser down and reap the child process.
    /// Errors here are logged rather than propagated: the run's outcome
    /// is already decided by the time we release the session.
    pub async fn close(mut self) {
        if let Err(e) = self.browser.close().await {
            warn!("Browser close failed: {}", e);
        }
    }
}

impl Drop for BrowserSession {
    fn drop(&mut self) {
        // Dropping the Browser handle closes the connection and
        // chromiumoxide kills the child process cleanly; the event loop
        // task just needs to stop with it.
        self.handler_task.abort();
    }
}
