use std::path::PathBuf;
use std::time::Duration;

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::cdp::browser_protocol::page::PrintToPdfParams;
use futures::StreamExt;
use thiserror::Error;
use tokio::time::{sleep, timeout};
use tracing::debug;

use crate::config;

/// A4 paper size in inches, matching the frontend's print layout.
const A4_WIDTH_IN: f64 = 8.27;
const A4_HEIGHT_IN: f64 = 11.69;

/// Flags required to run Chromium inside containerized deployments.
const BROWSER_ARGS: &[&str] = &[
    "--no-sandbox",
    "--disable-setuid-sandbox",
    "--disable-dev-shm-usage",
    "--disable-gpu",
    "--single-process",
    "--no-zygote",
];

/// Prepares an apostila page for print: expands every collapsed section,
/// strips the interactive chrome (controls, audio buttons, toggle icons),
/// flattens spoilers, and drops the embedded script and dark theme.
const CLEANUP_SCRIPT: &str = r#"
(function () {
    document.querySelectorAll('h2[role="button"]').forEach((heading) => {
        heading.setAttribute('aria-expanded', 'true');
        let next = heading.nextElementSibling;
        if (next && next.classList.contains('ouvir')) {
            next = next.nextElementSibling;
        }
        if (next && next.classList.contains('content')) {
            next.removeAttribute('hidden');
        }
    });

    const controls = document.querySelector('.controls');
    if (controls) {
        controls.remove();
    }
    document.querySelectorAll('.ouvir').forEach((button) => button.remove());
    document.querySelectorAll('.toggle-icon').forEach((icon) => {
        icon.textContent = ' ';
    });

    document.querySelectorAll('details.spoiler').forEach((details) => {
        const replacement = document.createElement('div');
        replacement.innerHTML = details.innerHTML;
        details.parentNode.replaceChild(replacement, details);
    });

    const script = document.querySelector('script');
    if (script) {
        script.remove();
    }

    document.body.classList.remove('dark');
})();
"#;

#[derive(Debug, Error)]
pub enum PdfError {
    #[error("failed to configure browser: {0}")]
    BrowserConfig(String),

    #[error(transparent)]
    Browser(#[from] chromiumoxide::error::CdpError),

    #[error("failed to evaluate page script: {0}")]
    Script(String),

    #[error("rendered page has no visible content")]
    EmptyBody,

    #[error("PDF rendering timed out after {0:?}")]
    Timeout(Duration),
}

/// Renders HTML to PDF through a headless Chromium instance.
///
/// One browser per render; no pooling. The process is torn down on every
/// path, including timeouts.
#[derive(Debug, Clone)]
pub struct PdfRenderer {
    chromium_path: Option<PathBuf>,
    render_timeout: Duration,
    settle_delay: Duration,
}

impl PdfRenderer {
    pub fn from_config() -> Self {
        let pdf = &config::config().pdf;
        Self {
            chromium_path: pdf.chromium_path.clone().map(PathBuf::from),
            render_timeout: Duration::from_secs(pdf.render_timeout_secs),
            settle_delay: Duration::from_millis(pdf.settle_delay_ms),
        }
    }

    pub async fn render(&self, html: &str) -> Result<Vec<u8>, PdfError> {
        let (mut browser, mut handler) = Browser::launch(self.browser_config()?).await?;

        // The handler drives the CDP websocket until the browser goes away.
        let driver = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if event.is_err() {
                    break;
                }
            }
        });

        let outcome = timeout(self.render_timeout, self.print_page(&browser, html)).await;

        if let Err(error) = browser.close().await {
            debug!(%error, "browser did not close cleanly");
        }
        driver.abort();

        match outcome {
            Ok(result) => result,
            Err(_) => Err(PdfError::Timeout(self.render_timeout)),
        }
    }

    async fn print_page(&self, browser: &Browser, html: &str) -> Result<Vec<u8>, PdfError> {
        let page = browser.new_page(data_url(html)).await?;
        page.wait_for_navigation().await?;

        page.evaluate(CLEANUP_SCRIPT).await?;
        sleep(self.settle_delay).await;

        let text_len: u64 = page
            .evaluate("document.body ? document.body.innerText.trim().length : 0")
            .await?
            .into_value()
            .map_err(|e| PdfError::Script(e.to_string()))?;
        if text_len == 0 {
            return Err(PdfError::EmptyBody);
        }

        Ok(page.pdf(print_params()).await?)
    }

    fn browser_config(&self) -> Result<BrowserConfig, PdfError> {
        let mut builder = BrowserConfig::builder().args(BROWSER_ARGS.iter().copied());
        if let Some(path) = &self.chromium_path {
            builder = builder.chrome_executable(path);
        }
        builder.build().map_err(PdfError::BrowserConfig)
    }
}

fn data_url(html: &str) -> String {
    format!("data:text/html;base64,{}", BASE64.encode(html))
}

fn print_params() -> PrintToPdfParams {
    PrintToPdfParams {
        print_background: Some(true),
        paper_width: Some(A4_WIDTH_IN),
        paper_height: Some(A4_HEIGHT_IN),
        margin_top: Some(1.0),
        margin_bottom: Some(1.0),
        margin_left: Some(0.5),
        margin_right: Some(0.5),
        ..Default::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn data_url_round_trips() {
        let html = "<html><body>Olá, apostila</body></html>";
        let url = data_url(html);

        let encoded = url.strip_prefix("data:text/html;base64,").unwrap();
        let decoded = BASE64.decode(encoded).unwrap();
        assert_eq!(decoded, html.as_bytes());
    }

    #[test]
    fn print_params_use_a4_with_print_background() {
        let params = print_params();
        assert_eq!(params.print_background, Some(true));
        assert_eq!(params.paper_width, Some(8.27));
        assert_eq!(params.paper_height, Some(11.69));
        assert_eq!(params.margin_top, Some(1.0));
        assert_eq!(params.margin_left, Some(0.5));
        assert!(params.landscape.is_none());
    }

    #[test]
    fn browser_args_disable_sandboxing() {
        assert!(BROWSER_ARGS.contains(&"--no-sandbox"));
        assert!(BROWSER_ARGS.contains(&"--disable-dev-shm-usage"));
    }
}
