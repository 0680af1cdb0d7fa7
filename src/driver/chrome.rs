use async_trait::async_trait;
use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::cdp::browser_protocol::network::{Headers, SetExtraHttpHeadersParams};
use chromiumoxide::cdp::js_protocol::runtime::EvaluateParams;
use chromiumoxide::error::CdpError;
use chromiumoxide::Page;
use futures::StreamExt;
use serde::de::DeserializeOwned;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::app::{ClippingError, Result};
use crate::driver::config::DriverConfig;
use crate::driver::extractor::{ExtractionScripts, FetchedBinary};
use crate::driver::{DriverError, DriverErrorKind, ExtractMode, Extraction, PageDriver};

/// Chrome-backed page driver using chromiumoxide.
///
/// Holds one tab for the whole crawl. The tab is recreated lazily after a
/// failure that reported it closed.
pub struct ChromeDriver {
    browser: Browser,
    handler: JoinHandle<()>,
    page: Mutex<Option<Page>>,
    config: DriverConfig,
    scripts: ExtractionScripts,
}

fn classify_cdp(err: &CdpError) -> DriverErrorKind {
    match err {
        CdpError::Timeout => DriverErrorKind::TimedOut,
        CdpError::NoResponse | CdpError::ChannelSendError(_) => DriverErrorKind::SessionClosed,
        CdpError::Ws(_) => DriverErrorKind::Disconnected,
        other => DriverError::classify_message(&other.to_string()),
    }
}

fn cdp_error(context: &str, err: &CdpError) -> DriverError {
    DriverError::new(classify_cdp(err), format!("{}: {}", context, err))
}

impl ChromeDriver {
    /// Launch a browser with the given configuration
    pub async fn launch(config: DriverConfig) -> Result<Self> {
        let mut builder = BrowserConfig::builder()
            .arg("--no-sandbox")
            .arg("--disable-setuid-sandbox")
            .arg("--disable-dev-shm-usage")
            .arg("--disable-gpu")
            .request_timeout(config.navigation_timeout());

        if !config.headless {
            builder = builder.with_head();
        }

        if let Some(ref executable) = config.executable {
            builder = builder.chrome_executable(executable);
        }

        let browser_config = builder
            .build()
            .map_err(|e| ClippingError::Browser(format!("Failed to build browser config: {}", e)))?;

        let (browser, mut handler) = Browser::launch(browser_config).await.map_err(|e| {
            ClippingError::Browser(format!(
                "Failed to launch browser: {}. Is Chrome or Chromium installed and in PATH?",
                e
            ))
        })?;

        let handler = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if let Err(e) = event {
                    debug!("Browser handler error: {}", e);
                }
            }
        });

        info!(headless = config.headless, "Browser launched");

        let scripts = ExtractionScripts::new(config.selectors.clone());

        Ok(Self {
            browser,
            handler,
            page: Mutex::new(None),
            config,
            scripts,
        })
    }

    async fn open_page(&self) -> std::result::Result<Page, DriverError> {
        let page = self
            .browser
            .new_page("about:blank")
            .await
            .map_err(|e| cdp_error("Failed to create page", &e))?;

        if let Some(ref ua) = self.config.user_agent {
            page.set_user_agent(ua)
                .await
                .map_err(|e| cdp_error("Failed to set user agent", &e))?;
        }

        if let Some(ref language) = self.config.accept_language {
            let headers = Headers::new(serde_json::json!({ "Accept-Language": language }));
            page.execute(SetExtraHttpHeadersParams::new(headers))
                .await
                .map_err(|e| cdp_error("Failed to set request headers", &e))?;
        }

        Ok(page)
    }

    /// Current tab, created on first use or after it was discarded
    async fn page(&self) -> std::result::Result<Page, DriverError> {
        let mut slot = self.page.lock().await;
        if let Some(ref page) = *slot {
            return Ok(page.clone());
        }

        let page = self.open_page().await?;
        *slot = Some(page.clone());
        Ok(page)
    }

    async fn discard_closed_page(&self, err: &DriverError) {
        if err.kind != DriverErrorKind::SessionClosed {
            return;
        }

        if let Some(page) = self.page.lock().await.take() {
            warn!("Discarding closed browser tab: {}", err);
            let _ = page.close().await;
        }
    }

    async fn evaluate<T: DeserializeOwned>(
        &self,
        page: &Page,
        script: String,
    ) -> std::result::Result<T, DriverError> {
        let params = EvaluateParams::builder()
            .expression(script)
            .await_promise(true)
            .return_by_value(true)
            .build()
            .map_err(|e| DriverError::new(DriverErrorKind::Other, e))?;

        page.evaluate_expression(params)
            .await
            .map_err(|e| cdp_error("Script execution failed", &e))?
            .into_value::<T>()
            .map_err(|e| DriverError::extraction(format!("Failed to parse result: {:?}", e)))
    }

    async fn extract(
        &self,
        url: &str,
        mode: ExtractMode,
    ) -> std::result::Result<Extraction, DriverError> {
        let page = self.page().await?;

        page.goto(url)
            .await
            .map_err(|e| cdp_error(&format!("Navigation to {} failed", url), &e))?;

        match mode {
            ExtractMode::Articles => {
                let articles = self.evaluate(&page, self.scripts.articles_script()).await?;
                Ok(Extraction::Articles(articles))
            }
            ExtractMode::Images => {
                let images = self.evaluate(&page, self.scripts.images_script()).await?;
                Ok(Extraction::Images(images))
            }
        }
    }

    async fn fetch(&self, url: &str) -> std::result::Result<Vec<u8>, DriverError> {
        let page = self.page().await?;
        let fetched: FetchedBinary = self.evaluate(&page, self.scripts.fetch_script(url)).await?;
        fetched.into_bytes(url)
    }
}

#[async_trait]
impl PageDriver for ChromeDriver {
    async fn navigate_and_extract(
        &self,
        url: &str,
        mode: ExtractMode,
    ) -> std::result::Result<Extraction, DriverError> {
        let result = self.extract(url, mode).await;
        if let Err(ref err) = result {
            self.discard_closed_page(err).await;
        }
        result
    }

    async fn fetch_binary(&self, url: &str) -> std::result::Result<Vec<u8>, DriverError> {
        let result = self.fetch(url).await;
        if let Err(ref err) = result {
            self.discard_closed_page(err).await;
        }
        result
    }

    async fn close(&mut self) -> std::result::Result<(), DriverError> {
        if let Some(page) = self.page.get_mut().take() {
            let _ = page.close().await;
        }

        self.browser
            .close()
            .await
            .map_err(|e| cdp_error("Failed to close browser", &e))?;
        let _ = self.browser.wait().await;
        self.handler.abort();

        info!("Browser closed");
        Ok(())
    }
}

impl Drop for ChromeDriver {
    fn drop(&mut self) {
        self.handler.abort();
    }
}
