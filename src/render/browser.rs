//! Headless Chrome rendering session

use super::PageRenderer;
use crate::config::RendererConfig;
use crate::RenderError;
use async_trait::async_trait;
use chromiumoxide::browser::BrowserConfigBuilder;
use chromiumoxide::{Browser, BrowserConfig, Element, Page};
use futures::StreamExt;
use std::time::{Duration, Instant};
use tokio::task::JoinHandle;

const HIDE_WEBDRIVER: &str =
    "Object.defineProperty(navigator, 'webdriver', {get: () => undefined})";

const POLL_INTERVAL: Duration = Duration::from_millis(250);

/// Launch switches, replacing chromiumoxide's defaults
///
/// chromiumoxide's defaults without `--enable-automation`, plus the switches
/// that keep the automation infobar and `AutomationControlled` off.
const BROWSER_ARGS: [&str; 25] = [
    "--disable-background-networking",
    "--enable-features=NetworkService,NetworkServiceInProcess",
    "--disable-background-timer-throttling",
    "--disable-backgrounding-occluded-windows",
    "--disable-breakpad",
    "--disable-client-side-phishing-detection",
    "--disable-component-extensions-with-background-pages",
    "--disable-default-apps",
    "--disable-dev-shm-usage",
    "--disable-features=TranslateUI",
    "--disable-hang-monitor",
    "--disable-ipc-flooding-protection",
    "--disable-popup-blocking",
    "--disable-prompt-on-repost",
    "--disable-renderer-backgrounding",
    "--disable-sync",
    "--force-color-profile=srgb",
    "--metrics-recording-only",
    "--no-first-run",
    "--password-store=basic",
    "--use-mock-keychain",
    "--enable-blink-features=IdleDetection",
    "--lang=en_US",
    "--disable-blink-features=AutomationControlled",
    "--disable-infobars",
];

/// Headless, sandbox-less launch settings presenting `user_agent`
fn browser_config(user_agent: &str) -> BrowserConfigBuilder {
    BrowserConfig::builder()
        .no_sandbox()
        .disable_default_args()
        .args(BROWSER_ARGS)
        .arg(format!("--user-agent={}", user_agent))
}

/// A single Chrome tab driven over the DevTools protocol
pub struct BrowserRenderer {
    browser: Browser,
    page: Page,
    handler: JoinHandle<()>,
}

impl BrowserRenderer {
    /// Launches (or attaches to) Chrome and opens the working tab
    ///
    /// Failure here is fatal: without a session no target can be discovered.
    pub async fn launch(config: &RendererConfig, user_agent: &str) -> Result<Self, RenderError> {
        let (browser, mut handler) = if let Some(url) = &config.remote_debugging_url {
            tracing::info!("Connecting to remote Chrome instance at: {}", url);
            Browser::connect(url)
                .await
                .map_err(|e| RenderError::SessionInit(e.to_string()))?
        } else {
            let browser_config = browser_config(user_agent)
                .build()
                .map_err(RenderError::SessionInit)?;

            Browser::launch(browser_config)
                .await
                .map_err(|e| RenderError::SessionInit(e.to_string()))?
        };

        let handler = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if event.is_err() {
                    break;
                }
            }
        });

        let page = browser
            .new_page("about:blank")
            .await
            .map_err(|e| RenderError::SessionInit(e.to_string()))?;

        page.evaluate_on_new_document(HIDE_WEBDRIVER)
            .await
            .map_err(|e| RenderError::SessionInit(e.to_string()))?;

        Ok(Self {
            browser,
            page,
            handler,
        })
    }

    /// Closes the browser and stops the event handler
    pub async fn close(mut self) {
        if let Err(e) = self.browser.close().await {
            tracing::debug!("Browser close failed: {}", e);
        }
        self.handler.abort();
    }
}

#[async_trait]
impl PageRenderer for BrowserRenderer {
    type Handle = Element;

    async fn navigate(&mut self, url: &str) -> Result<(), RenderError> {
        self.page
            .goto(url)
            .await
            .map_err(|e| RenderError::Navigation {
                url: url.to_string(),
                message: e.to_string(),
            })?;
        Ok(())
    }

    async fn find_clickable(
        &mut self,
        xpath: &str,
        timeout: Duration,
    ) -> Result<Option<Element>, RenderError> {
        let deadline = Instant::now() + timeout;
        loop {
            if let Ok(element) = self.page.find_xpath(xpath).await {
                return Ok(Some(element));
            }
            if Instant::now() >= deadline {
                return Ok(None);
            }
            tokio::time::sleep(POLL_INTERVAL).await;
        }
    }

    async fn click(&mut self, handle: Element) -> Result<(), RenderError> {
        handle
            .scroll_into_view()
            .await
            .map_err(|e| RenderError::Interaction(e.to_string()))?;
        handle
            .click()
            .await
            .map_err(|e| RenderError::Interaction(e.to_string()))?;
        Ok(())
    }

    async fn content(&mut self) -> Result<String, RenderError> {
        self.page
            .content()
            .await
            .map_err(|e| RenderError::Content(e.to_string()))
    }
}
