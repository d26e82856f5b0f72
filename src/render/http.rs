//! Static listing-page renderer
//!
//! Fetches listing pages with a plain GET. Pages that need scripts or the
//! "load more" control only yield their server-rendered links.

use super::PageRenderer;
use crate::crawler::build_http_client;
use crate::RenderError;
use async_trait::async_trait;
use reqwest::Client;
use std::convert::Infallible;
use std::time::Duration;

/// Renders listing pages without a browser
pub struct HttpRenderer {
    client: Client,
    html: Option<String>,
}

impl HttpRenderer {
    /// Creates a renderer presenting the given user agent
    pub fn new(user_agent: &str, timeout: Duration) -> Result<Self, RenderError> {
        let client = build_http_client(user_agent, timeout)
            .map_err(|e| RenderError::SessionInit(e.to_string()))?;

        Ok(Self { client, html: None })
    }
}

#[async_trait]
impl PageRenderer for HttpRenderer {
    type Handle = Infallible;

    async fn navigate(&mut self, url: &str) -> Result<(), RenderError> {
        self.html = None;

        let navigation_error = |message: String| RenderError::Navigation {
            url: url.to_string(),
            message,
        };

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| navigation_error(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(navigation_error(format!("HTTP {}", status.as_u16())));
        }

        let body = response
            .text()
            .await
            .map_err(|e| navigation_error(e.to_string()))?;
        self.html = Some(body);
        Ok(())
    }

    async fn find_clickable(
        &mut self,
        _xpath: &str,
        _timeout: Duration,
    ) -> Result<Option<Infallible>, RenderError> {
        Ok(None)
    }

    async fn click(&mut self, handle: Infallible) -> Result<(), RenderError> {
        match handle {}
    }

    async fn content(&mut self) -> Result<String, RenderError> {
        self.html
            .clone()
            .ok_or_else(|| RenderError::Content("no page loaded".to_string()))
    }
}
