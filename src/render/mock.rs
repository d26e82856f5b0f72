//! In-memory renderer for discovery tests

use super::PageRenderer;
use crate::RenderError;
use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::time::Duration;

/// Builds listing markup with one listing item per href
pub(crate) fn listing_html<S: AsRef<str>>(hrefs: &[S]) -> String {
    let items: String = hrefs
        .iter()
        .map(|href| {
            format!(
                r#"<div class="item-car"><div class="info"><div class="info-left">
                    <h3 class="title"><a href="{}">Car</a></h3>
                </div></div></div>"#,
                href.as_ref()
            )
        })
        .collect();
    format!(
        r#"<html><body><div class="box-list-car">{}</div></body></html>"#,
        items
    )
}

/// Serves canned listing pages keyed by URL
///
/// Unknown URLs render as an empty listing.
#[derive(Debug, Default)]
pub(crate) struct MockRenderer {
    pages: HashMap<String, Vec<String>>,
    expansions: HashMap<String, Vec<Vec<String>>>,
    failures: HashSet<String>,
    failing_clicks: HashMap<String, usize>,
    current: Option<String>,
    revealed: Vec<String>,
    expanded: usize,
    clicks: usize,
    visited: Vec<String>,
}

impl MockRenderer {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn with_page<S: AsRef<str>>(mut self, url: &str, hrefs: &[S]) -> Self {
        self.pages.insert(
            url.to_string(),
            hrefs.iter().map(|h| h.as_ref().to_string()).collect(),
        );
        self
    }

    pub(crate) fn with_expansions(mut self, url: &str, batches: &[&[&str]]) -> Self {
        self.expansions.insert(
            url.to_string(),
            batches
                .iter()
                .map(|batch| batch.iter().map(|h| h.to_string()).collect())
                .collect(),
        );
        self
    }

    pub(crate) fn with_failure(mut self, url: &str) -> Self {
        self.failures.insert(url.to_string());
        self
    }

    /// Makes the `nth` click (1-based) on `url` fail with an interaction error
    pub(crate) fn with_failing_click(mut self, url: &str, nth: usize) -> Self {
        self.failing_clicks.insert(url.to_string(), nth);
        self
    }

    pub(crate) fn clicks(&self) -> usize {
        self.clicks
    }

    pub(crate) fn visited(&self) -> &[String] {
        &self.visited
    }

    fn pending_expansions(&self) -> usize {
        self.current
            .as_ref()
            .and_then(|url| self.expansions.get(url))
            .map_or(0, |batches| batches.len().saturating_sub(self.expanded))
    }
}

#[async_trait]
impl PageRenderer for MockRenderer {
    type Handle = ();

    async fn navigate(&mut self, url: &str) -> Result<(), RenderError> {
        self.visited.push(url.to_string());
        self.expanded = 0;

        if self.failures.contains(url) {
            self.current = None;
            self.revealed.clear();
            return Err(RenderError::Navigation {
                url: url.to_string(),
                message: "connection reset".to_string(),
            });
        }

        self.revealed = self.pages.get(url).cloned().unwrap_or_default();
        self.current = Some(url.to_string());
        Ok(())
    }

    async fn find_clickable(
        &mut self,
        _xpath: &str,
        _timeout: Duration,
    ) -> Result<Option<()>, RenderError> {
        Ok((self.pending_expansions() > 0).then_some(()))
    }

    async fn click(&mut self, _handle: ()) -> Result<(), RenderError> {
        let failing = self
            .current
            .as_ref()
            .and_then(|url| self.failing_clicks.get(url));
        if failing == Some(&(self.expanded + 1)) {
            return Err(RenderError::Interaction("element not interactable".to_string()));
        }

        let batch = self
            .current
            .as_ref()
            .and_then(|url| self.expansions.get(url))
            .and_then(|batches| batches.get(self.expanded))
            .cloned()
            .ok_or_else(|| RenderError::Interaction("nothing to click".to_string()))?;

        self.revealed.extend(batch);
        self.expanded += 1;
        self.clicks += 1;
        Ok(())
    }

    async fn content(&mut self) -> Result<String, RenderError> {
        if self.current.is_none() {
            return Err(RenderError::Content("no page loaded".to_string()));
        }
        Ok(listing_html(&self.revealed))
    }
}
