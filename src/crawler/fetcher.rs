//! Detail-page fetcher
//!
//! Detail pages are fetched with their own HTTP client, independently of the
//! rendering session, so any number of them can be in flight at once. Each
//! fetch is a single attempt with a fixed timeout.

use crate::listing::{extract_listing, ListingRecord};
use crate::DetailError;
use reqwest::Client;
use std::time::Duration;

/// Builds the HTTP client shared by all detail fetches
///
/// # Arguments
///
/// * `user_agent` - Browser-like user agent sent with every request
/// * `timeout` - Per-request timeout
///
/// # Example
///
/// ```no_run
/// use oto_harvest::crawler::build_http_client;
/// use std::time::Duration;
///
/// let client = build_http_client("Mozilla/5.0", Duration::from_secs(10)).unwrap();
/// ```
pub fn build_http_client(user_agent: &str, timeout: Duration) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(user_agent)
        .timeout(timeout)
        .gzip(true)
        .brotli(true)
        .build()
}

/// Fetches one detail page and extracts its listing record
///
/// # Returns
///
/// * `Ok(ListingRecord)` - The page matched the expected structure
/// * `Err(DetailError::Fetch)` - Network error or timeout
/// * `Err(DetailError::Status)` - Non-success HTTP status
/// * `Err(DetailError::Extraction)` - Markup did not match
pub async fn fetch_detail(client: &Client, url: &str) -> Result<ListingRecord, DetailError> {
    let response = client
        .get(url)
        .send()
        .await
        .map_err(|source| DetailError::Fetch {
            url: url.to_string(),
            source,
        })?;

    let status = response.status();
    if !status.is_success() {
        return Err(DetailError::Status {
            url: url.to_string(),
            status: status.as_u16(),
        });
    }

    let bytes = response.bytes().await.map_err(|source| DetailError::Fetch {
        url: url.to_string(),
        source,
    })?;
    let body = decode_body(&bytes);

    extract_listing(&body, url).map_err(|source| DetailError::Extraction {
        url: url.to_string(),
        source,
    })
}

/// Decodes a response body as UTF-8, dropping invalid byte sequences
pub fn decode_body(bytes: &[u8]) -> String {
    let mut decoded = String::with_capacity(bytes.len());
    let mut rest = bytes;

    loop {
        match std::str::from_utf8(rest) {
            Ok(valid) => {
                decoded.push_str(valid);
                return decoded;
            }
            Err(e) => {
                let (valid, invalid) = rest.split_at(e.valid_up_to());
                decoded.push_str(std::str::from_utf8(valid).unwrap_or_default());
                let skip = e.error_len().unwrap_or(invalid.len());
                rest = &invalid[skip..];
            }
        }
    }
}
