//! Listing-page link extraction
//!
//! Listing pages show one `.item-car` card per ad; the ad title inside the
//! card links to the detail page. Only those title anchors are collected.

use scraper::{Html, Selector};
use url::Url;

/// CSS path of the detail-page anchor inside each listing card
pub const LISTING_LINK_SELECTOR: &str = ".box-list-car .item-car .info .info-left .title a";

/// Extracts absolute detail-page URLs from listing-page markup
///
/// Links are returned in document order and are not deduplicated; merging
/// into the frontier takes care of that. Anchors without an `href`, or whose
/// `href` is empty, a `javascript:`, `mailto:`, `tel:` or `data:` URI, or
/// does not resolve to an http(s) URL, are skipped.
///
/// # Example
///
/// ```
/// use oto_harvest::crawler::extract_listing_links;
/// use url::Url;
///
/// let html = r#"<div class="box-list-car"><div class="item-car"><div class="info">
///     <div class="info-left"><h3 class="title"><a href="/xe/1">Vios</a></h3></div>
/// </div></div></div>"#;
/// let base = Url::parse("https://oto.com.vn").unwrap();
/// assert_eq!(extract_listing_links(html, &base), vec!["https://oto.com.vn/xe/1"]);
/// ```
pub fn extract_listing_links(html: &str, base_url: &Url) -> Vec<String> {
    let document = Html::parse_document(html);

    let Ok(selector) = Selector::parse(LISTING_LINK_SELECTOR) else {
        return Vec::new();
    };

    document
        .select(&selector)
        .filter_map(|element| element.value().attr("href"))
        .filter_map(|href| resolve_link(href, base_url))
        .collect()
}

/// Resolves a link href to an absolute URL and validates it
///
/// Returns None if the link should be excluded:
/// - empty hrefs
/// - javascript:, mailto:, tel: schemes
/// - data: URIs
/// - Invalid URLs
/// - Non-HTTP(S) URLs after resolution
fn resolve_link(href: &str, base_url: &Url) -> Option<String> {
    let href = href.trim();

    if href.is_empty() {
        return None;
    }

    if href.starts_with("javascript:")
        || href.starts_with("mailto:")
        || href.starts_with("tel:")
        || href.starts_with("data:")
    {
        return None;
    }

    match base_url.join(href) {
        Ok(absolute_url) => {
            if absolute_url.scheme() == "http" || absolute_url.scheme() == "https" {
                Some(absolute_url.to_string())
            } else {
                None
            }
        }
        Err(_) => None,
    }
}
