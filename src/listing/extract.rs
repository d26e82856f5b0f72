//! Detail-page field extraction
//!
//! Detail pages carry the title in `h1.title-detail`, the posting date in the
//! first `.date` element, the price in the first `.price` element, and the
//! specifications as `<li><label>Name</label>value</li>` entries inside one or
//! more `ul.list-info` lists.

use crate::listing::record::{map_info, ListingRecord};
use crate::ExtractionError;
use scraper::{ElementRef, Html, Selector};

const TITLE_SELECTOR: &str = "h1.title-detail";
const DATE_SELECTOR: &str = ".date";
const PRICE_SELECTOR: &str = ".price";
const INFO_ENTRY_SELECTOR: &str = "ul.list-info li";
const LABEL_SELECTOR: &str = "label";

/// Extracts a complete listing record from detail-page markup
///
/// Any missing element, unlabelled entry, short info list or non-numeric year
/// fails the whole page. A record is never partially filled.
///
/// # Example
///
/// ```
/// use oto_harvest::listing::extract_listing;
///
/// let html = r#"<h1 class="title-detail">Kia Morning</h1>
///     <span class="date">01/02/2024</span><div class="price">300 triệu</div>
///     <ul class="list-info">
///       <li><label>Năm SX</label>2015</li><li><label>Nhiên liệu</label>Xăng</li>
///       <li><label>Kiểu dáng</label>Hatchback</li><li><label>Tình trạng</label>Cũ</li>
///       <li><label>Hộp số</label>Số sàn</li><li><label>Xuất xứ</label>Trong nước</li>
///       <li><label>Địa điểm</label>Hà Nội</li>
///     </ul>"#;
///
/// let record = extract_listing(html, "https://oto.com.vn/xe/1").unwrap();
/// assert_eq!(record.model_year, 2015);
/// assert_eq!(record.mileage, "0km");
/// ```
pub fn extract_listing(html: &str, url: &str) -> Result<ListingRecord, ExtractionError> {
    let document = Html::parse_document(html);

    let title = first_text(&document, TITLE_SELECTOR)?;
    let posted_on = first_text(&document, DATE_SELECTOR)?;
    let entries = extract_info_entries(&document)?;
    let info = map_info(&entries)?;
    let price = first_text(&document, PRICE_SELECTOR)?;

    Ok(ListingRecord::new(url, title, posted_on, price, info))
}

/// Collects the stripped value of every info entry, in document order
///
/// The first `label` inside each entry is the field name and is dropped
/// from the value. An entry without a label is an error.
pub fn extract_info_entries(document: &Html) -> Result<Vec<String>, ExtractionError> {
    let entry_selector = parse_selector(INFO_ENTRY_SELECTOR)?;
    let label_selector = parse_selector(LABEL_SELECTOR)?;

    document
        .select(&entry_selector)
        .enumerate()
        .map(|(index, entry)| {
            let label = entry
                .select(&label_selector)
                .next()
                .ok_or(ExtractionError::MissingLabel(index))?;
            Ok(text_without(entry, label))
        })
        .collect()
}

/// Concatenates the trimmed, non-empty text nodes under `element`
pub fn stripped_text(element: ElementRef<'_>) -> String {
    element
        .text()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect()
}

/// Like `stripped_text`, but skips everything inside `excluded`
fn text_without(element: ElementRef<'_>, excluded: ElementRef<'_>) -> String {
    let excluded_id = excluded.id();

    element
        .descendants()
        .filter(|node| node.id() != excluded_id && !node.ancestors().any(|a| a.id() == excluded_id))
        .filter_map(|node| node.value().as_text())
        .map(|text| text.trim())
        .filter(|s| !s.is_empty())
        .collect()
}

fn first_text(document: &Html, css: &'static str) -> Result<String, ExtractionError> {
    let selector = parse_selector(css)?;
    document
        .select(&selector)
        .next()
        .map(stripped_text)
        .ok_or(ExtractionError::MissingElement(css))
}

fn parse_selector(css: &'static str) -> Result<Selector, ExtractionError> {
    Selector::parse(css).map_err(|_| ExtractionError::MissingElement(css))
}
