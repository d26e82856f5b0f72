//! Listing records and detail-page extraction
//!
//! Extraction is split in two so that the fragile part can be tested on its own:
//! - `extract` turns detail-page markup into a headline (title, date, price)
//!   plus the ordered list of labelled info entries
//! - `record` maps those entries onto fields, branching on `ArityVariant`

mod extract;
mod record;

pub use extract::{extract_info_entries, extract_listing, stripped_text};
pub use record::{map_info, ArityVariant, InfoFields, ListingRecord, COLUMNS, DEFAULT_MILEAGE};
