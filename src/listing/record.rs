use crate::ExtractionError;
use serde::{Deserialize, Serialize};

/// Mileage recorded when a listing omits it (seven-entry info lists)
pub const DEFAULT_MILEAGE: &str = "0km";

/// CSV column order, matching the field order of `ListingRecord`
pub const COLUMNS: [&str; 12] = [
    "url",
    "ten_san_pham",
    "ngay_dang",
    "nam_sx",
    "nhien_lieu",
    "kieu_dang",
    "tinh_trang",
    "so_km",
    "hop_so",
    "xuat_xu",
    "dia_diem",
    "gia_ban",
];

/// One extracted detail page
///
/// Column names on disk keep the dataset's established headers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListingRecord {
    #[serde(rename = "url")]
    pub url: String,

    #[serde(rename = "ten_san_pham")]
    pub title: String,

    #[serde(rename = "ngay_dang")]
    pub posted_on: String,

    #[serde(rename = "nam_sx")]
    pub model_year: i32,

    #[serde(rename = "nhien_lieu")]
    pub fuel: String,

    #[serde(rename = "kieu_dang")]
    pub body_style: String,

    #[serde(rename = "tinh_trang")]
    pub condition: String,

    #[serde(rename = "so_km")]
    pub mileage: String,

    #[serde(rename = "hop_so")]
    pub transmission: String,

    #[serde(rename = "xuat_xu")]
    pub origin: String,

    #[serde(rename = "dia_diem")]
    pub location: String,

    #[serde(rename = "gia_ban")]
    pub price: String,
}

impl ListingRecord {
    /// Assembles a record from the page headline and the mapped info fields
    pub fn new(
        url: impl Into<String>,
        title: impl Into<String>,
        posted_on: impl Into<String>,
        price: impl Into<String>,
        info: InfoFields,
    ) -> Self {
        Self {
            url: url.into(),
            title: title.into(),
            posted_on: posted_on.into(),
            model_year: info.model_year,
            fuel: info.fuel,
            body_style: info.body_style,
            condition: info.condition,
            mileage: info.mileage,
            transmission: info.transmission,
            origin: info.origin,
            location: info.location,
            price: price.into(),
        }
    }
}

/// Which of the two recognised info-list layouts a page uses
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArityVariant {
    /// Eight entries: year, fuel, body, condition, mileage, transmission, origin, location
    Eight,
    /// Mileage omitted: year, fuel, body, condition, transmission, origin, location
    Seven,
}

impl ArityVariant {
    /// Picks the layout for an info list of `len` entries
    ///
    /// Exactly eight entries is the full layout. Any other length of at least
    /// seven is read with the seven-entry layout; trailing extras are ignored.
    pub fn from_len(len: usize) -> Result<Self, ExtractionError> {
        match len {
            8 => Ok(Self::Eight),
            n if n >= 7 => Ok(Self::Seven),
            n => Err(ExtractionError::TooFewEntries(n)),
        }
    }
}

/// Info-list fields after positional mapping
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InfoFields {
    pub model_year: i32,
    pub fuel: String,
    pub body_style: String,
    pub condition: String,
    pub mileage: String,
    pub transmission: String,
    pub origin: String,
    pub location: String,
}

/// Maps stripped info entries onto named fields
///
/// Indices 0..=3 are shared by both layouts. The tail depends on the variant:
///
/// | Variant | mileage | transmission | origin | location |
/// |---------|---------|--------------|--------|----------|
/// | Eight   | 4       | 5            | 6      | 7        |
/// | Seven   | "0km"   | 4            | 5      | 6        |
pub fn map_info(entries: &[String]) -> Result<InfoFields, ExtractionError> {
    let variant = ArityVariant::from_len(entries.len())?;

    let model_year = entries[0]
        .trim()
        .parse::<i32>()
        .map_err(|_| ExtractionError::InvalidYear(entries[0].clone()))?;

    let (mileage, tail) = match variant {
        ArityVariant::Eight => (entries[4].clone(), &entries[5..8]),
        ArityVariant::Seven => (DEFAULT_MILEAGE.to_string(), &entries[4..7]),
    };

    Ok(InfoFields {
        model_year,
        fuel: entries[1].clone(),
        body_style: entries[2].clone(),
        condition: entries[3].clone(),
        mileage,
        transmission: tail[0].clone(),
        origin: tail[1].clone(),
        location: tail[2].clone(),
    })
}
