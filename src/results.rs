use serde::{Deserialize, Serialize};

/// Discount label used when a card carries no discount badge
pub const NO_DISCOUNT: &str = "No Discount";

/// One accepted product listing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DealRecord {
    /// Trimmed, non-empty product title
    #[serde(rename = "Title")]
    pub title: String,

    /// Always greater than zero
    #[serde(rename = "Price")]
    pub price: f64,

    /// Discount label as shown on the card, or [`NO_DISCOUNT`]
    #[serde(rename = "Discount")]
    pub discount: String,

    /// Link as found on the card (absolute or relative)
    #[serde(rename = "Link")]
    pub link: String,
}

impl DealRecord {
    /// Create a new deal record
    pub fn new(title: String, price: f64, discount: String, link: String) -> Self {
        Self {
            title,
            price,
            discount,
            link,
        }
    }
}

/// A deal record as persisted, stamped with the run's retrieval time
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedDeal {
    #[serde(flatten)]
    pub deal: DealRecord,

    /// ISO-8601 UTC timestamp shared by every record of one save
    pub last_updated: String,
}

/// One page to fetch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    /// 1-based page number
    pub page_number: u32,

    /// Value of the `platforms` query parameter
    pub platform: String,
}

impl PageRequest {
    pub fn new(page_number: u32, platform: &str) -> Self {
        Self {
            page_number,
            platform: platform.to_string(),
        }
    }
}

/// Records accepted from a single page, possibly empty
pub type ScrapeResult = Vec<DealRecord>;
