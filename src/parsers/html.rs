use crate::config::CompiledSelectors;
use crate::results::NO_DISCOUNT;
use scraper::{ElementRef, Html};
use thiserror::Error;

/// Failure to extract one card; sibling cards are unaffected
#[derive(Debug, Clone, Error, PartialEq)]
pub enum CardError {
    #[error("title anchor for {title:?} has no href")]
    MissingLink { title: String },
}

/// Field text pulled out of one product card, before normalization
#[derive(Debug, Clone, PartialEq)]
pub struct RawCard {
    pub title: String,
    pub link: String,
    pub price: Option<String>,
    pub discount: String,
}

/// Outcome of extracting one card: `Ok(None)` means the card has no title anchor
pub type CardOutcome = Result<Option<RawCard>, CardError>;

/// Locates every product card in a listing page and extracts its fields
pub fn parse(html: &str, selectors: &CompiledSelectors) -> Vec<CardOutcome> {
    let doc = Html::parse_document(html);

    let outcomes = doc
        .select(&selectors.card)
        .map(|card| extract_fields(card, selectors))
        .collect::<Vec<_>>();

    ::log::debug!("HTML parser found {} product cards", outcomes.len());
    outcomes
}

/// Extracts title, link, price and discount text from a single card
pub fn extract_fields(card: ElementRef<'_>, selectors: &CompiledSelectors) -> CardOutcome {
    let anchor = match card.select(&selectors.title_link).next() {
        Some(anchor) => anchor,
        None => return Ok(None),
    };

    let title = element_text(anchor);
    if title.is_empty() {
        return Ok(None);
    }

    let link = match anchor.value().attr("href") {
        Some(href) => href.trim().to_string(),
        None => return Err(CardError::MissingLink { title }),
    };

    let price = card.select(&selectors.price).next().map(element_text);

    let discount = card
        .select(&selectors.discount)
        .next()
        .map(element_text)
        .filter(|d| !d.is_empty())
        .unwrap_or_else(|| NO_DISCOUNT.to_string());

    Ok(Some(RawCard {
        title,
        link,
        price,
        discount,
    }))
}

fn element_text(element: ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}
