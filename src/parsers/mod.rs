pub mod html;
pub mod normalize;

#[cfg(test)]
pub(crate) mod tests;

use crate::config::CompiledSelectors;
use crate::dedup::DedupRegistry;
use crate::results::{DealRecord, ScrapeResult};

/// Per-page card accounting
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PageStats {
    /// Cards matched by the card selector
    pub cards: usize,
    /// Cards turned into records
    pub accepted: usize,
    /// Cards whose title was already taken
    pub duplicates: usize,
    /// Cards without a title or a usable price
    pub discarded: usize,
    /// Cards whose extraction failed
    pub failed: usize,
}

impl PageStats {
    pub fn merge(&mut self, other: &PageStats) {
        self.cards += other.cards;
        self.accepted += other.accepted;
        self.duplicates += other.duplicates;
        self.discarded += other.discarded;
        self.failed += other.failed;
    }
}

/// Turns one listing page into the records it contributes to the run.
///
/// Title and price are checked before the registry so an unusable card
/// never claims a title.
pub fn page_records(
    markup: &str,
    page_number: u32,
    selectors: &CompiledSelectors,
    registry: &DedupRegistry,
) -> (ScrapeResult, PageStats) {
    let mut stats = PageStats::default();
    let mut records = Vec::new();

    for outcome in html::parse(markup, selectors) {
        stats.cards += 1;

        let card = match outcome {
            Ok(Some(card)) => card,
            Ok(None) => {
                stats.discarded += 1;
                continue;
            }
            Err(e) => {
                ::log::error!("Error processing deal card on page {}: {}", page_number, e);
                stats.failed += 1;
                continue;
            }
        };

        let price = match card.price.as_deref().and_then(normalize::clean_price) {
            Some(price) if price > 0.0 => price,
            _ => {
                ::log::trace!("Discarding {:?} on page {}: no usable price", card.title, page_number);
                stats.discarded += 1;
                continue;
            }
        };

        if !registry.try_accept(&card.title) {
            stats.duplicates += 1;
            continue;
        }

        records.push(DealRecord::new(card.title, price, card.discount, card.link));
        stats.accepted += 1;
    }

    (records, stats)
}
