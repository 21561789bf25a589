use crate::parsers::normalize::clean_discount;
use crate::results::{DealRecord, SavedDeal};
use chrono::{SecondsFormat, Utc};
use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use thiserror::Error;

/// Errors raised while writing the deals document
#[derive(Debug, Error)]
pub enum PersistError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result of a save; failures are logged, never raised
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveOutcome {
    /// Nothing to save, no file touched
    Skipped,
    /// This many records were written
    Written(usize),
    /// The file could not be written
    Failed,
}

/// Sorts `records` by discount (largest first, ties keep their order),
/// stamps them with one timestamp and writes them as a JSON array to `path`
pub fn save_deals(records: &[DealRecord], path: impl AsRef<Path>) -> SaveOutcome {
    let path = path.as_ref();
    if records.is_empty() {
        ::log::warn!("No deals to save");
        return SaveOutcome::Skipped;
    }

    let timestamp = Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true);
    let deals = stamp(sort_by_discount(records), &timestamp);

    match write_json(&deals, path) {
        Ok(()) => {
            ::log::info!("Successfully saved {} deals to {}", deals.len(), path.display());
            SaveOutcome::Written(deals.len())
        }
        Err(e) => {
            ::log::error!("Error saving deals to {}: {}", path.display(), e);
            SaveOutcome::Failed
        }
    }
}

/// Stable sort by discount magnitude, descending
pub fn sort_by_discount(records: &[DealRecord]) -> Vec<DealRecord> {
    let mut sorted = records.to_vec();
    sorted.sort_by(|a, b| discount_of(b).total_cmp(&discount_of(a)));
    sorted
}

fn discount_of(deal: &DealRecord) -> f64 {
    clean_discount(Some(deal.discount.as_str()))
}

fn stamp(records: Vec<DealRecord>, timestamp: &str) -> Vec<SavedDeal> {
    records
        .into_iter()
        .map(|deal| SavedDeal {
            deal,
            last_updated: timestamp.to_string(),
        })
        .collect()
}

fn write_json(deals: &[SavedDeal], path: &Path) -> Result<(), PersistError> {
    let mut writer = BufWriter::new(File::create(path)?);
    let mut serializer =
        serde_json::Serializer::with_formatter(&mut writer, PrettyFormatter::with_indent(b"    "));
    deals.serialize(&mut serializer)?;
    writer.write_all(b"\n")?;
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    fn deal(title: &str, discount: &str) -> DealRecord {
        DealRecord::new(
            title.to_string(),
            9.99,
            discount.to_string(),
            format!("/{}", title.to_lowercase()),
        )
    }

    #[test]
    fn test_sorts_by_discount_descending() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("deals.json");
        let records = vec![
            deal("Ten", "-10%"),
            deal("Fifty", "-50%"),
            deal("None", "No Discount"),
            deal("TwentyFive", "25% Off"),
        ];

        assert_eq!(save_deals(&records, &path), SaveOutcome::Written(4));

        let written: Vec<Value> =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        let titles: Vec<_> = written.iter().map(|d| d["Title"].as_str().unwrap()).collect();
        assert_eq!(titles, vec!["Fifty", "TwentyFive", "Ten", "None"]);

        let stamp = written[0]["last_updated"].as_str().unwrap();
        assert!(stamp.ends_with('Z'));
        assert!(chrono::DateTime::parse_from_rfc3339(stamp).is_ok());
        assert!(written.iter().all(|d| d["last_updated"] == stamp));
    }

    #[test]
    fn test_document_shape() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("deals.json");
        let records = vec![DealRecord::new(
            "Pokémon™ Légendes".to_string(),
            19.99,
            "-20%".to_string(),
            "https://www.cdkeys.com/pokemon".to_string(),
        )];

        save_deals(&records, &path);

        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.contains("Pokémon™ Légendes"));
        assert!(text.contains("\n        \"Title\""));

        let written: Vec<Value> = serde_json::from_str(&text).unwrap();
        let object = written[0].as_object().unwrap();
        let mut keys: Vec<_> = object.keys().map(String::as_str).collect();
        keys.sort();
        assert_eq!(keys, vec!["Discount", "Link", "Price", "Title", "last_updated"]);
        assert_eq!(object["Price"].as_f64(), Some(19.99));
    }

    #[test]
    fn test_ties_keep_input_order() {
        let records = vec![
            deal("A", "-10%"),
            deal("B", "No Discount"),
            deal("C", "-10%"),
            deal("D", ""),
        ];

        let titles: Vec<_> = sort_by_discount(&records)
            .into_iter()
            .map(|d| d.title)
            .collect();
        assert_eq!(titles, vec!["A", "C", "B", "D"]);
    }

    #[test]
    fn test_empty_input_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("deals.json");

        assert_eq!(save_deals(&[], &path), SaveOutcome::Skipped);
        assert!(!path.exists());
    }

    #[test]
    fn test_write_failure_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("deals.json");

        assert_eq!(save_deals(&[deal("A", "-5%")], &path), SaveOutcome::Failed);
    }
}
