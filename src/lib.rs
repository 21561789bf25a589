// Re-export modules
pub mod config;
pub mod crawlers;
pub mod dedup;
pub mod output;
pub mod parsers;
pub mod results;
pub mod utils;

// Re-export commonly used types for convenience
pub use config::{ConfigError, RunConfig};
pub use output::SaveOutcome;
pub use results::DealRecord;

use crawlers::{HttpClient, PageFetcher};
use std::sync::Arc;
use thiserror::Error;

/// Errors that stop a run before any page is fetched
#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("failed to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),
}

/// Main builder for a deal scraping run
pub struct DealScraper {
    config: RunConfig,
}

impl DealScraper {
    /// Create a new scraper for the given configuration
    pub fn new(config: RunConfig) -> Self {
        Self { config }
    }

    /// Set the listing URL
    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.config.base_url = base_url.to_string();
        self
    }

    /// Set the number of pages to fetch
    pub fn with_max_pages(mut self, max_pages: u32) -> Self {
        self.config.max_pages = max_pages;
        self
    }

    /// Set the number of concurrent workers
    pub fn with_thread_count(mut self, thread_count: usize) -> Self {
        self.config.thread_count = thread_count;
        self
    }

    /// Set the output file; `.json` is appended when missing
    pub fn with_output_path(mut self, output_path: &str) -> Self {
        self.config.output_path = utils::ensure_json_extension(output_path);
        self
    }

    pub fn config(&self) -> &RunConfig {
        &self.config
    }

    /// Scrape every page over HTTP
    pub async fn run(&self) -> Result<Vec<DealRecord>, ScrapeError> {
        let client = HttpClient::new(self.config.http.clone())?;
        self.run_with(Arc::new(client)).await
    }

    /// Scrape every page through the given fetcher
    pub async fn run_with<F: PageFetcher>(
        &self,
        fetcher: Arc<F>,
    ) -> Result<Vec<DealRecord>, ScrapeError> {
        let records = crawlers::web::scrape_all(&self.config, fetcher).await?;
        Ok(records)
    }

    /// Write records to the configured output path
    pub fn save(&self, records: &[DealRecord]) -> SaveOutcome {
        output::save_deals(records, &self.config.output_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crawlers::FetchError;
    use crate::parsers::tests::{card, listing_page};

    struct SinglePage(String);

    impl PageFetcher for SinglePage {
        async fn fetch(&self, url: &str) -> Result<String, FetchError> {
            if url.contains("p=1&") {
                Ok(self.0.clone())
            } else {
                Err(FetchError::new(url, "HTTP 404 Not Found"))
            }
        }
    }

    #[test]
    fn test_builder_overrides() {
        let scraper = DealScraper::new(RunConfig::default())
            .with_base_url("https://shop.example.com/games")
            .with_max_pages(4)
            .with_thread_count(2)
            .with_output_path("steam_deals");

        let config = scraper.config();
        assert_eq!(config.base_url, "https://shop.example.com/games");
        assert_eq!(config.max_pages, 4);
        assert_eq!(config.thread_count, 2);
        assert_eq!(config.output_path, "steam_deals.json");
    }

    #[tokio::test]
    async fn test_run_and_save() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("deals");
        let page = listing_page(&[
            card("Hades", "/hades", Some("$12.49"), Some("-25%")),
            card("Celeste", "/celeste", Some("$4.99"), Some("-75%")),
        ]);

        let scraper = DealScraper::new(RunConfig::default())
            .with_max_pages(3)
            .with_thread_count(2)
            .with_output_path(output.to_str().unwrap());

        let records = scraper
            .run_with(Arc::new(SinglePage(page)))
            .await
            .unwrap();
        assert_eq!(records.len(), 2);

        assert_eq!(scraper.save(&records), SaveOutcome::Written(2));
        let text = std::fs::read_to_string(dir.path().join("deals.json")).unwrap();
        assert!(text.find("Celeste").unwrap() < text.find("Hades").unwrap());
    }

    #[tokio::test]
    async fn test_run_rejects_invalid_config() {
        let scraper = DealScraper::new(RunConfig::new("::not a url::"));
        assert!(matches!(scraper.run().await, Err(ScrapeError::Config(_))));
    }
}
