use scraper::Selector;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Read;
use std::path::Path;
use thiserror::Error;
use url::Url;

/// Errors raised while loading or validating a run configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid base URL {url:?}: {source}")]
    InvalidBaseUrl {
        url: String,
        source: url::ParseError,
    },

    #[error("thread count must be at least 1")]
    ZeroThreads,

    #[error("invalid {name} selector {selector:?}")]
    InvalidSelector { name: &'static str, selector: String },
}

/// Configuration for one scraping run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunConfig {
    /// Catalog listing URL; the page number and platform filter are appended to it
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Pages 1..=max_pages are fetched
    #[serde(default = "default_max_pages")]
    pub max_pages: u32,

    /// Number of concurrent workers
    #[serde(default = "default_thread_count")]
    pub thread_count: usize,

    /// Where the JSON document is written
    #[serde(default = "default_output_path")]
    pub output_path: String,

    /// Value of the `platforms` query parameter sent with every request
    #[serde(default = "default_platform")]
    pub platform: String,

    #[serde(default)]
    pub http: HttpConfig,

    #[serde(default)]
    pub selectors: CardSelectors,
}

/// Transport settings for the HTTP client
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Per-request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Retries after the first attempt on transient failures
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    #[serde(default = "default_backoff_base_ms")]
    pub backoff_base_ms: u64,

    #[serde(default = "default_backoff_max_ms")]
    pub backoff_max_ms: u64,

    /// Lower bound of the courtesy delay before each fetch
    #[serde(default = "default_delay_min_ms")]
    pub delay_min_ms: u64,

    /// Upper bound of the courtesy delay before each fetch
    #[serde(default = "default_delay_max_ms")]
    pub delay_max_ms: u64,
}

/// CSS selectors describing one product card and its fields
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CardSelectors {
    #[serde(default = "default_card_selector")]
    pub card: String,

    /// Anchor holding both the title text and the link
    #[serde(default = "default_title_link_selector")]
    pub title_link: String,

    #[serde(default = "default_price_selector")]
    pub price: String,

    #[serde(default = "default_discount_selector")]
    pub discount: String,
}

fn default_base_url() -> String {
    "https://www.cdkeys.com/pc/games".to_string()
}

fn default_max_pages() -> u32 {
    50
}

fn default_thread_count() -> usize {
    12
}

fn default_output_path() -> String {
    "game_deals.json".to_string()
}

fn default_platform() -> String {
    "Steam".to_string()
}

fn default_user_agent() -> String {
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36".to_string()
}

fn default_timeout_secs() -> u64 {
    10
}

fn default_max_retries() -> u32 {
    3
}

fn default_backoff_base_ms() -> u64 {
    500
}

fn default_backoff_max_ms() -> u64 {
    10_000
}

fn default_delay_min_ms() -> u64 {
    500
}

fn default_delay_max_ms() -> u64 {
    1500
}

fn default_card_selector() -> String {
    "div.product-item-info".to_string()
}

fn default_title_link_selector() -> String {
    "a.product-item-link".to_string()
}

fn default_price_selector() -> String {
    "span.price".to_string()
}

fn default_discount_selector() -> String {
    "span.product-item-discount".to_string()
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            max_pages: default_max_pages(),
            thread_count: default_thread_count(),
            output_path: default_output_path(),
            platform: default_platform(),
            http: HttpConfig::default(),
            selectors: CardSelectors::default(),
        }
    }
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            user_agent: default_user_agent(),
            timeout_secs: default_timeout_secs(),
            max_retries: default_max_retries(),
            backoff_base_ms: default_backoff_base_ms(),
            backoff_max_ms: default_backoff_max_ms(),
            delay_min_ms: default_delay_min_ms(),
            delay_max_ms: default_delay_max_ms(),
        }
    }
}

impl Default for CardSelectors {
    fn default() -> Self {
        Self {
            card: default_card_selector(),
            title_link: default_title_link_selector(),
            price: default_price_selector(),
            discount: default_discount_selector(),
        }
    }
}

impl RunConfig {
    /// Create a configuration for the given listing URL with default values
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.to_string(),
            ..Self::default()
        }
    }

    /// Load configuration from a JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let mut file = File::open(path)?;
        let mut contents = String::new();
        file.read_to_string(&mut contents)?;

        Self::from_json(&contents)
    }

    /// Load configuration from a JSON string
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        Ok(config)
    }

    /// Checks everything that would otherwise fail once the workers are running
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.listing_url()?;

        if self.thread_count == 0 {
            return Err(ConfigError::ZeroThreads);
        }

        self.selectors.compile()?;
        Ok(())
    }

    /// The parsed base URL
    pub fn listing_url(&self) -> Result<Url, ConfigError> {
        Url::parse(&self.base_url).map_err(|source| ConfigError::InvalidBaseUrl {
            url: self.base_url.clone(),
            source,
        })
    }
}

/// Parsed form of [`CardSelectors`]
#[derive(Debug, Clone)]
pub struct CompiledSelectors {
    pub card: Selector,
    pub title_link: Selector,
    pub price: Selector,
    pub discount: Selector,
}

impl CardSelectors {
    /// Parse every selector, reporting the first one that is not valid CSS
    pub fn compile(&self) -> Result<CompiledSelectors, ConfigError> {
        Ok(CompiledSelectors {
            card: parse_selector("card", &self.card)?,
            title_link: parse_selector("title link", &self.title_link)?,
            price: parse_selector("price", &self.price)?,
            discount: parse_selector("discount", &self.discount)?,
        })
    }
}

fn parse_selector(name: &'static str, selector: &str) -> Result<Selector, ConfigError> {
    if selector.trim().is_empty() {
        return Err(ConfigError::InvalidSelector {
            name,
            selector: selector.to_string(),
        });
    }

    Selector::parse(selector).map_err(|_| ConfigError::InvalidSelector {
        name,
        selector: selector.to_string(),
    })
}
