use clap::Parser;
use deal_scrape::{ConfigError, RunConfig};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "deal-scrape")]
#[command(about = "Scrapes paginated game-key listings into a JSON file sorted by discount")]
#[command(version)]
pub struct Args {
    /// Listing URL to paginate (default: https://www.cdkeys.com/pc/games)
    #[arg(short, long)]
    pub base_url: Option<String>,

    /// Maximum number of pages to scrape (default: 50)
    #[arg(short, long)]
    pub max_pages: Option<u32>,

    /// Number of concurrent workers (default: 12)
    #[arg(short, long)]
    pub threads: Option<usize>,

    /// Output JSON filename; `.json` is appended when missing (default: game_deals.json)
    #[arg(short, long)]
    pub output: Option<String>,

    /// JSON file with run, HTTP and selector settings
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}

impl Args {
    /// Defaults, then the config file, then command-line flags
    pub fn into_config(self) -> Result<RunConfig, ConfigError> {
        let mut config = match &self.config {
            Some(path) => RunConfig::from_file(path)?,
            None => RunConfig::default(),
        };

        if let Some(base_url) = self.base_url {
            config.base_url = base_url;
        }
        if let Some(max_pages) = self.max_pages {
            config.max_pages = max_pages;
        }
        if let Some(threads) = self.threads {
            config.thread_count = threads;
        }
        if let Some(output) = self.output {
            config.output_path = output;
        }
        config.output_path = deal_scrape::utils::ensure_json_extension(&config.output_path);

        Ok(config)
    }
}
