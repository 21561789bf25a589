use clap::Parser;
use deal_scrape::{DealScraper, SaveOutcome};
use std::process::ExitCode;

mod args;
use args::Args;

#[tokio::main]
async fn main() -> ExitCode {
    // Initialize logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    // Parse command-line arguments
    let args = Args::parse();

    let config = match args.into_config() {
        Ok(config) => config,
        Err(e) => {
            ::log::error!("Failed to load configuration: {}", e);
            return ExitCode::FAILURE;
        }
    };

    println!("Starting scraper with following configuration:");
    println!("Base URL: {}", config.base_url);
    println!("Max Pages: {}", config.max_pages);
    println!("Threads: {}", config.thread_count);
    println!("Output File: {}", config.output_path);

    let scraper = DealScraper::new(config);
    let start_time = std::time::Instant::now();

    let deals = match scraper.run().await {
        Ok(deals) => deals,
        Err(e) => {
            ::log::error!("Failed to start scraper: {}", e);
            return ExitCode::FAILURE;
        }
    };

    ::log::info!(
        "Scraping finished in {:.2} seconds",
        start_time.elapsed().as_secs_f64()
    );

    match scraper.save(&deals) {
        SaveOutcome::Written(count) => {
            println!(
                "Successfully saved {} deals to {}",
                count,
                scraper.config().output_path
            );
        }
        SaveOutcome::Skipped => println!("No deals found"),
        SaveOutcome::Failed => {
            println!(
                "Scraped {} deals but could not write {}",
                deals.len(),
                scraper.config().output_path
            );
        }
    }

    ExitCode::SUCCESS
}
